//! Route table and auth guard for the browser shell

use crate::api::types::MealSlot;

/// Known pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Root,
    Auth,
    Today,
    AddFood(MealSlot),
}

impl Route {
    /// Parse a path with an optional query string. Unknown paths yield `None`.
    pub fn parse(path_and_query: &str) -> Option<Self> {
        let (path, query) = match path_and_query.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path_and_query, None),
        };
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };

        match path {
            "/" => Some(Self::Root),
            "/auth" => Some(Self::Auth),
            "/today" => Some(Self::Today),
            "/add-food" => Some(Self::AddFood(MealSlot::from_query(
                query.and_then(|q| query_param(q, "meal")),
            ))),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Root => "/".to_string(),
            Self::Auth => "/auth".to_string(),
            Self::Today => "/today".to_string(),
            Self::AddFood(meal) => format!("/add-food?meal={}", meal.as_str()),
        }
    }

    pub const fn requires_auth(&self) -> bool {
        matches!(self, Self::Today | Self::AddFood(_))
    }
}

fn query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

/// Outcome of routing one path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

/// Apply the auth guard and root redirects
pub fn resolve(path_and_query: &str, authenticated: bool) -> Navigation {
    match Route::parse(path_and_query) {
        None => Navigation::Redirect(Route::Root),
        Some(Route::Root) if authenticated => Navigation::Redirect(Route::Today),
        Some(Route::Root) => Navigation::Redirect(Route::Auth),
        Some(route) if route.requires_auth() && !authenticated => Navigation::Redirect(Route::Auth),
        Some(route) => Navigation::Render(route),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_redirects_by_auth() {
        assert_eq!(resolve("/", true), Navigation::Redirect(Route::Today));
        assert_eq!(resolve("/", false), Navigation::Redirect(Route::Auth));
        assert_eq!(resolve("", false), Navigation::Redirect(Route::Auth));
    }

    #[test]
    fn test_protected_routes_need_token() {
        assert_eq!(resolve("/today", false), Navigation::Redirect(Route::Auth));
        assert_eq!(
            resolve("/add-food?meal=dinner", false),
            Navigation::Redirect(Route::Auth)
        );
        assert_eq!(resolve("/today", true), Navigation::Render(Route::Today));
        assert_eq!(resolve("/auth", false), Navigation::Render(Route::Auth));
    }

    #[test]
    fn test_unknown_paths_go_home() {
        assert_eq!(resolve("/settings", true), Navigation::Redirect(Route::Root));
    }

    #[test]
    fn test_add_food_meal_param() {
        assert_eq!(
            Route::parse("/add-food?meal=Dinner"),
            Some(Route::AddFood(MealSlot::Dinner))
        );
        assert_eq!(
            Route::parse("/add-food?x=1&meal=brunch"),
            Some(Route::AddFood(MealSlot::Breakfast))
        );
        assert_eq!(Route::parse("/add-food/"), Some(Route::AddFood(MealSlot::Breakfast)));
        assert_eq!(Route::AddFood(MealSlot::Snacks).path(), "/add-food?meal=snacks");
    }
}
