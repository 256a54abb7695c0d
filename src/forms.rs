//! Form Validation
//!
//! Turns raw form input into request bodies. Validation messages are the
//! ones shown next to the form.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::api::types::{CreateCustomFoodRequest, CreateLogEntryRequest, FoodRecord, FoodSource, MealSlot};
use crate::error::{ClientError, ClientResult};

/// Smallest loggable quantity in grams
pub const MIN_QUANTITY_G: u32 = 1;
/// Largest loggable quantity in grams
pub const MAX_QUANTITY_G: u32 = 5000;
/// Quantity used when a food has no serving size
pub const DEFAULT_QUANTITY_G: u32 = 100;

// ============ Auth ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Login => Self::Register,
            Self::Register => Self::Login,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Login => "Welcome back",
            Self::Register => "Create account",
        }
    }

    pub const fn submit_label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Register => "Create account",
        }
    }

    pub const fn switch_label(self) -> &'static str {
        match self {
            Self::Login => "New here? Create an account",
            Self::Register => "Already have an account? Login",
        }
    }
}

/// Login/registration input
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub username: String,
    pub password: String,
}

impl AuthForm {
    /// Trimmed username and untouched password
    pub fn validate(&self) -> ClientResult<(String, String)> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(ClientError::validation("Username is required"));
        }
        if self.password.is_empty() {
            return Err(ClientError::validation("Password is required"));
        }
        Ok((username.to_string(), self.password.clone()))
    }
}

// ============ Custom food ============

/// Per-100g values for a new custom food
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomFoodForm {
    pub name: String,
    pub brand: String,
    pub kcal: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub sugars_g: f64,
    pub fiber_g: f64,
    pub salt_g: f64,
    pub sodium_g: f64,
    pub saturated_fat_g: f64,
    pub monounsaturated_fat_g: f64,
    pub polyunsaturated_fat_g: f64,
}

fn finite(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

impl CustomFoodForm {
    /// Nutriments keyed the way Open Food Facts names them
    pub fn nutriments(&self) -> BTreeMap<String, f64> {
        [
            ("energy-kcal_100g", self.kcal),
            ("proteins_100g", self.protein_g),
            ("carbohydrates_100g", self.carbs_g),
            ("fat_100g", self.fat_g),
            ("sugars_100g", self.sugars_g),
            ("fiber_100g", self.fiber_g),
            ("salt_100g", self.salt_g),
            ("sodium_100g", self.sodium_g),
            ("saturated-fat_100g", self.saturated_fat_g),
            ("monounsaturated-fat_100g", self.monounsaturated_fat_g),
            ("polyunsaturated-fat_100g", self.polyunsaturated_fat_g),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), finite(v)))
        .collect()
    }

    pub fn to_request(&self) -> ClientResult<CreateCustomFoodRequest> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ClientError::validation("Name is required"));
        }
        let brand = Some(self.brand.trim())
            .filter(|b| !b.is_empty())
            .map(str::to_string);

        Ok(CreateCustomFoodRequest {
            name: name.to_string(),
            brand,
            barcode: None,
            kcal_per_100g: finite(self.kcal),
            protein_per_100g: finite(self.protein_g),
            carbs_per_100g: finite(self.carbs_g),
            fat_per_100g: finite(self.fat_g),
            fiber_per_100g: Some(finite(self.fiber_g)),
            sugar_per_100g: Some(finite(self.sugars_g)),
            salt_per_100g: Some(finite(self.salt_g)),
            serving_g: None,
            nutriments: Some(self.nutriments()),
        })
    }
}

// ============ Log entries ============

/// Clamp a typed quantity into the loggable range
pub fn clamp_quantity(grams: f64) -> u32 {
    if !grams.is_finite() {
        return MIN_QUANTITY_G;
    }
    grams
        .round()
        .clamp(MIN_QUANTITY_G as f64, MAX_QUANTITY_G as f64) as u32
}

/// Starting quantity for a food: its rounded serving size, else 100 g
pub fn default_quantity(food: &FoodRecord) -> u32 {
    match food.serving_g.filter(|g| g.is_finite() && *g > 0.0) {
        Some(grams) => clamp_quantity(grams),
        None => DEFAULT_QUANTITY_G,
    }
}

/// Build the request that logs `grams` of `food` into `meal`
pub fn log_entry_request(food: &FoodRecord, meal: MealSlot, grams: f64) -> ClientResult<CreateLogEntryRequest> {
    let (food_id, barcode) = match food.source {
        FoodSource::Catalog => {
            let barcode = food
                .barcode
                .as_deref()
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .ok_or_else(|| {
                    ClientError::validation("This OFF item is missing a barcode. Try another result.")
                })?;
            (None, Some(barcode.to_string()))
        }
        FoodSource::Custom => (Some(food.id.clone()), None),
    };

    Ok(CreateLogEntryRequest {
        meal,
        source: food.source,
        food_id,
        barcode,
        quantity_g: clamp_quantity(grams),
    })
}

// ============ Add-food page tabs ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddFoodTab {
    #[default]
    Search,
    Barcode,
    Custom,
}

impl AddFoodTab {
    pub const ALL: [AddFoodTab; 3] = [Self::Search, Self::Barcode, Self::Custom];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Search => "Search",
            Self::Barcode => "Barcode",
            Self::Custom => "Custom",
        }
    }
}

impl fmt::Display for AddFoodTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AddFoodTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "search" => Ok(Self::Search),
            "barcode" => Ok(Self::Barcode),
            "custom" => Ok(Self::Custom),
            other => Err(format!("unknown tab: {}", other)),
        }
    }
}
