//! App Root Component
//!
//! Routing with the auth guard and global providers.

use leptos::*;
use leptos_router::*;
use macrofacts::routes::{resolve, Navigation, Route as Page};

use crate::components::Toast;
use crate::pages::{AddFoodPage, AuthPage, TodayPage};
use crate::state::{provide_global_state, use_global_state};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();

    view! {
        <Router>
            <div class="shell">
                <main>
                    <Routes>
                        <Route path="/" view=Guarded />
                        <Route path="/auth" view=Guarded />
                        <Route path="/today" view=Guarded />
                        <Route path="/add-food" view=Guarded />
                        <Route path="/*any" view=Guarded />
                    </Routes>
                </main>

                <Toast />
            </div>
        </Router>
    }
}

/// Resolves the current location against the session and renders or redirects
#[component]
fn Guarded() -> impl IntoView {
    let state = use_global_state();
    let location = use_location();

    move || {
        let mut path = location.pathname.get();
        if let Some(meal) = location.query.with(|q| q.get("meal").cloned()) {
            path = format!("{}?meal={}", path, meal);
        }

        match resolve(&path, state.authenticated.get()) {
            Navigation::Render(Page::Auth) => view! { <AuthPage /> }.into_view(),
            Navigation::Render(Page::Today) => view! { <TodayPage /> }.into_view(),
            Navigation::Render(Page::AddFood(meal)) => view! { <AddFoodPage meal=meal /> }.into_view(),
            Navigation::Render(Page::Root) => view! { <Redirect path="/" /> }.into_view(),
            Navigation::Redirect(target) => view! { <Redirect path=target.path() /> }.into_view(),
        }
    }
}
