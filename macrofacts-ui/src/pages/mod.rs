//! Pages
//!
//! Top-level page components for each route.

pub mod add_food;
pub mod auth;
pub mod today;

pub use add_food::AddFoodPage;
pub use auth::AuthPage;
pub use today::TodayPage;
