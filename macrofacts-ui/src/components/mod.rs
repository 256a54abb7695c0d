//! UI Components
//!
//! Reusable Leptos components for the tracker.

pub mod add_food_dialog;
pub mod entry_form;
pub mod food_search;
pub mod gauge;
pub mod header;
pub mod loading;
pub mod meal_section;
pub mod toast;

pub use add_food_dialog::AddFoodDialog;
pub use entry_form::EntryForm;
pub use food_search::SearchPanel;
pub use gauge::{CalorieGauge, MacroBar};
pub use header::ThemeToggle;
pub use loading::Loading;
pub use meal_section::MealSection;
pub use toast::Toast;
