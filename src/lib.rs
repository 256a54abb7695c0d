//! # MacroFacts
//!
//! Client library for the MacroFacts nutrition tracker: account login, the
//! daily calorie and macro dashboard, food search and barcode lookup, custom
//! foods and meal logging.
//!
//! The crate is front-end neutral. Network access goes through
//! [`HttpTransport`] and persistence through [`KeyValueStore`], so the same
//! logic drives the native CLI (reqwest, a JSON file) and the browser UI
//! (`fetch`, `localStorage`).
//!
//! ## Modules
//!
//! - [`api`]: REST client and wire types
//! - [`today`]: dashboard derivation (totals, goals, remaining calories)
//! - [`search`] / `debounce`: sequence-guarded debounced food search
//! - [`forms`] / [`add_food`]: input validation and the add-food flow
//! - [`theme`] / [`token`] / [`store`]: persisted client state
//! - [`routes`]: page routing with the auth guard
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use macrofacts::{ApiClient, DashboardView, FileStore, ReqwestTransport};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = ReqwestTransport::new(Duration::from_secs(30))?;
//!     let store = FileStore::new("/tmp/macrofacts");
//!     let api = ApiClient::new(transport, store, "http://localhost:8080");
//!
//!     api.login("KEVIN", "correct horse").await?;
//!     let settings = api.sync_timezone("Europe/Oslo").await?;
//!     let today = api.get_today().await?;
//!
//!     let view = DashboardView::build(Some(&today), Some(&settings));
//!     println!("{} kcal remaining", view.remaining);
//!     Ok(())
//! }
//! ```

pub mod add_food;
pub mod api;
pub mod error;
pub mod forms;
pub mod preview;
pub mod routes;
pub mod search;
pub mod store;
pub mod theme;
pub mod today;
pub mod token;

#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod debounce;

pub use api::{
    ApiClient, CreateCustomFoodRequest, CreateLogEntryRequest, FoodRecord, FoodSearchPage,
    FoodSource, HttpRequest, HttpResponse, HttpTransport, MealSlot, MeSettings, Method,
    RecentFood, RequestOptions, TodayResponse, TransportError, UpdateSettingsRequest,
};

pub use error::{ClientError, ClientResult};

pub use store::{KeyValueStore, MemoryStore, StoreError, THEME_KEY, TOKEN_KEY};

pub use token::TokenStore;

pub use theme::{initial_theme, Theme, ThemeController, ThemeTarget};

pub use today::{DashboardView, Goals, MealView, PulseTracker, PULSE_MS};

pub use preview::NutritionPreview;

pub use search::{SearchInput, SearchSequencer, SearchState};

pub use forms::{AddFoodTab, AuthForm, AuthMode, CustomFoodForm};

pub use add_food::{AddFoodFlow, AddFoodStep};

pub use routes::{resolve, Navigation, Route};

#[cfg(feature = "native")]
pub use api::ReqwestTransport;

#[cfg(feature = "native")]
pub use store::FileStore;

#[cfg(feature = "native")]
pub use config::{Config, ConfigError, LoggingConfig};

#[cfg(feature = "native")]
pub use debounce::{DebouncedSearch, FoodSearch, SearchOptions};
