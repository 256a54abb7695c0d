//! Global Application State
//!
//! Reactive state management using Leptos signals.

use leptos::*;
use macrofacts::{Theme, ThemeController, TokenStore};

use crate::api::{self, LocalStorageStore};
use crate::theme::{system_prefers_dark, DocumentTarget};

type Controller = ThemeController<LocalStorageStore, DocumentTarget>;

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// A token is stored
    pub authenticated: RwSignal<bool>,
    /// Applied theme
    pub theme: RwSignal<Theme>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
    controller: StoredValue<Controller>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let controller = ThemeController::init(LocalStorageStore, DocumentTarget, system_prefers_dark());
    let authenticated = TokenStore::new(LocalStorageStore).is_present();

    let state = GlobalState {
        authenticated: create_rw_signal(authenticated),
        theme: create_rw_signal(controller.current()),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
        controller: store_value(controller),
    };

    provide_context(state);
}

/// Panics outside the `App` tree
pub fn use_global_state() -> GlobalState {
    use_context::<GlobalState>().expect("GlobalState not found")
}

impl GlobalState {
    pub fn toggle_theme(&self) {
        let theme = self.controller.try_update_value(|c| c.toggle());
        if let Some(theme) = theme {
            self.theme.set(theme);
        }
    }

    /// Forget the token; the router guard takes it from here
    pub fn logout(&self) {
        if let Err(e) = api::client().logout() {
            let message = format!("Failed to clear token: {}", e);
            api::console_warn(&message);
            self.show_error(&message);
        }
        self.authenticated.set(false);
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }
}
