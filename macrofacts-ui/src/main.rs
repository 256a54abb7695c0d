//! MacroFacts Web
//!
//! Daily calorie and macro tracker built with Leptos (WASM).
//!
//! # Features
//!
//! - Username/password login and registration
//! - Today dashboard: calorie gauge, macro bars, meals, recent foods
//! - Debounced food search, barcode lookup and custom foods
//! - Light/dark theme persisted in `localStorage`
//!
//! # Architecture
//!
//! Client-side rendered (CSR) Leptos application. All API calls, dashboard
//! math and form validation come from the `macrofacts` crate; this crate
//! supplies the browser transport, storage and views.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;
mod theme;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
