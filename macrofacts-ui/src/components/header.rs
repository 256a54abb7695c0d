//! Header Controls

use leptos::*;

use crate::state::use_global_state;

/// Light/dark toggle showing the current theme's glyph
#[component]
pub fn ThemeToggle(
    #[prop(default = "iconBtn")]
    class: &'static str,
) -> impl IntoView {
    let state = use_global_state();

    view! {
        <button
            class=class
            title="Toggle theme"
            aria-label="Toggle theme"
            on:click=move |_| state.toggle_theme()
        >
            {move || state.theme.get().icon()}
        </button>
    }
}
