//! Loading Component

use leptos::*;

/// Card shown while the dashboard loads
#[component]
pub fn Loading(
    #[prop(default = "Loading…")]
    label: &'static str,
) -> impl IntoView {
    view! {
        <div class="card">
            <div class="muted">{label}</div>
        </div>
    }
}
