//! Add-Food Dialog
//!
//! Modal over the dashboard: search, then the entry step. The dialog is
//! mounted fresh on every open, so closing it forgets all of its state.

use leptos::*;
use macrofacts::{AddFoodFlow, AddFoodStep};

use crate::components::food_search::FoodSearch;
use crate::components::{EntryForm, SearchPanel};

#[component]
pub fn AddFoodDialog(
    initial: AddFoodFlow,
    #[prop(into)]
    on_close: Callback<()>,
    #[prop(into)]
    on_added: Callback<()>,
) -> impl IntoView {
    let flow = create_rw_signal(initial);
    let step = create_memo(move |_| flow.with(|f| f.step));
    let search = FoodSearch::new();

    view! {
        <div class="dlgOverlay" on:click=move |_| on_close.call(())/>
        <div class="dlgContent card" role="dialog" aria-modal="true">
            <div class="dlgHead">
                <div class="dlgTitle">{move || step.get().title()}</div>
                <button class="iconBtn" aria-label="Close" on:click=move |_| on_close.call(())>"✕"</button>
            </div>

            {move || match step.get() {
                AddFoodStep::Search => view! {
                    <SearchPanel
                        search=search.clone()
                        on_select=move |food| flow.update(|f| f.select(food))
                    />
                    <div class="dlgFoot">
                        <button class="btn ghost" on:click=move |_| on_close.call(())>"Cancel"</button>
                    </div>
                }.into_view(),
                AddFoodStep::Entry => view! {
                    <EntryForm
                        flow=flow
                        on_back=move |_| flow.update(|f| f.back())
                        on_added=on_added
                    />
                }.into_view(),
            }}
        </div>
    }
}
