//! Debounced Food Search
//!
//! Each keystroke cancels the pending timer by dropping it. When a timer
//! fires the request runs to completion, but its result is applied only if
//! the [`SearchSequencer`] still considers it current.

use gloo_timers::callback::Timeout;
use leptos::*;
use macrofacts::search::{DEBOUNCE_MS, MIN_QUERY_CHARS, SEARCH_PAGE_SIZE};
use macrofacts::{FoodRecord, SearchInput, SearchSequencer, SearchState};
use std::rc::Rc;

use crate::api;

/// Search state plus the machinery feeding it
#[derive(Clone)]
pub struct FoodSearch {
    pub state: RwSignal<SearchState>,
    sequencer: Rc<SearchSequencer>,
    timer: StoredValue<Option<Timeout>>,
}

impl FoodSearch {
    pub fn new() -> Self {
        let search = Self {
            state: create_rw_signal(SearchState::default()),
            sequencer: Rc::new(SearchSequencer::new()),
            timer: store_value(None),
        };

        // Teardown: drop the timer and orphan anything in flight
        let sequencer = Rc::clone(&search.sequencer);
        let timer = search.timer;
        on_cleanup(move || {
            timer.set_value(None);
            sequencer.bump();
        });

        search
    }

    pub fn input(&self, raw: String) {
        self.timer.set_value(None);

        match self.sequencer.next(&raw, MIN_QUERY_CHARS) {
            SearchInput::Clear => self.state.set(SearchState::cleared(&raw)),
            SearchInput::Query { seq, query } => {
                self.state.update(|s| {
                    s.query = raw;
                    s.error = None;
                });

                let state = self.state;
                let sequencer = Rc::clone(&self.sequencer);
                let timeout = Timeout::new(DEBOUNCE_MS as u32, move || {
                    run_search(state, sequencer, seq, query);
                });
                self.timer.set_value(Some(timeout));
            }
        }
    }
}

fn run_search(state: RwSignal<SearchState>, sequencer: Rc<SearchSequencer>, seq: u64, query: String) {
    if !sequencer.is_current(seq) {
        return;
    }
    state.update(|s| {
        s.loading = true;
        s.error = None;
    });

    spawn_local(async move {
        let result = api::client()
            .search_foods(&query, Some(SEARCH_PAGE_SIZE), None)
            .await;

        if !sequencer.is_current(seq) {
            return;
        }
        state.update(|s| {
            s.loading = false;
            match result {
                Ok(page) => s.items = page.items,
                Err(e) => s.error = Some(e.to_string()),
            }
        });
    });
}

/// Search box with result rows. The owner keeps `search` so the query
/// survives the panel being unmounted.
#[component]
pub fn SearchPanel(
    search: FoodSearch,
    #[prop(into)]
    on_select: Callback<FoodRecord>,
) -> impl IntoView {
    let state = search.state;

    view! {
        <div class="searchPanel">
            <input
                class="input"
                placeholder="Search foods… (e.g. skyr, chicken, rice)"
                autofocus=true
                prop:value=move || state.with(|s| s.query.clone())
                on:input=move |ev| search.input(event_target_value(&ev))
            />
            <div class="hint">"Search hits OpenFoodFacts first, then your custom foods."</div>

            <div class="results">
                {move || state.with(|s| s.error.clone()).map(|e| view! {
                    <div class="errorText">{e}</div>
                })}

                {move || state.with(|s| s.loading).then(|| view! {
                    <div class="muted">"Searching…"</div>
                })}

                {move || state.with(|s| s.is_empty_result(MIN_QUERY_CHARS)).then(|| view! {
                    <div class="empty">"No results. Try fewer words."</div>
                })}

                <For
                    each=move || state.with(|s| s.items.iter().cloned().enumerate().collect::<Vec<_>>())
                    key=|(index, food)| food.key(*index)
                    children=move |(_, food)| view! { <ResultRow food=food on_select=on_select /> }
                />
            </div>
        </div>
    }
}

#[component]
fn ResultRow(food: FoodRecord, on_select: Callback<FoodRecord>) -> impl IntoView {
    let num = |v: Option<f64>| v.filter(|x| x.is_finite()).unwrap_or(0.0).round();
    let kcal = format!("{} kcal / 100g", num(food.kcal_per_100g));
    let macros = format!(
        "P {} · C {} · F {}",
        num(food.protein_per_100g),
        num(food.carbs_per_100g),
        num(food.fat_per_100g)
    );
    let brand = food.brand.clone().filter(|b| !b.is_empty());
    let name = food.name.clone();

    view! {
        <button class="resultRow" on:click=move |_| on_select.call(food.clone())>
            <div class="resultMain">
                <div class="resultName">
                    {name}
                    {brand.map(|b| view! { <span class="muted">{format!(" · {}", b)}</span> })}
                </div>
                <div class="muted">{kcal}</div>
            </div>
            <div class="resultMacros muted">{macros}</div>
        </button>
    }
}
