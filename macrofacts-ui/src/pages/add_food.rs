//! Add Food Page
//!
//! Full-page alternative to the dialog with three tabs: text search, barcode
//! lookup, and creating a custom food that is logged right away. The meal
//! comes from the route.

use leptos::*;
use leptos_router::{use_navigate, use_query_map, NavigateOptions, A};
use macrofacts::forms::log_entry_request;
use macrofacts::{AddFoodFlow, AddFoodStep, AddFoodTab, ClientError, CustomFoodForm, MealSlot};

use crate::api;
use crate::components::food_search::FoodSearch;
use crate::components::{EntryForm, SearchPanel};
use crate::state::use_global_state;

#[component]
pub fn AddFoodPage(meal: MealSlot) -> impl IntoView {
    let state = use_global_state();
    let navigate = use_navigate();
    let query = use_query_map();

    let initial_tab = query.with_untracked(|q| {
        q.get("tab").and_then(|t| t.parse::<AddFoodTab>().ok()).unwrap_or_default()
    });
    let (tab, set_tab) = create_signal(initial_tab);
    let flow = create_rw_signal(AddFoodFlow::for_meal(meal));

    let done = Callback::new(move |_: ()| {
        state.show_success(&format!("Added to {}", meal.title()));
        navigate("/today", NavigateOptions::default());
    });

    view! {
        <div class="dash addFoodPage">
            <header class="dashTop">
                <div class="dashTitle">{format!("Add to {}", meal.title())}</div>
                <A class="btn ghost" href="/today">"Back to today"</A>
            </header>

            <section class="card cardPad">
                <div class="segRow">
                    {AddFoodTab::ALL.into_iter().map(|t| view! {
                        <button
                            class=move || if tab.get() == t { "seg isActive" } else { "seg" }
                            on:click=move |_| {
                                set_tab.set(t);
                                flow.update(|f| f.back());
                            }
                        >
                            {t.label()}
                        </button>
                    }).collect_view()}
                </div>

                {move || match tab.get() {
                    AddFoodTab::Search => view! { <SearchTab flow=flow on_added=done /> }.into_view(),
                    AddFoodTab::Barcode => view! { <BarcodeTab flow=flow on_added=done /> }.into_view(),
                    AddFoodTab::Custom => view! { <CustomTab meal=meal on_added=done /> }.into_view(),
                }}
            </section>
        </div>
    }
}

#[component]
fn SearchTab(flow: RwSignal<AddFoodFlow>, on_added: Callback<()>) -> impl IntoView {
    let search = FoodSearch::new();
    let step = create_memo(move |_| flow.with(|f| f.step));

    move || match step.get() {
        AddFoodStep::Search => view! {
            <SearchPanel
                search=search.clone()
                on_select=move |food| flow.update(|f| f.select(food))
            />
        }
        .into_view(),
        AddFoodStep::Entry => view! {
            <EntryForm flow=flow on_back=move |_| flow.update(|f| f.back()) on_added=on_added />
        }
        .into_view(),
    }
}

#[component]
fn BarcodeTab(flow: RwSignal<AddFoodFlow>, on_added: Callback<()>) -> impl IntoView {
    let (code, set_code) = create_signal(String::new());
    let (looking_up, set_looking_up) = create_signal(false);
    let (error, set_error) = create_signal(None::<String>);
    let step = create_memo(move |_| flow.with(|f| f.step));

    let lookup = move || {
        let barcode = code.get().trim().to_string();
        if barcode.is_empty() {
            set_error.set(Some("Enter a barcode".to_string()));
            return;
        }
        set_error.set(None);
        set_looking_up.set(true);
        spawn_local(async move {
            match api::client().get_food_by_barcode(&barcode).await {
                Ok(food) => flow.update(|f| f.select(food)),
                Err(e) => set_error.set(Some(e.to_string())),
            }
            set_looking_up.set(false);
        });
    };

    move || match step.get() {
        AddFoodStep::Search => view! {
            <div class="dlgSection">
                <div class="dlgLabel">"Barcode"</div>
                <div class="dlgRow">
                    <input
                        class="dlgInput"
                        inputmode="numeric"
                        placeholder="e.g. 737628064502"
                        prop:value=move || code.get()
                        on:input=move |ev| set_code.set(event_target_value(&ev))
                        on:keydown=move |ev| {
                            if ev.key() == "Enter" {
                                lookup();
                            }
                        }
                    />
                    <button class="btnSmall btnSmallPrimary" disabled=move || looking_up.get() on:click=move |_| lookup()>
                        {move || if looking_up.get() { "Looking up…" } else { "Look up" }}
                    </button>
                </div>
                {move || error.get().map(|e| view! { <div class="dlgError">{e}</div> })}
            </div>
        }
        .into_view(),
        AddFoodStep::Entry => view! {
            <EntryForm flow=flow on_back=move |_| flow.update(|f| f.back()) on_added=on_added />
        }
        .into_view(),
    }
}

#[component]
fn CustomTab(meal: MealSlot, on_added: Callback<()>) -> impl IntoView {
    let form = create_rw_signal(CustomFoodForm::default());
    let grams = create_rw_signal(100.0_f64);
    let (saving, set_saving) = create_signal(false);
    let (error, set_error) = create_signal(None::<String>);

    let submit = move |_| {
        let request = match form.with(|f| f.to_request()) {
            Ok(request) => request,
            Err(e) => {
                set_error.set(Some(e.to_string()));
                return;
            }
        };
        let grams = grams.get();

        set_error.set(None);
        set_saving.set(true);
        spawn_local(async move {
            let client = api::client();
            let result: Result<(), ClientError> = async {
                let food = client.create_custom_food(&request).await?;
                let entry = log_entry_request(&food, meal, grams)?;
                client.create_log_entry(&entry).await?;
                Ok(())
            }
            .await;

            set_saving.set(false);
            match result {
                Ok(()) => on_added.call(()),
                Err(e) => set_error.set(Some(e.to_string())),
            }
        });
    };

    view! {
        <div class="dlgSection">
            <div class="dlgLabel">"Food"</div>
            <input
                class="dlgInput"
                placeholder="Food name"
                prop:value=move || form.with(|f| f.name.clone())
                on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
            />
            <input
                class="dlgInput"
                placeholder="Brand (optional)"
                prop:value=move || form.with(|f| f.brand.clone())
                on:input=move |ev| form.update(|f| f.brand = event_target_value(&ev))
            />
        </div>

        <div class="dlgSection">
            <div class="dlgLabel">"Nutrition (per 100g)"</div>

            <NumberField form=form label="Calories (kcal)" read={|f| f.kcal} write={|f, v| f.kcal = v} />

            <div class="dlgRow">
                <NumberField form=form label="Protein (g)" read={|f| f.protein_g} write={|f, v| f.protein_g = v} />
                <NumberField form=form label="Carbs (g)" read={|f| f.carbs_g} write={|f, v| f.carbs_g = v} />
                <NumberField form=form label="Fat (g)" read={|f| f.fat_g} write={|f, v| f.fat_g = v} />
            </div>

            <div class="dlgRow">
                <NumberField form=form label="Sugars (g)" read={|f| f.sugars_g} write={|f, v| f.sugars_g = v} />
                <NumberField form=form label="Fiber (g)" read={|f| f.fiber_g} write={|f, v| f.fiber_g = v} />
            </div>

            <div class="dlgRow">
                <NumberField form=form label="Salt (g)" read={|f| f.salt_g} write={|f, v| f.salt_g = v} />
                <NumberField form=form label="Sodium (g)" read={|f| f.sodium_g} write={|f, v| f.sodium_g = v} />
            </div>

            <div class="dlgRow">
                <NumberField form=form label="Saturated fat (g)" read={|f| f.saturated_fat_g} write={|f, v| f.saturated_fat_g = v} />
                <NumberField form=form label="Monounsaturated fat (g)" read={|f| f.monounsaturated_fat_g} write={|f, v| f.monounsaturated_fat_g = v} />
                <NumberField form=form label="Polyunsaturated fat (g)" read={|f| f.polyunsaturated_fat_g} write={|f, v| f.polyunsaturated_fat_g = v} />
            </div>

            <div class="dlgHint">"All values are per 100g, same format as Open Food Facts."</div>
        </div>

        <div class="dlgSection">
            <div class="dlgLabel">"Quantity to log (g)"</div>
            <input
                class="dlgInput"
                type="number"
                min=1
                max=5000
                prop:value=move || grams.get().to_string()
                on:input=move |ev| grams.set(event_target_value(&ev).parse().unwrap_or(0.0))
            />
        </div>

        {move || error.get().map(|e| view! { <div class="dlgError">{e}</div> })}

        <div class="dlgActions">
            <button class="btnSmall btnSmallPrimary" disabled=move || saving.get() on:click=submit>
                "Create and log"
            </button>
        </div>
    }
}

/// Numeric input bound to one field of the custom food form; blank reads as 0
#[component]
fn NumberField(
    form: RwSignal<CustomFoodForm>,
    label: &'static str,
    read: fn(&CustomFoodForm) -> f64,
    write: fn(&mut CustomFoodForm, f64),
) -> impl IntoView {
    // Seeded once; re-rendering on every keystroke would eat a trailing "."
    let initial = form.with_untracked(|f| read(f)).to_string();

    view! {
        <input
            class="dlgInput"
            type="number"
            placeholder=label
            aria-label=label
            value=initial
            on:input=move |ev| {
                let value = event_target_value(&ev).parse::<f64>().unwrap_or(0.0);
                form.update(|f| write(f, value));
            }
        />
    }
}
