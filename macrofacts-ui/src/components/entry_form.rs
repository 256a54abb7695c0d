//! Entry Step
//!
//! Meal, quantity and nutrition preview for the selected food, then submit.

use leptos::*;
use macrofacts::{AddFoodFlow, MealSlot};

use crate::api;

#[component]
pub fn EntryForm(
    flow: RwSignal<AddFoodFlow>,
    #[prop(into)]
    on_back: Callback<()>,
    #[prop(into)]
    on_added: Callback<()>,
) -> impl IntoView {
    let (submitting, set_submitting) = create_signal(false);

    let confirm = move |_| {
        let Some(result) = flow.try_update(|f| f.submission()).flatten() else {
            return;
        };
        // Validation failures are already on the flow
        let Ok(request) = result else {
            return;
        };

        set_submitting.set(true);
        spawn_local(async move {
            match api::client().create_log_entry(&request).await {
                Ok(_) => {
                    set_submitting.set(false);
                    on_added.call(());
                }
                Err(e) => {
                    flow.update(|f| f.error = Some(e.to_string()));
                    set_submitting.set(false);
                }
            }
        });
    };

    // Memoized so quantity edits don't rebuild the inputs
    let selected = create_memo(move |_| flow.with(|f| f.selected.clone()));
    let preview = move || flow.with(|f| f.preview()).unwrap_or_default();

    view! {
        <div class="entryBox">
            {move || flow.with(|f| f.error.clone()).map(|e| view! {
                <div class="errorText">{e}</div>
            })}

            {move || selected.get().map(|food| {
                let serving = food.serving_g.filter(|g| *g > 0.0);
                view! {
                    <div class="entryTitle">{food.display_name()}</div>

                    <div class="entryGrid">
                        <label class="label">
                            "Meal"
                            <select
                                class="select"
                                prop:value=move || flow.with(|f| f.meal.as_str().to_string())
                                on:change=move |ev| {
                                    if let Ok(meal) = event_target_value(&ev).parse::<MealSlot>() {
                                        flow.update(|f| f.meal = meal);
                                    }
                                }
                            >
                                {MealSlot::ALL.into_iter().map(|slot| view! {
                                    <option value=slot.as_str()>{slot.title()}</option>
                                }).collect_view()}
                            </select>
                        </label>

                        <label class="label">
                            "Quantity (grams)"
                            <input
                                class="input"
                                type="number"
                                min=1
                                max=5000
                                prop:value=move || flow.with(|f| f.grams.to_string())
                                on:input=move |ev| {
                                    let grams = event_target_value(&ev).parse::<f64>().unwrap_or(0.0);
                                    flow.update(|f| f.set_grams(grams));
                                }
                            />
                            {match serving {
                                Some(grams) => view! {
                                    <div class="hint">
                                        {format!("Serving: {}g ", grams.round())}
                                        <button class="linkBtn" type="button" on:click=move |_| flow.update(|f| f.use_serving())>
                                            "use serving"
                                        </button>
                                    </div>
                                }.into_view(),
                                None => view! {
                                    <div class="hint">"Tip: 100g is the standard nutrition reference."</div>
                                }.into_view(),
                            }}
                        </label>
                    </div>
                }
            })}

            <div class="preview">
                <div class="previewBig">{move || format!("{} kcal", preview().kcal)}</div>
                <div class="muted">{move || preview().macro_line()}</div>
                <div class="muted">{move || preview().detail_line()}</div>
            </div>

            <div class="dlgFoot">
                <button class="btn ghost" on:click=move |_| on_back.call(())>"Back"</button>
                <button
                    class="btn"
                    on:click=confirm
                    disabled=move || submitting.get() || selected.with(Option::is_none)
                >
                    {move || if submitting.get() { "Adding…" } else { "Add to today" }}
                </button>
            </div>
        </div>
    }
}
