//! Meal Section Component

use leptos::*;
use macrofacts::today::MealView;
use macrofacts::MealSlot;

/// One meal slot with its entries and an "Add food" button
#[component]
pub fn MealSection(
    meal: MealView,
    #[prop(into)]
    on_add: Callback<MealSlot>,
) -> impl IntoView {
    let slot = meal.slot;

    view! {
        <div class="meal">
            <div class="mealHead">
                <div class="mealTitle">{slot.title()}</div>
                <div class="mutedSmall">{format!("{} kcal", meal.totals.calories.round())}</div>

                <button class="mealAddBtn" on:click=move |_| on_add.call(slot)>
                    <span class="plus">"+"</span>
                    "Add food"
                </button>
            </div>

            {if meal.entries.is_empty() {
                view! { <div class="muted">"Nothing logged yet."</div> }.into_view()
            } else {
                view! {
                    <div class="mealList">
                        {meal.entries.into_iter().map(|entry| {
                            let computed = entry.computed.unwrap_or_default();
                            view! {
                                <div class="mealRow">
                                    <div class="mealRowLeft">
                                        <div class="mealFood">{entry.food.name}</div>
                                        <div class="mutedSmall">{format!("{}g", entry.quantity_g.round())}</div>
                                    </div>
                                    <div class="mealRowRight">
                                        <div class="mealKcal">{format!("{} kcal", computed.calories.round())}</div>
                                        <div class="mutedSmall">
                                            {format!(
                                                "P {} · C {} · F {}",
                                                computed.protein_g.round(),
                                                computed.carbs_g.round(),
                                                computed.fat_g.round()
                                            )}
                                        </div>
                                    </div>
                                </div>
                            }
                        }).collect_view()}
                    </div>
                }.into_view()
            }}
        </div>
    }
}
