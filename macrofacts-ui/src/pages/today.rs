//! Today Page
//!
//! Calorie gauge, macro bars, the four meals and recent foods. Loading first
//! corrects the server timezone to the browser's, then fetches the day.

use gloo_timers::callback::Timeout;
use leptos::*;
use leptos_router::A;
use macrofacts::routes::Route as Page;
use macrofacts::{
    AddFoodFlow, ClientError, DashboardView, MealSlot, MeSettings, PulseTracker, TodayResponse,
    PULSE_MS,
};

use crate::api;
use crate::components::{AddFoodDialog, CalorieGauge, Loading, MacroBar, MealSection, ThemeToggle};
use crate::state::use_global_state;

/// IANA zone reported by `Intl.DateTimeFormat`
fn browser_timezone() -> Option<String> {
    let options = js_sys::Intl::DateTimeFormat::new(&js_sys::Array::new(), &js_sys::Object::new())
        .resolved_options();
    js_sys::Reflect::get(&options, &"timeZone".into())
        .ok()?
        .as_string()
        .filter(|tz| !tz.is_empty())
}

async fn load() -> Result<(MeSettings, TodayResponse), ClientError> {
    let client = api::client();
    let settings = match browser_timezone() {
        Some(tz) => client.sync_timezone(&tz).await?,
        None => client.get_me_settings().await?,
    };
    let today = client.get_today().await?;
    Ok((settings, today))
}

#[component]
pub fn TodayPage() -> impl IntoView {
    let state = use_global_state();

    let settings = create_rw_signal(None::<MeSettings>);
    let today = create_rw_signal(None::<TodayResponse>);
    let (loading, set_loading) = create_signal(true);
    let (error, set_error) = create_signal(None::<String>);
    let dialog = create_rw_signal(None::<AddFoodFlow>);

    let refresh = move || {
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match load().await {
                Ok((s, t)) => {
                    settings.set(Some(s));
                    today.set(Some(t));
                }
                Err(e) => set_error.set(Some(e.to_string())),
            }
            set_loading.set(false);
        });
    };
    refresh();

    let dashboard = create_memo(move |_| {
        today.with(|t| settings.with(|s| DashboardView::build(t.as_ref(), s.as_ref())))
    });

    // Pulse the remaining number when it changes after the first load
    let pulse = create_rw_signal(false);
    let tracker = store_value(PulseTracker::new());
    let pulse_timer = store_value(None::<Timeout>);
    create_effect(move |_| {
        if loading.get() {
            return;
        }
        let remaining = dashboard.with(|d| d.remaining);
        if tracker.try_update_value(|t| t.observe(remaining)).unwrap_or(false) {
            pulse.set(true);
            // Replacing the handle cancels a superseded timer
            pulse_timer.set_value(Some(Timeout::new(PULSE_MS as u32, move || pulse.set(false))));
        }
    });
    on_cleanup(move || pulse_timer.set_value(None));

    let open_for_meal = move |meal: MealSlot| dialog.set(Some(AddFoodFlow::for_meal(meal)));
    let on_added = move |_: ()| {
        dialog.set(None);
        state.show_success("Added to today");
        refresh();
    };

    view! {
        <div class="dash">
            <header class="dashTop">
                <div class="dashTopLeft">
                    <div class="logoMark" />
                    <div>
                        <div class="dashTitle">"Today"</div>
                        <div class="dashSub">{move || dashboard.with(|d| d.date_label())}</div>
                    </div>
                </div>

                <div class="dashTopRight">
                    <ThemeToggle />
                    <button class="btn" on:click=move |_| state.logout()>"Logout"</button>
                </div>
            </header>

            {move || error.get().map(|e| view! {
                <div class="card">
                    <div class="muted">{e}</div>
                    <button class="btn" on:click=move |_| refresh()>"Retry"</button>
                </div>
            })}

            {move || (error.with(Option::is_none) && loading.get()).then(|| view! { <Loading /> })}

            {move || (error.with(Option::is_none) && !loading.get()).then(|| view! {
                <section class="card hero">
                    <div class="heroCenter">
                        <CalorieGauge
                            remaining=Signal::derive(move || dashboard.with(|d| d.remaining))
                            fraction=Signal::derive(move || dashboard.with(|d| d.fraction))
                            pulse=pulse
                        />

                        <div class="heroUnder">
                            <div class="heroLabel">"Calories remaining"</div>
                            <div class="heroChips">
                                <div class="chip">
                                    <span class="chipLabel">"Consumed"</span>
                                    <span class="chipValue">{move || dashboard.with(|d| d.consumed)}</span>
                                </div>
                                <div class="chip">
                                    <span class="chipLabel">"Goal"</span>
                                    <span class="chipValue">{move || dashboard.with(|d| d.goals.calories.round())}</span>
                                </div>
                            </div>
                        </div>
                    </div>

                    <div class="macroGrid">
                        {move || dashboard.with(|d| d.macros)
                            .into_iter()
                            .map(|progress| view! { <MacroBar progress=progress /> })
                            .collect_view()}
                    </div>

                    <div class="quickActions">
                        <button class="btnPrimary" on:click=move |_| dialog.set(Some(AddFoodFlow::new()))>
                            "Add food"
                        </button>
                        <A class="btn" href=format!("{}&tab=barcode", Page::AddFood(MealSlot::Breakfast).path())>
                            "Scan barcode"
                        </A>
                        <A class="btn" href=format!("{}&tab=custom", Page::AddFood(MealSlot::Breakfast).path())>
                            "Create custom food"
                        </A>
                    </div>
                </section>

                <section class="card">
                    <div class="sectionTitle">"Meals"</div>
                    <div class="mealGrid">
                        {move || dashboard.with(|d| d.meals.clone())
                            .into_iter()
                            .map(|meal| view! { <MealSection meal=meal on_add=open_for_meal /> })
                            .collect_view()}
                    </div>
                </section>

                <RecentFoods today=today dialog=dialog />
            })}

            {move || dialog.get().map(|flow| view! {
                <AddFoodDialog
                    initial=flow
                    on_close=move |_| dialog.set(None)
                    on_added=on_added
                />
            })}
        </div>
    }
}

/// One-click prefill from recently logged foods
#[component]
fn RecentFoods(
    today: RwSignal<Option<TodayResponse>>,
    dialog: RwSignal<Option<AddFoodFlow>>,
) -> impl IntoView {
    let recent = move || today.with(|t| t.as_ref().map(|t| t.recent_foods.clone()).unwrap_or_default());

    move || {
        let foods = recent();
        (!foods.is_empty()).then(|| view! {
            <section class="card">
                <div class="sectionTitle">"Recent"</div>
                <div class="results">
                    {foods.into_iter().map(|recent| {
                        let food = recent.to_food_record();
                        let label = food.display_name();
                        let kcal = format!("{} kcal / 100g", recent.per_100g.calories.round());
                        view! {
                            <button
                                class="resultRow"
                                on:click=move |_| dialog.set(Some(AddFoodFlow::with_prefill(MealSlot::Breakfast, food.clone())))
                            >
                                <div class="resultMain">
                                    <div class="resultName">{label}</div>
                                    <div class="muted">{kcal}</div>
                                </div>
                            </button>
                        }
                    }).collect_view()}
                </div>
            </section>
        })
    }
}
