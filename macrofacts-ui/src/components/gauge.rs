//! Calorie Gauge and Macro Bars

use leptos::*;
use macrofacts::today::{clamp01, MacroProgress};

const SIZE: f64 = 260.0;
const STROKE: f64 = 18.0;

/// Ring filled by the consumed share of the goal, remaining calories inside
#[component]
pub fn CalorieGauge(
    #[prop(into)]
    remaining: Signal<i64>,
    #[prop(into)]
    fraction: Signal<f64>,
    #[prop(into)]
    pulse: Signal<bool>,
) -> impl IntoView {
    let radius = (SIZE - STROKE) / 2.0;
    let circumference = 2.0 * std::f64::consts::PI * radius;
    let center = SIZE / 2.0;

    // Start empty so the ring animates in
    let (shown, set_shown) = create_signal(0.0);
    create_effect(move |_| {
        let target = clamp01(fraction.get());
        gloo_timers::callback::Timeout::new(60, move || set_shown.set(target)).forget();
    });

    view! {
        <div class="gaugeWrap">
            <div class="gauge" aria-label="Calories progress">
                <svg class="gaugeSvg" width=SIZE height=SIZE viewBox=format!("0 0 {} {}", SIZE, SIZE) role="img">
                    <circle
                        class="gaugeTrack"
                        cx=center
                        cy=center
                        r=radius
                        fill="none"
                        stroke-width=STROKE
                    />
                    <circle
                        class="gaugeProgress"
                        cx=center
                        cy=center
                        r=radius
                        fill="none"
                        stroke-width=STROKE
                        stroke-linecap="round"
                        stroke-dasharray=move || format!("{} {}", circumference * shown.get(), circumference)
                        transform=format!("rotate(-90 {} {})", center, center)
                    />
                </svg>

                <div class=move || if pulse.get() { "gaugeCenter isPulse" } else { "gaugeCenter" }>
                    <div class="gaugeNumber">{move || remaining.get()}</div>
                </div>
            </div>
        </div>
    }
}

/// One macro with value/goal and a clamped fill
#[component]
pub fn MacroBar(progress: MacroProgress) -> impl IntoView {
    let kind = format!("macro macro-{}", progress.label.to_lowercase());
    let width = format!("width: {:.1}%", progress.fraction * 100.0);
    let value = if progress.value.is_finite() { progress.value } else { 0.0 };

    view! {
        <div class=kind>
            <div class="macroTop">
                <div class="macroLabel">{progress.label}</div>
                <div class="macroValue">
                    {format!("{}/{}g", value.round(), progress.goal.round())}
                </div>
            </div>
            <div class="bar">
                <div class="barFill" style=width />
            </div>
        </div>
    }
}
