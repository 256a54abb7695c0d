//! Today Dashboard
//!
//! Pure functions that turn a [`TodayResponse`] plus optional settings into
//! what the dashboard renders: four canonical meals, summed totals, goals,
//! remaining calories and progress fractions.

use chrono::{Local, NaiveDate};
use std::collections::HashMap;

use crate::api::types::{MacroTotals, MealSlot, MeSettings, TodayEntry, TodayMeal, TodayResponse};

/// How long the remaining-calories pulse stays on
pub const PULSE_MS: u64 = 520;

/// Daily targets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Goals {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            calories: 2000.0,
            protein_g: 150.0,
            carbs_g: 200.0,
            fat_g: 70.0,
        }
    }
}

impl Goals {
    /// Goals from settings, or the defaults before settings are loaded
    pub fn from_settings(settings: Option<&MeSettings>) -> Self {
        match settings {
            Some(s) => Self {
                calories: s.calorie_goal as f64,
                protein_g: s.protein_goal_g as f64,
                carbs_g: s.carbs_goal_g as f64,
                fat_g: s.fat_goal_g as f64,
            },
            None => Self::default(),
        }
    }
}

/// A meal slot ready to render
#[derive(Debug, Clone, PartialEq)]
pub struct MealView {
    pub slot: MealSlot,
    pub totals: MacroTotals,
    pub entries: Vec<TodayEntry>,
}

/// Breakfast, lunch, dinner and snacks in that order.
/// Server meals are matched by lower-cased name; missing slots are empty.
pub fn normalize_meals(meals: &[TodayMeal]) -> Vec<MealView> {
    let by_name: HashMap<String, &TodayMeal> = meals
        .iter()
        .map(|m| (m.meal.trim().to_lowercase(), m))
        .collect();

    MealSlot::ALL
        .iter()
        .map(|&slot| match by_name.get(slot.as_str()) {
            Some(meal) => MealView {
                slot,
                totals: meal.totals,
                entries: meal.entries.clone(),
            },
            None => MealView {
                slot,
                totals: MacroTotals::default(),
                entries: Vec::new(),
            },
        })
        .collect()
}

/// Sum of every entry's nutrition snapshot; entries without one count as zero
pub fn compute_totals(today: Option<&TodayResponse>) -> MacroTotals {
    let mut totals = MacroTotals::default();
    let Some(today) = today else {
        return totals;
    };

    for entry in today.meals.iter().flat_map(|m| m.entries.iter()) {
        if let Some(computed) = &entry.computed {
            totals.add(computed);
        }
    }
    totals
}

/// Whole calories eaten, never negative
pub fn consumed_calories(totals: &MacroTotals) -> i64 {
    if !totals.calories.is_finite() {
        return 0;
    }
    (totals.calories.round() as i64).max(0)
}

/// Calories left for the day, clamped at zero once the goal is exceeded
pub fn remaining_calories(goal: f64, consumed: i64) -> i64 {
    if !goal.is_finite() {
        return 0;
    }
    ((goal - consumed as f64).round() as i64).max(0)
}

/// Clamp to `[0, 1]`; NaN and infinities become 0
pub fn clamp01(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Share of the calorie goal consumed. Zero when there is no positive goal.
pub fn consumption_fraction(consumed: i64, goal: f64) -> f64 {
    if goal > 0.0 {
        clamp01(consumed as f64 / goal)
    } else {
        0.0
    }
}

/// Macro bar fill; a non-positive goal is treated as 1 g
pub fn macro_fraction(value: f64, goal: f64) -> f64 {
    let value = if value.is_finite() { value } else { 0.0 };
    let goal = if goal > 0.0 { goal } else { 1.0 };
    clamp01(value / goal)
}

/// Decides when the remaining-calories number should pulse
#[derive(Debug, Default, Clone)]
pub struct PulseTracker {
    previous: Option<i64>,
}

impl PulseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new value. True when it differs from the last one seen;
    /// the very first value never pulses.
    pub fn observe(&mut self, value: i64) -> bool {
        let previous = self.previous.replace(value);
        matches!(previous, Some(prev) if prev != value)
    }

    pub fn reset(&mut self) {
        self.previous = None;
    }
}

/// One macro bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroProgress {
    pub label: &'static str,
    pub value: f64,
    pub goal: f64,
    pub fraction: f64,
}

impl MacroProgress {
    fn new(label: &'static str, value: f64, goal: f64) -> Self {
        Self {
            label,
            value,
            goal,
            fraction: macro_fraction(value, goal),
        }
    }
}

/// Everything the dashboard shows, derived in one place
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub date: String,
    pub goals: Goals,
    pub totals: MacroTotals,
    pub consumed: i64,
    pub remaining: i64,
    pub fraction: f64,
    pub macros: [MacroProgress; 3],
    pub meals: Vec<MealView>,
}

impl DashboardView {
    pub fn date_label(&self) -> String {
        date_label(&self.date)
    }

    pub fn build(today: Option<&TodayResponse>, settings: Option<&MeSettings>) -> Self {
        let goals = Goals::from_settings(settings);
        let totals = compute_totals(today);
        let consumed = consumed_calories(&totals);
        let meals = today.map(|t| t.meals.as_slice()).unwrap_or_default();

        Self {
            date: today.map(|t| t.date.clone()).unwrap_or_default(),
            goals,
            totals,
            consumed,
            remaining: remaining_calories(goals.calories, consumed),
            fraction: consumption_fraction(consumed, goals.calories),
            macros: [
                MacroProgress::new("Protein", totals.protein_g, goals.protein_g),
                MacroProgress::new("Carbs", totals.carbs_g, goals.carbs_g),
                MacroProgress::new("Fat", totals.fat_g, goals.fat_g),
            ],
            meals: normalize_meals(meals),
        }
    }
}

/// Header label for a `YYYY-MM-DD` day, e.g. "Fri 16 Oct 2026".
/// An empty date means today on this device; unparseable input is shown as is.
pub fn date_label(date: &str) -> String {
    let date = date.trim();
    if date.is_empty() {
        return Local::now().date_naive().format("%a %d %b %Y").to_string();
    }
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(day) => day.format("%a %d %b %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{EntryFood, FoodSource};

    fn entry(id: &str, calories: Option<f64>) -> TodayEntry {
        TodayEntry {
            id: id.to_string(),
            time: String::new(),
            food: EntryFood {
                name: "Food".to_string(),
                brand: None,
                source: FoodSource::Custom,
                food_id: Some("f".to_string()),
                barcode: None,
            },
            quantity_g: 100.0,
            computed: calories.map(|c| MacroTotals {
                calories: c,
                protein_g: 10.0,
                carbs_g: 20.0,
                fat_g: 5.0,
            }),
        }
    }

    fn meal(name: &str, entries: Vec<TodayEntry>) -> TodayMeal {
        TodayMeal {
            meal: name.to_string(),
            totals: MacroTotals::default(),
            entries,
        }
    }

    #[test]
    fn test_normalize_orders_and_fills_slots() {
        let meals = normalize_meals(&[meal("Dinner", vec![entry("e1", Some(300.0))]), meal("brunch", vec![])]);

        let slots: Vec<_> = meals.iter().map(|m| m.slot).collect();
        assert_eq!(slots, MealSlot::ALL.to_vec());
        assert_eq!(meals[2].entries.len(), 1);
        assert!(meals[0].entries.is_empty());
        assert_eq!(meals[3].totals, MacroTotals::default());
    }

    #[test]
    fn test_totals_skip_missing_snapshots() {
        let today = TodayResponse {
            meals: vec![
                meal("breakfast", vec![entry("a", Some(250.4)), entry("b", None)]),
                meal("lunch", vec![entry("c", Some(400.0))]),
            ],
            ..Default::default()
        };

        let totals = compute_totals(Some(&today));
        assert!((totals.calories - 650.4).abs() < 1e-9);
        assert_eq!(totals.protein_g, 20.0);
        assert_eq!(compute_totals(None), MacroTotals::default());
    }

    #[test]
    fn test_remaining_clamps_at_zero() {
        assert_eq!(remaining_calories(2000.0, 450), 1550);
        assert_eq!(remaining_calories(2000.0, 2600), 0);
        assert_eq!(remaining_calories(0.0, 10), 0);
    }

    #[test]
    fn test_fractions_stay_in_unit_interval() {
        assert_eq!(consumption_fraction(1000, 2000.0), 0.5);
        assert_eq!(consumption_fraction(3000, 2000.0), 1.0);
        assert_eq!(consumption_fraction(100, 0.0), 0.0);
        assert_eq!(consumption_fraction(100, -5.0), 0.0);

        assert_eq!(macro_fraction(50.0, 0.0), 1.0);
        assert_eq!(macro_fraction(f64::NAN, 100.0), 0.0);
        assert_eq!(macro_fraction(-3.0, 100.0), 0.0);
        assert_eq!(clamp01(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_pulse_tracker() {
        let mut pulse = PulseTracker::new();
        assert!(!pulse.observe(1550));
        assert!(!pulse.observe(1550));
        assert!(pulse.observe(1300));
        assert!(!pulse.observe(1300));

        pulse.reset();
        assert!(!pulse.observe(900));
    }

    #[test]
    fn test_dashboard_defaults_without_settings() {
        let today = TodayResponse {
            date: "2026-10-16".to_string(),
            meals: vec![meal("breakfast", vec![entry("a", Some(450.0))])],
            ..Default::default()
        };

        let view = DashboardView::build(Some(&today), None);
        assert_eq!(view.goals, Goals::default());
        assert_eq!(view.consumed, 450);
        assert_eq!(view.remaining, 1550);
        assert!((view.fraction - 0.225).abs() < 1e-9);
        assert_eq!(view.macros[0].label, "Protein");
        assert!((view.macros[0].fraction - 10.0 / 150.0).abs() < 1e-9);
        assert_eq!(view.meals.len(), 4);
    }

    #[test]
    fn test_date_label() {
        assert_eq!(date_label("2026-10-16"), "Fri 16 Oct 2026");
        assert_eq!(date_label("someday"), "someday");
        assert!(!date_label("").is_empty());
    }

    #[test]
    fn test_dashboard_uses_settings_goals() {
        let settings = MeSettings {
            timezone: "UTC".to_string(),
            calorie_goal: 1800,
            protein_goal_g: 120,
            carbs_goal_g: 180,
            fat_goal_g: 60,
        };
        let view = DashboardView::build(None, Some(&settings));

        assert_eq!(view.goals.calories, 1800.0);
        assert_eq!(view.remaining, 1800);
        assert_eq!(view.fraction, 0.0);
        assert_eq!(view.meals.len(), 4);
        assert!(view.meals.iter().all(|m| m.entries.is_empty()));
        let slots: Vec<_> = view.meals.iter().map(|m| m.slot).collect();
        assert_eq!(slots, MealSlot::ALL.to_vec());
    }

    #[test]
    fn test_normalize_reorders_all_four_slots() {
        let [breakfast, lunch, dinner, snacks] = MealSlot::ALL;
        let server = vec![
            meal(snacks.as_str(), vec![entry("s", Some(120.0))]),
            meal(&dinner.as_str().to_uppercase(), vec![entry("d1", Some(600.0)), entry("d2", None)]),
            meal(breakfast.as_str(), vec![entry("b", Some(350.0))]),
            meal(lunch.as_str(), vec![]),
        ];

        let meals = normalize_meals(&server);
        let slots: Vec<_> = meals.iter().map(|m| m.slot).collect();
        assert_eq!(slots, MealSlot::ALL.to_vec());

        let ids: Vec<Vec<&str>> = meals
            .iter()
            .map(|m| m.entries.iter().map(|e| e.id.as_str()).collect())
            .collect();
        assert_eq!(ids, vec![vec!["b"], vec![], vec!["d1", "d2"], vec!["s"]]);
    }
}
