//! Add-Food Dialog Flow
//!
//! Two steps: pick a food from search results (or a recent-food prefill),
//! then choose meal and quantity. The state here is plain data; front ends
//! render it and forward user actions.

use crate::api::types::{CreateLogEntryRequest, FoodRecord, MealSlot};
use crate::error::ClientResult;
use crate::forms::{clamp_quantity, default_quantity, log_entry_request, DEFAULT_QUANTITY_G};
use crate::preview::NutritionPreview;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddFoodStep {
    #[default]
    Search,
    Entry,
}

impl AddFoodStep {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Search => "Add food",
            Self::Entry => "Add entry",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddFoodFlow {
    pub step: AddFoodStep,
    pub selected: Option<FoodRecord>,
    pub meal: MealSlot,
    pub grams: u32,
    pub error: Option<String>,
}

impl Default for AddFoodFlow {
    fn default() -> Self {
        Self {
            step: AddFoodStep::Search,
            selected: None,
            meal: MealSlot::Breakfast,
            grams: DEFAULT_QUANTITY_G,
            error: None,
        }
    }
}

impl AddFoodFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open preset to a meal, as the per-meal "Add food" buttons do
    pub fn for_meal(meal: MealSlot) -> Self {
        Self {
            meal,
            ..Self::default()
        }
    }

    /// Jump straight to the entry step
    pub fn with_prefill(meal: MealSlot, food: FoodRecord) -> Self {
        let mut flow = Self::for_meal(meal);
        flow.select(food);
        flow
    }

    pub fn select(&mut self, food: FoodRecord) {
        self.grams = default_quantity(&food);
        self.selected = Some(food);
        self.step = AddFoodStep::Entry;
        self.error = None;
    }

    /// Back to search; the selection is dropped
    pub fn back(&mut self) {
        self.step = AddFoodStep::Search;
        self.selected = None;
    }

    /// Closing the dialog forgets everything
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_grams(&mut self, grams: f64) {
        self.grams = clamp_quantity(grams);
    }

    /// Reset the quantity to the selected food's serving
    pub fn use_serving(&mut self) {
        if let Some(food) = &self.selected {
            self.grams = default_quantity(food);
        }
    }

    pub fn preview(&self) -> Option<NutritionPreview> {
        self.selected
            .as_ref()
            .map(|food| NutritionPreview::for_quantity(food, self.grams as f64))
    }

    /// Request for the current selection. `None` when nothing is selected;
    /// validation failures are also stored in `error`.
    pub fn submission(&mut self) -> Option<ClientResult<CreateLogEntryRequest>> {
        let food = self.selected.as_ref()?;
        self.error = None;
        let result = log_entry_request(food, self.meal, self.grams as f64);
        if let Err(e) = &result {
            self.error = Some(e.to_string());
        }
        Some(result)
    }
}
