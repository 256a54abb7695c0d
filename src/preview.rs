//! Nutrition preview for a chosen quantity

use crate::api::types::FoodRecord;

/// Nutrition for `grams` of a food, for display only
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NutritionPreview {
    /// Whole kcal
    pub kcal: i64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
    pub sugar_g: f64,
    pub salt_g: f64,
}

fn num(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

impl NutritionPreview {
    /// Scale per-100g values by `grams / 100`; unknown values count as 0
    pub fn for_quantity(food: &FoodRecord, grams: f64) -> Self {
        let factor = if grams.is_finite() { grams / 100.0 } else { 0.0 };

        Self {
            kcal: (num(food.kcal_per_100g) * factor).round() as i64,
            protein_g: num(food.protein_per_100g) * factor,
            carbs_g: num(food.carbs_per_100g) * factor,
            fat_g: num(food.fat_per_100g) * factor,
            fiber_g: num(food.fiber_per_100g) * factor,
            sugar_g: num(food.sugar_per_100g) * factor,
            salt_g: num(food.salt_per_100g) * factor,
        }
    }

    /// "P 12 · C 40 · F 3"
    pub fn macro_line(&self) -> String {
        format!(
            "P {} · C {} · F {}",
            self.protein_g.round(),
            self.carbs_g.round(),
            self.fat_g.round()
        )
    }

    /// "Fiber 2g · Sugar 5g · Salt 0g"
    pub fn detail_line(&self) -> String {
        format!(
            "Fiber {}g · Sugar {}g · Salt {}g",
            self.fiber_g.round(),
            self.sugar_g.round(),
            self.salt_g.round()
        )
    }
}
