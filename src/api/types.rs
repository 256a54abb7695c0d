//! Wire Types
//!
//! Request and response bodies exchanged with the MacroFacts API. Field names
//! follow the server exactly, which mixes camelCase and snake_case keys.
//! Every response is decoded into one canonical shape here so consumers never
//! guess at alternate field names.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============ Shared enums ============

/// Where a food record comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodSource {
    /// Open Food Facts catalog, looked up by barcode or text search
    #[serde(rename = "off")]
    Catalog,
    /// Authored by the user
    #[serde(rename = "custom")]
    Custom,
}

impl FoodSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Catalog => "off",
            Self::Custom => "custom",
        }
    }
}

/// The four fixed daily meal categories, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    #[default]
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snacks];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snacks => "snacks",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::Snacks => "Snacks",
        }
    }

    /// Lenient parse for query strings: unknown or missing means breakfast
    pub fn from_query(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(Self::Breakfast),
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            "snacks" => Ok(Self::Snacks),
            other => Err(format!("unknown meal: {}", other)),
        }
    }
}

// ============ Auth ============

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeResponse {
    pub id: String,
    pub username: String,
}

// ============ Settings ============

/// User timezone and daily goals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeSettings {
    pub timezone: String,
    pub calorie_goal: i64,
    pub protein_goal_g: i64,
    pub carbs_goal_g: i64,
    pub fat_goal_g: i64,
}

/// Partial settings update; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calorie_goal: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein_goal_g: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs_goal_g: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat_goal_g: Option<i64>,
}

impl UpdateSettingsRequest {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ============ Foods ============

/// A food with nutrition expressed per 100 grams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRecord {
    /// Catalog items may come back without an id
    #[serde(default)]
    pub id: String,
    pub source: FoodSource,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,

    /// Free-text serving description from the catalog
    #[serde(default)]
    pub serving_size: Option<String>,
    /// Free-text package quantity from the catalog
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default, rename = "servingG")]
    pub serving_g: Option<f64>,

    #[serde(default, rename = "kcalPer100g")]
    pub kcal_per_100g: Option<f64>,
    #[serde(default, rename = "proteinPer100g")]
    pub protein_per_100g: Option<f64>,
    #[serde(default, rename = "carbsPer100g")]
    pub carbs_per_100g: Option<f64>,
    #[serde(default, rename = "fatPer100g")]
    pub fat_per_100g: Option<f64>,
    #[serde(default, rename = "fiberPer100g")]
    pub fiber_per_100g: Option<f64>,
    #[serde(default, rename = "sugarPer100g")]
    pub sugar_per_100g: Option<f64>,
    #[serde(default, rename = "saltPer100g")]
    pub salt_per_100g: Option<f64>,

    #[serde(default)]
    pub verified: bool,
}

impl FoodRecord {
    /// Minimal record; nutrition unknown
    pub fn new(id: impl Into<String>, source: FoodSource, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source,
            name: name.into(),
            brand: None,
            barcode: None,
            serving_size: None,
            quantity: None,
            serving_g: None,
            kcal_per_100g: None,
            protein_per_100g: None,
            carbs_per_100g: None,
            fat_per_100g: None,
            fiber_per_100g: None,
            sugar_per_100g: None,
            salt_per_100g: None,
            verified: false,
        }
    }

    /// Key for lists mixing catalog and custom items.
    ///
    /// Catalog items usually carry no id, so they key on the barcode.
    /// `index` is the position in the list, used when neither is set.
    pub fn key(&self, index: usize) -> String {
        let barcode = self.barcode.as_deref().filter(|b| !b.is_empty());
        let id = Some(self.id.as_str()).filter(|id| !id.is_empty());
        let ident = match self.source {
            FoodSource::Catalog => barcode.or(id),
            FoodSource::Custom => id.or(barcode),
        };
        match ident {
            Some(ident) => format!("{}:{}", self.source.as_str(), ident),
            None => format!("{}:#{}", self.source.as_str(), index),
        }
    }

    /// Name with brand suffix, e.g. "Skyr · Arla"
    pub fn display_name(&self) -> String {
        match self.brand.as_deref().filter(|b| !b.is_empty()) {
            Some(brand) => format!("{} · {}", self.name, brand),
            None => self.name.clone(),
        }
    }
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodSearchPage {
    #[serde(default)]
    pub items: Vec<FoodRecord>,
    #[serde(default, rename = "nextCursor", alias = "next_cursor")]
    pub next_cursor: Option<String>,
}

/// Some endpoints wrap a food in `{ "item": ... }`, some return it bare
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum FoodEnvelope {
    Bare(FoodRecord),
    Wrapped { item: Option<FoodRecord> },
}

impl FoodEnvelope {
    pub(crate) fn into_item(self) -> Option<FoodRecord> {
        match self {
            Self::Bare(food) => Some(food),
            Self::Wrapped { item } => item,
        }
    }
}

/// New user-authored food, per-100g values
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomFoodRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,

    #[serde(rename = "kcalPer100g")]
    pub kcal_per_100g: f64,
    #[serde(rename = "proteinPer100g")]
    pub protein_per_100g: f64,
    #[serde(rename = "carbsPer100g")]
    pub carbs_per_100g: f64,
    #[serde(rename = "fatPer100g")]
    pub fat_per_100g: f64,

    #[serde(rename = "fiberPer100g", skip_serializing_if = "Option::is_none")]
    pub fiber_per_100g: Option<f64>,
    #[serde(rename = "sugarPer100g", skip_serializing_if = "Option::is_none")]
    pub sugar_per_100g: Option<f64>,
    #[serde(rename = "saltPer100g", skip_serializing_if = "Option::is_none")]
    pub salt_per_100g: Option<f64>,
    #[serde(rename = "servingG", skip_serializing_if = "Option::is_none")]
    pub serving_g: Option<f64>,

    /// Open Food Facts style nutriment keys, e.g. `energy-kcal_100g`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutriments: Option<BTreeMap<String, f64>>,
}

// ============ Logs ============

/// Calories and macros, either per entry, per meal or per 100 g
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl MacroTotals {
    pub fn add(&mut self, other: &MacroTotals) {
        self.calories += other.calories;
        self.protein_g += other.protein_g;
        self.carbs_g += other.carbs_g;
        self.fat_g += other.fat_g;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroGrams {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// Server-side goal/consumed summary for the day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TodaySummary {
    pub calorie_goal: f64,
    pub calories_consumed: f64,
    pub macros_goal: MacroGrams,
    pub macros_consumed: MacroGrams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryFood {
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    pub source: FoodSource,
    #[serde(default)]
    pub food_id: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
}

/// One logged food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodayEntry {
    pub id: String,
    #[serde(default)]
    pub time: String,
    pub food: EntryFood,
    #[serde(default)]
    pub quantity_g: f64,
    /// Nutrition snapshot computed by the server when the entry was logged
    #[serde(default)]
    pub computed: Option<MacroTotals>,
}

/// Meal as sent by the server; `meal` is matched case-insensitively
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodayMeal {
    pub meal: String,
    #[serde(default)]
    pub totals: MacroTotals,
    #[serde(default)]
    pub entries: Vec<TodayEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Serving {
    #[serde(default)]
    pub label: Option<String>,
    pub grams: f64,
}

/// Recently logged food offered for quick re-add
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFood {
    pub source: FoodSource,
    #[serde(default)]
    pub food_id: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default, rename = "per100g")]
    pub per_100g: MacroTotals,
    #[serde(default)]
    pub serving: Option<Serving>,
}

impl RecentFood {
    /// Food record usable to prefill the add-food dialog
    pub fn to_food_record(&self) -> FoodRecord {
        let id = self
            .food_id
            .clone()
            .or_else(|| self.barcode.clone())
            .unwrap_or_default();

        let mut food = FoodRecord::new(id, self.source, self.name.clone());
        food.brand = self.brand.clone();
        food.barcode = self.barcode.clone();
        food.serving_g = self.serving.as_ref().map(|s| s.grams);
        food.kcal_per_100g = Some(self.per_100g.calories);
        food.protein_per_100g = Some(self.per_100g.protein_g);
        food.carbs_per_100g = Some(self.per_100g.carbs_g);
        food.fat_per_100g = Some(self.per_100g.fat_g);
        food
    }
}

/// Everything the daily dashboard needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayResponse {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub summary: TodaySummary,
    #[serde(default)]
    pub meals: Vec<TodayMeal>,
    #[serde(default)]
    pub recent_foods: Vec<RecentFood>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateLogEntryRequest {
    pub meal: MealSlot,
    pub source: FoodSource,
    #[serde(rename = "foodId", skip_serializing_if = "Option::is_none")]
    pub food_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    pub quantity_g: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateLogEntryResponse {
    pub id: String,
}

// ============ Errors ============

/// `{ "error": { ... } }` body sent with every non-2xx response
#[derive(Debug, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}
