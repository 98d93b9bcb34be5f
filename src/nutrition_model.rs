//! # Nutrition Data Model
//!
//! Value types flowing through the estimation pipeline. Nothing here has an
//! identity or a lifecycle beyond one invocation: values are built from input,
//! handed to the next stage and dropped.
//!
//! ## Core Concepts
//!
//! - **MacroEstimate**: protein/carbs/fat grams derived from a calorie figure
//! - **NutritionFacts**: calories plus macros for a described portion
//! - **FoodCategory**: the heuristic bucket deciding the macro ratio
//! - **MealTime**: morning, midday or evening
//! - **JournalEntryCandidate**: a proposed, not yet persisted journal record
//!
//! ## Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use nutrition_coach::nutrition_model::{JournalEntryCandidate, MacroEstimate, MealTime};
//!
//! let date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
//! let entry = JournalEntryCandidate::new("2 bucăți Ou de găină", 140, date)
//!     .with_macros(MacroEstimate::new(21.0, 3.5, 4.7))
//!     .with_meal_time(MealTime::Morning);
//!
//! let json = serde_json::to_value(&entry).unwrap();
//! assert_eq!(json["meal_time"], "morning");
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// kcal per gram of protein
pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
/// kcal per gram of carbohydrate
pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
/// kcal per gram of fat
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Largest calorie figure accepted for a single food item
///
/// Applies to pattern occurrences as well as AI-reported items; anything above
/// it is treated as a typo or a hallucination and dropped.
pub const MAX_ITEM_CALORIES: f64 = 10_000.0;

/// Macro-nutrient breakdown in grams
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacroEstimate {
    /// Protein grams
    pub protein: f64,
    /// Carbohydrate grams
    pub carbs: f64,
    /// Fat grams
    pub fat: f64,
}

impl MacroEstimate {
    /// Create an estimate; negative or non-finite values become zero
    pub fn new(protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            protein: non_negative(protein),
            carbs: non_negative(carbs),
            fat: non_negative(fat),
        }
    }

    /// Calories reconstructed from the macros (4/4/9 kcal per gram)
    pub fn calories(&self) -> f64 {
        self.protein * KCAL_PER_GRAM_PROTEIN
            + self.carbs * KCAL_PER_GRAM_CARBS
            + self.fat * KCAL_PER_GRAM_FAT
    }
}

/// Calories and macros for a portion of food
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutritionFacts {
    /// Total calories
    pub calories: u32,
    /// Protein grams
    pub protein: f64,
    /// Carbohydrate grams
    pub carbs: f64,
    /// Fat grams
    pub fat: f64,
}

impl NutritionFacts {
    /// Create nutrition facts from a calorie total and a macro breakdown
    pub fn new(calories: u32, macros: MacroEstimate) -> Self {
        Self {
            calories,
            protein: macros.protein,
            carbs: macros.carbs,
            fat: macros.fat,
        }
    }

    /// The macro part of these facts
    pub fn macros(&self) -> MacroEstimate {
        MacroEstimate::new(self.protein, self.carbs, self.fat)
    }
}

/// Heuristic food category deciding how calories split into macros
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    /// Poultry, fish, eggs
    ProteinHeavy,
    /// Bread, rice, pasta
    CarbHeavy,
    /// Cheese, milk, yogurt
    Dairy,
    /// Produce and everything else
    General,
}

impl FoodCategory {
    /// Classification priority, first match wins
    pub const PRIORITY: [FoodCategory; 4] = [
        FoodCategory::ProteinHeavy,
        FoodCategory::CarbHeavy,
        FoodCategory::Dairy,
        FoodCategory::General,
    ];

    /// Share of calories attributed to (protein, carbs, fat); sums to 1.0
    pub fn calorie_fractions(self) -> (f64, f64, f64) {
        match self {
            FoodCategory::ProteinHeavy => (0.60, 0.10, 0.30),
            FoodCategory::CarbHeavy => (0.15, 0.70, 0.15),
            FoodCategory::Dairy => (0.35, 0.35, 0.30),
            FoodCategory::General => (0.10, 0.80, 0.10),
        }
    }
}

/// Meal period of a journal entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealTime {
    /// 06:00 to 11:59
    #[serde(alias = "dimineata", alias = "dimineața", alias = "breakfast")]
    Morning,
    /// 12:00 to 17:59
    #[serde(alias = "amiaza", alias = "amiază", alias = "prânz", alias = "pranz", alias = "lunch")]
    Midday,
    /// 18:00 to 05:59
    #[serde(alias = "seara", alias = "seară", alias = "dinner")]
    Evening,
}

impl MealTime {
    /// All meal times in day order
    pub const ALL: [MealTime; 3] = [MealTime::Morning, MealTime::Midday, MealTime::Evening];

    /// Serialized label
    pub fn as_str(self) -> &'static str {
        match self {
            MealTime::Morning => "morning",
            MealTime::Midday => "midday",
            MealTime::Evening => "evening",
        }
    }

    /// Parse an English or Romanian meal label
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "morning" | "breakfast" | "dimineata" | "dimineața" | "dimineață" => {
                Some(MealTime::Morning)
            }
            "midday" | "lunch" | "amiaza" | "amiază" | "prânz" | "pranz" => Some(MealTime::Midday),
            "evening" | "dinner" | "seara" | "seară" | "cina" | "cină" => Some(MealTime::Evening),
            _ => None,
        }
    }
}

impl fmt::Display for MealTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Proposed journal record awaiting confirmation or persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntryCandidate {
    /// Display name of the food, usually with its quantity
    pub food_name: String,
    /// Total calories
    pub calories: u32,
    /// Protein grams
    pub protein: f64,
    /// Carbohydrate grams
    pub carbs: f64,
    /// Fat grams
    pub fat: f64,
    /// Meal period
    pub meal_time: MealTime,
    /// Calendar date the entry belongs to
    pub date: NaiveDate,
}

impl JournalEntryCandidate {
    /// Create a candidate with zero macros; the meal time defaults to evening
    pub fn new(food_name: &str, calories: u32, date: NaiveDate) -> Self {
        Self {
            food_name: food_name.to_string(),
            calories,
            protein: 0.0,
            carbs: 0.0,
            fat: 0.0,
            meal_time: MealTime::Evening,
            date,
        }
    }

    /// Set the macro breakdown
    pub fn with_macros(mut self, macros: MacroEstimate) -> Self {
        self.protein = macros.protein;
        self.carbs = macros.carbs;
        self.fat = macros.fat;
        self
    }

    /// Set the meal period
    pub fn with_meal_time(mut self, meal_time: MealTime) -> Self {
        self.meal_time = meal_time;
        self
    }

    /// The macro part of this entry
    pub fn macros(&self) -> MacroEstimate {
        MacroEstimate::new(self.protein, self.carbs, self.fat)
    }
}

impl fmt::Display for JournalEntryCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}): {} kcal, {}g protein, {}g carbs, {}g fat",
            self.food_name, self.date, self.meal_time, self.calories, self.protein, self.carbs, self.fat
        )
    }
}

/// Round half-up to the nearest whole calorie
///
/// Negative and non-finite input yields 0; values beyond `u32::MAX` saturate.
/// Callers that must not saturate check against [`MAX_ITEM_CALORIES`] first.
pub fn round_calories(calories: f64) -> u32 {
    if !calories.is_finite() || calories <= 0.0 {
        return 0;
    }
    (calories + 0.5).floor().min(f64::from(u32::MAX)) as u32
}

/// Round to one decimal place, half away from zero
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
    }

    #[test]
    fn test_macro_estimate_clamps_invalid_values() {
        let macros = MacroEstimate::new(-3.0, f64::NAN, 2.0);
        assert_eq!(macros.protein, 0.0);
        assert_eq!(macros.carbs, 0.0);
        assert_eq!(macros.fat, 2.0);
    }

    #[test]
    fn test_macro_calories() {
        let macros = MacroEstimate::new(10.0, 20.0, 5.0);
        assert_eq!(macros.calories(), 165.0);
    }

    #[test]
    fn test_category_fractions_sum_to_one() {
        for category in FoodCategory::PRIORITY {
            let (p, c, f) = category.calorie_fractions();
            assert!((p + c + f - 1.0).abs() < 1e-9, "{:?}", category);
        }
    }

    #[test]
    fn test_meal_time_serialization() {
        assert_eq!(serde_json::to_string(&MealTime::Morning).unwrap(), "\"morning\"");
        assert_eq!(serde_json::to_string(&MealTime::Midday).unwrap(), "\"midday\"");
        assert_eq!(serde_json::to_string(&MealTime::Evening).unwrap(), "\"evening\"");
    }

    #[test]
    fn test_meal_time_accepts_romanian_labels() {
        let parsed: MealTime = serde_json::from_str("\"dimineata\"").unwrap();
        assert_eq!(parsed, MealTime::Morning);
        let parsed: MealTime = serde_json::from_str("\"amiaza\"").unwrap();
        assert_eq!(parsed, MealTime::Midday);
        let parsed: MealTime = serde_json::from_str("\"seara\"").unwrap();
        assert_eq!(parsed, MealTime::Evening);
    }

    #[test]
    fn test_meal_time_from_label() {
        assert_eq!(MealTime::from_label(" Dimineață "), Some(MealTime::Morning));
        assert_eq!(MealTime::from_label("LUNCH"), Some(MealTime::Midday));
        assert_eq!(MealTime::from_label("seară"), Some(MealTime::Evening));
        assert_eq!(MealTime::from_label("brunch"), None);
    }

    #[test]
    fn test_candidate_json_shape() {
        let entry = JournalEntryCandidate::new("100g Piept de pui", 165, date())
            .with_macros(MacroEstimate::new(24.8, 4.1, 5.5))
            .with_meal_time(MealTime::Midday);

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["food_name"], "100g Piept de pui");
        assert_eq!(json["calories"], 165);
        assert_eq!(json["protein"], 24.8);
        assert_eq!(json["carbs"], 4.1);
        assert_eq!(json["fat"], 5.5);
        assert_eq!(json["meal_time"], "midday");
        assert_eq!(json["date"], "2025-08-01");

        let back: JournalEntryCandidate = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_round_calories() {
        assert_eq!(round_calories(0.0), 0);
        assert_eq!(round_calories(-5.0), 0);
        assert_eq!(round_calories(f64::NAN), 0);
        assert_eq!(round_calories(2.5), 3);
        assert_eq!(round_calories(2.49), 2);
        assert_eq!(round_calories(164.99999), 165);
        assert_eq!(round_calories(1e12), u32::MAX);
    }

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(8.100000000000001), 8.1);
        assert_eq!(round_to_tenth(0.8999999999999999), 0.9);
        assert_eq!(round_to_tenth(24.75), 24.8);
        assert_eq!(round_to_tenth(5.5), 5.5);
    }
}
