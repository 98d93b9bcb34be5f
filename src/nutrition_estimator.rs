//! # Nutrition Estimator
//!
//! Rule-based nutrition estimation used whenever no AI estimate is available.
//!
//! ## Features
//!
//! - Split a known calorie total into protein/carbs/fat by food category
//! - Estimate calories and macros from a free-text description such as
//!   "300g orez" or "2 felii de pâine"
//! - Both estimators are total: unknown foods fall back to generic values
//!
//! ## Usage
//!
//! ```rust
//! use nutrition_coach::nutrition_estimator::{
//!     estimate_macros_from_calories, estimate_nutrition_from_description,
//! };
//!
//! let macros = estimate_macros_from_calories("piept de pui", 165.0);
//! assert_eq!(macros.protein, 24.8);
//!
//! let facts = estimate_nutrition_from_description("300g orez");
//! assert_eq!(facts.calories, 390);
//! ```

use log::{debug, trace};
use regex::Regex;
use std::sync::LazyLock;

use crate::nutrition_model::{
    round_calories, round_to_tenth, FoodCategory, MacroEstimate, NutritionFacts,
    KCAL_PER_GRAM_CARBS, KCAL_PER_GRAM_FAT, KCAL_PER_GRAM_PROTEIN,
};

/// Keywords deciding the food category, checked in `FoodCategory::PRIORITY` order
static CATEGORY_KEYWORDS: LazyLock<Vec<(FoodCategory, Vec<&'static str>)>> = LazyLock::new(|| {
    vec![
        (
            FoodCategory::ProteinHeavy,
            vec![
                // Poultry
                "pui", "piept", "găină", "gaina", "curcan", "chicken", "poultry", "turkey",
                // Fish
                "pește", "peste", "somon", "crap", "fish", "salmon", "tuna",
                // Eggs
                "ou", "egg",
                // Meat
                "carne", "vită", "vita", "porc", "meat", "beef", "pork",
            ],
        ),
        (
            FoodCategory::CarbHeavy,
            vec![
                "pâine", "paine", "franzel", "chifl", "orez", "paste", "spaghete", "bread",
                "rice", "pasta", "spaghetti", "toast",
            ],
        ),
        (
            FoodCategory::Dairy,
            vec![
                "brânz", "branz", "cașcaval", "cascaval", "telemea", "lapte", "iaurt", "cheese",
                "milk", "yogurt", "yoghurt",
            ],
        ),
    ]
});

/// Baseline nutrition for one reference portion (100 g, 100 ml, one piece)
#[derive(Debug, Clone, Copy, PartialEq)]
struct Baseline {
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
}

const GENERIC_BASELINE: Baseline = Baseline {
    calories: 100.0,
    protein: 5.0,
    carbs: 15.0,
    fat: 3.0,
};

/// Common foods and their baseline values, first keyword match wins
static FOOD_BASELINES: LazyLock<Vec<(Vec<&'static str>, Baseline)>> = LazyLock::new(|| {
    let food = |calories, protein, carbs, fat| Baseline {
        calories,
        protein,
        carbs,
        fat,
    };
    vec![
        (vec!["ou", "egg"], food(70.0, 6.0, 1.0, 5.0)),
        (vec!["pui", "piept", "chicken"], food(165.0, 31.0, 0.0, 3.6)),
        (vec!["pâine", "paine", "felie", "felii", "bread"], food(250.0, 9.0, 49.0, 3.2)),
        (vec!["lapte", "milk"], food(64.0, 3.2, 4.8, 3.6)),
        (vec!["brânz", "branz", "caș", "cascaval", "cheese"], food(280.0, 25.0, 2.0, 20.0)),
        (vec!["măr", "mere", "apple"], food(52.0, 0.3, 14.0, 0.2)),
        (vec!["banan"], food(89.0, 1.1, 23.0, 0.3)),
        (vec!["orez", "rice"], food(130.0, 2.7, 28.0, 0.3)),
        (vec!["paste", "spaghete", "pasta", "spaghetti"], food(131.0, 5.0, 25.0, 1.1)),
    ]
});

/// Generic quantity pattern for descriptions
static QUANTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d+(?:[.,]\d+)?)\s*(kg|grame|gr|g|ml|litri|litru|l|felii|felie|bucăți|bucăţi|bucati|bucată|bucata|buc)\b",
    )
    .expect("Description quantity pattern should be valid")
});

/// Unit found in a description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionUnit {
    Grams,
    Kilograms,
    Milliliters,
    Liters,
    Slices,
    Pieces,
}

impl DescriptionUnit {
    fn parse(unit: &str) -> Option<Self> {
        match unit {
            "kg" => Some(Self::Kilograms),
            "g" | "gr" | "grame" => Some(Self::Grams),
            "ml" => Some(Self::Milliliters),
            "l" | "litri" | "litru" => Some(Self::Liters),
            "felii" | "felie" => Some(Self::Slices),
            "bucăți" | "bucăţi" | "bucati" | "bucată" | "bucata" | "buc" => Some(Self::Pieces),
            _ => None,
        }
    }
}

/// Quantity parsed from a description
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescriptionQuantity {
    pub amount: f64,
    pub unit: DescriptionUnit,
}

impl DescriptionQuantity {
    /// Scale relative to the baseline portion.
    ///
    /// 100 g and 100 ml are one portion, a slice counts as 80 g.
    pub fn multiplier(&self) -> f64 {
        match self.unit {
            DescriptionUnit::Kilograms | DescriptionUnit::Liters => self.amount * 10.0,
            DescriptionUnit::Grams | DescriptionUnit::Milliliters => self.amount / 100.0,
            DescriptionUnit::Slices => self.amount * 0.8,
            DescriptionUnit::Pieces => self.amount,
        }
    }
}

/// Classify a food name into the category deciding its macro split
///
/// Keywords match at the start of a word, so "ou" matches "ouă" but not "două".
pub fn classify_food_category(food_name: &str) -> FoodCategory {
    let name = food_name.to_lowercase();
    let category = CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| has_word_starting_with(&name, k)))
        .map(|(category, _)| *category)
        .unwrap_or(FoodCategory::General);
    trace!("Classified '{}' as {:?}", food_name, category);
    category
}

/// Split a calorie total into protein, carbs and fat grams
///
/// Grams are `calories * fraction / kcal_per_gram`, rounded to one decimal.
/// Negative or non-finite calories count as zero.
///
/// # Arguments
///
/// * `food_name` - Name used to pick the [`FoodCategory`] and its calorie fractions
/// * `calories` - Calorie total to split
///
/// # Returns
///
/// A [`MacroEstimate`] whose macro calories stay within rounding of `calories`
///
/// # Examples
///
/// ```rust
/// use nutrition_coach::nutrition_estimator::estimate_macros_from_calories;
///
/// let macros = estimate_macros_from_calories("piept de pui", 165.0);
/// assert_eq!((macros.protein, macros.carbs, macros.fat), (24.8, 4.1, 5.5));
/// ```
pub fn estimate_macros_from_calories(food_name: &str, calories: f64) -> MacroEstimate {
    let calories = if calories.is_finite() && calories > 0.0 {
        calories
    } else {
        0.0
    };
    let category = classify_food_category(food_name);
    let (protein_share, carbs_share, fat_share) = category.calorie_fractions();

    let macros = MacroEstimate::new(
        round_to_tenth(calories * protein_share / KCAL_PER_GRAM_PROTEIN),
        round_to_tenth(calories * carbs_share / KCAL_PER_GRAM_CARBS),
        round_to_tenth(calories * fat_share / KCAL_PER_GRAM_FAT),
    );
    debug!(
        "Estimated macros for '{}' ({} kcal, {:?}): {:?}",
        food_name, calories, category, macros
    );
    macros
}

/// Find the first quantity with a known unit in a description
pub fn parse_description_quantity(description: &str) -> Option<DescriptionQuantity> {
    let desc = description.to_lowercase();
    let captures = QUANTITY_PATTERN.captures(&desc)?;
    let amount: f64 = captures.get(1)?.as_str().replace(',', ".").parse().ok()?;
    let unit = DescriptionUnit::parse(captures.get(2)?.as_str())?;
    Some(DescriptionQuantity { amount, unit })
}

/// Estimate calories and macros for a free-text food description
///
/// Never fails: without a quantity the multiplier is 1, without a known food
/// the generic baseline `{100 kcal, 5g protein, 15g carbs, 3g fat}` is used.
pub fn estimate_nutrition_from_description(description: &str) -> NutritionFacts {
    let desc = description.to_lowercase();

    let multiplier = parse_description_quantity(&desc)
        .map(|q| q.multiplier())
        .unwrap_or(1.0);

    let baseline = FOOD_BASELINES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| has_word_starting_with(&desc, k)))
        .map(|(_, baseline)| *baseline)
        .unwrap_or(GENERIC_BASELINE);

    let facts = NutritionFacts::new(
        round_calories(baseline.calories * multiplier),
        MacroEstimate::new(
            round_to_tenth(baseline.protein * multiplier),
            round_to_tenth(baseline.carbs * multiplier),
            round_to_tenth(baseline.fat * multiplier),
        ),
    );
    debug!(
        "Estimated '{}' with multiplier {}: {:?}",
        description, multiplier, facts
    );
    facts
}

fn has_word_starting_with(text: &str, keyword: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|word| word.starts_with(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_priority() {
        assert_eq!(classify_food_category("Piept de pui"), FoodCategory::ProteinHeavy);
        assert_eq!(classify_food_category("Ou de găină"), FoodCategory::ProteinHeavy);
        assert_eq!(classify_food_category("Orez fiert"), FoodCategory::CarbHeavy);
        assert_eq!(classify_food_category("Lapte 3.5%"), FoodCategory::Dairy);
        assert_eq!(classify_food_category("Măr"), FoodCategory::General);
        // Protein keywords win over carb keywords
        assert_eq!(classify_food_category("Paste cu pui"), FoodCategory::ProteinHeavy);
    }

    #[test]
    fn test_keywords_match_word_starts_only() {
        assert_eq!(classify_food_category("două felii"), FoodCategory::General);
        assert_eq!(classify_food_category("ouă fierte"), FoodCategory::ProteinHeavy);
    }

    #[test]
    fn test_chicken_breast_macros() {
        let macros = estimate_macros_from_calories("piept de pui", 165.0);
        assert_eq!(macros.protein, 24.8);
        assert_eq!(macros.carbs, 4.1);
        assert_eq!(macros.fat, 5.5);
    }

    #[test]
    fn test_negative_calories_yield_zero_macros() {
        let macros = estimate_macros_from_calories("orez", -50.0);
        assert_eq!(macros, MacroEstimate::default());
    }

    #[test]
    fn test_parse_description_quantity() {
        let q = parse_description_quantity("300g orez").unwrap();
        assert_eq!(q.unit, DescriptionUnit::Grams);
        assert_eq!(q.amount, 300.0);
        assert!((q.multiplier() - 3.0).abs() < 1e-9);

        let q = parse_description_quantity("1,5 kg cartofi").unwrap();
        assert_eq!(q.unit, DescriptionUnit::Kilograms);
        assert!((q.multiplier() - 15.0).abs() < 1e-9);

        let q = parse_description_quantity("2 felii de pâine").unwrap();
        assert_eq!(q.unit, DescriptionUnit::Slices);
        assert!((q.multiplier() - 1.6).abs() < 1e-9);

        let q = parse_description_quantity("250 ml lapte").unwrap();
        assert_eq!(q.unit, DescriptionUnit::Milliliters);

        let q = parse_description_quantity("1 l suc").unwrap();
        assert_eq!(q.unit, DescriptionUnit::Liters);

        assert!(parse_description_quantity("o banană").is_none());
        assert!(parse_description_quantity("3 gogoși").is_none());
    }

    #[test]
    fn test_rice_description() {
        let facts = estimate_nutrition_from_description("300g orez");
        assert_eq!(facts.calories, 390);
        assert_eq!(facts.protein, 8.1);
        assert_eq!(facts.carbs, 84.0);
        assert_eq!(facts.fat, 0.9);
    }

    #[test]
    fn test_generic_baseline() {
        for input in ["", "ceva gustos", "!!!"] {
            let facts = estimate_nutrition_from_description(input);
            assert_eq!(facts.calories, 100);
            assert_eq!(facts.protein, 5.0);
            assert_eq!(facts.carbs, 15.0);
            assert_eq!(facts.fat, 3.0);
        }
    }

    #[test]
    fn test_pieces_multiply_baseline() {
        let facts = estimate_nutrition_from_description("2 bucăți banană");
        assert_eq!(facts.calories, 178);
        assert_eq!(facts.carbs, 46.0);
    }
}
