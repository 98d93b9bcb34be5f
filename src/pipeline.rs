//! # Journal Pipeline
//!
//! Composes detection, estimation and meal-time classification:
//! text → food mentions → macro split → journal entry candidates.
//!
//! The pipeline performs no I/O and keeps no state between calls; identical
//! input (including `now`) always yields identical candidates.

use chrono::{Local, NaiveDateTime};
use log::{debug, info};

use crate::food_catalog::{nutrition_for_portion, CatalogFood};
use crate::food_types::{DetectedFoodMention, ExtractionConfig};
use crate::meal_time::meal_time_at;
use crate::nutrition_estimator::{estimate_macros_from_calories, estimate_nutrition_from_description};
use crate::nutrition_model::{JournalEntryCandidate, MealTime};
use crate::text_processing::FoodMentionDetector;

/// Journal-entry pipeline over a configured detector
#[derive(Debug, Clone, Default)]
pub struct JournalPipeline {
    detector: FoodMentionDetector,
}

impl JournalPipeline {
    /// Create a pipeline with the default detector
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline whose detector uses `config`
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self {
            detector: FoodMentionDetector::with_config(config),
        }
    }

    /// The underlying detector
    pub fn detector(&self) -> &FoodMentionDetector {
        &self.detector
    }

    /// Turn a chat message into journal entry candidates
    ///
    /// `now` supplies the entry date and, unless `meal_time` is given, the
    /// meal period.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use nutrition_coach::nutrition_model::MealTime;
    /// use nutrition_coach::pipeline::JournalPipeline;
    ///
    /// let now = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();
    /// let entries = JournalPipeline::new().candidates_from_message("2 ouă", now, None);
    ///
    /// assert_eq!(entries.len(), 1);
    /// assert_eq!(entries[0].calories, 140);
    /// assert_eq!(entries[0].meal_time, MealTime::Morning);
    /// ```
    pub fn candidates_from_message(
        &self,
        text: &str,
        now: NaiveDateTime,
        meal_time: Option<MealTime>,
    ) -> Vec<JournalEntryCandidate> {
        let meal_time = meal_time.unwrap_or_else(|| meal_time_at(&now));
        let candidates: Vec<JournalEntryCandidate> = self
            .detector
            .find_food_mentions(text)
            .iter()
            .map(|mention| candidate_from_mention(mention, now, meal_time))
            .collect();

        info!(
            "Built {} journal candidates for {} ({})",
            candidates.len(),
            now.date(),
            meal_time
        );
        candidates
    }
}

/// Build a candidate from one detected mention
///
/// Macros are split from the rounded calorie figure.
///
/// # Arguments
///
/// * `mention` - Mention found by the detector; its display text becomes the food name
/// * `now` - Moment the message was received; only its date is kept
/// * `meal_time` - Meal period already resolved by the caller
pub fn candidate_from_mention(
    mention: &DetectedFoodMention,
    now: NaiveDateTime,
    meal_time: MealTime,
) -> JournalEntryCandidate {
    let macros =
        estimate_macros_from_calories(&mention.canonical_name, f64::from(mention.total_calories));
    JournalEntryCandidate::new(&mention.display_text, mention.total_calories, now.date())
        .with_macros(macros)
        .with_meal_time(meal_time)
}

/// Turn a chat message into journal entry candidates with the default detector
pub fn build_journal_candidates(
    text: &str,
    now: NaiveDateTime,
    meal_time: Option<MealTime>,
) -> Vec<JournalEntryCandidate> {
    JournalPipeline::new().candidates_from_message(text, now, meal_time)
}

/// Build a single candidate from a manual food description
///
/// # Arguments
///
/// * `description` - Free text such as "300g orez"; stored trimmed as the food name
/// * `now` - Supplies the entry date and, without `meal_time`, the meal period
/// * `meal_time` - Explicit meal period overriding the clock
///
/// # Returns
///
/// Always a candidate: unknown foods fall back to the generic baseline.
pub fn candidate_from_description(
    description: &str,
    now: NaiveDateTime,
    meal_time: Option<MealTime>,
) -> JournalEntryCandidate {
    let facts = estimate_nutrition_from_description(description);
    let meal_time = meal_time.unwrap_or_else(|| meal_time_at(&now));
    debug!("Description '{}' estimated as {:?}", description, facts);

    JournalEntryCandidate::new(description.trim(), facts.calories, now.date())
        .with_macros(facts.macros())
        .with_meal_time(meal_time)
}

/// Build a candidate from a catalog food and a portion weight
///
/// Macros come from the catalog values, not from the category split.
pub fn candidate_from_catalog(
    food: &CatalogFood,
    grams: f64,
    now: NaiveDateTime,
    meal_time: Option<MealTime>,
) -> JournalEntryCandidate {
    let facts = nutrition_for_portion(food, grams);
    let meal_time = meal_time.unwrap_or_else(|| meal_time_at(&now));
    debug!("Catalog food '{}' at {}g: {:?}", food.id, grams, facts);

    let name = format!("{}g {}", grams, food.name);
    JournalEntryCandidate::new(&name, facts.calories, now.date())
        .with_macros(facts.macros())
        .with_meal_time(meal_time)
}

/// The caller's current local date and time
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}
