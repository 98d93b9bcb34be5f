//! # Text Processing Module
//!
//! This module provides food-mention detection over free-text chat messages.
//!
//! ## Features
//!
//! - Table-driven detection of foods with quantities ("2 ouă", "100g piept de pui")
//! - Calorie computation per unit, per gram or per milliliter
//! - Configurable treatment of overlapping matches from different rules
//! - Line-by-line analysis helpers
//!
//! Detection never fails: unmatched text yields no mentions. Occurrences are
//! dropped when the quantity is zero or does not fit a `u32`, when the digits
//! are the tail of a decimal number ("1.5 ouă"), or when the total would exceed
//! [`MAX_ITEM_CALORIES`].

use log::{debug, info, trace, warn};

use crate::food_patterns::{plural_unit_label, FOOD_PATTERNS};
use crate::food_types::{
    DetectedFoodMention, ExtractionConfig, FoodPattern, OverlapPolicy, UnitKind,
};
use crate::nutrition_model::{round_calories, MAX_ITEM_CALORIES};

/// Food-mention detector over the static food pattern table
#[derive(Debug, Clone, Default)]
pub struct FoodMentionDetector {
    /// Configuration options
    config: ExtractionConfig,
}

impl FoodMentionDetector {
    /// Create a detector with the default configuration
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nutrition_coach::text_processing::FoodMentionDetector;
    ///
    /// let detector = FoodMentionDetector::new();
    /// assert!(detector.pattern_count() > 0);
    /// ```
    pub fn new() -> Self {
        Self::with_config(ExtractionConfig::default())
    }

    /// Create a detector with custom configuration
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nutrition_coach::food_types::{ExtractionConfig, OverlapPolicy};
    /// use nutrition_coach::text_processing::FoodMentionDetector;
    ///
    /// let config = ExtractionConfig {
    ///     overlap_policy: OverlapPolicy::SumAll,
    ///     ..Default::default()
    /// };
    /// let detector = FoodMentionDetector::with_config(config);
    /// ```
    pub fn with_config(config: ExtractionConfig) -> Self {
        info!(
            "Creating FoodMentionDetector: overlap_policy={:?}, max_text_length={}",
            config.overlap_policy, config.max_text_length
        );
        Self { config }
    }

    /// The configuration this detector runs with
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Number of rules in the food table
    pub fn pattern_count(&self) -> usize {
        FOOD_PATTERNS.len()
    }

    /// Find all food mentions in the given text
    ///
    /// Mentions are ordered by rule order, then by position within the text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nutrition_coach::text_processing::FoodMentionDetector;
    ///
    /// let detector = FoodMentionDetector::new();
    /// let mentions = detector.find_food_mentions("am mâncat 2 ouă și 100g piept de pui");
    ///
    /// assert_eq!(mentions.len(), 2);
    /// assert_eq!(mentions[0].total_calories, 140);
    /// assert_eq!(mentions[1].total_calories, 165);
    /// ```
    pub fn find_food_mentions(&self, text: &str) -> Vec<DetectedFoodMention> {
        let normalized = self.normalize(text);
        let mut mentions = Vec::new();
        let mut claimed: Vec<(usize, usize)> = Vec::new();

        debug!(
            "Finding food mentions in text of {} characters",
            normalized.chars().count()
        );

        for pattern in FOOD_PATTERNS.iter() {
            for captures in pattern.matcher.captures_iter(&normalized) {
                let Some(whole) = captures.get(0) else {
                    continue;
                };
                let span = (whole.start(), whole.end());

                if self.config.overlap_policy == OverlapPolicy::FirstMatchWins
                    && claimed.iter().any(|&c| spans_overlap(c, span))
                {
                    trace!(
                        "Skipping '{}' for {}: span already claimed",
                        whole.as_str(),
                        pattern.canonical_name
                    );
                    continue;
                }

                if continues_number(&normalized, whole.start()) {
                    debug!(
                        "Dropping '{}' for {}: quantity is part of a decimal number",
                        whole.as_str(),
                        pattern.canonical_name
                    );
                    continue;
                }

                let Some(quantity) = captures
                    .get(1)
                    .and_then(|m| m.as_str().parse::<u32>().ok())
                    .filter(|&q| q > 0)
                else {
                    debug!(
                        "Dropping '{}' for {}: quantity is not a positive integer",
                        whole.as_str(),
                        pattern.canonical_name
                    );
                    continue;
                };

                let calories = pattern.calories_for(quantity);
                if calories > MAX_ITEM_CALORIES {
                    debug!(
                        "Dropping '{}' for {}: {} kcal is above the per-item ceiling",
                        whole.as_str(),
                        pattern.canonical_name,
                        calories
                    );
                    continue;
                }

                let mention = build_mention(pattern, quantity, round_calories(calories), span);
                debug!(
                    "Found '{}' -> {} ({} kcal)",
                    whole.as_str(),
                    mention.display_text,
                    mention.total_calories
                );

                claimed.push(span);
                mentions.push(mention);
            }
        }

        info!("Found {} food mentions in text", mentions.len());
        mentions
    }

    /// Check if a given text contains any food mention
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nutrition_coach::text_processing::FoodMentionDetector;
    ///
    /// let detector = FoodMentionDetector::new();
    /// assert!(detector.has_food_mentions("2 banane"));
    /// assert!(!detector.has_food_mentions("am mâncat banane"));
    /// ```
    pub fn has_food_mentions(&self, text: &str) -> bool {
        let result = !self.find_food_mentions(text).is_empty();
        debug!("Checking for food mentions in text: '{}' -> {}", text, result);
        result
    }

    /// Extract lines containing food mentions from the text
    ///
    /// Returns `(line_number, line_content)` for every line with at least one mention.
    pub fn extract_mention_lines(&self, text: &str) -> Vec<(usize, String)> {
        text.lines()
            .enumerate()
            .filter(|(_, line)| self.has_food_mentions(line))
            .map(|(i, line)| (i, line.to_string()))
            .collect()
    }

    /// Lowercase the input and cap it at the configured length
    fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        match lowered.char_indices().nth(self.config.max_text_length) {
            Some((cut, _)) => {
                warn!(
                    "Input truncated to {} characters before food detection",
                    self.config.max_text_length
                );
                lowered[..cut].to_string()
            }
            None => lowered,
        }
    }
}

/// Extract food mentions with the default detector configuration
pub fn extract_food_mentions(text: &str) -> Vec<DetectedFoodMention> {
    FoodMentionDetector::new().find_food_mentions(text)
}

fn spans_overlap(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

/// True when the match at `start` continues a number written before it,
/// such as the "5" of "1.5" or "2,5"
fn continues_number(text: &str, start: usize) -> bool {
    let mut before = text[..start].chars().rev();
    match before.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('.') | Some(',') => before.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

fn build_mention(
    pattern: &FoodPattern,
    quantity: u32,
    total_calories: u32,
    span: (usize, usize),
) -> DetectedFoodMention {
    DetectedFoodMention {
        canonical_name: pattern.canonical_name.to_string(),
        raw_quantity: quantity,
        unit_kind: pattern.unit_kind,
        display_text: display_text(pattern, quantity),
        total_calories,
        start_pos: span.0,
        end_pos: span.1,
    }
}

fn display_text(pattern: &FoodPattern, quantity: u32) -> String {
    match pattern.unit_kind {
        UnitKind::PerUnit => {
            let label = if quantity > 1 {
                plural_unit_label(pattern.unit_label)
            } else {
                pattern.unit_label
            };
            format!("{} {} {}", quantity, label, pattern.canonical_name)
        }
        UnitKind::PerGram | UnitKind::PerMilliliter => {
            format!("{}{} {}", quantity, pattern.unit_label, pattern.canonical_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_detector() -> FoodMentionDetector {
        FoodMentionDetector::new()
    }

    #[test]
    fn test_round_trip_message() {
        let detector = create_detector();
        let mentions = detector.find_food_mentions("am mâncat 2 ouă și 100g piept de pui");

        assert_eq!(mentions.len(), 2);

        assert_eq!(mentions[0].canonical_name, "Ou de găină");
        assert_eq!(mentions[0].raw_quantity, 2);
        assert_eq!(mentions[0].unit_kind, UnitKind::PerUnit);
        assert_eq!(mentions[0].total_calories, 140);
        assert_eq!(mentions[0].display_text, "2 bucăți Ou de găină");

        assert_eq!(mentions[1].canonical_name, "Piept de pui");
        assert_eq!(mentions[1].raw_quantity, 100);
        assert_eq!(mentions[1].unit_kind, UnitKind::PerGram);
        assert_eq!(mentions[1].total_calories, 165);
        assert_eq!(mentions[1].display_text, "100g Piept de pui");
    }

    #[test]
    fn test_no_mentions() {
        let detector = create_detector();

        assert!(detector.find_food_mentions("").is_empty());
        assert!(detector.find_food_mentions("salut, ce mai faci?").is_empty());
        assert!(detector.find_food_mentions("am mâncat pui").is_empty());
    }

    #[test]
    fn test_zero_quantity_is_dropped() {
        let detector = create_detector();

        assert!(detector.find_food_mentions("0 ouă").is_empty());

        let mentions = detector.find_food_mentions("0 ouă și 3 ouă");
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].raw_quantity, 3);
    }

    #[test]
    fn test_overflowing_quantity_is_dropped() {
        let detector = create_detector();
        assert!(detector
            .find_food_mentions("99999999999999999999 ouă")
            .is_empty());
    }

    #[test]
    fn test_quantity_above_calorie_ceiling_is_dropped() {
        let detector = create_detector();

        assert!(detector
            .find_food_mentions("4000000000 prăjituri și 4000000000 mere")
            .is_empty());
        assert!(detector.find_food_mentions("41 prăjituri").is_empty());

        let mentions = detector.find_food_mentions("40 prăjituri");
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].total_calories, 10_000);
    }

    #[test]
    fn test_decimal_quantities_are_not_split() {
        let detector = create_detector();

        assert!(detector.find_food_mentions("1.5 ouă").is_empty());
        assert!(detector.find_food_mentions("2,5 mere").is_empty());
        assert!(detector.find_food_mentions("am mâncat 0.5 banane").is_empty());

        let mentions = detector.find_food_mentions("2 ouă");
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].raw_quantity, 2);

        let mentions = detector.find_food_mentions("ouă, 3 mere. 2 banane");
        assert_eq!(mentions.len(), 2);
    }

    #[test]
    fn test_continues_number() {
        assert!(continues_number("1.5 ouă", 2));
        assert!(continues_number("2,5 mere", 2));
        assert!(!continues_number("2 ouă", 0));
        assert!(!continues_number("mere, 3 ouă", 6));
        assert!(!continues_number("gata. 3 ouă", 6));
    }

    #[test]
    fn test_case_insensitive_matching() {
        let detector = create_detector();
        let mentions = detector.find_food_mentions("2 OUĂ");

        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].total_calories, 140);
    }

    #[test]
    fn test_singular_unit_label() {
        let detector = create_detector();
        let mentions = detector.find_food_mentions("1 banană");

        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].display_text, "1 bucată Banană");
        assert_eq!(mentions[0].total_calories, 90);
    }

    #[test]
    fn test_milliliter_foods() {
        let detector = create_detector();
        let mentions = detector.find_food_mentions("250ml lapte");

        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].unit_kind, UnitKind::PerMilliliter);
        assert_eq!(mentions[0].total_calories, 160);
        assert_eq!(mentions[0].display_text, "250ml Lapte 3.5%");
    }

    #[test]
    fn test_first_match_wins_over_generic_rule() {
        let detector = create_detector();
        let mentions = detector.find_food_mentions("200g carne de vită");

        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].canonical_name, "Carne de vită");
        assert_eq!(mentions[0].total_calories, 500);
    }

    #[test]
    fn test_sum_all_keeps_overlapping_rules() {
        let detector = FoodMentionDetector::with_config(ExtractionConfig {
            overlap_policy: OverlapPolicy::SumAll,
            ..Default::default()
        });
        let mentions = detector.find_food_mentions("200g carne de vită");

        assert_eq!(mentions.len(), 2);
        assert_eq!(mentions[0].canonical_name, "Carne de vită");
        assert_eq!(mentions[1].canonical_name, "Carne");
    }

    #[test]
    fn test_positions_refer_to_lowercased_text() {
        let detector = create_detector();
        let mentions = detector.find_food_mentions("Azi 3 mere");

        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].start_pos, 4);
        assert_eq!(mentions[0].end_pos, 10);
    }

    #[test]
    fn test_truncation_at_char_boundary() {
        let detector = FoodMentionDetector::with_config(ExtractionConfig {
            max_text_length: 5,
            ..Default::default()
        });

        assert_eq!(detector.find_food_mentions("2 ouă și 3 mere").len(), 1);
        assert!(detector.find_food_mentions("ăăăăăă 2 ouă").is_empty());
    }

    #[test]
    fn test_extract_mention_lines() {
        let detector = create_detector();
        let text = "dimineață: 2 ouă\nprânz: nimic\nseară: 200g orez";

        let lines = detector.extract_mention_lines(text);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], (0, "dimineață: 2 ouă".to_string()));
        assert_eq!(lines[1], (2, "seară: 200g orez".to_string()));
    }
}
