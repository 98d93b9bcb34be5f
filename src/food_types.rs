//! # Food Types Module
//!
//! This module defines the core types used for food-mention detection.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Conversion basis of a food pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Calories per discrete unit (one egg, one slice, one glass)
    PerUnit,
    /// Calories per gram
    PerGram,
    /// Calories per milliliter
    PerMilliliter,
}

/// A rule in the food pattern table
#[derive(Debug, Clone)]
pub struct FoodPattern {
    /// Compiled matcher; its first capture group is the quantity
    pub matcher: Regex,
    /// Name assigned to every mention matched by this rule
    pub canonical_name: &'static str,
    /// How `conversion_factor` is applied to the quantity
    pub unit_kind: UnitKind,
    /// kcal per unit, per gram or per milliliter depending on `unit_kind`
    pub conversion_factor: f64,
    /// Unit label used to build display text (e.g. "bucată", "g", "ml")
    pub unit_label: &'static str,
}

impl FoodPattern {
    /// Calories for `quantity` of this food, unrounded
    pub fn calories_for(&self, quantity: u32) -> f64 {
        f64::from(quantity) * self.conversion_factor
    }
}

/// Represents a food detected in free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedFoodMention {
    /// Canonical food name of the matching rule (e.g. "Piept de pui")
    pub canonical_name: String,
    /// The quantity captured from the text
    pub raw_quantity: u32,
    /// Conversion basis used for the calorie figure
    pub unit_kind: UnitKind,
    /// Human readable mention (e.g. "2 bucăți Ou de găină", "100g Piept de pui")
    pub display_text: String,
    /// Total calories, rounded half-up to an integer
    pub total_calories: u32,
    /// Byte offset where the match starts in the lowercased text
    pub start_pos: usize,
    /// Byte offset where the match ends in the lowercased text
    pub end_pos: usize,
}

/// How matches of different rules over the same text span are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// A span claimed by an earlier rule in table order cannot be matched again
    #[default]
    FirstMatchWins,
    /// Every rule contributes independently, even over identical spans
    SumAll,
}

impl OverlapPolicy {
    /// Parse a policy name as used in environment configuration
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().replace('_', "-").as_str() {
            "first-match-wins" | "first-match" | "first" => Some(Self::FirstMatchWins),
            "sum-all" | "sum" | "all" => Some(Self::SumAll),
            _ => None,
        }
    }
}

/// Configuration options for food-mention detection
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Treatment of overlapping matches from different rules
    pub overlap_policy: OverlapPolicy,
    /// Maximum number of characters scanned; longer input is truncated
    pub max_text_length: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            overlap_policy: OverlapPolicy::default(),
            max_text_length: 10_000,
        }
    }
}
