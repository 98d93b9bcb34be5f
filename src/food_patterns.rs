//! # Food Patterns Module
//!
//! The single table of food rules used by the detector. Rules are ordered
//! most-specific-first: with [`OverlapPolicy::FirstMatchWins`] an earlier rule
//! claims its span before a generic one can.
//!
//! Every matcher runs against lowercased text and captures the quantity in its
//! first group. Accented letters are significant, so the common spellings with
//! and without diacritics are listed explicitly.
//!
//! [`OverlapPolicy::FirstMatchWins`]: crate::food_types::OverlapPolicy::FirstMatchWins

use lazy_static::lazy_static;
use regex::Regex;

use crate::food_types::{FoodPattern, UnitKind};

/// Version of the food table, bumped whenever a rule or factor changes
pub const FOOD_TABLE_VERSION: u32 = 1;

/// Uncompiled rule: (matcher, canonical name, unit kind, factor, unit label)
type RuleSpec = (&'static str, &'static str, UnitKind, f64, &'static str);

const FOOD_RULES: &[RuleSpec] = &[
    // Bread
    (
        r"(\d+)\s*(?:felii|felie)\s+(?:de\s+)?p(?:â|a)ine\b",
        "Pâine albă",
        UnitKind::PerUnit,
        80.0,
        "felie",
    ),
    (
        r"(\d+)\s*(?:grame|gr|g)?\s*(?:de\s+)?p(?:â|a)ine\b",
        "Pâine albă",
        UnitKind::PerGram,
        2.65,
        "g",
    ),
    // Eggs
    (r"(\d+)\s*ou(?:ă|a)?\b", "Ou de găină", UnitKind::PerUnit, 70.0, "bucată"),
    // Chicken
    (
        r"(\d+)\s*(?:grame|gr|g)?\s*piept\s+(?:de\s+)?pui\b",
        "Piept de pui",
        UnitKind::PerGram,
        1.65,
        "g",
    ),
    (
        r"(\d+)\s*(?:grame|gr|g)?\s*(?:de\s+)?pui\b",
        "Piept de pui",
        UnitKind::PerGram,
        1.65,
        "g",
    ),
    // Grains
    (
        r"(\d+)\s*(?:grame|gr|g)?\s*(?:de\s+)?orez\b",
        "Orez fiert",
        UnitKind::PerGram,
        1.30,
        "g",
    ),
    (
        r"(\d+)\s*(?:grame|gr|g)?\s*(?:de\s+)?spaghete\b",
        "Spaghete",
        UnitKind::PerGram,
        3.50,
        "g",
    ),
    (
        r"(\d+)\s*(?:grame|gr|g)?\s*(?:de\s+)?paste\b",
        "Paste",
        UnitKind::PerGram,
        3.50,
        "g",
    ),
    // Dairy
    (
        r"(\d+)\s*pahare?\s+(?:de\s+)?lapte\b",
        "Lapte 3.5%",
        UnitKind::PerUnit,
        160.0,
        "pahar",
    ),
    (
        r"(\d+)\s*(?:ml)?\s*(?:de\s+)?lapte\b",
        "Lapte 3.5%",
        UnitKind::PerMilliliter,
        0.64,
        "ml",
    ),
    (
        r"(\d+)\s*(?:grame|gr|g)?\s*(?:de\s+)?ca(?:ș|ş|s)caval\b",
        "Cașcaval",
        UnitKind::PerGram,
        3.50,
        "g",
    ),
    (
        r"(\d+)\s*(?:grame|gr|g)?\s*(?:de\s+)?br(?:â|a)nz(?:ă|a)\b",
        "Brânză telemea",
        UnitKind::PerGram,
        2.30,
        "g",
    ),
    (
        r"(\d+)\s*(?:grame|gr|g)?\s*(?:de\s+)?unt\b",
        "Unt",
        UnitKind::PerGram,
        7.17,
        "g",
    ),
    // Vegetables
    (
        r"(\d+)\s*(?:grame|gr|g)?\s*(?:de\s+)?ro(?:ș|ş|s)ii\b",
        "Roșii",
        UnitKind::PerGram,
        0.18,
        "g",
    ),
    (
        r"(\d+)\s*(?:grame|gr|g)?\s*(?:de\s+)?castrave(?:ț|ţ|t)i\b",
        "Castraveți",
        UnitKind::PerGram,
        0.12,
        "g",
    ),
    (
        r"(\d+)\s*(?:grame|gr|g)?\s*(?:de\s+)?salat(?:ă|a)\b",
        "Salată verde",
        UnitKind::PerGram,
        0.15,
        "g",
    ),
    // Fruit
    (r"(\d+)\s*(?:mere|m(?:ă|a)r)\b", "Măr", UnitKind::PerUnit, 80.0, "bucată"),
    (r"(\d+)\s*banan(?:ă|a|e)\b", "Banană", UnitKind::PerUnit, 90.0, "bucată"),
    (
        r"(\d+)\s*(?:grame|gr|g)?\s*(?:de\s+)?struguri\b",
        "Struguri",
        UnitKind::PerGram,
        0.62,
        "g",
    ),
    // Drinks
    (
        r"(\d+)\s*(?:c(?:ă|a)ni|ce(?:ș|ş|s)ti|c(?:ă|a)n(?:ă|a)|cea(?:ș|ş|s)c(?:ă|a))\s+(?:de\s+)?cafea\b",
        "Cafea neagră",
        UnitKind::PerUnit,
        2.0,
        "ceașcă",
    ),
    (
        r"(\d+)\s*(?:ml)?\s*(?:de\s+)?suc\b",
        "Suc de fructe",
        UnitKind::PerMilliliter,
        0.45,
        "ml",
    ),
    // Sweets
    (
        r"(\d+)\s*(?:grame|gr|g)?\s*(?:de\s+)?ciocolat(?:ă|a)\b",
        "Ciocolată",
        UnitKind::PerGram,
        5.30,
        "g",
    ),
    (
        r"(\d+)\s*pr(?:ă|a)jitur(?:ă|a|i)\b",
        "Prăjitură",
        UnitKind::PerUnit,
        250.0,
        "bucată",
    ),
    // Meat
    (
        r"(\d+)\s*(?:grame|gr|g)?\s*(?:de\s+)?(?:carne\s+de\s+)?vit(?:ă|a)\b",
        "Carne de vită",
        UnitKind::PerGram,
        2.50,
        "g",
    ),
    (
        r"(\d+)\s*(?:grame|gr|g)?\s*(?:de\s+)?(?:carne\s+de\s+)?porc\b",
        "Carne de porc",
        UnitKind::PerGram,
        2.90,
        "g",
    ),
    (
        r"(\d+)\s*(?:grame|gr|g)?\s*(?:de\s+)?carne\b",
        "Carne",
        UnitKind::PerGram,
        2.50,
        "g",
    ),
    // Fish
    (
        r"(\d+)\s*(?:grame|gr|g)?\s*(?:de\s+)?somon\b",
        "Somon",
        UnitKind::PerGram,
        2.00,
        "g",
    ),
    (
        r"(\d+)\s*(?:grame|gr|g)?\s*(?:de\s+)?pe(?:ș|ş|s)te\b",
        "Pește",
        UnitKind::PerGram,
        1.80,
        "g",
    ),
];

// Compiled once per process; the table is read-only afterwards
lazy_static! {
    pub static ref FOOD_PATTERNS: Vec<FoodPattern> = FOOD_RULES
        .iter()
        .map(|&(matcher, canonical_name, unit_kind, conversion_factor, unit_label)| {
            FoodPattern {
                matcher: Regex::new(matcher).expect("Food pattern should be valid"),
                canonical_name,
                unit_kind,
                conversion_factor,
                unit_label,
            }
        })
        .collect();
}

/// Plural form of a count-noun unit label; other labels are returned unchanged
pub fn plural_unit_label(label: &str) -> &str {
    match label {
        "bucată" => "bucăți",
        "felie" => "felii",
        "ceașcă" => "cești",
        "pahar" => "pahare",
        other => other,
    }
}
