//! # Journal Analytics
//!
//! Aggregates over a slice of journal entries: totals, per-entry averages,
//! macro calorie distribution, eating patterns and coarse diet flags.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

use crate::nutrition_model::{
    round_calories, round_to_tenth, JournalEntryCandidate, MealTime, KCAL_PER_GRAM_CARBS,
    KCAL_PER_GRAM_FAT, KCAL_PER_GRAM_PROTEIN,
};

/// Share of macro calories per nutrient, in whole percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MacroDistribution {
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

/// Unrounded share of macro calories per nutrient, in percent
///
/// Diet flags are decided on these values so that a 30.4% protein share
/// counts as above 30% even though it displays as 30.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MacroShares {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl MacroShares {
    /// The shares rounded to whole percent
    pub fn rounded(&self) -> MacroDistribution {
        let percent = |share: f64| share.round() as u32;
        MacroDistribution {
            protein: percent(self.protein),
            carbs: percent(self.carbs),
            fat: percent(self.fat),
        }
    }
}

/// Coarse observations about a macro distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DietFlag {
    /// Protein above 30% of macro calories
    HighProtein,
    /// Protein below 15%
    LowProtein,
    /// Carbohydrates above 60%
    HighCarb,
    /// Carbohydrates below 30%
    LowCarb,
    /// Fat above 40%
    HighFat,
}

/// How often a food was logged
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodFrequency {
    /// Name as first logged
    pub name: String,
    pub count: usize,
    pub average_calories: u32,
}

/// Totals for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub entries: usize,
    pub calories: u64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Aggregate view over a set of journal entries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JournalSummary {
    pub total_entries: usize,
    pub total_calories: u64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub average_calories: u32,
    pub average_protein: f64,
    pub average_carbs: f64,
    pub average_fat: f64,
    pub distribution: MacroDistribution,
    pub favorite_meal_time: MealTime,
    pub top_foods: Vec<FoodFrequency>,
    pub calories_by_date: BTreeMap<NaiveDate, u64>,
    pub diet_flags: Vec<DietFlag>,
}

/// Summarize journal entries; `None` when there are none
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use nutrition_coach::journal_summary::summarize_entries;
/// use nutrition_coach::nutrition_model::{JournalEntryCandidate, MacroEstimate};
///
/// let date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
/// let entries = vec![
///     JournalEntryCandidate::new("Ouă", 300, date).with_macros(MacroEstimate::new(20.0, 4.0, 22.0)),
///     JournalEntryCandidate::new("Orez", 130, date).with_macros(MacroEstimate::new(3.0, 28.0, 0.3)),
/// ];
///
/// let summary = summarize_entries(&entries).unwrap();
/// assert_eq!(summary.total_calories, 430);
/// assert_eq!(summary.average_calories, 215);
/// assert!(summarize_entries(&[]).is_none());
/// ```
pub fn summarize_entries(entries: &[JournalEntryCandidate]) -> Option<JournalSummary> {
    if entries.is_empty() {
        return None;
    }

    let count = entries.len();
    let total_calories: u64 = entries.iter().map(|e| u64::from(e.calories)).sum();
    let total_protein: f64 = entries.iter().map(|e| e.protein).sum();
    let total_carbs: f64 = entries.iter().map(|e| e.carbs).sum();
    let total_fat: f64 = entries.iter().map(|e| e.fat).sum();
    let n = count as f64;

    let shares = macro_shares(total_protein, total_carbs, total_fat);
    let distribution = shares.rounded();

    let mut calories_by_date = BTreeMap::new();
    for entry in entries {
        *calories_by_date.entry(entry.date).or_insert(0) += u64::from(entry.calories);
    }

    let summary = JournalSummary {
        total_entries: count,
        total_calories,
        total_protein: round_to_tenth(total_protein),
        total_carbs: round_to_tenth(total_carbs),
        total_fat: round_to_tenth(total_fat),
        average_calories: round_calories(total_calories as f64 / n),
        average_protein: round_to_tenth(total_protein / n),
        average_carbs: round_to_tenth(total_carbs / n),
        average_fat: round_to_tenth(total_fat / n),
        distribution,
        favorite_meal_time: favorite_meal_time(entries),
        top_foods: top_foods(entries),
        calories_by_date,
        diet_flags: diet_flags(&shares),
    };
    debug!(
        "Summarized {} entries: {} kcal, distribution {:?}",
        count, total_calories, distribution
    );
    Some(summary)
}

/// Unrounded macro calorie shares for the given gram totals
///
/// All zero when the macros carry no calories.
pub fn macro_shares(protein: f64, carbs: f64, fat: f64) -> MacroShares {
    let protein_kcal = protein * KCAL_PER_GRAM_PROTEIN;
    let carbs_kcal = carbs * KCAL_PER_GRAM_CARBS;
    let fat_kcal = fat * KCAL_PER_GRAM_FAT;
    let total = protein_kcal + carbs_kcal + fat_kcal;
    if !total.is_finite() || total <= 0.0 {
        return MacroShares::default();
    }

    MacroShares {
        protein: protein_kcal / total * 100.0,
        carbs: carbs_kcal / total * 100.0,
        fat: fat_kcal / total * 100.0,
    }
}

/// Macro calorie shares for the given gram totals, in whole percent
pub fn macro_distribution(protein: f64, carbs: f64, fat: f64) -> MacroDistribution {
    macro_shares(protein, carbs, fat).rounded()
}

/// Flags raised by a macro distribution
///
/// Thresholds are strict and apply to the unrounded shares: protein above 30%
/// or below 15%, carbohydrates above 60% or below 30%, fat above 40%.
pub fn diet_flags(shares: &MacroShares) -> Vec<DietFlag> {
    let mut flags = Vec::new();
    if shares.protein > 30.0 {
        flags.push(DietFlag::HighProtein);
    } else if shares.protein < 15.0 {
        flags.push(DietFlag::LowProtein);
    }
    if shares.carbs > 60.0 {
        flags.push(DietFlag::HighCarb);
    } else if shares.carbs < 30.0 {
        flags.push(DietFlag::LowCarb);
    }
    if shares.fat > 40.0 {
        flags.push(DietFlag::HighFat);
    }
    flags
}

/// Totals for the entries logged on `date`
pub fn daily_totals(entries: &[JournalEntryCandidate], date: NaiveDate) -> DailyTotals {
    let day: Vec<&JournalEntryCandidate> = entries.iter().filter(|e| e.date == date).collect();
    DailyTotals {
        date,
        entries: day.len(),
        calories: day.iter().map(|e| u64::from(e.calories)).sum(),
        protein: round_to_tenth(day.iter().map(|e| e.protein).sum()),
        carbs: round_to_tenth(day.iter().map(|e| e.carbs).sum()),
        fat: round_to_tenth(day.iter().map(|e| e.fat).sum()),
    }
}

// Ties go to the earliest period of the day.
fn favorite_meal_time(entries: &[JournalEntryCandidate]) -> MealTime {
    let mut best = (MealTime::ALL[0], 0);
    for meal_time in MealTime::ALL {
        let count = entries.iter().filter(|e| e.meal_time == meal_time).count();
        if count > best.1 {
            best = (meal_time, count);
        }
    }
    best.0
}

fn top_foods(entries: &[JournalEntryCandidate]) -> Vec<FoodFrequency> {
    // key -> (first name, count, calorie sum)
    let mut groups: HashMap<String, (String, usize, u64)> = HashMap::new();
    for entry in entries {
        let group = groups
            .entry(entry.food_name.to_lowercase())
            .or_insert_with(|| (entry.food_name.clone(), 0, 0));
        group.1 += 1;
        group.2 += u64::from(entry.calories);
    }

    let mut foods: Vec<(String, FoodFrequency)> = groups
        .into_iter()
        .map(|(key, (name, count, calories))| {
            let frequency = FoodFrequency {
                name,
                count,
                average_calories: round_calories(calories as f64 / count as f64),
            };
            (key, frequency)
        })
        .collect();
    foods.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(&b.0)));
    foods.into_iter().map(|(_, frequency)| frequency).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition_model::MacroEstimate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, day).unwrap()
    }

    fn entry(name: &str, calories: u32, macros: (f64, f64, f64), meal_time: MealTime, day: u32) -> JournalEntryCandidate {
        JournalEntryCandidate::new(name, calories, date(day))
            .with_macros(MacroEstimate::new(macros.0, macros.1, macros.2))
            .with_meal_time(meal_time)
    }

    fn demo_entries() -> Vec<JournalEntryCandidate> {
        vec![
            entry("Ouă mici cu bacon", 320, (25.0, 5.0, 22.0), MealTime::Morning, 1),
            entry("Salată de pui cu avocado", 450, (35.0, 15.0, 28.0), MealTime::Midday, 1),
            entry("Somon la grătar cu broccoli", 380, (40.0, 12.0, 18.0), MealTime::Evening, 1),
        ]
    }

    #[test]
    fn test_demo_summary() {
        let summary = summarize_entries(&demo_entries()).unwrap();

        assert_eq!(summary.total_entries, 3);
        assert_eq!(summary.total_calories, 1150);
        assert_eq!(summary.total_protein, 100.0);
        assert_eq!(summary.average_calories, 383);
        assert_eq!(summary.average_protein, 33.3);
        assert_eq!(summary.average_carbs, 10.7);
        assert_eq!(summary.average_fat, 22.7);
        assert_eq!(
            summary.distribution,
            MacroDistribution {
                protein: 35,
                carbs: 11,
                fat: 54
            }
        );
        assert_eq!(
            summary.diet_flags,
            vec![DietFlag::HighProtein, DietFlag::LowCarb, DietFlag::HighFat]
        );
        assert_eq!(summary.favorite_meal_time, MealTime::Morning);
        assert_eq!(summary.calories_by_date.get(&date(1)), Some(&1150));
        assert_eq!(summary.top_foods[0].name, "Ouă mici cu bacon");
    }

    #[test]
    fn test_no_entries_no_summary() {
        assert!(summarize_entries(&[]).is_none());
    }

    #[test]
    fn test_favorite_meal_time() {
        let entries = vec![
            entry("a", 100, (0.0, 0.0, 0.0), MealTime::Evening, 1),
            entry("b", 100, (0.0, 0.0, 0.0), MealTime::Evening, 1),
            entry("c", 100, (0.0, 0.0, 0.0), MealTime::Midday, 1),
        ];
        let summary = summarize_entries(&entries).unwrap();
        assert_eq!(summary.favorite_meal_time, MealTime::Evening);
        assert_eq!(summary.distribution, MacroDistribution::default());
    }

    #[test]
    fn test_top_foods_grouping() {
        let entries = vec![
            entry("Măr", 80, (0.3, 21.0, 0.2), MealTime::Morning, 1),
            entry("măr", 90, (0.3, 21.0, 0.2), MealTime::Midday, 2),
            entry("Banană", 90, (1.1, 23.0, 0.3), MealTime::Midday, 2),
            entry("Ananas", 50, (0.5, 13.0, 0.1), MealTime::Midday, 2),
        ];
        let foods = summarize_entries(&entries).unwrap().top_foods;

        assert_eq!(foods.len(), 3);
        assert_eq!(foods[0].name, "Măr");
        assert_eq!(foods[0].count, 2);
        assert_eq!(foods[0].average_calories, 85);
        assert_eq!(foods[1].name, "Ananas");
        assert_eq!(foods[2].name, "Banană");
    }

    #[test]
    fn test_diet_flags_thresholds() {
        let balanced = MacroShares {
            protein: 20.0,
            carbs: 50.0,
            fat: 30.0,
        };
        assert!(diet_flags(&balanced).is_empty());

        let carb_heavy = MacroShares {
            protein: 10.0,
            carbs: 70.0,
            fat: 20.0,
        };
        assert_eq!(diet_flags(&carb_heavy), vec![DietFlag::LowProtein, DietFlag::HighCarb]);

        let edge = MacroShares {
            protein: 30.0,
            carbs: 30.0,
            fat: 40.0,
        };
        assert!(diet_flags(&edge).is_empty());
    }

    #[test]
    fn test_diet_flags_use_unrounded_shares() {
        // 30.4% protein, 40.6% carbs, 29.0% fat of 1000 kcal
        let shares = macro_shares(76.0, 101.5, 290.0 / 9.0);
        assert_eq!(
            shares.rounded(),
            MacroDistribution {
                protein: 30,
                carbs: 41,
                fat: 29
            }
        );
        assert_eq!(macro_distribution(76.0, 101.5, 290.0 / 9.0), shares.rounded());
        assert_eq!(diet_flags(&shares), vec![DietFlag::HighProtein]);

        // 14.6% protein displays as 15 but is still below 15%
        let low = macro_shares(36.5, 140.0, 294.0 / 9.0);
        assert_eq!(low.rounded().protein, 15);
        assert_eq!(diet_flags(&low), vec![DietFlag::LowProtein]);
    }

    #[test]
    fn test_summary_totals_do_not_overflow() {
        let entries = vec![
            entry("Tort", u32::MAX, (0.0, 0.0, 0.0), MealTime::Evening, 1),
            entry("Tort", u32::MAX, (0.0, 0.0, 0.0), MealTime::Evening, 1),
            entry("Tort", u32::MAX, (0.0, 0.0, 0.0), MealTime::Evening, 2),
        ];
        let summary = summarize_entries(&entries).unwrap();

        assert_eq!(summary.total_calories, 3 * u64::from(u32::MAX));
        assert_eq!(summary.average_calories, u32::MAX);
        assert_eq!(summary.calories_by_date.get(&date(1)), Some(&(2 * u64::from(u32::MAX))));
        assert_eq!(summary.top_foods[0].average_calories, u32::MAX);
        assert_eq!(daily_totals(&entries, date(1)).calories, 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_daily_totals() {
        let mut entries = demo_entries();
        entries.push(entry("Iaurt", 120, (10.0, 8.0, 5.0), MealTime::Morning, 2));

        let first = daily_totals(&entries, date(1));
        assert_eq!(first.entries, 3);
        assert_eq!(first.calories, 1150);
        assert_eq!(first.fat, 68.0);

        let second = daily_totals(&entries, date(2));
        assert_eq!(second.entries, 1);
        assert_eq!(second.calories, 120);

        let empty = daily_totals(&entries, date(3));
        assert_eq!(empty.entries, 0);
        assert_eq!(empty.calories, 0);
    }
}
