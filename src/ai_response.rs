//! # AI Response Interpretation
//!
//! Prompt construction for the text-generation service and defensive parsing
//! of what comes back. Replies are free text that should contain one JSON
//! object; anything that cannot be turned into sane numbers yields `None` so
//! the caller can fall back to the deterministic estimators.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::nutrition_estimator::estimate_macros_from_calories;
use crate::nutrition_model::{
    round_calories, round_to_tenth, MacroEstimate, MealTime, NutritionFacts, MAX_ITEM_CALORIES,
};

/// One food item reported by the text-generation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiFood {
    /// Food name including its quantity, as written by the service
    pub name: String,
    pub calories: u32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    /// Meal period, when the service named a recognizable one
    pub meal_time: Option<MealTime>,
}

impl AiFood {
    /// The macro part of this item
    pub fn macros(&self) -> MacroEstimate {
        MacroEstimate::new(self.protein, self.carbs, self.fat)
    }
}

/// Prompt asking for every food with a quantity in a chat message
pub fn food_list_prompt(message: &str) -> String {
    format!(
        r#"Analizează mesajul de mai jos și extrage alimentele concrete menționate cu cantități:

"{message}"

Dacă există alimente cu cantități, răspunde DOAR cu un JSON valid de forma:
{{
  "foods": [
    {{
      "name": "aliment cu cantitate",
      "calories": calorii,
      "protein": grame_proteine,
      "carbs": grame_carbohidrați,
      "fat": grame_grăsimi,
      "meal_time": "dimineata|amiaza|seara"
    }}
  ]
}}

Dacă nu există alimente cu cantități, răspunde DOAR cu:
{{"foods": []}}"#
    )
}

/// Prompt asking for the nutrition totals of a food description
pub fn nutrition_facts_prompt(description: &str) -> String {
    format!(
        r#"Calculează valorile nutriționale totale pentru porția descrisă:

"{description}"

Ține cont de cantități (g, kg, ml, felii, bucăți) și răspunde DOAR cu un JSON valid:
{{
  "calories": calorii_total,
  "protein": grame_proteine_total,
  "carbs": grame_carbohidrați_total,
  "fat": grame_grăsimi_total
}}"#
    )
}

/// Prompt asking for the macro split of a food with a known calorie total
pub fn macro_estimate_prompt(food_name: &str, calories: u32) -> String {
    format!(
        r#"Estimează macronutrienții pentru "{food_name}" cu {calories} calorii.

Răspunde DOAR cu un JSON valid, fără alt text:
{{
  "protein": grame,
  "carbs": grame,
  "fat": grame
}}"#
    )
}

/// The span from the first `{` to the last `}` of a reply
///
/// # Examples
///
/// ```rust
/// use nutrition_coach::ai_response::extract_json_object;
///
/// let reply = "Sigur! {\"protein\": 20} Poftă bună.";
/// assert_eq!(extract_json_object(reply), Some("{\"protein\": 20}"));
/// assert_eq!(extract_json_object("nimic"), None);
/// ```
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

fn parse_object(text: &str) -> Option<Value> {
    let json = extract_json_object(text)?;
    match serde_json::from_str::<Value>(json) {
        Ok(value) if value.is_object() => Some(value),
        Ok(_) => None,
        Err(e) => {
            warn!("AI reply is not valid JSON: {}", e);
            None
        }
    }
}

/// A numeric field that may arrive as a JSON number or a numeric string
fn number_field(object: &Value, key: &str) -> Option<f64> {
    let value = match object.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

fn valid_calories(value: f64) -> Option<u32> {
    (0.0..=MAX_ITEM_CALORIES)
        .contains(&value)
        .then(|| round_calories(value))
}

fn grams(value: f64) -> f64 {
    round_to_tenth(value.max(0.0))
}

/// Macros from a reply object, filling missing fields from the calorie split
fn macros_or_estimate(object: &Value, food_name: &str, calories: u32) -> MacroEstimate {
    let reported = (
        number_field(object, "protein"),
        number_field(object, "carbs"),
        number_field(object, "fat"),
    );
    if let (Some(protein), Some(carbs), Some(fat)) = reported {
        return MacroEstimate::new(grams(protein), grams(carbs), grams(fat));
    }

    debug!("Filling missing macros for '{}' from {} kcal", food_name, calories);
    let estimate = estimate_macros_from_calories(food_name, f64::from(calories));
    MacroEstimate::new(
        reported.0.map(grams).unwrap_or(estimate.protein),
        reported.1.map(grams).unwrap_or(estimate.carbs),
        reported.2.map(grams).unwrap_or(estimate.fat),
    )
}

fn parse_food_item(item: &Value) -> Option<AiFood> {
    let name = item.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }
    let calories = valid_calories(number_field(item, "calories")?)?;
    let macros = macros_or_estimate(item, name, calories);
    let meal_time = item
        .get("meal_time")
        .and_then(Value::as_str)
        .and_then(MealTime::from_label);

    Some(AiFood {
        name: name.to_string(),
        calories,
        protein: macros.protein,
        carbs: macros.carbs,
        fat: macros.fat,
        meal_time,
    })
}

/// Parse a `{"foods": [...]}` reply
///
/// Items without a name or with implausible calories are dropped. Returns
/// `None` when the reply has no usable JSON, no `foods` array, or when every
/// listed item had to be dropped. An explicitly empty list is `Some(vec![])`.
pub fn parse_food_list(text: &str) -> Option<Vec<AiFood>> {
    let object = parse_object(text)?;
    let items = object.get("foods")?.as_array()?;

    let foods: Vec<AiFood> = items.iter().filter_map(parse_food_item).collect();
    if foods.len() < items.len() {
        warn!(
            "Dropped {} of {} AI food items",
            items.len() - foods.len(),
            items.len()
        );
    }
    if !items.is_empty() && foods.is_empty() {
        return None;
    }
    Some(foods)
}

/// Parse a `{"calories", "protein", "carbs", "fat"}` reply for a description
///
/// `description` names the food when missing macros have to be estimated.
pub fn parse_nutrition_facts(text: &str, description: &str) -> Option<NutritionFacts> {
    let object = parse_object(text)?;
    let calories = valid_calories(number_field(&object, "calories")?)?;
    let macros = macros_or_estimate(&object, description, calories);
    Some(NutritionFacts::new(calories, macros))
}

/// Parse a `{"protein", "carbs", "fat"}` reply
///
/// All three fields are required; negative values are clamped to zero.
pub fn parse_macro_estimate(text: &str) -> Option<MacroEstimate> {
    let object = parse_object(text)?;
    Some(MacroEstimate::new(
        grams(number_field(&object, "protein")?),
        grams(number_field(&object, "carbs")?),
        grams(number_field(&object, "fat")?),
    ))
}
