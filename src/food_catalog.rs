//! # Romanian Food Catalog
//!
//! A reference table of common Romanian foods with values per 100 g, usual
//! portion sizes and search aliases. It backs manual food lookup: find a food
//! by name, alias or category, pick a portion and scale the facts to it.
//!
//! ## Usage
//!
//! ```rust
//! use nutrition_coach::food_catalog::{food_by_id, nutrition_for_portion, search_foods};
//!
//! let found = search_foods("mititei");
//! assert_eq!(found[0].id, "mici");
//!
//! let chicken = food_by_id("piept-pui").unwrap();
//! let portion = chicken.portion("piept mediu").unwrap();
//! let facts = nutrition_for_portion(chicken, portion.grams);
//! assert_eq!(facts.calories, 248);
//! ```

use std::sync::LazyLock;

use log::debug;
use serde::Serialize;

use crate::nutrition_model::{round_calories, round_to_tenth, MacroEstimate, NutritionFacts};

/// Most results a search returns
pub const SEARCH_LIMIT: usize = 10;

/// Catalog categories, in display order
pub const FOOD_CATEGORIES: &[&str] = &[
    "Panificație",
    "Carne",
    "Pește",
    "Lactate",
    "Legume",
    "Preparate tradiționale",
    "Deserturi",
    "Cereale",
    "Fructe",
    "Condimente",
];

/// A named serving size
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Portion {
    pub name: &'static str,
    pub grams: f64,
}

/// One catalog food; nutrient values are per 100 g
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogFood {
    pub id: &'static str,
    pub name: &'static str,
    /// One of [`FOOD_CATEGORIES`]
    pub category: &'static str,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: Option<f64>,
    pub common_portions: Vec<Portion>,
    /// Alternative spellings, mostly without diacritics
    pub aliases: Vec<&'static str>,
}

impl CatalogFood {
    /// The portion called `name`, compared case-insensitively
    pub fn portion(&self, name: &str) -> Option<&Portion> {
        let name = name.trim().to_lowercase();
        self.common_portions
            .iter()
            .find(|p| p.name.to_lowercase() == name)
    }

    fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query)
            || self.aliases.iter().any(|a| a.to_lowercase().contains(query))
            || self.category.to_lowercase().contains(query)
    }
}

fn portion(name: &'static str, grams: f64) -> Portion {
    Portion { name, grams }
}

fn food(
    id: &'static str,
    name: &'static str,
    category: &'static str,
    (calories, protein, carbs, fat): (f64, f64, f64, f64),
    fiber: Option<f64>,
    common_portions: Vec<Portion>,
    aliases: Vec<&'static str>,
) -> CatalogFood {
    CatalogFood {
        id,
        name,
        category,
        calories,
        protein,
        carbs,
        fat,
        fiber,
        common_portions,
        aliases,
    }
}

static FOOD_CATALOG: LazyLock<Vec<CatalogFood>> = LazyLock::new(|| {
    vec![
        // Panificație
        food(
            "paine-alba",
            "Pâine albă",
            "Panificație",
            (265.0, 9.0, 49.0, 3.2),
            Some(2.7),
            vec![
                portion("felie", 30.0),
                portion("jumătate de pâine", 250.0),
                portion("pâine întreagă", 500.0),
            ],
            vec!["paine", "franzela", "chifla"],
        ),
        food(
            "paine-graham",
            "Pâine Graham",
            "Panificație",
            (247.0, 13.0, 41.0, 4.2),
            Some(7.0),
            vec![portion("felie", 35.0), portion("toast", 25.0)],
            vec!["paine graham", "paine integrala"],
        ),
        // Carne
        food(
            "piept-pui",
            "Piept de pui",
            "Carne",
            (165.0, 31.0, 0.0, 3.6),
            None,
            vec![
                portion("piept mediu", 150.0),
                portion("jumătate piept", 75.0),
                portion("porție", 120.0),
            ],
            vec!["pui", "piept pui", "carne pui"],
        ),
        food(
            "carne-porc",
            "Carne de porc (cotlet)",
            "Carne",
            (242.0, 27.0, 0.0, 14.0),
            None,
            vec![portion("cotlet", 100.0), portion("porție", 150.0)],
            vec!["porc", "cotlet porc", "carne porc"],
        ),
        food(
            "carne-vita",
            "Carne de vită",
            "Carne",
            (250.0, 26.0, 0.0, 15.0),
            None,
            vec![portion("mușchi", 150.0), portion("porție", 120.0)],
            vec!["vita", "muschi vita", "carne tocata vita"],
        ),
        // Pește
        food(
            "crap",
            "Crap",
            "Pește",
            (127.0, 18.0, 0.0, 5.6),
            None,
            vec![portion("file", 150.0), portion("porție", 200.0)],
            vec!["peste crap", "file crap"],
        ),
        // Lactate
        food(
            "telemea",
            "Telemea de oaie",
            "Lactate",
            (230.0, 17.0, 2.0, 17.0),
            None,
            vec![
                portion("felie", 30.0),
                portion("porție", 50.0),
                portion("cuburi", 100.0),
            ],
            vec!["telemea", "branza telemea", "branza oaie"],
        ),
        food(
            "cascaval",
            "Cașcaval",
            "Lactate",
            (374.0, 25.0, 1.3, 30.0),
            None,
            vec![portion("felie", 20.0), portion("porție", 40.0)],
            vec!["cascaval", "branza cascaval"],
        ),
        food(
            "smantana",
            "Smântână",
            "Lactate",
            (193.0, 2.8, 3.4, 20.0),
            None,
            vec![
                portion("lingură", 15.0),
                portion("lingurită", 5.0),
                portion("porție", 50.0),
            ],
            vec!["smantana", "frisca"],
        ),
        // Legume
        food(
            "cartofi",
            "Cartofi",
            "Legume",
            (77.0, 2.0, 17.0, 0.1),
            Some(2.2),
            vec![
                portion("cartof mediu", 150.0),
                portion("cartof mic", 100.0),
                portion("porție", 200.0),
            ],
            vec!["cartof", "cartofi fierti", "cartofi cuptor"],
        ),
        food(
            "varza",
            "Varză albă",
            "Legume",
            (25.0, 1.3, 6.0, 0.1),
            Some(2.5),
            vec![portion("cană", 90.0), portion("porție", 150.0)],
            vec!["varza", "varza alba", "varza calita"],
        ),
        food(
            "ceapa",
            "Ceapă",
            "Legume",
            (40.0, 1.1, 9.3, 0.1),
            Some(1.7),
            vec![portion("ceapă medie", 110.0), portion("ceapă mică", 70.0)],
            vec!["ceapa", "ceapa rosie", "ceapa alba"],
        ),
        // Preparate tradiționale
        food(
            "sarmale",
            "Sarmale",
            "Preparate tradiționale",
            (180.0, 8.0, 15.0, 10.0),
            Some(2.0),
            vec![portion("sarma", 100.0), portion("porție (3 sarmale)", 300.0)],
            vec!["sarma", "sarmale varza", "sarmale vita"],
        ),
        food(
            "mici",
            "Mici",
            "Preparate tradiționale",
            (300.0, 15.0, 5.0, 25.0),
            None,
            vec![portion("mic", 60.0), portion("porție (5 mici)", 300.0)],
            vec!["mic", "mititei"],
        ),
        // Deserturi
        food(
            "papanasi",
            "Papanași",
            "Deserturi",
            (350.0, 8.0, 45.0, 16.0),
            Some(1.0),
            vec![portion("porție", 200.0), portion("papanaș", 100.0)],
            vec!["papanasi", "papanas"],
        ),
        // Cereale
        food(
            "orez",
            "Orez alb fiert",
            "Cereale",
            (130.0, 2.7, 28.0, 0.3),
            Some(0.4),
            vec![
                portion("cană", 195.0),
                portion("porție", 150.0),
                portion("lingură", 15.0),
            ],
            vec!["orez", "orez fiert", "orez basmati"],
        ),
        food(
            "paste",
            "Paste făinoase",
            "Cereale",
            (131.0, 5.0, 25.0, 1.1),
            Some(1.8),
            vec![portion("cană", 140.0), portion("porție", 100.0)],
            vec!["paste", "spaghetti", "macaroane", "penne"],
        ),
        // Fructe
        food(
            "mere",
            "Mere",
            "Fructe",
            (52.0, 0.3, 14.0, 0.2),
            Some(2.4),
            vec![portion("măr mediu", 180.0), portion("măr mic", 140.0)],
            vec!["mar", "mere rosii", "mere verzi"],
        ),
        food(
            "prune",
            "Prune",
            "Fructe",
            (46.0, 0.7, 11.0, 0.3),
            Some(1.4),
            vec![portion("prună", 60.0), portion("cană", 165.0)],
            vec!["pruna", "prune albastre"],
        ),
        // Condimente
        food(
            "marar",
            "Mărar",
            "Condimente",
            (43.0, 3.5, 7.0, 1.1),
            Some(2.1),
            vec![portion("lingurită", 1.0), portion("lingură", 3.0)],
            vec!["marar", "marar uscat", "marar proaspat"],
        ),
        food(
            "ardei-iute",
            "Ardei iute",
            "Condimente",
            (40.0, 1.9, 9.0, 0.4),
            Some(1.5),
            vec![portion("ardei", 15.0), portion("lingurită", 2.0)],
            vec!["ardei iute", "chili", "iute"],
        ),
    ]
});

/// Every catalog food, in catalog order
pub fn all_foods() -> &'static [CatalogFood] {
    &FOOD_CATALOG
}

/// Foods whose name, alias or category contains `query`
///
/// Matching is case-insensitive substring search; a blank query finds
/// nothing. At most [`SEARCH_LIMIT`] foods are returned, in catalog order.
///
/// # Examples
///
/// ```rust
/// use nutrition_coach::food_catalog::search_foods;
///
/// let names: Vec<&str> = search_foods("Lactate").iter().map(|f| f.name).collect();
/// assert_eq!(names, vec!["Telemea de oaie", "Cașcaval", "Smântână"]);
/// assert!(search_foods("   ").is_empty());
/// ```
pub fn search_foods(query: &str) -> Vec<&'static CatalogFood> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let found: Vec<&'static CatalogFood> = FOOD_CATALOG
        .iter()
        .filter(|food| food.matches(&query))
        .take(SEARCH_LIMIT)
        .collect();
    debug!("Catalog search '{}' found {} foods", query, found.len());
    found
}

/// The food with the given id
pub fn food_by_id(id: &str) -> Option<&'static CatalogFood> {
    FOOD_CATALOG.iter().find(|food| food.id == id)
}

/// Every food in `category`, matched exactly
pub fn foods_by_category(category: &str) -> Vec<&'static CatalogFood> {
    FOOD_CATALOG
        .iter()
        .filter(|food| food.category == category)
        .collect()
}

/// Scale a food's per-100 g values to a portion of `grams`
///
/// Calories round half-up, macros to one decimal. Negative or non-finite
/// weights count as zero.
pub fn nutrition_for_portion(food: &CatalogFood, grams: f64) -> NutritionFacts {
    let multiplier = if grams.is_finite() && grams > 0.0 {
        grams / 100.0
    } else {
        0.0
    };
    NutritionFacts::new(
        round_calories(food.calories * multiplier),
        MacroEstimate::new(
            round_to_tenth(food.protein * multiplier),
            round_to_tenth(food.carbs * multiplier),
            round_to_tenth(food.fat * multiplier),
        ),
    )
}
