//! # Nutrition Analyzer
//!
//! Asks a [`TextGenerator`] first and falls back to the deterministic
//! pipeline whenever it is missing, failing, tripped by the circuit breaker
//! or answering with something unusable. Every result says where it came
//! from.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use nutrition_coach::config::AiConfig;
//! use nutrition_coach::nutrition_analyzer::NutritionAnalyzer;
//! use nutrition_coach::pipeline::local_now;
//!
//! # async fn run() {
//! let analyzer = NutritionAnalyzer::from_config(&AiConfig::default());
//! let analysis = analyzer.analyze_message("2 ouă și 100g piept de pui", local_now(), None).await;
//! println!("{:?}: {} entries", analysis.source, analysis.value.len());
//! # }
//! ```

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::ai_errors::AnalyzerError;
use crate::ai_response::{
    food_list_prompt, macro_estimate_prompt, nutrition_facts_prompt, parse_food_list,
    parse_macro_estimate, parse_nutrition_facts, AiFood,
};
use crate::circuit_breaker::CircuitBreaker;
use crate::config::{AiConfig, RecoveryConfig};
use crate::llm_client::{ChatCompletionsClient, TextGenerator};
use crate::meal_time::meal_time_at;
use crate::nutrition_estimator::{estimate_macros_from_calories, estimate_nutrition_from_description};
use crate::nutrition_model::{JournalEntryCandidate, MacroEstimate, MealTime, NutritionFacts};
use crate::pipeline::JournalPipeline;

/// Where a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NutritionSource {
    /// Parsed from the text-generation service's reply
    Ai,
    /// Computed by the deterministic estimators
    Estimated,
}

/// A result together with its source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis<T> {
    pub value: T,
    pub source: NutritionSource,
}

impl<T> Analysis<T> {
    fn ai(value: T) -> Self {
        Self {
            value,
            source: NutritionSource::Ai,
        }
    }

    fn estimated(value: T) -> Self {
        Self {
            value,
            source: NutritionSource::Estimated,
        }
    }
}

/// AI-first nutrition analysis with deterministic fallback
#[derive(Debug)]
pub struct NutritionAnalyzer<G> {
    generator: Option<G>,
    circuit_breaker: CircuitBreaker,
    pipeline: JournalPipeline,
}

impl NutritionAnalyzer<ChatCompletionsClient> {
    /// Build an analyzer backed by the chat-completions client
    ///
    /// Without an API key the analyzer runs on the estimators alone.
    pub fn from_config(config: &AiConfig) -> Self {
        let generator = if config.is_enabled() {
            match ChatCompletionsClient::new(config.clone()) {
                Ok(client) => Some(client),
                Err(e) => {
                    warn!(error = %e, "Text generation disabled");
                    None
                }
            }
        } else {
            info!("No API key configured, using estimators only");
            None
        };

        Self {
            generator,
            circuit_breaker: CircuitBreaker::new(config.recovery.clone()),
            pipeline: JournalPipeline::new(),
        }
    }
}

impl<G: TextGenerator> NutritionAnalyzer<G> {
    /// Create an analyzer around `generator`
    pub fn new(generator: G, recovery: RecoveryConfig) -> Self {
        Self {
            generator: Some(generator),
            circuit_breaker: CircuitBreaker::new(recovery),
            pipeline: JournalPipeline::new(),
        }
    }

    /// Create an analyzer that never calls a generator
    pub fn estimators_only() -> Self {
        Self {
            generator: None,
            circuit_breaker: CircuitBreaker::new(RecoveryConfig::default()),
            pipeline: JournalPipeline::new(),
        }
    }

    /// Replace the fallback pipeline
    pub fn with_pipeline(mut self, pipeline: JournalPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// The generator, if one is configured
    pub fn generator(&self) -> Option<&G> {
        self.generator.as_ref()
    }

    /// The breaker guarding generator calls
    pub fn circuit_breaker(&self) -> &CircuitBreaker {
        &self.circuit_breaker
    }

    async fn ask(&self, prompt: &str) -> Result<String, AnalyzerError> {
        let generator = self
            .generator
            .as_ref()
            .ok_or_else(|| AnalyzerError::Configuration("No text generator configured".to_string()))?;

        if self.circuit_breaker.is_open() {
            return Err(AnalyzerError::CircuitOpen(format!(
                "{} consecutive failures",
                self.circuit_breaker.failure_count()
            )));
        }

        match generator.generate(prompt).await {
            Ok(reply) => {
                self.circuit_breaker.record_success();
                Ok(reply)
            }
            Err(e) => {
                self.circuit_breaker.record_failure();
                Err(e)
            }
        }
    }

    /// Journal entry candidates for a chat message
    ///
    /// An explicit `meal_time` wins over one named by the service, which wins
    /// over the clock.
    pub async fn analyze_message(
        &self,
        text: &str,
        now: NaiveDateTime,
        meal_time: Option<MealTime>,
    ) -> Analysis<Vec<JournalEntryCandidate>> {
        match self.ask(&food_list_prompt(text)).await {
            Ok(reply) => match parse_food_list(&reply) {
                Some(foods) => {
                    let entries: Vec<JournalEntryCandidate> = foods
                        .iter()
                        .map(|food| candidate_from_ai_food(food, now, meal_time))
                        .collect();
                    info!(count = entries.len(), source = "ai", "Analyzed message");
                    return Analysis::ai(entries);
                }
                None => warn!(reply_len = reply.len(), "Unusable food list reply, falling back"),
            },
            Err(e) => debug!(error = %e, "Food list unavailable, falling back"),
        }

        let entries = self.pipeline.candidates_from_message(text, now, meal_time);
        info!(count = entries.len(), source = "estimated", "Analyzed message");
        Analysis::estimated(entries)
    }

    /// Nutrition totals for a free-text food description
    pub async fn estimate_description(&self, description: &str) -> Analysis<NutritionFacts> {
        match self.ask(&nutrition_facts_prompt(description)).await {
            Ok(reply) => match parse_nutrition_facts(&reply, description) {
                Some(facts) => return Analysis::ai(facts),
                None => warn!(description, "Unusable nutrition reply, falling back"),
            },
            Err(e) => debug!(error = %e, "Nutrition estimate unavailable, falling back"),
        }
        Analysis::estimated(estimate_nutrition_from_description(description))
    }

    /// Macro split for a food with a known calorie total
    pub async fn estimate_macros(&self, food_name: &str, calories: u32) -> Analysis<MacroEstimate> {
        match self.ask(&macro_estimate_prompt(food_name, calories)).await {
            Ok(reply) => match parse_macro_estimate(&reply) {
                Some(macros) => return Analysis::ai(macros),
                None => warn!(food_name, "Unusable macro reply, falling back"),
            },
            Err(e) => debug!(error = %e, "Macro estimate unavailable, falling back"),
        }
        Analysis::estimated(estimate_macros_from_calories(food_name, f64::from(calories)))
    }
}

fn candidate_from_ai_food(
    food: &AiFood,
    now: NaiveDateTime,
    meal_time: Option<MealTime>,
) -> JournalEntryCandidate {
    let meal_time = meal_time
        .or(food.meal_time)
        .unwrap_or_else(|| meal_time_at(&now));
    JournalEntryCandidate::new(&food.name, food.calories, now.date())
        .with_macros(food.macros())
        .with_meal_time(meal_time)
}
