//! # Nutrition Coach
//!
//! Turns Romanian free-text food messages into nutrition journal entry
//! candidates: regex food detection, calorie arithmetic, macro splitting by
//! food category and meal-time classification, with an optional AI-backed
//! analyzer that falls back to the deterministic estimators.

pub mod ai_errors;
pub mod ai_response;
pub mod circuit_breaker;
pub mod config;
pub mod food_catalog;
pub mod food_patterns;
pub mod food_types;
pub mod journal_summary;
pub mod llm_client;
pub mod meal_time;
pub mod nutrition_analyzer;
pub mod nutrition_estimator;
pub mod nutrition_model;
pub mod pipeline;
pub mod text_processing;
