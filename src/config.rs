//! # Configuration Module
//!
//! Configuration structures for the text-generation client, its recovery
//! behaviour and the application as a whole.

use std::env;

use crate::food_types::{ExtractionConfig, OverlapPolicy};

// Constants for AI configuration
pub const DEFAULT_AI_ENDPOINT: &str = "https://api.perplexity.ai/chat/completions";
pub const DEFAULT_AI_MODEL: &str = "sonar";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_MAX_TOKENS: u32 = 500;

// Environment variable names
pub const ENV_API_KEY: &str = "PERPLEXITY_API_KEY";
pub const ENV_AI_ENDPOINT: &str = "NUTRITION_AI_ENDPOINT";
pub const ENV_AI_MODEL: &str = "NUTRITION_AI_MODEL";
pub const ENV_OVERLAP_POLICY: &str = "NUTRITION_OVERLAP_POLICY";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

/// Recovery configuration for text-generation calls
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Base delay between retries in milliseconds
    pub base_retry_delay_ms: u64,
    /// Maximum delay between retries in milliseconds
    pub max_retry_delay_ms: u64,
    /// Upper bound of the random jitter added to each delay, in milliseconds
    pub retry_jitter_ms: u64,
    /// Timeout for one request in seconds
    pub operation_timeout_secs: u64,
    /// Circuit breaker failure threshold
    pub circuit_breaker_threshold: u32,
    /// Circuit breaker reset timeout in seconds
    pub circuit_breaker_reset_secs: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_retry_delay_ms: 500,
            max_retry_delay_ms: 5000,
            retry_jitter_ms: 250,
            operation_timeout_secs: 30,
            circuit_breaker_threshold: 5,
            circuit_breaker_reset_secs: 60, // 1 minute
        }
    }
}

impl RecoveryConfig {
    /// Delay before retry number `attempt` (0-based), without jitter
    pub fn backoff_delay_ms(&self, attempt: u32) -> u64 {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        self.base_retry_delay_ms
            .saturating_mul(factor)
            .min(self.max_retry_delay_ms)
    }
}

/// Configuration of the OpenAI-compatible chat-completions client
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Full URL of the chat-completions endpoint
    pub endpoint: String,
    /// Model name sent with every request
    pub model: String,
    /// Bearer token; without one the AI path is disabled
    pub api_key: Option<String>,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens in the reply
    pub max_tokens: u32,
    /// Retry, timeout and circuit breaker settings
    pub recovery: RecoveryConfig,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_AI_ENDPOINT.to_string(),
            model: DEFAULT_AI_MODEL.to_string(),
            api_key: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            recovery: RecoveryConfig::default(),
        }
    }
}

impl AiConfig {
    /// Whether an API key is configured
    pub fn is_enabled(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Application configuration assembled from the environment
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub ai: AiConfig,
    pub extraction: ExtractionConfig,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    ///
    /// Unset or unparsable values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.ai.api_key = lookup(ENV_API_KEY).filter(|key| !key.trim().is_empty());
        if let Some(endpoint) = lookup(ENV_AI_ENDPOINT) {
            config.ai.endpoint = endpoint;
        }
        if let Some(model) = lookup(ENV_AI_MODEL) {
            config.ai.model = model;
        }
        if let Some(policy) = lookup(ENV_OVERLAP_POLICY).and_then(|p| OverlapPolicy::from_name(&p)) {
            config.extraction.overlap_policy = policy;
        }
        if lookup(ENV_LOG_FORMAT).is_some_and(|f| f.eq_ignore_ascii_case("json")) {
            config.log_format = LogFormat::Json;
        }

        config
    }
}
