//! # AI Error Types Module
//!
//! Error types for calls to the text-generation service. The deterministic
//! estimators never produce these; they only describe why an AI estimate was
//! unavailable before the analyzer fell back.

/// Custom error types for text-generation operations
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzerError {
    /// Missing or invalid client configuration (e.g. no API key)
    Configuration(String),
    /// Transport or HTTP status errors
    Request(String),
    /// The call did not finish within the configured timeout
    Timeout(String),
    /// The service answered with something that could not be used
    InvalidResponse(String),
    /// The circuit breaker is open and calls are being skipped
    CircuitOpen(String),
}

impl std::fmt::Display for AnalyzerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyzerError::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            AnalyzerError::Request(msg) => write!(f, "Request error: {msg}"),
            AnalyzerError::Timeout(msg) => write!(f, "Timeout error: {msg}"),
            AnalyzerError::InvalidResponse(msg) => write!(f, "Invalid response: {msg}"),
            AnalyzerError::CircuitOpen(msg) => write!(f, "Circuit open: {msg}"),
        }
    }
}

impl std::error::Error for AnalyzerError {}

impl From<anyhow::Error> for AnalyzerError {
    fn from(err: anyhow::Error) -> Self {
        AnalyzerError::Request(err.to_string())
    }
}

impl From<reqwest::Error> for AnalyzerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AnalyzerError::Timeout(err.to_string())
        } else if err.is_decode() {
            AnalyzerError::InvalidResponse(err.to_string())
        } else {
            AnalyzerError::Request(err.to_string())
        }
    }
}

impl AnalyzerError {
    /// Whether a retry may succeed where this attempt failed
    pub fn is_retryable(&self) -> bool {
        matches!(self, AnalyzerError::Request(_) | AnalyzerError::Timeout(_))
    }
}
