//! # Text-Generation Client
//!
//! The [`TextGenerator`] seam used by the analyzer, and its production
//! implementation: an OpenAI-compatible chat-completions client with bearer
//! authentication, per-attempt timeouts and exponential backoff with jitter.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ai_errors::AnalyzerError;
use crate::config::AiConfig;

/// System message sent ahead of every prompt
pub const SYSTEM_PROMPT: &str =
    "Ești un expert nutriționist care calculează valori nutriționale precise. Răspunzi DOAR cu JSON valid.";

/// Anything that can turn a prompt into a text reply
pub trait TextGenerator {
    /// Generate a reply for `prompt`
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, AnalyzerError>> + Send;
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    #[serde(default)]
    content: String,
}

/// OpenAI-compatible chat-completions client
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    client: reqwest::Client,
    config: AiConfig,
    api_key: String,
}

impl ChatCompletionsClient {
    /// Create a client; fails without an API key
    pub fn new(config: AiConfig) -> Result<Self, AnalyzerError> {
        let api_key = match config.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => {
                return Err(AnalyzerError::Configuration(
                    "API key is not set".to_string(),
                ))
            }
        };
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AnalyzerError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    fn build_request(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }

    fn retry_delay(&self, attempt: u32) -> Duration {
        let recovery = &self.config.recovery;
        let jitter = if recovery.retry_jitter_ms > 0 {
            rand::thread_rng().gen_range(0..=recovery.retry_jitter_ms)
        } else {
            0
        };
        Duration::from_millis(recovery.backoff_delay_ms(attempt) + jitter)
    }

    async fn send_once(&self, request: &ChatRequest) -> Result<String, AnalyzerError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let chat: ChatResponse = response.json().await?;
        chat.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AnalyzerError::InvalidResponse("No content in response choices".to_string()))
    }

    async fn generate_with_retry(&self, prompt: &str) -> Result<String, AnalyzerError> {
        let request = self.build_request(prompt);
        let recovery = &self.config.recovery;
        let timeout = Duration::from_secs(recovery.operation_timeout_secs);
        let mut attempt = 0;

        loop {
            let result = match tokio::time::timeout(timeout, self.send_once(&request)).await {
                Ok(result) => result,
                Err(_) => Err(AnalyzerError::Timeout(format!(
                    "No reply within {}s",
                    recovery.operation_timeout_secs
                ))),
            };

            match result {
                Ok(content) => {
                    debug!(attempt, chars = content.len(), "Text generation succeeded");
                    return Ok(content);
                }
                Err(e) if e.is_retryable() && attempt < recovery.max_retries => {
                    let delay = self.retry_delay(attempt);
                    let delay_ms = delay.as_millis() as u64;
                    warn!(attempt, error = %e, delay_ms, "Text generation failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl TextGenerator for ChatCompletionsClient {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, AnalyzerError>> + Send {
        self.generate_with_retry(prompt)
    }
}

fn status_error(status: reqwest::StatusCode, body: &str) -> AnalyzerError {
    let message = format!("HTTP {status}: {body}");
    if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        AnalyzerError::Request(message)
    } else if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        AnalyzerError::Configuration(message)
    } else {
        AnalyzerError::InvalidResponse(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecoveryConfig;

    fn config_with_key() -> AiConfig {
        AiConfig {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_requires_api_key() {
        let err = ChatCompletionsClient::new(AiConfig::default()).unwrap_err();
        assert!(matches!(err, AnalyzerError::Configuration(_)));

        let blank = AiConfig {
            api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(ChatCompletionsClient::new(blank).is_err());
        assert!(ChatCompletionsClient::new(config_with_key()).is_ok());
    }

    #[test]
    fn test_request_body() {
        let client = ChatCompletionsClient::new(config_with_key()).unwrap();
        let body = serde_json::to_value(client.build_request("2 ouă")).unwrap();

        assert_eq!(body["model"], "sonar");
        assert_eq!(body["max_tokens"], 500);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "2 ouă");
    }

    #[test]
    fn test_response_body() {
        let raw = r#"{"id": "x", "choices": [{"index": 0, "message": {"role": "assistant", "content": "{\"foods\": []}"}}]}"#;
        let chat: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(chat.choices[0].message.content, "{\"foods\": []}");

        let empty: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.choices.is_empty());
    }

    #[test]
    fn test_retry_delay_bounds() {
        let config = AiConfig {
            recovery: RecoveryConfig {
                base_retry_delay_ms: 100,
                max_retry_delay_ms: 1000,
                retry_jitter_ms: 50,
                ..Default::default()
            },
            ..config_with_key()
        };
        let client = ChatCompletionsClient::new(config).unwrap();

        for attempt in 0..8 {
            let delay = client.retry_delay(attempt).as_millis() as u64;
            let base = 100u64.saturating_mul(1 << attempt).min(1000);
            assert!(delay >= base && delay <= base + 50, "attempt {attempt}: {delay}ms");
        }
    }

    #[test]
    fn test_status_errors() {
        let err = status_error(reqwest::StatusCode::SERVICE_UNAVAILABLE, "busy");
        assert!(err.is_retryable());

        let err = status_error(reqwest::StatusCode::TOO_MANY_REQUESTS, "");
        assert!(err.is_retryable());

        let err = status_error(reqwest::StatusCode::UNAUTHORIZED, "bad key");
        assert!(matches!(err, AnalyzerError::Configuration(_)));

        let err = status_error(reqwest::StatusCode::BAD_REQUEST, "");
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_fails() {
        let config = AiConfig {
            endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            recovery: RecoveryConfig {
                max_retries: 0,
                operation_timeout_secs: 5,
                ..Default::default()
            },
            ..config_with_key()
        };
        let client = ChatCompletionsClient::new(config).unwrap();

        let result = client.generate("2 ouă").await;
        assert!(matches!(
            result,
            Err(AnalyzerError::Request(_)) | Err(AnalyzerError::Timeout(_))
        ));
    }
}
