/// LLM Client: the single point of entry for all assessment-oracle calls.
///
/// ARCHITECTURAL RULE: No other module may call the chat-completion API directly.
/// Callers depend on the `AssessmentOracle` trait so tests can substitute a stub.
///
/// One request per call. Failures are returned to the caller, which substitutes
/// its neutral default; there is no retry loop.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;
pub mod reply;

pub const DEFAULT_API_URL: &str = "https://ark.cn-beijing.volces.com/api/v3/chat/completions";
pub const DEFAULT_MODEL: &str = "doubao-1-5-pro-32k-250115";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM call timed out after {0:?}")]
    Timeout(Duration),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Given a prompt, returns the model's free-text reply.
#[async_trait]
pub trait AssessmentOracle: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Extracts the text content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Chat-completion client for an OpenAI-compatible endpoint (Doubao / Volcengine Ark by default).
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(api_url: String, api_key: String, model: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            api_url,
            api_key,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl AssessmentOracle for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("LLM API returned {}: {}", status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await?;
        if let Some(usage) = &chat.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        chat.text().map(str::to_string).ok_or(LlmError::EmptyContent)
    }
}

#[cfg(test)]
pub mod testing {
    //! Oracle stubs shared by unit tests across modules.

    use super::*;

    /// Always replies with the same text.
    pub struct FixedOracle(pub String);

    #[async_trait]
    impl AssessmentOracle for FixedOracle {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            Ok(self.0.clone())
        }
    }

    /// Always fails as if the endpoint returned a server error.
    pub struct FailingOracle;

    #[async_trait]
    impl AssessmentOracle for FailingOracle {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
        }
    }

    /// Never answers.
    pub struct HangingOracle;

    #[async_trait]
    impl AssessmentOracle for HangingOracle {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            std::future::pending().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_response_text_first_choice() {
        let json = r#"{
            "choices": [{"message": {"role": "assistant", "content": "hello"}}],
            "usage": {"prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4}
        }"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some("hello"));
        assert_eq!(response.usage.unwrap().completion_tokens, 1);
    }

    #[test]
    fn test_chat_response_blank_content_is_none() {
        let json = r#"{"choices": [{"message": {"content": "   "}}]}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), None);
    }

    #[test]
    fn test_chat_response_without_choices_is_none() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_api_error_body_parses() {
        let body = r#"{"error": {"message": "invalid api key", "code": "401"}}"#;
        let parsed: ApiError = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.message, "invalid api key");
    }
}
