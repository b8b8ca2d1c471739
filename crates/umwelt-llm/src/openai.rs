//! OpenAI backend for chat-completion models.
//!
//! Requires the `api` feature and an OpenAI API key. Reasoning models
//! (o-series, gpt-5) receive `reasoning_effort`; others get a temperature.

use crate::backend::{LlmBackend, LlmConfig, LlmError, LlmResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI API request.
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning_effort: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

/// OpenAI API response.
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

/// Whether `model` accepts `reasoning_effort`.
pub fn is_reasoning_model(model: &str) -> bool {
    let m = model.to_ascii_lowercase();
    ["o1", "o3", "o4", "gpt-5"].iter().any(|p| m.starts_with(p))
}

/// OpenAI backend for chat-completion models.
///
/// # Example
///
/// ```rust,ignore
/// use umwelt_llm::{OpenAiBackend, LlmBackend};
///
/// let backend = OpenAiBackend::from_env()?;
/// let text = backend.complete("Describe a tortoise's world").await?;
/// ```
pub struct OpenAiBackend {
    api_key: String,
    config: LlmConfig,
    client: reqwest::Client,
    endpoint: String,
}

impl OpenAiBackend {
    /// Create a new OpenAI backend.
    pub fn new(api_key: &str) -> LlmResult<Self> {
        Self::with_config(api_key, LlmConfig::openai())
    }

    /// Create with custom config.
    pub fn with_config(api_key: &str, config: LlmConfig) -> LlmResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| LlmError::ConnectionFailed(format!("HTTP client: {}", e)))?;

        Ok(Self {
            api_key: api_key.to_string(),
            config,
            client,
            endpoint: OPENAI_API_URL.to_string(),
        })
    }

    /// Create from the `OPENAI_API_KEY` environment variable.
    pub fn from_env_with_config(config: LlmConfig) -> LlmResult<Self> {
        let api_key =
            std::env::var("OPENAI_API_KEY").map_err(|_| LlmError::AuthenticationFailed)?;
        Self::with_config(&api_key, config)
    }

    /// Create from environment variable with the default config.
    pub fn from_env() -> LlmResult<Self> {
        Self::from_env_with_config(LlmConfig::openai())
    }

    /// Set the model.
    pub fn with_model(mut self, model: &str) -> Self {
        self.config.model = model.to_string();
        self
    }

    /// Use a custom endpoint (for Azure OpenAI or compatible APIs).
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    fn build_request(&self, prompt: &str, system: Option<&str>) -> OpenAiRequest {
        let mut messages = Vec::new();

        if let Some(sys) = system {
            messages.push(OpenAiMessage {
                role: "system".to_string(),
                content: sys.to_string(),
            });
        }

        messages.push(OpenAiMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        });

        if is_reasoning_model(&self.config.model) {
            OpenAiRequest {
                model: self.config.model.clone(),
                messages,
                max_tokens: None,
                // Reasoning tokens are billed inside the completion budget.
                max_completion_tokens: Some(
                    self.config.max_tokens + self.config.reasoning_effort.thinking_budget(),
                ),
                temperature: None,
                reasoning_effort: Some(self.config.reasoning_effort.as_str()),
            }
        } else {
            OpenAiRequest {
                model: self.config.model.clone(),
                messages,
                max_tokens: Some(self.config.max_tokens),
                max_completion_tokens: None,
                temperature: Some(self.config.temperature),
                reasoning_effort: None,
            }
        }
    }

    /// Make a request to OpenAI API.
    async fn request(&self, prompt: &str, system: Option<&str>) -> LlmResult<String> {
        let request = self.build_request(prompt, system);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    LlmError::ConnectionFailed("Cannot connect to OpenAI API".to_string())
                } else if e.is_timeout() {
                    LlmError::Timeout(self.config.timeout_secs)
                } else {
                    LlmError::ApiError(e.to_string())
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            match status.as_u16() {
                401 => return Err(LlmError::AuthenticationFailed),
                429 => return Err(LlmError::RateLimited(60)),
                404 => return Err(LlmError::ModelNotFound(self.config.model.clone())),
                _ => {}
            }

            let detail = serde_json::from_str::<OpenAiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            return Err(LlmError::ApiError(format!(
                "OpenAI API error {}: {}",
                status, detail
            )));
        }

        let resp: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        first_choice_text(resp)
    }
}

fn first_choice_text(resp: OpenAiResponse) -> LlmResult<String> {
    resp.choices
        .into_iter()
        .next()
        .map(|c| c.message.content.unwrap_or_default())
        .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    async fn complete_with_system(&self, prompt: &str, system: Option<&str>) -> LlmResult<String> {
        self.request(prompt, system).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReasoningEffort;

    #[test]
    fn test_reasoning_model_detection() {
        assert!(is_reasoning_model("o4-mini"));
        assert!(is_reasoning_model("o3"));
        assert!(is_reasoning_model("gpt-5-mini"));
        assert!(!is_reasoning_model("gpt-4o"));
    }

    #[test]
    fn test_reasoning_request_shape() {
        let config = LlmConfig::openai().with_reasoning_effort(ReasoningEffort::High);
        let backend = OpenAiBackend::with_config("key", config).unwrap();
        let body = serde_json::to_value(backend.build_request("hi", Some("sys"))).unwrap();

        assert_eq!(body["reasoning_effort"], "high");
        assert!(body.get("temperature").is_none());
        assert!(body.get("max_tokens").is_none());
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
    }

    #[test]
    fn test_chat_request_shape() {
        let backend = OpenAiBackend::new("key").unwrap().with_model("gpt-4o-mini");
        let body = serde_json::to_value(backend.build_request("hi", None)).unwrap();

        assert!(body.get("reasoning_effort").is_none());
        assert_eq!(body["max_tokens"], 1024);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_null_content_is_empty_text() {
        let resp: OpenAiResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert_eq!(first_choice_text(resp).unwrap(), "");

        let none: OpenAiResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(first_choice_text(none), Err(LlmError::InvalidResponse(_))));
    }
}
