//! Claude backend for Anthropic API.
//!
//! Requires the `api` feature and an Anthropic API key. Reasoning effort
//! maps to an extended-thinking token budget.

use crate::backend::{LlmBackend, LlmConfig, LlmError, LlmResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Claude API request.
#[derive(Debug, Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<ClaudeMessage>,
    thinking: ClaudeThinking,
}

#[derive(Debug, Serialize)]
struct ClaudeMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ClaudeThinking {
    #[serde(rename = "type")]
    kind: &'static str,
    budget_tokens: u32,
}

/// Claude API response.
#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    content: Vec<ClaudeContent>,
}

/// One content block; thinking blocks carry no `text`.
#[derive(Debug, Deserialize)]
struct ClaudeContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClaudeError {
    error: ClaudeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ClaudeErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: String,
}

/// Claude backend for Anthropic API.
///
/// # Example
///
/// ```rust,ignore
/// use umwelt_llm::{ClaudeBackend, LlmBackend};
///
/// let backend = ClaudeBackend::from_env()?;
/// let text = backend.complete("Describe a housefly's world").await?;
/// ```
pub struct ClaudeBackend {
    api_key: String,
    config: LlmConfig,
    client: reqwest::Client,
}

impl ClaudeBackend {
    /// Create a new Claude backend.
    pub fn new(api_key: &str) -> LlmResult<Self> {
        Self::with_config(api_key, LlmConfig::claude())
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
        })
    }

    /// Create from the `ANTHROPIC_API_KEY` environment variable.
    pub fn from_env_with_config(config: LlmConfig) -> LlmResult<Self> {
        let api_key =
            std::env::var("ANTHROPIC_API_KEY").map_err(|_| LlmError::AuthenticationFailed)?;
        Self::with_config(&api_key, config)
    }

    /// Create from environment variable with the default config.
    pub fn from_env() -> LlmResult<Self> {
        Self::from_env_with_config(LlmConfig::claude())
    }

    /// Set the model.
    pub fn with_model(mut self, model: &str) -> Self {
        self.config.model = model.to_string();
        self
    }

    fn build_request(&self, prompt: &str, system: Option<&str>) -> ClaudeRequest {
        let budget = self.config.reasoning_effort.thinking_budget();
        ClaudeRequest {
            model: self.config.model.clone(),
            // The thinking budget counts against max_tokens.
            max_tokens: budget + self.config.max_tokens,
            system: system.map(|s| s.to_string()),
            messages: vec![ClaudeMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            thinking: ClaudeThinking {
                kind: "enabled",
                budget_tokens: budget,
            },
        }
    }

    /// Make a request to Claude API.
    async fn request(&self, prompt: &str, system: Option<&str>) -> LlmResult<String> {
        let request = self.build_request(prompt, system);

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    LlmError::ConnectionFailed("Cannot connect to Anthropic API".to_string())
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

            if let Ok(error) = serde_json::from_str::<ClaudeError>(&body) {
                return Err(LlmError::ApiError(format!(
                    "Claude API error {} ({}): {}",
                    status, error.error.error_type, error.error.message
                )));
            }

            return Err(LlmError::ApiError(format!(
                "Claude API error {}: {}",
                status, body
            )));
        }

        let resp: ClaudeResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        Ok(collect_text(&resp))
    }
}

// Concatenate the visible text blocks; thinking blocks are dropped.
fn collect_text(resp: &ClaudeResponse) -> String {
    resp.content
        .iter()
        .filter(|c| c.kind == "text")
        .filter_map(|c| c.text.as_deref())
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl LlmBackend for ClaudeBackend {
    fn name(&self) -> &str {
        "claude"
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    async fn complete_with_system(&self, prompt: &str, system: Option<&str>) -> LlmResult<String> {
        self.request(prompt, system).await
    }
}
