//! Core LLM backend trait.

use crate::types::ReasoningEffort;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;

/// LLM-related errors.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Rate limited: retry after {0} seconds")]
    RateLimited(u32),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Timeout after {0} seconds")]
    Timeout(u32),
}

/// Result type for LLM operations.
pub type LlmResult<T> = Result<T, LlmError>;

/// Configuration for LLM requests.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Model name/identifier.
    pub model: String,
    /// Maximum tokens of visible output.
    pub max_tokens: u32,
    /// Temperature (ignored by backends while reasoning is enabled).
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u32,
    /// Hidden reasoning budget.
    pub reasoning_effort: ReasoningEffort,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "default".to_string(),
            max_tokens: 1024,
            temperature: 0.7,
            timeout_secs: 30,
            reasoning_effort: ReasoningEffort::Low,
        }
    }
}

impl LlmConfig {
    /// Create config for Claude.
    pub fn claude() -> Self {
        Self {
            model: "claude-3-7-sonnet-20250219".to_string(),
            ..Self::default()
        }
    }

    /// Create config for OpenAI.
    pub fn openai() -> Self {
        Self {
            model: "o4-mini".to_string(),
            ..Self::default()
        }
    }

    /// Create config for Ollama.
    pub fn ollama() -> Self {
        Self {
            model: "llama3.2".to_string(),
            timeout_secs: 60, // Local models can be slower
            ..Self::default()
        }
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set max tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    /// Set timeout.
    pub fn with_timeout(mut self, timeout_secs: u32) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the reasoning effort.
    pub fn with_reasoning_effort(mut self, effort: ReasoningEffort) -> Self {
        self.reasoning_effort = effort;
        self
    }
}

/// A generative-text provider.
///
/// One call in, one body of text out. An empty body is a valid answer;
/// deciding what to show for it is the caller's business.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Get the backend name.
    fn name(&self) -> &str;

    /// Get the current configuration.
    fn config(&self) -> &LlmConfig;

    /// Generate a completion with an optional system prompt.
    async fn complete_with_system(&self, prompt: &str, system: Option<&str>) -> LlmResult<String>;

    /// Generate a completion for a prompt.
    async fn complete(&self, prompt: &str) -> LlmResult<String> {
        self.complete_with_system(prompt, None).await
    }

    /// Check if the backend is available.
    async fn health_check(&self) -> LlmResult<bool> {
        match self.complete("ping").await {
            Ok(_) => Ok(true),
            Err(LlmError::ConnectionFailed(_)) | Err(LlmError::AuthenticationFailed) => Ok(false),
            Err(_) => Ok(true),
        }
    }
}

/// A mock backend for testing and offline runs.
pub struct MockBackend {
    config: LlmConfig,
    response: String,
    fail: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockBackend {
    /// Create a new mock backend that answers with a fixed reflection.
    pub fn new() -> Self {
        Self {
            config: LlmConfig::default().with_model("mock"),
            response: "Mock response".to_string(),
            fail: false,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Answer every prompt with `response`.
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Fail every call with a connection error.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Wait before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many completions have been requested.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    async fn complete_with_system(&self, _prompt: &str, _system: Option<&str>) -> LlmResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(LlmError::ConnectionFailed("mock backend is offline".to_string()));
        }
        Ok(self.response.clone())
    }
}
