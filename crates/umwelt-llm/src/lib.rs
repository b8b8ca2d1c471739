//! # Umwelt LLM
//!
//! Generative-text commentary on an Umwelt's perception parameters.
//!
//! One request per user trigger, never more than one outstanding. The
//! prompt embeds the species, sampling rate, integration window, attention
//! bias and transparency index, plus four fixed questions.
//!
//! ## Features
//!
//! - `api`: Cloud API backends (Claude, OpenAI)
//! - `local`: Local backends (Ollama)
//! - `full`: All backends
//!
//! Without any feature only [`MockBackend`] is available.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use umwelt_llm::{ClaudeBackend, InsightRequester};
//!
//! let requester = InsightRequester::new(Arc::new(ClaudeBackend::from_env()?));
//! let text = requester.request(umwelt.insight_snapshot()).await?;
//! ```

mod backend;
mod prompt;
mod requester;
mod types;

pub use backend::{LlmBackend, LlmConfig, LlmError, LlmResult, MockBackend};
pub use prompt::{InsightPrompt, PromptTemplate, INSIGHT_QUESTIONS};
pub use requester::{request_insight, InsightRequester};
pub use types::ReasoningEffort;

#[cfg(feature = "local")]
mod ollama;
#[cfg(feature = "local")]
pub use ollama::{OllamaBackend, DEFAULT_OLLAMA_URL};

#[cfg(feature = "api")]
mod claude;
#[cfg(feature = "api")]
pub use claude::ClaudeBackend;

#[cfg(feature = "api")]
mod openai;
#[cfg(feature = "api")]
pub use openai::{is_reasoning_model, OpenAiBackend};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{InsightPrompt, InsightRequester, PromptTemplate};
    pub use crate::{LlmBackend, LlmConfig, LlmError, LlmResult, MockBackend};
    pub use crate::ReasoningEffort;

    #[cfg(feature = "local")]
    pub use crate::OllamaBackend;

    #[cfg(feature = "api")]
    pub use crate::{ClaudeBackend, OpenAiBackend};
}
