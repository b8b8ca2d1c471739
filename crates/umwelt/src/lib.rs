//! # Umwelt
//!
//! A perceiving agent's world, simulated and drawn three ways.
//!
//! A point drifts through a 300×200 world. A species profile decides how
//! often the agent samples it, how many samples it integrates, and how its
//! attention weight falls off with sample age. The result is rendered as
//! what is really there, what the agent has integrated, and where its
//! attention goes.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::ops::ControlFlow;
//! use umwelt::prelude::*;
//!
//! let mut umwelt = Umwelt::new();
//! umwelt.select_preset("housefly").unwrap();
//!
//! let mut surfaces = Surfaces::new();
//! FrameLoop::new(SteppedClock::default()).run(&mut umwelt, 120, |u, _| {
//!     surfaces.render(u);
//!     ControlFlow::Continue(())
//! });
//!
//! let stats = umwelt.stats();
//! assert!(stats.history_len <= HISTORY_CAPACITY);
//! assert!((0.0..=100.0).contains(&stats.transparency));
//! ```
//!
//! ## Architecture
//!
//! - [`umwelt_core`] - Species profiles, colors, request state, shared types
//! - [`umwelt_runtime`] - World motion, sampling, transparency, frame loop
//! - [`umwelt_render`] - Reality, model and attention rasters
//! - `umwelt_llm` - Insight requests (requires an `llm*` feature)
//!
//! ## Species Presets
//!
//! | Preset | Sampling | Window | Attention bias |
//! |--------|----------|--------|----------------|
//! | Human | 24 Hz | 30 | 0.70 |
//! | Housefly | 240 Hz | 8 | 0.95 |
//! | Pigeon | 100 Hz | 15 | 0.85 |
//! | Tortoise | 4 Hz | 50 | 0.20 |

// Re-export all subcrates
pub use umwelt_core as core;
pub use umwelt_runtime as runtime;
pub use umwelt_render as render;

#[cfg(feature = "llm")]
pub use umwelt_llm as llm;

/// Prelude module for convenient imports.
///
/// ```rust
/// use umwelt::prelude::*;
/// ```
pub mod prelude {
    pub use umwelt_core::prelude::*;

    // Runtime
    pub use umwelt_runtime::{
        FrameClock, FrameLoop, SteppedClock, SystemClock,
        StepReport, Umwelt, UmweltConfig, UmweltSnapshot, UmweltStats,
    };

    // Rendering
    pub use umwelt_render::{encode_png, Canvas, RenderError, Surfaces};

    // LLM integration (requires "llm" feature)
    #[cfg(feature = "llm")]
    pub use umwelt_llm::{
        InsightPrompt, InsightRequester, LlmBackend, LlmConfig, LlmError, LlmResult,
        MockBackend, PromptTemplate, ReasoningEffort,
    };

    #[cfg(feature = "llm-local")]
    pub use umwelt_llm::OllamaBackend;

    #[cfg(feature = "llm-api")]
    pub use umwelt_llm::{ClaudeBackend, OpenAiBackend};
}
