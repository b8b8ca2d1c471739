//! # Umwelt Render
//!
//! Software rasterization of the three linked views:
//!
//! - **Reality** - where the point actually is
//! - **Model** - the agent's integrated trail of recent samples
//! - **Attention** - the causal attention matrix over the history
//!
//! Every draw clears its canvas first, so rendering the same state twice
//! produces identical pixels.

pub mod canvas;
pub mod views;

pub use canvas::{encode_png, Canvas, RenderError};
pub use views::{
    draw_attention, draw_model, draw_reality, Surfaces, ATTENTION_SIZE, BACKGROUND, VIEW_HEIGHT,
    VIEW_WIDTH,
};
