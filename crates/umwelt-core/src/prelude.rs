//! Umwelt Core Prelude - convenient imports for common usage.
//!
//! ```rust
//! use umwelt_core::prelude::*;
//! ```

pub use crate::types::{
    Position, HistorySample, InsightSnapshot,
    Millis, Frame,
    HISTORY_CAPACITY, WORLD_WIDTH, WORLD_HEIGHT,
};

pub use crate::color::Rgba;

pub use crate::species::{SpeciesProfile, ProfileOverrides, PRESET_NAMES};

pub use crate::prng::Prng;

pub use crate::insight::{
    InsightState, RequestId, InsightOutcome,
    EMPTY_RESPONSE_TEXT, FALLBACK_TEXT,
};

pub use crate::error::{UmweltError, ProfileError, InsightError, Result};
