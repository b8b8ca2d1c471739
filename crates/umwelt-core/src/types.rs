//! Shared types used across all Umwelt crates.

use serde::{Deserialize, Serialize};

/// Monotonic time in milliseconds since the simulation started.
pub type Millis = f64;

/// Frame counter, advanced once per display tick.
pub type Frame = u64;

/// Maximum number of samples retained in the history log.
pub const HISTORY_CAPACITY: usize = 50;

/// World width in world units (equal to reality-view pixels).
pub const WORLD_WIDTH: f64 = 300.0;

/// World height in world units (equal to reality-view pixels).
pub const WORLD_HEIGHT: f64 = 200.0;

/// A position in the simulated world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The center of the world bounds.
    pub fn center() -> Self {
        Self::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0)
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Move `fraction` of the way from `self` toward `target`.
    pub fn lerp_toward(&self, target: &Position, fraction: f64) -> Position {
        Position {
            x: self.x + (target.x - self.x) * fraction,
            y: self.y + (target.y - self.y) * fraction,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::center()
    }
}

/// One discrete observation captured by the perceiving agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistorySample {
    pub position: Position,
    /// Time the sample was accepted (not the nominal sampling slot).
    pub timestamp: Millis,
}

impl HistorySample {
    pub fn new(position: Position, timestamp: Millis) -> Self {
        Self { position, timestamp }
    }

    pub fn distance_to(&self, other: &HistorySample) -> f64 {
        self.position.distance_to(&other.position)
    }
}

/// The values an insight request reads, captured at trigger time.
///
/// The request never sees live simulation state; it works from this copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightSnapshot {
    pub species: String,
    pub sampling_rate_hz: f64,
    pub integration_window: usize,
    pub attention_bias: f64,
    pub transparency: f64,
}
