//! Umwelt - the single owner of all simulation state.
//!
//! Every mutation goes through one of a handful of transitions:
//! [`Umwelt::step`] once per frame, and [`Umwelt::set_profile`] /
//! [`Umwelt::select_preset`] / [`Umwelt::apply_overrides`] on user input.
//! Readers (renderer, insight request) only ever borrow or copy.

use crate::history::{maybe_sample, HistoryBuffer};
use crate::transparency;
use crate::world::{self, WorldState};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use umwelt_core::prelude::*;

/// Configuration for a new simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UmweltConfig {
    /// Seed for world target selection.
    pub seed: u64,
    /// Profile in effect at startup.
    pub profile: SpeciesProfile,
}

impl Default for UmweltConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            profile: SpeciesProfile::default(),
        }
    }
}

/// What happened during one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub frame: Frame,
    pub position: Position,
    /// The sample captured this frame, if the interval elapsed.
    pub sampled: Option<HistorySample>,
    pub transparency: f64,
}

/// Summary statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UmweltStats {
    pub frame: Frame,
    pub species: String,
    pub history_len: usize,
    pub samples_accepted: u64,
    pub effective_window: usize,
    pub transparency: f64,
    pub position: Position,
    pub target: Position,
}

/// A complete serializable snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct UmweltSnapshot {
    pub profile: SpeciesProfile,
    pub world: WorldState,
    pub history: Vec<HistorySample>,
    pub stats: UmweltStats,
}

/// The perceiving agent and the world it perceives.
#[derive(Debug, Clone)]
pub struct Umwelt {
    profile: SpeciesProfile,
    world: WorldState,
    history: HistoryBuffer,
    transparency: f64,
    last_sample_ms: Millis,
    rng: Prng,
    frame: Frame,
}

impl Umwelt {
    /// Human preset, default seed.
    pub fn new() -> Self {
        Self::from_config(UmweltConfig::default())
    }

    pub fn from_config(config: UmweltConfig) -> Self {
        Self {
            profile: config.profile,
            world: WorldState::new(),
            history: HistoryBuffer::new(),
            transparency: transparency::MIN_INDEX,
            last_sample_ms: 0.0,
            rng: Prng::new(config.seed),
            frame: 0,
        }
    }

    /// Advance one frame at time `now`.
    ///
    /// World step, then conditional sampling, then a transparency update
    /// if a sample was captured.
    pub fn step(&mut self, now: Millis) -> StepReport {
        self.world = world::advance(&self.world, &mut self.rng);

        let (last, sampled) = maybe_sample(
            self.world.current,
            now,
            self.last_sample_ms,
            self.profile.sampling_rate_hz,
        );
        self.last_sample_ms = last;

        if let Some(sample) = sampled {
            self.history.push(sample);
            self.transparency =
                transparency::update(self.transparency, &self.history, self.profile.sampling_rate_hz);
            trace!(
                frame = self.frame,
                x = sample.position.x,
                y = sample.position.y,
                transparency = self.transparency,
                "sample accepted"
            );
        }

        self.frame += 1;
        StepReport {
            frame: self.frame,
            position: self.world.current,
            sampled,
            transparency: self.transparency,
        }
    }

    /// Replace the active profile wholesale.
    ///
    /// History is kept; views clamp to whatever is available.
    pub fn set_profile(&mut self, profile: SpeciesProfile) -> Result<()> {
        profile.validate()?;
        debug!(
            species = %profile.name,
            rate_hz = profile.sampling_rate_hz,
            window = profile.integration_window,
            bias = profile.attention_bias,
            "profile changed"
        );
        self.profile = profile;
        Ok(())
    }

    /// Switch to a built-in preset by name.
    pub fn select_preset(&mut self, name: &str) -> Result<()> {
        let profile = SpeciesProfile::try_preset(name)?;
        self.set_profile(profile)
    }

    /// Apply user edits to the current profile.
    pub fn apply_overrides(&mut self, overrides: &ProfileOverrides) -> Result<()> {
        let profile = self.profile.with_overrides(overrides)?;
        self.set_profile(profile)
    }

    pub fn profile(&self) -> &SpeciesProfile {
        &self.profile
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn transparency(&self) -> f64 {
        self.transparency
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Integration window clamped to the samples actually held.
    pub fn effective_window(&self) -> usize {
        self.profile.integration_window.min(self.history.len())
    }

    /// Copy of the values an insight request needs.
    pub fn insight_snapshot(&self) -> InsightSnapshot {
        InsightSnapshot {
            species: self.profile.name.clone(),
            sampling_rate_hz: self.profile.sampling_rate_hz,
            integration_window: self.profile.integration_window,
            attention_bias: self.profile.attention_bias,
            transparency: self.transparency,
        }
    }

    pub fn stats(&self) -> UmweltStats {
        UmweltStats {
            frame: self.frame,
            species: self.profile.name.clone(),
            history_len: self.history.len(),
            samples_accepted: self.history.accepted(),
            effective_window: self.effective_window(),
            transparency: self.transparency,
            position: self.world.current,
            target: self.world.target,
        }
    }

    pub fn snapshot(&self) -> UmweltSnapshot {
        UmweltSnapshot {
            profile: self.profile.clone(),
            world: self.world,
            history: self.history.iter().copied().collect(),
            stats: self.stats(),
        }
    }
}

impl Default for Umwelt {
    fn default() -> Self {
        Self::new()
    }
}
