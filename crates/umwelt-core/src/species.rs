//! Species profiles - the four parameters that define a perceptual world.
//!
//! Presets are immutable. User edits never mutate a profile in place; they
//! produce a new validated profile through [`SpeciesProfile::with_overrides`].

use crate::color::Rgba;
use crate::error::ProfileError;
use crate::types::HISTORY_CAPACITY;
use serde::{Deserialize, Serialize};

/// Lowest accepted sampling rate (Hz).
pub const MIN_SAMPLING_RATE_HZ: f64 = 1.0;

/// Highest accepted sampling rate (Hz).
pub const MAX_SAMPLING_RATE_HZ: f64 = 240.0;

/// Names of the built-in presets, in display order.
pub const PRESET_NAMES: [&str; 4] = ["Human", "Housefly", "Pigeon", "Tortoise"];

/// A named bundle of perception parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesProfile {
    pub name: String,
    /// Flicker-fusion rate: how often the world is sampled.
    pub sampling_rate_hz: f64,
    /// How many recent samples form the internal model.
    pub integration_window: usize,
    /// Shapes the attention falloff over sample age. Higher values flatten it
    /// (1 = nearly uniform over the history), lower values concentrate weight
    /// on the newest samples.
    pub attention_bias: f64,
    pub display_color: Rgba,
}

/// Optional user edits applied on top of a profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileOverrides {
    #[serde(default)]
    pub sampling_rate_hz: Option<f64>,
    #[serde(default)]
    pub integration_window: Option<usize>,
    #[serde(default)]
    pub attention_bias: Option<f64>,
}

impl ProfileOverrides {
    pub fn is_empty(&self) -> bool {
        self.sampling_rate_hz.is_none()
            && self.integration_window.is_none()
            && self.attention_bias.is_none()
    }
}

impl SpeciesProfile {
    /// Create a validated profile.
    pub fn new(
        name: impl Into<String>,
        sampling_rate_hz: f64,
        integration_window: usize,
        attention_bias: f64,
        display_color: Rgba,
    ) -> Result<Self, ProfileError> {
        let profile = Self {
            name: name.into(),
            sampling_rate_hz,
            integration_window,
            attention_bias,
            display_color,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Check every parameter against its allowed range.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::EmptyName);
        }
        if !self.sampling_rate_hz.is_finite()
            || !(MIN_SAMPLING_RATE_HZ..=MAX_SAMPLING_RATE_HZ).contains(&self.sampling_rate_hz)
        {
            return Err(ProfileError::InvalidSamplingRate(self.sampling_rate_hz));
        }
        if !(1..=HISTORY_CAPACITY).contains(&self.integration_window) {
            return Err(ProfileError::InvalidIntegrationWindow(self.integration_window));
        }
        if !self.attention_bias.is_finite() || !(0.0..=1.0).contains(&self.attention_bias) {
            return Err(ProfileError::InvalidAttentionBias(self.attention_bias));
        }
        Ok(())
    }

    /// Look up a built-in preset by name (case-insensitive).
    pub fn preset(name: &str) -> Option<Self> {
        Self::presets()
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Like [`SpeciesProfile::preset`] but reports unknown names as an error.
    pub fn try_preset(name: &str) -> Result<Self, ProfileError> {
        Self::preset(name).ok_or_else(|| ProfileError::UnknownPreset(name.to_string()))
    }

    /// All built-in presets, in [`PRESET_NAMES`] order.
    pub fn presets() -> Vec<Self> {
        vec![Self::human(), Self::housefly(), Self::pigeon(), Self::tortoise()]
    }

    /// 24 Hz film-rate vision with a long window.
    pub fn human() -> Self {
        Self {
            name: "Human".to_string(),
            sampling_rate_hz: 24.0,
            integration_window: 30,
            attention_bias: 0.7,
            display_color: Rgba::opaque(0x38, 0xbd, 0xf8),
        }
    }

    /// Very high flicker fusion and short memory; attention stays broad over
    /// older samples.
    pub fn housefly() -> Self {
        Self {
            name: "Housefly".to_string(),
            sampling_rate_hz: 240.0,
            integration_window: 8,
            attention_bias: 0.95,
            display_color: Rgba::opaque(0xf9, 0x73, 0x16),
        }
    }

    pub fn pigeon() -> Self {
        Self {
            name: "Pigeon".to_string(),
            sampling_rate_hz: 100.0,
            integration_window: 15,
            attention_bias: 0.85,
            display_color: Rgba::opaque(0xa3, 0xe6, 0x35),
        }
    }

    /// Slow sampling with the longest window; attention concentrates on the
    /// newest samples.
    pub fn tortoise() -> Self {
        Self {
            name: "Tortoise".to_string(),
            sampling_rate_hz: 4.0,
            integration_window: 50,
            attention_bias: 0.2,
            display_color: Rgba::opaque(0xc0, 0x84, 0xfc),
        }
    }

    /// Produce a new validated profile with the given edits applied.
    pub fn with_overrides(&self, overrides: &ProfileOverrides) -> Result<Self, ProfileError> {
        let mut next = self.clone();
        if let Some(hz) = overrides.sampling_rate_hz {
            next.sampling_rate_hz = hz;
        }
        if let Some(window) = overrides.integration_window {
            next.integration_window = window;
        }
        if let Some(bias) = overrides.attention_bias {
            next.attention_bias = bias;
        }
        next.validate()?;
        Ok(next)
    }

    /// Milliseconds between samples at this profile's rate.
    pub fn sampling_interval_ms(&self) -> f64 {
        1000.0 / self.sampling_rate_hz
    }
}

impl Default for SpeciesProfile {
    fn default() -> Self {
        Self::human()
    }
}
