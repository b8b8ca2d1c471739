//! Configuration management for the Umwelt CLI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use umwelt::llm::ReasoningEffort;
use umwelt::prelude::*;

pub const CONFIG_FILE: &str = "umwelt.toml";

/// Umwelt project configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub insight: InsightConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_fps")]
    pub fps: f64,
    #[serde(default = "default_frames")]
    pub frames: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_preset")]
    pub preset: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampling_rate_hz: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_window: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attention_bias: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Provider default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub reasoning_effort: ReasoningEffort,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
}

// Default value functions
fn default_seed() -> u64 { 42 }
fn default_fps() -> f64 { 60.0 }
fn default_frames() -> u64 { 600 }
fn default_preset() -> String { "Human".to_string() }
fn default_provider() -> String { "claude".to_string() }
fn default_timeout_secs() -> u32 { 30 }
fn default_max_tokens() -> u32 { 1024 }
fn default_out_dir() -> String { "frames".to_string() }

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            fps: default_fps(),
            frames: default_frames(),
        }
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            preset: default_preset(),
            sampling_rate_hz: None,
            integration_window: None,
            attention_bias: None,
        }
    }
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            reasoning_effort: ReasoningEffort::default(),
            timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
        }
    }
}

impl ProfileConfig {
    pub fn overrides(&self) -> ProfileOverrides {
        ProfileOverrides {
            sampling_rate_hz: self.sampling_rate_hz,
            integration_window: self.integration_window,
            attention_bias: self.attention_bias,
        }
    }
}

impl Config {
    /// Load config from `explicit`, or from umwelt.toml in the current or
    /// parent directories, or fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => match find_config_file() {
                Some(path) => Self::load_from(&path),
                None => Ok(Config::default()),
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Generate default config as TOML string.
    pub fn default_toml() -> Result<String> {
        toml::to_string_pretty(&Config::default()).context("Failed to serialize config")
    }

    /// The configured profile: preset plus any file overrides.
    pub fn species_profile(&self) -> Result<SpeciesProfile> {
        let preset = SpeciesProfile::try_preset(&self.profile.preset)?;
        Ok(preset.with_overrides(&self.profile.overrides())?)
    }
}

/// Find umwelt.toml in current or parent directories.
fn find_config_file() -> Option<PathBuf> {
    find_config_file_from(std::env::current_dir().ok()?)
}

fn find_config_file_from(mut dir: PathBuf) -> Option<PathBuf> {
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let text = Config::default_toml().unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, Config::default());
        assert!(text.contains("[simulation]"));
        assert!(text.contains("reasoning_effort = \"low\""));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [profile]
            preset = "tortoise"
            attention_bias = 0.5

            [insight]
            provider = "ollama"
            reasoning_effort = "high"
            "#,
        )
        .unwrap();

        assert_eq!(config.simulation, SimulationConfig::default());
        assert_eq!(config.insight.reasoning_effort, ReasoningEffort::High);
        assert_eq!(config.insight.timeout_secs, 30);

        let profile = config.species_profile().unwrap();
        assert_eq!(profile.name, "Tortoise");
        assert_eq!(profile.attention_bias, 0.5);
        assert_eq!(profile.integration_window, 50);
    }

    #[test]
    fn invalid_profile_values_are_rejected() {
        let mut config = Config::default();
        config.profile.integration_window = Some(80);
        assert!(config.species_profile().is_err());

        config.profile.integration_window = None;
        config.profile.preset = "bat".to_string();
        assert!(config.species_profile().is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let mut config = Config::default();
        config.simulation.seed = 7;
        config.insight.model = Some("o3".to_string());
        config.save(&path).unwrap();

        assert_eq!(Config::load(Some(&path)).unwrap(), config);
    }

    #[test]
    fn discovery_walks_up_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "").unwrap();

        let found = find_config_file_from(nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILE));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
