//! CLI command implementations.

pub mod init;
pub mod insight;
pub mod presets;
pub mod render;
pub mod run;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use umwelt::prelude::*;

use crate::config::Config;
use crate::ProfileArgs;

/// Resolve the profile from file and flags.
///
/// A preset named on the command line starts from its stock values; file
/// overrides only apply to the file's own preset. Flag overrides always
/// win.
pub fn resolve_profile(config: &Config, args: &ProfileArgs) -> Result<SpeciesProfile> {
    let base = match &args.preset {
        Some(name) => SpeciesProfile::try_preset(name)?,
        None => config
            .species_profile()
            .context("Invalid [profile] section in config")?,
    };
    let overrides = ProfileOverrides {
        sampling_rate_hz: args.rate,
        integration_window: args.window.map(usize::from),
        attention_bias: args.bias,
    };
    Ok(base.with_overrides(&overrides)?)
}

/// Build a fresh simulation from file and flags.
pub fn build_umwelt(config: &Config, args: &ProfileArgs) -> Result<Umwelt> {
    let profile = resolve_profile(config, args)?;
    let seed = args.seed.unwrap_or(config.simulation.seed);
    tracing::debug!(species = %profile.name, seed, "starting simulation");
    Ok(Umwelt::from_config(UmweltConfig { seed, profile }))
}

pub fn frame_progress(frames: u64, hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(frames);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} frames")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}
