//! List species presets.

use anyhow::Result;
use colored::Colorize;
use umwelt::prelude::*;

pub fn run(json: bool) -> Result<()> {
    let presets = SpeciesProfile::presets();

    if json {
        println!("{}", serde_json::to_string_pretty(&presets)?);
        return Ok(());
    }

    println!("{}", "Species presets".bold());
    println!();
    println!(
        "  {:<10} {:>9} {:>7} {:>6}  {}",
        "Name", "Sampling", "Window", "Bias", "Color"
    );
    for p in &presets {
        println!(
            "  {:<10} {:>6.0} Hz {:>7} {:>6.2}  {}",
            p.name.cyan(),
            p.sampling_rate_hz,
            p.integration_window,
            p.attention_bias,
            p.display_color.to_hex(),
        );
    }

    Ok(())
}
