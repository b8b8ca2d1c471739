//! Initialize a new Umwelt project.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{Config, CONFIG_FILE};

pub fn run(path: Option<String>) -> Result<()> {
    let base_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    println!("{} Initializing Umwelt project...", "→".blue());

    std::fs::create_dir_all(&base_path)
        .with_context(|| format!("Failed to create {}", base_path.display()))?;

    let config_path = base_path.join(CONFIG_FILE);
    if !config_path.exists() {
        Config::default().save(&config_path)?;
        println!("  {} Created {}", "✓".green(), config_path.display());
    } else {
        println!("  {} {} already exists", "•".yellow(), config_path.display());
    }

    println!();
    println!("{} Umwelt project initialized!", "✓".green().bold());
    println!();
    println!("Next steps:");
    println!("  {} umwelt presets", "1.".blue());
    println!("  {} umwelt run --preset housefly", "2.".blue());
    println!("  {} umwelt render --out frames", "3.".blue());
    println!("  {} umwelt insight --provider mock", "4.".blue());

    Ok(())
}
