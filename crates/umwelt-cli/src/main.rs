//! Umwelt CLI - run, render and discuss a perceiving agent.

mod commands;
mod config;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use umwelt::llm::ReasoningEffort;
use umwelt::prelude::*;

#[derive(Parser)]
#[command(name = "umwelt")]
#[command(author, version, about = "Umwelt - how a species samples, integrates and attends to its world", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: umwelt.toml in the current or a parent directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default umwelt.toml
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// List the species presets
    Presets {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the frame loop and print statistics
    Run {
        /// Number of frames to run
        #[arg(short, long)]
        frames: Option<u64>,

        /// Pace frames to the wall clock
        #[arg(long)]
        realtime: bool,

        /// Print a JSON snapshot instead of a summary
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// Run the frame loop and write the three views as PNG
    Render {
        /// Output directory (default: [render].out_dir)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Number of frames to run
        #[arg(short, long)]
        frames: Option<u64>,

        /// Also write numbered frames every K frames
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        every: Option<u64>,

        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// Warm up the simulation and ask a model to comment on it
    Insight {
        /// Frames to simulate before the request
        #[arg(short, long)]
        frames: Option<u64>,

        /// Backend (default: [insight].provider)
        #[arg(long, value_enum)]
        provider: Option<Provider>,

        /// Model identifier (default: provider default)
        #[arg(short, long)]
        model: Option<String>,

        /// Reasoning effort: low, medium or high
        #[arg(short, long)]
        effort: Option<ReasoningEffort>,

        #[command(flatten)]
        profile: ProfileArgs,
    },
}

/// Profile selection and slider-style overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct ProfileArgs {
    /// Species preset
    #[arg(long, ignore_case = true, value_parser = PRESET_NAMES)]
    pub preset: Option<String>,

    /// Sampling rate in Hz (1-240)
    #[arg(long, value_parser = parse_rate)]
    pub rate: Option<f64>,

    /// Integration window in samples (1-50)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=HISTORY_CAPACITY as i64))]
    pub window: Option<u16>,

    /// Attention bias (0.00-1.00)
    #[arg(long, value_parser = parse_bias)]
    pub bias: Option<f64>,

    /// World seed
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    Claude,
    Openai,
    Ollama,
    Mock,
}

fn parse_rate(s: &str) -> Result<f64, String> {
    let hz: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if (1.0..=240.0).contains(&hz) {
        Ok(hz)
    } else {
        Err(format!("sampling rate must be within 1-240 Hz, got {}", hz))
    }
}

fn parse_bias(s: &str) -> Result<f64, String> {
    let bias: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if (0.0..=1.0).contains(&bias) {
        Ok(bias)
    } else {
        Err(format!("attention bias must be within 0.00-1.00, got {}", bias))
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Presets { json } => commands::presets::run(json),
        Commands::Run { frames, realtime, json, profile } => {
            let config = config::Config::load(config_path)?;
            commands::run::run(&config, &profile, frames, realtime, json, cli.verbose)
        }
        Commands::Render { out, frames, every, profile } => {
            let config = config::Config::load(config_path)?;
            commands::render::run(&config, &profile, out, frames, every)
        }
        Commands::Insight { frames, provider, model, effort, profile } => {
            let config = config::Config::load(config_path)?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(commands::insight::run(
                &config,
                &profile,
                commands::insight::InsightArgs { frames, provider, model, effort },
            ))
        }
    }
}
