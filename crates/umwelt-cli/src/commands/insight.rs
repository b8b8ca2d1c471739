//! Ask a model to comment on the current perceptual configuration.

use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use indicatif::ProgressBar;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use umwelt::llm::{
    ClaudeBackend, InsightRequester, LlmBackend, LlmConfig, MockBackend, OllamaBackend,
    OpenAiBackend, ReasoningEffort, DEFAULT_OLLAMA_URL,
};
use umwelt::prelude::*;

use super::build_umwelt;
use crate::config::Config;
use crate::{ProfileArgs, Provider};

const MOCK_RESPONSE: &str = "Offline mock backend: no model was consulted.";

pub struct InsightArgs {
    pub frames: Option<u64>,
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub effort: Option<ReasoningEffort>,
}

pub async fn run(config: &Config, args: &ProfileArgs, insight: InsightArgs) -> Result<()> {
    let frames = insight.frames.unwrap_or(config.simulation.frames);
    let backend = make_backend(config, &insight)?;
    let mut umwelt = build_umwelt(config, args)?;

    println!(
        "{} Simulating {} for {} frames...",
        "→".blue(),
        umwelt.profile().name.cyan(),
        frames.to_string().cyan()
    );
    let mut frame_loop = FrameLoop::new(SteppedClock::at_fps(config.simulation.fps));
    frame_loop.run(&mut umwelt, frames, |_, _| ControlFlow::Continue(()));

    let snapshot = umwelt.insight_snapshot();
    println!(
        "{} Asking {} ({}, effort {})...",
        "→".blue(),
        backend.name().cyan(),
        backend.config().model,
        backend.config().reasoning_effort
    );

    let requester = InsightRequester::new(backend);
    let text = request_while_running(&requester, &mut umwelt, &mut frame_loop, snapshot).await?;

    println!();
    match requester.state() {
        InsightState::Succeeded { .. } => println!("{} Insight", "✓".green().bold()),
        _ => println!("{} Insight unavailable", "✗".red().bold()),
    }
    println!();
    println!("{}", text);

    Ok(())
}

/// Trigger one request and keep the simulation stepping until it resolves.
async fn request_while_running(
    requester: &InsightRequester,
    umwelt: &mut Umwelt,
    frame_loop: &mut FrameLoop<SteppedClock>,
    snapshot: InsightSnapshot,
) -> Result<String> {
    let handle = requester
        .trigger(snapshot)
        .ok_or_else(|| anyhow!("An insight request is already pending"))?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("waiting for the model");
    while requester.is_pending() && !handle.is_finished() {
        frame_loop.run(umwelt, 1, |_, _| ControlFlow::Continue(()));
        spinner.tick();
        tokio::time::sleep(Duration::from_millis(16)).await;
    }
    handle.await.context("Insight task panicked")?;
    spinner.finish_and_clear();

    tracing::debug!(frames = umwelt.frame(), "insight resolved");
    requester
        .display_text()
        .ok_or_else(|| anyhow!("Insight request finished without a result"))
}

fn make_backend(config: &Config, args: &InsightArgs) -> Result<Arc<dyn LlmBackend>> {
    let provider = match args.provider {
        Some(p) => p,
        None => Provider::from_str(&config.insight.provider, true)
            .map_err(|e| anyhow!("Invalid [insight].provider: {}", e))?,
    };

    let effort = args.effort.unwrap_or(config.insight.reasoning_effort);
    let with_settings = |base: LlmConfig| {
        let base = base
            .with_timeout(config.insight.timeout_secs)
            .with_max_tokens(config.insight.max_tokens)
            .with_reasoning_effort(effort);
        match args.model.as_ref().or(config.insight.model.as_ref()) {
            Some(model) => base.with_model(model.as_str()),
            None => base,
        }
    };

    let backend: Arc<dyn LlmBackend> = match provider {
        Provider::Claude => Arc::new(
            ClaudeBackend::from_env_with_config(with_settings(LlmConfig::claude()))
                .context("Claude needs ANTHROPIC_API_KEY")?,
        ),
        Provider::Openai => Arc::new(
            OpenAiBackend::from_env_with_config(with_settings(LlmConfig::openai()))
                .context("OpenAI needs OPENAI_API_KEY")?,
        ),
        Provider::Ollama => Arc::new(OllamaBackend::with_config(
            DEFAULT_OLLAMA_URL,
            with_settings(LlmConfig::ollama()),
        )?),
        Provider::Mock => Arc::new(MockBackend::new().with_response(MOCK_RESPONSE)),
    };
    Ok(backend)
}
