//! Run the frame loop.

use anyhow::Result;
use colored::Colorize;
use std::ops::ControlFlow;
use umwelt::prelude::*;

use super::{build_umwelt, frame_progress};
use crate::config::Config;
use crate::ProfileArgs;

pub fn run(
    config: &Config,
    args: &ProfileArgs,
    frames: Option<u64>,
    realtime: bool,
    json: bool,
    verbose: bool,
) -> Result<()> {
    let frames = frames.unwrap_or(config.simulation.frames);
    let fps = config.simulation.fps;
    let mut umwelt = build_umwelt(config, args)?;

    if !json {
        println!(
            "{} Running {} as {} for {} frames at {} fps{}...",
            "→".blue(),
            "Umwelt".bold(),
            umwelt.profile().name.cyan(),
            frames.to_string().cyan(),
            fps,
            if realtime { " (real time)" } else { "" }
        );
    }

    let pb = frame_progress(frames, json)?;
    let on_frame = |_: &Umwelt, report: &StepReport| {
        if verbose {
            if let Some(sample) = report.sampled {
                pb.println(format!(
                    "  frame {:>5}  sample ({:>6.1}, {:>6.1})  transparency {:>5.1}",
                    report.frame, sample.position.x, sample.position.y, report.transparency
                ));
            }
        }
        pb.inc(1);
        ControlFlow::Continue(())
    };

    if realtime {
        FrameLoop::new(SystemClock::new())
            .paced(fps)
            .run(&mut umwelt, frames, on_frame);
    } else {
        FrameLoop::new(SteppedClock::at_fps(fps)).run(&mut umwelt, frames, on_frame);
    }
    pb.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&umwelt.snapshot())?);
        return Ok(());
    }

    print_stats(&umwelt.stats());
    Ok(())
}

fn print_stats(stats: &UmweltStats) {
    println!();
    println!("{} Simulation complete!", "✓".green().bold());
    println!("  Frames:            {}", stats.frame.to_string().green());
    println!(
        "  Samples:           {} accepted, {} held",
        stats.samples_accepted.to_string().green(),
        stats.history_len.to_string().green()
    );
    println!(
        "  Integration:       {} samples in view",
        stats.effective_window.to_string().green()
    );
    println!(
        "  Position:          ({:.1}, {:.1}) → target ({:.1}, {:.1})",
        stats.position.x, stats.position.y, stats.target.x, stats.target.y
    );

    let t = format!("{:.1}", stats.transparency);
    let t = if stats.transparency >= 66.0 {
        t.green()
    } else if stats.transparency >= 33.0 {
        t.yellow()
    } else {
        t.red()
    };
    println!("  Transparency:      {} / 100", t);
}
