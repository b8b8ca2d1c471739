//! Run the frame loop and export the three views.

use anyhow::{Context, Result};
use colored::Colorize;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use umwelt::prelude::*;

use super::{build_umwelt, frame_progress};
use crate::config::Config;
use crate::ProfileArgs;

pub fn run(
    config: &Config,
    args: &ProfileArgs,
    out: Option<PathBuf>,
    frames: Option<u64>,
    every: Option<u64>,
) -> Result<()> {
    let out = out.unwrap_or_else(|| PathBuf::from(&config.render.out_dir));
    let frames = frames.unwrap_or(config.simulation.frames);
    let mut umwelt = build_umwelt(config, args)?;

    println!(
        "{} Rendering {} for {} frames into {}...",
        "→".blue(),
        umwelt.profile().name.cyan(),
        frames.to_string().cyan(),
        out.display()
    );

    let written = render_frames(&mut umwelt, config.simulation.fps, frames, every, &out)?;

    println!();
    println!("{} Wrote {} images", "✓".green().bold(), written.len());
    for path in written.iter().rev().take(3).rev() {
        println!("  {}", path.display());
    }
    Ok(())
}

/// Run `frames` frames, redrawing every frame. Writes numbered images
/// every `every` frames and the final state as `reality.png`,
/// `model.png`, `attention.png`.
pub fn render_frames(
    umwelt: &mut Umwelt,
    fps: f64,
    frames: u64,
    every: Option<u64>,
    out: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out)
        .with_context(|| format!("Failed to create {}", out.display()))?;

    let pb = frame_progress(frames, false)?;
    let mut surfaces = Surfaces::new();
    let mut written = Vec::new();
    let mut failure = None;

    FrameLoop::new(SteppedClock::at_fps(fps)).run(umwelt, frames, |u, report| {
        surfaces.render(u);
        pb.inc(1);
        if let Some(k) = every {
            if report.frame % k == 0 {
                match surfaces.save_png(out, Some(&format!("{:06}", report.frame))) {
                    Ok(paths) => written.extend(paths),
                    Err(e) => {
                        failure = Some(e);
                        return ControlFlow::Break(());
                    }
                }
            }
        }
        ControlFlow::Continue(())
    });
    pb.finish_and_clear();

    if let Some(e) = failure {
        return Err(e).context("Failed to write frame images");
    }

    surfaces.render(umwelt);
    let finals = surfaces
        .save_png(out, None)
        .context("Failed to write final images")?;
    written.extend(finals);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_numbered_and_final_images() {
        let dir = tempfile::tempdir().unwrap();
        let mut umwelt = Umwelt::new();
        let written = render_frames(&mut umwelt, 60.0, 20, Some(10), dir.path()).unwrap();

        // Two numbered sets plus the final set.
        assert_eq!(written.len(), 9);
        assert!(dir.path().join("model-000010.png").exists());
        assert!(dir.path().join("attention-000020.png").exists());
        assert!(dir.path().join("reality.png").exists());
        assert_eq!(umwelt.frame(), 20);
    }

    #[test]
    fn without_every_only_final_images() {
        let dir = tempfile::tempdir().unwrap();
        let mut umwelt = Umwelt::new();
        let written = render_frames(&mut umwelt, 60.0, 5, None, dir.path()).unwrap();
        assert_eq!(written.len(), 3);
    }
}
