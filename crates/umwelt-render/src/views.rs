//! The three views and the surfaces they draw onto.

use crate::canvas::{Canvas, RenderError};
use std::path::Path;
use umwelt_core::prelude::*;
use umwelt_runtime::attention::{causal_cells, grid_size};
use umwelt_runtime::Umwelt;

/// Reality and model view width in pixels (equal to world width).
pub const VIEW_WIDTH: u32 = WORLD_WIDTH as u32;

/// Reality and model view height in pixels (equal to world height).
pub const VIEW_HEIGHT: u32 = WORLD_HEIGHT as u32;

/// Attention view side length in pixels.
pub const ATTENTION_SIZE: u32 = 150;

pub const BACKGROUND: Rgba = Rgba::opaque(0x0f, 0x17, 0x2a);

const REALITY_RADIUS: f64 = 8.0;
const REALITY_COLOR: Rgba = Rgba::WHITE;

const MODEL_RADIUS: f64 = 6.0;
const MODEL_BASE_OPACITY: f64 = 0.8;

const ATTENTION_HUE: Rgba = Rgba::opaque(0xa8, 0x55, 0xf7);
const ATTENTION_MAX_OPACITY: f64 = 0.8;

/// Draw the true world position.
pub fn draw_reality(canvas: &mut Canvas, position: Position) {
    canvas.clear(BACKGROUND);
    canvas.fill_circle(position.x, position.y, REALITY_RADIUS, REALITY_COLOR);
}

/// Draw the trailing integration window, oldest faintest.
///
/// Draws at most `min(profile.integration_window, history.len())` samples.
pub fn draw_model<'a, I>(canvas: &mut Canvas, samples: I, profile: &SpeciesProfile)
where
    I: IntoIterator<Item = &'a HistorySample>,
    I::IntoIter: ExactSizeIterator,
{
    canvas.clear(BACKGROUND);
    let samples = samples.into_iter();
    let n = samples.len().min(profile.integration_window);
    let skip = samples.len() - n;
    for (i, sample) in samples.skip(skip).enumerate() {
        let opacity = MODEL_BASE_OPACITY * (i + 1) as f64 / n as f64;
        canvas.fill_circle(
            sample.position.x,
            sample.position.y,
            MODEL_RADIUS,
            profile.display_color.with_alpha(opacity),
        );
    }
}

/// Draw the lower-triangular attention matrix for a history of `history_len`.
pub fn draw_attention(canvas: &mut Canvas, history_len: usize, attention_bias: f64) {
    canvas.clear(BACKGROUND);
    let count = grid_size(history_len);
    if count == 0 {
        return;
    }
    let cell_w = canvas.width() as f64 / count as f64;
    let cell_h = canvas.height() as f64 / count as f64;
    for cell in causal_cells(history_len, attention_bias) {
        let left = cell.column as f64 * cell_w;
        let top = cell.row as f64 * cell_h;
        canvas.fill_rect(
            left,
            top,
            left + cell_w,
            top + cell_h,
            ATTENTION_HUE.with_alpha(cell.weight * ATTENTION_MAX_OPACITY),
        );
    }
}

/// The three drawing targets. A missing target is skipped.
#[derive(Debug, Clone, Default)]
pub struct Surfaces {
    pub reality: Option<Canvas>,
    pub model: Option<Canvas>,
    pub attention: Option<Canvas>,
}

impl Surfaces {
    /// All three targets at their standard sizes.
    pub fn new() -> Self {
        Self {
            reality: Some(Canvas::new(VIEW_WIDTH, VIEW_HEIGHT)),
            model: Some(Canvas::new(VIEW_WIDTH, VIEW_HEIGHT)),
            attention: Some(Canvas::new(ATTENTION_SIZE, ATTENTION_SIZE)),
        }
    }

    /// Redraw every available target from the current state.
    pub fn render(&mut self, umwelt: &Umwelt) {
        if let Some(canvas) = self.reality.as_mut() {
            draw_reality(canvas, umwelt.world().current);
        }
        if let Some(canvas) = self.model.as_mut() {
            let history = umwelt.history();
            let window = umwelt.effective_window();
            draw_model(canvas, history.trailing(window), umwelt.profile());
        }
        if let Some(canvas) = self.attention.as_mut() {
            draw_attention(canvas, umwelt.history().len(), umwelt.profile().attention_bias);
        }
    }

    /// Write each available target as `<name>.png` (or `<name>-<suffix>.png`).
    ///
    /// Returns the paths written.
    pub fn save_png(&self, dir: &Path, suffix: Option<&str>) -> std::result::Result<Vec<std::path::PathBuf>, RenderError> {
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::new();
        for (name, canvas) in [
            ("reality", &self.reality),
            ("model", &self.model),
            ("attention", &self.attention),
        ] {
            let Some(canvas) = canvas else { continue };
            let file = match suffix {
                Some(s) => format!("{name}-{s}.png"),
                None => format!("{name}.png"),
            };
            let path = dir.join(file);
            canvas.save_png(&path)?;
            written.push(path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(points: &[(f64, f64)]) -> Vec<HistorySample> {
        points
            .iter()
            .enumerate()
            .map(|(i, (x, y))| HistorySample::new(Position::new(*x, *y), i as f64))
            .collect()
    }

    #[test]
    fn reality_draws_point_on_background() {
        let mut c = Canvas::new(VIEW_WIDTH, VIEW_HEIGHT);
        draw_reality(&mut c, Position::new(150.0, 100.0));
        assert_eq!(c.pixel(150, 100), Some(REALITY_COLOR));
        assert_eq!(c.pixel(0, 0), Some(BACKGROUND));
        assert_eq!(c.pixel(170, 100), Some(BACKGROUND));
    }

    #[test]
    fn model_ramps_opacity_toward_newest() {
        let profile = SpeciesProfile::human();
        let trail = samples(&[(30.0, 100.0), (150.0, 100.0), (270.0, 100.0)]);
        let mut c = Canvas::new(VIEW_WIDTH, VIEW_HEIGHT);
        draw_model(&mut c, &trail, &profile);

        let dist = |p: Rgba| {
            let d = |a: u8, b: u8| (a as i32 - b as i32).abs();
            d(p.r, BACKGROUND.r) + d(p.g, BACKGROUND.g) + d(p.b, BACKGROUND.b)
        };
        let oldest = dist(c.pixel(30, 100).unwrap());
        let middle = dist(c.pixel(150, 100).unwrap());
        let newest = dist(c.pixel(270, 100).unwrap());
        assert!(oldest < middle && middle < newest);
    }

    #[test]
    fn model_draws_only_the_window() {
        let mut profile = SpeciesProfile::human();
        profile.integration_window = 1;
        let trail = samples(&[(30.0, 100.0), (270.0, 100.0)]);
        let mut c = Canvas::new(VIEW_WIDTH, VIEW_HEIGHT);
        draw_model(&mut c, &trail, &profile);
        assert_eq!(c.pixel(30, 100), Some(BACKGROUND));
        assert_ne!(c.pixel(270, 100), Some(BACKGROUND));
    }

    #[test]
    fn model_with_empty_history_is_blank() {
        let mut c = Canvas::new(VIEW_WIDTH, VIEW_HEIGHT);
        draw_model(&mut c, &Vec::<HistorySample>::new(), &SpeciesProfile::human());
        assert!(c.image().pixels().all(|p| p.0 == BACKGROUND.to_array()));
    }

    #[test]
    fn attention_fills_only_the_lower_triangle() {
        for bias in [0.0, 0.7, 1.0] {
            for count in [1usize, 2, 3, 7, 10, 25, 50] {
                let mut c = Canvas::new(ATTENTION_SIZE, ATTENTION_SIZE);
                draw_attention(&mut c, count, bias);
                let cell = ATTENTION_SIZE as f64 / count as f64;
                for row in 0..count {
                    for col in 0..count {
                        let x = ((col as f64 + 0.5) * cell) as u32;
                        let y = ((row as f64 + 0.5) * cell) as u32;
                        let px = c.pixel(x, y).unwrap();
                        if col > row {
                            assert_eq!(px, BACKGROUND, "bias {bias} count {count} ({row},{col})");
                        } else if bias == 1.0 || row == col {
                            // Far-off-diagonal weights at low bias can round to zero alpha.
                            assert_ne!(px, BACKGROUND, "bias {bias} count {count} ({row},{col})");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn attention_with_no_history_is_blank() {
        let mut c = Canvas::new(ATTENTION_SIZE, ATTENTION_SIZE);
        draw_attention(&mut c, 0, 0.5);
        assert!(c.image().pixels().all(|p| p.0 == BACKGROUND.to_array()));
    }

    #[test]
    fn rendering_is_idempotent() {
        let mut u = Umwelt::new();
        for i in 1..=200u64 {
            u.step(i as f64 * 16.0);
        }
        let mut a = Surfaces::new();
        a.render(&u);
        let first = a.clone();
        a.render(&u);
        assert_eq!(a.reality, first.reality);
        assert_eq!(a.model, first.model);
        assert_eq!(a.attention, first.attention);
    }

    #[test]
    fn missing_targets_are_skipped() {
        let mut u = Umwelt::new();
        u.step(100.0);
        let mut s = Surfaces {
            reality: None,
            model: Some(Canvas::new(VIEW_WIDTH, VIEW_HEIGHT)),
            attention: None,
        };
        s.render(&u);
        assert!(s.reality.is_none());
        assert!(s.attention.is_none());
    }
}
