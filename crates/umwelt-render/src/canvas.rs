//! A small RGBA raster with source-over blending.

use image::{ImageBuffer, ImageFormat, Rgba as ImgRgba, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;
use umwelt_core::color::Rgba;

/// Rendering errors. Only encoding and file output can fail.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A fixed-size drawing target.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: ImageBuffer::new(width.max(1), height.max(1)),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Overwrite every pixel with `color` (no blending).
    pub fn clear(&mut self, color: Rgba) {
        let px = ImgRgba(color.to_array());
        for p in self.image.pixels_mut() {
            *p = px;
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let [r, g, b, a] = self.image.get_pixel(x, y).0;
        Some(Rgba::new(r, g, b, a))
    }

    /// Composite `color` over the pixel at `(x, y)`.
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width() || y >= self.height() || color.a == 0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x, y);
        *dst = ImgRgba(source_over(color, dst.0));
    }

    /// Fill a disc; pixels whose centers lie within `radius` are covered.
    pub fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgba) {
        if !(cx.is_finite() && cy.is_finite() && radius.is_finite()) || radius <= 0.0 {
            return;
        }
        let (x0, x1) = self.span(cx - radius, cx + radius, self.width());
        let (y0, y1) = self.span(cy - radius, cy + radius, self.height());
        let r2 = radius * radius;
        for y in y0..y1 {
            let dy = y as f64 + 0.5 - cy;
            for x in x0..x1 {
                let dx = x as f64 + 0.5 - cx;
                if dx * dx + dy * dy <= r2 {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    /// Fill the pixels whose centers lie in `[left, right) x [top, bottom)`.
    pub fn fill_rect(&mut self, left: f64, top: f64, right: f64, bottom: f64, color: Rgba) {
        let (x0, x1) = self.span(left, right, self.width());
        let (y0, y1) = self.span(top, bottom, self.height());
        for y in y0..y1 {
            let cy = y as f64 + 0.5;
            if cy < top || cy >= bottom {
                continue;
            }
            for x in x0..x1 {
                let cx = x as f64 + 0.5;
                if cx >= left && cx < right {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Write the canvas to `path` as PNG.
    pub fn save_png(&self, path: &Path) -> Result<(), RenderError> {
        std::fs::write(path, encode_png(self)?)?;
        Ok(())
    }

    // Pixel index range covering [lo, hi], clamped to the canvas.
    fn span(&self, lo: f64, hi: f64, limit: u32) -> (u32, u32) {
        let start = lo.floor().max(0.0).min(limit as f64) as u32;
        let end = (hi.ceil() + 1.0).max(0.0).min(limit as f64) as u32;
        (start, end)
    }
}

/// Encode a canvas as PNG bytes.
pub fn encode_png(canvas: &Canvas) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    canvas
        .image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

fn source_over(src: Rgba, dst: [u8; 4]) -> [u8; 4] {
    let sa = src.a as f64 / 255.0;
    let da = dst[3] as f64 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return [0, 0, 0, 0];
    }
    let channel = |s: u8, d: u8| {
        let c = (s as f64 * sa + d as f64 * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    [
        channel(src.r, dst[0]),
        channel(src.g, dst[1]),
        channel(src.b, dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ]
}
