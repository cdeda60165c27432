//! Post-processing filters. P1: per-pixel full-frame transforms.
//!
//! A filter maps (x, y, previous color) to a new color and never reads
//! another pixel's filtered value, so pixels can run in any order; the
//! parallel path splits the frame into disjoint row bands across scoped
//! threads.

use crate::color;
use crate::target::Framebuffer;

/// Full-frame per-pixel transform. Implementations must be pure per pixel.
pub trait PostFilter: Send + Sync {
    fn apply(&self, x: u32, y: u32, color: u32) -> u32;
}

/// Apply `filter` to every pixel, single-threaded.
pub fn run_filter_serial(fb: &mut Framebuffer, filter: &dyn PostFilter) {
    let width = fb.width();
    for (i, px) in fb.color_mut().iter_mut().enumerate() {
        let x = i as u32 % width;
        let y = i as u32 / width;
        *px = filter.apply(x, y, *px);
    }
}

/// Apply `filter` to every pixel, parallel over row bands.
pub fn run_filter(fb: &mut Framebuffer, filter: &dyn PostFilter) {
    let width = fb.width() as usize;
    let height = fb.height() as usize;
    let threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(height.max(1));
    if threads <= 1 {
        run_filter_serial(fb, filter);
        return;
    }

    let rows_per_band = height.div_ceil(threads);
    let band_len = rows_per_band * width;

    std::thread::scope(|scope| {
        for (band, chunk) in fb.color_mut().chunks_mut(band_len).enumerate() {
            let base_row = (band * rows_per_band) as u32;
            scope.spawn(move || {
                for (i, px) in chunk.iter_mut().enumerate() {
                    let x = (i % width) as u32;
                    let y = base_row + (i / width) as u32;
                    *px = filter.apply(x, y, *px);
                }
            });
        }
    });
}

/// Invert RGB, keep alpha.
pub struct Invert;

impl PostFilter for Invert {
    fn apply(&self, _x: u32, _y: u32, c: u32) -> u32 {
        color::argb(
            color::alpha(c) as u32,
            255 - color::red(c) as u32,
            255 - color::green(c) as u32,
            255 - color::blue(c) as u32,
        )
    }
}

/// Luminance grayscale (Rec. 601 weights).
pub struct Grayscale;

impl PostFilter for Grayscale {
    fn apply(&self, _x: u32, _y: u32, c: u32) -> u32 {
        let y = 0.299 * color::red(c) as f32
            + 0.587 * color::green(c) as f32
            + 0.114 * color::blue(c) as f32;
        let y = y.round() as u32;
        color::argb(color::alpha(c) as u32, y, y, y)
    }
}

/// Darken toward the frame corners.
pub struct Vignette {
    pub width: u32,
    pub height: u32,
    pub strength: f32,
}

impl PostFilter for Vignette {
    fn apply(&self, x: u32, y: u32, c: u32) -> u32 {
        let cx = self.width as f32 * 0.5;
        let cy = self.height as f32 * 0.5;
        let dx = (x as f32 + 0.5 - cx) / cx;
        let dy = (y as f32 + 0.5 - cy) / cy;
        let falloff = (dx * dx + dy * dy).sqrt() / std::f32::consts::SQRT_2;
        color::darken(c, (falloff * self.strength).clamp(0.0, 1.0))
    }
}
