//! Alpha remap: turns the intensity buffer into colored pixels in place.
//!
//! Each pixel's alpha picks a palette color; the output alpha comes from the
//! opacity rule applied to that same input alpha. Only the render bounds are
//! walked.

use crate::palette::Palette;
use crate::shadow::PixelRect;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tiny_skia::{ColorU8, Pixmap, PremultipliedColorU8};

/// Minimum pixels in the walked rectangle before rows are split across threads
const PARALLEL_THRESHOLD: usize = 4096; // 64x64 or larger

/// Output alpha rules for colorized pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpacityRule {
    /// Flat alpha for every pixel when > 0.
    pub opacity: u8,
    pub min_opacity: u8,
    pub max_opacity: u8,
}

impl Default for OpacityRule {
    fn default() -> Self {
        Self {
            opacity: 0,
            min_opacity: 0,
            max_opacity: 255,
        }
    }
}

impl OpacityRule {
    /// Output alpha for a pixel whose intensity alpha is `alpha`.
    #[inline]
    pub fn effective(&self, alpha: u8) -> u8 {
        if self.opacity > 0 {
            self.opacity
        } else if alpha < self.max_opacity {
            alpha.max(self.min_opacity)
        } else {
            self.max_opacity
        }
    }
}

#[inline(always)]
fn recolor(pixel: PremultipliedColorU8, palette: &Palette, rule: OpacityRule) -> PremultipliedColorU8 {
    let alpha = pixel.alpha();
    let color = palette[alpha];
    ColorU8::from_rgba(color.r, color.g, color.b, rule.effective(alpha)).premultiply()
}

/// Recolor every pixel of `rect` in place. Returns the number of pixels written.
///
/// `rect` must lie inside the pixmap; [`crate::shadow::RenderBounds::clamp_to`]
/// produces such rectangles.
pub fn colorize(pixmap: &mut Pixmap, rect: PixelRect, palette: &Palette, rule: OpacityRule) -> usize {
    let width = pixmap.width() as usize;
    let (x0, x1) = (rect.x, rect.x + rect.width);
    let rows = &mut pixmap.pixels_mut()[rect.y * width..(rect.y + rect.height) * width];

    let recolor_row = |row: &mut [PremultipliedColorU8]| {
        for pixel in &mut row[x0..x1] {
            *pixel = recolor(*pixel, palette, rule);
        }
    };

    if rect.area() >= PARALLEL_THRESHOLD {
        rows.par_chunks_mut(width).for_each(recolor_row);
    } else {
        rows.chunks_mut(width).for_each(recolor_row);
    }

    tracing::trace!(
        x = rect.x,
        y = rect.y,
        width = rect.width,
        height = rect.height,
        "Colorized render bounds"
    );

    rect.area()
}
