//! Intensity ("shadow") buffer and radial falloff painting.
//!
//! Every data point paints a black footprint whose alpha encodes its
//! intensity. Footprints are composited with source-over blending, so
//! overlapping points accumulate towards full opacity rather than adding.
//! The buffer also tracks the bounding rectangle of everything painted so the
//! colorizer can skip the untouched parts.

use crate::scale::CoordinateMapper;
use heatmap_common::{DataPoint, HeatmapError, HeatmapResult};
use serde::Serialize;
use tiny_skia::{
    Color, FillRule, GradientStop, Paint, PathBuilder, Pixmap, Point, RadialGradient, SpreadMode,
    Transform,
};

/// Bounding rectangle of painted pixels, inclusive on every edge.
///
/// Coordinates may lie outside the buffer; use [`RenderBounds::clamp_to`]
/// before indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl RenderBounds {
    /// Inverted sentinel: any inclusion replaces every edge.
    pub const EMPTY: RenderBounds = RenderBounds {
        left: i32::MAX,
        top: i32::MAX,
        right: i32::MIN,
        bottom: i32::MIN,
    };

    pub fn is_empty(&self) -> bool {
        self.left > self.right || self.top > self.bottom
    }

    /// Grow to cover the square of half-size `half` centered on `(cx, cy)`.
    pub fn include_square(&mut self, cx: f32, cy: f32, half: f32) {
        self.left = self.left.min((cx - half).floor() as i32);
        self.top = self.top.min((cy - half).floor() as i32);
        self.right = self.right.max((cx + half).ceil() as i32);
        self.bottom = self.bottom.max((cy + half).ceil() as i32);
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    /// Intersection with a `width` x `height` buffer, `None` if empty.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<PixelRect> {
        if self.is_empty() || width == 0 || height == 0 {
            return None;
        }

        let left = self.left.max(0);
        let top = self.top.max(0);
        let right = self.right.min(width as i32 - 1);
        let bottom = self.bottom.min(height as i32 - 1);

        if left > right || top > bottom {
            return None;
        }

        Some(PixelRect {
            x: left as usize,
            y: top as usize,
            width: (right - left + 1) as usize,
            height: (bottom - top + 1) as usize,
        })
    }
}

impl Default for RenderBounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Non-empty pixel rectangle inside a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl PixelRect {
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Per-repaint footprint parameters, in buffer pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FalloffParams {
    pub radius: f32,
    pub blur: f32,
    pub minimum: f64,
    pub maximum: f64,
}

impl FalloffParams {
    /// True when `minimum == maximum`; every point is then painted at full
    /// intensity.
    pub fn is_degenerate(&self) -> bool {
        self.maximum == self.minimum
    }

    /// Normalized footprint alpha for `value`, in `[0, 1]`.
    pub fn normalized_alpha(&self, value: f64) -> f32 {
        if self.is_degenerate() {
            return 1.0;
        }
        let clamped = value.min(self.maximum).max(self.minimum);
        let alpha = (clamped - self.minimum) / (self.maximum - self.minimum);
        if alpha.is_nan() {
            return 0.0;
        }
        alpha.clamp(0.0, 1.0) as f32
    }
}

/// Summary of one full repaint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RepaintStats {
    pub points: usize,
    pub bounds: RenderBounds,
}

/// Single-channel intensity buffer backed by a premultiplied RGBA pixmap.
///
/// Only the alpha channel carries information; the color channels stay black.
pub struct ShadowBuffer {
    pixmap: Pixmap,
    bounds: RenderBounds,
}

impl ShadowBuffer {
    pub fn new(width: u32, height: u32) -> HeatmapResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            HeatmapError::render(format!("cannot allocate {}x{} intensity buffer", width, height))
        })?;
        Ok(Self {
            pixmap,
            bounds: RenderBounds::EMPTY,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn bounds(&self) -> RenderBounds {
        self.bounds
    }

    /// Bounds intersected with the buffer.
    pub fn clamped_bounds(&self) -> Option<PixelRect> {
        self.bounds.clamp_to(self.width(), self.height())
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Alpha at `(x, y)`, `None` outside the buffer.
    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        self.pixmap.pixel(x, y).map(|p| p.alpha())
    }

    /// Reset to fully transparent with empty bounds.
    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
        self.bounds = RenderBounds::EMPTY;
    }

    /// Clear, then paint every point in order.
    pub fn repaint(
        &mut self,
        points: &[DataPoint],
        mapper: &CoordinateMapper,
        params: &FalloffParams,
    ) -> RepaintStats {
        self.clear();

        for point in points {
            let (x, y) = mapper.map(point);
            self.paint_footprint(x, y, params.normalized_alpha(point.value), params);
        }

        RepaintStats {
            points: points.len(),
            bounds: self.bounds,
        }
    }

    /// Paint one footprint centered on buffer coordinates `(x, y)`.
    ///
    /// With no blur this is a solid opaque disc of `radius`. Otherwise a
    /// radial gradient from `alpha` at the center to transparent at
    /// `radius * (1 - blur)` is drawn over a disc of twice the radius.
    pub fn paint_footprint(&mut self, x: f32, y: f32, alpha: f32, params: &FalloffParams) {
        let radius = params.radius;
        let inner = 1.0 - params.blur;

        let mut paint = Paint {
            anti_alias: true,
            ..Paint::default()
        };

        let draw_radius = if inner == 1.0 {
            paint.set_color(Color::BLACK);
            radius
        } else {
            let center = Color::from_rgba8(0, 0, 0, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8);
            let origin = Point::from_xy(x, y);
            let shader = RadialGradient::new(
                origin,
                origin,
                radius * inner,
                vec![
                    GradientStop::new(0.0, center),
                    GradientStop::new(1.0, Color::TRANSPARENT),
                ],
                SpreadMode::Pad,
                Transform::identity(),
            );
            match shader {
                Some(shader) => paint.shader = shader,
                // Zero fade radius (blur == 1): nothing to paint, bounds unchanged.
                None => return,
            }
            2.0 * radius
        };

        self.bounds.include_square(x, y, 2.0 * radius);

        if let Some(path) = PathBuilder::from_circle(x, y, draw_radius) {
            self.pixmap
                .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }
}

impl std::fmt::Debug for ShadowBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShadowBuffer")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("bounds", &self.bounds)
            .finish()
    }
}
