//! Point markers drawn on top of the colorized heat map.

use heatmap_common::{Argb, DataPoint};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

/// Draws one marker per accumulated point.
///
/// `x` and `y` are surface pixel coordinates of the point after padding.
pub trait MarkerRenderer: Send + Sync {
    fn draw(&self, surface: &mut Pixmap, x: f32, y: f32, point: &DataPoint);
}

impl<F> MarkerRenderer for F
where
    F: Fn(&mut Pixmap, f32, f32, &DataPoint) + Send + Sync,
{
    fn draw(&self, surface: &mut Pixmap, x: f32, y: f32, point: &DataPoint) {
        self(surface, x, y, point)
    }
}

/// Filled circle of fixed radius and color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleMarker {
    pub radius: f32,
    pub color: Argb,
}

impl CircleMarker {
    pub const DEFAULT_RADIUS: f32 = 6.0;

    /// Semi-opaque white
    pub const DEFAULT_COLOR: Argb = Argb::new(0xC0, 0xFF, 0xFF, 0xFF);

    pub fn new(radius: f32, color: Argb) -> Self {
        Self { radius, color }
    }
}

impl Default for CircleMarker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RADIUS, Self::DEFAULT_COLOR)
    }
}

impl MarkerRenderer for CircleMarker {
    fn draw(&self, surface: &mut Pixmap, x: f32, y: f32, _point: &DataPoint) {
        let mut paint = Paint::default();
        paint.set_color_rgba8(self.color.r, self.color.g, self.color.b, self.color.a);
        paint.anti_alias = true;

        if let Some(path) = PathBuilder::from_circle(x, y, self.radius) {
            surface.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }
}
