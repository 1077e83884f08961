//! Data points and surface padding.

use serde::{Deserialize, Serialize};

/// A weighted sample placed on the surface.
///
/// `x` and `y` are fractions of the padded surface width and height, so
/// `(0.0, 0.0)` is the top-left corner of the drawable area and `(1.0, 1.0)`
/// the bottom-right. `value` is an arbitrary intensity that is clamped into
/// the heat map's `[minimum, maximum]` range when painted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

impl DataPoint {
    pub fn new(x: f64, y: f64, value: f64) -> Self {
        Self { x, y, value }
    }

    /// Squared Euclidean distance to `(x, y)` in normalized coordinates.
    pub fn distance_sq(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        dx * dx + dy * dy
    }
}

/// Padding in surface pixels, applied before coordinate mapping.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    #[serde(default)]
    pub left: f32,
    #[serde(default)]
    pub top: f32,
    #[serde(default)]
    pub right: f32,
    #[serde(default)]
    pub bottom: f32,
}

impl Padding {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Same padding on every edge.
    pub fn uniform(px: f32) -> Self {
        Self::new(px, px, px, px)
    }

    /// Padding divided by a downscale factor.
    pub fn scaled(&self, scale: f32) -> Self {
        Self::new(
            self.left / scale,
            self.top / scale,
            self.right / scale,
            self.bottom / scale,
        )
    }

    /// Width of the drawable area inside `width`.
    pub fn inner_width(&self, width: f32) -> f32 {
        width - self.left - self.right
    }

    /// Height of the drawable area inside `height`.
    pub fn inner_height(&self, height: f32) -> f32 {
        height - self.top - self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_sq() {
        let p = DataPoint::new(0.25, 0.5, 1.0);
        assert!((p.distance_sq(0.25, 0.5)).abs() < 1e-12);
        assert!((p.distance_sq(0.5, 0.5) - 0.0625).abs() < 1e-12);
    }

    #[test]
    fn test_padding_inner_area() {
        let padding = Padding::new(10.0, 5.0, 30.0, 15.0);
        assert_eq!(padding.inner_width(200.0), 160.0);
        assert_eq!(padding.inner_height(100.0), 80.0);

        let half = padding.scaled(2.0);
        assert_eq!(half, Padding::new(5.0, 2.5, 15.0, 7.5));
    }
}
