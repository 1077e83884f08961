//! Surface-to-buffer scaling and point coordinate mapping.
//!
//! The intensity buffer may be smaller than the surface it is presented on.
//! A maximum drawing size caps the buffer resolution through one uniform
//! scale factor, so the aspect ratio of the surface is preserved.

use crate::cache::Cached;
use heatmap_common::{DataPoint, Padding};
use serde::Serialize;

/// Resolution of the intensity buffer and its downscale factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawingSize {
    pub width: u32,
    pub height: u32,
    /// Surface pixels per buffer pixel (>= 1).
    pub scale: f32,
}

/// Compute the buffer size for a surface and an optional size cap.
///
/// `scale = min(width / max_width, height / max_height)` over the axes that
/// have a cap, never below 1. The axis with the smaller ratio gets exactly
/// its cap; the other is `floor(actual / scale)`. Sizes are computed in
/// integers so the capped axis never rounds down below its maximum.
pub fn compute_drawing_size(
    width: u32,
    height: u32,
    max_width: Option<u32>,
    max_height: Option<u32>,
) -> DrawingSize {
    let unscaled = DrawingSize {
        width,
        height,
        scale: 1.0,
    };

    // (actual, max) of the axis with the smallest actual / max ratio
    let axis = |actual: u32, max: Option<u32>| max.filter(|m| *m > 0).map(|m| (actual, m));
    let limiting = match (axis(width, max_width), axis(height, max_height)) {
        (Some(w), Some(h)) => {
            // w.0 / w.1 <= h.0 / h.1 without division
            if w.0 as u64 * h.1 as u64 <= h.0 as u64 * w.1 as u64 {
                w
            } else {
                h
            }
        }
        (Some(w), None) => w,
        (None, Some(h)) => h,
        (None, None) => return unscaled,
    };

    let (actual, max) = limiting;
    if actual <= max {
        return unscaled;
    }

    // floor(dim * max / actual), kept within [1, dim]
    let fit = |dim: u32| ((dim as u64 * max as u64 / actual as u64) as u32).clamp(1, dim.max(1));

    DrawingSize {
        width: fit(width),
        height: fit(height),
        scale: actual as f32 / max as f32,
    }
}

/// Memoized drawing size for the current surface and size cap.
#[derive(Debug, Clone, Default)]
pub struct ScaleMapper {
    surface_width: u32,
    surface_height: u32,
    max_width: Option<u32>,
    max_height: Option<u32>,
    cached: Cached<DrawingSize>,
}

impl ScaleMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.surface_width, self.surface_height)
    }

    /// Record the surface size. Returns true if it changed.
    pub fn set_surface_size(&mut self, width: u32, height: u32) -> bool {
        if (width, height) == (self.surface_width, self.surface_height) {
            return false;
        }
        self.surface_width = width;
        self.surface_height = height;
        self.cached.invalidate();
        true
    }

    pub fn max_drawing_width(&self) -> Option<u32> {
        self.max_width
    }

    pub fn max_drawing_height(&self) -> Option<u32> {
        self.max_height
    }

    pub fn set_max_drawing_width(&mut self, max_width: Option<u32>) {
        if self.max_width != max_width {
            self.max_width = max_width;
            self.cached.invalidate();
        }
    }

    pub fn set_max_drawing_height(&mut self, max_height: Option<u32>) {
        if self.max_height != max_height {
            self.max_height = max_height;
            self.cached.invalidate();
        }
    }

    pub fn drawing_size(&mut self) -> DrawingSize {
        let (w, h, mw, mh) = (
            self.surface_width,
            self.surface_height,
            self.max_width,
            self.max_height,
        );
        *self.cached.get_or_compute(|| compute_drawing_size(w, h, mw, mh))
    }

    pub fn scale(&mut self) -> f32 {
        self.drawing_size().scale
    }

    /// Number of times the drawing size has been computed.
    pub fn recomputes(&self) -> u64 {
        self.cached.rebuilds()
    }
}

/// Maps normalized point coordinates into pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    origin_x: f32,
    origin_y: f32,
    area_width: f32,
    area_height: f32,
}

impl CoordinateMapper {
    /// Mapping into an intensity buffer downscaled by `scale`.
    ///
    /// Both the padded area and the padding itself are divided by `scale`.
    pub fn for_buffer(surface_width: f32, surface_height: f32, padding: Padding, scale: f32) -> Self {
        let scaled = padding.scaled(scale);
        Self {
            origin_x: scaled.left,
            origin_y: scaled.top,
            area_width: padding.inner_width(surface_width) / scale,
            area_height: padding.inner_height(surface_height) / scale,
        }
    }

    /// Mapping onto the full-resolution surface.
    pub fn for_surface(surface_width: f32, surface_height: f32, padding: Padding) -> Self {
        Self::for_buffer(surface_width, surface_height, padding, 1.0)
    }

    pub fn map(&self, point: &DataPoint) -> (f32, f32) {
        (
            self.origin_x + point.x as f32 * self.area_width,
            self.origin_y + point.y as f32 * self.area_height,
        )
    }

    /// Inverse of `map`. `None` when the padded area is empty.
    pub fn unmap(&self, x: f32, y: f32) -> Option<(f64, f64)> {
        if self.area_width <= 0.0 || self.area_height <= 0.0 {
            return None;
        }
        Some((
            ((x - self.origin_x) / self.area_width) as f64,
            ((y - self.origin_y) / self.area_height) as f64,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_constraint_is_identity() {
        let size = compute_drawing_size(640, 480, None, None);
        assert_eq!(size, DrawingSize { width: 640, height: 480, scale: 1.0 });
    }

    #[test]
    fn test_constraint_equal_to_surface() {
        let size = compute_drawing_size(640, 480, Some(640), Some(480));
        assert_eq!(size.scale, 1.0);
        assert_eq!((size.width, size.height), (640, 480));
    }

    #[test]
    fn test_half_constraint_halves_surface() {
        let size = compute_drawing_size(640, 480, Some(320), Some(240));
        assert_eq!(size.scale, 2.0);
        assert_eq!((size.width, size.height), (320, 240));
    }

    #[test]
    fn test_odd_dimension_truncates() {
        // 101 / 50 = 2.02, 50 / 25 = 2.0 -> the smaller ratio wins
        let size = compute_drawing_size(101, 50, Some(50), Some(25));
        assert_eq!(size.scale, 2.0);
        assert_eq!((size.width, size.height), (50, 25));
    }

    #[test]
    fn test_larger_constraint_is_capped() {
        let size = compute_drawing_size(100, 50, Some(1000), Some(1000));
        assert_eq!(size, DrawingSize { width: 100, height: 50, scale: 1.0 });
    }

    #[test]
    fn test_single_axis_constraint() {
        let size = compute_drawing_size(400, 200, Some(100), None);
        assert_eq!(size.scale, 4.0);
        assert_eq!((size.width, size.height), (100, 50));
    }

    #[test]
    fn test_capped_axis_equals_its_maximum() {
        let size = compute_drawing_size(8, 8, Some(7), None);
        assert_eq!((size.width, size.height), (7, 7));

        let size = compute_drawing_size(1000, 600, None, Some(3));
        assert_eq!(size.height, 3);
        assert_eq!(size.width, 5);
    }

    #[test]
    fn test_mapper_memoizes_until_invalidated() {
        let mut mapper = ScaleMapper::new();
        mapper.set_surface_size(200, 100);
        mapper.drawing_size();
        mapper.drawing_size();
        assert_eq!(mapper.recomputes(), 1);

        assert!(!mapper.set_surface_size(200, 100));
        mapper.drawing_size();
        assert_eq!(mapper.recomputes(), 1);

        mapper.set_max_drawing_width(Some(100));
        mapper.set_max_drawing_height(Some(50));
        assert_eq!(mapper.drawing_size().width, 100);
        assert_eq!(mapper.recomputes(), 2);

        assert!(mapper.set_surface_size(400, 200));
        assert_eq!(mapper.drawing_size().scale, 4.0);
        assert_eq!(mapper.recomputes(), 3);
    }

    #[test]
    fn test_buffer_mapping_with_padding() {
        let padding = Padding::new(20.0, 10.0, 20.0, 30.0);
        let mapper = CoordinateMapper::for_surface(200.0, 140.0, padding);
        assert_eq!(mapper.map(&DataPoint::new(0.0, 0.0, 1.0)), (20.0, 10.0));
        assert_eq!(mapper.map(&DataPoint::new(1.0, 1.0, 1.0)), (180.0, 110.0));
        assert_eq!(mapper.map(&DataPoint::new(0.5, 0.5, 1.0)), (100.0, 60.0));

        let scaled = CoordinateMapper::for_buffer(200.0, 140.0, padding, 2.0);
        assert_eq!(scaled.map(&DataPoint::new(0.5, 0.5, 1.0)), (50.0, 30.0));
        assert_eq!(scaled.map(&DataPoint::new(0.0, 1.0, 1.0)), (10.0, 55.0));
    }

    #[test]
    fn test_unmap_inverts_map() {
        let mapper = CoordinateMapper::for_surface(200.0, 100.0, Padding::uniform(10.0));
        let (x, y) = mapper.unmap(100.0, 50.0).unwrap();
        assert!((x - 0.5).abs() < 1e-6);
        assert!((y - 0.5).abs() < 1e-6);

        let degenerate = CoordinateMapper::for_surface(20.0, 20.0, Padding::uniform(10.0));
        assert!(degenerate.unmap(10.0, 10.0).is_none());
    }
}
