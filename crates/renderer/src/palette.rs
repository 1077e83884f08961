//! 256-entry color lookup table built from gradient stops.

use crate::cache::Cached;
use heatmap_common::{Argb, GradientStop, GradientStops, HeatmapResult};
use std::ops::Index;

/// Number of palette entries, one per alpha value.
pub const PALETTE_SIZE: usize = 256;

/// Dense color table indexed by intensity alpha.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [Argb; PALETTE_SIZE],
}

impl Palette {
    /// Sample `stops` at 256 equally spaced positions spanning `[0, 1]`.
    pub fn build(stops: &GradientStops) -> Self {
        let mut colors = [Argb::TRANSPARENT; PALETTE_SIZE];
        for (i, color) in colors.iter_mut().enumerate() {
            let position = i as f64 / (PALETTE_SIZE - 1) as f64;
            *color = stops.color_at(position);
        }
        Self { colors }
    }

    /// Validate raw stops then build. Fails with fewer than two stops.
    pub fn from_stops(stops: &[GradientStop]) -> HeatmapResult<Self> {
        let stops = GradientStops::new(stops.iter().copied())?;
        Ok(Self::build(&stops))
    }

    pub fn get(&self, alpha: u8) -> Argb {
        self.colors[alpha as usize]
    }

    /// Color for a normalized intensity `t`, clamped to `[0, 1]`.
    pub fn color_for(&self, t: f64) -> Argb {
        let index = (t.clamp(0.0, 1.0) * (PALETTE_SIZE - 1) as f64).round() as usize;
        self.colors[index.min(PALETTE_SIZE - 1)]
    }

    pub fn colors(&self) -> &[Argb; PALETTE_SIZE] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        PALETTE_SIZE
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Index<u8> for Palette {
    type Output = Argb;

    fn index(&self, alpha: u8) -> &Argb {
        &self.colors[alpha as usize]
    }
}

/// Gradient stops plus the palette derived from them.
#[derive(Debug, Clone)]
pub struct PaletteCache {
    stops: GradientStops,
    palette: Cached<Palette>,
}

impl PaletteCache {
    pub fn new(stops: GradientStops) -> Self {
        Self {
            stops,
            palette: Cached::new(),
        }
    }

    pub fn stops(&self) -> &GradientStops {
        &self.stops
    }

    /// Replace the stops. The palette is rebuilt on next read if they differ.
    pub fn set_stops(&mut self, stops: GradientStops) {
        if stops != self.stops {
            self.stops = stops;
            self.palette.invalidate();
        }
    }

    pub fn palette(&mut self) -> &Palette {
        let stops = &self.stops;
        self.palette.get_or_compute(|| {
            tracing::trace!(stops = stops.len(), "Rebuilding palette");
            Palette::build(stops)
        })
    }

    /// Number of times the palette has been built.
    pub fn rebuilds(&self) -> u64 {
        self.palette.rebuilds()
    }
}

impl Default for PaletteCache {
    fn default() -> Self {
        Self::new(GradientStops::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_ramp() -> GradientStops {
        GradientStops::from_pairs([(0.0, 0xFF000000u32), (1.0, 0xFFFFFFFF)]).unwrap()
    }

    #[test]
    fn test_palette_has_256_entries() {
        let palette = Palette::build(&gray_ramp());
        assert_eq!(palette.len(), 256);
        assert_eq!(palette.colors().len(), 256);
    }

    #[test]
    fn test_gray_ramp_is_identity() {
        let palette = Palette::build(&gray_ramp());
        for i in 0..=255u8 {
            let c = palette[i];
            assert_eq!((c.a, c.r, c.g, c.b), (255, i, i, i), "entry {}", i);
        }
    }

    #[test]
    fn test_stops_inside_unit_range_clamp_at_ends() {
        let stops = GradientStops::from_pairs([(0.25, 0xFF0000FFu32), (0.75, 0xFFFF0000)]).unwrap();
        let palette = Palette::build(&stops);
        assert_eq!(palette[0], Argb::rgb(0, 0, 255));
        assert_eq!(palette[63], Argb::rgb(0, 0, 255));
        assert_eq!(palette[192], Argb::rgb(255, 0, 0));
        assert_eq!(palette[255], Argb::rgb(255, 0, 0));
    }

    #[test]
    fn test_from_stops_requires_two() {
        let err = Palette::from_stops(&[GradientStop::new(0.0, Argb::BLACK)]).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_color_for() {
        let palette = Palette::build(&gray_ramp());
        assert_eq!(palette.color_for(0.0), palette[0]);
        assert_eq!(palette.color_for(1.0), palette[255]);
        assert_eq!(palette.color_for(7.0), palette[255]);
        assert_eq!(palette.color_for(0.5), palette[128]);
    }

    #[test]
    fn test_cache_rebuilds_only_on_change() {
        let mut cache = PaletteCache::new(gray_ramp());
        let first = cache.palette().clone();
        cache.palette();
        assert_eq!(cache.rebuilds(), 1);

        // Same stops: no rebuild
        cache.set_stops(gray_ramp());
        cache.palette();
        assert_eq!(cache.rebuilds(), 1);

        let red = GradientStops::from_pairs([(0.0, 0xFF000000u32), (1.0, 0xFFFF0000)]).unwrap();
        cache.set_stops(red);
        let second = cache.palette().clone();
        assert_eq!(cache.rebuilds(), 2);
        assert_ne!(first, second);
    }
}
