//! Configuration for a heat map renderer.

use crate::error::{HeatmapError, HeatmapResult};
use crate::gradient::GradientStops;
use crate::point::Padding;
use serde::{Deserialize, Serialize};

/// Default footprint radius in surface pixels.
pub const DEFAULT_RADIUS: f32 = 200.0;

/// Default blur factor.
pub const DEFAULT_BLUR: f32 = 0.85;

/// Rendering parameters for a heat map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    /// Footprint radius in surface pixels.
    pub radius: f32,

    /// Edge softness in `[0, 1]`. 0 paints hard discs.
    pub blur: f32,

    /// Intensity mapped to the bottom of the gradient.
    pub minimum: f64,

    /// Intensity mapped to the top of the gradient.
    pub maximum: f64,

    /// Flat output alpha for every colorized pixel; 0 disables the override.
    pub opacity: u8,

    /// Lower alpha bound for colorized pixels.
    pub min_opacity: u8,

    /// Upper alpha bound for colorized pixels.
    pub max_opacity: u8,

    pub padding: Padding,

    /// Cap on the intensity buffer width, in pixels.
    pub max_drawing_width: Option<u32>,

    /// Cap on the intensity buffer height, in pixels.
    pub max_drawing_height: Option<u32>,

    pub color_stops: GradientStops,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            blur: DEFAULT_BLUR,
            minimum: 0.0,
            maximum: 100.0,
            opacity: 0,
            min_opacity: 0,
            max_opacity: 255,
            padding: Padding::default(),
            max_drawing_width: None,
            max_drawing_height: None,
            color_stops: GradientStops::default(),
        }
    }
}

impl HeatmapConfig {
    /// Parse configuration from a JSON string. Missing fields take defaults.
    pub fn from_json(json: &str) -> HeatmapResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables over the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(radius) = env_parse("HEATMAP_RADIUS") {
            config.radius = radius;
        }

        if let Some(blur) = env_parse("HEATMAP_BLUR") {
            config.blur = blur;
        }

        if let Some(min) = env_parse("HEATMAP_MIN") {
            config.minimum = min;
        }

        if let Some(max) = env_parse("HEATMAP_MAX") {
            config.maximum = max;
        }

        if let Some(opacity) = env_parse("HEATMAP_OPACITY") {
            config.opacity = opacity;
        }

        if let Some(opacity) = env_parse("HEATMAP_MIN_OPACITY") {
            config.min_opacity = opacity;
        }

        if let Some(opacity) = env_parse("HEATMAP_MAX_OPACITY") {
            config.max_opacity = opacity;
        }

        if let Some(width) = env_parse("HEATMAP_MAX_DRAWING_WIDTH") {
            config.max_drawing_width = Some(width);
        }

        if let Some(height) = env_parse("HEATMAP_MAX_DRAWING_HEIGHT") {
            config.max_drawing_height = Some(height);
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> HeatmapResult<()> {
        validate_blur(self.blur)?;
        validate_radius(self.radius)?;

        if !self.minimum.is_finite() || !self.maximum.is_finite() {
            return Err(HeatmapError::invalid_argument(
                "minimum/maximum",
                "intensity bounds must be finite",
            ));
        }

        if self.max_drawing_width == Some(0) || self.max_drawing_height == Some(0) {
            return Err(HeatmapError::invalid_argument(
                "max_drawing_size",
                "maximum drawing size must be > 0",
            ));
        }

        Ok(())
    }
}

/// Blur must lie in `[0, 1]`.
pub fn validate_blur(blur: f32) -> HeatmapResult<()> {
    if !(0.0..=1.0).contains(&blur) {
        return Err(HeatmapError::invalid_argument(
            "blur",
            format!("must be within [0, 1], got {}", blur),
        ));
    }
    Ok(())
}

/// Radius must be finite and positive.
pub fn validate_radius(radius: f32) -> HeatmapResult<()> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(HeatmapError::invalid_argument(
            "radius",
            format!("must be > 0, got {}", radius),
        ));
    }
    Ok(())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparseable environment override");
            None
        }
    }
}
