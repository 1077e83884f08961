//! Gradient stops defining the heat map color ramp.
//!
//! Stops map a position (typically in `[0, 1]`, where 0 is the minimum
//! intensity and 1 the maximum) to a color. The renderer samples them into a
//! 256-entry palette; this module only owns the stop set and the
//! interpolation rule between stops.
//!
//! Stops can also be loaded from JSON:
//!
//! ```json
//! {
//!   "name": "classic",
//!   "stops": [
//!     {"position": 0.0, "color": "#000000FF"},
//!     {"position": 0.5, "color": "yellow"},
//!     {"position": 1.0, "color": [255, 0, 0]}
//!   ]
//! }
//! ```

use crate::color::Argb;
use crate::error::{HeatmapError, HeatmapResult};
use serde::{Deserialize, Serialize};

/// A single gradient stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub position: f64,
    pub color: Argb,
}

impl GradientStop {
    pub fn new(position: f64, color: Argb) -> Self {
        Self { position, color }
    }
}

/// A validated set of at least two stops, sorted by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<GradientStop>", into = "Vec<GradientStop>")]
pub struct GradientStops {
    stops: Vec<GradientStop>,
}

impl GradientStops {
    /// Build a stop set from stops in any order.
    ///
    /// Stops sharing a position behave like map entries: the one supplied
    /// last wins. Fails if fewer than two distinct positions remain or a
    /// position is not finite.
    pub fn new(stops: impl IntoIterator<Item = GradientStop>) -> HeatmapResult<Self> {
        let mut sorted: Vec<GradientStop> = Vec::new();

        for stop in stops {
            if !stop.position.is_finite() {
                return Err(HeatmapError::invalid_argument(
                    "color_stops",
                    format!("stop position must be finite, got {}", stop.position),
                ));
            }
            match sorted.iter_mut().find(|s| s.position == stop.position) {
                Some(existing) => existing.color = stop.color,
                None => sorted.push(stop),
            }
        }

        if sorted.len() < 2 {
            return Err(HeatmapError::invalid_argument(
                "color_stops",
                format!("a gradient needs at least 2 stops, got {}", sorted.len()),
            ));
        }

        sorted.sort_by(|a, b| a.position.total_cmp(&b.position));
        Ok(Self { stops: sorted })
    }

    /// Build from `(position, color)` pairs.
    pub fn from_pairs<C: Into<Argb>>(pairs: impl IntoIterator<Item = (f64, C)>) -> HeatmapResult<Self> {
        Self::new(pairs.into_iter().map(|(p, c)| GradientStop::new(p, c.into())))
    }

    /// Blue through cyan, green and yellow to red.
    pub fn default_heat() -> Self {
        Self {
            stops: vec![
                GradientStop::new(0.0, Argb::rgb(0, 0, 255)),
                GradientStop::new(0.25, Argb::rgb(0, 255, 255)),
                GradientStop::new(0.5, Argb::rgb(0, 255, 0)),
                GradientStop::new(0.75, Argb::rgb(255, 255, 0)),
                GradientStop::new(1.0, Argb::rgb(255, 0, 0)),
            ],
        }
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Color at `position`, linear between the bracketing stops and clamped
    /// to the first/last stop outside the stop range.
    pub fn color_at(&self, position: f64) -> Argb {
        let first = self.stops[0];
        let last = self.stops[self.stops.len() - 1];

        if position <= first.position {
            return first.color;
        }
        if position >= last.position {
            return last.color;
        }

        for pair in self.stops.windows(2) {
            let (low, high) = (pair[0], pair[1]);
            if position <= high.position {
                let t = (position - low.position) / (high.position - low.position);
                return low.color.lerp(high.color, t);
            }
        }

        last.color
    }
}

impl Default for GradientStops {
    fn default() -> Self {
        Self::default_heat()
    }
}

impl TryFrom<Vec<GradientStop>> for GradientStops {
    type Error = HeatmapError;

    fn try_from(stops: Vec<GradientStop>) -> Result<Self, Self::Error> {
        Self::new(stops)
    }
}

impl From<GradientStops> for Vec<GradientStop> {
    fn from(stops: GradientStops) -> Self {
        stops.stops
    }
}

/// Color representation accepted in style JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    /// Hex string (`"#RRGGBB"`, `"#AARRGGBB"`) or a color name
    Text(String),

    /// `[r, g, b]` or `[r, g, b, a]`
    Array(Vec<u8>),

    /// Packed `0xAARRGGBB`
    Packed(u32),
}

impl ColorValue {
    pub fn to_argb(&self) -> HeatmapResult<Argb> {
        match self {
            ColorValue::Text(s) => Argb::parse(s),
            ColorValue::Array(arr) => match arr.as_slice() {
                [r, g, b] => Ok(Argb::rgb(*r, *g, *b)),
                [r, g, b, a] => Ok(Argb::new(*a, *r, *g, *b)),
                _ => Err(HeatmapError::InvalidColor(format!(
                    "color arrays need 3 or 4 components, got {}",
                    arr.len()
                ))),
            },
            ColorValue::Packed(packed) => Ok(Argb::from_u32(*packed)),
        }
    }
}

/// Stop entry as written in style JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleStop {
    pub position: f64,
    pub color: ColorValue,
}

/// A named gradient as loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientStyle {
    #[serde(default)]
    pub name: Option<String>,

    pub stops: Vec<StyleStop>,
}

impl GradientStyle {
    /// Parse a gradient style from a JSON string.
    pub fn from_json(json: &str) -> HeatmapResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolve colors and validate the stop set.
    pub fn to_stops(&self) -> HeatmapResult<GradientStops> {
        let stops = self
            .stops
            .iter()
            .map(|s| Ok(GradientStop::new(s.position, s.color.to_argb()?)))
            .collect::<HeatmapResult<Vec<_>>>()?;
        GradientStops::new(stops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsorted_stops_are_sorted() {
        let stops = GradientStops::from_pairs([
            (1.0, 0xFFFF0000u32),
            (0.0, 0xFF0000FF),
            (0.5, 0xFF00FF00),
        ])
        .unwrap();
        let positions: Vec<f64> = stops.stops().iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_duplicate_position_last_wins() {
        let stops = GradientStops::from_pairs([
            (0.0, 0xFF000000u32),
            (1.0, 0xFF111111),
            (1.0, 0xFF222222),
        ])
        .unwrap();
        assert_eq!(stops.len(), 2);
        assert_eq!(stops.color_at(1.0), Argb::from_u32(0xFF222222));
    }

    #[test]
    fn test_fewer_than_two_stops_rejected() {
        let err = GradientStops::from_pairs([(0.0, 0xFF000000u32)]).unwrap_err();
        assert!(err.is_invalid_argument());

        // Two entries at the same position collapse to one
        let err = GradientStops::from_pairs([(0.5, 0xFF000000u32), (0.5, 0xFFFFFFFF)]).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_non_finite_position_rejected() {
        let err = GradientStops::from_pairs([(0.0, 0xFF000000u32), (f64::NAN, 0xFFFFFFFF)]).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_color_at_clamps_and_interpolates() {
        let stops = GradientStops::from_pairs([(0.25, 0xFF000000u32), (0.75, 0xFFFFFFFF)]).unwrap();
        assert_eq!(stops.color_at(0.0), Argb::BLACK);
        assert_eq!(stops.color_at(1.0), Argb::rgb(255, 255, 255));
        assert_eq!(stops.color_at(0.5), Argb::rgb(128, 128, 128));
    }

    #[test]
    fn test_parse_style_json() {
        let json = r##"{"name":"classic","stops":[{"position":0.0,"color":"#000000FF"},{"position":0.5,"color":"yellow"},{"position":1.0,"color":[255,0,0]}]}"##;
        let style = GradientStyle::from_json(json).unwrap();
        assert_eq!(style.name.as_deref(), Some("classic"));

        let stops = style.to_stops().unwrap();
        assert_eq!(stops.color_at(0.0), Argb::new(0, 0, 0, 255));
        assert_eq!(stops.color_at(0.5), Argb::rgb(255, 255, 0));
        assert_eq!(stops.color_at(1.0), Argb::rgb(255, 0, 0));
    }

    #[test]
    fn test_style_with_bad_color_fails() {
        let json = r##"{"stops":[{"position":0.0,"color":"#12"},{"position":1.0,"color":"red"}]}"##;
        let style = GradientStyle::from_json(json).unwrap();
        assert!(matches!(style.to_stops(), Err(HeatmapError::InvalidColor(_))));
    }
}
