//! Common test fixtures for heat map tests.
//!
//! This module provides pre-defined gradients and surface sizes that cover
//! the usual rendering scenarios.

/// Standard gradients for testing.
pub mod gradients {
    use heatmap_common::{Argb, GradientStop, GradientStops};

    /// Black to white; palette entry `i` is gray level `i`.
    pub fn gray_ramp() -> GradientStops {
        GradientStops::from_pairs([(0.0, 0xFF000000u32), (1.0, 0xFFFFFFFF)])
            .expect("valid stops")
    }

    /// Opaque blue to opaque red.
    pub fn blue_red() -> GradientStops {
        GradientStops::from_pairs([(0.0, 0xFF0000FFu32), (1.0, 0xFFFF0000)])
            .expect("valid stops")
    }

    /// Raw stops for setters taking an iterator.
    pub fn blue_red_stops() -> Vec<GradientStop> {
        vec![
            GradientStop::new(0.0, Argb::rgb(0, 0, 255)),
            GradientStop::new(1.0, Argb::rgb(255, 0, 0)),
        ]
    }

    /// A single stop; always rejected.
    pub fn single_stop() -> Vec<GradientStop> {
        vec![GradientStop::new(0.5, Argb::BLACK)]
    }
}

/// Common surface sizes (width, height) in pixels.
pub mod surfaces {
    pub const SMALL: (u32, u32) = (64, 64);
    pub const PHONE: (u32, u32) = (360, 640);
    pub const TABLET: (u32, u32) = (1024, 768);
    pub const HD: (u32, u32) = (1920, 1080);

    /// Odd dimensions to exercise truncation
    pub const ODD: (u32, u32) = (101, 53);
}

/// Standard JSON inputs.
pub mod json {
    /// A complete style in hex notation.
    pub const HEX_STYLE: &str = r##"{
        "name": "fire",
        "stops": [
            {"position": 0.0, "color": "#000000"},
            {"position": 0.5, "color": "#FF0000"},
            {"position": 1.0, "color": "#FFFF00"}
        ]
    }"##;

    /// Mixed color notations.
    pub const MIXED_STYLE: &str = r##"{
        "stops": [
            {"position": 0.0, "color": [0, 0, 255]},
            {"position": 0.5, "color": "green"},
            {"position": 1.0, "color": 4294901760}
        ]
    }"##;

    /// Partial configuration; the rest takes defaults.
    pub const PARTIAL_CONFIG: &str = r#"{"radius": 24.0, "blur": 0.5, "max_drawing_width": 128}"#;
}
