//! Common types shared by the heat map renderer and its front ends.

pub mod color;
pub mod config;
pub mod error;
pub mod gradient;
pub mod point;

pub use color::Argb;
pub use config::HeatmapConfig;
pub use error::{HeatmapError, HeatmapResult};
pub use gradient::{ColorValue, GradientStop, GradientStops, GradientStyle};
pub use point::{DataPoint, Padding};
