//! Heat map overlay rendering.
//!
//! Pipeline, leaf first:
//! - palette: gradient stops sampled into a 256-entry color table
//! - shadow: radial intensity footprints composited into an alpha buffer
//! - colorize: buffer alpha remapped through the palette and opacity rule
//! - scale: optional buffer downscale and point coordinate mapping
//! - marker / tap: point overlays and nearest-point lookup
//!
//! [`HeatMap`] ties these together behind a thread-safe API.

pub mod cache;
pub mod colorize;
pub mod heatmap;
pub mod marker;
pub mod palette;
pub mod scale;
pub mod shadow;
pub mod tap;

pub use cache::{CacheState, Cached};
pub use colorize::{colorize, OpacityRule};
pub use heatmap::{HeatMap, PresentStats};
pub use marker::{CircleMarker, MarkerRenderer};
pub use palette::{Palette, PaletteCache, PALETTE_SIZE};
pub use scale::{compute_drawing_size, CoordinateMapper, DrawingSize, ScaleMapper};
pub use shadow::{FalloffParams, PixelRect, RenderBounds, RepaintStats, ShadowBuffer};
pub use tap::{nearest_point, TapListener};

pub use tiny_skia;
