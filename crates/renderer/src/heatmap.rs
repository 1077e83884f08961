//! The `HeatMap` facade: point intake, guarded repaint and presentation.
//!
//! Two locks split the work. Producers append to the pending buffer under
//! its own short lock and never wait on a repaint. Everything the repaint
//! touches (accumulated points, intensity buffer, bounds, caches, settings)
//! sits behind the render lock. When both are needed the render lock is
//! taken first.

use crate::colorize::{colorize, OpacityRule};
use crate::marker::MarkerRenderer;
use crate::palette::{Palette, PaletteCache};
use crate::scale::{CoordinateMapper, DrawingSize, ScaleMapper};
use crate::shadow::{FalloffParams, PixelRect, RenderBounds, RepaintStats, ShadowBuffer};
use crate::tap::{nearest_point, TapListener};
use heatmap_common::config::{validate_blur, validate_radius};
use heatmap_common::{
    DataPoint, GradientStop, GradientStops, HeatmapConfig, HeatmapError, HeatmapResult, Padding,
};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};
use tracing::{debug, instrument, warn};

/// Result of one `present` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PresentStats {
    /// Pixels recolored by this call; 0 when the buffer was already colorized.
    pub colorized_pixels: usize,
    pub markers_drawn: usize,
}

#[derive(Debug, Default)]
struct PendingPoints {
    points: Vec<DataPoint>,
    clear_requested: bool,
}

#[derive(Debug, Clone, Copy)]
struct Settings {
    radius: f32,
    blur: f32,
    minimum: f64,
    maximum: f64,
    opacity: OpacityRule,
    padding: Padding,
}

struct RenderState {
    settings: Settings,
    palette: PaletteCache,
    scale: ScaleMapper,
    points: Vec<DataPoint>,
    buffer: Option<ShadowBuffer>,
    needs_refresh: bool,
    /// The buffer holds colors rather than intensities.
    colorized: bool,
    marker: Option<Box<dyn MarkerRenderer>>,
    tap_listener: Option<Arc<dyn TapListener>>,
}

impl RenderState {
    fn from_config(config: &HeatmapConfig) -> Self {
        let mut scale = ScaleMapper::new();
        scale.set_max_drawing_width(config.max_drawing_width);
        scale.set_max_drawing_height(config.max_drawing_height);

        Self {
            settings: Settings::from_config(config),
            palette: PaletteCache::new(config.color_stops.clone()),
            scale,
            points: Vec::new(),
            buffer: None,
            needs_refresh: true,
            colorized: false,
            marker: None,
            tap_listener: None,
        }
    }

    fn apply_config(&mut self, config: &HeatmapConfig) {
        self.settings = Settings::from_config(config);
        self.palette.set_stops(config.color_stops.clone());
        self.scale.set_max_drawing_width(config.max_drawing_width);
        self.scale.set_max_drawing_height(config.max_drawing_height);
        self.needs_refresh = true;
    }

    fn surface_mapper(&self) -> CoordinateMapper {
        let (width, height) = self.scale.surface_size();
        CoordinateMapper::for_surface(width as f32, height as f32, self.settings.padding)
    }

    fn repaint(&mut self) -> HeatmapResult<RepaintStats> {
        let started = Instant::now();
        let size = self.scale.drawing_size();

        let buffer = match self.buffer.take() {
            Some(buffer) if buffer.width() == size.width && buffer.height() == size.height => buffer,
            _ => ShadowBuffer::new(size.width, size.height)?,
        };
        let buffer = self.buffer.insert(buffer);

        // Build a stale palette now so present never pays for it
        self.palette.palette();

        let (surface_width, surface_height) = self.scale.surface_size();
        let mapper = CoordinateMapper::for_buffer(
            surface_width as f32,
            surface_height as f32,
            self.settings.padding,
            size.scale,
        );
        let params = FalloffParams {
            radius: self.settings.radius / size.scale,
            blur: self.settings.blur,
            minimum: self.settings.minimum,
            maximum: self.settings.maximum,
        };

        if params.is_degenerate() && !self.points.is_empty() {
            warn!(
                value = params.minimum,
                "Minimum equals maximum, painting every point at full intensity"
            );
        }

        let stats = buffer.repaint(&self.points, &mapper, &params);
        self.needs_refresh = false;
        self.colorized = false;

        debug!(
            points = stats.points,
            buffer_width = size.width,
            buffer_height = size.height,
            scale = size.scale,
            bounds = ?stats.bounds,
            elapsed_us = started.elapsed().as_micros() as u64,
            "Repainted intensity buffer"
        );

        Ok(stats)
    }
}

impl Settings {
    fn from_config(config: &HeatmapConfig) -> Self {
        Self {
            radius: config.radius,
            blur: config.blur,
            minimum: config.minimum,
            maximum: config.maximum,
            opacity: OpacityRule {
                opacity: config.opacity,
                min_opacity: config.min_opacity,
                max_opacity: config.max_opacity,
            },
            padding: config.padding,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Heat map overlay renderer.
///
/// Points are added from any thread with [`HeatMap::add_data`]. They become
/// visible after the next [`HeatMap::refresh`], and [`HeatMap::present`]
/// composites the colorized result onto a caller-provided surface.
///
/// ```ignore
/// let map = HeatMap::new();
/// map.add_data(DataPoint::new(0.5, 0.5, 80.0));
/// map.refresh(false, 512, 512)?;
/// map.present(&mut surface)?;
/// ```
pub struct HeatMap {
    pending: Mutex<PendingPoints>,
    state: Mutex<RenderState>,
}

impl HeatMap {
    /// Heat map with default settings.
    pub fn new() -> Self {
        Self::with_state(RenderState::from_config(&HeatmapConfig::default()))
    }

    pub fn from_config(config: &HeatmapConfig) -> HeatmapResult<Self> {
        config.validate()?;
        Ok(Self::with_state(RenderState::from_config(config)))
    }

    fn with_state(state: RenderState) -> Self {
        Self {
            pending: Mutex::new(PendingPoints::default()),
            state: Mutex::new(state),
        }
    }

    /// Replace every setting with those of `config`.
    pub fn apply_config(&self, config: &HeatmapConfig) -> HeatmapResult<()> {
        config.validate()?;
        lock(&self.state).apply_config(config);
        Ok(())
    }

    /// Snapshot of the current settings.
    pub fn config(&self) -> HeatmapConfig {
        let state = lock(&self.state);
        let settings = state.settings;
        HeatmapConfig {
            radius: settings.radius,
            blur: settings.blur,
            minimum: settings.minimum,
            maximum: settings.maximum,
            opacity: settings.opacity.opacity,
            min_opacity: settings.opacity.min_opacity,
            max_opacity: settings.opacity.max_opacity,
            padding: settings.padding,
            max_drawing_width: state.scale.max_drawing_width(),
            max_drawing_height: state.scale.max_drawing_height(),
            color_stops: state.palette.stops().clone(),
        }
    }

    // ---- point intake ----

    pub fn add_data(&self, point: DataPoint) {
        lock(&self.pending).points.push(point);
    }

    pub fn add_all(&self, points: impl IntoIterator<Item = DataPoint>) {
        lock(&self.pending).points.extend(points);
    }

    /// Drop pending points and, at the next refresh, every accumulated point.
    ///
    /// Points added after this call survive the clear.
    pub fn clear_data(&self) {
        let mut pending = lock(&self.pending);
        pending.points.clear();
        pending.clear_requested = true;
    }

    /// Points added since the last refresh.
    pub fn pending_count(&self) -> usize {
        lock(&self.pending).points.len()
    }

    /// Points merged into the rendered set.
    pub fn point_count(&self) -> usize {
        lock(&self.state).points.len()
    }

    pub fn accumulated(&self) -> Vec<DataPoint> {
        lock(&self.state).points.clone()
    }

    // ---- settings ----

    fn update(&self, f: impl FnOnce(&mut RenderState)) {
        let mut state = lock(&self.state);
        f(&mut state);
        state.needs_refresh = true;
    }

    /// Replace the gradient. Needs at least two distinct positions.
    pub fn set_color_stops(&self, stops: impl IntoIterator<Item = GradientStop>) -> HeatmapResult<()> {
        let stops = GradientStops::new(stops)?;
        self.update(|state| state.palette.set_stops(stops));
        Ok(())
    }

    /// Footprint radius in surface pixels.
    pub fn set_radius(&self, radius: f32) -> HeatmapResult<()> {
        validate_radius(radius)?;
        self.update(|state| state.settings.radius = radius);
        Ok(())
    }

    pub fn set_blur(&self, blur: f32) -> HeatmapResult<()> {
        validate_blur(blur)?;
        self.update(|state| state.settings.blur = blur);
        Ok(())
    }

    pub fn set_minimum(&self, minimum: f64) {
        self.update(|state| state.settings.minimum = minimum);
    }

    pub fn set_maximum(&self, maximum: f64) {
        self.update(|state| state.settings.maximum = maximum);
    }

    pub fn set_opacity(&self, opacity: u8) {
        self.update(|state| state.settings.opacity.opacity = opacity);
    }

    pub fn set_minimum_opacity(&self, min_opacity: u8) {
        self.update(|state| state.settings.opacity.min_opacity = min_opacity);
    }

    pub fn set_maximum_opacity(&self, max_opacity: u8) {
        self.update(|state| state.settings.opacity.max_opacity = max_opacity);
    }

    pub fn set_padding(&self, padding: Padding) {
        self.update(|state| state.settings.padding = padding);
    }

    pub fn set_left_padding(&self, px: f32) {
        self.update(|state| state.settings.padding.left = px);
    }

    pub fn set_top_padding(&self, px: f32) {
        self.update(|state| state.settings.padding.top = px);
    }

    pub fn set_right_padding(&self, px: f32) {
        self.update(|state| state.settings.padding.right = px);
    }

    pub fn set_bottom_padding(&self, px: f32) {
        self.update(|state| state.settings.padding.bottom = px);
    }

    /// Cap the buffer width. `None` removes the cap.
    pub fn set_max_drawing_width(&self, max_width: Option<u32>) -> HeatmapResult<()> {
        check_max_size("max_drawing_width", max_width)?;
        self.update(|state| state.scale.set_max_drawing_width(max_width));
        Ok(())
    }

    /// Cap the buffer height. `None` removes the cap.
    pub fn set_max_drawing_height(&self, max_height: Option<u32>) -> HeatmapResult<()> {
        check_max_size("max_drawing_height", max_height)?;
        self.update(|state| state.scale.set_max_drawing_height(max_height));
        Ok(())
    }

    /// Draw markers over the presented heat map. `None` disables them.
    pub fn set_marker(&self, marker: Option<Box<dyn MarkerRenderer>>) {
        lock(&self.state).marker = marker;
    }

    pub fn set_tap_listener(&self, listener: Option<Arc<dyn TapListener>>) {
        lock(&self.state).tap_listener = listener;
    }

    // ---- rendering ----

    /// Merge pending points and repaint the intensity buffer if anything
    /// changed. Returns whether a repaint happened.
    ///
    /// `width` and `height` are the surface size in pixels.
    #[instrument(skip(self), level = "debug")]
    pub fn refresh(&self, force: bool, width: u32, height: u32) -> HeatmapResult<bool> {
        if width == 0 || height == 0 {
            return Err(HeatmapError::invalid_argument(
                "surface_size",
                format!("must be non-empty, got {}x{}", width, height),
            ));
        }

        let mut state = lock(&self.state);

        let (cleared, merged) = {
            let mut pending = lock(&self.pending);
            (
                std::mem::take(&mut pending.clear_requested),
                std::mem::take(&mut pending.points),
            )
        };

        if cleared {
            state.points.clear();
        }
        let merged_count = merged.len();
        state.points.extend(merged);

        let resized = state.scale.set_surface_size(width, height);

        let dirty = force
            || resized
            || cleared
            || merged_count > 0
            || state.needs_refresh
            || state.buffer.is_none();
        if !dirty {
            return Ok(false);
        }

        state.repaint()?;
        Ok(true)
    }

    /// Colorize the current render bounds and composite the buffer, scaled
    /// to the surface, followed by any markers.
    ///
    /// Colorization runs once per repaint; later calls only composite.
    pub fn present(&self, surface: &mut Pixmap) -> HeatmapResult<PresentStats> {
        let mut guard = lock(&self.state);
        let state = &mut *guard;
        let mut stats = PresentStats::default();

        let Some(buffer) = state.buffer.as_mut() else {
            return Ok(stats);
        };

        let rect = buffer.clamped_bounds();
        if !state.colorized {
            if let Some(rect) = rect {
                let palette = state.palette.palette();
                stats.colorized_pixels =
                    colorize(buffer.pixmap_mut(), rect, palette, state.settings.opacity);
            }
            state.colorized = true;
        }

        if rect.is_some() {
            let scale = state.scale.scale();
            let paint = PixmapPaint {
                quality: if scale == 1.0 {
                    FilterQuality::Nearest
                } else {
                    FilterQuality::Bilinear
                },
                ..PixmapPaint::default()
            };
            surface.draw_pixmap(
                0,
                0,
                buffer.pixmap().as_ref(),
                &paint,
                Transform::from_scale(scale, scale),
                None,
            );
        }

        if let Some(marker) = state.marker.as_deref() {
            let mapper = state.surface_mapper();
            for point in &state.points {
                let (x, y) = mapper.map(point);
                marker.draw(surface, x, y, point);
            }
            stats.markers_drawn = state.points.len();
        }

        debug!(
            colorized = stats.colorized_pixels,
            markers = stats.markers_drawn,
            "Presented heat map"
        );

        Ok(stats)
    }

    // ---- taps ----

    /// Accumulated point nearest to normalized `(x, y)`.
    pub fn nearest_point(&self, x: f64, y: f64) -> Option<DataPoint> {
        nearest_point(&lock(&self.state).points, x, y).copied()
    }

    /// Report the point nearest to normalized `(x, y)` to the tap listener.
    pub fn tap(&self, x: f64, y: f64) -> Option<DataPoint> {
        let (point, listener) = {
            let state = lock(&self.state);
            (
                nearest_point(&state.points, x, y).copied(),
                state.tap_listener.clone(),
            )
        };

        // Listener runs unlocked so it may call back into the map
        if let (Some(point), Some(listener)) = (point.as_ref(), listener) {
            listener.on_point_tapped(point);
        }
        point
    }

    /// Same as [`HeatMap::tap`] for a surface pixel position.
    ///
    /// Uses the surface size of the last refresh.
    pub fn tap_at_pixel(&self, x: f32, y: f32) -> Option<DataPoint> {
        let (nx, ny) = lock(&self.state).surface_mapper().unmap(x, y)?;
        self.tap(nx, ny)
    }

    // ---- inspection ----

    /// Painted area clamped to the buffer, `None` if nothing is visible.
    pub fn render_bounds(&self) -> Option<PixelRect> {
        lock(&self.state)
            .buffer
            .as_ref()
            .and_then(ShadowBuffer::clamped_bounds)
    }

    /// Unclamped painted area; may extend past the buffer edges.
    pub fn raw_bounds(&self) -> RenderBounds {
        lock(&self.state)
            .buffer
            .as_ref()
            .map(ShadowBuffer::bounds)
            .unwrap_or(RenderBounds::EMPTY)
    }

    /// Buffer alpha at `(x, y)`.
    ///
    /// This is the painted intensity until the next `present`, which
    /// recolors the buffer in place.
    pub fn shadow_alpha(&self, x: u32, y: u32) -> Option<u8> {
        lock(&self.state).buffer.as_ref()?.alpha_at(x, y)
    }

    /// Read the buffer through `f`, `None` before the first refresh.
    pub fn with_buffer<R>(&self, f: impl FnOnce(&ShadowBuffer) -> R) -> Option<R> {
        lock(&self.state).buffer.as_ref().map(f)
    }

    pub fn drawing_size(&self) -> DrawingSize {
        lock(&self.state).scale.drawing_size()
    }

    pub fn palette(&self) -> Palette {
        lock(&self.state).palette.palette().clone()
    }

    /// True if a setting changed since the last repaint.
    pub fn needs_refresh(&self) -> bool {
        lock(&self.state).needs_refresh
    }
}

impl Default for HeatMap {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HeatMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("HeatMap")
            .field("points", &state.points.len())
            .field("pending", &lock(&self.pending).points.len())
            .field("buffer", &state.buffer)
            .field("needs_refresh", &state.needs_refresh)
            .finish()
    }
}

fn check_max_size(param: &str, max: Option<u32>) -> HeatmapResult<()> {
    if max == Some(0) {
        return Err(HeatmapError::invalid_argument(param, "must be > 0"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn solid_map() -> HeatMap {
        let map = HeatMap::new();
        map.set_radius(10.0).unwrap();
        map.set_blur(0.0).unwrap();
        map
    }

    #[test]
    fn test_refresh_without_changes_is_skipped() {
        let map = solid_map();
        assert!(map.refresh(false, 50, 50).unwrap());
        assert!(!map.refresh(false, 50, 50).unwrap());
        assert!(map.refresh(true, 50, 50).unwrap());
        assert!(map.refresh(false, 60, 50).unwrap());
    }

    #[test]
    fn test_setter_marks_refresh() {
        let map = solid_map();
        map.refresh(false, 50, 50).unwrap();
        assert!(!map.needs_refresh());
        map.set_opacity(10);
        assert!(map.needs_refresh());
        assert!(map.refresh(false, 50, 50).unwrap());
    }

    #[test]
    fn test_zero_surface_is_rejected() {
        let map = HeatMap::new();
        assert!(map.refresh(false, 0, 10).unwrap_err().is_invalid_argument());
        assert!(map.refresh(false, 10, 0).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let map = HeatMap::new();
        assert!(map.set_blur(1.5).is_err());
        assert!(map.set_radius(0.0).is_err());
        assert!(map.set_max_drawing_width(Some(0)).is_err());
        assert!(map
            .set_color_stops([GradientStop::new(0.0, heatmap_common::Argb::BLACK)])
            .is_err());
        assert_eq!(map.config(), HeatmapConfig::default());
    }

    #[test]
    fn test_pending_then_merged() {
        let map = solid_map();
        map.add_data(DataPoint::new(0.5, 0.5, 100.0));
        map.add_all([DataPoint::new(0.1, 0.1, 1.0), DataPoint::new(0.9, 0.9, 1.0)]);
        assert_eq!(map.pending_count(), 3);
        assert_eq!(map.point_count(), 0);

        map.refresh(false, 40, 40).unwrap();
        assert_eq!(map.pending_count(), 0);
        assert_eq!(map.point_count(), 3);
    }

    #[test]
    fn test_clear_keeps_later_points() {
        let map = solid_map();
        map.add_data(DataPoint::new(0.2, 0.2, 1.0));
        map.refresh(false, 40, 40).unwrap();

        map.clear_data();
        map.add_data(DataPoint::new(0.8, 0.8, 2.0));
        map.refresh(false, 40, 40).unwrap();
        assert_eq!(map.accumulated(), vec![DataPoint::new(0.8, 0.8, 2.0)]);
    }

    #[test]
    fn test_present_colorizes_once() {
        let map = solid_map();
        map.add_data(DataPoint::new(0.5, 0.5, 100.0));
        map.refresh(false, 64, 64).unwrap();

        let mut surface = Pixmap::new(64, 64).unwrap();
        let first = map.present(&mut surface).unwrap();
        assert!(first.colorized_pixels > 0);
        let second = map.present(&mut surface).unwrap();
        assert_eq!(second.colorized_pixels, 0);
    }

    #[test]
    fn test_present_before_refresh_is_noop() {
        let map = HeatMap::new();
        let mut surface = Pixmap::new(8, 8).unwrap();
        assert_eq!(map.present(&mut surface).unwrap(), PresentStats::default());
    }

    #[test]
    fn test_markers_drawn_per_point() {
        let map = solid_map();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        map.set_marker(Some(Box::new(move |_: &mut Pixmap, _: f32, _: f32, _: &DataPoint| {
            seen.fetch_add(1, Ordering::SeqCst);
        })));

        map.add_all([DataPoint::new(0.2, 0.2, 1.0), DataPoint::new(0.7, 0.7, 1.0)]);
        map.refresh(false, 32, 32).unwrap();
        let mut surface = Pixmap::new(32, 32).unwrap();
        let stats = map.present(&mut surface).unwrap();

        assert_eq!(stats.markers_drawn, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_tap_reports_nearest() {
        let map = solid_map();
        let tapped = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&tapped);
        map.set_tap_listener(Some(Arc::new(move |p: &DataPoint| {
            sink.lock().unwrap().push(*p);
        })));

        map.add_all([DataPoint::new(0.25, 0.25, 1.0), DataPoint::new(0.75, 0.75, 2.0)]);
        assert!(map.tap(0.7, 0.7).is_none());

        map.refresh(false, 100, 100).unwrap();
        assert_eq!(map.tap(0.7, 0.7).unwrap().value, 2.0);
        assert_eq!(map.tap_at_pixel(20.0, 30.0).unwrap().value, 1.0);
        assert_eq!(tapped.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = HeatmapConfig::default();
        config.radius = 12.0;
        config.opacity = 40;
        config.max_drawing_width = Some(100);
        let map = HeatMap::from_config(&config).unwrap();
        assert_eq!(map.config(), config);

        config.blur = 3.0;
        assert!(HeatMap::from_config(&config).is_err());
        assert!(map.apply_config(&config).is_err());
    }
}
