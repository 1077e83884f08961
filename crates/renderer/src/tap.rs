//! Nearest-point lookup for tap notifications.

use heatmap_common::DataPoint;

/// Receives the point nearest to a tap.
pub trait TapListener: Send + Sync {
    fn on_point_tapped(&self, point: &DataPoint);
}

impl<F> TapListener for F
where
    F: Fn(&DataPoint) + Send + Sync,
{
    fn on_point_tapped(&self, point: &DataPoint) {
        self(point)
    }
}

/// Point closest to normalized `(x, y)` by Euclidean distance.
///
/// Ties resolve to the earliest point in `points`.
pub fn nearest_point(points: &[DataPoint], x: f64, y: f64) -> Option<&DataPoint> {
    points
        .iter()
        .map(|p| (p, p.distance_sq(x, y)))
        .filter(|(_, d)| !d.is_nan())
        .fold(None, |best: Option<(&DataPoint, f64)>, (p, d)| match best {
            Some((_, best_d)) if best_d <= d => best,
            _ => Some((p, d)),
        })
        .map(|(p, _)| p)
}
