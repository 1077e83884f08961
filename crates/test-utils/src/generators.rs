//! Point generators for creating synthetic heat map input.
//!
//! Every generator is deterministic so failures reproduce across runs.

use heatmap_common::DataPoint;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates `count` points uniformly spread over the unit square.
///
/// Values are uniform in `[0, 100)`, the default intensity range.
///
/// # Example
///
/// ```
/// use test_utils::random_points;
///
/// let a = random_points(7, 50);
/// let b = random_points(7, 50);
/// assert_eq!(a, b);
/// assert!(a.iter().all(|p| (0.0..1.0).contains(&p.x)));
/// ```
pub fn random_points(seed: u64, count: usize) -> Vec<DataPoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| DataPoint::new(rng.gen(), rng.gen(), rng.gen_range(0.0..100.0)))
        .collect()
}

/// Creates a `cols` x `rows` lattice of points, all with the same value.
///
/// Points sit at cell centers, so none lies on the unit square's edge.
/// Row-major order.
///
/// # Example
///
/// ```
/// use test_utils::grid_points;
///
/// let points = grid_points(2, 2, 5.0);
/// assert_eq!(points.len(), 4);
/// assert_eq!((points[0].x, points[0].y), (0.25, 0.25));
/// assert_eq!((points[3].x, points[3].y), (0.75, 0.75));
/// ```
pub fn grid_points(cols: usize, rows: usize, value: f64) -> Vec<DataPoint> {
    let mut points = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            let x = (col as f64 + 0.5) / cols as f64;
            let y = (row as f64 + 0.5) / rows as f64;
            points.push(DataPoint::new(x, y, value));
        }
    }
    points
}

/// A single point in the middle of the surface.
pub fn centered_point(value: f64) -> DataPoint {
    DataPoint::new(0.5, 0.5, value)
}

/// Points clustered around `(cx, cy)` with a spread of `sigma`.
///
/// Coordinates are clamped to the unit square.
pub fn clustered_points(seed: u64, count: usize, cx: f64, cy: f64, sigma: f64) -> Vec<DataPoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let dx: f64 = rng.gen_range(-1.0..=1.0) * sigma;
            let dy: f64 = rng.gen_range(-1.0..=1.0) * sigma;
            DataPoint::new(
                (cx + dx).clamp(0.0, 1.0),
                (cy + dy).clamp(0.0, 1.0),
                rng.gen_range(0.0..100.0),
            )
        })
        .collect()
}
