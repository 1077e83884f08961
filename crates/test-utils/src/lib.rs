//! Shared test utilities for the heat map workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Seeded point generators
//! - Standard gradients and surface sizes
//! - Approximate float assertions
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{random_points, fixtures};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro for approximate equality of pixel positions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_coords_approx_eq;
///
/// assert_coords_approx_eq!((10.0001, 20.0001), (10.0, 20.0), 0.001);
/// ```
#[macro_export]
macro_rules! assert_coords_approx_eq {
    (($x1:expr, $y1:expr), ($x2:expr, $y2:expr), $epsilon:expr) => {{
        $crate::assert_approx_eq!($x1, $x2, $epsilon);
        $crate::assert_approx_eq!($y1, $y2, $epsilon);
    }};
    ($left:expr, ($x2:expr, $y2:expr), $epsilon:expr) => {{
        let (x1, y1) = $left;
        $crate::assert_approx_eq!(x1, $x2, $epsilon);
        $crate::assert_approx_eq!(y1, $y2, $epsilon);
    }};
}

/// Pixel alpha within `tolerance` of an expected value.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_alpha_near;
///
/// assert_alpha_near!(127u8, 128u8, 2);
/// ```
#[macro_export]
macro_rules! assert_alpha_near {
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let actual = $actual as i32;
        let expected = $expected as i32;
        let tolerance = $tolerance as i32;
        if (actual - expected).abs() > tolerance {
            panic!(
                "alpha mismatch: got {}, expected {} (tolerance {})",
                actual, expected, tolerance
            );
        }
    }};
}
