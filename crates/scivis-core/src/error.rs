//! Error types shared across the scivis workspace.
//!
//! Organized by concern: field sampling and geometry construction.
//! Grid construction, filter, and file-format errors live in their
//! own crates and wrap these where needed.

use crate::geometry::{Bounds, Vec3};
use thiserror::Error;

/// Errors from interpolated field lookups.
///
/// Returned by [`ScalarField::sample`](crate::ScalarField::sample) and
/// [`VectorField::sample`](crate::VectorField::sample).
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SampleError {
    /// The query point lies outside the field's bounding box, or has a
    /// NaN component.
    #[error("point {point} is outside the field bounds {bounds}")]
    OutOfBounds {
        /// The offending query point.
        point: Vec3,
        /// The field's bounding box.
        bounds: Bounds,
    },
}

/// Errors from constructing geometric values or line output.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GeometryError {
    /// A bounding box has `min > max` or a non-finite component on one axis.
    #[error("invalid bounds on axis {axis}: min {min} > max {max} or not finite")]
    InvalidBounds {
        /// Axis index (0 = x, 1 = y, 2 = z).
        axis: usize,
        /// Lower bound on that axis.
        min: f64,
        /// Upper bound on that axis.
        max: f64,
    },
    /// A connectivity record refers to a point that does not exist.
    #[error("line {line} references point {index}, but only {point_count} points exist")]
    ConnectivityOutOfRange {
        /// Index of the offending line cell.
        line: usize,
        /// The out-of-range point index.
        index: usize,
        /// Number of points in the geometry.
        point_count: usize,
    },
}
