//! Error types for grid construction and attribute lookup.

use scivis_core::{AttributeKind, GeometryError};
use thiserror::Error;

/// Errors arising from grid construction or attribute binding.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GridError {
    /// An axis was given zero samples.
    #[error("axis {axis} must have at least one sample")]
    EmptyAxis {
        /// Axis index (0 = x, 1 = y, 2 = z).
        axis: usize,
    },
    /// A uniform axis has a non-finite origin or a spacing that is not
    /// finite and strictly positive.
    #[error("axis {axis}: origin {origin} / spacing {spacing} invalid (spacing must be finite and > 0)")]
    InvalidSpacing {
        /// Axis index.
        axis: usize,
        /// The configured origin.
        origin: f64,
        /// The configured spacing.
        spacing: f64,
    },
    /// Rectilinear coordinates are not finite or not strictly increasing.
    #[error("axis {axis}: coordinate {index} ({value}) is not finite or not strictly increasing")]
    NonMonotonicAxis {
        /// Axis index.
        axis: usize,
        /// Position of the first offending coordinate.
        index: usize,
        /// The offending coordinate value.
        value: f64,
    },
    /// The total point count overflows `usize`.
    #[error("grid dimensions {dims:?} overflow the point count")]
    TooLarge {
        /// The requested dimensions.
        dims: [usize; 3],
    },
    /// An attribute's tuple count does not match the grid's point count.
    #[error("attribute '{name}' has {found} tuples, grid has {expected} points")]
    AttributeLengthMismatch {
        /// Attribute name.
        name: String,
        /// The grid's point count.
        expected: usize,
        /// The attribute's tuple count.
        found: usize,
    },
    /// An attribute with this name is already attached.
    #[error("attribute '{name}' already exists")]
    DuplicateAttribute {
        /// Attribute name.
        name: String,
    },
    /// No attribute with the requested name exists.
    #[error("no point attribute named '{name}'")]
    UnknownAttribute {
        /// The requested name.
        name: String,
    },
    /// The attribute exists but has the wrong kind for the request.
    #[error("attribute '{name}' is {found}, expected {expected}")]
    AttributeKindMismatch {
        /// Attribute name.
        name: String,
        /// The kind the caller required.
        expected: AttributeKind,
        /// The kind actually stored.
        found: AttributeKind,
    },
    /// The grid's bounding box could not be formed.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
