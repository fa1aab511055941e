//! Errors returned by the isocontour extractor and streamline tracer.

use crate::config::ConfigError;
use scivis_core::{Bounds, Vec3};
use scivis_grid::GridError;
use thiserror::Error;

/// Errors from running a filter.
///
/// Numerical degeneracies are not errors: degenerate edges and odd
/// crossing counts are skipped and counted in
/// [`ExtractMetrics`](crate::ExtractMetrics), and leaving the domain
/// while tracing is a normal [`Termination`](crate::Termination).
#[derive(Clone, Debug, PartialEq, Error)]
pub enum FilterError {
    /// Attribute lookup or grid access failed.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// The filter was configured with invalid parameters.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// The grid's cells have the wrong topological dimension.
    #[error("expected a grid of {expected}D cells, found {found}D")]
    UnsupportedCellDimension {
        /// The dimension the filter requires.
        expected: usize,
        /// The grid's cell dimension.
        found: usize,
    },
    /// A cell reported a corner count that does not match its dimension.
    #[error("cell {cell} has {corners} corners, expected {expected}")]
    MalformedCell {
        /// Index of the offending cell.
        cell: usize,
        /// Number of corners reported.
        corners: usize,
        /// Number of corners required.
        expected: usize,
    },
    /// The streamline seed lies outside the field's domain.
    #[error("seed {seed} is outside the field bounds {bounds}")]
    SeedOutOfBounds {
        /// The requested seed.
        seed: Vec3,
        /// The field's bounding box.
        bounds: Bounds,
    },
}
