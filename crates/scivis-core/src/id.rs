//! Strongly-typed point and cell identifiers.

use std::fmt;

/// Identifies a sample point within a grid.
///
/// Structured grids number their points x-fastest:
/// `PointId(i + nx * (j + ny * k))`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(pub usize);

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for PointId {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

/// Identifies an implicit cell within a grid.
///
/// Cells are never stored; a `CellId` is resolved to its corner points
/// on demand through [`GridAccess::cell_point_indices`](crate::GridAccess::cell_point_indices).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub usize);

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for CellId {
    fn from(v: usize) -> Self {
        Self(v)
    }
}
