//! Capability traits for grid access and field sampling.
//!
//! Algorithms never depend on a concrete grid type. The isocontour
//! extractor reads node values through [`GridAccess`]; the streamline
//! tracer reads interpolated vectors through [`VectorField`].

use crate::error::SampleError;
use crate::field::Attribute;
use crate::geometry::{Bounds, Vec3};
use crate::id::{CellId, PointId};
use smallvec::SmallVec;

/// Corner point ids of one cell (2 for lines, 4 for quads, 8 for hexahedra).
pub type CellPoints = SmallVec<[PointId; 8]>;

/// Index-based read access to a grid of sample points.
///
/// Any grid-shaped in-memory structure can implement this: the contract
/// is only about point and cell numbering, coordinates, and named
/// attribute arrays.
///
/// # Cell point ordering
///
/// [`cell_point_indices`](Self::cell_point_indices) must return the
/// corners of a 2D cell in counter-clockwise order. 3D cells list the
/// bottom face counter-clockwise followed by the top face in the same
/// rotational order. Segment topology in the isocontour extractor
/// depends on this ordering.
pub trait GridAccess {
    /// Number of samples along x, y, and z.
    fn dimensions(&self) -> [usize; 3];

    /// Total number of sample points.
    fn point_count(&self) -> usize;

    /// Total number of implicit cells.
    fn cell_count(&self) -> usize;

    /// Topological dimension of the cells (number of axes with more
    /// than one sample).
    fn cell_dimension(&self) -> usize;

    /// Axis-aligned bounding box of all sample points.
    fn bounds(&self) -> Bounds;

    /// Coordinate of a sample point.
    ///
    /// # Panics
    ///
    /// Implementations may panic if `point` is out of range.
    fn point_coord(&self, point: PointId) -> Vec3;

    /// Corner point ids of a cell, in the order described above.
    ///
    /// # Panics
    ///
    /// Implementations may panic if `cell` is out of range.
    fn cell_point_indices(&self, cell: CellId) -> CellPoints;

    /// Look up a point attribute by name.
    fn attribute(&self, name: &str) -> Option<&Attribute>;
}

/// An interpolated scalar field over a bounded domain.
pub trait ScalarField {
    /// The domain in which [`sample`](Self::sample) succeeds.
    fn bounds(&self) -> Bounds;

    /// Interpolated value at `point`.
    ///
    /// Points on the boundary are accepted. Points outside the bounds
    /// return [`SampleError::OutOfBounds`].
    fn sample(&self, point: Vec3) -> Result<f64, SampleError>;
}

/// An interpolated 3-vector field over a bounded domain.
pub trait VectorField {
    /// The domain in which [`sample`](Self::sample) succeeds.
    fn bounds(&self) -> Bounds;

    /// Interpolated vector at `point`.
    ///
    /// Points on the boundary are accepted. Points outside the bounds
    /// return [`SampleError::OutOfBounds`].
    fn sample(&self, point: Vec3) -> Result<Vec3, SampleError>;

    /// The sampled vector, or the zero vector when
    /// `point` lies outside the domain.
    ///
    /// Integrators use this for intermediate stage evaluations, which may
    /// step past the boundary even when the accepted points never do.
    fn sample_or_zero(&self, point: Vec3) -> Vec3 {
        self.sample(point).unwrap_or(Vec3::ZERO)
    }
}

impl<T: VectorField + ?Sized> VectorField for &T {
    fn bounds(&self) -> Bounds {
        (**self).bounds()
    }

    fn sample(&self, point: Vec3) -> Result<Vec3, SampleError> {
        (**self).sample(point)
    }

    fn sample_or_zero(&self, point: Vec3) -> Vec3 {
        (**self).sample_or_zero(point)
    }
}

impl<T: ScalarField + ?Sized> ScalarField for &T {
    fn bounds(&self) -> Bounds {
        (**self).bounds()
    }

    fn sample(&self, point: Vec3) -> Result<f64, SampleError> {
        (**self).sample(point)
    }
}
