//! Test utilities and fixtures for scivis development.
//!
//! Provides fixture grids ([`single_cell`], [`scalar_plane`],
//! [`uniform_flow`], [`vector_grid`], [`random_scalar_plane`]), an
//! analytic [`VectorField`] for integrator tests ([`AnalyticField`]),
//! and a [`MockGrid`] implementing [`GridAccess`] without the
//! structured-grid machinery.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use scivis_core::{
    Attribute, Bounds, CellId, CellPoints, GridAccess, PointId, SampleError, Vec3, VectorField,
};
use scivis_grid::StructuredGrid;

/// Default scalar array name used by the isocontour driver.
pub const PRESSURE: &str = "Pressure";

/// Default vector array name used by the streamline driver.
pub const VECTORS: &str = "vectors";

/// The unit cube `[0, 1]^3`.
pub fn unit_bounds() -> Bounds {
    Bounds::from_extents([0.0, 1.0, 0.0, 1.0, 0.0, 1.0]).expect("unit cube is valid")
}

// ── Scalar fixtures ────────────────────────────────────────────────

/// A single unit quad in the z = 0 plane with corner values given in
/// counter-clockwise order: `(0,0), (1,0), (1,1), (0,1)`.
///
/// Stored under [`PRESSURE`].
pub fn single_cell(ccw_values: [f64; 4]) -> StructuredGrid {
    let [v0, v1, v2, v3] = ccw_values;
    // Point numbering is x-fastest: (0,0) (1,0) (0,1) (1,1).
    StructuredGrid::uniform([2, 2, 1], Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0))
        .expect("valid dims")
        .with_attribute(PRESSURE, Attribute::scalars(vec![v0, v1, v3, v2]))
        .expect("attribute matches point count")
}

/// An `nx * ny` plane at z = 0 with origin 0 and the given spacing,
/// with `f(x, y)` stored under [`PRESSURE`].
pub fn scalar_plane(dims: [usize; 2], spacing: f64, f: impl Fn(f64, f64) -> f64) -> StructuredGrid {
    let grid = StructuredGrid::uniform(
        [dims[0], dims[1], 1],
        Vec3::ZERO,
        Vec3::new(spacing, spacing, 1.0),
    )
    .expect("valid dims");
    let values = (0..grid.point_count())
        .map(|id| {
            let p = grid.point_coord(PointId(id));
            f(p.x, p.y)
        })
        .collect();
    grid.with_attribute(PRESSURE, Attribute::scalars(values))
        .expect("attribute matches point count")
}

/// A unit-spaced plane of uniformly random values in `[-1, 1)`, stored
/// under [`PRESSURE`]. Deterministic for a given `seed`.
pub fn random_scalar_plane(dims: [usize; 2], seed: u64) -> StructuredGrid {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let n = dims[0] * dims[1];
    let values = (0..n).map(|_| rng.random::<f64>() * 2.0 - 1.0).collect();
    StructuredGrid::uniform([dims[0], dims[1], 1], Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0))
        .expect("valid dims")
        .with_attribute(PRESSURE, Attribute::scalars(values))
        .expect("attribute matches point count")
}

// ── Vector fixtures ────────────────────────────────────────────────

/// A grid with `f(p)` sampled at every point, stored under [`VECTORS`].
pub fn vector_grid(
    dims: [usize; 3],
    origin: Vec3,
    spacing: Vec3,
    mut f: impl FnMut(Vec3) -> Vec3,
) -> StructuredGrid {
    let grid = StructuredGrid::uniform(dims, origin, spacing).expect("valid dims");
    let vectors: Vec<Vec3> = (0..grid.point_count())
        .map(|id| f(grid.point_coord(PointId(id))))
        .collect();
    grid.with_attribute(VECTORS, Attribute::vectors(&vectors))
        .expect("attribute matches point count")
}

/// A constant vector field over the unit cube (degenerate axes sit at 0).
pub fn uniform_flow(dims: [usize; 3], velocity: Vec3) -> StructuredGrid {
    let step = |n: usize| if n > 1 { 1.0 / (n - 1) as f64 } else { 1.0 };
    vector_grid(
        dims,
        Vec3::ZERO,
        Vec3::new(step(dims[0]), step(dims[1]), step(dims[2])),
        |_| velocity,
    )
}

/// A random vector field on a unit-spaced grid, components in `[-1, 1)`.
pub fn random_flow(dims: [usize; 3], seed: u64) -> StructuredGrid {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    vector_grid(dims, Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0), |_| {
        Vec3::new(
            rng.random::<f64>() * 2.0 - 1.0,
            rng.random::<f64>() * 2.0 - 1.0,
            rng.random::<f64>() * 2.0 - 1.0,
        )
    })
}

// ── AnalyticField ──────────────────────────────────────────────────

/// A closed-form vector field over a bounding box.
///
/// `sample` evaluates `f` exactly inside the box and reports
/// [`SampleError::OutOfBounds`] outside, matching the grid samplers.
pub struct AnalyticField<F> {
    bounds: Bounds,
    f: F,
}

impl<F: Fn(Vec3) -> Vec3> AnalyticField<F> {
    pub fn new(bounds: Bounds, f: F) -> Self {
        Self { bounds, f }
    }
}

impl<F: Fn(Vec3) -> Vec3> VectorField for AnalyticField<F> {
    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn sample(&self, point: Vec3) -> Result<Vec3, SampleError> {
        if self.bounds.contains(point) {
            Ok((self.f)(point))
        } else {
            Err(SampleError::OutOfBounds {
                point,
                bounds: self.bounds,
            })
        }
    }
}

// ── MockGrid ───────────────────────────────────────────────────────

/// An unstructured stand-in for [`GridAccess`]: explicit points, explicit
/// quad cells, named attributes.
///
/// Cells are taken as given; the caller is responsible for
/// counter-clockwise corner order.
pub struct MockGrid {
    points: Vec<Vec3>,
    cells: Vec<[usize; 4]>,
    attributes: Vec<(String, Attribute)>,
}

impl MockGrid {
    pub fn quads(points: Vec<Vec3>, cells: Vec<[usize; 4]>) -> Self {
        Self {
            points,
            cells,
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.push((name.into(), attribute));
        self
    }
}

impl GridAccess for MockGrid {
    fn dimensions(&self) -> [usize; 3] {
        [self.points.len(), 1, 1]
    }

    fn point_count(&self) -> usize {
        self.points.len()
    }

    fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn cell_dimension(&self) -> usize {
        2
    }

    fn bounds(&self) -> Bounds {
        let mut lo = [f64::INFINITY; 3];
        let mut hi = [f64::NEG_INFINITY; 3];
        for p in &self.points {
            for axis in 0..3 {
                lo[axis] = lo[axis].min(p[axis]);
                hi[axis] = hi[axis].max(p[axis]);
            }
        }
        Bounds::new(Vec3::from_array(lo), Vec3::from_array(hi)).expect("mock grid has points")
    }

    fn point_coord(&self, point: PointId) -> Vec3 {
        self.points[point.0]
    }

    fn cell_point_indices(&self, cell: CellId) -> CellPoints {
        self.cells[cell.0].iter().map(|&i| PointId(i)).collect()
    }

    fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, a)| a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_cell_maps_ccw_values() {
        let g = single_cell([1.0, 2.0, 3.0, 4.0]);
        let a = g.attribute(PRESSURE).unwrap();
        let ids = g.cell_point_indices(CellId(0));
        let ccw: Vec<f64> = ids.iter().map(|p| a.scalar(p.0).unwrap()).collect();
        assert_eq!(ccw, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn random_plane_is_deterministic() {
        let a = random_scalar_plane([4, 4], 7);
        let b = random_scalar_plane([4, 4], 7);
        assert_eq!(
            a.attribute(PRESSURE).unwrap().as_slice(),
            b.attribute(PRESSURE).unwrap().as_slice()
        );
    }

    #[test]
    fn uniform_flow_spans_unit_cube() {
        let g = uniform_flow([3, 5, 1], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(g.bounds().as_extents(), [0.0, 1.0, 0.0, 1.0, 0.0, 0.0]);
    }
}
