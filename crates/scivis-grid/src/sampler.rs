//! Trilinear interpolation of point attributes.
//!
//! Samplers borrow a grid and one of its attribute arrays. Queries on
//! the boundary succeed; queries outside return
//! [`SampleError::OutOfBounds`]. Corners with zero weight are skipped,
//! so a query exactly on a sample point returns that point's value
//! bit-for-bit.

use crate::axis::AxisSpan;
use crate::structured::StructuredGrid;
use scivis_core::{Bounds, GridAccess, SampleError, ScalarField, Vec3, VectorField};

/// Interpolates a scalar attribute of a [`StructuredGrid`].
#[derive(Clone, Copy, Debug)]
pub struct ScalarSampler<'g> {
    grid: &'g StructuredGrid,
    values: &'g [f64],
}

/// Interpolates a 3-component vector attribute of a [`StructuredGrid`].
#[derive(Clone, Copy, Debug)]
pub struct VectorSampler<'g> {
    grid: &'g StructuredGrid,
    values: &'g [f64],
}

impl<'g> ScalarSampler<'g> {
    pub(crate) fn new(grid: &'g StructuredGrid, values: &'g [f64]) -> Self {
        Self { grid, values }
    }

    /// The grid being sampled.
    pub fn grid(&self) -> &'g StructuredGrid {
        self.grid
    }
}

impl<'g> VectorSampler<'g> {
    pub(crate) fn new(grid: &'g StructuredGrid, values: &'g [f64]) -> Self {
        Self { grid, values }
    }

    /// The grid being sampled.
    pub fn grid(&self) -> &'g StructuredGrid {
        self.grid
    }
}

impl ScalarField for ScalarSampler<'_> {
    fn bounds(&self) -> Bounds {
        self.grid.bounds()
    }

    fn sample(&self, point: Vec3) -> Result<f64, SampleError> {
        let spans = locate(self.grid, point)?;
        let [v] = trilinear::<1>(self.grid, self.values, &spans);
        Ok(v)
    }
}

impl VectorField for VectorSampler<'_> {
    fn bounds(&self) -> Bounds {
        self.grid.bounds()
    }

    fn sample(&self, point: Vec3) -> Result<Vec3, SampleError> {
        let spans = locate(self.grid, point)?;
        Ok(Vec3::from_array(trilinear::<3>(
            self.grid,
            self.values,
            &spans,
        )))
    }
}

fn locate(grid: &StructuredGrid, point: Vec3) -> Result<[AxisSpan; 3], SampleError> {
    grid.locate(point).ok_or_else(|| SampleError::OutOfBounds {
        point,
        bounds: grid.bounds(),
    })
}

/// Weighted sum over the 8 corners of the containing cell.
///
/// Degenerate axes have `frac == 0`, so their upper corners carry zero
/// weight and are never read.
fn trilinear<const N: usize>(
    grid: &StructuredGrid,
    data: &[f64],
    spans: &[AxisSpan; 3],
) -> [f64; N] {
    let mut out = [0.0; N];
    for corner in 0..8u8 {
        let mut weight = 1.0;
        let mut ijk = [0usize; 3];
        for (axis, span) in spans.iter().enumerate() {
            if corner & (1 << axis) != 0 {
                weight *= span.frac;
                ijk[axis] = span.upper;
            } else {
                weight *= 1.0 - span.frac;
                ijk[axis] = span.lower;
            }
        }
        if weight == 0.0 {
            continue;
        }
        let base = grid.point_index(ijk).0 * N;
        for (c, o) in out.iter_mut().enumerate() {
            *o += weight * data[base + c];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use scivis_core::Attribute;

    fn plane(f: impl Fn(f64, f64) -> f64) -> StructuredGrid {
        let mut values = Vec::new();
        for j in 0..3 {
            for i in 0..4 {
                values.push(f(i as f64, j as f64));
            }
        }
        StructuredGrid::uniform([4, 3, 1], Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0))
            .unwrap()
            .with_attribute("s", Attribute::scalars(values))
            .unwrap()
    }

    #[test]
    fn scalar_exact_at_nodes() {
        let g = plane(|x, y| (x * 1.7).sin() + y * y * 0.3);
        let s = g.scalar_sampler("s").unwrap();
        for (id, &expected) in g.attribute("s").unwrap().as_slice().iter().enumerate() {
            let p = g.point_coord(scivis_core::PointId(id));
            assert_eq!(s.sample(p).unwrap(), expected);
        }
    }

    #[test]
    fn scalar_bilinear_reproduced() {
        let f = |x: f64, y: f64| 2.0 + 3.0 * x - y + 0.5 * x * y;
        let g = plane(f);
        let s = g.scalar_sampler("s").unwrap();
        for &(x, y) in &[(0.25, 0.5), (2.9, 1.1), (3.0, 2.0), (1.5, 0.0)] {
            assert_relative_eq!(
                s.sample(Vec3::new(x, y, 0.0)).unwrap(),
                f(x, y),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn boundary_inclusive_outside_rejected() {
        let g = plane(|_, _| 1.0);
        let s = g.scalar_sampler("s").unwrap();
        assert!(s.sample(Vec3::new(3.0, 2.0, 0.0)).is_ok());
        assert!(s.sample(Vec3::new(0.0, 0.0, 0.0)).is_ok());
        let err = s.sample(Vec3::new(3.0001, 1.0, 0.0)).unwrap_err();
        assert!(matches!(err, SampleError::OutOfBounds { .. }));
        assert!(s.sample(Vec3::new(1.0, 1.0, 1e-9)).is_err());
        assert!(s.sample(Vec3::new(f64::NAN, 1.0, 0.0)).is_err());
    }

    #[test]
    fn vector_trilinear_in_volume() {
        let mut vectors = Vec::new();
        for k in 0..2 {
            for j in 0..2 {
                for i in 0..2 {
                    vectors.push(Vec3::new(i as f64, j as f64, k as f64));
                }
            }
        }
        let g = StructuredGrid::uniform([2, 2, 2], Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0))
            .unwrap()
            .with_attribute("v", Attribute::vectors(&vectors))
            .unwrap();
        let s = g.vector_sampler("v").unwrap();
        let p = Vec3::new(0.25, 0.5, 0.75);
        let v = s.sample(p).unwrap();
        assert_relative_eq!(v.x, 0.25, epsilon = 1e-12);
        assert_relative_eq!(v.y, 0.5, epsilon = 1e-12);
        assert_relative_eq!(v.z, 0.75, epsilon = 1e-12);
    }

    #[test]
    fn sample_or_zero_fills_outside() {
        let vectors = vec![Vec3::new(1.0, 0.0, 0.0); 4];
        let g = StructuredGrid::uniform([2, 2, 1], Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0))
            .unwrap()
            .with_attribute("v", Attribute::vectors(&vectors))
            .unwrap();
        let s = g.vector_sampler("v").unwrap();
        assert_eq!(s.sample_or_zero(Vec3::new(0.5, 0.5, 0.0)), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(s.sample_or_zero(Vec3::new(1.5, 0.5, 0.0)), Vec3::ZERO);
    }
}
