use approx::assert_relative_eq;
use proptest::prelude::*;
use scivis_core::{Attribute, GridAccess, PointId, ScalarField, Vec3, VectorField};
use scivis_grid::{GridError, StructuredGrid};

fn trilinear_fn(p: Vec3) -> f64 {
    1.0 + 2.0 * p.x - 0.5 * p.y + 3.0 * p.z + 0.25 * p.x * p.y - p.y * p.z + 0.1 * p.x * p.y * p.z
}

fn volume_with(f: impl Fn(Vec3) -> f64, x: Vec<f64>, y: Vec<f64>, z: Vec<f64>) -> StructuredGrid {
    let grid = StructuredGrid::rectilinear(x, y, z).unwrap();
    let values = (0..grid.point_count())
        .map(|id| f(grid.point_coord(PointId(id))))
        .collect();
    grid.with_attribute("s", Attribute::scalars(values)).unwrap()
}

#[test]
fn rectilinear_volume_reproduces_trilinear_function() {
    let g = volume_with(
        trilinear_fn,
        vec![0.0, 0.5, 2.0, 2.5],
        vec![-1.0, 0.0, 3.0],
        vec![0.0, 1.0],
    );
    let s = g.scalar_sampler("s").unwrap();
    for p in [
        Vec3::new(0.1, -0.9, 0.2),
        Vec3::new(1.7, 2.2, 0.9),
        Vec3::new(2.5, 3.0, 1.0),
        Vec3::new(0.0, -1.0, 0.0),
    ] {
        assert_relative_eq!(s.sample(p).unwrap(), trilinear_fn(p), epsilon = 1e-10);
    }
}

#[test]
fn sampler_bounds_match_grid() {
    let g = volume_with(|_| 0.0, vec![0.0, 1.0], vec![0.0, 2.0], vec![5.0]);
    let s = g.scalar_sampler("s").unwrap();
    assert_eq!(s.bounds(), g.bounds());
}

#[test]
fn vector_sampler_rejects_scalar_array() {
    let g = volume_with(|_| 0.0, vec![0.0, 1.0], vec![0.0, 1.0], vec![0.0]);
    assert!(matches!(
        g.vector_sampler("s"),
        Err(GridError::AttributeKindMismatch { .. })
    ));
}

proptest! {
    #[test]
    fn samples_exact_at_every_node(
        nx in 1usize..6,
        ny in 1usize..6,
        nz in 1usize..4,
        spacing in 0.05f64..3.0,
        origin in -10.0f64..10.0,
    ) {
        let grid = StructuredGrid::uniform(
            [nx, ny, nz],
            Vec3::new(origin, -origin, 0.5 * origin),
            Vec3::new(spacing, 2.0 * spacing, 0.5 * spacing),
        ).unwrap();
        let values: Vec<f64> = (0..grid.point_count()).map(|i| (i as f64 * 0.731).sin()).collect();
        let vectors: Vec<Vec3> = values.iter().map(|&v| Vec3::new(v, -v, 2.0 * v)).collect();
        let grid = grid
            .with_attribute("s", Attribute::scalars(values.clone())).unwrap()
            .with_attribute("v", Attribute::vectors(&vectors)).unwrap();
        let s = grid.scalar_sampler("s").unwrap();
        let v = grid.vector_sampler("v").unwrap();
        for id in 0..grid.point_count() {
            let p = grid.point_coord(PointId(id));
            prop_assert_eq!(s.sample(p).unwrap(), values[id]);
            prop_assert_eq!(v.sample(p).unwrap(), vectors[id]);
        }
    }

    #[test]
    fn interior_samples_stay_within_corner_range(
        tx in 0.0f64..=1.0,
        ty in 0.0f64..=1.0,
        tz in 0.0f64..=1.0,
    ) {
        let grid = volume_with(
            |p| (p.x * 3.1).cos() * (p.y + 0.3).sin() + p.z,
            vec![0.0, 0.4, 1.0],
            vec![0.0, 0.7, 1.0],
            vec![0.0, 1.0],
        );
        let s = grid.scalar_sampler("s").unwrap();
        let (lo, hi) = grid.attribute("s").unwrap().range().unwrap();
        let value = s.sample(Vec3::new(tx, ty, tz)).unwrap();
        prop_assert!(value >= lo - 1e-12 && value <= hi + 1e-12);
    }

    #[test]
    fn outside_points_are_rejected(
        dx in 1e-6f64..10.0,
    ) {
        let grid = volume_with(|_| 1.0, vec![0.0, 1.0], vec![0.0, 1.0], vec![0.0, 1.0]);
        let s = grid.scalar_sampler("s").unwrap();
        prop_assert!(s.sample(Vec3::new(1.0 + dx, 0.5, 0.5)).is_err());
        prop_assert!(s.sample(Vec3::new(0.5, -dx, 0.5)).is_err());
    }
}
