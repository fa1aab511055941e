//! Benchmark profiles for the scivis filters.
//!
//! Provides pre-built grids so every benchmark measures the same input:
//!
//! - [`reference_plane`]: 100x100 scalar plane (~10K cells) of seeded noise
//! - [`stress_plane`]: 316x316 scalar plane (~100K cells)
//! - [`vortex_flow`]: swirling vector field on an `n^3` unit-cube grid
//! - [`seed_points`]: deterministic interior seeds via ChaCha8

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use scivis_core::{Attribute, GridAccess, PointId, Vec3};
use scivis_grid::{GridError, StructuredGrid};

/// Scalar array name used by the plane profiles.
pub const SCALARS: &str = "Pressure";

/// Vector array name used by the flow profiles.
pub const VECTORS: &str = "vectors";

/// Build a reference benchmark plane: 100x100 points, values in `[-1, 1)`.
pub fn reference_plane(seed: u64) -> Result<StructuredGrid, GridError> {
    noise_plane(100, seed)
}

/// Build a stress benchmark plane: 316x316 points.
///
/// Same generator as [`reference_plane`] at 10x the cell count.
pub fn stress_plane(seed: u64) -> Result<StructuredGrid, GridError> {
    noise_plane(316, seed)
}

fn noise_plane(n: usize, seed: u64) -> Result<StructuredGrid, GridError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let values = (0..n * n)
        .map(|_| rng.random::<f64>() * 2.0 - 1.0)
        .collect();
    StructuredGrid::uniform([n, n, 1], Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0))?
        .with_attribute(SCALARS, Attribute::scalars(values))
}

/// A vortex about the cube's vertical center line with a slow upward
/// drift, sampled on an `n^3` grid spanning the unit cube.
///
/// Streamlines spiral upward and leave through the top face.
pub fn vortex_flow(n: usize) -> Result<StructuredGrid, GridError> {
    let h = 1.0 / (n.max(2) - 1) as f64;
    let grid = StructuredGrid::uniform([n, n, n], Vec3::ZERO, Vec3::new(h, h, h))?;
    let vectors: Vec<Vec3> = (0..grid.point_count())
        .map(|id| {
            let p = grid.point_coord(PointId(id));
            Vec3::new(-(p.y - 0.5), p.x - 0.5, 0.1)
        })
        .collect();
    grid.with_attribute(VECTORS, Attribute::vectors(&vectors))
}

/// Generate `count` deterministic seeds inside `[0.1, 0.9]^3`.
pub fn seed_points(count: usize, seed: u64) -> Vec<Vec3> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Vec3::new(
                0.1 + 0.8 * rng.random::<f64>(),
                0.1 + 0.8 * rng.random::<f64>(),
                0.1 + 0.8 * rng.random::<f64>(),
            )
        })
        .collect()
}
