//! GridAccess trait compliance test helpers.
//!
//! These functions verify that a grid implementation satisfies the
//! numbering and ordering contract documented on [`GridAccess`].

use indexmap::IndexSet;
use scivis_core::{CellId, GridAccess, PointId};

/// Assert that point and cell counts agree with the dimensions.
pub fn assert_counts_match_dimensions(grid: &dyn GridAccess) {
    let dims = grid.dimensions();
    assert_eq!(grid.point_count(), dims.iter().product::<usize>());
    let active: Vec<usize> = dims.iter().copied().filter(|&d| d > 1).collect();
    assert_eq!(grid.cell_dimension(), active.len());
    let expected_cells = if active.is_empty() {
        0
    } else {
        active.iter().map(|d| d - 1).product()
    };
    assert_eq!(grid.cell_count(), expected_cells, "dims {dims:?}");
}

/// Assert that the bounds are exactly the extent of the point coordinates.
pub fn assert_bounds_tight(grid: &dyn GridAccess) {
    let bounds = grid.bounds();
    let mut lo = [f64::INFINITY; 3];
    let mut hi = [f64::NEG_INFINITY; 3];
    for id in 0..grid.point_count() {
        let p = grid.point_coord(PointId(id));
        assert!(bounds.contains(p), "point {id} at {p} outside {bounds}");
        for axis in 0..3 {
            lo[axis] = lo[axis].min(p[axis]);
            hi[axis] = hi[axis].max(p[axis]);
        }
    }
    assert_eq!(bounds.min().to_array(), lo);
    assert_eq!(bounds.max().to_array(), hi);
}

/// Assert that every cell has `2^dim` distinct, in-range corners.
pub fn assert_cell_corners_valid(grid: &dyn GridAccess) {
    let expected = 1usize << grid.cell_dimension();
    for c in 0..grid.cell_count() {
        let corners = grid.cell_point_indices(CellId(c));
        assert_eq!(corners.len(), expected, "cell {c}");
        let unique: IndexSet<usize> = corners.iter().map(|p| p.0).collect();
        assert_eq!(unique.len(), corners.len(), "cell {c} repeats a corner");
        for p in &corners {
            assert!(p.0 < grid.point_count(), "cell {c} corner {p} out of range");
        }
    }
}

/// Assert that every point is a corner of some cell (when cells exist).
pub fn assert_cells_cover_points(grid: &dyn GridAccess) {
    if grid.cell_count() == 0 {
        return;
    }
    let mut seen = IndexSet::new();
    for c in 0..grid.cell_count() {
        seen.extend(grid.cell_point_indices(CellId(c)).iter().map(|p| p.0));
    }
    assert_eq!(seen.len(), grid.point_count());
}

/// Assert that 2D cell corners wind counter-clockwise in the plane of
/// the two non-degenerate axes.
pub fn assert_quads_counter_clockwise(grid: &dyn GridAccess) {
    if grid.cell_dimension() != 2 {
        return;
    }
    let dims = grid.dimensions();
    let plane: Vec<usize> = (0..3).filter(|&a| dims[a] > 1).collect();
    let (a, b) = (plane[0], plane[1]);
    for c in 0..grid.cell_count() {
        let corners = grid.cell_point_indices(CellId(c));
        let pts: Vec<_> = corners.iter().map(|&p| grid.point_coord(p)).collect();
        let mut area2 = 0.0;
        for i in 0..pts.len() {
            let (p, q) = (pts[i], pts[(i + 1) % pts.len()]);
            area2 += p[a] * q[b] - q[a] * p[b];
        }
        assert!(area2 > 0.0, "cell {c} winds clockwise (signed area {area2})");
    }
}

/// Run all compliance checks.
pub fn run_full_compliance(grid: &dyn GridAccess) {
    assert_counts_match_dimensions(grid);
    assert_bounds_tight(grid);
    assert_cell_corners_valid(grid);
    assert_cells_cover_points(grid);
    assert_quads_counter_clockwise(grid);
}
