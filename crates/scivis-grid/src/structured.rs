//! Axis-aligned structured grids with named point attributes.

use crate::axis::{Axis, AxisSpan};
use crate::error::GridError;
use crate::sampler::{ScalarSampler, VectorSampler};
use indexmap::IndexMap;
use scivis_core::{
    Attribute, AttributeKind, Bounds, CellId, CellPoints, GridAccess, PointId, Vec3,
};
use smallvec::{smallvec, SmallVec};

/// A grid of sample points on three axes, uniform or rectilinear.
///
/// Points are numbered with x varying fastest, then y, then z:
/// `id = i + nx * (j + ny * k)`.
///
/// Cells span every axis with more than one sample. An axis with a
/// single sample is degenerate and contributes no cell extent, so a
/// `[nx, ny, 1]` grid is a plane of quads and a `[nx, 1, 1]` grid is a
/// line of segments. Cells are numbered the same way as points, x
/// fastest over the non-degenerate axes.
///
/// # Examples
///
/// ```
/// use scivis_core::{Attribute, GridAccess, Vec3};
/// use scivis_grid::StructuredGrid;
///
/// let grid = StructuredGrid::uniform([3, 2, 1], Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0))
///     .unwrap()
///     .with_attribute("Pressure", Attribute::scalars(vec![0.0; 6]))
///     .unwrap();
///
/// assert_eq!(grid.point_count(), 6);
/// assert_eq!(grid.cell_count(), 2);
/// assert_eq!(grid.cell_dimension(), 2);
/// assert!(grid.attribute("Pressure").is_some());
/// ```
#[derive(Clone, Debug)]
pub struct StructuredGrid {
    axes: [Axis; 3],
    dims: [usize; 3],
    point_count: usize,
    bounds: Bounds,
    /// Indices of the axes with more than one sample, ascending.
    active: SmallVec<[usize; 3]>,
    attributes: IndexMap<String, Attribute>,
}

impl StructuredGrid {
    /// Create a grid from three validated axes with no attributes.
    pub fn new(axes: [Axis; 3]) -> Result<Self, GridError> {
        for (axis, a) in axes.iter().enumerate() {
            a.validate(axis)?;
        }
        let dims = [axes[0].len(), axes[1].len(), axes[2].len()];
        let point_count = dims
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or(GridError::TooLarge { dims })?;
        let bounds = Bounds::new(
            Vec3::new(axes[0].min(), axes[1].min(), axes[2].min()),
            Vec3::new(axes[0].max(), axes[1].max(), axes[2].max()),
        )?;
        let active = (0..3).filter(|&a| !axes[a].is_degenerate()).collect();
        Ok(Self {
            axes,
            dims,
            point_count,
            bounds,
            active,
            attributes: IndexMap::new(),
        })
    }

    /// Evenly spaced grid (image data).
    pub fn uniform(dims: [usize; 3], origin: Vec3, spacing: Vec3) -> Result<Self, GridError> {
        Self::new([
            Axis::uniform(origin.x, spacing.x, dims[0]),
            Axis::uniform(origin.y, spacing.y, dims[1]),
            Axis::uniform(origin.z, spacing.z, dims[2]),
        ])
    }

    /// Grid with explicit per-axis coordinates.
    pub fn rectilinear(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>) -> Result<Self, GridError> {
        Self::new([
            Axis::rectilinear(x),
            Axis::rectilinear(y),
            Axis::rectilinear(z),
        ])
    }

    /// Builder-style [`insert_attribute`](Self::insert_attribute).
    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        attribute: Attribute,
    ) -> Result<Self, GridError> {
        self.insert_attribute(name, attribute)?;
        Ok(self)
    }

    /// Attach a point attribute.
    ///
    /// The tuple count must equal the point count, and names are unique.
    pub fn insert_attribute(
        &mut self,
        name: impl Into<String>,
        attribute: Attribute,
    ) -> Result<(), GridError> {
        let name = name.into();
        if self.attributes.contains_key(&name) {
            return Err(GridError::DuplicateAttribute { name });
        }
        if attribute.tuple_count() != self.point_count {
            return Err(GridError::AttributeLengthMismatch {
                name,
                expected: self.point_count,
                found: attribute.tuple_count(),
            });
        }
        self.attributes.insert(name, attribute);
        Ok(())
    }

    /// Look up an attribute and check its kind.
    pub fn attribute_of_kind(
        &self,
        name: &str,
        kind: AttributeKind,
    ) -> Result<&Attribute, GridError> {
        let attribute = self
            .attributes
            .get(name)
            .ok_or_else(|| GridError::UnknownAttribute {
                name: name.to_string(),
            })?;
        if attribute.kind() != kind {
            return Err(GridError::AttributeKindMismatch {
                name: name.to_string(),
                expected: kind,
                found: attribute.kind(),
            });
        }
        Ok(attribute)
    }

    /// Attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The three axes.
    pub fn axes(&self) -> &[Axis; 3] {
        &self.axes
    }

    /// Per-axis spacing, if every axis is uniform.
    pub fn spacing(&self) -> Option<Vec3> {
        Some(Vec3::new(
            self.axes[0].spacing()?,
            self.axes[1].spacing()?,
            self.axes[2].spacing()?,
        ))
    }

    /// Coordinate of point `(0, 0, 0)`.
    pub fn origin(&self) -> Vec3 {
        self.bounds.min()
    }

    /// Point id of the sample at `[i, j, k]`.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if an index is out of range.
    pub fn point_index(&self, ijk: [usize; 3]) -> PointId {
        debug_assert!(
            ijk.iter().zip(&self.dims).all(|(i, d)| i < d),
            "point index {ijk:?} out of range for dims {:?}",
            self.dims
        );
        PointId(ijk[0] + self.dims[0] * (ijk[1] + self.dims[1] * ijk[2]))
    }

    /// Inverse of [`point_index`](Self::point_index).
    pub fn point_ijk(&self, point: PointId) -> [usize; 3] {
        let [nx, ny, _] = self.dims;
        let i = point.0 % nx;
        let j = (point.0 / nx) % ny;
        let k = point.0 / (nx * ny);
        [i, j, k]
    }

    /// Trilinear sampler over a scalar attribute.
    pub fn scalar_sampler(&self, name: &str) -> Result<ScalarSampler<'_>, GridError> {
        let attribute = self.attribute_of_kind(name, AttributeKind::Scalar)?;
        Ok(ScalarSampler::new(self, attribute.as_slice()))
    }

    /// Trilinear sampler over a vector attribute.
    pub fn vector_sampler(&self, name: &str) -> Result<VectorSampler<'_>, GridError> {
        let attribute = self.attribute_of_kind(name, AttributeKind::Vector)?;
        Ok(VectorSampler::new(self, attribute.as_slice()))
    }

    /// Interval containing `point` on each axis, or `None` if outside.
    pub(crate) fn locate(&self, point: Vec3) -> Option<[AxisSpan; 3]> {
        Some([
            self.axes[0].locate(point.x)?,
            self.axes[1].locate(point.y)?,
            self.axes[2].locate(point.z)?,
        ])
    }
}

impl GridAccess for StructuredGrid {
    fn dimensions(&self) -> [usize; 3] {
        self.dims
    }

    fn point_count(&self) -> usize {
        self.point_count
    }

    fn cell_count(&self) -> usize {
        if self.active.is_empty() {
            return 0;
        }
        self.active
            .iter()
            .map(|&a| self.axes[a].cell_len())
            .product()
    }

    fn cell_dimension(&self) -> usize {
        self.active.len()
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn point_coord(&self, point: PointId) -> Vec3 {
        let [i, j, k] = self.point_ijk(point);
        Vec3::new(
            self.axes[0].coord(i),
            self.axes[1].coord(j),
            self.axes[2].coord(k),
        )
    }

    fn cell_point_indices(&self, cell: CellId) -> CellPoints {
        assert!(
            cell.0 < self.cell_count(),
            "cell {cell} out of range ({} cells)",
            self.cell_count()
        );
        let mut base = [0usize; 3];
        let mut rem = cell.0;
        for &a in &self.active {
            let n = self.axes[a].cell_len();
            base[a] = rem % n;
            rem /= n;
        }
        let corner = |steps: &[usize]| {
            let mut ijk = base;
            for &a in steps {
                ijk[a] += 1;
            }
            self.point_index(ijk)
        };
        match *self.active.as_slice() {
            [a] => smallvec![corner(&[]), corner(&[a])],
            [a, b] => smallvec![corner(&[]), corner(&[a]), corner(&[a, b]), corner(&[b])],
            [x, y, z] => smallvec![
                corner(&[]),
                corner(&[x]),
                corner(&[x, y]),
                corner(&[y]),
                corner(&[z]),
                corner(&[x, z]),
                corner(&[x, y, z]),
                corner(&[y, z]),
            ],
            _ => CellPoints::new(),
        }
    }

    fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;

    fn unit(dims: [usize; 3]) -> StructuredGrid {
        StructuredGrid::uniform(dims, Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0)).unwrap()
    }

    // ---- construction ----

    #[test]
    fn uniform_grid_counts() {
        let g = unit([4, 3, 2]);
        assert_eq!(g.dimensions(), [4, 3, 2]);
        assert_eq!(g.point_count(), 24);
        assert_eq!(g.cell_count(), 3 * 2);
        assert_eq!(g.cell_dimension(), 3);
        assert_eq!(g.bounds().as_extents(), [0.0, 3.0, 0.0, 2.0, 0.0, 1.0]);
        assert_eq!(g.spacing(), Some(Vec3::new(1.0, 1.0, 1.0)));
    }

    #[test]
    fn rectilinear_grid_bounds_and_no_spacing() {
        let g = StructuredGrid::rectilinear(vec![0.0, 1.0, 4.0], vec![-1.0, 1.0], vec![0.0])
            .unwrap();
        assert_eq!(g.bounds().as_extents(), [0.0, 4.0, -1.0, 1.0, 0.0, 0.0]);
        assert_eq!(g.spacing(), None);
        assert_eq!(g.cell_dimension(), 2);
        assert_eq!(g.point_coord(PointId(2)), Vec3::new(4.0, -1.0, 0.0));
    }

    #[test]
    fn zero_sample_axis_rejected() {
        let err = StructuredGrid::uniform([3, 0, 1], Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0))
            .unwrap_err();
        assert_eq!(err, GridError::EmptyAxis { axis: 1 });
    }

    #[test]
    fn single_point_grid_has_no_cells() {
        let g = unit([1, 1, 1]);
        assert_eq!(g.point_count(), 1);
        assert_eq!(g.cell_count(), 0);
        assert_eq!(g.cell_dimension(), 0);
    }

    // ---- numbering ----

    #[test]
    fn points_are_x_fastest() {
        let g = unit([3, 2, 2]);
        assert_eq!(g.point_index([1, 0, 0]), PointId(1));
        assert_eq!(g.point_index([0, 1, 0]), PointId(3));
        assert_eq!(g.point_index([0, 0, 1]), PointId(6));
        assert_eq!(g.point_ijk(PointId(11)), [2, 1, 1]);
        assert_eq!(g.point_coord(PointId(11)), Vec3::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn quad_corners_are_counter_clockwise() {
        let g = unit([3, 3, 1]);
        // Cell 0 is the lower-left quad: (0,0) (1,0) (1,1) (0,1).
        let ids: Vec<usize> = g.cell_point_indices(CellId(0)).iter().map(|p| p.0).collect();
        assert_eq!(ids, vec![0, 1, 4, 3]);
        // Cell 3 is the upper-right quad.
        let ids: Vec<usize> = g.cell_point_indices(CellId(3)).iter().map(|p| p.0).collect();
        assert_eq!(ids, vec![4, 5, 8, 7]);
    }

    #[test]
    fn xz_plane_uses_active_axes() {
        let g = unit([2, 1, 2]);
        assert_eq!(g.cell_dimension(), 2);
        assert_eq!(g.cell_count(), 1);
        let ids: Vec<usize> = g.cell_point_indices(CellId(0)).iter().map(|p| p.0).collect();
        assert_eq!(ids, vec![0, 1, 3, 2]);
    }

    #[test]
    fn line_grid_cells_are_segments() {
        let g = unit([4, 1, 1]);
        assert_eq!(g.cell_count(), 3);
        let ids: Vec<usize> = g.cell_point_indices(CellId(2)).iter().map(|p| p.0).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn hexahedron_lists_bottom_then_top() {
        let g = unit([2, 2, 2]);
        let ids: Vec<usize> = g.cell_point_indices(CellId(0)).iter().map(|p| p.0).collect();
        assert_eq!(ids, vec![0, 1, 3, 2, 4, 5, 7, 6]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn cell_out_of_range_panics() {
        let g = unit([2, 2, 1]);
        let _ = g.cell_point_indices(CellId(1));
    }

    // ---- attributes ----

    #[test]
    fn attribute_length_is_checked() {
        let err = unit([2, 2, 1])
            .with_attribute("Pressure", Attribute::scalars(vec![0.0; 3]))
            .unwrap_err();
        assert_eq!(
            err,
            GridError::AttributeLengthMismatch {
                name: "Pressure".into(),
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn duplicate_attribute_rejected() {
        let mut g = unit([2, 1, 1]);
        g.insert_attribute("a", Attribute::scalars(vec![0.0; 2])).unwrap();
        let err = g
            .insert_attribute("a", Attribute::scalars(vec![1.0; 2]))
            .unwrap_err();
        assert_eq!(err, GridError::DuplicateAttribute { name: "a".into() });
    }

    #[test]
    fn attribute_kind_is_checked() {
        let g = unit([2, 1, 1])
            .with_attribute("Pressure", Attribute::scalars(vec![0.0; 2]))
            .unwrap();
        assert!(matches!(
            g.vector_sampler("Pressure"),
            Err(GridError::AttributeKindMismatch {
                expected: AttributeKind::Vector,
                found: AttributeKind::Scalar,
                ..
            })
        ));
        assert!(matches!(
            g.scalar_sampler("missing"),
            Err(GridError::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn attributes_keep_insertion_order() {
        let g = unit([2, 1, 1])
            .with_attribute("b", Attribute::scalars(vec![0.0; 2]))
            .unwrap()
            .with_attribute("a", Attribute::vectors(&[Vec3::ZERO; 2]))
            .unwrap();
        let names: Vec<&str> = g.attributes().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    // ---- compliance ----

    #[test]
    fn compliance_plane() {
        compliance::run_full_compliance(&unit([5, 4, 1]));
    }

    #[test]
    fn compliance_volume() {
        compliance::run_full_compliance(&unit([3, 4, 2]));
    }

    #[test]
    fn compliance_rectilinear_plane() {
        let g = StructuredGrid::rectilinear(vec![0.0, 0.5, 2.0], vec![0.0], vec![-3.0, -1.0, 0.0])
            .unwrap();
        compliance::run_full_compliance(&g);
    }

    #[test]
    fn compliance_line() {
        compliance::run_full_compliance(&unit([6, 1, 1]));
    }
}
