//! Line geometry output: points plus connectivity.
//!
//! Both algorithms produce a [`PolyData`]. The isocontour extractor
//! emits independent two-point segments; the streamline tracer emits a
//! single connected chain. Writers consume either through
//! [`PolyData::lines`].

use crate::error::GeometryError;
use crate::geometry::Vec3;

/// How the points of a [`PolyData`] are joined into line cells.
#[derive(Clone, Debug, PartialEq)]
pub enum Connectivity {
    /// Disjoint two-point segments.
    Segments(Vec<[usize; 2]>),
    /// One connected polyline; each consecutive pair of ids is joined.
    Chain(Vec<usize>),
}

/// An ordered point list plus line connectivity.
#[derive(Clone, Debug, PartialEq)]
pub struct PolyData {
    points: Vec<Vec3>,
    connectivity: Connectivity,
}

impl PolyData {
    /// Empty segment geometry, ready for [`push_segment`](Self::push_segment).
    pub fn segments() -> Self {
        Self {
            points: Vec::new(),
            connectivity: Connectivity::Segments(Vec::new()),
        }
    }

    /// A single chain through `points` in order.
    pub fn chain(points: Vec<Vec3>) -> Self {
        let ids = (0..points.len()).collect();
        Self {
            points,
            connectivity: Connectivity::Chain(ids),
        }
    }

    /// Build from raw parts, validating every connectivity index.
    pub fn from_parts(points: Vec<Vec3>, connectivity: Connectivity) -> Result<Self, GeometryError> {
        let pd = Self {
            points,
            connectivity,
        };
        pd.validate()?;
        Ok(pd)
    }

    /// Append two new points and a segment joining them.
    ///
    /// Points are never shared between segments. On chain geometry the
    /// points are appended but the chain itself is left unchanged.
    pub fn push_segment(&mut self, a: Vec3, b: Vec3) {
        let first = self.points.len();
        self.points.push(a);
        self.points.push(b);
        if let Connectivity::Segments(segs) = &mut self.connectivity {
            segs.push([first, first + 1]);
        }
    }

    /// The point list.
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// The connectivity record.
    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    /// Number of points.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Number of line cells (segments, or 1 for a non-empty chain).
    pub fn line_count(&self) -> usize {
        match &self.connectivity {
            Connectivity::Segments(segs) => segs.len(),
            Connectivity::Chain(ids) => usize::from(!ids.is_empty()),
        }
    }

    /// Total number of point references across all line cells.
    pub fn connectivity_len(&self) -> usize {
        self.lines().map(<[usize]>::len).sum()
    }

    /// Iterate over the line cells as point-id slices.
    ///
    /// An empty chain yields no cells.
    pub fn lines(&self) -> Box<dyn Iterator<Item = &[usize]> + '_> {
        match &self.connectivity {
            Connectivity::Segments(segs) => Box::new(segs.iter().map(|s| &s[..])),
            Connectivity::Chain(ids) if ids.is_empty() => Box::new(std::iter::empty()),
            Connectivity::Chain(ids) => Box::new(std::iter::once(ids.as_slice())),
        }
    }

    /// Check that every connectivity index refers to an existing point.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let point_count = self.points.len();
        for (line, ids) in self.lines().enumerate() {
            if let Some(&index) = ids.iter().find(|&&i| i >= point_count) {
                return Err(GeometryError::ConnectivityOutOfRange {
                    line,
                    index,
                    point_count,
                });
            }
        }
        Ok(())
    }

    /// Consume the geometry and return its points.
    pub fn into_points(self) -> Vec<Vec3> {
        self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64) -> Vec3 {
        Vec3::new(x, 0.0, 0.0)
    }

    #[test]
    fn segments_never_share_points() {
        let mut pd = PolyData::segments();
        pd.push_segment(p(0.0), p(1.0));
        pd.push_segment(p(1.0), p(2.0));
        assert_eq!(pd.point_count(), 4);
        assert_eq!(pd.line_count(), 2);
        assert_eq!(
            pd.connectivity(),
            &Connectivity::Segments(vec![[0, 1], [2, 3]])
        );
        assert_eq!(pd.connectivity_len(), 4);
        assert!(pd.validate().is_ok());
    }

    #[test]
    fn chain_covers_all_points_in_order() {
        let pd = PolyData::chain(vec![p(0.0), p(1.0), p(2.0)]);
        assert_eq!(pd.line_count(), 1);
        let lines: Vec<&[usize]> = pd.lines().collect();
        assert_eq!(lines, vec![&[0usize, 1, 2][..]]);
    }

    #[test]
    fn empty_chain_has_no_lines() {
        let pd = PolyData::chain(Vec::new());
        assert_eq!(pd.line_count(), 0);
        assert_eq!(pd.lines().count(), 0);
    }

    #[test]
    fn from_parts_rejects_dangling_index() {
        let err = PolyData::from_parts(
            vec![p(0.0), p(1.0)],
            Connectivity::Segments(vec![[0, 1], [1, 2]]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            GeometryError::ConnectivityOutOfRange {
                line: 1,
                index: 2,
                point_count: 2
            }
        );
    }
}
