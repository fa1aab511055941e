//! Isocontour extraction over 2D quadrilateral grids.
//!
//! Each cell is scanned independently: its four edges are tested in
//! counter-clockwise order for a strict sign change of `value - iso`,
//! crossings are placed by linear interpolation, and the crossing count
//! selects what the cell emits.
//!
//! | Crossings | Emitted                                   |
//! |-----------|-------------------------------------------|
//! | 0, 1, 3   | nothing                                   |
//! | 2         | one segment, in discovery order           |
//! | 4         | two segments: crossings 1–2 and 3–4       |
//!
//! The 4-crossing (saddle) pairing is fixed and ignores the cell-center
//! value. Output segments never share points, even between neighbouring
//! cells.
//!
//! Constructed via the builder pattern: [`IsocontourExtractor::builder`].

use crate::config::ConfigError;
use crate::error::FilterError;
use crate::metrics::ExtractMetrics;
use scivis_core::{AttributeKind, CellId, GridAccess, PolyData, Vec3};
use scivis_grid::GridError;
use smallvec::SmallVec;
use std::time::Instant;
use tracing::{debug, trace};

/// Outcome of testing one edge against the iso value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EdgeCrossing {
    /// The field crosses the iso value strictly inside the edge.
    Crossing(Vec3),
    /// No strict sign change (includes endpoints exactly at the iso value).
    NoCrossing,
    /// Both endpoint values are equal; the edge is skipped.
    Degenerate,
}

/// Test the edge `a -> b` for a crossing of `iso`.
///
/// ```text
/// va == vb                       => Degenerate
/// (va - iso) * (vb - iso) < 0    => Crossing(a + t * (b - a)), t = (iso - va) / (vb - va)
/// otherwise                      => NoCrossing
/// ```
///
/// # Examples
///
/// ```
/// use scivis_core::Vec3;
/// use scivis_filters::isocontour::{edge_crossing, EdgeCrossing};
///
/// let a = Vec3::new(0.0, 0.0, 0.0);
/// let b = Vec3::new(1.0, 0.0, 0.0);
/// assert_eq!(
///     edge_crossing(a, 10.0, b, -10.0, 0.0),
///     EdgeCrossing::Crossing(Vec3::new(0.5, 0.0, 0.0))
/// );
/// assert_eq!(edge_crossing(a, 0.0, b, 5.0, 0.0), EdgeCrossing::NoCrossing);
/// assert_eq!(edge_crossing(a, 3.0, b, 3.0, 0.0), EdgeCrossing::Degenerate);
/// ```
pub fn edge_crossing(a: Vec3, va: f64, b: Vec3, vb: f64, iso: f64) -> EdgeCrossing {
    if va == vb {
        return EdgeCrossing::Degenerate;
    }
    if (va - iso) * (vb - iso) < 0.0 {
        let t = (iso - va) / (vb - va);
        EdgeCrossing::Crossing(a.lerp(b, t))
    } else {
        EdgeCrossing::NoCrossing
    }
}

/// Crossings found in one cell, in edge discovery order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CellCrossings {
    /// Crossing points, at most one per edge.
    pub points: SmallVec<[Vec3; 4]>,
    /// Edges skipped as degenerate.
    pub degenerate_edges: usize,
}

impl CellCrossings {
    /// Segments emitted for this crossing count.
    pub fn segments(&self) -> SmallVec<[[Vec3; 2]; 2]> {
        match *self.points.as_slice() {
            [p1, p2] => SmallVec::from_slice(&[[p1, p2]]),
            [p1, p2, p3, p4] => SmallVec::from_slice(&[[p1, p2], [p3, p4]]),
            _ => SmallVec::new(),
        }
    }

    /// Returns `true` for a four-crossing cell.
    pub fn is_saddle(&self) -> bool {
        self.points.len() == 4
    }
}

/// Scan one cell. `corners` and `values` must be in counter-clockwise order.
///
/// Edges are visited as `(P1,P2), (P2,P3), (P3,P4), (P4,P1)`.
pub fn cell_segments(corners: &[Vec3; 4], values: &[f64; 4], iso: f64) -> CellCrossings {
    let mut out = CellCrossings::default();
    for i in 0..4 {
        let j = (i + 1) % 4;
        match edge_crossing(corners[i], values[i], corners[j], values[j], iso) {
            EdgeCrossing::Crossing(p) => out.points.push(p),
            EdgeCrossing::NoCrossing => {}
            EdgeCrossing::Degenerate => out.degenerate_edges += 1,
        }
    }
    out
}

/// The result of an extraction.
#[derive(Clone, Debug)]
pub struct Isocontour {
    polydata: PolyData,
    metrics: ExtractMetrics,
}

impl Isocontour {
    /// The extracted segments.
    pub fn polydata(&self) -> &PolyData {
        &self.polydata
    }

    /// Counters for this run.
    pub fn metrics(&self) -> &ExtractMetrics {
        &self.metrics
    }

    /// Consume the result and return the geometry.
    pub fn into_polydata(self) -> PolyData {
        self.polydata
    }
}

/// Extracts iso-lines of a named scalar attribute from a 2D grid.
///
/// # Construction
///
/// ```
/// use scivis_filters::IsocontourExtractor;
///
/// let extractor = IsocontourExtractor::builder()
///     .array("Pressure")
///     .iso_value(0.5)
///     .build()
///     .unwrap();
/// assert_eq!(extractor.iso_value(), 0.5);
/// ```
#[derive(Clone, Debug)]
pub struct IsocontourExtractor {
    array: String,
    iso_value: f64,
}

/// Builder for [`IsocontourExtractor`].
///
/// Required fields: `array` and `iso_value`.
pub struct IsocontourExtractorBuilder {
    array: Option<String>,
    iso_value: Option<f64>,
}

impl IsocontourExtractor {
    /// Create a new builder.
    pub fn builder() -> IsocontourExtractorBuilder {
        IsocontourExtractorBuilder {
            array: None,
            iso_value: None,
        }
    }

    /// Name of the scalar attribute being contoured.
    pub fn array(&self) -> &str {
        &self.array
    }

    /// The threshold.
    pub fn iso_value(&self) -> f64 {
        self.iso_value
    }

    /// Extract the isocontour of `grid`.
    ///
    /// # Errors
    ///
    /// - [`FilterError::UnsupportedCellDimension`] unless the grid has 2D cells
    /// - [`FilterError::Grid`] if the attribute is missing, not scalar, or
    ///   does not have one value per point
    /// - [`FilterError::MalformedCell`] if a cell does not report 4 corners
    pub fn extract<G: GridAccess + ?Sized>(&self, grid: &G) -> Result<Isocontour, FilterError> {
        let start = Instant::now();
        if grid.cell_dimension() != 2 {
            return Err(FilterError::UnsupportedCellDimension {
                expected: 2,
                found: grid.cell_dimension(),
            });
        }
        let values = self.scalar_values(grid)?;

        let mut polydata = PolyData::segments();
        let mut metrics = ExtractMetrics::default();
        for cell in 0..grid.cell_count() {
            let ids = grid.cell_point_indices(CellId(cell));
            let &[p1, p2, p3, p4] = ids.as_slice() else {
                return Err(FilterError::MalformedCell {
                    cell,
                    corners: ids.len(),
                    expected: 4,
                });
            };
            let ids = [p1, p2, p3, p4];
            let corners = ids.map(|p| grid.point_coord(p));
            let cell_values = ids.map(|p| values[p.0]);

            let crossings = cell_segments(&corners, &cell_values, self.iso_value);
            metrics.cells_visited += 1;
            metrics.degenerate_edges += crossings.degenerate_edges;
            match crossings.points.len() {
                0 => {}
                2 => metrics.cells_with_segments += 1,
                4 => {
                    trace!(cell, "saddle cell, pairing crossings 1-2 and 3-4");
                    metrics.cells_with_segments += 1;
                    metrics.saddle_cells += 1;
                }
                n => {
                    trace!(cell, crossings = n, "odd crossing count, cell skipped");
                    metrics.odd_crossing_cells += 1;
                }
            }
            for [a, b] in crossings.segments() {
                polydata.push_segment(a, b);
            }
        }
        metrics.segments = polydata.line_count();
        metrics.elapsed_us = start.elapsed().as_micros() as u64;

        debug!(
            array = %self.array,
            iso = self.iso_value,
            cells = metrics.cells_visited,
            segments = metrics.segments,
            saddles = metrics.saddle_cells,
            degenerate_edges = metrics.degenerate_edges,
            "isocontour extracted"
        );
        Ok(Isocontour { polydata, metrics })
    }

    fn scalar_values<'g, G: GridAccess + ?Sized>(
        &self,
        grid: &'g G,
    ) -> Result<&'g [f64], GridError> {
        let attribute = grid
            .attribute(&self.array)
            .ok_or_else(|| GridError::UnknownAttribute {
                name: self.array.clone(),
            })?;
        if attribute.kind() != AttributeKind::Scalar {
            return Err(GridError::AttributeKindMismatch {
                name: self.array.clone(),
                expected: AttributeKind::Scalar,
                found: attribute.kind(),
            });
        }
        if attribute.tuple_count() != grid.point_count() {
            return Err(GridError::AttributeLengthMismatch {
                name: self.array.clone(),
                expected: grid.point_count(),
                found: attribute.tuple_count(),
            });
        }
        Ok(attribute.as_slice())
    }
}

impl IsocontourExtractorBuilder {
    /// Set the scalar attribute to contour.
    pub fn array(mut self, name: impl Into<String>) -> Self {
        self.array = Some(name.into());
        self
    }

    /// Set the threshold.
    pub fn iso_value(mut self, value: f64) -> Self {
        self.iso_value = Some(value);
        self
    }

    /// Build the extractor, validating all configuration.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - `array` is not set
    /// - `iso_value` is not set or not finite
    pub fn build(self) -> Result<IsocontourExtractor, ConfigError> {
        let array = self.array.ok_or(ConfigError::Missing { field: "array" })?;
        let iso_value = self
            .iso_value
            .ok_or(ConfigError::Missing { field: "iso_value" })?;
        if !iso_value.is_finite() {
            return Err(ConfigError::InvalidIsoValue { value: iso_value });
        }
        Ok(IsocontourExtractor { array, iso_value })
    }
}
