//! Per-axis sample placement for structured grids.

use crate::error::GridError;

/// Relative tolerance used to snap a uniform-axis query onto a node.
///
/// `(x - origin) / spacing` for a node coordinate can land a few ulps
/// below the integer index; snapping keeps node lookups exact.
const NODE_SNAP_EPS: f64 = 1e-12;

/// Sample positions along one grid axis.
///
/// # Examples
///
/// ```
/// use scivis_grid::Axis;
///
/// let axis = Axis::uniform(0.0, 0.5, 5);
/// assert_eq!(axis.max(), 2.0);
///
/// let span = axis.locate(1.25).unwrap();
/// assert_eq!((span.lower, span.upper), (2, 3));
/// assert_eq!(span.frac, 0.5);
///
/// assert!(axis.locate(2.5).is_none());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Axis {
    /// Evenly spaced samples: `origin + i * spacing` for `i in 0..len`.
    Uniform {
        /// Coordinate of sample 0.
        origin: f64,
        /// Distance between consecutive samples.
        spacing: f64,
        /// Number of samples.
        len: usize,
    },
    /// Explicit, strictly increasing sample coordinates.
    Rectilinear(Vec<f64>),
}

/// The interval of an axis containing a query coordinate.
///
/// `frac` is the normalized position in `[lower, upper]`. For a
/// degenerate (single-sample) axis `lower == upper == 0` and `frac == 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisSpan {
    /// Index of the sample at or below the query.
    pub lower: usize,
    /// Index of the sample above the query.
    pub upper: usize,
    /// Interpolation weight of `upper`, in `[0, 1]`.
    pub frac: f64,
}

impl Axis {
    /// Evenly spaced axis. Validated when the grid is constructed.
    pub fn uniform(origin: f64, spacing: f64, len: usize) -> Self {
        Self::Uniform {
            origin,
            spacing,
            len,
        }
    }

    /// Axis with explicit coordinates. Validated when the grid is constructed.
    pub fn rectilinear(coords: Vec<f64>) -> Self {
        Self::Rectilinear(coords)
    }

    /// Check the axis invariants, reporting errors against `axis`.
    pub(crate) fn validate(&self, axis: usize) -> Result<(), GridError> {
        if self.len() == 0 {
            return Err(GridError::EmptyAxis { axis });
        }
        match self {
            Self::Uniform {
                origin, spacing, ..
            } => {
                if !origin.is_finite() || !spacing.is_finite() || *spacing <= 0.0 {
                    return Err(GridError::InvalidSpacing {
                        axis,
                        origin: *origin,
                        spacing: *spacing,
                    });
                }
                if !self.max().is_finite() {
                    return Err(GridError::InvalidSpacing {
                        axis,
                        origin: *origin,
                        spacing: *spacing,
                    });
                }
            }
            Self::Rectilinear(coords) => {
                for (index, &value) in coords.iter().enumerate() {
                    let increasing = index == 0 || coords[index - 1] < value;
                    if !value.is_finite() || !increasing {
                        return Err(GridError::NonMonotonicAxis { axis, index, value });
                    }
                }
            }
        }
        Ok(())
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        match self {
            Self::Uniform { len, .. } => *len,
            Self::Rectilinear(coords) => coords.len(),
        }
    }

    /// Returns `true` if the axis has no samples (rejected by grid construction).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the axis has a single sample and therefore no cells.
    pub fn is_degenerate(&self) -> bool {
        self.len() == 1
    }

    /// Number of cell intervals along the axis (0 when degenerate).
    pub fn cell_len(&self) -> usize {
        self.len().saturating_sub(1)
    }

    /// Coordinate of sample `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range for a rectilinear axis.
    pub fn coord(&self, i: usize) -> f64 {
        match self {
            Self::Uniform {
                origin, spacing, ..
            } => origin + spacing * i as f64,
            Self::Rectilinear(coords) => coords[i],
        }
    }

    /// Smallest sample coordinate.
    pub fn min(&self) -> f64 {
        self.coord(0)
    }

    /// Largest sample coordinate.
    pub fn max(&self) -> f64 {
        self.coord(self.len().saturating_sub(1))
    }

    /// The spacing, if the axis is uniform.
    pub fn spacing(&self) -> Option<f64> {
        match self {
            Self::Uniform { spacing, .. } => Some(*spacing),
            Self::Rectilinear(_) => None,
        }
    }

    /// Find the interval containing `x`.
    ///
    /// Both end samples are inside the axis. Returns `None` for
    /// coordinates outside `[min, max]` and for NaN.
    pub fn locate(&self, x: f64) -> Option<AxisSpan> {
        if !(self.min() <= x && x <= self.max()) {
            return None;
        }
        if self.len() == 1 {
            return Some(AxisSpan {
                lower: 0,
                upper: 0,
                frac: 0.0,
            });
        }
        let last_cell = self.len() - 2;
        match self {
            Self::Uniform {
                origin, spacing, ..
            } => {
                let mut t = (x - origin) / spacing;
                let nearest = t.round();
                if (t - nearest).abs() <= NODE_SNAP_EPS * nearest.abs().max(1.0) {
                    t = nearest;
                }
                let lower = (t.floor().max(0.0) as usize).min(last_cell);
                Some(AxisSpan {
                    lower,
                    upper: lower + 1,
                    frac: (t - lower as f64).clamp(0.0, 1.0),
                })
            }
            Self::Rectilinear(coords) => {
                let at_or_below = coords.partition_point(|&c| c <= x);
                let lower = at_or_below.saturating_sub(1).min(last_cell);
                let (c0, c1) = (coords[lower], coords[lower + 1]);
                Some(AxisSpan {
                    lower,
                    upper: lower + 1,
                    frac: ((x - c0) / (c1 - c0)).clamp(0.0, 1.0),
                })
            }
        }
    }
}
