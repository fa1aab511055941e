//! Per-run counters for the filters.
//!
//! [`ExtractMetrics`] and [`TraceMetrics`] are returned alongside the
//! geometry so drivers can log or assert on what a run did.

/// Counters collected during one isocontour extraction.
#[derive(Clone, Debug, Default)]
pub struct ExtractMetrics {
    /// Cells examined.
    pub cells_visited: usize,
    /// Cells that emitted at least one segment.
    pub cells_with_segments: usize,
    /// Cells with four crossings (two segments each).
    pub saddle_cells: usize,
    /// Cells with one or three crossings, which emit nothing.
    pub odd_crossing_cells: usize,
    /// Edges skipped because both endpoint values were equal.
    pub degenerate_edges: usize,
    /// Total segments emitted.
    pub segments: usize,
    /// Wall-clock time for the extraction, in microseconds.
    pub elapsed_us: u64,
}

/// Counters collected during one bidirectional trace.
#[derive(Clone, Debug, Default)]
pub struct TraceMetrics {
    /// Points accepted in the backward direction.
    pub backward_points: usize,
    /// Points accepted in the forward direction.
    pub forward_points: usize,
    /// RK4 steps computed. A direction that ends with `LeftDomain` or
    /// `NonFinite` counts its rejected final step too; one that ends with
    /// `MaxSteps` does not.
    pub rk4_steps: usize,
    /// Wall-clock time for the trace, in microseconds.
    pub elapsed_us: u64,
}
