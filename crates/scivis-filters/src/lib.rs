//! Visualization filters for scivis grids.
//!
//! Two independent algorithms over the capability traits in
//! [`scivis_core`]:
//!
//! - [`IsocontourExtractor`]: iso-lines of a scalar attribute on a grid
//!   of quadrilateral cells, read through
//!   [`GridAccess`](scivis_core::GridAccess)
//! - [`StreamlineTracer`]: bidirectional RK4 integration through a
//!   [`VectorField`](scivis_core::VectorField)
//!
//! Both return [`PolyData`](scivis_core::PolyData) plus run metrics.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod error;
pub mod isocontour;
pub mod metrics;
pub mod streamline;

pub use config::{ConfigError, TracerConfig};
pub use error::FilterError;
pub use isocontour::{
    cell_segments, edge_crossing, CellCrossings, EdgeCrossing, Isocontour, IsocontourExtractor,
    IsocontourExtractorBuilder,
};
pub use metrics::{ExtractMetrics, TraceMetrics};
pub use streamline::{
    rk4_step, Direction, DirectionalTrace, HalfTrace, Streamline, StreamlineTracer, Termination,
};
