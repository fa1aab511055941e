//! VTK file I/O for scivis grids and line geometry.
//!
//! Reads structured grids from legacy VTK text or VTK XML ImageData and
//! writes line geometry produced by the filters. Legacy files must be
//! ASCII; XML files may use ASCII, base64 or raw appended arrays but not
//! compression.
//!
//! # Architecture
//!
//! - [`read_grid`] parses `STRUCTURED_POINTS` / `RECTILINEAR_GRID` from any `BufRead` source
//! - [`write_grid`] writes the same format back to any `Write` sink
//! - [`read_vti`] and [`write_vti`] do the same for `.vti` ImageData
//! - [`read_grid_file`] and [`write_grid_file`] pick a grid format by extension
//! - [`write_legacy_polydata`] and [`write_vtp`] write a [`PolyData`](scivis_core::PolyData)
//! - [`write_polydata_file`] picks between them by file extension
//!
//! # Format
//!
//! ```text
//! # vtk DataFile Version 3.0
//! <title>
//! ASCII
//! DATASET STRUCTURED_POINTS | RECTILINEAR_GRID | POLYDATA
//! <geometry sections>
//! POINT_DATA n
//! <attribute sections>
//! ```
//!
//! Array names containing whitespace are written with `%XX` escapes.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod format;
pub mod reader;
pub mod tokens;
pub mod vti;
pub mod writer;

pub use error::VtkError;
pub use format::{
    read_grid_file, write_grid_file, write_polydata, write_polydata_file, GridFormat,
    PolyDataFormat,
};
pub use reader::read_grid;
pub use vti::{read_vti, write_vti, VtiEncoding};
pub use writer::{write_grid, write_legacy_polydata, write_vtp};

/// First line of every legacy file this crate writes.
pub const LEGACY_HEADER: &str = "# vtk DataFile Version 3.0";
