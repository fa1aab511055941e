//! Core types and traits for the scivis workspace.
//!
//! This is the leaf crate with no internal dependencies. It defines
//! the fundamental abstractions shared by the grid, filter, and I/O
//! crates: 3-vectors and bounding boxes, point/cell identifiers,
//! attribute arrays, line geometry output, error types, and the
//! capability traits through which algorithms read grids and fields.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod geometry;
pub mod id;
pub mod polydata;
pub mod traits;

pub use error::{GeometryError, SampleError};
pub use field::{Attribute, AttributeKind};
pub use geometry::{Bounds, Vec3};
pub use id::{CellId, PointId};
pub use polydata::{Connectivity, PolyData};
pub use traits::{CellPoints, GridAccess, ScalarField, VectorField};
