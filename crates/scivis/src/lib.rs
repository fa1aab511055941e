//! scivis: isocontours and streamlines over structured grids.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! scivis sub-crates. For most users, adding `scivis` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use scivis::prelude::*;
//!
//! // A 3x3 plane with f(x, y) = x + y, and a uniform flow along +x.
//! let grid = StructuredGrid::uniform([3, 3, 1], Vec3::ZERO, Vec3::new(0.5, 0.5, 1.0))
//!     .unwrap();
//! let values = (0..grid.point_count())
//!     .map(|id| {
//!         let p = grid.point_coord(PointId(id));
//!         p.x + p.y
//!     })
//!     .collect();
//! let flow = vec![Vec3::new(1.0, 0.0, 0.0); grid.point_count()];
//! let grid = grid
//!     .with_attribute("Pressure", Attribute::scalars(values))
//!     .unwrap()
//!     .with_attribute("vectors", Attribute::vectors(&flow))
//!     .unwrap();
//!
//! // Iso-line f = 0.75 crosses the cells along the diagonal.
//! let iso = IsocontourExtractor::builder()
//!     .array("Pressure")
//!     .iso_value(0.75)
//!     .build()
//!     .unwrap()
//!     .extract(&grid)
//!     .unwrap();
//! assert!(iso.polydata().line_count() > 0);
//!
//! // Streamline through the middle of the plane.
//! let field = grid.vector_sampler("vectors").unwrap();
//! let line = StreamlineTracer::default()
//!     .trace(&field, Vec3::new(0.5, 0.5, 0.0))
//!     .unwrap();
//! assert_eq!(line.seed(), Vec3::new(0.5, 0.5, 0.0));
//! assert_eq!(line.forward().termination, Termination::LeftDomain);
//!
//! // Write the polyline as VTK XML.
//! let mut out = Vec::new();
//! scivis::io::write_vtp(&mut out, &line.into_polydata()).unwrap();
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `scivis-core` | Geometry, ids, attributes, polydata, capability traits |
//! | [`grid`] | `scivis-grid` | Structured grids and trilinear samplers |
//! | [`filters`] | `scivis-filters` | Isocontour extraction and streamline tracing |
//! | [`io`] | `scivis-io` | Legacy VTK grid reading, VTK polydata writing |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`scivis-core`).
///
/// Contains [`types::Vec3`], [`types::Bounds`], attributes, [`types::PolyData`],
/// and the capability traits ([`types::GridAccess`], [`types::ScalarField`],
/// [`types::VectorField`]).
pub use scivis_core as types;

/// Structured grids and field sampling (`scivis-grid`).
///
/// [`grid::StructuredGrid`] with uniform or rectilinear [`grid::Axis`]es,
/// sampled through [`grid::ScalarSampler`] and [`grid::VectorSampler`].
pub use scivis_grid as grid;

/// Visualization filters (`scivis-filters`).
///
/// [`filters::IsocontourExtractor`] and [`filters::StreamlineTracer`].
pub use scivis_filters as filters;

/// VTK file I/O (`scivis-io`).
///
/// Read `.vtk` or `.vti` grids with [`io::read_grid_file`], write results
/// with [`io::write_polydata_file`].
pub use scivis_io as io;

/// Common imports for typical scivis usage.
///
/// ```rust
/// use scivis::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use scivis_core::{
        Attribute, AttributeKind, Bounds, CellId, GridAccess, PointId, PolyData, ScalarField,
        Vec3, VectorField,
    };

    // Errors
    pub use scivis_core::{GeometryError, SampleError};
    pub use scivis_filters::{ConfigError, FilterError};
    pub use scivis_grid::GridError;
    pub use scivis_io::VtkError;

    // Grid
    pub use scivis_grid::{Axis, StructuredGrid};

    // Filters
    pub use scivis_filters::{
        IsocontourExtractor, StreamlineTracer, Termination, TracerConfig,
    };

    // I/O
    pub use scivis_io::{read_grid_file, write_polydata_file};
}
