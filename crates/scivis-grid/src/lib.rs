//! Structured sample grids for scivis.
//!
//! This crate provides [`StructuredGrid`], the in-memory form of the
//! uniform and rectilinear datasets read from VTK files, and the
//! trilinear samplers through which filters read its attributes.
//!
//! # Layout
//!
//! - [`Axis`]: sample coordinates along one axis, uniform or explicit
//! - [`StructuredGrid`]: three axes plus named point attributes;
//!   implements [`GridAccess`](scivis_core::GridAccess)
//! - [`ScalarSampler`] / [`VectorSampler`]: trilinear interpolation,
//!   implementing [`ScalarField`](scivis_core::ScalarField) and
//!   [`VectorField`](scivis_core::VectorField)

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod axis;
pub mod error;
pub mod sampler;
pub mod structured;

#[cfg(test)]
pub(crate) mod compliance;

pub use axis::{Axis, AxisSpan};
pub use error::GridError;
pub use sampler::{ScalarSampler, VectorSampler};
pub use structured::StructuredGrid;
