//! Error types for reading and writing VTK files.

use scivis_core::GeometryError;
use scivis_grid::GridError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing VTK data.
///
/// Parse errors carry the 1-based line number of the offending token.
#[derive(Debug, Error)]
pub enum VtkError {
    /// An I/O error occurred during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The parsed geometry does not form a valid grid.
    #[error("invalid grid: {0}")]
    Grid(#[from] GridError),
    /// Output geometry failed validation.
    #[error("invalid geometry: {0}")]
    Geometry(#[from] GeometryError),
    /// A VTK XML document is not well-formed.
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// An inline or appended binary block is not valid base64.
    #[error("invalid base64 data: {0}")]
    Base64(#[from] base64::DecodeError),
    /// A well-formed XML document that is not usable VTK ImageData.
    #[error("invalid VTK XML ImageData: {message}")]
    InvalidVti {
        /// What was wrong.
        message: String,
    },
    /// The first line is not a legacy VTK header.
    #[error("not a legacy VTK file: header line is {found:?}")]
    InvalidHeader {
        /// The first line as read.
        found: String,
    },
    /// The input ended while more data was required.
    #[error("line {line}: unexpected end of file, expected {expected}")]
    UnexpectedEof {
        /// Line number at which input ended.
        line: usize,
        /// What the parser was looking for.
        expected: &'static str,
    },
    /// A token could not be parsed as the expected kind of value.
    #[error("line {line}: invalid token {token:?}, expected {expected}")]
    InvalidToken {
        /// Line number of the token.
        line: usize,
        /// The token as read.
        token: String,
        /// What the parser was looking for.
        expected: &'static str,
    },
    /// The file uses a binary or compressed encoding this crate cannot read.
    #[error("unsupported encoding {encoding}")]
    UnsupportedEncoding {
        /// The encoding keyword from the file.
        encoding: String,
    },
    /// The dataset type is not a structured grid this reader understands.
    #[error("unsupported dataset type {dataset} (expected STRUCTURED_POINTS or RECTILINEAR_GRID)")]
    UnsupportedDataset {
        /// The dataset keyword from the file.
        dataset: String,
    },
    /// A section keyword that this reader does not handle.
    #[error("line {line}: unsupported section {keyword}")]
    UnsupportedSection {
        /// Line number of the keyword.
        line: usize,
        /// The keyword.
        keyword: String,
    },
    /// A required geometry section never appeared.
    #[error("missing required section {section}")]
    MissingSection {
        /// Name of the section.
        section: &'static str,
    },
    /// A declared count disagrees with the grid or with the data read.
    #[error("line {line}: {section} declares {found} entries, expected {expected}")]
    CountMismatch {
        /// Line number of the declaration.
        line: usize,
        /// Section or array name.
        section: String,
        /// The count required.
        expected: usize,
        /// The count declared.
        found: usize,
    },
    /// A declared count is too large to address.
    #[error("line {line}: {section} declares more values than fit in memory")]
    CountTooLarge {
        /// Line number of the declaration.
        line: usize,
        /// Section or array name.
        section: String,
    },
    /// A decoded XML data array holds the wrong number of values.
    #[error("array {name} holds {found} values, expected {expected}")]
    ArrayLength {
        /// Array name.
        name: String,
        /// Points times components.
        expected: usize,
        /// Values decoded.
        found: usize,
    },
    /// ImageData output was requested for a grid with non-uniform spacing.
    #[error("VTK ImageData needs uniform spacing on every axis")]
    NotUniform,
    /// An attribute array has a component count other than 1 or 3.
    #[error("array {name} has {components} components (only 1 or 3 are supported)")]
    UnsupportedComponents {
        /// Array name.
        name: String,
        /// Declared component count.
        components: usize,
    },
    /// The output path has no recognized polydata extension.
    #[error("cannot infer output format from {path:?} (expected .vtp or .vtk)")]
    UnknownExtension {
        /// The offending path.
        path: PathBuf,
    },
}
