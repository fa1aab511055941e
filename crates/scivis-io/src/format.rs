//! Format selection by file extension and file-level entry points.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use scivis_core::{GridAccess, PolyData};
use scivis_grid::StructuredGrid;
use tracing::info;

use crate::error::VtkError;
use crate::reader::read_grid;
use crate::vti::{read_vti, write_vti, VtiEncoding};
use crate::writer::{write_grid, write_legacy_polydata, write_vtp};

/// Title line written into legacy polydata files.
const POLYDATA_TITLE: &str = "scivis polydata";

/// On-disk encodings for line geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PolyDataFormat {
    /// Legacy VTK text, `DATASET POLYDATA` (`.vtk`).
    LegacyVtk,
    /// VTK XML PolyData with ASCII arrays (`.vtp`).
    XmlVtp,
}

impl PolyDataFormat {
    /// Pick a format from the path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, VtkError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("vtk") => Ok(Self::LegacyVtk),
            Some("vtp") => Ok(Self::XmlVtp),
            _ => Err(VtkError::UnknownExtension {
                path: path.to_path_buf(),
            }),
        }
    }

    /// The conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::LegacyVtk => "vtk",
            Self::XmlVtp => "vtp",
        }
    }
}

impl fmt::Display for PolyDataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LegacyVtk => f.write_str("legacy VTK"),
            Self::XmlVtp => f.write_str("VTK XML PolyData"),
        }
    }
}

/// On-disk encodings for structured grids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GridFormat {
    /// Legacy VTK text (`.vtk`, and any other extension).
    LegacyVtk,
    /// VTK XML ImageData (`.vti`).
    XmlImageData,
}

impl GridFormat {
    /// Pick a format from the path's extension (case-insensitive).
    /// Anything other than `.vti` is treated as legacy VTK.
    pub fn from_path(path: &Path) -> Self {
        let vti = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("vti"));
        if vti {
            Self::XmlImageData
        } else {
            Self::LegacyVtk
        }
    }
}

impl fmt::Display for GridFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LegacyVtk => f.write_str("legacy VTK"),
            Self::XmlImageData => f.write_str("VTK XML ImageData"),
        }
    }
}

/// Read a grid from `path`, choosing the reader by extension.
pub fn read_grid_file(path: impl AsRef<Path>) -> Result<StructuredGrid, VtkError> {
    let path = path.as_ref();
    let format = GridFormat::from_path(path);
    let reader = BufReader::new(File::open(path)?);
    let grid = match format {
        GridFormat::LegacyVtk => read_grid(reader)?,
        GridFormat::XmlImageData => read_vti(reader)?,
    };
    info!(
        path = %path.display(),
        %format,
        points = grid.point_count(),
        "read grid"
    );
    Ok(grid)
}

/// Write line geometry to any sink in the given format.
pub fn write_polydata<W: Write>(
    writer: W,
    polydata: &PolyData,
    format: PolyDataFormat,
) -> Result<(), VtkError> {
    match format {
        PolyDataFormat::LegacyVtk => write_legacy_polydata(writer, polydata, POLYDATA_TITLE),
        PolyDataFormat::XmlVtp => write_vtp(writer, polydata),
    }
}

/// Write line geometry to `path`, choosing the format by extension.
///
/// The extension and the connectivity are both checked before the file
/// is created, so a rejected call leaves nothing on disk.
pub fn write_polydata_file(
    path: impl AsRef<Path>,
    polydata: &PolyData,
) -> Result<PolyDataFormat, VtkError> {
    let path = path.as_ref();
    let format = PolyDataFormat::from_path(path)?;
    polydata.validate()?;

    let mut writer = BufWriter::new(File::create(path)?);
    write_polydata(&mut writer, polydata, format)?;
    writer.flush()?;

    info!(
        path = %path.display(),
        %format,
        points = polydata.point_count(),
        lines = polydata.line_count(),
        "wrote polydata"
    );
    Ok(format)
}

/// Write a grid to `path`, choosing the format by extension.
///
/// `.vti` writes base64 ImageData and ignores `title`; a grid that is not
/// uniform is rejected before the file is created. Every other extension
/// writes legacy VTK.
pub fn write_grid_file(
    path: impl AsRef<Path>,
    grid: &StructuredGrid,
    title: &str,
) -> Result<GridFormat, VtkError> {
    let path = path.as_ref();
    let format = GridFormat::from_path(path);
    if format == GridFormat::XmlImageData && grid.spacing().is_none() {
        return Err(VtkError::NotUniform);
    }
    let mut writer = BufWriter::new(File::create(path)?);
    match format {
        GridFormat::LegacyVtk => write_grid(&mut writer, grid, title)?,
        GridFormat::XmlImageData => write_vti(&mut writer, grid, VtiEncoding::Base64)?,
    }
    writer.flush()?;
    Ok(format)
}
