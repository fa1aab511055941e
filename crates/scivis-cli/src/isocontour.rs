//! Isocontour driver: load a 2D scalar grid, extract one iso-level, write
//! the segments.

use std::path::PathBuf;

use clap::Parser;
use scivis_core::GridAccess;
use scivis_filters::{ExtractMetrics, IsocontourExtractor};
use scivis_io::{read_grid_file, write_polydata_file, PolyDataFormat};
use tracing::{info, warn};

use crate::{ensure_input_exists, CliError};

/// Default scalar array name.
pub const DEFAULT_ARRAY: &str = "Pressure";

/// Arguments for the `isocontour` binary.
#[derive(Parser, Debug, Clone)]
#[command(name = "isocontour")]
#[command(about = "Extract isocontour line segments from a 2D scalar grid", version)]
#[command(allow_negative_numbers = true)]
pub struct IsocontourArgs {
    /// Input grid: legacy VTK (`.vtk`) or VTK XML ImageData (`.vti`)
    pub input: PathBuf,

    /// Output file; `.vtp` or `.vtk` selects the format
    pub output: PathBuf,

    /// Scalar threshold
    pub iso_value: f64,

    /// Name of the scalar point-data array
    #[arg(long, default_value = DEFAULT_ARRAY)]
    pub array: String,

    /// Trailing positionals after the iso value; accepted and ignored.
    #[arg(hide = true)]
    pub ignored: Vec<String>,
}

/// What a successful run produced.
#[derive(Clone, Debug)]
pub struct IsocontourSummary {
    /// Output format chosen from the output extension.
    pub format: PolyDataFormat,
    /// Points written.
    pub points: usize,
    /// Segments written.
    pub segments: usize,
    /// Extraction counters.
    pub metrics: ExtractMetrics,
}

/// Load, extract and write. Nothing is written unless every step succeeds.
pub fn run(args: &IsocontourArgs) -> Result<IsocontourSummary, CliError> {
    ensure_input_exists(&args.input)?;
    let extractor = IsocontourExtractor::builder()
        .array(args.array.as_str())
        .iso_value(args.iso_value)
        .build()?;
    PolyDataFormat::from_path(&args.output)?;
    if !args.ignored.is_empty() {
        warn!(extra = ?args.ignored, "ignoring extra arguments");
    }

    let grid = read_grid_file(&args.input)?;
    info!(
        points = grid.point_count(),
        cells = grid.cell_count(),
        dims = ?grid.dimensions(),
        "loaded {}",
        args.input.display()
    );

    let iso = extractor.extract(&grid)?;
    let format = write_polydata_file(&args.output, iso.polydata())?;
    Ok(IsocontourSummary {
        format,
        points: iso.polydata().point_count(),
        segments: iso.polydata().line_count(),
        metrics: iso.metrics().clone(),
    })
}
