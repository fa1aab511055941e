//! Legacy VTK and VTK XML writers.
//!
//! All writers are generic over `W: Write` so tests can use `Vec<u8>` and
//! production code can use `BufWriter<File>`. Floats are written with
//! Rust's shortest round-trip formatting, so [`write_grid`] output reads
//! back bit-exact through [`read_grid`](crate::read_grid).

use std::io::Write;

use scivis_core::{Attribute, AttributeKind, GridAccess, PolyData};
use scivis_grid::StructuredGrid;
use tracing::debug;

use crate::error::VtkError;
use crate::tokens::encode_name;
use crate::LEGACY_HEADER;

/// Scalar values per output line.
const VALUES_PER_LINE: usize = 9;

/// Write a grid as a legacy VTK file.
///
/// All-uniform grids become `STRUCTURED_POINTS`; anything else becomes
/// `RECTILINEAR_GRID`. Every attribute is written under `POINT_DATA`,
/// scalars as `SCALARS` and vectors as `VECTORS`.
pub fn write_grid<W: Write>(
    mut writer: W,
    grid: &StructuredGrid,
    title: &str,
) -> Result<(), VtkError> {
    write_legacy_preamble(&mut writer, title)?;
    let [nx, ny, nz] = grid.dimensions();

    if let Some(spacing) = grid.spacing() {
        let origin = grid.origin();
        writeln!(writer, "DATASET STRUCTURED_POINTS")?;
        writeln!(writer, "DIMENSIONS {nx} {ny} {nz}")?;
        writeln!(writer, "ORIGIN {} {} {}", origin.x, origin.y, origin.z)?;
        writeln!(writer, "SPACING {} {} {}", spacing.x, spacing.y, spacing.z)?;
    } else {
        writeln!(writer, "DATASET RECTILINEAR_GRID")?;
        writeln!(writer, "DIMENSIONS {nx} {ny} {nz}")?;
        for (axis, label) in grid.axes().iter().zip(["X", "Y", "Z"]) {
            writeln!(writer, "{label}_COORDINATES {} double", axis.len())?;
            write_rows(&mut writer, (0..axis.len()).map(|i| axis.coord(i)))?;
        }
    }

    let mut attributes = grid.attributes().peekable();
    if attributes.peek().is_some() {
        writeln!(writer, "POINT_DATA {}", grid.point_count())?;
        for (name, attribute) in attributes {
            write_attribute(&mut writer, name, attribute)?;
        }
    }

    debug!(dims = ?grid.dimensions(), "wrote legacy VTK grid");
    Ok(())
}

/// Write line geometry as a legacy VTK `POLYDATA` file.
///
/// The `LINES` section is omitted when there are no line cells.
pub fn write_legacy_polydata<W: Write>(
    mut writer: W,
    polydata: &PolyData,
    title: &str,
) -> Result<(), VtkError> {
    polydata.validate()?;
    write_legacy_preamble(&mut writer, title)?;
    writeln!(writer, "DATASET POLYDATA")?;
    writeln!(writer, "POINTS {} double", polydata.point_count())?;
    for p in polydata.points() {
        writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
    }

    let lines = polydata.line_count();
    if lines > 0 {
        writeln!(writer, "LINES {lines} {}", lines + polydata.connectivity_len())?;
        for ids in polydata.lines() {
            write!(writer, "{}", ids.len())?;
            for id in ids {
                write!(writer, " {id}")?;
            }
            writeln!(writer)?;
        }
    }

    debug!(
        points = polydata.point_count(),
        lines, "wrote legacy VTK polydata"
    );
    Ok(())
}

/// Write line geometry as a VTK XML PolyData (`.vtp`) document with
/// ASCII data arrays.
pub fn write_vtp<W: Write>(mut writer: W, polydata: &PolyData) -> Result<(), VtkError> {
    polydata.validate()?;
    let lines = polydata.line_count();

    writeln!(writer, r#"<?xml version="1.0"?>"#)?;
    writeln!(
        writer,
        r#"<VTKFile type="PolyData" version="1.0" byte_order="LittleEndian" header_type="UInt64">"#
    )?;
    writeln!(writer, "  <PolyData>")?;
    writeln!(
        writer,
        r#"    <Piece NumberOfPoints="{}" NumberOfVerts="0" NumberOfLines="{lines}" NumberOfStrips="0" NumberOfPolys="0">"#,
        polydata.point_count()
    )?;

    writeln!(writer, "      <Points>")?;
    writeln!(
        writer,
        r#"        <DataArray type="Float64" Name="Points" NumberOfComponents="3" format="ascii">"#
    )?;
    for p in polydata.points() {
        writeln!(writer, "          {} {} {}", p.x, p.y, p.z)?;
    }
    writeln!(writer, "        </DataArray>")?;
    writeln!(writer, "      </Points>")?;

    writeln!(writer, "      <Lines>")?;
    writeln!(
        writer,
        r#"        <DataArray type="Int64" Name="connectivity" format="ascii">"#
    )?;
    for ids in polydata.lines() {
        write!(writer, "         ")?;
        for id in ids {
            write!(writer, " {id}")?;
        }
        writeln!(writer)?;
    }
    writeln!(writer, "        </DataArray>")?;
    writeln!(
        writer,
        r#"        <DataArray type="Int64" Name="offsets" format="ascii">"#
    )?;
    let mut offset = 0;
    let offsets = polydata.lines().map(|ids| {
        offset += ids.len();
        offset
    });
    write_indented_rows(&mut writer, offsets)?;
    writeln!(writer, "        </DataArray>")?;
    writeln!(writer, "      </Lines>")?;

    writeln!(writer, "    </Piece>")?;
    writeln!(writer, "  </PolyData>")?;
    writeln!(writer, "</VTKFile>")?;

    debug!(points = polydata.point_count(), lines, "wrote VTK XML polydata");
    Ok(())
}

fn write_legacy_preamble<W: Write>(writer: &mut W, title: &str) -> Result<(), VtkError> {
    // The title occupies exactly one line.
    let title: String = title
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    writeln!(writer, "{LEGACY_HEADER}")?;
    writeln!(writer, "{title}")?;
    writeln!(writer, "ASCII")?;
    Ok(())
}

fn write_attribute<W: Write>(
    writer: &mut W,
    name: &str,
    attribute: &Attribute,
) -> Result<(), VtkError> {
    let name = encode_name(name);
    match attribute.kind() {
        AttributeKind::Scalar => {
            writeln!(writer, "SCALARS {name} double 1")?;
            writeln!(writer, "LOOKUP_TABLE default")?;
            write_rows(writer, attribute.as_slice().iter().copied())
        }
        AttributeKind::Vector => {
            writeln!(writer, "VECTORS {name} double")?;
            for i in 0..attribute.tuple_count() {
                if let Some(v) = attribute.vector(i) {
                    writeln!(writer, "{} {} {}", v.x, v.y, v.z)?;
                }
            }
            Ok(())
        }
    }
}

pub(crate) fn write_rows<W: Write>(
    writer: &mut W,
    values: impl Iterator<Item = f64>,
) -> Result<(), VtkError> {
    let mut in_row = 0;
    for v in values {
        if in_row > 0 {
            write!(writer, " ")?;
        }
        write!(writer, "{v}")?;
        in_row += 1;
        if in_row == VALUES_PER_LINE {
            writeln!(writer)?;
            in_row = 0;
        }
    }
    if in_row > 0 {
        writeln!(writer)?;
    }
    Ok(())
}

fn write_indented_rows<W: Write>(
    writer: &mut W,
    values: impl Iterator<Item = usize>,
) -> Result<(), VtkError> {
    let mut in_row = 0;
    for v in values {
        if in_row == 0 {
            write!(writer, "         ")?;
        }
        write!(writer, " {v}")?;
        in_row += 1;
        if in_row == VALUES_PER_LINE {
            writeln!(writer)?;
            in_row = 0;
        }
    }
    if in_row > 0 {
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_grid;
    use scivis_core::Vec3;

    fn as_text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    fn two_segments() -> PolyData {
        let mut pd = PolyData::segments();
        pd.push_segment(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        pd.push_segment(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.5, 1.5, 0.0));
        pd
    }

    // ---- grid ----

    #[test]
    fn uniform_grid_writes_structured_points() {
        let grid = StructuredGrid::uniform([2, 2, 1], Vec3::new(1.0, 2.0, 0.0), Vec3::new(0.5, 0.25, 1.0))
            .unwrap()
            .with_attribute("Pressure", Attribute::scalars(vec![0.0, 1.0, 2.0, 3.0]))
            .unwrap();
        let mut buf = Vec::new();
        write_grid(&mut buf, &grid, "demo").unwrap();
        let text = as_text(buf);
        assert!(text.starts_with("# vtk DataFile Version 3.0\ndemo\nASCII\n"));
        assert!(text.contains("DATASET STRUCTURED_POINTS\n"));
        assert!(text.contains("ORIGIN 1 2 0\n"));
        assert!(text.contains("SPACING 0.5 0.25 1\n"));
        assert!(text.contains("POINT_DATA 4\nSCALARS Pressure double 1\nLOOKUP_TABLE default\n0 1 2 3\n"));
    }

    #[test]
    fn rectilinear_grid_round_trips() {
        let grid = StructuredGrid::rectilinear(vec![0.0, 0.1, 0.35], vec![-1.0, 1.0], vec![0.0])
            .unwrap()
            .with_attribute(
                "wind speed",
                Attribute::vectors(&[Vec3::new(0.1, 0.2, 0.3); 6]),
            )
            .unwrap()
            .with_attribute("t", Attribute::scalars((0..6).map(|i| i as f64 / 3.0).collect()))
            .unwrap();
        let mut buf = Vec::new();
        write_grid(&mut buf, &grid, "rect").unwrap();
        let text = as_text(buf);
        assert!(text.contains("DATASET RECTILINEAR_GRID\n"));
        assert!(text.contains("VECTORS wind%20speed double\n"));

        let back = read_grid(text.as_bytes()).unwrap();
        assert_eq!(back.axes(), grid.axes());
        let names: Vec<&str> = back.attributes().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["wind speed", "t"]);
        assert_eq!(back.attribute("t"), grid.attribute("t"));
        assert_eq!(back.attribute("wind speed"), grid.attribute("wind speed"));
    }

    #[test]
    fn long_arrays_wrap_rows() {
        let grid = StructuredGrid::uniform([20, 1, 1], Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0))
            .unwrap()
            .with_attribute("s", Attribute::scalars(vec![1.0; 20]))
            .unwrap();
        let mut buf = Vec::new();
        write_grid(&mut buf, &grid, "t").unwrap();
        let text = as_text(buf);
        let data: Vec<&str> = text
            .lines()
            .skip_while(|l| !l.starts_with("LOOKUP_TABLE"))
            .skip(1)
            .collect();
        assert_eq!(data.len(), 3);
        assert!(data.iter().all(|l| l.split_whitespace().count() <= VALUES_PER_LINE));
    }

    #[test]
    fn title_newlines_are_flattened() {
        let grid = StructuredGrid::uniform([1, 1, 1], Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0)).unwrap();
        let mut buf = Vec::new();
        write_grid(&mut buf, &grid, "two\nlines").unwrap();
        let back = read_grid(buf.as_slice()).unwrap();
        assert_eq!(back.dimensions(), [1, 1, 1]);
    }

    // ---- polydata ----

    #[test]
    fn legacy_polydata_declares_counts() {
        let mut buf = Vec::new();
        write_legacy_polydata(&mut buf, &two_segments(), "iso").unwrap();
        let text = as_text(buf);
        assert!(text.contains("DATASET POLYDATA\nPOINTS 4 double\n"));
        assert!(text.contains("0.5 1.5 0\n"));
        assert!(text.contains("LINES 2 6\n2 0 1\n2 2 3\n"));
    }

    #[test]
    fn legacy_chain_is_one_line_cell() {
        let pd = PolyData::chain(vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)]);
        let mut buf = Vec::new();
        write_legacy_polydata(&mut buf, &pd, "trace").unwrap();
        assert!(as_text(buf).ends_with("LINES 1 4\n3 0 1 2\n"));
    }

    #[test]
    fn empty_polydata_has_no_lines_section() {
        let mut buf = Vec::new();
        write_legacy_polydata(&mut buf, &PolyData::segments(), "empty").unwrap();
        let text = as_text(buf);
        assert!(text.ends_with("POINTS 0 double\n"));
        assert!(!text.contains("LINES"));
    }

    #[test]
    fn vtp_declares_counts_and_offsets() {
        let mut buf = Vec::new();
        write_vtp(&mut buf, &two_segments()).unwrap();
        let text = as_text(buf);
        assert!(text.contains(r#"NumberOfPoints="4""#));
        assert!(text.contains(r#"NumberOfLines="2""#));
        let offsets = text
            .split(r#"Name="offsets" format="ascii">"#)
            .nth(1)
            .and_then(|rest| rest.split("</DataArray>").next())
            .unwrap();
        let offsets: Vec<usize> = offsets
            .split_whitespace()
            .map(|t| t.parse().unwrap())
            .collect();
        assert_eq!(offsets, vec![2, 4]);
        assert!(text.trim_end().ends_with("</VTKFile>"));
    }
}
