//! Legacy VTK structured-grid reader.
//!
//! [`read_grid`] parses ASCII legacy files with a `STRUCTURED_POINTS` or
//! `RECTILINEAR_GRID` dataset into a [`StructuredGrid`]. Point data may
//! contain `SCALARS` (1 or 3 components), `VECTORS`/`NORMALS`, and
//! `FIELD` arrays (1 or 3 components). A `CELL_DATA` section ends the
//! read; cell attributes are not loaded.

use std::io::BufRead;

use scivis_core::{Attribute, AttributeKind, GridAccess, Vec3};
use scivis_grid::{Axis, StructuredGrid};
use tracing::{debug, warn};

use crate::error::VtkError;
use crate::tokens::{decode_name, Tokens};

/// Data type keywords accepted before numeric arrays. Values are always
/// widened to `f64`.
const DATA_TYPES: &[&str] = &[
    "bit",
    "char",
    "unsigned_char",
    "short",
    "unsigned_short",
    "int",
    "unsigned_int",
    "long",
    "unsigned_long",
    "vtkidtype",
    "vtktypeint64",
    "vtktypeuint64",
    "float",
    "double",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Dataset {
    StructuredPoints,
    RectilinearGrid,
}

/// Read a legacy VTK grid from any buffered source.
///
/// # Examples
///
/// ```
/// use scivis_core::GridAccess;
///
/// let text = "# vtk DataFile Version 3.0\n\
///             demo\n\
///             ASCII\n\
///             DATASET STRUCTURED_POINTS\n\
///             DIMENSIONS 2 2 1\n\
///             ORIGIN 0 0 0\n\
///             SPACING 1 1 1\n\
///             POINT_DATA 4\n\
///             SCALARS Pressure float 1\n\
///             LOOKUP_TABLE default\n\
///             0 1 2 3\n";
/// let grid = scivis_io::read_grid(text.as_bytes()).unwrap();
/// assert_eq!(grid.dimensions(), [2, 2, 1]);
/// assert_eq!(grid.attribute("Pressure").unwrap().scalar(3), Some(3.0));
/// ```
pub fn read_grid<R: BufRead>(reader: R) -> Result<StructuredGrid, VtkError> {
    let mut tokens = Tokens::new(reader);

    let header = tokens.raw_line()?.ok_or(VtkError::UnexpectedEof {
        line: 0,
        expected: "a legacy VTK header",
    })?;
    if !header.trim_start().starts_with("# vtk DataFile") {
        return Err(VtkError::InvalidHeader { found: header });
    }
    let title = tokens.raw_line()?.ok_or(VtkError::UnexpectedEof {
        line: tokens.line(),
        expected: "a title line",
    })?;

    let encoding = tokens.expect_token("ASCII or BINARY")?;
    if encoding.eq_ignore_ascii_case("BINARY") {
        return Err(VtkError::UnsupportedEncoding { encoding });
    }
    if !encoding.eq_ignore_ascii_case("ASCII") {
        return Err(VtkError::InvalidToken {
            line: tokens.line(),
            token: encoding,
            expected: "ASCII or BINARY",
        });
    }

    tokens.expect_keyword("DATASET")?;
    let dataset = tokens.expect_token("a dataset type")?;
    let kind = match dataset.to_ascii_uppercase().as_str() {
        "STRUCTURED_POINTS" => Dataset::StructuredPoints,
        "RECTILINEAR_GRID" => Dataset::RectilinearGrid,
        _ => return Err(VtkError::UnsupportedDataset { dataset }),
    };

    let axes = read_geometry(&mut tokens, kind)?;
    let mut grid = StructuredGrid::new(axes)?;

    if tokens.next_token()?.is_some() {
        // read_geometry only stops early on POINT_DATA.
        let count: usize = tokens.parse("a point count")?;
        if count != grid.point_count() {
            return Err(VtkError::CountMismatch {
                line: tokens.line(),
                section: "POINT_DATA".into(),
                expected: grid.point_count(),
                found: count,
            });
        }
        read_point_data(&mut tokens, &mut grid)?;
    }

    debug!(
        title = %title.trim(),
        dims = ?grid.dimensions(),
        arrays = grid.attributes().count(),
        "read legacy VTK grid"
    );
    Ok(grid)
}

/// Geometry keywords up to `POINT_DATA` (left unconsumed) or end of input.
fn read_geometry<R: BufRead>(
    tokens: &mut Tokens<R>,
    kind: Dataset,
) -> Result<[Axis; 3], VtkError> {
    let mut dims: Option<[usize; 3]> = None;
    let mut origin = Vec3::ZERO;
    let mut spacing = Vec3::new(1.0, 1.0, 1.0);
    let mut coords: [Option<Vec<f64>>; 3] = [None, None, None];

    while let Some(keyword) = tokens.peek_token()?.map(str::to_ascii_uppercase) {
        let line = tokens.line();
        match (kind, keyword.as_str()) {
            (_, "POINT_DATA") => break,
            (_, "DIMENSIONS") => {
                tokens.next_token()?;
                dims = Some([
                    tokens.parse("a dimension")?,
                    tokens.parse("a dimension")?,
                    tokens.parse("a dimension")?,
                ]);
            }
            (Dataset::StructuredPoints, "ORIGIN") => {
                tokens.next_token()?;
                origin = Vec3::from_array(read_triple(tokens)?);
            }
            (Dataset::StructuredPoints, "SPACING" | "ASPECT_RATIO") => {
                tokens.next_token()?;
                spacing = Vec3::from_array(read_triple(tokens)?);
            }
            (Dataset::RectilinearGrid, "X_COORDINATES" | "Y_COORDINATES" | "Z_COORDINATES") => {
                tokens.next_token()?;
                let axis = match keyword.as_bytes()[0] {
                    b'X' => 0,
                    b'Y' => 1,
                    _ => 2,
                };
                let n: usize = tokens.parse("a coordinate count")?;
                if let Some(expected) = dims.map(|d| d[axis]).filter(|&d| d != n) {
                    return Err(VtkError::CountMismatch {
                        line,
                        section: keyword.clone(),
                        expected,
                        found: n,
                    });
                }
                read_data_type(tokens)?;
                coords[axis] = Some(tokens.parse_f64s(n)?);
            }
            _ => return Err(VtkError::UnsupportedSection { line, keyword }),
        }
    }

    let dims = dims.ok_or(VtkError::MissingSection {
        section: "DIMENSIONS",
    })?;
    match kind {
        Dataset::StructuredPoints => Ok([
            Axis::uniform(origin.x, spacing.x, dims[0]),
            Axis::uniform(origin.y, spacing.y, dims[1]),
            Axis::uniform(origin.z, spacing.z, dims[2]),
        ]),
        Dataset::RectilinearGrid => {
            let line = tokens.line();
            let [x, y, z] = coords;
            Ok([
                coordinate_axis(x, dims[0], "X_COORDINATES", line)?,
                coordinate_axis(y, dims[1], "Y_COORDINATES", line)?,
                coordinate_axis(z, dims[2], "Z_COORDINATES", line)?,
            ])
        }
    }
}

fn coordinate_axis(
    values: Option<Vec<f64>>,
    len: usize,
    section: &'static str,
    line: usize,
) -> Result<Axis, VtkError> {
    let values = values.ok_or(VtkError::MissingSection { section })?;
    if values.len() != len {
        return Err(VtkError::CountMismatch {
            line,
            section: section.into(),
            expected: len,
            found: values.len(),
        });
    }
    Ok(Axis::rectilinear(values))
}

fn read_point_data<R: BufRead>(
    tokens: &mut Tokens<R>,
    grid: &mut StructuredGrid,
) -> Result<(), VtkError> {
    let n = grid.point_count();
    while let Some(keyword) = tokens.next_token()? {
        let line = tokens.line();
        match keyword.to_ascii_uppercase().as_str() {
            "SCALARS" => {
                let name = decode_name(&tokens.expect_token("an array name")?);
                read_data_type(tokens)?;
                let components = if tokens.has_more_on_line() {
                    tokens.parse("a component count")?
                } else {
                    1
                };
                if tokens
                    .peek_token()?
                    .is_some_and(|t| t.eq_ignore_ascii_case("LOOKUP_TABLE"))
                {
                    tokens.next_token()?;
                    tokens.expect_token("a lookup table name")?;
                }
                check_components(&name, components)?;
                let data = tokens.parse_f64s(value_count(n, components, line, &name)?)?;
                insert(grid, name, components, data)?;
            }
            "VECTORS" | "NORMALS" => {
                let name = decode_name(&tokens.expect_token("an array name")?);
                read_data_type(tokens)?;
                let data = tokens.parse_f64s(value_count(n, 3, line, &name)?)?;
                insert(grid, name, 3, data)?;
            }
            "FIELD" => {
                tokens.expect_token("a field name")?;
                let arrays: usize = tokens.parse("an array count")?;
                for _ in 0..arrays {
                    let name = decode_name(&tokens.expect_token("an array name")?);
                    let components: usize = tokens.parse("a component count")?;
                    check_components(&name, components)?;
                    let tuples: usize = tokens.parse("a tuple count")?;
                    if tuples != n {
                        return Err(VtkError::CountMismatch {
                            line: tokens.line(),
                            section: name,
                            expected: n,
                            found: tuples,
                        });
                    }
                    read_data_type(tokens)?;
                    let data =
                        tokens.parse_f64s(value_count(n, components, tokens.line(), &name)?)?;
                    insert(grid, name, components, data)?;
                }
            }
            "LOOKUP_TABLE" => {
                // A color table: name, size, then size RGBA tuples.
                tokens.expect_token("a lookup table name")?;
                let size: usize = tokens.parse("a lookup table size")?;
                let values = value_count(size, 4, line, "LOOKUP_TABLE")?;
                tokens.skip_tokens(values, "a lookup table entry")?;
            }
            "CELL_DATA" => {
                warn!(line, "ignoring CELL_DATA section and everything after it");
                break;
            }
            _ => return Err(VtkError::UnsupportedSection { line, keyword }),
        }
    }
    Ok(())
}

/// Values in an array of `tuples` entries with `components` each.
fn value_count(
    tuples: usize,
    components: usize,
    line: usize,
    section: &str,
) -> Result<usize, VtkError> {
    tuples
        .checked_mul(components)
        .ok_or_else(|| VtkError::CountTooLarge {
            line,
            section: section.to_string(),
        })
}

/// Reject unsupported component counts before any values are read.
pub(crate) fn check_components(name: &str, components: usize) -> Result<(), VtkError> {
    match AttributeKind::from_components(components) {
        Some(_) => Ok(()),
        None => Err(VtkError::UnsupportedComponents {
            name: name.to_string(),
            components,
        }),
    }
}

pub(crate) fn insert(
    grid: &mut StructuredGrid,
    name: String,
    components: usize,
    data: Vec<f64>,
) -> Result<(), VtkError> {
    let kind = AttributeKind::from_components(components).ok_or_else(|| {
        VtkError::UnsupportedComponents {
            name: name.clone(),
            components,
        }
    })?;
    let attribute = Attribute::from_flat(kind, data).ok_or_else(|| {
        VtkError::UnsupportedComponents {
            name: name.clone(),
            components,
        }
    })?;
    grid.insert_attribute(name, attribute)?;
    Ok(())
}

fn read_triple<R: BufRead>(tokens: &mut Tokens<R>) -> Result<[f64; 3], VtkError> {
    Ok([
        tokens.parse("a number")?,
        tokens.parse("a number")?,
        tokens.parse("a number")?,
    ])
}

fn read_data_type<R: BufRead>(tokens: &mut Tokens<R>) -> Result<(), VtkError> {
    let token = tokens.expect_token("a data type")?;
    if DATA_TYPES.iter().any(|t| t.eq_ignore_ascii_case(&token)) {
        Ok(())
    } else {
        Err(VtkError::InvalidToken {
            line: tokens.line(),
            token,
            expected: "a data type",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scivis_core::{GridAccess, PointId};
    use scivis_grid::GridError;

    const HEADER: &str = "# vtk DataFile Version 3.0\ntest grid\nASCII\n";

    fn read(body: &str) -> Result<StructuredGrid, VtkError> {
        let text = format!("{HEADER}{body}");
        read_grid(text.as_bytes())
    }

    #[test]
    fn structured_points_with_scalars_and_vectors() {
        let g = read(
            "DATASET STRUCTURED_POINTS\n\
             DIMENSIONS 3 2 1\n\
             ORIGIN -1 0 0.5\n\
             SPACING 0.5 2 1\n\
             POINT_DATA 6\n\
             SCALARS Pressure double\n\
             LOOKUP_TABLE default\n\
             0 1 2\n3 4 5\n\
             VECTORS vectors float\n\
             1 0 0 1 0 0 1 0 0\n\
             0 1 0 0 1 0 0 1 0\n",
        )
        .unwrap();
        assert_eq!(g.dimensions(), [3, 2, 1]);
        assert_eq!(g.bounds().as_extents(), [-1.0, 0.0, 0.0, 2.0, 0.5, 0.5]);
        assert_eq!(g.attribute("Pressure").unwrap().scalar(4), Some(4.0));
        assert_eq!(
            g.attribute("vectors").unwrap().vector(5),
            Some(Vec3::new(0.0, 1.0, 0.0))
        );
        let names: Vec<&str> = g.attributes().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Pressure", "vectors"]);
    }

    #[test]
    fn rectilinear_grid_with_field_data() {
        let g = read(
            "DATASET RECTILINEAR_GRID\n\
             DIMENSIONS 2 3 1\n\
             X_COORDINATES 2 float\n0 10\n\
             Y_COORDINATES 3 float\n0 1 3\n\
             Z_COORDINATES 1 float\n0\n\
             POINT_DATA 6\n\
             FIELD FieldData 2\n\
             temp 1 6 double\n1 2 3 4 5 6\n\
             wind 3 6 float\n\
             0 0 0 1 1 1 2 2 2 3 3 3 4 4 4 5 5 5\n",
        )
        .unwrap();
        assert_eq!(g.point_coord(PointId(5)), Vec3::new(10.0, 3.0, 0.0));
        assert_eq!(
            g.attribute("temp").unwrap().kind(),
            AttributeKind::Scalar
        );
        assert_eq!(
            g.attribute("wind").unwrap().vector(2),
            Some(Vec3::new(2.0, 2.0, 2.0))
        );
    }

    #[test]
    fn scalars_with_three_components_become_vectors() {
        let g = read(
            "DATASET STRUCTURED_POINTS\nDIMENSIONS 2 1 1\n\
             POINT_DATA 2\nSCALARS v float 3\nLOOKUP_TABLE default\n1 2 3 4 5 6\n",
        )
        .unwrap();
        assert_eq!(g.attribute("v").unwrap().kind(), AttributeKind::Vector);
    }

    #[test]
    fn geometry_only_file_has_no_attributes() {
        let g = read("DATASET STRUCTURED_POINTS\nDIMENSIONS 2 2 2\n").unwrap();
        assert_eq!(g.point_count(), 8);
        assert_eq!(g.spacing(), Some(Vec3::new(1.0, 1.0, 1.0)));
        assert_eq!(g.attributes().count(), 0);
    }

    #[test]
    fn cell_data_stops_the_read() {
        let g = read(
            "DATASET STRUCTURED_POINTS\nDIMENSIONS 2 1 1\n\
             POINT_DATA 2\nSCALARS s float\nLOOKUP_TABLE default\n1 2\n\
             CELL_DATA 1\nSCALARS c float\nLOOKUP_TABLE default\n9\n",
        )
        .unwrap();
        assert!(g.attribute("s").is_some());
        assert!(g.attribute("c").is_none());
    }

    #[test]
    fn binary_is_rejected() {
        let err = read_grid("# vtk DataFile Version 3.0\nt\nBINARY\n".as_bytes()).unwrap_err();
        assert!(matches!(err, VtkError::UnsupportedEncoding { .. }));
    }

    #[test]
    fn bad_header_is_rejected() {
        let err = read_grid("hello\n".as_bytes()).unwrap_err();
        assert!(matches!(err, VtkError::InvalidHeader { .. }));
    }

    #[test]
    fn unsupported_dataset_is_rejected() {
        let err = read("DATASET POLYDATA\nPOINTS 0 float\n").unwrap_err();
        assert!(matches!(err, VtkError::UnsupportedDataset { dataset } if dataset == "POLYDATA"));
    }

    #[test]
    fn missing_dimensions_is_reported() {
        let err = read("DATASET STRUCTURED_POINTS\nORIGIN 0 0 0\n").unwrap_err();
        assert!(matches!(
            err,
            VtkError::MissingSection {
                section: "DIMENSIONS"
            }
        ));
    }

    #[test]
    fn coordinate_count_must_match_dimensions() {
        let err = read(
            "DATASET RECTILINEAR_GRID\nDIMENSIONS 3 1 1\n\
             X_COORDINATES 2 float\n0 1\n\
             Y_COORDINATES 1 float\n0\n\
             Z_COORDINATES 1 float\n0\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            VtkError::CountMismatch {
                expected: 3,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn missing_coordinates_are_reported() {
        let err = read(
            "DATASET RECTILINEAR_GRID\nDIMENSIONS 2 1 1\nX_COORDINATES 2 float\n0 1\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            VtkError::MissingSection {
                section: "Y_COORDINATES"
            }
        ));
    }

    #[test]
    fn point_count_mismatch_is_reported() {
        let err = read("DATASET STRUCTURED_POINTS\nDIMENSIONS 2 2 1\nPOINT_DATA 5\n").unwrap_err();
        assert!(matches!(
            err,
            VtkError::CountMismatch {
                expected: 4,
                found: 5,
                ..
            }
        ));
    }

    #[test]
    fn bad_number_reports_line() {
        let err = read(
            "DATASET STRUCTURED_POINTS\nDIMENSIONS 2 1 1\n\
             POINT_DATA 2\nSCALARS s float\nLOOKUP_TABLE default\n1 oops\n",
        )
        .unwrap_err();
        match err {
            VtkError::InvalidToken { line, token, .. } => {
                assert_eq!(line, 9);
                assert_eq!(token, "oops");
            }
            other => panic!("expected InvalidToken, got {other:?}"),
        }
    }

    #[test]
    fn truncated_data_is_reported() {
        let err = read(
            "DATASET STRUCTURED_POINTS\nDIMENSIONS 2 2 1\n\
             POINT_DATA 4\nSCALARS s float\nLOOKUP_TABLE default\n1 2 3\n",
        )
        .unwrap_err();
        assert!(matches!(err, VtkError::UnexpectedEof { .. }));
    }

    #[test]
    fn invalid_spacing_surfaces_grid_error() {
        let err = read("DATASET STRUCTURED_POINTS\nDIMENSIONS 2 2 1\nSPACING 0 1 1\n").unwrap_err();
        assert!(matches!(
            err,
            VtkError::Grid(GridError::InvalidSpacing { axis: 0, .. })
        ));
    }

    #[test]
    fn duplicate_array_names_are_rejected() {
        let err = read(
            "DATASET STRUCTURED_POINTS\nDIMENSIONS 1 1 1\nPOINT_DATA 1\n\
             SCALARS a float\nLOOKUP_TABLE default\n1\n\
             SCALARS a float\nLOOKUP_TABLE default\n2\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            VtkError::Grid(GridError::DuplicateAttribute { .. })
        ));
    }

    #[test]
    fn unsupported_component_count() {
        let err = read(
            "DATASET STRUCTURED_POINTS\nDIMENSIONS 1 1 1\nPOINT_DATA 1\n\
             FIELD f 1\nt 2 1 float\n1 2\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            VtkError::UnsupportedComponents { components: 2, .. }
        ));
    }

    // ---- hostile counts ----

    #[test]
    fn huge_field_components_are_rejected_before_reading() {
        let err = read(
            "DATASET STRUCTURED_POINTS\nDIMENSIONS 2 1 1\nPOINT_DATA 2\n\
             FIELD f 1\nt 9223372036854775807 2 float\n1 2\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            VtkError::UnsupportedComponents {
                components: 9223372036854775807,
                ..
            }
        ));
    }

    #[test]
    fn huge_scalar_components_are_rejected_before_reading() {
        let err = read(
            "DATASET STRUCTURED_POINTS\nDIMENSIONS 2 1 1\nPOINT_DATA 2\n\
             SCALARS s float 18446744073709551615\n1 2\n",
        )
        .unwrap_err();
        assert!(matches!(err, VtkError::UnsupportedComponents { .. }));
    }

    #[test]
    fn overflowing_lookup_table_size_is_rejected() {
        let err = read(
            "DATASET STRUCTURED_POINTS\nDIMENSIONS 1 1 1\nPOINT_DATA 1\n\
             LOOKUP_TABLE colors 9223372036854775807\n0 0 0 1\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            VtkError::CountTooLarge { line: 7, ref section } if section == "LOOKUP_TABLE"
        ));
    }

    #[test]
    fn oversized_lookup_table_runs_out_of_input() {
        let err = read(
            "DATASET STRUCTURED_POINTS\nDIMENSIONS 1 1 1\nPOINT_DATA 1\n\
             LOOKUP_TABLE colors 1000000000000\n0 0 0 1\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            VtkError::UnexpectedEof {
                expected: "a lookup table entry",
                ..
            }
        ));
    }

    #[test]
    fn lookup_table_entries_are_skipped() {
        let g = read(
            "DATASET STRUCTURED_POINTS\nDIMENSIONS 2 1 1\nPOINT_DATA 2\n\
             SCALARS s float\nLOOKUP_TABLE colors\n5 6\n\
             LOOKUP_TABLE colors 2\n0 0 0 1\n1 1 1 1\n",
        )
        .unwrap();
        assert_eq!(g.attribute("s").unwrap().scalar(1), Some(6.0));
    }

    #[test]
    fn huge_coordinate_count_is_a_mismatch_not_an_allocation() {
        let err = read(
            "DATASET RECTILINEAR_GRID\nDIMENSIONS 2 1 1\n\
             X_COORDINATES 18446744073709551615 float\n0 1\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            VtkError::CountMismatch {
                expected: 2,
                found: 18446744073709551615,
                ..
            }
        ));
    }

    #[test]
    fn huge_coordinate_count_before_dimensions_runs_out_of_input() {
        let err = read(
            "DATASET RECTILINEAR_GRID\n\
             X_COORDINATES 18446744073709551615 float\n0 1\n",
        )
        .unwrap_err();
        assert!(matches!(err, VtkError::UnexpectedEof { .. }));
    }
}
