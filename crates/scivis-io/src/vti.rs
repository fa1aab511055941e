//! VTK XML ImageData (`.vti`) reader and writer.
//!
//! [`read_vti`] loads a single-piece ImageData document whose point-data
//! arrays are stored as ASCII text, inline base64 (`format="binary"`), or
//! in an `AppendedData` block (`raw` or `base64`). Every numeric type is
//! widened to `f64`. Compressed documents are rejected, and cell data is
//! skipped.
//!
//! Binary blocks start with a byte-count header (`UInt32` unless the root
//! element says `header_type="UInt64"`). Inline base64 is accepted both
//! with the header and data encoded together and with the header encoded
//! as its own block.

use std::borrow::Cow;
use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use scivis_core::{GridAccess, Vec3};
use scivis_grid::StructuredGrid;
use tracing::{debug, warn};

use crate::error::VtkError;
use crate::reader::{check_components, insert};
use crate::writer::write_rows;

/// How [`write_vti`] stores point-data arrays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VtiEncoding {
    /// Whitespace-separated text.
    Ascii,
    /// Inline base64 of a `UInt64` byte count followed by little-endian
    /// `Float64` values.
    #[default]
    Base64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ByteOrder {
    Little,
    Big,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HeaderType {
    UInt32,
    UInt64,
}

impl HeaderType {
    fn size(self) -> usize {
        match self {
            Self::UInt32 => 4,
            Self::UInt64 => 8,
        }
    }

    /// Characters taken by the header when base64-encoded on its own.
    fn encoded_len(self) -> usize {
        self.size().div_ceil(3) * 4
    }

    /// Byte count stored at the start of `bytes`.
    fn read(self, bytes: &[u8], order: ByteOrder) -> Option<usize> {
        let value = match self {
            Self::UInt32 => {
                let raw: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
                u64::from(match order {
                    ByteOrder::Little => u32::from_le_bytes(raw),
                    ByteOrder::Big => u32::from_be_bytes(raw),
                })
            }
            Self::UInt64 => {
                let raw: [u8; 8] = bytes.get(..8)?.try_into().ok()?;
                match order {
                    ByteOrder::Little => u64::from_le_bytes(raw),
                    ByteOrder::Big => u64::from_be_bytes(raw),
                }
            }
        };
        usize::try_from(value).ok()
    }
}

/// Byte order and header width shared by every binary block in a file.
#[derive(Clone, Copy, Debug)]
struct Layout {
    order: ByteOrder,
    header: HeaderType,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NumberType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
}

macro_rules! widen {
    ($t:ty, $chunk:expr, $order:expr) => {{
        let mut raw = [0u8; std::mem::size_of::<$t>()];
        raw.copy_from_slice($chunk);
        let value = match $order {
            ByteOrder::Little => <$t>::from_le_bytes(raw),
            ByteOrder::Big => <$t>::from_be_bytes(raw),
        };
        value as f64
    }};
}

impl NumberType {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "Int8" | "Char" => Self::Int8,
            "UInt8" | "UnsignedChar" => Self::UInt8,
            "Int16" => Self::Int16,
            "UInt16" => Self::UInt16,
            "Int32" => Self::Int32,
            "UInt32" => Self::UInt32,
            "Int64" => Self::Int64,
            "UInt64" => Self::UInt64,
            "Float32" => Self::Float32,
            "Float64" => Self::Float64,
            _ => return None,
        })
    }

    fn size(self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
        }
    }

    /// `chunk` is exactly `self.size()` bytes.
    fn widen(self, chunk: &[u8], order: ByteOrder) -> f64 {
        match self {
            Self::Int8 => widen!(i8, chunk, order),
            Self::UInt8 => widen!(u8, chunk, order),
            Self::Int16 => widen!(i16, chunk, order),
            Self::UInt16 => widen!(u16, chunk, order),
            Self::Int32 => widen!(i32, chunk, order),
            Self::UInt32 => widen!(u32, chunk, order),
            Self::Int64 => widen!(i64, chunk, order),
            Self::UInt64 => widen!(u64, chunk, order),
            Self::Float32 => widen!(f32, chunk, order),
            Self::Float64 => widen!(f64, chunk, order),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Storage {
    Ascii,
    Binary,
    Appended { offset: usize },
}

#[derive(Debug)]
struct ArraySpec {
    name: String,
    number: NumberType,
    components: usize,
    storage: Storage,
    text: String,
}

impl ArraySpec {
    fn from_element(e: &BytesStart<'_>) -> Result<Self, VtkError> {
        let name = attribute(e, "Name")?.ok_or_else(|| invalid("DataArray without a Name"))?;
        let type_name = attribute(e, "type")?
            .ok_or_else(|| invalid(format!("array {name} has no type")))?;
        let number = NumberType::parse(&type_name)
            .ok_or_else(|| invalid(format!("array {name} has unsupported type {type_name}")))?;
        let components = match attribute(e, "NumberOfComponents")? {
            Some(text) => text.trim().parse().map_err(|_| {
                invalid(format!("array {name} has component count {text:?}"))
            })?,
            None => 1,
        };
        check_components(&name, components)?;

        let format = attribute(e, "format")?.unwrap_or_else(|| "ascii".into());
        let storage = match format.as_str() {
            "ascii" => Storage::Ascii,
            "binary" => Storage::Binary,
            "appended" => {
                let offset = attribute(e, "offset")?
                    .and_then(|o| o.trim().parse().ok())
                    .ok_or_else(|| invalid(format!("appended array {name} has no valid offset")))?;
                Storage::Appended { offset }
            }
            other => {
                return Err(VtkError::UnsupportedEncoding {
                    encoding: other.to_string(),
                })
            }
        };
        Ok(Self {
            name,
            number,
            components,
            storage,
            text: String::new(),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Other,
    Point,
    Cell,
}

/// Everything collected from the XML up to `</ImageData>`.
struct Scan {
    layout: Layout,
    saw_root: bool,
    whole_extent: Option<[i64; 6]>,
    origin: [f64; 3],
    spacing: [f64; 3],
    pieces: usize,
    section: Section,
    current: Option<ArraySpec>,
    arrays: Vec<ArraySpec>,
    skipped: usize,
}

impl Scan {
    fn new() -> Self {
        Self {
            layout: Layout {
                order: ByteOrder::Little,
                header: HeaderType::UInt32,
            },
            saw_root: false,
            whole_extent: None,
            origin: [0.0; 3],
            spacing: [1.0; 3],
            pieces: 0,
            section: Section::Other,
            current: None,
            arrays: Vec::new(),
            skipped: 0,
        }
    }

    fn open(&mut self, e: &BytesStart<'_>, empty: bool) -> Result<(), VtkError> {
        match e.name().as_ref() {
            b"VTKFile" => self.root(e)?,
            b"ImageData" => {
                let extent = attribute(e, "WholeExtent")?.ok_or(VtkError::MissingSection {
                    section: "WholeExtent",
                })?;
                self.whole_extent = Some(parse_numbers(&extent, "WholeExtent")?);
                if let Some(origin) = attribute(e, "Origin")? {
                    self.origin = parse_numbers(&origin, "Origin")?;
                }
                if let Some(spacing) = attribute(e, "Spacing")? {
                    self.spacing = parse_numbers(&spacing, "Spacing")?;
                }
                if let Some(direction) = attribute(e, "Direction")? {
                    let m: [f64; 9] = parse_numbers(&direction, "Direction")?;
                    if m != [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0] {
                        warn!(direction = %direction, "ignoring non-identity Direction");
                    }
                }
            }
            b"Piece" => {
                self.pieces += 1;
                if self.pieces > 1 {
                    return Err(invalid("multi-piece ImageData is not supported"));
                }
                if let Some(extent) = attribute(e, "Extent")? {
                    let extent: [i64; 6] = parse_numbers(&extent, "Extent")?;
                    if Some(extent) != self.whole_extent {
                        return Err(invalid(format!(
                            "piece extent {extent:?} differs from WholeExtent"
                        )));
                    }
                }
            }
            b"PointData" if !empty => self.section = Section::Point,
            b"CellData" if !empty => self.section = Section::Cell,
            b"DataArray" if self.section == Section::Point => {
                let array = ArraySpec::from_element(e)?;
                if empty {
                    self.arrays.push(array);
                } else {
                    self.current = Some(array);
                }
            }
            b"DataArray" => self.skipped += 1,
            _ => {}
        }
        Ok(())
    }

    fn root(&mut self, e: &BytesStart<'_>) -> Result<(), VtkError> {
        self.saw_root = true;
        let dataset = attribute(e, "type")?.unwrap_or_default();
        if dataset != "ImageData" {
            return Err(VtkError::UnsupportedDataset { dataset });
        }
        if let Some(compressor) = attribute(e, "compressor")?.filter(|c| !c.is_empty()) {
            return Err(VtkError::UnsupportedEncoding {
                encoding: format!("compressed ({compressor})"),
            });
        }
        self.layout.order = match attribute(e, "byte_order")?.as_deref() {
            None | Some("LittleEndian") => ByteOrder::Little,
            Some("BigEndian") => ByteOrder::Big,
            Some(other) => return Err(invalid(format!("unknown byte_order {other}"))),
        };
        self.layout.header = match attribute(e, "header_type")?.as_deref() {
            None | Some("UInt32") => HeaderType::UInt32,
            Some("UInt64") => HeaderType::UInt64,
            Some(other) => return Err(invalid(format!("unknown header_type {other}"))),
        };
        Ok(())
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"DataArray" => {
                if let Some(array) = self.current.take() {
                    self.arrays.push(array);
                }
            }
            b"PointData" | b"CellData" => self.section = Section::Other,
            _ => {}
        }
    }
}

/// The `AppendedData` block: everything after its `_` marker.
struct Appended<'a> {
    base64: bool,
    data: &'a [u8],
    offsets: Vec<usize>,
}

impl<'a> Appended<'a> {
    /// Parse the `<AppendedData ...>` tag at the start of `bytes`.
    fn parse(bytes: &'a [u8]) -> Result<Self, VtkError> {
        let tag_end = bytes
            .iter()
            .position(|&b| b == b'>')
            .ok_or_else(|| invalid("unterminated AppendedData tag"))?;
        let mut reader = Reader::from_reader(&bytes[..=tag_end]);
        let encoding = match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => attribute(&e, "encoding")?,
            _ => None,
        }
        .unwrap_or_else(|| "raw".into());
        let base64 = match encoding.as_str() {
            "raw" => false,
            "base64" => true,
            _ => return Err(VtkError::UnsupportedEncoding { encoding }),
        };

        let rest = &bytes[tag_end + 1..];
        let marker = rest
            .iter()
            .position(|&b| !b.is_ascii_whitespace())
            .filter(|&i| rest[i] == b'_')
            .ok_or_else(|| invalid("AppendedData does not start with '_'"))?;
        let mut data = &rest[marker + 1..];
        if base64 {
            if let Some(end) = find(data, b"</AppendedData") {
                data = &data[..end];
            }
        }
        Ok(Self {
            base64,
            data,
            offsets: Vec::new(),
        })
    }

    /// Decoded bytes of the block starting at `offset`.
    fn block(&self, offset: usize, layout: Layout) -> Result<Cow<'a, [u8]>, VtkError> {
        let truncated = || invalid(format!("appended block at offset {offset} is truncated"));
        let start = self.data.get(offset..).ok_or_else(truncated)?;
        if self.base64 {
            let end = self
                .offsets
                .iter()
                .copied()
                .find(|&o| o > offset)
                .map_or(start.len(), |o| o - offset);
            let chunk = start.get(..end).ok_or_else(truncated)?;
            let text = std::str::from_utf8(chunk)
                .map_err(|_| invalid(format!("appended block at offset {offset} is not text")))?;
            Ok(Cow::Owned(decode_base64_block(text, layout)?))
        } else {
            let size = layout.header.read(start, layout.order).ok_or_else(truncated)?;
            let begin = layout.header.size();
            let end = begin.checked_add(size).ok_or_else(truncated)?;
            Ok(Cow::Borrowed(start.get(begin..end).ok_or_else(truncated)?))
        }
    }
}

/// Read a VTK XML ImageData document from any source.
///
/// # Examples
///
/// ```
/// use scivis_core::GridAccess;
///
/// let doc = r#"<?xml version="1.0"?>
/// <VTKFile type="ImageData" version="1.0" byte_order="LittleEndian">
///   <ImageData WholeExtent="0 1 0 1 0 0" Origin="0 0 0" Spacing="0.5 0.5 1">
///     <Piece Extent="0 1 0 1 0 0">
///       <PointData Scalars="Pressure">
///         <DataArray type="Float32" Name="Pressure" format="ascii">0 1 2 3</DataArray>
///       </PointData>
///     </Piece>
///   </ImageData>
/// </VTKFile>"#;
/// let grid = scivis_io::read_vti(doc.as_bytes()).unwrap();
/// assert_eq!(grid.dimensions(), [2, 2, 1]);
/// assert_eq!(grid.attribute("Pressure").unwrap().scalar(3), Some(3.0));
/// ```
pub fn read_vti<R: Read>(mut reader: R) -> Result<StructuredGrid, VtkError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    read_vti_bytes(&bytes)
}

fn read_vti_bytes(bytes: &[u8]) -> Result<StructuredGrid, VtkError> {
    // Raw appended data is not XML, so the parser stops where it begins.
    let (xml, mut appended) = match find(bytes, b"<AppendedData") {
        Some(at) => (&bytes[..at], Some(Appended::parse(&bytes[at..])?)),
        None => (bytes, None),
    };

    let mut scan = Scan::new();
    let mut reader = Reader::from_reader(xml);
    loop {
        match reader.read_event()? {
            Event::Start(e) => scan.open(&e, false)?,
            Event::Empty(e) => scan.open(&e, true)?,
            Event::Text(t) => {
                if let Some(array) = scan.current.as_mut() {
                    let text = t.unescape().map_err(quick_xml::Error::from)?;
                    array.text.push_str(&text);
                    array.text.push(' ');
                }
            }
            Event::End(e) if e.name().as_ref() == b"ImageData" => break,
            Event::End(e) => scan.close(e.name().as_ref()),
            Event::Eof => break,
            _ => {}
        }
    }

    if !scan.saw_root {
        return Err(invalid("no VTKFile root element"));
    }
    let extent = scan.whole_extent.ok_or(VtkError::MissingSection {
        section: "ImageData",
    })?;
    let dims = extent_dimensions(&extent)?;
    let mut origin = scan.origin;
    for (axis, o) in origin.iter_mut().enumerate() {
        *o += extent[2 * axis] as f64 * scan.spacing[axis];
    }
    let mut grid = StructuredGrid::uniform(
        dims,
        Vec3::from_array(origin),
        Vec3::from_array(scan.spacing),
    )?;

    if let Some(appended) = appended.as_mut() {
        appended.offsets = scan
            .arrays
            .iter()
            .filter_map(|a| match a.storage {
                Storage::Appended { offset } => Some(offset),
                _ => None,
            })
            .collect();
        appended.offsets.sort_unstable();
    }

    let n = grid.point_count();
    for array in scan.arrays {
        let values = decode(&array, scan.layout, appended.as_ref())?;
        let expected = n.saturating_mul(array.components);
        if values.len() != expected {
            return Err(VtkError::ArrayLength {
                name: array.name,
                expected,
                found: values.len(),
            });
        }
        insert(&mut grid, array.name, array.components, values)?;
    }
    if scan.skipped > 0 {
        warn!(arrays = scan.skipped, "ignoring arrays outside PointData");
    }

    debug!(
        dims = ?grid.dimensions(),
        arrays = grid.attributes().count(),
        appended = appended.is_some(),
        "read VTK XML image data"
    );
    Ok(grid)
}

fn decode(
    array: &ArraySpec,
    layout: Layout,
    appended: Option<&Appended<'_>>,
) -> Result<Vec<f64>, VtkError> {
    let bytes = match array.storage {
        Storage::Ascii => {
            return array
                .text
                .split_ascii_whitespace()
                .map(|t| {
                    t.parse().map_err(|_| {
                        invalid(format!("array {} has non-numeric value {t:?}", array.name))
                    })
                })
                .collect();
        }
        Storage::Binary => Cow::Owned(decode_base64_block(&array.text, layout)?),
        Storage::Appended { offset } => appended
            .ok_or(VtkError::MissingSection {
                section: "AppendedData",
            })?
            .block(offset, layout)?,
    };

    let size = array.number.size();
    if bytes.len() % size != 0 {
        return Err(invalid(format!(
            "array {} has {} bytes, not a whole number of {:?} values",
            array.name,
            bytes.len(),
            array.number
        )));
    }
    Ok(bytes
        .chunks_exact(size)
        .map(|c| array.number.widen(c, layout.order))
        .collect())
}

/// Decode one base64 binary block and strip its byte-count header.
fn decode_base64_block(text: &str, layout: Layout) -> Result<Vec<u8>, VtkError> {
    let compact: String = text.split_ascii_whitespace().collect();
    let begin = layout.header.size();

    // Header and data encoded together.
    if let Ok(mut bytes) = STANDARD.decode(&compact) {
        if let Some(end) = layout
            .header
            .read(&bytes, layout.order)
            .and_then(|size| begin.checked_add(size))
            .filter(|&end| end <= bytes.len())
        {
            bytes.truncate(end);
            bytes.drain(..begin);
            return Ok(bytes);
        }
    }

    // Header encoded as its own block.
    let split = layout.header.encoded_len();
    let head = compact
        .get(..split)
        .ok_or_else(|| invalid("binary block is shorter than its header"))?;
    let size = layout
        .header
        .read(&STANDARD.decode(head)?, layout.order)
        .ok_or_else(|| invalid("binary block header is truncated"))?;
    let mut body = STANDARD.decode(&compact[split..])?;
    if body.len() < size {
        return Err(invalid(format!(
            "binary block declares {size} bytes but holds {}",
            body.len()
        )));
    }
    body.truncate(size);
    Ok(body)
}

/// Write a uniform grid as a VTK XML ImageData document.
///
/// Every attribute becomes a `Float64` point-data array.
///
/// # Errors
///
/// Returns [`VtkError::NotUniform`] if any axis is rectilinear.
pub fn write_vti<W: Write>(
    mut writer: W,
    grid: &StructuredGrid,
    encoding: VtiEncoding,
) -> Result<(), VtkError> {
    let spacing = grid.spacing().ok_or(VtkError::NotUniform)?;
    let origin = grid.origin();
    let [nx, ny, nz] = grid.dimensions();
    let extent = format!(
        "0 {} 0 {} 0 {}",
        nx.saturating_sub(1),
        ny.saturating_sub(1),
        nz.saturating_sub(1)
    );

    writeln!(writer, r#"<?xml version="1.0"?>"#)?;
    writeln!(
        writer,
        r#"<VTKFile type="ImageData" version="1.0" byte_order="LittleEndian" header_type="UInt64">"#
    )?;
    writeln!(
        writer,
        r#"  <ImageData WholeExtent="{extent}" Origin="{} {} {}" Spacing="{} {} {}">"#,
        origin.x, origin.y, origin.z, spacing.x, spacing.y, spacing.z
    )?;
    writeln!(writer, r#"    <Piece Extent="{extent}">"#)?;
    writeln!(writer, "      <PointData>")?;
    for (name, attribute) in grid.attributes() {
        let format = match encoding {
            VtiEncoding::Ascii => "ascii",
            VtiEncoding::Base64 => "binary",
        };
        writeln!(
            writer,
            r#"        <DataArray type="Float64" Name="{}" NumberOfComponents="{}" format="{format}">"#,
            escape(name),
            attribute.kind().components()
        )?;
        let values = attribute.as_slice();
        match encoding {
            VtiEncoding::Ascii => write_rows(&mut writer, values.iter().copied())?,
            VtiEncoding::Base64 => {
                let size = values.len() * std::mem::size_of::<f64>();
                let mut bytes = Vec::with_capacity(8 + size);
                bytes.extend_from_slice(&(size as u64).to_le_bytes());
                for v in values {
                    bytes.extend_from_slice(&v.to_le_bytes());
                }
                writeln!(writer, "{}", STANDARD.encode(&bytes))?;
            }
        }
        writeln!(writer, "        </DataArray>")?;
    }
    writeln!(writer, "      </PointData>")?;
    writeln!(writer, "    </Piece>")?;
    writeln!(writer, "  </ImageData>")?;
    writeln!(writer, "</VTKFile>")?;

    debug!(dims = ?grid.dimensions(), ?encoding, "wrote VTK XML image data");
    Ok(())
}

fn attribute(e: &BytesStart<'_>, key: &str) -> Result<Option<String>, VtkError> {
    match e.try_get_attribute(key).map_err(quick_xml::Error::from)? {
        Some(a) => Ok(Some(
            a.unescape_value()
                .map_err(quick_xml::Error::from)?
                .into_owned(),
        )),
        None => Ok(None),
    }
}

/// Exactly `N` whitespace-separated numbers.
fn parse_numbers<T: std::str::FromStr + Copy + Default, const N: usize>(
    text: &str,
    what: &str,
) -> Result<[T; N], VtkError> {
    let bad = || invalid(format!("{what} needs {N} numbers, found {text:?}"));
    let mut out = [T::default(); N];
    let mut tokens = text.split_ascii_whitespace();
    for slot in &mut out {
        *slot = tokens.next().and_then(|t| t.parse().ok()).ok_or_else(bad)?;
    }
    if tokens.next().is_some() {
        return Err(bad());
    }
    Ok(out)
}

fn extent_dimensions(extent: &[i64; 6]) -> Result<[usize; 3], VtkError> {
    let mut dims = [0; 3];
    for (axis, d) in dims.iter_mut().enumerate() {
        let (lo, hi) = (extent[2 * axis], extent[2 * axis + 1]);
        *d = hi
            .checked_sub(lo)
            .and_then(|n| n.checked_add(1))
            .and_then(|n| usize::try_from(n).ok())
            .filter(|&n| n > 0)
            .ok_or_else(|| invalid(format!("extent {lo}..{hi} on axis {axis} is empty")))?;
    }
    Ok(dims)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn invalid(message: impl Into<String>) -> VtkError {
    VtkError::InvalidVti {
        message: message.into(),
    }
}
