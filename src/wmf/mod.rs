// Windows Metafile (WMF) decoder and encoder
//
// The decoder walks a metafile record by record and forwards each one to a
// `Gdi` sink as a typed call. The encoder is itself a `Gdi` sink that turns
// those calls back into records, so decoding into a `WmfWriter` re-encodes a
// file.
//
// References:
// - [MS-WMF]: Windows Metafile Format Specification
// - https://learn.microsoft.com/en-us/openspecs/windows_protocols/ms-wmf/

pub mod constants;
pub mod device_context;
pub mod gdi;
pub mod header;
pub mod object;
pub mod parser;
pub mod record;
pub mod recorder;
pub mod writer;

pub use device_context::DeviceContext;
pub use gdi::{Area, EtoOptions, Gdi, Point, Rect, RegionComplexity, TextAlign};
pub use header::{PlaceableHeader, WmfHeader};
pub use object::{
    Brush, Font, GdiObject, ObjectKind, ObjectTable, Palette, PatternBrush, Pen, Region,
};
pub use parser::{ParseOptions, WmfParser, WmfSummary};
pub use recorder::{Operation, OperationRecorder};
pub use writer::{WmfWriter, WriterOptions};

use crate::common::error::Result;

/// Decode an in-memory little-endian metafile into `gdi`
///
/// # Example
/// ```
/// use wmf_codec::wmf::{Gdi, OperationRecorder, WmfWriter, parse_wmf};
///
/// let mut writer = WmfWriter::new();
/// writer.set_bk_mode(1)?;
/// let bytes = writer.to_bytes()?;
///
/// let mut recorder = OperationRecorder::new();
/// let summary = parse_wmf(&bytes, &mut recorder)?;
/// assert!(summary.placeable.is_none());
/// # Ok::<(), wmf_codec::common::Error>(())
/// ```
pub fn parse_wmf<G: Gdi + ?Sized>(data: &[u8], gdi: &mut G) -> Result<WmfSummary> {
    WmfParser::new().parse(data, gdi)
}

/// Decode a metafile into the list of operations it performs
pub fn decode_operations(data: &[u8]) -> Result<Vec<Operation>> {
    let mut recorder = OperationRecorder::new();
    parse_wmf(data, &mut recorder)?;
    Ok(recorder.into_operations())
}

/// Decode a metafile and encode it again
///
/// Trailing bytes a record declared but did not use are dropped, and header
/// totals are recomputed from the records actually written.
pub fn reencode_wmf(data: &[u8]) -> Result<Vec<u8>> {
    let mut writer = WmfWriter::new();
    let summary = parse_wmf(data, &mut writer)?;
    writer.set_version(summary.header.version);
    writer.to_bytes()
}
