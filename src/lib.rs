//! wmf-codec - A Rust library for reading and writing Windows Metafiles
//!
//! This library decodes WMF files into calls on a [`wmf::Gdi`] sink and
//! encodes the same calls back into WMF records.
//!
//! # Features
//!
//! - **Decoder**: Walk every record of a metafile, placeable header included,
//!   and forward it to any `Gdi` implementation
//! - **Encoder**: [`wmf::WmfWriter`] implements `Gdi` and produces a complete
//!   metafile with header totals computed on write
//! - **Object table**: Brushes, pens, fonts, palettes, pattern brushes and
//!   regions are tracked in the lowest-free-slot order Windows uses
//! - **Device context**: Window and viewport mappings, current position and
//!   selected objects are kept up to date on both sides
//! - **Capture**: [`wmf::OperationRecorder`] stores calls as comparable values
//!
//! # Example - Decoding a metafile
//!
//! ```no_run
//! use wmf_codec::wmf::{OperationRecorder, WmfParser};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = std::fs::File::open("drawing.wmf")?;
//! let mut recorder = OperationRecorder::new();
//! let summary = WmfParser::new().parse(std::io::BufReader::new(file), &mut recorder)?;
//! println!("{} records", summary.record_count);
//! for operation in recorder.operations() {
//!     println!("{:?}", operation);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Encoding a metafile
//!
//! ```
//! use wmf_codec::wmf::{Gdi, Rect, WmfWriter};
//!
//! # fn main() -> Result<(), wmf_codec::Error> {
//! let mut writer = WmfWriter::new();
//! writer.placeable_header(Rect::new(0, 0, 100, 100), 96)?;
//! let brush = writer.create_brush_indirect(0, 0x0000FF, 0)?;
//! writer.select_object(&brush)?;
//! writer.ellipse(Rect::new(10, 10, 90, 90))?;
//! let bytes = writer.to_bytes()?;
//! assert_eq!(&bytes[..4], &[0xD7, 0xCD, 0xC6, 0x9A]);
//! # Ok(())
//! # }
//! ```

/// Common types and utilities
pub mod common;

/// Windows Metafile records, objects and codecs
pub mod wmf;

pub use common::{Error, Result};
pub use wmf::{Gdi, WmfParser, WmfWriter};
