//! Unified error types for the WMF codec.
use crate::common::binary::BinaryError;
use thiserror::Error;

/// Main error type for WMF decoding and encoding.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error while writing encoder output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The source ended before the first field could be read
    #[error("WMF source is empty")]
    EmptySource {
        #[source]
        source: BinaryError,
    },

    /// The source ended in the middle of the metafile
    #[error("Failed to decode WMF stream")]
    Decode {
        #[source]
        source: BinaryError,
    },

    /// Standard header carries an unexpected type or size
    #[error("Invalid WMF header: type {file_type}, header size {header_size} words")]
    InvalidHeader { file_type: u16, header_size: u16 },

    /// Record function the decoder does not model
    #[error("Unsupported WMF record 0x{function:04X} ({size} words)")]
    UnsupportedRecord { function: u16, size: u32 },

    /// Declared record size cannot hold the record header or its fixed fields
    #[error("Invalid size {size} words for WMF record 0x{function:04X}")]
    InvalidRecordSize { function: u16, size: u32 },

    /// Record references an empty or out-of-range object slot
    #[error("WMF record 0x{function:04X} references empty object slot {index}")]
    MissingObject { function: u16, index: usize },

    /// Record references an object of the wrong kind
    #[error("WMF record 0x{function:04X} expects a {expected} in object slot {index}")]
    ObjectKindMismatch {
        function: u16,
        index: usize,
        expected: &'static str,
    },

    /// Palette record found while no palette is selected
    #[error("WMF record 0x{function:04X} requires a selected palette")]
    NoPaletteSelected { function: u16 },

    /// Every slot of the fixed-size object table is occupied
    #[error("WMF object table is full ({capacity} slots)")]
    ObjectTableFull { capacity: usize },

    /// Encoder input that cannot be represented as a WMF record
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for WMF operations.
pub type Result<T> = std::result::Result<T, Error>;
