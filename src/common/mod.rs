//! Common types and utilities shared by the decoder and the encoder.
//!
//! This module holds the pieces that are not specific to metafile records:
//! the sequential binary reader, charset-aware text conversion and the crate
//! error type.

// Submodule declarations
pub mod binary;
pub mod encoding;
pub mod error;

// Re-exports for convenience
pub use binary::{BinaryReader, ByteOrder};
pub use error::{Error, Result};
