//! Unified error types for the WMF codec.
//!
//! This module provides a single error type covering structural corruption,
//! truncated input, object table misuse and output failures, presenting a
//! consistent API to both the decoder and the encoder.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
