//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from internal
//! error types to the unified Error type.

use super::types::Error;
use crate::common::binary::BinaryError;

impl From<BinaryError> for Error {
    fn from(err: BinaryError) -> Self {
        match err {
            BinaryError::Io(e) => Error::Io(e),
            err => Error::Decode { source: err },
        }
    }
}

impl Error {
    /// Whether this error reports an input that held no bytes at all
    pub fn is_empty_source(&self) -> bool {
        matches!(self, Error::EmptySource { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_error_becomes_decode() {
        let err: Error = BinaryError::InsufficientData {
            expected: 4,
            available: 1,
        }
        .into();
        assert!(matches!(err, Error::Decode { .. }));
        assert!(!err.is_empty_source());
    }

    #[test]
    fn test_io_error_stays_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = BinaryError::Io(io).into();
        assert!(matches!(err, Error::Io(_)));
    }
}
