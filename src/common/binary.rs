//! Sequential binary reader shared by the metafile decoder.
//!
//! This module provides an endianness-configurable reader over any
//! [`std::io::Read`] source. Besides the usual fixed-width integer reads it
//! keeps a running count of bytes consumed since the last checkpoint, which is
//! how variable-length trailing payloads are sized: declared record size minus
//! the bytes already consumed for fixed fields.

use std::io::{self, Read};
use thiserror::Error;
use zerocopy::{BE, FromBytes, I16, I32, LE, U16, U32};

/// Binary parsing error type
#[derive(Debug, Error)]
pub enum BinaryError {
    /// Not enough data to read the requested type
    #[error("Insufficient data: expected {expected}, got {available}")]
    InsufficientData { expected: usize, available: usize },
    /// The underlying source failed
    #[error("IO error: {0}")]
    Io(#[source] io::Error),
}

/// Result type for binary operations
pub type BinaryResult<T> = Result<T, BinaryError>;

/// Byte order applied to every multi-byte read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Least significant byte first (the WMF default)
    #[default]
    Little,
    /// Most significant byte first
    Big,
}

/// Reads fixed-width values from a byte source.
///
/// # Examples
///
/// ```
/// use wmf_codec::common::binary::{BinaryReader, ByteOrder};
///
/// let data = [0x34, 0x12, 0xFF, 0xFF];
/// let mut reader = BinaryReader::new(&data[..], ByteOrder::Little);
/// assert_eq!(reader.read_u16().unwrap(), 0x1234);
/// assert_eq!(reader.read_i16().unwrap(), -1);
/// assert_eq!(reader.count(), 4);
/// ```
#[derive(Debug)]
pub struct BinaryReader<R> {
    inner: R,
    order: ByteOrder,
    count: usize,
    position: u64,
}

impl<R: Read> BinaryReader<R> {
    /// Wrap a byte source
    pub fn new(inner: R, order: ByteOrder) -> Self {
        Self {
            inner,
            order,
            count: 0,
            position: 0,
        }
    }

    /// Byte order used by this reader
    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// Bytes consumed since the counter was last reset
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Reset the consumed-bytes counter to zero
    #[inline]
    pub fn reset_count(&mut self) {
        self.count = 0;
    }

    /// Total bytes consumed since the reader was created
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Read exactly `N` bytes or report how many were available
    fn read_array<const N: usize>(&mut self) -> BinaryResult<[u8; N]> {
        let mut buf = [0u8; N];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    fn fill(&mut self, buf: &mut [u8]) -> BinaryResult<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    self.advance(filled);
                    return Err(BinaryError::InsufficientData {
                        expected: buf.len(),
                        available: filled,
                    });
                },
                Ok(n) => filled += n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {},
                Err(err) => return Err(BinaryError::Io(err)),
            }
        }
        self.advance(filled);
        Ok(())
    }

    #[inline]
    fn advance(&mut self, n: usize) {
        self.count += n;
        self.position += n as u64;
    }

    /// Read a single byte
    pub fn read_byte(&mut self) -> BinaryResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Read an unsigned 16-bit integer
    pub fn read_u16(&mut self) -> BinaryResult<u16> {
        let buf = self.read_array::<2>()?;
        Ok(match self.order {
            ByteOrder::Little => U16::<LE>::read_from_bytes(&buf[..]).map_or(0, |v| v.get()),
            ByteOrder::Big => U16::<BE>::read_from_bytes(&buf[..]).map_or(0, |v| v.get()),
        })
    }

    /// Read a signed 16-bit integer
    pub fn read_i16(&mut self) -> BinaryResult<i16> {
        let buf = self.read_array::<2>()?;
        Ok(match self.order {
            ByteOrder::Little => I16::<LE>::read_from_bytes(&buf[..]).map_or(0, |v| v.get()),
            ByteOrder::Big => I16::<BE>::read_from_bytes(&buf[..]).map_or(0, |v| v.get()),
        })
    }

    /// Read an unsigned 32-bit integer
    pub fn read_u32(&mut self) -> BinaryResult<u32> {
        let buf = self.read_array::<4>()?;
        Ok(match self.order {
            ByteOrder::Little => U32::<LE>::read_from_bytes(&buf[..]).map_or(0, |v| v.get()),
            ByteOrder::Big => U32::<BE>::read_from_bytes(&buf[..]).map_or(0, |v| v.get()),
        })
    }

    /// Read a signed 32-bit integer
    pub fn read_i32(&mut self) -> BinaryResult<i32> {
        let buf = self.read_array::<4>()?;
        Ok(match self.order {
            ByteOrder::Little => I32::<LE>::read_from_bytes(&buf[..]).map_or(0, |v| v.get()),
            ByteOrder::Big => I32::<BE>::read_from_bytes(&buf[..]).map_or(0, |v| v.get()),
        })
    }

    /// Read a block of `len` bytes
    ///
    /// The buffer grows with the data actually read, so a corrupt length
    /// cannot force a large allocation up front.
    pub fn read_bytes(&mut self, len: usize) -> BinaryResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(len.min(64 * 1024));
        let read = self
            .inner
            .by_ref()
            .take(len as u64)
            .read_to_end(&mut buf)
            .map_err(BinaryError::Io)?;
        self.advance(read);
        if read < len {
            return Err(BinaryError::InsufficientData {
                expected: len,
                available: read,
            });
        }
        Ok(buf)
    }

    /// Discard `len` bytes
    pub fn skip(&mut self, len: usize) -> BinaryResult<()> {
        let skipped = io::copy(&mut self.inner.by_ref().take(len as u64), &mut io::sink())
            .map_err(BinaryError::Io)? as usize;
        self.advance(skipped);
        if skipped < len {
            return Err(BinaryError::InsufficientData {
                expected: len,
                available: skipped,
            });
        }
        Ok(())
    }
}
