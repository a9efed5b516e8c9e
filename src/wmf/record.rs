//! Record buffer builder for the WMF encoder
//!
//! A record is `size (u32 words) | function (u16) | fields...`, always an even
//! number of bytes. The builder is created with the exact payload length so the
//! size field is known before any field is written.

use super::constants::RECORD_HEADER_LEN;
use crate::common::error::{Error, Result};

/// Length of a variable payload once padded to a 16-bit boundary
#[inline]
pub const fn padded_len(len: usize) -> usize {
    len + (len & 1)
}

/// Little-endian writer for a single pre-sized record
#[derive(Debug)]
pub struct RecordBuilder {
    buf: Vec<u8>,
    len: usize,
}

impl RecordBuilder {
    /// Start a record whose fields occupy `payload_len` bytes
    ///
    /// `payload_len` must already include any padding byte.
    pub fn new(function: u16, payload_len: usize) -> Result<Self> {
        debug_assert!(payload_len % 2 == 0, "record payload must be word aligned");
        let len = RECORD_HEADER_LEN + payload_len;
        let words = u32::try_from(len / 2).map_err(|_| {
            Error::InvalidArgument(format!(
                "record 0x{function:04X} payload of {payload_len} bytes is too large"
            ))
        })?;

        let mut builder = Self {
            buf: Vec::with_capacity(len),
            len,
        };
        builder.u32(words).u16(function);
        Ok(builder)
    }

    pub fn u16(&mut self, value: u16) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn i16(&mut self, value: i16) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn u32(&mut self, value: u32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    pub fn bytes(&mut self, data: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(data);
        self
    }

    /// Write `data` followed by a zero byte when its length is odd
    pub fn padded(&mut self, data: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(data);
        if data.len() % 2 == 1 {
            self.buf.push(0);
        }
        self
    }

    pub fn finish(self) -> Vec<u8> {
        debug_assert_eq!(self.buf.len(), self.len, "record length mismatch");
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_header() {
        let mut builder = RecordBuilder::new(0x0213, 4).unwrap();
        builder.i16(-1).i16(2);
        let record = builder.finish();
        assert_eq!(record, vec![5, 0, 0, 0, 0x13, 0x02, 0xFF, 0xFF, 2, 0]);
    }

    #[test]
    fn test_odd_payload_padded() {
        assert_eq!(padded_len(3), 4);
        assert_eq!(padded_len(4), 4);

        let mut builder = RecordBuilder::new(0x0626, padded_len(3)).unwrap();
        builder.padded(b"abc");
        let record = builder.finish();
        assert_eq!(record.len(), 10);
        assert_eq!(u32::from_le_bytes([record[0], record[1], record[2], record[3]]), 5);
        assert_eq!(record[9], 0);
    }
}
