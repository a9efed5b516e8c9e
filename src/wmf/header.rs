//! Placeable and standard metafile headers
//!
//! Both headers are fixed-layout little-endian structures. Serialization goes
//! through zerocopy views; decoding reads field by field through the
//! [`BinaryReader`] so the configured byte order is honored.

use super::constants::{HEADER_SIZE_WORDS, METAFILE_TYPE, PLACEABLE_KEY, version};
use super::gdi::Rect;
use crate::common::binary::{BinaryReader, BinaryResult};
use crate::common::error::{Error, Result};
use std::io::Read;
use zerocopy::{I16, IntoBytes, LE, U16, U32};
use zerocopy_derive::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// On-disk placeable header (22 bytes)
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
struct RawPlaceableHeader {
    key: U32<LE>,
    handle: I16<LE>,
    left: I16<LE>,
    top: I16<LE>,
    right: I16<LE>,
    bottom: I16<LE>,
    inch: U16<LE>,
    reserved: U32<LE>,
    checksum: U16<LE>,
}

/// On-disk standard header (18 bytes)
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
struct RawHeader {
    file_type: U16<LE>,
    header_size: U16<LE>,
    version: U16<LE>,
    size: U32<LE>,
    num_objects: U16<LE>,
    max_record: U32<LE>,
    num_params: U16<LE>,
}

/// Optional header giving the picture a bounding box and resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaceableHeader {
    pub handle: i16,
    pub bounds: Rect,
    /// Logical units per inch
    pub dpi: u16,
    pub reserved: u32,
    pub checksum: u16,
}

impl PlaceableHeader {
    /// Build a header with a valid checksum
    pub fn new(bounds: Rect, dpi: u16) -> Self {
        let mut header = Self {
            handle: 0,
            bounds,
            dpi,
            reserved: 0,
            checksum: 0,
        };
        header.checksum = header.compute_checksum();
        header
    }

    fn raw(&self) -> RawPlaceableHeader {
        RawPlaceableHeader {
            key: U32::new(PLACEABLE_KEY),
            handle: I16::new(self.handle),
            left: I16::new(self.bounds.left),
            top: I16::new(self.bounds.top),
            right: I16::new(self.bounds.right),
            bottom: I16::new(self.bounds.bottom),
            inch: U16::new(self.dpi),
            reserved: U32::new(self.reserved),
            checksum: U16::new(self.checksum),
        }
    }

    /// XOR of the ten 16-bit words preceding the checksum field
    pub fn compute_checksum(&self) -> u16 {
        let raw = self.raw();
        raw.as_bytes()[..20]
            .chunks_exact(2)
            .fold(0u16, |acc, word| acc ^ u16::from_le_bytes([word[0], word[1]]))
    }

    pub fn is_checksum_valid(&self) -> bool {
        self.checksum == self.compute_checksum()
    }

    /// Read the fields following the key
    pub fn read_fields<R: Read>(reader: &mut BinaryReader<R>) -> BinaryResult<Self> {
        let handle = reader.read_i16()?;
        let left = reader.read_i16()?;
        let top = reader.read_i16()?;
        let right = reader.read_i16()?;
        let bottom = reader.read_i16()?;
        let dpi = reader.read_u16()?;
        let reserved = reader.read_u32()?;
        let checksum = reader.read_u16()?;
        Ok(Self {
            handle,
            bounds: Rect::new(left, top, right, bottom),
            dpi,
            reserved,
            checksum,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.raw().as_bytes().to_vec()
    }
}

/// Standard metafile header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WmfHeader {
    pub file_type: u16,
    /// Header size in words, always 9
    pub header_size: u16,
    pub version: u16,
    /// Total file size in words, headers and EOF record included
    pub size_words: u32,
    pub num_objects: u16,
    /// Largest record in words
    pub max_record_words: u32,
    pub num_params: u16,
}

impl Default for WmfHeader {
    fn default() -> Self {
        Self {
            file_type: METAFILE_TYPE,
            header_size: HEADER_SIZE_WORDS,
            version: version::METAVERSION300,
            size_words: 0,
            num_objects: 0,
            max_record_words: 0,
            num_params: 0,
        }
    }
}

impl WmfHeader {
    /// Read the fields following `mtType` and `mtHeaderSize`
    pub fn read_fields<R: Read>(
        reader: &mut BinaryReader<R>,
        file_type: u16,
        header_size: u16,
    ) -> BinaryResult<Self> {
        Ok(Self {
            file_type,
            header_size,
            version: reader.read_u16()?,
            size_words: reader.read_u32()?,
            num_objects: reader.read_u16()?,
            max_record_words: reader.read_u32()?,
            num_params: reader.read_u16()?,
        })
    }

    /// Reject headers with an unexpected type or size
    pub fn validate(&self) -> Result<()> {
        if self.file_type != METAFILE_TYPE || self.header_size != HEADER_SIZE_WORDS {
            return Err(Error::InvalidHeader {
                file_type: self.file_type,
                header_size: self.header_size,
            });
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        RawHeader {
            file_type: U16::new(self.file_type),
            header_size: U16::new(self.header_size),
            version: U16::new(self.version),
            size: U32::new(self.size_words),
            num_objects: U16::new(self.num_objects),
            max_record: U32::new(self.max_record_words),
            num_params: U16::new(self.num_params),
        }
        .as_bytes()
        .to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::binary::ByteOrder;
    use crate::wmf::constants::{HEADER_LEN, PLACEABLE_HEADER_LEN};

    #[test]
    fn test_placeable_checksum() {
        let header = PlaceableHeader::new(Rect::new(0, 0, 1000, 500), 1440);
        assert!(header.is_checksum_valid());

        let bytes = header.to_bytes();
        assert_eq!(bytes.len(), PLACEABLE_HEADER_LEN);
        assert_eq!(&bytes[..4], &[0xD7, 0xCD, 0xC6, 0x9A]);

        let xor = bytes[..22]
            .chunks_exact(2)
            .fold(0u16, |acc, w| acc ^ u16::from_le_bytes([w[0], w[1]]));
        // XOR over all eleven words cancels to zero when the checksum holds
        assert_eq!(xor, 0);
    }

    #[test]
    fn test_checksum_mismatch_detected() {
        let mut header = PlaceableHeader::new(Rect::new(1, 2, 3, 4), 96);
        header.checksum ^= 1;
        assert!(!header.is_checksum_valid());
    }

    #[test]
    fn test_placeable_read_back() {
        let header = PlaceableHeader::new(Rect::new(-5, -6, 700, 800), 2540);
        let bytes = header.to_bytes();
        let mut reader = BinaryReader::new(&bytes[4..], ByteOrder::Little);
        assert_eq!(PlaceableHeader::read_fields(&mut reader).unwrap(), header);
    }

    #[test]
    fn test_standard_header_layout() {
        let header = WmfHeader {
            size_words: 0x0001_0002,
            num_objects: 7,
            max_record_words: 42,
            ..Default::default()
        };
        let bytes = header.to_bytes();
        assert_eq!(bytes.len(), HEADER_LEN);
        assert_eq!(&bytes[..6], &[1, 0, 9, 0, 0x00, 0x03]);
        assert_eq!(&bytes[6..10], &[2, 0, 1, 0]);
        assert_eq!(&bytes[10..12], &[7, 0]);

        let mut reader = BinaryReader::new(&bytes[4..], ByteOrder::Little);
        let read = WmfHeader::read_fields(&mut reader, 1, 9).unwrap();
        assert_eq!(read, header);
    }

    #[test]
    fn test_header_guard() {
        let bad_type = WmfHeader {
            file_type: 2,
            ..Default::default()
        };
        assert!(matches!(
            bad_type.validate(),
            Err(Error::InvalidHeader { file_type: 2, .. })
        ));
        let bad_size = WmfHeader {
            header_size: 8,
            ..Default::default()
        };
        assert!(bad_size.validate().is_err());
        assert!(WmfHeader::default().validate().is_ok());
    }
}
