//! GDI object model and object table
//!
//! Resources (brushes, pens, fonts, palettes, pattern brushes, regions) are
//! created by `Create*` records, referenced by slot index from later records,
//! and destroyed by `DeleteObject`. Objects are never mutated after creation.
//!
//! The table is an arena of stable integer handles: a new object always takes
//! the first unused slot. The decoder sizes the table from the header's object
//! count; the encoder grows it on demand.

use super::constants::{brush, pen};
use super::gdi::Rect;
use crate::common::error::{Error, Result};
use bytes::Bytes;

/// Logical brush
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Brush {
    pub style: u16,
    /// COLORREF (0x00BBGGRR)
    pub color: u32,
    pub hatch: i16,
}

impl Brush {
    /// Solid white brush selected into a fresh device context
    pub const DEFAULT: Brush = Brush {
        style: brush::BS_SOLID,
        color: 0x00FF_FFFF,
        hatch: 0,
    };
}

impl Default for Brush {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Logical pen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pen {
    pub style: u16,
    pub width: i16,
    /// COLORREF (0x00BBGGRR)
    pub color: u32,
}

impl Pen {
    /// Solid black one-unit pen selected into a fresh device context
    pub const DEFAULT: Pen = Pen {
        style: pen::PS_SOLID,
        width: 1,
        color: 0x0000_0000,
    };
}

impl Default for Pen {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Logical font
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Font {
    pub height: i16,
    pub width: i16,
    /// Angle of the baseline in tenths of degrees
    pub escapement: i16,
    /// Angle of each character in tenths of degrees
    pub orientation: i16,
    pub weight: i16,
    pub italic: bool,
    pub underline: bool,
    pub strike_out: bool,
    pub charset: u8,
    pub out_precision: u8,
    pub clip_precision: u8,
    pub quality: u8,
    pub pitch_and_family: u8,
    /// Face name decoded with the codepage of `charset`
    pub face_name: String,
}

impl Font {
    /// Vertical fonts are named with a leading `@`
    pub fn is_vertical(&self) -> bool {
        self.face_name.starts_with('@')
    }
}

/// Logical palette
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Palette {
    pub version: u16,
    /// Packed PaletteEntry values (red, green, blue, flags from low byte up)
    pub entries: Vec<u32>,
}

/// Brush filled with a bitmap pattern
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatternBrush {
    /// Bitmap payload, opaque to the codec
    pub image: Bytes,
    /// Color usage of a DIB pattern brush, `None` for a Bitmap16 pattern
    pub usage: Option<u16>,
}

/// Axis-aligned rectangular region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    pub bounds: Rect,
}

/// Payload of a GDI object
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectKind {
    Brush(Brush),
    Pen(Pen),
    Font(Font),
    Palette(Palette),
    PatternBrush(PatternBrush),
    Region(Region),
}

impl ObjectKind {
    /// Human-readable kind name used in error messages
    pub const fn name(&self) -> &'static str {
        match self {
            ObjectKind::Brush(_) => "brush",
            ObjectKind::Pen(_) => "pen",
            ObjectKind::Font(_) => "font",
            ObjectKind::Palette(_) => "palette",
            ObjectKind::PatternBrush(_) => "pattern brush",
            ObjectKind::Region(_) => "region",
        }
    }
}

/// A GDI object together with the slot it occupies in its owner's table
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GdiObject {
    id: usize,
    kind: ObjectKind,
}

impl GdiObject {
    pub fn new(id: usize, kind: ObjectKind) -> Self {
        Self { id, kind }
    }

    /// Slot index in the owning object table
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    /// Whether selecting this object replaces the current brush
    pub fn is_brush(&self) -> bool {
        matches!(self.kind, ObjectKind::Brush(_) | ObjectKind::PatternBrush(_))
    }

    pub fn as_pen(&self) -> Option<&Pen> {
        match &self.kind {
            ObjectKind::Pen(pen) => Some(pen),
            _ => None,
        }
    }

    pub fn as_font(&self) -> Option<&Font> {
        match &self.kind {
            ObjectKind::Font(font) => Some(font),
            _ => None,
        }
    }

    pub fn as_palette(&self) -> Option<&Palette> {
        match &self.kind {
            ObjectKind::Palette(palette) => Some(palette),
            _ => None,
        }
    }

    pub fn as_region(&self) -> Option<&Region> {
        match &self.kind {
            ObjectKind::Region(region) => Some(region),
            _ => None,
        }
    }
}

/// GDI object table
///
/// Manages the slots referenced by index from metafile records. A slot holds
/// at most one live object; deletion empties it for reuse.
#[derive(Debug, Clone, Default)]
pub struct ObjectTable {
    slots: Vec<Option<GdiObject>>,
    fixed: bool,
}

impl ObjectTable {
    /// Table with a fixed number of slots, as declared by a metafile header
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            fixed: true,
        }
    }

    /// Table that grows whenever every slot is taken
    pub fn growable() -> Self {
        Self {
            slots: Vec::new(),
            fixed: false,
        }
    }

    /// First unused slot index
    pub fn next_free(&self) -> Result<usize> {
        match self.slots.iter().position(Option::is_none) {
            Some(index) => Ok(index),
            None if !self.fixed => Ok(self.slots.len()),
            None => Err(Error::ObjectTableFull {
                capacity: self.slots.len(),
            }),
        }
    }

    /// Create an object in the first unused slot and return it
    pub fn create(&mut self, kind: ObjectKind) -> Result<GdiObject> {
        let id = self.next_free()?;
        let object = GdiObject::new(id, kind);
        self.put(id, object.clone())?;
        Ok(object)
    }

    /// Store an object in a specific slot
    pub fn put(&mut self, index: usize, object: GdiObject) -> Result<()> {
        if index >= self.slots.len() {
            if self.fixed {
                return Err(Error::ObjectTableFull {
                    capacity: self.slots.len(),
                });
            }
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(object);
        Ok(())
    }

    /// Get object by slot index
    pub fn get(&self, index: usize) -> Option<&GdiObject> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Empty a slot and return the object it held
    pub fn remove(&mut self, index: usize) -> Option<GdiObject> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Check if a slot holds a live object
    pub fn contains(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Number of slots ever used (fixed tables report their capacity)
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of live objects
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}
