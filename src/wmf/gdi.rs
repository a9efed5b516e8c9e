//! Drawing-operation sink
//!
//! [`Gdi`] is the seam between the record decoder and whatever consumes the
//! decoded operations. The decoder calls exactly one method per record, in
//! file order. [`WmfWriter`](super::writer::WmfWriter) implements the same
//! trait to serialize calls back into records, and
//! [`OperationRecorder`](super::recorder::OperationRecorder) captures them as
//! values.
//!
//! Objects handed to a sink are the ones that sink returned from its own
//! `create_*` methods, so implementations are free to number them however
//! they like.

use super::object::{Font, GdiObject};
use crate::common::error::Result;
use bitflags::bitflags;

/// Logical point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i16,
    pub y: i16,
}

impl Point {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

/// Logical rectangle (inclusive-exclusive bounds as stored by GDI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub left: i16,
    pub top: i16,
    pub right: i16,
    pub bottom: i16,
}

impl Rect {
    pub const fn new(left: i16, top: i16, right: i16, bottom: i16) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.right as i32 - self.left as i32
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom as i32 - self.top as i32
    }
}

/// Origin and size of a bit-block transfer rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Area {
    pub x: i16,
    pub y: i16,
    pub width: i16,
    pub height: i16,
}

impl Area {
    pub const fn new(x: i16, y: i16, width: i16, height: i16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Complexity of a clipping region after a clip operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum RegionComplexity {
    Error = 0,
    Null = 1,
    Simple = 2,
    Complex = 3,
}

bitflags! {
    /// Text alignment flags (MS-WMF 2.1.2.3 TextAlignmentMode)
    ///
    /// `CENTER` shares its low bit with `RIGHT`, so test for centering first.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TextAlign: u16 {
        /// Use and advance the current position
        const UPDATECP = 0x0001;
        const RIGHT = 0x0002;
        const CENTER = 0x0006;
        const BOTTOM = 0x0008;
        const BASELINE = 0x0018;
        const RTLREADING = 0x0100;
    }
}

impl TextAlign {
    pub fn is_center(&self) -> bool {
        self.contains(Self::CENTER)
    }

    pub fn is_right(&self) -> bool {
        !self.is_center() && self.contains(Self::RIGHT)
    }

    pub fn updates_cp(&self) -> bool {
        self.contains(Self::UPDATECP)
    }
}

bitflags! {
    /// ExtTextOut options (MS-WMF 2.1.2.2 ExtTextOutOptions)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct EtoOptions: u16 {
        /// Fill the rectangle with the background color
        const OPAQUE = 0x0002;
        /// Clip text to the rectangle
        const CLIPPED = 0x0004;
        const GLYPH_INDEX = 0x0010;
        const RTLREADING = 0x0080;
        const NUMERICSLOCAL = 0x0400;
        const NUMERICSLATIN = 0x0800;
        const PDY = 0x2000;
    }
}

impl EtoOptions {
    /// Whether the record carries a clipping/opaquing rectangle
    pub fn has_rect(&self) -> bool {
        self.intersects(Self::OPAQUE | Self::CLIPPED)
    }
}

/// Sink for WMF drawing operations
///
/// Coordinate-transform methods return the value in effect before the call.
/// Lifecycle hooks default to doing nothing.
pub trait Gdi {
    // Lifecycle

    /// Called when the metafile starts with a placeable header
    fn placeable_header(&mut self, _bounds: Rect, _dpi: u16) -> Result<()> {
        Ok(())
    }

    /// Called once the standard header has been read
    fn header(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called on the EOF record
    fn footer(&mut self) -> Result<()> {
        Ok(())
    }

    // Objects

    fn create_brush_indirect(&mut self, style: u16, color: u32, hatch: i16) -> Result<GdiObject>;
    fn create_pen_indirect(&mut self, style: u16, width: i16, color: u32) -> Result<GdiObject>;
    fn create_font_indirect(&mut self, font: Font) -> Result<GdiObject>;
    fn create_palette(&mut self, version: u16, entries: &[u32]) -> Result<GdiObject>;
    fn create_pattern_brush(&mut self, image: &[u8]) -> Result<GdiObject>;
    fn dib_create_pattern_brush(&mut self, image: &[u8], usage: u16) -> Result<GdiObject>;
    fn create_rect_rgn(&mut self, rect: Rect) -> Result<GdiObject>;
    fn delete_object(&mut self, object: &GdiObject) -> Result<()>;
    fn select_object(&mut self, object: &GdiObject) -> Result<()>;

    // Palette

    fn select_palette(&mut self, palette: &GdiObject, background: bool) -> Result<()>;
    fn realize_palette(&mut self) -> Result<()>;
    fn set_palette_entries(&mut self, palette: &GdiObject, start: u16, entries: &[u32])
    -> Result<()>;
    fn animate_palette(&mut self, palette: &GdiObject, start: u16, entries: &[u32]) -> Result<()>;
    fn resize_palette(&mut self, palette: &GdiObject, entries: u16) -> Result<()>;

    // State

    fn set_bk_color(&mut self, color: u32) -> Result<()>;
    fn set_bk_mode(&mut self, mode: i16) -> Result<()>;
    fn set_map_mode(&mut self, mode: i16) -> Result<()>;
    fn set_mapper_flags(&mut self, flags: u32) -> Result<()>;
    fn set_rop2(&mut self, mode: i16) -> Result<()>;
    fn set_rel_abs(&mut self, mode: i16) -> Result<()>;
    fn set_poly_fill_mode(&mut self, mode: i16) -> Result<()>;
    fn set_stretch_blt_mode(&mut self, mode: i16) -> Result<()>;
    fn set_text_align(&mut self, align: TextAlign) -> Result<()>;
    fn set_text_color(&mut self, color: u32) -> Result<()>;
    fn set_text_character_extra(&mut self, extra: i16) -> Result<()>;
    fn set_text_justification(&mut self, break_extra: i16, break_count: i16) -> Result<()>;
    fn set_layout(&mut self, layout: u32) -> Result<()>;
    fn save_dc(&mut self) -> Result<()>;
    fn restore_dc(&mut self, saved: i16) -> Result<()>;

    // Coordinate transform

    fn set_window_org_ex(&mut self, x: i16, y: i16) -> Result<(i32, i32)>;
    fn set_window_ext_ex(&mut self, width: i16, height: i16) -> Result<(i32, i32)>;
    fn offset_window_org_ex(&mut self, dx: i16, dy: i16) -> Result<(i32, i32)>;
    fn scale_window_ext_ex(&mut self, x: i16, xd: i16, y: i16, yd: i16) -> Result<(i32, i32)>;
    fn set_viewport_org_ex(&mut self, x: i16, y: i16) -> Result<(i32, i32)>;
    fn set_viewport_ext_ex(&mut self, width: i16, height: i16) -> Result<(i32, i32)>;
    fn offset_viewport_org_ex(&mut self, dx: i16, dy: i16) -> Result<(i32, i32)>;
    fn scale_viewport_ext_ex(&mut self, x: i16, xd: i16, y: i16, yd: i16) -> Result<(i32, i32)>;
    fn move_to_ex(&mut self, x: i16, y: i16) -> Result<(i32, i32)>;

    // Clipping

    fn offset_clip_rgn(&mut self, dx: i16, dy: i16) -> Result<()>;
    fn select_clip_rgn(&mut self, region: Option<&GdiObject>) -> Result<()>;
    fn exclude_clip_rect(&mut self, rect: Rect) -> Result<RegionComplexity>;
    fn intersect_clip_rect(&mut self, rect: Rect) -> Result<RegionComplexity>;

    // Drawing

    fn line_to(&mut self, x: i16, y: i16) -> Result<()>;
    fn arc(&mut self, rect: Rect, start: Point, end: Point) -> Result<()>;
    fn chord(&mut self, rect: Rect, start: Point, end: Point) -> Result<()>;
    fn pie(&mut self, rect: Rect, start: Point, end: Point) -> Result<()>;
    fn ellipse(&mut self, rect: Rect) -> Result<()>;
    fn rectangle(&mut self, rect: Rect) -> Result<()>;
    /// `width` and `height` size the ellipse used for the corners
    fn round_rect(&mut self, rect: Rect, width: i16, height: i16) -> Result<()>;
    fn polygon(&mut self, points: &[Point]) -> Result<()>;
    fn polyline(&mut self, points: &[Point]) -> Result<()>;
    fn poly_polygon(&mut self, polygons: &[Vec<Point>]) -> Result<()>;
    fn set_pixel(&mut self, x: i16, y: i16, color: u32) -> Result<()>;
    fn flood_fill(&mut self, x: i16, y: i16, color: u32) -> Result<()>;
    fn ext_flood_fill(&mut self, x: i16, y: i16, color: u32, mode: u16) -> Result<()>;
    fn pat_blt(&mut self, area: Area, rop: u32) -> Result<()>;

    // Regions

    fn fill_rgn(&mut self, region: &GdiObject, brush: &GdiObject) -> Result<()>;
    fn frame_rgn(
        &mut self,
        region: &GdiObject,
        brush: &GdiObject,
        width: i16,
        height: i16,
    ) -> Result<()>;
    fn paint_rgn(&mut self, region: &GdiObject) -> Result<()>;
    fn invert_rgn(&mut self, region: &GdiObject) -> Result<()>;

    // Text

    fn text_out(&mut self, x: i16, y: i16, text: &[u8]) -> Result<()>;
    /// `dx` holds one advance per text byte. An empty run carries no advance
    /// array, so `Some(&[])` is stored and decoded as `None`.
    fn ext_text_out(
        &mut self,
        x: i16,
        y: i16,
        options: EtoOptions,
        rect: Option<Rect>,
        text: &[u8],
        dx: Option<&[i16]>,
    ) -> Result<()>;

    // Bitmaps
    //
    // An empty `image` is the raster-operation-only form of each transfer.

    fn bit_blt(&mut self, dest: Area, src: Point, rop: u32, image: &[u8]) -> Result<()>;
    fn stretch_blt(&mut self, dest: Area, src: Area, rop: u32, image: &[u8]) -> Result<()>;
    fn dib_bit_blt(&mut self, dest: Area, src: Point, rop: u32, image: &[u8]) -> Result<()>;
    fn dib_stretch_blt(&mut self, dest: Area, src: Area, rop: u32, image: &[u8]) -> Result<()>;
    fn stretch_dib_bits(
        &mut self,
        dest: Area,
        src: Area,
        usage: u16,
        rop: u32,
        image: &[u8],
    ) -> Result<()>;
    fn set_dib_bits_to_device(
        &mut self,
        dest: Area,
        src: Point,
        start_scan: u16,
        scan_count: u16,
        usage: u16,
        image: &[u8],
    ) -> Result<()>;

    /// Application-specific data passed through untouched
    fn escape(&mut self, data: &[u8]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_is_not_right() {
        let align = TextAlign::CENTER;
        assert!(align.is_center());
        assert!(!align.is_right());
        assert!(TextAlign::RIGHT.is_right());
        assert!((TextAlign::RIGHT | TextAlign::UPDATECP).updates_cp());
    }

    #[test]
    fn test_unknown_align_bits_retained() {
        let align = TextAlign::from_bits_retain(0x8006);
        assert_eq!(align.bits(), 0x8006);
        assert!(align.is_center());
    }

    #[test]
    fn test_eto_rect_presence() {
        assert!(EtoOptions::OPAQUE.has_rect());
        assert!(EtoOptions::CLIPPED.has_rect());
        assert!(!(EtoOptions::GLYPH_INDEX | EtoOptions::PDY).has_rect());
    }

    #[test]
    fn test_rect_dimensions() {
        let rect = Rect::new(-10, 5, 20, 45);
        assert_eq!(rect.width(), 30);
        assert_eq!(rect.height(), 40);
    }
}
