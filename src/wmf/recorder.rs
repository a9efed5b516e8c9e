//! Operation capture
//!
//! [`OperationRecorder`] is a [`Gdi`] sink that stores every call as an
//! [`Operation`] value. Objects are referred to by the slot the recorder gave
//! them, so two captures of the same drawing compare equal even when the files
//! they came from numbered objects differently.

use super::device_context::DeviceContext;
use super::gdi::{Area, EtoOptions, Gdi, Point, Rect, RegionComplexity, TextAlign};
use super::object::{
    Brush, Font, GdiObject, ObjectKind, ObjectTable, Palette, PatternBrush, Pen, Region,
};
use crate::common::error::{Error, Result};
use bytes::Bytes;

/// One call made on a [`Gdi`] sink
///
/// `object`, `region`, `brush` and `palette` fields hold recorder slot ids.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operation {
    PlaceableHeader { bounds: Rect, dpi: u16 },
    Header,
    Footer,

    CreateBrushIndirect { object: usize, style: u16, color: u32, hatch: i16 },
    CreatePenIndirect { object: usize, style: u16, width: i16, color: u32 },
    CreateFontIndirect { object: usize, font: Font },
    CreatePalette { object: usize, version: u16, entries: Vec<u32> },
    CreatePatternBrush { object: usize, image: Bytes },
    DibCreatePatternBrush { object: usize, image: Bytes, usage: u16 },
    CreateRectRgn { object: usize, rect: Rect },
    DeleteObject { object: usize },
    SelectObject { object: usize },

    SelectPalette { palette: usize, background: bool },
    RealizePalette,
    SetPaletteEntries { palette: usize, start: u16, entries: Vec<u32> },
    AnimatePalette { palette: usize, start: u16, entries: Vec<u32> },
    ResizePalette { palette: usize, entries: u16 },

    SetBkColor(u32),
    SetBkMode(i16),
    SetMapMode(i16),
    SetMapperFlags(u32),
    SetRop2(i16),
    SetRelAbs(i16),
    SetPolyFillMode(i16),
    SetStretchBltMode(i16),
    SetTextAlign(TextAlign),
    SetTextColor(u32),
    SetTextCharacterExtra(i16),
    SetTextJustification { break_extra: i16, break_count: i16 },
    SetLayout(u32),
    SaveDc,
    RestoreDc(i16),

    SetWindowOrgEx { x: i16, y: i16 },
    SetWindowExtEx { width: i16, height: i16 },
    OffsetWindowOrgEx { dx: i16, dy: i16 },
    ScaleWindowExtEx { x: i16, xd: i16, y: i16, yd: i16 },
    SetViewportOrgEx { x: i16, y: i16 },
    SetViewportExtEx { width: i16, height: i16 },
    OffsetViewportOrgEx { dx: i16, dy: i16 },
    ScaleViewportExtEx { x: i16, xd: i16, y: i16, yd: i16 },
    MoveToEx { x: i16, y: i16 },

    OffsetClipRgn { dx: i16, dy: i16 },
    SelectClipRgn { region: Option<usize> },
    ExcludeClipRect(Rect),
    IntersectClipRect(Rect),

    LineTo { x: i16, y: i16 },
    Arc { rect: Rect, start: Point, end: Point },
    Chord { rect: Rect, start: Point, end: Point },
    Pie { rect: Rect, start: Point, end: Point },
    Ellipse(Rect),
    Rectangle(Rect),
    RoundRect { rect: Rect, width: i16, height: i16 },
    Polygon(Vec<Point>),
    Polyline(Vec<Point>),
    PolyPolygon(Vec<Vec<Point>>),
    SetPixel { x: i16, y: i16, color: u32 },
    FloodFill { x: i16, y: i16, color: u32 },
    ExtFloodFill { x: i16, y: i16, color: u32, mode: u16 },
    PatBlt { area: Area, rop: u32 },

    FillRgn { region: usize, brush: usize },
    FrameRgn { region: usize, brush: usize, width: i16, height: i16 },
    PaintRgn { region: usize },
    InvertRgn { region: usize },

    TextOut { x: i16, y: i16, text: Bytes },
    ExtTextOut {
        x: i16,
        y: i16,
        options: EtoOptions,
        rect: Option<Rect>,
        text: Bytes,
        dx: Option<Vec<i16>>,
    },

    BitBlt { dest: Area, src: Point, rop: u32, image: Bytes },
    StretchBlt { dest: Area, src: Area, rop: u32, image: Bytes },
    DibBitBlt { dest: Area, src: Point, rop: u32, image: Bytes },
    DibStretchBlt { dest: Area, src: Area, rop: u32, image: Bytes },
    StretchDibBits { dest: Area, src: Area, usage: u16, rop: u32, image: Bytes },
    SetDibBitsToDevice {
        dest: Area,
        src: Point,
        start_scan: u16,
        scan_count: u16,
        usage: u16,
        image: Bytes,
    },

    Escape(Bytes),
}

/// [`Gdi`] sink that captures calls as [`Operation`] values
#[derive(Debug, Clone)]
pub struct OperationRecorder {
    operations: Vec<Operation>,
    objects: ObjectTable,
    dc: DeviceContext,
}

impl Default for OperationRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationRecorder {
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
            objects: ObjectTable::growable(),
            dc: DeviceContext::new(),
        }
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn into_operations(self) -> Vec<Operation> {
        self.operations
    }

    /// Live object in the given recorder slot
    pub fn object(&self, id: usize) -> Option<&GdiObject> {
        self.objects.get(id)
    }

    pub fn device_context(&self) -> &DeviceContext {
        &self.dc
    }

    fn push(&mut self, operation: Operation) -> Result<()> {
        self.operations.push(operation);
        Ok(())
    }

    fn create(
        &mut self,
        kind: ObjectKind,
        operation: impl FnOnce(usize) -> Operation,
    ) -> Result<GdiObject> {
        let object = self.objects.create(kind)?;
        self.operations.push(operation(object.id()));
        Ok(object)
    }

    fn id(&self, object: &GdiObject) -> Result<usize> {
        if self.objects.contains(object.id()) {
            Ok(object.id())
        } else {
            Err(Error::InvalidArgument(format!(
                "object {} is not live in this recorder",
                object.id()
            )))
        }
    }
}

impl Gdi for OperationRecorder {
    fn placeable_header(&mut self, bounds: Rect, dpi: u16) -> Result<()> {
        self.push(Operation::PlaceableHeader { bounds, dpi })
    }

    fn header(&mut self) -> Result<()> {
        self.push(Operation::Header)
    }

    fn footer(&mut self) -> Result<()> {
        self.push(Operation::Footer)
    }

    fn create_brush_indirect(&mut self, style: u16, color: u32, hatch: i16) -> Result<GdiObject> {
        let kind = ObjectKind::Brush(Brush { style, color, hatch });
        self.create(kind, |object| Operation::CreateBrushIndirect {
            object,
            style,
            color,
            hatch,
        })
    }

    fn create_pen_indirect(&mut self, style: u16, width: i16, color: u32) -> Result<GdiObject> {
        let kind = ObjectKind::Pen(Pen { style, width, color });
        self.create(kind, |object| Operation::CreatePenIndirect {
            object,
            style,
            width,
            color,
        })
    }

    fn create_font_indirect(&mut self, font: Font) -> Result<GdiObject> {
        let captured = font.clone();
        self.create(ObjectKind::Font(font), |object| Operation::CreateFontIndirect {
            object,
            font: captured,
        })
    }

    fn create_palette(&mut self, version: u16, entries: &[u32]) -> Result<GdiObject> {
        let kind = ObjectKind::Palette(Palette {
            version,
            entries: entries.to_vec(),
        });
        self.create(kind, |object| Operation::CreatePalette {
            object,
            version,
            entries: entries.to_vec(),
        })
    }

    fn create_pattern_brush(&mut self, image: &[u8]) -> Result<GdiObject> {
        let image = Bytes::copy_from_slice(image);
        let kind = ObjectKind::PatternBrush(PatternBrush {
            image: image.clone(),
            usage: None,
        });
        self.create(kind, |object| Operation::CreatePatternBrush { object, image })
    }

    fn dib_create_pattern_brush(&mut self, image: &[u8], usage: u16) -> Result<GdiObject> {
        let image = Bytes::copy_from_slice(image);
        let kind = ObjectKind::PatternBrush(PatternBrush {
            image: image.clone(),
            usage: Some(usage),
        });
        self.create(kind, |object| Operation::DibCreatePatternBrush {
            object,
            image,
            usage,
        })
    }

    fn create_rect_rgn(&mut self, rect: Rect) -> Result<GdiObject> {
        let kind = ObjectKind::Region(Region { bounds: rect });
        self.create(kind, |object| Operation::CreateRectRgn { object, rect })
    }

    fn delete_object(&mut self, object: &GdiObject) -> Result<()> {
        let id = self.id(object)?;
        self.objects.remove(id);
        self.dc.release(object);
        self.push(Operation::DeleteObject { object: id })
    }

    fn select_object(&mut self, object: &GdiObject) -> Result<()> {
        let id = self.id(object)?;
        self.dc.select(object);
        self.push(Operation::SelectObject { object: id })
    }

    fn select_palette(&mut self, palette: &GdiObject, background: bool) -> Result<()> {
        let id = self.id(palette)?;
        self.dc.select_palette(palette);
        self.push(Operation::SelectPalette {
            palette: id,
            background,
        })
    }

    fn realize_palette(&mut self) -> Result<()> {
        self.push(Operation::RealizePalette)
    }

    fn set_palette_entries(
        &mut self,
        palette: &GdiObject,
        start: u16,
        entries: &[u32],
    ) -> Result<()> {
        let palette = self.id(palette)?;
        self.push(Operation::SetPaletteEntries {
            palette,
            start,
            entries: entries.to_vec(),
        })
    }

    fn animate_palette(&mut self, palette: &GdiObject, start: u16, entries: &[u32]) -> Result<()> {
        let palette = self.id(palette)?;
        self.push(Operation::AnimatePalette {
            palette,
            start,
            entries: entries.to_vec(),
        })
    }

    fn resize_palette(&mut self, palette: &GdiObject, entries: u16) -> Result<()> {
        let palette = self.id(palette)?;
        self.push(Operation::ResizePalette { palette, entries })
    }

    fn set_bk_color(&mut self, color: u32) -> Result<()> {
        self.push(Operation::SetBkColor(color))
    }

    fn set_bk_mode(&mut self, mode: i16) -> Result<()> {
        self.push(Operation::SetBkMode(mode))
    }

    fn set_map_mode(&mut self, mode: i16) -> Result<()> {
        self.push(Operation::SetMapMode(mode))
    }

    fn set_mapper_flags(&mut self, flags: u32) -> Result<()> {
        self.push(Operation::SetMapperFlags(flags))
    }

    fn set_rop2(&mut self, mode: i16) -> Result<()> {
        self.push(Operation::SetRop2(mode))
    }

    fn set_rel_abs(&mut self, mode: i16) -> Result<()> {
        self.push(Operation::SetRelAbs(mode))
    }

    fn set_poly_fill_mode(&mut self, mode: i16) -> Result<()> {
        self.push(Operation::SetPolyFillMode(mode))
    }

    fn set_stretch_blt_mode(&mut self, mode: i16) -> Result<()> {
        self.push(Operation::SetStretchBltMode(mode))
    }

    fn set_text_align(&mut self, align: TextAlign) -> Result<()> {
        self.dc.set_text_align(align);
        self.push(Operation::SetTextAlign(align))
    }

    fn set_text_color(&mut self, color: u32) -> Result<()> {
        self.push(Operation::SetTextColor(color))
    }

    fn set_text_character_extra(&mut self, extra: i16) -> Result<()> {
        self.push(Operation::SetTextCharacterExtra(extra))
    }

    fn set_text_justification(&mut self, break_extra: i16, break_count: i16) -> Result<()> {
        self.push(Operation::SetTextJustification {
            break_extra,
            break_count,
        })
    }

    fn set_layout(&mut self, layout: u32) -> Result<()> {
        self.push(Operation::SetLayout(layout))
    }

    fn save_dc(&mut self) -> Result<()> {
        self.push(Operation::SaveDc)
    }

    fn restore_dc(&mut self, saved: i16) -> Result<()> {
        self.push(Operation::RestoreDc(saved))
    }

    fn set_window_org_ex(&mut self, x: i16, y: i16) -> Result<(i32, i32)> {
        self.push(Operation::SetWindowOrgEx { x, y })?;
        Ok(self.dc.set_window_org(x, y))
    }

    fn set_window_ext_ex(&mut self, width: i16, height: i16) -> Result<(i32, i32)> {
        self.push(Operation::SetWindowExtEx { width, height })?;
        Ok(self.dc.set_window_ext(width, height))
    }

    fn offset_window_org_ex(&mut self, dx: i16, dy: i16) -> Result<(i32, i32)> {
        self.push(Operation::OffsetWindowOrgEx { dx, dy })?;
        Ok(self.dc.offset_window_org(dx, dy))
    }

    fn scale_window_ext_ex(&mut self, x: i16, xd: i16, y: i16, yd: i16) -> Result<(i32, i32)> {
        self.push(Operation::ScaleWindowExtEx { x, xd, y, yd })?;
        Ok(self.dc.scale_window_ext(x, xd, y, yd))
    }

    fn set_viewport_org_ex(&mut self, x: i16, y: i16) -> Result<(i32, i32)> {
        self.push(Operation::SetViewportOrgEx { x, y })?;
        Ok(self.dc.set_viewport_org(x, y))
    }

    fn set_viewport_ext_ex(&mut self, width: i16, height: i16) -> Result<(i32, i32)> {
        self.push(Operation::SetViewportExtEx { width, height })?;
        Ok(self.dc.set_viewport_ext(width, height))
    }

    fn offset_viewport_org_ex(&mut self, dx: i16, dy: i16) -> Result<(i32, i32)> {
        self.push(Operation::OffsetViewportOrgEx { dx, dy })?;
        Ok(self.dc.offset_viewport_org(dx, dy))
    }

    fn scale_viewport_ext_ex(&mut self, x: i16, xd: i16, y: i16, yd: i16) -> Result<(i32, i32)> {
        self.push(Operation::ScaleViewportExtEx { x, xd, y, yd })?;
        Ok(self.dc.scale_viewport_ext(x, xd, y, yd))
    }

    fn move_to_ex(&mut self, x: i16, y: i16) -> Result<(i32, i32)> {
        self.push(Operation::MoveToEx { x, y })?;
        Ok(self.dc.move_to(x, y))
    }

    fn offset_clip_rgn(&mut self, dx: i16, dy: i16) -> Result<()> {
        self.push(Operation::OffsetClipRgn { dx, dy })
    }

    fn select_clip_rgn(&mut self, region: Option<&GdiObject>) -> Result<()> {
        let region = region.map(|r| self.id(r)).transpose()?;
        self.push(Operation::SelectClipRgn { region })
    }

    fn exclude_clip_rect(&mut self, rect: Rect) -> Result<RegionComplexity> {
        self.push(Operation::ExcludeClipRect(rect))?;
        Ok(RegionComplexity::Complex)
    }

    fn intersect_clip_rect(&mut self, rect: Rect) -> Result<RegionComplexity> {
        self.push(Operation::IntersectClipRect(rect))?;
        Ok(RegionComplexity::Complex)
    }

    fn line_to(&mut self, x: i16, y: i16) -> Result<()> {
        self.dc.line_to(x, y);
        self.push(Operation::LineTo { x, y })
    }

    fn arc(&mut self, rect: Rect, start: Point, end: Point) -> Result<()> {
        self.push(Operation::Arc { rect, start, end })
    }

    fn chord(&mut self, rect: Rect, start: Point, end: Point) -> Result<()> {
        self.push(Operation::Chord { rect, start, end })
    }

    fn pie(&mut self, rect: Rect, start: Point, end: Point) -> Result<()> {
        self.push(Operation::Pie { rect, start, end })
    }

    fn ellipse(&mut self, rect: Rect) -> Result<()> {
        self.push(Operation::Ellipse(rect))
    }

    fn rectangle(&mut self, rect: Rect) -> Result<()> {
        self.push(Operation::Rectangle(rect))
    }

    fn round_rect(&mut self, rect: Rect, width: i16, height: i16) -> Result<()> {
        self.push(Operation::RoundRect {
            rect,
            width,
            height,
        })
    }

    fn polygon(&mut self, points: &[Point]) -> Result<()> {
        self.push(Operation::Polygon(points.to_vec()))
    }

    fn polyline(&mut self, points: &[Point]) -> Result<()> {
        self.push(Operation::Polyline(points.to_vec()))
    }

    fn poly_polygon(&mut self, polygons: &[Vec<Point>]) -> Result<()> {
        self.push(Operation::PolyPolygon(polygons.to_vec()))
    }

    fn set_pixel(&mut self, x: i16, y: i16, color: u32) -> Result<()> {
        self.push(Operation::SetPixel { x, y, color })
    }

    fn flood_fill(&mut self, x: i16, y: i16, color: u32) -> Result<()> {
        self.push(Operation::FloodFill { x, y, color })
    }

    fn ext_flood_fill(&mut self, x: i16, y: i16, color: u32, mode: u16) -> Result<()> {
        self.push(Operation::ExtFloodFill { x, y, color, mode })
    }

    fn pat_blt(&mut self, area: Area, rop: u32) -> Result<()> {
        self.push(Operation::PatBlt { area, rop })
    }

    fn fill_rgn(&mut self, region: &GdiObject, brush: &GdiObject) -> Result<()> {
        let (region, brush) = (self.id(region)?, self.id(brush)?);
        self.push(Operation::FillRgn { region, brush })
    }

    fn frame_rgn(
        &mut self,
        region: &GdiObject,
        brush: &GdiObject,
        width: i16,
        height: i16,
    ) -> Result<()> {
        let (region, brush) = (self.id(region)?, self.id(brush)?);
        self.push(Operation::FrameRgn {
            region,
            brush,
            width,
            height,
        })
    }

    fn paint_rgn(&mut self, region: &GdiObject) -> Result<()> {
        let region = self.id(region)?;
        self.push(Operation::PaintRgn { region })
    }

    fn invert_rgn(&mut self, region: &GdiObject) -> Result<()> {
        let region = self.id(region)?;
        self.push(Operation::InvertRgn { region })
    }

    fn text_out(&mut self, x: i16, y: i16, text: &[u8]) -> Result<()> {
        self.push(Operation::TextOut {
            x,
            y,
            text: Bytes::copy_from_slice(text),
        })
    }

    fn ext_text_out(
        &mut self,
        x: i16,
        y: i16,
        options: EtoOptions,
        rect: Option<Rect>,
        text: &[u8],
        dx: Option<&[i16]>,
    ) -> Result<()> {
        self.dc.ext_text_out(x, y, dx);
        self.push(Operation::ExtTextOut {
            x,
            y,
            options,
            rect,
            text: Bytes::copy_from_slice(text),
            dx: dx.filter(|dx| !dx.is_empty()).map(<[i16]>::to_vec),
        })
    }

    fn bit_blt(&mut self, dest: Area, src: Point, rop: u32, image: &[u8]) -> Result<()> {
        self.push(Operation::BitBlt {
            dest,
            src,
            rop,
            image: Bytes::copy_from_slice(image),
        })
    }

    fn stretch_blt(&mut self, dest: Area, src: Area, rop: u32, image: &[u8]) -> Result<()> {
        self.push(Operation::StretchBlt {
            dest,
            src,
            rop,
            image: Bytes::copy_from_slice(image),
        })
    }

    fn dib_bit_blt(&mut self, dest: Area, src: Point, rop: u32, image: &[u8]) -> Result<()> {
        self.push(Operation::DibBitBlt {
            dest,
            src,
            rop,
            image: Bytes::copy_from_slice(image),
        })
    }

    fn dib_stretch_blt(&mut self, dest: Area, src: Area, rop: u32, image: &[u8]) -> Result<()> {
        self.push(Operation::DibStretchBlt {
            dest,
            src,
            rop,
            image: Bytes::copy_from_slice(image),
        })
    }

    fn stretch_dib_bits(
        &mut self,
        dest: Area,
        src: Area,
        usage: u16,
        rop: u32,
        image: &[u8],
    ) -> Result<()> {
        self.push(Operation::StretchDibBits {
            dest,
            src,
            usage,
            rop,
            image: Bytes::copy_from_slice(image),
        })
    }

    fn set_dib_bits_to_device(
        &mut self,
        dest: Area,
        src: Point,
        start_scan: u16,
        scan_count: u16,
        usage: u16,
        image: &[u8],
    ) -> Result<()> {
        self.push(Operation::SetDibBitsToDevice {
            dest,
            src,
            start_scan,
            scan_count,
            usage,
            image: Bytes::copy_from_slice(image),
        })
    }

    fn escape(&mut self, data: &[u8]) -> Result<()> {
        self.push(Operation::Escape(Bytes::copy_from_slice(data)))
    }
}
