//! WMF record encoder
//!
//! [`WmfWriter`] implements [`Gdi`] by appending one little-endian record per
//! call. It keeps its own object table and device context so objects it hands
//! out can be selected and deleted, and so state-changing calls leave the
//! same trail the decoder would. Header totals (file size, object count,
//! largest record) are only computed when the metafile is written.
//!
//! # Examples
//!
//! ```
//! use wmf_codec::wmf::{Gdi, Rect, WmfWriter};
//!
//! let mut writer = WmfWriter::new();
//! writer.placeable_header(Rect::new(0, 0, 200, 100), 96)?;
//! let pen = writer.create_pen_indirect(0, 1, 0x0000FF)?;
//! writer.select_object(&pen)?;
//! writer.move_to_ex(0, 0)?;
//! writer.line_to(200, 100)?;
//!
//! let bytes = writer.to_bytes()?;
//! assert_eq!(&bytes[..4], &[0xD7, 0xCD, 0xC6, 0x9A]);
//! # Ok::<(), wmf_codec::common::Error>(())
//! ```

use super::constants::{
    HEADER_LEN, NO_REGION, REGION_OBJECT_TYPE, brush::BS_DIBPATTERN, record, version,
};
use super::device_context::DeviceContext;
use super::gdi::{Area, EtoOptions, Gdi, Point, Rect, RegionComplexity, TextAlign};
use super::header::{PlaceableHeader, WmfHeader};
use super::object::{
    Brush, Font, GdiObject, ObjectKind, ObjectTable, Palette, PatternBrush, Pen, Region,
};
use super::record::{RecordBuilder, padded_len};
use crate::common::encoding::encode_charset_prefix;
use crate::common::error::{Error, Result};
use bytes::Bytes;
use std::io::Write;
use tracing::{debug, trace};

/// Face name bytes written before the terminating NUL
const FACE_NAME_MAX: usize = 31;

/// Shortest bitmap whose padded record is longer than the bitmap-less form
/// of BitBlt, StretchBlt and DibStretchBlt, which is recognised by size alone
const MIN_BITMAP_LEN: usize = 3;

/// Encoder configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterOptions {
    /// Value of the header's version field
    pub version: u16,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            version: version::METAVERSION300,
        }
    }
}

/// WMF encoder
#[derive(Debug, Clone)]
pub struct WmfWriter {
    options: WriterOptions,
    placeable: Option<PlaceableHeader>,
    records: Vec<Vec<u8>>,
    objects: ObjectTable,
    dc: DeviceContext,
}

impl Default for WmfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl WmfWriter {
    pub fn new() -> Self {
        Self::with_options(WriterOptions::default())
    }

    pub fn with_options(options: WriterOptions) -> Self {
        Self {
            options,
            placeable: None,
            records: Vec::new(),
            objects: ObjectTable::growable(),
            dc: DeviceContext::new(),
        }
    }

    /// Records emitted so far, EOF excluded
    pub fn records(&self) -> &[Vec<u8>] {
        &self.records
    }

    pub fn device_context(&self) -> &DeviceContext {
        &self.dc
    }

    /// Change the version written to the header
    pub fn set_version(&mut self, version: u16) {
        self.options.version = version;
    }

    /// Standard header describing the records emitted so far plus EOF
    pub fn metafile_header(&self) -> Result<WmfHeader> {
        let eof_words = 3usize;
        let record_words = self.records.iter().map(|r| r.len() / 2).sum::<usize>() + eof_words;
        let max_record = self
            .records
            .iter()
            .map(|r| r.len() / 2)
            .max()
            .unwrap_or(0)
            .max(eof_words);

        let too_large = |what: &str| {
            Error::InvalidArgument(format!("metafile {what} exceeds the header field"))
        };
        Ok(WmfHeader {
            version: self.options.version,
            size_words: u32::try_from(HEADER_LEN / 2 + record_words)
                .map_err(|_| too_large("size"))?,
            num_objects: u16::try_from(self.objects.slot_count())
                .map_err(|_| too_large("object count"))?,
            max_record_words: u32::try_from(max_record).map_err(|_| too_large("record size"))?,
            ..Default::default()
        })
    }

    /// Serialize the metafile: placeable header if one was given, the
    /// standard header, every record and the EOF record
    pub fn write<W: Write>(&self, out: &mut W) -> Result<()> {
        let header = self.metafile_header()?;
        debug!(
            records = self.records.len(),
            size_words = header.size_words,
            objects = header.num_objects,
            max_record_words = header.max_record_words,
            "writing metafile"
        );

        if let Some(placeable) = &self.placeable {
            out.write_all(&placeable.to_bytes())?;
        }
        out.write_all(&header.to_bytes())?;
        for record in &self.records {
            out.write_all(record)?;
        }
        out.write_all(&RecordBuilder::new(record::EOF, 0)?.finish())?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write(&mut out)?;
        Ok(out)
    }

    fn record<F>(&mut self, function: u16, payload_len: usize, fill: F) -> Result<()>
    where
        F: FnOnce(&mut RecordBuilder),
    {
        let mut builder = RecordBuilder::new(function, payload_len)?;
        fill(&mut builder);
        let record = builder.finish();
        trace!(
            function = format_args!("0x{function:04X}"),
            size = record.len() / 2,
            "record"
        );
        self.records.push(record);
        Ok(())
    }

    fn create(
        &mut self,
        function: u16,
        payload_len: usize,
        kind: ObjectKind,
        fill: impl FnOnce(&mut RecordBuilder),
    ) -> Result<GdiObject> {
        self.record(function, payload_len, fill)?;
        self.objects.create(kind)
    }

    /// Table index of an object this writer created and has not deleted
    fn slot(&self, object: &GdiObject) -> Result<u16> {
        if !self.objects.contains(object.id()) {
            return Err(Error::InvalidArgument(format!(
                "object {} was not created by this writer or has been deleted",
                object.id()
            )));
        }
        u16::try_from(object.id()).map_err(|_| {
            Error::InvalidArgument(format!("object index {} exceeds 16 bits", object.id()))
        })
    }

    fn require_selected_palette(&self, palette: &GdiObject) -> Result<u16> {
        let slot = self.slot(palette)?;
        if self.dc.selected_palette().map(GdiObject::id) != Some(palette.id()) {
            return Err(Error::InvalidArgument(format!(
                "palette {} is not the selected palette",
                palette.id()
            )));
        }
        Ok(slot)
    }

    fn palette_entries(
        &mut self,
        function: u16,
        palette: &GdiObject,
        start: u16,
        entries: &[u32],
    ) -> Result<()> {
        self.require_selected_palette(palette)?;
        let count = count_u16(entries.len(), "palette entries")?;
        self.record(function, 4 + entries.len() * 4, |r| {
            r.u16(start).u16(count);
            for &entry in entries {
                r.u32(entry);
            }
        })
    }

    fn rect_record(&mut self, function: u16, rect: Rect) -> Result<()> {
        self.record(function, 8, |r| {
            write_rect(r, rect);
        })
    }

    fn arc_record(&mut self, function: u16, rect: Rect, start: Point, end: Point) -> Result<()> {
        self.record(function, 16, |r| {
            r.i16(end.y).i16(end.x).i16(start.y).i16(start.x);
            write_rect(r, rect);
        })
    }

    fn point_record(&mut self, function: u16, x: i16, y: i16) -> Result<()> {
        self.record(function, 4, |r| {
            r.i16(y).i16(x);
        })
    }

    fn i16_record(&mut self, function: u16, value: i16) -> Result<()> {
        self.record(function, 2, |r| {
            r.i16(value);
        })
    }

    fn u32_record(&mut self, function: u16, value: u32) -> Result<()> {
        self.record(function, 4, |r| {
            r.u32(value);
        })
    }

    fn scale_record(&mut self, function: u16, x: i16, xd: i16, y: i16, yd: i16) -> Result<()> {
        self.record(function, 8, |r| {
            r.i16(yd).i16(y).i16(xd).i16(x);
        })
    }

    fn poly_record(&mut self, function: u16, points: &[Point]) -> Result<()> {
        let count = count_u16(points.len(), "points")?;
        self.record(function, 2 + points.len() * 4, |r| {
            r.u16(count);
            write_points(r, points);
        })
    }

    fn blt_record(
        &mut self,
        function: u16,
        dest: Area,
        src: Point,
        rop: u32,
        image: &[u8],
    ) -> Result<()> {
        check_bitmap_len(function, image)?;
        if image.is_empty() {
            // rop, ySrc, xSrc, reserved, height, width, yDest, xDest
            return self.record(function, 18, |r| {
                r.u32(rop).i16(src.y).i16(src.x).u16(0);
                write_area(r, dest);
            });
        }
        self.record(function, 16 + padded_len(image.len()), |r| {
            r.u32(rop).i16(src.y).i16(src.x);
            write_area(r, dest);
            r.padded(image);
        })
    }

    fn stretch_record(
        &mut self,
        function: u16,
        dest: Area,
        src: Area,
        rop: u32,
        image: &[u8],
    ) -> Result<()> {
        check_bitmap_len(function, image)?;
        if image.is_empty() {
            return self.record(function, 22, |r| {
                r.u32(rop);
                write_area(r, src);
                r.u16(0);
                write_area(r, dest);
            });
        }
        self.record(function, 20 + padded_len(image.len()), |r| {
            r.u32(rop);
            write_area(r, src);
            write_area(r, dest);
            r.padded(image);
        })
    }
}

fn check_bitmap_len(function: u16, image: &[u8]) -> Result<()> {
    if function != record::DIB_BIT_BLT && (1..MIN_BITMAP_LEN).contains(&image.len()) {
        return Err(Error::InvalidArgument(format!(
            "{}-byte bitmap for record 0x{function:04X} is indistinguishable from no bitmap",
            image.len()
        )));
    }
    Ok(())
}

fn count_u16(len: usize, what: &str) -> Result<u16> {
    u16::try_from(len).map_err(|_| Error::InvalidArgument(format!("too many {what}: {len}")))
}

/// bottom, right, top, left
fn write_rect(r: &mut RecordBuilder, rect: Rect) {
    r.i16(rect.bottom).i16(rect.right).i16(rect.top).i16(rect.left);
}

/// height, width, y, x
fn write_area(r: &mut RecordBuilder, area: Area) {
    r.i16(area.height).i16(area.width).i16(area.y).i16(area.x);
}

fn write_points(r: &mut RecordBuilder, points: &[Point]) {
    for point in points {
        r.i16(point.x).i16(point.y);
    }
}

impl Gdi for WmfWriter {
    fn placeable_header(&mut self, bounds: Rect, dpi: u16) -> Result<()> {
        self.placeable = Some(PlaceableHeader::new(bounds, dpi));
        Ok(())
    }

    fn create_brush_indirect(&mut self, style: u16, color: u32, hatch: i16) -> Result<GdiObject> {
        let kind = ObjectKind::Brush(Brush { style, color, hatch });
        self.create(record::CREATE_BRUSH_INDIRECT, 8, kind, |r| {
            r.u16(style).u32(color).i16(hatch);
        })
    }

    fn create_pen_indirect(&mut self, style: u16, width: i16, color: u32) -> Result<GdiObject> {
        let kind = ObjectKind::Pen(Pen { style, width, color });
        self.create(record::CREATE_PEN_INDIRECT, 10, kind, |r| {
            r.u16(style).i16(width).i16(0).u32(color);
        })
    }

    fn create_font_indirect(&mut self, font: Font) -> Result<GdiObject> {
        let mut face = encode_charset_prefix(&font.face_name, font.charset, FACE_NAME_MAX);
        face.push(0);

        let flags = [
            font.italic as u8,
            font.underline as u8,
            font.strike_out as u8,
            font.charset,
            font.out_precision,
            font.clip_precision,
            font.quality,
            font.pitch_and_family,
        ];
        let (height, width, escapement, orientation, weight) =
            (font.height, font.width, font.escapement, font.orientation, font.weight);
        let len = 18 + padded_len(face.len());
        self.create(record::CREATE_FONT_INDIRECT, len, ObjectKind::Font(font), |r| {
            r.i16(height).i16(width).i16(escapement).i16(orientation).i16(weight);
            r.bytes(&flags).padded(&face);
        })
    }

    fn create_palette(&mut self, version: u16, entries: &[u32]) -> Result<GdiObject> {
        let count = count_u16(entries.len(), "palette entries")?;
        let kind = ObjectKind::Palette(Palette {
            version,
            entries: entries.to_vec(),
        });
        self.create(record::CREATE_PALETTE, 4 + entries.len() * 4, kind, |r| {
            r.u16(version).u16(count);
            for &entry in entries {
                r.u32(entry);
            }
        })
    }

    fn create_pattern_brush(&mut self, image: &[u8]) -> Result<GdiObject> {
        let kind = ObjectKind::PatternBrush(PatternBrush {
            image: Bytes::copy_from_slice(image),
            usage: None,
        });
        self.create(record::CREATE_PATTERN_BRUSH, padded_len(image.len()), kind, |r| {
            r.padded(image);
        })
    }

    fn dib_create_pattern_brush(&mut self, image: &[u8], usage: u16) -> Result<GdiObject> {
        let kind = ObjectKind::PatternBrush(PatternBrush {
            image: Bytes::copy_from_slice(image),
            usage: Some(usage),
        });
        self.create(record::DIB_CREATE_PATTERN_BRUSH, 4 + padded_len(image.len()), kind, |r| {
            r.u16(BS_DIBPATTERN).u16(usage).padded(image);
        })
    }

    fn create_rect_rgn(&mut self, rect: Rect) -> Result<GdiObject> {
        // Region header, bounding box and a single scan covering the rectangle
        const REGION_LEN: usize = 34;
        let kind = ObjectKind::Region(Region { bounds: rect });
        self.create(record::CREATE_REGION, REGION_LEN, kind, |r| {
            r.i16(0).i16(REGION_OBJECT_TYPE).u32(0);
            r.i16(REGION_LEN as i16).i16(1).i16(2);
            r.i16(rect.left).i16(rect.top).i16(rect.right).i16(rect.bottom);
            r.i16(2).i16(rect.top).i16(rect.bottom);
            r.i16(rect.left).i16(rect.right).i16(2);
        })
    }

    fn delete_object(&mut self, object: &GdiObject) -> Result<()> {
        let slot = self.slot(object)?;
        self.record(record::DELETE_OBJECT, 2, |r| {
            r.u16(slot);
        })?;
        self.objects.remove(object.id());
        self.dc.release(object);
        Ok(())
    }

    fn select_object(&mut self, object: &GdiObject) -> Result<()> {
        let slot = self.slot(object)?;
        self.record(record::SELECT_OBJECT, 2, |r| {
            r.u16(slot);
        })?;
        self.dc.select(object);
        Ok(())
    }

    fn select_palette(&mut self, palette: &GdiObject, background: bool) -> Result<()> {
        let slot = self.slot(palette)?;
        if palette.as_palette().is_none() {
            return Err(Error::InvalidArgument(format!("object {} is not a palette", palette.id())));
        }
        self.record(record::SELECT_PALETTE, 4, |r| {
            r.u16(background as u16).u16(slot);
        })?;
        self.dc.select_palette(palette);
        Ok(())
    }

    fn realize_palette(&mut self) -> Result<()> {
        self.record(record::REALIZE_PALETTE, 0, |_| {})
    }

    fn set_palette_entries(
        &mut self,
        palette: &GdiObject,
        start: u16,
        entries: &[u32],
    ) -> Result<()> {
        self.palette_entries(record::SET_PALETTE_ENTRIES, palette, start, entries)
    }

    fn animate_palette(&mut self, palette: &GdiObject, start: u16, entries: &[u32]) -> Result<()> {
        self.palette_entries(record::ANIMATE_PALETTE, palette, start, entries)
    }

    fn resize_palette(&mut self, palette: &GdiObject, entries: u16) -> Result<()> {
        self.require_selected_palette(palette)?;
        self.record(record::RESIZE_PALETTE, 2, |r| {
            r.u16(entries);
        })
    }

    fn set_bk_color(&mut self, color: u32) -> Result<()> {
        self.u32_record(record::SET_BK_COLOR, color)
    }

    fn set_bk_mode(&mut self, mode: i16) -> Result<()> {
        self.i16_record(record::SET_BK_MODE, mode)
    }

    fn set_map_mode(&mut self, mode: i16) -> Result<()> {
        self.i16_record(record::SET_MAP_MODE, mode)
    }

    fn set_mapper_flags(&mut self, flags: u32) -> Result<()> {
        self.u32_record(record::SET_MAPPER_FLAGS, flags)
    }

    fn set_rop2(&mut self, mode: i16) -> Result<()> {
        self.i16_record(record::SET_ROP2, mode)
    }

    fn set_rel_abs(&mut self, mode: i16) -> Result<()> {
        self.i16_record(record::SET_REL_ABS, mode)
    }

    fn set_poly_fill_mode(&mut self, mode: i16) -> Result<()> {
        self.i16_record(record::SET_POLY_FILL_MODE, mode)
    }

    fn set_stretch_blt_mode(&mut self, mode: i16) -> Result<()> {
        self.i16_record(record::SET_STRETCH_BLT_MODE, mode)
    }

    fn set_text_align(&mut self, align: TextAlign) -> Result<()> {
        self.record(record::SET_TEXT_ALIGN, 2, |r| {
            r.u16(align.bits());
        })?;
        self.dc.set_text_align(align);
        Ok(())
    }

    fn set_text_color(&mut self, color: u32) -> Result<()> {
        self.u32_record(record::SET_TEXT_COLOR, color)
    }

    fn set_text_character_extra(&mut self, extra: i16) -> Result<()> {
        self.i16_record(record::SET_TEXT_CHAR_EXTRA, extra)
    }

    fn set_text_justification(&mut self, break_extra: i16, break_count: i16) -> Result<()> {
        self.record(record::SET_TEXT_JUSTIFICATION, 4, |r| {
            r.i16(break_count).i16(break_extra);
        })
    }

    fn set_layout(&mut self, layout: u32) -> Result<()> {
        self.u32_record(record::SET_LAYOUT, layout)
    }

    fn save_dc(&mut self) -> Result<()> {
        self.record(record::SAVE_DC, 0, |_| {})
    }

    fn restore_dc(&mut self, saved: i16) -> Result<()> {
        self.i16_record(record::RESTORE_DC, saved)
    }

    fn set_window_org_ex(&mut self, x: i16, y: i16) -> Result<(i32, i32)> {
        self.point_record(record::SET_WINDOW_ORG, x, y)?;
        Ok(self.dc.set_window_org(x, y))
    }

    fn set_window_ext_ex(&mut self, width: i16, height: i16) -> Result<(i32, i32)> {
        self.point_record(record::SET_WINDOW_EXT, width, height)?;
        Ok(self.dc.set_window_ext(width, height))
    }

    fn offset_window_org_ex(&mut self, dx: i16, dy: i16) -> Result<(i32, i32)> {
        self.point_record(record::OFFSET_WINDOW_ORG, dx, dy)?;
        Ok(self.dc.offset_window_org(dx, dy))
    }

    fn scale_window_ext_ex(&mut self, x: i16, xd: i16, y: i16, yd: i16) -> Result<(i32, i32)> {
        self.scale_record(record::SCALE_WINDOW_EXT, x, xd, y, yd)?;
        Ok(self.dc.scale_window_ext(x, xd, y, yd))
    }

    fn set_viewport_org_ex(&mut self, x: i16, y: i16) -> Result<(i32, i32)> {
        self.point_record(record::SET_VIEWPORT_ORG, x, y)?;
        Ok(self.dc.set_viewport_org(x, y))
    }

    fn set_viewport_ext_ex(&mut self, width: i16, height: i16) -> Result<(i32, i32)> {
        self.point_record(record::SET_VIEWPORT_EXT, width, height)?;
        Ok(self.dc.set_viewport_ext(width, height))
    }

    fn offset_viewport_org_ex(&mut self, dx: i16, dy: i16) -> Result<(i32, i32)> {
        self.point_record(record::OFFSET_VIEWPORT_ORG, dx, dy)?;
        Ok(self.dc.offset_viewport_org(dx, dy))
    }

    fn scale_viewport_ext_ex(&mut self, x: i16, xd: i16, y: i16, yd: i16) -> Result<(i32, i32)> {
        self.scale_record(record::SCALE_VIEWPORT_EXT, x, xd, y, yd)?;
        Ok(self.dc.scale_viewport_ext(x, xd, y, yd))
    }

    fn move_to_ex(&mut self, x: i16, y: i16) -> Result<(i32, i32)> {
        self.point_record(record::MOVE_TO, x, y)?;
        Ok(self.dc.move_to(x, y))
    }

    fn offset_clip_rgn(&mut self, dx: i16, dy: i16) -> Result<()> {
        self.point_record(record::OFFSET_CLIP_RGN, dx, dy)
    }

    fn select_clip_rgn(&mut self, region: Option<&GdiObject>) -> Result<()> {
        let index = region.map(|r| self.slot(r)).transpose()?.unwrap_or(NO_REGION);
        self.record(record::SELECT_CLIP_REGION, 2, |r| {
            r.u16(index);
        })
    }

    fn exclude_clip_rect(&mut self, rect: Rect) -> Result<RegionComplexity> {
        self.rect_record(record::EXCLUDE_CLIP_RECT, rect)?;
        Ok(RegionComplexity::Complex)
    }

    fn intersect_clip_rect(&mut self, rect: Rect) -> Result<RegionComplexity> {
        self.rect_record(record::INTERSECT_CLIP_RECT, rect)?;
        Ok(RegionComplexity::Complex)
    }

    fn line_to(&mut self, x: i16, y: i16) -> Result<()> {
        self.point_record(record::LINE_TO, x, y)?;
        self.dc.line_to(x, y);
        Ok(())
    }

    fn arc(&mut self, rect: Rect, start: Point, end: Point) -> Result<()> {
        self.arc_record(record::ARC, rect, start, end)
    }

    fn chord(&mut self, rect: Rect, start: Point, end: Point) -> Result<()> {
        self.arc_record(record::CHORD, rect, start, end)
    }

    fn pie(&mut self, rect: Rect, start: Point, end: Point) -> Result<()> {
        self.arc_record(record::PIE, rect, start, end)
    }

    fn ellipse(&mut self, rect: Rect) -> Result<()> {
        self.rect_record(record::ELLIPSE, rect)
    }

    fn rectangle(&mut self, rect: Rect) -> Result<()> {
        self.rect_record(record::RECTANGLE, rect)
    }

    fn round_rect(&mut self, rect: Rect, width: i16, height: i16) -> Result<()> {
        self.record(record::ROUND_RECT, 12, |r| {
            r.i16(height).i16(width);
            write_rect(r, rect);
        })
    }

    fn polygon(&mut self, points: &[Point]) -> Result<()> {
        self.poly_record(record::POLYGON, points)
    }

    fn polyline(&mut self, points: &[Point]) -> Result<()> {
        self.poly_record(record::POLYLINE, points)
    }

    fn poly_polygon(&mut self, polygons: &[Vec<Point>]) -> Result<()> {
        let count = count_u16(polygons.len(), "polygons")?;
        let counts = polygons
            .iter()
            .map(|p| count_u16(p.len(), "points"))
            .collect::<Result<Vec<_>>>()?;
        let total: usize = polygons.iter().map(Vec::len).sum();
        self.record(record::POLYPOLYGON, 2 + counts.len() * 2 + total * 4, |r| {
            r.u16(count);
            for &n in &counts {
                r.u16(n);
            }
            for polygon in polygons {
                write_points(r, polygon);
            }
        })
    }

    fn set_pixel(&mut self, x: i16, y: i16, color: u32) -> Result<()> {
        self.record(record::SET_PIXEL, 8, |r| {
            r.u32(color).i16(y).i16(x);
        })
    }

    fn flood_fill(&mut self, x: i16, y: i16, color: u32) -> Result<()> {
        self.record(record::FLOOD_FILL, 8, |r| {
            r.u32(color).i16(y).i16(x);
        })
    }

    fn ext_flood_fill(&mut self, x: i16, y: i16, color: u32, mode: u16) -> Result<()> {
        self.record(record::EXT_FLOOD_FILL, 10, |r| {
            r.u16(mode).u32(color).i16(y).i16(x);
        })
    }

    fn pat_blt(&mut self, area: Area, rop: u32) -> Result<()> {
        self.record(record::PAT_BLT, 12, |r| {
            r.u32(rop);
            write_area(r, area);
        })
    }

    fn fill_rgn(&mut self, region: &GdiObject, brush: &GdiObject) -> Result<()> {
        let (region, brush) = (self.slot(region)?, self.slot(brush)?);
        self.record(record::FILL_REGION, 4, |r| {
            r.u16(region).u16(brush);
        })
    }

    fn frame_rgn(
        &mut self,
        region: &GdiObject,
        brush: &GdiObject,
        width: i16,
        height: i16,
    ) -> Result<()> {
        let (region, brush) = (self.slot(region)?, self.slot(brush)?);
        self.record(record::FRAME_REGION, 8, |r| {
            r.u16(region).u16(brush).i16(height).i16(width);
        })
    }

    fn paint_rgn(&mut self, region: &GdiObject) -> Result<()> {
        let region = self.slot(region)?;
        self.record(record::PAINT_REGION, 2, |r| {
            r.u16(region);
        })
    }

    fn invert_rgn(&mut self, region: &GdiObject) -> Result<()> {
        let region = self.slot(region)?;
        self.record(record::INVERT_REGION, 2, |r| {
            r.u16(region);
        })
    }

    fn text_out(&mut self, x: i16, y: i16, text: &[u8]) -> Result<()> {
        let count = count_u16(text.len(), "text bytes")?;
        self.record(record::TEXT_OUT, 6 + padded_len(text.len()), |r| {
            r.u16(count).padded(text).i16(y).i16(x);
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
        let count = count_u16(text.len(), "text bytes")?;
        if let Some(dx) = dx
            && dx.len() != text.len()
        {
            return Err(Error::InvalidArgument(format!(
                "{} advances given for {} text bytes",
                dx.len(),
                text.len()
            )));
        }
        if options.has_rect() != rect.is_some() {
            return Err(Error::InvalidArgument(
                "ExtTextOut rectangle must be given exactly when OPAQUE or CLIPPED is set".into(),
            ));
        }

        let dx = dx.filter(|dx| !dx.is_empty());
        let len = 8
            + rect.map_or(0, |_| 8)
            + padded_len(text.len())
            + dx.map_or(0, |dx| dx.len() * 2);
        self.record(record::EXT_TEXT_OUT, len, |r| {
            r.i16(y).i16(x).u16(count).u16(options.bits());
            if let Some(rect) = rect {
                r.i16(rect.left).i16(rect.top).i16(rect.right).i16(rect.bottom);
            }
            r.padded(text);
            for &advance in dx.unwrap_or_default() {
                r.i16(advance);
            }
        })?;
        self.dc.ext_text_out(x, y, dx);
        Ok(())
    }

    fn bit_blt(&mut self, dest: Area, src: Point, rop: u32, image: &[u8]) -> Result<()> {
        self.blt_record(record::BIT_BLT, dest, src, rop, image)
    }

    fn stretch_blt(&mut self, dest: Area, src: Area, rop: u32, image: &[u8]) -> Result<()> {
        self.stretch_record(record::STRETCH_BLT, dest, src, rop, image)
    }

    fn dib_bit_blt(&mut self, dest: Area, src: Point, rop: u32, image: &[u8]) -> Result<()> {
        if dest.height == 0 && !image.is_empty() {
            return Err(Error::InvalidArgument(
                "DibBitBlt with a bitmap needs a non-zero height".into(),
            ));
        }
        self.blt_record(record::DIB_BIT_BLT, dest, src, rop, image)
    }

    fn dib_stretch_blt(&mut self, dest: Area, src: Area, rop: u32, image: &[u8]) -> Result<()> {
        self.stretch_record(record::DIB_STRETCH_BLT, dest, src, rop, image)
    }

    fn stretch_dib_bits(
        &mut self,
        dest: Area,
        src: Area,
        usage: u16,
        rop: u32,
        image: &[u8],
    ) -> Result<()> {
        self.record(record::STRETCH_DIB, 22 + padded_len(image.len()), |r| {
            r.u32(rop).u16(usage);
            write_area(r, src);
            write_area(r, dest);
            r.padded(image);
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
        self.record(record::SET_DIB_TO_DEV, 18 + padded_len(image.len()), |r| {
            r.u16(usage).u16(scan_count).u16(start_scan).i16(src.y).i16(src.x);
            write_area(r, dest);
            r.padded(image);
        })
    }

    fn escape(&mut self, data: &[u8]) -> Result<()> {
        self.record(record::ESCAPE, padded_len(data.len()), |r| {
            r.padded(data);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::encoding::charset;
    use crate::wmf::constants::{pen, rop};
    use crate::wmf::parser::WmfParser;
    use crate::wmf::recorder::{Operation, OperationRecorder};

    fn decode(bytes: &[u8]) -> Vec<Operation> {
        let mut recorder = OperationRecorder::new();
        WmfParser::new().parse(bytes, &mut recorder).unwrap();
        recorder.into_operations()
    }

    /// Operations between the header and footer callbacks
    fn body(ops: Vec<Operation>) -> Vec<Operation> {
        ops.into_iter()
            .filter(|op| {
                !matches!(
                    op,
                    Operation::Header | Operation::Footer | Operation::PlaceableHeader { .. }
                )
            })
            .collect()
    }

    fn assert_sized(writer: &WmfWriter) {
        for record in writer.records() {
            let words = u32::from_le_bytes([record[0], record[1], record[2], record[3]]);
            assert_eq!(words as usize * 2, record.len());
        }
    }

    #[test]
    fn test_pen_line_round_trip() {
        let mut writer = WmfWriter::new();
        let pen = writer.create_pen_indirect(pen::PS_SOLID, 1, 0x0000_00FF).unwrap();
        writer.select_object(&pen).unwrap();
        writer.move_to_ex(0, 0).unwrap();
        writer.line_to(100, 100).unwrap();
        assert_eq!(writer.device_context().current_position(), (100, 100));

        let ops = body(decode(&writer.to_bytes().unwrap()));
        assert_eq!(
            ops,
            vec![
                Operation::CreatePenIndirect {
                    object: 0,
                    style: pen::PS_SOLID,
                    width: 1,
                    color: 0x0000_00FF,
                },
                Operation::SelectObject { object: 0 },
                Operation::MoveToEx { x: 0, y: 0 },
                Operation::LineTo { x: 100, y: 100 },
            ]
        );
    }

    #[test]
    fn test_header_totals() {
        let mut writer = WmfWriter::new();
        let a = writer.create_brush_indirect(0, 0, 0).unwrap();
        writer.create_brush_indirect(0, 0, 0).unwrap();
        writer.delete_object(&a).unwrap();
        writer.polyline(&[Point::new(0, 0); 10]).unwrap();

        let header = writer.metafile_header().unwrap();
        // deleting does not shrink the object count
        assert_eq!(header.num_objects, 2);
        // polyline: 3 header words, count, 10 points
        assert_eq!(header.max_record_words, 3 + 1 + 20);

        let bytes = writer.to_bytes().unwrap();
        assert_eq!(header.size_words as usize * 2, bytes.len());
        assert_eq!(&bytes[bytes.len() - 6..], &[3, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_placeable_header_checksum() {
        let mut writer = WmfWriter::new();
        writer.placeable_header(Rect::new(0, 0, 640, 480), 1440).unwrap();
        let bytes = writer.to_bytes().unwrap();
        let xor = bytes[..20]
            .chunks_exact(2)
            .fold(0u16, |acc, w| acc ^ u16::from_le_bytes([w[0], w[1]]));
        assert_eq!(xor, u16::from_le_bytes([bytes[20], bytes[21]]));

        let ops = decode(&bytes);
        assert_eq!(
            ops[0],
            Operation::PlaceableHeader {
                bounds: Rect::new(0, 0, 640, 480),
                dpi: 1440,
            }
        );
    }

    #[test]
    fn test_no_placeable_header_by_default() {
        let bytes = WmfWriter::new().to_bytes().unwrap();
        assert_eq!(bytes.len(), HEADER_LEN + 6);
        assert_eq!(&bytes[..4], &[1, 0, 9, 0]);
    }

    #[test]
    fn test_dib_bit_blt_without_bitmap() {
        let mut writer = WmfWriter::new();
        let dest = Area::new(1, 2, 30, 40);
        writer.dib_bit_blt(dest, Point::new(5, 6), rop::PATCOPY, &[]).unwrap();
        assert_eq!(
            writer.records()[0].len() as u32 / 2,
            record::blt_without_bitmap_words(record::DIB_BIT_BLT)
        );

        let ops = body(decode(&writer.to_bytes().unwrap()));
        assert_eq!(
            ops,
            vec![Operation::DibBitBlt {
                dest,
                src: Point::new(5, 6),
                rop: rop::PATCOPY,
                image: Bytes::new(),
            }]
        );
    }

    #[test]
    fn test_blt_variants_round_trip() {
        let mut writer = WmfWriter::new();
        let dest = Area::new(0, 0, 16, 16);
        let src = Area::new(1, 1, 8, 8);
        writer.bit_blt(dest, Point::new(3, 4), rop::SRCCOPY, &[]).unwrap();
        writer.bit_blt(dest, Point::new(3, 4), rop::SRCCOPY, &[9; 12]).unwrap();
        writer.stretch_blt(dest, src, rop::SRCAND, &[]).unwrap();
        writer.dib_stretch_blt(dest, src, rop::SRCPAINT, &[7; 40]).unwrap();
        writer.stretch_dib_bits(dest, src, 0, rop::SRCCOPY, &[1; 44]).unwrap();
        writer
            .set_dib_bits_to_device(dest, Point::new(0, 0), 0, 16, 0, &[2; 44])
            .unwrap();
        assert_sized(&writer);

        let ops = body(decode(&writer.to_bytes().unwrap()));
        assert_eq!(ops.len(), 6);
        assert!(matches!(&ops[0], Operation::BitBlt { image, .. } if image.is_empty()));
        assert!(matches!(&ops[1], Operation::BitBlt { image, .. } if image.len() == 12));
        assert!(matches!(
            &ops[2],
            Operation::StretchBlt { src: s, image, .. } if *s == src && image.is_empty()
        ));
        assert!(matches!(
            &ops[3],
            Operation::DibStretchBlt { dest: d, image, .. } if *d == dest && image.len() == 40
        ));
        assert!(matches!(&ops[4], Operation::StretchDibBits { usage: 0, .. }));
        assert!(matches!(&ops[5], Operation::SetDibBitsToDevice { scan_count: 16, .. }));
    }

    #[test]
    fn test_tiny_bitmaps_rejected() {
        let mut writer = WmfWriter::new();
        let dest = Area::new(1, 2, 3, 4);
        let src = Area::new(0, 0, 3, 4);
        assert!(matches!(
            writer.bit_blt(dest, Point::new(5, 6), rop::SRCCOPY, &[0xAB, 0xCD]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            writer.stretch_blt(dest, src, rop::SRCCOPY, &[0xAB]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            writer.dib_stretch_blt(dest, src, rop::SRCCOPY, &[0xAB, 0xCD]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(writer.records().is_empty());

        writer.bit_blt(dest, Point::new(5, 6), rop::SRCCOPY, &[0xAB, 0xCD, 0xEF]).unwrap();
        writer.stretch_blt(dest, src, rop::SRCCOPY, &[0xAB, 0xCD, 0xEF]).unwrap();
        let ops = body(decode(&writer.to_bytes().unwrap()));
        assert_eq!(
            ops,
            vec![
                Operation::BitBlt {
                    dest,
                    src: Point::new(5, 6),
                    rop: rop::SRCCOPY,
                    image: Bytes::from_static(&[0xAB, 0xCD, 0xEF, 0]),
                },
                Operation::StretchBlt {
                    dest,
                    src,
                    rop: rop::SRCCOPY,
                    image: Bytes::from_static(&[0xAB, 0xCD, 0xEF, 0]),
                },
            ]
        );
    }

    #[test]
    fn test_dib_bit_blt_zero_height_with_bitmap_rejected() {
        let mut writer = WmfWriter::new();
        let dest = Area::new(0, 0, 4, 0);
        let result = writer.dib_bit_blt(dest, Point::default(), rop::SRCCOPY, &[0; 8]);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        assert!(writer.records().is_empty());
    }

    #[test]
    fn test_odd_text_is_padded() {
        let mut writer = WmfWriter::new();
        writer.text_out(10, 20, b"abc").unwrap();
        let record = &writer.records()[0];
        // header, count, "abc" + pad, y, x
        assert_eq!(record.len(), 6 + 2 + 4 + 4);
        assert_eq!(record[11], 0);

        let ops = body(decode(&writer.to_bytes().unwrap()));
        assert_eq!(
            ops,
            vec![Operation::TextOut {
                x: 10,
                y: 20,
                text: Bytes::from_static(b"abc"),
            }]
        );
    }

    #[test]
    fn test_ext_text_out_round_trip() {
        let mut writer = WmfWriter::new();
        writer.set_text_align(TextAlign::RIGHT | TextAlign::UPDATECP).unwrap();
        let rect = Rect::new(0, 0, 50, 12);
        writer
            .ext_text_out(100, 5, EtoOptions::CLIPPED, Some(rect), b"Hello", Some(&[6, 6, 6, 6, 6]))
            .unwrap();
        assert_eq!(writer.device_context().current_position(), (106, 5));
        assert_sized(&writer);

        let ops = body(decode(&writer.to_bytes().unwrap()));
        assert_eq!(
            ops[1],
            Operation::ExtTextOut {
                x: 100,
                y: 5,
                options: EtoOptions::CLIPPED,
                rect: Some(rect),
                text: Bytes::from_static(b"Hello"),
                dx: Some(vec![6, 6, 6, 6, 6]),
            }
        );
    }

    #[test]
    fn test_ext_text_out_argument_checks() {
        let mut writer = WmfWriter::new();
        let short_dx = writer.ext_text_out(0, 0, EtoOptions::empty(), None, b"abc", Some(&[1, 2]));
        assert!(matches!(short_dx, Err(Error::InvalidArgument(_))));
        let missing_rect = writer.ext_text_out(0, 0, EtoOptions::OPAQUE, None, b"abc", None);
        assert!(matches!(missing_rect, Err(Error::InvalidArgument(_))));
        assert!(writer.records().is_empty());
    }

    #[test]
    fn test_empty_advance_array_written_as_none() {
        let mut writer = WmfWriter::new();
        writer.ext_text_out(4, 8, EtoOptions::empty(), None, b"", Some(&[])).unwrap();
        assert_eq!(writer.records()[0].len(), 6 + 8);

        let mut direct = OperationRecorder::new();
        direct.ext_text_out(4, 8, EtoOptions::empty(), None, b"", Some(&[])).unwrap();
        let decoded = body(decode(&writer.to_bytes().unwrap()));
        assert_eq!(decoded, direct.into_operations());
        assert!(matches!(&decoded[0], Operation::ExtTextOut { dx: None, .. }));
    }

    #[test]
    fn test_font_face_name_charset() {
        let mut writer = WmfWriter::new();
        let font = Font {
            height: -16,
            weight: 700,
            italic: true,
            charset: charset::SHIFTJIS,
            face_name: "ＭＳ 明朝".into(),
            ..Default::default()
        };
        writer.create_font_indirect(font.clone()).unwrap();
        assert_sized(&writer);

        let ops = body(decode(&writer.to_bytes().unwrap()));
        assert_eq!(ops, vec![Operation::CreateFontIndirect { object: 0, font }]);
    }

    #[test]
    fn test_long_face_name_truncated() {
        let mut writer = WmfWriter::new();
        let font = Font {
            face_name: "A".repeat(40),
            ..Default::default()
        };
        writer.create_font_indirect(font).unwrap();
        // 18 bytes of fields and 32 bytes of face name
        assert_eq!(writer.records()[0].len(), 6 + 18 + 32);

        let ops = body(decode(&writer.to_bytes().unwrap()));
        assert!(matches!(
            &ops[0],
            Operation::CreateFontIndirect { font, .. } if font.face_name == "A".repeat(31)
        ));
    }

    #[test]
    fn test_double_byte_face_name_truncated_whole() {
        let mut writer = WmfWriter::new();
        let font = Font {
            charset: charset::SHIFTJIS,
            face_name: "ＭＳ ゴシック".repeat(3),
            ..Default::default()
        };
        writer.create_font_indirect(font).unwrap();

        let ops = body(decode(&writer.to_bytes().unwrap()));
        let Operation::CreateFontIndirect { font, .. } = &ops[0] else {
            panic!("unexpected operation: {:?}", ops[0]);
        };
        assert!(!font.face_name.contains('\u{FFFD}'), "{:?}", font.face_name);
        assert!("ＭＳ ゴシック".repeat(3).starts_with(&font.face_name));
        assert_eq!(font.face_name.chars().count(), 17);
    }

    #[test]
    fn test_region_records() {
        let mut writer = WmfWriter::new();
        let rect = Rect::new(10, 20, 110, 220);
        let region = writer.create_rect_rgn(rect).unwrap();
        let brush = writer.create_brush_indirect(0, 0x00FF00, 0).unwrap();
        assert_eq!(writer.records()[0].len() / 2, 20);

        writer.fill_rgn(&region, &brush).unwrap();
        writer.frame_rgn(&region, &brush, 2, 3).unwrap();
        writer.paint_rgn(&region).unwrap();
        writer.invert_rgn(&region).unwrap();
        writer.select_clip_rgn(Some(&region)).unwrap();
        writer.select_clip_rgn(None).unwrap();

        let ops = body(decode(&writer.to_bytes().unwrap()));
        assert_eq!(ops[0], Operation::CreateRectRgn { object: 0, rect });
        assert_eq!(ops[2], Operation::FillRgn { region: 0, brush: 1 });
        assert_eq!(
            ops[3],
            Operation::FrameRgn {
                region: 0,
                brush: 1,
                width: 2,
                height: 3,
            }
        );
        assert_eq!(ops[6], Operation::SelectClipRgn { region: Some(0) });
        assert_eq!(ops[7], Operation::SelectClipRgn { region: None });
    }

    #[test]
    fn test_palette_requires_selection() {
        let mut writer = WmfWriter::new();
        let palette = writer.create_palette(0x0300, &[0x00FF_0000, 0x0000_FF00]).unwrap();
        assert!(matches!(
            writer.set_palette_entries(&palette, 0, &[1]),
            Err(Error::InvalidArgument(_))
        ));

        writer.select_palette(&palette, true).unwrap();
        writer.set_palette_entries(&palette, 1, &[0x0000_00FF]).unwrap();
        writer.animate_palette(&palette, 0, &[0x0101_0101]).unwrap();
        writer.resize_palette(&palette, 8).unwrap();
        writer.realize_palette().unwrap();

        let ops = body(decode(&writer.to_bytes().unwrap()));
        assert_eq!(
            ops,
            vec![
                Operation::CreatePalette {
                    object: 0,
                    version: 0x0300,
                    entries: vec![0x00FF_0000, 0x0000_FF00],
                },
                Operation::SelectPalette {
                    palette: 0,
                    background: true,
                },
                Operation::SetPaletteEntries {
                    palette: 0,
                    start: 1,
                    entries: vec![0x0000_00FF],
                },
                Operation::AnimatePalette {
                    palette: 0,
                    start: 0,
                    entries: vec![0x0101_0101],
                },
                Operation::ResizePalette {
                    palette: 0,
                    entries: 8,
                },
                Operation::RealizePalette,
            ]
        );
    }

    #[test]
    fn test_deleted_object_rejected() {
        let mut writer = WmfWriter::new();
        let pen = writer.create_pen_indirect(0, 1, 0).unwrap();
        writer.select_object(&pen).unwrap();
        writer.delete_object(&pen).unwrap();
        assert!(writer.device_context().selected_pen().is_none());
        assert!(matches!(writer.select_object(&pen), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_slot_reuse_after_delete() {
        let mut writer = WmfWriter::new();
        let a = writer.create_brush_indirect(0, 1, 0).unwrap();
        let b = writer.create_brush_indirect(0, 2, 0).unwrap();
        writer.delete_object(&a).unwrap();
        let c = writer.create_pen_indirect(0, 1, 3).unwrap();
        assert_eq!((b.id(), c.id()), (1, 0));
    }

    #[test]
    fn test_transform_records() {
        let mut writer = WmfWriter::new();
        writer.set_window_org_ex(-10, -20).unwrap();
        writer.set_window_ext_ex(1000, 500).unwrap();
        assert_eq!(writer.scale_window_ext_ex(2, 1, 1, 2).unwrap(), (1000, 500));
        assert_eq!(writer.offset_window_org_ex(5, 5).unwrap(), (-10, -20));
        writer.set_viewport_org_ex(1, 2).unwrap();
        writer.set_viewport_ext_ex(300, 400).unwrap();
        writer.offset_viewport_org_ex(-1, -1).unwrap();
        writer.scale_viewport_ext_ex(1, 3, 1, 4).unwrap();
        assert_eq!(writer.device_context().window().scaled_extent(), (2000, 250));

        let ops = body(decode(&writer.to_bytes().unwrap()));
        assert_eq!(ops[0], Operation::SetWindowOrgEx { x: -10, y: -20 });
        assert_eq!(
            ops[1],
            Operation::SetWindowExtEx {
                width: 1000,
                height: 500,
            }
        );
        assert_eq!(
            ops[2],
            Operation::ScaleWindowExtEx {
                x: 2,
                xd: 1,
                y: 1,
                yd: 2,
            }
        );
        assert_eq!(
            ops[7],
            Operation::ScaleViewportExtEx {
                x: 1,
                xd: 3,
                y: 1,
                yd: 4,
            }
        );
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn point_strategy() -> impl Strategy<Value = Point> {
            (any::<i16>(), any::<i16>()).prop_map(|(x, y)| Point::new(x, y))
        }

        fn rect_strategy() -> impl Strategy<Value = Rect> {
            (any::<i16>(), any::<i16>(), any::<i16>(), any::<i16>())
                .prop_map(|(l, t, r, b)| Rect::new(l, t, r, b))
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn prop_records_declare_their_length(
                points in prop::collection::vec(point_strategy(), 0..40),
                text in prop::collection::vec(any::<u8>(), 0..33),
                image in prop::collection::vec(any::<u8>(), 0..65),
                rect in rect_strategy(),
            ) {
                let mut writer = WmfWriter::new();
                writer.polygon(&points).unwrap();
                writer.poly_polygon(&[points.clone(), points.clone()]).unwrap();
                writer.text_out(0, 0, &text).unwrap();
                writer.ext_text_out(0, 0, EtoOptions::OPAQUE, Some(rect), &text, None).unwrap();
                writer.escape(&image).unwrap();
                writer.create_pattern_brush(&image).unwrap();
                let area = Area::default();
                writer.stretch_dib_bits(area, area, 0, rop::SRCCOPY, &image).unwrap();
                writer.arc(rect, Point::default(), Point::default()).unwrap();

                for record in writer.records() {
                    let words = u32::from_le_bytes([record[0], record[1], record[2], record[3]]);
                    prop_assert_eq!(words as usize * 2, record.len());
                    prop_assert_eq!(record.len() % 2, 0);
                }
            }

            #[test]
            fn prop_drawing_round_trip(
                points in prop::collection::vec(point_strategy(), 1..30),
                rect in rect_strategy(),
                start in point_strategy(),
                end in point_strategy(),
                text in prop::collection::vec(any::<u8>(), 1..20),
                color in any::<u32>(),
            ) {
                let dx: Vec<i16> = text.iter().map(|&b| b as i16).collect();
                let mut writer = WmfWriter::new();
                writer.polyline(&points).unwrap();
                writer.pie(rect, start, end).unwrap();
                writer.round_rect(rect, start.x, start.y).unwrap();
                writer.set_pixel(end.x, end.y, color).unwrap();
                writer
                    .ext_text_out(start.x, start.y, EtoOptions::empty(), None, &text, Some(&dx))
                    .unwrap();

                let ops = body(decode(&writer.to_bytes().unwrap()));
                prop_assert_eq!(ops, vec![
                    Operation::Polyline(points.clone()),
                    Operation::Pie { rect, start, end },
                    Operation::RoundRect { rect, width: start.x, height: start.y },
                    Operation::SetPixel { x: end.x, y: end.y, color },
                    Operation::ExtTextOut {
                        x: start.x,
                        y: start.y,
                        options: EtoOptions::empty(),
                        rect: None,
                        text: Bytes::from(text.clone()),
                        dx: Some(dx.clone()),
                    },
                ]);
            }
        }
    }
}
