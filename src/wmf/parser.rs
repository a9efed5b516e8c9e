//! WMF record decoder
//!
//! Reads the optional placeable header and the standard header, then decodes
//! one record at a time and forwards it to a [`Gdi`] sink. Each opcode has a
//! fixed field layout; variable trailing data is sized as the declared record
//! length minus the bytes already consumed, and any bytes left over after the
//! modeled fields are skipped so the stream stays aligned.
//!
//! Decoding is fail-fast: a truncated stream, an unknown opcode or a record
//! naming an empty object slot aborts the whole parse. Calls already made to
//! the sink are not rolled back.

use super::constants::{NO_REGION, PLACEABLE_KEY, RECORD_HEADER_LEN, record};
use super::device_context::DeviceContext;
use super::gdi::{Area, EtoOptions, Gdi, Point, Rect, TextAlign};
use super::header::{PlaceableHeader, WmfHeader};
use super::object::{Font, GdiObject, ObjectKind, ObjectTable};
use crate::common::binary::{BinaryError, BinaryReader, ByteOrder};
use crate::common::encoding::decode_charset_string;
use crate::common::error::{Error, Result};
use std::io::Read;
use tracing::{debug, trace};

/// Longest face name stored in a Font object, terminator included
const FACE_NAME_LEN: usize = 32;

/// Decoder configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Byte order of every multi-byte field (little-endian in real files)
    pub byte_order: ByteOrder,
}

/// Facts gathered while decoding a metafile
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WmfSummary {
    pub placeable: Option<PlaceableHeader>,
    pub header: WmfHeader,
    /// Records decoded, EOF excluded
    pub record_count: usize,
}

/// WMF decoder
#[derive(Debug, Clone, Default)]
pub struct WmfParser {
    options: ParseOptions,
}

impl WmfParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Decode a metafile, forwarding every record to `gdi` in file order
    ///
    /// # Examples
    ///
    /// ```
    /// use wmf_codec::wmf::{Gdi, OperationRecorder, WmfParser, WmfWriter};
    ///
    /// let mut writer = WmfWriter::new();
    /// writer.header()?;
    /// writer.move_to_ex(10, 20)?;
    /// let mut bytes = Vec::new();
    /// writer.write(&mut bytes)?;
    ///
    /// let mut recorder = OperationRecorder::new();
    /// let summary = WmfParser::new().parse(&bytes[..], &mut recorder)?;
    /// assert_eq!(summary.record_count, 1);
    /// # Ok::<(), wmf_codec::common::Error>(())
    /// ```
    pub fn parse<R, G>(&self, input: R, gdi: &mut G) -> Result<WmfSummary>
    where
        R: Read,
        G: Gdi + ?Sized,
    {
        self.decode(input, gdi).map(|(summary, _)| summary)
    }

    /// Decode and also hand back the device context as the last record left it
    pub(crate) fn decode<R, G>(&self, input: R, gdi: &mut G) -> Result<(WmfSummary, DeviceContext)>
    where
        R: Read,
        G: Gdi + ?Sized,
    {
        let mut session = Session {
            reader: BinaryReader::new(input, self.options.byte_order),
            gdi,
            objects: ObjectTable::default(),
            dc: DeviceContext::new(),
            declared: 0,
        };
        let summary = session.run()?;
        Ok((summary, session.dc))
    }
}

/// State owned by a single decode
struct Session<'g, R, G: ?Sized> {
    reader: BinaryReader<R>,
    gdi: &'g mut G,
    /// Objects returned by the sink, stored at the slot this file assigns
    objects: ObjectTable,
    dc: DeviceContext,
    /// Payload bytes declared by the current record
    declared: usize,
}

impl<R: Read, G: Gdi + ?Sized> Session<'_, R, G> {
    fn run(&mut self) -> Result<WmfSummary> {
        let key = match self.reader.read_u32() {
            Ok(key) => key,
            Err(source @ BinaryError::InsufficientData { .. }) if self.reader.position() == 0 => {
                return Err(Error::EmptySource { source });
            },
            Err(err) => return Err(err.into()),
        };

        let (placeable, type_and_size) = if key == PLACEABLE_KEY {
            let placeable = PlaceableHeader::read_fields(&mut self.reader)?;
            debug!(
                bounds = ?placeable.bounds,
                dpi = placeable.dpi,
                checksum_valid = placeable.is_checksum_valid(),
                "placeable header"
            );
            self.gdi.placeable_header(placeable.bounds, placeable.dpi)?;
            (Some(placeable), self.reader.read_u32()?)
        } else {
            (None, key)
        };

        // mtType and mtHeaderSize are two u16 fields read as one u32
        let (file_type, header_size) = match self.reader.byte_order() {
            ByteOrder::Little => (type_and_size as u16, (type_and_size >> 16) as u16),
            ByteOrder::Big => ((type_and_size >> 16) as u16, type_and_size as u16),
        };
        let header = WmfHeader::read_fields(&mut self.reader, file_type, header_size)?;
        header.validate()?;
        debug!(
            version = header.version,
            objects = header.num_objects,
            size_words = header.size_words,
            "metafile header"
        );
        self.objects = ObjectTable::with_capacity(header.num_objects as usize);
        self.gdi.header()?;

        let mut record_count = 0;
        loop {
            let size = self.reader.read_u32()?;
            let function = self.reader.read_u16()?;
            trace!(function = format_args!("0x{function:04X}"), size, "record");

            if function == record::EOF {
                self.gdi.footer()?;
                break;
            }
            if (size as usize) * 2 < RECORD_HEADER_LEN {
                return Err(Error::InvalidRecordSize { function, size });
            }

            self.reader.reset_count();
            self.declared = size as usize * 2 - RECORD_HEADER_LEN;
            self.dispatch(function, size)?;

            let consumed = self.reader.count();
            if consumed > self.declared {
                return Err(Error::InvalidRecordSize { function, size });
            }
            if consumed < self.declared {
                trace!(
                    function = format_args!("0x{function:04X}"),
                    bytes = self.declared - consumed,
                    "skipping trailing record bytes"
                );
                self.reader.skip(self.declared - consumed)?;
            }
            record_count += 1;
        }

        Ok(WmfSummary {
            placeable,
            header,
            record_count,
        })
    }

    fn dispatch(&mut self, function: u16, size: u32) -> Result<()> {
        match function {
            record::SAVE_DC => self.gdi.save_dc(),
            record::REALIZE_PALETTE => self.gdi.realize_palette(),
            record::SET_PALETTE_ENTRIES | record::ANIMATE_PALETTE => {
                let start = self.u16()?;
                let count = self.u16()?;
                let entries = self.u32_array(count as usize)?;
                let palette = self.selected_palette(function)?;
                if function == record::SET_PALETTE_ENTRIES {
                    self.gdi.set_palette_entries(&palette, start, &entries)
                } else {
                    self.gdi.animate_palette(&palette, start, &entries)
                }
            },
            record::RESIZE_PALETTE => {
                let entries = self.u16()?;
                let palette = self.selected_palette(function)?;
                self.gdi.resize_palette(&palette, entries)
            },
            record::SELECT_PALETTE => {
                let (background, index) = if self.remaining() >= 4 {
                    (self.u16()? != 0, self.u16()?)
                } else {
                    (false, self.u16()?)
                };
                let palette = self.object_of(function, index, "palette", |o| {
                    o.as_palette().is_some()
                })?;
                self.dc.select_palette(&palette);
                self.gdi.select_palette(&palette, background)
            },

            record::SET_BK_COLOR => {
                let color = self.u32()?;
                self.gdi.set_bk_color(color)
            },
            record::SET_TEXT_COLOR => {
                let color = self.u32()?;
                self.gdi.set_text_color(color)
            },
            record::SET_BK_MODE => {
                let mode = self.i16()?;
                self.gdi.set_bk_mode(mode)
            },
            record::SET_MAP_MODE => {
                let mode = self.i16()?;
                self.gdi.set_map_mode(mode)
            },
            record::SET_ROP2 => {
                let mode = self.i16()?;
                self.gdi.set_rop2(mode)
            },
            record::SET_REL_ABS => {
                let mode = self.i16()?;
                self.gdi.set_rel_abs(mode)
            },
            record::SET_POLY_FILL_MODE => {
                let mode = self.i16()?;
                self.gdi.set_poly_fill_mode(mode)
            },
            record::SET_STRETCH_BLT_MODE => {
                let mode = self.i16()?;
                self.gdi.set_stretch_blt_mode(mode)
            },
            record::SET_TEXT_CHAR_EXTRA => {
                let extra = self.i16()?;
                self.gdi.set_text_character_extra(extra)
            },
            record::SET_TEXT_ALIGN => {
                let align = TextAlign::from_bits_retain(self.u16()?);
                self.dc.set_text_align(align);
                self.gdi.set_text_align(align)
            },
            record::SET_TEXT_JUSTIFICATION => {
                let break_count = self.i16()?;
                let break_extra = self.i16()?;
                self.gdi.set_text_justification(break_extra, break_count)
            },
            record::SET_MAPPER_FLAGS => {
                let flags = self.u32()?;
                self.gdi.set_mapper_flags(flags)
            },
            record::SET_LAYOUT => {
                let layout = self.u32()?;
                self.gdi.set_layout(layout)
            },
            record::RESTORE_DC => {
                let saved = self.i16()?;
                self.gdi.restore_dc(saved)
            },

            record::SET_WINDOW_ORG => {
                let (x, y) = self.yx()?;
                self.dc.set_window_org(x, y);
                self.gdi.set_window_org_ex(x, y).map(drop)
            },
            record::SET_WINDOW_EXT => {
                let (width, height) = self.yx()?;
                self.dc.set_window_ext(width, height);
                self.gdi.set_window_ext_ex(width, height).map(drop)
            },
            record::OFFSET_WINDOW_ORG => {
                let (dx, dy) = self.yx()?;
                self.dc.offset_window_org(dx, dy);
                self.gdi.offset_window_org_ex(dx, dy).map(drop)
            },
            record::SCALE_WINDOW_EXT => {
                let (x, xd, y, yd) = self.scale_fields()?;
                self.dc.scale_window_ext(x, xd, y, yd);
                self.gdi.scale_window_ext_ex(x, xd, y, yd).map(drop)
            },
            record::SET_VIEWPORT_ORG => {
                let (x, y) = self.yx()?;
                self.dc.set_viewport_org(x, y);
                self.gdi.set_viewport_org_ex(x, y).map(drop)
            },
            record::SET_VIEWPORT_EXT => {
                let (width, height) = self.yx()?;
                self.dc.set_viewport_ext(width, height);
                self.gdi.set_viewport_ext_ex(width, height).map(drop)
            },
            record::OFFSET_VIEWPORT_ORG => {
                let (dx, dy) = self.yx()?;
                self.dc.offset_viewport_org(dx, dy);
                self.gdi.offset_viewport_org_ex(dx, dy).map(drop)
            },
            record::SCALE_VIEWPORT_EXT => {
                let (x, xd, y, yd) = self.scale_fields()?;
                self.dc.scale_viewport_ext(x, xd, y, yd);
                self.gdi.scale_viewport_ext_ex(x, xd, y, yd).map(drop)
            },
            record::MOVE_TO => {
                let (x, y) = self.yx()?;
                self.dc.move_to(x, y);
                self.gdi.move_to_ex(x, y).map(drop)
            },

            record::SELECT_CLIP_REGION => {
                let index = self.u16()?;
                if index == NO_REGION {
                    return self.gdi.select_clip_rgn(None);
                }
                let region = self.object_of(function, index, "region", |o| {
                    o.as_region().is_some()
                })?;
                self.gdi.select_clip_rgn(Some(&region))
            },
            record::OFFSET_CLIP_RGN => {
                let (dx, dy) = self.yx()?;
                self.gdi.offset_clip_rgn(dx, dy)
            },
            record::EXCLUDE_CLIP_RECT => {
                let rect = self.rect()?;
                self.gdi.exclude_clip_rect(rect).map(drop)
            },
            record::INTERSECT_CLIP_RECT => {
                let rect = self.rect()?;
                self.gdi.intersect_clip_rect(rect).map(drop)
            },

            record::LINE_TO => {
                let (x, y) = self.yx()?;
                self.dc.line_to(x, y);
                self.gdi.line_to(x, y)
            },
            record::ARC | record::CHORD | record::PIE => {
                let (end_x, end_y) = self.yx()?;
                let (start_x, start_y) = self.yx()?;
                let rect = self.rect()?;
                let (start, end) = (Point::new(start_x, start_y), Point::new(end_x, end_y));
                match function {
                    record::ARC => self.gdi.arc(rect, start, end),
                    record::CHORD => self.gdi.chord(rect, start, end),
                    _ => self.gdi.pie(rect, start, end),
                }
            },
            record::ELLIPSE => {
                let rect = self.rect()?;
                self.gdi.ellipse(rect)
            },
            record::RECTANGLE => {
                let rect = self.rect()?;
                self.gdi.rectangle(rect)
            },
            record::ROUND_RECT => {
                let (width, height) = self.yx()?;
                let rect = self.rect()?;
                self.gdi.round_rect(rect, width, height)
            },
            record::POLYGON | record::POLYLINE => {
                let count = self.u16()?;
                let points = self.points(count as usize)?;
                if function == record::POLYGON {
                    self.gdi.polygon(&points)
                } else {
                    self.gdi.polyline(&points)
                }
            },
            record::POLYPOLYGON => {
                let count = self.u16()?;
                let mut counts = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    counts.push(self.u16()?);
                }
                let polygons = counts
                    .into_iter()
                    .map(|n| self.points(n as usize))
                    .collect::<Result<Vec<_>>>()?;
                self.gdi.poly_polygon(&polygons)
            },
            record::SET_PIXEL | record::FLOOD_FILL => {
                let color = self.u32()?;
                let (x, y) = self.yx()?;
                if function == record::SET_PIXEL {
                    self.gdi.set_pixel(x, y, color)
                } else {
                    self.gdi.flood_fill(x, y, color)
                }
            },
            record::EXT_FLOOD_FILL => {
                let mode = self.u16()?;
                let color = self.u32()?;
                let (x, y) = self.yx()?;
                self.gdi.ext_flood_fill(x, y, color, mode)
            },
            record::PAT_BLT => {
                let rop = self.u32()?;
                let area = self.area()?;
                self.gdi.pat_blt(area, rop)
            },

            record::FILL_REGION => {
                let region = self.region(function)?;
                let brush = self.brush(function)?;
                self.gdi.fill_rgn(&region, &brush)
            },
            record::FRAME_REGION => {
                let region = self.region(function)?;
                let brush = self.brush(function)?;
                let (width, height) = self.yx()?;
                self.gdi.frame_rgn(&region, &brush, width, height)
            },
            record::INVERT_REGION => {
                let region = self.region(function)?;
                self.gdi.invert_rgn(&region)
            },
            record::PAINT_REGION => {
                let region = self.region(function)?;
                self.gdi.paint_rgn(&region)
            },

            record::TEXT_OUT => {
                let count = self.u16()? as usize;
                let text = self.padded_bytes(count)?;
                let (x, y) = self.yx()?;
                self.gdi.text_out(x, y, &text)
            },
            record::EXT_TEXT_OUT => self.ext_text_out(),

            record::BIT_BLT | record::DIB_BIT_BLT => self.bit_blt(function, size),
            record::STRETCH_BLT | record::DIB_STRETCH_BLT => self.stretch_blt(function, size),
            record::STRETCH_DIB => {
                let rop = self.u32()?;
                let usage = self.u16()?;
                let src = self.area()?;
                let dest = self.area()?;
                let image = self.rest()?;
                self.gdi.stretch_dib_bits(dest, src, usage, rop, &image)
            },
            record::SET_DIB_TO_DEV => {
                let usage = self.u16()?;
                let scan_count = self.u16()?;
                let start_scan = self.u16()?;
                let (src_x, src_y) = self.yx()?;
                let dest = self.area()?;
                let image = self.rest()?;
                self.gdi.set_dib_bits_to_device(
                    dest,
                    Point::new(src_x, src_y),
                    start_scan,
                    scan_count,
                    usage,
                    &image,
                )
            },

            record::DELETE_OBJECT => {
                let index = self.u16()? as usize;
                let object = self
                    .objects
                    .remove(index)
                    .ok_or(Error::MissingObject { function, index })?;
                self.dc.release(&object);
                self.gdi.delete_object(&object)
            },
            record::SELECT_OBJECT => {
                let index = self.u16()? as usize;
                let object = self.object(function, index)?;
                self.dc.select(&object);
                self.gdi.select_object(&object)
            },
            record::CREATE_BRUSH_INDIRECT => {
                let style = self.u16()?;
                let color = self.u32()?;
                let hatch = self.i16()?;
                self.create(|gdi| gdi.create_brush_indirect(style, color, hatch))
            },
            record::CREATE_PEN_INDIRECT => {
                let style = self.u16()?;
                let width = self.i16()?;
                let _height = self.i16()?;
                let color = self.u32()?;
                self.create(|gdi| gdi.create_pen_indirect(style, width, color))
            },
            record::CREATE_FONT_INDIRECT => {
                let font = self.font()?;
                self.create(|gdi| gdi.create_font_indirect(font))
            },
            record::CREATE_PALETTE => {
                let version = self.u16()?;
                let count = self.u16()?;
                let entries = self.u32_array(count as usize)?;
                self.create(|gdi| gdi.create_palette(version, &entries))
            },
            record::CREATE_PATTERN_BRUSH => {
                let image = self.rest()?;
                self.create(|gdi| gdi.create_pattern_brush(&image))
            },
            record::DIB_CREATE_PATTERN_BRUSH => {
                let _style = self.u16()?;
                let usage = self.u16()?;
                let image = self.rest()?;
                self.create(|gdi| gdi.dib_create_pattern_brush(&image, usage))
            },
            record::CREATE_REGION => {
                // Region header; the scan list that follows is skipped
                let _next_in_scan = self.i16()?;
                let _object_type = self.i16()?;
                let _object_count = self.u32()?;
                let _region_size = self.i16()?;
                let _scan_count = self.i16()?;
                let _max_scan = self.i16()?;
                let left = self.i16()?;
                let top = self.i16()?;
                let right = self.i16()?;
                let bottom = self.i16()?;
                let rect = Rect::new(left, top, right, bottom);
                self.create(|gdi| gdi.create_rect_rgn(rect))
            },

            record::ESCAPE => {
                let data = self.rest()?;
                self.gdi.escape(&data)
            },

            _ => Err(Error::UnsupportedRecord { function, size }),
        }
    }

    fn ext_text_out(&mut self) -> Result<()> {
        let (x, y) = self.yx()?;
        let count = self.u16()? as usize;
        let options = EtoOptions::from_bits_retain(self.u16()?);
        let rect = if options.has_rect() {
            let left = self.i16()?;
            let top = self.i16()?;
            let right = self.i16()?;
            let bottom = self.i16()?;
            Some(Rect::new(left, top, right, bottom))
        } else {
            None
        };
        let text = self.padded_bytes(count)?;
        let dx = if count > 0 && self.remaining() >= count * 2 {
            let mut dx = Vec::with_capacity(count);
            for _ in 0..count {
                dx.push(self.i16()?);
            }
            Some(dx)
        } else {
            None
        };

        self.dc.ext_text_out(x, y, dx.as_deref());
        self.gdi.ext_text_out(x, y, options, rect, &text, dx.as_deref())
    }

    fn bit_blt(&mut self, function: u16, size: u32) -> Result<()> {
        let rop = self.u32()?;
        let (src_x, src_y) = self.yx()?;
        let src = Point::new(src_x, src_y);

        let (dest, image) = if function == record::DIB_BIT_BLT {
            // A zero where the height belongs is the reserved word of the
            // bitmap-less form; the real height follows.
            let height = self.i16()?;
            if height == 0 {
                let height = self.i16()?;
                let width = self.i16()?;
                let (x, y) = self.yx()?;
                (Area::new(x, y, width, height), Vec::new())
            } else {
                let width = self.i16()?;
                let (x, y) = self.yx()?;
                (Area::new(x, y, width, height), self.rest()?)
            }
        } else if size == record::blt_without_bitmap_words(function) {
            let _reserved = self.u16()?;
            (self.area()?, Vec::new())
        } else {
            (self.area()?, self.rest()?)
        };

        if function == record::DIB_BIT_BLT {
            self.gdi.dib_bit_blt(dest, src, rop, &image)
        } else {
            self.gdi.bit_blt(dest, src, rop, &image)
        }
    }

    fn stretch_blt(&mut self, function: u16, size: u32) -> Result<()> {
        let rop = self.u32()?;
        let src = self.area()?;
        let without_bitmap = size == record::blt_without_bitmap_words(function);
        if without_bitmap {
            let _reserved = self.u16()?;
        }
        let dest = self.area()?;
        let image = if without_bitmap {
            Vec::new()
        } else {
            self.rest()?
        };

        if function == record::DIB_STRETCH_BLT {
            self.gdi.dib_stretch_blt(dest, src, rop, &image)
        } else {
            self.gdi.stretch_blt(dest, src, rop, &image)
        }
    }

    fn font(&mut self) -> Result<Font> {
        let height = self.i16()?;
        let width = self.i16()?;
        let escapement = self.i16()?;
        let orientation = self.i16()?;
        let weight = self.i16()?;
        let italic = self.u8()? != 0;
        let underline = self.u8()? != 0;
        let strike_out = self.u8()? != 0;
        let charset = self.u8()?;
        let out_precision = self.u8()?;
        let clip_precision = self.u8()?;
        let quality = self.u8()?;
        let pitch_and_family = self.u8()?;
        let name_len = self.remaining().min(FACE_NAME_LEN);
        let face_name = decode_charset_string(&self.reader.read_bytes(name_len)?, charset);

        Ok(Font {
            height,
            width,
            escapement,
            orientation,
            weight,
            italic,
            underline,
            strike_out,
            charset,
            out_precision,
            clip_precision,
            quality,
            pitch_and_family,
            face_name,
        })
    }

    /// Insert a sink-created object at the first free slot of this file's table
    fn create<F>(&mut self, create: F) -> Result<()>
    where
        F: FnOnce(&mut G) -> Result<GdiObject>,
    {
        let slot = self.objects.next_free()?;
        let object = create(&mut *self.gdi)?;
        self.objects.put(slot, object)
    }

    fn object(&self, function: u16, index: usize) -> Result<GdiObject> {
        self.objects
            .get(index)
            .cloned()
            .ok_or(Error::MissingObject { function, index })
    }

    fn object_of(
        &self,
        function: u16,
        index: u16,
        expected: &'static str,
        matches: impl Fn(&GdiObject) -> bool,
    ) -> Result<GdiObject> {
        let index = index as usize;
        let object = self.object(function, index)?;
        if !matches(&object) {
            return Err(Error::ObjectKindMismatch {
                function,
                index,
                expected,
            });
        }
        Ok(object)
    }

    fn region(&mut self, function: u16) -> Result<GdiObject> {
        let index = self.u16()?;
        self.object_of(function, index, "region", |o| o.as_region().is_some())
    }

    fn brush(&mut self, function: u16) -> Result<GdiObject> {
        let index = self.u16()?;
        self.object_of(function, index, "brush", GdiObject::is_brush)
    }

    fn selected_palette(&self, function: u16) -> Result<GdiObject> {
        self.dc
            .selected_palette()
            .filter(|p| matches!(p.kind(), ObjectKind::Palette(_)))
            .cloned()
            .ok_or(Error::NoPaletteSelected { function })
    }

    /// Payload bytes of the current record not consumed yet
    #[inline]
    fn remaining(&self) -> usize {
        self.declared.saturating_sub(self.reader.count())
    }

    fn rest(&mut self) -> Result<Vec<u8>> {
        let len = self.remaining();
        Ok(self.reader.read_bytes(len)?)
    }

    fn padded_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let bytes = self.reader.read_bytes(len)?;
        if len % 2 == 1 {
            self.reader.skip(1)?;
        }
        Ok(bytes)
    }

    #[inline]
    fn u8(&mut self) -> Result<u8> {
        Ok(self.reader.read_byte()?)
    }

    #[inline]
    fn u16(&mut self) -> Result<u16> {
        Ok(self.reader.read_u16()?)
    }

    #[inline]
    fn i16(&mut self) -> Result<i16> {
        Ok(self.reader.read_i16()?)
    }

    #[inline]
    fn u32(&mut self) -> Result<u32> {
        Ok(self.reader.read_u32()?)
    }

    fn u32_array(&mut self, count: usize) -> Result<Vec<u32>> {
        let mut values = Vec::with_capacity(count.min(self.remaining() / 4));
        for _ in 0..count {
            values.push(self.u32()?);
        }
        Ok(values)
    }

    /// Read a coordinate pair stored y first; returns `(x, y)`
    fn yx(&mut self) -> Result<(i16, i16)> {
        let y = self.i16()?;
        let x = self.i16()?;
        Ok((x, y))
    }

    /// Rectangle stored as bottom, right, top, left
    fn rect(&mut self) -> Result<Rect> {
        let bottom = self.i16()?;
        let right = self.i16()?;
        let top = self.i16()?;
        let left = self.i16()?;
        Ok(Rect::new(left, top, right, bottom))
    }

    /// Area stored as height, width, y, x
    fn area(&mut self) -> Result<Area> {
        let (width, height) = self.yx()?;
        let (x, y) = self.yx()?;
        Ok(Area::new(x, y, width, height))
    }

    /// Scale factors stored as yDenom, yNum, xDenom, xNum
    fn scale_fields(&mut self) -> Result<(i16, i16, i16, i16)> {
        let yd = self.i16()?;
        let y = self.i16()?;
        let xd = self.i16()?;
        let x = self.i16()?;
        Ok((x, xd, y, yd))
    }

    fn points(&mut self, count: usize) -> Result<Vec<Point>> {
        let mut points = Vec::with_capacity(count.min(self.remaining() / 4));
        for _ in 0..count {
            let x = self.i16()?;
            let y = self.i16()?;
            points.push(Point::new(x, y));
        }
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wmf::constants::rop;
    use crate::wmf::header::WmfHeader;
    use crate::wmf::record::RecordBuilder;
    use crate::wmf::object::{Brush, Pen};
    use crate::wmf::recorder::{Operation, OperationRecorder};
    use crate::wmf::writer::WmfWriter;

    /// Standard header followed by `records` and an EOF record
    fn metafile(num_objects: u16, records: &[Vec<u8>]) -> Vec<u8> {
        let header = WmfHeader {
            num_objects,
            ..Default::default()
        };
        let mut bytes = header.to_bytes();
        for record in records {
            bytes.extend_from_slice(record);
        }
        bytes.extend_from_slice(&[3, 0, 0, 0, 0, 0]);
        bytes
    }

    fn decode(bytes: &[u8]) -> Result<Vec<Operation>> {
        let mut recorder = OperationRecorder::new();
        WmfParser::new().parse(bytes, &mut recorder)?;
        Ok(recorder.into_operations())
    }

    #[test]
    fn test_empty_source() {
        let err = decode(&[]).unwrap_err();
        assert!(err.is_empty_source(), "{err:?}");
    }

    #[test]
    fn test_truncated_source_is_decode_error() {
        let err = decode(&[1, 0]).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }), "{err:?}");

        let mut bytes = metafile(0, &[]);
        bytes.truncate(20);
        assert!(matches!(decode(&bytes), Err(Error::Decode { .. })));
    }

    #[test]
    fn test_header_guard() {
        let mut bytes = metafile(0, &[]);
        bytes[0] = 2;
        assert!(matches!(
            decode(&bytes),
            Err(Error::InvalidHeader { file_type: 2, header_size: 9 })
        ));

        let mut bytes = metafile(0, &[]);
        bytes[2] = 10;
        assert!(matches!(decode(&bytes), Err(Error::InvalidHeader { .. })));
    }

    #[test]
    fn test_unknown_record_is_fatal() {
        let mut builder = RecordBuilder::new(0x0999, 2).unwrap();
        builder.u16(0);
        let bytes = metafile(0, &[builder.finish()]);
        assert!(matches!(
            decode(&bytes),
            Err(Error::UnsupportedRecord { function: 0x0999, size: 4 })
        ));
    }

    #[test]
    fn test_trailing_bytes_skipped() {
        // SetBkMode with the optional reserved word some writers append
        let mut bk_mode = RecordBuilder::new(record::SET_BK_MODE, 4).unwrap();
        bk_mode.i16(1).u16(0);
        let mut line = RecordBuilder::new(record::LINE_TO, 4).unwrap();
        line.i16(7).i16(3);
        let bytes = metafile(0, &[bk_mode.finish(), line.finish()]);

        let ops = decode(&bytes).unwrap();
        assert_eq!(
            ops,
            vec![
                Operation::Header,
                Operation::SetBkMode(1),
                Operation::LineTo { x: 3, y: 7 },
                Operation::Footer,
            ]
        );
    }

    #[test]
    fn test_record_overrun_rejected() {
        // Declares two payload bytes but LineTo needs four
        let mut builder = RecordBuilder::new(record::LINE_TO, 2).unwrap();
        builder.i16(1);
        let bytes = metafile(0, &[builder.finish()]);
        assert!(matches!(
            decode(&bytes),
            Err(Error::InvalidRecordSize { function: record::LINE_TO, .. })
        ));
    }

    #[test]
    fn test_dib_bit_blt_sentinel() {
        // rop, ySrc, xSrc, reserved 0, height, width, yDest, xDest
        let mut builder = RecordBuilder::new(record::DIB_BIT_BLT, 18).unwrap();
        builder
            .u32(rop::BLACKNESS)
            .i16(2)
            .i16(1)
            .u16(0)
            .i16(40)
            .i16(30)
            .i16(20)
            .i16(10);
        let bytes = metafile(0, &[builder.finish()]);
        let ops = decode(&bytes).unwrap();
        assert_eq!(
            ops[1],
            Operation::DibBitBlt {
                dest: Area::new(10, 20, 30, 40),
                src: Point::new(1, 2),
                rop: rop::BLACKNESS,
                image: bytes::Bytes::new(),
            }
        );
    }

    #[test]
    fn test_delete_missing_object_rejected() {
        let mut builder = RecordBuilder::new(record::DELETE_OBJECT, 2).unwrap();
        builder.u16(0);
        let bytes = metafile(1, &[builder.finish()]);
        assert!(matches!(
            decode(&bytes),
            Err(Error::MissingObject { function: record::DELETE_OBJECT, index: 0 })
        ));
    }

    #[test]
    fn test_object_table_sized_by_header() {
        let brush = || {
            let mut builder = RecordBuilder::new(record::CREATE_BRUSH_INDIRECT, 8).unwrap();
            builder.u16(0).u32(0xFF).i16(0);
            builder.finish()
        };
        let bytes = metafile(1, &[brush(), brush()]);
        assert!(matches!(
            decode(&bytes),
            Err(Error::ObjectTableFull { capacity: 1 })
        ));
    }

    #[test]
    fn test_fill_region_with_pen_rejected() {
        let mut pen = RecordBuilder::new(record::CREATE_PEN_INDIRECT, 10).unwrap();
        pen.u16(0).i16(1).i16(0).u32(0);
        let mut region = RecordBuilder::new(record::CREATE_REGION, 34).unwrap();
        region
            .i16(0)
            .i16(6)
            .u32(0)
            .i16(34)
            .i16(1)
            .i16(2)
            .i16(0)
            .i16(0)
            .i16(10)
            .i16(10)
            .i16(2)
            .i16(0)
            .i16(10)
            .i16(0)
            .i16(10)
            .i16(2);
        let mut fill = RecordBuilder::new(record::FILL_REGION, 4).unwrap();
        fill.u16(1).u16(0);
        let bytes = metafile(2, &[pen.finish(), region.finish(), fill.finish()]);
        assert!(matches!(
            decode(&bytes),
            Err(Error::ObjectKindMismatch { expected: "brush", index: 0, .. })
        ));
    }

    fn pen_record(width: i16) -> Vec<u8> {
        let mut builder = RecordBuilder::new(record::CREATE_PEN_INDIRECT, 10).unwrap();
        builder.u16(0).i16(width).i16(0).u32(0x00FF_0000);
        builder.finish()
    }

    fn index_record(function: u16, index: u16) -> Vec<u8> {
        let mut builder = RecordBuilder::new(function, 2).unwrap();
        builder.u16(index);
        builder.finish()
    }

    fn final_dc(bytes: &[u8]) -> DeviceContext {
        let mut recorder = OperationRecorder::new();
        let (_, dc) = WmfParser::new().decode(bytes, &mut recorder).unwrap();
        dc
    }

    #[test]
    fn test_select_deleted_object_rejected() {
        let bytes = metafile(
            1,
            &[
                pen_record(3),
                index_record(record::DELETE_OBJECT, 0),
                index_record(record::SELECT_OBJECT, 0),
            ],
        );
        assert!(matches!(
            decode(&bytes),
            Err(Error::MissingObject { function: record::SELECT_OBJECT, index: 0 })
        ));
    }

    #[test]
    fn test_clip_region_index_guarded() {
        let clear = metafile(0, &[index_record(record::SELECT_CLIP_REGION, NO_REGION)]);
        assert_eq!(decode(&clear).unwrap()[1], Operation::SelectClipRgn { region: None });

        let empty_slot = metafile(1, &[index_record(record::SELECT_CLIP_REGION, 0)]);
        assert!(matches!(
            decode(&empty_slot),
            Err(Error::MissingObject { function: record::SELECT_CLIP_REGION, index: 0 })
        ));

        let pen_slot = metafile(1, &[pen_record(1), index_record(record::SELECT_CLIP_REGION, 0)]);
        assert!(matches!(
            decode(&pen_slot),
            Err(Error::ObjectKindMismatch { expected: "region", index: 0, .. })
        ));
    }

    #[test]
    fn test_deleting_selected_objects_resets_dc() {
        let mut brush = RecordBuilder::new(record::CREATE_BRUSH_INDIRECT, 8).unwrap();
        brush.u16(0).u32(0x0000_00FF).i16(0);
        let selected = [
            pen_record(7),
            index_record(record::SELECT_OBJECT, 0),
            brush.finish(),
            index_record(record::SELECT_OBJECT, 1),
        ];

        let dc = final_dc(&metafile(2, &selected));
        assert_eq!(dc.pen().width, 7);
        assert_eq!(dc.brush().color, 0x0000_00FF);

        let mut records = selected.to_vec();
        records.push(index_record(record::DELETE_OBJECT, 0));
        records.push(index_record(record::DELETE_OBJECT, 1));
        let dc = final_dc(&metafile(2, &records));
        assert_eq!(dc.pen(), Pen::DEFAULT);
        assert_eq!(dc.brush(), Brush::DEFAULT);
        assert!(dc.selected_pen().is_none());
    }

    #[test]
    fn test_deleting_selected_font_resets_dc() {
        let mut writer = WmfWriter::new();
        let font = writer
            .create_font_indirect(Font {
                face_name: "Arial".into(),
                ..Default::default()
            })
            .unwrap();
        writer.select_object(&font).unwrap();
        let selected = writer.to_bytes().unwrap();
        assert!(final_dc(&selected).font().is_some_and(|f| f.face_name == "Arial"));

        writer.delete_object(&font).unwrap();
        assert!(final_dc(&writer.to_bytes().unwrap()).font().is_none());
    }

    #[test]
    fn test_ext_text_out_updates_current_position() {
        let mut writer = WmfWriter::new();
        writer.move_to_ex(1, 1).unwrap();
        writer.set_text_align(TextAlign::UPDATECP).unwrap();
        writer
            .ext_text_out(10, 20, EtoOptions::empty(), None, b"abc", Some(&[4, 4, 4]))
            .unwrap();
        let dc = final_dc(&writer.to_bytes().unwrap());
        assert_eq!(dc.current_position(), (22, 20));

        let mut writer = WmfWriter::new();
        writer.move_to_ex(1, 1).unwrap();
        writer
            .ext_text_out(10, 20, EtoOptions::empty(), None, b"abc", Some(&[4, 4, 4]))
            .unwrap();
        assert_eq!(final_dc(&writer.to_bytes().unwrap()).current_position(), (1, 1));
    }

    #[test]
    fn test_big_endian_option() {
        let mut bytes = vec![0, 1, 0, 9, 3, 0];
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        // LineTo(y=1, x=2)
        bytes.extend_from_slice(&[0, 0, 0, 5, 0x02, 0x13, 0, 1, 0, 2]);
        bytes.extend_from_slice(&[0, 0, 0, 3, 0, 0]);

        let mut recorder = OperationRecorder::new();
        let options = ParseOptions {
            byte_order: ByteOrder::Big,
        };
        let summary = WmfParser::with_options(options)
            .parse(&bytes[..], &mut recorder)
            .unwrap();
        assert_eq!(summary.header.version, 0x0300);
        assert_eq!(summary.record_count, 1);
        assert!(
            recorder
                .operations()
                .contains(&Operation::LineTo { x: 2, y: 1 })
        );
    }
}
