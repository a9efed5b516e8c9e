// Device Context (DC) state for WMF decoding and encoding
//
// Tracks the minimal interpreter state a record stream depends on: the
// window/viewport mapping, the current position, text alignment and the
// selected objects. Setters return the value they replaced.

use super::constants::brush::{BS_DIBPATTERN, BS_PATTERN};
use super::gdi::TextAlign;
use super::object::{Brush, Font, GdiObject, ObjectKind, Pen};

/// Origin, extent and accumulated scale of the window or the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mapping {
    pub origin: (i32, i32),
    pub extent: (i32, i32),
    /// Product of every `Scale*ExtEx` factor since the extent was last set
    pub scale: (f64, f64),
}

impl Default for Mapping {
    fn default() -> Self {
        Self {
            origin: (0, 0),
            extent: (1, 1),
            scale: (1.0, 1.0),
        }
    }
}

impl Mapping {
    /// Extent with the accumulated scale applied, rounded to whole units
    pub fn scaled_extent(&self) -> (i32, i32) {
        (
            (self.extent.0 as f64 * self.scale.0).round() as i32,
            (self.extent.1 as f64 * self.scale.1).round() as i32,
        )
    }

    fn set_origin(&mut self, x: i32, y: i32) -> (i32, i32) {
        std::mem::replace(&mut self.origin, (x, y))
    }

    fn offset_origin(&mut self, dx: i32, dy: i32) -> (i32, i32) {
        let old = self.origin;
        self.origin = (old.0.saturating_add(dx), old.1.saturating_add(dy));
        old
    }

    fn set_extent(&mut self, width: i32, height: i32) -> (i32, i32) {
        let old = self.scaled_extent();
        self.extent = (width, height);
        self.scale = (1.0, 1.0);
        old
    }

    fn scale_extent(&mut self, x: i16, xd: i16, y: i16, yd: i16) -> (i32, i32) {
        let old = self.scaled_extent();
        // A zero denominator makes GDI reject the call; leave the scale alone
        if xd != 0 && yd != 0 {
            self.scale.0 *= x as f64 / xd as f64;
            self.scale.1 *= y as f64 / yd as f64;
        }
        old
    }
}

/// Device context
#[derive(Debug, Clone, Default)]
pub struct DeviceContext {
    window: Mapping,
    viewport: Mapping,
    current: (i32, i32),
    text_align: TextAlign,
    brush: Option<GdiObject>,
    pen: Option<GdiObject>,
    font: Option<GdiObject>,
    palette: Option<GdiObject>,
}

impl DeviceContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(&self) -> &Mapping {
        &self.window
    }

    pub fn viewport(&self) -> &Mapping {
        &self.viewport
    }

    pub fn current_position(&self) -> (i32, i32) {
        self.current
    }

    pub fn text_align(&self) -> TextAlign {
        self.text_align
    }

    pub fn set_window_org(&mut self, x: i16, y: i16) -> (i32, i32) {
        self.window.set_origin(x as i32, y as i32)
    }

    pub fn set_window_ext(&mut self, width: i16, height: i16) -> (i32, i32) {
        self.window.set_extent(width as i32, height as i32)
    }

    pub fn offset_window_org(&mut self, dx: i16, dy: i16) -> (i32, i32) {
        self.window.offset_origin(dx as i32, dy as i32)
    }

    pub fn scale_window_ext(&mut self, x: i16, xd: i16, y: i16, yd: i16) -> (i32, i32) {
        self.window.scale_extent(x, xd, y, yd)
    }

    pub fn set_viewport_org(&mut self, x: i16, y: i16) -> (i32, i32) {
        self.viewport.set_origin(x as i32, y as i32)
    }

    pub fn set_viewport_ext(&mut self, width: i16, height: i16) -> (i32, i32) {
        self.viewport.set_extent(width as i32, height as i32)
    }

    pub fn offset_viewport_org(&mut self, dx: i16, dy: i16) -> (i32, i32) {
        self.viewport.offset_origin(dx as i32, dy as i32)
    }

    pub fn scale_viewport_ext(&mut self, x: i16, xd: i16, y: i16, yd: i16) -> (i32, i32) {
        self.viewport.scale_extent(x, xd, y, yd)
    }

    /// Move the current position and return the previous one
    pub fn move_to(&mut self, x: i16, y: i16) -> (i32, i32) {
        std::mem::replace(&mut self.current, (x as i32, y as i32))
    }

    /// A line always ends at the new current position
    pub fn line_to(&mut self, x: i16, y: i16) {
        self.current = (x as i32, y as i32);
    }

    pub fn set_text_align(&mut self, align: TextAlign) -> TextAlign {
        std::mem::replace(&mut self.text_align, align)
    }

    /// Map a logical point through the window and viewport to device space
    pub fn logical_to_device(&self, x: i32, y: i32) -> (f64, f64) {
        let map = |value: i32, window: (i32, i32, f64), viewport: (i32, i32, f64)| {
            let (w_org, w_ext, w_scale) = window;
            let (v_org, v_ext, v_scale) = viewport;
            let w_ext = w_ext as f64 * w_scale;
            let v_ext = v_ext as f64 * v_scale;
            let factor = if w_ext == 0.0 { 1.0 } else { v_ext / w_ext };
            (value - w_org) as f64 * factor + v_org as f64
        };
        let (w, v) = (&self.window, &self.viewport);
        (
            map(
                x,
                (w.origin.0, w.extent.0, w.scale.0),
                (v.origin.0, v.extent.0, v.scale.0),
            ),
            map(
                y,
                (w.origin.1, w.extent.1, w.scale.1),
                (v.origin.1, v.extent.1, v.scale.1),
            ),
        )
    }

    /// Make an object current and return the one it replaced.
    ///
    /// Palettes are selected with [`select_palette`](Self::select_palette)
    /// and regions only affect clipping, so neither is tracked here.
    pub fn select(&mut self, object: &GdiObject) -> Option<GdiObject> {
        let slot = match object.kind() {
            ObjectKind::Brush(_) | ObjectKind::PatternBrush(_) => &mut self.brush,
            ObjectKind::Pen(_) => &mut self.pen,
            ObjectKind::Font(_) => &mut self.font,
            ObjectKind::Palette(_) | ObjectKind::Region(_) => return None,
        };
        slot.replace(object.clone())
    }

    pub fn select_palette(&mut self, palette: &GdiObject) -> Option<GdiObject> {
        self.palette.replace(palette.clone())
    }

    /// Drop every reference to a deleted object, falling back to the stock
    /// object of that kind
    pub fn release(&mut self, object: &GdiObject) {
        for slot in [
            &mut self.brush,
            &mut self.pen,
            &mut self.font,
            &mut self.palette,
        ] {
            if slot.as_ref().is_some_and(|held| held.id() == object.id()) {
                *slot = None;
            }
        }
    }

    pub fn selected_brush(&self) -> Option<&GdiObject> {
        self.brush.as_ref()
    }

    pub fn selected_pen(&self) -> Option<&GdiObject> {
        self.pen.as_ref()
    }

    pub fn selected_palette(&self) -> Option<&GdiObject> {
        self.palette.as_ref()
    }

    /// Logical brush in effect; pattern brushes report their pattern style
    pub fn brush(&self) -> Brush {
        match self.brush.as_ref().map(GdiObject::kind) {
            Some(ObjectKind::Brush(brush)) => *brush,
            Some(ObjectKind::PatternBrush(pattern)) => Brush {
                style: if pattern.usage.is_some() {
                    BS_DIBPATTERN
                } else {
                    BS_PATTERN
                },
                color: 0,
                hatch: 0,
            },
            _ => Brush::DEFAULT,
        }
    }

    pub fn pen(&self) -> Pen {
        self.pen
            .as_ref()
            .and_then(GdiObject::as_pen)
            .copied()
            .unwrap_or(Pen::DEFAULT)
    }

    pub fn font(&self) -> Option<&Font> {
        self.font.as_ref().and_then(GdiObject::as_font)
    }

    /// Apply an ExtTextOut with per-character advances.
    ///
    /// Returns the anchor shifted for right or centered alignment and, with
    /// `TA_UPDATECP`, moves the current position to the end of the run.
    /// Vertical fonts and runs without advances leave everything untouched.
    pub fn ext_text_out(&mut self, x: i16, y: i16, dx: Option<&[i16]>) -> (i32, i32) {
        let (mut x, y) = (x as i32, y as i32);
        let Some(&last) = dx.and_then(<[i16]>::last) else {
            return (x, y);
        };
        if self.font().is_some_and(Font::is_vertical)
            || !self
                .text_align
                .intersects(TextAlign::RIGHT | TextAlign::UPDATECP)
        {
            return (x, y);
        }

        let total: i32 = dx.unwrap_or_default().iter().map(|&d| d as i32).sum();
        let run = total - last as i32;
        if self.text_align.is_center() {
            x -= run / 2;
        } else if self.text_align.is_right() {
            x -= run;
        }
        if self.text_align.updates_cp() {
            self.current = (x.saturating_add(total), y);
        }
        (x, y)
    }
}
