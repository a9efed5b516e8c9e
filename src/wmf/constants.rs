//! WMF constants and enumerations
//!
//! Defines the record function codes, header magic numbers, pen styles,
//! brush styles, and other constants used in the Windows Metafile format.

/// Key identifying a placeable metafile header
pub const PLACEABLE_KEY: u32 = 0x9AC6CDD7;

/// Standard header type for metafiles stored in memory/on disk
pub const METAFILE_TYPE: u16 = 1;

/// Standard header size in 16-bit words
pub const HEADER_SIZE_WORDS: u16 = 9;

/// Size of the placeable header in bytes
pub const PLACEABLE_HEADER_LEN: usize = 22;

/// Size of the standard header in bytes
pub const HEADER_LEN: usize = 18;

/// Size of a record's size and function fields in bytes
pub const RECORD_HEADER_LEN: usize = 6;

/// Object index SelectClipRgn uses to clear the clipping region
pub const NO_REGION: u16 = 0xFFFF;

/// Metafile versions
pub mod version {
    /// Metafile without device-independent bitmaps
    pub const METAVERSION100: u16 = 0x0100;
    /// Metafile that may contain device-independent bitmaps
    pub const METAVERSION300: u16 = 0x0300;
}

/// WMF record function codes
pub mod record {
    pub const EOF: u16 = 0x0000;

    // State records
    pub const REALIZE_PALETTE: u16 = 0x0035;
    pub const SET_PALETTE_ENTRIES: u16 = 0x0037;
    pub const SET_BK_MODE: u16 = 0x0102;
    pub const SET_MAP_MODE: u16 = 0x0103;
    pub const SET_ROP2: u16 = 0x0104;
    pub const SET_REL_ABS: u16 = 0x0105;
    pub const SET_POLY_FILL_MODE: u16 = 0x0106;
    pub const SET_STRETCH_BLT_MODE: u16 = 0x0107;
    pub const SET_TEXT_CHAR_EXTRA: u16 = 0x0108;
    pub const RESTORE_DC: u16 = 0x0127;
    pub const RESIZE_PALETTE: u16 = 0x0139;
    pub const SET_TEXT_ALIGN: u16 = 0x012E;
    pub const SET_LAYOUT: u16 = 0x0149;
    pub const SAVE_DC: u16 = 0x001E;
    pub const SET_BK_COLOR: u16 = 0x0201;
    pub const SET_TEXT_COLOR: u16 = 0x0209;
    pub const SET_TEXT_JUSTIFICATION: u16 = 0x020A;
    pub const SET_MAPPER_FLAGS: u16 = 0x0231;
    pub const SELECT_PALETTE: u16 = 0x0234;
    pub const ANIMATE_PALETTE: u16 = 0x0436;

    // Coordinate transform records
    pub const SET_WINDOW_ORG: u16 = 0x020B;
    pub const SET_WINDOW_EXT: u16 = 0x020C;
    pub const SET_VIEWPORT_ORG: u16 = 0x020D;
    pub const SET_VIEWPORT_EXT: u16 = 0x020E;
    pub const OFFSET_WINDOW_ORG: u16 = 0x020F;
    pub const OFFSET_VIEWPORT_ORG: u16 = 0x0211;
    pub const SCALE_WINDOW_EXT: u16 = 0x0410;
    pub const SCALE_VIEWPORT_EXT: u16 = 0x0412;
    pub const MOVE_TO: u16 = 0x0214;

    // Clipping records
    pub const SELECT_CLIP_REGION: u16 = 0x012C;
    pub const OFFSET_CLIP_RGN: u16 = 0x0220;
    pub const EXCLUDE_CLIP_RECT: u16 = 0x0415;
    pub const INTERSECT_CLIP_RECT: u16 = 0x0416;

    // Drawing records
    pub const LINE_TO: u16 = 0x0213;
    pub const POLYGON: u16 = 0x0324;
    pub const POLYLINE: u16 = 0x0325;
    pub const ELLIPSE: u16 = 0x0418;
    pub const FLOOD_FILL: u16 = 0x0419;
    pub const RECTANGLE: u16 = 0x041B;
    pub const SET_PIXEL: u16 = 0x041F;
    pub const POLYPOLYGON: u16 = 0x0538;
    pub const EXT_FLOOD_FILL: u16 = 0x0548;
    pub const ROUND_RECT: u16 = 0x061C;
    pub const PAT_BLT: u16 = 0x061D;
    pub const ARC: u16 = 0x0817;
    pub const PIE: u16 = 0x081A;
    pub const CHORD: u16 = 0x0830;

    // Region records
    pub const INVERT_REGION: u16 = 0x012A;
    pub const PAINT_REGION: u16 = 0x012B;
    pub const FILL_REGION: u16 = 0x0228;
    pub const FRAME_REGION: u16 = 0x0429;

    // Text records
    pub const TEXT_OUT: u16 = 0x0521;
    pub const EXT_TEXT_OUT: u16 = 0x0A32;

    // Bitmap records
    pub const BIT_BLT: u16 = 0x0922;
    pub const STRETCH_BLT: u16 = 0x0B23;
    pub const DIB_BIT_BLT: u16 = 0x0940;
    pub const DIB_STRETCH_BLT: u16 = 0x0B41;
    pub const SET_DIB_TO_DEV: u16 = 0x0D33;
    pub const STRETCH_DIB: u16 = 0x0F43;

    // Object records
    pub const DELETE_OBJECT: u16 = 0x01F0;
    pub const SELECT_OBJECT: u16 = 0x012D;
    pub const CREATE_PALETTE: u16 = 0x00F7;
    pub const CREATE_PATTERN_BRUSH: u16 = 0x01F9;
    pub const DIB_CREATE_PATTERN_BRUSH: u16 = 0x0142;
    pub const CREATE_PEN_INDIRECT: u16 = 0x02FA;
    pub const CREATE_FONT_INDIRECT: u16 = 0x02FB;
    pub const CREATE_BRUSH_INDIRECT: u16 = 0x02FC;
    pub const CREATE_REGION: u16 = 0x06FF;

    // Escape records
    pub const ESCAPE: u16 = 0x0626;

    /// Record size in words of a bit-block transfer without bitmap payload.
    ///
    /// [MS-WMF] encodes the fixed-field size in the high byte of the function
    /// code, so `(function >> 8) + 3` words identifies the no-bitmap variant.
    #[inline]
    pub const fn blt_without_bitmap_words(function: u16) -> u32 {
        (function >> 8) as u32 + 3
    }
}

/// Pen style constants
pub mod pen {
    // Base styles (lower 4 bits)
    pub const PS_SOLID: u16 = 0;
    pub const PS_DASH: u16 = 1;
    pub const PS_DOT: u16 = 2;
    pub const PS_DASHDOT: u16 = 3;
    pub const PS_DASHDOTDOT: u16 = 4;
    pub const PS_NULL: u16 = 5;
    pub const PS_INSIDEFRAME: u16 = 6;
    pub const PS_ALTERNATE: u16 = 8;

    // End cap styles (bits 8-11)
    pub const PS_ENDCAP_ROUND: u16 = 0x0000;
    pub const PS_ENDCAP_SQUARE: u16 = 0x0100;
    pub const PS_ENDCAP_FLAT: u16 = 0x0200;

    // Join styles (bits 12-15)
    pub const PS_JOIN_ROUND: u16 = 0x0000;
    pub const PS_JOIN_BEVEL: u16 = 0x1000;
    pub const PS_JOIN_MITER: u16 = 0x2000;
}

/// Brush style constants
pub mod brush {
    pub const BS_SOLID: u16 = 0;
    pub const BS_NULL: u16 = 1;
    pub const BS_HATCHED: u16 = 2;
    pub const BS_PATTERN: u16 = 3;
    pub const BS_INDEXED: u16 = 4;
    pub const BS_DIBPATTERN: u16 = 5;
    pub const BS_DIBPATTERNPT: u16 = 6;

    // Hatch styles (for BS_HATCHED)
    pub const HS_HORIZONTAL: i16 = 0;
    pub const HS_VERTICAL: i16 = 1;
    pub const HS_FDIAGONAL: i16 = 2;
    pub const HS_BDIAGONAL: i16 = 3;
    pub const HS_CROSS: i16 = 4;
    pub const HS_DIAGCROSS: i16 = 5;
}

/// DIB color table usage
pub mod color_usage {
    pub const DIB_RGB_COLORS: u16 = 0;
    pub const DIB_PAL_COLORS: u16 = 1;
    pub const DIB_PAL_INDICES: u16 = 2;
}

/// Polygon fill modes
pub mod fill_mode {
    pub const ALTERNATE: i16 = 1;
    pub const WINDING: i16 = 2;
}

/// Background modes
pub mod bk_mode {
    pub const TRANSPARENT: i16 = 1;
    pub const OPAQUE: i16 = 2;
}

/// Mapping modes
pub mod map_mode {
    pub const MM_TEXT: i16 = 1;
    pub const MM_LOMETRIC: i16 = 2;
    pub const MM_HIMETRIC: i16 = 3;
    pub const MM_LOENGLISH: i16 = 4;
    pub const MM_HIENGLISH: i16 = 5;
    pub const MM_TWIPS: i16 = 6;
    pub const MM_ISOTROPIC: i16 = 7;
    pub const MM_ANISOTROPIC: i16 = 8;
}

/// Font weights
pub mod font_weight {
    pub const FW_DONTCARE: i16 = 0;
    pub const FW_NORMAL: i16 = 400;
    pub const FW_BOLD: i16 = 700;
}

/// Flood fill modes for ExtFloodFill
pub mod flood_fill {
    pub const FLOODFILLBORDER: u16 = 0;
    pub const FLOODFILLSURFACE: u16 = 1;
}

/// Common ternary raster operations
pub mod rop {
    pub const SRCCOPY: u32 = 0x00CC0020;
    pub const SRCPAINT: u32 = 0x00EE0086;
    pub const SRCAND: u32 = 0x008800C6;
    pub const PATCOPY: u32 = 0x00F00021;
    pub const BLACKNESS: u32 = 0x00000042;
    pub const WHITENESS: u32 = 0x00FF0062;
}

/// Region object type stored in a Region structure
pub const REGION_OBJECT_TYPE: i16 = 0x0006;
