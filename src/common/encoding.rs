//! Character encoding utilities for metafile text.
//!
//! WMF stores font face names and text runs as 8-bit strings whose meaning
//! depends on the font's `lfCharSet` byte. This module maps that byte to a
//! Windows codepage and the codepage to an `encoding_rs` encoding, so face
//! names can be decoded to UTF-8 and encoded back symmetrically.

use encoding_rs::Encoding;

/// `lfCharSet` values from [MS-WMF] 2.1.1.5 CharacterSet
pub mod charset {
    pub const ANSI: u8 = 0;
    pub const DEFAULT: u8 = 1;
    pub const SYMBOL: u8 = 2;
    pub const MAC: u8 = 77;
    pub const SHIFTJIS: u8 = 128;
    pub const HANGUL: u8 = 129;
    pub const JOHAB: u8 = 130;
    pub const GB2312: u8 = 134;
    pub const CHINESEBIG5: u8 = 136;
    pub const GREEK: u8 = 161;
    pub const TURKISH: u8 = 162;
    pub const VIETNAMESE: u8 = 163;
    pub const HEBREW: u8 = 177;
    pub const ARABIC: u8 = 178;
    pub const BALTIC: u8 = 186;
    pub const RUSSIAN: u8 = 204;
    pub const THAI: u8 = 222;
    pub const EASTEUROPE: u8 = 238;
    pub const OEM: u8 = 255;
}

/// Map a font charset to the Windows codepage that encodes it.
///
/// Unknown charsets (and `SYMBOL`/`DEFAULT`) fall back to Windows-1252.
///
/// # Examples
/// ```
/// use wmf_codec::common::encoding::{charset, charset_to_codepage};
///
/// assert_eq!(charset_to_codepage(charset::SHIFTJIS), 932);
/// assert_eq!(charset_to_codepage(charset::ANSI), 1252);
/// ```
#[inline]
pub const fn charset_to_codepage(charset: u8) -> u32 {
    match charset {
        charset::MAC => 10000,
        charset::SHIFTJIS => 932,
        charset::HANGUL => 949,
        charset::JOHAB => 1361,
        charset::GB2312 => 936,
        charset::CHINESEBIG5 => 950,
        charset::GREEK => 1253,
        charset::TURKISH => 1254,
        charset::VIETNAMESE => 1258,
        charset::HEBREW => 1255,
        charset::ARABIC => 1256,
        charset::BALTIC => 1257,
        charset::RUSSIAN => 1251,
        charset::THAI => 874,
        charset::EASTEUROPE => 1250,
        charset::OEM => 437,
        _ => 1252,
    }
}

/// Map Windows codepage identifier to encoding_rs Encoding.
///
/// This function provides a mapping from the codepages reachable through a
/// font charset to the corresponding `encoding_rs` encodings.
///
/// # Examples
/// ```
/// use wmf_codec::common::encoding::codepage_to_encoding;
///
/// let encoding = codepage_to_encoding(936).unwrap();
/// assert_eq!(encoding.name(), "GBK");
/// ```
#[inline]
pub fn codepage_to_encoding(codepage: u32) -> Option<&'static Encoding> {
    match codepage {
        437 => Some(encoding_rs::IBM866), // IBM866 (close approximation to CP437)
        874 => Some(encoding_rs::WINDOWS_874),
        1250 => Some(encoding_rs::WINDOWS_1250),
        1251 => Some(encoding_rs::WINDOWS_1251),
        1252 => Some(encoding_rs::WINDOWS_1252),
        1253 => Some(encoding_rs::WINDOWS_1253),
        1254 => Some(encoding_rs::WINDOWS_1254),
        1255 => Some(encoding_rs::WINDOWS_1255),
        1256 => Some(encoding_rs::WINDOWS_1256),
        1257 => Some(encoding_rs::WINDOWS_1257),
        1258 => Some(encoding_rs::WINDOWS_1258),
        932 => Some(encoding_rs::SHIFT_JIS),
        936 => Some(encoding_rs::GBK),
        949 => Some(encoding_rs::EUC_KR),
        950 => Some(encoding_rs::BIG5),
        1361 => Some(encoding_rs::EUC_KR), // Johab has no encoding_rs counterpart
        10000 => Some(encoding_rs::MACINTOSH),
        _ => None,
    }
}

/// Encoding used for strings written with the given font charset
#[inline]
pub fn charset_encoding(charset: u8) -> &'static Encoding {
    codepage_to_encoding(charset_to_codepage(charset)).unwrap_or(encoding_rs::WINDOWS_1252)
}

/// Strip everything from the first null terminator on.
///
/// This is a zero-copy operation that returns a slice view.
#[inline]
pub fn strip_null_terminators(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    &bytes[..end]
}

/// Decode a null-terminated 8-bit string using the given font charset.
///
/// # Examples
/// ```
/// use wmf_codec::common::encoding::{charset, decode_charset_string};
///
/// assert_eq!(decode_charset_string(b"Arial\0\0", charset::ANSI), "Arial");
/// ```
pub fn decode_charset_string(bytes: &[u8], charset: u8) -> String {
    let bytes = strip_null_terminators(bytes);
    if bytes.is_empty() {
        return String::new();
    }
    charset_encoding(charset).decode_without_bom_handling(bytes).0.into_owned()
}

/// Encode a string with the given font charset (no terminator appended).
///
/// Characters the codepage cannot represent are replaced the way
/// `encoding_rs` does for legacy encoders (numeric character references).
pub fn encode_charset_string(text: &str, charset: u8) -> Vec<u8> {
    charset_encoding(charset).encode(text).0.into_owned()
}

/// Encode the longest prefix of `text` that fits in `max_len` bytes.
///
/// The cut always falls between characters, so a multi-byte codepage never
/// ends with half of a lead/trail byte pair.
///
/// # Examples
/// ```
/// use wmf_codec::common::encoding::{charset, encode_charset_prefix};
///
/// assert_eq!(encode_charset_prefix("あいう", charset::SHIFTJIS, 5).len(), 4);
/// assert_eq!(encode_charset_prefix("Arial", charset::ANSI, 3), b"Ari");
/// ```
pub fn encode_charset_prefix(text: &str, charset: u8, max_len: usize) -> Vec<u8> {
    let mut end = text.len();
    loop {
        let encoded = encode_charset_string(&text[..end], charset);
        if encoded.len() <= max_len {
            return encoded;
        }
        end = text[..end].char_indices().next_back().map_or(0, |(i, _)| i);
    }
}
