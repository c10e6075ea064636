//! XFont binary format (.xfnt)
//!
//! # Layout
//! ```text
//! 0x00: magic u32 ("XFNT")
//! 0x04: first_char u8
//! 0x05: space_width u8
//! 0x06: tab_width u8
//! 0x07: line_height u8
//! 0x08: char_count u8
//! 0x09: padding (3 bytes)
//! 0x0C: glyph rects (char_count × 4 bytes: x, y, w, h)
//! ```

use super::{magic, read_u32};

/// "XFNT"
pub const FONT_MAGIC: u32 = magic(b"XFNT");

/// XFont header (12 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XFontHeader {
    pub magic: u32,
    pub first_char: u8,
    pub space_width: u8,
    pub tab_width: u8,
    pub line_height: u8,
    pub char_count: u8,
}

impl XFontHeader {
    pub const SIZE: usize = 12;

    pub fn new(
        first_char: u8,
        space_width: u8,
        tab_width: u8,
        line_height: u8,
        char_count: u8,
    ) -> Self {
        Self {
            magic: FONT_MAGIC,
            first_char,
            space_width,
            tab_width,
            line_height,
            char_count,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.magic == FONT_MAGIC
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.magic.to_le_bytes());
        bytes[4] = self.first_char;
        bytes[5] = self.space_width;
        bytes[6] = self.tab_width;
        bytes[7] = self.line_height;
        bytes[8] = self.char_count;
        // padding bytes stay 0
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            magic: read_u32(bytes, 0),
            first_char: bytes[4],
            space_width: bytes[5],
            tab_width: bytes[6],
            line_height: bytes[7],
            char_count: bytes[8],
        })
    }
}

/// Glyph rectangle inside the font page (4 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect8 {
    pub x: u8,
    pub y: u8,
    pub w: u8,
    pub h: u8,
}

impl Rect8 {
    pub const SIZE: usize = 4;

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        [self.x, self.y, self.w, self.h]
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [x, y, w, h, ..] => Some(Self {
                x: *x,
                y: *y,
                w: *w,
                h: *h,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let bytes = XFontHeader::new(b' ', 4, 16, 10, 95).to_bytes();
        assert_eq!(&bytes[0..4], b"XFNT");
        assert_eq!(&bytes[4..9], &[b' ', 4, 16, 10, 95]);
        assert_eq!(&bytes[9..12], &[0, 0, 0]);
    }

    #[test]
    fn test_header_roundtrip() {
        let header = XFontHeader::new(33, 3, 12, 8, 2);
        let parsed = XFontHeader::from_bytes(&header.to_bytes()).unwrap();
        assert_eq!(parsed, header);
        assert!(parsed.is_valid());
    }

    #[test]
    fn test_rect_too_short() {
        assert!(Rect8::from_bytes(&[1, 2, 3]).is_none());
        assert_eq!(
            Rect8::from_bytes(&[1, 2, 3, 4]),
            Some(Rect8 { x: 1, y: 2, w: 3, h: 4 })
        );
    }
}
