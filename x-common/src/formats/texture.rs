//! XTexture binary format (.xtex)
//!
//! Paletted texture ready for upload: placement attributes, a 16-bit CLUT and
//! index-packed pixel rows.
//!
//! # Layout
//! ```text
//! 0x00: magic u32 ("XTEX")
//! 0x04: texinfo.u u8         (texel column inside the page)
//! 0x05: texinfo.v u8         (line inside the page)
//! 0x06: texinfo.w u16        (pixel width)
//! 0x08: texinfo.h u16        (pixel height)
//! 0x0A: texinfo.page u16     (texture page attribute)
//! 0x0C: texinfo.clut u16     (CLUT attribute)
//! 0x0E: texinfo.bpp u16      (4 or 8)
//! 0x10: vram_pos [u16; 2]
//! 0x14: clut_pos [u16; 2]
//! 0x18: clut_size u16        (palette bytes)
//! 0x1A: tex_size u16         (pixel bytes)
//! 0x1C: palette (clut_size bytes), then pixels (tex_size bytes)
//! ```

use super::{magic, read_u16, read_u32};

/// "XTEX"
pub const TEXTURE_MAGIC: u32 = magic(b"XTEX");

/// Placement and size info consumed by draw commands (12 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextureInfo {
    pub u: u8,
    pub v: u8,
    pub w: u16,
    pub h: u16,
    pub page: u16,
    pub clut: u16,
    pub bpp: u16,
}

impl TextureInfo {
    pub const SIZE: usize = 12;

    /// Write info to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0] = self.u;
        bytes[1] = self.v;
        bytes[2..4].copy_from_slice(&self.w.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.h.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.page.to_le_bytes());
        bytes[8..10].copy_from_slice(&self.clut.to_le_bytes());
        bytes[10..12].copy_from_slice(&self.bpp.to_le_bytes());
        bytes
    }

    /// Read info from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            u: bytes[0],
            v: bytes[1],
            w: read_u16(bytes, 2),
            h: read_u16(bytes, 4),
            page: read_u16(bytes, 6),
            clut: read_u16(bytes, 8),
            bpp: read_u16(bytes, 10),
        })
    }
}

/// XTexture header (28 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XTexHeader {
    pub magic: u32,
    pub info: TextureInfo,
    pub vram_pos: [u16; 2],
    pub clut_pos: [u16; 2],
    pub clut_size: u16,
    pub tex_size: u16,
}

impl XTexHeader {
    pub const SIZE: usize = 28;

    pub fn new(
        info: TextureInfo,
        vram_pos: [u16; 2],
        clut_pos: [u16; 2],
        clut_size: u16,
        tex_size: u16,
    ) -> Self {
        Self {
            magic: TEXTURE_MAGIC,
            info,
            vram_pos,
            clut_pos,
            clut_size,
            tex_size,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.magic == TEXTURE_MAGIC
    }

    /// Total resource size (header + palette + pixels)
    pub fn total_size(&self) -> usize {
        Self::SIZE + self.clut_size as usize + self.tex_size as usize
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.magic.to_le_bytes());
        bytes[4..16].copy_from_slice(&self.info.to_bytes());
        bytes[16..18].copy_from_slice(&self.vram_pos[0].to_le_bytes());
        bytes[18..20].copy_from_slice(&self.vram_pos[1].to_le_bytes());
        bytes[20..22].copy_from_slice(&self.clut_pos[0].to_le_bytes());
        bytes[22..24].copy_from_slice(&self.clut_pos[1].to_le_bytes());
        bytes[24..26].copy_from_slice(&self.clut_size.to_le_bytes());
        bytes[26..28].copy_from_slice(&self.tex_size.to_le_bytes());
        bytes
    }

    /// Read header from bytes
    ///
    /// Does not check the magic; see [`XTexHeader::is_valid`].
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            magic: read_u32(bytes, 0),
            info: TextureInfo::from_bytes(&bytes[4..16])?,
            vram_pos: [read_u16(bytes, 16), read_u16(bytes, 18)],
            clut_pos: [read_u16(bytes, 20), read_u16(bytes, 22)],
            clut_size: read_u16(bytes, 24),
            tex_size: read_u16(bytes, 26),
        })
    }
}
