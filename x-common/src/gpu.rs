//! Texture page and CLUT register encoding
//!
//! Replicates the bit layout of the GPU's draw-command texture page and CLUT
//! attributes. VRAM is 1024×512 16-bit texels, split into 64×256 texture pages.

/// CLUT x-origins must be a multiple of this many texels
pub const CLUT_ALIGNMENT: u16 = 16;

/// Width of the CLUT address space in texels
pub const CLUT_ADDRESS_SPACE: u32 = 1024;

/// Texture page width in 16-bit texels
pub const PAGE_WIDTH: u16 = 64;

/// Texture page height in lines
pub const PAGE_HEIGHT: u16 = 256;

/// Semitransparency blend equation selected by the page attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum BlendMode {
    /// B/2 + F/2
    #[default]
    SemiTransparent = 0,
    /// B + F
    Add = 1,
    /// B - F
    Subtract = 2,
    /// B + F/4
    Div4Add = 3,
}

/// Texel color depth selected by the page attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ColorDepth {
    Bpp4 = 0,
    Bpp8 = 1,
    Bpp16 = 2,
}

impl ColorDepth {
    /// Map a bits-per-pixel value to a depth selector
    pub fn from_bpp(bpp: u16) -> Option<Self> {
        match bpp {
            4 => Some(Self::Bpp4),
            8 => Some(Self::Bpp8),
            16 => Some(Self::Bpp16),
            _ => None,
        }
    }

    pub fn bits_per_pixel(self) -> u16 {
        match self {
            Self::Bpp4 => 4,
            Self::Bpp8 => 8,
            Self::Bpp16 => 16,
        }
    }

    /// Number of CLUT entries (0 for direct color)
    pub fn palette_size(self) -> usize {
        match self {
            Self::Bpp4 => 16,
            Self::Bpp8 => 256,
            Self::Bpp16 => 0,
        }
    }

    /// Texels addressed by one 16-bit VRAM word
    pub fn texels_per_word(self) -> u16 {
        16 / self.bits_per_pixel()
    }
}

/// Encode a texture page attribute.
///
/// `x` is in 64-texel page units, `y` in 256-line page units.
#[inline]
pub fn page_code(x: u16, y: u16, blend: BlendMode, depth: ColorDepth) -> u16 {
    (x & 0xF)
        | ((y & 0x1) << 4)
        | ((blend as u16 & 0x3) << 5)
        | ((depth as u16 & 0x3) << 7)
        | ((y & 0x2) << 10)
}

/// Encode a CLUT attribute.
///
/// `x` is in 16-texel units, `y` is the VRAM line.
#[inline]
pub fn clut_code(x: u16, y: u16) -> u16 {
    (x & 0x3F) | ((y & 0x3FF) << 6)
}
