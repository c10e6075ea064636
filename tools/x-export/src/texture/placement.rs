//! VRAM placement descriptor and register encoding

use x_common::{
    BlendMode, CLUT_ADDRESS_SPACE, CLUT_ALIGNMENT, ColorDepth, PAGE_HEIGHT, PAGE_WIDTH,
    TextureInfo, clut_code, page_code,
};

use crate::error::ConvertError;

/// Where a texture and its CLUT live in VRAM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VramPlacement {
    /// Pixel data origin, in 16-bit VRAM words
    pub vram_x: u16,
    pub vram_y: u16,
    /// CLUT origin, in 16-bit VRAM words
    pub clut_x: u16,
    pub clut_y: u16,
    pub depth: ColorDepth,
}

impl VramPlacement {
    /// Build a placement for a paletted bit depth (4 or 8)
    pub fn new(
        vram: [u16; 2],
        clut: [u16; 2],
        bpp: u16,
    ) -> Result<Self, ConvertError> {
        let depth = match ColorDepth::from_bpp(bpp) {
            Some(depth @ (ColorDepth::Bpp4 | ColorDepth::Bpp8)) => depth,
            _ => return Err(ConvertError::InvalidBitDepth(bpp)),
        };
        Ok(Self {
            vram_x: vram[0],
            vram_y: vram[1],
            clut_x: clut[0],
            clut_y: clut[1],
            depth,
        })
    }

    /// Parse a descriptor: `vram_x vram_y clut_x clut_y bpp`
    ///
    /// Values are whitespace separated, decimal or `0x` hexadecimal.
    pub fn parse(text: &str) -> Result<Self, ConvertError> {
        let values = text
            .split_whitespace()
            .map(parse_number)
            .collect::<Result<Vec<u16>, _>>()?;

        match values.as_slice() {
            &[vram_x, vram_y, clut_x, clut_y, bpp] => {
                Self::new([vram_x, vram_y], [clut_x, clut_y], bpp)
            }
            _ => Err(ConvertError::malformed(
                "placement descriptor",
                format!(
                    "expected 5 values (vram_x vram_y clut_x clut_y bpp), got {}",
                    values.len()
                ),
            )),
        }
    }

    pub fn palette_size(&self) -> usize {
        self.depth.palette_size()
    }

    /// Check CLUT alignment and that the palette stays inside the CLUT space
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.clut_x % CLUT_ALIGNMENT != 0 {
            return Err(ConvertError::ClutMisaligned { x: self.clut_x });
        }
        if self.clut_x as u32 + self.palette_size() as u32 > CLUT_ADDRESS_SPACE {
            return Err(ConvertError::ClutOverflow {
                x: self.clut_x,
                entries: self.palette_size(),
            });
        }
        Ok(())
    }

    /// Texture page attribute for this placement
    pub fn page(&self) -> u16 {
        page_code(
            self.vram_x / PAGE_WIDTH,
            self.vram_y / PAGE_HEIGHT,
            BlendMode::SemiTransparent,
            self.depth,
        )
    }

    /// CLUT attribute for this placement
    pub fn clut(&self) -> u16 {
        clut_code(self.clut_x / CLUT_ALIGNMENT, self.clut_y)
    }

    /// Validate and produce the draw-command texture info for a `width`×`height` image
    pub fn encode(&self, width: u16, height: u16) -> Result<TextureInfo, ConvertError> {
        self.validate()?;
        Ok(TextureInfo {
            u: ((self.vram_x % PAGE_WIDTH) * self.depth.texels_per_word()) as u8,
            v: (self.vram_y % PAGE_HEIGHT) as u8,
            w: width,
            h: height,
            page: self.page(),
            clut: self.clut(),
            bpp: self.depth.bits_per_pixel(),
        })
    }
}

fn parse_number(token: &str) -> Result<u16, ConvertError> {
    let parsed = match token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => token.parse::<u16>(),
    };
    parsed.map_err(|e| {
        ConvertError::malformed("placement descriptor", format!("invalid value '{token}': {e}"))
    })
}
