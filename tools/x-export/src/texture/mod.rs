//! Texture converter (PNG/BMP/TGA -> .xtex)
//!
//! Pipeline: exact quantization → 15-bit CLUT packing → placement encoding →
//! header + CLUT + pixels.

mod encode;
mod placement;
mod quantize;

pub use encode::{encode_palette, pack_pixels, row_stride};
pub use placement::VramPlacement;
pub use quantize::{IndexedImage, quantize};

use anyhow::{Context, Result};
use std::path::Path;
use x_common::XTexHeader;

use crate::error::ConvertError;
use crate::formats::write_resource;

/// Largest width/height reachable with byte UV coordinates
pub const MAX_TEXTURE_DIMENSION: u32 = 256;

/// Texture conversion options
#[derive(Debug, Clone, Copy, Default)]
pub struct TextureOptions {
    /// Set the semitransparency flag on every non-transparent CLUT entry
    pub force_stp: bool,
}

/// Result of in-memory texture conversion
#[derive(Debug, Clone)]
pub struct ConvertedTexture {
    pub header: XTexHeader,
    /// Packed CLUT (16 or 256 entries)
    pub palette: Vec<u8>,
    /// Index-packed pixel rows
    pub pixels: Vec<u8>,
    /// Distinct colors actually used
    pub color_count: usize,
}

impl ConvertedTexture {
    /// Serialize as a complete .xtex resource
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.header.total_size());
        out.extend_from_slice(&self.header.to_bytes());
        out.extend_from_slice(&self.palette);
        out.extend_from_slice(&self.pixels);
        out
    }
}

/// Convert tightly packed RGBA8 pixels to an XTexture
pub fn convert_rgba_to_memory(
    rgba: &[u8],
    width: u32,
    height: u32,
    placement: &VramPlacement,
    options: TextureOptions,
) -> Result<ConvertedTexture, ConvertError> {
    if width > MAX_TEXTURE_DIMENSION || height > MAX_TEXTURE_DIMENSION {
        return Err(ConvertError::TextureTooLarge { width, height });
    }
    placement.validate()?;

    let image = quantize(rgba, width, height, placement.palette_size())?;
    let palette = encode_palette(&image.palette, placement.depth, options.force_stp);
    let pixels = pack_pixels(&image, placement.depth);

    let clut_size = blob_size("palette", &palette)?;
    let tex_size = blob_size("pixel data", &pixels)?;
    let info = placement.encode(width as u16, height as u16)?;

    let header = XTexHeader::new(
        info,
        [placement.vram_x, placement.vram_y],
        [placement.clut_x, placement.clut_y],
        clut_size,
        tex_size,
    );

    Ok(ConvertedTexture {
        header,
        palette,
        pixels,
        color_count: image.palette.len(),
    })
}

fn blob_size(section: &'static str, blob: &[u8]) -> Result<u16, ConvertError> {
    u16::try_from(blob.len()).map_err(|_| ConvertError::BlobTooLarge {
        section,
        bytes: blob.len(),
    })
}

/// Load and parse a placement descriptor file
pub fn load_placement(path: &Path) -> Result<VramPlacement> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read placement descriptor: {:?}", path))?;
    let placement = VramPlacement::parse(&text)
        .with_context(|| format!("Invalid placement descriptor: {:?}", path))?;
    Ok(placement)
}

/// Convert an image file to in-memory XTexture data
pub fn convert_image_to_memory(
    input: &Path,
    placement: &VramPlacement,
    options: TextureOptions,
) -> Result<ConvertedTexture> {
    let img = image::open(input).with_context(|| format!("Failed to load image: {:?}", input))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let converted = convert_rgba_to_memory(rgba.as_raw(), width, height, placement, options)
        .with_context(|| format!("Failed to convert texture: {:?}", input))?;
    Ok(converted)
}

/// Convert an image file to XTexture format
///
/// Nothing is written unless the conversion succeeds.
pub fn convert_image(
    input: &Path,
    output: &Path,
    placement: &VramPlacement,
    options: TextureOptions,
) -> Result<()> {
    let converted = convert_image_to_memory(input, placement, options)?;

    write_resource(output, &converted.to_bytes())?;

    tracing::info!(
        "Converted texture: {}x{}, {} colors, {}bpp, page=0x{:04X} clut=0x{:04X}",
        converted.header.info.w,
        converted.header.info.h,
        converted.color_count,
        converted.header.info.bpp,
        converted.header.info.page,
        converted.header.info.clut
    );

    Ok(())
}
