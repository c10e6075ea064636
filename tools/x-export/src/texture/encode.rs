//! CLUT and pixel blob encoding

use x_common::{ColorDepth, pack_color15};

use super::quantize::IndexedImage;

/// Pack a palette to 16-bit hardware colors, zero-padded to the CLUT size.
///
/// Returns little-endian bytes (2 per entry).
pub fn encode_palette(palette: &[[u8; 4]], depth: ColorDepth, force_stp: bool) -> Vec<u8> {
    let entries = depth.palette_size();
    debug_assert!(palette.len() <= entries);

    let mut bytes = Vec::with_capacity(entries * 2);
    for color in palette {
        bytes.extend_from_slice(&pack_color15(*color, force_stp).to_le_bytes());
    }
    bytes.resize(entries * 2, 0);
    bytes
}

/// Bytes per packed row: whole 16-bit VRAM words
pub fn row_stride(width: u32, depth: ColorDepth) -> usize {
    let texels_per_word = depth.texels_per_word() as usize;
    (width as usize).div_ceil(texels_per_word) * 2
}

/// Pack palette indices row by row.
///
/// 8bpp stores one index per byte; 4bpp stores two, first pixel in the low
/// nibble. Rows are zero-padded to a whole number of 16-bit words.
pub fn pack_pixels(image: &IndexedImage, depth: ColorDepth) -> Vec<u8> {
    let stride = row_stride(image.width, depth);
    let mut bytes = vec![0u8; stride * image.height as usize];

    for (y, row) in image
        .indices
        .chunks_exact(image.width.max(1) as usize)
        .take(image.height as usize)
        .enumerate()
    {
        let out = &mut bytes[y * stride..(y + 1) * stride];
        match depth {
            ColorDepth::Bpp4 => {
                for (x, index) in row.iter().enumerate() {
                    out[x / 2] |= (index & 0xF) << ((x % 2) * 4);
                }
            }
            _ => out[..row.len()].copy_from_slice(row),
        }
    }

    bytes
}
