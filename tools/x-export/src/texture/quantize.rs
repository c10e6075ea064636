//! Exact palette reduction
//!
//! Colors are never approximated: an image either fits the requested palette
//! with its exact colors or is rejected.

use hashbrown::{HashMap, HashSet};

use crate::error::ConvertError;

/// Image expressed as palette indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    pub width: u32,
    pub height: u32,
    /// Distinct RGBA colors, sorted ascending by (r, g, b, a)
    pub palette: Vec<[u8; 4]>,
    /// One palette index per pixel, row-major
    pub indices: Vec<u8>,
}

/// Reduce tightly packed RGBA8 pixels to at most `capacity` palette entries.
///
/// `capacity` must not exceed 256.
pub fn quantize(
    rgba: &[u8],
    width: u32,
    height: u32,
    capacity: usize,
) -> Result<IndexedImage, ConvertError> {
    debug_assert!(capacity <= 256);
    let pixel_count = width as usize * height as usize;
    if rgba.len() != pixel_count * 4 {
        return Err(ConvertError::malformed(
            "image data",
            format!(
                "expected {} bytes for {}x{} RGBA, got {}",
                pixel_count * 4,
                width,
                height,
                rgba.len()
            ),
        ));
    }

    let pixels = rgba.chunks_exact(4).map(|p| [p[0], p[1], p[2], p[3]]);

    let distinct: HashSet<[u8; 4]> = pixels.clone().collect();
    if distinct.len() > capacity {
        return Err(ConvertError::CapacityExceeded {
            found: distinct.len(),
            capacity,
        });
    }

    let mut palette: Vec<[u8; 4]> = distinct.into_iter().collect();
    palette.sort_unstable();

    let lookup: HashMap<[u8; 4], u8> = palette
        .iter()
        .enumerate()
        .map(|(i, color)| (*color, i as u8))
        .collect();

    let indices = pixels.map(|p| lookup[&p]).collect();

    Ok(IndexedImage {
        width,
        height,
        palette,
        indices,
    })
}
