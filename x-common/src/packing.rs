//! Vertex and color packing utilities
//!
//! Provides the conversions from authoring data to the renderer's native formats:
//! - f32 → signed 16-bit fixed point (5 fractional bits)
//! - RGBA8 → 15-bit color + semitransparency flag
//! - f32 RGB → packed 24-bit diffuse color
//!
//! Used by `x-export` (asset pipeline) and by tests that decode its output.

// ============================================================================
// Fixed Point
// ============================================================================

/// Scale applied to source coordinates before truncation (5 fractional bits)
pub const FIXED_SCALE: f32 = 32.0;

/// Convert a coordinate to fixed point, truncating toward zero.
///
/// Values outside the i16 range saturate; use [`to_fixed_checked`] to detect them.
#[inline]
pub fn to_fixed(value: f32) -> i16 {
    (value * FIXED_SCALE) as i16
}

/// Convert a coordinate to fixed point, or `None` if it does not fit in an i16.
#[inline]
pub fn to_fixed_checked(value: f32) -> Option<i16> {
    let scaled = (value * FIXED_SCALE).trunc();
    if scaled.is_nan() || scaled < i16::MIN as f32 || scaled > i16::MAX as f32 {
        return None;
    }
    Some(scaled as i16)
}

/// Convert a fixed-point value back to f32
#[inline]
pub fn fixed_to_f32(value: i16) -> f32 {
    value as f32 / FIXED_SCALE
}

// ============================================================================
// 15-bit Color
// ============================================================================

/// Alpha values below this are fully transparent
pub const LOWER_ALPHA_BOUND: u8 = 32;
/// Alpha values at or above this are fully opaque
pub const UPPER_ALPHA_BOUND: u8 = 224;

/// Hardware "transparent" sentinel
pub const TRANSPARENT_COLOR: u16 = 0x0000;
/// Opaque black remapped away from the transparent sentinel
pub const BLACK_COLOR: u16 = 0x0421;
/// Semitransparency flag (bit 15)
pub const SEMITRANSPARENT_BIT: u16 = 1 << 15;

/// Scale an 8-bit channel to 5 bits with rounding
#[inline]
pub const fn channel_to_unorm5(channel: u8) -> u16 {
    (channel as u16 * 31 + 127) / 255
}

/// Pack an RGBA8 color to the 16-bit hardware pixel format.
///
/// Layout: `r` bits 0-4, `g` bits 5-9, `b` bits 10-14, semitransparency bit 15.
///
/// - alpha < [`LOWER_ALPHA_BOUND`] → [`TRANSPARENT_COLOR`]
/// - alpha >= [`UPPER_ALPHA_BOUND`] → opaque, flag clear
/// - otherwise → opaque color bits with the flag set
///
/// `force_stp` sets the flag on every non-transparent color. Without it,
/// opaque black becomes [`BLACK_COLOR`] so it stays drawable.
pub fn pack_color15(rgba: [u8; 4], force_stp: bool) -> u16 {
    let [r, g, b, a] = rgba;
    let solid = channel_to_unorm5(r) | (channel_to_unorm5(g) << 5) | (channel_to_unorm5(b) << 10);

    if a < LOWER_ALPHA_BOUND {
        return TRANSPARENT_COLOR;
    }
    if force_stp || a < UPPER_ALPHA_BOUND {
        return solid | SEMITRANSPARENT_BIT;
    }
    if solid == TRANSPARENT_COLOR {
        BLACK_COLOR
    } else {
        solid
    }
}

// ============================================================================
// Diffuse Color
// ============================================================================

/// Default face color (neutral gray)
pub const DEFAULT_FACE_COLOR: u32 = 0x0080_8080;

/// Convert f32 to unsigned normalized 8-bit integer (truncating)
///
/// Maps f32 range [0.0, 1.0] to u8 range [0, 255].
#[inline]
pub fn f32_to_unorm8(value: f32) -> u8 {
    let clamped = value.clamp(0.0, 1.0);
    (clamped * 255.0) as u8
}

/// Pack a diffuse color into the GPU command order `0x00BBGGRR`.
#[inline]
pub fn pack_diffuse_rgb(r: f32, g: f32, b: f32) -> u32 {
    let r = f32_to_unorm8(r) as u32;
    let g = f32_to_unorm8(g) as u32;
    let b = f32_to_unorm8(b) as u32;
    (b << 16) | (g << 8) | r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_fixed_truncates() {
        assert_eq!(to_fixed(1.5), 48);
        assert_eq!(to_fixed(-2.0), -64);
        assert_eq!(to_fixed(0.03125), 1);
        // Truncation, not rounding
        assert_eq!(to_fixed(0.06), 1);
        assert_eq!(to_fixed(-0.06), -1);
    }

    #[test]
    fn test_to_fixed_checked_range() {
        assert_eq!(to_fixed_checked(1023.96875), Some(32767));
        assert_eq!(to_fixed_checked(-1024.0), Some(-32768));
        assert_eq!(to_fixed_checked(1024.0), None);
        assert_eq!(to_fixed_checked(f32::NAN), None);
    }

    #[test]
    fn test_fixed_reencode_is_stable() {
        for &p in &[0.7f32, -3.33, 12.0, 0.015, -0.99] {
            let fixed = to_fixed(p);
            let decoded = fixed_to_f32(fixed);
            assert!((decoded - p).abs() < 1.0 / FIXED_SCALE);
            assert_eq!(to_fixed(decoded), fixed);
        }
    }

    #[test]
    fn test_channel_rounding() {
        assert_eq!(channel_to_unorm5(0), 0);
        assert_eq!(channel_to_unorm5(255), 31);
        assert_eq!(channel_to_unorm5(128), 16);
        assert_eq!(channel_to_unorm5(4), 0);
        assert_eq!(channel_to_unorm5(5), 1);
    }

    #[test]
    fn test_alpha_classification() {
        assert_eq!(pack_color15([255, 0, 0, 0], false), TRANSPARENT_COLOR);
        assert_eq!(pack_color15([255, 0, 0, 31], false), TRANSPARENT_COLOR);
        assert_eq!(pack_color15([255, 0, 0, 32], false), 0x001F | SEMITRANSPARENT_BIT);
        assert_eq!(pack_color15([255, 0, 0, 223], false), 0x001F | SEMITRANSPARENT_BIT);
        assert_eq!(pack_color15([255, 0, 0, 224], false), 0x001F);
        assert_eq!(pack_color15([0, 0, 255, 255], false), 0x7C00);
    }

    #[test]
    fn test_opaque_black_is_not_transparent() {
        let packed = pack_color15([0, 0, 0, 255], false);
        assert_ne!(packed, TRANSPARENT_COLOR);
        assert_eq!(packed, BLACK_COLOR);
    }

    #[test]
    fn test_force_stp() {
        assert_eq!(pack_color15([255, 255, 255, 255], true), 0xFFFF);
        assert_eq!(pack_color15([0, 0, 0, 255], true), SEMITRANSPARENT_BIT);
        assert_eq!(pack_color15([0, 0, 0, 10], true), TRANSPARENT_COLOR);
    }

    #[test]
    fn test_diffuse_packing_order() {
        assert_eq!(pack_diffuse_rgb(1.0, 0.0, 0.0), 0x0000_00FF);
        assert_eq!(pack_diffuse_rgb(0.0, 0.0, 1.0), 0x00FF_0000);
        assert_eq!(pack_diffuse_rgb(0.5, 0.5, 0.5), 0x007F_7F7F);
        // Clamped before scaling
        assert_eq!(pack_diffuse_rgb(2.0, -1.0, 0.0), 0x0000_00FF);
    }
}
