//! X binary resource formats
//!
//! Every resource starts with a four-character magic stored as a little-endian
//! u32 (`b"XTEX"` reads back as `'X' | 'T' << 8 | ...`). All layouts are tightly
//! packed and little-endian; each record encodes its fields explicitly rather
//! than relying on struct layout.
//!
//! All fixed-size records implement the [`BinarySerializable`] trait for
//! consistent serialization/deserialization.

pub mod bundle;
pub mod font;
pub mod model;
mod serialization;
pub mod texture;

pub use bundle::*;
pub use font::*;
pub use model::*;
pub use serialization::{BinarySerializable, write_array};
pub use texture::*;

/// Build a magic number from its four ASCII characters
pub const fn magic(tag: &[u8; 4]) -> u32 {
    u32::from_le_bytes(*tag)
}

#[inline]
pub(crate) fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

#[inline]
pub(crate) fn read_i16(bytes: &[u8], at: usize) -> i16 {
    i16::from_le_bytes([bytes[at], bytes[at + 1]])
}

#[inline]
pub(crate) fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

#[inline]
pub(crate) fn read_i32(bytes: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

#[inline]
pub(crate) fn read_u64(bytes: &[u8], at: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[at..at + 8]);
    u64::from_le_bytes(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_is_little_endian_ascii() {
        let m = magic(b"XTEX");
        assert_eq!(
            m,
            b'X' as u32 | (b'T' as u32) << 8 | (b'E' as u32) << 16 | (b'X' as u32) << 24
        );
        assert_eq!(&m.to_le_bytes(), b"XTEX");
    }
}
