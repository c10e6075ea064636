//! XBundle archive format
//!
//! Flat archive of already-converted resources, looked up by the hash of their
//! logical name.
//!
//! # Layout
//! ```text
//! 0x00: magic u32 ("XBNL")
//! 0x04: file_count u32
//! 0x08: entries (file_count × 16 bytes: name_hash u32, length u32, offset u64)
//! var:  file contents, each padded to a 4-byte boundary
//! ```

use super::{magic, read_u32, read_u64};

/// "XBNL"
pub const BUNDLE_MAGIC: u32 = magic(b"XBNL");

/// Alignment of every file's contents inside the bundle
pub const BUNDLE_ALIGNMENT: usize = 4;

const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a hash of a logical file name
pub fn hash_name(name: &str) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in name.bytes() {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// XBundle header (8 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XBundleHeader {
    pub magic: u32,
    pub file_count: u32,
}

impl XBundleHeader {
    pub const SIZE: usize = 8;

    pub fn new(file_count: u32) -> Self {
        Self {
            magic: BUNDLE_MAGIC,
            file_count,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.magic == BUNDLE_MAGIC
    }

    /// Byte offset where file contents begin
    pub fn data_offset(&self) -> usize {
        Self::SIZE + self.file_count as usize * BundleEntry::SIZE
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.magic.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.file_count.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            magic: read_u32(bytes, 0),
            file_count: read_u32(bytes, 4),
        })
    }
}

/// File table entry (16 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleEntry {
    pub name_hash: u32,
    pub length: u32,
    pub offset: u64,
}

impl BundleEntry {
    pub const SIZE: usize = 16;

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.name_hash.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.length.to_le_bytes());
        bytes[8..16].copy_from_slice(&self.offset.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            name_hash: read_u32(bytes, 0),
            length: read_u32(bytes, 4),
            offset: read_u64(bytes, 8),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_known_values() {
        // FNV-1a reference vectors
        assert_eq!(hash_name(""), 0x811C_9DC5);
        assert_eq!(hash_name("a"), 0xE40C_292C);
        assert_eq!(hash_name("foobar"), 0xBF9C_F968);
    }

    #[test]
    fn test_entry_layout() {
        let entry = BundleEntry {
            name_hash: 0xAABB_CCDD,
            length: 5,
            offset: 0x28,
        };
        let bytes = entry.to_bytes();
        assert_eq!(&bytes[0..4], &[0xDD, 0xCC, 0xBB, 0xAA]);
        assert_eq!(&bytes[4..8], &[5, 0, 0, 0]);
        assert_eq!(&bytes[8..16], &[0x28, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(BundleEntry::from_bytes(&bytes), Some(entry));
    }

    #[test]
    fn test_header_data_offset() {
        let header = XBundleHeader::new(2);
        assert_eq!(header.data_offset(), 8 + 2 * 16);
        assert_eq!(&header.to_bytes()[0..4], b"XBNL");
    }
}
