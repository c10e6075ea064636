//! XModel binary format (.xmdl)
//!
//! Fixed-point vertex array plus per-face draw records, optionally followed by
//! the `.xtex` resources the faces reference.
//!
//! # Layout
//! ```text
//! 0x00: magic u32 ("XMDL", or legacy "MODL")
//! 0x04: vertex_count u32
//! 0x08: face_count u32
//! 0x0C: texture_count u32
//! 0x10: vertices (vertex_count × 8 bytes)
//! var:  faces (face_count × 24 bytes)
//! var:  texture resources (texture_count, each a complete .xtex)
//! ```

use super::{magic, read_i16, read_i32, read_u32};
use crate::packing::DEFAULT_FACE_COLOR;

/// "XMDL"
pub const MODEL_MAGIC: u32 = magic(b"XMDL");

/// "MODL", written by the untextured converter revision
pub const MODEL_MAGIC_LEGACY: u32 = magic(b"MODL");

/// Index slot value marking the missing 4th corner of a triangle
pub const NO_INDEX: i16 = -1;

/// Texture id of an untextured face
pub const NO_TEXTURE: i32 = -1;

/// XModel header (16 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XModelHeader {
    pub magic: u32,
    pub vertex_count: u32,
    pub face_count: u32,
    pub texture_count: u32,
}

impl XModelHeader {
    pub const SIZE: usize = 16;

    pub fn new(vertex_count: u32, face_count: u32, texture_count: u32) -> Self {
        Self {
            magic: MODEL_MAGIC,
            vertex_count,
            face_count,
            texture_count,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.magic == MODEL_MAGIC || self.magic == MODEL_MAGIC_LEGACY
    }

    /// Byte offset of the first embedded texture resource
    pub fn textures_offset(&self) -> usize {
        Self::SIZE
            + self.vertex_count as usize * FixedVertex::SIZE
            + self.face_count as usize * Face::SIZE
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.magic.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.vertex_count.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.face_count.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.texture_count.to_le_bytes());
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            magic: read_u32(bytes, 0),
            vertex_count: read_u32(bytes, 4),
            face_count: read_u32(bytes, 8),
            texture_count: read_u32(bytes, 12),
        })
    }
}

/// Fixed-point vertex (8 bytes, scale 32)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedVertex {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl FixedVertex {
    pub const SIZE: usize = 8;

    pub fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Write vertex to bytes (padding stays 0)
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..2].copy_from_slice(&self.x.to_le_bytes());
        bytes[2..4].copy_from_slice(&self.y.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.z.to_le_bytes());
        bytes
    }

    /// Read vertex from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            x: read_i16(bytes, 0),
            y: read_i16(bytes, 2),
            z: read_i16(bytes, 4),
        })
    }
}

/// Face draw record (24 bytes)
///
/// Quads store corners in "Z" order (a, b, d, c); triangles set `indices[3]`
/// to [`NO_INDEX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub indices: [i16; 4],
    /// Diffuse color, `0x00BBGGRR`
    pub color: u32,
    pub u: [u8; 4],
    pub v: [u8; 4],
    pub tex_id: i32,
}

impl Default for Face {
    fn default() -> Self {
        Self {
            indices: [0; 4],
            color: DEFAULT_FACE_COLOR,
            u: [0; 4],
            v: [0; 4],
            tex_id: NO_TEXTURE,
        }
    }
}

impl Face {
    pub const SIZE: usize = 24;

    pub fn is_triangle(&self) -> bool {
        self.indices[3] == NO_INDEX
    }

    pub fn is_textured(&self) -> bool {
        self.tex_id >= 0
    }

    /// Write face to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        for (i, index) in self.indices.iter().enumerate() {
            bytes[i * 2..i * 2 + 2].copy_from_slice(&index.to_le_bytes());
        }
        bytes[8..12].copy_from_slice(&self.color.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.u);
        bytes[16..20].copy_from_slice(&self.v);
        bytes[20..24].copy_from_slice(&self.tex_id.to_le_bytes());
        bytes
    }

    /// Read face from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let mut face = Self {
            indices: [0; 4],
            color: read_u32(bytes, 8),
            u: [0; 4],
            v: [0; 4],
            tex_id: read_i32(bytes, 20),
        };
        for i in 0..4 {
            face.indices[i] = read_i16(bytes, i * 2);
        }
        face.u.copy_from_slice(&bytes[12..16]);
        face.v.copy_from_slice(&bytes[16..20]);
        Some(face)
    }
}
