//! Model resource serializer (.xmdl)

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;
use x_common::{
    Face, FixedVertex, MODEL_MAGIC, MODEL_MAGIC_LEGACY, XModelHeader, write_array,
};

use crate::formats::write_resource;

/// Header tag written at the start of the model resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelMagic {
    /// "XMDL"
    #[default]
    Xmdl,
    /// "MODL", for loaders that predate textured models
    Modl,
}

impl ModelMagic {
    pub fn value(self) -> u32 {
        match self {
            Self::Xmdl => MODEL_MAGIC,
            Self::Modl => MODEL_MAGIC_LEGACY,
        }
    }
}

/// Result of in-memory model conversion
#[derive(Debug, Clone)]
pub struct ConvertedModel {
    pub magic: ModelMagic,
    pub vertices: Vec<FixedVertex>,
    pub faces: Vec<Face>,
    /// Texture paths indexed by `Face::tex_id`
    pub texture_paths: Vec<String>,
    /// Embedded `.xtex` resources, in texture-id order
    pub textures: Vec<Vec<u8>>,
}

impl ConvertedModel {
    pub fn header(&self) -> XModelHeader {
        let mut header = XModelHeader::new(
            self.vertices.len() as u32,
            self.faces.len() as u32,
            self.textures.len() as u32,
        );
        header.magic = self.magic.value();
        header
    }

    /// Serialize as a complete model resource
    pub fn to_bytes(&self) -> Vec<u8> {
        let header = self.header();
        let embedded: usize = self.textures.iter().map(Vec::len).sum();
        let mut out = Vec::with_capacity(header.textures_offset() + embedded);

        out.extend_from_slice(&header.to_bytes());
        write_array(&mut out, &self.vertices);
        write_array(&mut out, &self.faces);
        for texture in &self.textures {
            out.extend_from_slice(texture);
        }
        out
    }

    /// Write the model resource to `output`
    pub fn write(&self, output: &Path) -> Result<()> {
        write_resource(output, &self.to_bytes())
    }

    pub fn textured_face_count(&self) -> usize {
        self.faces.iter().filter(|f| f.is_textured()).count()
    }

    pub fn quad_count(&self) -> usize {
        self.faces.iter().filter(|f| !f.is_triangle()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use x_common::{BinarySerializable, NO_INDEX};

    fn sample() -> ConvertedModel {
        ConvertedModel {
            magic: ModelMagic::Xmdl,
            vertices: vec![
                FixedVertex::new(48, -64, 1),
                FixedVertex::new(0, 0, 0),
                FixedVertex::new(32, 32, 32),
            ],
            faces: vec![Face {
                indices: [0, 1, 2, NO_INDEX],
                color: 0x0000_00FF,
                ..Face::default()
            }],
            texture_paths: Vec::new(),
            textures: Vec::new(),
        }
    }

    #[test]
    fn test_model_bytes() {
        let bytes = sample().to_bytes();
        assert_eq!(bytes.len(), 16 + 3 * 8 + 24);
        assert_eq!(&bytes[0..4], b"XMDL");
        assert_eq!(&bytes[4..8], &3u32.to_le_bytes());
        assert_eq!(&bytes[8..12], &1u32.to_le_bytes());
        assert_eq!(&bytes[12..16], &0u32.to_le_bytes());

        // First vertex: x, y, z, pad
        assert_eq!(&bytes[16..24], &[48, 0, 0xC0, 0xFF, 1, 0, 0, 0]);

        let faces = Face::deserialize_array(&bytes[40..], 1).unwrap();
        assert_eq!(faces[0].indices, [0, 1, 2, -1]);
        assert_eq!(faces[0].tex_id, -1);
    }

    #[test]
    fn test_face_counts() {
        let mut model = sample();
        model.faces.push(Face {
            indices: [0, 1, 2, 1],
            tex_id: 0,
            ..Face::default()
        });
        assert_eq!(model.quad_count(), 1);
        assert_eq!(model.textured_face_count(), 1);
    }

    #[test]
    fn test_legacy_magic() {
        let mut model = sample();
        model.magic = ModelMagic::Modl;
        assert_eq!(&model.to_bytes()[0..4], b"MODL");
        assert!(model.header().is_valid());
    }

    #[test]
    fn test_embedded_textures_appended() {
        let mut model = sample();
        model.textures = vec![vec![1; 40], vec![2; 36]];
        let bytes = model.to_bytes();
        let header = XModelHeader::from_bytes(&bytes).unwrap();
        assert_eq!(header.texture_count, 2);
        let offset = header.textures_offset();
        assert_eq!(bytes.len(), offset + 76);
        assert!(bytes[offset..offset + 40].iter().all(|&b| b == 1));
        assert!(bytes[offset + 40..].iter().all(|&b| b == 2));
    }

    #[test]
    fn test_write_matches_to_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.xmdl");
        let model = sample();
        model.write(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), model.to_bytes());
    }
}
