//! Material binding and UV-to-texel resolution
//!
//! UVs can only be turned into byte texel coordinates once the bound texture
//! has been converted, so the resolver reads texture dimensions through a
//! [`TextureLookup`] instead of touching the file system directly.

use anyhow::{Context, Result};
use hashbrown::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use x_common::{Face, FixedVertex, NO_INDEX, XTexHeader};

use super::types::{FaceRecord, MaterialLibrary, ParsedMesh};
use crate::error::ConvertError;

/// Read-only access to already-converted textures
pub trait TextureLookup {
    /// Pixel width and height of the converted texture for `texture`
    fn dimensions(&self, texture: &str) -> Result<(u16, u16)>;

    /// Complete `.xtex` resource bytes for `texture`
    fn resource(&self, texture: &str) -> Result<Vec<u8>>;
}

/// Looks up `<root>/<file-stem>.xtex` for each texture path
#[derive(Debug, Clone)]
pub struct TextureDir {
    root: PathBuf,
}

impl TextureDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resource path for a texture as written in the material library
    pub fn path_for(&self, texture: &str) -> PathBuf {
        self.root.join(format!("{}.xtex", texture_stem(texture)))
    }

    fn load(&self, texture: &str) -> Result<(XTexHeader, Vec<u8>)> {
        let path = self.path_for(texture);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConvertError::DependencyMissing {
                    texture: texture.to_string(),
                    path,
                }
                .into());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read texture: {:?}", path));
            }
        };

        match XTexHeader::from_bytes(&bytes) {
            Some(header) if header.is_valid() && bytes.len() >= header.total_size() => {
                Ok((header, bytes))
            }
            _ => Err(ConvertError::InvalidTexture { path }.into()),
        }
    }
}

impl TextureLookup for TextureDir {
    fn dimensions(&self, texture: &str) -> Result<(u16, u16)> {
        let (header, _) = self.load(texture)?;
        Ok((header.info.w, header.info.h))
    }

    fn resource(&self, texture: &str) -> Result<Vec<u8>> {
        let (_, bytes) = self.load(texture)?;
        Ok(bytes)
    }
}

/// File stem of a texture path as written in the material library
pub fn texture_stem(texture: &str) -> String {
    // Libraries authored on Windows use backslashes
    let file = texture.rsplit(['/', '\\']).next().unwrap_or(texture);
    Path::new(file)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string())
}

/// Reject libraries where two textures map onto the same converted resource
pub fn check_texture_stems(textures: &[String]) -> Result<(), ConvertError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for texture in textures {
        if let Some(first) = seen.insert(texture_stem(texture), texture) {
            return Err(ConvertError::malformed(
                format!("map_Kd `{}`", texture),
                format!("texture file name collides with `{}`", first),
            ));
        }
    }
    Ok(())
}

/// Geometry with every face bound to its material
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedModel {
    pub vertices: Vec<FixedVertex>,
    pub faces: Vec<Face>,
    /// Texture paths indexed by `Face::tex_id`
    pub textures: Vec<String>,
}

/// Reorder quad corners (a, b, c, d) to (a, b, d, c); triangles are untouched
pub fn z_order<T: Copy>(corners: &[T]) -> Vec<T> {
    match *corners {
        [a, b, c, d] => vec![a, b, d, c],
        _ => corners.to_vec(),
    }
}

/// Scale a normalized coordinate to a texel index on an axis of `size` texels
pub fn to_texel(coord: f32, size: u16) -> u8 {
    let max = size.saturating_sub(1) as f32;
    (coord.clamp(0.0, 1.0) * max).floor() as u8
}

/// Bind materials and convert UVs to texel space
pub fn resolve(
    mesh: &ParsedMesh,
    library: &MaterialLibrary,
    lookup: &dyn TextureLookup,
) -> Result<ResolvedModel> {
    let textures = library.textures();
    check_texture_stems(textures)?;
    let mut dimensions: HashMap<i32, (u16, u16)> = HashMap::new();
    let mut unresolved: HashSet<&str> = HashSet::new();
    let mut faces = Vec::with_capacity(mesh.faces.len());

    for record in &mesh.faces {
        let mut face = Face {
            indices: [NO_INDEX; 4],
            ..Face::default()
        };
        for (slot, &index) in face.indices.iter_mut().zip(&z_order(&record.vertices)) {
            // Bounded by the vertex limit checked while parsing
            *slot = index as i16;
        }

        let material = match record.material.as_deref() {
            Some(name) => {
                let found = library.get(name);
                if found.is_none() && unresolved.insert(name) {
                    tracing::warn!(
                        "Material '{}' is not defined, faces using it are untextured",
                        name
                    );
                }
                found
            }
            None => None,
        };

        if let Some(material) = material {
            face.color = material.color;
            face.tex_id = material.tex_id;
        }

        if face.tex_id >= 0 {
            let texture = &textures[face.tex_id as usize];
            let (width, height) = match dimensions.get(&face.tex_id) {
                Some(&dims) => dims,
                None => {
                    let dims = lookup.dimensions(texture).with_context(|| {
                        format!("Failed to resolve texture '{}' for line {}", texture, record.line)
                    })?;
                    tracing::debug!("Texture {} is {}x{}", texture, dims.0, dims.1);
                    dimensions.insert(face.tex_id, dims);
                    dims
                }
            };
            bind_uvs(&mut face, record, &mesh.uvs, width, height)?;
        }

        faces.push(face);
    }

    Ok(ResolvedModel {
        vertices: mesh.vertices.clone(),
        faces,
        textures: textures.to_vec(),
    })
}

fn bind_uvs(
    face: &mut Face,
    record: &FaceRecord,
    uvs: &[[f32; 2]],
    width: u16,
    height: u16,
) -> Result<(), ConvertError> {
    let corners = record.uvs.as_deref().ok_or_else(|| {
        ConvertError::malformed(
            format!("line {}", record.line),
            "textured face has no texture coordinates",
        )
    })?;

    // Triangles leave the 4th slot at 0
    for (slot, &index) in z_order(corners).iter().enumerate() {
        let [u, v] = uvs[index];
        face.u[slot] = to_texel(u, width);
        face.v[slot] = to_texel(v, height);
    }
    Ok(())
}
