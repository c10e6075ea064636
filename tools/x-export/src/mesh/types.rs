//! Types shared by the mesh parsers and the resolver

use hashbrown::HashMap;
use x_common::{DEFAULT_FACE_COLOR, FixedVertex, NO_TEXTURE};

/// Maximum vertex count addressable by i16 face indices
pub(crate) const MAX_VERTEX_COUNT: usize = i16::MAX as usize + 1;

/// A material from the material library
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    /// Diffuse color, `0x00BBGGRR`
    pub color: u32,
    /// Diffuse texture path as written in the library
    pub texture: Option<String>,
    /// Index into [`MaterialLibrary::textures`], or -1
    pub tex_id: i32,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: DEFAULT_FACE_COLOR,
            texture: None,
            tex_id: NO_TEXTURE,
        }
    }

    pub fn is_textured(&self) -> bool {
        self.tex_id >= 0
    }
}

/// Materials in first-seen order plus the deduplicated texture list
#[derive(Debug, Clone, Default)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
    by_name: HashMap<String, usize>,
    textures: Vec<String>,
    texture_ids: HashMap<String, i32>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a material. A repeated name keeps resolving to the first one.
    pub fn push(&mut self, material: Material) {
        let index = self.materials.len();
        if self.by_name.contains_key(&material.name) {
            tracing::warn!("Duplicate material '{}', keeping the first definition", material.name);
        } else {
            self.by_name.insert(material.name.clone(), index);
        }
        self.materials.push(material);
    }

    /// Register a texture path, returning its id (first-seen order, deduplicated)
    pub fn texture_id(&mut self, path: &str) -> i32 {
        if let Some(&id) = self.texture_ids.get(path) {
            return id;
        }
        let id = self.textures.len() as i32;
        self.textures.push(path.to_string());
        self.texture_ids.insert(path.to_string(), id);
        id
    }

    pub fn get(&self, name: &str) -> Option<&Material> {
        self.by_name.get(name).map(|&i| &self.materials[i])
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Texture paths indexed by texture id
    pub fn textures(&self) -> &[String] {
        &self.textures
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// One face record as written in the mesh source (0-based indices)
#[derive(Debug, Clone, PartialEq)]
pub struct FaceRecord {
    /// 1-based source line, for error messages
    pub line: usize,
    /// Vertex indices in source corner order (3 or 4)
    pub vertices: Vec<usize>,
    /// UV indices per corner, when the record has them
    pub uvs: Option<Vec<usize>>,
    /// Active `usemtl` name
    pub material: Option<String>,
}

/// Parsed mesh source, before material and texture resolution
#[derive(Debug, Clone, Default)]
pub struct ParsedMesh {
    pub vertices: Vec<FixedVertex>,
    /// UVs with the V axis already flipped to top-left origin
    pub uvs: Vec<[f32; 2]>,
    pub faces: Vec<FaceRecord>,
    /// First `mtllib` reference, if any
    pub material_library: Option<String>,
}
