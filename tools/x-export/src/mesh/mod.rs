//! Model converter (OBJ + MTL -> .xmdl)
//!
//! Every texture a model references must already be converted: the resolver
//! reads each `.xtex` header back for its pixel dimensions.

mod mtl;
mod obj;
mod resolve;
mod types;

pub use mtl::parse_mtl;
pub use obj::parse_obj;
pub use resolve::{
    ResolvedModel, TextureDir, TextureLookup, check_texture_stems, resolve, texture_stem, to_texel,
    z_order,
};
pub use types::{FaceRecord, Material, MaterialLibrary, ParsedMesh};

use anyhow::{Context, Result};
use std::path::Path;

use crate::model::{ConvertedModel, ModelMagic};

/// Model conversion options
#[derive(Debug, Clone, Copy)]
pub struct ModelOptions {
    /// Append the referenced `.xtex` resources after the face array
    pub embed_textures: bool,
    pub magic: ModelMagic,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            embed_textures: true,
            magic: ModelMagic::default(),
        }
    }
}

/// Convert a parsed mesh and its material library
pub fn convert_mesh(
    mesh: &ParsedMesh,
    library: &MaterialLibrary,
    lookup: &dyn TextureLookup,
    options: ModelOptions,
) -> Result<ConvertedModel> {
    let resolved = resolve(mesh, library, lookup)?;

    let textures = if options.embed_textures {
        resolved
            .textures
            .iter()
            .map(|texture| {
                lookup
                    .resource(texture)
                    .with_context(|| format!("Failed to embed texture '{}'", texture))
            })
            .collect::<Result<Vec<_>>>()?
    } else {
        Vec::new()
    };

    Ok(ConvertedModel {
        magic: options.magic,
        vertices: resolved.vertices,
        faces: resolved.faces,
        texture_paths: resolved.textures,
        textures,
    })
}

/// Convert mesh and material library source text
///
/// Any `mtllib` directive in `obj` is ignored in favor of `mtl`.
pub fn convert_obj_source(
    obj: &str,
    mtl: Option<&str>,
    lookup: &dyn TextureLookup,
    options: ModelOptions,
) -> Result<ConvertedModel> {
    let mesh = parse_obj(obj)?;
    let library = match mtl {
        Some(source) => parse_mtl(source)?,
        None => MaterialLibrary::new(),
    };
    convert_mesh(&mesh, &library, lookup, options)
}

/// Convert an OBJ file to in-memory model data
///
/// The material library named by the first `mtllib` directive is read from
/// the mesh's directory; textures are looked up in `texture_dir`.
pub fn convert_obj_to_memory(
    input: &Path,
    texture_dir: &Path,
    options: ModelOptions,
) -> Result<ConvertedModel> {
    let source = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read mesh: {:?}", input))?;
    let mesh = parse_obj(&source).with_context(|| format!("Failed to parse mesh: {:?}", input))?;

    let library = match &mesh.material_library {
        Some(name) => {
            let path = input.parent().unwrap_or(Path::new("")).join(name);
            let source = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read material library: {:?}", path))?;
            parse_mtl(&source)
                .with_context(|| format!("Failed to parse material library: {:?}", path))?
        }
        None => {
            tracing::debug!("{:?} has no material library, all faces untextured", input);
            MaterialLibrary::new()
        }
    };

    let lookup = TextureDir::new(texture_dir);
    convert_mesh(&mesh, &library, &lookup, options)
        .with_context(|| format!("Failed to convert mesh: {:?}", input))
}

/// Convert an OBJ file to a model resource
///
/// Nothing is written unless the conversion succeeds.
pub fn convert_obj(
    input: &Path,
    output: &Path,
    texture_dir: &Path,
    options: ModelOptions,
) -> Result<()> {
    let model = convert_obj_to_memory(input, texture_dir, options)?;
    model.write(output)?;

    tracing::info!(
        "Converted model: {} vertices, {} faces ({} quads, {} textured), {} textures embedded",
        model.vertices.len(),
        model.faces.len(),
        model.quad_count(),
        model.textured_face_count(),
        model.textures.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;
    use crate::texture::{TextureOptions, VramPlacement, convert_rgba_to_memory};
    use hashbrown::HashMap;

    /// Lookup backed by textures converted in memory
    struct MemoryTextures(HashMap<String, Vec<u8>>);

    impl MemoryTextures {
        fn with_texture(name: &str, width: u32, height: u32) -> Self {
            let placement = VramPlacement::new([320, 0], [0, 480], 4).unwrap();
            let rgba = [200u8, 100, 50, 255].repeat((width * height) as usize);
            let tex =
                convert_rgba_to_memory(&rgba, width, height, &placement, TextureOptions::default())
                    .unwrap();
            let mut map = HashMap::new();
            map.insert(name.to_string(), tex.to_bytes());
            Self(map)
        }
    }

    impl TextureLookup for MemoryTextures {
        fn dimensions(&self, texture: &str) -> Result<(u16, u16)> {
            let bytes = self.resource(texture)?;
            let header = x_common::XTexHeader::from_bytes(&bytes)
                .ok_or_else(|| anyhow::anyhow!("short texture"))?;
            Ok((header.info.w, header.info.h))
        }

        fn resource(&self, texture: &str) -> Result<Vec<u8>> {
            self.0
                .get(texture)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("unknown texture {}", texture))
        }
    }

    const OBJ: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
vt 0 0
vt 1 0
vt 1 1
usemtl wood
f 1/1 2/2 3/3
";

    const MTL: &str = "newmtl wood\nmap_Kd art/wood.png\n";

    #[test]
    fn test_textures_embedded_once() {
        let obj = format!("{OBJ}f 3/3 2/2 1/1\n");
        let lookup = MemoryTextures::with_texture("art/wood.png", 32, 16);
        let model =
            convert_obj_source(&obj, Some(MTL), &lookup, ModelOptions::default()).unwrap();

        assert_eq!(model.faces.len(), 2);
        assert_eq!(model.textures.len(), 1);
        assert_eq!(model.header().texture_count, 1);
        assert_eq!(model.faces[0].u, [0, 31, 31, 0]);
        assert_eq!(model.faces[0].v, [15, 15, 0, 0]);
    }

    #[test]
    fn test_embedding_disabled() {
        let lookup = MemoryTextures::with_texture("art/wood.png", 32, 16);
        let options = ModelOptions {
            embed_textures: false,
            ..ModelOptions::default()
        };
        let model = convert_obj_source(OBJ, Some(MTL), &lookup, options).unwrap();
        assert!(model.textures.is_empty());
        assert_eq!(model.texture_paths, vec!["art/wood.png".to_string()]);
        assert_eq!(model.faces[0].tex_id, 0);
    }

    #[test]
    fn test_without_material_library() {
        let lookup = MemoryTextures(HashMap::new());
        let model = convert_obj_source(OBJ, None, &lookup, ModelOptions::default()).unwrap();
        assert_eq!(model.faces[0].tex_id, -1);
        assert_eq!(model.faces[0].color, 0x808080);
    }

    #[test]
    fn test_malformed_face_classified() {
        let lookup = MemoryTextures(HashMap::new());
        let err = convert_obj_source("v 0 0 0\nf 1 1\n", None, &lookup, ModelOptions::default())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_convert_obj_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let mesh_dir = dir.path().join("meshes");
        std::fs::create_dir(&mesh_dir).unwrap();
        std::fs::write(mesh_dir.join("tri.obj"), format!("mtllib tri.mtl\n{OBJ}")).unwrap();
        std::fs::write(mesh_dir.join("tri.mtl"), MTL).unwrap();

        let input = mesh_dir.join("tri.obj");
        let output = dir.path().join("tri.xmdl");

        // Texture not converted yet
        let err = convert_obj(&input, &output, dir.path(), ModelOptions::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::DependencyMissing { .. })
        ));
        assert!(!output.exists());

        let lookup = MemoryTextures::with_texture("wood", 8, 8);
        std::fs::write(dir.path().join("wood.xtex"), lookup.resource("wood").unwrap()).unwrap();

        convert_obj(&input, &output, dir.path(), ModelOptions::default()).unwrap();
        let bytes = std::fs::read(&output).unwrap();
        let header = x_common::XModelHeader::from_bytes(&bytes).unwrap();
        assert_eq!(header.vertex_count, 3);
        assert_eq!(header.face_count, 1);
        assert_eq!(header.texture_count, 1);
    }
}
