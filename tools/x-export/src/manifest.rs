//! Manifest parsing and build orchestration
//!
//! Parses assets.toml and converts everything it lists. Textures are always
//! converted before models, so every `.xtex` a model reads back exists by the
//! time the model converter runs.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::bundle::{BundleFile, logical_name, write_bundle};
use crate::mesh::{ModelOptions, check_texture_stems, parse_mtl, parse_obj, texture_stem};
use crate::model::ModelMagic;
use crate::texture::{TextureOptions, VramPlacement};
use crate::{BUNDLE_EXT, FONT_EXT, MODEL_EXT, TEXTURE_EXT};

/// Root manifest structure
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub textures: BTreeMap<String, TextureEntry>,
    #[serde(default)]
    pub models: BTreeMap<String, ModelEntry>,
    #[serde(default)]
    pub fonts: BTreeMap<String, FontEntry>,
    #[serde(default)]
    pub bundle: Option<BundleConfig>,
    /// Directory relative source paths are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("assets/")
}

/// Texture source plus its VRAM placement
///
/// The entry name must match the file stem the material libraries use, since
/// models look textures up as `<stem>.xtex`.
#[derive(Debug, Deserialize)]
pub struct TextureEntry {
    pub path: PathBuf,
    pub vram: [u16; 2],
    pub clut: [u16; 2],
    #[serde(default = "default_bpp")]
    pub bpp: u16,
    #[serde(default)]
    pub force_stp: bool,
}

fn default_bpp() -> u16 {
    4
}

impl TextureEntry {
    pub fn placement(&self) -> Result<VramPlacement> {
        let placement = VramPlacement::new(self.vram, self.clut, self.bpp)?;
        placement.validate()?;
        Ok(placement)
    }

    pub fn options(&self) -> TextureOptions {
        TextureOptions {
            force_stp: self.force_stp,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ModelEntry {
    Simple(PathBuf),
    Detailed {
        path: PathBuf,
        #[serde(default = "default_embed_textures")]
        embed_textures: bool,
        #[serde(default)]
        magic: ModelMagic,
    },
}

fn default_embed_textures() -> bool {
    true
}

impl ModelEntry {
    pub fn path(&self) -> &Path {
        match self {
            ModelEntry::Simple(p) => p,
            ModelEntry::Detailed { path, .. } => path,
        }
    }

    pub fn options(&self) -> ModelOptions {
        match self {
            ModelEntry::Simple(_) => ModelOptions::default(),
            ModelEntry::Detailed {
                embed_textures,
                magic,
                ..
            } => ModelOptions {
                embed_textures: *embed_textures,
                magic: *magic,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FontEntry {
    Simple(PathBuf),
    Detailed { path: PathBuf },
}

impl FontEntry {
    pub fn path(&self) -> &Path {
        match self {
            FontEntry::Simple(p) => p,
            FontEntry::Detailed { path } => path,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BundleConfig {
    #[serde(default = "default_bundle_name")]
    pub name: String,
    /// Output-relative names to pack; every built resource when omitted
    #[serde(default)]
    pub files: Option<Vec<String>>,
}

fn default_bundle_name() -> String {
    format!("assets.{}", BUNDLE_EXT)
}

impl Manifest {
    /// Resolve a manifest-relative path
    pub fn source(&self, path: &Path) -> PathBuf {
        self.base_dir.join(path)
    }

    pub fn output_dir(&self, output_override: Option<&Path>) -> PathBuf {
        match output_override {
            Some(dir) => dir.to_path_buf(),
            None => self.source(&self.output.dir),
        }
    }
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    parse_manifest(&content, path.parent().unwrap_or(Path::new("")))
        .with_context(|| format!("Failed to parse manifest: {:?}", path))
}

/// Parse manifest text, resolving sources against `base_dir`
pub fn parse_manifest(content: &str, base_dir: &Path) -> Result<Manifest> {
    let mut manifest: Manifest = toml::from_str(content)?;
    manifest.base_dir = base_dir.to_path_buf();
    Ok(manifest)
}

/// Validate a manifest without building
pub fn validate(manifest: &Manifest) -> Result<()> {
    // Check that all source files exist
    for (name, entry) in &manifest.textures {
        let path = manifest.source(&entry.path);
        if !path.exists() {
            anyhow::bail!("Texture '{}' source not found: {:?}", name, path);
        }
        entry
            .placement()
            .with_context(|| format!("Texture '{}' has an invalid placement", name))?;
    }
    for (name, entry) in &manifest.models {
        let path = manifest.source(entry.path());
        if !path.exists() {
            anyhow::bail!("Model '{}' source not found: {:?}", name, path);
        }
        check_model_textures(manifest, name, &path)?;
    }
    for (name, entry) in &manifest.fonts {
        let path = manifest.source(entry.path());
        if !path.exists() {
            anyhow::bail!("Font '{}' source not found: {:?}", name, path);
        }
    }
    Ok(())
}

/// Every texture a model's material library names must be produced by a
/// `[textures]` entry
fn check_model_textures(manifest: &Manifest, name: &str, mesh: &Path) -> Result<()> {
    let source =
        std::fs::read_to_string(mesh).with_context(|| format!("Failed to read mesh: {:?}", mesh))?;
    let parsed = parse_obj(&source).with_context(|| format!("Failed to parse mesh: {:?}", mesh))?;
    let Some(library) = &parsed.material_library else {
        return Ok(());
    };

    let mtl_path = mesh.parent().unwrap_or(Path::new("")).join(library);
    let mtl = std::fs::read_to_string(&mtl_path)
        .with_context(|| format!("Failed to read material library: {:?}", mtl_path))?;
    let library = parse_mtl(&mtl)
        .with_context(|| format!("Failed to parse material library: {:?}", mtl_path))?;
    check_texture_stems(library.textures())
        .with_context(|| format!("Invalid material library: {:?}", mtl_path))?;

    // Entry names map onto the same `<stem>.xtex` file names as the lookup
    for texture in library.textures() {
        let stem = texture_stem(texture);
        if !manifest.textures.contains_key(&stem) {
            anyhow::bail!(
                "Model '{}' uses texture '{}' but no [textures] entry produces {}.{}",
                name,
                texture,
                stem,
                TEXTURE_EXT
            );
        }
    }
    Ok(())
}

/// Build all assets from a manifest, returning the written files
pub fn build_all(manifest: &Manifest, output_override: Option<&Path>) -> Result<Vec<PathBuf>> {
    let output_dir = manifest.output_dir(output_override);
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let mut built = Vec::new();

    // Textures first: models read their headers back
    for (name, entry) in &manifest.textures {
        let output = output_dir.join(format!("{}.{}", name, TEXTURE_EXT));
        tracing::info!("Converting texture: {} -> {:?}", name, output);
        let placement = entry
            .placement()
            .with_context(|| format!("Texture '{}' has an invalid placement", name))?;
        crate::texture::convert_image(
            &manifest.source(&entry.path),
            &output,
            &placement,
            entry.options(),
        )?;
        built.push(output);
    }

    for (name, entry) in &manifest.models {
        let output = output_dir.join(format!("{}.{}", name, MODEL_EXT));
        tracing::info!("Converting model: {} -> {:?}", name, output);
        crate::mesh::convert_obj(
            &manifest.source(entry.path()),
            &output,
            &output_dir,
            entry.options(),
        )?;
        built.push(output);
    }

    for (name, entry) in &manifest.fonts {
        let output = output_dir.join(format!("{}.{}", name, FONT_EXT));
        tracing::info!("Converting font: {} -> {:?}", name, output);
        crate::font::convert_font(&manifest.source(entry.path()), &output)?;
        built.push(output);
    }

    if let Some(bundle) = &manifest.bundle {
        let output = output_dir.join(&bundle.name);
        tracing::info!("Packing bundle -> {:?}", output);
        let names: Vec<String> = match &bundle.files {
            Some(files) => files.clone(),
            None => built
                .iter()
                .map(|path| logical_name(path, Some(&output_dir)))
                .collect::<Result<_>>()?,
        };

        let mut files = Vec::with_capacity(names.len());
        for name in names {
            let path = output_dir.join(&name);
            let data = std::fs::read(&path)
                .with_context(|| format!("Failed to read bundle input: {:?}", path))?;
            files.push(BundleFile::new(name, data));
        }
        write_bundle(&output, &files)?;
        built.push(output);
    }

    Ok(built)
}
