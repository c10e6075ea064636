//! x-export library
//!
//! Asset conversion functions for the X renderer: paletted textures with VRAM
//! placement, fixed-point models, bitmap fonts and hashed asset bundles.

pub mod bundle;
pub mod error;
pub mod font;
pub mod formats;
pub mod manifest;
pub mod mesh;
pub mod model;
pub mod texture;

/// File extension of converted textures
pub const TEXTURE_EXT: &str = "xtex";
/// File extension of converted models
pub const MODEL_EXT: &str = "xmdl";
/// File extension of converted fonts
pub const FONT_EXT: &str = "xfnt";
/// File extension of asset bundles
pub const BUNDLE_EXT: &str = "xbnl";

// Re-export packing helpers and layouts from x-common
pub use x_common::{
    ColorDepth, FIXED_SCALE, Face, FixedVertex, XFontHeader, XModelHeader, XTexHeader,
    clut_code, page_code, pack_color15, to_fixed,
};

pub use error::ConvertError;

// Re-export key types for each converter
pub use bundle::{Bundle, BundleFile, pack_bundle, read_bundle};
pub use font::{ConvertedFont, convert_font, convert_font_to_memory};
pub use mesh::{ModelOptions, TextureDir, TextureLookup, convert_obj, convert_obj_to_memory};
pub use model::{ConvertedModel, ModelMagic};
pub use texture::{
    ConvertedTexture, TextureOptions, VramPlacement, convert_image, convert_image_to_memory,
};
