//! Shared types and utilities for the X asset pipeline
//!
//! This crate provides the fixed binary layouts shared between:
//! - `x-export` (asset pipeline)
//! - the renderer's resource loaders, which read the same headers
//!
//! # Modules
//!
//! - [`formats`] - Binary resource layouts (.xtex, .xmdl, .xfnt, bundles)
//! - [`packing`] - Fixed-point and 15-bit color packing
//! - [`gpu`] - Texture page / CLUT register encoding

pub mod formats;
pub mod gpu;
pub mod packing;

// Re-export commonly used packing items
pub use packing::{
    BLACK_COLOR, DEFAULT_FACE_COLOR, FIXED_SCALE, LOWER_ALPHA_BOUND, SEMITRANSPARENT_BIT,
    TRANSPARENT_COLOR, UPPER_ALPHA_BOUND, channel_to_unorm5, f32_to_unorm8, fixed_to_f32,
    pack_color15, pack_diffuse_rgb, to_fixed, to_fixed_checked,
};

// Re-export register encoders
pub use gpu::{
    BlendMode, CLUT_ADDRESS_SPACE, CLUT_ALIGNMENT, ColorDepth, PAGE_HEIGHT, PAGE_WIDTH, clut_code,
    page_code,
};

// Re-export commonly used format items
pub use formats::{
    BUNDLE_ALIGNMENT, BUNDLE_MAGIC, BinarySerializable, BundleEntry, FONT_MAGIC, Face,
    FixedVertex, MODEL_MAGIC, MODEL_MAGIC_LEGACY, NO_INDEX, NO_TEXTURE, Rect8, TEXTURE_MAGIC,
    TextureInfo, XBundleHeader, XFontHeader, XModelHeader, XTexHeader, hash_name, write_array,
};
