//! Typed conversion failures
//!
//! Converters return `anyhow::Result` with file context attached; the root cause
//! of every fatal input problem is one of these variants, so callers can
//! classify a failure with `err.downcast_ref::<ConvertError>()`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    #[error("malformed input at {record}: {reason}")]
    MalformedInput { record: String, reason: String },

    #[error("source image contains {found} unique colors (must be {capacity} or less)")]
    CapacityExceeded { found: usize, capacity: usize },

    #[error("unsupported bit depth {0} (expected 4 or 8)")]
    InvalidBitDepth(u16),

    #[error("CLUT x-origin {x} is not a multiple of 16")]
    ClutMisaligned { x: u16 },

    #[error("CLUT at x-origin {x} with {entries} entries runs past the 1024-entry CLUT space")]
    ClutOverflow { x: u16, entries: usize },

    #[error("texture is {width}x{height}, larger than the 256x256 addressable by byte UVs")]
    TextureTooLarge { width: u32, height: u32 },

    #[error("{section} of {bytes} bytes does not fit the 16-bit size field")]
    BlobTooLarge { section: &'static str, bytes: usize },

    #[error("texture '{texture}' has not been converted (expected {path:?})")]
    DependencyMissing { texture: String, path: PathBuf },

    #[error("texture resource {path:?} is not a valid .xtex file")]
    InvalidTexture { path: PathBuf },
}

impl ConvertError {
    pub(crate) fn malformed(record: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            record: record.into(),
            reason: reason.into(),
        }
    }
}
