//! Font converter (sprite-sheet JSON -> .xfnt)

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;
use x_common::{Rect8, XFontHeader, write_array};

use crate::formats::write_resource;

/// Glyph sheet description as exported by the sprite packer
#[derive(Debug, Clone, Deserialize)]
pub struct FontDescription {
    pub settings: FontSettings,
    pub sprites: Vec<GlyphSprite>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct FontSettings {
    pub space_width: u8,
    pub tab_width: u8,
    pub line_height: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GlyphSprite {
    #[serde(rename = "char")]
    pub character: String,
    /// x, y, w, h in texels
    pub rect: [u8; 4],
}

/// Result of in-memory font conversion
#[derive(Debug, Clone)]
pub struct ConvertedFont {
    pub header: XFontHeader,
    pub rects: Vec<Rect8>,
}

impl ConvertedFont {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(XFontHeader::SIZE + self.rects.len() * Rect8::SIZE);
        out.extend_from_slice(&self.header.to_bytes());
        write_array(&mut out, &self.rects);
        out
    }
}

/// Build the font resource from a parsed description
///
/// Glyphs are consecutive character codes starting at the first sprite's
/// character.
pub fn convert_description(desc: &FontDescription) -> Result<ConvertedFont> {
    let Some(first) = desc.sprites.first() else {
        bail!("Font has no sprites");
    };
    let char_count = u8::try_from(desc.sprites.len())
        .with_context(|| format!("Font has {} sprites (max 255)", desc.sprites.len()))?;

    let first_char = match first.character.as_bytes() {
        [code] => *code,
        _ => bail!(
            "First sprite character {:?} is not a single-byte character",
            first.character
        ),
    };

    let header = XFontHeader::new(
        first_char,
        desc.settings.space_width,
        desc.settings.tab_width,
        desc.settings.line_height,
        char_count,
    );
    let rects = desc
        .sprites
        .iter()
        .map(|s| {
            let [x, y, w, h] = s.rect;
            Rect8 { x, y, w, h }
        })
        .collect();

    Ok(ConvertedFont { header, rects })
}

/// Convert a font description file to in-memory font data
pub fn convert_font_to_memory(input: &Path) -> Result<ConvertedFont> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read font description: {:?}", input))?;
    let desc: FontDescription = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse font description: {:?}", input))?;
    convert_description(&desc).with_context(|| format!("Failed to convert font: {:?}", input))
}

/// Convert a font description file to XFont format
pub fn convert_font(input: &Path, output: &Path) -> Result<()> {
    let font = convert_font_to_memory(input)?;
    write_resource(output, &font.to_bytes())?;

    tracing::info!(
        "Converted font: {} glyphs from {:?}, line height {}",
        font.header.char_count,
        font.header.first_char as char,
        font.header.line_height
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use x_common::BinarySerializable;

    const FONT: &str = r##"{
        "settings": { "SPACE_WIDTH": 4, "TAB_WIDTH": 16, "LINE_HEIGHT": 9 },
        "sprites": [
            { "char": "!", "rect": [0, 0, 2, 8] },
            { "char": "\"", "rect": [2, 0, 4, 8] },
            { "char": "#", "rect": [6, 0, 6, 8] }
        ]
    }"##;

    fn parse(json: &str) -> FontDescription {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_header_fields() {
        let font = convert_description(&parse(FONT)).unwrap();
        assert_eq!(font.header.first_char, b'!');
        assert_eq!(font.header.space_width, 4);
        assert_eq!(font.header.tab_width, 16);
        assert_eq!(font.header.line_height, 9);
        assert_eq!(font.header.char_count, 3);
    }

    #[test]
    fn test_font_bytes() {
        let bytes = convert_description(&parse(FONT)).unwrap().to_bytes();
        assert_eq!(bytes.len(), 12 + 3 * 4);
        assert_eq!(&bytes[0..4], b"XFNT");
        assert_eq!(&bytes[4..12], &[b'!', 4, 16, 9, 3, 0, 0, 0]);

        let rects = Rect8::deserialize_array(&bytes[12..], 3).unwrap();
        assert_eq!(rects[2], Rect8 { x: 6, y: 0, w: 6, h: 8 });
    }

    #[test]
    fn test_empty_font_rejected() {
        let mut desc = parse(FONT);
        desc.sprites.clear();
        assert!(convert_description(&desc).is_err());
    }

    #[test]
    fn test_multibyte_first_char_rejected() {
        let mut desc = parse(FONT);
        desc.sprites[0].character = "é".to_string();
        assert!(convert_description(&desc).is_err());
    }

    #[test]
    fn test_too_many_sprites() {
        let mut desc = parse(FONT);
        let sprite = desc.sprites[0].clone();
        desc.sprites = vec![sprite; 256];
        assert!(convert_description(&desc).is_err());
    }

    #[test]
    fn test_rect_out_of_range_rejected() {
        let json = r#"{ "settings": { "SPACE_WIDTH": 4, "TAB_WIDTH": 16, "LINE_HEIGHT": 9 },
            "sprites": [ { "char": "A", "rect": [0, 0, 300, 8] } ] }"#;
        assert!(serde_json::from_str::<FontDescription>(json).is_err());
    }
}
