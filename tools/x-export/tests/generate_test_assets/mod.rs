//! Test asset generation for integration tests.
//!
//! Writes small meshes, material libraries, images and font descriptions
//! straight to disk so every test starts from real input files.

#![allow(dead_code)]

use std::io::Result;
use std::path::Path;

/// 4x4 two-color checkerboard (red / blue)
pub fn generate_checkerboard_png(path: &Path) -> image::ImageResult<()> {
    let mut pixels = Vec::with_capacity(4 * 4 * 4);
    for y in 0..4 {
        for x in 0..4 {
            let color = if (x + y) % 2 == 0 {
                [255, 0, 0, 255]
            } else {
                [0, 0, 255, 255]
            };
            pixels.extend_from_slice(&color);
        }
    }
    image::save_buffer(path, &pixels, 4, 4, image::ColorType::Rgba8)
}

/// `count` distinct opaque grays in a single row
pub fn generate_palette_png(path: &Path, count: u32) -> image::ImageResult<()> {
    let pixels: Vec<u8> = (0..count)
        .flat_map(|i| {
            let c = (i * 8) as u8;
            [c, c, c, 255]
        })
        .collect();
    image::save_buffer(path, &pixels, count, 1, image::ColorType::Rgba8)
}

/// Unit quad with UVs bound to material `crate`, plus an untextured triangle
pub fn generate_textured_quad_obj(path: &Path, mtllib: &str) -> Result<()> {
    let obj = format!(
        "\
# textured quad
mtllib {mtllib}
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
vn 0.0 0.0 1.0
usemtl crate
f 1/1/1 2/2/1 3/3/1 4/4/1
usemtl plain
f 1//1 2//1 3//1
"
    );
    std::fs::write(path, obj)
}

/// Material library binding `crate` to `texture`
pub fn generate_mtl(path: &Path, texture: &str) -> Result<()> {
    let mtl = format!(
        "\
newmtl crate
Kd 1.0 1.0 1.0
map_Kd {texture}

newmtl plain
Kd 0.0 1.0 0.0
"
    );
    std::fs::write(path, mtl)
}

/// Minimal triangle without materials
pub fn generate_triangle_obj(path: &Path) -> Result<()> {
    std::fs::write(path, "v 1.5 -2.0 0.03125\nv 1 0 0\nv 0 1 0\nf 1 2 3\n")
}

/// Placement descriptor file
pub fn generate_placement(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text)
}

/// Three-glyph font description starting at 'A'
pub fn generate_font_json(path: &Path) -> Result<()> {
    let json = r#"{
    "settings": { "SPACE_WIDTH": 3, "TAB_WIDTH": 12, "LINE_HEIGHT": 8 },
    "sprites": [
        { "char": "A", "rect": [0, 0, 5, 7] },
        { "char": "B", "rect": [5, 0, 5, 7] },
        { "char": "C", "rect": [10, 0, 5, 7] }
    ]
}"#;
    std::fs::write(path, json)
}
