//! Material library (.mtl) parsing

use x_common::pack_diffuse_rgb;

use super::types::{Material, MaterialLibrary};
use crate::error::ConvertError;

/// Parse a material library.
///
/// Each `newmtl` opens a material that collects the following `Kd` and
/// `map_Kd` directives. Directives before the first `newmtl` and all other
/// statements are ignored.
pub fn parse_mtl(source: &str) -> Result<MaterialLibrary, ConvertError> {
    let mut library = MaterialLibrary::new();
    let mut current: Option<Material> = None;

    for (line_no, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let record = || format!("mtl line {} `{}`", line_no + 1, line);

        match parts[0] {
            "newmtl" => {
                let name = parts
                    .get(1)
                    .ok_or_else(|| ConvertError::malformed(record(), "newmtl without a name"))?;
                if let Some(done) = current.take() {
                    tracing::debug!("Adding material {}", done.name);
                    library.push(done);
                }
                current = Some(Material::new(*name));
            }
            "Kd" => {
                let Some(material) = current.as_mut() else {
                    continue;
                };
                if parts.len() < 4 {
                    return Err(ConvertError::malformed(
                        record(),
                        format!("Kd needs 3 channels, got {}", parts.len() - 1),
                    ));
                }
                let r = parse_channel(parts[1], &record)?;
                let g = parse_channel(parts[2], &record)?;
                let b = parse_channel(parts[3], &record)?;
                material.color = pack_diffuse_rgb(r, g, b);
            }
            "map_Kd" => {
                let Some(material) = current.as_mut() else {
                    continue;
                };
                // Options (-s, -o, ...) precede the file name
                let path = parts
                    .last()
                    .filter(|_| parts.len() > 1)
                    .ok_or_else(|| ConvertError::malformed(record(), "map_Kd without a path"))?;
                tracing::debug!("Found texture {}", path);
                material.tex_id = library.texture_id(path);
                material.texture = Some(path.to_string());
            }
            _ => {}
        }
    }

    if let Some(done) = current {
        tracing::debug!("Adding material {}", done.name);
        library.push(done);
    }

    Ok(library)
}

fn parse_channel(token: &str, record: &dyn Fn() -> String) -> Result<f32, ConvertError> {
    token
        .parse::<f32>()
        .map_err(|_| ConvertError::malformed(record(), format!("invalid color channel '{token}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIBRARY: &str = "\
# two textured materials sharing one image
newmtl crate
Kd 1.0 0.5 0.0
map_Kd textures/crate.png

newmtl plain
Kd 0.2 0.2 0.2

newmtl lid
map_Kd textures/crate.png

newmtl floor
map_Kd -s 2 2 1 floor.png
";

    #[test]
    fn test_materials_in_order() {
        let lib = parse_mtl(LIBRARY).unwrap();
        let names: Vec<&str> = lib.materials().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["crate", "plain", "lid", "floor"]);
    }

    #[test]
    fn test_diffuse_color_packed() {
        let lib = parse_mtl(LIBRARY).unwrap();
        assert_eq!(lib.get("crate").unwrap().color, 0x00_00_7F_FF);
        assert_eq!(lib.get("plain").unwrap().color, 0x00_33_33_33);
        // No Kd keeps the default gray
        assert_eq!(lib.get("lid").unwrap().color, 0x80_80_80);
    }

    #[test]
    fn test_texture_ids_shared() {
        let lib = parse_mtl(LIBRARY).unwrap();
        assert_eq!(lib.get("crate").unwrap().tex_id, 0);
        assert_eq!(lib.get("plain").unwrap().tex_id, -1);
        assert_eq!(lib.get("lid").unwrap().tex_id, 0);
        assert_eq!(lib.get("floor").unwrap().tex_id, 1);
        assert_eq!(lib.textures(), &["textures/crate.png", "floor.png"]);
    }

    #[test]
    fn test_channels_clamped() {
        let lib = parse_mtl("newmtl hot\nKd 3.0 -1.0 1.0\n").unwrap();
        assert_eq!(lib.get("hot").unwrap().color, 0x00_FF_00_FF);
    }

    #[test]
    fn test_directives_before_newmtl_ignored() {
        let lib = parse_mtl("Kd 1 1 1\nmap_Kd stray.png\nnewmtl a\n").unwrap();
        assert!(lib.textures().is_empty());
        assert_eq!(lib.get("a").unwrap().color, 0x80_80_80);
    }

    #[test]
    fn test_missing_arguments_are_errors() {
        assert!(matches!(
            parse_mtl("newmtl\n"),
            Err(ConvertError::MalformedInput { .. })
        ));
        assert!(matches!(
            parse_mtl("newmtl a\nKd 1 1\n"),
            Err(ConvertError::MalformedInput { .. })
        ));
        assert!(matches!(
            parse_mtl("newmtl a\nKd 1 x 1\n"),
            Err(ConvertError::MalformedInput { .. })
        ));
        assert!(matches!(
            parse_mtl("newmtl a\nmap_Kd\n"),
            Err(ConvertError::MalformedInput { .. })
        ));
    }
}
