//! Wavefront OBJ parsing

use x_common::{FixedVertex, to_fixed_checked};

use super::types::{FaceRecord, MAX_VERTEX_COUNT, ParsedMesh};
use crate::error::ConvertError;

/// Parse mesh source into fixed-point vertices, flipped UVs and face records.
///
/// Face records must reference exactly 3 or 4 vertices. Normals, groups and
/// smoothing statements are ignored.
pub fn parse_obj(source: &str) -> Result<ParsedMesh, ConvertError> {
    let mut mesh = ParsedMesh::default();
    let mut current_material: Option<String> = None;

    for (line_no, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let record = || format!("line {} `{}`", line_no + 1, line);

        match parts[0] {
            "v" => {
                if parts.len() < 4 {
                    return Err(ConvertError::malformed(record(), "vertex needs x, y and z"));
                }
                let mut fixed = [0i16; 3];
                for (axis, token) in fixed.iter_mut().zip(&parts[1..4]) {
                    let value: f32 = token.parse().map_err(|_| {
                        ConvertError::malformed(record(), format!("invalid coordinate '{token}'"))
                    })?;
                    *axis = to_fixed_checked(value).ok_or_else(|| {
                        ConvertError::malformed(
                            record(),
                            format!("coordinate {value} is outside the 16-bit fixed-point range"),
                        )
                    })?;
                }
                mesh.vertices.push(FixedVertex::new(fixed[0], fixed[1], fixed[2]));
            }
            "vt" => {
                let u = parse_uv_component(parts.get(1), &record)?.ok_or_else(|| {
                    ConvertError::malformed(record(), "texture coordinate needs u")
                })?;
                let v = parse_uv_component(parts.get(2), &record)?.unwrap_or(0.0);
                // OBJ V runs bottom-up; texture rows run top-down
                mesh.uvs.push([u, 1.0 - v]);
            }
            "usemtl" => {
                let name = parts
                    .get(1)
                    .ok_or_else(|| ConvertError::malformed(record(), "usemtl without a name"))?;
                tracing::debug!("Using material {}", name);
                current_material = Some(name.to_string());
            }
            "mtllib" => {
                if parts.len() < 2 {
                    return Err(ConvertError::malformed(record(), "mtllib without a file"));
                }
                if mesh.material_library.is_none() {
                    mesh.material_library = Some(parts[1..].join(" "));
                }
            }
            "f" => {
                let face = parse_face(&parts[1..], &mesh, line_no + 1, &record)?;
                mesh.faces.push(FaceRecord {
                    material: current_material.clone(),
                    ..face
                });
            }
            _ => {}
        }
    }

    if mesh.vertices.len() > MAX_VERTEX_COUNT {
        return Err(ConvertError::malformed(
            "mesh",
            format!(
                "{} vertices exceed the {} addressable by 16-bit indices",
                mesh.vertices.len(),
                MAX_VERTEX_COUNT
            ),
        ));
    }

    Ok(mesh)
}

fn parse_uv_component(
    token: Option<&&str>,
    record: &dyn Fn() -> String,
) -> Result<Option<f32>, ConvertError> {
    token
        .map(|t| {
            t.parse::<f32>().map_err(|_| {
                ConvertError::malformed(record(), format!("invalid texture coordinate '{t}'"))
            })
        })
        .transpose()
}

fn parse_face(
    corners: &[&str],
    mesh: &ParsedMesh,
    line: usize,
    record: &dyn Fn() -> String,
) -> Result<FaceRecord, ConvertError> {
    if corners.len() != 3 && corners.len() != 4 {
        return Err(ConvertError::malformed(
            record(),
            format!("face has {} vertices (expected 3 or 4)", corners.len()),
        ));
    }

    let mut vertices = Vec::with_capacity(corners.len());
    let mut uvs = Vec::with_capacity(corners.len());

    for corner in corners {
        let mut fields = corner.split('/');
        let vertex = fields.next().unwrap_or_default();
        let vertex = resolve_index(vertex, mesh.vertices.len(), "vertex", record)?;
        vertices.push(vertex);

        if let Some(uv) = fields.next().filter(|s| !s.is_empty()) {
            uvs.push(resolve_index(uv, mesh.uvs.len(), "texture coordinate", record)?);
        }
        // Normal index, if present, is not used
    }

    let uvs = match uvs.len() {
        0 => None,
        n if n == vertices.len() => Some(uvs),
        _ => {
            return Err(ConvertError::malformed(
                record(),
                "only some corners have texture coordinates",
            ));
        }
    };

    Ok(FaceRecord {
        line,
        vertices,
        uvs,
        material: None,
    })
}

/// Convert a 1-based (or negative, relative) OBJ index to 0-based
fn resolve_index(
    token: &str,
    count: usize,
    kind: &str,
    record: &dyn Fn() -> String,
) -> Result<usize, ConvertError> {
    let raw: i64 = token
        .parse()
        .map_err(|_| ConvertError::malformed(record(), format!("invalid {kind} index '{token}'")))?;

    let resolved = match raw {
        0 => None,
        n if n > 0 => Some(n as usize - 1),
        n => (count as i64 + n).try_into().ok(),
    };

    match resolved {
        Some(index) if index < count => Ok(index),
        _ => Err(ConvertError::malformed(
            record(),
            format!("{kind} index {raw} out of range (have {count})"),
        )),
    }
}
