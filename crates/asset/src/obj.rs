//! Minimal OBJ parser supporting positions, normals and texture coordinates.
//!
//! Output is the face-indexed [`MeshData`]; corners missing `vt`/`vn` get a
//! synthesized zero UV / face normal so every face index is valid, and
//! per-corner tangents are computed after parsing.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use anyhow::{Context, Result, anyhow};

use crate::mesh::{Face, MeshData};

/// Load an OBJ mesh from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> Result<MeshData> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open OBJ file: {}", path.as_ref().display()))?;
    load_obj_from_reader(BufReader::new(file))
}

/// Load an OBJ mesh from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R) -> Result<MeshData> {
    parse_obj(reader)
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> Result<MeshData> {
    parse_obj(io::Cursor::new(contents))
}

fn parse_obj<R: BufRead>(reader: R) -> Result<MeshData> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut texcoords: Vec<[f32; 2]> = Vec::new();
    let mut faces: Vec<Face> = Vec::new();

    // Deferred: corner index triples before uv/normal synthesis.
    let mut raw_faces: Vec<[(usize, Option<usize>, Option<usize>); 3]> = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_no + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let tag = parts
            .next()
            .ok_or_else(|| anyhow!("Malformed OBJ line {}: '{}'", line_no + 1, trimmed))?;

        match tag {
            "v" => {
                let x = parse_f32(parts.next(), line_no, "x coordinate")?;
                let y = parse_f32(parts.next(), line_no, "y coordinate")?;
                let z = parse_f32(parts.next(), line_no, "z coordinate")?;
                positions.push([x, y, z]);
            }
            "vt" => {
                let u = parse_f32(parts.next(), line_no, "u coordinate")?;
                let v = parse_f32(parts.next(), line_no, "v coordinate")?;
                texcoords.push([u, v]);
            }
            "vn" => {
                let nx = parse_f32(parts.next(), line_no, "nx coordinate")?;
                let ny = parse_f32(parts.next(), line_no, "ny coordinate")?;
                let nz = parse_f32(parts.next(), line_no, "nz coordinate")?;
                normals.push([nx, ny, nz]);
            }
            "f" => {
                let mut corners: Vec<(usize, Option<usize>, Option<usize>)> = Vec::new();
                for part in parts {
                    corners.push(parse_face_vertex(
                        part,
                        positions.len(),
                        texcoords.len(),
                        normals.len(),
                        line_no,
                    )?);
                }
                if corners.len() < 3 {
                    continue;
                }
                // Triangulate fan
                for tri in 1..(corners.len() - 1) {
                    raw_faces.push([corners[0], corners[tri], corners[tri + 1]]);
                }
            }
            _ => {
                // Ignore other directives (o/g/s/usemtl/etc.)
            }
        }
    }

    // Synthesize missing attributes so every corner has valid indices.
    let mut default_uv: Option<u32> = None;
    for raw in &raw_faces {
        let mut face = Face::default();
        let mut face_normal: Option<u32> = None;
        for (c, &(vi, vti, vni)) in raw.iter().enumerate() {
            face.positions[c] = vi as u32;
            face.uvs[c] = match vti {
                Some(i) => i as u32,
                None => *default_uv.get_or_insert_with(|| {
                    texcoords.push([0.0, 0.0]);
                    (texcoords.len() - 1) as u32
                }),
            };
            face.normals[c] = match vni {
                Some(i) => i as u32,
                None => *face_normal.get_or_insert_with(|| {
                    normals.push(face_normal_of(&positions, raw));
                    (normals.len() - 1) as u32
                }),
            };
        }
        faces.push(face);
    }

    if positions.is_empty() || faces.is_empty() {
        anyhow::bail!("OBJ contained no triangles");
    }

    let mut mesh = MeshData::new(positions, texcoords, normals, faces);
    mesh.compute_tangents();
    debug_assert!(mesh.is_valid());
    log::debug!(
        "Parsed OBJ: {} positions, {} faces",
        mesh.positions.len(),
        mesh.faces.len()
    );
    Ok(mesh)
}

fn face_normal_of(
    positions: &[[f32; 3]],
    corners: &[(usize, Option<usize>, Option<usize>); 3],
) -> [f32; 3] {
    let a = positions[corners[0].0];
    let b = positions[corners[1].0];
    let c = positions[corners[2].0];
    let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        e1[1] * e2[2] - e1[2] * e2[1],
        e1[2] * e2[0] - e1[0] * e2[2],
        e1[0] * e2[1] - e1[1] * e2[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len > 1e-12 {
        [n[0] / len, n[1] / len, n[2] / len]
    } else {
        [0.0, 0.0, 1.0]
    }
}

fn parse_f32(value: Option<&str>, line_no: usize, what: &str) -> Result<f32> {
    let token = value.ok_or_else(|| anyhow!("Missing {} on line {}", what, line_no + 1))?;
    token
        .parse::<f32>()
        .with_context(|| format!("Failed to parse {} on line {}", what, line_no + 1))
}

fn parse_face_vertex(
    token: &str,
    pos_count: usize,
    tex_count: usize,
    norm_count: usize,
    line_no: usize,
) -> Result<(usize, Option<usize>, Option<usize>)> {
    let mut split = token.split('/');
    let pos = split
        .next()
        .ok_or_else(|| anyhow!("Malformed face element '{}' on line {}", token, line_no + 1))?;
    let pos_idx = resolve_index(pos, pos_count, line_no)?;

    let tex_idx = match split.next() {
        Some(value) if !value.is_empty() => Some(resolve_index(value, tex_count, line_no)?),
        _ => None,
    };

    let norm_idx = match split.next() {
        Some(value) if !value.is_empty() => Some(resolve_index(value, norm_count, line_no)?),
        _ => None,
    };

    Ok((pos_idx, tex_idx, norm_idx))
}

fn resolve_index(token: &str, len: usize, line_no: usize) -> Result<usize> {
    let raw = token
        .parse::<i32>()
        .with_context(|| format!("Invalid index '{}' on line {}", token, line_no + 1))?;
    if raw == 0 {
        anyhow::bail!("OBJ indices are 1-based; found 0 on line {}", line_no + 1);
    }

    let idx = if raw > 0 {
        (raw - 1) as isize
    } else {
        (len as isize) + (raw as isize)
    };

    if idx < 0 || idx as usize >= len {
        anyhow::bail!(
            "OBJ index {} resolved out of bounds (len={}) on line {}",
            raw,
            len,
            line_no + 1
        );
    }

    Ok(idx as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_triangle() {
        let src = r#"
            v 0.0 0.0 0.0
            v 1.0 0.0 0.0
            v 0.0 1.0 0.0
            vn 0.0 0.0 1.0
            vt 0.0 0.0
            vt 1.0 0.0
            vt 0.0 1.0
            f 1/1/1 2/2/1 3/3/1
        "#;
        let mesh = load_obj_from_str(src).expect("parse triangle");
        assert_eq!(mesh.positions.len(), 3);
        assert_eq!(mesh.faces.len(), 1);
        assert_eq!(mesh.faces[0].positions, [0, 1, 2]);
        assert!(mesh.is_valid());
    }

    #[test]
    fn quad_triangulates_as_fan() {
        let src = r#"
            v 0 0 0
            v 1 0 0
            v 1 1 0
            v 0 1 0
            f 1 2 3 4
        "#;
        let mesh = load_obj_from_str(src).expect("parse quad");
        assert_eq!(mesh.faces.len(), 2);
        assert_eq!(mesh.faces[0].positions, [0, 1, 2]);
        assert_eq!(mesh.faces[1].positions, [0, 2, 3]);
    }

    #[test]
    fn missing_normals_get_face_normal() {
        let src = r#"
            v 0 0 0
            v 1 0 0
            v 0 1 0
            f 1 2 3
        "#;
        let mesh = load_obj_from_str(src).expect("parse");
        let ni = mesh.faces[0].normals[0] as usize;
        let n = mesh.normals[ni];
        assert!((n[2] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn negative_indices_resolve_from_end() {
        let src = r#"
            v 0 0 0
            v 1 0 0
            v 0 1 0
            f -3 -2 -1
        "#;
        let mesh = load_obj_from_str(src).expect("parse");
        assert_eq!(mesh.faces[0].positions, [0, 1, 2]);
    }
}
