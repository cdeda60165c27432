//! Procedural meshes for demos and tests (no external files needed).

use crate::mesh::{Face, MeshData};

/// Unit cube centered at the origin, CCW winding, per-face normals and
/// 0..1 UVs on every face.
pub fn cube() -> MeshData {
    let positions = vec![
        // back z=-1
        [-1.0, -1.0, -1.0], // 0
        [1.0, -1.0, -1.0],  // 1
        [1.0, 1.0, -1.0],   // 2
        [-1.0, 1.0, -1.0],  // 3
        // front z=+1
        [-1.0, -1.0, 1.0], // 4
        [1.0, -1.0, 1.0],  // 5
        [1.0, 1.0, 1.0],   // 6
        [-1.0, 1.0, 1.0],  // 7
    ];
    let uvs = vec![[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
    let normals = vec![
        [0.0, 0.0, 1.0],  // 0 +Z
        [0.0, 0.0, -1.0], // 1 -Z
        [0.0, 1.0, 0.0],  // 2 +Y
        [0.0, -1.0, 0.0], // 3 -Y
        [-1.0, 0.0, 0.0], // 4 -X
        [1.0, 0.0, 0.0],  // 5 +X
    ];

    // (position indices per quad, normal index); two CCW triangles each.
    let quads: [([u32; 4], u32); 6] = [
        ([4, 5, 6, 7], 0), // front (+Z)
        ([1, 0, 3, 2], 1), // back (-Z)
        ([7, 6, 2, 3], 2), // top (+Y)
        ([0, 1, 5, 4], 3), // bottom (-Y)
        ([0, 4, 7, 3], 4), // left (-X)
        ([5, 1, 2, 6], 5), // right (+X)
    ];

    let mut faces = Vec::with_capacity(12);
    for (p, n) in quads {
        faces.push(Face {
            positions: [p[0], p[1], p[2]],
            uvs: [0, 1, 2],
            normals: [n; 3],
            tangents: [[0.0; 3]; 3],
        });
        faces.push(Face {
            positions: [p[0], p[2], p[3]],
            uvs: [0, 2, 3],
            normals: [n; 3],
            tangents: [[0.0; 3]; 3],
        });
    }

    let mut mesh = MeshData::new(positions, uvs, normals, faces);
    mesh.compute_tangents();
    mesh
}

/// Flat quad in the XZ plane, normal +Y, `half` world units from center to
/// edge, UVs tiled `uv_tiles` times across.
pub fn plane(half: f32, uv_tiles: f32) -> MeshData {
    let positions = vec![
        [-half, 0.0, -half],
        [half, 0.0, -half],
        [half, 0.0, half],
        [-half, 0.0, half],
    ];
    let uvs = vec![
        [0.0, 0.0],
        [uv_tiles, 0.0],
        [uv_tiles, uv_tiles],
        [0.0, uv_tiles],
    ];
    let normals = vec![[0.0, 1.0, 0.0]];
    let faces = vec![
        Face {
            positions: [0, 2, 1],
            uvs: [0, 2, 1],
            normals: [0; 3],
            tangents: [[0.0; 3]; 3],
        },
        Face {
            positions: [0, 3, 2],
            uvs: [0, 3, 2],
            normals: [0; 3],
            tangents: [[0.0; 3]; 3],
        },
    ];

    let mut mesh = MeshData::new(positions, uvs, normals, faces);
    mesh.compute_tangents();
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_is_valid_with_12_faces() {
        let mesh = cube();
        assert!(mesh.is_valid());
        assert_eq!(mesh.faces.len(), 12);
    }

    #[test]
    fn plane_tangents_are_unit() {
        let mesh = plane(5.0, 4.0);
        assert!(mesh.is_valid());
        for f in &mesh.faces {
            for t in &f.tangents {
                let len = (t[0] * t[0] + t[1] * t[1] + t[2] * t[2]).sqrt();
                assert!((len - 1.0).abs() < 1e-4);
            }
        }
    }
}
