//! CPU-side mesh representation used by loaders.
//!
//! A mesh keeps separate position/uv/normal pools; each face addresses the
//! pools by index per corner and carries a per-corner tangent for normal
//! mapping. Index validity is the loader's responsibility: the renderer
//! assumes every index is in range.

/// One triangle of a mesh. Corner order defines winding (CCW = front).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Face {
    pub positions: [u32; 3],
    pub uvs: [u32; 3],
    pub normals: [u32; 3],
    /// Per-corner tangent, object space, unit length.
    pub tangents: [[f32; 3]; 3],
}

/// Indexed triangle mesh with per-face corner indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    pub faces: Vec<Face>,
}

impl MeshData {
    pub fn new(
        positions: Vec<[f32; 3]>,
        uvs: Vec<[f32; 2]>,
        normals: Vec<[f32; 3]>,
        faces: Vec<Face>,
    ) -> Self {
        Self {
            positions,
            uvs,
            normals,
            faces,
        }
    }

    /// Returns `true` if the mesh has geometry and every face index is in
    /// range. Loaders call this before handing a mesh to the renderer.
    pub fn is_valid(&self) -> bool {
        if self.positions.is_empty() || self.faces.is_empty() {
            return false;
        }
        let (np, nt, nn) = (
            self.positions.len() as u32,
            self.uvs.len() as u32,
            self.normals.len() as u32,
        );
        self.faces.iter().all(|f| {
            f.positions.iter().all(|&i| i < np)
                && f.uvs.iter().all(|&i| i < nt)
                && f.normals.iter().all(|&i| i < nn)
        })
    }

    /// Fill per-corner tangents from position/uv deltas.
    ///
    /// Faces with a degenerate UV mapping get an arbitrary tangent
    /// orthogonalization can still work with.
    pub fn compute_tangents(&mut self) {
        for fi in 0..self.faces.len() {
            let f = self.faces[fi];
            let p0 = self.positions[f.positions[0] as usize];
            let p1 = self.positions[f.positions[1] as usize];
            let p2 = self.positions[f.positions[2] as usize];
            let w0 = self.uvs[f.uvs[0] as usize];
            let w1 = self.uvs[f.uvs[1] as usize];
            let w2 = self.uvs[f.uvs[2] as usize];

            let e1 = sub3(p1, p0);
            let e2 = sub3(p2, p0);
            let du1 = w1[0] - w0[0];
            let dv1 = w1[1] - w0[1];
            let du2 = w2[0] - w0[0];
            let dv2 = w2[1] - w0[1];

            let det = du1 * dv2 - du2 * dv1;
            let tangent = if det.abs() > 1e-8 {
                let r = 1.0 / det;
                normalize3([
                    r * (dv2 * e1[0] - dv1 * e2[0]),
                    r * (dv2 * e1[1] - dv1 * e2[1]),
                    r * (dv2 * e1[2] - dv1 * e2[2]),
                ])
            } else {
                // UV-degenerate face: any edge direction will do.
                normalize3(e1)
            };
            self.faces[fi].tangents = [tangent; 3];
        }
    }
}

#[inline]
fn sub3(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
fn normalize3(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len > 1e-12 {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        [1.0, 0.0, 0.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_face() -> MeshData {
        MeshData::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            vec![[0.0, 0.0, 1.0]],
            vec![Face {
                positions: [0, 1, 2],
                uvs: [0, 1, 2],
                normals: [0, 0, 0],
                tangents: [[0.0; 3]; 3],
            }],
        )
    }

    #[test]
    fn mesh_data_validity() {
        let data = unit_face();
        assert!(data.is_valid());

        let mut broken = data.clone();
        broken.faces[0].positions[2] = 99;
        assert!(!broken.is_valid());
    }

    #[test]
    fn tangent_follows_u_axis() {
        // UV u grows along +X, so the tangent must be +X.
        let mut data = unit_face();
        data.compute_tangents();
        let t = data.faces[0].tangents[0];
        assert!((t[0] - 1.0).abs() < 1e-5);
        assert!(t[1].abs() < 1e-5 && t[2].abs() < 1e-5);
    }

    #[test]
    fn degenerate_uv_still_yields_unit_tangent() {
        let mut data = unit_face();
        data.uvs = vec![[0.5, 0.5]; 3];
        for c in 0..3 {
            data.faces[0].uvs[c] = c as u32;
        }
        data.compute_tangents();
        let t = data.faces[0].tangents[0];
        let len = (t[0] * t[0] + t[1] * t[1] + t[2] * t[2]).sqrt();
        assert!((len - 1.0).abs() < 1e-5);
    }
}
