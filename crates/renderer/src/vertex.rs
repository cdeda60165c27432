//! Vertex record and vertex assembly.
//!
//! Attributes live in fixed slots rather than a name->value map: position,
//! uv, normal, tangent and one free scalar, plus the homogeneous clip-space
//! position the vertex shader writes and the rasterizer reads.

use asset::MeshData;
use glam::{Vec2, Vec3, Vec4};

/// One pipeline vertex.
///
/// Vertex assembly fills the attribute slots in object space; the vertex
/// shader rewrites them in shading (camera) space and must set `clip`.
/// The rasterizer derives new interpolated vertices from these per fragment.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    /// Homogeneous clip-space position (x,y,z,w).
    pub clip: Vec4,
    pub position: Vec3,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub uv: Vec2,
    /// Free scalar slot for custom shaders (fog factor etc).
    pub custom: f32,
}

impl Vertex {
    /// Barycentric combination of three vertices. Weights are assumed to
    /// sum to 1; perspective correction is the caller's business.
    #[inline]
    pub fn weighted(a: &Vertex, b: &Vertex, c: &Vertex, wa: f32, wb: f32, wc: f32) -> Vertex {
        Vertex {
            clip: a.clip * wa + b.clip * wb + c.clip * wc,
            position: a.position * wa + b.position * wb + c.position * wc,
            normal: a.normal * wa + b.normal * wb + c.normal * wc,
            tangent: a.tangent * wa + b.tangent * wb + c.tangent * wc,
            uv: a.uv * wa + b.uv * wb + c.uv * wc,
            custom: a.custom * wa + b.custom * wb + c.custom * wc,
        }
    }
}

/// Vertex assembly: three vertices per face, attributes copied from the
/// mesh pools by face index. Indices are trusted (loader validated them).
pub fn assemble_vertices(mesh: &MeshData) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(mesh.faces.len() * 3);
    for face in &mesh.faces {
        for corner in 0..3 {
            let p = mesh.positions[face.positions[corner] as usize];
            let t = mesh.uvs[face.uvs[corner] as usize];
            let n = mesh.normals[face.normals[corner] as usize];
            let tan = face.tangents[corner];
            let position = Vec3::from_array(p);
            out.push(Vertex {
                // Placeholder until the vertex shader runs.
                clip: position.extend(1.0),
                position,
                normal: Vec3::from_array(n),
                tangent: Vec3::from_array(tan),
                uv: Vec2::from_array(t),
                custom: 0.0,
            });
        }
    }
    out
}
