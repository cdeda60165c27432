//! Primitive assembly: group shaded vertices into triangles.

use crate::vertex::Vertex;

/// Exactly three vertices; corner order defines winding for culling.
#[derive(Clone, Copy, Debug)]
pub struct Triangle {
    pub v: [Vertex; 3],
}

impl Triangle {
    #[inline]
    pub fn new(a: Vertex, b: Vertex, c: Vertex) -> Self {
        Self { v: [a, b, c] }
    }
}

/// How the vertex stream maps to triangles. A caller-supplied policy,
/// never inferred from the data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Topology {
    /// Non-overlapping consecutive triples; a trailing remainder of 1 or 2
    /// vertices is dropped.
    #[default]
    List,
    /// Every consecutive pair after the first vertex forms a triangle with
    /// the first vertex as shared apex.
    Fan,
}

/// Assemble the shaded vertex sequence into triangles.
pub fn assemble(topology: Topology, vertices: &[Vertex]) -> Vec<Triangle> {
    match topology {
        Topology::List => vertices
            .chunks_exact(3)
            .map(|c| Triangle::new(c[0], c[1], c[2]))
            .collect(),
        Topology::Fan => {
            if vertices.len() < 3 {
                return Vec::new();
            }
            (1..vertices.len() - 1)
                .map(|i| Triangle::new(vertices[0], vertices[i], vertices[i + 1]))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec3;

    fn verts(n: usize) -> Vec<Vertex> {
        (0..n)
            .map(|i| Vertex {
                position: vec3(i as f32, 0.0, 0.0),
                ..Vertex::default()
            })
            .collect()
    }

    #[test]
    fn list_drops_remainder() {
        assert_eq!(assemble(Topology::List, &verts(8)).len(), 2);
        assert_eq!(assemble(Topology::List, &verts(2)).len(), 0);
        let tris = assemble(Topology::List, &verts(6));
        assert_eq!(tris[1].v[0].position.x, 3.0);
    }

    #[test]
    fn fan_shares_apex() {
        let tris = assemble(Topology::Fan, &verts(5));
        assert_eq!(tris.len(), 3);
        for t in &tris {
            assert_eq!(t.v[0].position.x, 0.0);
        }
        assert_eq!(tris[2].v[1].position.x, 3.0);
        assert_eq!(tris[2].v[2].position.x, 4.0);
    }

    #[test]
    fn fan_needs_three_vertices() {
        assert!(assemble(Topology::Fan, &verts(2)).is_empty());
    }
}
