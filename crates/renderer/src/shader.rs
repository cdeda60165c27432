//! Programmable pipeline stages and the material bundle.
//!
//! Each stage is a swappable strategy behind a trait object; materials are
//! composed, not subclassed. This is the contract other subsystems author
//! against.

use std::sync::Arc;

use crate::blend::{self, BlendFn};
use crate::primitive::{Topology, Triangle};
use crate::raster::DepthCompare;
use crate::uniforms::Uniforms;
use crate::vertex::Vertex;

/// Pure per-vertex transform. Must set `vertex.clip`; may rewrite the
/// attribute slots into shading space. No side effects beyond the vertex.
pub trait VertexShader: Send + Sync {
    fn shade(&self, uniforms: &Uniforms, vertex: &mut Vertex);
}

/// Optional per-triangle transform emitting 0..N triangles.
pub trait GeometryShader: Send + Sync {
    fn shade(&self, uniforms: &Uniforms, triangle: &Triangle) -> Vec<Triangle>;
}

/// Per-fragment function mapping the interpolated vertex to a packed color.
pub trait FragmentShader: Send + Sync {
    fn shade(&self, uniforms: &Uniforms, fragment: &Vertex) -> u32;
}

/// A shader bundle: everything the pipeline needs to draw a mesh.
#[derive(Clone)]
pub struct Material {
    pub topology: Topology,
    pub vertex: Arc<dyn VertexShader>,
    pub geometry: Option<Arc<dyn GeometryShader>>,
    pub fragment: Arc<dyn FragmentShader>,
    /// Opaque materials overwrite the framebuffer and force alpha 0xFF.
    pub opaque: bool,
    pub cull_backfaces: bool,
    pub depth_compare: DepthCompare,
    pub depth_write: bool,
    pub blend: BlendFn,
}

impl Material {
    /// Opaque, back-face-culled, depth-tested defaults.
    pub fn new(vertex: Arc<dyn VertexShader>, fragment: Arc<dyn FragmentShader>) -> Self {
        Self {
            topology: Topology::List,
            vertex,
            geometry: None,
            fragment,
            opaque: true,
            cull_backfaces: true,
            depth_compare: DepthCompare::Less,
            depth_write: true,
            blend: blend::alpha_over,
        }
    }

    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    pub fn with_geometry(mut self, geometry: Arc<dyn GeometryShader>) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Non-opaque: blend against the framebuffer and stop writing depth.
    pub fn transparent(mut self) -> Self {
        self.opaque = false;
        self.depth_write = false;
        self
    }

    pub fn with_blend(mut self, blend: BlendFn) -> Self {
        self.blend = blend;
        self
    }

    pub fn without_culling(mut self) -> Self {
        self.cull_backfaces = false;
        self
    }

    pub fn with_depth(mut self, compare: DepthCompare, write: bool) -> Self {
        self.depth_compare = compare;
        self.depth_write = write;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NopVs;
    impl VertexShader for NopVs {
        fn shade(&self, _u: &Uniforms, _v: &mut Vertex) {}
    }

    struct White;
    impl FragmentShader for White {
        fn shade(&self, _u: &Uniforms, _f: &Vertex) -> u32 {
            0xFFFF_FFFF
        }
    }

    #[test]
    fn defaults_are_opaque_and_culled() {
        let m = Material::new(Arc::new(NopVs), Arc::new(White));
        assert!(m.opaque);
        assert!(m.cull_backfaces);
        assert!(m.depth_write);
        assert_eq!(m.depth_compare, DepthCompare::Less);
    }

    #[test]
    fn transparent_disables_depth_write() {
        let m = Material::new(Arc::new(NopVs), Arc::new(White)).transparent();
        assert!(!m.opaque);
        assert!(!m.depth_write);
    }
}
