//! Software rendering pipeline: every vertex transform, rasterized triangle,
//! texture fetch and lighting term is ordinary CPU code writing into a
//! packed-ARGB framebuffer.
//!
//! Data flow per draw call: vertex assembly -> vertex shader -> primitive
//! assembly -> optional geometry shader -> rasterizer (perspective divide,
//! viewport map, depth test, perspective-correct interpolation) -> fragment
//! shader -> blend. Post filters run once per frame after all geometry.

pub mod blend;
pub mod color;
pub mod cubemap;
pub mod phong;
pub mod pipeline;
pub mod postfx;
pub mod primitive;
pub mod raster;
pub mod shader;
pub mod target;
pub mod texture;
pub mod uniforms;
pub mod vertex;

pub use blend::BlendFn;
pub use cubemap::{CubeFace, CubeMap};
pub use phong::{FlatShader, PhongShader, StandardVertexShader};
pub use pipeline::{FrameContext, Pipeline};
pub use postfx::PostFilter;
pub use primitive::{Topology, Triangle};
pub use raster::DepthCompare;
pub use shader::{FragmentShader, GeometryShader, Material, VertexShader};
pub use target::Framebuffer;
pub use texture::{SampleFilter, Texture, UvWrap};
pub use uniforms::{UniformValue, Uniforms};
pub use vertex::Vertex;
