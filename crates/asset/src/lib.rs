//! Asset layer: CPU-side meshes and bitmaps the renderer consumes read-only.
//! E1: face-indexed mesh data + minimal OBJ loader.
//! E2: packed-ARGB bitmaps (PNG) with debug patterns.
//! E3: explicit asset store with typed handles (no global caches).

pub mod mesh;
pub mod obj;
pub mod primitives;
pub mod store;
pub mod texture;

pub use mesh::{Face, MeshData};
pub use store::{AssetStore, BitmapHandle, MeshHandle};
pub use texture::Bitmap;
