//! Explicit asset store with typed handles.
//!
//! The store is owned by whoever loads assets and passed by reference into
//! the renderer; there is no process-wide cache. Assets are never mutated
//! after insertion, so shared read access across draws is safe.

use std::sync::Arc;

use crate::mesh::MeshData;
use crate::texture::Bitmap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BitmapHandle(pub u32);

#[derive(Default)]
pub struct AssetStore {
    meshes: Vec<Arc<MeshData>>,
    bitmaps: Vec<Arc<Bitmap>>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mesh(&mut self, mesh: MeshData) -> MeshHandle {
        debug_assert!(mesh.is_valid(), "loader handed the store an invalid mesh");
        let h = MeshHandle(self.meshes.len() as u32);
        self.meshes.push(Arc::new(mesh));
        h
    }

    pub fn add_bitmap(&mut self, bitmap: Bitmap) -> BitmapHandle {
        debug_assert!(bitmap.is_valid());
        let h = BitmapHandle(self.bitmaps.len() as u32);
        self.bitmaps.push(Arc::new(bitmap));
        h
    }

    #[inline]
    pub fn mesh(&self, h: MeshHandle) -> Option<&Arc<MeshData>> {
        self.meshes.get(h.0 as usize)
    }

    #[inline]
    pub fn bitmap(&self, h: BitmapHandle) -> Option<&Arc<Bitmap>> {
        self.bitmaps.get(h.0 as usize)
    }
}
