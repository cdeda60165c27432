//! Render target: color framebuffer + depth buffer.
//!
//! Both buffers are owned exclusively by the rasterizer for the duration of
//! a frame; nothing else mutates them mid-pass. The color buffer is packed
//! 0xAARRGGBB, row-major, origin top-left, ready for blit.

use corelib::{CoreError, CoreResult};

/// Color + depth buffers of one fixed size.
pub struct Framebuffer {
    width: u32,
    height: u32,
    pub(crate) color: Vec<u32>,
    pub(crate) depth: Vec<f32>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> CoreResult<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        let n = (width * height) as usize;
        Ok(Self {
            width,
            height,
            color: vec![0; n],
            depth: vec![1.0; n],
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reset color to `argb` and depth to the far plane (1.0).
    pub fn clear(&mut self, argb: u32) {
        self.color.fill(argb);
        self.depth.fill(1.0);
    }

    /// Drop and reallocate for a new size. Contents become cleared-black.
    pub fn resize(&mut self, width: u32, height: u32) -> CoreResult<()> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        let n = (width * height) as usize;
        self.width = width;
        self.height = height;
        self.color.clear();
        self.color.resize(n, 0);
        self.depth.clear();
        self.depth.resize(n, 1.0);
        Ok(())
    }

    /// Finished pixels, row-major top-left.
    #[inline]
    pub fn color(&self) -> &[u32] {
        &self.color
    }

    /// Pixels as raw bytes (little-endian 0xAARRGGBB == BGRA8 byte order).
    #[inline]
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.color)
    }

    #[inline]
    pub fn depth(&self) -> &[f32] {
        &self.depth
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.color[(y * self.width + x) as usize]
    }

    /// Mutable pixel access for post filters.
    #[inline]
    pub(crate) fn color_mut(&mut self) -> &mut [u32] {
        &mut self.color
    }
}
