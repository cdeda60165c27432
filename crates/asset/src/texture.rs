//! Bitmap loading and data structures.
//! E2: packed 0xAARRGGBB pixel grids, PNG decoding, debug patterns.

use std::path::Path;

/// Immutable 2D pixel grid, row-major, origin top-left.
/// Pixels are packed 0xAARRGGBB words (the pipeline's color model).
#[derive(Clone, Debug)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl Bitmap {
    /// Create a bitmap from pre-packed pixels.
    pub fn new(width: u32, height: u32, pixels: Vec<u32>) -> Self {
        assert_eq!(
            pixels.len(),
            (width * height) as usize,
            "Pixel count doesn't match dimensions"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Single-pixel bitmap; handy as a neutral default map.
    pub fn solid(argb: u32) -> Self {
        Self::new(1, 1, vec![argb])
    }

    /// Load a bitmap from a PNG file.
    pub fn load_png<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        log::info!("Loading bitmap from {:?}", path);

        let img = image::open(path)
            .map_err(|e| anyhow::anyhow!("Failed to open image {:?}: {}", path, e))?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let pixels = rgba
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
            })
            .collect();

        log::info!("Loaded bitmap {}x{}", width, height);
        Ok(Self::new(width, height, pixels))
    }

    /// Create a simple test bitmap (checkerboard pattern).
    pub fn checkerboard(size: u32) -> Self {
        let mut pixels = Vec::with_capacity((size * size) as usize);
        for y in 0..size {
            for x in 0..size {
                let checker = ((x / 8) + (y / 8)) % 2;
                if checker == 0 {
                    pixels.push(0xFFFF_FFFF); // white square
                } else {
                    pixels.push(0xFF80_8080); // gray square
                }
            }
        }
        Self::new(size, size, pixels)
    }

    /// Fetch a texel. Indices must already be wrapped into range.
    #[inline]
    pub fn texel(&self, x: u32, y: u32) -> u32 {
        debug_assert!(x < self.width && y < self.height);
        self.pixels[(y * self.width + x) as usize]
    }

    /// Check that the pixel buffer matches the dimensions.
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.pixels.len() == (self.width * self.height) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_alternates() {
        let bmp = Bitmap::checkerboard(16);
        assert!(bmp.is_valid());
        assert_eq!(bmp.texel(0, 0), 0xFFFF_FFFF);
        assert_eq!(bmp.texel(8, 0), 0xFF80_8080);
        assert_eq!(bmp.texel(8, 8), 0xFFFF_FFFF);
    }

    #[test]
    fn solid_is_one_pixel() {
        let bmp = Bitmap::solid(0xFF12_3456);
        assert_eq!((bmp.width, bmp.height), (1, 1));
        assert_eq!(bmp.texel(0, 0), 0xFF12_3456);
    }
}
