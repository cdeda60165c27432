//! Blend stage: combine a shaded fragment with the framebuffer pixel.

use crate::color;

/// Pure, total function of (source, destination) -> combined color.
pub type BlendFn = fn(src: u32, dst: u32) -> u32;

/// Standard alpha-over compositing with the source alpha as factor:
/// rgb = src*a + dst*(1-a), alpha = srcA + dstA*(1-a), rounded to nearest.
pub fn alpha_over(src: u32, dst: u32) -> u32 {
    let sa = color::alpha(src) as f32 / 255.0;

    #[inline]
    fn ch(s: u8, d: u8, sa: f32) -> u32 {
        (s as f32 * sa + d as f32 * (1.0 - sa)).round() as u32
    }

    color::argb(
        (color::alpha(src) as f32 + color::alpha(dst) as f32 * (1.0 - sa)).round() as u32,
        ch(color::red(src), color::red(dst), sa),
        ch(color::green(src), color::green(dst), sa),
        ch(color::blue(src), color::blue(dst), sa),
    )
}

/// Ignore the destination entirely.
pub fn replace(src: u32, _dst: u32) -> u32 {
    src
}

/// Additive blending, useful for emissive/glow passes.
pub fn additive(src: u32, dst: u32) -> u32 {
    color::add(src, dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_source_wins() {
        let src = 0xFF12_3456;
        let dst = 0xFFAB_CDEF;
        assert_eq!(alpha_over(src, dst), src);
    }

    #[test]
    fn transparent_source_keeps_destination() {
        let src = 0x0012_3456;
        let dst = 0xFFAB_CDEF;
        assert_eq!(alpha_over(src, dst), dst);
    }

    #[test]
    fn half_alpha_mixes_half_half() {
        let src = color::pack(128, 200, 0, 0);
        let dst = color::pack(255, 0, 100, 0);
        let out = alpha_over(src, dst);
        // 200*0.502 ≈ 100, 100*0.498 ≈ 50, alpha saturates toward opaque.
        assert_eq!(color::red(out), 100);
        assert_eq!(color::green(out), 50);
        assert_eq!(color::alpha(out), 255);
    }

    #[test]
    fn replace_ignores_destination() {
        assert_eq!(replace(0x0100_0000, 0xFFFF_FFFF), 0x0100_0000);
    }
}
