//! Packed-color arithmetic. C1: the leaf every later stage builds on.
//!
//! A color is a plain `u32`: 0xAARRGGBB. Arithmetic is channel-wise,
//! rounded to nearest and clamped to [0,255]; only [`argb`] packs raw
//! channel values and lets them wrap.

/// Raw packing; channel values wrap via `& 0xFF` (no clamping).
#[inline]
pub const fn argb(a: u32, r: u32, g: u32, b: u32) -> u32 {
    ((a & 0xFF) << 24) | ((r & 0xFF) << 16) | ((g & 0xFF) << 8) | (b & 0xFF)
}

/// Pack four 8-bit channels.
#[inline]
pub const fn pack(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

#[inline]
pub const fn alpha(c: u32) -> u8 {
    (c >> 24) as u8
}

#[inline]
pub const fn red(c: u32) -> u8 {
    (c >> 16) as u8
}

#[inline]
pub const fn green(c: u32) -> u8 {
    (c >> 8) as u8
}

#[inline]
pub const fn blue(c: u32) -> u8 {
    c as u8
}

/// Pack from floats in [0,1]; rounded to nearest, clamped.
#[inline]
pub fn from_f32(a: f32, r: f32, g: f32, b: f32) -> u32 {
    #[inline]
    fn ch(v: f32) -> u32 {
        (v.clamp(0.0, 1.0) * 255.0).round() as u32
    }
    argb(ch(a), ch(r), ch(g), ch(b))
}

/// Channel-wise saturating add (all four channels).
#[inline]
pub fn add(x: u32, y: u32) -> u32 {
    #[inline]
    fn ch(a: u8, b: u8) -> u32 {
        a.saturating_add(b) as u32
    }
    argb(
        ch(alpha(x), alpha(y)),
        ch(red(x), red(y)),
        ch(green(x), green(y)),
        ch(blue(x), blue(y)),
    )
}

/// Channel-wise saturating subtract (all four channels).
#[inline]
pub fn sub(x: u32, y: u32) -> u32 {
    #[inline]
    fn ch(a: u8, b: u8) -> u32 {
        a.saturating_sub(b) as u32
    }
    argb(
        ch(alpha(x), alpha(y)),
        ch(red(x), red(y)),
        ch(green(x), green(y)),
        ch(blue(x), blue(y)),
    )
}

/// Channel-wise modulate: (a*b)/255, rounded to nearest.
#[inline]
pub fn mul(x: u32, y: u32) -> u32 {
    #[inline]
    fn ch(a: u8, b: u8) -> u32 {
        (a as u32 * b as u32 + 127) / 255
    }
    argb(
        ch(alpha(x), alpha(y)),
        ch(red(x), red(y)),
        ch(green(x), green(y)),
        ch(blue(x), blue(y)),
    )
}

/// Scale RGB by `factor` (clamped to [0,1] behavior via output clamp);
/// alpha is preserved.
#[inline]
pub fn scale(c: u32, factor: f32) -> u32 {
    #[inline]
    fn ch(v: u8, f: f32) -> u32 {
        ((v as f32 * f).round().clamp(0.0, 255.0)) as u32
    }
    argb(
        alpha(c) as u32,
        ch(red(c), factor),
        ch(green(c), factor),
        ch(blue(c), factor),
    )
}

/// Darken RGB by `amount` in [0,1]: 0 leaves the color, 1 is black.
#[inline]
pub fn darken(c: u32, amount: f32) -> u32 {
    scale(c, 1.0 - amount.clamp(0.0, 1.0))
}

/// Brighten RGB by `amount` in [0,1]: interpolate toward white.
#[inline]
pub fn brighten(c: u32, amount: f32) -> u32 {
    let t = amount.clamp(0.0, 1.0);
    #[inline]
    fn ch(v: u8, t: f32) -> u32 {
        (v as f32 + (255.0 - v as f32) * t).round() as u32
    }
    argb(
        alpha(c) as u32,
        ch(red(c), t),
        ch(green(c), t),
        ch(blue(c), t),
    )
}

/// Channel-wise interpolation from `x` (t=0) to `y` (t=1), all four
/// channels, rounded to nearest.
#[inline]
pub fn lerp(x: u32, y: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    #[inline]
    fn ch(a: u8, b: u8, t: f32) -> u32 {
        (a as f32 + (b as f32 - a as f32) * t).round() as u32
    }
    argb(
        ch(alpha(x), alpha(y), t),
        ch(red(x), red(y), t),
        ch(green(x), green(y), t),
        ch(blue(x), blue(y), t),
    )
}

pub const WHITE: u32 = 0xFFFF_FFFF;
pub const BLACK: u32 = 0xFF00_0000;
pub const TRANSPARENT: u32 = 0x0000_0000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_round_trip() {
        // getColor(getARGB(c)) == c for any packed color.
        for &c in &[0u32, 0xFFFF_FFFF, 0x8040_20FF, 0x0123_4567, 0xDEAD_BEEF] {
            let repacked = argb(
                alpha(c) as u32,
                red(c) as u32,
                green(c) as u32,
                blue(c) as u32,
            );
            assert_eq!(repacked, c);
        }
    }

    #[test]
    fn raw_pack_wraps() {
        assert_eq!(argb(0x1FF, 0x100, 0, 0), 0xFF00_0000);
    }

    #[test]
    fn add_saturates() {
        let c = add(pack(255, 200, 100, 250), pack(10, 100, 10, 10));
        assert_eq!(c, pack(255, 255, 110, 255));
    }

    #[test]
    fn mul_white_is_identity() {
        let c = 0xFF12_AB56;
        assert_eq!(mul(c, WHITE), c);
        assert_eq!(mul(c, BLACK) & 0x00FF_FFFF, 0);
    }

    #[test]
    fn darken_edges() {
        let c = pack(255, 128, 128, 128);
        assert_eq!(darken(c, 0.0), c);
        assert_eq!(darken(c, 1.0), pack(255, 0, 0, 0));
        assert_eq!(darken(c, 0.5), pack(255, 64, 64, 64));
    }

    #[test]
    fn brighten_reaches_white() {
        let c = pack(128, 10, 20, 30);
        assert_eq!(brighten(c, 1.0), pack(128, 255, 255, 255));
        assert_eq!(brighten(c, 0.0), c);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = pack(0, 0, 0, 0);
        let b = pack(255, 255, 255, 255);
        assert_eq!(lerp(a, b, 0.0), a);
        assert_eq!(lerp(a, b, 1.0), b);
        assert_eq!(lerp(a, b, 0.5), pack(128, 128, 128, 128));
    }

    #[test]
    fn from_f32_rounds_and_clamps() {
        assert_eq!(from_f32(1.5, -0.2, 0.5, 1.0), pack(255, 0, 128, 255));
    }
}
