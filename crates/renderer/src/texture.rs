//! Texture sampling: UV wrap policies + nearest/bilinear filtering over an
//! immutable [`Bitmap`].
//!
//! UV convention: u grows right, v grows down (row 0 is v=0). A wrap policy
//! defines both a continuous wrap (for filtering) and an integer texel-index
//! wrap (for direct lookups).

use std::sync::Arc;

use asset::Bitmap;

use crate::color;

/// Policy for texture coordinates outside [0,1].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UvWrap {
    #[default]
    Repeat,
    MirroredRepeat,
    ClampToEdge,
}

impl UvWrap {
    /// Wrap a continuous coordinate into [0,1].
    #[inline]
    pub fn wrap(self, u: f32) -> f32 {
        match self {
            UvWrap::Repeat => u - u.floor(),
            UvWrap::MirroredRepeat => {
                // Period 2, reflected around every integer boundary.
                let m = u - 2.0 * (u / 2.0).floor();
                if m > 1.0 { 2.0 - m } else { m }
            }
            UvWrap::ClampToEdge => u.clamp(0.0, 1.0),
        }
    }

    /// Wrap an integer texel index into [0, n).
    #[inline]
    pub fn wrap_index(self, i: i32, n: u32) -> u32 {
        debug_assert!(n > 0);
        let n = n as i32;
        let w = match self {
            UvWrap::Repeat => i.rem_euclid(n),
            UvWrap::MirroredRepeat => {
                let m = i.rem_euclid(2 * n);
                if m >= n { 2 * n - 1 - m } else { m }
            }
            UvWrap::ClampToEdge => i.clamp(0, n - 1),
        };
        w as u32
    }
}

/// Texel reconstruction filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SampleFilter {
    #[default]
    Nearest,
    Bilinear,
}

/// Immutable pixel grid + replaceable wrap and sampling policies.
#[derive(Clone, Debug)]
pub struct Texture {
    bitmap: Arc<Bitmap>,
    pub wrap: UvWrap,
    pub filter: SampleFilter,
}

impl Texture {
    pub fn new(bitmap: Arc<Bitmap>) -> Self {
        Self {
            bitmap,
            wrap: UvWrap::default(),
            filter: SampleFilter::default(),
        }
    }

    pub fn with_wrap(mut self, wrap: UvWrap) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn with_filter(mut self, filter: SampleFilter) -> Self {
        self.filter = filter;
        self
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.bitmap.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.bitmap.height
    }

    /// Direct texel fetch with index wrapping.
    #[inline]
    pub fn texel(&self, x: i32, y: i32) -> u32 {
        let xi = self.wrap.wrap_index(x, self.bitmap.width);
        let yi = self.wrap.wrap_index(y, self.bitmap.height);
        self.bitmap.texel(xi, yi)
    }

    /// Sample at (u,v): wrap first, then filter.
    pub fn sample(&self, u: f32, v: f32) -> u32 {
        let uw = self.wrap.wrap(u);
        let vw = self.wrap.wrap(v);
        let w = self.bitmap.width;
        let h = self.bitmap.height;

        match self.filter {
            SampleFilter::Nearest => {
                // uw==1.0 lands on the edge texel via the index clamp below.
                let x = ((uw * w as f32) as i32).min(w as i32 - 1);
                let y = ((vw * h as f32) as i32).min(h as i32 - 1);
                self.bitmap.texel(x.max(0) as u32, y.max(0) as u32)
            }
            SampleFilter::Bilinear => {
                let x = uw * w as f32 - 0.5;
                let y = vw * h as f32 - 0.5;
                let x0 = x.floor();
                let y0 = y.floor();
                let fx = x - x0;
                let fy = y - y0;
                let (x0, y0) = (x0 as i32, y0 as i32);

                let t00 = self.texel(x0, y0);
                let t10 = self.texel(x0 + 1, y0);
                let t01 = self.texel(x0, y0 + 1);
                let t11 = self.texel(x0 + 1, y0 + 1);

                let top = color::lerp(t00, t10, fx);
                let bottom = color::lerp(t01, t11, fx);
                color::lerp(top, bottom, fy)
            }
        }
    }
}
