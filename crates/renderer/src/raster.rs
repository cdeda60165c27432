//! Rasterizer. R1: screen mapping + barycentric coverage, R2: depth test,
//! R3: perspective-correct attribute interpolation.
//!
//! Screen space is y-down with pixel centers at (x+0.5, y+0.5). Winding is
//! normalized so every rasterized triangle has positive signed area; edge
//! ties are resolved with the top-left rule so adjacent triangles never
//! double-cover a shared edge.

use glam::Vec2;

use crate::blend::BlendFn;
use crate::primitive::Triangle;
use crate::shader::FragmentShader;
use crate::target::Framebuffer;
use crate::uniforms::Uniforms;
use crate::vertex::Vertex;

/// Clip-space w at or below this is treated as behind the eye; the whole
/// triangle is skipped (no near-plane clipping stage).
const W_EPS: f32 = 1e-6;
/// Screen-space area below this is a degenerate triangle.
const AREA_EPS: f32 = 1e-12;

/// Depth test comparison against the stored depth value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DepthCompare {
    Never,
    #[default]
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Always,
}

impl DepthCompare {
    #[inline]
    pub fn passes(self, new: f32, old: f32) -> bool {
        match self {
            DepthCompare::Never => false,
            DepthCompare::Less => new < old,
            DepthCompare::LessEqual => new <= old,
            DepthCompare::Greater => new > old,
            DepthCompare::GreaterEqual => new >= old,
            DepthCompare::Always => true,
        }
    }
}

/// Per-draw rasterizer configuration, borrowed from the material.
pub struct RasterState<'a> {
    pub cull_backfaces: bool,
    pub depth_compare: DepthCompare,
    pub depth_write: bool,
    pub opaque: bool,
    pub blend: BlendFn,
    pub fragment: &'a dyn FragmentShader,
    pub uniforms: &'a Uniforms,
}

/// Twice the signed area of (a,b,c); positive when c lies left of a->b
/// in y-down screen coordinates.
#[inline]
pub(crate) fn orient2d(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Top-left fill rule for a positive-area triangle in y-down screen space:
/// a fragment exactly on an edge belongs to the triangle iff the edge is a
/// top edge (horizontal, pointing +x) or a left edge (pointing -y).
#[inline]
fn is_top_left(a: Vec2, b: Vec2) -> bool {
    let d = b - a;
    (d.y == 0.0 && d.x > 0.0) || d.y < 0.0
}

/// Barycentric weights of `p` in the screen triangle (sum to 1; one or more
/// weights negative outside).
#[inline]
pub(crate) fn barycentric(s: [Vec2; 3], area: f32, p: Vec2) -> [f32; 3] {
    [
        orient2d(s[1], s[2], p) / area,
        orient2d(s[2], s[0], p) / area,
        orient2d(s[0], s[1], p) / area,
    ]
}

/// Rasterize one triangle into the framebuffer.
///
/// Numeric edge cases (w <= 0, zero area, fully off-screen) produce no
/// fragments; malformed meshes are the loader's problem, not checked here.
pub fn draw_triangle(fb: &mut Framebuffer, tri: &Triangle, state: &RasterState<'_>) {
    let mut v: [&Vertex; 3] = [&tri.v[0], &tri.v[1], &tri.v[2]];
    if v.iter().any(|vert| vert.clip.w <= W_EPS) {
        return;
    }

    let width = fb.width();
    let height = fb.height();
    let (wf, hf) = (width as f32, height as f32);

    // Perspective divide + viewport map; z remapped from NDC to [0,1].
    let mut s = [Vec2::ZERO; 3];
    let mut z = [0.0f32; 3];
    let mut inv_w = [0.0f32; 3];
    for i in 0..3 {
        let c = v[i].clip;
        let iw = 1.0 / c.w;
        inv_w[i] = iw;
        s[i] = Vec2::new(
            (c.x * iw + 1.0) * 0.5 * wf,
            (1.0 - c.y * iw) * 0.5 * hf,
        );
        z[i] = (c.z * iw) * 0.5 + 0.5;
    }

    // Front faces (CCW in NDC) come out with negative area in y-down space.
    let mut area = orient2d(s[0], s[1], s[2]);
    if state.cull_backfaces && area >= -AREA_EPS {
        return;
    }
    if area.abs() < AREA_EPS {
        return;
    }
    if area < 0.0 {
        v.swap(1, 2);
        s.swap(1, 2);
        z.swap(1, 2);
        inv_w.swap(1, 2);
        area = -area;
    }

    // Bounding box clamped to the framebuffer.
    let min_x = s.iter().map(|p| p.x).fold(f32::INFINITY, f32::min).floor().max(0.0) as u32;
    let min_y = s.iter().map(|p| p.y).fold(f32::INFINITY, f32::min).floor().max(0.0) as u32;
    let max_x = s.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max).ceil();
    let max_y = s.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max).ceil();
    if max_x < 0.0 || max_y < 0.0 || min_x >= width || min_y >= height {
        return;
    }
    let max_x = (max_x as u32).min(width - 1);
    let max_y = (max_y as u32).min(height - 1);

    let top_left = [
        is_top_left(s[1], s[2]),
        is_top_left(s[2], s[0]),
        is_top_left(s[0], s[1]),
    ];

    for py in min_y..=max_y {
        for px in min_x..=max_x {
            let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
            let e = [
                orient2d(s[1], s[2], p),
                orient2d(s[2], s[0], p),
                orient2d(s[0], s[1], p),
            ];
            let covered = (0..3).all(|i| e[i] > 0.0 || (e[i] == 0.0 && top_left[i]));
            if !covered {
                continue;
            }

            let l = [e[0] / area, e[1] / area, e[2] / area];

            // NDC z interpolates linearly in screen space.
            let depth = l[0] * z[0] + l[1] * z[1] + l[2] * z[2];
            let idx = (py * width + px) as usize;
            if !state.depth_compare.passes(depth, fb.depth[idx]) {
                continue;
            }

            // Perspective-correct attribute weights: divide by w, renormalize.
            let pw = [l[0] * inv_w[0], l[1] * inv_w[1], l[2] * inv_w[2]];
            let pw_sum = pw[0] + pw[1] + pw[2];
            if pw_sum.abs() < f32::MIN_POSITIVE {
                continue;
            }
            let frag = Vertex::weighted(
                v[0],
                v[1],
                v[2],
                pw[0] / pw_sum,
                pw[1] / pw_sum,
                pw[2] / pw_sum,
            );

            let src = state.fragment.shade(state.uniforms, &frag);
            fb.color[idx] = if state.opaque {
                src
            } else {
                (state.blend)(src, fb.color[idx])
            };
            if state.depth_write {
                fb.depth[idx] = depth;
            }
        }
    }
}
