//! Rasterization core: coverage, barycentric weights and depth

use super::math::Vec3;

/// Twice the signed area below which a screen triangle counts as degenerate
const DEGENERATE_AREA: f32 = 1e-6;

/// Pixel scan range of a screen-space triangle, half-open on the max side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
}

impl BoundingBox {
    pub fn is_empty(&self) -> bool {
        self.min_x >= self.max_x || self.min_y >= self.max_y
    }

    /// Every (x, y) in the box, row by row
    pub fn pixels(self) -> impl Iterator<Item = (usize, usize)> {
        (self.min_y..self.max_y).flat_map(move |y| (self.min_x..self.max_x).map(move |x| (x, y)))
    }
}

/// Screen bounding box: floor of the minimum and ceil of the maximum per
/// axis, clamped to the framebuffer.
pub fn bounding_box(v: &[Vec3; 3], width: usize, height: usize) -> BoundingBox {
    let clamp = |t: f32, limit: usize| -> usize {
        if t.is_nan() || t <= 0.0 {
            0
        } else {
            (t as usize).min(limit)
        }
    };

    let min_x = v[0].x.min(v[1].x).min(v[2].x).floor();
    let min_y = v[0].y.min(v[1].y).min(v[2].y).floor();
    let max_x = v[0].x.max(v[1].x).max(v[2].x).ceil();
    let max_y = v[0].y.max(v[1].y).max(v[2].y).ceil();

    BoundingBox {
        min_x: clamp(min_x, width),
        min_y: clamp(min_y, height),
        max_x: clamp(max_x, width),
        max_y: clamp(max_y, height),
    }
}

/// Barycentric weights of pixel (x, y) in screen triangle `v`.
///
/// Each weight is the ratio of the sub-triangle area opposite a vertex to
/// the full triangle area. Returns `None` if any weight is negative (the
/// pixel is outside) or the triangle has no area. Points on an edge are
/// inside.
pub fn barycentric(v: &[Vec3; 3], x: f32, y: f32) -> Option<[f32; 3]> {
    let (x0, y0) = (v[0].x, v[0].y);
    let (x1, y1) = (v[1].x, v[1].y);
    let (x2, y2) = (v[2].x, v[2].y);

    let area = (x0 - x2) * (y1 - y2) - (x1 - x2) * (y0 - y2);
    if area.abs() < DEGENERATE_AREA || !area.is_finite() {
        return None;
    }

    let wa = ((x1 - x2) * (y2 - y) - (x2 - x) * (y1 - y2)) / area;
    if wa < 0.0 {
        return None;
    }
    let wb = ((x2 - x) * (y0 - y2) - (x0 - x2) * (y2 - y)) / area;
    if wb < 0.0 {
        return None;
    }
    let wc = 1.0 - wa - wb;
    if wc < 0.0 {
        return None;
    }

    Some([wa, wb, wc])
}

/// Depth at a pixel from its barycentric weights
pub fn interpolate_depth(v: &[Vec3; 3], w: [f32; 3]) -> f32 {
    w[0] * v[0].z + w[1] * v[1].z + w[2] * v[2].z
}
