//! Frame rendering and the per-triangle shading strategies

use std::collections::HashSet;

use super::framebuffer::Framebuffer;
use super::material::{Material, ReflectionDefaults};
use super::math::{Vec2, Vec3};
use super::project::{project_triangle, project_triangle_naive};
use super::raster::{barycentric, bounding_box, interpolate_depth};
use super::reflection::shade;
use super::types::{Color, ShadingMode};
use crate::scene::{RenderContext, Triangle};

/// Wireframe edge color
const WIRE_COLOR: Color = Color::RED;
/// Arc-length step along a wireframe edge, in pixels
const WIRE_STEP: f32 = 0.5;

/// Counters for one rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub instances: usize,
    /// Instances without a mesh
    pub instances_skipped: usize,
    pub triangles: usize,
    /// Triangles dropped by the near/far test
    pub triangles_rejected: usize,
    pub pixels_written: usize,
    /// Frame used the orthographic fallback
    pub naive_projection: bool,
}

/// Viewer and light for one frame
#[derive(Debug, Clone, Copy)]
pub struct Lighting<'a> {
    pub viewer: Vec3,
    pub light: Vec3,
    pub defaults: &'a ReflectionDefaults,
}

/// A triangle ready for rasterization: world-space attributes plus its
/// projected screen vertices (pixel x, pixel y, NDC depth)
pub struct Surface<'a> {
    pub world: &'a Triangle,
    pub screen: [Vec3; 3],
    pub material: &'a Material,
}

impl Surface<'_> {
    fn uv_at(&self, w: [f32; 3]) -> Option<Vec2> {
        self.world.uvs.map(|uv| Vec2::weighted(uv[0], uv[1], uv[2], w))
    }
}

/// Software renderer owning the framebuffer and depth buffer
pub struct Renderer {
    fb: Framebuffer,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            fb: Framebuffer::new(width, height),
        }
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    pub fn width(&self) -> usize {
        self.fb.width
    }

    pub fn height(&self) -> usize {
        self.fb.height
    }

    /// Render one frame: clear, then draw every face of every instance.
    ///
    /// Never fails. Triangles outside the near/far range, uncovered pixels,
    /// degenerate triangles and instances without a mesh are skipped.
    pub fn render(&mut self, ctx: &RenderContext) -> FrameStats {
        let fb = &mut self.fb;
        fb.clear(ctx.clear_color);

        let mut stats = FrameStats::default();
        let aspect = fb.width as f32 / fb.height as f32;
        let view_proj = ctx.camera.view_projection(aspect);
        stats.naive_projection = view_proj.is_none();

        let lighting = Lighting {
            viewer: ctx.camera.position,
            light: ctx.light_position(),
            defaults: &ctx.reflection,
        };

        for instance in ctx.instances() {
            stats.instances += 1;
            let Some(mesh) = instance.mesh.as_deref() else {
                tracing::trace!(id = ?instance.id(), "skipping instance without mesh");
                stats.instances_skipped += 1;
                continue;
            };

            for tri in mesh.triangles() {
                stats.triangles += 1;
                let screen = match &view_proj {
                    Some(m) => project_triangle(tri.positions, m, fb.width, fb.height),
                    None => Some(project_triangle_naive(tri.positions, fb.width, fb.height)),
                };
                let Some(screen) = screen else {
                    tracing::trace!(id = ?instance.id(), "triangle outside near/far range");
                    stats.triangles_rejected += 1;
                    continue;
                };

                let surface = Surface {
                    world: &tri,
                    screen,
                    material: &instance.material,
                };
                stats.pixels_written += draw_triangle(fb, ctx.mode, &surface, &lighting);
            }
        }

        tracing::debug!(
            mode = ctx.mode.label(),
            instances = stats.instances,
            triangles = stats.triangles,
            rejected = stats.triangles_rejected,
            pixels = stats.pixels_written,
            naive = stats.naive_projection,
            "frame rendered"
        );
        stats
    }
}

/// Draw one projected triangle with the given strategy. Returns the number
/// of pixel writes.
pub fn draw_triangle(fb: &mut Framebuffer, mode: ShadingMode, surface: &Surface, lighting: &Lighting) -> usize {
    match mode {
        ShadingMode::None => 0,
        ShadingMode::Wire => draw_wire(fb, &surface.screen),
        ShadingMode::Flat => draw_flat(fb, surface, lighting),
        ShadingMode::Gouraud => draw_gouraud(fb, surface, lighting),
        ShadingMode::Phong => draw_phong(fb, surface, lighting),
    }
}

/// Walk each edge in fixed steps and overwrite pixels. The depth buffer is
/// neither tested nor written. Returns the number of distinct pixels written.
fn draw_wire(fb: &mut Framebuffer, screen: &[Vec3; 3]) -> usize {
    let step = f64::from(WIRE_STEP);
    let mut written = HashSet::new();

    for i in 0..3 {
        let a = screen[(i + 1) % 3];
        let b = screen[(i + 2) % 3];
        let (ax, ay) = (f64::from(a.x), f64::from(a.y));
        let (dx, dy) = (f64::from(b.x) - ax, f64::from(b.y) - ay);
        let len = (dx * dx + dy * dy).sqrt();
        if !len.is_finite() || len == 0.0 {
            continue;
        }
        let (ux, uy) = (dx / len, dy / len);

        let Some((lo, hi)) = clip_to_viewport(ax, ay, ux, uy, len, fb.width, fb.height) else {
            continue;
        };

        // Same sample positions as stepping from t = 0, restricted to [lo, hi]
        let first_step = (lo / step).ceil() as u64;
        let end_step = (hi.min(len) / step).ceil() as u64;
        for k in first_step..end_step {
            let t = k as f64 * step;
            let (x, y) = ((ax + ux * t).round() as i32, (ay + uy * t).round() as i32);
            if !written.contains(&(x, y)) && fb.set_pixel(x, y, WIRE_COLOR) {
                written.insert((x, y));
            }
        }
    }
    written.len()
}

/// Parameter range of the ray `a + u*t`, `t` in `0..=len`, that lies within
/// one pixel of the framebuffer
fn clip_to_viewport(ax: f64, ay: f64, ux: f64, uy: f64, len: f64, width: usize, height: usize) -> Option<(f64, f64)> {
    let (mut lo, mut hi) = (0.0f64, len);
    for (p, d, max) in [(ax, ux, width as f64), (ay, uy, height as f64)] {
        let min = -1.0;
        if d.abs() < 1e-12 {
            if p < min || p > max {
                return None;
            }
            continue;
        }
        let (t0, t1) = ((min - p) / d, (max - p) / d);
        lo = lo.max(t0.min(t1));
        hi = hi.min(t0.max(t1));
    }
    (lo <= hi).then_some((lo, hi))
}

/// Scan the bounding box and hand every covered, depth-passing pixel to
/// `color_at` along with its barycentric weights
fn fill<F>(fb: &mut Framebuffer, screen: &[Vec3; 3], mut color_at: F) -> usize
where
    F: FnMut([f32; 3]) -> Color,
{
    let mut written = 0;
    for (x, y) in bounding_box(screen, fb.width, fb.height).pixels() {
        let Some(w) = barycentric(screen, x as f32, y as f32) else {
            continue;
        };
        let z = interpolate_depth(screen, w);
        if !fb.depth_test(x, y, z) {
            continue;
        }
        if fb.set_pixel_with_depth(x, y, z, color_at(w)) {
            written += 1;
        }
    }
    written
}

/// One lighting evaluation for the face: averaged vertex normal at the
/// centroid. Sampled materials are still resolved per pixel from the
/// interpolated UV.
fn draw_flat(fb: &mut Framebuffer, s: &Surface, l: &Lighting) -> usize {
    let [p0, p1, p2] = s.world.positions;
    let [n0, n1, n2] = s.world.normals;
    let normal = (n0 + n1 + n2) * (1.0 / 3.0);
    let centroid = (p0 + p1 + p2) * (1.0 / 3.0);

    let shade_face = |uv: Option<Vec2>| {
        let material = s.material.resolve(uv, l.defaults);
        shade(centroid, l.viewer, normal, l.light, &material)
    };

    if s.world.uvs.is_some() && s.material.has_sampled_channels() {
        fill(fb, &s.screen, |w| shade_face(s.uv_at(w)))
    } else {
        let color = shade_face(None);
        fill(fb, &s.screen, |_| color)
    }
}

/// Light each vertex, then blend the three colors across the face
fn draw_gouraud(fb: &mut Framebuffer, s: &Surface, l: &Lighting) -> usize {
    let colors: [Color; 3] = std::array::from_fn(|i| {
        let uv = s.world.uvs.map(|uv| uv[i]);
        let material = s.material.resolve(uv, l.defaults);
        shade(s.world.positions[i], l.viewer, s.world.normals[i], l.light, &material)
    });

    fill(fb, &s.screen, |w| Color::weighted(colors[0], colors[1], colors[2], w))
}

/// Interpolate position, normal and UV per pixel and light every pixel.
/// A normal map replaces the interpolated normal where a UV exists.
fn draw_phong(fb: &mut Framebuffer, s: &Surface, l: &Lighting) -> usize {
    let [p0, p1, p2] = s.world.positions;
    let [n0, n1, n2] = s.world.normals;

    fill(fb, &s.screen, |w| {
        let position = Vec3::weighted(p0, p1, p2, w);
        let uv = s.uv_at(w);
        let normal = uv
            .and_then(|uv| s.material.normal_at(uv))
            .unwrap_or_else(|| Vec3::weighted(n0, n1, n2, w));

        let material = s.material.resolve(uv, l.defaults);
        shade(position, l.viewer, normal, l.light, &material)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::FAR_DEPTH;

    fn flat_triangle(z: f32) -> Triangle {
        Triangle {
            positions: [Vec3::new(0.0, 0.0, z), Vec3::new(1.0, 0.0, z), Vec3::new(0.0, 1.0, z)],
            normals: [Vec3::new(0.0, 0.0, -1.0); 3],
            uvs: None,
        }
    }

    fn screen_tri(z: f32) -> [Vec3; 3] {
        [Vec3::new(2.0, 2.0, z), Vec3::new(18.0, 2.0, z), Vec3::new(2.0, 18.0, z)]
    }

    fn lighting(defaults: &ReflectionDefaults) -> Lighting<'_> {
        Lighting {
            viewer: Vec3::new(0.0, 0.0, -10.0),
            light: Vec3::new(0.0, 0.0, -10.0),
            defaults,
        }
    }

    #[test]
    fn test_none_mode_draws_nothing() {
        let mut fb = Framebuffer::new(20, 20);
        let defaults = ReflectionDefaults::default();
        let tri = flat_triangle(0.0);
        let material = Material::default();
        let s = Surface { world: &tri, screen: screen_tri(0.0), material: &material };
        assert_eq!(draw_triangle(&mut fb, ShadingMode::None, &s, &lighting(&defaults)), 0);
        assert!(fb.pixels.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_wire_ignores_depth() {
        let mut fb = Framebuffer::new(20, 20);
        fb.zbuffer.fill(-1.0);
        let written = draw_wire(&mut fb, &screen_tri(0.5));
        assert!(written > 0);
        assert_eq!(fb.pixel(10, 2), Some([255, 0, 0, 255]));
        assert!(fb.zbuffer.iter().all(|&z| z == -1.0));
    }

    fn red_pixels(fb: &Framebuffer) -> usize {
        fb.pixels.chunks_exact(4).filter(|px| *px == [255, 0, 0, 255]).count()
    }

    #[test]
    fn test_wire_counts_distinct_pixels() {
        let mut fb = Framebuffer::new(20, 20);
        let written = draw_wire(&mut fb, &screen_tri(0.0));
        assert_eq!(written, red_pixels(&fb));

        // Half the triangle hangs off the left edge
        let mut fb = Framebuffer::new(20, 20);
        let screen = [Vec3::new(-30.0, 5.0, 0.0), Vec3::new(10.0, 5.0, 0.0), Vec3::new(-30.0, 15.0, 0.0)];
        let written = draw_wire(&mut fb, &screen);
        assert!(written > 0);
        assert_eq!(written, red_pixels(&fb));
    }

    #[test]
    fn test_wire_offscreen_triangle_writes_nothing() {
        let mut fb = Framebuffer::new(20, 20);
        let screen = [Vec3::new(100.0, 100.0, 0.0), Vec3::new(140.0, 100.0, 0.0), Vec3::new(100.0, 140.0, 0.0)];
        assert_eq!(draw_wire(&mut fb, &screen), 0);
        assert_eq!(red_pixels(&fb), 0);
    }

    #[test]
    fn test_wire_very_long_edge_is_clipped() {
        // Past 2^23 a 0.5 step no longer changes an f32 position
        let mut fb = Framebuffer::new(64, 64);
        let screen = [Vec3::new(10.0, 10.0, 0.0), Vec3::new(9.0e6, 10.0, 0.0), Vec3::new(10.0, 20.0, 0.0)];
        let written = draw_wire(&mut fb, &screen);
        assert_eq!(fb.pixel(30, 10), Some([255, 0, 0, 255]));
        assert_eq!(fb.pixel(63, 10), Some([255, 0, 0, 255]));
        assert_eq!(fb.pixel(10, 15), Some([255, 0, 0, 255]));
        assert_eq!(written, red_pixels(&fb));
        assert!(written < 64 * 4);
    }

    #[test]
    fn test_fill_respects_depth() {
        let mut fb = Framebuffer::new(20, 20);
        let defaults = ReflectionDefaults::default();
        let tri = flat_triangle(0.0);
        let red = Material::constant(Color::RED, Color::BLACK);
        let green = Material::constant(Color::GREEN, Color::BLACK);

        let near = Surface { world: &tri, screen: screen_tri(0.2), material: &red };
        let far = Surface { world: &tri, screen: screen_tri(0.6), material: &green };
        assert!(draw_flat(&mut fb, &near, &lighting(&defaults)) > 0);
        assert_eq!(draw_flat(&mut fb, &far, &lighting(&defaults)), 0);
        assert_eq!(fb.pixel(4, 4), Some([255, 0, 0, 255]));
        assert!((fb.depth(4, 4).unwrap() - 0.2).abs() < 1e-6);
        assert_eq!(fb.depth(19, 19), Some(FAR_DEPTH));
    }

    #[test]
    fn test_flat_samples_texture_per_pixel() {
        use crate::rasterizer::Texture;
        use std::sync::Arc;

        let mut tex = Texture::new(2, 1);
        tex.pixels = vec![Color::RED, Color::BLUE];
        let material = Material {
            specular: Some(crate::rasterizer::MaterialChannel::Constant(Color::BLACK)),
            ..Material::textured(Arc::new(tex))
        };

        let mut tri = flat_triangle(0.0);
        tri.uvs = Some([Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 0.0)]);

        let mut fb = Framebuffer::new(20, 20);
        let defaults = ReflectionDefaults::default();
        let s = Surface { world: &tri, screen: screen_tri(0.0), material: &material };
        draw_flat(&mut fb, &s, &lighting(&defaults));

        // u grows toward the second vertex
        let left = fb.pixel(3, 3).unwrap();
        let right = fb.pixel(15, 3).unwrap();
        assert!(left[0] > 200 && left[2] == 0, "{:?}", left);
        assert!(right[2] > 200 && right[0] == 0, "{:?}", right);
    }

    #[test]
    fn test_phong_normal_map_overrides_normal() {
        use crate::rasterizer::Texture;
        use std::sync::Arc;

        // Map encodes +Z, pointing away from the light at -Z
        let map = Arc::new(Texture::solid(Color::new(0.5, 0.5, 1.0)));
        let plain = Material::constant(Color::WHITE, Color::BLACK);
        let mapped = plain.clone().with_normal_map(map);

        let mut tri = flat_triangle(0.0);
        tri.uvs = Some([Vec2::new(0.0, 0.0); 3]);

        let defaults = ReflectionDefaults::default();
        let mut fb = Framebuffer::new(20, 20);
        let s = Surface { world: &tri, screen: screen_tri(0.0), material: &plain };
        draw_phong(&mut fb, &s, &lighting(&defaults));
        assert_eq!(fb.pixel(4, 4), Some([255, 255, 255, 255]));

        let mut fb = Framebuffer::new(20, 20);
        let s = Surface { world: &tri, screen: screen_tri(0.0), material: &mapped };
        draw_phong(&mut fb, &s, &lighting(&defaults));
        // Negative diffuse clamps to black
        assert_eq!(fb.pixel(4, 4), Some([0, 0, 0, 255]));
        assert_eq!(fb.depth(4, 4), Some(0.0));
    }

    #[test]
    fn test_gouraud_resolves_material_per_vertex() {
        use crate::rasterizer::{MaterialChannel, Texture};
        use std::sync::Arc;

        let mut tex = Texture::new(3, 1);
        tex.pixels = vec![Color::RED, Color::GREEN, Color::BLUE];
        let material = Material {
            specular: Some(MaterialChannel::Constant(Color::BLACK)),
            ..Material::textured(Arc::new(tex))
        };

        // Each vertex picks its own texel
        let mut tri = flat_triangle(0.0);
        tri.uvs = Some([Vec2::new(0.1, 0.5), Vec2::new(0.5, 0.5), Vec2::new(0.9, 0.5)]);

        let defaults = ReflectionDefaults::default();
        let mut fb = Framebuffer::new(20, 20);
        let s = Surface { world: &tri, screen: screen_tri(0.0), material: &material };
        assert!(draw_gouraud(&mut fb, &s, &lighting(&defaults)) > 0);

        let [r, g, b, _] = fb.pixel(3, 3).unwrap();
        assert!(r > 150 && g < 50 && b < 50, "{:?}", (r, g, b));
        let [r, g, b, _] = fb.pixel(16, 3).unwrap();
        assert!(g > 150 && r < 50 && b < 50, "{:?}", (r, g, b));
        let [r, g, b, _] = fb.pixel(3, 16).unwrap();
        assert!(b > 150 && r < 50 && g < 50, "{:?}", (r, g, b));
    }

    #[test]
    fn test_gouraud_blends_vertex_colors() {
        let mut tri = flat_triangle(0.0);
        // First vertex faces away from the light
        tri.normals[0] = Vec3::new(0.0, 0.0, 1.0);
        let material = Material::constant(Color::WHITE, Color::BLACK);

        let defaults = ReflectionDefaults::default();
        let mut fb = Framebuffer::new(20, 20);
        let s = Surface { world: &tri, screen: screen_tri(0.0), material: &material };
        draw_gouraud(&mut fb, &s, &lighting(&defaults));

        let near_a = fb.pixel(3, 3).unwrap()[0];
        let near_b = fb.pixel(16, 3).unwrap()[0];
        assert!(near_a < near_b);
    }
}
