//! Projection stage: world space to screen space

use super::math::{Mat4, Vec3, Vec4};

/// World units spanning half the screen width in the orthographic fallback
const ORTHO_SCALE: f32 = 5.0;

/// Project one world-space point to screen space.
///
/// Returns pixel x, pixel y and NDC depth, or `None` if the depth after the
/// perspective divide lies outside -1.0..=1.0 (beyond the near/far planes).
pub fn project_point(v: Vec3, view_proj: &Mat4, width: usize, height: usize) -> Option<Vec3> {
    let clip = view_proj.transform(Vec4::point(v));
    let ndc = Vec3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w);

    // NaN from w == 0 fails the range check too
    if !(-1.0..=1.0).contains(&ndc.z) {
        return None;
    }

    Some(viewport(ndc, width, height))
}

/// Project a triangle. The whole triangle is rejected if any vertex falls
/// outside the near/far range; no clipping generates new geometry.
pub fn project_triangle(verts: [Vec3; 3], view_proj: &Mat4, width: usize, height: usize) -> Option<[Vec3; 3]> {
    Some([
        project_point(verts[0], view_proj, width, height)?,
        project_point(verts[1], view_proj, width, height)?,
        project_point(verts[2], view_proj, width, height)?,
    ])
}

/// Orthographic projection that ignores the camera pose.
///
/// Used when the camera cannot produce a view-projection matrix. Depth is
/// the raw world z.
pub fn project_triangle_naive(verts: [Vec3; 3], width: usize, height: usize) -> [Vec3; 3] {
    let aspect = height as f32 / width as f32;
    verts.map(|v| {
        let ndc = Vec3::new(v.x / ORTHO_SCALE, v.y / (ORTHO_SCALE * aspect), v.z);
        viewport(ndc, width, height)
    })
}

/// Map NDC x/y from -1.0..1.0 to 0..width / 0..height
fn viewport(ndc: Vec3, width: usize, height: usize) -> Vec3 {
    let (w, h) = (width as f32, height as f32);
    Vec3 {
        x: ndc.x * w / 2.0 + w / 2.0,
        y: ndc.y * h / 2.0 + h / 2.0,
        z: ndc.z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_matrix(width: usize, height: usize) -> Mat4 {
        let view = Mat4::look_at(
            Vec3::new(0.0, 0.0, -10.0),
            Vec3::ZERO,
            Vec3::new(0.0, -1.0, 0.0),
        )
        .unwrap();
        let proj = Mat4::perspective(45.0, width as f32 / height as f32, 0.3, 1000.0).unwrap();
        proj * view
    }

    #[test]
    fn test_look_at_target_hits_center() {
        let m = camera_matrix(1000, 750);
        let p = project_point(Vec3::ZERO, &m, 1000, 750).unwrap();
        assert!((p.x - 500.0).abs() <= 1.0);
        assert!((p.y - 375.0).abs() <= 1.0);
        assert!(p.z > -1.0 && p.z < 1.0);
    }

    #[test]
    fn test_nearer_point_has_smaller_depth() {
        let m = camera_matrix(100, 100);
        let near = project_point(Vec3::new(0.0, 0.0, -5.0), &m, 100, 100).unwrap();
        let far = project_point(Vec3::new(0.0, 0.0, 5.0), &m, 100, 100).unwrap();
        assert!(near.z < far.z);
    }

    #[test]
    fn test_rejects_behind_near_and_beyond_far() {
        let m = camera_matrix(100, 100);
        // 0.1 in front of the camera, inside the 0.3 near distance
        assert!(project_point(Vec3::new(0.0, 0.0, -9.9), &m, 100, 100).is_none());
        assert!(project_point(Vec3::new(0.0, 0.0, 2000.0), &m, 100, 100).is_none());
        // Exactly at the camera: w == 0
        assert!(project_point(Vec3::new(0.0, 0.0, -10.0), &m, 100, 100).is_none());
    }

    #[test]
    fn test_triangle_rejected_if_any_vertex_out() {
        let m = camera_matrix(100, 100);
        let tri = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 2000.0),
        ];
        assert!(project_triangle(tri, &m, 100, 100).is_none());
    }

    #[test]
    fn test_naive_projection() {
        let out = project_triangle_naive(
            [Vec3::ZERO, Vec3::new(5.0, 0.0, 0.3), Vec3::new(0.0, 3.75, 0.0)],
            1000,
            750,
        );
        assert_eq!(out[0], Vec3::new(500.0, 375.0, 0.0));
        assert!((out[1].x - 1000.0).abs() < 1e-3);
        assert!((out[1].z - 0.3).abs() < 1e-6);
        assert!((out[2].y - 750.0).abs() < 1e-3);
    }
}
