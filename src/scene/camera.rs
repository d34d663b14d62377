//! Look-at perspective camera

use serde::{Deserialize, Serialize};

use crate::rasterizer::{Mat4, Vec3};

/// Camera pose and lens. The renderer only reads it; callers replace it
/// between frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub up: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, -10.0),
            // Screen y grows downward, so world -Y is up
            up: Vec3::new(0.0, -1.0, 0.0),
            target: Vec3::ZERO,
            fov: 45.0,
            near: 0.3,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            ..Default::default()
        }
    }

    /// World-to-camera transform
    pub fn view_matrix(&self) -> Option<Mat4> {
        Mat4::look_at(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Option<Mat4> {
        Mat4::perspective(self.fov, aspect, self.near, self.far)
    }

    /// Combined projection * view, or `None` for a degenerate pose or lens
    pub fn view_projection(&self, aspect: f32) -> Option<Mat4> {
        Some(self.projection_matrix(aspect)? * self.view_matrix()?)
    }
}
