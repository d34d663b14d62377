//! Framebuffer and depth buffer

use std::path::Path;

use super::types::Color;
use crate::error::SceneError;

/// Depth of an empty pixel (the far plane in NDC)
pub const FAR_DEPTH: f32 = 1.0;

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>,    // RGBA, 4 bytes per pixel
    pub zbuffer: Vec<f32>,  // NDC depth, -1.0 (near) to 1.0 (far)
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            zbuffer: vec![FAR_DEPTH; width * height],
            width,
            height,
        }
    }

    /// Fill with `color` and reset every depth to the far plane
    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
        self.zbuffer.fill(FAR_DEPTH);
    }

    /// Write a pixel, ignoring depth. Out-of-bounds writes are dropped and
    /// return false.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = (y * self.width + x) * 4;
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        true
    }

    /// True if a fragment at depth `z` would be visible at (x, y).
    /// Ties lose: the first fragment written at a depth stays.
    pub fn depth_test(&self, x: usize, y: usize, z: f32) -> bool {
        x < self.width && y < self.height && z < self.zbuffer[y * self.width + x]
    }

    /// Write the pixel and its depth if it passes the depth test
    pub fn set_pixel_with_depth(&mut self, x: usize, y: usize, z: f32, color: Color) -> bool {
        if !self.depth_test(x, y, z) {
            return false;
        }
        let idx = y * self.width + x;
        self.zbuffer[idx] = z;
        let pixel_idx = idx * 4;
        self.pixels[pixel_idx..pixel_idx + 4].copy_from_slice(&color.to_bytes());
        true
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            let mut px = [0; 4];
            px.copy_from_slice(&self.pixels[idx..idx + 4]);
            Some(px)
        } else {
            None
        }
    }

    pub fn depth(&self, x: usize, y: usize) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.zbuffer[y * self.width + x])
        } else {
            None
        }
    }

    /// Encode the color buffer as a PNG file
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), SceneError> {
        let path = path.as_ref();
        image::save_buffer(
            path,
            &self.pixels,
            self.width as u32,
            self.height as u32,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|source| SceneError::Image {
            path: path.display().to_string(),
            source,
        })
    }
}
