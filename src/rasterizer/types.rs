//! Core types for the rasterizer

use std::ops::{Add, Mul};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::math::Vec2;
use crate::error::SceneError;

/// Linear RGB color, nominally 0.0-1.0 per channel.
///
/// Shading arithmetic runs unclamped; values are only clamped when written
/// into the framebuffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };
    pub const RED: Color = Color { r: 1.0, g: 0.0, b: 0.0 };
    pub const GREEN: Color = Color { r: 0.0, g: 1.0, b: 0.0 };
    pub const BLUE: Color = Color { r: 0.0, g: 0.0, b: 1.0 };

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// From 8-bit channels
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Barycentric blend of three colors
    pub fn weighted(a: Color, b: Color, c: Color, w: [f32; 3]) -> Color {
        a * w[0] + b * w[1] + c * w[2]
    }

    /// Clamp to 0.0-1.0 and convert to [u8; 4] RGBA for the framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), 255]
    }
}

impl Add for Color {
    type Output = Color;
    fn add(self, other: Color) -> Color {
        Color {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

impl Mul<f32> for Color {
    type Output = Color;
    fn mul(self, s: f32) -> Color {
        Color {
            r: self.r * s,
            g: self.g * s,
            b: self.b * s,
        }
    }
}

/// Simple texture (array of colors)
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
    pub name: String,
}

impl Texture {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::WHITE; width * height],
            name: String::new(),
        }
    }

    /// Single-texel texture
    pub fn solid(color: Color) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![color],
            name: "solid".to_string(),
        }
    }

    /// Load texture from an image file (PNG, JPEG or BMP)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| SceneError::Image {
            path: path.display().to_string(),
            source,
        })?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let tex = Self::from_image(img, name);
        tracing::info!(name = %tex.name, width = tex.width, height = tex.height, "loaded texture");
        Ok(tex)
    }

    /// Load texture from raw encoded image bytes
    pub fn from_bytes(bytes: &[u8], name: String) -> Result<Self, SceneError> {
        let img = image::load_from_memory(bytes).map_err(|source| SceneError::Image {
            path: name.clone(),
            source,
        })?;
        Ok(Self::from_image(img, name))
    }

    fn from_image(img: image::DynamicImage, name: String) -> Self {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();

        let pixels: Vec<Color> = rgb
            .pixels()
            .map(|p| Color::from_rgb8(p[0], p[1], p[2]))
            .collect();

        Self {
            width: width as usize,
            height: height as usize,
            pixels,
            name,
        }
    }

    /// Create a checkerboard test texture with `cell`-texel squares
    pub fn checkerboard(width: usize, height: usize, cell: usize, color1: Color, color2: Color) -> Self {
        let cell = cell.max(1);
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / cell) + (y / cell)) % 2 == 0;
                pixels.push(if checker { color1 } else { color2 });
            }
        }
        Self { width, height, pixels, name: "checkerboard".to_string() }
    }

    /// Nearest-neighbour lookup at normalized UV.
    ///
    /// The texel is `floor(u * width), floor(v * height)`, clamped to the
    /// edge texel for coordinates outside 0.0-1.0.
    pub fn sample(&self, uv: Vec2) -> Color {
        if self.width == 0 || self.height == 0 {
            return Color::BLACK;
        }
        let tx = texel_index(uv.x, self.width);
        let ty = texel_index(uv.y, self.height);
        self.pixels[ty * self.width + tx]
    }

    /// Get pixel at x,y coordinates
    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            Color::BLACK
        }
    }
}

fn texel_index(t: f32, size: usize) -> usize {
    let i = (t * size as f32).floor();
    // NaN lands on texel 0
    if i.is_nan() || i < 0.0 {
        0
    } else {
        (i as usize).min(size - 1)
    }
}

/// Per-triangle drawing procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShadingMode {
    /// Nothing is drawn
    #[default]
    None,
    Wire,
    Flat,
    Gouraud,
    Phong,
}

impl ShadingMode {
    pub const ALL: [ShadingMode; 5] = [
        ShadingMode::None,
        ShadingMode::Wire,
        ShadingMode::Flat,
        ShadingMode::Gouraud,
        ShadingMode::Phong,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ShadingMode::None => "None",
            ShadingMode::Wire => "Wire",
            ShadingMode::Flat => "Flat",
            ShadingMode::Gouraud => "Gouraud",
            ShadingMode::Phong => "Phong",
        }
    }

    pub fn from_index(i: usize) -> Option<ShadingMode> {
        ShadingMode::ALL.get(i).copied()
    }
}
