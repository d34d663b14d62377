//! Materials and the per-point material resolver

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::math::{Vec2, Vec3};
use super::types::{Color, Texture};

/// Fallback reflection constants used when a material leaves a term open
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReflectionDefaults {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub shininess: f32,
}

impl Default for ReflectionDefaults {
    fn default() -> Self {
        Self {
            ambient: Color::BLACK,
            diffuse: Color::WHITE,
            specular: Color::WHITE,
            shininess: 20.0,
        }
    }
}

/// Source of one reflectance term
#[derive(Debug, Clone)]
pub enum MaterialChannel {
    Constant(Color),
    Sampled(Arc<Texture>),
}

/// Surface description attached to a mesh instance
#[derive(Debug, Clone, Default)]
pub struct Material {
    pub diffuse: Option<MaterialChannel>,
    pub specular: Option<MaterialChannel>,
    /// Tangent-space normals encoded as RGB = (xyz + 1) / 2
    pub normal_map: Option<Arc<Texture>>,
}

/// Concrete reflectance at one surface point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongMaterial {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub shininess: f32,
}

impl Material {
    pub fn constant(diffuse: Color, specular: Color) -> Self {
        Self {
            diffuse: Some(MaterialChannel::Constant(diffuse)),
            specular: Some(MaterialChannel::Constant(specular)),
            normal_map: None,
        }
    }

    pub fn textured(diffuse: Arc<Texture>) -> Self {
        Self {
            diffuse: Some(MaterialChannel::Sampled(diffuse)),
            specular: None,
            normal_map: None,
        }
    }

    pub fn with_normal_map(mut self, normal_map: Arc<Texture>) -> Self {
        self.normal_map = Some(normal_map);
        self
    }

    /// True if diffuse or specular reflectance varies with UV
    pub fn has_sampled_channels(&self) -> bool {
        let sampled = |c: &Option<MaterialChannel>| matches!(c, Some(MaterialChannel::Sampled(_)));
        sampled(&self.diffuse) || sampled(&self.specular)
    }

    /// Resolve reflectance at `uv`.
    ///
    /// Ambient and shininess always come from `defaults`. A sampled channel
    /// without a UV falls back to the default color.
    pub fn resolve(&self, uv: Option<Vec2>, defaults: &ReflectionDefaults) -> PhongMaterial {
        PhongMaterial {
            ambient: defaults.ambient,
            diffuse: resolve_channel(self.diffuse.as_ref(), uv, defaults.diffuse),
            specular: resolve_channel(self.specular.as_ref(), uv, defaults.specular),
            shininess: defaults.shininess,
        }
    }

    /// Decoded normal-map normal at `uv`, if the material has a normal map
    pub fn normal_at(&self, uv: Vec2) -> Option<Vec3> {
        let map = self.normal_map.as_ref()?;
        let texel = map.sample(uv);
        Some(Vec3::new(2.0 * texel.r - 1.0, 2.0 * texel.g - 1.0, 2.0 * texel.b - 1.0).normalize())
    }
}

fn resolve_channel(channel: Option<&MaterialChannel>, uv: Option<Vec2>, fallback: Color) -> Color {
    match (channel, uv) {
        (Some(MaterialChannel::Constant(c)), _) => *c,
        (Some(MaterialChannel::Sampled(tex)), Some(uv)) => tex.sample(uv),
        _ => fallback,
    }
}
