//! Scene files
//!
//! Uses RON (Rusty Object Notation) for human-readable scene descriptions:
//! render settings, camera, and a list of built-in meshes with materials.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::context::{MeshInstance, RenderContext};
use super::primitives;
use crate::error::SceneError;
use crate::rasterizer::{Color, Material, MaterialChannel, ReflectionDefaults, ShadingMode, Texture, Vec3};

/// Frame-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    pub mode: ShadingMode,
    pub clear_color: Color,
    pub light: Vec3,
    pub light_follows_camera: bool,
    pub reflection: ReflectionDefaults,
}

impl RenderConfig {
    /// Largest framebuffer side the viewer can upload as a texture
    pub const MAX_DIMENSION: usize = u16::MAX as usize;

    /// Reject frame sizes that are empty or too large to display
    pub fn validate(&self) -> Result<(), SceneError> {
        let in_range = |d: usize| (1..=Self::MAX_DIMENSION).contains(&d);
        if in_range(self.width) && in_range(self.height) {
            Ok(())
        } else {
            Err(SceneError::InvalidSize {
                width: self.width,
                height: self.height,
            })
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 750,
            mode: ShadingMode::default(),
            clear_color: Color::BLACK,
            light: Vec3::new(10.0, 10.0, -10.0),
            light_follows_camera: true,
            reflection: ReflectionDefaults::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Triangle,
    Quad,
    Cube,
    Sphere { segments: usize, rings: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TextureDesc {
    /// Image file, relative to the scene file
    File(PathBuf),
    Checkerboard { size: usize, cell: usize, a: Color, b: Color },
    Solid(Color),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChannelDesc {
    Constant(Color),
    Texture(TextureDesc),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDesc {
    pub diffuse: Option<ChannelDesc>,
    pub specular: Option<ChannelDesc>,
    pub normal_map: Option<TextureDesc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDesc {
    pub primitive: Primitive,
    #[serde(default)]
    pub offset: Vec3,
    #[serde(default = "unit_scale")]
    pub scale: f32,
    #[serde(default)]
    pub material: MaterialDesc,
}

fn unit_scale() -> f32 {
    1.0
}

/// Contents of a scene file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub config: RenderConfig,
    pub camera: Camera,
    pub objects: Vec<ObjectDesc>,
}

impl SceneDescription {
    /// Built-in scene shown when no file is given
    pub fn demo() -> Self {
        let checker = TextureDesc::Checkerboard {
            size: 64,
            cell: 8,
            a: Color::new(0.9, 0.9, 0.9),
            b: Color::new(0.2, 0.3, 0.8),
        };
        Self {
            config: RenderConfig {
                mode: ShadingMode::Phong,
                ..Default::default()
            },
            camera: Camera::looking_at(Vec3::new(3.0, -2.0, -8.0), Vec3::ZERO),
            objects: vec![
                ObjectDesc {
                    primitive: Primitive::Cube,
                    offset: Vec3::new(-1.5, 0.0, 0.0),
                    scale: 1.0,
                    material: MaterialDesc {
                        diffuse: Some(ChannelDesc::Texture(checker)),
                        specular: Some(ChannelDesc::Constant(Color::new(0.3, 0.3, 0.3))),
                        normal_map: None,
                    },
                },
                ObjectDesc {
                    primitive: Primitive::Sphere { segments: 24, rings: 16 },
                    offset: Vec3::new(1.5, 0.0, 0.0),
                    scale: 1.0,
                    material: MaterialDesc {
                        diffuse: Some(ChannelDesc::Constant(Color::new(0.8, 0.3, 0.2))),
                        specular: None,
                        normal_map: None,
                    },
                },
            ],
        }
    }

    /// Build the render context. Texture paths resolve against `base_dir`;
    /// each file is loaded once and shared.
    pub fn build(&self, base_dir: &Path) -> Result<RenderContext, SceneError> {
        let mut ctx = RenderContext::new(self.camera, self.config.mode);
        ctx.light = self.config.light;
        ctx.light_follows_camera = self.config.light_follows_camera;
        ctx.reflection = self.config.reflection;
        ctx.clear_color = self.config.clear_color;

        let mut cache = TextureCache::new(base_dir);
        for object in &self.objects {
            let mesh = match object.primitive {
                Primitive::Triangle => primitives::triangle(),
                Primitive::Quad => primitives::quad(),
                Primitive::Cube => primitives::cube(),
                Primitive::Sphere { segments, rings } => primitives::uv_sphere(segments, rings),
            };
            let mesh = mesh.transformed(object.scale, object.offset);
            let material = cache.material(&object.material)?;
            ctx.add_mesh_instance(MeshInstance::new(Arc::new(mesh), Arc::new(material)))?;
        }

        tracing::info!(objects = self.objects.len(), textures = cache.loaded.len(), "built scene");
        Ok(ctx)
    }
}

struct TextureCache<'a> {
    base_dir: &'a Path,
    loaded: HashMap<PathBuf, Arc<Texture>>,
}

impl<'a> TextureCache<'a> {
    fn new(base_dir: &'a Path) -> Self {
        Self { base_dir, loaded: HashMap::new() }
    }

    fn texture(&mut self, desc: &TextureDesc) -> Result<Arc<Texture>, SceneError> {
        match desc {
            TextureDesc::File(rel) => {
                let path = self.base_dir.join(rel);
                if let Some(tex) = self.loaded.get(&path) {
                    return Ok(Arc::clone(tex));
                }
                let tex = Arc::new(Texture::from_file(&path)?);
                self.loaded.insert(path, Arc::clone(&tex));
                Ok(tex)
            }
            TextureDesc::Checkerboard { size, cell, a, b } => {
                Ok(Arc::new(Texture::checkerboard(*size, *size, *cell, *a, *b)))
            }
            TextureDesc::Solid(color) => Ok(Arc::new(Texture::solid(*color))),
        }
    }

    fn channel(&mut self, desc: Option<&ChannelDesc>) -> Result<Option<MaterialChannel>, SceneError> {
        Ok(match desc {
            None => None,
            Some(ChannelDesc::Constant(c)) => Some(MaterialChannel::Constant(*c)),
            Some(ChannelDesc::Texture(t)) => Some(MaterialChannel::Sampled(self.texture(t)?)),
        })
    }

    fn material(&mut self, desc: &MaterialDesc) -> Result<Material, SceneError> {
        Ok(Material {
            diffuse: self.channel(desc.diffuse.as_ref())?,
            specular: self.channel(desc.specular.as_ref())?,
            normal_map: desc.normal_map.as_ref().map(|t| self.texture(t)).transpose()?,
        })
    }
}

/// Load a scene description from a RON file
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<SceneDescription, SceneError> {
    let contents = fs::read_to_string(path)?;
    load_scene_from_str(&contents)
}

/// Load a scene description from a RON string (for embedded scenes or testing)
pub fn load_scene_from_str(s: &str) -> Result<SceneDescription, SceneError> {
    let scene: SceneDescription = ron::from_str(s)?;
    scene.config.validate()?;
    Ok(scene)
}

/// Save a scene description to a RON file
pub fn save_scene<P: AsRef<Path>>(scene: &SceneDescription, path: P) -> Result<(), SceneError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(scene, config)?;
    fs::write(path, contents)?;
    Ok(())
}
