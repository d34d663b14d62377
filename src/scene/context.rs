//! Render context: everything a frame reads

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::camera::Camera;
use super::mesh::Mesh;
use crate::error::SceneError;
use crate::rasterizer::{Color, Material, ReflectionDefaults, ShadingMode, Vec3};

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a mesh instance; clones of an instance share it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

/// A mesh paired with a material
#[derive(Debug, Clone)]
pub struct MeshInstance {
    id: InstanceId,
    pub mesh: Option<Arc<Mesh>>,
    pub material: Arc<Material>,
}

impl MeshInstance {
    pub fn new(mesh: Arc<Mesh>, material: Arc<Material>) -> Self {
        Self {
            id: InstanceId(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed)),
            mesh: Some(mesh),
            material,
        }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }
}

/// Caller-owned render state passed to `Renderer::render` each frame
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub camera: Camera,
    pub mode: ShadingMode,
    /// Point light position. Ignored while `light_follows_camera` is set.
    pub light: Vec3,
    pub light_follows_camera: bool,
    pub reflection: ReflectionDefaults,
    pub clear_color: Color,
    instances: HashMap<InstanceId, MeshInstance>,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            mode: ShadingMode::default(),
            light: Vec3::new(10.0, 10.0, -10.0),
            light_follows_camera: true,
            reflection: ReflectionDefaults::default(),
            clear_color: Color::BLACK,
            instances: HashMap::new(),
        }
    }
}

impl RenderContext {
    pub fn new(camera: Camera, mode: ShadingMode) -> Self {
        Self {
            camera,
            mode,
            ..Default::default()
        }
    }

    /// Add an instance to the scene. Re-adding an instance with the same id
    /// replaces it.
    pub fn add_mesh_instance(&mut self, instance: MeshInstance) -> Result<InstanceId, SceneError> {
        if instance.mesh.is_none() {
            return Err(SceneError::MissingMesh);
        }
        let id = instance.id;
        self.instances.insert(id, instance);
        Ok(id)
    }

    pub fn remove_mesh_instance(&mut self, id: InstanceId) -> Option<MeshInstance> {
        self.instances.remove(&id)
    }

    /// Mutable access, e.g. to swap a material between frames
    pub fn instance_mut(&mut self, id: InstanceId) -> Option<&mut MeshInstance> {
        self.instances.get_mut(&id)
    }

    pub fn instances(&self) -> impl Iterator<Item = &MeshInstance> {
        self.instances.values()
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn set_mode(&mut self, mode: ShadingMode) {
        self.mode = mode;
    }

    /// Pin the light at `position`; it stops following the camera
    pub fn set_light(&mut self, position: Vec3) {
        self.light = position;
        self.light_follows_camera = false;
    }

    /// Light position in effect for the next frame
    pub fn light_position(&self) -> Vec3 {
        if self.light_follows_camera {
            self.camera.position
        } else {
            self.light
        }
    }
}
