//! Software triangle rasterizer
//!
//! Renders meshes with a single point light into a CPU framebuffer using
//! flat, Gouraud or Phong shading, or as a wireframe.

pub mod error;
pub mod rasterizer;
pub mod scene;

pub use error::{MeshError, SceneError};

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
