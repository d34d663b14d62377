//! CPU triangle rasterizer
//!
//! Pipeline per triangle:
//! - Projection through the camera's view-projection with near/far rejection
//! - Bounding-box scan with barycentric coverage
//! - Z-buffer test (strict less-than)
//! - Wire, flat, Gouraud or Phong shading with texture and normal maps

mod framebuffer;
mod material;
mod math;
mod project;
mod raster;
mod reflection;
mod render;
mod types;

pub use framebuffer::*;
pub use material::*;
pub use math::*;
pub use project::*;
pub use raster::*;
pub use reflection::*;
pub use render::*;
pub use types::*;
