//! Scene inputs: camera, meshes, materials and the render context

mod camera;
mod context;
mod description;
mod mesh;
pub mod primitives;

pub use camera::*;
pub use context::*;
pub use description::*;
pub use mesh::*;
