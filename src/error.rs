//! Error types for scene construction and loading
//!
//! Rendering itself never fails: rejected triangles and uncovered pixels are
//! skipped silently. Only building meshes and reading scene files can error.

use thiserror::Error;

/// Invalid mesh topology
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("face {face} references vertex {index}, mesh has {count} vertices")]
    VertexIndex { face: usize, index: usize, count: usize },

    #[error("face {face} references normal {index}, mesh has {count} normals")]
    NormalIndex { face: usize, index: usize, count: usize },

    #[error("mesh has {faces} faces but {uvs} uv triples")]
    UvCount { faces: usize, uvs: usize },
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),

    #[error("failed to load image {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid mesh: {0}")]
    Mesh(#[from] MeshError),

    #[error("frame size {width}x{height} is out of range")]
    InvalidSize { width: usize, height: usize },

    #[error("mesh instance has no mesh")]
    MissingMesh,
}
