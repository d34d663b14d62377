//! Indexed triangle meshes

use crate::error::MeshError;
use crate::rasterizer::{Vec2, Vec3};

/// A triangle face (indices into the mesh's vertex and normal arrays)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub vertices: [usize; 3],
    pub normals: [usize; 3],
}

impl Face {
    /// Face whose normal indices match its vertex indices
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self {
            vertices: [a, b, c],
            normals: [a, b, c],
        }
    }

    pub fn with_normals(vertices: [usize; 3], normals: [usize; 3]) -> Self {
        Self { vertices, normals }
    }
}

/// One face with its attributes gathered
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub positions: [Vec3; 3],
    pub normals: [Vec3; 3],
    pub uvs: Option<[Vec2; 3]>,
}

/// Indexed mesh. Indices are validated on construction, so faces can be
/// resolved without bounds failures.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    faces: Vec<Face>,
    /// One UV triple per face
    uvs: Option<Vec<[Vec2; 3]>>,
}

impl Mesh {
    pub fn new(
        vertices: Vec<Vec3>,
        normals: Vec<Vec3>,
        faces: Vec<Face>,
        uvs: Option<Vec<[Vec2; 3]>>,
    ) -> Result<Self, MeshError> {
        for (face_idx, face) in faces.iter().enumerate() {
            if let Some(&index) = face.vertices.iter().find(|&&i| i >= vertices.len()) {
                return Err(MeshError::VertexIndex { face: face_idx, index, count: vertices.len() });
            }
            if let Some(&index) = face.normals.iter().find(|&&i| i >= normals.len()) {
                return Err(MeshError::NormalIndex { face: face_idx, index, count: normals.len() });
            }
        }
        if let Some(uvs) = &uvs {
            if uvs.len() != faces.len() {
                return Err(MeshError::UvCount { faces: faces.len(), uvs: uvs.len() });
            }
        }

        Ok(Self { vertices, normals, faces, uvs })
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn has_uvs(&self) -> bool {
        self.uvs.is_some()
    }

    /// Gather the attributes of face `idx`
    pub fn triangle(&self, idx: usize) -> Option<Triangle> {
        let face = self.faces.get(idx)?;
        Some(Triangle {
            positions: face.vertices.map(|i| self.vertices[i]),
            normals: face.normals.map(|i| self.normals[i]),
            uvs: self.uvs.as_ref().map(|uvs| uvs[idx]),
        })
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.faces.len()).filter_map(|i| self.triangle(i))
    }

    /// Copy with every vertex scaled then offset
    pub fn transformed(&self, scale: f32, offset: Vec3) -> Mesh {
        Mesh {
            vertices: self.vertices.iter().map(|&v| v * scale + offset).collect(),
            ..self.clone()
        }
    }
}
