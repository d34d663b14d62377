//! Built-in meshes

use std::f32::consts::PI;

use super::mesh::{Face, Mesh};
use crate::rasterizer::{Vec2, Vec3};

/// Unit right triangle in the z = 0 plane, facing -Z
pub fn triangle() -> Mesh {
    let vertices = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ];
    let normals = vec![Vec3::new(0.0, 0.0, -1.0); 3];
    let uvs = vec![[Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)]];
    from_parts(vertices, normals, vec![Face::new(0, 1, 2)], Some(uvs))
}

/// 2x2 square in the z = 0 plane centered at the origin, facing -Z
pub fn quad() -> Mesh {
    let vertices = vec![
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(-1.0, 1.0, 0.0),
    ];
    let normals = vec![Vec3::new(0.0, 0.0, -1.0); 4];
    let faces = vec![Face::new(0, 1, 2), Face::new(0, 2, 3)];
    let uvs = vec![
        [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)],
        [Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0)],
    ];
    from_parts(vertices, normals, faces, Some(uvs))
}

/// Cube spanning -1..1 on every axis with hard-edged normals
pub fn cube() -> Mesh {
    // Corners of each side, clockwise seen from outside
    let sides = [
        // Front (-Z)
        (Vec3::new(0.0, 0.0, -1.0), [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
        ]),
        // Back (+Z)
        (Vec3::new(0.0, 0.0, 1.0), [
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
        ]),
        // Top (+Y)
        (Vec3::new(0.0, 1.0, 0.0), [
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
        ]),
        // Bottom (-Y)
        (Vec3::new(0.0, -1.0, 0.0), [
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(-1.0, -1.0, -1.0),
        ]),
        // Right (+X)
        (Vec3::new(1.0, 0.0, 0.0), [
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, -1.0),
        ]),
        // Left (-X)
        (Vec3::new(-1.0, 0.0, 0.0), [
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, 1.0),
        ]),
    ];

    let corner_uvs = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut faces = Vec::with_capacity(12);
    let mut uvs = Vec::with_capacity(12);

    for (normal, corners) in sides {
        let base = vertices.len();
        vertices.extend_from_slice(&corners);
        normals.extend_from_slice(&[normal; 4]);

        // Two triangles per side
        faces.push(Face::new(base, base + 2, base + 1));
        faces.push(Face::new(base, base + 3, base + 2));
        uvs.push([corner_uvs[0], corner_uvs[2], corner_uvs[1]]);
        uvs.push([corner_uvs[0], corner_uvs[3], corner_uvs[2]]);
    }

    from_parts(vertices, normals, faces, Some(uvs))
}

/// Unit sphere with smooth normals. `segments` around, `rings` pole to pole.
pub fn uv_sphere(segments: usize, rings: usize) -> Mesh {
    let segments = segments.max(3);
    let rings = rings.max(2);

    let mut vertices = Vec::with_capacity((segments + 1) * (rings + 1));
    let mut grid_uvs = Vec::with_capacity(vertices.capacity());
    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let theta = v * PI;
        for seg in 0..=segments {
            let u = seg as f32 / segments as f32;
            let phi = u * 2.0 * PI;
            vertices.push(Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin()));
            grid_uvs.push(Vec2::new(u, v));
        }
    }

    let stride = segments + 1;
    let mut faces = Vec::with_capacity(segments * rings * 2);
    let mut uvs = Vec::with_capacity(faces.capacity());
    for ring in 0..rings {
        for seg in 0..segments {
            let a = ring * stride + seg;
            let b = a + 1;
            let c = a + stride;
            let d = c + 1;
            for idx in [[a, c, b], [b, c, d]] {
                faces.push(Face::new(idx[0], idx[1], idx[2]));
                uvs.push(idx.map(|i| grid_uvs[i]));
            }
        }
    }

    // On a unit sphere the normal is the position
    let normals = vertices.clone();
    from_parts(vertices, normals, faces, Some(uvs))
}

fn from_parts(vertices: Vec<Vec3>, normals: Vec<Vec3>, faces: Vec<Face>, uvs: Option<Vec<[Vec2; 3]>>) -> Mesh {
    match Mesh::new(vertices, normals, faces, uvs) {
        Ok(mesh) => mesh,
        Err(e) => unreachable!("built-in mesh is malformed: {e}"),
    }
}
