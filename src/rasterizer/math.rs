//! Vector and matrix math for the projection and shading stages

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero-length input
    pub fn normalize(self) -> Vec3 {
        let l = self.len();
        if l == 0.0 {
            return Vec3::ZERO;
        }
        Vec3 {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
        }
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    /// Mirror this vector about the plane orthogonal to `normal`.
    /// `normal` must be unit length.
    pub fn reflect(self, normal: Vec3) -> Vec3 {
        self - normal.scale(2.0 * self.dot(normal))
    }

    /// Barycentric combination `a*wa + b*wb + c*wc`
    pub fn weighted(a: Vec3, b: Vec3, c: Vec3, w: [f32; 3]) -> Vec3 {
        a.scale(w[0]) + b.scale(w[1]) + c.scale(w[2])
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

/// 2D Vector (for texture coordinates)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn weighted(a: Vec2, b: Vec2, c: Vec2, w: [f32; 3]) -> Vec2 {
        Vec2 {
            x: a.x * w[0] + b.x * w[1] + c.x * w[2],
            y: a.y * w[0] + b.y * w[1] + c.y * w[2],
        }
    }
}

/// Homogeneous 4D vector
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// A position (w = 1)
    pub fn point(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z, 1.0)
    }

    pub fn dot(self, other: Vec4) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }
}

/// 4x4 matrix, row-major. Vectors are columns: `m * v`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub rows: [[f32; 4]; 4],
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub const fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self { rows }
    }

    fn row(&self, i: usize) -> Vec4 {
        let r = self.rows[i];
        Vec4::new(r[0], r[1], r[2], r[3])
    }

    fn col(&self, j: usize) -> Vec4 {
        Vec4::new(self.rows[0][j], self.rows[1][j], self.rows[2][j], self.rows[3][j])
    }

    pub fn transform(&self, v: Vec4) -> Vec4 {
        Vec4 {
            x: self.row(0).dot(v),
            y: self.row(1).dot(v),
            z: self.row(2).dot(v),
            w: self.row(3).dot(v),
        }
    }

    /// World-to-camera matrix for a camera at `eye` looking at `target`.
    ///
    /// The camera looks down its local -Z. Returns `None` when `eye` and
    /// `target` coincide or `up` is parallel to the viewing direction.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Option<Mat4> {
        let z = (eye - target).normalize();
        let x = up.cross(z).normalize();
        if z == Vec3::ZERO || x == Vec3::ZERO {
            return None;
        }
        let y = z.cross(x);

        Some(Mat4::from_rows([
            [x.x, x.y, x.z, -x.dot(eye)],
            [y.x, y.y, y.z, -y.dot(eye)],
            [z.x, z.y, z.z, -z.dot(eye)],
            [0.0, 0.0, 0.0, 1.0],
        ]))
    }

    /// OpenGL-style perspective projection mapping view depth
    /// `-near..-far` to NDC `-1..1`.
    ///
    /// `fov_y` is the vertical field of view in degrees. Returns `None` for
    /// parameters that cannot form a frustum.
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Option<Mat4> {
        let valid = fov_y > 0.0
            && fov_y < 180.0
            && aspect.is_finite()
            && aspect > 0.0
            && near > 0.0
            && far > near;
        if !valid {
            return None;
        }

        let f = 1.0 / (fov_y.to_radians() / 2.0).tan();
        let depth = near - far;

        Some(Mat4::from_rows([
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, (far + near) / depth, 2.0 * far * near / depth],
            [0.0, 0.0, -1.0, 0.0],
        ]))
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Mat4::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Mat4;
    fn mul(self, other: Mat4) -> Mat4 {
        let mut rows = [[0.0; 4]; 4];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = self.row(i).dot(other.col(j));
            }
        }
        Mat4 { rows }
    }
}
