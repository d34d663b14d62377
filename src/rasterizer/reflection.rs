//! Local illumination: ambient + diffuse + specular for one point light

use super::material::PhongMaterial;
use super::math::Vec3;
use super::types::Color;

/// Evaluate the reflection model at `point`.
///
/// `normal` may be denormalized (interpolated or averaged); it is normalized
/// here. The diffuse term is not clamped at zero, so surfaces facing away
/// from the light subtract from the ambient and specular terms. The result
/// is unclamped.
pub fn shade(point: Vec3, viewer: Vec3, normal: Vec3, light: Vec3, material: &PhongMaterial) -> Color {
    let normal = normal.normalize();
    let light_dir = (light - point).normalize();

    let n_dot_l = normal.dot(light_dir);
    let diffuse = material.diffuse * n_dot_l;

    let reflect = light_dir.reflect(normal);
    let view_dir = (viewer - point).normalize();
    let intensity = (-view_dir.dot(reflect)).max(0.0).powf(material.shininess);
    let specular = material.specular * intensity;

    material.ambient + diffuse + specular
}
