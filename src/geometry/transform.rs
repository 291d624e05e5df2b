use super::math::{Mat4, Vec3};
use nalgebra::{Rotation3, Unit};

/// Maps the canonical [-1, 1] cube to pixel space.
///
/// x goes to [0, width], y is flipped to [height, 0] so that increasing y
/// moves down the image, z goes to [0, 1].
pub fn viewport_matrix(width: usize, height: usize) -> Mat4 {
    let half_w = width as f32 / 2.0;
    let half_h = height as f32 / 2.0;
    Mat4::new(
        half_w, 0.0, 0.0, half_w, //
        0.0, -half_h, 0.0, half_h, //
        0.0, 0.0, 0.5, 0.5, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Builders for model transforms.
pub struct TransformFactory;

impl TransformFactory {
    /// Rotation about an arbitrary axis.
    pub fn rotation(axis: &Vec3, angle_rad: f32) -> Mat4 {
        let axis_unit = Unit::new_normalize(*axis);
        Mat4::from(Rotation3::from_axis_angle(&axis_unit, angle_rad))
    }

    pub fn rotation_x(angle_rad: f32) -> Mat4 {
        Mat4::from_euler_angles(angle_rad, 0.0, 0.0)
    }

    pub fn rotation_y(angle_rad: f32) -> Mat4 {
        Mat4::from_euler_angles(0.0, angle_rad, 0.0)
    }

    pub fn rotation_z(angle_rad: f32) -> Mat4 {
        Mat4::from_euler_angles(0.0, 0.0, angle_rad)
    }

    pub fn translation(translation: &Vec3) -> Mat4 {
        Mat4::new_translation(translation)
    }

    pub fn scaling_nonuniform(scale: &Vec3) -> Mat4 {
        Mat4::new_nonuniform_scaling(scale)
    }

    pub fn perspective(aspect_ratio: f32, fov_y_rad: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new_perspective(aspect_ratio, fov_y_rad, near, far)
    }

    /// Translation * rotation (X then Y then Z, degrees) * scale.
    pub fn model(position: &Vec3, rotation_deg: &Vec3, scale: &Vec3) -> Mat4 {
        let rotation = Self::rotation_z(rotation_deg.z.to_radians())
            * Self::rotation_y(rotation_deg.y.to_radians())
            * Self::rotation_x(rotation_deg.x.to_radians());
        Self::translation(position) * rotation * Self::scaling_nonuniform(scale)
    }
}
