use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

/// Small value for float comparisons against zero.
pub const EPSILON: f32 = 1e-6;

pub type Vec2 = Vector2<f32>;
pub type Vec3 = Vector3<f32>;
pub type Vec4 = Vector4<f32>;
pub type Mat4 = Matrix4<f32>;

/// Euclidean distance between two points, ignoring z.
pub fn distance_2d(a: &Vec3, b: &Vec3) -> f32 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Applies `transform` to a homogeneous position and divides by `w`.
///
/// Affine transforms keep `w == 1`, so the divide only matters for
/// projective model transforms. A `w` too close to zero is left undivided;
/// there is no clipping stage to resolve it.
pub fn transform_position(transform: &Mat4, position: &Vec4) -> Vec4 {
    let transformed = transform * position;
    if transformed.w.abs() > EPSILON && transformed.w != 1.0 {
        Vec4::new(
            transformed.x / transformed.w,
            transformed.y / transformed.w,
            transformed.z / transformed.w,
            1.0,
        )
    } else {
        transformed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_ignores_z() {
        let a = Vec3::new(0.0, 0.0, 5.0);
        let b = Vec3::new(3.0, 4.0, -100.0);
        assert!((distance_2d(&a, &b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn affine_transform_keeps_w() {
        let m = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0));
        let p = transform_position(&m, &Vec4::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(p, Vec4::new(2.0, 3.0, 4.0, 1.0));
    }

    #[test]
    fn projective_transform_divides_by_w() {
        let mut m = Mat4::identity();
        m[(3, 3)] = 2.0;
        let p = transform_position(&m, &Vec4::new(4.0, 2.0, 1.0, 1.0));
        assert_eq!(p, Vec4::new(2.0, 1.0, 0.5, 1.0));
    }

    #[test]
    fn vector_operators_follow_column_convention() {
        let scale = Mat4::new_nonuniform_scaling(&Vec3::new(2.0, 3.0, 4.0));
        let v = scale * Vec4::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(v, Vec4::new(2.0, 3.0, 4.0, 1.0));

        let c = Vec3::new(0.5, 1.0, 0.25).component_mul(&Vec3::new(0.5, 0.5, 4.0));
        assert_eq!(c, Vec3::new(0.25, 0.5, 1.0));
        assert_eq!((c * 2.0) / 4.0, Vec3::new(0.125, 0.25, 0.5));
    }
}
