use glam::{Mat4, Vec3};

use crate::config::ConfigError;

/// Right-handed look-at camera with a fixed perspective projection.
///
/// Constructed once at startup and immutable afterwards; the scene pass
/// reads its matrices and eye position every frame.
#[derive(Debug, Clone)]
pub struct Camera {
    eye: Vec3,
    target: Vec3,
    view: Mat4,
    projection: Mat4,
}

impl Camera {
    pub const FOV_Y: f32 = std::f32::consts::FRAC_PI_4;
    pub const Z_NEAR: f32 = 0.1;
    pub const Z_FAR: f32 = 500.0;

    /// Builds the view and projection matrices from a look-at basis.
    ///
    /// Fails fast when `eye == target` or when `up` is zero or parallel to
    /// the view direction, both of which would produce an unusable basis.
    pub fn new(eye: Vec3, target: Vec3, up: Vec3, aspect: f32) -> Result<Self, ConfigError> {
        let forward = target - eye;
        if forward.length_squared() <= f32::EPSILON {
            return Err(ConfigError::DegenerateCamera);
        }
        if up.length_squared() <= f32::EPSILON
            || forward.cross(up).length_squared() <= f32::EPSILON
        {
            return Err(ConfigError::DegenerateUpVector);
        }

        let view = Mat4::look_at_rh(eye, target, up);
        let projection = Mat4::perspective_rh(Self::FOV_Y, aspect.max(0.01), Self::Z_NEAR, Self::Z_FAR);
        Ok(Self {
            eye,
            target,
            view,
            projection,
        })
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock_camera() -> Camera {
        Camera::new(
            Vec3::new(0.0, 50.0, 100.0),
            Vec3::ZERO,
            Vec3::Y,
            800.0 / 600.0,
        )
        .unwrap()
    }

    #[test]
    fn view_matrix_maps_eye_to_origin() {
        let camera = stock_camera();
        let mapped = camera.view().transform_point3(camera.eye());
        assert!(mapped.length() < 1e-4, "eye maps to {mapped:?}");
    }

    #[test]
    fn view_rotation_is_orthonormal() {
        let camera = stock_camera();
        let m = camera.view().to_cols_array_2d();
        let rows = [
            Vec3::new(m[0][0], m[1][0], m[2][0]),
            Vec3::new(m[0][1], m[1][1], m[2][1]),
            Vec3::new(m[0][2], m[1][2], m[2][2]),
        ];
        for (i, row) in rows.iter().enumerate() {
            assert!((row.length() - 1.0).abs() < 1e-5, "row {i} not unit length");
        }
        assert!(rows[0].dot(rows[1]).abs() < 1e-5);
        assert!(rows[0].dot(rows[2]).abs() < 1e-5);
        assert!(rows[1].dot(rows[2]).abs() < 1e-5);
    }

    #[test]
    fn coincident_eye_and_target_fail() {
        let result = Camera::new(Vec3::ONE, Vec3::ONE, Vec3::Y, 1.0);
        assert_eq!(result.err(), Some(ConfigError::DegenerateCamera));
    }

    #[test]
    fn parallel_up_vector_fails() {
        // Eye looks straight down while up also points along the view axis.
        let result = Camera::new(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO, Vec3::NEG_Y, 1.0);
        assert_eq!(result.err(), Some(ConfigError::DegenerateUpVector));
    }

    #[test]
    fn zero_up_vector_fails() {
        let result = Camera::new(Vec3::new(0.0, 50.0, 100.0), Vec3::ZERO, Vec3::ZERO, 1.0);
        assert_eq!(result.err(), Some(ConfigError::DegenerateUpVector));
    }
}
