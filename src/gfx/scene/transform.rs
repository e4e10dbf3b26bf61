//! Translate, rotate and scale composition

use cgmath::{Deg, Matrix4, Vector3};

/// Scale, Euler rotation in degrees, and translation of one object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: Vector3<f32>,
    /// Rotation about X, Y and Z in degrees
    pub rotation_degrees: Vector3<f32>,
    pub position: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation_degrees: Vector3::new(0.0, 0.0, 0.0),
            position: Vector3::new(0.0, 0.0, 0.0),
        }
    }
}

impl Transform {
    pub fn new(scale: Vector3<f32>, rotation_degrees: Vector3<f32>, position: Vector3<f32>) -> Self {
        Self {
            scale,
            rotation_degrees,
            position,
        }
    }

    pub fn from_scale(scale: Vector3<f32>) -> Self {
        Self {
            scale,
            ..Default::default()
        }
    }

    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation_degrees: Vector3<f32>) -> Self {
        self.rotation_degrees = rotation_degrees;
        self
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        compose_model_matrix(self.scale, self.rotation_degrees, self.position)
    }
}

/// model = T · Rx · Ry · Rz · S
pub fn compose_model_matrix(
    scale: Vector3<f32>,
    rotation_degrees: Vector3<f32>,
    position: Vector3<f32>,
) -> Matrix4<f32> {
    Matrix4::from_translation(position)
        * Matrix4::from_angle_x(Deg(rotation_degrees.x))
        * Matrix4::from_angle_y(Deg(rotation_degrees.y))
        * Matrix4::from_angle_z(Deg(rotation_degrees.z))
        * Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::{Point3, SquareMatrix, Transform as _};

    #[test]
    fn test_identity_transform() {
        assert_eq!(Transform::default().matrix(), Matrix4::identity());
    }

    #[test]
    fn test_scale_applies_before_translation() {
        let m = compose_model_matrix(
            Vector3::new(2.0, 3.0, 4.0),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 1.0),
        );
        let p = m.transform_point(Point3::new(1.0, 1.0, 1.0));
        assert_eq!(p, Point3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn test_z_rotation_applies_first() {
        // Rz is applied to the point first, then Ry, then Rx
        let m = compose_model_matrix(
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(90.0, 0.0, 90.0),
            Vector3::new(0.0, 0.0, 0.0),
        );
        // Rz(90) maps +X to +Y, Rx(90) then maps +Y to +Z
        let p = m.transform_point(Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_wall_rotation_faces_camera() {
        // The back wall plane is rotated 90 degrees about X so its +Y normal faces +Z
        let m = Transform::default()
            .with_rotation(Vector3::new(90.0, 0.0, 0.0))
            .matrix();
        let n = m.transform_vector(Vector3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(n.z, 1.0, epsilon = 1e-6);
        assert_relative_eq!(n.y, 0.0, epsilon = 1e-6);
    }
}
