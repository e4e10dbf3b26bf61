use cgmath::*;

use super::camera_utils::Camera;
use crate::config::CameraConfig;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Pitch is kept inside this range so the view never flips over the pole
pub const PITCH_LIMIT: f32 = 89.0;

/// Direction of a keyboard driven camera move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective,
    Orthographic { half_height: f32 },
}

/// First-person camera steered by yaw/pitch angles
#[derive(Debug, Clone, Copy)]
pub struct FlyCamera {
    pub position: Vector3<f32>,
    pub front: Vector3<f32>,
    pub up: Vector3<f32>,
    pub right: Vector3<f32>,
    pub world_up: Vector3<f32>,
    /// Degrees, -90 looks down -Z
    pub yaw: f32,
    /// Degrees
    pub pitch: f32,
    /// Vertical field of view in degrees
    pub zoom: f32,
    pub mouse_sensitivity: f32,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
    pub projection: Projection,
}

impl Camera for FlyCamera {
    fn view_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.position);
        Matrix4::look_at_rh(eye, eye + self.front, self.up)
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        let proj = match self.projection {
            Projection::Perspective => {
                perspective(Deg(self.zoom), self.aspect, self.znear, self.zfar)
            }
            Projection::Orthographic { half_height } => {
                let half_width = half_height * self.aspect;
                ortho(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.znear,
                    self.zfar,
                )
            }
        };
        OPENGL_TO_WGPU_MATRIX * proj
    }

    fn eye_position(&self) -> [f32; 3] {
        self.position.into()
    }
}

impl FlyCamera {
    pub fn new(position: Vector3<f32>, front: Vector3<f32>, up: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            position,
            front: -Vector3::unit_z(),
            up,
            right: Vector3::unit_x(),
            world_up: up.normalize(),
            yaw: -90.0,
            pitch: 0.0,
            zoom: 45.0,
            mouse_sensitivity: 0.1,
            aspect,
            znear: 0.1,
            zfar: 100.0,
            projection: Projection::Perspective,
        };
        camera.set_orientation(front, up);
        camera
    }

    /// Builds the default perspective camera described by `config`
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self::new(
            Vector3::from(config.position),
            Vector3::from(config.front),
            Vector3::from(config.up),
            aspect,
        );
        camera.zoom = config.zoom;
        camera.mouse_sensitivity = config.mouse_sensitivity;
        camera.znear = config.near;
        camera.zfar = config.far;
        camera
    }

    pub fn process_keyboard(&mut self, direction: CameraMovement, distance: f32) {
        match direction {
            CameraMovement::Forward => self.position += self.front * distance,
            CameraMovement::Backward => self.position -= self.front * distance,
            CameraMovement::Left => self.position -= self.right * distance,
            CameraMovement::Right => self.position += self.right * distance,
            CameraMovement::Up => self.position += self.up * distance,
            CameraMovement::Down => self.position -= self.up * distance,
        }
    }

    /// Turns the camera by a mouse offset; positive `y_offset` looks up
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch = (self.pitch + y_offset * self.mouse_sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_camera_vectors();
    }

    /// Points the camera along `front`, deriving yaw and pitch so later mouse
    /// look continues from this orientation
    pub fn set_orientation(&mut self, front: Vector3<f32>, up: Vector3<f32>) {
        let front = front.normalize();
        self.world_up = up.normalize();
        self.pitch = front
            .y
            .clamp(-1.0, 1.0)
            .asin()
            .to_degrees()
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.yaw = front.z.atan2(front.x).to_degrees();
        self.update_camera_vectors();
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn is_orthographic(&self) -> bool {
        matches!(self.projection, Projection::Orthographic { .. })
    }

    fn update_camera_vectors(&mut self) {
        let (yaw, pitch) = (Deg(self.yaw), Deg(self.pitch));
        self.front = Vector3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn default_camera() -> FlyCamera {
        FlyCamera::from_config(&CameraConfig::default(), 1000.0 / 800.0)
    }

    #[test]
    fn test_orientation_from_config_front() {
        let camera = default_camera();
        let expected = Vector3::new(0.0f32, -0.1, -1.0).normalize();
        assert_relative_eq!(camera.front.x, expected.x, epsilon = 1e-5);
        assert_relative_eq!(camera.front.y, expected.y, epsilon = 1e-5);
        assert_relative_eq!(camera.front.z, expected.z, epsilon = 1e-5);
        assert_relative_eq!(camera.right.x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_keyboard_moves_along_basis() {
        let mut camera = default_camera();
        let start = camera.position;

        camera.process_keyboard(CameraMovement::Forward, 2.0);
        let moved = camera.position - start;
        assert_relative_eq!(moved.magnitude(), 2.0, epsilon = 1e-5);
        assert_relative_eq!(moved.normalize().dot(camera.front), 1.0, epsilon = 1e-5);

        camera.process_keyboard(CameraMovement::Backward, 2.0);
        camera.process_keyboard(CameraMovement::Right, 1.5);
        assert_relative_eq!(camera.position.x, start.x + 1.5, epsilon = 1e-5);

        camera.process_keyboard(CameraMovement::Left, 1.5);
        camera.process_keyboard(CameraMovement::Up, 1.0);
        camera.process_keyboard(CameraMovement::Down, 1.0);
        assert_relative_eq!(camera.position.x, start.x, epsilon = 1e-5);
        assert_relative_eq!(camera.position.y, start.y, epsilon = 1e-5);
        assert_relative_eq!(camera.position.z, start.z, epsilon = 1e-5);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = default_camera();
        camera.process_mouse_movement(0.0, 10_000.0);
        assert_eq!(camera.pitch, PITCH_LIMIT);
        camera.process_mouse_movement(0.0, -10_000.0);
        assert_eq!(camera.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn test_mouse_yaw_turns_right() {
        let mut camera = FlyCamera::new(
            Vector3::zero(),
            -Vector3::unit_z(),
            Vector3::unit_y(),
            1.0,
        );
        // 900 units * 0.1 sensitivity = 90 degrees
        camera.process_mouse_movement(900.0, 0.0);
        assert_relative_eq!(camera.front.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(camera.front.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_projection_modes_differ() {
        let mut camera = default_camera();
        let perspective = camera.projection_matrix();
        camera.projection = Projection::Orthographic { half_height: 4.0 };
        let orthographic = camera.projection_matrix();

        // Orthographic projection keeps w = 1
        assert_relative_eq!(orthographic.w.w, 1.0, epsilon = 1e-6);
        assert_relative_eq!(perspective.w.w, 0.0, epsilon = 1e-6);
        assert_relative_eq!(orthographic.y.y, 0.25, epsilon = 1e-6);
    }

    #[test]
    fn test_view_matrix_maps_eye_to_origin() {
        let camera = default_camera();
        let eye = Point3::from_vec(camera.position);
        let transformed = camera.view_matrix().transform_point(eye);
        assert_relative_eq!(transformed.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(transformed.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(transformed.z, 0.0, epsilon = 1e-5);
    }
}
