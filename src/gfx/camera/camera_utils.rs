use cgmath::{Matrix4, SquareMatrix};
use winit::{event::KeyEvent, event::MouseScrollDelta};

use super::{camera_controller::CameraController, fly_camera::FlyCamera};

/// Owns the scene camera together with the controller that drives it
pub struct CameraManager {
    pub camera: FlyCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: FlyCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        self.controller.process_key_event(event, &mut self.camera);
    }

    pub fn process_cursor_position(&mut self, x: f64, y: f64) {
        self.controller
            .process_cursor_position(x, y, &mut self.camera);
    }

    pub fn process_mouse_motion(&mut self, dx: f64, dy: f64) {
        self.controller
            .process_mouse_motion(dx, dy, &mut self.camera);
    }

    pub fn process_scroll(&mut self, delta: &MouseScrollDelta) {
        self.controller.process_scroll(delta);
    }

    /// Applies held movement keys for the elapsed frame time
    pub fn update(&mut self, delta_time: f32) {
        self.controller.update(delta_time, &mut self.camera);
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform::from_camera(&self.camera)
    }
}

/// Anything that can provide the view and projection transforms
pub trait Camera {
    fn view_matrix(&self) -> Matrix4<f32>;
    fn projection_matrix(&self) -> Matrix4<f32>;
    fn eye_position(&self) -> [f32; 3];
}

/// Camera data as laid out in the global uniform block
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],

    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],
}

impl CameraUniform {
    pub fn from_camera(camera: &impl Camera) -> Self {
        let eye = camera.eye_position();
        Self {
            view: convert_matrix4_to_array(camera.view_matrix()),
            projection: convert_matrix4_to_array(camera.projection_matrix()),
            view_position: [eye[0], eye[1], eye[2], 1.0],
        }
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view: convert_matrix4_to_array(Matrix4::identity()),
            projection: convert_matrix4_to_array(Matrix4::identity()),
            view_position: [0.0; 4],
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}
