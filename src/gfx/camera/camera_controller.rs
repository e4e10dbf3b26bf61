use std::collections::HashSet;

use cgmath::Vector3;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use super::fly_camera::{CameraMovement, FlyCamera, Projection};
use crate::config::CameraConfig;

/// Pixel scroll deltas (touchpads) are converted to line notches at this rate
const PIXELS_PER_SCROLL_LINE: f32 = 20.0;

/// A camera placement the controller can jump back to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPreset {
    pub position: Vector3<f32>,
    pub front: Vector3<f32>,
    pub up: Vector3<f32>,
}

/// Turns keyboard, cursor and scroll input into camera motion
pub struct CameraController {
    pub speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub scroll_sensitivity: f32,
    held: HashSet<CameraMovement>,
    last_cursor: Option<(f64, f64)>,
    default_view: ViewPreset,
    default_zoom: f32,
    ortho_view: ViewPreset,
    ortho_half_height: f32,
    /// Perspective placement remembered when switching to orthographic
    saved_view: Option<ViewPreset>,
}

impl CameraController {
    pub fn new(config: &CameraConfig) -> Self {
        let up = Vector3::from(config.up);
        Self {
            speed: config.initial_speed.clamp(config.min_speed, config.max_speed),
            min_speed: config.min_speed,
            max_speed: config.max_speed,
            scroll_sensitivity: config.scroll_sensitivity,
            held: HashSet::new(),
            last_cursor: None,
            default_view: ViewPreset {
                position: Vector3::from(config.position),
                front: Vector3::from(config.front),
                up,
            },
            default_zoom: config.zoom,
            ortho_view: ViewPreset {
                position: Vector3::from(config.ortho_position),
                front: Vector3::from(config.ortho_front),
                up,
            },
            ortho_half_height: config.ortho_half_height,
            saved_view: None,
        }
    }

    pub fn process_key_event(&mut self, event: &KeyEvent, camera: &mut FlyCamera) {
        if let PhysicalKey::Code(code) = event.physical_key {
            self.process_key(
                code,
                event.state == ElementState::Pressed,
                event.repeat,
                camera,
            );
        }
    }

    /// Tracks held movement keys and applies the projection toggles.
    ///
    /// Auto-repeat events are ignored so holding O or P acts once.
    pub fn process_key(&mut self, code: KeyCode, pressed: bool, repeat: bool, camera: &mut FlyCamera) {
        if let Some(direction) = movement_for_key(code) {
            if pressed {
                self.held.insert(direction);
            } else {
                self.held.remove(&direction);
            }
            return;
        }

        if !pressed || repeat {
            return;
        }

        match code {
            KeyCode::KeyO => self.enter_orthographic(camera),
            KeyCode::KeyP => self.enter_perspective(camera),
            _ => (),
        }
    }

    /// Mouse look from absolute cursor positions.
    ///
    /// The first event after start-up only records the position.
    pub fn process_cursor_position(&mut self, x: f64, y: f64, camera: &mut FlyCamera) {
        let Some((last_x, last_y)) = self.last_cursor.replace((x, y)) else {
            return;
        };

        let x_offset = (x - last_x) as f32;
        // Reversed since window y grows downward
        let y_offset = (last_y - y) as f32;
        camera.process_mouse_movement(x_offset, y_offset);
    }

    /// Mouse look from raw relative motion, used while the cursor is grabbed
    pub fn process_mouse_motion(&mut self, dx: f64, dy: f64, camera: &mut FlyCamera) {
        // screen y grows downward
        camera.process_mouse_movement(dx as f32, -dy as f32);
    }

    /// Scrolling adjusts movement speed, not zoom
    pub fn process_scroll(&mut self, delta: &MouseScrollDelta) {
        let notches = match delta {
            MouseScrollDelta::LineDelta(_, y) => *y,
            MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => {
                *y as f32 / PIXELS_PER_SCROLL_LINE
            }
        };
        self.adjust_speed(notches);
    }

    pub fn adjust_speed(&mut self, notches: f32) {
        self.speed = (self.speed + notches * self.scroll_sensitivity)
            .clamp(self.min_speed, self.max_speed);
        log::trace!("Camera speed now {:.2}", self.speed);
    }

    /// Moves the camera for every held direction key
    pub fn update(&mut self, delta_time: f32, camera: &mut FlyCamera) {
        let distance = self.speed * delta_time;
        for direction in &self.held {
            camera.process_keyboard(*direction, distance);
        }
    }

    fn enter_orthographic(&mut self, camera: &mut FlyCamera) {
        if !camera.is_orthographic() {
            self.saved_view = Some(ViewPreset {
                position: camera.position,
                front: camera.front,
                up: camera.world_up,
            });
        }

        camera.position = self.ortho_view.position;
        camera.set_orientation(self.ortho_view.front, self.ortho_view.up);
        camera.projection = Projection::Orthographic {
            half_height: self.ortho_half_height,
        };
        log::info!("Switched to orthographic view");
    }

    /// From orthographic, returns to the remembered perspective view.
    /// Pressed again in perspective, resets to the default view.
    fn enter_perspective(&mut self, camera: &mut FlyCamera) {
        let target = if camera.is_orthographic() {
            self.saved_view.take().unwrap_or(self.default_view)
        } else {
            self.default_view
        };

        camera.projection = Projection::Perspective;
        camera.position = target.position;
        camera.set_orientation(target.front, target.up);
        camera.zoom = self.default_zoom;
        log::info!("Switched to perspective view");
    }
}

fn movement_for_key(code: KeyCode) -> Option<CameraMovement> {
    match code {
        KeyCode::KeyW => Some(CameraMovement::Forward),
        KeyCode::KeyS => Some(CameraMovement::Backward),
        KeyCode::KeyA => Some(CameraMovement::Left),
        KeyCode::KeyD => Some(CameraMovement::Right),
        KeyCode::KeyQ => Some(CameraMovement::Up),
        KeyCode::KeyE => Some(CameraMovement::Down),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::InnerSpace;

    fn setup() -> (CameraController, FlyCamera) {
        let config = CameraConfig::default();
        (
            CameraController::new(&config),
            FlyCamera::from_config(&config, 1.25),
        )
    }

    #[test]
    fn test_scroll_speed_is_clamped() {
        let (mut controller, _) = setup();
        assert_eq!(controller.speed, 2.5);

        controller.process_scroll(&MouseScrollDelta::LineDelta(0.0, 2.0));
        assert_relative_eq!(controller.speed, 3.5);

        controller.adjust_speed(1000.0);
        assert_eq!(controller.speed, 20.0);

        controller.adjust_speed(-1000.0);
        assert_eq!(controller.speed, 0.1);
    }

    #[test]
    fn test_held_keys_move_by_speed_times_dt() {
        let (mut controller, mut camera) = setup();
        let start = camera.position;

        controller.process_key(KeyCode::KeyW, true, false, &mut camera);
        controller.update(0.5, &mut camera);
        assert_relative_eq!((camera.position - start).magnitude(), 1.25, epsilon = 1e-5);

        controller.process_key(KeyCode::KeyW, false, false, &mut camera);
        assert!(controller.held.is_empty());
        let stopped = camera.position;
        controller.update(0.5, &mut camera);
        assert_eq!(camera.position, stopped);
    }

    #[test]
    fn test_first_cursor_event_only_records() {
        let (mut controller, mut camera) = setup();
        let yaw = camera.yaw;

        controller.process_cursor_position(500.0, 400.0, &mut camera);
        assert_eq!(camera.yaw, yaw);

        controller.process_cursor_position(510.0, 390.0, &mut camera);
        assert_relative_eq!(camera.yaw, yaw + 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_cursor_moving_up_pitches_up() {
        let (mut controller, mut camera) = setup();
        let pitch = camera.pitch;
        controller.process_cursor_position(0.0, 100.0, &mut camera);
        controller.process_cursor_position(0.0, 80.0, &mut camera);
        assert_relative_eq!(camera.pitch, pitch + 2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_raw_motion_turns_without_a_priming_event() {
        let (mut controller, mut camera) = setup();
        let (yaw, pitch) = (camera.yaw, camera.pitch);

        controller.process_mouse_motion(10.0, 0.0, &mut camera);
        assert_relative_eq!(camera.yaw, yaw + 1.0, epsilon = 1e-4);

        // moving the mouse up reports a negative dy
        controller.process_mouse_motion(0.0, -20.0, &mut camera);
        assert_relative_eq!(camera.pitch, pitch + 2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_pixel_scroll_converts_to_notches() {
        let (mut controller, _) = setup();
        let delta = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 40.0));
        controller.process_scroll(&delta);
        assert_relative_eq!(controller.speed, 3.5);

        let delta = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -10_000.0));
        controller.process_scroll(&delta);
        assert_eq!(controller.speed, 0.1);
    }

    #[test]
    fn test_orthographic_round_trip_restores_view() {
        let (mut controller, mut camera) = setup();
        controller.process_key(KeyCode::KeyD, true, false, &mut camera);
        controller.update(1.0, &mut camera);
        controller.process_key(KeyCode::KeyD, false, false, &mut camera);
        let moved = camera.position;

        controller.process_key(KeyCode::KeyO, true, false, &mut camera);
        assert!(camera.is_orthographic());
        assert_eq!(camera.position, Vector3::new(0.0, 0.0, 10.0));
        assert_relative_eq!(camera.front.z, -1.0, epsilon = 1e-5);

        // Pressing O again keeps the remembered perspective view
        controller.process_key(KeyCode::KeyO, true, false, &mut camera);

        controller.process_key(KeyCode::KeyP, true, false, &mut camera);
        assert!(!camera.is_orthographic());
        assert_relative_eq!(camera.position.x, moved.x, epsilon = 1e-5);

        controller.process_key(KeyCode::KeyP, true, false, &mut camera);
        assert_eq!(camera.position, Vector3::new(-1.0, 3.0, 7.0));
        assert_eq!(camera.zoom, 68.0);
    }

    #[test]
    fn test_repeat_events_do_not_toggle() {
        let (mut controller, mut camera) = setup();
        controller.process_key(KeyCode::KeyO, true, true, &mut camera);
        assert!(!camera.is_orthographic());
    }
}
