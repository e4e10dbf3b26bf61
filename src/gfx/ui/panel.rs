use cgmath::Vector3;
use imgui::Ui;

use crate::gfx::camera::{FlyCamera, Projection};

/// Values shown by the status overlay for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStatus {
    pub speed: f32,
    pub projection: Projection,
    pub position: Vector3<f32>,
    pub draw_count: usize,
}

impl OverlayStatus {
    pub fn new(camera: &FlyCamera, speed: f32, draw_count: usize) -> Self {
        Self {
            speed,
            projection: camera.projection,
            position: camera.position,
            draw_count,
        }
    }

    pub fn lines(&self) -> [String; 4] {
        let projection = match self.projection {
            Projection::Perspective => "perspective".to_string(),
            Projection::Orthographic { half_height } => {
                format!("orthographic (half height {:.1})", half_height)
            }
        };
        [
            format!("Speed: {:.2}", self.speed),
            format!("Projection: {}", projection),
            format!(
                "Position: ({:.2}, {:.2}, {:.2})",
                self.position.x, self.position.y, self.position.z
            ),
            format!("Draw calls: {}", self.draw_count),
        ]
    }
}

/// Small fixed panel in the top-left corner; it never takes input so mouse
/// look keeps working while the cursor is grabbed
pub fn status(ui: &Ui, status: &OverlayStatus) {
    let flags = imgui::WindowFlags::NO_DECORATION
        | imgui::WindowFlags::ALWAYS_AUTO_RESIZE
        | imgui::WindowFlags::NO_INPUTS
        | imgui::WindowFlags::NO_NAV
        | imgui::WindowFlags::NO_SAVED_SETTINGS
        | imgui::WindowFlags::NO_FOCUS_ON_APPEARING;

    ui.window("Status")
        .position([10.0, 10.0], imgui::Condition::Always)
        .bg_alpha(0.5)
        .flags(flags)
        .build(|| {
            let [speed, projection, position, draws] = status.lines();
            ui.text(speed);
            ui.text(projection);
            ui.separator();
            ui.text(position);
            ui.text(draws);
            ui.separator();
            ui.text_disabled("WASD/QE move, O/P projection, Esc quits");
        });
}
