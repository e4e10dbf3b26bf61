//! The clock composite object
//!
//! A clock is five primitives sharing one group transform: a torus rim, a
//! squashed sphere face, two cone hands and a bell on top.

use cgmath::{ElementWise, Matrix4, Vector3};

use super::{draw_list::DrawRecorder, transform::Transform};
use crate::gfx::geometry::MeshKind;

/// Where a clock sits in the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockPlacement {
    /// Larger z places the clock further into the picture
    pub position: Vector3<f32>,
    pub scale: Vector3<f32>,
    pub rotation_degrees: Vector3<f32>,
}

impl ClockPlacement {
    pub fn new(position: Vector3<f32>) -> Self {
        Self {
            position,
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation_degrees: Vector3::new(0.0, 0.0, 0.0),
        }
    }

    pub fn with_scale(mut self, scale: Vector3<f32>) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation_degrees: Vector3<f32>) -> Self {
        self.rotation_degrees = rotation_degrees;
        self
    }

    /// Placement position in world space, z flipped
    pub fn world_position(&self) -> Vector3<f32> {
        Vector3::new(self.position.x, self.position.y, -self.position.z)
    }

    /// Transform shared by every part of the clock
    pub fn group_matrix(&self) -> Matrix4<f32> {
        Transform::new(self.scale, self.rotation_degrees, self.world_position()).matrix()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartTexture {
    Single(&'static str),
    /// Top half, bottom half
    Two(&'static str, &'static str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockPart {
    pub name: &'static str,
    pub mesh: MeshKind,
    pub local: Transform,
    pub color: [f32; 4],
    pub texture: PartTexture,
}

const RIM_RADIUS: f32 = 1.2;
const FACE_RADIUS: f32 = 1.1;
const SQUISH_DEPTH: f32 = 0.1;
const HAND_OFFSET: f32 = 0.1;

/// The parts of a clock in draw order, positioned relative to its center
pub fn clock_parts() -> [ClockPart; 5] {
    let rim = ClockPart {
        name: "rim",
        mesh: MeshKind::Torus,
        local: Transform::from_scale(Vector3::new(RIM_RADIUS, RIM_RADIUS, SQUISH_DEPTH)),
        color: [249.0 / 255.0, 176.0 / 255.0, 26.0 / 255.0, 1.0],
        texture: PartTexture::Single("goldTexture"),
    };
    let face = ClockPart {
        name: "face",
        mesh: MeshKind::Sphere,
        local: Transform::from_scale(Vector3::new(FACE_RADIUS, FACE_RADIUS, SQUISH_DEPTH)),
        color: [1.0, 1.0, 1.0, 1.0],
        texture: PartTexture::Two("clockface2", "clockface1"),
    };
    let minute_hand = ClockPart {
        name: "minute hand",
        mesh: MeshKind::Cone,
        local: Transform::from_scale(Vector3::new(0.1, 1.2, 0.1))
            .with_rotation(Vector3::new(0.0, 0.0, -330.0))
            .with_position(Vector3::new(0.0, 0.0, HAND_OFFSET)),
        color: [0.0, 0.0, 0.0, 1.0],
        texture: PartTexture::Single("handsTexture"),
    };
    let hour_hand = ClockPart {
        name: "hour hand",
        mesh: MeshKind::Cone,
        local: Transform::from_scale(Vector3::new(0.1, 0.9, 0.1))
            .with_rotation(Vector3::new(0.0, 0.0, -210.0))
            .with_position(Vector3::new(0.0, 0.0, HAND_OFFSET)),
        color: [0.0, 0.0, 0.0, 1.0],
        texture: PartTexture::Single("handsTexture"),
    };
    let bell = ClockPart {
        name: "bell",
        mesh: MeshKind::Sphere,
        local: Transform::from_scale(Vector3::new(0.5, 0.3, 0.25))
            .with_position(Vector3::new(0.0, 1.35, 0.0)),
        color: [1.0, 1.0, 0.0, 1.0],
        texture: PartTexture::Single("goldTexture"),
    };

    [rim, face, minute_hand, hour_hand, bell]
}

/// Records every part of a clock at `placement`
pub fn draw_clock(recorder: &mut DrawRecorder, placement: &ClockPlacement) {
    let group = placement.group_matrix();

    for part in clock_parts() {
        recorder.set_model_matrix(group * part.local.matrix());

        let [r, g, b, a] = part.color;
        recorder.set_color(r, g, b, a);

        match part.texture {
            PartTexture::Single(tag) => recorder.set_texture(tag),
            PartTexture::Two(top, bottom) => {
                recorder.set_object_placement(
                    placement.world_position() + part.local.position,
                    placement.scale.mul_element_wise(part.local.scale),
                );
                recorder.set_uv_scale([1.0, 1.0]);
                recorder.set_two_textures(top, bottom);
            }
        }

        recorder.draw(part.mesh);
    }
}
