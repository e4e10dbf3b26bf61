//! Global uniform bindings for camera and scene data
//!
//! Manages the per-frame uniform shared by every draw: camera matrices, the
//! eye position and the four scene lights. Bound at group 0 in the scene
//! pipeline.

use crate::{
    gfx::{
        camera::camera_utils::CameraUniform,
        resources::lights::{LightSource, SceneLights, MAX_LIGHTS},
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// One light as laid out in WGSL: four vec4s
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    /// xyz position, w focal strength
    pub position_focal: [f32; 4],
    /// rgb ambient color, w specular intensity
    pub ambient_intensity: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

impl From<&LightSource> for LightUniform {
    fn from(light: &LightSource) -> Self {
        let [px, py, pz] = light.position;
        let [ar, ag, ab] = light.ambient_color;
        let [dr, dg, db] = light.diffuse_color;
        let [sr, sg, sb] = light.specular_color;
        Self {
            position_focal: [px, py, pz, light.focal_strength],
            ambient_intensity: [ar, ag, ab, light.specular_intensity],
            diffuse: [dr, dg, db, 0.0],
            specular: [sr, sg, sb, 0.0],
        }
    }
}

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in `scene.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub view_position: [f32; 4],
    pub lights: [LightUniform; MAX_LIGHTS],
    pub light_count: u32,
    pub use_lighting: u32,
    _padding: [u32; 2],
}
// Total: 64 + 64 + 16 + 4 * 64 + 16 = 416 bytes

impl GlobalUBOContent {
    pub fn new(camera: &CameraUniform, lights: &SceneLights) -> Self {
        Self {
            view: camera.view,
            projection: camera.projection,
            view_position: camera.view_position,
            lights: lights.lights.each_ref().map(LightUniform::from),
            light_count: MAX_LIGHTS as u32,
            use_lighting: lights.lighting_enabled as u32,
            _padding: [0; 2],
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Updates the global uniform buffer with camera and light data
///
/// Called once per frame before any draw is recorded.
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: &CameraUniform,
    lights: &SceneLights,
) {
    ubo.update_content(queue, GlobalUBOContent::new(camera, lights));
}

/// Manages bind group layouts and bind groups for global uniforms
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl GlobalBindings {
    /// Sets up the bind group layout for global uniforms but doesn't
    /// create the actual bind group until `create_bind_group()` is called.
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform()) // camera + lights
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    pub fn create_bind_group(&mut self, device: &wgpu::Device, ubo: &GlobalUBO) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .create(device, "Global Bind Group"),
        );
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    /// `None` until `create_bind_group()` has run
    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::lights::setup_scene_lights;

    #[test]
    fn test_global_layout_size() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 64);
        assert_eq!(std::mem::size_of::<GlobalUBOContent>(), 416);
    }

    #[test]
    fn test_lights_are_packed() {
        let lights = setup_scene_lights();
        let content = GlobalUBOContent::new(&CameraUniform::default(), &lights);

        assert_eq!(content.use_lighting, 1);
        assert_eq!(content.light_count, 4);
        assert_eq!(content.lights[0].position_focal, [3.0, 10.0, 4.0, 32.0]);
        assert_eq!(content.lights[1].ambient_intensity, [0.0, 0.0, 0.0, 0.2]);
        assert_eq!(content.lights[2].position_focal, [0.0, -200.0, 0.0, 1.0]);
    }
}
