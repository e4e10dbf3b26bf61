//! Per-draw shader state and the list of recorded draws
//!
//! [`DrawRecorder`] behaves like a set of shader uniforms: every setter
//! changes the current state, which stays in effect until changed again, and
//! [`DrawRecorder::draw`] snapshots it into a [`DrawCall`]. The render engine
//! turns each call into a dynamic-offset uniform entry plus one indexed draw.

use cgmath::{Matrix, Matrix4, SquareMatrix, Vector3};

use super::transform::compose_model_matrix;
use crate::gfx::{
    geometry::MeshKind,
    resources::{material::MaterialLibrary, material::ObjectMaterial, texture_registry::TextureRegistry},
};

/// How the fragment shader colors a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureMode {
    /// Flat object color
    None,
    Single(usize),
    /// `top` covers the upper half of the object, `bottom` the lower half
    Two { top: usize, bottom: usize },
}

impl TextureMode {
    /// Slots bound at texture bindings 0 and 1
    pub fn slots(&self) -> (Option<usize>, Option<usize>) {
        match *self {
            TextureMode::None => (None, None),
            TextureMode::Single(slot) => (Some(slot), None),
            TextureMode::Two { top, bottom } => (Some(top), Some(bottom)),
        }
    }
}

/// The shader state a draw is issued with
#[derive(Debug, Clone, PartialEq)]
pub struct DrawState {
    pub model: Matrix4<f32>,
    pub color: [f32; 4],
    pub object_position: Vector3<f32>,
    pub object_scale: Vector3<f32>,
    pub uv_scale: [f32; 2],
    pub texture: TextureMode,
    pub material: ObjectMaterial,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            model: Matrix4::identity(),
            color: [1.0, 1.0, 1.0, 1.0],
            object_position: Vector3::new(0.0, 0.0, 0.0),
            object_scale: Vector3::new(1.0, 1.0, 1.0),
            uv_scale: [1.0, 1.0],
            texture: TextureMode::None,
            material: ObjectMaterial::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub mesh: MeshKind,
    pub state: DrawState,
}

impl DrawCall {
    pub fn uniform(&self) -> DrawUniform {
        DrawUniform::from(&self.state)
    }
}

/// Per-draw uniform block
///
/// MUST match the `DrawData` struct in `scene.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub object_color: [f32; 4],
    pub object_position: [f32; 4],
    pub object_scale: [f32; 4],
    pub uv_scale: [f32; 2],
    pub use_texture: u32,
    pub use_two_textures: u32,
    /// rgb ambient color, w ambient strength
    pub ambient: [f32; 4],
    /// rgb diffuse color, w shininess
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}
// Total: 64 + 64 + 3 * 16 + 16 + 3 * 16 = 240 bytes

impl From<&DrawState> for DrawUniform {
    fn from(state: &DrawState) -> Self {
        let normal_matrix = state
            .model
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity);
        let material = &state.material;
        let [ar, ag, ab] = material.ambient_color;
        let [dr, dg, db] = material.diffuse_color;
        let [sr, sg, sb] = material.specular_color;

        Self {
            model: state.model.into(),
            normal_matrix: normal_matrix.into(),
            object_color: state.color,
            object_position: state.object_position.extend(1.0).into(),
            object_scale: state.object_scale.extend(0.0).into(),
            uv_scale: state.uv_scale,
            use_texture: (state.texture != TextureMode::None) as u32,
            use_two_textures: matches!(state.texture, TextureMode::Two { .. }) as u32,
            ambient: [ar, ag, ab, material.ambient_strength],
            diffuse: [dr, dg, db, material.shininess],
            specular: [sr, sg, sb, 0.0],
        }
    }
}

/// Records draws against the scene's textures and materials
pub struct DrawRecorder<'a> {
    textures: &'a TextureRegistry,
    materials: &'a MaterialLibrary,
    state: DrawState,
    calls: Vec<DrawCall>,
}

impl<'a> DrawRecorder<'a> {
    pub fn new(textures: &'a TextureRegistry, materials: &'a MaterialLibrary) -> Self {
        Self {
            textures,
            materials,
            state: DrawState::default(),
            calls: Vec::new(),
        }
    }

    /// model = T · Rx · Ry · Rz · S with rotations in degrees.
    ///
    /// Also records `position` and `scale` as the object placement.
    pub fn set_transformations(
        &mut self,
        scale: Vector3<f32>,
        x_rotation_degrees: f32,
        y_rotation_degrees: f32,
        z_rotation_degrees: f32,
        position: Vector3<f32>,
    ) {
        let rotation = Vector3::new(x_rotation_degrees, y_rotation_degrees, z_rotation_degrees);
        self.state.model = compose_model_matrix(scale, rotation, position);
        self.state.object_position = position;
        self.state.object_scale = scale;
    }

    pub fn set_model_matrix(&mut self, model: Matrix4<f32>) {
        self.state.model = model;
    }

    /// World placement used to split two-texture objects into halves
    pub fn set_object_placement(&mut self, position: Vector3<f32>, scale: Vector3<f32>) {
        self.state.object_position = position;
        self.state.object_scale = scale;
    }

    pub fn set_uv_scale(&mut self, uv_scale: [f32; 2]) {
        self.state.uv_scale = uv_scale;
    }

    /// Sets the flat object color and turns texturing off
    pub fn set_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.state.color = [r, g, b, a];
        self.state.texture = TextureMode::None;
    }

    /// Textures the next draws with `tag`.
    ///
    /// An unknown tag leaves texturing off so the current color shows.
    pub fn set_texture(&mut self, tag: &str) {
        self.state.texture = match self.textures.find_slot(tag) {
            Some(slot) => TextureMode::Single(slot),
            None => {
                log::warn!("No texture tagged '{}', drawing untextured", tag);
                TextureMode::None
            }
        };
    }

    /// Upper half samples `top`, lower half samples `bottom`
    pub fn set_two_textures(&mut self, top: &str, bottom: &str) {
        let slots = (self.textures.find_slot(top), self.textures.find_slot(bottom));
        self.state.texture = match slots {
            (Some(top), Some(bottom)) => TextureMode::Two { top, bottom },
            _ => {
                log::warn!(
                    "Texture pair '{}'/'{}' is incomplete, drawing untextured",
                    top,
                    bottom
                );
                TextureMode::None
            }
        };
    }

    /// Copies the material's values; an unknown tag keeps the previous material
    pub fn set_material(&mut self, tag: &str) {
        match self.materials.find(tag) {
            Some(material) => self.state.material = material.clone(),
            None => log::warn!(
                "No material tagged '{}', keeping '{}'",
                tag,
                self.state.material.tag
            ),
        }
    }

    pub fn draw(&mut self, mesh: MeshKind) {
        log::trace!("Recording {} draw #{}", mesh.label(), self.calls.len());
        self.calls.push(DrawCall {
            mesh,
            state: self.state.clone(),
        });
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn finish(self) -> Vec<DrawCall> {
        self.calls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::{material::define_object_materials, texture_registry::ImageData};
    use approx::assert_relative_eq;

    fn registry() -> TextureRegistry {
        let mut textures = TextureRegistry::new();
        textures.register("clockface1", ImageData::white()).unwrap();
        textures.register("clockface2", ImageData::white()).unwrap();
        textures
    }

    #[test]
    fn test_draw_uniform_size() {
        assert_eq!(std::mem::size_of::<DrawUniform>(), 240);
    }

    #[test]
    fn test_state_is_sticky_between_draws() {
        let textures = registry();
        let materials = define_object_materials();
        let mut recorder = DrawRecorder::new(&textures, &materials);

        recorder.set_color(1.0, 0.0, 0.0, 1.0);
        recorder.set_material("gold");
        recorder.draw(MeshKind::Box);
        recorder.draw(MeshKind::Sphere);

        let calls = recorder.finish();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].mesh, MeshKind::Sphere);
        assert_eq!(calls[1].state.color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(calls[1].state.material.tag, "gold");
        assert_eq!(calls[0].state, calls[1].state);
    }

    #[test]
    fn test_color_disables_texture() {
        let textures = registry();
        let materials = MaterialLibrary::new();
        let mut recorder = DrawRecorder::new(&textures, &materials);

        recorder.set_texture("clockface2");
        assert_eq!(recorder.state().texture, TextureMode::Single(1));

        recorder.set_color(0.0, 0.0, 0.0, 1.0);
        assert_eq!(recorder.state().texture, TextureMode::None);
    }

    #[test]
    fn test_missing_texture_leaves_texturing_off() {
        let textures = registry();
        let materials = MaterialLibrary::new();
        let mut recorder = DrawRecorder::new(&textures, &materials);

        recorder.set_texture("clockface1");
        recorder.set_texture("nope");
        assert_eq!(recorder.state().texture, TextureMode::None);

        recorder.set_two_textures("clockface2", "nope");
        assert_eq!(recorder.state().texture, TextureMode::None);

        recorder.set_two_textures("clockface2", "clockface1");
        assert_eq!(
            recorder.state().texture,
            TextureMode::Two { top: 1, bottom: 0 }
        );
        assert_eq!(recorder.state().texture.slots(), (Some(1), Some(0)));
    }

    #[test]
    fn test_missing_material_keeps_previous() {
        let textures = TextureRegistry::new();
        let materials = define_object_materials();
        let mut recorder = DrawRecorder::new(&textures, &materials);

        recorder.set_material("glass");
        recorder.set_material("marble");
        assert_eq!(recorder.state().material.tag, "glass");
    }

    #[test]
    fn test_set_transformations_records_placement() {
        let textures = TextureRegistry::new();
        let materials = MaterialLibrary::new();
        let mut recorder = DrawRecorder::new(&textures, &materials);

        let scale = Vector3::new(20.0, 8.0, 10.0);
        let position = Vector3::new(0.0, 7.0, -10.0);
        recorder.set_transformations(scale, 90.0, 0.0, 0.0, position);

        let state = recorder.state();
        assert_eq!(state.object_position, position);
        assert_eq!(state.object_scale, scale);
        assert_eq!(state.model, compose_model_matrix(scale, Vector3::new(90.0, 0.0, 0.0), position));
    }

    #[test]
    fn test_uniform_packs_material_and_flags() {
        let textures = registry();
        let materials = define_object_materials();
        let mut recorder = DrawRecorder::new(&textures, &materials);

        recorder.set_material("glass");
        recorder.set_two_textures("clockface2", "clockface1");
        recorder.set_object_placement(Vector3::new(1.0, 2.0, 3.0), Vector3::new(2.0, 2.0, 0.2));
        recorder.draw(MeshKind::Sphere);

        let uniform = recorder.calls()[0].uniform();
        assert_eq!(uniform.use_texture, 1);
        assert_eq!(uniform.use_two_textures, 1);
        assert_eq!(uniform.object_position, [1.0, 2.0, 3.0, 1.0]);
        assert_relative_eq!(uniform.ambient[3], 0.3);
        assert_relative_eq!(uniform.diffuse[3], 85.0);
    }

    #[test]
    fn test_normal_matrix_undoes_nonuniform_scale() {
        let textures = TextureRegistry::new();
        let materials = MaterialLibrary::new();
        let mut recorder = DrawRecorder::new(&textures, &materials);
        recorder.set_transformations(
            Vector3::new(2.0, 1.0, 1.0),
            0.0,
            0.0,
            0.0,
            Vector3::new(5.0, 0.0, 0.0),
        );
        recorder.draw(MeshKind::Plane);

        let uniform = recorder.calls()[0].uniform();
        assert_relative_eq!(uniform.normal_matrix[0][0], 0.5);
        assert_relative_eq!(uniform.normal_matrix[1][1], 1.0);
    }
}
