use cgmath::Vector3;

use crate::{
    config::ViewerConfig,
    gfx::{
        camera::{CameraController, CameraManager, FlyCamera},
        geometry::MeshKind,
        resources::{
            lights::{setup_scene_lights, SceneLights},
            material::{define_object_materials, MaterialLibrary},
            texture_registry::{load_scene_textures, TextureRegistry},
        },
    },
};

use super::{
    clock::{draw_clock, ClockPlacement},
    draw_list::{DrawCall, DrawRecorder},
};

/// The four clocks of the scene
pub fn scene_clocks() -> [ClockPlacement; 4] {
    [
        // main
        ClockPlacement::new(Vector3::new(-1.0, 2.0, 0.0)),
        // large, turned away
        ClockPlacement::new(Vector3::new(1.0, 3.5, 2.0))
            .with_scale(Vector3::new(4.0, 2.0, 1.0))
            .with_rotation(Vector3::new(0.0, -30.0, 0.0)),
        // distorted, lying on its side
        ClockPlacement::new(Vector3::new(-4.0, 2.0, -2.0))
            .with_scale(Vector3::new(1.0, 1.0, 2.0))
            .with_rotation(Vector3::new(-50.0, 0.0, 90.0)),
        // small
        ClockPlacement::new(Vector3::new(-1.0, 4.0, 0.0)).with_scale(Vector3::new(0.2, 0.2, 0.1)),
    ]
}

/// Scene containing the camera, loaded textures, materials, and lights
pub struct Scene {
    pub camera_manager: CameraManager,
    pub textures: TextureRegistry,
    pub materials: MaterialLibrary,
    pub lights: SceneLights,
    pub clocks: Vec<ClockPlacement>,
}

impl Scene {
    /// Loads the scene textures from the configured directory and sets up
    /// materials, lights, and the camera
    pub fn prepare(config: &ViewerConfig) -> Self {
        let textures = load_scene_textures(&config.assets.texture_dir);
        Self::with_textures(config, textures)
    }

    pub fn with_textures(config: &ViewerConfig, textures: TextureRegistry) -> Self {
        let aspect = config.window.width as f32 / config.window.height as f32;
        let camera = FlyCamera::from_config(&config.camera, aspect);
        let controller = CameraController::new(&config.camera);

        Self {
            camera_manager: CameraManager::new(camera, controller),
            textures,
            materials: define_object_materials(),
            lights: setup_scene_lights(),
            clocks: scene_clocks().to_vec(),
        }
    }

    /// Advances the camera by the frame time
    pub fn update(&mut self, delta_time: f32) {
        self.camera_manager.update(delta_time);
    }

    /// Records the floor, the back wall, and every clock
    pub fn render(&self, recorder: &mut DrawRecorder) {
        // floor
        recorder.set_transformations(
            Vector3::new(20.0, 1.0, 10.0),
            0.0,
            0.0,
            0.0,
            Vector3::new(0.0, 0.0, 0.0),
        );
        recorder.set_texture("backdropTexture");
        recorder.set_material("glass");
        recorder.draw(MeshKind::Plane);

        // back wall
        recorder.set_transformations(
            Vector3::new(20.0, 8.0, 10.0),
            90.0,
            0.0,
            0.0,
            Vector3::new(0.0, 7.0, -10.0),
        );
        recorder.set_texture("disintegration");
        recorder.set_material("glass");
        recorder.draw(MeshKind::Plane);

        for clock in &self.clocks {
            draw_clock(recorder, clock);
        }
    }

    /// Draw list for one frame, starting from default shader state
    pub fn record_frame(&self) -> Vec<DrawCall> {
        let mut recorder = DrawRecorder::new(&self.textures, &self.materials);
        self.render(&mut recorder);
        recorder.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        resources::texture_registry::{ImageData, SCENE_TEXTURES},
        scene::draw_list::TextureMode,
    };

    fn full_registry() -> TextureRegistry {
        let mut textures = TextureRegistry::new();
        for (_, tag) in SCENE_TEXTURES {
            textures.register(tag, ImageData::white()).unwrap();
        }
        textures
    }

    #[test]
    fn test_frame_draw_count() {
        let scene = Scene::with_textures(&ViewerConfig::default(), full_registry());
        let calls = scene.record_frame();
        // floor + wall + 4 clocks * 5 parts
        assert_eq!(calls.len(), 22);
        assert_eq!(calls[0].mesh, MeshKind::Plane);
        assert_eq!(calls[1].mesh, MeshKind::Plane);
        assert_eq!(calls[2].mesh, MeshKind::Torus);
    }

    #[test]
    fn test_floor_and_wall_bindings() {
        let scene = Scene::with_textures(&ViewerConfig::default(), full_registry());
        let calls = scene.record_frame();

        let backdrop = scene.textures.find_slot("backdropTexture").unwrap();
        let wall = scene.textures.find_slot("disintegration").unwrap();
        assert_eq!(calls[0].state.texture, TextureMode::Single(backdrop));
        assert_eq!(calls[1].state.texture, TextureMode::Single(wall));
        assert_eq!(calls[0].state.material.tag, "glass");
        assert_eq!(calls[1].state.object_position, Vector3::new(0.0, 7.0, -10.0));
    }

    #[test]
    fn test_clocks_inherit_last_material() {
        let scene = Scene::with_textures(&ViewerConfig::default(), full_registry());
        let calls = scene.record_frame();
        assert!(calls.iter().skip(2).all(|c| c.state.material.tag == "glass"));
    }

    #[test]
    fn test_scene_without_textures_still_records() {
        let scene = Scene::with_textures(&ViewerConfig::default(), TextureRegistry::new());
        let calls = scene.record_frame();
        assert_eq!(calls.len(), 22);
        assert!(calls.iter().all(|c| c.state.texture == TextureMode::None));
    }

    #[test]
    fn test_prepare_with_missing_directory() {
        let mut config = ViewerConfig::default();
        config.assets.texture_dir = "/no/such/texture/dir".into();
        let scene = Scene::prepare(&config);
        assert!(scene.textures.is_empty());
        assert_eq!(scene.materials.len(), 10);
        assert!(scene.lights.lighting_enabled);
    }

    #[test]
    fn test_update_moves_camera_with_held_keys() {
        let mut scene = Scene::with_textures(&ViewerConfig::default(), TextureRegistry::new());
        let start = scene.camera_manager.camera.position;
        scene.camera_manager.controller.process_key(
            winit::keyboard::KeyCode::KeyW,
            true,
            false,
            &mut scene.camera_manager.camera,
        );
        scene.update(1.0);
        assert_ne!(scene.camera_manager.camera.position, start);
    }
}
