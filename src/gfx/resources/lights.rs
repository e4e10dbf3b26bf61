//! Point lights illuminating the scene

/// Number of light slots the shader evaluates
pub const MAX_LIGHTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    pub position: [f32; 3],
    pub ambient_color: [f32; 3],
    pub diffuse_color: [f32; 3],
    pub specular_color: [f32; 3],
    /// Specular exponent applied to this light's highlight
    pub focal_strength: f32,
    pub specular_intensity: f32,
}

impl LightSource {
    /// A light parked far below the floor that contributes nothing
    pub fn disabled() -> Self {
        Self {
            position: [0.0, -200.0, 0.0],
            ambient_color: [0.0; 3],
            diffuse_color: [0.0; 3],
            specular_color: [0.0; 3],
            focal_strength: 1.0,
            specular_intensity: 0.0,
        }
    }
}

/// The full light setup uploaded with the camera each frame
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLights {
    pub lights: [LightSource; MAX_LIGHTS],
    pub lighting_enabled: bool,
}

impl SceneLights {
    pub fn active_count(&self) -> usize {
        self.lights
            .iter()
            .filter(|light| light.specular_intensity > 0.0 || light.diffuse_color != [0.0; 3])
            .count()
    }
}

/// Two coloured key lights above the scene; the remaining slots stay dark
pub fn setup_scene_lights() -> SceneLights {
    let key = LightSource {
        position: [3.0, 10.0, 4.0],
        ambient_color: [0.0; 3],
        diffuse_color: [0.5, 0.5, 0.5],
        specular_color: [0.3, 0.2, 0.9],
        focal_strength: 32.0,
        specular_intensity: 0.2,
    };
    let fill = LightSource {
        position: [-4.0, 8.0, 2.0],
        ambient_color: [0.0; 3],
        diffuse_color: [0.2, 0.2, 0.8],
        specular_color: [0.8, 0.7, 1.0],
        focal_strength: 32.0,
        specular_intensity: 0.2,
    };

    SceneLights {
        lights: [key, fill, LightSource::disabled(), LightSource::disabled()],
        lighting_enabled: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_lights() {
        let setup = setup_scene_lights();
        assert!(setup.lighting_enabled);
        assert_eq!(setup.active_count(), 2);
        assert_eq!(setup.lights[0].position, [3.0, 10.0, 4.0]);
        assert_eq!(setup.lights[1].diffuse_color, [0.2, 0.2, 0.8]);
        assert_eq!(setup.lights[3], LightSource::disabled());
    }
}
