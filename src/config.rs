//! Viewer configuration
//!
//! Settings are read from a TOML file. Every field has a default, so a config
//! file only needs to name what it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use crate::error::ConfigError;

/// Top level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub assets: AssetConfig,
    pub overlay: OverlayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
            title: "Persistence of Clocks".to_string(),
        }
    }
}

/// Camera placement, projection, and input tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Default perspective eye position
    pub position: [f32; 3],
    /// Default perspective view direction (normalized on use)
    pub front: [f32; 3],
    pub up: [f32; 3],
    /// Vertical field of view in degrees
    pub zoom: f32,
    pub ortho_position: [f32; 3],
    pub ortho_front: [f32; 3],
    /// Half of the visible world height in orthographic mode
    pub ortho_half_height: f32,
    pub near: f32,
    pub far: f32,
    pub mouse_sensitivity: f32,
    /// Movement speed in world units per second
    pub initial_speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Speed change per scroll notch
    pub scroll_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [-1.0, 3.0, 7.0],
            front: [0.0, -0.1, -1.0],
            up: [0.0, 1.0, 0.0],
            zoom: 68.0,
            ortho_position: [0.0, 0.0, 10.0],
            ortho_front: [0.0, 0.0, -1.0],
            ortho_half_height: 4.0,
            near: 0.1,
            far: 100.0,
            mouse_sensitivity: 0.1,
            initial_speed: 2.5,
            min_speed: 0.1,
            max_speed: 20.0,
            scroll_sensitivity: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub texture_dir: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            texture_dir: PathBuf::from("textures"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub enabled: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl ViewerConfig {
    /// Loads and validates a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let is_toml = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);
        if !is_toml {
            return Err(ConfigError::UnsupportedFormat(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;

        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Loads `path` when given, otherwise returns the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                log::debug!("No configuration file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        let camera = &self.camera;
        if camera.min_speed > camera.max_speed {
            return Err(ConfigError::Invalid(format!(
                "camera min_speed {} exceeds max_speed {}",
                camera.min_speed, camera.max_speed
            )));
        }
        if !(camera.zoom > 0.0 && camera.zoom < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "camera zoom must be between 0 and 180 degrees, got {}",
                camera.zoom
            )));
        }
        if camera.near <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "camera near plane must be positive, got {}",
                camera.near
            )));
        }
        if camera.near >= camera.far {
            return Err(ConfigError::Invalid(format!(
                "camera near plane {} must be closer than far plane {}",
                camera.near, camera.far
            )));
        }
        if camera.ortho_half_height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "camera ortho_half_height must be positive, got {}",
                camera.ortho_half_height
            )));
        }
        for (name, direction) in [
            ("front", camera.front),
            ("ortho_front", camera.ortho_front),
            ("up", camera.up),
        ] {
            if direction.iter().all(|c| *c == 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "camera {} must be a non-zero vector",
                    name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.window.width, 1000);
        assert_eq!(config.window.height, 800);
        assert_eq!(config.camera.zoom, 68.0);
        assert_eq!(config.camera.position, [-1.0, 3.0, 7.0]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[camera]\nmax_speed = 5.0\n\n[overlay]\nenabled = false").unwrap();

        let config = ViewerConfig::load(file.path()).unwrap();
        assert_eq!(config.camera.max_speed, 5.0);
        assert_eq!(config.camera.min_speed, 0.1);
        assert!(!config.overlay.enabled);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn test_rejects_non_toml_extension() {
        let file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        let err = ViewerConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_rejects_inverted_speed_bounds() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[camera]\nmin_speed = 30.0").unwrap();

        let err = ViewerConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    fn assert_invalid(config: &ViewerConfig) {
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_zero_window_size() {
        let mut config = ViewerConfig::default();
        config.window.width = 0;
        assert_invalid(&config);

        let mut config = ViewerConfig::default();
        config.window.height = 0;
        assert_invalid(&config);
    }

    #[test]
    fn test_rejects_zoom_outside_open_range() {
        for zoom in [0.0, -10.0, 180.0, 200.0] {
            let mut config = ViewerConfig::default();
            config.camera.zoom = zoom;
            assert_invalid(&config);
        }
    }

    #[test]
    fn test_rejects_near_not_before_far() {
        let mut config = ViewerConfig::default();
        config.camera.near = 100.0;
        assert_invalid(&config);

        config.camera.near = 150.0;
        assert_invalid(&config);
    }

    #[test]
    fn test_rejects_non_positive_near() {
        for near in [0.0, -0.5] {
            let mut config = ViewerConfig::default();
            config.camera.near = near;
            assert_invalid(&config);
        }
    }

    #[test]
    fn test_rejects_non_positive_ortho_half_height() {
        let mut config = ViewerConfig::default();
        config.camera.ortho_half_height = 0.0;
        assert_invalid(&config);
    }

    #[test]
    fn test_rejects_zero_directions() {
        let mut config = ViewerConfig::default();
        config.camera.front = [0.0; 3];
        assert_invalid(&config);

        let mut config = ViewerConfig::default();
        config.camera.ortho_front = [0.0; 3];
        assert_invalid(&config);

        let mut config = ViewerConfig::default();
        config.camera.up = [0.0; 3];
        assert_invalid(&config);
    }

    #[test]
    fn test_zero_near_in_file_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[camera]\nnear = 0.0").unwrap();

        let err = ViewerConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[window\nwidth = ").unwrap();

        let err = ViewerConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_or_default_without_path() {
        let config = ViewerConfig::load_or_default(None).unwrap();
        assert_eq!(config, ViewerConfig::default());
    }
}
