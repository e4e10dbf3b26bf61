//! Error types for the viewer
//!
//! Library code returns these `thiserror` enums; the binary wraps them in
//! `anyhow` at the top level.

use std::path::PathBuf;

/// Errors raised while loading or validating [`crate::config::ViewerConfig`]
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values that parse but cannot drive the viewer
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised by the texture registry
#[derive(thiserror::Error, Debug)]
pub enum TextureError {
    #[error("could not load image {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image {path:?} has {channels} channels, only 3 or 4 are supported")]
    UnsupportedChannels { path: PathBuf, channels: u8 },

    #[error("all {max} texture slots are in use, cannot register '{tag}'", max = crate::gfx::resources::texture_registry::MAX_TEXTURE_SLOTS)]
    SlotsExhausted { tag: String },

    #[error("a texture tagged '{0}' is already registered")]
    DuplicateTag(String),
}

/// Errors raised while bringing up the GPU side of the viewer
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to request adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("pipeline error: {0}")]
    Pipeline(String),
}
