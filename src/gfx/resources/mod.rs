// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles textures, materials, lights, and the global bind group.

pub mod global_bindings;
pub mod lights;
pub mod material;
pub mod texture_registry;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO};
pub use lights::{LightSource, SceneLights};
pub use material::{MaterialLibrary, ObjectMaterial};
pub use texture_registry::{ImageData, TextureRegistry};
pub use texture_resource::{TextureBindings, TextureResource};
