//! # Graphics Module
//!
//! Everything between the camera and the GPU:
//!
//! - **Camera System** ([`camera`]) - fly camera driven by keyboard, mouse and scroll
//! - **Geometry** ([`geometry`]) - unit primitive generators
//! - **Rendering Pipeline** ([`rendering`]) - surface, Phong pipeline, frame submission
//! - **Resources** ([`resources`]) - textures, materials, lights and global uniforms
//! - **Scene** ([`scene`]) - draw recording, the clock composite and the scene layout
//! - **UI** ([`ui`]) - ImGui status overlay
//!
//! A frame records a list of [`scene::DrawCall`]s from the [`Scene`] and hands
//! it to the [`RenderEngine`]:
//!
//! ```no_run
//! use clockscene::{gfx::Scene, ViewerConfig};
//!
//! let scene = Scene::prepare(&ViewerConfig::default());
//! let draws = scene.record_frame();
//! // render_engine.render_frame(&draws, None::<fn(&_, &_, &mut _, &_)>)
//! ```

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod ui;

// Re-export commonly used types
pub use camera::FlyCamera;
pub use rendering::render_engine::RenderEngine;
pub use scene::Scene;
