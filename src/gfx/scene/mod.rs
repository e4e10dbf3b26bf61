//! # Scene Module
//!
//! Everything needed to describe one frame of the clock scene: the vertex
//! format, GPU meshes, transform composition, the draw recorder, the clock
//! composite, and the [`Scene`] that ties them to the camera.
//!
//! ## Usage
//!
//! ```no_run
//! use clockscene::config::ViewerConfig;
//! use clockscene::gfx::scene::Scene;
//!
//! let scene = Scene::prepare(&ViewerConfig::default());
//! let draws = scene.record_frame();
//! assert_eq!(draws.len(), 22);
//! ```

pub mod clock;
pub mod draw_list;
pub mod mesh;
pub mod scene;
pub mod transform;
pub mod vertex;

// Re-export main types
pub use clock::{draw_clock, ClockPlacement};
pub use draw_list::{DrawCall, DrawRecorder, DrawUniform, TextureMode};
pub use mesh::{DrawMesh, Mesh, MeshLibrary};
pub use scene::Scene;
pub use transform::Transform;
pub use vertex::Vertex3D;
