// src/lib.rs
//! Clock scene viewer
//!
//! An interactive 3D viewer built on wgpu and winit. A fly camera moves
//! through a static scene of composite clocks assembled from textured,
//! lit primitives.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::ViewerApp;
pub use config::ViewerConfig;
