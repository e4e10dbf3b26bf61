//! # Procedural Geometry Generation
//!
//! Every shape in the clock scene is generated here at start-up, so the viewer
//! never loads model files.
//!
//! ## Supported Primitives
//!
//! - **Plane**: XZ square spanning -1..1, normal +Y
//! - **Box**: unit cube centered at the origin
//! - **Sphere**: UV sphere of radius 1
//! - **Cone**, **Cylinder**, **Tapered cylinder**: unit height, base on y = 0
//! - **Torus**: ring of radius 1 in the XY plane
//!
//! ## Usage
//!
//! ```rust
//! use clockscene::gfx::geometry::{generate_sphere, MeshKind};
//!
//! let sphere = generate_sphere(32, 16);
//! assert!(sphere.triangle_count() > 0);
//!
//! let torus = MeshKind::Torus.generate();
//! assert!(torus.vertex_count() > 0);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Tube radius used for every torus in the scene
pub const TORUS_MINOR_RADIUS: f32 = 0.05;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves positions, normals and texture coordinates into the
    /// vertex format consumed by the scene pipeline
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                tex_coords: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect()
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}

/// The fixed set of primitive meshes a draw call can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Plane,
    Box,
    Sphere,
    Cone,
    Cylinder,
    TaperedCylinder,
    Torus,
}

impl MeshKind {
    pub const ALL: [MeshKind; 7] = [
        MeshKind::Plane,
        MeshKind::Box,
        MeshKind::Sphere,
        MeshKind::Cone,
        MeshKind::Cylinder,
        MeshKind::TaperedCylinder,
        MeshKind::Torus,
    ];

    /// Builds the geometry for this kind at the resolution the scene uses
    pub fn generate(self) -> GeometryData {
        match self {
            MeshKind::Plane => generate_plane(),
            MeshKind::Box => generate_box(),
            MeshKind::Sphere => generate_sphere(48, 24),
            MeshKind::Cone => generate_cone(36),
            MeshKind::Cylinder => generate_cylinder(36),
            MeshKind::TaperedCylinder => generate_tapered_cylinder(36),
            MeshKind::Torus => generate_torus(64, 16, TORUS_MINOR_RADIUS),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MeshKind::Plane => "plane",
            MeshKind::Box => "box",
            MeshKind::Sphere => "sphere",
            MeshKind::Cone => "cone",
            MeshKind::Cylinder => "cylinder",
            MeshKind::TaperedCylinder => "tapered_cylinder",
            MeshKind::Torus => "torus",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_vertices_interleaves_attributes() {
        let plane = generate_plane();
        let vertices = plane.to_vertices();
        assert_eq!(vertices.len(), 4);
        for (vertex, position) in vertices.iter().zip(&plane.vertices) {
            assert_eq!(vertex.position, *position);
            assert_eq!(vertex.normal, [0.0, 1.0, 0.0]);
        }
        assert_eq!(vertices[0].tex_coords, plane.tex_coords[0]);
    }

    #[test]
    fn test_every_kind_generates_triangles() {
        for kind in MeshKind::ALL {
            let data = kind.generate();
            assert!(data.triangle_count() > 0, "{} is empty", kind.label());
        }
    }
}
