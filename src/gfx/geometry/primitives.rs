//! # Primitive Shape Generation
//!
//! This module contains functions to generate the unit primitives the scene is
//! built from. All shapes are Y-up, carry outward normals, and use texture
//! coordinates with `v = 0` at the bottom of the image.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a unit plane in the XZ plane
///
/// Spans -1 to 1 on X and Z at y = 0 with the normal pointing up (+Y).
/// The far edge (z = -1) maps to the top of the texture.
pub fn generate_plane() -> GeometryData {
    let mut data = GeometryData::new();

    let corners = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];
    for [x, z] in corners {
        data.vertices.push([x, 0.0, z]);
        data.normals.push([0.0, 1.0, 0.0]);
        data.tex_coords.push([(x + 1.0) * 0.5, (1.0 - z) * 0.5]);
    }

    // Counter-clockwise when viewed from above
    data.indices = vec![0, 3, 2, 2, 1, 0];
    data
}

/// Generate a unit cube centered at the origin
///
/// Returns a cube with vertices from -0.5 to 0.5 on all axes.
/// Each face has proper normals pointing outward and UV coordinates from 0 to 1.
pub fn generate_box() -> GeometryData {
    let mut data = GeometryData::new();

    #[rustfmt::skip]
    let positions = [
        // Front face
        [-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5],
        // Back face
        [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5, -0.5, -0.5],
        // Left face
        [-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5],
        // Right face
        [ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5],
        // Top face
        [-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5],
        // Bottom face
        [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5],
    ];

    #[rustfmt::skip]
    let tex_coords = [
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
    ];

    let face_normals = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    data.vertices = positions.to_vec();
    data.tex_coords = tex_coords.to_vec();
    data.normals = face_normals
        .iter()
        .flat_map(|normal| std::iter::repeat(*normal).take(4))
        .collect();

    // Two triangles per face, counter-clockwise
    data.indices = (0..6u32)
        .flat_map(|face| {
            let base = face * 4;
            [base, base + 1, base + 2, base + 2, base + 3, base]
        })
        .collect();

    data
}

/// Generate a UV sphere with specified resolution
///
/// # Arguments
/// * `longitude_segments` - Number of vertical segments (longitude lines)
/// * `latitude_segments` - Number of horizontal segments (latitude lines)
///
/// Returns a sphere of radius 1.0 centered at the origin.
pub fn generate_sphere(longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 at the north pole
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;
            let x = sin_theta * phi.cos();
            let y = cos_theta;
            let z = -sin_theta * phi.sin();

            data.vertices.push([x, y, z]);
            data.normals.push([x, y, z]);
            data.tex_coords.push([
                long as f32 / long_segs as f32,
                1.0 - lat as f32 / lat_segs as f32,
            ]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.extend_from_slice(&[first, second, first + 1]);
            data.indices.extend_from_slice(&[second, second + 1, first + 1]);
        }
    }

    data
}

/// Generate a cone standing on the XZ plane
///
/// The base has radius 1 at y = 0 and the apex sits at y = 1.
pub fn generate_cone(segments: u32) -> GeometryData {
    generate_frustum(1.0, 0.0, segments)
}

/// Generate a closed cylinder of radius 1 spanning y = 0 to y = 1
pub fn generate_cylinder(segments: u32) -> GeometryData {
    generate_frustum(1.0, 1.0, segments)
}

/// Generate a closed cylinder that narrows from radius 1 at the bottom to
/// radius 0.5 at the top, spanning y = 0 to y = 1
pub fn generate_tapered_cylinder(segments: u32) -> GeometryData {
    generate_frustum(1.0, 0.5, segments)
}

/// Side wall plus caps for any radius pair over a unit height.
/// A zero top radius produces a cone and gets no top cap.
fn generate_frustum(bottom_radius: f32, top_radius: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let segs = segments.max(3);

    // Slant normal: radial part scaled by the height (1), y by the radius drop
    let slope = bottom_radius - top_radius;

    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (cos_a, sin_a) = (angle.cos(), -angle.sin());
        let u = i as f32 / segs as f32;

        let length = (1.0 + slope * slope).sqrt();
        let normal = [cos_a / length, slope / length, sin_a / length];

        data.vertices
            .push([bottom_radius * cos_a, 0.0, bottom_radius * sin_a]);
        data.normals.push(normal);
        data.tex_coords.push([u, 0.0]);

        data.vertices.push([top_radius * cos_a, 1.0, top_radius * sin_a]);
        data.normals.push(normal);
        data.tex_coords.push([u, 1.0]);
    }

    for i in 0..segs {
        let bottom_current = i * 2;
        let top_current = bottom_current + 1;
        let bottom_next = bottom_current + 2;
        let top_next = bottom_current + 3;

        data.indices
            .extend_from_slice(&[bottom_current, bottom_next, top_current]);
        data.indices
            .extend_from_slice(&[top_current, bottom_next, top_next]);
    }

    add_cap(&mut data, bottom_radius, 0.0, -1.0, segs);
    if top_radius > 0.0 {
        add_cap(&mut data, top_radius, 1.0, 1.0, segs);
    }

    data
}

/// Adds a flat disc at height `y` whose normal points along `facing` (+1 / -1) on Y
fn add_cap(data: &mut GeometryData, radius: f32, y: f32, facing: f32, segs: u32) {
    let center = data.vertices.len() as u32;
    data.vertices.push([0.0, y, 0.0]);
    data.normals.push([0.0, facing, 0.0]);
    data.tex_coords.push([0.5, 0.5]);

    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (cos_a, sin_a) = (angle.cos(), -angle.sin());
        data.vertices.push([radius * cos_a, y, radius * sin_a]);
        data.normals.push([0.0, facing, 0.0]);
        data.tex_coords
            .push([0.5 + 0.5 * cos_a, 0.5 - 0.5 * sin_a]);
    }

    for i in 0..segs {
        let current = center + 1 + i;
        let next = current + 1;
        if facing > 0.0 {
            data.indices.extend_from_slice(&[center, current, next]);
        } else {
            data.indices.extend_from_slice(&[center, next, current]);
        }
    }
}

/// Generate a torus lying in the XY plane
///
/// # Arguments
/// * `major_segments` - Segments around the ring
/// * `minor_segments` - Segments around the tube
/// * `minor_radius` - Tube thickness; the ring itself has radius 1
///
/// The hole faces +Z, so an unrotated torus frames anything drawn at the origin.
pub fn generate_torus(major_segments: u32, minor_segments: u32, minor_radius: f32) -> GeometryData {
    let mut data = GeometryData::new();

    let major_segs = major_segments.max(3);
    let minor_segs = minor_segments.max(3);

    for i in 0..=major_segs {
        let theta = i as f32 * 2.0 * PI / major_segs as f32;
        let (cos_t, sin_t) = (theta.cos(), theta.sin());

        for j in 0..=minor_segs {
            let phi = j as f32 * 2.0 * PI / minor_segs as f32;
            let (cos_p, sin_p) = (phi.cos(), phi.sin());

            let normal = [cos_t * cos_p, sin_t * cos_p, sin_p];
            data.vertices.push([
                cos_t + minor_radius * normal[0],
                sin_t + minor_radius * normal[1],
                minor_radius * normal[2],
            ]);
            data.normals.push(normal);
            data.tex_coords.push([
                i as f32 / major_segs as f32,
                j as f32 / minor_segs as f32,
            ]);
        }
    }

    for i in 0..major_segs {
        for j in 0..minor_segs {
            let first = i * (minor_segs + 1) + j;
            let second = first + minor_segs + 1;

            data.indices.extend_from_slice(&[first, second, first + 1]);
            data.indices.extend_from_slice(&[second, second + 1, first + 1]);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_well_formed(data: &GeometryData) {
        assert_eq!(data.vertices.len(), data.normals.len());
        assert_eq!(data.vertices.len(), data.tex_coords.len());
        assert_eq!(data.indices.len() % 3, 0);
        assert!(data
            .indices
            .iter()
            .all(|&i| (i as usize) < data.vertices.len()));
        for n in &data.normals {
            let length = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert_relative_eq!(length, 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane();
        assert_well_formed(&plane);
        assert_eq!(plane.vertex_count(), 4);
        assert_eq!(plane.triangle_count(), 2);
        assert!(plane.vertices.iter().all(|v| v[1] == 0.0));
        assert!(plane
            .vertices
            .iter()
            .all(|v| v[0].abs() == 1.0 && v[2].abs() == 1.0));
    }

    #[test]
    fn test_box_generation() {
        let cube = generate_box();
        assert_well_formed(&cube);
        assert_eq!(cube.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.triangle_count(), 12);
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(8, 6);
        assert_well_formed(&sphere);
        assert_eq!(sphere.vertex_count(), 9 * 7);
        assert_eq!(sphere.triangle_count(), 8 * 6 * 2);
        for v in &sphere.vertices {
            let r = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert_relative_eq!(r, 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_cone_generation() {
        let cone = generate_cone(16);
        assert_well_formed(&cone);
        let max_y = cone.vertices.iter().map(|v| v[1]).fold(f32::MIN, f32::max);
        assert_eq!(max_y, 1.0);
        // Every top vertex collapses onto the apex
        assert!(cone
            .vertices
            .iter()
            .filter(|v| v[1] == 1.0)
            .all(|v| v[0].abs() < 1e-6 && v[2].abs() < 1e-6));
    }

    #[test]
    fn test_cylinder_and_tapered_cylinder() {
        let cylinder = generate_cylinder(12);
        let tapered = generate_tapered_cylinder(12);
        assert_well_formed(&cylinder);
        assert_well_formed(&tapered);
        assert_eq!(cylinder.vertex_count(), tapered.vertex_count());

        let top_radius = |data: &GeometryData| {
            data.vertices
                .iter()
                .filter(|v| v[1] == 1.0)
                .map(|v| (v[0] * v[0] + v[2] * v[2]).sqrt())
                .fold(0.0f32, f32::max)
        };
        assert_relative_eq!(top_radius(&cylinder), 1.0, epsilon = 1e-5);
        assert_relative_eq!(top_radius(&tapered), 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_torus_generation() {
        let torus = generate_torus(24, 8, 0.05);
        assert_well_formed(&torus);
        for v in &torus.vertices {
            let ring = (v[0] * v[0] + v[1] * v[1]).sqrt();
            assert!(ring >= 0.95 - 1e-5 && ring <= 1.05 + 1e-5);
            assert!(v[2].abs() <= 0.05 + 1e-6);
        }
    }
}
