//! GPU-resident primitive meshes

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::gfx::geometry::{GeometryData, MeshKind};

/// Vertex and index buffers for one primitive
pub struct Mesh {
    pub kind: MeshKind,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl Mesh {
    pub fn from_geometry(device: &wgpu::Device, kind: MeshKind, geometry: &GeometryData) -> Self {
        let vertices = geometry.to_vertices();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", kind.label())),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", kind.label())),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            kind,
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
        }
    }
}

/// Every primitive uploaded once and shared by all draws
pub struct MeshLibrary {
    meshes: HashMap<MeshKind, Mesh>,
}

impl MeshLibrary {
    pub fn new(device: &wgpu::Device) -> Self {
        let meshes = MeshKind::ALL
            .into_iter()
            .map(|kind| {
                let geometry = kind.generate();
                log::debug!(
                    "Uploaded {} mesh: {} vertices, {} triangles",
                    kind.label(),
                    geometry.vertex_count(),
                    geometry.triangle_count()
                );
                (kind, Mesh::from_geometry(device, kind, &geometry))
            })
            .collect();

        Self { meshes }
    }

    pub fn get(&self, kind: MeshKind) -> Option<&Mesh> {
        self.meshes.get(&kind)
    }
}

pub trait DrawMesh<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh);
}

impl<'a, 'b> DrawMesh<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}
