use wgpu::util::DeviceExt;

use crate::error::OverlayResult;
use crate::mesh::GridMesh;
use crate::render::vertex::GridVertex;

/// GPU copy of the lattice. Uploaded once; never rewritten.
pub struct GridRenderer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GridRenderer {
    pub fn new(device: &wgpu::Device, mesh: &GridMesh) -> OverlayResult<Self> {
        mesh.spec.check_buffer_limit(device.limits().max_buffer_size)?;

        let vertices = Self::build_vertices(mesh);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("grid_vertex_buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("grid_index_buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::info!(
            "uploaded {}x{} grid: {} vertices, {} segments",
            mesh.spec.width(),
            mesh.spec.length(),
            vertices.len(),
            mesh.segment_count()
        );

        Ok(Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        })
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }

    fn build_vertices(mesh: &GridMesh) -> Vec<GridVertex> {
        mesh.positions
            .iter()
            .map(|&position| GridVertex { position })
            .collect()
    }
}
