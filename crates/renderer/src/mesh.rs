//! GPU copies of scene geometries.

use corelib::geometry::MeshData;
use wgpu::util::DeviceExt;
use wgpu::{Buffer, BufferUsages, Device};

use crate::uniforms::GpuVertex;

pub struct GpuMesh {
    pub vertex_buf: Buffer,
    pub index_buf: Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &Device, label: &str, mesh: &MeshData) -> Self {
        let vertices: Vec<GpuVertex> = mesh.vertices.iter().map(GpuVertex::from).collect();
        let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} VB")),
            contents: bytemuck::cast_slice(&vertices),
            usage: BufferUsages::VERTEX,
        });
        let index_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} IB")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: BufferUsages::INDEX,
        });
        Self {
            vertex_buf,
            index_buf,
            index_count: mesh.indices.len() as u32,
        }
    }
}
