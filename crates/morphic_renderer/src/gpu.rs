use std::ops::Range;

use wgpu::util::DeviceExt;

use crate::{
    draw::DrawCommands,
    geometry::MeshGroup,
    mesh::{MorphPushParameters, Vertex},
    model::Model,
};

/// Vertex and index buffer pair of one mesh group.
pub struct GpuGeometry {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    pub index_count: u32,
}

/// Device-side copy of a model's geometry.
///
/// Groups with no geometry have no buffers at all.
pub struct GpuModel {
    pub normal: Option<GpuGeometry>,
    pub morph: Option<GpuGeometry>,
    /// Packed morph deltas, bound as a read-only storage buffer.
    pub morph_data: Option<wgpu::Buffer>,
}

impl GpuModel {
    /// Uploads every buffer and releases the model's client-side copies.
    pub fn upload(device: &wgpu::Device, model: &mut Model) -> Self {
        let normal = create_gpu_geometry(
            device,
            "Normal Mesh",
            model.geometry.vertices(MeshGroup::Normal),
            model.geometry.indices(MeshGroup::Normal),
        );
        let morph = create_gpu_geometry(
            device,
            "Morph Mesh",
            model.geometry.vertices(MeshGroup::Morph),
            model.geometry.indices(MeshGroup::Morph),
        );

        let morph_data = model.take_morph_data();
        let morph_data = (!morph_data.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Morph Target Data"),
                contents: bytemuck::cast_slice(&morph_data),
                usage: wgpu::BufferUsages::STORAGE,
            })
        });

        log::info!(
            "Uploaded model: {} static vertices, {} morph vertices, morph data {} bytes",
            normal.as_ref().map_or(0, |g| g.vertex_count),
            morph.as_ref().map_or(0, |g| g.vertex_count),
            morph_data.as_ref().map_or(0, |b| b.size())
        );

        model.geometry.release();
        Self {
            normal,
            morph,
            morph_data,
        }
    }

    pub fn geometry(&self, group: MeshGroup) -> Option<&GpuGeometry> {
        match group {
            MeshGroup::Normal => self.normal.as_ref(),
            MeshGroup::Morph => self.morph.as_ref(),
        }
    }

    /// Releases every device buffer. Absent buffers are skipped.
    pub fn destroy(self) {
        for geometry in [self.normal, self.morph].into_iter().flatten() {
            geometry.vertex_buffer.destroy();
            geometry.index_buffer.destroy();
        }
        if let Some(buffer) = self.morph_data {
            buffer.destroy();
        }
    }
}

fn create_gpu_geometry(
    device: &wgpu::Device,
    label: &str,
    vertices: &[Vertex],
    indices: &[u32],
) -> Option<GpuGeometry> {
    if vertices.is_empty() || indices.is_empty() {
        return None;
    }

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} Vertex Buffer", label)),
        contents: bytemuck::cast_slice(vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });

    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} Index Buffer", label)),
        contents: bytemuck::cast_slice(indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    Some(GpuGeometry {
        vertex_buffer,
        index_buffer,
        vertex_count: vertices.len() as u32,
        index_count: indices.len() as u32,
    })
}

/// Records draw commands into a wgpu render pass.
///
/// The pass's pipeline must declare `MorphPushParameters::push_constant_range`
/// before morph meshes are drawn.
pub struct RenderPassCommands<'p, 'pass> {
    pub pass: &'p mut wgpu::RenderPass<'pass>,
    pub model: &'p GpuModel,
}

impl DrawCommands for RenderPassCommands<'_, '_> {
    fn bind_vertex_buffer(&mut self, group: MeshGroup, byte_offset: u64) {
        match self.model.geometry(group) {
            Some(geometry) if byte_offset < geometry.vertex_buffer.size() => {
                self.pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(byte_offset..));
            }
            Some(_) => log::warn!("Vertex offset {} is past the {:?} buffer", byte_offset, group),
            None => {}
        }
    }

    fn bind_index_buffer(&mut self, group: MeshGroup) {
        if let Some(geometry) = self.model.geometry(group) {
            self.pass
                .set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        }
    }

    fn push_morph_parameters(&mut self, parameters: &MorphPushParameters) {
        self.pass
            .set_push_constants(wgpu::ShaderStages::VERTEX, 0, bytemuck::bytes_of(parameters));
    }

    fn draw_indexed(&mut self, indices: Range<u32>, base_vertex: i32) {
        self.pass.draw_indexed(indices, base_vertex, 0..1);
    }
}
