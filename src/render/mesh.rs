use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use wgpu::util::DeviceExt;

use crate::core::raw::RawMesh;
use crate::core::transparency::TransparentTriangle;
use crate::error::CompileError;
use crate::render::builder::{MeshData, TileData};
use crate::render::storage::TextureStorage;

/// Per-mesh shader constants, written before each draw.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct MeshUniforms {
    transform: [[f32; 4]; 4],
    tint: [f32; 4],
}

/// One uploaded draw batch.
struct TileBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl TileBuffers {
    fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Render-ready output of mesh compilation. Immutable once built; owned by
/// the level object and dropped wholesale on level reload.
pub struct CompiledGeometry {
    tiles: Vec<Option<TileBuffers>>,
    untextured: Option<TileBuffers>,
    transparent: Vec<TransparentTriangle>,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
}

/// Compiles a raw mesh and uploads it in one shot.
///
/// `uniform_layout` is the pipeline's layout for the per-mesh transform/tint
/// uniform at group 0, binding 0; tile textures are expected at group 1.
pub fn compile(
    device: &wgpu::Device,
    uniform_layout: &wgpu::BindGroupLayout,
    mesh: &RawMesh,
    texture_storage: &impl TextureStorage,
) -> Result<CompiledGeometry, CompileError> {
    let data = MeshData::build(mesh, texture_storage)?;
    Ok(CompiledGeometry::new(device, uniform_layout, data))
}

impl CompiledGeometry {
    pub fn new(
        device: &wgpu::Device,
        uniform_layout: &wgpu::BindGroupLayout,
        data: MeshData,
    ) -> Self {
        let tiles = data
            .tiles
            .iter()
            .enumerate()
            .map(|(tile, batch)| upload(device, &format!("Tile {tile} Buffer"), batch))
            .collect();
        let untextured = upload(device, "Untextured Buffer", &data.untextured);

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Uniform Buffer"),
            contents: bytemuck::bytes_of(&MeshUniforms {
                transform: Mat4::IDENTITY.to_cols_array_2d(),
                tint: [1.0, 1.0, 1.0, 1.0],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Mesh Uniform Bind Group"),
            layout: uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            tiles,
            untextured,
            transparent: data.transparent,
            uniform_buffer,
            uniform_bind_group,
        }
    }

    /// Issues one indexed draw per non-empty tile batch, then one for the
    /// untextured batch. Transparent triangles are never drawn here; they
    /// belong to the external sorting/blending pass.
    pub fn render(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        queue: &wgpu::Queue,
        transform: Mat4,
        texture_storage: &impl TextureStorage,
        tint: Vec4,
    ) {
        if self.tiles.iter().all(Option::is_none) && self.untextured.is_none() {
            return;
        }

        let uniforms = MeshUniforms {
            transform: transform.to_cols_array_2d(),
            tint: tint.to_array(),
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);

        for (tile, buffers) in self.tiles.iter().enumerate() {
            let Some(buffers) = buffers else { continue };
            render_pass.set_bind_group(1, texture_storage.bindable_resource(tile), &[]);
            buffers.draw(render_pass);
        }

        if let Some(buffers) = &self.untextured {
            render_pass.set_bind_group(1, texture_storage.bindable_resource_untextured(), &[]);
            buffers.draw(render_pass);
        }
    }

    /// Transparent triangles in insertion order, for the external pass.
    pub fn transparent_triangles(&self) -> &[TransparentTriangle] {
        &self.transparent
    }
}

/// Uploads one batch. Empty batches get no buffers, and an allocation
/// failure degrades the batch to empty rather than failing compilation.
fn upload(device: &wgpu::Device, label: &str, batch: &TileData) -> Option<TileBuffers> {
    if batch.is_empty() {
        return None;
    }

    let error_scope = device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(&batch.vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(&batch.indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    if let Some(error) = pollster::block_on(error_scope.pop()) {
        tracing::error!("buffer allocation failed for {}: {}", label, error);
        return None;
    }

    Some(TileBuffers {
        vertex_buffer,
        index_buffer,
        index_count: batch.indices.len() as u32,
    })
}
