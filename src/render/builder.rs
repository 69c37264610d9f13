use glam::{Vec2, Vec3};

use crate::core::raw::{RawMesh, TextureRef};
use crate::core::transparency::{TransparencyMode, TransparentTriangle, attribute_to_transparency};
use crate::core::vertex::Vertex;
use crate::error::CompileError;
use crate::render::storage::TextureStorage;

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Vertex and index lists for one draw batch, before GPU upload.
#[derive(Debug, Clone, Default)]
pub struct TileData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl TileData {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// CPU-side output of mesh compilation: one batch per atlas tile, one shared
/// untextured batch, and the transparent triangles held out for a later
/// blending pass.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub tiles: Vec<TileData>,
    pub untextured: TileData,
    pub transparent: Vec<TransparentTriangle>,
}

impl MeshData {
    /// Compiles a raw mesh in a single pass over its faces, in source order:
    /// textured quads, textured triangles, coloured quads, coloured
    /// triangles. Every face lands in exactly one of the per-tile batches,
    /// the untextured batch, or the transparent list.
    pub fn build(mesh: &RawMesh, storage: &impl TextureStorage) -> Result<Self, CompileError> {
        let mut data = MeshData {
            tiles: vec![TileData::default(); storage.tile_count()],
            untextured: TileData::default(),
            transparent: Vec::new(),
        };

        for quad in &mesh.textured_quads {
            let reference = TextureRef::decode(quad.texture);
            let tile = checked_tile(storage, reference.texture)?;
            let positions = model_positions(mesh, &quad.vertices)?;
            let uvs = [
                storage.uv(reference.texture, 0),
                storage.uv(reference.texture, 1),
                storage.uv(reference.texture, 2),
                storage.uv(reference.texture, 3),
            ];

            let attribute = storage.attribute(reference.texture);
            if attribute != 0 {
                let mode = attribute_to_transparency(attribute);
                collect_quad(
                    &mut data.transparent,
                    &positions,
                    &uvs,
                    tile,
                    mode,
                    reference.double_sided,
                );
                continue;
            }

            let corners = std::array::from_fn(|i| Vertex {
                position: positions[i].to_array(),
                uv: uvs[i].to_array(),
                color: WHITE,
            });
            add_quad(&mut data.tiles[tile], corners, reference.double_sided);
        }

        for triangle in &mesh.textured_triangles {
            let reference = TextureRef::decode(triangle.texture);
            let tile = checked_tile(storage, reference.texture)?;
            let positions = model_positions(mesh, &triangle.vertices)?;
            let uvs = [
                storage.uv(reference.texture, 0),
                storage.uv(reference.texture, 1),
                storage.uv(reference.texture, 2),
            ];

            let attribute = storage.attribute(reference.texture);
            if attribute != 0 {
                let mode = attribute_to_transparency(attribute);
                collect_triangle(
                    &mut data.transparent,
                    &positions,
                    &uvs,
                    tile,
                    mode,
                    reference.double_sided,
                );
                continue;
            }

            let corners = std::array::from_fn(|i| Vertex {
                position: positions[i].to_array(),
                uv: uvs[i].to_array(),
                color: WHITE,
            });
            add_triangle(&mut data.tiles[tile], corners, reference.double_sided);
        }

        for quad in &mesh.coloured_quads {
            let reference = TextureRef::decode(quad.texture);
            let positions = model_positions(mesh, &quad.vertices)?;

            let attribute = storage.attribute(reference.texture);
            if attribute != 0 {
                let tile = checked_tile(storage, reference.texture)?;
                let mode = attribute_to_transparency(attribute);
                collect_quad(
                    &mut data.transparent,
                    &positions,
                    &[Vec2::ZERO; 4],
                    tile,
                    mode,
                    reference.double_sided,
                );
                continue;
            }

            let colour = storage.palette_colour(reference.texture).to_array();
            let corners = std::array::from_fn(|i| Vertex {
                position: positions[i].to_array(),
                uv: [0.0, 0.0],
                color: colour,
            });
            add_quad(&mut data.untextured, corners, reference.double_sided);
        }

        for triangle in &mesh.coloured_triangles {
            let reference = TextureRef::decode(triangle.texture);
            let positions = model_positions(mesh, &triangle.vertices)?;

            let attribute = storage.attribute(reference.texture);
            if attribute != 0 {
                let tile = checked_tile(storage, reference.texture)?;
                let mode = attribute_to_transparency(attribute);
                collect_triangle(
                    &mut data.transparent,
                    &positions,
                    &[Vec2::ZERO; 3],
                    tile,
                    mode,
                    reference.double_sided,
                );
                continue;
            }

            let colour = storage.palette_colour(reference.texture).to_array();
            let corners = std::array::from_fn(|i| Vertex {
                position: positions[i].to_array(),
                uv: [0.0, 0.0],
                color: colour,
            });
            add_triangle(&mut data.untextured, corners, reference.double_sided);
        }

        tracing::debug!(
            "compiled mesh: {} occupied tiles, {} untextured indices, {} transparent triangles",
            data.tiles.iter().filter(|t| !t.is_empty()).count(),
            data.untextured.indices.len(),
            data.transparent.len(),
        );

        Ok(data)
    }

    /// True when no batch holds any geometry and the transparent list is empty.
    pub fn is_empty(&self) -> bool {
        self.tiles.iter().all(|t| t.is_empty())
            && self.untextured.is_empty()
            && self.transparent.is_empty()
    }
}

fn checked_tile(storage: &impl TextureStorage, texture: u16) -> Result<usize, CompileError> {
    let tile = storage.tile(texture);
    let tile_count = storage.tile_count();
    if tile >= tile_count {
        return Err(CompileError::TileOutOfRange { tile, tile_count });
    }
    Ok(tile)
}

fn model_positions<const N: usize>(
    mesh: &RawMesh,
    indices: &[u16; N],
) -> Result<[Vec3; N], CompileError> {
    let mut positions = [Vec3::ZERO; N];
    for (position, &index) in positions.iter_mut().zip(indices) {
        let vertex = mesh.vertices.get(index as usize).copied().ok_or(
            CompileError::VertexOutOfRange {
                index: index as usize,
                vertex_count: mesh.vertices.len(),
            },
        )?;
        *position = vertex.to_model();
    }
    Ok(positions)
}

fn add_quad(buffer: &mut TileData, corners: [Vertex; 4], double_sided: bool) {
    let base = buffer.vertices.len() as u32;
    buffer.vertices.extend_from_slice(&corners);
    buffer
        .indices
        .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    if double_sided {
        // Reversed winding reuses the four vertices just appended.
        buffer
            .indices
            .extend_from_slice(&[base + 2, base + 1, base, base, base + 3, base + 2]);
    }
}

fn add_triangle(buffer: &mut TileData, corners: [Vertex; 3], double_sided: bool) {
    let base = buffer.vertices.len() as u32;
    buffer.vertices.extend_from_slice(&corners);
    buffer
        .indices
        .extend_from_slice(&[base, base + 1, base + 2]);
    if double_sided {
        buffer
            .indices
            .extend_from_slice(&[base + 2, base + 1, base]);
    }
}

fn collect_quad(
    out: &mut Vec<TransparentTriangle>,
    positions: &[Vec3; 4],
    uvs: &[Vec2; 4],
    tile: usize,
    mode: TransparencyMode,
    double_sided: bool,
) {
    out.push(TransparentTriangle::new(
        [positions[0], positions[1], positions[2]],
        [uvs[0], uvs[1], uvs[2]],
        tile,
        mode,
    ));
    out.push(TransparentTriangle::new(
        [positions[2], positions[3], positions[0]],
        [uvs[2], uvs[3], uvs[0]],
        tile,
        mode,
    ));
    if double_sided {
        out.push(TransparentTriangle::new(
            [positions[2], positions[1], positions[0]],
            [uvs[2], uvs[1], uvs[0]],
            tile,
            mode,
        ));
        out.push(TransparentTriangle::new(
            [positions[0], positions[3], positions[2]],
            [uvs[0], uvs[3], uvs[2]],
            tile,
            mode,
        ));
    }
}

fn collect_triangle(
    out: &mut Vec<TransparentTriangle>,
    positions: &[Vec3; 3],
    uvs: &[Vec2; 3],
    tile: usize,
    mode: TransparencyMode,
    double_sided: bool,
) {
    out.push(TransparentTriangle::new(*positions, *uvs, tile, mode));
    if double_sided {
        out.push(TransparentTriangle::new(
            [positions[2], positions[1], positions[0]],
            [uvs[2], uvs[1], uvs[0]],
            tile,
            mode,
        ));
    }
}
