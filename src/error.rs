use thiserror::Error;

/// Contract violations in the input data. Compilation rejects the whole mesh
/// rather than indexing out of bounds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("texture reference resolves to tile {tile} but the atlas declares {tile_count} tiles")]
    TileOutOfRange { tile: usize, tile_count: usize },

    #[error("face references vertex {index} but the mesh has {vertex_count} vertices")]
    VertexOutOfRange { index: usize, vertex_count: usize },
}
