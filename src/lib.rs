// Core module with fundamental types
pub mod core;

// Render module with mesh compilation and draw submission
pub mod render;

// Error types for compilation contract checks
pub mod error;

// Re-exports
pub use crate::core::{
    FixedVertex, Quad, RawMesh, TextureRef, TransparencyMode, TransparentTriangle, Triangle,
    Vertex, attribute_to_transparency,
};
pub use error::CompileError;
pub use render::{CompiledGeometry, MeshData, TextureStorage, TileData, compile};
