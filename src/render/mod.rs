//! Mesh compilation and draw submission.

pub mod builder;
pub mod mesh;
pub mod storage;

// Re-export commonly used types
pub use builder::{MeshData, TileData};
pub use mesh::{CompiledGeometry, compile};
pub use storage::TextureStorage;
