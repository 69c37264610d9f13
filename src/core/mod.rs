//! Core data structures for mesh compilation.
//! Contains the raw level-format mesh types, the render vertex, and the
//! transparency attribute mapping.

pub mod raw;
pub mod transparency;
pub mod vertex;

// Re-export commonly used types
pub use raw::{FixedVertex, Quad, RawMesh, TextureRef, Triangle};
pub use transparency::{TransparencyMode, TransparentTriangle, attribute_to_transparency};
pub use vertex::Vertex;
