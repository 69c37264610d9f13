use glam::{Vec2, Vec3};

/// How a transparent face should be blended by the rendering pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransparencyMode {
    /// Standard alpha blending.
    Alpha,
    /// Additive blending, used for light shafts and similar effects.
    Additive,
}

/// Maps a texture attribute value to a blend mode. Attribute 0 means opaque
/// and never reaches this function; the classifier filters it out first.
pub fn attribute_to_transparency(attribute: u16) -> TransparencyMode {
    match attribute {
        2 => TransparencyMode::Additive,
        _ => TransparencyMode::Alpha,
    }
}

/// A triangle held out of the opaque buffers for a later sorting and
/// blending pass. Never written to any vertex or index buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransparentTriangle {
    pub positions: [Vec3; 3],
    pub uvs: [Vec2; 3],
    pub tile: usize,
    pub mode: TransparencyMode,
}

impl TransparentTriangle {
    pub fn new(positions: [Vec3; 3], uvs: [Vec2; 3], tile: usize, mode: TransparencyMode) -> Self {
        Self {
            positions,
            uvs,
            tile,
            mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_two_is_additive() {
        assert_eq!(attribute_to_transparency(2), TransparencyMode::Additive);
    }

    #[test]
    fn other_attributes_are_alpha() {
        assert_eq!(attribute_to_transparency(1), TransparencyMode::Alpha);
        assert_eq!(attribute_to_transparency(3), TransparencyMode::Alpha);
        assert_eq!(attribute_to_transparency(u16::MAX), TransparencyMode::Alpha);
    }
}
