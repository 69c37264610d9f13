use glam::Vec3;

/// Scale factor between the level format's integer coordinates and model space.
pub const COORDINATE_SCALE: f32 = 1024.0;

/// A vertex as it appears in the level data: integer coordinates scaled by 1024.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedVertex {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl FixedVertex {
    pub fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Converts to model space. The level format is Y-down, so the vertical
    /// axis is flipped here.
    pub fn to_model(self) -> Vec3 {
        Vec3::new(
            self.x as f32 / COORDINATE_SCALE,
            -self.y as f32 / COORDINATE_SCALE,
            self.z as f32 / COORDINATE_SCALE,
        )
    }
}

/// A decoded 16-bit texture reference: the low 15 bits select the texture,
/// the top bit marks the face as double-sided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureRef {
    pub texture: u16,
    pub double_sided: bool,
}

impl TextureRef {
    pub fn decode(raw: u16) -> Self {
        Self {
            texture: raw & 0x7fff,
            double_sided: raw & 0x8000 != 0,
        }
    }
}

/// A four-vertex face referencing entries in the mesh vertex list.
#[derive(Debug, Clone, Copy)]
pub struct Quad {
    pub vertices: [u16; 4],
    pub texture: u16,
}

/// A three-vertex face referencing entries in the mesh vertex list.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub vertices: [u16; 3],
    pub texture: u16,
}

/// A mesh as produced by the level-file parser, before compilation.
///
/// Textured faces carry atlas texture references; coloured faces reuse the
/// texture field as a palette key.
#[derive(Debug, Clone, Default)]
pub struct RawMesh {
    pub vertices: Vec<FixedVertex>,
    pub textured_quads: Vec<Quad>,
    pub textured_triangles: Vec<Triangle>,
    pub coloured_quads: Vec<Quad>,
    pub coloured_triangles: Vec<Triangle>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_model_scales_and_flips_y() {
        let v = FixedVertex::new(1024, 2048, -1024);
        let model = v.to_model();
        assert!((model.x - 1.0).abs() < f32::EPSILON);
        assert!((model.y - -2.0).abs() < f32::EPSILON);
        assert!((model.z - -1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn decode_splits_texture_and_flag() {
        let single = TextureRef::decode(0x0005);
        assert_eq!(single.texture, 5);
        assert!(!single.double_sided);

        let double = TextureRef::decode(0x8005);
        assert_eq!(double.texture, 5);
        assert!(double.double_sided);

        let max = TextureRef::decode(0xffff);
        assert_eq!(max.texture, 0x7fff);
        assert!(max.double_sided);
    }
}
