use glam::{Vec2, Vec4};

/// Capabilities the compiler needs from the level's texture atlas storage.
///
/// Any asset backend can implement this; the compiler never sees the
/// concrete storage type. The `bindable_*` methods are used only by draw
/// submission, never during compilation.
pub trait TextureStorage {
    /// Number of atlas tiles. Sizes the per-tile buffer table.
    fn tile_count(&self) -> usize;

    /// Atlas tile holding the given texture.
    fn tile(&self, texture: u16) -> usize;

    /// Normalized atlas coordinate for one corner (0..=3) of a texture.
    fn uv(&self, texture: u16, corner: usize) -> Vec2;

    /// Per-texture attribute; 0 is opaque, anything else selects a blend mode.
    fn attribute(&self, texture: u16) -> u16;

    /// Flat colour for untextured faces, keyed by the face's texture field.
    fn palette_colour(&self, texture: u16) -> Vec4;

    /// Bind group for a tile's texture.
    fn bindable_resource(&self, tile: usize) -> &wgpu::BindGroup;

    /// Bind group used for untextured geometry.
    fn bindable_resource_untextured(&self) -> &wgpu::BindGroup;
}
