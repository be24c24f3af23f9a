/// Attachment - one bindable 2D slice of a texture (target, array layer, mip level)

use super::texture::TextureKey;

/// A single texture slice usable as a color, depth or resolve attachment.
///
/// Immutable value type compared by value. The target is a non-owning key:
/// the texture stays owned by the registry that created it, which must
/// outlive every framebuffer referencing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Attachment {
    target: TextureKey,
    array_layer: u32,
    mip_level: u32,
}

impl Attachment {
    /// Attachment on the given layer and mip level of `target`
    pub fn new(target: TextureKey, array_layer: u32, mip_level: u32) -> Self {
        Self { target, array_layer, mip_level }
    }

    /// Attachment on layer 0, mip 0 of `target`
    pub fn from_texture(target: TextureKey) -> Self {
        Self::new(target, 0, 0)
    }

    /// Texture this attachment renders into
    pub fn target(&self) -> TextureKey {
        self.target
    }

    pub fn array_layer(&self) -> u32 {
        self.array_layer
    }

    pub fn mip_level(&self) -> u32 {
        self.mip_level
    }
}

impl From<TextureKey> for Attachment {
    fn from(target: TextureKey) -> Self {
        Self::from_texture(target)
    }
}
