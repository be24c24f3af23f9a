/// Texture capability types: formats, sample counts, usage flags and the
/// read-only texture properties that attachments resolve against.

use bitflags::bitflags;
use glam::UVec3;
use slotmap::new_key_type;

new_key_type! {
    /// Non-owning handle to a texture registered with a graphics device.
    ///
    /// Attachments store this key instead of the texture itself; the texture
    /// lifetime stays with the device registry that created it.
    pub struct TextureKey;
}

/// Pixel format of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    // Color formats
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    B8G8R8A8_UNORM,
    B8G8R8A8_SRGB,
    R16G16B16A16_SFLOAT,
    R32G32B32A32_SFLOAT,
    R32_SFLOAT,

    // Depth/stencil formats
    D16_UNORM,
    D32_FLOAT,
    D24_UNORM_S8_UINT,
    D32_FLOAT_S8_UINT,
}

impl TextureFormat {
    /// Returns true for depth and depth/stencil formats
    pub fn is_depth_stencil(&self) -> bool {
        matches!(
            self,
            TextureFormat::D16_UNORM
                | TextureFormat::D32_FLOAT
                | TextureFormat::D24_UNORM_S8_UINT
                | TextureFormat::D32_FLOAT_S8_UINT
        )
    }

    /// Returns true if the format carries a stencil aspect
    pub fn has_stencil(&self) -> bool {
        matches!(self, TextureFormat::D24_UNORM_S8_UINT | TextureFormat::D32_FLOAT_S8_UINT)
    }

    /// Returns true for sRGB color formats
    pub fn is_srgb(&self) -> bool {
        matches!(self, TextureFormat::R8G8B8A8_SRGB | TextureFormat::B8G8R8A8_SRGB)
    }

    /// Size of one texel in bytes
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            TextureFormat::R8G8B8A8_UNORM
            | TextureFormat::R8G8B8A8_SRGB
            | TextureFormat::B8G8R8A8_UNORM
            | TextureFormat::B8G8R8A8_SRGB => 4,
            TextureFormat::R16G16B16A16_SFLOAT => 8,
            TextureFormat::R32G32B32A32_SFLOAT => 16,
            TextureFormat::R32_SFLOAT => 4,
            TextureFormat::D16_UNORM => 2,
            TextureFormat::D32_FLOAT => 4,
            TextureFormat::D24_UNORM_S8_UINT => 4,
            // 32-bit depth + 8-bit stencil, padded
            TextureFormat::D32_FLOAT_S8_UINT => 8,
        }
    }
}

/// Number of samples per texel (MSAA)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum SampleCount {
    #[default]
    Count1,
    Count2,
    Count4,
    Count8,
    Count16,
    Count32,
}

impl SampleCount {
    /// Number of samples as an integer
    pub fn samples(&self) -> u32 {
        match self {
            SampleCount::Count1 => 1,
            SampleCount::Count2 => 2,
            SampleCount::Count4 => 4,
            SampleCount::Count8 => 8,
            SampleCount::Count16 => 16,
            SampleCount::Count32 => 32,
        }
    }

    /// Convert from an integer sample count (must be a power of two up to 32)
    pub fn from_samples(samples: u32) -> Option<Self> {
        match samples {
            1 => Some(SampleCount::Count1),
            2 => Some(SampleCount::Count2),
            4 => Some(SampleCount::Count4),
            8 => Some(SampleCount::Count8),
            16 => Some(SampleCount::Count16),
            32 => Some(SampleCount::Count32),
            _ => None,
        }
    }

    /// Returns true for more than one sample
    pub fn is_multisampled(&self) -> bool {
        *self != SampleCount::Count1
    }
}

bitflags! {
    /// Texture usage flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextureUsage: u32 {
        /// Texture can be sampled in shaders
        const SAMPLED = 1 << 0;
        /// Texture can be used as a storage image
        const STORAGE = 1 << 1;
        /// Texture can be used as a color or resolve attachment
        const RENDER_TARGET = 1 << 2;
        /// Texture can be used as a depth/stencil attachment
        const DEPTH_STENCIL = 1 << 3;
        /// Texture is a presentable swapchain image
        const PRESENT = 1 << 4;
    }
}

/// Mip-adjusted size of a texture: each dimension is halved per level,
/// floored at 1.
pub fn mip_dimensions(width: u32, height: u32, depth: u32, mip_level: u32) -> UVec3 {
    let shrink = |size: u32| size.checked_shr(mip_level).unwrap_or(0).max(1);
    UVec3::new(shrink(width), shrink(height), shrink(depth))
}

/// Length of the full mip chain for the given base size
pub fn max_mip_levels(width: u32, height: u32, depth: u32) -> u32 {
    let largest = width.max(height).max(depth).max(1);
    32 - largest.leading_zeros()
}

// ===== TEXTURE DESC =====

/// Descriptor for creating a texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Depth in pixels (1 for 2D textures)
    pub depth: u32,
    /// Number of mip levels
    pub mip_levels: u32,
    /// Number of array layers (1 = simple 2D texture, >1 = texture array)
    pub array_layers: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Usage flags
    pub usage: TextureUsage,
    /// Samples per texel
    pub sample_count: SampleCount,
}

impl TextureDesc {
    /// Single-level, single-layer, single-sampled 2D texture
    pub fn new_2d(width: u32, height: u32, format: TextureFormat, usage: TextureUsage) -> Self {
        Self {
            width,
            height,
            depth: 1,
            mip_levels: 1,
            array_layers: 1,
            format,
            usage,
            sample_count: SampleCount::Count1,
        }
    }

    pub fn with_mip_levels(mut self, mip_levels: u32) -> Self {
        self.mip_levels = mip_levels;
        self
    }

    pub fn with_array_layers(mut self, array_layers: u32) -> Self {
        self.array_layers = array_layers;
        self
    }

    pub fn with_sample_count(mut self, sample_count: SampleCount) -> Self {
        self.sample_count = sample_count;
        self
    }
}

// ===== TEXTURE INFO =====

/// Read-only properties of a created texture.
///
/// Returned by `TextureSource::texture_info()` so the render target layer can
/// query sizes and formats without touching backend-specific details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Depth in pixels
    pub depth: u32,
    /// Number of mip levels
    pub mip_levels: u32,
    /// Number of array layers
    pub array_layers: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Usage flags
    pub usage: TextureUsage,
    /// Samples per texel
    pub sample_count: SampleCount,
}

impl TextureInfo {
    /// Returns true if this texture is a texture array (array_layers > 1)
    pub fn is_array(&self) -> bool {
        self.array_layers > 1
    }

    /// Size of the given mip level
    pub fn mip_dimensions(&self, mip_level: u32) -> UVec3 {
        mip_dimensions(self.width, self.height, self.depth, mip_level)
    }
}

impl From<&TextureDesc> for TextureInfo {
    fn from(desc: &TextureDesc) -> Self {
        Self {
            width: desc.width,
            height: desc.height,
            depth: desc.depth,
            mip_levels: desc.mip_levels,
            array_layers: desc.array_layers,
            format: desc.format,
            usage: desc.usage,
            sample_count: desc.sample_count,
        }
    }
}

// ===== TEXTURE SOURCE =====

/// Texture capability consumed by framebuffer construction
///
/// Implemented by whatever owns the textures (typically a device's
/// `TextureRegistry`). Framebuffers only ever look textures up through it.
pub trait TextureSource {
    /// Properties of the texture behind `key`, or None if it does not exist
    fn texture_info(&self, key: TextureKey) -> Option<&TextureInfo>;
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
