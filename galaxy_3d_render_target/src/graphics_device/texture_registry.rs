/// Device-owned texture registry.
///
/// Stores the properties of every texture a device created, keyed by
/// `TextureKey`. Uses a SlotMap so keys stay stable across removals and
/// stale keys resolve to None instead of aliasing a newer texture.

use slotmap::SlotMap;
use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::engine_bail;
use super::texture::{
    max_mip_levels, TextureDesc, TextureInfo, TextureKey, TextureSource, TextureUsage,
};

/// Texture registry owned by a graphics device
pub struct TextureRegistry {
    textures: SlotMap<TextureKey, TextureInfo>,
    /// Optional debug names (unique)
    names: FxHashMap<String, TextureKey>,
    /// Reverse lookup for `remove()`
    key_names: FxHashMap<TextureKey, String>,
}

impl TextureRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            textures: SlotMap::with_key(),
            names: FxHashMap::default(),
            key_names: FxHashMap::default(),
        }
    }

    /// Validate a texture descriptor
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for zero extents or layer counts, a mip
    /// count outside the mip chain, multisampled textures with mips, or
    /// depth formats without `DEPTH_STENCIL` usage (and vice versa).
    pub fn validate_desc(desc: &TextureDesc) -> Result<()> {
        if desc.width == 0 || desc.height == 0 || desc.depth == 0 {
            engine_bail!("galaxy3d::TextureRegistry", InvalidConfiguration:
                "Texture extent must be non-zero (got {}x{}x{})",
                desc.width, desc.height, desc.depth);
        }

        if desc.array_layers == 0 {
            engine_bail!("galaxy3d::TextureRegistry", InvalidConfiguration:
                "Texture must have at least one array layer");
        }

        let max_mips = max_mip_levels(desc.width, desc.height, desc.depth);
        if desc.mip_levels == 0 || desc.mip_levels > max_mips {
            engine_bail!("galaxy3d::TextureRegistry", InvalidConfiguration:
                "Texture mip count {} out of range 1..={} for {}x{}x{}",
                desc.mip_levels, max_mips, desc.width, desc.height, desc.depth);
        }

        if desc.sample_count.is_multisampled() && desc.mip_levels != 1 {
            engine_bail!("galaxy3d::TextureRegistry", InvalidConfiguration:
                "Multisampled textures must have exactly one mip level (got {})",
                desc.mip_levels);
        }

        let is_depth_format = desc.format.is_depth_stencil();
        let has_depth_usage = desc.usage.contains(TextureUsage::DEPTH_STENCIL);
        if is_depth_format != has_depth_usage {
            engine_bail!("galaxy3d::TextureRegistry", InvalidConfiguration:
                "Format {:?} is incompatible with usage {:?}", desc.format, desc.usage);
        }

        Ok(())
    }

    /// Register a new texture
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the descriptor is invalid or the
    /// name is already taken.
    pub fn insert(&mut self, desc: &TextureDesc, name: Option<&str>) -> Result<TextureKey> {
        Self::validate_desc(desc)?;

        if let Some(name) = name {
            if self.names.contains_key(name) {
                engine_bail!("galaxy3d::TextureRegistry", InvalidConfiguration:
                    "Texture '{}' already exists", name);
            }
        }

        let key = self.textures.insert(TextureInfo::from(desc));
        if let Some(name) = name {
            self.names.insert(name.to_string(), key);
            self.key_names.insert(key, name.to_string());
        }
        Ok(key)
    }

    /// Remove a texture, returning its properties if it existed
    pub fn remove(&mut self, key: TextureKey) -> Option<TextureInfo> {
        let info = self.textures.remove(key)?;
        if let Some(name) = self.key_names.remove(&key) {
            self.names.remove(&name);
        }
        Some(info)
    }

    /// Get the properties of a texture
    pub fn get(&self, key: TextureKey) -> Option<&TextureInfo> {
        self.textures.get(key)
    }

    /// Look a texture up by debug name
    pub fn find(&self, name: &str) -> Option<TextureKey> {
        self.names.get(name).copied()
    }

    /// Debug name of a texture, if it was given one
    pub fn name(&self, key: TextureKey) -> Option<&str> {
        self.key_names.get(&key).map(|n| n.as_str())
    }

    pub fn contains(&self, key: TextureKey) -> bool {
        self.textures.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl Default for TextureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureSource for TextureRegistry {
    fn texture_info(&self, key: TextureKey) -> Option<&TextureInfo> {
        self.textures.get(key)
    }
}

#[cfg(test)]
#[path = "texture_registry_tests.rs"]
mod tests;
