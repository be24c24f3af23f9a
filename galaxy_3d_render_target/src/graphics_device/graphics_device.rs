/// GraphicsDevice trait - render target factory interface

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use super::frame_buffer::{Framebuffer, FramebufferDesc};
use super::surface::PresentationSurface;
use super::swapchain::{Swapchain, SwapchainDesc};
use super::texture::{TextureDesc, TextureInfo, TextureKey};

// ============================================================================
// Configuration
// ============================================================================

/// Graphics device configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Validation mode: log every created/disposed render target at DEBUG
    pub enable_validation: bool,
    /// Acquire timeout used by `default_swapchain_desc()`
    pub default_acquire_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "Galaxy3D Application".to_string(),
            enable_validation: cfg!(debug_assertions),
            default_acquire_timeout: Duration::from_secs(1),
        }
    }
}

// ============================================================================
// GraphicsDevice trait
// ============================================================================

/// Factory for textures, framebuffers and swapchains
///
/// Implemented by backend-specific devices. The device owns every texture it
/// creates; framebuffers and swapchains only hold `TextureKey`s into it.
pub trait GraphicsDevice: Send + Sync {
    /// Create a texture
    ///
    /// # Arguments
    ///
    /// * `desc` - Texture descriptor
    /// * `name` - Optional unique debug name
    ///
    /// # Returns
    ///
    /// A non-owning key to the created texture
    fn create_texture(&mut self, desc: TextureDesc, name: Option<&str>) -> Result<TextureKey>;

    /// Destroy a texture
    ///
    /// Framebuffers still referencing it fail validation on creation but are
    /// otherwise unaffected.
    ///
    /// # Errors
    ///
    /// `InvalidResource` if the key is unknown.
    fn destroy_texture(&mut self, key: TextureKey) -> Result<()>;

    /// Properties of a live texture
    fn texture_info(&self, key: TextureKey) -> Option<TextureInfo>;

    /// Validate an attachment set and create a framebuffer from it
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for any malformed attachment set.
    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> Result<Arc<dyn Framebuffer>>;

    /// Create a swapchain presenting to `surface`
    ///
    /// The surface is recreated at the descriptor's extent if it differs.
    fn create_swapchain(
        &mut self,
        desc: SwapchainDesc,
        surface: Box<dyn PresentationSurface>,
    ) -> Result<Box<dyn Swapchain>>;

    fn config(&self) -> &Config;

    /// Default swapchain descriptor at the given extent, using the configured acquire timeout
    fn default_swapchain_desc(&self, width: u32, height: u32) -> SwapchainDesc {
        SwapchainDesc {
            width,
            height,
            acquire_timeout: self.config().default_acquire_timeout,
            ..SwapchainDesc::default()
        }
    }
}
