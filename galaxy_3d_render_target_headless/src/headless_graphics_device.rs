/// HeadlessGraphicsDevice - GraphicsDevice implementation without a GPU
///
/// Textures are pure descriptions stored in a shared TextureRegistry.
/// Framebuffers and swapchains go through exactly the same validation as a
/// GPU backend, which makes this device suitable for tests and tools.

use galaxy_3d_render_target::galaxy3d::{GraphicsDevice, Result};
use galaxy_3d_render_target::galaxy3d::render::{
    Config,
    Framebuffer as RendererFramebuffer,
    Swapchain as RendererSwapchain,
    FramebufferDesc, FramebufferTargets, PresentationSurface, SwapchainDesc,
    TextureDesc, TextureInfo, TextureKey, TextureRegistry,
};
use galaxy_3d_render_target::{engine_bail, engine_err, engine_info};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::headless_frame_buffer::Framebuffer;
use crate::headless_swapchain::Swapchain;

const SOURCE: &str = "galaxy3d::headless";

/// Headless graphics device
pub struct HeadlessGraphicsDevice {
    /// Every texture created by this device (shared with its swapchains)
    textures: Arc<RwLock<TextureRegistry>>,
    config: Config,
    /// Used to name framebuffers
    framebuffer_counter: u64,
}

impl HeadlessGraphicsDevice {
    /// Create a new headless device
    pub fn new(config: Config) -> Self {
        engine_info!(SOURCE, "Headless device created for '{}' (validation: {})",
            config.app_name, config.enable_validation);
        Self {
            textures: Arc::new(RwLock::new(TextureRegistry::new())),
            config,
            framebuffer_counter: 0,
        }
    }

    /// Number of live textures (including swapchain images)
    pub fn texture_count(&self) -> usize {
        self.read_textures().map_or(0, |registry| registry.len())
    }

    /// Look a texture up by debug name
    pub fn find_texture(&self, name: &str) -> Option<TextureKey> {
        self.read_textures().ok()?.find(name)
    }

    /// Framebuffer and swapchain creation/disposal is logged at DEBUG
    fn trace_lifecycle(&self) -> bool {
        self.config.enable_validation || cfg!(feature = "trace-lifecycle")
    }

    fn read_textures(&self) -> Result<RwLockReadGuard<'_, TextureRegistry>> {
        self.textures
            .read()
            .map_err(|_| engine_err!(SOURCE, "Texture registry lock poisoned"))
    }

    fn write_textures(&self) -> Result<RwLockWriteGuard<'_, TextureRegistry>> {
        self.textures
            .write()
            .map_err(|_| engine_err!(SOURCE, "Texture registry lock poisoned"))
    }
}

impl Default for HeadlessGraphicsDevice {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl GraphicsDevice for HeadlessGraphicsDevice {
    fn create_texture(&mut self, desc: TextureDesc, name: Option<&str>) -> Result<TextureKey> {
        self.write_textures()?.insert(&desc, name)
    }

    fn destroy_texture(&mut self, key: TextureKey) -> Result<()> {
        if self.write_textures()?.remove(key).is_none() {
            engine_bail!(SOURCE, InvalidResource: "Cannot destroy unknown texture {:?}", key);
        }
        Ok(())
    }

    fn texture_info(&self, key: TextureKey) -> Option<TextureInfo> {
        self.read_textures().ok()?.get(key).cloned()
    }

    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> Result<Arc<dyn RendererFramebuffer>> {
        let targets = FramebufferTargets::new(desc, &*self.read_textures()?)?;
        self.framebuffer_counter += 1;
        let name = format!("Framebuffer#{}", self.framebuffer_counter);
        Ok(Arc::new(Framebuffer::new(targets, name, self.trace_lifecycle())))
    }

    fn create_swapchain(
        &mut self,
        desc: SwapchainDesc,
        surface: Box<dyn PresentationSurface>,
    ) -> Result<Box<dyn RendererSwapchain>> {
        let swapchain = Swapchain::new(desc, surface, self.textures.clone(), self.trace_lifecycle())?;
        Ok(Box::new(swapchain))
    }

    fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
#[path = "headless_graphics_device_tests.rs"]
mod tests;
