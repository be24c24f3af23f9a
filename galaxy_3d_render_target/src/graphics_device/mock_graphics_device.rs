/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Implements every graphics_device trait on top of a plain TextureRegistry so
/// the trait contracts and their provided methods can be tested without a
/// backend crate.

#[cfg(test)]
use std::sync::{Arc, Mutex};
#[cfg(test)]
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(test)]
use std::time::Duration;

#[cfg(test)]
use crate::graphics_device::{
    GraphicsDevice, Framebuffer, Swapchain, PresentationSurface, Config,
    FramebufferDesc, FramebufferTargets, SwapchainDesc, SwapchainState,
    TextureDesc, TextureInfo, TextureKey, TextureRegistry, TextureSource,
    TextureUsage, Attachment,
};
#[cfg(test)]
use crate::error::Result;
#[cfg(test)]
use crate::{engine_bail, engine_err};

// ============================================================================
// Mock Framebuffer
// ============================================================================

#[cfg(test)]
pub struct MockFramebuffer {
    pub targets: FramebufferTargets,
    pub name: Mutex<String>,
    pub disposed: AtomicBool,
    /// Number of times dispose() actually released something
    pub dispose_count: Mutex<u32>,
}

#[cfg(test)]
impl MockFramebuffer {
    pub fn new(targets: FramebufferTargets, name: &str) -> Self {
        Self {
            targets,
            name: Mutex::new(name.to_string()),
            disposed: AtomicBool::new(false),
            dispose_count: Mutex::new(0),
        }
    }
}

#[cfg(test)]
impl Framebuffer for MockFramebuffer {
    fn targets(&self) -> &FramebufferTargets {
        &self.targets
    }

    fn name(&self) -> String {
        self.name.lock().unwrap().clone()
    }

    fn set_name(&self, name: &str) {
        *self.name.lock().unwrap() = name.to_string();
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::AcqRel) {
            *self.dispose_count.lock().unwrap() += 1;
        }
    }
}

// ============================================================================
// Mock Surface
// ============================================================================

/// Observable state of a MockSurface, shared with the test after the surface is boxed
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockSurfaceLog {
    /// (image, sync_to_vertical_blank) per present
    pub presents: Vec<(u32, bool)>,
    /// Extents passed to recreate()
    pub recreates: Vec<(u32, u32)>,
    /// Timeout passed to the last acquire
    pub last_timeout: Option<Duration>,
    /// Next acquire fails with AcquireTimeout
    pub starve: bool,
    /// Every operation fails with SurfaceLost
    pub lost: bool,
}

/// Round-robin surface: acquire returns 0, 1, ..., image_count - 1, 0, ...
#[cfg(test)]
pub struct MockSurface {
    pub width: u32,
    pub height: u32,
    pub image_count: u32,
    next_image: u32,
    pub log: Arc<Mutex<MockSurfaceLog>>,
}

#[cfg(test)]
impl MockSurface {
    pub fn new(width: u32, height: u32, image_count: u32) -> Self {
        Self {
            width,
            height,
            image_count,
            next_image: 0,
            log: Arc::new(Mutex::new(MockSurfaceLog::default())),
        }
    }

    fn check_lost(&self) -> Result<()> {
        if self.log.lock().unwrap().lost {
            engine_bail!("galaxy3d::MockSurface", SurfaceLost: "Mock surface lost");
        }
        Ok(())
    }
}

#[cfg(test)]
impl PresentationSurface for MockSurface {
    fn acquire_next_image(&mut self, timeout: Duration) -> Result<u32> {
        self.check_lost()?;
        let mut log = self.log.lock().unwrap();
        log.last_timeout = Some(timeout);
        if log.starve {
            return Err(crate::error::Error::AcquireTimeout {
                timeout_ms: timeout.as_millis() as u64,
            });
        }
        let image = self.next_image;
        self.next_image = (self.next_image + 1) % self.image_count;
        Ok(image)
    }

    fn present(&mut self, image_index: u32, sync_to_vertical_blank: bool) -> Result<()> {
        self.check_lost()?;
        self.log.lock().unwrap().presents.push((image_index, sync_to_vertical_blank));
        Ok(())
    }

    fn recreate(&mut self, width: u32, height: u32) -> Result<()> {
        self.check_lost()?;
        self.log.lock().unwrap().recreates.push((width, height));
        self.width = width;
        self.height = height;
        self.next_image = 0;
        Ok(())
    }

    fn extent(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn image_count(&self) -> u32 {
        self.image_count
    }
}

// ============================================================================
// Mock Swapchain
// ============================================================================

/// Swapchain keeping its per-image textures in a private registry
#[cfg(test)]
pub struct MockSwapchain {
    desc: SwapchainDesc,
    surface: Box<dyn PresentationSurface>,
    textures: TextureRegistry,
    framebuffers: Vec<Arc<dyn Framebuffer>>,
    last_acquired_image: u32,
    state: SwapchainState,
}

#[cfg(test)]
impl MockSwapchain {
    pub fn new(desc: SwapchainDesc, mut surface: Box<dyn PresentationSurface>) -> Result<Self> {
        desc.validate()?;
        if surface.extent() != (desc.width, desc.height) {
            surface.recreate(desc.width, desc.height)?;
        }
        let mut swapchain = Self {
            desc,
            surface,
            textures: TextureRegistry::new(),
            framebuffers: Vec::new(),
            last_acquired_image: 0,
            state: SwapchainState::Created,
        };
        swapchain.build_framebuffers()?;
        Ok(swapchain)
    }

    /// Textures backing the framebuffers
    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    fn build_framebuffers(&mut self) -> Result<()> {
        self.release_framebuffers();
        let (width, height) = self.surface.extent();
        for image in 0..self.surface.image_count() {
            let color_desc = TextureDesc::new_2d(width, height, self.desc.color_format,
                TextureUsage::RENDER_TARGET | TextureUsage::PRESENT);
            let color = self.textures.insert(&color_desc, None)?;
            let depth = match self.desc.depth_format {
                Some(format) => {
                    let depth_desc = TextureDesc::new_2d(width, height, format, TextureUsage::DEPTH_STENCIL);
                    Some(Attachment::from_texture(self.textures.insert(&depth_desc, None)?))
                }
                None => None,
            };
            let fb_desc = FramebufferDesc::new(depth, vec![Attachment::from_texture(color)]);
            let targets = FramebufferTargets::new(&fb_desc, &self.textures)?;
            let name = format!("{}[{}]", self.desc.name, image);
            self.framebuffers.push(Arc::new(MockFramebuffer::new(targets, &name)));
        }
        Ok(())
    }

    fn release_framebuffers(&mut self) {
        for fb in self.framebuffers.drain(..) {
            fb.dispose();
            let keys: Vec<TextureKey> = fb.targets().attachments().map(|a| a.target()).collect();
            for key in keys {
                self.textures.remove(key);
            }
        }
    }
}

#[cfg(test)]
impl Swapchain for MockSwapchain {
    fn framebuffers(&self) -> &[Arc<dyn Framebuffer>] {
        &self.framebuffers
    }

    fn last_acquired_image(&self) -> u32 {
        self.last_acquired_image
    }

    fn state(&self) -> SwapchainState {
        self.state
    }

    fn acquire_next_image(&mut self) -> Result<u32> {
        self.state.ensure_live("acquire an image")?;
        if let Some(image) = self.state.acquired_image() {
            return Err(engine_err!("galaxy3d::MockSwapchain", InvalidOperation:
                "Image {} is still acquired", image));
        }
        let image = self.surface.acquire_next_image(self.desc.acquire_timeout)?;
        self.state.acquire(image, self.framebuffers.len() as u32)?;
        self.last_acquired_image = image;
        Ok(image)
    }

    fn present(&mut self) -> Result<()> {
        self.state.ensure_live("present")?;
        let Some(image) = self.state.acquired_image() else {
            engine_bail!("galaxy3d::MockSwapchain", InvalidOperation: "No image acquired");
        };
        self.surface.present(image, self.desc.sync_to_vertical_blank)?;
        self.state.present()?;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.state.ensure_live("resize")?;
        if width == 0 || height == 0 {
            engine_bail!("galaxy3d::MockSwapchain", InvalidConfiguration:
                "Resize to {}x{}", width, height);
        }
        if self.surface.extent() != (width, height) {
            self.surface.recreate(width, height)?;
            self.build_framebuffers()?;
        }
        self.desc.width = width;
        self.desc.height = height;
        self.last_acquired_image = 0;
        self.state.reset()
    }

    fn sync_to_vertical_blank(&self) -> bool {
        self.desc.sync_to_vertical_blank
    }

    fn set_sync_to_vertical_blank(&mut self, enabled: bool) -> Result<()> {
        self.state.ensure_live("change vertical sync")?;
        self.desc.sync_to_vertical_blank = enabled;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.desc.name
    }

    fn set_name(&mut self, name: &str) {
        self.desc.name = name.to_string();
    }

    fn is_disposed(&self) -> bool {
        !self.state.is_live()
    }

    fn dispose(&mut self) {
        if self.state.dispose() {
            self.release_framebuffers();
        }
    }
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

#[cfg(test)]
pub struct MockGraphicsDevice {
    pub textures: TextureRegistry,
    pub config: Config,
}

#[cfg(test)]
impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self {
            textures: TextureRegistry::new(),
            config: Config::default(),
        }
    }
}

#[cfg(test)]
impl GraphicsDevice for MockGraphicsDevice {
    fn create_texture(&mut self, desc: TextureDesc, name: Option<&str>) -> Result<TextureKey> {
        self.textures.insert(&desc, name)
    }

    fn destroy_texture(&mut self, key: TextureKey) -> Result<()> {
        match self.textures.remove(key) {
            Some(_) => Ok(()),
            None => Err(engine_err!("galaxy3d::MockGraphicsDevice", InvalidResource:
                "Unknown texture {:?}", key)),
        }
    }

    fn texture_info(&self, key: TextureKey) -> Option<TextureInfo> {
        TextureSource::texture_info(&self.textures, key).cloned()
    }

    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> Result<Arc<dyn Framebuffer>> {
        let targets = FramebufferTargets::new(desc, &self.textures)?;
        Ok(Arc::new(MockFramebuffer::new(targets, "mock_framebuffer")))
    }

    fn create_swapchain(
        &mut self,
        desc: SwapchainDesc,
        surface: Box<dyn PresentationSurface>,
    ) -> Result<Box<dyn Swapchain>> {
        Ok(Box::new(MockSwapchain::new(desc, surface)?))
    }

    fn config(&self) -> &Config {
        &self.config
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
