/// Swapchain - headless implementation of the Swapchain trait
///
/// Creates one color texture (plus an optional depth texture) per surface
/// image in the device's texture registry and wraps each set in a
/// framebuffer. Resize destroys and recreates those textures and
/// framebuffers in place.

use galaxy_3d_render_target::galaxy3d::Result;
use galaxy_3d_render_target::galaxy3d::render::{
    Swapchain as RendererSwapchain,
    Framebuffer as RendererFramebuffer,
    PresentationSurface,
    Attachment, FramebufferDesc, FramebufferTargets, SwapchainDesc, SwapchainState,
    TextureDesc, TextureKey, TextureRegistry, TextureUsage,
};
use galaxy_3d_render_target::{engine_bail, engine_debug, engine_err, engine_trace, engine_warn};
use std::sync::{Arc, RwLock};

use crate::headless_frame_buffer::Framebuffer;

const SOURCE: &str = "galaxy3d::headless::Swapchain";

/// Headless swapchain implementation
pub struct Swapchain {
    /// Name, formats, vertical sync and acquire timeout
    desc: SwapchainDesc,
    surface: Box<dyn PresentationSurface>,
    /// Device texture registry (per-image textures live here)
    textures: Arc<RwLock<TextureRegistry>>,
    framebuffers: Vec<Arc<dyn RendererFramebuffer>>,
    last_acquired_image: u32,
    state: SwapchainState,
    trace_lifecycle: bool,
}

impl Swapchain {
    /// Create a swapchain on `surface`
    ///
    /// The surface is recreated when its extent differs from the descriptor.
    /// The surface decides the image count; a different `buffer_count` is
    /// only warned about.
    pub(crate) fn new(
        desc: SwapchainDesc,
        mut surface: Box<dyn PresentationSurface>,
        textures: Arc<RwLock<TextureRegistry>>,
        trace_lifecycle: bool,
    ) -> Result<Self> {
        desc.validate()?;

        if surface.extent() != (desc.width, desc.height) {
            surface.recreate(desc.width, desc.height)?;
        }
        if surface.image_count() != desc.buffer_count {
            engine_warn!(SOURCE,
                "Swapchain '{}' requested {} images, surface provides {}",
                desc.name, desc.buffer_count, surface.image_count());
        }

        let framebuffers = Self::create_framebuffers(&desc, surface.as_ref(), &textures, trace_lifecycle)?;
        let swapchain = Self {
            desc,
            surface,
            textures,
            framebuffers,
            last_acquired_image: 0,
            state: SwapchainState::Created,
            trace_lifecycle,
        };

        if swapchain.trace_lifecycle {
            engine_debug!(SOURCE, "Created swapchain '{}' ({}x{}, {} images)",
                swapchain.desc.name, swapchain.width(), swapchain.height(), swapchain.framebuffers.len());
        }
        Ok(swapchain)
    }

    /// Create per-image textures and framebuffers at the surface extent
    ///
    /// Either every image gets its framebuffer or nothing is left in the
    /// registry.
    fn create_framebuffers(
        desc: &SwapchainDesc,
        surface: &dyn PresentationSurface,
        textures: &RwLock<TextureRegistry>,
        trace_lifecycle: bool,
    ) -> Result<Vec<Arc<dyn RendererFramebuffer>>> {
        let extent = surface.extent();
        let image_count = surface.image_count();
        if image_count == 0 {
            engine_bail!(SOURCE, SurfaceLost:
                "Swapchain '{}' surface provides no presentable images", desc.name);
        }

        let mut registry = textures
            .write()
            .map_err(|_| engine_err!(SOURCE, "Texture registry lock poisoned"))?;
        let mut created = Vec::new();
        let mut framebuffers: Vec<Arc<dyn RendererFramebuffer>> = Vec::with_capacity(image_count as usize);

        for image in 0..image_count {
            match Self::create_image_framebuffer(desc, image, extent, &mut registry, &mut created, trace_lifecycle) {
                Ok(framebuffer) => framebuffers.push(framebuffer),
                Err(error) => {
                    for framebuffer in &framebuffers {
                        framebuffer.dispose();
                    }
                    for key in created {
                        registry.remove(key);
                    }
                    return Err(error);
                }
            }
        }

        Ok(framebuffers)
    }

    fn create_image_framebuffer(
        desc: &SwapchainDesc,
        image: u32,
        (width, height): (u32, u32),
        registry: &mut TextureRegistry,
        created: &mut Vec<TextureKey>,
        trace_lifecycle: bool,
    ) -> Result<Arc<dyn RendererFramebuffer>> {
        let color_desc = TextureDesc::new_2d(
            width, height, desc.color_format,
            TextureUsage::RENDER_TARGET | TextureUsage::PRESENT,
        );
        let color = registry.insert(&color_desc, None)?;
        created.push(color);

        let depth = match desc.depth_format {
            Some(format) => {
                let depth_desc = TextureDesc::new_2d(width, height, format, TextureUsage::DEPTH_STENCIL);
                let key = registry.insert(&depth_desc, None)?;
                created.push(key);
                Some(Attachment::from_texture(key))
            }
            None => None,
        };

        let targets = FramebufferTargets::new(
            &FramebufferDesc::new(depth, vec![Attachment::from_texture(color)]),
            &*registry,
        )?;
        let name = format!("{}[{}]", desc.name, image);
        Ok(Arc::new(Framebuffer::new(targets, name, trace_lifecycle)))
    }

    /// Dispose framebuffers and destroy their textures
    fn release_framebuffers(&mut self) {
        let mut registry = match self.textures.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        for framebuffer in self.framebuffers.drain(..) {
            framebuffer.dispose();
            for attachment in framebuffer.targets().attachments() {
                registry.remove(attachment.target());
            }
        }
    }
}

impl RendererSwapchain for Swapchain {
    fn framebuffers(&self) -> &[Arc<dyn RendererFramebuffer>] {
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
            engine_bail!(SOURCE, InvalidOperation:
                "Swapchain '{}' image {} is still acquired, present it first", self.desc.name, image);
        }

        let image = self.surface.acquire_next_image(self.desc.acquire_timeout)?;
        if let Err(error) = self.state.acquire(image, self.framebuffers.len() as u32) {
            // Hand the image back, the surface would keep it acquired otherwise
            if let Err(present_error) = self.surface.present(image, self.desc.sync_to_vertical_blank) {
                engine_warn!(SOURCE, "Swapchain '{}' could not return surface image {}: {}",
                    self.desc.name, image, present_error);
            }
            return Err(error);
        }
        self.last_acquired_image = image;
        engine_trace!(SOURCE, "Swapchain '{}' acquired image {}", self.desc.name, image);
        Ok(image)
    }

    fn present(&mut self) -> Result<()> {
        self.state.ensure_live("present")?;
        let Some(image) = self.state.acquired_image() else {
            engine_bail!(SOURCE, InvalidOperation:
                "Swapchain '{}' has no acquired image to present", self.desc.name);
        };

        self.surface.present(image, self.desc.sync_to_vertical_blank)?;
        self.state.present()?;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.state.ensure_live("resize")?;
        if width == 0 || height == 0 {
            engine_bail!(SOURCE, InvalidConfiguration:
                "Swapchain '{}' cannot be resized to {}x{}", self.desc.name, width, height);
        }

        if self.surface.extent() != (width, height) || self.width() != width || self.height() != height {
            self.surface.recreate(width, height)?;
            // Recreating the surface dropped any acquired image
            self.last_acquired_image = 0;
            self.state.reset()?;

            let framebuffers = Self::create_framebuffers(
                &self.desc, self.surface.as_ref(), &self.textures, self.trace_lifecycle)?;
            self.release_framebuffers();
            self.framebuffers = framebuffers;
            if self.trace_lifecycle {
                engine_debug!(SOURCE, "Resized swapchain '{}' to {}x{}", self.desc.name, width, height);
            }
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
        if !self.state.dispose() {
            return;
        }
        self.release_framebuffers();
        if self.trace_lifecycle {
            engine_debug!(SOURCE, "Disposed swapchain '{}'", self.desc.name);
        }
    }
}

impl Drop for Swapchain {
    fn drop(&mut self) {
        RendererSwapchain::dispose(self);
    }
}

#[cfg(test)]
#[path = "headless_swapchain_tests.rs"]
mod tests;
