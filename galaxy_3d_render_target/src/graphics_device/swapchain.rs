/// Swapchain - rotating set of framebuffers backing a presentation surface
///
/// One framebuffer per surface image. The rendering thread acquires an image,
/// renders into `framebuffers()[last_acquired_image()]`, then presents it.
/// `resize()` rebuilds every framebuffer in place and drops any acquired image.

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::engine_bail;
use super::frame_buffer::Framebuffer;
use super::texture::TextureFormat;

const SOURCE: &str = "galaxy3d::Swapchain";

// ============================================================================
// SwapchainDesc
// ============================================================================

/// Swapchain configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapchainDesc {
    /// Debug name, also used to name the per-image textures
    pub name: String,
    /// Initial width in pixels
    pub width: u32,
    /// Initial height in pixels
    pub height: u32,
    /// Number of presentable images (one framebuffer each)
    pub buffer_count: u32,
    /// Format of the presentable color images
    pub color_format: TextureFormat,
    /// Optional depth buffer created alongside each color image
    pub depth_format: Option<TextureFormat>,
    /// Wait for vertical blank on present
    pub sync_to_vertical_blank: bool,
    /// Maximum wait in `acquire_next_image()`
    pub acquire_timeout: Duration,
}

impl Default for SwapchainDesc {
    fn default() -> Self {
        Self {
            name: "Swapchain".to_string(),
            width: 1280,
            height: 720,
            buffer_count: 3,
            color_format: TextureFormat::B8G8R8A8_UNORM,
            depth_format: None,
            sync_to_vertical_blank: true,
            acquire_timeout: Duration::from_secs(1),
        }
    }
}

impl SwapchainDesc {
    /// Check extents, image count and formats
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for a zero extent or image count, a
    /// depth color format, or a non-depth depth format.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            engine_bail!(SOURCE, InvalidConfiguration:
                "Swapchain '{}' extent must be non-zero (got {}x{})",
                self.name, self.width, self.height);
        }
        if self.buffer_count == 0 {
            engine_bail!(SOURCE, InvalidConfiguration:
                "Swapchain '{}' needs at least one image", self.name);
        }
        if self.color_format.is_depth_stencil() {
            engine_bail!(SOURCE, InvalidConfiguration:
                "Swapchain '{}' color format {:?} is a depth format",
                self.name, self.color_format);
        }
        if let Some(depth) = self.depth_format {
            if !depth.is_depth_stencil() {
                engine_bail!(SOURCE, InvalidConfiguration:
                    "Swapchain '{}' depth format {:?} is not a depth format",
                    self.name, depth);
            }
        }
        Ok(())
    }
}

// ============================================================================
// SwapchainState
// ============================================================================

/// Swapchain lifecycle
///
/// ```text
/// Created ──acquire──> Acquired ──present──> Presented ──acquire──> Acquired ...
///    ^                     │                     │
///    └──────── reset (resize) ───────────────────┘
/// any ──dispose──> Disposed (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwapchainState {
    /// No image acquired yet (fresh or just resized)
    #[default]
    Created,
    /// An image is acquired and may be rendered into
    Acquired { image: u32 },
    /// The last acquired image was handed back to the surface
    Presented,
    /// Terminal, every operation fails
    Disposed,
}

impl SwapchainState {
    /// Fail with `InvalidOperation` once disposed
    pub fn ensure_live(&self, operation: &str) -> Result<()> {
        if !self.is_live() {
            engine_bail!(SOURCE, InvalidOperation:
                "Cannot {} on a disposed swapchain", operation);
        }
        Ok(())
    }

    /// Record a successful acquire of `image` out of `image_count` images
    ///
    /// # Errors
    ///
    /// - `InvalidOperation` when disposed or an image is already acquired
    /// - `InvalidResource` when `image` is out of range
    pub fn acquire(&mut self, image: u32, image_count: u32) -> Result<()> {
        self.ensure_live("acquire an image")?;
        if let SwapchainState::Acquired { image: current } = *self {
            engine_bail!(SOURCE, InvalidOperation:
                "Image {} is still acquired, present it before acquiring another", current);
        }
        if image >= image_count {
            engine_bail!(SOURCE, InvalidResource:
                "Acquired image index {} out of range (image count {})", image, image_count);
        }
        *self = SwapchainState::Acquired { image };
        Ok(())
    }

    /// Move from `Acquired` to `Presented`, returning the presented image
    pub fn present(&mut self) -> Result<u32> {
        self.ensure_live("present")?;
        match *self {
            SwapchainState::Acquired { image } => {
                *self = SwapchainState::Presented;
                Ok(image)
            }
            _ => {
                engine_bail!(SOURCE, InvalidOperation:
                    "Cannot present: no image is acquired (state {:?})", self);
            }
        }
    }

    /// Drop any acquired image (after resize)
    pub fn reset(&mut self) -> Result<()> {
        self.ensure_live("resize")?;
        *self = SwapchainState::Created;
        Ok(())
    }

    /// Enter the terminal state. Returns false if already disposed.
    pub fn dispose(&mut self) -> bool {
        let was_live = self.is_live();
        *self = SwapchainState::Disposed;
        was_live
    }

    pub fn is_live(&self) -> bool {
        *self != SwapchainState::Disposed
    }

    /// Index of the currently acquired image, if any
    pub fn acquired_image(&self) -> Option<u32> {
        match self {
            SwapchainState::Acquired { image } => Some(*image),
            _ => None,
        }
    }
}

// ============================================================================
// Swapchain trait
// ============================================================================

/// Swapchain for presenting framebuffers to a surface
///
/// Implemented by backends and created via `GraphicsDevice::create_swapchain()`.
/// Driven by a single rendering thread: acquire, present and resize take
/// `&mut self`. While live, `framebuffers()` is never empty, all its entries
/// share one size, and `last_acquired_image() < buffer_count()`.
pub trait Swapchain: Send + Sync {
    /// One framebuffer per presentable image
    fn framebuffers(&self) -> &[Arc<dyn Framebuffer>];

    /// Index of the most recently acquired image (0 after creation or resize)
    fn last_acquired_image(&self) -> u32;

    fn state(&self) -> SwapchainState;

    /// Acquire the next presentable image and return its index
    ///
    /// Blocks up to the configured acquire timeout.
    ///
    /// # Errors
    ///
    /// - `AcquireTimeout` if no image became available in time
    /// - `SurfaceLost` if the surface is gone
    /// - `InvalidOperation` if an image is already acquired or after dispose
    fn acquire_next_image(&mut self) -> Result<u32>;

    /// Present the acquired image with the current vertical sync mode
    ///
    /// # Errors
    ///
    /// `InvalidOperation` without an acquired image or after dispose.
    fn present(&mut self) -> Result<()>;

    /// Recreate the surface and every framebuffer at a new extent
    ///
    /// Valid in any live state. Afterwards every framebuffer is
    /// `width`x`height`, no image is acquired and `last_acquired_image()` is 0.
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` for a zero extent
    /// - `SurfaceLost` if the surface cannot be recreated (not retried)
    /// - `InvalidOperation` after dispose
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;

    fn sync_to_vertical_blank(&self) -> bool;

    /// Change present timing, effective from the next `present()`. Never blocks.
    fn set_sync_to_vertical_blank(&mut self, enabled: bool) -> Result<()>;

    fn name(&self) -> &str;

    fn set_name(&mut self, name: &str);

    fn is_disposed(&self) -> bool;

    /// Release framebuffers and per-image textures. Safe to call any number of times.
    fn dispose(&mut self);

    /// Number of presentable images (0 once disposed)
    fn buffer_count(&self) -> u32 {
        self.framebuffers().len() as u32
    }

    /// Width of the presentable images, taken from the first framebuffer
    fn width(&self) -> u32 {
        self.framebuffers().first().map_or(0, |fb| fb.width())
    }

    /// Height of the presentable images, taken from the first framebuffer
    fn height(&self) -> u32 {
        self.framebuffers().first().map_or(0, |fb| fb.height())
    }

    /// Framebuffer of the currently acquired image, if any
    fn acquired_framebuffer(&self) -> Option<&Arc<dyn Framebuffer>> {
        self.state()
            .acquired_image()
            .and_then(|image| self.framebuffers().get(image as usize))
    }
}

#[cfg(test)]
#[path = "swapchain_tests.rs"]
mod tests;
