/// PresentationSurface trait - the display surface a swapchain presents to
///
/// A surface owns a fixed number of presentable images. The swapchain asks
/// it for the next available image, presents that image back, and recreates
/// the surface when the window is resized. Implemented by backends
/// (window-system surfaces, offscreen/headless surfaces).

use std::time::Duration;

use crate::error::Result;

pub trait PresentationSurface: Send + Sync {
    /// Wait for the next presentable image and return its index
    ///
    /// May block up to `timeout`.
    ///
    /// # Errors
    ///
    /// - `AcquireTimeout` if no image became available in time
    /// - `SurfaceLost` if the surface can no longer be used
    fn acquire_next_image(&mut self, timeout: Duration) -> Result<u32>;

    /// Queue a previously acquired image for display
    ///
    /// # Arguments
    ///
    /// * `image_index` - Index returned by `acquire_next_image`
    /// * `sync_to_vertical_blank` - Wait for vertical blank before displaying
    fn present(&mut self, image_index: u32, sync_to_vertical_blank: bool) -> Result<()>;

    /// Recreate the surface images at a new extent
    ///
    /// Every previously acquired image is invalidated.
    fn recreate(&mut self, width: u32, height: u32) -> Result<()>;

    /// Current (width, height) in pixels
    fn extent(&self) -> (u32, u32);

    /// Number of presentable images
    fn image_count(&self) -> u32;
}
