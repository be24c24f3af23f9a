/*!
# Galaxy 3D Render Targets - Headless Backend

Headless implementation of the galaxy_3d_render_target traits.

Textures are pure descriptions and presentation is simulated by a surface
with a fixed number of images, so framebuffers and swapchains follow the
exact same rules as on a GPU backend without needing one. Used for tests,
tools and offscreen validation.

## Example

```no_run
use galaxy_3d_render_target::galaxy3d::GraphicsDevice;
use galaxy_3d_render_target::galaxy3d::render::Config;
use galaxy_3d_render_target_headless::{HeadlessGraphicsDevice, HeadlessSurface, SurfaceDesc};

let mut device = HeadlessGraphicsDevice::new(Config::default());
let surface = HeadlessSurface::new(SurfaceDesc::default())?;
let desc = device.default_swapchain_desc(1280, 720);
let mut swapchain = device.create_swapchain(desc, Box::new(surface))?;

let image = swapchain.acquire_next_image()?;
let _framebuffer = &swapchain.framebuffers()[image as usize];
swapchain.present()?;
# Ok::<(), galaxy_3d_render_target::galaxy3d::Error>(())
```
*/

mod headless_graphics_device;
mod headless_frame_buffer;
mod headless_swapchain;
mod headless_surface;

pub use headless_graphics_device::HeadlessGraphicsDevice;
pub use headless_frame_buffer::Framebuffer as HeadlessFramebuffer;
pub use headless_swapchain::Swapchain as HeadlessSwapchain;
pub use headless_surface::{Surface as HeadlessSurface, SurfaceDesc, SurfaceHandle, PresentRecord, PRESENT_HISTORY};
