/// Graphics device module - render target types and traits

// Module declarations
pub mod graphics_device;
pub mod texture;
pub mod texture_registry;
pub mod attachment;
pub mod output_description;
pub mod frame_buffer;
pub mod surface;
pub mod swapchain;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use texture::*;
pub use texture_registry::*;
pub use attachment::*;
pub use output_description::*;
pub use frame_buffer::*;
pub use surface::*;
pub use swapchain::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
