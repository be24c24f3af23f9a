/*!
# Galaxy 3D Render Targets

Core traits and types for the render targets of the Galaxy 3D rendering engine.

This crate provides the platform-agnostic rules by which textures are composed
into framebuffers and by which a chain of framebuffers is presented to a
display surface. Backend implementations (headless, Vulkan, etc.) provide the
concrete types.

## Architecture

- **GraphicsDevice**: Factory trait for textures, framebuffers and swapchains
- **Attachment**: One bindable texture slice (texture, array layer, mip level)
- **Framebuffer**: Validated set of color, depth and resolve attachments
- **OutputDescription**: Format/sample-count summary for pipeline compatibility
- **Swapchain**: Rotating set of framebuffers backing a presentation surface
- **PresentationSurface**: Surface capability consumed by swapchains

Textures are owned by the device's `TextureRegistry`; framebuffers and
swapchains only hold non-owning `TextureKey`s.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod graphics_device;


// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Device factory trait
    pub use crate::graphics_device::GraphicsDevice;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, MinSeverityLogger};
    }

    // Render sub-module with all render target types
    pub mod render {
        pub use crate::graphics_device::*;
    }
}

// Re-export math library at crate root
pub use glam;
