/// Framebuffer - headless implementation of the Framebuffer trait
///
/// Holds the validated attachment set. No backend handles exist, so disposal
/// only flips the disposed flag. Referenced textures are never touched.

use galaxy_3d_render_target::galaxy3d::render::{
    Framebuffer as RendererFramebuffer,
    FramebufferTargets,
};
use galaxy_3d_render_target::engine_debug;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Headless framebuffer implementation
pub struct Framebuffer {
    targets: FramebufferTargets,
    /// Debug name
    name: RwLock<String>,
    disposed: AtomicBool,
    /// Log disposal at DEBUG
    trace_lifecycle: bool,
}

impl Framebuffer {
    pub(crate) fn new(targets: FramebufferTargets, name: String, trace_lifecycle: bool) -> Self {
        if trace_lifecycle {
            engine_debug!("galaxy3d::headless::Framebuffer",
                "Created framebuffer '{}' ({}x{}, {} color, depth: {})",
                name, targets.width(), targets.height(),
                targets.color_targets().len(), targets.depth_target().is_some());
        }
        Self {
            targets,
            name: RwLock::new(name),
            disposed: AtomicBool::new(false),
            trace_lifecycle,
        }
    }
}

impl RendererFramebuffer for Framebuffer {
    fn targets(&self) -> &FramebufferTargets {
        &self.targets
    }

    fn name(&self) -> String {
        match self.name.read() {
            Ok(name) => name.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_name(&self, name: &str) {
        let mut guard = match self.name.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = name.to_string();
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        if self.trace_lifecycle {
            engine_debug!("galaxy3d::headless::Framebuffer",
                "Disposed framebuffer '{}'", self.name());
        }
    }
}

#[cfg(test)]
#[path = "headless_frame_buffer_tests.rs"]
mod tests;
