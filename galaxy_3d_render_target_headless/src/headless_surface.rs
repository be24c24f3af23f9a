/// Surface - headless implementation of the PresentationSurface trait
///
/// Simulates a display surface with a fixed number of images. Each image is
/// available, acquired by the renderer, or displayed. Presenting an image
/// puts it on display and hands the previously displayed image back, so with
/// a single image the renderer starves until the display releases it (see
/// `SurfaceHandle::release_displayed`).

use galaxy_3d_render_target::galaxy3d::{Error, Result};
use galaxy_3d_render_target::galaxy3d::render::PresentationSurface;
use galaxy_3d_render_target::{engine_bail, engine_err, engine_error, engine_trace};
use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

const SOURCE: &str = "galaxy3d::headless";

/// Present records kept by a surface; older ones are dropped
pub const PRESENT_HISTORY: usize = 256;

/// Headless surface configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceDesc {
    /// Initial width in pixels
    pub width: u32,
    /// Initial height in pixels
    pub height: u32,
    /// Number of presentable images
    pub image_count: u32,
}

impl Default for SurfaceDesc {
    fn default() -> Self {
        Self { width: 1280, height: 720, image_count: 3 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageState {
    Available,
    Acquired,
    Displayed,
}

/// One recorded present call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentRecord {
    pub image: u32,
    pub sync_to_vertical_blank: bool,
}

struct SurfaceShared {
    width: u32,
    height: u32,
    images: Vec<ImageState>,
    /// Round-robin start for the next acquire
    next: u32,
    lost: bool,
    /// Most recent presents, at most `PRESENT_HISTORY`
    presents: VecDeque<PresentRecord>,
    present_count: u64,
    recreate_count: u32,
}

impl SurfaceShared {
    fn displayed(&self) -> Option<u32> {
        self.images
            .iter()
            .position(|state| *state == ImageState::Displayed)
            .map(|i| i as u32)
    }

    fn take_available(&mut self) -> Option<u32> {
        let count = self.images.len() as u32;
        let image = (0..count)
            .map(|offset| (self.next + offset) % count)
            .find(|&i| self.images[i as usize] == ImageState::Available)?;
        self.images[image as usize] = ImageState::Acquired;
        self.next = (image + 1) % count;
        Some(image)
    }
}

type Shared = Arc<(Mutex<SurfaceShared>, Condvar)>;

fn lock(shared: &Shared) -> MutexGuard<'_, SurfaceShared> {
    // Ignore poisoning
    match shared.0.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Headless presentation surface
pub struct Surface {
    shared: Shared,
}

impl Surface {
    /// Create a surface
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for a zero extent or image count.
    pub fn new(desc: SurfaceDesc) -> Result<Self> {
        if desc.width == 0 || desc.height == 0 || desc.image_count == 0 {
            engine_bail!(SOURCE, InvalidConfiguration:
                "Surface needs a non-zero extent and image count (got {}x{}, {} images)",
                desc.width, desc.height, desc.image_count);
        }

        let shared = SurfaceShared {
            width: desc.width,
            height: desc.height,
            images: vec![ImageState::Available; desc.image_count as usize],
            next: 0,
            lost: false,
            presents: VecDeque::with_capacity(PRESENT_HISTORY),
            present_count: 0,
            recreate_count: 0,
        };

        Ok(Self { shared: Arc::new((Mutex::new(shared), Condvar::new())) })
    }

    /// Handle to drive the simulated display from outside the swapchain
    pub fn handle(&self) -> SurfaceHandle {
        SurfaceHandle { shared: self.shared.clone() }
    }
}

impl PresentationSurface for Surface {
    fn acquire_next_image(&mut self, timeout: Duration) -> Result<u32> {
        // None: the timeout is too large to be reached, wait without one
        let deadline = Instant::now().checked_add(timeout);
        let (_, condvar) = &*self.shared;
        let mut state = lock(&self.shared);

        loop {
            if state.lost {
                engine_bail!(SOURCE, SurfaceLost: "Surface lost during acquire");
            }
            if let Some(image) = state.take_available() {
                engine_trace!(SOURCE, "Acquired surface image {}", image);
                return Ok(image);
            }

            state = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                        engine_error!(SOURCE,
                            "No surface image available after {} ms", timeout_ms);
                        return Err(Error::AcquireTimeout { timeout_ms });
                    }
                    match condvar.wait_timeout(state, deadline - now) {
                        Ok((guard, _)) => guard,
                        Err(poisoned) => poisoned.into_inner().0,
                    }
                }
                None => match condvar.wait(state) {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                },
            };
        }
    }

    fn present(&mut self, image_index: u32, sync_to_vertical_blank: bool) -> Result<()> {
        let (_, condvar) = &*self.shared;
        let mut state = lock(&self.shared);

        if state.lost {
            engine_bail!(SOURCE, SurfaceLost: "Surface lost during present");
        }
        match state.images.get(image_index as usize) {
            Some(ImageState::Acquired) => {}
            Some(other) => {
                engine_bail!(SOURCE, InvalidOperation:
                    "Cannot present surface image {} in state {:?}", image_index, other);
            }
            None => {
                engine_bail!(SOURCE, InvalidResource:
                    "Surface image {} out of range ({} images)", image_index, state.images.len());
            }
        }

        if let Some(previous) = state.displayed() {
            state.images[previous as usize] = ImageState::Available;
        }
        state.images[image_index as usize] = ImageState::Displayed;
        if state.presents.len() == PRESENT_HISTORY {
            state.presents.pop_front();
        }
        state.presents.push_back(PresentRecord { image: image_index, sync_to_vertical_blank });
        state.present_count += 1;
        condvar.notify_all();
        Ok(())
    }

    fn recreate(&mut self, width: u32, height: u32) -> Result<()> {
        let (_, condvar) = &*self.shared;
        let mut state = lock(&self.shared);

        if state.lost {
            engine_bail!(SOURCE, SurfaceLost:
                "Cannot recreate lost surface at {}x{}", width, height);
        }
        if width == 0 || height == 0 {
            return Err(engine_err!(SOURCE, InvalidConfiguration:
                "Surface extent must be non-zero (got {}x{})", width, height));
        }

        state.width = width;
        state.height = height;
        state.images.iter_mut().for_each(|image| *image = ImageState::Available);
        state.next = 0;
        state.recreate_count += 1;
        condvar.notify_all();
        Ok(())
    }

    fn extent(&self) -> (u32, u32) {
        let state = lock(&self.shared);
        (state.width, state.height)
    }

    fn image_count(&self) -> u32 {
        lock(&self.shared).images.len() as u32
    }
}

/// Cloneable control handle of a headless surface
///
/// Plays the role of the display and the window system: releases displayed
/// images, loses the surface, and reports what was presented.
#[derive(Clone)]
pub struct SurfaceHandle {
    shared: Shared,
}

impl SurfaceHandle {
    /// Make every following surface operation fail with `SurfaceLost`
    pub fn lose(&self) {
        let (_, condvar) = &*self.shared;
        lock(&self.shared).lost = true;
        condvar.notify_all();
    }

    pub fn is_lost(&self) -> bool {
        lock(&self.shared).lost
    }

    /// Take the displayed image off screen, waking a blocked acquire.
    /// Returns the released image, if one was displayed.
    pub fn release_displayed(&self) -> Option<u32> {
        let (_, condvar) = &*self.shared;
        let mut state = lock(&self.shared);
        let image = state.displayed()?;
        state.images[image as usize] = ImageState::Available;
        condvar.notify_all();
        Some(image)
    }

    /// The last presents (up to `PRESENT_HISTORY`), oldest first
    pub fn presents(&self) -> Vec<PresentRecord> {
        lock(&self.shared).presents.iter().copied().collect()
    }

    /// Drain the recorded presents, oldest first
    pub fn take_presents(&self) -> Vec<PresentRecord> {
        lock(&self.shared).presents.drain(..).collect()
    }

    pub fn last_present(&self) -> Option<PresentRecord> {
        lock(&self.shared).presents.back().copied()
    }

    /// Number of successful presents, including dropped records
    pub fn present_count(&self) -> u64 {
        lock(&self.shared).present_count
    }

    /// Number of successful `recreate()` calls
    pub fn recreate_count(&self) -> u32 {
        lock(&self.shared).recreate_count
    }

    pub fn extent(&self) -> (u32, u32) {
        let state = lock(&self.shared);
        (state.width, state.height)
    }
}

#[cfg(test)]
#[path = "headless_surface_tests.rs"]
mod tests;
