//! Error types for Galaxy3D render targets
//!
//! This module defines the error type shared by the framebuffer, swapchain
//! and texture layers, and the macros used to log an error at the point where
//! it is created.

use std::fmt;

/// Result type for Galaxy3D render target operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D render target errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed descriptor (attachment set, texture, swapchain).
    /// The caller must supply a corrected description.
    InvalidConfiguration(String),

    /// The presentation surface backing a swapchain became unusable
    SurfaceLost(String),

    /// The backend device became unusable
    DeviceLost(String),

    /// The presentation backend could not supply an image in time
    AcquireTimeout {
        /// Timeout that elapsed, in milliseconds
        timeout_ms: u64,
    },

    /// Operation not valid in the current lifecycle state
    InvalidOperation(String),

    /// Invalid resource (unknown texture key, wrong usage, etc.)
    InvalidResource(String),

    /// Backend-specific error
    BackendError(String),
}

impl Error {
    /// Returns true for errors raised by the presentation backend
    /// (`SurfaceLost`, `DeviceLost`, `AcquireTimeout`).
    ///
    /// The rendering loop decides whether to retry or tear down the swapchain.
    pub fn is_presentation_error(&self) -> bool {
        matches!(
            self,
            Error::SurfaceLost(_) | Error::DeviceLost(_) | Error::AcquireTimeout { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::SurfaceLost(msg) => write!(f, "Surface lost: {}", msg),
            Error::DeviceLost(msg) => write!(f, "Device lost: {}", msg),
            Error::AcquireTimeout { timeout_ms } => {
                write!(f, "Acquire timed out after {} ms", timeout_ms)
            }
            Error::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an error and build it
///
/// Without a variant the error is a `BackendError`. A variant name followed
/// by `:` selects any message-carrying variant.
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_render_target::engine_err;
///
/// let e = engine_err!("galaxy3d::Framebuffer", InvalidConfiguration: "no attachments");
/// let b = engine_err!("galaxy3d::headless", "surface recreate failed: {}", 3);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $variant:ident : $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::$variant(message)
    }};
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::BackendError(message)
    }};
}

/// Log an error and return it from the enclosing function
///
/// Accepts the same forms as [`engine_err!`].
#[macro_export]
macro_rules! engine_bail {
    ($($arg:tt)*) => {
        return Err($crate::engine_err!($($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
