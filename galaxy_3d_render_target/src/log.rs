//! Internal logging system for Galaxy3D render targets
//!
//! - Customizable logger via the `Logger` trait
//! - Severity levels (Trace, Debug, Info, Warn, Error)
//! - Colored console output by default
//! - Severity filtering via `MinSeverityLogger`
//! - File and line information for ERROR logs

use colored::*;
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Logger trait for custom logging implementations
///
/// Implement this trait to route engine logs elsewhere (file, editor console,
/// test capture, etc.) and install it with `Engine::set_logger()`.
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_render_target::galaxy3d::log::{Logger, LogEntry};
///
/// struct FileLogger {
///     file: std::fs::File,
/// }
///
/// impl Logger for FileLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Write to file...
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source module (e.g., "galaxy3d::Framebuffer", "galaxy3d::headless::Swapchain")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogSeverity {
    /// Very verbose information (per-frame acquire/present)
    Trace,

    /// Development information (resource creation/disposal)
    Debug,

    /// Important informational messages
    Info,

    /// Potential issues
    Warn,

    /// Errors, logged with file:line
    Error,
}

impl LogSeverity {
    /// Fixed-width label used by `DefaultLogger`
    pub fn label(&self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }
}

/// Default logger implementation using colored console output
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error: `[timestamp] [ERROR] [source] message (file:line)`
///
/// Warnings and errors go to stderr, everything else to stdout.
pub struct DefaultLogger;

impl DefaultLogger {
    /// Format an entry without colors (used by tests and file-like sinks)
    pub fn format_plain(entry: &LogEntry) -> String {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f");

        match (entry.file, entry.line) {
            (Some(file), Some(line)) => format!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp, entry.severity.label(), entry.source, entry.message, file, line
            ),
            _ => format!(
                "[{}] [{}] [{}] {}",
                timestamp, entry.severity.label(), entry.source, entry.message
            ),
        }
    }
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        let label = entry.severity.label();
        let severity_str = match entry.severity {
            LogSeverity::Trace => label.bright_black(),
            LogSeverity::Debug => label.cyan(),
            LogSeverity::Info => label.green(),
            LogSeverity::Warn => label.yellow(),
            LogSeverity::Error => label.red().bold(),
        };

        let source = entry.source.bright_blue();

        let line = if let (Some(file), Some(line)) = (entry.file, entry.line) {
            format!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp, severity_str, source, entry.message, file, line
            )
        } else {
            format!("[{}] [{}] [{}] {}", timestamp, severity_str, source, entry.message)
        };

        if entry.severity >= LogSeverity::Warn {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

/// Logger adapter that drops entries below a minimum severity
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_render_target::galaxy3d::Engine;
/// use galaxy_3d_render_target::galaxy3d::log::{DefaultLogger, LogSeverity, MinSeverityLogger};
///
/// Engine::set_logger(MinSeverityLogger::new(DefaultLogger, LogSeverity::Info));
/// ```
pub struct MinSeverityLogger<L: Logger> {
    inner: L,
    min_severity: LogSeverity,
}

impl<L: Logger> MinSeverityLogger<L> {
    /// Wrap `inner`, forwarding only entries at or above `min_severity`
    pub fn new(inner: L, min_severity: LogSeverity) -> Self {
        Self { inner, min_severity }
    }

    /// Current threshold
    pub fn min_severity(&self) -> LogSeverity {
        self.min_severity
    }
}

impl<L: Logger> Logger for MinSeverityLogger<L> {
    fn log(&self, entry: &LogEntry) {
        if entry.severity >= self.min_severity {
            self.inner.log(entry);
        }
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message (very verbose, typically disabled)
///
/// # Example
///
/// ```no_run
/// galaxy_3d_render_target::engine_trace!("galaxy3d::Swapchain", "Acquired image {}", 1);
/// ```
#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log(
            $crate::galaxy3d::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message (development information)
#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log(
            $crate::galaxy3d::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message (important events)
#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log(
            $crate::galaxy3d::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message (potential issues)
#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log(
            $crate::galaxy3d::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
///
/// # Example
///
/// ```no_run
/// galaxy_3d_render_target::engine_error!("galaxy3d::Swapchain", "Failed to resize: {}", "surface lost");
/// ```
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Engine::log_detailed(
            $crate::galaxy3d::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}
