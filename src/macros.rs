//! Logging macros for ergonomic, zero-cost call sites.
//!
//! Each macro checks the logger's cached effective state before any
//! `format!` work, and captures the call site's file, module path, and
//! line for loggers that record source info.
//!
//! Two build flags additionally gate call-site compilation:
//! `logging-standard` covers [`info!`]/[`warn!`] and `logging-detail`
//! covers [`trace!`]/[`debug!`] (both are default features). With a flag
//! off, the macro's guard folds to a constant `false`, the body is dead
//! code, and the message arguments are never evaluated. [`error!`] and
//! [`critical!`] call sites are always compiled.
//!
//! # Examples
//!
//! ```
//! use logtree::prelude::*;
//! use logtree::info;
//!
//! let logger = Logger::new("App", 64);
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Whether trace/debug call sites are compiled in.
#[must_use]
pub const fn detail_enabled() -> bool {
    cfg!(feature = "logging-detail")
}

/// Whether info/warn call sites are compiled in.
#[must_use]
pub const fn standard_enabled() -> bool {
    cfg!(feature = "logging-standard")
}

/// Log a message at an explicit level, gated and with source capture.
///
/// # Examples
///
/// ```
/// # use logtree::prelude::*;
/// # let logger = Logger::new("App", 64);
/// use logtree::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.should_log(level) {
            logger.log_with_source(
                level,
                format!($($arg)+),
                $crate::SourceLocation {
                    file: file!(),
                    member: module_path!(),
                    line: line!(),
                },
            );
        }
    }};
}

/// Log a trace-level message. Compiled out without `logging-detail`.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        if $crate::macros::detail_enabled() {
            $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
        }
    };
}

/// Log a debug-level message. Compiled out without `logging-detail`.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        if $crate::macros::detail_enabled() {
            $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
        }
    };
}

/// Log an info-level message. Compiled out without `logging-standard`.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        if $crate::macros::standard_enabled() {
            $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
        }
    };
}

/// Log a warning-level message. Compiled out without `logging-standard`.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        if $crate::macros::standard_enabled() {
            $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
        }
    };
}

/// Log an error-level message. Always compiled.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a critical-level message. Always compiled.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}
