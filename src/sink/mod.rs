//! Console sink collaborator
//!
//! The core writes formatted lines to an external console when a logger's
//! `console_output` flag is set. The sink is a process-global, swappable
//! trait object so hosts can route lines into their own console and tests
//! can capture output.

pub mod console;

pub use console::StdConsoleSink;

use crate::core::LogLevel;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;

/// Output channel of the host console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleChannel {
    Info,
    Warning,
    Error,
}

/// Maps a level to its console channel: Warning to the warning channel,
/// Error and Critical to the error channel, everything else to info.
pub fn channel_for(level: LogLevel) -> ConsoleChannel {
    match level {
        LogLevel::Warning => ConsoleChannel::Warning,
        LogLevel::Error | LogLevel::Critical => ConsoleChannel::Error,
        _ => ConsoleChannel::Info,
    }
}

/// Destination for console-routed log lines. Failures are not signaled
/// back; a sink that cannot write simply drops the line.
pub trait ConsoleSink: Send + Sync {
    fn write(&self, channel: ConsoleChannel, line: &str);
}

static SINK: Lazy<RwLock<Arc<dyn ConsoleSink>>> =
    Lazy::new(|| RwLock::new(Arc::new(StdConsoleSink::new())));

/// The currently installed sink.
pub fn console_sink() -> Arc<dyn ConsoleSink> {
    SINK.read().clone()
}

/// Replace the process-wide sink, returning the previous one.
pub fn set_console_sink(sink: Arc<dyn ConsoleSink>) -> Arc<dyn ConsoleSink> {
    std::mem::replace(&mut *SINK.write(), sink)
}
