//! # Logtree
//!
//! A low-overhead hierarchical logging core: a tree of named loggers with
//! independently settable enabled state, level filtering, and bounded
//! in-memory ring buffers.
//!
//! ## Features
//!
//! - **Hierarchical State**: a logger records only when it and every
//!   ancestor are enabled; the conjunction is cached and invalidated
//!   eagerly, so the hot-path check is O(1)
//! - **Dual Parents**: registry-created loggers can join a group that
//!   overrides their structural parent for propagation
//! - **Bounded Buffers**: fixed-capacity ring per logger, oldest entries
//!   silently overwritten
//! - **Zero-Cost Call Sites**: feature flags compile trace/debug and
//!   info/warn call sites out entirely

pub mod core;
pub mod macros;
pub mod sink;

pub mod prelude {
    pub use crate::core::{
        log_lazy, log_opt, matches_pattern, registry, LevelFilter, LogBuffer, LogEntry, LogLevel,
        LogScope, Logger, LoggerError, LoggerRegistry, LoggerSettings, RegistryCallback, Result,
        SourceLocation, StateCallback, DEFAULT_BUFFER_CAPACITY, ROOT_LOGGER_NAME,
    };
    pub use crate::sink::{channel_for, ConsoleChannel, ConsoleSink, StdConsoleSink};
}

pub use crate::core::{
    log_lazy, log_opt, matches_pattern, registry, LevelFilter, LogBuffer, LogEntry, LogLevel,
    LogScope, Logger, LoggerError, LoggerRegistry, LoggerSettings, RegistryCallback, Result,
    SourceLocation, StateCallback, DEFAULT_BUFFER_CAPACITY, ROOT_LOGGER_NAME,
};
pub use crate::sink::{channel_for, ConsoleChannel, ConsoleSink, StdConsoleSink};
