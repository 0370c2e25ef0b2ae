//! Core logger types

pub mod error;
pub mod log_buffer;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod registry;
pub mod scope;

pub use error::{LoggerError, Result};
pub use log_buffer::LogBuffer;
pub use log_entry::LogEntry;
pub use log_level::{LevelFilter, LogLevel};
pub use logger::{
    Logger, LoggerSettings, SourceLocation, StateCallback, DEFAULT_BUFFER_CAPACITY,
};
pub use registry::{
    matches_pattern, registry, LoggerRegistry, RegistryCallback, ROOT_LOGGER_NAME,
};
pub use scope::{log_lazy, log_opt, LogScope};
