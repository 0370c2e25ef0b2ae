//! Timed-scope and deferred-message helpers
//!
//! Free-standing conveniences built on top of [`Logger`]'s gating
//! primitives. All entry points tolerate an absent logger and no-op
//! silently, so call sites never need their own null checks.

use super::logger::Logger;
use super::log_level::LogLevel;
use std::sync::Arc;
use std::time::Instant;

/// A timed begin/end logging scope.
///
/// The decision to log is made exactly once, at construction. When it is
/// positive a `>>> {label} BEGIN` entry is emitted and a high-resolution
/// start time cached; on drop the matching `<<< {label} END (N.NNms)`
/// entry goes through the ungated emission path, so END always pairs with
/// BEGIN even if the logger was disabled while the scope was open. When
/// the decision is negative the scope is fully inert: no formatting, no
/// timestamp work.
pub struct LogScope {
    active: Option<ActiveScope>,
}

struct ActiveScope {
    logger: Arc<Logger>,
    level: LogLevel,
    label: String,
    started: Instant,
}

impl LogScope {
    pub fn begin(logger: Option<&Arc<Logger>>, level: LogLevel, label: &str) -> LogScope {
        match logger {
            Some(logger) if logger.should_log(level) => {
                logger.log(level, format!(">>> {} BEGIN", label));
                LogScope {
                    active: Some(ActiveScope {
                        logger: logger.clone(),
                        level,
                        label: label.to_string(),
                        started: Instant::now(),
                    }),
                }
            }
            _ => LogScope { active: None },
        }
    }

    /// Whether this scope decided to log at construction.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

impl Drop for LogScope {
    fn drop(&mut self) {
        if let Some(scope) = self.active.take() {
            let elapsed_ms = scope.started.elapsed().as_secs_f64() * 1000.0;
            scope.logger.log_direct(
                scope.level,
                format!("<<< {} END ({:.2}ms)", scope.label, elapsed_ms),
                None,
            );
        }
    }
}

/// Log a message whose construction is deferred behind the gate: the
/// closure runs only when the logger exists and would record `level`.
pub fn log_lazy<F>(logger: Option<&Arc<Logger>>, level: LogLevel, message: F)
where
    F: FnOnce() -> String,
{
    if let Some(logger) = logger {
        if logger.should_log(level) {
            logger.log(level, message());
        }
    }
}

/// Null-tolerant plain logging helper.
pub fn log_opt(logger: Option<&Arc<Logger>>, level: LogLevel, message: &str) {
    if let Some(logger) = logger {
        logger.log(level, message);
    }
}
