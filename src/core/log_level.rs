//! Log level and level-filter definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// A single severity level.
///
/// Discriminants are bit-disjoint so levels compose directly into a
/// [`LevelFilter`] mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Default)]
#[repr(u8)]
pub enum LogLevel {
    Trace = 1,
    Debug = 2,
    #[default]
    Info = 4,
    Warning = 8,
    Error = 16,
    Critical = 32,
}

impl LogLevel {
    /// Three-letter tag used in extracted log text.
    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRC",
            LogLevel::Debug => "DBG",
            LogLevel::Info => "INF",
            LogLevel::Warning => "WRN",
            LogLevel::Error => "ERR",
            LogLevel::Critical => "CRT",
        }
    }

    /// Bit value of this level within a [`LevelFilter`].
    #[inline]
    pub const fn bit(self) -> u8 {
        self as u8
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Trace => BrightBlack,
            LogLevel::Debug => Blue,
            LogLevel::Info => Green,
            LogLevel::Warning => Yellow,
            LogLevel::Error => Red,
            LogLevel::Critical => BrightRed,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRC" | "TRACE" => Ok(LogLevel::Trace),
            "DBG" | "DEBUG" => Ok(LogLevel::Debug),
            "INF" | "INFO" => Ok(LogLevel::Info),
            "WRN" | "WARN" | "WARNING" => Ok(LogLevel::Warning),
            "ERR" | "ERROR" => Ok(LogLevel::Error),
            "CRT" | "CRITICAL" => Ok(LogLevel::Critical),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

impl BitOr for LogLevel {
    type Output = LevelFilter;

    fn bitor(self, rhs: LogLevel) -> LevelFilter {
        LevelFilter(self.bit() | rhs.bit())
    }
}

impl BitOr<LevelFilter> for LogLevel {
    type Output = LevelFilter;

    fn bitor(self, rhs: LevelFilter) -> LevelFilter {
        LevelFilter(self.bit() | rhs.0)
    }
}

/// A set of [`LogLevel`] values stored as a bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelFilter(u8);

impl LevelFilter {
    /// Matches nothing.
    pub const NONE: LevelFilter = LevelFilter(0);
    /// Matches every level.
    pub const ALL: LevelFilter = LevelFilter(63);
    /// Info and above; the usual shipping preset.
    pub const PRODUCTION: LevelFilter = LevelFilter(4 | 8 | 16 | 32);
    /// Debug and above.
    pub const DEVELOPMENT: LevelFilter = LevelFilter(2 | 4 | 8 | 16 | 32);
    /// Error and Critical only.
    pub const ERRORS_ONLY: LevelFilter = LevelFilter(16 | 32);

    /// Build a filter from a single level.
    #[inline]
    pub const fn only(level: LogLevel) -> Self {
        LevelFilter(level.bit())
    }

    /// Whether `level` passes this filter.
    #[inline]
    pub const fn contains(self, level: LogLevel) -> bool {
        self.0 & level.bit() != 0
    }

    #[must_use]
    pub const fn with(self, level: LogLevel) -> Self {
        LevelFilter(self.0 | level.bit())
    }

    #[must_use]
    pub const fn without(self, level: LogLevel) -> Self {
        LevelFilter(self.0 & !level.bit())
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw mask bits.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl Default for LevelFilter {
    fn default() -> Self {
        LevelFilter::ALL
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        LevelFilter::only(level)
    }
}

impl BitOr for LevelFilter {
    type Output = LevelFilter;

    fn bitor(self, rhs: LevelFilter) -> LevelFilter {
        LevelFilter(self.0 | rhs.0)
    }
}

impl BitOr<LogLevel> for LevelFilter {
    type Output = LevelFilter;

    fn bitor(self, rhs: LogLevel) -> LevelFilter {
        LevelFilter(self.0 | rhs.bit())
    }
}

impl BitOrAssign for LevelFilter {
    fn bitor_assign(&mut self, rhs: LevelFilter) {
        self.0 |= rhs.0;
    }
}
