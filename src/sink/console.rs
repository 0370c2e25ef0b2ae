//! Standard-stream console sink

use super::{ConsoleChannel, ConsoleSink};

/// Default sink writing to the process's standard streams: info lines to
/// stdout, warning and error lines to stderr.
pub struct StdConsoleSink {
    use_colors: bool,
}

impl StdConsoleSink {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    #[cfg(feature = "console")]
    fn decorate(&self, channel: ConsoleChannel, line: &str) -> String {
        use colored::Colorize;
        if !self.use_colors {
            return line.to_string();
        }
        match channel {
            ConsoleChannel::Info => line.to_string(),
            ConsoleChannel::Warning => line.yellow().to_string(),
            ConsoleChannel::Error => line.red().to_string(),
        }
    }

    #[cfg(not(feature = "console"))]
    fn decorate(&self, _channel: ConsoleChannel, line: &str) -> String {
        line.to_string()
    }
}

impl Default for StdConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleSink for StdConsoleSink {
    fn write(&self, channel: ConsoleChannel, line: &str) {
        let output = self.decorate(channel, line);
        match channel {
            ConsoleChannel::Info => println!("{}", output),
            ConsoleChannel::Warning | ConsoleChannel::Error => eprintln!("{}", output),
        }
    }
}
