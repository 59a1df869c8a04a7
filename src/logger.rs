//! Logging and verbosity control.
//!
//! Provides a global logger with three verbosity levels:
//! - Quiet: only written file paths and errors
//! - Normal: one line per imported file (default)
//! - Verbose: timestamped colored logs, including pipeline details
//!
//! The free functions are no-ops until [`Logger::init`] has been called, so
//! library callers that never initialize a logger get no output.

use std::sync::OnceLock;
use std::time::Instant;

/// Verbosity level for controlling output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    /// Only written file paths and errors
    Quiet,
    /// One line per imported file (default)
    Normal,
    /// Timestamped colored logs with details
    Verbose,
}

/// Global logger instance.
static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Global start time for elapsed calculations.
static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Thread-safe logger for controlling application output.
#[derive(Debug)]
pub struct Logger {
    level: VerbosityLevel,
    colors_enabled: bool,
}

impl Logger {
    /// Initialize the global logger with the specified verbosity level.
    ///
    /// Returns `false` if a logger was already installed; the first one wins.
    pub fn init(level: VerbosityLevel, no_color: bool) -> bool {
        let colors_enabled = !no_color
            && std::env::var("NO_COLOR").is_err()
            && atty::is(atty::Stream::Stdout);

        START_TIME.set(Instant::now()).ok();
        LOGGER
            .set(Logger {
                level,
                colors_enabled,
            })
            .is_ok()
    }

    /// Get the global logger instance, if one was initialized.
    pub fn instance() -> Option<&'static Logger> {
        LOGGER.get()
    }

    /// Get elapsed time since logger init.
    fn elapsed(&self) -> f64 {
        START_TIME
            .get()
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Returns true if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.level == VerbosityLevel::Verbose
    }

    fn format_line(&self, level: &str, msg: &str) -> String {
        let elapsed = self.elapsed();
        if self.colors_enabled {
            let level_color = match level {
                "ERROR" => "\x1b[31m",
                "WARN" => "\x1b[33m",
                "INFO" => "\x1b[34m",
                "DEBUG" => "\x1b[90m",
                _ => "",
            };
            format!(
                "\x1b[90m[{:.2}s]\x1b[0m {}[{}]\x1b[0m {}",
                elapsed, level_color, level, msg
            )
        } else {
            format!("[{:.2}s] [{}] {}", elapsed, level, msg)
        }
    }

    /// Log an error message (always displayed, on stderr).
    pub fn error(&self, msg: &str) {
        if self.is_verbose() {
            eprintln!("{}", self.format_line("ERROR", msg));
        } else {
            eprintln!("Error: {}", msg);
        }
    }

    /// Log a warning message (normal and verbose modes).
    pub fn warn(&self, msg: &str) {
        match self.level {
            VerbosityLevel::Quiet => {}
            VerbosityLevel::Normal => eprintln!("Warning: {}", msg),
            VerbosityLevel::Verbose => eprintln!("{}", self.format_line("WARN", msg)),
        }
    }

    /// Report a written file (quiet: just path, normal: message, verbose: with prefix).
    pub fn output(&self, path: &str) {
        match self.level {
            VerbosityLevel::Quiet => println!("{}", path),
            VerbosityLevel::Normal => println!("Wrote: {}", path),
            VerbosityLevel::Verbose => {
                println!("{}", self.format_line("INFO", &format!("Wrote: {}", path)))
            }
        }
    }

    /// Log an info message (displayed in normal mode and above).
    pub fn info(&self, msg: &str) {
        match self.level {
            VerbosityLevel::Quiet => {}
            VerbosityLevel::Normal => println!("{}", msg),
            VerbosityLevel::Verbose => println!("{}", self.format_line("INFO", msg)),
        }
    }

    /// Log a debug message (displayed only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if self.is_verbose() {
            println!("{}", self.format_line("DEBUG", msg));
        }
    }
}

/// Log an error message (always displayed).
pub fn error(msg: &str) {
    if let Some(logger) = Logger::instance() {
        logger.error(msg);
    }
}

/// Log a warning message (normal and verbose modes).
pub fn warn(msg: &str) {
    if let Some(logger) = Logger::instance() {
        logger.warn(msg);
    }
}

/// Report a written file.
pub fn output(path: &str) {
    if let Some(logger) = Logger::instance() {
        logger.output(path);
    }
}

/// Log an info message (displayed in normal mode and above).
pub fn info(msg: &str) {
    if let Some(logger) = Logger::instance() {
        logger.info(msg);
    }
}

/// Log a debug message (displayed only in verbose mode).
pub fn debug(msg: &str) {
    if let Some(logger) = Logger::instance() {
        logger.debug(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logger(level: VerbosityLevel) -> Logger {
        Logger {
            level,
            colors_enabled: false,
        }
    }

    #[test]
    fn test_verbosity_level_ordering() {
        assert!((VerbosityLevel::Quiet as i32) < (VerbosityLevel::Normal as i32));
        assert!((VerbosityLevel::Normal as i32) < (VerbosityLevel::Verbose as i32));
    }

    #[test]
    fn test_logger_is_verbose() {
        assert!(!logger(VerbosityLevel::Quiet).is_verbose());
        assert!(!logger(VerbosityLevel::Normal).is_verbose());
        assert!(logger(VerbosityLevel::Verbose).is_verbose());
    }

    #[test]
    fn test_format_line_without_colors() {
        let line = logger(VerbosityLevel::Verbose).format_line("DEBUG", "KML: 2 placemark(s)");
        assert!(line.ends_with("[DEBUG] KML: 2 placemark(s)"));
        assert!(!line.contains('\x1b'));
    }

    #[test]
    fn test_free_functions_without_init_do_not_panic() {
        // Unit tests never call Logger::init.
        debug("ignored");
        info("ignored");
        warn("ignored");
    }
}
