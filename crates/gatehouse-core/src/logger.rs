// Adapter logger.
//
// Level-filtered logger with optional ANSI colours and a pluggable
// `LogHandler`. Adapters receive one of these by injection so that gate
// diagnostics and swallowed validation errors can be observed (and asserted
// on in tests) without touching global logging state.

use std::fmt;
use std::sync::{Arc, Mutex};

pub mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const BRIGHT: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub mod fg {
        pub const RED: &str = "\x1b[31m";
        pub const YELLOW: &str = "\x1b[33m";
        pub const BLUE: &str = "\x1b[34m";
        pub const MAGENTA: &str = "\x1b[35m";
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl LogLevel {
    /// ANSI color for this log level.
    pub fn color(&self) -> &'static str {
        match self {
            LogLevel::Debug => ansi::fg::MAGENTA,
            LogLevel::Info => ansi::fg::BLUE,
            LogLevel::Warn => ansi::fg::YELLOW,
            LogLevel::Error => ansi::fg::RED,
        }
    }

    /// Upper-case label used in formatted output.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for LogLevel {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "debug" => Self::Debug,
            "info" => Self::Info,
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            _ => Self::Warn,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Whether logging is disabled entirely.
    pub disabled: bool,
    /// Whether to disable ANSI color output.
    pub disable_colors: bool,
    /// The minimum log level to emit.
    pub level: LogLevel,
    /// Optional custom log handler (replaces the default stderr/stdout output).
    pub custom_handler: Option<Arc<dyn LogHandler>>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            disable_colors: false,
            level: LogLevel::Warn,
            custom_handler: None,
        }
    }
}

/// Destination for log records emitted by adapters.
pub trait LogHandler: Send + Sync + fmt::Debug {
    fn handle(&self, level: LogLevel, message: &str);
}

/// `LogHandler` that keeps every record in memory.
#[derive(Debug, Default)]
pub struct RecordingLogHandler {
    records: Mutex<Vec<(LogLevel, String)>>,
}

impl RecordingLogHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the captured records, oldest first.
    pub fn records(&self) -> Vec<(LogLevel, String)> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Whether any captured message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.records().iter().any(|(_, m)| m.contains(needle))
    }
}

impl LogHandler for RecordingLogHandler {
    fn handle(&self, level: LogLevel, message: &str) {
        let mut records = match self.records.lock() {
            Ok(records) => records,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.push((level, message.to_string()));
    }
}

#[derive(Clone)]
pub struct AuthLogger {
    config: LoggerConfig,
}

impl fmt::Debug for AuthLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthLogger")
            .field("level", &self.config.level)
            .field("disabled", &self.config.disabled)
            .finish()
    }
}

impl AuthLogger {
    /// Create a logger from an explicit configuration.
    pub fn new(config: LoggerConfig) -> Self {
        Self { config }
    }

    /// Logger that forwards every level to `handler`.
    pub fn with_handler(handler: Arc<dyn LogHandler>) -> Self {
        Self::new(LoggerConfig {
            level: LogLevel::Debug,
            custom_handler: Some(handler),
            ..Default::default()
        })
    }

    /// Logger that drops everything.
    pub fn disabled() -> Self {
        Self::new(LoggerConfig {
            disabled: true,
            ..Default::default()
        })
    }

    /// The minimum level this logger emits.
    pub fn level(&self) -> LogLevel {
        self.config.level
    }

    /// Whether a record at `level` would be emitted.
    pub fn should_publish(&self, level: LogLevel) -> bool {
        if self.config.disabled {
            return false;
        }
        level >= self.config.level
    }

    /// Log at debug level.
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Log at info level.
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Log at warn level.
    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    /// Log at error level.
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    /// Emit `message` at `level`.
    ///
    /// Goes to the custom handler when one is configured; otherwise warnings and
    /// errors go to stderr and everything else to stdout.
    pub fn log(&self, level: LogLevel, message: &str) {
        if !self.should_publish(level) {
            return;
        }

        if let Some(ref handler) = self.config.custom_handler {
            handler.handle(level, message);
            return;
        }

        let formatted = self.format_message(level, message);
        match level {
            LogLevel::Error | LogLevel::Warn => eprintln!("{formatted}"),
            _ => println!("{formatted}"),
        }
    }

    fn format_message(&self, level: LogLevel, message: &str) -> String {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        if self.config.disable_colors {
            format!("{} {} [gatehouse]: {}", timestamp, level.as_str(), message)
        } else {
            format!(
                "{dim}{timestamp}{reset} {color}{level}{reset} {bright}[gatehouse]:{reset} {message}",
                dim = ansi::DIM,
                reset = ansi::RESET,
                color = level.color(),
                level = level.as_str(),
                bright = ansi::BRIGHT,
            )
        }
    }
}

impl Default for AuthLogger {
    fn default() -> Self {
        Self::new(LoggerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!(LogLevel::from("DEBUG"), LogLevel::Debug);
        assert_eq!(LogLevel::from("warning"), LogLevel::Warn);
        assert_eq!(LogLevel::from("error"), LogLevel::Error);
        assert_eq!(LogLevel::from("nonsense"), LogLevel::Warn);
    }

    #[test]
    fn test_should_publish() {
        let logger = AuthLogger::new(LoggerConfig {
            level: LogLevel::Warn,
            ..Default::default()
        });
        assert!(!logger.should_publish(LogLevel::Debug));
        assert!(!logger.should_publish(LogLevel::Info));
        assert!(logger.should_publish(LogLevel::Warn));
        assert!(logger.should_publish(LogLevel::Error));
        assert!(!AuthLogger::disabled().should_publish(LogLevel::Error));
    }

    #[test]
    fn test_default_logger_suppresses_gate_success() {
        let handler = Arc::new(RecordingLogHandler::new());
        let logger = AuthLogger::new(LoggerConfig {
            custom_handler: Some(handler.clone()),
            ..Default::default()
        });
        assert_eq!(logger.level(), LogLevel::Warn);

        logger.info("Found Organization: \"acme\"");
        logger.warn("Missing Organization:\"zzz\" in []");
        let records = handler.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, LogLevel::Warn);
    }

    #[test]
    fn test_format_message_no_color() {
        let logger = AuthLogger::new(LoggerConfig {
            disable_colors: true,
            ..Default::default()
        });
        let msg = logger.format_message(LogLevel::Info, "Found GitHub Organization: \"acme\"");
        assert!(msg.contains("INFO [gatehouse]: Found GitHub Organization"));
        assert!(!msg.contains("\x1b["));
    }

    #[test]
    fn test_format_message_with_color() {
        let logger = AuthLogger::default();
        let msg = logger.format_message(LogLevel::Error, "boom");
        assert!(msg.contains(ansi::fg::RED));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn test_recording_handler_receives_all_levels() {
        let handler = Arc::new(RecordingLogHandler::new());
        let logger = AuthLogger::with_handler(handler.clone());
        logger.debug("upstream request sent");
        logger.warn("session validation failed");

        let records = handler.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], (LogLevel::Debug, "upstream request sent".to_string()));
        assert_eq!(records[1].0, LogLevel::Warn);
        assert!(handler.contains("validation failed"));
        assert!(!handler.contains("absent"));
    }
}
