//! Logging
//!
//! Logging sink for token lifecycle operations.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    Info,
    /// Warn level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// Redact a bearer token for logs: a short prefix plus the length.
pub fn redact_token(token: &str) -> String {
    let len = token.chars().count();
    if len <= 8 {
        return format!("…(len={})", len);
    }
    let prefix: String = token.chars().take(6).collect();
    format!("{}…(len={})", prefix, len)
}

/// Log context.
#[derive(Debug, Clone, Default)]
pub struct TokenLogContext {
    /// Operation name.
    pub operation: Option<String>,
    /// Client ID.
    pub client_id: Option<String>,
    /// Redacted token.
    pub token: Option<String>,
    /// Additional context.
    pub extra: BTreeMap<String, String>,
}

impl TokenLogContext {
    /// Create new log context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set operation.
    pub fn operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Set client ID.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set token. Stored redacted.
    pub fn token(mut self, token: &str) -> Self {
        self.token = Some(redact_token(token));
        self
    }

    /// Add extra context.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Logger interface.
pub trait Logger: Send + Sync {
    /// Log at trace level.
    fn trace(&self, message: &str, context: &TokenLogContext);

    /// Log at debug level.
    fn debug(&self, message: &str, context: &TokenLogContext);

    /// Log at info level.
    fn info(&self, message: &str, context: &TokenLogContext);

    /// Log at warn level.
    fn warn(&self, message: &str, context: &TokenLogContext);

    /// Log at error level.
    fn error(&self, message: &str, context: &TokenLogContext);

    /// Check if a log level is enabled.
    fn is_enabled(&self, level: LogLevel) -> bool;
}

/// No-op logger implementation.
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    fn trace(&self, _message: &str, _context: &TokenLogContext) {}
    fn debug(&self, _message: &str, _context: &TokenLogContext) {}
    fn info(&self, _message: &str, _context: &TokenLogContext) {}
    fn warn(&self, _message: &str, _context: &TokenLogContext) {}
    fn error(&self, _message: &str, _context: &TokenLogContext) {}
    fn is_enabled(&self, _level: LogLevel) -> bool {
        false
    }
}

/// Logger forwarding to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

macro_rules! forward {
    ($macro:ident, $message:expr, $context:expr) => {
        tracing::$macro!(
            operation = $context.operation.as_deref().unwrap_or(""),
            client_id = $context.client_id.as_deref().unwrap_or(""),
            token = $context.token.as_deref().unwrap_or(""),
            extra = ?$context.extra,
            "{}",
            $message
        )
    };
}

impl Logger for TracingLogger {
    fn trace(&self, message: &str, context: &TokenLogContext) {
        forward!(trace, message, context);
    }

    fn debug(&self, message: &str, context: &TokenLogContext) {
        forward!(debug, message, context);
    }

    fn info(&self, message: &str, context: &TokenLogContext) {
        forward!(info, message, context);
    }

    fn warn(&self, message: &str, context: &TokenLogContext) {
        forward!(warn, message, context);
    }

    fn error(&self, message: &str, context: &TokenLogContext) {
        forward!(error, message, context);
    }

    fn is_enabled(&self, level: LogLevel) -> bool {
        match level {
            LogLevel::Trace => tracing::enabled!(tracing::Level::TRACE),
            LogLevel::Debug => tracing::enabled!(tracing::Level::DEBUG),
            LogLevel::Info => tracing::enabled!(tracing::Level::INFO),
            LogLevel::Warn => tracing::enabled!(tracing::Level::WARN),
            LogLevel::Error => tracing::enabled!(tracing::Level::ERROR),
        }
    }
}

/// Log entry for in-memory storage.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub context: TokenLogContext,
    pub timestamp: DateTime<Utc>,
}

/// In-memory logger for testing.
pub struct InMemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
    min_level: LogLevel,
}

impl InMemoryLogger {
    /// Create new in-memory logger.
    pub fn new() -> Self {
        Self::with_level(LogLevel::Trace)
    }

    /// Create in-memory logger with minimum level.
    pub fn with_level(min_level: LogLevel) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            min_level,
        }
    }

    /// Get all log entries.
    pub fn get_entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Get entries by level.
    pub fn get_entries_by_level(&self, level: LogLevel) -> Vec<LogEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.level == level)
            .cloned()
            .collect()
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    fn log(&self, level: LogLevel, message: &str, context: &TokenLogContext) {
        if level >= self.min_level {
            self.entries.lock().push(LogEntry {
                level,
                message: message.to_string(),
                context: context.clone(),
                timestamp: Utc::now(),
            });
        }
    }
}

impl Default for InMemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for InMemoryLogger {
    fn trace(&self, message: &str, context: &TokenLogContext) {
        self.log(LogLevel::Trace, message, context);
    }

    fn debug(&self, message: &str, context: &TokenLogContext) {
        self.log(LogLevel::Debug, message, context);
    }

    fn info(&self, message: &str, context: &TokenLogContext) {
        self.log(LogLevel::Info, message, context);
    }

    fn warn(&self, message: &str, context: &TokenLogContext) {
        self.log(LogLevel::Warn, message, context);
    }

    fn error(&self, message: &str, context: &TokenLogContext) {
        self.log(LogLevel::Error, message, context);
    }

    fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }
}
