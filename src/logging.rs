//! Logging collaborator handed to every core component.
//!
//! Components never reach for a global logger; they receive an
//! `Arc<dyn Logger>` at construction. `TracingLogger` is the production
//! implementation, `MemoryLogger` keeps entries around for inspection.

use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub context: String,
    pub message: String,
}

pub trait Logger: Send + Sync {
    fn log(&self, level: LogLevel, context: &str, message: &str);

    fn info(&self, context: &str, message: &str) {
        self.log(LogLevel::Info, context, message);
    }

    fn success(&self, context: &str, message: &str) {
        self.log(LogLevel::Success, context, message);
    }

    fn warn(&self, context: &str, message: &str) {
        self.log(LogLevel::Warn, context, message);
    }

    fn error(&self, context: &str, message: &str) {
        self.log(LogLevel::Error, context, message);
    }
}

/// Forwards to `tracing`, tagging each event with its context label.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, context: &str, message: &str) {
        match level {
            LogLevel::Info => tracing::info!(context, "{}", message),
            LogLevel::Success => tracing::info!(context, outcome = "success", "✅ {}", message),
            LogLevel::Warn => tracing::warn!(context, "⚠️ {}", message),
            LogLevel::Error => tracing::error!(context, "❌ {}", message),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn at_level(&self, level: LogLevel) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.level == level)
            .collect()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: LogLevel, context: &str, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(LogEntry {
                level,
                context: context.to_string(),
                message: message.to_string(),
            });
        }
    }
}

/// Installs the fmt subscriber. `RUST_LOG` wins over the `verbose` default.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
