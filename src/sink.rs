//! Log sinks for advice handlers.
//!
//! Handlers never reach for a global logger; they emit through the sink the
//! registry was built with.
//!
//! Implementations:
//! - `TracingSink`: forwards to `tracing` events
//! - `MemorySink`: records messages in memory for testing

use std::sync::{Mutex, MutexGuard};

use tracing::Level;

use crate::error::SinkError;

/// Target used for events emitted by [`TracingSink`].
pub const ADVICE_TARGET: &str = "interpose::advice";

/// Accepts leveled, already-formatted messages.
pub trait LogSink: Send + Sync {
    /// Whether a message at `level` would be recorded.
    fn enabled(&self, level: Level) -> bool;

    /// Emit a message at `level`.
    fn emit(&self, level: Level, message: &str) -> Result<(), SinkError>;
}

/// Sink that forwards messages to the active `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl LogSink for TracingSink {
    fn enabled(&self, level: Level) -> bool {
        match level {
            Level::ERROR => tracing::enabled!(target: ADVICE_TARGET, Level::ERROR),
            Level::WARN => tracing::enabled!(target: ADVICE_TARGET, Level::WARN),
            Level::INFO => tracing::enabled!(target: ADVICE_TARGET, Level::INFO),
            Level::DEBUG => tracing::enabled!(target: ADVICE_TARGET, Level::DEBUG),
            _ => tracing::enabled!(target: ADVICE_TARGET, Level::TRACE),
        }
    }

    fn emit(&self, level: Level, message: &str) -> Result<(), SinkError> {
        match level {
            Level::ERROR => tracing::error!(target: ADVICE_TARGET, "{}", message),
            Level::WARN => tracing::warn!(target: ADVICE_TARGET, "{}", message),
            Level::INFO => tracing::info!(target: ADVICE_TARGET, "{}", message),
            Level::DEBUG => tracing::debug!(target: ADVICE_TARGET, "{}", message),
            _ => tracing::trace!(target: ADVICE_TARGET, "{}", message),
        }
        Ok(())
    }
}

/// One message captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
}

#[derive(Debug)]
struct MemoryState {
    records: Vec<LogRecord>,
    min_level: Level,
    fail_on_emit: bool,
}

/// Sink that keeps every message in memory.
///
/// `set_fail_on_emit` makes every emission fail, for exercising the
/// "logging failures are fatal" path.
#[derive(Debug)]
pub struct MemorySink {
    state: Mutex<MemoryState>,
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySink {
    /// Sink recording every level down to TRACE.
    pub fn new() -> Self {
        Self::with_level(Level::TRACE)
    }

    /// Sink recording only messages at `min_level` or more severe.
    pub fn with_level(min_level: Level) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                records: Vec::new(),
                min_level,
                fail_on_emit: false,
            }),
        }
    }

    pub fn set_fail_on_emit(&self, fail: bool) {
        self.state().fail_on_emit = fail;
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.state().records.clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.state()
            .records
            .iter()
            .map(|r| r.message.clone())
            .collect()
    }

    /// Messages recorded at exactly `level`.
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.state()
            .records
            .iter()
            .filter(|r| r.level == level)
            .map(|r| r.message.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.state().records.clear();
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LogSink for MemorySink {
    fn enabled(&self, level: Level) -> bool {
        // tracing orders levels by verbosity: TRACE > DEBUG > ... > ERROR.
        level <= self.state().min_level
    }

    fn emit(&self, level: Level, message: &str) -> Result<(), SinkError> {
        let mut state = self.state();
        if state.fail_on_emit {
            return Err(SinkError::Unavailable("memory sink set to fail".to_string()));
        }
        if level <= state.min_level {
            state.records.push(LogRecord {
                level,
                message: message.to_string(),
            });
        }
        Ok(())
    }
}
