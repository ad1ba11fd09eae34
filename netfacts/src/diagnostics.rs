//! Diagnostic sink for discovery runs.
//!
//! Discovery never fails on bad data; instead it reports what it skipped
//! through a [`DiscoveryLog`]. The default [`LogFacade`] forwards to the
//! `log` crate, and [`CapturedLog`] keeps messages in memory so callers
//! (and tests) can inspect what happened during a run.

use std::sync::Mutex;

/// Log target used by [`LogFacade`].
pub const LOG_TARGET: &str = "netfacts::discovery";

/// Best-effort diagnostic capability injected into discovery.
///
/// Implementations must never panic or block for long; a failure to record
/// a message is not a failure of the calling operation.
pub trait DiscoveryLog: Send + Sync {
    /// Record an error (transport failure, undecodable output).
    fn error(&self, message: &str);

    /// Record an informational message (absent field, skipped stage).
    fn info(&self, message: &str);
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFacade;

impl DiscoveryLog for LogFacade {
    fn error(&self, message: &str) {
        log::error!(target: LOG_TARGET, "{}", message);
    }

    fn info(&self, message: &str) {
        log::info!(target: LOG_TARGET, "{}", message);
    }
}

/// Severity of a captured message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Info,
}

/// A message recorded by [`CapturedLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub level: Level,
    pub message: String,
}

/// In-memory sink that records every message.
#[derive(Debug, Default)]
pub struct CapturedLog {
    entries: Mutex<Vec<Entry>>,
}

impl CapturedLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded messages, oldest first.
    pub fn entries(&self) -> Vec<Entry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Messages recorded at `level`.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|e| e.level == level)
            .map(|e| e.message)
            .collect()
    }

    /// Whether any message at `level` contains `needle`.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.messages(level).iter().any(|m| m.contains(needle))
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn push(&self, level: Level, message: &str) {
        // A poisoned lock only means another thread panicked mid-push.
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(Entry {
                level,
                message: message.to_string(),
            });
        }
    }
}

impl DiscoveryLog for CapturedLog {
    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }

    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }
}
