//! In-memory [`Log`] backend for embedding and tests.
use std::sync::Mutex;

use super::types::{AppEntry, AppStatus, Log};

/// One captured log call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// [`Log::stage`]
    Stage(String),
    /// [`Log::info`]
    Info(String),
    /// [`Log::debug`]
    Debug(String),
    /// [`Log::warn`]
    Warn(String),
    /// [`Log::error`]
    Error(String),
    /// [`Log::dry_run`]
    DryRun(String),
}

/// A [`Log`] that keeps every event in memory instead of printing it.
#[derive(Debug, Default)]
pub struct MemoryLog {
    records: Mutex<Vec<Record>>,
    apps: Mutex<Vec<AppEntry>>,
}

impl MemoryLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured events in emission order.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// All recorded application results.
    #[must_use]
    pub fn apps(&self) -> Vec<AppEntry> {
        self.apps.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Messages logged at error level.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.records()
            .into_iter()
            .filter_map(|r| match r {
                Record::Error(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }

    fn push(&self, record: Record) {
        if let Ok(mut guard) = self.records.lock() {
            guard.push(record);
        }
    }
}

impl Log for MemoryLog {
    fn stage(&self, msg: &str) {
        self.push(Record::Stage(msg.to_string()));
    }

    fn info(&self, msg: &str) {
        self.push(Record::Info(msg.to_string()));
    }

    fn debug(&self, msg: &str) {
        self.push(Record::Debug(msg.to_string()));
    }

    fn warn(&self, msg: &str) {
        self.push(Record::Warn(msg.to_string()));
    }

    fn error(&self, msg: &str) {
        self.push(Record::Error(msg.to_string()));
    }

    fn dry_run(&self, msg: &str) {
        self.push(Record::DryRun(msg.to_string()));
    }

    fn record_app(&self, name: &str, status: AppStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.apps.lock() {
            guard.push(AppEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }
}
