//! Append-only processing log shared by all pipeline stages.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

/// Pipeline stage that produced a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Load,
    Extract,
    Flatten,
    Export,
}

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
    Warning,
    Error,
}

/// What a log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    /// Progress message.
    Info,
    /// A rule's pattern did not match; the field is omitted.
    NoMatch,
    /// A matched value failed its transform; the rule default was used.
    TransformError,
    /// One output sink could not be written.
    SinkWrite,
}

/// A single log entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub stage: Stage,
    pub status: Status,
    pub kind: LogKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_id: Option<String>,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.status {
            Status::Ok => "ok",
            Status::Warning => "warn",
            Status::Error => "error",
        };
        match &self.field_id {
            Some(field) => write!(f, "[{:?}/{}] {}: {}", self.stage, marker, field, self.message),
            None => write!(f, "[{:?}/{}] {}", self.stage, marker, self.message),
        }
    }
}

/// Ordered log of everything that happened during one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProcessingLog {
    entries: Vec<LogEntry>,
}

impl ProcessingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a progress message.
    pub fn info(&mut self, stage: Stage, message: impl Into<String>) {
        self.push(LogEntry {
            stage,
            status: Status::Ok,
            kind: LogKind::Info,
            field_id: None,
            message: message.into(),
        });
    }

    /// Record a rule that did not match.
    pub fn no_match(&mut self, field_id: &str, message: impl Into<String>) {
        self.push(LogEntry {
            stage: Stage::Extract,
            status: Status::Warning,
            kind: LogKind::NoMatch,
            field_id: Some(field_id.to_string()),
            message: message.into(),
        });
    }

    /// Record a transform failure.
    pub fn transform_error(&mut self, field_id: &str, message: impl Into<String>) {
        self.push(LogEntry {
            stage: Stage::Extract,
            status: Status::Error,
            kind: LogKind::TransformError,
            field_id: Some(field_id.to_string()),
            message: message.into(),
        });
    }

    /// Record a failed sink.
    pub fn sink_error(&mut self, message: impl Into<String>) {
        self.push(LogEntry {
            stage: Stage::Export,
            status: Status::Error,
            kind: LogKind::SinkWrite,
            field_id: None,
            message: message.into(),
        });
    }

    /// Append an entry, mirroring it to `tracing`.
    pub fn push(&mut self, entry: LogEntry) {
        match entry.status {
            Status::Ok => debug!("{}", entry),
            Status::Warning => info!("{}", entry),
            Status::Error => warn!("{}", entry),
        }
        self.entries.push(entry);
    }

    /// Append all entries of another log, preserving order.
    pub fn extend(&mut self, other: ProcessingLog) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries of the given kind.
    pub fn count(&self, kind: LogKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    /// Entries that are not plain progress messages.
    pub fn issues(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|e| e.status != Status::Ok)
    }

    /// Find the entry of `kind` recorded for `field_id`.
    pub fn find(&self, kind: LogKind, field_id: &str) -> Option<&LogEntry> {
        self.entries
            .iter()
            .find(|e| e.kind == kind && e.field_id.as_deref() == Some(field_id))
    }
}
