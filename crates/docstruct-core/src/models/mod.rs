//! Data models shared across the pipeline.

pub mod config;
pub mod log;
pub mod record;

pub use config::{DocstructConfig, Engine, ExportConfig, ExtractionConfig};
pub use log::{LogEntry, LogKind, ProcessingLog, Stage, Status};
pub use record::{DisplayRow, ExtractedField, FieldKey, FieldValue};
