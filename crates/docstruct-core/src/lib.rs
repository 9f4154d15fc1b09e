//! Core library for turning unstructured biography text into numbered
//! key/value rows.
//!
//! This crate provides:
//! - Table-driven field extraction with regex rules and value transforms
//! - A structured-document source standing in for an extraction service
//! - Flattening into `#, Key, Value, Comments` rows with label and comment tables
//! - Spreadsheet (xlsx, csv) and JSON sinks with atomic writes
//! - Text and PDF input loading

pub mod error;
pub mod export;
pub mod extract;
pub mod flatten;
pub mod models;
pub mod pipeline;
pub mod profiles;
pub mod source;

pub use error::{DocstructError, ExportError, Result, SourceError};
pub use export::{ExportReport, Sink, export_json, export_tabular};
pub use extract::{
    Extraction, FieldExtractor, FieldRule, FieldSource, RuleDefinition, RuleExtractor, RuleSet,
    StructuredExtractor, StructuredRecord, Transform,
};
pub use flatten::{CommentTable, LabelTable, flatten};
pub use models::{
    DisplayRow, DocstructConfig, Engine, ExportConfig, ExtractedField, ExtractionConfig, FieldValue,
    ProcessingLog,
};
pub use pipeline::{Pipeline, RunOutput, RunSummary};
