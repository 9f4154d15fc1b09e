//! Error types for the docstruct-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the docstruct library.
#[derive(Error, Debug)]
pub enum DocstructError {
    /// The input document is missing or contains only whitespace.
    #[error("input document is empty")]
    EmptyInput,

    /// A rule definition could not be compiled.
    #[error("invalid rule {field_id}: {reason}")]
    InvalidRule { field_id: String, reason: String },

    /// Two rules in the same rule set share a field id.
    #[error("duplicate field id in rule set: {0}")]
    DuplicateField(String),

    /// The structured document does not have the expected shape.
    #[error("malformed structured document: {0}")]
    Structured(String),

    /// Loading the input document failed.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Writing an output sink failed.
    #[error("failed to write {}: {source}", path.display())]
    SinkWrite {
        path: PathBuf,
        #[source]
        source: ExportError,
    },

    /// JSON (de)serialization error for rule files and documents.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to reading the input document.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension is not a supported input format.
    #[error("unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    PdfParse(String),

    /// Failed to extract text from the PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Underlying cause of a sink write failure.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Spreadsheet rendering failed.
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// CSV rendering failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON rendering failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension does not name a tabular format.
    #[error("unsupported tabular format: {0}")]
    UnsupportedFormat(String),

    /// Writing or renaming the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the docstruct library.
pub type Result<T> = std::result::Result<T, DocstructError>;
