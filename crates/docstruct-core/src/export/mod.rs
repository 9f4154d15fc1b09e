//! Output sinks: tabular files (xlsx, csv) and JSON.
//!
//! Every sink renders fully in memory and is then written through a
//! temporary file in the target directory, so a failed write never leaves a
//! partial file at the destination.

mod tabular;

pub use tabular::{render_csv, render_xlsx};

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::error::{DocstructError, ExportError, Result};
use crate::models::config::ExportConfig;
use crate::models::log::{ProcessingLog, Stage};
use crate::models::record::DisplayRow;

/// Column headers of the tabular output.
pub const HEADERS: [&str; 4] = ["#", "Key", "Value", "Comments"];

/// Tabular file format, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularFormat {
    Xlsx,
    Csv,
}

impl TabularFormat {
    pub fn from_path(path: &Path) -> std::result::Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            other => Err(ExportError::UnsupportedFormat(if other.is_empty() {
                "(no extension)".to_string()
            } else {
                other.to_string()
            })),
        }
    }
}

/// An output destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    Tabular(PathBuf),
    Json(PathBuf),
}

impl Sink {
    pub fn path(&self) -> &Path {
        match self {
            Self::Tabular(path) | Self::Json(path) => path,
        }
    }
}

impl fmt::Display for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tabular(path) => write!(f, "table {}", path.display()),
            Self::Json(path) => write!(f, "json {}", path.display()),
        }
    }
}

/// Write rows to a tabular file with header `#, Key, Value, Comments`.
pub fn export_tabular(rows: &[DisplayRow], path: &Path, config: &ExportConfig) -> Result<()> {
    let bytes = TabularFormat::from_path(path)
        .and_then(|format| match format {
            TabularFormat::Xlsx => render_xlsx(rows, config),
            TabularFormat::Csv => render_csv(rows),
        })
        .map_err(|source| sink_error(path, source))?;

    write_atomic(path, &bytes)?;
    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Write rows as a pretty-printed JSON array of objects.
pub fn export_json(rows: &[DisplayRow], path: &Path) -> Result<()> {
    let mut bytes = serde_json::to_vec_pretty(rows).map_err(|e| sink_error(path, e.into()))?;
    bytes.push(b'\n');

    write_atomic(path, &bytes)?;
    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Outcome of writing a set of sinks.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, DocstructError)>,
}

impl ExportReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Write every sink, continuing past failures.
///
/// Failures are recorded in the report and in `log`.
pub fn export_all(
    rows: &[DisplayRow],
    sinks: &[Sink],
    config: &ExportConfig,
    log: &mut ProcessingLog,
) -> ExportReport {
    let mut report = ExportReport::default();

    for sink in sinks {
        let result = match sink {
            Sink::Tabular(path) => export_tabular(rows, path, config),
            Sink::Json(path) => export_json(rows, path),
        };

        match result {
            Ok(()) => {
                log.info(Stage::Export, format!("wrote {}", sink));
                report.written.push(sink.path().to_path_buf());
            }
            Err(e) => {
                warn!("Failed to write {}: {}", sink, e);
                log.sink_error(e.to_string());
                report.failed.push((sink.path().to_path_buf(), e));
            }
        }
    }

    report
}

fn sink_error(path: &Path, source: ExportError) -> DocstructError {
    DocstructError::SinkWrite {
        path: path.to_path_buf(),
        source,
    }
}

/// Write `bytes` to `path` via a temporary file in the same directory.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|e| sink_error(path, e.into()))?;
    file.write_all(bytes).map_err(|e| sink_error(path, e.into()))?;
    file.flush().map_err(|e| sink_error(path, e.into()))?;
    file.persist(path).map_err(|e| sink_error(path, e.error.into()))?;
    Ok(())
}
