//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for a docstruct run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocstructConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output sink configuration.
    pub export: ExportConfig,
}

/// Which extraction mechanism produces the field map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Engine {
    /// Table-driven pattern rules applied to the document text.
    #[default]
    Rules,
    /// Pre-built structured document standing in for an extraction service.
    Structured,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Extraction mechanism.
    pub engine: Engine,

    /// Collapse whitespace runs before matching rules.
    pub normalize_whitespace: bool,

    /// Custom rule file (JSON). Uses the built-in biography rules if unset.
    pub rules_file: Option<PathBuf>,

    /// Structured response document (JSON). Uses the built-in sample if unset.
    pub response_file: Option<PathBuf>,

    /// Number of rows the caller expects, for the completeness diagnostic.
    pub expected_rows: Option<usize>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            engine: Engine::Rules,
            normalize_whitespace: true,
            rules_file: None,
            response_file: None,
            expected_rows: None,
        }
    }
}

/// Output sink configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Worksheet name for spreadsheet output.
    pub sheet_name: String,

    /// Freeze the header row in spreadsheet output.
    pub freeze_header: bool,

    /// Width of the comment column in spreadsheet output.
    pub comment_column_width: f64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Sheet1".to_string(),
            freeze_header: true,
            comment_column_width: 80.0,
        }
    }
}

impl DocstructConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: DocstructConfig =
            serde_json::from_str(r#"{"extraction": {"engine": "structured", "expected_rows": 37}}"#)
                .unwrap();

        assert_eq!(config.extraction.engine, Engine::Structured);
        assert_eq!(config.extraction.expected_rows, Some(37));
        assert!(config.extraction.normalize_whitespace);
        assert_eq!(config.export.sheet_name, "Sheet1");
    }
}
