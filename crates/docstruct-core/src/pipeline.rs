//! End-to-end run: load, extract, flatten, export.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::{DocstructError, Result};
use crate::export::{ExportReport, Sink, export_all};
use crate::extract::{FieldExtractor, RuleExtractor, RuleSet, StructuredExtractor, StructuredRecord};
use crate::flatten::{CommentTable, LabelTable, flatten};
use crate::models::config::{Engine, ExportConfig, ExtractionConfig};
use crate::models::log::{LogKind, ProcessingLog, Stage};
use crate::models::record::DisplayRow;
use crate::profiles::biography;
use crate::source;

/// Counts describing one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub total_rows: usize,
    /// Matched rules; `None` for structured sources.
    pub matched: Option<usize>,
    /// Unmatched rules; `None` for structured sources.
    pub unmatched: Option<usize>,
    pub transform_errors: usize,
    pub expected_rows: Option<usize>,
}

impl RunSummary {
    /// `total_rows / expected_rows`, when an expectation was declared.
    pub fn completeness(&self) -> Option<f64> {
        match self.expected_rows {
            Some(0) | None => None,
            Some(expected) => Some(self.total_rows as f64 / expected as f64),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.expected_rows.is_none_or(|expected| self.total_rows == expected)
    }
}

/// Result of [`Pipeline::run`].
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub rows: Vec<DisplayRow>,
    pub log: ProcessingLog,
    pub summary: RunSummary,
}

/// Extraction pipeline with its flattening tables.
pub struct Pipeline {
    extractor: Box<dyn FieldExtractor>,
    labels: LabelTable,
    comments: CommentTable,
    expected_rows: Option<usize>,
}

impl Pipeline {
    /// Create a pipeline with empty label and comment tables.
    pub fn new(extractor: Box<dyn FieldExtractor>) -> Self {
        Self {
            extractor,
            labels: LabelTable::new(),
            comments: CommentTable::new(),
            expected_rows: None,
        }
    }

    /// Build the pipeline described by `config`, defaulting to the
    /// biography profile.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        if config.expected_rows == Some(0) {
            return Err(DocstructError::Config("expected_rows must be at least 1".to_string()));
        }

        let extractor: Box<dyn FieldExtractor> = match config.engine {
            Engine::Rules => {
                let rules = match &config.rules_file {
                    Some(path) => {
                        info!("Loading rules from {}", path.display());
                        RuleSet::from_file(path)?
                    }
                    None => biography::rule_set()?,
                };
                Box::new(RuleExtractor::new(rules).with_whitespace_normalization(config.normalize_whitespace))
            }
            Engine::Structured => {
                let record = match &config.response_file {
                    Some(path) => {
                        info!("Loading structured response from {}", path.display());
                        StructuredRecord::from_file(path)?
                    }
                    None => biography::sample_response()?,
                };
                Box::new(StructuredExtractor::new(record))
            }
        };

        Ok(Self::new(extractor)
            .with_labels(biography::labels())
            .with_comments(biography::comments())
            .with_expected_rows(config.expected_rows))
    }

    pub fn with_labels(mut self, labels: LabelTable) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_comments(mut self, comments: CommentTable) -> Self {
        self.comments = comments;
        self
    }

    /// Declare the row count used for the completeness diagnostic.
    pub fn with_expected_rows(mut self, expected: Option<usize>) -> Self {
        self.expected_rows = expected;
        self
    }

    pub fn extractor_name(&self) -> &str {
        self.extractor.name()
    }

    /// Extract and flatten a document's text.
    pub fn run(&self, text: &str) -> Result<RunOutput> {
        if text.trim().is_empty() {
            return Err(DocstructError::EmptyInput);
        }

        let mut log = ProcessingLog::new();
        log.info(
            Stage::Extract,
            format!("extracting with the {} engine", self.extractor.name()),
        );

        let extraction = self.extractor.extract(text)?;
        log.extend(extraction.log);

        let rows = flatten(&extraction.source, &self.labels, &self.comments);
        log.info(Stage::Flatten, format!("flattened {} rows", rows.len()));

        let (matched, unmatched) = match extraction.source.matched_counts() {
            Some((matched, unmatched)) => (Some(matched), Some(unmatched)),
            None => (None, None),
        };

        let summary = RunSummary {
            total_rows: rows.len(),
            matched,
            unmatched,
            transform_errors: log.count(LogKind::TransformError),
            expected_rows: self.expected_rows,
        };

        info!("Extracted {} rows", summary.total_rows);
        Ok(RunOutput { rows, log, summary })
    }

    /// Load a document from disk and run it.
    pub fn run_file(&self, path: &Path) -> Result<RunOutput> {
        let text = source::load_text(path)?;
        let mut output = self.run(&text)?;

        let mut log = ProcessingLog::new();
        log.info(Stage::Load, format!("loaded {} characters from {}", text.len(), path.display()));
        log.extend(output.log);
        output.log = log;

        Ok(output)
    }

    /// Write rows to every sink; see [`export_all`].
    pub fn export(
        &self,
        rows: &[DisplayRow],
        sinks: &[Sink],
        config: &ExportConfig,
        log: &mut ProcessingLog,
    ) -> ExportReport {
        export_all(rows, sinks, config, log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::RuleDefinition;
    use crate::models::record::FieldValue;
    use pretty_assertions::assert_eq;

    fn alice_pipeline() -> Pipeline {
        let birth_place = r"in\s+(\w+),\s+(\w+)";
        let rules = RuleSet::from_definitions(vec![
            RuleDefinition::new("first_name", r"^(\w+)\s+(\w+)\s+was\s+born"),
            RuleDefinition::new("last_name", r"^(\w+)\s+(\w+)\s+was\s+born").with_group(2),
            RuleDefinition::new("birth_city", birth_place),
            RuleDefinition::new("birth_state", birth_place).with_group(2),
        ])
        .unwrap();

        Pipeline::new(Box::new(RuleExtractor::new(rules))).with_expected_rows(Some(4))
    }

    #[test]
    fn test_alice_run() {
        let output = alice_pipeline()
            .run("Alice Smith was born on March 3, 1990, in Pune, Maharashtra.")
            .unwrap();

        let rows: Vec<_> = output
            .rows
            .iter()
            .map(|r| (r.sequence_number(), r.label(), r.value().clone()))
            .collect();
        assert_eq!(
            rows,
            vec![
                (1, "First Name", FieldValue::text("Alice")),
                (2, "Last Name", FieldValue::text("Smith")),
                (3, "Birth City", FieldValue::text("Pune")),
                (4, "Birth State", FieldValue::text("Maharashtra")),
            ]
        );

        assert_eq!(output.summary.matched, Some(4));
        assert_eq!(output.summary.unmatched, Some(0));
        assert_eq!(output.summary.completeness(), Some(1.0));
        assert!(output.summary.is_complete());
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let pipeline = alice_pipeline();
        assert!(matches!(pipeline.run(""), Err(DocstructError::EmptyInput)));
        assert!(matches!(pipeline.run(" \n\t "), Err(DocstructError::EmptyInput)));
    }

    #[test]
    fn test_runs_are_idempotent() {
        let pipeline = Pipeline::from_config(&ExtractionConfig::default()).unwrap();
        let first = pipeline.run(biography::SAMPLE_TEXT).unwrap();
        let second = pipeline.run(biography::SAMPLE_TEXT).unwrap();

        assert_eq!(first.rows, second.rows);
        assert_eq!(first.summary, second.summary);
    }

    #[test]
    fn test_partial_match_completeness() {
        let pipeline = alice_pipeline().with_expected_rows(Some(37));
        let output = pipeline.run("Alice Smith was born yesterday.").unwrap();

        assert_eq!(output.rows.len(), 2);
        assert_eq!(output.summary.unmatched, Some(2));
        assert_eq!(output.summary.completeness(), Some(2.0 / 37.0));
        assert!(!output.summary.is_complete());
        assert_eq!(output.log.count(LogKind::NoMatch), 2);
    }

    #[test]
    fn test_structured_engine_from_config() {
        let config = ExtractionConfig {
            engine: Engine::Structured,
            expected_rows: Some(biography::EXPECTED_ROWS),
            ..ExtractionConfig::default()
        };
        let pipeline = Pipeline::from_config(&config).unwrap();
        assert_eq!(pipeline.extractor_name(), "structured");

        let output = pipeline.run("any non-empty document").unwrap();
        assert_eq!(output.rows.len(), biography::EXPECTED_ROWS);
        assert_eq!(output.summary.matched, None);
        assert!(output.summary.is_complete());
    }

    #[test]
    fn test_run_file_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bio.txt");
        std::fs::write(&input, biography::SAMPLE_TEXT).unwrap();

        let pipeline = Pipeline::from_config(&ExtractionConfig::default()).unwrap();
        let mut output = pipeline.run_file(&input).unwrap();
        assert_eq!(output.log.entries()[0].stage, Stage::Load);

        let sinks = vec![
            Sink::Tabular(dir.path().join("out.xlsx")),
            Sink::Json(dir.path().join("out.json")),
        ];
        let report = pipeline.export(&output.rows, &sinks, &ExportConfig::default(), &mut output.log);
        assert!(report.is_success());

        let json = std::fs::read_to_string(dir.path().join("out.json")).unwrap();
        let rows: Vec<DisplayRow> = serde_json::from_str(&json).unwrap();
        assert_eq!(rows, output.rows);
    }

    #[test]
    fn test_zero_expected_rows_rejected() {
        let config = ExtractionConfig {
            expected_rows: Some(0),
            ..ExtractionConfig::default()
        };
        assert!(matches!(Pipeline::from_config(&config), Err(DocstructError::Config(_))));
    }

    #[test]
    fn test_missing_rules_file_is_an_error() {
        let config = ExtractionConfig {
            rules_file: Some("/nonexistent/rules.json".into()),
            ..ExtractionConfig::default()
        };
        assert!(matches!(Pipeline::from_config(&config), Err(DocstructError::Io(_))));
    }
}
