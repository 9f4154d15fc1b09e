//! Pre-built structured documents standing in for an extraction service.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::info;

use super::{Extraction, FieldExtractor, FieldSource};
use crate::error::{DocstructError, Result};
use crate::flatten::is_summary_category;
use crate::models::log::{ProcessingLog, Stage};

/// A category-keyed nested document, e.g. `personal_info`, `education`.
///
/// Key order is the declaration order of the source JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredRecord {
    root: Map<String, Value>,
}

impl StructuredRecord {
    /// Wrap a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(DocstructError::Structured(format!(
                "expected a top-level object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Parse a structured document from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Load a structured document from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Look up a nested value by object path.
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.root.get(*first)?;
        for key in rest {
            current = current.as_object()?.get(*key)?;
        }
        Some(current)
    }

    /// Number of leaf values and list items in the document.
    ///
    /// A summary category such as `technical_proficiency` counts once,
    /// whatever its shape.
    pub fn field_count(&self) -> usize {
        self.root
            .iter()
            .map(|(key, value)| if is_summary_category(key) { 1 } else { count_leaves(value) })
            .sum()
    }
}

fn count_leaves(value: &Value) -> usize {
    match value {
        Value::Object(map) => map.values().map(count_leaves).sum(),
        Value::Array(items) => items.len(),
        _ => 1,
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Extractor that returns a fixed structured document for any input.
///
/// No model is invoked; the document is what a real extraction service would
/// have returned for the sample biography.
#[derive(Debug, Clone)]
pub struct StructuredExtractor {
    record: StructuredRecord,
}

impl StructuredExtractor {
    pub fn new(record: StructuredRecord) -> Self {
        Self { record }
    }

    pub fn record(&self) -> &StructuredRecord {
        &self.record
    }
}

impl FieldExtractor for StructuredExtractor {
    fn name(&self) -> &str {
        "structured"
    }

    fn extract(&self, text: &str) -> Result<Extraction> {
        if text.trim().is_empty() {
            return Err(DocstructError::EmptyInput);
        }

        info!("Using structured response for {} characters of text", text.len());

        let mut log = ProcessingLog::new();
        for (category, value) in self.record.root() {
            let message = match value {
                Value::Object(map) => format!("{}: {} items", category, map.len()),
                Value::Array(items) => format!("{}: {} items", category, items.len()),
                _ => format!("{}: text content", category),
            };
            log.info(Stage::Extract, message);
        }

        Ok(Extraction {
            source: FieldSource::Structured(self.record.clone()),
            log,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOC: &str = r#"{
        "personal_info": {"first_name": "Alice", "last_name": "Smith"},
        "professional_career": {"current_role": {"organization": "Acme", "salary": "100"}},
        "certifications": [{"name": "A"}, {"name": "B"}],
        "technical_proficiency": "Rust"
    }"#;

    #[test]
    fn test_preserves_declaration_order() {
        let record = StructuredRecord::from_json(DOC).unwrap();
        let keys: Vec<_> = record.root().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["personal_info", "professional_career", "certifications", "technical_proficiency"]
        );
    }

    #[test]
    fn test_get_path_and_count() {
        let record = StructuredRecord::from_json(DOC).unwrap();
        assert_eq!(
            record.get_path(&["professional_career", "current_role", "organization"]),
            Some(&Value::String("Acme".to_string()))
        );
        assert_eq!(record.get_path(&["professional_career", "first_role"]), None);
        assert_eq!(record.field_count(), 7);
    }

    #[test]
    fn test_rejects_non_object() {
        let err = StructuredRecord::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, DocstructError::Structured(_)));
    }

    #[test]
    fn test_extractor_logs_categories() {
        let extractor = StructuredExtractor::new(StructuredRecord::from_json(DOC).unwrap());
        let extraction = extractor.extract("Alice Smith was born.").unwrap();

        let messages: Vec<_> = extraction.log.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "personal_info: 2 items",
                "professional_career: 1 items",
                "certifications: 2 items",
                "technical_proficiency: text content",
            ]
        );
        assert!(extractor.extract("").is_err());
    }
}
