//! Field and row records produced by extraction and flattening.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single output value: text or a number.
///
/// "No value" is represented as empty text so that rows survive a JSON
/// round-trip unchanged. Whole numbers stay integers so that `35` is written
/// as `35` in every sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Whole number (ages, years given as numbers).
    Integer(i64),
    /// Numeric value (scores, CGPAs, fractions).
    Number(f64),
    /// Textual value.
    Text(String),
}

impl FieldValue {
    /// Create a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// The empty value.
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    /// Check whether this is empty text.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }

    /// Numeric view of the value, if it is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Lookup key for label and comment tables.
///
/// Rule fields use a bare `field_id`; structured fields are scoped by the
/// innermost object they were declared in (`current_role.salary`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldKey {
    /// Enclosing object name, if any.
    pub scope: Option<String>,
    /// Field name within the scope.
    pub name: String,
}

impl FieldKey {
    /// Key without a scope.
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            scope: None,
            name: name.into(),
        }
    }

    /// Key inside a named scope.
    pub fn scoped(scope: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            scope: Some(scope.into()),
            name: name.into(),
        }
    }

    /// `scope.name`, or just `name` for bare keys.
    pub fn qualified(&self) -> String {
        match &self.scope {
            Some(scope) => format!("{}.{}", scope, self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified())
    }
}

/// Outcome of applying one rule to the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedField {
    /// Id of the rule that produced this field.
    pub field_id: String,
    /// Captured text before any transform.
    pub raw_value: Option<String>,
    /// Transformed value (or the rule default when the transform failed).
    pub value: Option<FieldValue>,
    /// Whether the rule's pattern matched.
    pub matched: bool,
    /// Label declared by the rule.
    pub label: Option<String>,
    /// Comment rendered from the rule's comment template.
    pub comment: Option<String>,
}

impl ExtractedField {
    /// A field whose rule did not match.
    pub fn unmatched(field_id: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            raw_value: None,
            value: None,
            matched: false,
            label: None,
            comment: None,
        }
    }
}

/// One row of the final output.
///
/// Rows are created by the flattener only; the sequence number is a function
/// of the row's final position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayRow {
    #[serde(rename = "#")]
    sequence_number: usize,
    #[serde(rename = "Key")]
    label: String,
    #[serde(rename = "Value")]
    value: FieldValue,
    #[serde(rename = "Comments")]
    comment: String,
}

impl DisplayRow {
    pub(crate) fn new(
        sequence_number: usize,
        label: impl Into<String>,
        value: FieldValue,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            sequence_number,
            label: label.into(),
            value,
            comment: comment.into(),
        }
    }

    /// 1-based position in the output.
    pub fn sequence_number(&self) -> usize {
        self.sequence_number
    }

    /// Human-readable key.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Row value.
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Annotation text, possibly empty.
    pub fn comment(&self) -> &str {
        &self.comment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_value_display() {
        assert_eq!(FieldValue::Number(0.925).to_string(), "0.925");
        assert_eq!(FieldValue::Number(8.7).to_string(), "8.7");
        assert_eq!(FieldValue::text("INR").to_string(), "INR");
        assert!(FieldValue::empty().is_empty());
        assert!(!FieldValue::Number(0.0).is_empty());
        assert_eq!(FieldValue::Integer(35).to_string(), "35");
    }

    #[test]
    fn test_integers_stay_integers() {
        let row = DisplayRow::new(1, "Age", FieldValue::Integer(35), "");
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r##"{"#":1,"Key":"Age","Value":35,"Comments":""}"##);

        let back: DisplayRow = serde_json::from_str(&json).unwrap();
        assert_eq!(back.value(), &FieldValue::Integer(35));

        let float: FieldValue = serde_json::from_str("35.5").unwrap();
        assert_eq!(float, FieldValue::Number(35.5));
    }

    #[test]
    fn test_row_serializes_with_output_keys() {
        let row = DisplayRow::new(3, "Birth City", FieldValue::text("Jaipur"), "");
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(
            json,
            r##"{"#":3,"Key":"Birth City","Value":"Jaipur","Comments":""}"##
        );
    }

    #[test]
    fn test_row_keeps_numbers_numeric() {
        let row = DisplayRow::new(1, "Undergraduate CGPA", FieldValue::Number(8.7), "");
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["Value"], serde_json::json!(8.7));

        let back: DisplayRow = serde_json::from_value(json).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn test_field_key_qualified() {
        assert_eq!(FieldKey::bare("age").qualified(), "age");
        assert_eq!(
            FieldKey::scoped("current_role", "salary").qualified(),
            "current_role.salary"
        );
    }
}
