//! Flattening of field maps into numbered display rows.

mod labels;

pub use labels::{CommentTable, LabelTable, title_case};

use serde_json::{Map, Value};
use tracing::debug;

use crate::extract::{FieldSource, StructuredRecord};
use crate::models::record::{DisplayRow, ExtractedField, FieldKey, FieldValue};

/// How a category of a structured document becomes rows.
#[derive(Debug, Clone, Copy)]
enum Layout {
    /// One row per leaf field, nested objects in declaration order.
    Fields,
    /// One row per list item, labelled `<singular> N`.
    List,
    /// One row whose comment carries the text and whose value is empty.
    Summary,
}

struct Category {
    path: &'static [&'static str],
    layout: Layout,
}

/// Fixed category order for structured documents.
const CATEGORY_ORDER: &[Category] = &[
    Category { path: &["personal_info"], layout: Layout::Fields },
    Category { path: &["professional_career", "first_role"], layout: Layout::Fields },
    Category { path: &["professional_career", "current_role"], layout: Layout::Fields },
    Category { path: &["professional_career", "previous_role"], layout: Layout::Fields },
    Category { path: &["education"], layout: Layout::Fields },
    Category { path: &["certifications"], layout: Layout::List },
    Category { path: &["technical_proficiency"], layout: Layout::Summary },
];

/// Whether a top-level category flattens to a single summary row.
pub(crate) fn is_summary_category(key: &str) -> bool {
    CATEGORY_ORDER
        .iter()
        .any(|c| matches!(c.layout, Layout::Summary) && c.path == [key])
}

/// Row content before numbering.
struct PendingRow {
    label: String,
    value: FieldValue,
    comment: String,
}

/// Flatten a field source into rows numbered `1..=n` in output order.
pub fn flatten(source: &FieldSource, labels: &LabelTable, comments: &CommentTable) -> Vec<DisplayRow> {
    let pending = match source {
        FieldSource::Rules(fields) => rule_rows(fields, labels, comments),
        FieldSource::Structured(record) => structured_rows(record, labels, comments),
    };

    debug!("Flattened {} rows", pending.len());

    pending
        .into_iter()
        .enumerate()
        .map(|(i, row)| DisplayRow::new(i + 1, row.label, row.value, row.comment))
        .collect()
}

fn rule_rows(fields: &[ExtractedField], labels: &LabelTable, comments: &CommentTable) -> Vec<PendingRow> {
    fields
        .iter()
        .filter(|field| field.matched)
        .map(|field| {
            let key = FieldKey::bare(&field.field_id);
            PendingRow {
                label: field.label.clone().unwrap_or_else(|| labels.resolve(&key)),
                value: field.value.clone().unwrap_or_default(),
                comment: field.comment.clone().unwrap_or_else(|| comments.resolve(&key)),
            }
        })
        .collect()
}

fn structured_rows(record: &StructuredRecord, labels: &LabelTable, comments: &CommentTable) -> Vec<PendingRow> {
    let mut walker = Walker {
        labels,
        comments,
        rows: Vec::new(),
    };

    for category in CATEGORY_ORDER {
        if let Some(value) = record.get_path(category.path) {
            walker.category(category.path, value, category.layout);
        }
    }

    // Anything outside the fixed order follows it, in declaration order.
    for (key, value) in record.root() {
        let nested_fixed: Vec<&str> = CATEGORY_ORDER
            .iter()
            .filter(|c| c.path.len() > 1 && c.path[0] == key.as_str())
            .map(|c| c.path[1])
            .collect();

        if CATEGORY_ORDER.iter().any(|c| c.path == [key.as_str()]) {
            continue;
        }

        match value {
            Value::Object(map) if !nested_fixed.is_empty() => {
                for (child, child_value) in map {
                    if !nested_fixed.contains(&child.as_str()) {
                        walker.value(key, child, child_value);
                    }
                }
            }
            _ => walker.category(&[key.as_str()], value, layout_for(value)),
        }
    }

    walker.rows
}

fn layout_for(value: &Value) -> Layout {
    match value {
        Value::Array(_) => Layout::List,
        _ => Layout::Fields,
    }
}

struct Walker<'a> {
    labels: &'a LabelTable,
    comments: &'a CommentTable,
    rows: Vec<PendingRow>,
}

impl Walker<'_> {
    fn category(&mut self, path: &[&str], value: &Value, layout: Layout) {
        let Some(name) = path.last().copied() else {
            return;
        };

        match (layout, value) {
            (Layout::Summary, value) => {
                let key = FieldKey::bare(name);
                self.rows.push(PendingRow {
                    label: self.labels.resolve(&key),
                    value: FieldValue::empty(),
                    comment: summary_text(value),
                });
            }
            (_, Value::Array(items)) => self.list(name, items),
            (_, Value::Object(map)) => self.object(name, map),
            (_, scalar_value) => self.leaf(FieldKey::bare(name), scalar(scalar_value)),
        }
    }

    fn object(&mut self, scope: &str, map: &Map<String, Value>) {
        for (key, value) in map {
            self.value(scope, key, value);
        }
    }

    fn value(&mut self, scope: &str, key: &str, value: &Value) {
        match value {
            Value::Object(map) => self.object(key, map),
            Value::Array(items) => self.list(key, items),
            other => self.leaf(FieldKey::scoped(scope, key), scalar(other)),
        }
    }

    fn list(&mut self, name: &str, items: &[Value]) {
        for (i, item) in items.iter().enumerate() {
            let n = i + 1;
            let value = match item {
                Value::Object(map) => map.get("name").map(scalar).unwrap_or_default(),
                other => scalar(other),
            };
            self.rows.push(PendingRow {
                label: self.labels.resolve_item(name, n),
                value,
                comment: self.comments.resolve_item(name, n),
            });
        }
    }

    fn leaf(&mut self, key: FieldKey, value: FieldValue) {
        self.rows.push(PendingRow {
            label: self.labels.resolve(&key),
            value,
            comment: self.comments.resolve(&key),
        });
    }
}

/// Summary text; list items are joined with commas.
fn summary_text(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| scalar(item).to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => scalar(other).to_string(),
    }
}

/// Convert a JSON scalar to an output value.
fn scalar(value: &Value) -> FieldValue {
    match value {
        Value::String(s) => FieldValue::text(s.as_str()),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => FieldValue::Integer(i),
            (None, Some(f)) => FieldValue::Number(f),
            (None, None) => FieldValue::text(n.to_string()),
        },
        Value::Bool(b) => FieldValue::text(b.to_string()),
        Value::Null => FieldValue::empty(),
        other => FieldValue::text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field(id: &str, value: &str, matched: bool) -> ExtractedField {
        ExtractedField {
            field_id: id.to_string(),
            raw_value: matched.then(|| value.to_string()),
            value: matched.then(|| FieldValue::text(value)),
            matched,
            label: None,
            comment: None,
        }
    }

    fn summary(rows: &[DisplayRow]) -> Vec<(usize, String, String, String)> {
        rows.iter()
            .map(|r| {
                (
                    r.sequence_number(),
                    r.label().to_string(),
                    r.value().to_string(),
                    r.comment().to_string(),
                )
            })
            .collect()
    }

    #[test]
    fn test_rule_rows_are_gapless_after_misses() {
        let fields = vec![
            field("first_name", "Alice", true),
            field("blood_group", "", false),
            field("birth_city", "Pune", true),
            field("nationality", "", false),
            field("birth_state", "Maharashtra", true),
        ];
        let labels = LabelTable::new().with("birth_city", "Birth City");
        let comments = CommentTable::new().with("birth_state", "State of birth");

        let rows = flatten(&FieldSource::Rules(fields), &labels, &comments);

        assert_eq!(
            summary(&rows),
            vec![
                (1, "First Name".to_string(), "Alice".to_string(), String::new()),
                (2, "Birth City".to_string(), "Pune".to_string(), String::new()),
                (3, "Birth State".to_string(), "Maharashtra".to_string(), "State of birth".to_string()),
            ]
        );
    }

    #[test]
    fn test_rule_label_and_comment_take_precedence() {
        let mut f = field("age", "35 years", true);
        f.label = Some("Age".to_string());
        f.comment = Some("As on year 2024.".to_string());
        let labels = LabelTable::new().with("age", "Ignored");
        let comments = CommentTable::new().with("age", "Ignored");

        let rows = flatten(&FieldSource::Rules(vec![f]), &labels, &comments);
        assert_eq!(rows[0].label(), "Age");
        assert_eq!(rows[0].comment(), "As on year 2024.");
    }

    #[test]
    fn test_structured_category_order() {
        // Declared out of order on purpose.
        let record = StructuredRecord::from_json(
            r#"{
                "technical_proficiency": "Rust and SQL",
                "certifications": [{"name": "AWS", "year": "2019"}, {"name": "Azure"}],
                "education": {
                    "high_school": "St. Mary's",
                    "undergraduate": {"degree": "B.Tech", "cgpa": 8.7}
                },
                "professional_career": {
                    "previous_role": {"organization": "LakeCorp"},
                    "current_role": {"organization": "Resse"},
                    "first_role": {"designation": "Junior Developer"}
                },
                "personal_info": {"first_name": "Alice", "marital_status": "single"}
            }"#,
        )
        .unwrap();
        let labels = LabelTable::new()
            .with("personal_info.first_name", "First Name")
            .with("current_role.organization", "Current Organization")
            .with("undergraduate.cgpa", "Undergraduate CGPA")
            .with("certifications", "Certification");
        let comments = CommentTable::new()
            .with("certifications.2", "Second certification")
            .with("undergraduate.cgpa", "On a 10-point scale");

        let rows = flatten(&FieldSource::Structured(record), &labels, &comments);
        let labels: Vec<_> = rows.iter().map(|r| r.label()).collect();

        assert_eq!(
            labels,
            vec![
                "First Name",
                "Marital Status",
                "Designation",
                "Current Organization",
                "Organization",
                "High School",
                "Degree",
                "Undergraduate CGPA",
                "Certification 1",
                "Certification 2",
                "Technical Proficiency",
            ]
        );

        let numbers: Vec<_> = rows.iter().map(|r| r.sequence_number()).collect();
        assert_eq!(numbers, (1..=11).collect::<Vec<_>>());

        assert_eq!(rows[7].value(), &FieldValue::Number(8.7));
        assert_eq!(rows[7].comment(), "On a 10-point scale");
        assert_eq!(rows[8].value(), &FieldValue::text("AWS"));
        assert_eq!(rows[9].comment(), "Second certification");
        assert!(rows[10].value().is_empty());
        assert_eq!(rows[10].comment(), "Rust and SQL");
    }

    #[test]
    fn test_unknown_categories_follow_fixed_order() {
        let record = StructuredRecord::from_json(
            r#"{
                "hobbies": ["chess", "running"],
                "personal_info": {"first_name": "Alice"},
                "professional_career": {"internship": {"organization": "Lab"}},
                "contact": {"email_address": "a@example.com"}
            }"#,
        )
        .unwrap();

        let rows = flatten(&FieldSource::Structured(record), &LabelTable::new(), &CommentTable::new());
        assert_eq!(
            summary(&rows),
            vec![
                (1, "First Name".to_string(), "Alice".to_string(), String::new()),
                (2, "Hobbies 1".to_string(), "chess".to_string(), String::new()),
                (3, "Hobbies 2".to_string(), "running".to_string(), String::new()),
                (4, "Organization".to_string(), "Lab".to_string(), String::new()),
                (5, "Email Address".to_string(), "a@example.com".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_list_summary_is_one_row() {
        let record = StructuredRecord::from_json(
            r#"{"personal_info": {"first_name": "A"}, "technical_proficiency": ["SQL", "Python", "Rust"]}"#,
        )
        .unwrap();
        let expected = record.field_count();

        let rows = flatten(&FieldSource::Structured(record), &LabelTable::new(), &CommentTable::new());
        assert_eq!(rows.len(), expected);
        assert_eq!(rows.len(), 2);
        assert!(rows[1].value().is_empty());
        assert_eq!(rows[1].comment(), "SQL, Python, Rust");
    }

    #[test]
    fn test_object_summary_is_one_row() {
        let record = StructuredRecord::from_json(r#"{"technical_proficiency": {"languages": "Rust", "databases": "SQL"}}"#)
            .unwrap();
        let expected = record.field_count();

        let rows = flatten(&FieldSource::Structured(record), &LabelTable::new(), &CommentTable::new());
        assert_eq!(rows.len(), expected);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_row_count_matches_structured_fields() {
        let record = StructuredRecord::from_json(
            r#"{"personal_info": {"a": 1, "b": null}, "certifications": [{"name": "X"}], "notes": "n"}"#,
        )
        .unwrap();
        let expected = record.field_count();

        let rows = flatten(&FieldSource::Structured(record), &LabelTable::new(), &CommentTable::new());
        assert_eq!(rows.len(), expected);
        assert!(rows[1].value().is_empty());
    }
}
