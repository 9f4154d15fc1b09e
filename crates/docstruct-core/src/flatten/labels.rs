//! Static label and comment lookup tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::record::FieldKey;

/// Human-readable labels keyed by qualified field key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelTable {
    entries: BTreeMap<String, String>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, builder style.
    pub fn with(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.insert(key, label);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, label: impl Into<String>) {
        self.entries.insert(key.into(), label.into());
    }

    pub fn get(&self, key: &FieldKey) -> Option<&str> {
        self.entries.get(&key.qualified()).map(String::as_str)
    }

    /// Table label, or the title-cased field name.
    pub fn resolve(&self, key: &FieldKey) -> String {
        self.get(key)
            .map(str::to_string)
            .unwrap_or_else(|| title_case(&key.name))
    }

    /// Label for the `n`th (1-based) item of the list stored under `list`.
    pub fn resolve_item(&self, list: &str, n: usize) -> String {
        let singular = self
            .get(&FieldKey::bare(list))
            .map(str::to_string)
            .unwrap_or_else(|| title_case(list));
        format!("{} {}", singular, n)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Annotation text keyed by qualified field key or `list.N`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentTable {
    entries: BTreeMap<String, String>,
}

impl CommentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, builder style.
    pub fn with(mut self, key: impl Into<String>, comment: impl Into<String>) -> Self {
        self.insert(key, comment);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, comment: impl Into<String>) {
        self.entries.insert(key.into(), comment.into());
    }

    pub fn get(&self, key: &FieldKey) -> Option<&str> {
        self.entries.get(&key.qualified()).map(String::as_str)
    }

    /// Table comment, or the empty string.
    pub fn resolve(&self, key: &FieldKey) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    /// Comment for the `n`th (1-based) item of a list.
    pub fn resolve_item(&self, list: &str, n: usize) -> String {
        self.resolve(&FieldKey::scoped(list, n.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fallback label: `marital_status` -> `Marital Status`.
///
/// Words are split on underscores; each word gets an upper-case first
/// character and lower-case remainder. Empty words are dropped.
pub fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("marital_status"), "Marital Status");
        assert_eq!(title_case("first_name"), "First Name");
        assert_eq!(title_case("CGPA"), "Cgpa");
        assert_eq!(title_case("12th_board_score"), "12th Board Score");
        assert_eq!(title_case("__end_year_"), "End Year");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_label_resolution() {
        let labels = LabelTable::new()
            .with("current_role.salary", "Current Salary")
            .with("age", "Age");

        assert_eq!(labels.resolve(&FieldKey::scoped("current_role", "salary")), "Current Salary");
        assert_eq!(labels.resolve(&FieldKey::bare("age")), "Age");
        assert_eq!(labels.resolve(&FieldKey::scoped("first_role", "salary")), "Salary");
        assert_eq!(labels.resolve(&FieldKey::bare("marital_status")), "Marital Status");
    }

    #[test]
    fn test_list_item_labels() {
        let labels = LabelTable::new().with("certifications", "Certification");
        assert_eq!(labels.resolve_item("certifications", 2), "Certification 2");
        assert_eq!(labels.resolve_item("awards", 1), "Awards 1");
    }

    #[test]
    fn test_comment_resolution() {
        let comments = CommentTable::new()
            .with("personal_info.blood_group", "Emergency contact purposes.")
            .with("certifications.1", "First one");

        assert_eq!(
            comments.resolve(&FieldKey::scoped("personal_info", "blood_group")),
            "Emergency contact purposes."
        );
        assert_eq!(comments.resolve(&FieldKey::scoped("personal_info", "age")), "");
        assert_eq!(comments.resolve_item("certifications", 1), "First one");
        assert_eq!(comments.resolve_item("certifications", 2), "");
    }
}
