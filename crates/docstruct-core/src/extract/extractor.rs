//! Single-pass rule extractor.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::info;

use super::rules::{FieldRule, RuleSet};
use super::{Extraction, FieldExtractor, FieldSource};
use crate::error::{DocstructError, Result};
use crate::models::log::{ProcessingLog, Stage};
use crate::models::record::ExtractedField;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Collapse every whitespace run into one space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

/// Apply every rule once, in declaration order.
///
/// Rules never see each other's output. A rule that does not match yields an
/// unmatched field and a `no_match` entry; a transform failure yields the
/// rule's declared default and a `transform_error` entry.
pub fn extract(text: &str, rules: &RuleSet) -> (Vec<ExtractedField>, ProcessingLog) {
    let mut log = ProcessingLog::new();
    let fields = rules.iter().map(|rule| apply_rule(rule, text, &mut log)).collect();
    (fields, log)
}

fn apply_rule(rule: &FieldRule, text: &str, log: &mut ProcessingLog) -> ExtractedField {
    let field_id = rule.field_id();

    let Some(caps) = rule.captures(text) else {
        log.no_match(field_id, "pattern did not match");
        return ExtractedField::unmatched(field_id);
    };

    let Some(selected) = rule.select(&caps) else {
        log.no_match(
            field_id,
            format!("group {} did not participate in the match", rule.definition().group),
        );
        return ExtractedField::unmatched(field_id);
    };

    let raw = selected.as_str().trim().to_string();
    let value = match rule.transform().apply(&raw, &caps) {
        Ok(value) => value,
        Err(reason) => {
            let fallback = rule.default_value().cloned().unwrap_or_default();
            log.transform_error(
                field_id,
                format!("{}; using default '{}'", reason, fallback),
            );
            fallback
        }
    };

    ExtractedField {
        field_id: field_id.to_string(),
        raw_value: Some(raw),
        value: Some(value),
        matched: true,
        label: rule.label().map(str::to_string),
        comment: rule.render_comment(&caps),
    }
}

/// Extractor backed by a compiled rule set.
#[derive(Debug, Clone)]
pub struct RuleExtractor {
    rules: RuleSet,
    normalize_whitespace: bool,
}

impl RuleExtractor {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            normalize_whitespace: true,
        }
    }

    /// Set whitespace normalization before matching.
    pub fn with_whitespace_normalization(mut self, normalize: bool) -> Self {
        self.normalize_whitespace = normalize;
        self
    }
}

impl FieldExtractor for RuleExtractor {
    fn name(&self) -> &str {
        "rules"
    }

    fn extract(&self, text: &str) -> Result<Extraction> {
        if text.trim().is_empty() {
            return Err(DocstructError::EmptyInput);
        }

        info!("Applying {} rules to {} characters of text", self.rules.len(), text.len());

        let prepared = if self.normalize_whitespace {
            normalize_whitespace(text)
        } else {
            text.to_string()
        };

        let (fields, mut log) = extract(&prepared, &self.rules);
        let matched = fields.iter().filter(|f| f.matched).count();
        log.info(
            Stage::Extract,
            format!("{} of {} rules matched", matched, fields.len()),
        );

        Ok(Extraction {
            source: FieldSource::Rules(fields),
            log,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::rules::RuleDefinition;
    use crate::extract::transform::Transform;
    use crate::models::log::LogKind;
    use crate::models::record::FieldValue;
    use pretty_assertions::assert_eq;

    fn rules() -> RuleSet {
        RuleSet::from_definitions(vec![
            RuleDefinition::new("first_name", r"^(\w+)\s+(\w+)\s+was\s+born").with_label("First Name"),
            RuleDefinition::new("blood_group", r"\b((?:AB|A|B|O)[+-])\s+blood\s+group"),
            RuleDefinition::new("date_of_birth", r"born\s+on\s+(\w+\s+\d{1,2},\s+\d{4})")
                .with_transform(Transform::date())
                .with_default("unknown"),
        ])
        .unwrap()
    }

    #[test]
    fn test_output_follows_rule_order() {
        let (fields, log) = extract("Alice Smith was born on June 5, 1990, in Pune.", &rules());

        let ids: Vec<_> = fields.iter().map(|f| f.field_id.as_str()).collect();
        assert_eq!(ids, vec!["first_name", "blood_group", "date_of_birth"]);
        assert!(fields[0].matched);
        assert_eq!(fields[0].value, Some(FieldValue::text("Alice")));
        assert_eq!(fields[2].value, Some(FieldValue::text("1990-06-05 00:00:00")));

        assert!(!fields[1].matched);
        assert!(log.find(LogKind::NoMatch, "blood_group").is_some());
    }

    #[test]
    fn test_transform_failure_uses_declared_default() {
        let (fields, log) = extract("Alice Smith was born on Smarch 45, 1990.", &rules());

        let dob = &fields[2];
        assert!(dob.matched);
        assert_eq!(dob.raw_value.as_deref(), Some("Smarch 45, 1990"));
        assert_eq!(dob.value, Some(FieldValue::text("unknown")));
        assert!(log.find(LogKind::TransformError, "date_of_birth").is_some());
    }

    #[test]
    fn test_optional_group_that_did_not_participate() {
        let rules = RuleSet::from_definitions(vec![
            RuleDefinition::new("age", r"(\d+)\s+years(?:\s+old\s+as\s+of\s+(\d{4}))?").with_group(2),
        ])
        .unwrap();

        let (fields, log) = extract("35 years young", &rules);
        assert!(!fields[0].matched);
        assert!(log.find(LogKind::NoMatch, "age").is_some());
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(
            normalize_whitespace("  St.\nXavier's   School,\tJaipur \n"),
            "St. Xavier's School, Jaipur"
        );
    }

    #[test]
    fn test_extractor_normalizes_wrapped_lines() {
        let rules = RuleSet::from_definitions(vec![RuleDefinition::new(
            "high_school",
            r"high\s+school\s+education\s+at\s+(.+?),\s+where",
        )])
        .unwrap();
        let text = "his high school education at St.\nXavier's School, Jaipur, where he";

        let extraction = RuleExtractor::new(rules.clone()).extract(text).unwrap();
        match extraction.source {
            FieldSource::Rules(fields) => {
                assert_eq!(fields[0].value, Some(FieldValue::text("St. Xavier's School, Jaipur")));
            }
            FieldSource::Structured(_) => panic!("expected rule fields"),
        }

        let raw = RuleExtractor::new(rules).with_whitespace_normalization(false);
        let extraction = raw.extract(text).unwrap();
        assert_eq!(extraction.source.matched_counts(), Some((0, 1)));
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = RuleExtractor::new(rules()).extract("  \n ").unwrap_err();
        assert!(matches!(err, DocstructError::EmptyInput));
    }
}
