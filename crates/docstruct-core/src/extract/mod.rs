//! Field extraction: pattern rules and structured sources.

mod extractor;
pub mod rules;
pub mod structured;
pub mod transform;

pub use extractor::{RuleExtractor, extract, normalize_whitespace};
pub use rules::{FieldRule, GroupSelector, RuleDefinition, RuleSet};
pub use structured::{StructuredExtractor, StructuredRecord};
pub use transform::Transform;

use crate::error::Result;
use crate::models::log::ProcessingLog;
use crate::models::record::ExtractedField;

/// Field map produced by an extractor, before flattening.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSource {
    /// One field per rule, in rule order.
    Rules(Vec<ExtractedField>),
    /// A nested category-keyed document.
    Structured(StructuredRecord),
}

impl FieldSource {
    /// `(matched, unmatched)` rule counts; `None` for structured sources.
    pub fn matched_counts(&self) -> Option<(usize, usize)> {
        match self {
            Self::Rules(fields) => {
                let matched = fields.iter().filter(|f| f.matched).count();
                Some((matched, fields.len() - matched))
            }
            Self::Structured(_) => None,
        }
    }
}

/// Output of one extraction call.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub source: FieldSource,
    pub log: ProcessingLog,
}

/// Trait for extraction mechanisms feeding the flattener.
pub trait FieldExtractor {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Extract the field map from document text.
    fn extract(&self, text: &str) -> Result<Extraction>;
}
