//! Declarative field rules and compiled rule sets.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use regex::{Captures, Match, Regex};
use serde::{Deserialize, Serialize};

use super::transform::Transform;
use crate::error::{DocstructError, Result};
use crate::models::record::FieldValue;

/// Which capture group of a match holds the field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupSelector {
    /// Numbered group; 0 is the whole match.
    Index(usize),
    /// Named group.
    Name(String),
}

impl Default for GroupSelector {
    fn default() -> Self {
        Self::Index(1)
    }
}

impl fmt::Display for GroupSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{}", i),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for GroupSelector {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for GroupSelector {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

/// Serializable description of one field rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// Unique key of the field within its rule set.
    pub field_id: String,

    /// Regular expression applied to the document text.
    pub pattern: String,

    /// Capture group holding the value.
    #[serde(default)]
    pub group: GroupSelector,

    /// Transform applied to the captured text.
    #[serde(default)]
    pub transform: Transform,

    /// Output label. Falls back to the label table, then to the field id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Comment template; may reference capture groups as `${n}` or
    /// `${name}`. A literal dollar sign is written `$$`; a bare `$USD` is read
    /// as a reference to a group named `USD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Value used when the transform fails. Required for fallible transforms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<FieldValue>,
}

impl RuleDefinition {
    /// Rule taking group 1 of `pattern` verbatim.
    pub fn new(field_id: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            pattern: pattern.into(),
            group: GroupSelector::default(),
            transform: Transform::Verbatim,
            label: None,
            comment: None,
            default: None,
        }
    }

    /// Select a different capture group.
    pub fn with_group(mut self, group: impl Into<GroupSelector>) -> Self {
        self.group = group.into();
        self
    }

    /// Set the value transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the output label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the comment template.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Set the fallback value for transform failures.
    pub fn with_default(mut self, default: impl Into<FieldValue>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// A rule with its pattern compiled.
#[derive(Debug, Clone)]
pub struct FieldRule {
    definition: RuleDefinition,
    regex: Regex,
}

impl FieldRule {
    /// Compile a rule definition, checking its pattern, group and transform.
    pub fn compile(definition: RuleDefinition) -> Result<Self> {
        let invalid = |reason: String| DocstructError::InvalidRule {
            field_id: definition.field_id.clone(),
            reason,
        };

        if definition.field_id.trim().is_empty() {
            return Err(invalid("field id is empty".to_string()));
        }

        let regex = Regex::new(&definition.pattern).map_err(|e| invalid(e.to_string()))?;

        match &definition.group {
            GroupSelector::Index(i) if *i >= regex.captures_len() => {
                return Err(invalid(format!(
                    "group {} does not exist (pattern has {} groups)",
                    i,
                    regex.captures_len() - 1
                )));
            }
            GroupSelector::Name(name) if !regex.capture_names().flatten().any(|n| n == name.as_str()) => {
                return Err(invalid(format!("named group '{}' does not exist", name)));
            }
            _ => {}
        }

        definition.transform.validate().map_err(&invalid)?;

        if definition.transform.is_fallible() && definition.default.is_none() {
            return Err(invalid(
                "transform can fail but the rule declares no default".to_string(),
            ));
        }

        Ok(Self { definition, regex })
    }

    pub fn field_id(&self) -> &str {
        &self.definition.field_id
    }

    pub fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    pub fn transform(&self) -> &Transform {
        &self.definition.transform
    }

    pub fn label(&self) -> Option<&str> {
        self.definition.label.as_deref()
    }

    pub fn default_value(&self) -> Option<&FieldValue> {
        self.definition.default.as_ref()
    }

    /// First match of the pattern in `text`.
    pub fn captures<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        self.regex.captures(text)
    }

    /// The selected group of a match, if it participated.
    pub fn select<'t>(&self, caps: &Captures<'t>) -> Option<Match<'t>> {
        match &self.definition.group {
            GroupSelector::Index(i) => caps.get(*i),
            GroupSelector::Name(name) => caps.name(name),
        }
    }

    /// Render the comment template against a match.
    pub fn render_comment(&self, caps: &Captures<'_>) -> Option<String> {
        self.definition.comment.as_ref().map(|template| {
            let mut rendered = String::new();
            caps.expand(template, &mut rendered);
            rendered.trim().to_string()
        })
    }
}

/// Ordered, immutable collection of compiled rules with unique field ids.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<FieldRule>,
}

impl RuleSet {
    /// Compile definitions in order, rejecting duplicate field ids.
    pub fn from_definitions(definitions: Vec<RuleDefinition>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut rules = Vec::with_capacity(definitions.len());

        for definition in definitions {
            if !seen.insert(definition.field_id.clone()) {
                return Err(DocstructError::DuplicateField(definition.field_id));
            }
            rules.push(FieldRule::compile(definition)?);
        }

        Ok(Self { rules })
    }

    /// Parse a JSON array of rule definitions.
    pub fn from_json(json: &str) -> Result<Self> {
        let definitions: Vec<RuleDefinition> = serde_json::from_str(json)?;
        Self::from_definitions(definitions)
    }

    /// Load a rule set from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serialize the definitions back to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        let definitions: Vec<&RuleDefinition> = self.definitions().collect();
        Ok(serde_json::to_string_pretty(&definitions)?)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &RuleDefinition> {
        self.rules.iter().map(|r| &r.definition)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldRule> {
        self.rules.iter()
    }

    pub fn get(&self, field_id: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.field_id() == field_id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
