//! Value transforms applied to captured text.

use std::fmt::Write;
use std::str::FromStr;

use chrono::NaiveDate;
use chrono::format::{Fixed, Item, StrftimeItems};
use regex::Captures;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::models::record::FieldValue;

/// How a captured string becomes an output value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transform {
    /// Captured text, trimmed.
    #[default]
    Verbatim,

    /// Reformat a date, e.g. "March 15, 1989" -> "1989-03-15 00:00:00".
    Date {
        #[serde(default = "default_date_input")]
        input: String,
        #[serde(default = "default_date_output")]
        output: String,
    },

    /// Percentage to fraction: "92.5" -> 0.925.
    PercentFraction,

    /// Decimal number.
    Number,

    /// Integer with thousands separators removed: "2,800,000" -> "2800000".
    Digits,

    /// Expand `$n` / `${name}` references against the whole match.
    Template { template: String },

    /// Fixed value emitted whenever the pattern matches.
    Constant { value: FieldValue },
}

fn default_date_input() -> String {
    "%B %d, %Y".to_string()
}

fn default_date_output() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

impl Transform {
    /// Long-form English date to `YYYY-MM-DD 00:00:00`.
    pub fn date() -> Self {
        Self::Date {
            input: default_date_input(),
            output: default_date_output(),
        }
    }

    /// Template transform.
    pub fn template(template: impl Into<String>) -> Self {
        Self::Template {
            template: template.into(),
        }
    }

    /// Constant transform.
    pub fn constant(value: impl Into<FieldValue>) -> Self {
        Self::Constant {
            value: value.into(),
        }
    }

    /// Whether applying this transform can fail on matched input.
    pub fn is_fallible(&self) -> bool {
        matches!(
            self,
            Self::Date { .. } | Self::PercentFraction | Self::Number | Self::Digits
        )
    }

    /// Check the transform's own parameters.
    pub(crate) fn validate(&self) -> Result<(), String> {
        if let Self::Date { input, output } = self {
            for format in [input, output] {
                if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                    return Err(format!("invalid date format '{}'", format));
                }
            }
            // Dates carry no offset, so these items cannot be rendered.
            if StrftimeItems::new(output).any(|item| needs_offset(&item)) {
                return Err(format!(
                    "date output format '{}' uses a time zone item",
                    output
                ));
            }
        }
        Ok(())
    }

    /// Apply the transform to `raw`, the selected capture of `caps`.
    pub fn apply(&self, raw: &str, caps: &Captures<'_>) -> Result<FieldValue, String> {
        let raw = raw.trim();
        match self {
            Self::Verbatim => Ok(FieldValue::text(raw)),
            Self::Date { input, output } => {
                let date = NaiveDate::parse_from_str(raw, input)
                    .map_err(|e| format!("'{}' is not a date in format '{}': {}", raw, input, e))?;
                let midnight = date
                    .and_hms_opt(0, 0, 0)
                    .ok_or_else(|| format!("'{}' has no midnight", raw))?;
                let mut rendered = String::new();
                write!(rendered, "{}", midnight.format(output))
                    .map_err(|_| format!("'{}' cannot be rendered with format '{}'", raw, output))?;
                Ok(FieldValue::Text(rendered))
            }
            Self::PercentFraction => {
                let percent = parse_decimal(raw.trim_end_matches('%').trim())?;
                let fraction = percent / Decimal::ONE_HUNDRED;
                to_number(fraction, raw)
            }
            Self::Number => to_number(parse_decimal(raw)?, raw),
            Self::Digits => {
                let digits: String = raw.chars().filter(|c| *c != ',').collect();
                if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                    return Err(format!("'{}' is not a whole number", raw));
                }
                Ok(FieldValue::Text(digits))
            }
            Self::Template { template } => {
                let mut expanded = String::new();
                caps.expand(template, &mut expanded);
                Ok(FieldValue::text(expanded.trim()))
            }
            Self::Constant { value } => Ok(value.clone()),
        }
    }
}

fn needs_offset(item: &Item<'_>) -> bool {
    matches!(
        item,
        Item::Fixed(
            Fixed::TimezoneName
                | Fixed::TimezoneOffset
                | Fixed::TimezoneOffsetZ
                | Fixed::TimezoneOffsetColon
                | Fixed::TimezoneOffsetColonZ
                | Fixed::TimezoneOffsetDoubleColon
                | Fixed::TimezoneOffsetTripleColon
                | Fixed::RFC2822
                | Fixed::RFC3339
        )
    )
}

fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw).map_err(|e| format!("'{}' is not a number: {}", raw, e))
}

fn to_number(value: Decimal, raw: &str) -> Result<FieldValue, String> {
    if value.fract().is_zero() {
        if let Some(n) = value.to_i64() {
            return Ok(FieldValue::Integer(n));
        }
    }
    value
        .to_f64()
        .map(FieldValue::Number)
        .ok_or_else(|| format!("'{}' is out of range", raw))
}
