//! Built-in extraction profiles.
//!
//! A profile bundles a rule set with the label and comment tables used to
//! flatten structured documents of the same shape.

pub mod biography;
