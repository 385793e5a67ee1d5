//! Declarative rule tables for the study permit form.
//!
//! A table maps every addressable leaf of [`ApplicationRecord`] to a [`FieldRule`]. Tables are
//! built once and shared; evaluation never mutates them.

mod catalog;
mod predicates;

use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::domain::{ApplicationRecord, FieldRef, FieldValue, ListId, SectionId};

pub use predicates::CrossFieldCheck;

/// Which rule set a validation run uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    #[default]
    Complete,
    Minimal,
}

impl ValidationMode {
    pub const fn label(self) -> &'static str {
        match self {
            ValidationMode::Complete => "complete",
            ValidationMode::Minimal => "minimal",
        }
    }
}

/// Compiled regular expression that remembers its source for diagnostics.
#[derive(Clone)]
pub struct Pattern {
    source: &'static str,
    regex: Regex,
}

impl Pattern {
    /// Rule patterns are literals in the catalog; a bad literal is a programming error.
    pub fn new(source: &'static str) -> Self {
        let regex = Regex::new(source).expect("rule catalog pattern compiles");
        Self { source, regex }
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    pub fn source(&self) -> &'static str {
        self.source
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

/// One check on a non-empty value.
#[derive(Debug, Clone)]
pub enum Constraint {
    MinLength(usize),
    MaxLength(usize),
    Pattern(Pattern),
    OneOf(&'static [&'static str]),
    Check(CrossFieldCheck),
}

impl Constraint {
    /// Evaluation order: lengths, pattern, enumeration, predicate.
    fn rank(&self) -> u8 {
        match self {
            Constraint::MinLength(_) => 0,
            Constraint::MaxLength(_) => 1,
            Constraint::Pattern(_) => 2,
            Constraint::OneOf(_) => 3,
            Constraint::Check(_) => 4,
        }
    }

    fn evaluate(
        &self,
        value: FieldValue<'_>,
        record: &ApplicationRecord,
        today: NaiveDate,
    ) -> Result<(), String> {
        let text = value.text();
        match self {
            Constraint::MinLength(min) if text.chars().count() < *min => {
                Err(format!("Minimum length is {min} characters"))
            }
            Constraint::MaxLength(max) if text.chars().count() > *max => {
                Err(format!("Maximum length is {max} characters"))
            }
            Constraint::Pattern(pattern) if !pattern.is_match(text) => {
                Err("Invalid format".to_string())
            }
            Constraint::OneOf(options) if !options.iter().any(|option| *option == text) => {
                Err(format!("Value must be one of: {}", options.join(", ")))
            }
            Constraint::Check(check) => check.evaluate(value, record, today),
            _ => Ok(()),
        }
    }
}

/// Guard that switches a conditional requirement on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Any of the listed yes/no leaves is set.
    AnyFlag(&'static [FieldRef]),
    /// The leaf holds one of the listed values.
    ValueIn(FieldRef, &'static [&'static str]),
}

impl Condition {
    pub fn holds(&self, record: &ApplicationRecord) -> bool {
        match self {
            Condition::AnyFlag(flags) => flags.iter().any(|flag| record.flag(*flag)),
            Condition::ValueIn(field, values) => {
                let current = record.text(*field);
                values.iter().any(|value| *value == current)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Optional,
    Required,
    /// Required while the condition holds; the leaf is not checked at all otherwise.
    RequiredWhen(Condition),
}

/// Validation rule for one leaf.
#[derive(Debug, Clone)]
pub struct FieldRule {
    requirement: Requirement,
    constraints: Vec<Constraint>,
    message: Option<&'static str>,
}

impl FieldRule {
    pub fn optional() -> Self {
        Self {
            requirement: Requirement::Optional,
            constraints: Vec::new(),
            message: None,
        }
    }

    pub fn required() -> Self {
        Self {
            requirement: Requirement::Required,
            ..Self::optional()
        }
    }

    pub fn required_when(condition: Condition) -> Self {
        Self {
            requirement: Requirement::RequiredWhen(condition),
            ..Self::optional()
        }
    }

    pub fn min_len(self, min: usize) -> Self {
        self.with(Constraint::MinLength(min))
    }

    pub fn max_len(self, max: usize) -> Self {
        self.with(Constraint::MaxLength(max))
    }

    pub fn pattern(self, source: &'static str) -> Self {
        self.with(Constraint::Pattern(Pattern::new(source)))
    }

    pub fn one_of(self, options: &'static [&'static str]) -> Self {
        self.with(Constraint::OneOf(options))
    }

    pub fn check(self, check: CrossFieldCheck) -> Self {
        self.with(Constraint::Check(check))
    }

    /// Message reported for every failure of this rule, replacing the per-check defaults.
    pub fn message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }

    fn with(mut self, constraint: Constraint) -> Self {
        let rank = constraint.rank();
        let at = self
            .constraints
            .partition_point(|existing| existing.rank() <= rank);
        self.constraints.insert(at, constraint);
        self
    }

    pub fn requirement(&self) -> Requirement {
        self.requirement
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// `true` for placeholder entries that can never fail.
    pub fn is_unconstrained(&self) -> bool {
        self.requirement == Requirement::Optional && self.constraints.is_empty()
    }

    /// Checks one value; `label` feeds the generated "is required" message.
    pub fn evaluate(
        &self,
        label: &str,
        value: Option<FieldValue<'_>>,
        record: &ApplicationRecord,
        today: NaiveDate,
    ) -> Result<(), String> {
        let value = value.unwrap_or(FieldValue::Text(""));
        let required = match self.requirement {
            Requirement::Optional => false,
            Requirement::Required => true,
            Requirement::RequiredWhen(condition) => {
                if !condition.holds(record) {
                    return Ok(());
                }
                true
            }
        };

        if value.is_empty() {
            return if required {
                Err(self.failure(|| format!("{} is required", field_label(label))))
            } else {
                Ok(())
            };
        }

        for constraint in &self.constraints {
            if let Err(default) = constraint.evaluate(value, record, today) {
                return Err(self.failure(|| default));
            }
        }
        Ok(())
    }

    fn failure(&self, default: impl FnOnce() -> String) -> String {
        match self.message {
            Some(message) => message.to_string(),
            None => default(),
        }
    }
}

/// Rules for the leaves of one section, in record key order.
#[derive(Debug, Clone)]
pub struct SectionRules {
    pub section: SectionId,
    pub fields: Vec<(&'static str, FieldRule)>,
}

/// Rules applied to every item of a repeatable list.
#[derive(Debug, Clone)]
pub struct ListRules {
    pub list: ListId,
    pub fields: Vec<(&'static str, FieldRule)>,
}

/// Immutable rule table.
#[derive(Debug, Clone)]
pub struct RuleTable {
    mode: ValidationMode,
    sections: Vec<SectionRules>,
    lists: Vec<ListRules>,
}

impl RuleTable {
    pub(crate) fn new(
        mode: ValidationMode,
        sections: Vec<SectionRules>,
        lists: Vec<ListRules>,
    ) -> Self {
        Self {
            mode,
            sections,
            lists,
        }
    }

    /// Every leaf of the form, with the full set of constraints.
    pub fn complete() -> &'static RuleTable {
        static TABLE: OnceLock<RuleTable> = OnceLock::new();
        TABLE.get_or_init(catalog::complete_table)
    }

    /// Presence checks on the critical identity, passport, contact, and study leaves.
    pub fn minimal() -> &'static RuleTable {
        static TABLE: OnceLock<RuleTable> = OnceLock::new();
        TABLE.get_or_init(catalog::minimal_table)
    }

    pub fn for_mode(mode: ValidationMode) -> &'static RuleTable {
        match mode {
            ValidationMode::Complete => Self::complete(),
            ValidationMode::Minimal => Self::minimal(),
        }
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn sections(&self) -> &[SectionRules] {
        &self.sections
    }

    pub fn lists(&self) -> &[ListRules] {
        &self.lists
    }

    pub fn rule(&self, field: FieldRef) -> Option<&FieldRule> {
        self.sections
            .iter()
            .filter(|rules| rules.section == field.section)
            .flat_map(|rules| rules.fields.iter())
            .find(|(key, _)| *key == field.key)
            .map(|(_, rule)| rule)
    }

    /// Number of non-list leaves the table covers.
    pub fn field_count(&self) -> usize {
        self.sections.iter().map(|rules| rules.fields.len()).sum()
    }
}

/// Title-cased label derived from the last segment of a camelCase key.
pub fn field_label(key: &str) -> String {
    let last = key.rsplit('.').next().unwrap_or(key);
    let mut label = String::with_capacity(last.len() + 4);
    for (index, c) in last.chars().enumerate() {
        if index == 0 {
            label.extend(c.to_uppercase());
        } else if c.is_ascii_uppercase() {
            label.push(' ');
            label.push(c);
        } else {
            label.push(c);
        }
    }
    label
}
