use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::calendar::parse_amount;
use super::domain::{ApplicationRecord, FieldRef, FieldValue, SectionId};
use super::rules::{field_label, FieldRule, RuleTable, ValidationMode};

const STRONG_FUNDS_THRESHOLD: f64 = 20_000.0;

/// Error entry: root leaves map straight to a message, sections to a key -> message map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorEntry {
    Message(String),
    Section(BTreeMap<String, String>),
}

/// Failing leaves keyed the way the form client expects them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, ErrorEntry>);

impl ValidationErrors {
    fn insert(&mut self, section: SectionId, key: String, message: String) {
        if section.is_root() {
            self.0.insert(key, ErrorEntry::Message(message));
            return;
        }

        let entry = self
            .0
            .entry(section.key().to_string())
            .or_insert_with(|| ErrorEntry::Section(BTreeMap::new()));
        if let ErrorEntry::Section(fields) = entry {
            fields.insert(key, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Message reported for a leaf, addressed by section and key inside it.
    pub fn get(&self, section: SectionId, key: &str) -> Option<&str> {
        if section.is_root() {
            return match self.0.get(key) {
                Some(ErrorEntry::Message(message)) => Some(message.as_str()),
                _ => None,
            };
        }
        match self.0.get(section.key()) {
            Some(ErrorEntry::Section(fields)) => fields.get(key).map(String::as_str),
            _ => None,
        }
    }

    /// Flattened `(path, message)` pairs, e.g. `("passportInfo.expiryDate", "...")`.
    pub fn entries(&self) -> Vec<(String, &str)> {
        let mut entries = Vec::new();
        for (name, entry) in &self.0 {
            match entry {
                ErrorEntry::Message(message) => entries.push((name.clone(), message.as_str())),
                ErrorEntry::Section(fields) => {
                    for (key, message) in fields {
                        entries.push((format!("{name}.{key}"), message.as_str()));
                    }
                }
            }
        }
        entries
    }

    pub fn paths(&self) -> Vec<String> {
        self.entries().into_iter().map(|(path, _)| path).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSummary {
    pub is_valid: bool,
    pub field_count: usize,
    pub error_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub total_fields: usize,
    pub valid_fields: usize,
    pub invalid_fields: usize,
    pub sections: BTreeMap<String, SectionSummary>,
}

impl ValidationSummary {
    fn record(&mut self, section: SectionId, failed: bool) {
        let stats = self
            .sections
            .entry(section.key().to_string())
            .or_insert(SectionSummary {
                is_valid: true,
                ..SectionSummary::default()
            });
        stats.field_count += 1;
        self.total_fields += 1;
        if failed {
            stats.error_count += 1;
            stats.is_valid = false;
            self.invalid_fields += 1;
        } else {
            self.valid_fields += 1;
        }
    }
}

/// Outcome of one validation run. Invalid data is reported here, never raised as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub mode: ValidationMode,
    pub errors: ValidationErrors,
    pub summary: ValidationSummary,
}

/// Validates against the local calendar date.
pub fn validate(record: &ApplicationRecord, rules: &RuleTable) -> ValidationReport {
    validate_as_of(record, rules, Local::now().date_naive())
}

/// Validates with an explicit "today"; the same inputs always produce the same report.
pub fn validate_as_of(
    record: &ApplicationRecord,
    rules: &RuleTable,
    today: NaiveDate,
) -> ValidationReport {
    let mut errors = ValidationErrors::default();
    let mut summary = ValidationSummary::default();

    for section_rules in rules.sections() {
        let section = section_rules.section;
        for (key, rule) in &section_rules.fields {
            let value = record.field(section, key);
            let outcome = rule.evaluate(key, value, record, today);
            summary.record(section, outcome.is_err());
            if let Err(message) = outcome {
                errors.insert(section, (*key).to_string(), message);
            }
        }
    }

    for list_rules in rules.lists() {
        let list = list_rules.list;
        for index in 0..record.list_len(list) {
            for (key, rule) in &list_rules.fields {
                let value = record.list_field(list, index, key);
                let outcome = rule.evaluate(key, value, record, today);
                summary.record(list.section(), outcome.is_err());
                if let Err(message) = outcome {
                    errors.insert(list.section(), list.item_key(index, key), message);
                }
            }
        }
    }

    let is_valid = errors.is_empty();
    debug!(
        mode = rules.mode().label(),
        total = summary.total_fields,
        invalid = summary.invalid_fields,
        "validated application record"
    );

    ValidationReport {
        is_valid,
        mode: rules.mode(),
        errors,
        summary,
    }
}

/// Result of checking one field in isolation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCheck {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Short names the form client uses for guidance lookups.
const FIELD_ALIASES: &[(&str, FieldRef)] = &[
    ("dli", FieldRef::new(SectionId::StudyDetails, "dliNumber")),
    ("passport", FieldRef::new(SectionId::PassportInfo, "number")),
    ("passportNumber", FieldRef::new(SectionId::PassportInfo, "number")),
    ("proofOfFunds", FieldRef::new(SectionId::StudyDetails, "fundsAvailable")),
    ("funds", FieldRef::new(SectionId::StudyDetails, "fundsAvailable")),
    ("availableFunds", FieldRef::new(SectionId::StudyDetails, "fundsAvailable")),
    ("programStartDate", FieldRef::new(SectionId::StudyDetails, "duration.from")),
    ("institutionName", FieldRef::new(SectionId::StudyDetails, "schoolName")),
];

/// Resolves a full record path, a known alias, or a bare key unique to one section.
pub fn resolve_field(name: &str) -> Option<FieldRef> {
    let name = name.trim();
    if let Some(field) = FieldRef::parse(name) {
        return Some(field);
    }
    if let Some((_, field)) = FIELD_ALIASES.iter().find(|(alias, _)| *alias == name) {
        return Some(*field);
    }

    let mut matches = SectionId::ALL.into_iter().filter_map(|section| {
        ApplicationRecord::section_keys(section)
            .iter()
            .find(|key| **key == name)
            .map(|key| FieldRef::new(section, key))
    });
    let first = matches.next()?;
    matches.next().is_none().then_some(first)
}

/// Checks one submitted value with the complete rule for that field; cross-field predicates
/// read their companions from `context`. Unknown fields only get a presence check.
pub fn check_field(
    rules: &RuleTable,
    field_name: &str,
    value: &Value,
    context: &ApplicationRecord,
    today: NaiveDate,
) -> FieldCheck {
    let text = match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        other => other.to_string(),
    };
    let input = match value {
        Value::Bool(flag) => FieldValue::Flag(Some(*flag)),
        _ => FieldValue::Text(&text),
    };

    let field = resolve_field(field_name);
    let mut check = FieldCheck {
        is_valid: true,
        ..FieldCheck::default()
    };

    match field.and_then(|field| rules.rule(field).map(|rule| (field, rule))) {
        Some((field, rule)) => {
            apply_rule(&mut check, rule, field, input, context, today);
            if is_funds_field(field) && check.is_valid {
                if let Some(amount) = parse_amount(&text) {
                    if amount < STRONG_FUNDS_THRESHOLD {
                        check.warnings.push(
                            "Consider showing more funds for a stronger application".to_string(),
                        );
                    }
                }
            }
        }
        None if input.is_empty() => {
            check.is_valid = false;
            check
                .errors
                .push(format!("{} is required", field_label(field_name)));
        }
        None => {}
    }

    check
}

fn apply_rule(
    check: &mut FieldCheck,
    rule: &FieldRule,
    field: FieldRef,
    input: FieldValue<'_>,
    context: &ApplicationRecord,
    today: NaiveDate,
) {
    if let Err(message) = rule.evaluate(field.key, Some(input), context, today) {
        check.is_valid = false;
        check.errors.push(message);
    }
}

fn is_funds_field(field: FieldRef) -> bool {
    field == FieldRef::new(SectionId::StudyDetails, "fundsAvailable")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_aliases_and_unique_bare_keys() {
        assert_eq!(
            resolve_field("dli"),
            Some(FieldRef::new(SectionId::StudyDetails, "dliNumber"))
        );
        assert_eq!(
            resolve_field("email"),
            Some(FieldRef::new(SectionId::ContactInfo, "email"))
        );
        // `expiryDate` exists in several sections.
        assert!(resolve_field("expiryDate").is_none());
        assert!(resolve_field("favouriteColour").is_none());
    }

    #[test]
    fn errors_flatten_to_paths() {
        let mut errors = ValidationErrors::default();
        errors.insert(SectionId::Application, "uci".to_string(), "bad".to_string());
        errors.insert(
            SectionId::StudyDetails,
            "dliNumber".to_string(),
            "bad dli".to_string(),
        );
        assert_eq!(errors.paths(), vec!["studyDetails.dliNumber", "uci"]);
        assert_eq!(
            errors.get(SectionId::StudyDetails, "dliNumber"),
            Some("bad dli")
        );
        let json = serde_json::to_value(&errors).expect("errors serialize");
        assert_eq!(json["uci"], "bad");
        assert_eq!(json["studyDetails"]["dliNumber"], "bad dli");
    }
}
