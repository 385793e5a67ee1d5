use serde_json::json;

use super::common::*;
use crate::workflows::study_permit::domain::{
    ApplicationRecord, EmploymentEntry, Flag, ListId, SectionId, Text,
};
use crate::workflows::study_permit::rules::{RuleTable, ValidationMode};
use crate::workflows::study_permit::validation::{check_field, validate_as_of};

#[test]
fn example_record_passes_both_modes() {
    let record = record();
    for table in [RuleTable::complete(), RuleTable::minimal()] {
        let report = validate_as_of(&record, table, today());
        assert!(report.is_valid, "{:?}", report.errors.entries());
        assert_eq!(report.summary.invalid_fields, 0);
    }
}

#[test]
fn validation_is_deterministic() {
    let record = with_passport(record(), |passport| passport.number = Text::new("k12"));
    let first = validate_as_of(&record, RuleTable::complete(), today());
    let second = validate_as_of(&record, RuleTable::complete(), today());
    assert_eq!(first, second);
    assert!(!first.is_valid);
}

#[test]
fn summary_counts_every_rule_and_list_row() {
    let record = record();
    let report = validate_as_of(&record, RuleTable::complete(), today());
    let expected = RuleTable::complete().field_count()
        + record.employment_history().len() * ListId::EmploymentHistory.item_keys().len();
    assert_eq!(report.summary.total_fields, expected);
    assert_eq!(
        report.summary.valid_fields + report.summary.invalid_fields,
        report.summary.total_fields
    );
    let study = &report.summary.sections["studyDetails"];
    assert!(study.is_valid);
    assert_eq!(study.error_count, 0);
}

#[test]
fn minimal_mode_reports_each_missing_critical_field() {
    let report = validate_as_of(&ApplicationRecord::new(), RuleTable::minimal(), today());
    assert!(!report.is_valid);
    assert_eq!(report.mode, ValidationMode::Minimal);
    assert_eq!(report.summary.total_fields, 16);
    assert_eq!(report.summary.invalid_fields, 16);
    assert_eq!(
        report.errors.get(SectionId::PersonalInfo, "familyName"),
        Some("Family name is required")
    );
    assert_eq!(
        report.errors.get(SectionId::StudyDetails, "dliNumber"),
        Some("DLI number is required")
    );
}

#[test]
fn passport_must_outlast_six_months() {
    let boundary = with_passport(record(), |passport| {
        passport.expiry_date = Text::new("2027-04-16")
    });
    let report = validate_as_of(&boundary, RuleTable::complete(), today());
    assert_eq!(
        report.errors.get(SectionId::PassportInfo, "expiryDate"),
        Some("Passport must be valid for at least 6 months from today")
    );

    let day_after = with_passport(record(), |passport| {
        passport.expiry_date = Text::new("2027-04-17")
    });
    assert!(validate_as_of(&day_after, RuleTable::complete(), today()).is_valid);
}

#[test]
fn passport_expiry_must_follow_issue() {
    let record = with_passport(record(), |passport| {
        passport.issue_date = Text::new("2031-01-01");
        passport.expiry_date = Text::new("2030-12-31");
    });
    let report = validate_as_of(&record, RuleTable::complete(), today());
    assert!(report.errors.get(SectionId::PassportInfo, "expiryDate").is_some());
    assert_eq!(
        report.errors.get(SectionId::PassportInfo, "issueDate"),
        Some("Passport issue date cannot be in the future")
    );
}

#[test]
fn funds_must_cover_tuition_and_living_allowance() {
    let short = with_study(record(), |study| study.funds_available = Text::new("44999"));
    let report = validate_as_of(&short, RuleTable::complete(), today());
    assert_eq!(
        report.errors.get(SectionId::StudyDetails, "fundsAvailable"),
        Some("Available funds must cover tuition plus CAD $10,000 for living expenses")
    );

    let exact = with_study(record(), |study| study.funds_available = Text::new("$45,000"));
    assert!(validate_as_of(&exact, RuleTable::complete(), today()).is_valid);
}

#[test]
fn dli_needs_the_leading_o() {
    let bare = with_study(record(), |study| study.dli_number = Text::new("123456789"));
    let report = validate_as_of(&bare, RuleTable::complete(), today());
    assert!(report
        .errors
        .get(SectionId::StudyDetails, "dliNumber")
        .is_some_and(|message| message.contains("DLI number")));

    let prefixed = with_study(record(), |study| study.dli_number = Text::new("O123456789"));
    assert!(validate_as_of(&prefixed, RuleTable::complete(), today()).is_valid);
}

#[test]
fn applicant_age_is_bounded() {
    let young = with_personal(record(), |personal| {
        personal.date_of_birth = Text::new("2011-01-01")
    });
    let report = validate_as_of(&young, RuleTable::complete(), today());
    assert_eq!(
        report.errors.get(SectionId::PersonalInfo, "dateOfBirth"),
        Some("Applicant must be between 16 and 100 years old")
    );
}

#[test]
fn programme_dates_are_checked_against_today() {
    let soon = with_study(record(), |study| study.duration.from = Text::new("2026-12-01"));
    let report = validate_as_of(&soon, RuleTable::complete(), today());
    assert_eq!(
        report.errors.get(SectionId::StudyDetails, "duration.from"),
        Some("Program start date must be at least 3 months from today")
    );

    let backwards = with_study(record(), |study| study.duration.to = Text::new("2027-08-31"));
    let report = validate_as_of(&backwards, RuleTable::complete(), today());
    assert!(report.errors.get(SectionId::StudyDetails, "duration.to").is_some());

    // The same record is acceptable when checked far enough ahead of the intake.
    let report = validate_as_of(&soon, RuleTable::complete(), date("2026-08-01"));
    assert!(report.errors.get(SectionId::StudyDetails, "duration.from").is_none());
}

#[test]
fn partnered_status_requires_union_details() {
    let married = with_marital(record(), |marital| marital.status = Text::new("Married"));
    let report = validate_as_of(&married, RuleTable::complete(), today());
    assert!(report.errors.get(SectionId::MaritalInfo, "dateOfMarriage").is_some());
    assert!(report.errors.get(SectionId::MaritalInfo, "spouse.familyName").is_some());

    let before_birth = with_marital(married, |marital| {
        marital.date_of_marriage = Text::new("1990-06-01");
        marital.spouse.family_name = Text::new("Patel");
    });
    let report = validate_as_of(&before_birth, RuleTable::complete(), today());
    assert_eq!(
        report.errors.get(SectionId::MaritalInfo, "dateOfMarriage"),
        Some("Marriage date must be after birth date and not in the future")
    );
}

#[test]
fn background_details_follow_any_yes_answer() {
    let mut record = record();
    let mut background = record.background_info().clone();
    background.immigration.refused_visa = Flag::YES;
    record.set_background_info(background.clone());

    let report = validate_as_of(&record, RuleTable::complete(), today());
    assert!(report
        .errors
        .get(SectionId::BackgroundInfo, "immigration.details")
        .is_some());
    assert!(report.errors.get(SectionId::BackgroundInfo, "health.details").is_none());

    background.immigration.details = Text::new("Visitor visa refused in 2019");
    record.set_background_info(background);
    assert!(validate_as_of(&record, RuleTable::complete(), today()).is_valid);
}

#[test]
fn unanswered_required_question_is_reported() {
    let unanswered = with_education(record(), |education| {
        education.has_post_secondary = Flag::UNANSWERED;
    });
    let report = validate_as_of(&unanswered, RuleTable::complete(), today());
    assert!(!report.is_valid);
    assert_eq!(
        report.errors.get(SectionId::EducationHistory, "hasPostSecondary"),
        Some("Please indicate if you have post-secondary education")
    );

    let mut payload = serde_json::to_value(record()).expect("record serializes");
    payload["educationHistory"]
        .as_object_mut()
        .expect("education section")
        .remove("hasPostSecondary");
    let absent: ApplicationRecord = serde_json::from_value(payload).expect("record decodes");
    let report = validate_as_of(&absent, RuleTable::complete(), today());
    assert!(report
        .errors
        .get(SectionId::EducationHistory, "hasPostSecondary")
        .is_some());

    let answered_no = with_education(record(), |education| {
        education.has_post_secondary = Flag::NO;
    });
    let report = validate_as_of(&answered_no, RuleTable::complete(), today());
    assert!(report
        .errors
        .get(SectionId::EducationHistory, "hasPostSecondary")
        .is_none());

    let context = record();
    let check = |value| {
        check_field(
            RuleTable::complete(),
            "educationHistory.hasPostSecondary",
            &value,
            &context,
            today(),
        )
    };
    assert!(!check(json!(null)).is_valid);
    let no = check(json!(false));
    assert!(no.is_valid, "{:?}", no.errors);
}

#[test]
fn employment_rows_are_checked_individually() {
    let mut record = record();
    record.push_employment(EmploymentEntry {
        from: Text::new("2016-01"),
        company_name: Text::new("Campus Cafe"),
        ..EmploymentEntry::default()
    });
    let report = validate_as_of(&record, RuleTable::complete(), today());
    assert_eq!(
        report.errors.get(SectionId::EmploymentHistory, "1.occupation"),
        Some("Occupation is required")
    );
    assert!(report.errors.get(SectionId::EmploymentHistory, "0.occupation").is_none());
    assert!(report.errors.paths().contains(&"employmentHistory.1.occupation".to_string()));
}

#[test]
fn single_field_checks_use_aliases() {
    let context = ApplicationRecord::new();
    let check = check_field(
        RuleTable::complete(),
        "dli",
        &json!("123456789"),
        &context,
        today(),
    );
    assert!(!check.is_valid);
    assert_eq!(check.errors.len(), 1);

    let check = check_field(
        RuleTable::complete(),
        "dli",
        &json!("O123456789"),
        &context,
        today(),
    );
    assert!(check.is_valid);
    assert!(check.errors.is_empty());
}

#[test]
fn modest_funds_pass_with_a_warning() {
    let check = check_field(
        RuleTable::complete(),
        "proofOfFunds",
        &json!("15000"),
        &ApplicationRecord::new(),
        today(),
    );
    assert!(check.is_valid);
    assert_eq!(
        check.warnings,
        vec!["Consider showing more funds for a stronger application".to_string()]
    );

    // Cross-field predicates read tuition from the context record.
    let check = check_field(
        RuleTable::complete(),
        "proofOfFunds",
        &json!(15000),
        &record(),
        today(),
    );
    assert!(!check.is_valid);
}

#[test]
fn unknown_fields_only_need_a_value() {
    let context = ApplicationRecord::new();
    let empty = check_field(RuleTable::complete(), "favouriteColour", &json!(null), &context, today());
    assert!(!empty.is_valid);
    assert_eq!(empty.errors.len(), 1);

    let filled = check_field(RuleTable::complete(), "favouriteColour", &json!("blue"), &context, today());
    assert!(filled.is_valid);
}
