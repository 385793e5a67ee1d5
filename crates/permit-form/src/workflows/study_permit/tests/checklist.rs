use super::common::*;
use crate::workflows::study_permit::checklist::{
    derive_checklist_as_of, ChecklistEntry, ChecklistSummary, DocumentCategory,
};
use crate::workflows::study_permit::domain::{ApplicationRecord, Text};

fn ids(entries: &[ChecklistEntry]) -> Vec<&'static str> {
    entries.iter().map(|entry| entry.id).collect()
}

#[test]
fn example_record_lists_the_expected_documents() {
    let checklist = derive_checklist_as_of(&record(), today());
    let ids = ids(&checklist);
    for id in [
        "application_form",
        "letter_of_acceptance",
        "passport",
        "passport_photo",
        "proof_of_funds",
        "sponsor_documents",
        "transcripts",
        "degree_certificate",
        "language_test",
        "police_certificate",
        "employment_letter",
        "digital_photo",
    ] {
        assert!(ids.contains(&id), "missing {id}");
    }
    assert!(!ids.contains(&"scholarship_letter"));
    assert!(!ids.contains(&"loan_documents"));
}

#[test]
fn scholarship_funding_swaps_sponsor_documents_for_award_letter() {
    let record = with_study(record(), |study| study.funding_source = Text::new("scholarship"));
    let ids = ids(&derive_checklist_as_of(&record, today()));
    assert!(ids.contains(&"scholarship_letter"));
    assert!(!ids.contains(&"sponsor_documents"));
}

#[test]
fn police_certificate_starts_at_eighteen() {
    let minor = with_personal(record(), |personal| {
        personal.date_of_birth = Text::new("2009-06-01")
    });
    assert!(!ids(&derive_checklist_as_of(&minor, today())).contains(&"police_certificate"));

    let adult = with_personal(record(), |personal| {
        personal.date_of_birth = Text::new("2007-06-01")
    });
    assert!(ids(&derive_checklist_as_of(&adult, today())).contains(&"police_certificate"));
}

#[test]
fn english_speaking_citizens_skip_the_language_test() {
    let record = with_personal(record(), |personal| {
        personal.citizenship = Text::new(" United Kingdom ")
    });
    assert!(!ids(&derive_checklist_as_of(&record, today())).contains(&"language_test"));
}

#[test]
fn recent_graduates_get_no_employment_letter() {
    let record = with_education(record(), |education| {
        education.graduation_year = Text::new("2025")
    });
    assert!(!ids(&derive_checklist_as_of(&record, today())).contains(&"employment_letter"));
}

#[test]
fn empty_record_still_gets_the_baseline() {
    let checklist = derive_checklist_as_of(&ApplicationRecord::new(), today());
    let ids = ids(&checklist);
    assert!(ids.contains(&"application_form"));
    assert!(ids.contains(&"passport"));
    assert!(!ids.contains(&"degree_certificate"));
    assert!(!ids.contains(&"language_test"));
    assert!(!ids.contains(&"police_certificate"));
}

#[test]
fn derivation_is_deterministic_and_unique() {
    let first = derive_checklist_as_of(&record(), today());
    let second = derive_checklist_as_of(&record(), today());
    assert_eq!(first, second);

    let mut ids = ids(&first);
    let total = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), total);
}

#[test]
fn summary_agrees_with_entries() {
    let checklist = derive_checklist_as_of(&record(), today());
    let summary = ChecklistSummary::from_entries(&checklist);
    assert_eq!(summary.total_documents, checklist.len());
    assert_eq!(
        summary.required_documents + summary.optional_documents,
        summary.total_documents
    );
    assert_eq!(summary.categories, summary.category_breakdown.len());

    let financial = summary.category_breakdown[DocumentCategory::FinancialDocuments.label()];
    let expected = checklist
        .iter()
        .filter(|entry| entry.category == DocumentCategory::FinancialDocuments)
        .count();
    assert_eq!(financial.total, expected);
}
