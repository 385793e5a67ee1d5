//! Supporting-document checklist derived from a submitted application.

use std::collections::BTreeMap;

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;

use super::calendar::{calendar_age, parse_amount, parse_calendar_date};
use super::domain::ApplicationRecord;

/// Citizenships exempt from the language test entry, compared case-insensitively.
const ENGLISH_SPEAKING: &[&str] = &[
    "canada",
    "usa",
    "united states",
    "uk",
    "united kingdom",
    "australia",
    "new zealand",
    "ireland",
];

const SPONSORED_FUNDING: &[&str] = &["family", "family_support", "sponsor"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocumentCategory {
    ApplicationForms,
    BackgroundDocuments,
    EducationDocuments,
    FinancialDocuments,
    IdentityDocuments,
    LanguageDocuments,
    MedicalDocuments,
    SupportingDocuments,
}

impl DocumentCategory {
    pub const fn label(self) -> &'static str {
        match self {
            DocumentCategory::ApplicationForms => "Application Forms",
            DocumentCategory::BackgroundDocuments => "Background Documents",
            DocumentCategory::EducationDocuments => "Education Documents",
            DocumentCategory::FinancialDocuments => "Financial Documents",
            DocumentCategory::IdentityDocuments => "Identity Documents",
            DocumentCategory::LanguageDocuments => "Language Documents",
            DocumentCategory::MedicalDocuments => "Medical Documents",
            DocumentCategory::SupportingDocuments => "Supporting Documents",
        }
    }
}

impl Serialize for DocumentCategory {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub description: String,
    pub category: DocumentCategory,
    pub required: bool,
    pub tips: Vec<&'static str>,
}

impl ChecklistEntry {
    fn new(
        id: &'static str,
        title: &'static str,
        description: impl Into<String>,
        category: DocumentCategory,
        required: bool,
        tips: &[&'static str],
    ) -> Self {
        Self {
            id,
            title,
            description: description.into(),
            category,
            required,
            tips: tips.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub required: usize,
    pub optional: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistSummary {
    pub total_documents: usize,
    pub required_documents: usize,
    pub optional_documents: usize,
    pub categories: usize,
    pub category_breakdown: BTreeMap<&'static str, CategoryCounts>,
}

impl ChecklistSummary {
    pub fn from_entries(entries: &[ChecklistEntry]) -> Self {
        let mut summary = ChecklistSummary::default();
        for entry in entries {
            let counts = summary
                .category_breakdown
                .entry(entry.category.label())
                .or_default();
            counts.total += 1;
            summary.total_documents += 1;
            if entry.required {
                counts.required += 1;
                summary.required_documents += 1;
            } else {
                counts.optional += 1;
                summary.optional_documents += 1;
            }
        }
        summary.categories = summary.category_breakdown.len();
        summary
    }
}

pub fn derive_checklist(record: &ApplicationRecord) -> Vec<ChecklistEntry> {
    derive_checklist_as_of(record, Local::now().date_naive())
}

/// Builds the checklist with an explicit "today" for the age and graduation predicates.
/// Required entries come first, then entries are ordered by category name; the sort is stable
/// so entries within a category keep their emission order.
pub fn derive_checklist_as_of(record: &ApplicationRecord, today: NaiveDate) -> Vec<ChecklistEntry> {
    use DocumentCategory::*;

    let study = record.study_details();
    let mut entries = vec![
        ChecklistEntry::new(
            "application_form",
            "IMM 1294 - Application for Study Permit",
            "Completed and signed application form generated from this system",
            ApplicationForms,
            true,
            &[
                "Ensure all fields are filled accurately",
                "Sign and date the form",
                "Keep a copy for your records",
            ],
        ),
        ChecklistEntry::new(
            "letter_of_acceptance",
            "Letter of Acceptance from DLI",
            format!(
                "Original Letter of Acceptance from {}",
                study
                    .school_name
                    .value()
                    .unwrap_or("your designated learning institution")
            ),
            EducationDocuments,
            true,
            &[
                "Must be from a Designated Learning Institution (DLI)",
                "Must include program details, start date, and duration",
                "Should be signed by an authorized official",
            ],
        ),
        ChecklistEntry::new(
            "passport",
            "Valid Passport",
            "Copy of passport information page showing passport number, issue and expiry dates",
            IdentityDocuments,
            true,
            &[
                "Passport must be valid for duration of intended stay",
                "Include all pages with stamps or visas",
                "Ensure passport photo is clear and readable",
            ],
        ),
        ChecklistEntry::new(
            "passport_photo",
            "Passport-sized Photographs",
            "2 recent passport-sized photos (35mm x 45mm) taken within last 6 months",
            IdentityDocuments,
            true,
            &[
                "White or light-colored background",
                "Face must be clearly visible",
                "No hats or sunglasses (unless for religious reasons)",
                "Write name and date of birth on the back",
            ],
        ),
        ChecklistEntry::new(
            "proof_of_funds",
            "Proof of Financial Support",
            format!(
                "Evidence of CAD ${} to cover tuition and living expenses",
                group_thousands(parse_amount(study.funds_available.as_str()).unwrap_or(0.0))
            ),
            FinancialDocuments,
            true,
            &[
                "Bank statements for past 4 months",
                "Proof of paid tuition fees (if applicable)",
                "Scholarship letters (if applicable)",
                "Must show sufficient funds for first year + CAD $10,000",
            ],
        ),
    ];

    let funding = study.funding_source.value().unwrap_or_default();
    if SPONSORED_FUNDING.iter().any(|source| *source == funding) {
        entries.push(ChecklistEntry::new(
            "sponsor_documents",
            "Sponsor Documents",
            "Financial documents from your sponsor",
            FinancialDocuments,
            true,
            &[
                "Sponsor's bank statements (4-6 months)",
                "Proof of relationship to sponsor",
                "Sponsor's employment letter or business proof",
                "Notarized affidavit of support",
            ],
        ));
    }
    if funding == "scholarship" {
        entries.push(ChecklistEntry::new(
            "scholarship_letter",
            "Scholarship Award Letter",
            "Official scholarship or financial aid award letter",
            FinancialDocuments,
            true,
            &[
                "Must be on official letterhead",
                "Include scholarship amount and duration",
                "Specify terms and conditions",
            ],
        ));
    }
    if funding == "loan" {
        entries.push(ChecklistEntry::new(
            "loan_documents",
            "Education Loan Documentation",
            "Proof of approved education loan",
            FinancialDocuments,
            true,
            &[
                "Loan approval letter from bank",
                "Loan amount and repayment terms",
                "Disbursement schedule",
            ],
        ));
    }

    entries.push(ChecklistEntry::new(
        "transcripts",
        "Official Academic Transcripts",
        "Transcripts from all post-secondary institutions attended",
        EducationDocuments,
        true,
        &[
            "Must be official/sealed transcripts",
            "Include all years of study",
            "Translate if not in English or French (with certified translation)",
        ],
    ));

    let education = record.education_history();
    if let Some(degree) = education
        .education_level
        .value()
        .and_then(degree_label)
    {
        entries.push(ChecklistEntry::new(
            "degree_certificate",
            "Degree Certificate",
            format!("Your {degree} degree certificate"),
            EducationDocuments,
            true,
            &[
                "Original or certified copy",
                "Translate if not in English or French",
            ],
        ));
    }

    let citizenship = record.personal_info().citizenship.value();
    if citizenship.is_some_and(|country| !is_english_speaking(country)) {
        entries.push(ChecklistEntry::new(
            "language_test",
            "Language Test Results",
            "IELTS, TOEFL, or other approved language test results",
            LanguageDocuments,
            true,
            &[
                "Test must be taken within last 2 years",
                "Must meet minimum score requirements of your institution",
                "IELTS Academic or TOEFL iBT are most commonly accepted",
            ],
        ));
    }

    entries.push(ChecklistEntry::new(
        "statement_of_purpose",
        "Statement of Purpose / Study Plan",
        "Explanation of why you want to study in Canada and your future plans",
        SupportingDocuments,
        false,
        &[
            "Explain your study goals",
            "How this program fits your career plans",
            "Why you chose this institution",
            "Why you will return to your home country after studies",
        ],
    ));
    entries.push(ChecklistEntry::new(
        "resume",
        "Curriculum Vitae (CV)",
        "Current resume or CV",
        SupportingDocuments,
        false,
        &[
            "Include education history",
            "Work experience (if any)",
            "Skills and achievements",
            "Volunteer work or extracurricular activities",
        ],
    ));

    if education
        .graduation_year()
        .is_some_and(|year| today.year() - year >= 2)
    {
        entries.push(ChecklistEntry::new(
            "employment_letter",
            "Employment Letters",
            "Letters from current and previous employers",
            SupportingDocuments,
            false,
            &[
                "On company letterhead",
                "Include job title, duties, and duration",
                "Signed by supervisor or HR",
            ],
        ));
    }

    entries.push(ChecklistEntry::new(
        "medical_exam",
        "Medical Examination",
        "Upfront medical exam results from panel physician",
        MedicalDocuments,
        false,
        &[
            "Not always required but recommended for faster processing",
            "Must be done by IRCC-approved panel physician",
            "Valid for 12 months from date of exam",
            "Physician will upload results directly to IRCC",
        ],
    ));

    let adult = parse_calendar_date(record.personal_info().date_of_birth.as_str())
        .is_some_and(|born| calendar_age(born, today) >= 18);
    if adult {
        entries.push(ChecklistEntry::new(
            "police_certificate",
            "Police Certificate",
            "Police clearance certificate from country of residence",
            BackgroundDocuments,
            false,
            &[
                "Required if you lived in a country for 6+ months since age 18",
                "Must be issued within last 6 months",
                "Translated if not in English or French",
            ],
        ));
    }

    entries.push(ChecklistEntry::new(
        "digital_photo",
        "Digital Photo",
        "Digital photo meeting IRCC specifications for online submission",
        IdentityDocuments,
        true,
        &[
            "File size: 240 KB or less",
            "Minimum dimensions: 420 x 540 pixels",
            "JPEG format",
            "Clear, recent photo (within 6 months)",
        ],
    ));

    entries.sort_by(|a, b| {
        b.required
            .cmp(&a.required)
            .then_with(|| a.category.label().cmp(b.category.label()))
    });
    entries
}

fn is_english_speaking(country: &str) -> bool {
    let country = country.trim().to_lowercase();
    ENGLISH_SPEAKING.iter().any(|known| *known == country)
}

fn degree_label(level: &str) -> Option<&'static str> {
    match level {
        "bachelor" | "bachelors" => Some("Bachelor's"),
        "master" | "masters" => Some("Master's"),
        "phd" => Some("PhD"),
        _ => None,
    }
}

fn group_thousands(amount: f64) -> String {
    let whole = format!("{:.0}", amount.max(0.0));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(group_thousands(60000.0), "60,000");
        assert_eq!(group_thousands(1234567.4), "1,234,567");
        assert_eq!(group_thousands(950.0), "950");
    }

    #[test]
    fn english_speaking_match_ignores_case_and_padding() {
        assert!(is_english_speaking(" United Kingdom "));
        assert!(is_english_speaking("USA"));
        assert!(!is_english_speaking("India"));
    }

    #[test]
    fn summary_counts_each_category() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).expect("valid date");
        let entries = derive_checklist_as_of(&ApplicationRecord::new(), today);
        let summary = ChecklistSummary::from_entries(&entries);
        assert_eq!(summary.total_documents, entries.len());
        assert_eq!(
            summary.required_documents + summary.optional_documents,
            summary.total_documents
        );
        let identity = summary.category_breakdown["Identity Documents"];
        assert_eq!(identity.required, 3);
        assert_eq!(identity.total, 3);
    }
}
