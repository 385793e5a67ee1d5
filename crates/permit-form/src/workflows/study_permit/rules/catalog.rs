use super::super::domain::{ApplicationRecord, FieldRef, ListId, SectionId};
use super::{
    Condition, CrossFieldCheck, FieldRule, ListRules, RuleTable, SectionRules, ValidationMode,
};

const NAME_PATTERN: &str = r"^[a-zA-Z\s\-']+$";
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const DLI_PATTERN: &str = r"^O\d{9,11}$";
const PHONE_PATTERN: &str = r"^[0-9\s\-()]{4,20}$";

const SEX_OPTIONS: &[&str] = &["Male", "Female", "Another gender"];
const MARITAL_OPTIONS: &[&str] = &[
    "Single",
    "Married",
    "Common-law",
    "Divorced",
    "Separated",
    "Widowed",
    "Annulled",
];
const PARTNERED: &[&str] = &["Married", "Common-law"];
const OFFICIAL_LANGUAGES: &[&str] = &["English", "French"];
const LANGUAGE_ABILITY: &[&str] = &["English", "French", "Both", "Neither"];
const FUNDING_SOURCES: &[&str] = &[
    "personal_savings",
    "family",
    "family_support",
    "scholarship",
    "loan",
    "sponsor",
    "other",
];
const EDUCATION_LEVELS: &[&str] = &[
    "high_school",
    "diploma",
    "certificate",
    "bachelor",
    "bachelors",
    "master",
    "masters",
    "phd",
    "other",
];

const LIVING_ALLOWANCE: f64 = 10_000.0;

const HAS_NATIONAL_ID: &[FieldRef] = &[FieldRef::new(SectionId::NationalIdInfo, "hasDocument")];
const IS_US_PR: &[FieldRef] = &[FieldRef::new(SectionId::UsPrInfo, "isPermanentResident")];
const HAS_OTHER_NAMES: &[FieldRef] = &[FieldRef::new(SectionId::PersonalInfo, "hasOtherNames")];
const HAS_POST_SECONDARY: &[FieldRef] =
    &[FieldRef::new(SectionId::EducationHistory, "hasPostSecondary")];
const PREVIOUSLY_MARRIED: &[FieldRef] =
    &[FieldRef::new(SectionId::MaritalInfo, "previouslyMarried")];
const HEALTH_FLAGS: &[FieldRef] = &[
    FieldRef::new(SectionId::BackgroundInfo, "health.tuberculosis"),
    FieldRef::new(SectionId::BackgroundInfo, "health.physicalMentalDisorder"),
];
const IMMIGRATION_FLAGS: &[FieldRef] = &[
    FieldRef::new(SectionId::BackgroundInfo, "immigration.overstayed"),
    FieldRef::new(SectionId::BackgroundInfo, "immigration.refusedVisa"),
    FieldRef::new(SectionId::BackgroundInfo, "immigration.previousApplication"),
];
const CRIMINAL_FLAGS: &[FieldRef] = &[FieldRef::new(SectionId::BackgroundInfo, "criminal.hasRecord")];
const MILITARY_FLAGS: &[FieldRef] = &[FieldRef::new(SectionId::BackgroundInfo, "military.served")];

const PASSPORT_ISSUE_DATE: FieldRef = FieldRef::new(SectionId::PassportInfo, "issueDate");
const TUITION: FieldRef = FieldRef::new(SectionId::StudyDetails, "costs.tuition");
const STUDY_START: FieldRef = FieldRef::new(SectionId::StudyDetails, "duration.from");
const EDUCATION_START: FieldRef = FieldRef::new(SectionId::EducationHistory, "highestEducation.from");

fn date() -> FieldRule {
    FieldRule::optional().check(CrossFieldCheck::CalendarDate)
}

fn month() -> FieldRule {
    FieldRule::optional().check(CrossFieldCheck::PartialDate)
}

fn amount(min: f64, max: f64) -> FieldRule {
    FieldRule::optional()
        .check(CrossFieldCheck::AmountWithin { min, max })
        .message("Please enter an amount in Canadian dollars")
}

/// Orders declared rules by the record's key order and adds unconstrained entries for every
/// leaf without a rule. Declared keys unknown to the record are kept at the end so coverage
/// tests can flag them.
fn covering(
    keys: &'static [&'static str],
    mut declared: Vec<(&'static str, FieldRule)>,
) -> Vec<(&'static str, FieldRule)> {
    let mut fields = Vec::with_capacity(keys.len() + declared.len());
    for key in keys {
        match declared.iter().position(|(declared_key, _)| declared_key == key) {
            Some(index) => fields.push(declared.remove(index)),
            None => fields.push((*key, FieldRule::optional())),
        }
    }
    fields.extend(declared);
    fields
}

fn section(section: SectionId, declared: Vec<(&'static str, FieldRule)>) -> SectionRules {
    SectionRules {
        section,
        fields: covering(ApplicationRecord::section_keys(section), declared),
    }
}

fn list(list: ListId, declared: Vec<(&'static str, FieldRule)>) -> ListRules {
    ListRules {
        list,
        fields: covering(list.item_keys(), declared),
    }
}

pub(super) fn complete_table() -> RuleTable {
    let sections = vec![
        section(
            SectionId::Application,
            vec![
                (
                    "uci",
                    FieldRule::optional()
                        .pattern(r"^[A-Z0-9]{8,10}$")
                        .message("UCI must be 8-10 alphanumeric characters"),
                ),
                (
                    "serviceLanguage",
                    FieldRule::required()
                        .one_of(OFFICIAL_LANGUAGES)
                        .message("Service language must be English or French"),
                ),
            ],
        ),
        section(
            SectionId::PersonalInfo,
            vec![
                (
                    "familyName",
                    FieldRule::required()
                        .min_len(2)
                        .max_len(50)
                        .pattern(NAME_PATTERN)
                        .message(
                            "Family name must contain only letters, spaces, hyphens, and apostrophes",
                        ),
                ),
                (
                    "givenNames",
                    FieldRule::required()
                        .min_len(2)
                        .max_len(50)
                        .pattern(NAME_PATTERN)
                        .message(
                            "Given name(s) must contain only letters, spaces, hyphens, and apostrophes",
                        ),
                ),
                (
                    "otherNames.familyName",
                    FieldRule::required_when(Condition::AnyFlag(HAS_OTHER_NAMES))
                        .max_len(50)
                        .pattern(NAME_PATTERN)
                        .message("Please enter the other family name you have used"),
                ),
                (
                    "otherNames.givenNames",
                    FieldRule::optional().max_len(50).pattern(NAME_PATTERN),
                ),
                (
                    "sex",
                    FieldRule::required()
                        .one_of(SEX_OPTIONS)
                        .message("Please select your sex"),
                ),
                (
                    "dateOfBirth",
                    FieldRule::required()
                        .check(CrossFieldCheck::AgeWithin {
                            min: 16.0,
                            max: 100.0,
                        })
                        .message("Applicant must be between 16 and 100 years old"),
                ),
                (
                    "citizenship",
                    FieldRule::required()
                        .min_len(2)
                        .message("Citizenship is required"),
                ),
                ("currentResidence.from", date()),
                ("currentResidence.to", date()),
                ("applyingFrom.from", date()),
                ("applyingFrom.to", date()),
            ],
        ),
        section(
            SectionId::MaritalInfo,
            vec![
                (
                    "status",
                    FieldRule::required()
                        .one_of(MARITAL_OPTIONS)
                        .message("Please select your marital status"),
                ),
                (
                    "dateOfMarriage",
                    FieldRule::required_when(Condition::ValueIn(
                        FieldRef::new(SectionId::MaritalInfo, "status"),
                        PARTNERED,
                    ))
                    .check(CrossFieldCheck::MarriageAfterBirth)
                    .message("Marriage date must be after birth date and not in the future"),
                ),
                (
                    "spouse.familyName",
                    FieldRule::required_when(Condition::ValueIn(
                        FieldRef::new(SectionId::MaritalInfo, "status"),
                        PARTNERED,
                    ))
                    .message("Please enter your spouse or partner's family name"),
                ),
                (
                    "previousSpouse.familyName",
                    FieldRule::required_when(Condition::AnyFlag(PREVIOUSLY_MARRIED))
                        .message("Please enter your previous spouse or partner's family name"),
                ),
                ("previousSpouse.dateOfBirth", date()),
                ("previousSpouse.from", date()),
                ("previousSpouse.to", date()),
            ],
        ),
        section(
            SectionId::LanguageInfo,
            vec![
                (
                    "nativeLanguage",
                    FieldRule::required()
                        .min_len(2)
                        .message("Native language is required"),
                ),
                (
                    "communicateInEnglishFrench",
                    FieldRule::required().one_of(LANGUAGE_ABILITY).message(
                        "Please select your ability to communicate in English and/or French",
                    ),
                ),
            ],
        ),
        section(
            SectionId::PassportInfo,
            vec![
                (
                    "number",
                    FieldRule::required()
                        .min_len(6)
                        .max_len(15)
                        .pattern(r"^[A-Z0-9]+$")
                        .message("Passport number must be alphanumeric and uppercase"),
                ),
                (
                    "countryOfIssue",
                    FieldRule::required()
                        .min_len(2)
                        .message("Passport issuing country is required"),
                ),
                (
                    "issueDate",
                    FieldRule::required()
                        .check(CrossFieldCheck::NotInFuture)
                        .message("Passport issue date cannot be in the future"),
                ),
                (
                    "expiryDate",
                    FieldRule::required()
                        .check(CrossFieldCheck::PassportValidity {
                            issue_date: PASSPORT_ISSUE_DATE,
                            months: 6,
                        })
                        .message("Passport must be valid for at least 6 months from today"),
                ),
            ],
        ),
        section(
            SectionId::NationalIdInfo,
            vec![
                (
                    "documentNumber",
                    FieldRule::required_when(Condition::AnyFlag(HAS_NATIONAL_ID))
                        .min_len(5)
                        .message("Document number is required when you have a national ID"),
                ),
                ("issueDate", date()),
                ("expiryDate", date()),
            ],
        ),
        section(
            SectionId::UsPrInfo,
            vec![
                (
                    "uscisNumber",
                    FieldRule::required_when(Condition::AnyFlag(IS_US_PR))
                        .min_len(8)
                        .message("USCIS number is required for US permanent residents"),
                ),
                ("expiryDate", date()),
            ],
        ),
        section(
            SectionId::ContactInfo,
            vec![
                (
                    "telephone.number",
                    FieldRule::optional()
                        .pattern(PHONE_PATTERN)
                        .message("Telephone numbers may only contain digits, spaces, dashes, and brackets"),
                ),
                (
                    "alternateTelephone.number",
                    FieldRule::optional()
                        .pattern(PHONE_PATTERN)
                        .message("Telephone numbers may only contain digits, spaces, dashes, and brackets"),
                ),
                (
                    "email",
                    FieldRule::required()
                        .pattern(EMAIL_PATTERN)
                        .message("Please enter a valid email address"),
                ),
            ],
        ),
        section(
            SectionId::StudyDetails,
            vec![
                (
                    "schoolName",
                    FieldRule::required()
                        .min_len(3)
                        .message("School name is required"),
                ),
                (
                    "levelOfStudy",
                    FieldRule::required()
                        .min_len(2)
                        .message("Level of study is required"),
                ),
                (
                    "fieldOfStudy",
                    FieldRule::required()
                        .min_len(2)
                        .message("Field of study is required"),
                ),
                (
                    "dliNumber",
                    FieldRule::required()
                        .pattern(DLI_PATTERN)
                        .message("DLI number must start with \"O\" followed by 9-11 digits"),
                ),
                (
                    "duration.from",
                    FieldRule::optional()
                        .check(CrossFieldCheck::StartLeadTime { months: 3 })
                        .message("Program start date must be at least 3 months from today"),
                ),
                (
                    "duration.to",
                    FieldRule::optional()
                        .check(CrossFieldCheck::EndsAfter { start: STUDY_START })
                        .message("Program end date must be after the start date"),
                ),
                (
                    "costs.tuition",
                    FieldRule::optional()
                        .check(CrossFieldCheck::AmountWithin {
                            min: 1_000.0,
                            max: 100_000.0,
                        })
                        .message("Tuition must be between CAD $1,000 and CAD $100,000"),
                ),
                ("costs.roomAndBoard", amount(0.0, 1_000_000.0)),
                ("costs.other", amount(0.0, 1_000_000.0)),
                (
                    "fundsAvailable",
                    FieldRule::required()
                        .check(CrossFieldCheck::FundsCoverTuition {
                            tuition: TUITION,
                            allowance: LIVING_ALLOWANCE,
                        })
                        .message(
                            "Available funds must cover tuition plus CAD $10,000 for living expenses",
                        ),
                ),
                (
                    "fundingSource",
                    FieldRule::optional()
                        .one_of(FUNDING_SOURCES)
                        .message("Please select how your studies will be funded"),
                ),
                (
                    "expensesPaidBy",
                    FieldRule::required()
                        .min_len(2)
                        .message("Please specify who will pay your expenses"),
                ),
                (
                    "expensesPaidByOther",
                    FieldRule::required_when(Condition::ValueIn(
                        FieldRef::new(SectionId::StudyDetails, "expensesPaidBy"),
                        &["Other"],
                    ))
                    .min_len(2)
                    .message("Please describe who will pay your expenses"),
                ),
                ("pal.expiryDate", date()),
                ("caq.expiryDate", date()),
            ],
        ),
        section(
            SectionId::EducationHistory,
            vec![
                (
                    "hasPostSecondary",
                    FieldRule::required()
                        .message("Please indicate if you have post-secondary education"),
                ),
                (
                    "educationLevel",
                    FieldRule::optional()
                        .one_of(EDUCATION_LEVELS)
                        .message("Please select your highest level of education"),
                ),
                (
                    "graduationYear",
                    FieldRule::optional().check(CrossFieldCheck::YearWithin {
                        earliest: 1950,
                        years_ahead: 10,
                    }),
                ),
                ("highestEducation.from", month()),
                (
                    "highestEducation.to",
                    FieldRule::optional()
                        .check(CrossFieldCheck::EndsAfter {
                            start: EDUCATION_START,
                        })
                        .message("Education end date must be after the start date"),
                ),
                (
                    "highestEducation.schoolName",
                    FieldRule::required_when(Condition::AnyFlag(HAS_POST_SECONDARY))
                    .min_len(2)
                    .message("Please enter the name of your school or institution"),
                ),
            ],
        ),
        section(
            SectionId::BackgroundInfo,
            vec![
                (
                    "health.details",
                    FieldRule::required_when(Condition::AnyFlag(HEALTH_FLAGS))
                        .message("Please provide details for your health answers"),
                ),
                (
                    "immigration.details",
                    FieldRule::required_when(Condition::AnyFlag(IMMIGRATION_FLAGS))
                        .message("Please provide details for your immigration history answers"),
                ),
                (
                    "criminal.details",
                    FieldRule::required_when(Condition::AnyFlag(CRIMINAL_FLAGS))
                        .message("Please provide details of the offence"),
                ),
                (
                    "military.details",
                    FieldRule::required_when(Condition::AnyFlag(MILITARY_FLAGS))
                        .message("Please provide dates and places of military or police service"),
                ),
            ],
        ),
    ];

    let lists = vec![
        list(
            ListId::PreviousResidences,
            vec![
                (
                    "country",
                    FieldRule::required()
                        .min_len(2)
                        .message("Country of previous residence is required"),
                ),
                ("from", date()),
                ("to", date()),
            ],
        ),
        list(
            ListId::EmploymentHistory,
            vec![
                (
                    "from",
                    FieldRule::required()
                        .check(CrossFieldCheck::PartialDate)
                        .message("Employment start date is required (YYYY-MM)"),
                ),
                ("to", month()),
                (
                    "occupation",
                    FieldRule::required()
                        .min_len(2)
                        .message("Occupation is required"),
                ),
            ],
        ),
    ];

    RuleTable::new(ValidationMode::Complete, sections, lists)
}

const CRITICAL_FIELDS: &[(SectionId, &str, &str)] = &[
    (SectionId::PersonalInfo, "familyName", "Family name is required"),
    (SectionId::PersonalInfo, "givenNames", "Given name(s) is required"),
    (SectionId::PersonalInfo, "dateOfBirth", "Date of birth is required"),
    (SectionId::PersonalInfo, "sex", "Sex is required"),
    (SectionId::PersonalInfo, "citizenship", "Citizenship is required"),
    (SectionId::PassportInfo, "number", "Passport number is required"),
    (
        SectionId::PassportInfo,
        "countryOfIssue",
        "Passport country of issue is required",
    ),
    (SectionId::PassportInfo, "issueDate", "Passport issue date is required"),
    (SectionId::PassportInfo, "expiryDate", "Passport expiry date is required"),
    (SectionId::ContactInfo, "email", "Email is required"),
    (SectionId::StudyDetails, "schoolName", "School name is required"),
    (SectionId::StudyDetails, "dliNumber", "DLI number is required"),
    (SectionId::StudyDetails, "levelOfStudy", "Level of study is required"),
    (SectionId::StudyDetails, "fieldOfStudy", "Field of study is required"),
    (SectionId::LanguageInfo, "nativeLanguage", "Native language is required"),
    (SectionId::MaritalInfo, "status", "Marital status is required"),
];

pub(super) fn minimal_table() -> RuleTable {
    let mut sections: Vec<SectionRules> = Vec::new();
    for (section_id, key, message) in CRITICAL_FIELDS {
        let rule = (*key, FieldRule::required().message(*message));
        match sections
            .iter_mut()
            .find(|rules| rules.section == *section_id)
        {
            Some(rules) => rules.fields.push(rule),
            None => sections.push(SectionRules {
                section: *section_id,
                fields: vec![rule],
            }),
        }
    }
    RuleTable::new(ValidationMode::Minimal, sections, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn complete_table_and_record_cover_the_same_leaves() {
        let table = complete_table();
        for section_id in SectionId::ALL {
            let record_keys: BTreeSet<&str> = ApplicationRecord::section_keys(section_id)
                .iter()
                .copied()
                .collect();
            let rule_keys: BTreeSet<&str> = table
                .sections()
                .iter()
                .filter(|rules| rules.section == section_id)
                .flat_map(|rules| rules.fields.iter().map(|(key, _)| *key))
                .collect();
            assert_eq!(
                record_keys,
                rule_keys,
                "rule coverage mismatch in {}",
                section_id.key()
            );
        }

        for rules in table.lists() {
            let item_keys: BTreeSet<&str> = rules.list.item_keys().iter().copied().collect();
            let rule_keys: BTreeSet<&str> = rules.fields.iter().map(|(key, _)| *key).collect();
            assert_eq!(item_keys, rule_keys);
        }
    }

    #[test]
    fn minimal_table_only_requires_presence() {
        let table = minimal_table();
        assert_eq!(table.field_count(), CRITICAL_FIELDS.len());
        for rules in table.sections() {
            for (key, rule) in &rules.fields {
                assert!(rule.constraints().is_empty(), "{key} carries constraints");
            }
        }
    }

    #[test]
    fn every_minimal_field_exists_in_the_record() {
        for (section_id, key, _) in CRITICAL_FIELDS {
            assert!(ApplicationRecord::section_keys(*section_id).contains(key));
        }
    }
}
