use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Free-text leaf. Absent, `null`, and `""` all read as missing; numbers and booleans sent by
/// older clients are kept in their textual form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text(Option<String>);

impl Text {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Some(value.into()))
    }

    pub const fn missing() -> Self {
        Self(None)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_deref().unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    /// Trimmed value, `None` when blank.
    pub fn value(&self) -> Option<&str> {
        let trimmed = self.as_str().trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Text {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Text {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TextVisitor)
    }
}

struct TextVisitor;

impl<'de> Visitor<'de> for TextVisitor {
    type Value = Text;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, boolean, or null")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Text, E> {
        Ok(Text::new(value))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Text, E> {
        Ok(Text::new(value))
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Text, E> {
        Ok(Text::new(value.to_string()))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Text, E> {
        Ok(Text::new(value.to_string()))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Text, E> {
        Ok(Text::new(value.to_string()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Text, E> {
        if value.fract() == 0.0 && value.abs() < 1e15 {
            Ok(Text::new(format!("{}", value as i64)))
        } else {
            Ok(Text::new(value.to_string()))
        }
    }

    fn visit_none<E: de::Error>(self) -> Result<Text, E> {
        Ok(Text::missing())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Text, E> {
        Ok(Text::missing())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Text, D::Error> {
        deserializer.deserialize_any(TextVisitor)
    }
}

/// Yes/no leaf. Accepts JSON booleans as well as the string forms HTML forms submit. Null,
/// absent, and blank mean the question was not answered, which is distinct from "No".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flag(Option<bool>);

impl Flag {
    pub const YES: Flag = Flag(Some(true));
    pub const NO: Flag = Flag(Some(false));
    pub const UNANSWERED: Flag = Flag(None);

    pub const fn is_set(self) -> bool {
        matches!(self.0, Some(true))
    }

    pub const fn answer(self) -> Option<bool> {
        self.0
    }

    pub const fn label(self) -> &'static str {
        match self.0 {
            Some(true) => "Yes",
            Some(false) => "No",
            None => "",
        }
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        Self(Some(value))
    }
}

impl Serialize for Flag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(value) => serializer.serialize_bool(value),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FlagVisitor)
    }
}

struct FlagVisitor;

impl<'de> Visitor<'de> for FlagVisitor {
    type Value = Flag;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a boolean, \"true\"/\"false\", \"yes\"/\"no\", or null")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Flag, E> {
        Ok(Flag::from(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Flag, E> {
        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" | "on" => Ok(Flag::YES),
            "false" | "no" | "n" | "0" | "off" => Ok(Flag::NO),
            "" => Ok(Flag::UNANSWERED),
            _ => Err(E::invalid_value(de::Unexpected::Str(value), &self)),
        }
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Flag, E> {
        Ok(Flag::from(value != 0))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Flag, E> {
        Ok(Flag::from(value != 0))
    }

    fn visit_none<E: de::Error>(self) -> Result<Flag, E> {
        Ok(Flag::UNANSWERED)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Flag, E> {
        Ok(Flag::UNANSWERED)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Flag, D::Error> {
        deserializer.deserialize_any(FlagVisitor)
    }
}

/// Borrowed view of one leaf used by rule evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    /// `None` when the question was left unanswered.
    Flag(Option<bool>),
}

impl<'a> FieldValue<'a> {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(value) => value.is_empty(),
            FieldValue::Flag(answer) => answer.is_none(),
        }
    }

    pub fn text(&self) -> &'a str {
        match self {
            FieldValue::Text(value) => value,
            FieldValue::Flag(Some(true)) => "true",
            FieldValue::Flag(Some(false)) => "false",
            FieldValue::Flag(None) => "",
        }
    }

    pub fn is_set(&self) -> bool {
        match self {
            FieldValue::Flag(answer) => *answer == Some(true),
            FieldValue::Text(value) => value.eq_ignore_ascii_case("true"),
        }
    }
}

impl<'a> From<&'a Text> for FieldValue<'a> {
    fn from(value: &'a Text) -> Self {
        FieldValue::Text(value.as_str())
    }
}

impl<'a> From<&'a Flag> for FieldValue<'a> {
    fn from(value: &'a Flag) -> Self {
        FieldValue::Flag(value.answer())
    }
}

/// Top-level blocks of the form, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionId {
    Application,
    PersonalInfo,
    MaritalInfo,
    LanguageInfo,
    PassportInfo,
    NationalIdInfo,
    UsPrInfo,
    ContactInfo,
    StudyDetails,
    EducationHistory,
    EmploymentHistory,
    BackgroundInfo,
}

impl SectionId {
    pub const ALL: [SectionId; 12] = [
        SectionId::Application,
        SectionId::PersonalInfo,
        SectionId::MaritalInfo,
        SectionId::LanguageInfo,
        SectionId::PassportInfo,
        SectionId::NationalIdInfo,
        SectionId::UsPrInfo,
        SectionId::ContactInfo,
        SectionId::StudyDetails,
        SectionId::EducationHistory,
        SectionId::EmploymentHistory,
        SectionId::BackgroundInfo,
    ];

    /// JSON key of the section. Root-level leaves report under `application`.
    pub const fn key(self) -> &'static str {
        match self {
            SectionId::Application => "application",
            SectionId::PersonalInfo => "personalInfo",
            SectionId::MaritalInfo => "maritalInfo",
            SectionId::LanguageInfo => "languageInfo",
            SectionId::PassportInfo => "passportInfo",
            SectionId::NationalIdInfo => "nationalIdInfo",
            SectionId::UsPrInfo => "usPRInfo",
            SectionId::ContactInfo => "contactInfo",
            SectionId::StudyDetails => "studyDetails",
            SectionId::EducationHistory => "educationHistory",
            SectionId::EmploymentHistory => "employmentHistory",
            SectionId::BackgroundInfo => "backgroundInfo",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SectionId::Application => "Application",
            SectionId::PersonalInfo => "Personal Details",
            SectionId::MaritalInfo => "Marital Status",
            SectionId::LanguageInfo => "Languages",
            SectionId::PassportInfo => "Passport",
            SectionId::NationalIdInfo => "National Identity Document",
            SectionId::UsPrInfo => "US Permanent Resident Card",
            SectionId::ContactInfo => "Contact Information",
            SectionId::StudyDetails => "Details of Intended Study in Canada",
            SectionId::EducationHistory => "Education",
            SectionId::EmploymentHistory => "Employment",
            SectionId::BackgroundInfo => "Background Information",
        }
    }

    /// Root leaves are reported as plain top-level entries rather than a nested map.
    pub const fn is_root(self) -> bool {
        matches!(self, SectionId::Application)
    }

    pub fn from_key(key: &str) -> Option<SectionId> {
        SectionId::ALL
            .into_iter()
            .find(|section| section.key() == key)
    }
}

/// Repeatable rows inside the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListId {
    PreviousResidences,
    EmploymentHistory,
}

impl ListId {
    pub const fn section(self) -> SectionId {
        match self {
            ListId::PreviousResidences => SectionId::PersonalInfo,
            ListId::EmploymentHistory => SectionId::EmploymentHistory,
        }
    }

    /// Error key for one item leaf, e.g. `previousResidences.0.country` or `1.occupation`.
    pub fn item_key(self, index: usize, key: &str) -> String {
        match self {
            ListId::PreviousResidences => format!("previousResidences.{index}.{key}"),
            ListId::EmploymentHistory => format!("{index}.{key}"),
        }
    }

    /// Full record path of one item leaf, e.g. `employmentHistory.0.occupation`.
    pub fn record_path(self, index: usize, key: &str) -> String {
        match self {
            ListId::PreviousResidences => format!("personalInfo.previousResidences.{index}.{key}"),
            ListId::EmploymentHistory => format!("employmentHistory.{index}.{key}"),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ListId::PreviousResidences => "previous residences",
            ListId::EmploymentHistory => "employment history",
        }
    }

    pub fn item_keys(self) -> &'static [&'static str] {
        match self {
            ListId::PreviousResidences => ResidencePeriod::keys(),
            ListId::EmploymentHistory => EmploymentEntry::keys(),
        }
    }
}

/// Address of a single leaf: section plus dotted key inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldRef {
    pub section: SectionId,
    pub key: &'static str,
}

impl FieldRef {
    pub const fn new(section: SectionId, key: &'static str) -> Self {
        Self { section, key }
    }

    /// Dotted record path, e.g. `studyDetails.dliNumber` or `uci` for root leaves.
    pub fn path(&self) -> String {
        if self.section.is_root() {
            self.key.to_string()
        } else {
            format!("{}.{}", self.section.key(), self.key)
        }
    }

    /// Resolves a dotted path against the known leaf keys.
    pub fn parse(path: &str) -> Option<FieldRef> {
        let path = path.trim();
        if let Some(key) = ApplicationRecord::section_keys(SectionId::Application)
            .iter()
            .find(|key| **key == path)
        {
            return Some(FieldRef::new(SectionId::Application, key));
        }

        let (section, rest) = path.split_once('.')?;
        let section = SectionId::from_key(section)?;
        ApplicationRecord::section_keys(section)
            .iter()
            .find(|key| **key == rest)
            .map(|key| FieldRef::new(section, key))
    }
}

/// Leaf lookup shared by every section and list item.
pub trait FieldSet {
    fn keys() -> &'static [&'static str];
    fn field(&self, key: &str) -> Option<FieldValue<'_>>;
}

macro_rules! field_set {
    ($ty:ty { $($key:literal => $($path:ident).+),+ $(,)? }) => {
        impl FieldSet for $ty {
            fn keys() -> &'static [&'static str] {
                &[$($key),+]
            }

            fn field(&self, key: &str) -> Option<FieldValue<'_>> {
                match key {
                    $($key => Some(FieldValue::from(&self.$($path).+)),)+
                    _ => None,
                }
            }
        }
    };
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonName {
    pub family_name: Text,
    pub given_names: Text,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaceOfBirth {
    pub city: Text,
    pub country: Text,
}

/// Country of residence for a date range (current, previous, or applying-from).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResidencePeriod {
    pub country: Text,
    pub status: Text,
    pub other: Text,
    pub from: Text,
    pub to: Text,
}

field_set!(ResidencePeriod {
    "country" => country,
    "status" => status,
    "other" => other,
    "from" => from,
    "to" => to,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplyingFrom {
    pub same_as_current: Flag,
    pub country: Text,
    pub status: Text,
    pub other: Text,
    pub from: Text,
    pub to: Text,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub family_name: Text,
    pub given_names: Text,
    pub has_other_names: Flag,
    pub other_names: PersonName,
    pub sex: Text,
    pub date_of_birth: Text,
    pub place_of_birth: PlaceOfBirth,
    pub citizenship: Text,
    pub current_residence: ResidencePeriod,
    pub previous_residences: Vec<ResidencePeriod>,
    pub applying_from: ApplyingFrom,
}

field_set!(PersonalInfo {
    "familyName" => family_name,
    "givenNames" => given_names,
    "hasOtherNames" => has_other_names,
    "otherNames.familyName" => other_names.family_name,
    "otherNames.givenNames" => other_names.given_names,
    "sex" => sex,
    "dateOfBirth" => date_of_birth,
    "placeOfBirth.city" => place_of_birth.city,
    "placeOfBirth.country" => place_of_birth.country,
    "citizenship" => citizenship,
    "currentResidence.country" => current_residence.country,
    "currentResidence.status" => current_residence.status,
    "currentResidence.other" => current_residence.other,
    "currentResidence.from" => current_residence.from,
    "currentResidence.to" => current_residence.to,
    "applyingFrom.sameAsCurrent" => applying_from.same_as_current,
    "applyingFrom.country" => applying_from.country,
    "applyingFrom.status" => applying_from.status,
    "applyingFrom.other" => applying_from.other,
    "applyingFrom.from" => applying_from.from,
    "applyingFrom.to" => applying_from.to,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreviousSpouse {
    pub family_name: Text,
    pub given_names: Text,
    pub date_of_birth: Text,
    pub relationship_type: Text,
    pub from: Text,
    pub to: Text,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaritalInfo {
    pub status: Text,
    pub date_of_marriage: Text,
    pub spouse: PersonName,
    pub previously_married: Flag,
    pub previous_spouse: PreviousSpouse,
}

impl MaritalInfo {
    /// Statuses for which a spouse and union date are collected.
    pub fn has_partner(&self) -> bool {
        matches!(self.status.as_str(), "Married" | "Common-law")
    }
}

field_set!(MaritalInfo {
    "status" => status,
    "dateOfMarriage" => date_of_marriage,
    "spouse.familyName" => spouse.family_name,
    "spouse.givenNames" => spouse.given_names,
    "previouslyMarried" => previously_married,
    "previousSpouse.familyName" => previous_spouse.family_name,
    "previousSpouse.givenNames" => previous_spouse.given_names,
    "previousSpouse.dateOfBirth" => previous_spouse.date_of_birth,
    "previousSpouse.relationshipType" => previous_spouse.relationship_type,
    "previousSpouse.from" => previous_spouse.from,
    "previousSpouse.to" => previous_spouse.to,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageInfo {
    pub native_language: Text,
    pub communicate_in_english_french: Text,
    pub most_at_ease: Text,
    pub language_test: Flag,
}

field_set!(LanguageInfo {
    "nativeLanguage" => native_language,
    "communicateInEnglishFrench" => communicate_in_english_french,
    "mostAtEase" => most_at_ease,
    "languageTest" => language_test,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PassportInfo {
    pub number: Text,
    pub country_of_issue: Text,
    pub issue_date: Text,
    pub expiry_date: Text,
    pub taiwan_passport: Flag,
    pub israeli_passport: Flag,
}

field_set!(PassportInfo {
    "number" => number,
    "countryOfIssue" => country_of_issue,
    "issueDate" => issue_date,
    "expiryDate" => expiry_date,
    "taiwanPassport" => taiwan_passport,
    "israeliPassport" => israeli_passport,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NationalIdInfo {
    pub has_document: Flag,
    pub document_number: Text,
    pub country_of_issue: Text,
    pub issue_date: Text,
    pub expiry_date: Text,
}

field_set!(NationalIdInfo {
    "hasDocument" => has_document,
    "documentNumber" => document_number,
    "countryOfIssue" => country_of_issue,
    "issueDate" => issue_date,
    "expiryDate" => expiry_date,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsPrInfo {
    pub is_permanent_resident: Flag,
    pub uscis_number: Text,
    pub expiry_date: Text,
}

field_set!(UsPrInfo {
    "isPermanentResident" => is_permanent_resident,
    "uscisNumber" => uscis_number,
    "expiryDate" => expiry_date,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MailingAddress {
    pub po_box: Text,
    pub apt_unit: Text,
    pub street_no: Text,
    pub street_name: Text,
    pub city: Text,
    pub country: Text,
    pub province_state: Text,
    pub postal_code: Text,
    pub district: Text,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResidentialAddress {
    pub apt_unit: Text,
    pub street_no: Text,
    pub street_name: Text,
    pub city: Text,
    pub country: Text,
    pub province_state: Text,
    pub postal_code: Text,
    pub district: Text,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Telephone {
    #[serde(rename = "type")]
    pub kind: Text,
    #[serde(rename = "isCanadaUS")]
    pub is_canada_us: Flag,
    pub country_code: Text,
    pub number: Text,
    pub ext: Text,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaxNumber {
    #[serde(rename = "isCanadaUS")]
    pub is_canada_us: Flag,
    pub country_code: Text,
    pub number: Text,
    pub ext: Text,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub mailing_address: MailingAddress,
    pub residential_same_as_mailing: Flag,
    pub residential_address: ResidentialAddress,
    pub telephone: Telephone,
    pub alternate_telephone: Telephone,
    pub fax: FaxNumber,
    pub email: Text,
}

field_set!(ContactInfo {
    "mailingAddress.poBox" => mailing_address.po_box,
    "mailingAddress.aptUnit" => mailing_address.apt_unit,
    "mailingAddress.streetNo" => mailing_address.street_no,
    "mailingAddress.streetName" => mailing_address.street_name,
    "mailingAddress.city" => mailing_address.city,
    "mailingAddress.country" => mailing_address.country,
    "mailingAddress.provinceState" => mailing_address.province_state,
    "mailingAddress.postalCode" => mailing_address.postal_code,
    "mailingAddress.district" => mailing_address.district,
    "residentialSameAsMailing" => residential_same_as_mailing,
    "residentialAddress.aptUnit" => residential_address.apt_unit,
    "residentialAddress.streetNo" => residential_address.street_no,
    "residentialAddress.streetName" => residential_address.street_name,
    "residentialAddress.city" => residential_address.city,
    "residentialAddress.country" => residential_address.country,
    "residentialAddress.provinceState" => residential_address.province_state,
    "residentialAddress.postalCode" => residential_address.postal_code,
    "residentialAddress.district" => residential_address.district,
    "telephone.type" => telephone.kind,
    "telephone.isCanadaUS" => telephone.is_canada_us,
    "telephone.countryCode" => telephone.country_code,
    "telephone.number" => telephone.number,
    "telephone.ext" => telephone.ext,
    "alternateTelephone.type" => alternate_telephone.kind,
    "alternateTelephone.isCanadaUS" => alternate_telephone.is_canada_us,
    "alternateTelephone.countryCode" => alternate_telephone.country_code,
    "alternateTelephone.number" => alternate_telephone.number,
    "alternateTelephone.ext" => alternate_telephone.ext,
    "fax.isCanadaUS" => fax.is_canada_us,
    "fax.countryCode" => fax.country_code,
    "fax.number" => fax.number,
    "fax.ext" => fax.ext,
    "email" => email,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchoolAddress {
    pub province: Text,
    pub city: Text,
    pub address: Text,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudyPeriod {
    pub from: Text,
    pub to: Text,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudyCosts {
    pub tuition: Text,
    pub room_and_board: Text,
    pub other: Text,
}

/// Provincial attestation letter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttestationLetter {
    pub document_number: Text,
    pub expiry_date: Text,
}

/// Quebec acceptance certificate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuebecCertificate {
    pub certificate_number: Text,
    pub expiry_date: Text,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudyDetails {
    pub school_name: Text,
    pub level_of_study: Text,
    pub field_of_study: Text,
    pub school_address: SchoolAddress,
    pub dli_number: Text,
    pub student_id: Text,
    pub duration: StudyPeriod,
    pub costs: StudyCosts,
    pub funds_available: Text,
    pub funding_source: Text,
    pub expenses_paid_by: Text,
    pub expenses_paid_by_other: Text,
    pub pal: AttestationLetter,
    pub caq: QuebecCertificate,
}

field_set!(StudyDetails {
    "schoolName" => school_name,
    "levelOfStudy" => level_of_study,
    "fieldOfStudy" => field_of_study,
    "schoolAddress.province" => school_address.province,
    "schoolAddress.city" => school_address.city,
    "schoolAddress.address" => school_address.address,
    "dliNumber" => dli_number,
    "studentId" => student_id,
    "duration.from" => duration.from,
    "duration.to" => duration.to,
    "costs.tuition" => costs.tuition,
    "costs.roomAndBoard" => costs.room_and_board,
    "costs.other" => costs.other,
    "fundsAvailable" => funds_available,
    "fundingSource" => funding_source,
    "expensesPaidBy" => expenses_paid_by,
    "expensesPaidByOther" => expenses_paid_by_other,
    "pal.documentNumber" => pal.document_number,
    "pal.expiryDate" => pal.expiry_date,
    "caq.certificateNumber" => caq.certificate_number,
    "caq.expiryDate" => caq.expiry_date,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HighestEducation {
    pub from: Text,
    pub to: Text,
    pub field_and_level: Text,
    pub school_name: Text,
    pub city: Text,
    pub country: Text,
    pub province_state: Text,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationHistory {
    pub has_post_secondary: Flag,
    pub education_level: Text,
    pub graduation_year: Text,
    pub highest_education: HighestEducation,
}

impl EducationHistory {
    /// Explicit graduation year, falling back to the year the highest program ended.
    pub fn graduation_year(&self) -> Option<i32> {
        self.graduation_year
            .value()
            .or_else(|| self.highest_education.to.value())
            .and_then(|raw| raw.get(..4))
            .and_then(|year| year.parse().ok())
    }
}

field_set!(EducationHistory {
    "hasPostSecondary" => has_post_secondary,
    "educationLevel" => education_level,
    "graduationYear" => graduation_year,
    "highestEducation.from" => highest_education.from,
    "highestEducation.to" => highest_education.to,
    "highestEducation.fieldAndLevel" => highest_education.field_and_level,
    "highestEducation.schoolName" => highest_education.school_name,
    "highestEducation.city" => highest_education.city,
    "highestEducation.country" => highest_education.country,
    "highestEducation.provinceState" => highest_education.province_state,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmploymentEntry {
    pub from: Text,
    pub to: Text,
    pub occupation: Text,
    pub company_name: Text,
    pub city: Text,
    pub country: Text,
    pub province_state: Text,
}

field_set!(EmploymentEntry {
    "from" => from,
    "to" => to,
    "occupation" => occupation,
    "companyName" => company_name,
    "city" => city,
    "country" => country,
    "provinceState" => province_state,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthBackground {
    pub tuberculosis: Flag,
    pub physical_mental_disorder: Flag,
    pub details: Text,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImmigrationBackground {
    pub overstayed: Flag,
    pub refused_visa: Flag,
    pub previous_application: Flag,
    pub details: Text,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CriminalBackground {
    pub has_record: Flag,
    pub details: Text,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MilitaryBackground {
    pub served: Flag,
    pub details: Text,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PoliticalBackground {
    pub member_of_party: Flag,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WarCrimesBackground {
    pub witnessed: Flag,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackgroundInfo {
    pub health: HealthBackground,
    pub immigration: ImmigrationBackground,
    pub criminal: CriminalBackground,
    pub military: MilitaryBackground,
    pub political: PoliticalBackground,
    pub war_crimes: WarCrimesBackground,
}

field_set!(BackgroundInfo {
    "health.tuberculosis" => health.tuberculosis,
    "health.physicalMentalDisorder" => health.physical_mental_disorder,
    "health.details" => health.details,
    "immigration.overstayed" => immigration.overstayed,
    "immigration.refusedVisa" => immigration.refused_visa,
    "immigration.previousApplication" => immigration.previous_application,
    "immigration.details" => immigration.details,
    "criminal.hasRecord" => criminal.has_record,
    "criminal.details" => criminal.details,
    "military.served" => military.served,
    "military.details" => military.details,
    "political.memberOfParty" => political.member_of_party,
    "warCrimes.witnessed" => war_crimes.witnessed,
});

const ROOT_KEYS: &[&str] = &["uci", "serviceLanguage"];

/// One applicant's complete form data. Sections are replaced through the explicit setters so
/// every mutation goes through a typed section value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationRecord {
    uci: Text,
    service_language: Text,
    personal_info: PersonalInfo,
    marital_info: MaritalInfo,
    language_info: LanguageInfo,
    passport_info: PassportInfo,
    national_id_info: NationalIdInfo,
    #[serde(rename = "usPRInfo")]
    us_pr_info: UsPrInfo,
    contact_info: ContactInfo,
    study_details: StudyDetails,
    education_history: EducationHistory,
    employment_history: Vec<EmploymentEntry>,
    background_info: BackgroundInfo,
}

impl ApplicationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uci(&self) -> &Text {
        &self.uci
    }

    pub fn service_language(&self) -> &Text {
        &self.service_language
    }

    pub fn personal_info(&self) -> &PersonalInfo {
        &self.personal_info
    }

    pub fn marital_info(&self) -> &MaritalInfo {
        &self.marital_info
    }

    pub fn language_info(&self) -> &LanguageInfo {
        &self.language_info
    }

    pub fn passport_info(&self) -> &PassportInfo {
        &self.passport_info
    }

    pub fn national_id_info(&self) -> &NationalIdInfo {
        &self.national_id_info
    }

    pub fn us_pr_info(&self) -> &UsPrInfo {
        &self.us_pr_info
    }

    pub fn contact_info(&self) -> &ContactInfo {
        &self.contact_info
    }

    pub fn study_details(&self) -> &StudyDetails {
        &self.study_details
    }

    pub fn education_history(&self) -> &EducationHistory {
        &self.education_history
    }

    pub fn employment_history(&self) -> &[EmploymentEntry] {
        &self.employment_history
    }

    pub fn background_info(&self) -> &BackgroundInfo {
        &self.background_info
    }

    pub fn set_uci(&mut self, uci: impl Into<Text>) {
        self.uci = uci.into();
    }

    pub fn set_service_language(&mut self, language: impl Into<Text>) {
        self.service_language = language.into();
    }

    pub fn set_personal_info(&mut self, section: PersonalInfo) {
        self.personal_info = section;
    }

    pub fn set_marital_info(&mut self, section: MaritalInfo) {
        self.marital_info = section;
    }

    pub fn set_language_info(&mut self, section: LanguageInfo) {
        self.language_info = section;
    }

    pub fn set_passport_info(&mut self, section: PassportInfo) {
        self.passport_info = section;
    }

    pub fn set_national_id_info(&mut self, section: NationalIdInfo) {
        self.national_id_info = section;
    }

    pub fn set_us_pr_info(&mut self, section: UsPrInfo) {
        self.us_pr_info = section;
    }

    pub fn set_contact_info(&mut self, section: ContactInfo) {
        self.contact_info = section;
    }

    pub fn set_study_details(&mut self, section: StudyDetails) {
        self.study_details = section;
    }

    pub fn set_education_history(&mut self, section: EducationHistory) {
        self.education_history = section;
    }

    pub fn set_employment_history(&mut self, entries: Vec<EmploymentEntry>) {
        self.employment_history = entries;
    }

    pub fn push_employment(&mut self, entry: EmploymentEntry) {
        self.employment_history.push(entry);
    }

    pub fn push_previous_residence(&mut self, residence: ResidencePeriod) {
        self.personal_info.previous_residences.push(residence);
    }

    pub fn set_background_info(&mut self, section: BackgroundInfo) {
        self.background_info = section;
    }

    /// Addressable leaf keys of a section; empty for list-only sections.
    pub fn section_keys(section: SectionId) -> &'static [&'static str] {
        match section {
            SectionId::Application => ROOT_KEYS,
            SectionId::PersonalInfo => PersonalInfo::keys(),
            SectionId::MaritalInfo => MaritalInfo::keys(),
            SectionId::LanguageInfo => LanguageInfo::keys(),
            SectionId::PassportInfo => PassportInfo::keys(),
            SectionId::NationalIdInfo => NationalIdInfo::keys(),
            SectionId::UsPrInfo => UsPrInfo::keys(),
            SectionId::ContactInfo => ContactInfo::keys(),
            SectionId::StudyDetails => StudyDetails::keys(),
            SectionId::EducationHistory => EducationHistory::keys(),
            SectionId::EmploymentHistory => &[],
            SectionId::BackgroundInfo => BackgroundInfo::keys(),
        }
    }

    pub fn field(&self, section: SectionId, key: &str) -> Option<FieldValue<'_>> {
        match section {
            SectionId::Application => match key {
                "uci" => Some(FieldValue::from(&self.uci)),
                "serviceLanguage" => Some(FieldValue::from(&self.service_language)),
                _ => None,
            },
            SectionId::PersonalInfo => self.personal_info.field(key),
            SectionId::MaritalInfo => self.marital_info.field(key),
            SectionId::LanguageInfo => self.language_info.field(key),
            SectionId::PassportInfo => self.passport_info.field(key),
            SectionId::NationalIdInfo => self.national_id_info.field(key),
            SectionId::UsPrInfo => self.us_pr_info.field(key),
            SectionId::ContactInfo => self.contact_info.field(key),
            SectionId::StudyDetails => self.study_details.field(key),
            SectionId::EducationHistory => self.education_history.field(key),
            SectionId::EmploymentHistory => None,
            SectionId::BackgroundInfo => self.background_info.field(key),
        }
    }

    /// Text of a leaf, `""` when missing or unknown.
    pub fn text(&self, field: FieldRef) -> &str {
        self.field(field.section, field.key)
            .map(|value| value.text())
            .unwrap_or("")
    }

    pub fn flag(&self, field: FieldRef) -> bool {
        self.field(field.section, field.key)
            .map(|value| value.is_set())
            .unwrap_or(false)
    }

    pub fn list_len(&self, list: ListId) -> usize {
        match list {
            ListId::PreviousResidences => self.personal_info.previous_residences.len(),
            ListId::EmploymentHistory => self.employment_history.len(),
        }
    }

    pub fn list_field(&self, list: ListId, index: usize, key: &str) -> Option<FieldValue<'_>> {
        match list {
            ListId::PreviousResidences => self
                .personal_info
                .previous_residences
                .get(index)
                .and_then(|item| item.field(key)),
            ListId::EmploymentHistory => self
                .employment_history
                .get(index)
                .and_then(|item| item.field(key)),
        }
    }

    /// "Family, Given" as printed in the continuation banner.
    pub fn applicant_name(&self) -> String {
        let family = self.personal_info.family_name.as_str().trim();
        let given = self.personal_info.given_names.as_str().trim();
        match (family.is_empty(), given.is_empty()) {
            (false, false) => format!("{family}, {given}"),
            (false, true) => family.to_string(),
            (true, false) => given.to_string(),
            (true, true) => String::new(),
        }
    }
}
