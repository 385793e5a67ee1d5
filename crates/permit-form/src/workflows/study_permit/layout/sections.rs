//! Form content, section by section, in the printed form's order.

use super::super::domain::{
    ApplicationRecord, BackgroundInfo, ContactInfo, FaxNumber, Flag, ListId, SectionId,
    Telephone, Text,
};
use super::composer::{Cell, Composer};
use super::model::{HEADING, MARGIN_LEFT, SMALL};
use super::text::format_date;
use super::{LayoutOptions, LayoutProfile};

const X: f32 = MARGIN_LEFT;

fn value(text: &Text) -> String {
    text.as_str().trim().to_string()
}

fn date(text: &Text) -> String {
    format_date(text.as_str())
}

fn yes_no(flag: Flag) -> &'static str {
    flag.label()
}

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[X]"
    } else {
        "[ ]"
    }
}

fn path(section: SectionId, key: &str) -> String {
    if section.is_root() {
        key.to_string()
    } else {
        format!("{}.{}", section.key(), key)
    }
}

fn funding_label(raw: &str) -> String {
    match raw {
        "personal_savings" => "Personal Savings",
        "family" | "family_support" => "Family Support",
        "scholarship" => "Scholarship/Grant",
        "loan" => "Education Loan",
        "sponsor" => "Sponsor",
        "other" => "Other",
        other => other,
    }
    .to_string()
}

fn education_label(raw: &str) -> String {
    match raw {
        "high_school" => "High School",
        "diploma" | "certificate" => "Diploma/Certificate",
        "bachelor" | "bachelors" => "Bachelor's Degree",
        "master" | "masters" => "Master's Degree",
        "phd" => "Doctoral Degree (PhD)",
        "other" => "Other",
        other => other,
    }
    .to_string()
}

pub(super) fn compose(record: &ApplicationRecord, options: &LayoutOptions, c: &mut Composer) {
    let personal = record.personal_info();
    c.set_banner(record.applicant_name(), date(&personal.date_of_birth));

    match options.profile {
        LayoutProfile::Complete => {
            identity(record, options, c);
            c.form_page();
            marital_status(record, c);
            c.form_page();
            previous_relationship(record, c);
            languages(record, c);
            passport(record, c);
            national_identity(record, c);
            us_permanent_residence(record, c);
            c.form_page();
            contact(record.contact_info(), true, c);
            c.form_page();
            study(record, c);
            education(record, c);
            employment(record, options, c);
            background(record.background_info(), c);
        }
        LayoutProfile::Essential => {
            identity(record, options, c);
            c.form_page();
            languages(record, c);
            passport(record, c);
            contact(record.contact_info(), false, c);
            c.form_page();
            study(record, c);
            c.form_page();
            education(record, c);
        }
    }
    disclaimer(c);
}

fn identity(record: &ApplicationRecord, options: &LayoutOptions, c: &mut Composer) {
    use SectionId::{Application, PersonalInfo};
    let personal = record.personal_info();
    let complete = options.profile == LayoutProfile::Complete;

    c.title(&["APPLICATION FOR STUDY PERMIT", "MADE OUTSIDE OF CANADA"]);
    if complete {
        c.row(vec![
            Cell::beside(X, "1. UCI", X + 50.0, value(record.uci())).path(path(Application, "uci")),
            Cell::beside(X + 250.0, "2. I want service in", X + 370.0, value(record.service_language()))
                .path(path(Application, "serviceLanguage")),
        ]);
    }

    c.section("PERSONAL DETAILS");
    c.caption(X, "1. Full name");
    c.row(vec![
        Cell::below(X + 5.0, "Family name (as shown on passport or travel document)", value(&personal.family_name))
            .path(path(PersonalInfo, "familyName")),
        Cell::below(320.0, "Given name(s) (as shown on passport or travel document)", value(&personal.given_names))
            .path(path(PersonalInfo, "givenNames")),
    ]);

    if complete {
        c.row(vec![Cell::question(
            X,
            "2. a) Have you ever used any other name (e.g. Nickname, maiden name, alias, etc.)?",
            yes_no(personal.has_other_names),
        )
        .path(path(PersonalInfo, "hasOtherNames"))]);
        if personal.has_other_names.is_set() {
            c.row(vec![
                Cell::below(X + 10.0, "b) Family name", value(&personal.other_names.family_name))
                    .path(path(PersonalInfo, "otherNames.familyName")),
                Cell::below(320.0, "Given name(s)", value(&personal.other_names.given_names))
                    .path(path(PersonalInfo, "otherNames.givenNames")),
            ]);
        }
    }

    c.row(vec![
        Cell::beside(X, "3. Sex", X + 50.0, value(&personal.sex)).path(path(PersonalInfo, "sex")),
        Cell::beside(200.0, "4. Date of birth", 300.0, date(&personal.date_of_birth))
            .path(path(PersonalInfo, "dateOfBirth")),
    ]);

    c.caption(X, "5. Place of birth");
    c.row(vec![
        Cell::below(X + 10.0, "City/Town", value(&personal.place_of_birth.city))
            .path(path(PersonalInfo, "placeOfBirth.city")),
        Cell::below(320.0, "Country or Territory", value(&personal.place_of_birth.country))
            .path(path(PersonalInfo, "placeOfBirth.country")),
    ]);

    c.row(vec![Cell::below(X, "6. Citizenship", value(&personal.citizenship))
        .bold()
        .path(path(PersonalInfo, "citizenship"))]);

    let residence = &personal.current_residence;
    c.caption(X, "7. Current country or territory of residence");
    c.row(vec![
        Cell::below(X + 10.0, "Country or Territory", value(&residence.country))
            .path(path(PersonalInfo, "currentResidence.country")),
        Cell::below(200.0, "Status", value(&residence.status)).path(path(PersonalInfo, "currentResidence.status")),
        Cell::below(350.0, "From", date(&residence.from)).path(path(PersonalInfo, "currentResidence.from")),
        Cell::below(450.0, "To", date(&residence.to)).path(path(PersonalInfo, "currentResidence.to")),
    ]);
    if is_other(&residence.status) {
        c.row(vec![Cell::below(X + 10.0, "Other (specify)", value(&residence.other))
            .path(path(PersonalInfo, "currentResidence.other"))]);
    }

    if !complete {
        return;
    }

    c.caption(X, "8. Previous countries or territories of residence");
    c.note(
        X,
        "During the past five years have you lived in any country or territory other than your country of citizenship or current country/territory of residence for more than six months?",
        SMALL,
    );
    let list = ListId::PreviousResidences;
    c.repeat(list, &personal.previous_residences, options.previous_residences, |index, item| {
        vec![vec![
            Cell::below(X + 10.0, "Country or Territory", value(&item.country))
                .path(list.record_path(index, "country")),
            Cell::below(200.0, "Status", value(&item.status)).path(list.record_path(index, "status")),
            Cell::below(350.0, "From", date(&item.from)).path(list.record_path(index, "from")),
            Cell::below(450.0, "To", date(&item.to)).path(list.record_path(index, "to")),
        ]]
    });

    let applying = &personal.applying_from;
    c.caption(X, "9. Country or territory where applying");
    c.row(vec![Cell::question(
        X + 10.0,
        "Same as current country or territory of residence?",
        yes_no(applying.same_as_current),
    )
    .path(path(PersonalInfo, "applyingFrom.sameAsCurrent"))]);
    if !applying.same_as_current.is_set() {
        c.row(vec![
            Cell::below(X + 10.0, "Country or Territory", value(&applying.country))
                .path(path(PersonalInfo, "applyingFrom.country")),
            Cell::below(200.0, "Status", value(&applying.status)).path(path(PersonalInfo, "applyingFrom.status")),
            Cell::below(350.0, "From", date(&applying.from)).path(path(PersonalInfo, "applyingFrom.from")),
            Cell::below(450.0, "To", date(&applying.to)).path(path(PersonalInfo, "applyingFrom.to")),
        ]);
    }
}

fn is_other(status: &Text) -> bool {
    status.value().is_some_and(|status| status.eq_ignore_ascii_case("other"))
}

fn marital_status(record: &ApplicationRecord, c: &mut Composer) {
    use SectionId::MaritalInfo;
    let marital = record.marital_info();

    c.section("MARITAL STATUS");
    c.row(vec![Cell::below(X, "10. a) Your current marital status", value(&marital.status))
        .bold()
        .path(path(MaritalInfo, "status"))]);

    if marital.has_partner() {
        c.caption(X + 10.0, "b) If you are married or in a common-law relationship");
        c.row(vec![Cell::below(
            X + 15.0,
            "Provide the date on which you were married or entered into the common-law relationship",
            date(&marital.date_of_marriage),
        )
        .path(path(MaritalInfo, "dateOfMarriage"))]);
        c.caption(X + 10.0, "c) Provide the name of your current Spouse/Common-law partner");
        c.row(vec![
            Cell::below(X + 15.0, "Family name", value(&marital.spouse.family_name))
                .path(path(MaritalInfo, "spouse.familyName")),
            Cell::below(320.0, "Given name(s)", value(&marital.spouse.given_names))
                .path(path(MaritalInfo, "spouse.givenNames")),
        ]);
    }

    c.gap(50.0);
    c.note(X + 100.0, "FOR OFFICE USE ONLY - DO NOT WRITE IN THIS SPACE", HEADING);
}

fn previous_relationship(record: &ApplicationRecord, c: &mut Composer) {
    use SectionId::MaritalInfo;
    let marital = record.marital_info();
    let previous = &marital.previous_spouse;

    c.section("PERSONAL DETAILS (CONTINUED)");
    c.row(vec![Cell::question(
        X,
        "11. a) Have you previously been married or in a common-law relationship?",
        yes_no(marital.previously_married),
    )
    .path(path(MaritalInfo, "previouslyMarried"))]);

    if marital.previously_married.is_set() {
        c.caption(X + 5.0, "b) Provide the following details for your previous Spouse/Common-law Partner:");
        c.row(vec![
            Cell::below(X + 10.0, "Family name", value(&previous.family_name))
                .path(path(MaritalInfo, "previousSpouse.familyName")),
            Cell::below(320.0, "Given name(s)", value(&previous.given_names))
                .path(path(MaritalInfo, "previousSpouse.givenNames")),
        ]);
        c.row(vec![
            Cell::below(X + 10.0, "c) Date of birth", date(&previous.date_of_birth))
                .path(path(MaritalInfo, "previousSpouse.dateOfBirth")),
            Cell::below(200.0, "d) Type of relationship", value(&previous.relationship_type))
                .path(path(MaritalInfo, "previousSpouse.relationshipType")),
            Cell::below(380.0, "From", date(&previous.from)).path(path(MaritalInfo, "previousSpouse.from")),
            Cell::below(470.0, "To", date(&previous.to)).path(path(MaritalInfo, "previousSpouse.to")),
        ]);
    }
}

fn languages(record: &ApplicationRecord, c: &mut Composer) {
    use SectionId::LanguageInfo;
    let language = record.language_info();

    c.section("LANGUAGE(S)");
    c.row(vec![
        Cell::below(X + 5.0, "1. a) Native language/Mother tongue", value(&language.native_language))
            .bold()
            .path(path(LanguageInfo, "nativeLanguage")),
        Cell::below(
            300.0,
            "b) Are you able to communicate in English and/or French?",
            value(&language.communicate_in_english_french),
        )
        .bold()
        .path(path(LanguageInfo, "communicateInEnglishFrench")),
    ]);
    c.row(vec![Cell::below(X + 5.0, "c) In which language are you most at ease?", value(&language.most_at_ease))
        .path(path(LanguageInfo, "mostAtEase"))]);
    c.row(vec![Cell::question(
        X + 5.0,
        "d) Have you taken a test from a designated testing agency to assess your proficiency in English or French?",
        yes_no(language.language_test),
    )
    .path(path(LanguageInfo, "languageTest"))]);
}

fn passport(record: &ApplicationRecord, c: &mut Composer) {
    use SectionId::PassportInfo;
    let passport = record.passport_info();

    c.section("PASSPORT");
    c.row(vec![
        Cell::below(X, "1. Passport number", value(&passport.number))
            .bold()
            .path(path(PassportInfo, "number")),
        Cell::below(250.0, "2. Country or territory of issue", value(&passport.country_of_issue))
            .bold()
            .path(path(PassportInfo, "countryOfIssue")),
    ]);
    c.row(vec![
        Cell::beside(X, "3. Issue date", X + 80.0, date(&passport.issue_date)).path(path(PassportInfo, "issueDate")),
        Cell::beside(250.0, "4. Expiry date", 330.0, date(&passport.expiry_date))
            .path(path(PassportInfo, "expiryDate")),
    ]);
    c.row(vec![Cell::question(
        X,
        "5. For this trip, will you use a passport issued by the Ministry of Foreign Affairs in Taiwan that includes your personal identification number?",
        yes_no(passport.taiwan_passport),
    )
    .path(path(PassportInfo, "taiwanPassport"))]);
    c.row(vec![Cell::question(
        X,
        "6. For this trip, will you use a National Israeli passport?",
        yes_no(passport.israeli_passport),
    )
    .path(path(PassportInfo, "israeliPassport"))]);
}

fn national_identity(record: &ApplicationRecord, c: &mut Composer) {
    use SectionId::NationalIdInfo;
    let national = record.national_id_info();

    c.section("NATIONAL IDENTITY DOCUMENT");
    c.row(vec![Cell::question(X, "1. Do you have a national identity document?", yes_no(national.has_document))
        .path(path(NationalIdInfo, "hasDocument"))]);
    if national.has_document.is_set() {
        c.row(vec![
            Cell::below(X + 5.0, "2. Document number", value(&national.document_number))
                .path(path(NationalIdInfo, "documentNumber")),
            Cell::below(300.0, "3. Country or territory of issue", value(&national.country_of_issue))
                .path(path(NationalIdInfo, "countryOfIssue")),
        ]);
        c.row(vec![
            Cell::below(X + 5.0, "4. Issue date", date(&national.issue_date)).path(path(NationalIdInfo, "issueDate")),
            Cell::below(250.0, "5. Expiry date", date(&national.expiry_date))
                .path(path(NationalIdInfo, "expiryDate")),
        ]);
    }
}

fn us_permanent_residence(record: &ApplicationRecord, c: &mut Composer) {
    use SectionId::UsPrInfo;
    let us_pr = record.us_pr_info();

    c.section("US PR CARD");
    c.row(vec![Cell::question(
        X,
        "1. Are you a lawful permanent resident of the United States with a valid alien registration card (green card)?",
        yes_no(us_pr.is_permanent_resident),
    )
    .path(path(UsPrInfo, "isPermanentResident"))]);
    if us_pr.is_permanent_resident.is_set() {
        c.row(vec![
            Cell::below(
                X + 5.0,
                "2. U.S. Citizenship and Immigration Services (USCIS) number",
                value(&us_pr.uscis_number),
            )
            .path(path(UsPrInfo, "uscisNumber")),
            Cell::below(400.0, "3. Expiry date", date(&us_pr.expiry_date)).path(path(UsPrInfo, "expiryDate")),
        ]);
    }
}

fn contact(contact: &ContactInfo, complete: bool, c: &mut Composer) {
    use SectionId::ContactInfo as Section;
    let mailing = &contact.mailing_address;

    c.section("CONTACT INFORMATION");
    c.caption(X, "1. Current mailing address");
    c.row(vec![
        Cell::below(X + 5.0, "P.O. box", value(&mailing.po_box)).path(path(Section, "mailingAddress.poBox")),
        Cell::below(120.0, "Apt/Unit", value(&mailing.apt_unit)).path(path(Section, "mailingAddress.aptUnit")),
        Cell::below(200.0, "Street no.", value(&mailing.street_no)).path(path(Section, "mailingAddress.streetNo")),
        Cell::below(280.0, "Street name", value(&mailing.street_name))
            .path(path(Section, "mailingAddress.streetName")),
    ]);
    c.row(vec![
        Cell::below(X + 5.0, "City/Town", value(&mailing.city)).path(path(Section, "mailingAddress.city")),
        Cell::below(200.0, "Country or Territory", value(&mailing.country))
            .path(path(Section, "mailingAddress.country")),
        Cell::below(350.0, "Province/State", value(&mailing.province_state))
            .path(path(Section, "mailingAddress.provinceState")),
    ]);
    c.row(vec![
        Cell::below(X + 5.0, "Postal code", value(&mailing.postal_code))
            .path(path(Section, "mailingAddress.postalCode")),
        Cell::below(200.0, "District", value(&mailing.district)).path(path(Section, "mailingAddress.district")),
    ]);

    if complete {
        c.row(vec![Cell::question(
            X,
            "2. Residential address same as mailing address?",
            yes_no(contact.residential_same_as_mailing),
        )
        .path(path(Section, "residentialSameAsMailing"))]);
        if !contact.residential_same_as_mailing.is_set() {
            let home = &contact.residential_address;
            c.row(vec![
                Cell::below(X + 5.0, "Apt/Unit", value(&home.apt_unit))
                    .path(path(Section, "residentialAddress.aptUnit")),
                Cell::below(120.0, "Street no.", value(&home.street_no))
                    .path(path(Section, "residentialAddress.streetNo")),
                Cell::below(200.0, "Street name", value(&home.street_name))
                    .path(path(Section, "residentialAddress.streetName")),
                Cell::below(400.0, "City/Town", value(&home.city)).path(path(Section, "residentialAddress.city")),
            ]);
            c.row(vec![
                Cell::below(X + 5.0, "Country or Territory", value(&home.country))
                    .path(path(Section, "residentialAddress.country")),
                Cell::below(200.0, "Province/State", value(&home.province_state))
                    .path(path(Section, "residentialAddress.provinceState")),
                Cell::below(350.0, "Postal code", value(&home.postal_code))
                    .path(path(Section, "residentialAddress.postalCode")),
                Cell::below(450.0, "District", value(&home.district))
                    .path(path(Section, "residentialAddress.district")),
            ]);
        }
    }

    c.caption(X, "3. Telephone no.");
    c.row(telephone_row(&contact.telephone, "telephone"));

    if complete {
        c.caption(X, "4. Alternate telephone no.");
        if contact.alternate_telephone.number.value().is_some() {
            c.row(telephone_row(&contact.alternate_telephone, "alternateTelephone"));
        }
        c.caption(X, "5. Fax no.");
        if contact.fax.number.value().is_some() {
            c.row(fax_row(&contact.fax));
        }
    }

    c.row(vec![Cell::below(X, "6. E-mail address", value(&contact.email))
        .bold()
        .path(path(Section, "email"))]);
}

fn telephone_row(phone: &Telephone, prefix: &str) -> Vec<Cell> {
    let key = |leaf: &str| path(SectionId::ContactInfo, &format!("{prefix}.{leaf}"));
    vec![
        Cell::below(X + 10.0, "Canada/US", checkbox(phone.is_canada_us.is_set())).path(key("isCanadaUS")),
        Cell::below(110.0, "Other", checkbox(!phone.is_canada_us.is_set())),
        Cell::below(160.0, "Type", value(&phone.kind)).path(key("type")),
        Cell::below(240.0, "Country code", value(&phone.country_code)).path(key("countryCode")),
        Cell::below(320.0, "No.", value(&phone.number)).path(key("number")),
        Cell::below(450.0, "Ext.", value(&phone.ext)).path(key("ext")),
    ]
}

fn fax_row(fax: &FaxNumber) -> Vec<Cell> {
    let key = |leaf: &str| path(SectionId::ContactInfo, &format!("fax.{leaf}"));
    vec![
        Cell::below(X + 10.0, "Canada/US", checkbox(fax.is_canada_us.is_set())).path(key("isCanadaUS")),
        Cell::below(110.0, "Other", checkbox(!fax.is_canada_us.is_set())),
        Cell::below(160.0, "Country code", value(&fax.country_code)).path(key("countryCode")),
        Cell::below(250.0, "No.", value(&fax.number)).path(key("number")),
        Cell::below(400.0, "Ext.", value(&fax.ext)).path(key("ext")),
    ]
}

fn study(record: &ApplicationRecord, c: &mut Composer) {
    use SectionId::StudyDetails;
    let study = record.study_details();

    c.section("DETAILS OF INTENDED STUDY IN CANADA");
    c.row(vec![Cell::below(X, "1. Name of school/institution", value(&study.school_name))
        .bold()
        .path(path(StudyDetails, "schoolName"))]);
    c.row(vec![
        Cell::below(X, "2. Level of study", value(&study.level_of_study))
            .bold()
            .path(path(StudyDetails, "levelOfStudy")),
        Cell::below(250.0, "3. Field of study", value(&study.field_of_study))
            .bold()
            .path(path(StudyDetails, "fieldOfStudy")),
    ]);
    c.caption(X, "4. School address");
    c.row(vec![
        Cell::below(X + 5.0, "Province", value(&study.school_address.province))
            .path(path(StudyDetails, "schoolAddress.province")),
        Cell::below(200.0, "City/Town", value(&study.school_address.city))
            .path(path(StudyDetails, "schoolAddress.city")),
        Cell::below(330.0, "Address", value(&study.school_address.address))
            .path(path(StudyDetails, "schoolAddress.address")),
    ]);
    c.row(vec![
        Cell::below(X, "5. Designated learning institution # (DLI #)", value(&study.dli_number))
            .bold()
            .path(path(StudyDetails, "dliNumber")),
        Cell::below(300.0, "6. Student ID # (if applicable)", value(&study.student_id))
            .bold()
            .path(path(StudyDetails, "studentId")),
    ]);
    c.caption(X, "7. Duration of expected study");
    c.row(vec![
        Cell::beside(X + 5.0, "From", X + 45.0, date(&study.duration.from)).path(path(StudyDetails, "duration.from")),
        Cell::beside(250.0, "To", 280.0, date(&study.duration.to)).path(path(StudyDetails, "duration.to")),
    ]);
    c.caption(X, "8. Cost of studies (CAD)");
    c.row(vec![
        Cell::below(X + 5.0, "Tuition", value(&study.costs.tuition)).path(path(StudyDetails, "costs.tuition")),
        Cell::below(200.0, "Room and board", value(&study.costs.room_and_board))
            .path(path(StudyDetails, "costs.roomAndBoard")),
        Cell::below(350.0, "Other", value(&study.costs.other)).path(path(StudyDetails, "costs.other")),
    ]);
    c.row(vec![
        Cell::below(X, "9. Funds available for my stay (CAD)", value(&study.funds_available))
            .bold()
            .path(path(StudyDetails, "fundsAvailable")),
        Cell::below(300.0, "Source of funds", funding_label(study.funding_source.as_str().trim()))
            .path(path(StudyDetails, "fundingSource")),
    ]);

    let mut paid_by = vec![Cell::below(X, "10. My expenses in Canada will be paid by", value(&study.expenses_paid_by))
        .bold()
        .path(path(StudyDetails, "expensesPaidBy"))];
    if is_other(&study.expenses_paid_by) {
        paid_by.push(
            Cell::below(300.0, "Other (specify)", value(&study.expenses_paid_by_other))
                .path(path(StudyDetails, "expensesPaidByOther")),
        );
    }
    c.row(paid_by);

    let quebec = study
        .school_address
        .province
        .value()
        .is_some_and(|province| province.eq_ignore_ascii_case("quebec") || province.eq_ignore_ascii_case("qc"));
    if quebec {
        c.row(vec![
            Cell::below(X + 5.0, "Quebec acceptance certificate (CAQ) number", value(&study.caq.certificate_number))
                .path(path(StudyDetails, "caq.certificateNumber")),
            Cell::below(350.0, "Expiry date", date(&study.caq.expiry_date)).path(path(StudyDetails, "caq.expiryDate")),
        ]);
    } else {
        c.row(vec![
            Cell::below(X + 5.0, "Provincial attestation letter (PAL) number", value(&study.pal.document_number))
                .path(path(StudyDetails, "pal.documentNumber")),
            Cell::below(350.0, "Expiry date", date(&study.pal.expiry_date)).path(path(StudyDetails, "pal.expiryDate")),
        ]);
    }
}

fn education(record: &ApplicationRecord, c: &mut Composer) {
    use SectionId::EducationHistory;
    let education = record.education_history();
    let highest = &education.highest_education;

    c.section("EDUCATION");
    c.row(vec![Cell::question(
        X,
        "1. Have you had any post secondary education (including university, college or apprenticeship training)?",
        yes_no(education.has_post_secondary),
    )
    .path(path(EducationHistory, "hasPostSecondary"))]);
    c.row(vec![
        Cell::below(X + 5.0, "Highest level of education", education_label(education.education_level.as_str().trim()))
            .path(path(EducationHistory, "educationLevel")),
        Cell::below(300.0, "Graduation year", value(&education.graduation_year))
            .path(path(EducationHistory, "graduationYear")),
    ]);

    if education.has_post_secondary.is_set() {
        c.row(vec![
            Cell::beside(X + 5.0, "From", X + 45.0, date(&highest.from))
                .path(path(EducationHistory, "highestEducation.from")),
            Cell::beside(250.0, "To", 280.0, date(&highest.to)).path(path(EducationHistory, "highestEducation.to")),
        ]);
        c.row(vec![
            Cell::below(X + 5.0, "Field of study and level", value(&highest.field_and_level))
                .path(path(EducationHistory, "highestEducation.fieldAndLevel")),
            Cell::below(300.0, "School/facility name", value(&highest.school_name))
                .path(path(EducationHistory, "highestEducation.schoolName")),
        ]);
        c.row(vec![
            Cell::below(X + 5.0, "City/Town", value(&highest.city)).path(path(EducationHistory, "highestEducation.city")),
            Cell::below(200.0, "Country or Territory", value(&highest.country))
                .path(path(EducationHistory, "highestEducation.country")),
            Cell::below(380.0, "Province/State", value(&highest.province_state))
                .path(path(EducationHistory, "highestEducation.provinceState")),
        ]);
    }
}

fn employment(record: &ApplicationRecord, options: &LayoutOptions, c: &mut Composer) {
    let list = ListId::EmploymentHistory;
    let entries = record.employment_history();

    c.section("EMPLOYMENT");
    c.caption(X, "1. Details of your employment for the past 10 years");
    if entries.is_empty() {
        c.note(X + 5.0, "No employment history provided.", SMALL);
        return;
    }
    c.repeat(list, entries, options.employment, |index, job| {
        vec![
            vec![
                Cell::below(X + 5.0, "From", date(&job.from)).path(list.record_path(index, "from")),
                Cell::below(130.0, "To", date(&job.to)).path(list.record_path(index, "to")),
                Cell::below(205.0, "Occupation", value(&job.occupation)).path(list.record_path(index, "occupation")),
                Cell::below(380.0, "Company/employer", value(&job.company_name))
                    .path(list.record_path(index, "companyName")),
            ],
            vec![
                Cell::below(X + 5.0, "City/Town", value(&job.city)).path(list.record_path(index, "city")),
                Cell::below(205.0, "Country or Territory", value(&job.country)).path(list.record_path(index, "country")),
                Cell::below(380.0, "Province/State", value(&job.province_state))
                    .path(list.record_path(index, "provinceState")),
            ],
        ]
    });
}

fn background(background: &BackgroundInfo, c: &mut Composer) {
    use SectionId::BackgroundInfo as Section;

    c.section("BACKGROUND INFORMATION");

    let health = &background.health;
    c.row(vec![Cell::question(
        X,
        "1. a) Within the past two years, have you or a family member ever had tuberculosis of the lungs or been in close contact with a person with tuberculosis?",
        yes_no(health.tuberculosis),
    )
    .path(path(Section, "health.tuberculosis"))]);
    c.row(vec![Cell::question(
        X,
        "b) Do you have any physical or mental disorder that would require social and/or health services, other than medication, during a stay in Canada?",
        yes_no(health.physical_mental_disorder),
    )
    .path(path(Section, "health.physicalMentalDisorder"))]);
    if health.tuberculosis.is_set() || health.physical_mental_disorder.is_set() {
        c.answer(X + 10.0, "Please provide details", &value(&health.details), path(Section, "health.details"));
    }

    let immigration = &background.immigration;
    c.row(vec![Cell::question(
        X,
        "2. a) Have you ever remained beyond the validity of your status, attended school without authorization or worked without authorization in Canada?",
        yes_no(immigration.overstayed),
    )
    .path(path(Section, "immigration.overstayed"))]);
    c.row(vec![Cell::question(
        X,
        "b) Have you ever been refused a visa or permit, denied entry or ordered to leave Canada or any other country or territory?",
        yes_no(immigration.refused_visa),
    )
    .path(path(Section, "immigration.refusedVisa"))]);
    c.row(vec![Cell::question(
        X,
        "c) Have you previously applied to enter or remain in Canada?",
        yes_no(immigration.previous_application),
    )
    .path(path(Section, "immigration.previousApplication"))]);
    if immigration.overstayed.is_set()
        || immigration.refused_visa.is_set()
        || immigration.previous_application.is_set()
    {
        c.answer(X + 10.0, "Please provide details", &value(&immigration.details), path(Section, "immigration.details"));
    }

    let criminal = &background.criminal;
    c.row(vec![Cell::question(
        X,
        "3. Have you ever committed, been arrested for, been charged with or convicted of any criminal offence in any country or territory?",
        yes_no(criminal.has_record),
    )
    .path(path(Section, "criminal.hasRecord"))]);
    if criminal.has_record.is_set() {
        c.answer(X + 10.0, "Please provide details", &value(&criminal.details), path(Section, "criminal.details"));
    }

    let military = &background.military;
    c.row(vec![Cell::question(
        X,
        "4. Did you serve in any military, militia, or civil defence unit or serve in a security organization or police force (including non obligatory national service, reserve or volunteer units)?",
        yes_no(military.served),
    )
    .path(path(Section, "military.served"))]);
    if military.served.is_set() {
        c.answer(
            X + 10.0,
            "Please provide dates of service and countries or territories where you served",
            &value(&military.details),
            path(Section, "military.details"),
        );
    }

    c.row(vec![Cell::question(
        X,
        "5. Are you, or have you ever been a member or associated with any political party, or other group or organization which has engaged in or advocated violence as a means to achieving a political or religious objective, or which has been associated with criminal activity at any time?",
        yes_no(background.political.member_of_party),
    )
    .path(path(Section, "political.memberOfParty"))]);
    c.row(vec![Cell::question(
        X,
        "6. Have you ever witnessed or participated in the ill treatment of prisoners or civilians, looting or desecration of religious buildings?",
        yes_no(background.war_crimes.witnessed),
    )
    .path(path(Section, "warCrimes.witnessed"))]);
}

fn disclaimer(c: &mut Composer) {
    c.gap(10.0);
    c.note(
        X,
        "This form is for information purposes only and does not constitute legal advice.",
        SMALL,
    );
    c.note(X, "For official IMM 1294 form, visit: canada.ca/study-permit", SMALL);
}
