use super::domain::{
    ApplicationRecord, ApplyingFrom, BackgroundInfo, ContactInfo, EducationHistory,
    EmploymentEntry, HighestEducation, LanguageInfo, MailingAddress, MaritalInfo, PassportInfo,
    PersonalInfo, PlaceOfBirth, ResidencePeriod, SchoolAddress, StudyCosts, StudyDetails,
    StudyPeriod, Telephone, Text,
};

/// Reference applicant used by the CLI demo and by tests: a complete, valid application for a
/// September 2027 intake.
pub fn example_record() -> ApplicationRecord {
    let mut record = ApplicationRecord::new();
    record.set_uci("UCI123456");
    record.set_service_language("English");

    record.set_personal_info(PersonalInfo {
        family_name: Text::new("Smith"),
        given_names: Text::new("John Michael"),
        sex: Text::new("Male"),
        date_of_birth: Text::new("1995-03-15"),
        place_of_birth: PlaceOfBirth {
            city: Text::new("Mumbai"),
            country: Text::new("India"),
        },
        citizenship: Text::new("India"),
        current_residence: ResidencePeriod {
            country: Text::new("India"),
            status: Text::new("Citizen"),
            from: Text::new("1995-03-15"),
            ..ResidencePeriod::default()
        },
        applying_from: ApplyingFrom {
            same_as_current: true.into(),
            ..ApplyingFrom::default()
        },
        ..PersonalInfo::default()
    });

    record.set_marital_info(MaritalInfo {
        status: Text::new("Single"),
        ..MaritalInfo::default()
    });

    record.set_language_info(LanguageInfo {
        native_language: Text::new("Hindi"),
        communicate_in_english_french: Text::new("English"),
        most_at_ease: Text::new("English"),
        language_test: true.into(),
    });

    record.set_passport_info(PassportInfo {
        number: Text::new("K1234567"),
        country_of_issue: Text::new("India"),
        issue_date: Text::new("2020-01-10"),
        expiry_date: Text::new("2030-01-09"),
        ..PassportInfo::default()
    });

    record.set_contact_info(ContactInfo {
        mailing_address: MailingAddress {
            apt_unit: Text::new("402"),
            street_no: Text::new("12"),
            street_name: Text::new("Marine Drive"),
            city: Text::new("Mumbai"),
            country: Text::new("India"),
            province_state: Text::new("Maharashtra"),
            postal_code: Text::new("400020"),
            ..MailingAddress::default()
        },
        residential_same_as_mailing: true.into(),
        telephone: Telephone {
            kind: Text::new("Cellular"),
            country_code: Text::new("91"),
            number: Text::new("9876543210"),
            ..Telephone::default()
        },
        email: Text::new("john.smith@example.com"),
        ..ContactInfo::default()
    });

    record.set_study_details(StudyDetails {
        school_name: Text::new("University of Toronto"),
        level_of_study: Text::new("Master's Degree"),
        field_of_study: Text::new("Computer Science"),
        school_address: SchoolAddress {
            province: Text::new("Ontario"),
            city: Text::new("Toronto"),
            address: Text::new("27 King's College Circle"),
        },
        dli_number: Text::new("O19391173552"),
        student_id: Text::new("1009876543"),
        duration: StudyPeriod {
            from: Text::new("2027-09-01"),
            to: Text::new("2029-08-31"),
        },
        costs: StudyCosts {
            tuition: Text::new("35000"),
            room_and_board: Text::new("15000"),
            other: Text::new("5000"),
        },
        funds_available: Text::new("60000"),
        funding_source: Text::new("family"),
        expenses_paid_by: Text::new("Parents"),
        ..StudyDetails::default()
    });

    record.set_education_history(EducationHistory {
        has_post_secondary: true.into(),
        education_level: Text::new("bachelors"),
        graduation_year: Text::new("2018"),
        highest_education: HighestEducation {
            from: Text::new("2014-08"),
            to: Text::new("2018-05"),
            field_and_level: Text::new("Bachelor of Technology, Computer Engineering"),
            school_name: Text::new("Indian Institute of Technology Bombay"),
            city: Text::new("Mumbai"),
            country: Text::new("India"),
            province_state: Text::new("Maharashtra"),
        },
    });

    record.push_employment(EmploymentEntry {
        from: Text::new("2018-07"),
        to: Text::new("2026-06"),
        occupation: Text::new("Software Engineer"),
        company_name: Text::new("Tech Solutions Pvt Ltd"),
        city: Text::new("Bangalore"),
        country: Text::new("India"),
        province_state: Text::new("Karnataka"),
    });

    record.set_background_info(BackgroundInfo::default());
    record
}
