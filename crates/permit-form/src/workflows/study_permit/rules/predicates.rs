use chrono::{Datelike, NaiveDate};

use super::super::calendar::{
    add_months, age_in_years, parse_amount, parse_calendar_date, parse_partial_date,
};
use super::super::domain::{ApplicationRecord, FieldRef, FieldValue, SectionId};

const DATE_OF_BIRTH: FieldRef = FieldRef::new(SectionId::PersonalInfo, "dateOfBirth");
const MARITAL_STATUS: FieldRef = FieldRef::new(SectionId::MaritalInfo, "status");

/// Named predicates that need more than the leaf's own text: other leaves or today's date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrossFieldCheck {
    /// Age on `today` (days / 365.25) within `[min, max]`.
    AgeWithin { min: f64, max: f64 },
    NotInFuture,
    /// Expiry after the issue date and after `today + months`.
    PassportValidity { issue_date: FieldRef, months: u32 },
    /// Only enforced for married and common-law applicants.
    MarriageAfterBirth,
    /// Funds at least the tuition leaf plus a living allowance.
    FundsCoverTuition { tuition: FieldRef, allowance: f64 },
    /// Start date at least `months` after today.
    StartLeadTime { months: u32 },
    EndsAfter { start: FieldRef },
    AmountWithin { min: f64, max: f64 },
    /// Four digit year in `[earliest, current year + years_ahead]`.
    YearWithin { earliest: i32, years_ahead: i32 },
    CalendarDate,
    PartialDate,
}

impl CrossFieldCheck {
    /// Returns the default failure message when the predicate does not hold.
    pub fn evaluate(
        &self,
        value: FieldValue<'_>,
        record: &ApplicationRecord,
        today: NaiveDate,
    ) -> Result<(), String> {
        let raw = value.text();
        let holds = match *self {
            CrossFieldCheck::AgeWithin { min, max } => parse_calendar_date(raw)
                .map(|dob| age_in_years(dob, today))
                .is_some_and(|age| age >= min && age <= max),
            CrossFieldCheck::NotInFuture => {
                parse_calendar_date(raw).is_some_and(|date| date <= today)
            }
            CrossFieldCheck::PassportValidity { issue_date, months } => {
                match (
                    parse_calendar_date(raw),
                    parse_calendar_date(record.text(issue_date)),
                ) {
                    (Some(expiry), Some(issued)) => {
                        expiry > issued && expiry > add_months(today, months)
                    }
                    _ => false,
                }
            }
            CrossFieldCheck::MarriageAfterBirth => {
                if !matches!(record.text(MARITAL_STATUS), "Married" | "Common-law") {
                    true
                } else {
                    match (
                        parse_calendar_date(raw),
                        parse_calendar_date(record.text(DATE_OF_BIRTH)),
                    ) {
                        (Some(married), Some(born)) => married > born && married <= today,
                        _ => false,
                    }
                }
            }
            CrossFieldCheck::FundsCoverTuition { tuition, allowance } => {
                let tuition = parse_amount(record.text(tuition)).unwrap_or(0.0);
                parse_amount(raw).is_some_and(|funds| funds >= tuition + allowance)
            }
            CrossFieldCheck::StartLeadTime { months } => {
                parse_calendar_date(raw).is_some_and(|start| start >= add_months(today, months))
            }
            CrossFieldCheck::EndsAfter { start } => match parse_partial_date(raw) {
                Some(end) => parse_partial_date(record.text(start)).map_or(true, |begin| end > begin),
                None => false,
            },
            CrossFieldCheck::AmountWithin { min, max } => {
                parse_amount(raw).is_some_and(|amount| amount >= min && amount <= max)
            }
            CrossFieldCheck::YearWithin {
                earliest,
                years_ahead,
            } => raw
                .trim()
                .parse::<i32>()
                .is_ok_and(|year| year >= earliest && year <= today.year() + years_ahead),
            CrossFieldCheck::CalendarDate => parse_calendar_date(raw).is_some(),
            CrossFieldCheck::PartialDate => parse_partial_date(raw).is_some(),
        };

        if holds {
            Ok(())
        } else {
            Err(self.default_message(today))
        }
    }

    fn default_message(&self, today: NaiveDate) -> String {
        match *self {
            CrossFieldCheck::AgeWithin { min, max } => {
                format!("Applicant must be between {min} and {max} years old")
            }
            CrossFieldCheck::NotInFuture => "Date cannot be in the future".to_string(),
            CrossFieldCheck::PassportValidity { months, .. } => {
                format!("Passport must be valid for at least {months} months from today")
            }
            CrossFieldCheck::MarriageAfterBirth => {
                "Marriage date must be after birth date and not in the future".to_string()
            }
            CrossFieldCheck::FundsCoverTuition { allowance, .. } => {
                format!("Available funds must cover tuition plus CAD ${allowance:.0} for living expenses")
            }
            CrossFieldCheck::StartLeadTime { months } => {
                format!("Program start date must be at least {months} months from today")
            }
            CrossFieldCheck::EndsAfter { .. } => "End date must be after the start date".to_string(),
            CrossFieldCheck::AmountWithin { min, max } => {
                format!("Amount must be between {min:.0} and {max:.0}")
            }
            CrossFieldCheck::YearWithin {
                earliest,
                years_ahead,
            } => format!(
                "Year must be between {earliest} and {}",
                today.year() + years_ahead
            ),
            CrossFieldCheck::CalendarDate => "Use the YYYY-MM-DD date format".to_string(),
            CrossFieldCheck::PartialDate => {
                "Use the YYYY-MM or YYYY-MM-DD date format".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::study_permit::domain::{MaritalInfo, PersonalInfo, Text};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).expect("valid date")
    }

    #[test]
    fn age_bounds_are_inclusive_of_sixteen() {
        let check = CrossFieldCheck::AgeWithin {
            min: 16.0,
            max: 100.0,
        };
        let record = ApplicationRecord::new();
        assert!(check
            .evaluate(FieldValue::Text("2010-10-01"), &record, today())
            .is_ok());
        assert!(check
            .evaluate(FieldValue::Text("2011-10-01"), &record, today())
            .is_err());
        assert!(check
            .evaluate(FieldValue::Text("not a date"), &record, today())
            .is_err());
    }

    #[test]
    fn marriage_date_only_checked_for_partners() {
        let mut record = ApplicationRecord::new();
        record.set_personal_info(PersonalInfo {
            date_of_birth: Text::new("1995-03-15"),
            ..PersonalInfo::default()
        });
        record.set_marital_info(MaritalInfo {
            status: Text::new("Single"),
            ..MaritalInfo::default()
        });
        let before_birth = FieldValue::Text("1990-01-01");
        assert!(CrossFieldCheck::MarriageAfterBirth
            .evaluate(before_birth, &record, today())
            .is_ok());

        record.set_marital_info(MaritalInfo {
            status: Text::new("Married"),
            ..MaritalInfo::default()
        });
        assert!(CrossFieldCheck::MarriageAfterBirth
            .evaluate(before_birth, &record, today())
            .is_err());
        assert!(CrossFieldCheck::MarriageAfterBirth
            .evaluate(FieldValue::Text("2020-06-01"), &record, today())
            .is_ok());
    }

    #[test]
    fn year_window_tracks_today() {
        let check = CrossFieldCheck::YearWithin {
            earliest: 1950,
            years_ahead: 10,
        };
        let record = ApplicationRecord::new();
        assert!(check
            .evaluate(FieldValue::Text("2036"), &record, today())
            .is_ok());
        let error = check
            .evaluate(FieldValue::Text("2037"), &record, today())
            .expect_err("too far ahead");
        assert_eq!(error, "Year must be between 1950 and 2036");
    }
}
