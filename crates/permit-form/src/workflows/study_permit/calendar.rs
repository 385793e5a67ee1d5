//! Date and amount parsing shared by rules, checklist, and layout.

use chrono::{Datelike, Months, NaiveDate};

/// Parses `YYYY-MM-DD`, tolerating a trailing time component (`2020-01-10T00:00:00Z`).
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = match raw.find('T') {
        Some(index) if index == 10 => &raw[..index],
        _ => raw,
    };
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Parses `YYYY-MM` (first of the month) or a full calendar date.
pub fn parse_partial_date(raw: &str) -> Option<NaiveDate> {
    parse_calendar_date(raw).or_else(|| {
        let (year, month) = raw.trim().split_once('-')?;
        if year.len() != 4 || month.len() != 2 {
            return None;
        }
        NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
    })
}

/// Calendar month arithmetic; the day clamps to the end of shorter months.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Fractional age using the 365.25-day year.
pub fn age_in_years(date_of_birth: NaiveDate, today: NaiveDate) -> f64 {
    (today - date_of_birth).num_days() as f64 / 365.25
}

/// Completed years between two dates.
pub fn calendar_age(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// Parses a money amount, ignoring currency symbols, thousands separators, and spaces.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | ' ' | '_'))
        .collect();
    let cleaned = cleaned
        .trim_start_matches("CAD")
        .trim_start_matches("cad");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn month_arithmetic_clamps_to_month_end() {
        assert_eq!(add_months(date(2026, 8, 31), 6), date(2027, 2, 28));
        assert_eq!(add_months(date(2027, 8, 31), 6), date(2028, 2, 29));
        assert_eq!(add_months(date(2026, 1, 15), 3), date(2026, 4, 15));
    }

    #[test]
    fn calendar_age_counts_completed_years() {
        let dob = date(2008, 10, 20);
        assert_eq!(calendar_age(dob, date(2026, 10, 19)), 17);
        assert_eq!(calendar_age(dob, date(2026, 10, 20)), 18);
    }

    #[test]
    fn parses_partial_and_timestamped_dates() {
        assert_eq!(parse_partial_date("2018-05"), Some(date(2018, 5, 1)));
        assert_eq!(
            parse_calendar_date("2020-01-10T00:00:00.000Z"),
            Some(date(2020, 1, 10))
        );
        assert!(parse_calendar_date("10/01/2020").is_none());
        assert!(parse_partial_date("2018-5").is_none());
    }

    #[test]
    fn amounts_ignore_formatting() {
        assert_eq!(parse_amount("$60,000"), Some(60000.0));
        assert_eq!(parse_amount("CAD 12 500.50"), Some(12500.5));
        assert_eq!(parse_amount("lots"), None);
        assert_eq!(parse_amount(""), None);
    }
}
