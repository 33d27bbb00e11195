//! Cell-level parsing and name canonicalization.
//!
//! Every coercion here is lenient: a cell that cannot be parsed becomes
//! `None` instead of an error, so one bad value never costs the whole row.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%d-%m-%Y"];

/// Trim, lowercase, and turn spaces and hyphens into underscores.
pub fn normalize_column_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            other => other,
        })
        .collect()
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest.
pub fn title_case(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    let mut previous_alpha = false;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if previous_alpha {
                output.extend(ch.to_lowercase());
            } else {
                output.extend(ch.to_uppercase());
            }
            previous_alpha = true;
        } else {
            output.push(ch);
            previous_alpha = false;
        }
    }
    output
}

pub fn parse_naive_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(parsed);
        }
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.naive_local());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Missing, unparseable, and negative inputs all count as zero.
pub fn parse_count(value: &str) -> u64 {
    match parse_number(value) {
        Some(n) if n > 0.0 => n.trunc() as u64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn normalize_column_name_trims_and_replaces_separators() {
        assert_eq!(normalize_column_name("  Area Name "), "area_name");
        assert_eq!(normalize_column_name("Date-Time OCC"), "date_time_occ");
        assert_eq!(normalize_column_name("Vict.Age"), "vict.age");
        assert_eq!(normalize_column_name(""), "");
    }

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_case("N HOLLYWOOD"), "N Hollywood");
        assert_eq!(title_case("77th street"), "77Th Street");
        assert_eq!(title_case("o'neil-park"), "O'Neil-Park");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn parse_naive_datetime_supports_common_layouts() {
        let expected = NaiveDate::from_ymd_opt(2023, 3, 14)
            .unwrap()
            .and_hms_opt(21, 30, 0)
            .unwrap();
        assert_eq!(parse_naive_datetime("2023-03-14 21:30:00"), Some(expected));
        assert_eq!(parse_naive_datetime("2023-03-14T21:30"), Some(expected));
        assert_eq!(parse_naive_datetime("03/14/2023 09:30:00 PM"), Some(expected));
        assert_eq!(parse_naive_datetime("2023-03-14 21:30:00.000"), Some(expected));
    }

    #[test]
    fn parse_naive_datetime_treats_dates_as_midnight() {
        let parsed = parse_naive_datetime("2021-07-04").unwrap();
        assert_eq!(parsed.year(), 2021);
        assert_eq!(parsed.hour(), 0);
    }

    #[test]
    fn parse_naive_datetime_rejects_garbage() {
        assert_eq!(parse_naive_datetime(""), None);
        assert_eq!(parse_naive_datetime("not a date"), None);
        assert_eq!(parse_naive_datetime("2023-13-45"), None);
    }

    #[test]
    fn parse_number_and_count_are_lenient() {
        assert_eq!(parse_number(" 34.05 "), Some(34.05));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_count("12.9"), 12);
        assert_eq!(parse_count("-4"), 0);
        assert_eq!(parse_count(""), 0);
    }
}
