//! Shared parsing utilities for sheet cells.
//!
//! Spreadsheet exports are inconsistent about date formats and number
//! rendering, so these parsers accept the common variants and return
//! `None` for anything else.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-only formats tried before the ambiguous slash forms.
const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Date-time formats whose date part is unambiguous.
const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DAY_FIRST_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];
const MONTH_FIRST_FORMATS: &[&str] = &["%m/%d/%Y", "%m-%d-%Y"];

/// Parses a sheet date cell permissively.
///
/// ISO dates and date-times (including RFC 3339 stamps with a zone, read
/// as the date in that zone) are accepted when they lead with a four-digit
/// year. Slash/dash/dot separated
/// `a/b/yyyy` values are read day-first when `day_first` is set, falling
/// back to month-first (and vice versa). Any time-of-day component after
/// the date is discarded. Two-digit years are rejected.
#[must_use]
pub fn parse_sheet_date(s: &str, day_first: bool) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if starts_with_four_digit_year(s) {
        return parse_iso(s);
    }

    // Sheets exports append the time after a space ("5/3/2024 0:00:00").
    let date_part = s.split_whitespace().next().unwrap_or(s);
    let (primary, secondary) = if day_first {
        (DAY_FIRST_FORMATS, MONTH_FIRST_FORMATS)
    } else {
        (MONTH_FIRST_FORMATS, DAY_FIRST_FORMATS)
    };

    primary
        .iter()
        .chain(secondary)
        .find_map(|format| parse_four_digit_year(date_part, format))
}

/// Whether `s` opens with exactly four digits followed by a separator or
/// nothing. `%Y` alone would also take one- or two-digit years.
fn starts_with_four_digit_year(s: &str) -> bool {
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    digits == 4 && matches!(s.as_bytes().get(4), None | Some(b'-' | b'/'))
}

fn parse_iso(s: &str) -> Option<NaiveDate> {
    if let Some(date) = ISO_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
    {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    ISO_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|dt| dt.date())
}

/// Parses `s` with `format`, rejecting dates whose year is not four digits.
fn parse_four_digit_year(s: &str, format: &str) -> Option<NaiveDate> {
    let year_len = s.rsplit(['/', '-', '.']).next()?.len();
    if year_len != 4 {
        return None;
    }
    NaiveDate::parse_from_str(s, format).ok()
}

/// Parses a weapon count cell.
///
/// Empty cells count as zero. Integral numbers rendered as floats
/// (`"3.0"`) are accepted; negative, fractional or non-numeric values are
/// rejected.
#[must_use]
pub fn parse_weapon_count(s: &str) -> Option<u64> {
    let s = s.trim();
    if s.is_empty() {
        return Some(0);
    }
    if let Ok(count) = s.parse::<u64>() {
        return Some(count);
    }

    let value = s.parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > 9.0e15 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(value as u64)
}

/// Parses a coordinate cell. Blank or unparseable values become `None`.
///
/// A decimal comma (`"41,3851"`) is accepted, as spreadsheets in
/// comma-decimal locales export it that way.
#[must_use]
pub fn parse_coordinate(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let value = s
        .parse::<f64>()
        .or_else(|_| s.replace(',', ".").parse::<f64>())
        .ok()?;
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_iso_date() {
        assert_eq!(parse_sheet_date("2024-01-15", true), Some(ymd(2024, 1, 15)));
    }

    #[test]
    fn parses_iso_datetime_and_drops_time() {
        assert_eq!(
            parse_sheet_date("2024-01-15T14:30:00.000", true),
            Some(ymd(2024, 1, 15))
        );
        assert_eq!(
            parse_sheet_date("2024-01-15 14:30:00", false),
            Some(ymd(2024, 1, 15))
        );
    }

    #[test]
    fn parses_rfc3339_in_its_own_zone() {
        assert_eq!(
            parse_sheet_date("2024-01-15T00:00:00Z", true),
            Some(ymd(2024, 1, 15))
        );
        assert_eq!(
            parse_sheet_date("2024-01-15T23:30:00-02:00", true),
            Some(ymd(2024, 1, 15))
        );
    }

    #[test]
    fn two_digit_years_never_read_as_iso() {
        assert!(parse_sheet_date("05-03-24", true).is_none());
        assert!(parse_sheet_date("05/03/24", false).is_none());
        assert!(parse_sheet_date("24-03-05 10:00", true).is_none());
        assert!(parse_sheet_date("024-03-05", true).is_none());
    }

    #[test]
    fn reads_ambiguous_dates_day_first() {
        assert_eq!(parse_sheet_date("05/03/2024", true), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_sheet_date("05/03/2024", false), Some(ymd(2024, 5, 3)));
    }

    #[test]
    fn falls_back_when_primary_order_is_impossible() {
        assert_eq!(parse_sheet_date("12/31/2024", true), Some(ymd(2024, 12, 31)));
        assert_eq!(parse_sheet_date("31/12/2024", false), Some(ymd(2024, 12, 31)));
    }

    #[test]
    fn strips_sheet_time_suffix() {
        assert_eq!(
            parse_sheet_date("5/3/2024 0:00:00", true),
            Some(ymd(2024, 3, 5))
        );
    }

    #[test]
    fn rejects_garbage_and_two_digit_years() {
        assert!(parse_sheet_date("not-a-date", true).is_none());
        assert!(parse_sheet_date("", true).is_none());
        assert!(parse_sheet_date("05/03/24", true).is_none());
        assert!(parse_sheet_date("2024-02-30", true).is_none());
    }

    #[test]
    fn parses_weapon_counts() {
        assert_eq!(parse_weapon_count("3"), Some(3));
        assert_eq!(parse_weapon_count(" 4.0 "), Some(4));
        assert_eq!(parse_weapon_count(""), Some(0));
        assert!(parse_weapon_count("-1").is_none());
        assert!(parse_weapon_count("2.5").is_none());
        assert!(parse_weapon_count("molts").is_none());
    }

    #[test]
    fn parses_coordinates() {
        let lat = parse_coordinate("41.3851").unwrap();
        assert!((lat - 41.3851).abs() < f64::EPSILON);
        let lng = parse_coordinate("2,1734").unwrap();
        assert!((lng - 2.1734).abs() < f64::EPSILON);
        assert!(parse_coordinate("").is_none());
        assert!(parse_coordinate("n/a").is_none());
        assert!(parse_coordinate("NaN").is_none());
    }
}
