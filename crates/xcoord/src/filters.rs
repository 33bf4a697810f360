//! False-positive filters: text that matched a coordinate pattern but reads
//! as a date, a clock time, a ratio or a placeholder.

use std::str::FromStr;

use chrono::{Datelike, Month, NaiveDate, NaiveDateTime};

use crate::config::Flags;
use crate::error::FilterReason;
use crate::model::Family;

// ---------------------------------------------------------------------------
// DMS date filter
// ---------------------------------------------------------------------------

const DMS_DATE_FORMATS: [&str; 2] = ["%y-%d-%m %H:%M:%S", "%m-%d-%y %H:%M:%S"];

/// Rejects digit-leading DMS text that parses strictly as a date and time.
pub fn dms_date(raw_text: &str) -> Option<FilterReason> {
    let text = raw_text.trim();
    if !text.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    DMS_DATE_FORMATS
        .iter()
        .any(|fmt| NaiveDateTime::parse_from_str(text, fmt).is_ok())
        .then_some(FilterReason::DateTime)
}

// ---------------------------------------------------------------------------
// MGRS filter
// ---------------------------------------------------------------------------

const PLACEHOLDERS: [&str; 4] = ["1234", "123456", "12345678", "1234567890"];
const RATIO_WORDS: [&str; 2] = ["per", "sec"];
const TIMEZONES: [&str; 10] = ["GMT", "UTC", "EST", "EDT", "CST", "CDT", "MST", "MDT", "PST", "PDT"];

/// Years this far back or less count as "recent" for date detection.
const RECENT_YEARS: i32 = 80;

#[derive(Debug, Clone, Copy)]
pub struct MgrsFilter {
    reference_year: i32,
}

impl Default for MgrsFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl MgrsFilter {
    /// Filter anchored on the current calendar year.
    pub fn new() -> Self {
        Self { reference_year: chrono::Utc::now().year() }
    }

    pub fn with_reference_year(reference_year: i32) -> Self {
        Self { reference_year }
    }

    /// First reason the match looks like something other than a grid
    /// reference, if any. `coord_text` is the normalized reference.
    pub fn stop(&self, raw_text: &str, coord_text: &str) -> Option<FilterReason> {
        if raw_text != raw_text.to_uppercase() {
            return Some(FilterReason::MgrsLowercase);
        }
        if coord_text.len() < 6 {
            return Some(FilterReason::MgrsTooShort);
        }
        if raw_text.chars().take(5).any(|c| c == '\n' || c == '\r') {
            return Some(FilterReason::MgrsLineBreak);
        }
        if PLACEHOLDERS.contains(&coord_text) {
            return Some(FilterReason::MgrsPlaceholder);
        }
        let tokens: Vec<&str> = raw_text.split(' ').collect();
        if tokens.len() > 2 && RATIO_WORDS.iter().any(|w| tokens[1].eq_ignore_ascii_case(w)) {
            return Some(FilterReason::MgrsRatio);
        }
        self.date_or_time(coord_text)
    }

    fn date_or_time(&self, coord_text: &str) -> Option<FilterReason> {
        let head = coord_text.get(..10).unwrap_or(coord_text);
        let year = day_month_year(head).or_else(|| hour_zone_year(head))?;
        let year = self.expand_year(year);

        if (0..RECENT_YEARS).contains(&(self.reference_year - year)) {
            return Some(FilterReason::MgrsDate);
        }
        let hour = two_digits(head, 5)?;
        let minute = two_digits(head, 7)?;
        (hour < 24 && minute < 60).then_some(FilterReason::MgrsTime)
    }

    /// Two-digit years roll into the current or the previous century.
    fn expand_year(&self, year: i32) -> i32 {
        if year <= self.reference_year % 100 {
            year + 2000
        } else if year < 100 {
            year + 1900
        } else {
            year
        }
    }
}

fn two_digits(s: &str, at: usize) -> Option<u32> {
    let t = s.get(at..at + 2)?;
    if !t.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    t.parse().ok()
}

/// `ddMMMyyyy` (a real calendar date), or `dMMMyy` / `ddMMMyy` optionally
/// followed by `hhmm`. Returns the year as written.
fn day_month_year(s: &str) -> Option<i32> {
    let day_len = s.bytes().take_while(u8::is_ascii_digit).count();
    if !(1..=2).contains(&day_len) {
        return None;
    }
    let day: u32 = s[..day_len].parse().ok()?;
    let month = Month::from_str(s.get(day_len..day_len + 3)?).ok()?;
    let rest = &s[day_len + 3..];
    let year_len = rest.bytes().take_while(u8::is_ascii_digit).count();

    if day_len == 2 && year_len >= 4 {
        let year: i32 = rest[..4].parse().ok()?;
        if NaiveDate::from_ymd_opt(year, month.number_from_month(), day).is_some() {
            return Some(year);
        }
    }
    if year_len >= 2 && (1..=31).contains(&day) {
        return rest[..2].parse().ok();
    }
    None
}

/// `HH` + timezone + `yyyy`, e.g. `15EST2012`.
fn hour_zone_year(s: &str) -> Option<i32> {
    let hour = two_digits(s, 0)?;
    let zone = s.get(2..5)?;
    if hour >= 24 || !TIMEZONES.iter().any(|z| z.eq_ignore_ascii_case(zone)) {
        return None;
    }
    let year = s.get(5..9)?;
    if !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    year.parse().ok()
}

// ---------------------------------------------------------------------------
// Filter bank
// ---------------------------------------------------------------------------

/// Family-gated filters, each switched by its flag.
#[derive(Debug, Clone, Copy)]
pub struct FilterBank {
    flags: Flags,
    mgrs: MgrsFilter,
}

impl FilterBank {
    pub fn new(flags: Flags, mgrs: MgrsFilter) -> Self {
        Self { flags, mgrs }
    }

    pub fn check(&self, family: Family, raw_text: &str, coord_text: &str) -> Option<FilterReason> {
        match family {
            Family::Dms if self.flags.dms_date_filter => dms_date(raw_text),
            Family::Mgrs if self.flags.mgrs_filter => self.mgrs.stop(raw_text, coord_text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> MgrsFilter {
        MgrsFilter::with_reference_year(2024)
    }

    #[test]
    fn dms_date_time_rejected() {
        assert_eq!(dms_date("12-25-10 10:30:45"), Some(FilterReason::DateTime));
        assert_eq!(dms_date("10-25-12 23:59:59"), Some(FilterReason::DateTime));
    }

    #[test]
    fn dms_non_dates_pass() {
        assert_eq!(dms_date("45-33-15 10:30:45"), None);
        assert_eq!(dms_date("42:18:30N 102:24:45W"), None);
        assert_eq!(dms_date("N12-25-10 10:30:45"), None);
    }

    #[test]
    fn mgrs_recent_date() {
        assert_eq!(filter().stop("14DEC1990", "14DEC1990"), Some(FilterReason::MgrsDate));
        assert_eq!(filter().stop("13DEC1990", "13DEC1990"), Some(FilterReason::MgrsDate));
        assert_eq!(filter().stop("3MAR99", "3MAR99"), Some(FilterReason::MgrsDate));
        assert_eq!(filter().stop("15EST2012", "15EST2012"), Some(FilterReason::MgrsDate));
    }

    #[test]
    fn mgrs_old_date_with_clock_time() {
        // 1200 is no recent year, but 12:00 is a clock time
        assert_eq!(filter().stop("14DEC1200", "14DEC1200"), Some(FilterReason::MgrsTime));
    }

    #[test]
    fn mgrs_invalid_calendar_date_is_not_strict_date() {
        // 31 Feb is rejected by the strict 4-digit form; the yy form reads 19.
        assert_eq!(day_month_year("31FEB1999"), Some(19));
    }

    #[test]
    fn mgrs_ratio_guard() {
        assert_eq!(filter().stop("2 PER 100", "2PER1000"), Some(FilterReason::MgrsRatio));
        assert_eq!(filter().stop("5 SEC 10", "5SEC100"), Some(FilterReason::MgrsRatio));
    }

    #[test]
    fn mgrs_shape_guards() {
        assert_eq!(filter().stop("38smb4488", "38SMB4488"), Some(FilterReason::MgrsLowercase));
        assert_eq!(filter().stop("38SMB", "38SMB"), Some(FilterReason::MgrsTooShort));
        assert_eq!(filter().stop("38S\nMB4488", "38SMB4488"), Some(FilterReason::MgrsLineBreak));
        assert_eq!(filter().stop("1234567890", "1234567890"), Some(FilterReason::MgrsPlaceholder));
        assert_eq!(filter().stop("123456", "123456"), Some(FilterReason::MgrsPlaceholder));
    }

    #[test]
    fn mgrs_placeholder_digits_inside_reference_pass() {
        assert_eq!(filter().stop("17SLA1234567890", "17SLA1234567890"), None);
        assert_eq!(filter().stop("38SMB123456", "38SMB123456"), None);
    }

    #[test]
    fn mgrs_real_references_pass() {
        assert_eq!(filter().stop("38SMB4488", "38SMB4488"), None);
        assert_eq!(filter().stop("4QFJ12345678", "4QFJ12345678"), None);
        assert_eq!(filter().stop("18S UJ 23371 06519", "18SUJ2337106519"), None);
    }

    #[test]
    fn bank_respects_flags() {
        let on = FilterBank::new(Flags::default(), filter());
        let off = FilterBank::new(Flags::no_filters(), filter());
        assert_eq!(on.check(Family::Mgrs, "14DEC1990", "14DEC1990"), Some(FilterReason::MgrsDate));
        assert_eq!(off.check(Family::Mgrs, "14DEC1990", "14DEC1990"), None);
        assert_eq!(on.check(Family::Dms, "12-25-10 10:30:45", "+12:25:10 +10:30:45"), Some(FilterReason::DateTime));
        assert_eq!(off.check(Family::Dms, "12-25-10 10:30:45", "+12:25:10 +10:30:45"), None);
        assert_eq!(on.check(Family::Dd, "14DEC1990", "14DEC1990"), None);
    }
}
