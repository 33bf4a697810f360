//! Lat/lon ordinate normalization from captured fields.
//!
//! Each unit (degrees, minutes, seconds and their fractions) is resolved by
//! walking an ordered rule table; the first field present wins. The tables
//! are shared by both axes and only the field-name suffix differs.

use crate::error::ExtractError;
use crate::hemisphere;
use crate::model::{Axis, Fields, Ordinate, Tier};

type ParseFn = fn(&str) -> Option<(f64, String)>;

struct Rule {
    field: &'static str,
    tier: Tier,
    parse: ParseFn,
}

const fn rule(field: &'static str, tier: Tier, parse: ParseFn) -> Rule {
    Rule { field, tier, parse }
}

const DEGREES: [Rule; 3] = [
    rule("deg", Tier::Degree, parse_integer),
    rule("dms_deg", Tier::Degree, parse_integer),
    rule("dec_deg", Tier::SubDegree, parse_decimal),
];

const MINUTES: [Rule; 4] = [
    rule("min", Tier::Minute, parse_padded),
    rule("dms_min", Tier::Minute, parse_padded),
    rule("dec_min", Tier::Minute, parse_decimal),
    rule("dec_min3", Tier::Minute, parse_decimal),
];

const MINUTE_FRACTIONS: [Rule; 2] = [
    rule("fract_min", Tier::SubMinute, parse_fraction),
    rule("fract_min3", Tier::SubMinute, parse_fraction),
];

const SECONDS: [Rule; 2] = [
    rule("sec", Tier::Second, parse_padded),
    rule("dms_sec", Tier::Second, parse_padded),
];

const SECOND_FRACTIONS: [Rule; 2] = [
    rule("fract_sec", Tier::SubSecond, parse_fraction),
    rule("fract_sec_opt", Tier::SubSecond, parse_fraction),
];

struct Resolved {
    value: f64,
    text: String,
    tier: Tier,
    offset: usize,
}

fn first(fields: &Fields, axis: Axis, rules: &[Rule]) -> Option<Resolved> {
    rules.iter().find_map(|r| {
        let field = fields.ordinate(r.field, axis)?;
        let (value, text) = (r.parse)(field.text.trim())?;
        Some(Resolved { value, text, tier: r.tier, offset: field.offset })
    })
}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

fn parse_integer(text: &str) -> Option<(f64, String)> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((text.parse().ok()?, text.to_string()))
}

/// Integer minutes/seconds, canonicalized to two digits.
fn parse_padded(text: &str) -> Option<(f64, String)> {
    let (value, text) = parse_integer(text)?;
    Some((value, format!("{text:0>2}")))
}

/// Decimal value; a dash standing in for the decimal point is accepted.
fn parse_decimal(text: &str) -> Option<(f64, String)> {
    let text = text.replace('-', ".");
    let value: f64 = text.parse().ok()?;
    value.is_finite().then_some((value, text))
}

/// Fractional part written as `.5`, `-5` or `5`; canonical form is `.5`.
fn parse_fraction(text: &str) -> Option<(f64, String)> {
    let digits = text.strip_prefix(|c: char| c == '.' || c == '-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let text = format!(".{digits}");
    Some((text.parse().ok()?, text))
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Decimal degrees from the unit values. Out-of-range minutes or seconds
/// are ignored along with every finer unit.
pub fn decimal_value(polarity: i8, degrees: f64, minutes: Option<f64>, seconds: Option<f64>) -> f64 {
    let sign = f64::from(polarity);
    let in_range = |v: Option<f64>| v.filter(|v| (0.0..60.0).contains(v));
    match (in_range(minutes), in_range(seconds)) {
        (None, _) => sign * degrees,
        (Some(m), None) => sign * (degrees + m / 60.0),
        (Some(m), Some(s)) => sign * (degrees + m / 60.0 + s / 3600.0),
    }
}

/// Build one ordinate from the captured fields of a raw match.
pub fn normalize(fields: &Fields, axis: Axis, raw_text: &str) -> Result<Ordinate, ExtractError> {
    let degree = first(fields, axis, &DEGREES).ok_or_else(|| {
        ExtractError::normalization(raw_text, format!("no degree field for {}", axis.suffix()))
    })?;

    let mut tier = degree.tier;
    let mut minutes = None;
    let mut seconds = None;
    let mut text_units = String::new();

    if let Some(m) = first(fields, axis, &MINUTES) {
        tier = m.tier;
        let mut value = m.value;
        text_units.push(':');
        text_units.push_str(&m.text);
        if let Some(fm) = first(fields, axis, &MINUTE_FRACTIONS) {
            tier = fm.tier;
            value += fm.value;
            text_units.push_str(&fm.text);
        }
        minutes = Some(value);
    }

    if let Some(s) = first(fields, axis, &SECONDS) {
        tier = s.tier;
        let mut value = s.value;
        text_units.push(':');
        text_units.push_str(&s.text);
        if let Some(fs) = first(fields, axis, &SECOND_FRACTIONS) {
            tier = fs.tier;
            value += fs.value;
            text_units.push_str(&fs.text);
        }
        seconds = Some(value);
    }

    let hemisphere = hemisphere::resolve(fields, axis);
    let polarity = hemisphere.as_ref().map(|h| h.polarity).unwrap_or(1);
    let sign = if polarity < 0 { '-' } else { '+' };

    Ok(Ordinate {
        axis,
        degrees: degree.value,
        minutes,
        seconds,
        tier,
        hemisphere,
        has_symbol: hemisphere::has_symbol(raw_text),
        degree_offset: degree.offset,
        text: format!("{sign}{}{text_units}", degree.text),
        value: decimal_value(polarity, degree.value, minutes, seconds),
    })
}

/// Count of digits after the decimal point in canonical ordinate text.
pub fn fraction_digits(text: &str) -> usize {
    text.split_once('.')
        .map(|(_, frac)| frac.chars().take_while(|c| c.is_ascii_digit()).count())
        .unwrap_or(0)
}
