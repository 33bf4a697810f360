//! MGRS candidate resolution.
//!
//! Turns a grid zone, 100 km square and easting/northing digit run into one
//! or two candidate references. An odd digit count means a digit was dropped
//! or the run was split oddly; the resolver proposes the plausible repairs.

use xcoord_geodesy::Geodesy;

use crate::error::ExtractError;
use crate::model::{MgrsCandidate, RawMatch};

/// Month and timezone abbreviations that make "12 JAN 2001" look like a grid
/// reference.
const DATE_GUARDS: [&str; 7] = ["jan", "feb", "apr", "aug", "gmt", "est", "pst"];

fn delete_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Collapse each whitespace run to a single space.
fn squeeze_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Shape check on the raw easting/northing token.
pub fn check_easting_northing(en: &str, strict: bool) -> Result<(), &'static str> {
    if en.chars().any(is_line_break) {
        return Err("line break inside easting/northing");
    }
    let runs = en.split_whitespace().count().saturating_sub(1);
    if en.contains('\t') && runs > 1 {
        return Err("tab-separated easting/northing");
    }
    let digits = en.chars().filter(|c| c.is_ascii_digit()).count();
    if digits % 2 == 1 {
        if strict {
            return Err("odd digit count in strict mode");
        }
        return Ok(());
    }
    let chunks: Vec<&str> = en.split_whitespace().collect();
    if chunks.len() > 2 {
        return Err("more than two digit groups");
    }
    if chunks.len() == 2 && chunks[0].len() != chunks[1].len() {
        return Err("easting and northing lengths differ");
    }
    Ok(())
}

/// Grid-zone sanity: 1..=60, no lone zero.
fn check_zone(zone: &str) -> Result<(), &'static str> {
    let digits: String = zone.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err("grid zone has no number");
    }
    match digits.parse::<u32>() {
        Ok(0) => Err("grid zone 0"),
        Ok(n) if n > 60 => Err("grid zone above 60"),
        Ok(_) => Ok(()),
        Err(_) => Err("grid zone is not numeric"),
    }
}

/// Easting/northing digit strings to try, each flagged ambiguous or not.
///
/// `en` is the raw token; the result never contains whitespace.
pub fn digit_candidates(en: &str) -> Result<Vec<(String, bool)>, &'static str> {
    let packed = delete_whitespace(en);
    if packed.len() % 2 == 0 {
        return Ok(vec![(packed, false)]);
    }

    let squeezed = squeeze_whitespace(en);
    let gaps = squeezed.matches(' ').count();

    if gaps == 1 {
        let midpoint = squeezed.len() / 2;
        let ws_index = squeezed.find(' ').unwrap_or(0);
        // dddd ddddd -> dddd0ddddd
        if ws_index + 1 == midpoint {
            let mut fixed = squeezed.clone();
            fixed.insert(ws_index, '0');
            return Ok(vec![(delete_whitespace(&fixed), false)]);
        }
        // ddddd dddd -> ddddddddd0
        if ws_index == midpoint {
            return Ok(vec![(format!("{packed}0"), false)]);
        }
        return Err("unsupported whitespace position in odd-length easting/northing");
    }

    let midpoint = packed.len() / 2;
    let mut truncated_easting = packed.clone();
    truncated_easting.insert(midpoint, '0');
    let truncated_northing = format!("{packed}0");
    Ok(vec![(truncated_easting, true), (truncated_northing, true)])
}

/// Resolve an MGRS-family raw match into candidate references with positions.
pub fn resolve(raw: &RawMatch, geodesy: &dyn Geodesy, strict: bool) -> Result<Vec<MgrsCandidate>, ExtractError> {
    let text = &raw.text;
    let norm = delete_whitespace(text);
    let malformed = |reason: &str| ExtractError::malformed(text, reason);

    if norm.chars().count() < 6 {
        return Err(malformed("shorter than 6 characters"));
    }
    if norm.len() < 8 && norm.get(2..5).is_some_and(|s| s.eq_ignore_ascii_case("DEG")) {
        return Err(malformed("reads as degrees"));
    }
    let at = |range: std::ops::Range<usize>| norm.get(range).map(str::to_ascii_lowercase);
    for word in [at(2..5), at(1..4)].into_iter().flatten() {
        if DATE_GUARDS.contains(&word.as_str()) {
            return Err(malformed("month or timezone abbreviation"));
        }
    }

    let zone = raw
        .fields
        .text("mgrs_zone")
        .map(delete_whitespace)
        .ok_or_else(|| malformed("no grid zone"))?;
    check_zone(&zone).map_err(malformed)?;
    let square = raw
        .fields
        .text("mgrs_quad")
        .map(delete_whitespace)
        .ok_or_else(|| malformed("no 100km square"))?;
    let en = raw.fields.text("easting_northing").unwrap_or("");

    check_easting_northing(en, strict).map_err(malformed)?;
    let digit_sets = digit_candidates(en).map_err(malformed)?;

    let mut candidates = Vec::with_capacity(digit_sets.len());
    for (digits, ambiguous) in digit_sets {
        let reference = format!("{zone}{square}{digits}").to_ascii_uppercase();
        log::trace!("mgrs candidate {reference} from '{text}'");
        let pos = geodesy
            .mgrs_to_lat_lon(&reference)
            .map_err(|e| malformed(&e.to_string()))?;
        candidates.push(MgrsCandidate {
            zone: zone.to_ascii_uppercase(),
            square: square.to_ascii_uppercase(),
            digits,
            text: reference,
            lat: pos.lat,
            lon: pos.lon,
            ambiguous,
        });
    }
    Ok(candidates)
}
