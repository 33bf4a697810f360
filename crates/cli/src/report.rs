//! Output writers for `xcoord extract`: JSON, CSV and plain text.

use serde::Serialize;
use xcoord::model::{ExtractionResult, GeocoordMatch};

pub fn json(result: &ExtractionResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    start: usize,
    end: usize,
    matchtext: &'a str,
    family: &'static str,
    method: &'a str,
    coord_text: &'a str,
    lat: f64,
    lon: f64,
    prec: f64,
    digits: u32,
    confidence: u8,
    filtered: String,
    alternate_of: &'a str,
    overlaps: bool,
    context_before: &'a str,
    context_after: &'a str,
}

impl<'a> From<&'a GeocoordMatch> for CsvRow<'a> {
    fn from(m: &'a GeocoordMatch) -> Self {
        let (before, after) = match &m.context {
            Some(ctx) => (ctx.before.as_str(), ctx.after.as_str()),
            None => ("", ""),
        };
        Self {
            id: &m.id,
            start: m.start,
            end: m.end,
            matchtext: &m.text,
            family: m.family.as_str(),
            method: &m.pattern_id,
            coord_text: &m.coord_text,
            lat: m.latitude,
            lon: m.longitude,
            prec: m.precision.meters,
            digits: m.precision.digits,
            confidence: m.confidence,
            filtered: m.filtered.map(|r| r.to_string()).unwrap_or_default(),
            alternate_of: m.alternate_of.as_deref().unwrap_or(""),
            overlaps: m.overlaps,
            context_before: before,
            context_after: after,
        }
    }
}

/// One row per match, header first.
pub fn csv(result: &ExtractionResult) -> csv::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if result.matches.is_empty() {
        // serialize() writes the header lazily; an empty result still gets one
        writer.write_record(HEADER)?;
    }
    for m in &result.matches {
        writer.serialize(CsvRow::from(m))?;
    }
    let bytes = writer.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

const HEADER: [&str; 17] = [
    "id",
    "start",
    "end",
    "matchtext",
    "family",
    "method",
    "coord_text",
    "lat",
    "lon",
    "prec",
    "digits",
    "confidence",
    "filtered",
    "alternate_of",
    "overlaps",
    "context_before",
    "context_after",
];

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

/// One line per match: span, family, position at its precision, canonical
/// text and the raw text.
pub fn text(result: &ExtractionResult) -> String {
    let mut out = String::new();
    for m in &result.matches {
        out.push_str(&format!(
            "{:>6}..{:<6} {:<4} {}, {}  {}  \"{}\"",
            m.start,
            m.end,
            m.family.as_str(),
            m.precision.format(m.latitude),
            m.precision.format(m.longitude),
            m.coord_text,
            m.text.replace(|c: char| c == '\n' || c == '\r', " "),
        ));
        if let Some(of) = &m.alternate_of {
            out.push_str(&format!("  (alternate of {of})"));
        }
        if let Some(reason) = m.filtered {
            out.push_str(&format!("  [filtered: {reason}]"));
        }
        out.push('\n');
    }
    out
}
