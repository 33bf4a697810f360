use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use xcoord_geodesy::UtmHemisphere;

use crate::error::FilterReason;

// ---------------------------------------------------------------------------
// Family
// ---------------------------------------------------------------------------

/// Coordinate notation families, in reduction priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    #[serde(alias = "DD")]
    Dd,
    #[serde(alias = "DM")]
    Dm,
    #[serde(alias = "DMS")]
    Dms,
    #[serde(alias = "MGRS")]
    Mgrs,
    #[serde(alias = "UTM")]
    Utm,
}

impl Family {
    pub const ALL: [Family; 5] = [Family::Dd, Family::Dm, Family::Dms, Family::Mgrs, Family::Utm];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dd => "DD",
            Self::Dm => "DM",
            Self::Dms => "DMS",
            Self::Mgrs => "MGRS",
            Self::Utm => "UTM",
        }
    }

    /// DD, DM and DMS carry a latitude/longitude ordinate pair.
    pub fn is_ordinate_pair(&self) -> bool {
        matches!(self, Self::Dd | Self::Dm | Self::Dms)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Family {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dd" => Ok(Self::Dd),
            "dm" => Ok(Self::Dm),
            "dms" => Ok(Self::Dms),
            "mgrs" => Ok(Self::Mgrs),
            "utm" => Ok(Self::Utm),
            other => Err(format!("unknown family '{other}' (expected dd, dm, dms, mgrs or utm)")),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw match
// ---------------------------------------------------------------------------

/// One captured field: its text and byte offset relative to the match start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub text: String,
    pub offset: usize,
}

/// Captured fields of a pattern hit, keyed by capture group name.
#[derive(Debug, Clone, Default)]
pub struct Fields {
    map: FxHashMap<String, Field>,
}

impl Fields {
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>, offset: usize) {
        self.map.insert(name.into(), Field { text: text.into(), offset });
    }

    /// Field by name. Fields captured as empty text count as absent.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.map.get(name).filter(|f| !f.text.trim().is_empty())
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).map(|f| f.text.as_str())
    }

    /// Ordinate-specific field, e.g. `deg` + Lat -> `deg_lat`.
    pub fn ordinate(&self, base: &str, axis: Axis) -> Option<&Field> {
        self.get(&format!("{base}_{}", axis.suffix()))
    }
}

/// A single regex hit before normalization.
#[derive(Debug, Clone)]
pub struct RawMatch {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub family: Family,
    pub pattern_id: String,
    pub fields: Fields,
}

// ---------------------------------------------------------------------------
// Ordinates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Lat,
    Lon,
}

impl Axis {
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Lat => "lat",
            Self::Lon => "lon",
        }
    }
}

/// Finest field resolved in an ordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Degree,
    SubDegree,
    Minute,
    SubMinute,
    Second,
    SubSecond,
}

impl Tier {
    pub fn has_degrees(self) -> bool {
        matches!(self, Self::Degree | Self::SubDegree)
    }

    pub fn has_sub_degrees(self) -> bool {
        self == Self::SubDegree
    }

    pub fn has_minutes(self) -> bool {
        matches!(self, Self::Minute | Self::SubMinute)
    }

    pub fn has_sub_minutes(self) -> bool {
        self == Self::SubMinute
    }

    pub fn has_seconds(self) -> bool {
        matches!(self, Self::Second | Self::SubSecond)
    }
}

/// Hemisphere cue found in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hemisphere {
    pub symbol: String,
    /// +1 for N, E, '+'; -1 for S, W, '-'.
    pub polarity: i8,
    pub offset: usize,
}

impl Hemisphere {
    /// True for N/S/E/W, false for a bare sign.
    pub fn is_alphabetic(&self) -> bool {
        self.symbol.chars().all(|c| c.is_ascii_alphabetic())
    }
}

/// One normalized axis of a DD/DM/DMS pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Ordinate {
    pub axis: Axis,
    pub degrees: f64,
    pub minutes: Option<f64>,
    pub seconds: Option<f64>,
    pub tier: Tier,
    pub hemisphere: Option<Hemisphere>,
    pub has_symbol: bool,
    pub degree_offset: usize,
    /// Signed canonical text, e.g. `+42:18.5` or `-102.4`.
    pub text: String,
    pub value: f64,
}

impl Ordinate {
    pub fn polarity(&self) -> i8 {
        self.hemisphere.as_ref().map(|h| h.polarity).unwrap_or(1)
    }

    pub fn has_alpha_hemisphere(&self) -> bool {
        self.hemisphere.as_ref().is_some_and(Hemisphere::is_alphabetic)
    }
}

// ---------------------------------------------------------------------------
// Grid references
// ---------------------------------------------------------------------------

/// One interpretation of an MGRS hit.
#[derive(Debug, Clone, PartialEq)]
pub struct MgrsCandidate {
    /// Zone number plus band letter, e.g. `38S`.
    pub zone: String,
    pub square: String,
    pub digits: String,
    /// zone + square + digits, uppercase, no whitespace.
    pub text: String,
    pub lat: f64,
    pub lon: f64,
    /// Set when the digit string had to be padded to an even length.
    pub ambiguous: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UtmFields {
    pub zone: u32,
    pub band: char,
    pub hemisphere: UtmHemisphere,
    pub easting: f64,
    pub northing: f64,
    pub lat: f64,
    pub lon: f64,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Positional uncertainty: radius in meters and significant digit count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Precision {
    pub meters: f64,
    pub digits: u32,
}

/// Text surrounding a match, line breaks removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchContext {
    pub before: String,
    pub after: String,
}

/// An alternate reading of the same text span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interpretation {
    pub coord_text: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeocoordMatch {
    pub id: String,
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub family: Family,
    pub pattern_id: String,
    pub coord_text: String,
    pub latitude: f64,
    pub longitude: f64,
    pub precision: Precision,
    pub confidence: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<MatchContext>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternates: Vec<Interpretation>,
    /// Id of the primary match when this entry is an alternate reading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_of: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filtered: Option<FilterReason>,
    pub overlaps: bool,
}

impl GeocoordMatch {
    /// Id shared by a primary match and its alternates.
    pub fn group(&self) -> &str {
        self.alternate_of.as_deref().unwrap_or(&self.id)
    }

    pub fn span_len(&self) -> usize {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionMeta {
    pub doc_id: String,
    pub engine_version: String,
    pub families: Vec<Family>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionSummary {
    pub patterns_evaluated: usize,
    pub raw_hits: usize,
    pub rejected: usize,
    pub filtered: usize,
    pub accepted: usize,
    /// Removed as duplicates or submatches.
    pub reduced: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    pub meta: ExtractionMeta,
    pub summary: ExtractionSummary,
    pub matches: Vec<GeocoordMatch>,
}
