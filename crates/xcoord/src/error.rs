use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractError {
    /// A required field is missing or unparsable, or the result is invalid.
    #[error("cannot normalize '{text}': {reason}")]
    Normalization { text: String, reason: String },
    /// MGRS zone or easting/northing shape is invalid.
    #[error("malformed grid reference '{text}': {reason}")]
    MalformedGridReference { text: String, reason: String },
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (empty family set, unknown pattern id, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// A catalog pattern failed to compile.
    #[error("pattern {id}: {message}")]
    Pattern { id: String, message: String },
}

impl ExtractError {
    pub fn normalization(text: &str, reason: impl Into<String>) -> Self {
        Self::Normalization { text: text.to_string(), reason: reason.into() }
    }

    pub fn malformed(text: &str, reason: impl Into<String>) -> Self {
        Self::MalformedGridReference { text: text.to_string(), reason: reason.into() }
    }
}

/// Why a structurally valid match was judged a false positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterReason {
    /// Glued to a preceding letter or digit.
    AdjacentText,
    /// DD pair with no hemisphere letters and no coordinate symbols.
    BareFloatPair,
    /// Degree/minute separators differ between latitude and longitude.
    AsymmetricPunctuation,
    /// Dash counts differ between latitude and longitude.
    AsymmetricDashes,
    ZeroCoordinate,
    EmptyCoordText,
    /// DMS text that reads as a date and time.
    DateTime,
    MgrsLowercase,
    MgrsTooShort,
    MgrsLineBreak,
    /// Easting/northing is a run like 1234 or 123456.
    MgrsPlaceholder,
    /// "N per M" or "N sec" style ratios and units.
    MgrsRatio,
    MgrsDate,
    MgrsTime,
}

impl fmt::Display for FilterReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::AdjacentText => "adjacent_text",
            Self::BareFloatPair => "bare_float_pair",
            Self::AsymmetricPunctuation => "asymmetric_punctuation",
            Self::AsymmetricDashes => "asymmetric_dashes",
            Self::ZeroCoordinate => "zero_coordinate",
            Self::EmptyCoordText => "empty_coord_text",
            Self::DateTime => "date_time",
            Self::MgrsLowercase => "mgrs_lowercase",
            Self::MgrsTooShort => "mgrs_too_short",
            Self::MgrsLineBreak => "mgrs_line_break",
            Self::MgrsPlaceholder => "mgrs_placeholder",
            Self::MgrsRatio => "mgrs_ratio",
            Self::MgrsDate => "mgrs_date",
            Self::MgrsTime => "mgrs_time",
        };
        write!(f, "{s}")
    }
}
