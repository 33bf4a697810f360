//! Family dispatch: raw pattern hit to normalized position.
//!
//! DD, DM and DMS hits go through ordinate normalization and pair checks;
//! MGRS and UTM hits go through the grid resolvers. A returned error means
//! the hit is not a coordinate at all. A `filtered` reason means it parsed
//! but reads as a false positive.

use xcoord_geodesy::Geodesy;

use crate::config::Flags;
use crate::error::{ExtractError, FilterReason};
use crate::model::{Axis, Family, Interpretation, Ordinate, Precision, RawMatch};
use crate::{mgrs, ordinate, precision, utm};

pub const BASE_CONFIDENCE: u8 = 90;
/// Both readings of an odd-length MGRS reference.
pub const AMBIGUOUS_CONFIDENCE: u8 = 70;

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub coord_text: String,
    pub lat: f64,
    pub lon: f64,
    pub precision: Precision,
    pub confidence: u8,
    pub filtered: Option<FilterReason>,
    pub alternates: Vec<Interpretation>,
}

impl Normalized {
    fn new(coord_text: String, lat: f64, lon: f64, precision: Precision) -> Self {
        Self {
            coord_text,
            lat,
            lon,
            precision,
            confidence: BASE_CONFIDENCE,
            filtered: None,
            alternates: Vec::new(),
        }
    }
}

pub struct Normalizer<'a> {
    geodesy: &'a dyn Geodesy,
    flags: Flags,
}

impl<'a> Normalizer<'a> {
    pub fn new(geodesy: &'a dyn Geodesy, flags: Flags) -> Self {
        Self { geodesy, flags }
    }

    pub fn normalize(&self, raw: &RawMatch) -> Result<Normalized, ExtractError> {
        if raw.family.is_ordinate_pair() {
            return self.ordinate_pair(raw);
        }
        match raw.family {
            Family::Mgrs => self.grid_reference(raw),
            _ => self.utm(raw),
        }
    }

    fn ordinate_pair(&self, raw: &RawMatch) -> Result<Normalized, ExtractError> {
        let lat = ordinate::normalize(&raw.fields, Axis::Lat, &raw.text)?;
        let lon = ordinate::normalize(&raw.fields, Axis::Lon, &raw.text)?;

        if !self.geodesy.validate(lat.value, lon.value) {
            return Err(ExtractError::normalization(
                &raw.text,
                format!("position ({}, {}) out of range", lat.value, lon.value),
            ));
        }
        if !specificity_matches(&lat, &lon) {
            return Err(ExtractError::normalization(&raw.text, "latitude and longitude resolution differ"));
        }

        let precision = match raw.family {
            Family::Dd => precision::decimal_degrees(&lat.text, &lon.text),
            _ => precision::degrees_minutes(&lat, &lon),
        };
        let mut out = Normalized::new(format!("{} {}", lat.text, lon.text), lat.value, lon.value, precision);

        out.filtered = match raw.family {
            Family::Dd if self.flags.dd_filter && is_bare_float_pair(&lat, &lon) => Some(FilterReason::BareFloatPair),
            Family::Dm => punctuation_symmetry(raw).or_else(|| dash_symmetry(raw, &lon)),
            Family::Dms => punctuation_symmetry(raw),
            _ => None,
        };
        Ok(out)
    }

    fn grid_reference(&self, raw: &RawMatch) -> Result<Normalized, ExtractError> {
        let mut candidates = mgrs::resolve(raw, self.geodesy, self.flags.mgrs_strict)?.into_iter();
        let primary = candidates
            .next()
            .ok_or_else(|| ExtractError::malformed(&raw.text, "no candidate reference"))?;

        let precision = precision::mgrs(&primary.text);
        let mut out = Normalized::new(primary.text, primary.lat, primary.lon, precision);
        out.alternates = candidates
            .map(|c| Interpretation { coord_text: c.text, latitude: c.lat, longitude: c.lon })
            .collect();
        if primary.ambiguous {
            out.confidence = AMBIGUOUS_CONFIDENCE;
        }
        Ok(out)
    }

    fn utm(&self, raw: &RawMatch) -> Result<Normalized, ExtractError> {
        let position = utm::resolve(&raw.fields, &raw.text, self.geodesy)?
            .ok_or_else(|| ExtractError::normalization(&raw.text, "no UTM position"))?;
        Ok(Normalized::new(utm::canonical_text(&position), position.lat, position.lon, precision::UTM))
    }
}

// ---------------------------------------------------------------------------
// Pair checks
// ---------------------------------------------------------------------------

/// False when one ordinate is resolved far more finely than the other, as in
/// whole degrees against seconds.
pub fn specificity_matches(lat: &Ordinate, lon: &Ordinate) -> bool {
    let (a, b) = (lat.tier, lon.tier);
    if (a.has_seconds() && b.has_seconds())
        || (a.has_minutes() && b.has_minutes())
        || (a.has_degrees() && b.has_degrees())
    {
        return true;
    }
    if a.has_degrees() && b.has_seconds() {
        return false;
    }
    if a.has_sub_degrees() && b.has_sub_minutes() {
        return false;
    }
    !b.has_sub_degrees() || !a.has_sub_minutes()
}

/// Neither a hemisphere letter nor a degree mark, quote or label in sight.
fn is_bare_float_pair(lat: &Ordinate, lon: &Ordinate) -> bool {
    !lat.has_alpha_hemisphere() && !lon.has_alpha_hemisphere() && !lat.has_symbol && !lon.has_symbol
}

fn punctuation_symmetry(raw: &RawMatch) -> Option<FilterReason> {
    match (raw.fields.text("dm_lat_sep"), raw.fields.text("dm_lon_sep")) {
        (Some(a), Some(b)) if a == b => None,
        (None, None) => None,
        _ => Some(FilterReason::AsymmetricPunctuation),
    }
}

/// Dash counts on each side of the longitude start must agree. A leading
/// minus used as the longitude sign does not count.
fn dash_symmetry(raw: &RawMatch, lon: &Ordinate) -> Option<FilterReason> {
    let mut lon_start = lon.degree_offset;
    if let Some(h) = &lon.hemisphere {
        lon_start = lon_start.min(h.offset);
    }
    let (lat_text, lon_text) = raw.text.split_at(lon_start.min(raw.text.len()));
    let lat_dashes = lat_text.matches('-').count();
    let mut lon_dashes = lon_text.matches('-').count();
    if lon.hemisphere.as_ref().is_some_and(|h| h.symbol == "-") {
        lon_dashes = lon_dashes.saturating_sub(1);
    }
    (lat_dashes != lon_dashes).then_some(FilterReason::AsymmetricDashes)
}
