use xcoord_geodesy::{Geodesy, UtmCoord, UtmHemisphere};

use crate::error::ExtractError;
use crate::model::{Fields, UtmFields};

/// Zone fields in priority order.
const ZONE_FIELDS: [&str; 3] = ["utm_zone", "utm_zone_zz", "utm_zone_z"];

fn parse_meters(text: &str) -> Option<f64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<u64>().ok().map(|v| v as f64)
}

/// Zone, band and hemisphere from the captured fields. `None` when the zone
/// or band is absent, or the zone lies outside 1..=60.
pub fn parse_fields(fields: &Fields, geodesy: &dyn Geodesy) -> Option<(u32, char, UtmHemisphere)> {
    let zone: u32 = ZONE_FIELDS
        .iter()
        .find_map(|name| fields.text(name))
        .and_then(|z| z.trim().parse().ok())?;
    if !(1..=60).contains(&zone) {
        return None;
    }
    let band = fields.text("utm_band")?.trim().chars().next()?.to_ascii_uppercase();
    let hemisphere = match band {
        'N' => UtmHemisphere::North,
        'S' => UtmHemisphere::South,
        other => geodesy.band_hemisphere(other)?,
    };
    Some((zone, band, hemisphere))
}

/// Resolve a UTM hit. `Ok(None)` means the fields do not describe a UTM
/// position at all; `Err` means they do but conversion failed.
pub fn resolve(fields: &Fields, raw_text: &str, geodesy: &dyn Geodesy) -> Result<Option<UtmFields>, ExtractError> {
    let Some((zone, band, hemisphere)) = parse_fields(fields, geodesy) else {
        return Ok(None);
    };
    let easting = fields
        .text("utm_easting")
        .and_then(parse_meters)
        .ok_or_else(|| ExtractError::malformed(raw_text, "no easting"))?;
    let northing = fields
        .text("utm_northing")
        .and_then(parse_meters)
        .ok_or_else(|| ExtractError::malformed(raw_text, "no northing"))?;

    let coord = UtmCoord { zone, hemisphere, easting, northing };
    let pos = geodesy
        .utm_to_lat_lon(&coord)
        .map_err(|e| ExtractError::malformed(raw_text, e.to_string()))?;

    Ok(Some(UtmFields { zone, band, hemisphere, easting, northing, lat: pos.lat, lon: pos.lon }))
}

/// Canonical text, e.g. `17N 630084mE 4833438mN`.
pub fn canonical_text(utm: &UtmFields) -> String {
    UtmCoord { zone: utm.zone, hemisphere: utm.hemisphere, easting: utm.easting, northing: utm.northing }
        .to_string()
}
