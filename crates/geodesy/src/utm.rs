use std::fmt;

use serde::Serialize;

use crate::error::GeodesyError;
use crate::tm;

/// Latitude bands C..X, 8 degrees each starting at 80S (X spans 12).
pub const BANDS: &str = "CDEFGHJKLMNPQRSTUVWX";

const POLAR_BANDS: &str = "ABYZ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UtmHemisphere {
    North,
    South,
}

impl UtmHemisphere {
    pub fn letter(self) -> char {
        match self {
            Self::North => 'N',
            Self::South => 'S',
        }
    }
}

impl fmt::Display for UtmHemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Hemisphere implied by a latitude band letter. Bands below 'N' are south.
pub fn band_hemisphere(band: char) -> Option<UtmHemisphere> {
    let band = band.to_ascii_uppercase();
    if !BANDS.contains(band) {
        return None;
    }
    Some(if band < 'N' { UtmHemisphere::South } else { UtmHemisphere::North })
}

/// Southern edge of a latitude band, in degrees.
pub fn band_min_lat(band: char) -> Result<f64, GeodesyError> {
    let band = band.to_ascii_uppercase();
    if POLAR_BANDS.contains(band) {
        return Err(GeodesyError::PolarBand(band));
    }
    BANDS
        .find(band)
        .map(|i| -80.0 + 8.0 * i as f64)
        .ok_or(GeodesyError::InvalidBand(band))
}

/// Lowest northing any point of the band reaches within a zone.
///
/// Parallels bow toward the pole, so north of the equator the minimum sits on
/// the central meridian and south of it on the zone edge.
pub fn band_min_northing(zone: u32, band: char) -> Result<f64, GeodesyError> {
    let lat = band_min_lat(band)?;
    if lat == 0.0 {
        return Ok(0.0);
    }
    let cm = tm::central_meridian(zone);
    let (_, center) = tm::forward(zone, lat, cm);
    let (_, edge) = tm::forward(zone, lat, cm + 3.0);
    Ok(center.min(edge))
}

/// A UTM position. Zone and hemisphere select the projection; easting and
/// northing are in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UtmCoord {
    pub zone: u32,
    pub hemisphere: UtmHemisphere,
    pub easting: f64,
    pub northing: f64,
}

impl UtmCoord {
    /// Range check on zone and easting/northing.
    pub fn check(&self) -> Result<(), GeodesyError> {
        if !(1..=60).contains(&self.zone) {
            return Err(GeodesyError::InvalidZone(self.zone));
        }
        if !(100_000.0..=900_000.0).contains(&self.easting) {
            return Err(GeodesyError::EastingOutOfRange(self.easting));
        }
        if !(0.0..=tm::FALSE_NORTHING_SOUTH).contains(&self.northing) {
            return Err(GeodesyError::NorthingOutOfRange(self.northing));
        }
        Ok(())
    }
}

impl fmt::Display for UtmCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {:.0}mE {:.0}mN",
            self.zone, self.hemisphere, self.easting, self.northing
        )
    }
}
