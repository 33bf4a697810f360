//! `xcoord-geodesy`: grid reference conversion for coordinate extraction.
//!
//! Converts MGRS strings and UTM positions to WGS84 decimal degrees. Only the
//! UTM latitude bands (C through X) are supported; polar UPS references are
//! rejected.

pub mod error;
pub mod mgrs;
pub mod tm;
pub mod utm;

use serde::Serialize;

pub use error::GeodesyError;
pub use mgrs::Mgrs;
pub use utm::{band_hemisphere, UtmCoord, UtmHemisphere};

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// True if `lat` is within [-90, 90] and `lon` within [-180, 180].
pub fn validate(lat: f64, lon: f64) -> bool {
    lat.is_finite() && lon.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

/// Conversion routines the extraction engine depends on.
///
/// Implementations must be read-only so a single instance can serve many
/// extraction calls at once.
pub trait Geodesy: Send + Sync {
    fn mgrs_to_lat_lon(&self, mgrs: &str) -> Result<LatLon, GeodesyError>;

    fn utm_to_lat_lon(&self, utm: &UtmCoord) -> Result<LatLon, GeodesyError>;

    /// Hemisphere implied by a UTM latitude band letter.
    fn band_hemisphere(&self, band: char) -> Option<UtmHemisphere> {
        band_hemisphere(band)
    }

    fn validate(&self, lat: f64, lon: f64) -> bool {
        validate(lat, lon)
    }
}

/// Reference implementation on the WGS84 ellipsoid.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wgs84;

impl Geodesy for Wgs84 {
    fn mgrs_to_lat_lon(&self, mgrs: &str) -> Result<LatLon, GeodesyError> {
        let grid = Mgrs::parse(mgrs)?;
        let utm = grid.to_utm()?;
        self.utm_to_lat_lon(&utm)
    }

    fn utm_to_lat_lon(&self, utm: &UtmCoord) -> Result<LatLon, GeodesyError> {
        utm.check()?;
        let pos = tm::inverse(utm);
        if !validate(pos.lat, pos.lon) {
            return Err(GeodesyError::OutOfRange { lat: pos.lat, lon: pos.lon });
        }
        Ok(pos)
    }
}
