//! Positional precision of a match: error radius in meters plus the number of
//! decimal-degree digits worth reporting.

use crate::model::{Ordinate, Precision};
use crate::ordinate::fraction_digits;

/// One degree of latitude, roughly.
pub const DEFAULT_UNKNOWN: Precision = Precision { meters: 111_000.0, digits: 0 };
/// Half a degree, the error radius of a whole-degree reading.
pub const LAT_DEGREE: f64 = 55_500.0;

pub const DMS_SECONDS: Precision = Precision { meters: 30.0, digits: 5 };
pub const DMS_MINUTES: Precision = Precision { meters: 1_850.0, digits: 2 };
pub const UTM: Precision = Precision { meters: 100.0, digits: 5 };

/// Error radius by count of decimal-degree fraction digits.
const DD_METERS: [f64; 13] = [
    55_500.0, 5_550.0, 555.0, 55.5, 5.55, 0.555, 0.0555, 0.00555, 0.000555, 0.0000555, 0.00000555,
    0.000000555, 0.0000000555,
];

/// Indexed by normalized MGRS length (zone + square + digits). Entries come
/// in pairs so a dropped digit lands on the coarser reading.
const MGRS_METERS: [f64; 18] = [
    1_000_000.0, 100_000.0, 100_000.0, 100_000.0, 100_000.0, 100_000.0, 100_000.0, 10_000.0,
    10_000.0, 1_000.0, 1_000.0, 100.0, 100.0, 10.0, 10.0, 1.0, 1.0, 0.1,
];
const MGRS_DIGITS: [u32; 18] = [0, 0, 0, 0, 0, 0, 0, 1, 1, 3, 3, 4, 4, 6, 6, 7, 7, 8];

impl Default for Precision {
    fn default() -> Self {
        DEFAULT_UNKNOWN
    }
}

impl Precision {
    /// Format a decimal degree value to this precision's digit count.
    pub fn format(&self, value: f64) -> String {
        format_decimal(value, self.digits)
    }
}

pub fn format_decimal(value: f64, digits: u32) -> String {
    format!("{value:.*}", digits as usize)
}

/// DD precision: the finer of the two ordinates' fraction digit counts.
pub fn decimal_degrees(lat_text: &str, lon_text: &str) -> Precision {
    let digits = fraction_digits(lat_text).max(fraction_digits(lon_text));
    let meters = DD_METERS[digits.min(DD_METERS.len() - 1)];
    Precision { meters, digits: digits as u32 }
}

/// DM/DMS precision from the finest unit resolved in either ordinate.
pub fn degrees_minutes(lat: &Ordinate, lon: &Ordinate) -> Precision {
    if lat.seconds.is_some() || lon.seconds.is_some() {
        DMS_SECONDS
    } else if lat.minutes.is_some() || lon.minutes.is_some() {
        DMS_MINUTES
    } else {
        Precision { meters: LAT_DEGREE, digits: 0 }
    }
}

pub fn mgrs(coord_text: &str) -> Precision {
    let i = coord_text.len().min(MGRS_METERS.len() - 1);
    Precision { meters: MGRS_METERS[i], digits: MGRS_DIGITS[i] }
}
