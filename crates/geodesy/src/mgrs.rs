use std::fmt;

use crate::error::GeodesyError;
use crate::utm::{band_hemisphere, band_min_lat, band_min_northing, UtmCoord};

const COLUMN_SETS: [&str; 3] = ["STUVWXYZ", "ABCDEFGH", "JKLMNPQR"];
/// All column letters; each zone set is one run of eight.
const COLUMN_LETTERS: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ";
const ROW_LETTERS: &str = "ABCDEFGHJKLMNPQRSTUV";
const CYCLE: f64 = 2_000_000.0;

/// A parsed MGRS reference: grid zone designator, 100 km square and
/// an even-length easting/northing digit string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mgrs {
    pub zone: u32,
    pub band: char,
    pub column: char,
    pub row: char,
    pub digits: String,
}

fn malformed(text: &str, reason: &str) -> GeodesyError {
    GeodesyError::MalformedMgrs { text: text.to_string(), reason: reason.to_string() }
}

impl Mgrs {
    /// Parse an MGRS string. Whitespace is ignored, case is folded.
    pub fn parse(text: &str) -> Result<Self, GeodesyError> {
        let norm: String = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        let zone_len = norm.chars().take_while(|c| c.is_ascii_digit()).count();
        if zone_len == 0 || zone_len > 2 {
            return Err(malformed(text, "expected 1 or 2 zone digits"));
        }
        let zone: u32 = norm[..zone_len]
            .parse()
            .map_err(|_| malformed(text, "zone is not numeric"))?;
        if !(1..=60).contains(&zone) {
            return Err(GeodesyError::InvalidZone(zone));
        }

        let mut rest = norm[zone_len..].chars();
        let (band, column, row) = match (rest.next(), rest.next(), rest.next()) {
            (Some(b), Some(c), Some(r)) => (b, c, r),
            _ => return Err(malformed(text, "missing band or 100km square")),
        };
        band_min_lat(band)?;

        let digits: String = rest.collect();
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(malformed(text, "easting/northing must be digits"));
        }
        if digits.len() % 2 != 0 {
            return Err(malformed(text, "odd easting/northing digit count"));
        }
        if digits.len() > 10 {
            return Err(malformed(text, "more than 10 easting/northing digits"));
        }

        Ok(Self { zone, band, column, row, digits })
    }

    /// Size of the cell the reference denotes, in meters.
    pub fn precision(&self) -> f64 {
        10f64.powi(5 - (self.digits.len() / 2) as i32)
    }

    /// Resolve to a UTM position at the center of the referenced cell.
    pub fn to_utm(&self) -> Result<UtmCoord, GeodesyError> {
        let square = || GeodesyError::InvalidSquare { zone: self.zone, square: format!("{}{}", self.column, self.row) };

        // A letter from another zone's set keeps its position within its own
        // run of eight.
        let col = COLUMN_LETTERS.find(self.column).ok_or_else(square)? % 8;
        if !COLUMN_SETS[(self.zone % 3) as usize].contains(self.column) {
            log::debug!("mgrs {self}: column {} outside zone {} set", self.column, self.zone);
        }
        let mut row = ROW_LETTERS.find(self.row).ok_or_else(square)? as i64;
        if self.zone % 2 == 0 {
            row = (row - 5).rem_euclid(20);
        }

        let k = self.digits.len() / 2;
        let precision = self.precision();
        let parse = |s: &str| -> f64 { s.parse::<f64>().unwrap_or(0.0) };
        let e = if k == 0 { 0.0 } else { parse(&self.digits[..k]) * precision };
        let n = if k == 0 { 0.0 } else { parse(&self.digits[k..]) * precision };

        let easting = (col as f64 + 1.0) * 100_000.0 + e + precision / 2.0;
        let mut northing = row as f64 * 100_000.0 + n + precision / 2.0;

        let min_northing = band_min_northing(self.zone, self.band)?;
        while northing < min_northing - 1.0 {
            northing += CYCLE;
        }

        let hemisphere = band_hemisphere(self.band).ok_or(GeodesyError::InvalidBand(self.band))?;
        log::trace!("mgrs {self} -> zone {} {hemisphere} E{easting} N{northing}", self.zone);
        Ok(UtmCoord { zone: self.zone, hemisphere, easting, northing })
    }
}

impl fmt::Display for Mgrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}{}{}", self.zone, self.band, self.column, self.row, self.digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tm;

    #[test]
    fn parse_with_spaces() {
        let m = Mgrs::parse("38S MB 44 88").unwrap();
        assert_eq!(m.zone, 38);
        assert_eq!(m.band, 'S');
        assert_eq!((m.column, m.row), ('M', 'B'));
        assert_eq!(m.digits, "4488");
        assert_eq!(m.precision(), 1000.0);
        assert_eq!(m.to_string(), "38SMB4488");
    }

    #[test]
    fn parse_rejects() {
        assert!(Mgrs::parse("SMB4488").is_err());
        assert!(Mgrs::parse("61SMB4488").is_err());
        assert!(Mgrs::parse("38SMB448").is_err());
        assert!(Mgrs::parse("38SMB123456789012").is_err());
        assert_eq!(Mgrs::parse("38ZMB4488"), Err(GeodesyError::PolarBand('Z')));
    }

    #[test]
    fn washington_monument() {
        let utm = Mgrs::parse("18SUJ2337106519").unwrap().to_utm().unwrap();
        assert_eq!(utm.zone, 18);
        assert!((utm.easting - 323_371.5).abs() < 1e-6);
        assert!((utm.northing - 4_306_519.5).abs() < 1e-6);
        let pos = tm::inverse(&utm);
        assert!((pos.lat - 38.8898).abs() < 1e-3);
        assert!((pos.lon - -77.0365).abs() < 1e-3);
    }

    #[test]
    fn foreign_column_letter_keeps_position() {
        // Zone 14 uses J..R; E sits where N would.
        let lenient = Mgrs::parse("14DEC1990").unwrap().to_utm().unwrap();
        let strict = Mgrs::parse("14DNC1990").unwrap().to_utm().unwrap();
        assert_eq!(lenient, strict);
        assert!((lenient.easting - 519_500.0).abs() < 1e-6);
    }

    #[test]
    fn unknown_column_letter_rejected() {
        let err = Mgrs::parse("38SIB4488").unwrap().to_utm().unwrap_err();
        assert!(matches!(err, GeodesyError::InvalidSquare { zone: 38, .. }));
    }

    #[test]
    fn southern_band_lifts_northing() {
        // Zone 13, band D: row letter C alone gives 200km, lifted one cycle.
        let utm = Mgrs::parse("13DEC1990").unwrap().to_utm().unwrap();
        assert!((utm.northing - 2_290_500.0).abs() < 1e-6);
    }
}
