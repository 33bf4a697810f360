//! Transverse Mercator on the WGS84 ellipsoid (USGS series expansion).

use crate::utm::{UtmCoord, UtmHemisphere};
use crate::LatLon;

// ---------------------------------------------------------------------------
// Ellipsoid
// ---------------------------------------------------------------------------

const A: f64 = 6_378_137.0;
const F: f64 = 1.0 / 298.257_223_563;
const K0: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
pub const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

fn e2() -> f64 {
    F * (2.0 - F)
}

fn ep2() -> f64 {
    let e2 = e2();
    e2 / (1.0 - e2)
}

/// Central meridian of a UTM zone, in degrees.
pub fn central_meridian(zone: u32) -> f64 {
    6.0 * zone as f64 - 183.0
}

fn meridian_arc(phi: f64) -> f64 {
    let e2 = e2();
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    A * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
        - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
        + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
        - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}

// ---------------------------------------------------------------------------
// Inverse
// ---------------------------------------------------------------------------

/// UTM easting/northing to latitude/longitude.
pub fn inverse(utm: &UtmCoord) -> LatLon {
    let e2 = e2();
    let ep2 = ep2();
    let x = utm.easting - FALSE_EASTING;
    let y = match utm.hemisphere {
        UtmHemisphere::North => utm.northing,
        UtmHemisphere::South => utm.northing - FALSE_NORTHING_SOUTH,
    };

    let m = y / K0;
    let mu = m / (A * (1.0 - e2 / 4.0 - 3.0 * e2 * e2 / 64.0 - 5.0 * e2 * e2 * e2 / 256.0));
    let sq = (1.0 - e2).sqrt();
    let e1 = (1.0 - sq) / (1.0 + sq);

    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let (sin1, cos1) = phi1.sin_cos();
    let tan1 = phi1.tan();
    let c1 = ep2 * cos1 * cos1;
    let t1 = tan1 * tan1;
    let w = 1.0 - e2 * sin1 * sin1;
    let n1 = A / w.sqrt();
    let r1 = A * (1.0 - e2) / w.powf(1.5);
    let d = x / (n1 * K0);

    let lat = phi1
        - (n1 * tan1 / r1)
            * (d * d / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                    * d.powi(6)
                    / 720.0);
    let lon = (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
        + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1) * d.powi(5)
            / 120.0)
        / cos1;

    LatLon::new(lat.to_degrees(), central_meridian(utm.zone) + lon.to_degrees())
}

// ---------------------------------------------------------------------------
// Forward
// ---------------------------------------------------------------------------

/// Latitude/longitude to (easting, northing) in the given zone. Southern
/// latitudes carry the 10,000 km false northing.
pub fn forward(zone: u32, lat: f64, lon: f64) -> (f64, f64) {
    let e2 = e2();
    let ep2 = ep2();
    let phi = lat.to_radians();
    let (sin, cos) = phi.sin_cos();
    let tan = phi.tan();

    let n = A / (1.0 - e2 * sin * sin).sqrt();
    let t = tan * tan;
    let c = ep2 * cos * cos;
    let a = cos * (lon - central_meridian(zone)).to_radians();
    let m = meridian_arc(phi);

    let easting = K0
        * n
        * (a + (1.0 - t + c) * a.powi(3) / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0)
        + FALSE_EASTING;
    let mut northing = K0
        * (m + n
            * tan
            * (a * a / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6) / 720.0));
    if lat < 0.0 {
        northing += FALSE_NORTHING_SOUTH;
    }
    (easting, northing)
}
