use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeodesyError {
    /// Zone number outside 1..=60.
    #[error("invalid UTM zone {0}")]
    InvalidZone(u32),
    /// Latitude band letter outside C..X, or I/O.
    #[error("invalid latitude band '{0}'")]
    InvalidBand(char),
    /// Polar bands A, B, Y, Z belong to UPS, which is not supported.
    #[error("polar (UPS) band '{0}' is not supported")]
    PolarBand(char),
    /// 100 km square letters that cannot occur in the given zone.
    #[error("invalid 100km square '{square}' for zone {zone}")]
    InvalidSquare { zone: u32, square: String },
    /// Malformed MGRS text (wrong shape, odd digit count, too many digits).
    #[error("malformed MGRS '{text}': {reason}")]
    MalformedMgrs { text: String, reason: String },
    #[error("easting {0} outside 100000..=900000")]
    EastingOutOfRange(f64),
    #[error("northing {0} outside 0..=10000000")]
    NorthingOutOfRange(f64),
    #[error("position ({lat}, {lon}) out of range")]
    OutOfRange { lat: f64, lon: f64 },
}
