//! `xcoord`: geographic coordinate extraction from free text.
//!
//! Pure engine crate: receives a text buffer, returns normalized coordinate
//! matches (DD, DM, DMS, MGRS, UTM) with precision estimates. False positives
//! such as dates, ratios and placeholder digit runs are filtered out.
//! No CLI or IO dependencies.

pub mod config;
pub mod error;
pub mod extract;
pub mod filters;
pub mod hemisphere;
pub mod mgrs;
pub mod model;
pub mod normalize;
pub mod ordinate;
pub mod patterns;
pub mod precision;
pub mod reduce;
pub mod utm;

pub use config::{ExtractConfig, Flags};
pub use error::{ExtractError, FilterReason};
pub use extract::{Extractor, MatchOutcome};
pub use model::{ExtractionResult, Family, GeocoordMatch, Precision};
pub use patterns::PatternSet;
