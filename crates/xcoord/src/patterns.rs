//! Built-in coordinate pattern catalog.
//!
//! Each pattern is a regex with named captures. Ordinate fields carry a
//! `_lat` / `_lon` suffix (`deg_lat`, `dms_min_lon`, `hemi_pre_lat`, ...);
//! grid fields are `mgrs_zone`, `mgrs_quad`, `easting_northing`,
//! `utm_zone` (or `utm_zone_zz` / `utm_zone_z`), `utm_band`, `utm_easting`
//! and `utm_northing`. Every pattern ships example strings it must match.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::ExtractError;
use crate::model::{Family, Fields};

struct PatternDef {
    id: &'static str,
    family: Family,
    description: &'static str,
    regex: &'static str,
    examples: &'static [&'static str],
}

const DEFINITIONS: &[PatternDef] = &[
    // -----------------------------------------------------------------------
    // Decimal degrees
    // -----------------------------------------------------------------------
    PatternDef {
        id: "DD-01",
        family: Family::Dd,
        description: "decimal degrees, hemisphere letter before each value",
        regex: r"\b(?P<hemi_pre_lat>[NSns])\s?(?P<dec_deg_lat>\d{1,2}\.\d{1,15})°?\s*[,;/]?\s*(?P<hemi_pre_lon>[EWew])\s?(?P<dec_deg_lon>\d{1,3}\.\d{1,15})°?",
        examples: &["N42.3, W102.4", "S33.8568 E151.2153", "N 42.3° W 102.4°"],
    },
    PatternDef {
        id: "DD-02",
        family: Family::Dd,
        description: "decimal degrees, hemisphere letter after each value",
        regex: r"\b(?P<dec_deg_lat>\d{1,2}\.\d{1,15})\s?°?\s?(?P<hemi_lat>[NSns])\b\s*[,;/]?\s*(?P<dec_deg_lon>\d{1,3}\.\d{1,15})\s?°?\s?(?P<hemi_lon>[EWew])\b",
        examples: &["42.3N, 102.4W", "33.8568° S 151.2153° E"],
    },
    PatternDef {
        id: "DD-03",
        family: Family::Dd,
        description: "signed decimal degree pair",
        regex: r"(?P<hemi_sign_lat>[-+])?\b(?P<dec_deg_lat>\d{1,2}\.\d{2,15})°?\s*,\s*(?P<hemi_sign_lon>[-+])?\b(?P<dec_deg_lon>\d{1,3}\.\d{2,15})°?",
        examples: &["38.8895, -77.0353", "-33.8568°, 151.2153°"],
    },
    PatternDef {
        id: "DD-04",
        family: Family::Dd,
        description: "decimal degrees labelled lat/lon",
        regex: r"(?i:\blat(?:itude)?)\s*[:=]?\s*(?P<hemi_sign_lat>[-+])?(?P<dec_deg_lat>\d{1,2}\.\d{1,15})\s*[,;/]?\s*(?i:lon(?:g(?:itude)?)?)\s*[:=]?\s*(?P<hemi_sign_lon>[-+])?(?P<dec_deg_lon>\d{1,3}\.\d{1,15})",
        examples: &["lat 38.8895 lon -77.0353", "Latitude: 38.8895, Longitude: -77.0353"],
    },
    // -----------------------------------------------------------------------
    // Degrees, decimal minutes
    // -----------------------------------------------------------------------
    PatternDef {
        id: "DM-01",
        family: Family::Dm,
        description: "degrees and minutes, hemisphere letter after",
        regex: r"\b(?P<deg_lat>\d{1,2})\s?[°º:\s]\s?(?P<min_lat>[0-5]?\d)(?P<fract_min_lat>\.\d{1,8})?\s?'?\s?(?P<hemi_lat>[NSns])\b\s*[,;/]?\s*(?P<deg_lon>\d{1,3})\s?[°º:\s]\s?(?P<min_lon>[0-5]?\d)(?P<fract_min_lon>\.\d{1,8})?\s?'?\s?(?P<hemi_lon>[EWew])\b",
        examples: &["42°18.5'N 102°24.8'W", "42 18.5N, 102 24.8W", "42:18N 102:24W"],
    },
    PatternDef {
        id: "DM-02",
        family: Family::Dm,
        description: "degrees and minutes, hemisphere letter before",
        regex: r"\b(?P<hemi_pre_lat>[NSns])\s?(?P<deg_lat>\d{1,2})\s?[°º:\s-]\s?(?P<min_lat>[0-5]?\d)(?P<fract_min_lat>\.\d{1,8})?'?\s*[,;/]?\s*(?P<hemi_pre_lon>[EWew])\s?(?P<deg_lon>\d{1,3})\s?[°º:\s-]\s?(?P<min_lon>[0-5]?\d)(?P<fract_min_lon>\.\d{1,8})?'?",
        examples: &["N42°18.5' W102°24.8'", "N 42 18.5 W 102 24.8"],
    },
    PatternDef {
        id: "DM-03",
        family: Family::Dm,
        description: "compact DDMM.mmH DDDMM.mmH",
        regex: r"\b(?P<deg_lat>\d{2})(?P<min_lat>[0-5]\d)(?P<fract_min_lat>\.\d{1,8})?(?P<hemi_lat>[NSns])\s?[,/]?\s?(?P<deg_lon>\d{3})(?P<min_lon>[0-5]\d)(?P<fract_min_lon>\.\d{1,8})?(?P<hemi_lon>[EWew])\b",
        examples: &["4218.5N 10224.8W", "4218N10224W"],
    },
    PatternDef {
        id: "DM-04",
        family: Family::Dm,
        description: "dash or colon separated minutes with dashed fraction",
        regex: r"\b(?P<deg_lat>\d{1,2})(?P<dm_lat_sep>[-:])(?P<min_lat>[0-5]\d)(?P<fract_min3_lat>-\d{3,8})?(?P<hemi_lat>[NSns])\s?[,/]?\s?(?P<deg_lon>\d{1,3})(?P<dm_lon_sep>[-:])(?P<min_lon>[0-5]\d)(?P<fract_min3_lon>-\d{3,8})?(?P<hemi_lon>[EWew])\b",
        examples: &["45-33-00811N 008-11-00234E", "45:33N 008:11E"],
    },
    // -----------------------------------------------------------------------
    // Degrees, minutes, seconds
    // -----------------------------------------------------------------------
    PatternDef {
        id: "DMS-01",
        family: Family::Dms,
        description: "degrees, minutes, seconds, hemisphere letter after",
        regex: r#"\b(?P<dms_deg_lat>\d{1,2})\s?[°º:\s]\s?(?P<dms_min_lat>[0-5]?\d)\s?['′:\s]\s?(?P<dms_sec_lat>[0-5]?\d)(?P<fract_sec_lat>\.\d{1,6})?\s?(?:"|″|'')?\s?(?P<hemi_lat>[NSns])\b\s*[,;/]?\s*(?P<dms_deg_lon>\d{1,3})\s?[°º:\s]\s?(?P<dms_min_lon>[0-5]?\d)\s?['′:\s]\s?(?P<dms_sec_lon>[0-5]?\d)(?P<fract_sec_lon>\.\d{1,6})?\s?(?:"|″|'')?\s?(?P<hemi_lon>[EWew])\b"#,
        examples: &[r#"43°38'33.24"N 79°23'13.7"W"#, "42 18 30N 102 24 45W", "42:18:30N, 102:24:45W"],
    },
    PatternDef {
        id: "DMS-02",
        family: Family::Dms,
        description: "degrees, minutes, seconds, hemisphere letter before",
        regex: r#"\b(?P<hemi_pre_lat>[NSns])\s?(?P<dms_deg_lat>\d{1,2})\s?[°º:\s-]\s?(?P<dms_min_lat>[0-5]?\d)\s?['′:\s-]\s?(?P<dms_sec_lat>[0-5]?\d)(?P<fract_sec_lat>\.\d{1,6})?\s?(?:"|″|'')?\s*[,;/]?\s*(?P<hemi_pre_lon>[EWew])\s?(?P<dms_deg_lon>\d{1,3})\s?[°º:\s-]\s?(?P<dms_min_lon>[0-5]?\d)\s?['′:\s-]\s?(?P<dms_sec_lon>[0-5]?\d)(?P<fract_sec_lon>\.\d{1,6})?(?:\s?(?:"|″|''))?"#,
        examples: &[r#"N43°38'33" W79°23'13""#, "N 42 18 30 W 102 24 45"],
    },
    PatternDef {
        id: "DMS-03",
        family: Family::Dms,
        description: "compact DDMMSSH DDDMMSSH",
        regex: r"\b(?P<dms_deg_lat>\d{2})(?P<dms_min_lat>[0-5]\d)(?P<dms_sec_lat>[0-5]\d)(?P<fract_sec_opt_lat>\.\d{1,4})?(?P<hemi_lat>[NSns])\s?[,/]?\s?(?P<dms_deg_lon>\d{3})(?P<dms_min_lon>[0-5]\d)(?P<dms_sec_lon>[0-5]\d)(?P<fract_sec_opt_lon>\.\d{1,4})?(?P<hemi_lon>[EWew])\b",
        examples: &["421530N1022445W", "421530.5N 1022445.25W"],
    },
    PatternDef {
        id: "DMS-04",
        family: Family::Dms,
        description: "signed colon or dash separated D:M:S pair",
        regex: r"(?P<hemi_sign_lat>[-+])?\b(?P<dms_deg_lat>\d{1,2})[-:](?P<dms_min_lat>[0-5]?\d)[-:](?P<dms_sec_lat>[0-5]?\d)\s+(?P<hemi_sign_lon>[-+])?\b(?P<dms_deg_lon>\d{1,3})[-:](?P<dms_min_lon>[0-5]?\d)[-:](?P<dms_sec_lon>[0-5]?\d)\b",
        examples: &["42:18:30 -102:24:45", "12-25-10 10:30:45"],
    },
    // -----------------------------------------------------------------------
    // MGRS
    // -----------------------------------------------------------------------
    PatternDef {
        id: "MGRS-01",
        family: Family::Mgrs,
        description: "grid zone, 100km square, easting/northing",
        regex: r"\b(?P<mgrs_zone>\d{1,2}\s?[C-HJ-NP-Xc-hj-np-x])\s?(?P<mgrs_quad>[A-HJ-NP-Za-hj-np-z]{2})\s?(?P<easting_northing>\d{1,5}(?:\s{0,2}\d{1,5})?)\b",
        examples: &["38SMB4488", "18S UJ 23371 06519", "4QFJ12345678", "17SLA1234567890"],
    },
    // -----------------------------------------------------------------------
    // UTM
    // -----------------------------------------------------------------------
    PatternDef {
        id: "UTM-01",
        family: Family::Utm,
        description: "zone band easting northing",
        regex: r"\b(?P<utm_zone>\d{1,2})\s?(?P<utm_band>[C-HJ-NP-Xc-hj-np-x])\s+(?P<utm_easting>\d{6})(?:\s?mE|\s?m)?\s+(?P<utm_northing>\d{7})(?:\s?mN|\s?m)?\b",
        examples: &["17T 630084 4833438", "17T 630084mE 4833438mN"],
    },
    PatternDef {
        id: "UTM-02",
        family: Family::Utm,
        description: "labelled zone, then easting and northing",
        regex: r"(?i:\bzone)\s?(?P<utm_zone_zz>\d{1,2})\s?(?P<utm_band>[C-HJ-NP-Xc-hj-np-x])\s*,?\s*(?P<utm_easting>\d{6})\s?(?i:m?E)\s*,?\s*(?P<utm_northing>\d{7})\s?(?i:m?N)\b",
        examples: &["zone 17T 630084E 4833438N", "Zone 56H, 334786mE, 6252080mN"],
    },
    PatternDef {
        id: "UTM-03",
        family: Family::Utm,
        description: "easting and northing, then labelled zone",
        regex: r"\b(?P<utm_easting>\d{6})\s?mE\s+(?P<utm_northing>\d{7})\s?mN\s+(?i:zone)\s?(?P<utm_zone_z>\d{1,2})\s?(?P<utm_band>[C-HJ-NP-Xc-hj-np-x])\b",
        examples: &["630084mE 4833438mN zone 17T"],
    },
];

// ---------------------------------------------------------------------------
// Compiled catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct GeocoordPattern {
    pub id: &'static str,
    pub family: Family,
    pub description: &'static str,
    pub regex: Regex,
    pub enabled: bool,
    pub examples: &'static [&'static str],
}

/// An example string its own pattern failed to match in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfTestFailure {
    pub id: &'static str,
    pub example: &'static str,
    pub matched: Option<String>,
}

/// Compiled patterns, read-only once built.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<GeocoordPattern>,
}

static SHARED: Lazy<PatternSet> = Lazy::new(|| {
    let (set, errors) = PatternSet::compile();
    for e in &errors {
        log::error!("{e}");
    }
    set
});

impl PatternSet {
    /// The process-wide built-in catalog.
    pub fn shared() -> &'static PatternSet {
        &SHARED
    }

    /// Compile the built-in catalog. Patterns that fail to compile are left
    /// out and reported.
    pub fn compile() -> (PatternSet, Vec<ExtractError>) {
        let mut patterns = Vec::with_capacity(DEFINITIONS.len());
        let mut errors = Vec::new();
        for def in DEFINITIONS {
            match Regex::new(def.regex) {
                Ok(regex) => patterns.push(GeocoordPattern {
                    id: def.id,
                    family: def.family,
                    description: def.description,
                    regex,
                    enabled: true,
                    examples: def.examples,
                }),
                Err(e) => errors.push(ExtractError::Pattern { id: def.id.to_string(), message: e.to_string() }),
            }
        }
        (PatternSet { patterns }, errors)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeocoordPattern> {
        self.patterns.iter()
    }

    pub fn get(&self, id: &str) -> Option<&GeocoordPattern> {
        self.patterns.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Copy with the given pattern ids switched off.
    pub fn with_disabled(&self, ids: &[String]) -> PatternSet {
        let mut set = self.clone();
        for p in &mut set.patterns {
            if ids.iter().any(|id| id == p.id) {
                p.enabled = false;
            }
        }
        set
    }

    /// Named captures of a hit, offsets relative to the hit start.
    pub fn fields(pattern: &GeocoordPattern, caps: &Captures<'_>) -> Fields {
        let base = caps.get(0).map(|m| m.start()).unwrap_or(0);
        let mut fields = Fields::default();
        for name in pattern.regex.capture_names().flatten() {
            if let Some(m) = caps.name(name) {
                fields.insert(name, m.as_str(), m.start() - base);
            }
        }
        fields
    }

    /// Run every pattern against its own examples.
    pub fn self_test(&self) -> Vec<SelfTestFailure> {
        let mut failures = Vec::new();
        for p in &self.patterns {
            for example in p.examples {
                let matched = p.regex.find(example).map(|m| m.as_str().to_string());
                if matched.as_deref() != Some(*example) {
                    failures.push(SelfTestFailure { id: p.id, example, matched });
                }
            }
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_compiles() {
        let (set, errors) = PatternSet::compile();
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(set.len(), DEFINITIONS.len());
    }

    #[test]
    fn every_family_has_patterns() {
        let set = PatternSet::shared();
        for family in Family::ALL {
            assert!(set.iter().any(|p| p.family == family), "no pattern for {family}");
        }
    }

    #[test]
    fn examples_match() {
        let failures = PatternSet::shared().self_test();
        assert!(failures.is_empty(), "{failures:#?}");
    }

    #[test]
    fn ids_are_unique() {
        let set = PatternSet::shared();
        let mut ids: Vec<_> = set.iter().map(|p| p.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), set.len());
    }

    #[test]
    fn fields_carry_relative_offsets() {
        let set = PatternSet::shared();
        let p = set.get("DD-01").unwrap();
        let text = "at N42.3, W102.4";
        let caps = p.regex.captures(text).unwrap();
        let fields = PatternSet::fields(p, &caps);
        assert_eq!(fields.text("hemi_pre_lat"), Some("N"));
        assert_eq!(fields.get("dec_deg_lon").unwrap().offset, 8);
        assert!(fields.get("hemi_sign_lat").is_none());
    }

    #[test]
    fn disable_by_id() {
        let set = PatternSet::shared().with_disabled(&["DM-03".to_string()]);
        assert!(!set.get("DM-03").unwrap().enabled);
        assert!(set.get("DM-01").unwrap().enabled);
    }
}
