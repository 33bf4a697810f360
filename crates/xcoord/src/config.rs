use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;
use crate::model::Family;
use crate::patterns::PatternSet;

/// Widest context window accepted, in characters per side.
pub const MAX_CONTEXT_WIDTH: usize = 1000;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Immutable extraction settings, passed into every extraction call.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    pub families: Vec<Family>,
    /// Characters of context captured on each side of a match.
    pub context_width: usize,
    /// Emit filtered matches, marked with their reason, instead of dropping them.
    pub retain_filtered: bool,
    pub flags: Flags,
    pub patterns: PatternToggles,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            families: Family::ALL.to_vec(),
            context_width: 50,
            retain_filtered: false,
            flags: Flags::default(),
            patterns: PatternToggles::default(),
        }
    }
}

impl ExtractConfig {
    pub fn from_toml(input: &str) -> Result<Self, ExtractError> {
        let config: ExtractConfig =
            toml::from_str(input).map_err(|e| ExtractError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Config restricted to the given families, other settings default.
    pub fn for_families(families: &[Family]) -> Self {
        Self { families: families.to_vec(), ..Self::default() }
    }

    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.families.is_empty() {
            return Err(ExtractError::ConfigValidation("at least one family must be enabled".into()));
        }

        let mut seen = HashSet::new();
        for family in &self.families {
            if !seen.insert(family) {
                return Err(ExtractError::ConfigValidation(format!("family {family} listed twice")));
            }
        }

        if self.context_width > MAX_CONTEXT_WIDTH {
            return Err(ExtractError::ConfigValidation(format!(
                "context_width must be at most {MAX_CONTEXT_WIDTH}, got {}",
                self.context_width
            )));
        }

        let catalog = PatternSet::shared();
        for id in &self.patterns.disabled {
            if catalog.get(id).is_none() {
                return Err(ExtractError::ConfigValidation(format!("unknown pattern id '{id}'")));
            }
        }

        Ok(())
    }

    pub fn is_enabled(&self, family: Family) -> bool {
        self.families.contains(&family)
    }
}

// ---------------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------------

/// Runtime switches for filters and context extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Flags {
    pub dms_date_filter: bool,
    /// Reject DD pairs with no hemisphere letters and no coordinate symbols.
    pub dd_filter: bool,
    pub mgrs_filter: bool,
    /// Reject MGRS references with an odd easting/northing digit count.
    pub mgrs_strict: bool,
    pub extract_context: bool,
    /// Reject hits immediately preceded by a letter or digit.
    pub context_filter: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            dms_date_filter: true,
            dd_filter: true,
            mgrs_filter: true,
            mgrs_strict: false,
            extract_context: true,
            context_filter: true,
        }
    }
}

impl Flags {
    /// Every filter off, context extraction kept.
    pub fn no_filters() -> Self {
        Self {
            dms_date_filter: false,
            dd_filter: false,
            mgrs_filter: false,
            mgrs_strict: false,
            extract_context: true,
            context_filter: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatternToggles {
    /// Catalog pattern ids to switch off.
    pub disabled: Vec<String>,
}
