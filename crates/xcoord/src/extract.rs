//! Extraction pipeline.
//!
//! Every enabled pattern is run over the text. Each hit is normalized,
//! screened by the false-positive filters, given context and an id, and
//! collected. A final reduction pass settles overlaps between patterns.

use xcoord_geodesy::{Geodesy, Wgs84};

use crate::config::ExtractConfig;
use crate::error::{ExtractError, FilterReason};
use crate::filters::{FilterBank, MgrsFilter};
use crate::model::{
    ExtractionMeta, ExtractionResult, ExtractionSummary, GeocoordMatch, MatchContext, RawMatch,
};
use crate::normalize::{Normalized, Normalizer};
use crate::patterns::{GeocoordPattern, PatternSet};
use crate::reduce::reduce;

/// Positions this close to (0, 0) on both axes are treated as null island.
pub const ZERO_EPSILON: f64 = 1e-5;

/// Terminal state of one pattern hit.
///
/// A filtered hit keeps its normalized form when it got that far, so it can
/// still be emitted under `retain_filtered`.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Rejected(ExtractError),
    Filtered(FilterReason, Option<Normalized>),
    Accepted(Normalized),
}

impl MatchOutcome {
    fn tally(&self, summary: &mut ExtractionSummary) {
        match self {
            Self::Rejected(_) => summary.rejected += 1,
            Self::Filtered(..) => summary.filtered += 1,
            Self::Accepted(_) => summary.accepted += 1,
        }
    }
}

pub struct Extractor {
    config: ExtractConfig,
    patterns: PatternSet,
    geodesy: Box<dyn Geodesy>,
    mgrs_filter: MgrsFilter,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractConfig::default())
    }
}

impl Extractor {
    /// Extractor over the built-in catalog with the WGS84 grid conversions.
    /// Config is assumed validated.
    pub fn new(config: ExtractConfig) -> Self {
        for id in &config.patterns.disabled {
            log::warn!("pattern {id} disabled by config");
        }
        let patterns = PatternSet::shared().with_disabled(&config.patterns.disabled);
        Self { config, patterns, geodesy: Box::new(Wgs84), mgrs_filter: MgrsFilter::new() }
    }

    pub fn with_geodesy(mut self, geodesy: impl Geodesy + 'static) -> Self {
        self.geodesy = Box::new(geodesy);
        self
    }

    /// Pin the year MGRS date detection counts back from.
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.mgrs_filter = MgrsFilter::with_reference_year(year);
        self
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    fn run<'a>(&'a self, text: &'a str, doc_id: &'a str) -> Run<'a> {
        Run {
            extractor: self,
            text,
            doc_id,
            normalizer: Normalizer::new(self.geodesy.as_ref(), self.config.flags),
            filters: FilterBank::new(self.config.flags, self.mgrs_filter),
            summary: ExtractionSummary::default(),
            matches: Vec::new(),
            seq: 0,
        }
    }

    pub fn extract(&self, text: &str, doc_id: &str) -> ExtractionResult {
        let mut run = self.run(text, doc_id);

        if !text.is_empty() {
            for pattern in self.patterns.iter() {
                if !pattern.enabled || !self.config.is_enabled(pattern.family) {
                    continue;
                }
                run.scan(pattern);
            }
        }

        let Run { mut summary, matches, .. } = run;
        let (matches, reduced) = reduce(matches);
        summary.reduced = reduced;

        log::info!(
            "extracted {} matches from {doc_id}: {} hits, {} rejected, {} filtered, {} reduced",
            matches.len(),
            summary.raw_hits,
            summary.rejected,
            summary.filtered,
            summary.reduced
        );

        ExtractionResult {
            meta: ExtractionMeta {
                doc_id: doc_id.to_string(),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                families: self.config.families.clone(),
            },
            summary,
            matches,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-call state
// ---------------------------------------------------------------------------

struct Run<'a> {
    extractor: &'a Extractor,
    text: &'a str,
    doc_id: &'a str,
    normalizer: Normalizer<'a>,
    filters: FilterBank,
    summary: ExtractionSummary,
    matches: Vec<GeocoordMatch>,
    seq: usize,
}

impl Run<'_> {
    fn scan(&mut self, pattern: &GeocoordPattern) {
        self.summary.patterns_evaluated += 1;
        let extractor = self.extractor;
        let config = &extractor.config;

        for caps in pattern.regex.captures_iter(self.text) {
            let Some(whole) = caps.get(0) else { continue };
            self.summary.raw_hits += 1;
            let raw = RawMatch {
                start: whole.start(),
                end: whole.end(),
                text: whole.as_str().to_string(),
                family: pattern.family,
                pattern_id: pattern.id.to_string(),
                fields: PatternSet::fields(pattern, &caps),
            };

            let outcome = self.assess(&raw);
            outcome.tally(&mut self.summary);
            match outcome {
                MatchOutcome::Rejected(e) => log::debug!("{} rejected: {e}", raw.pattern_id),
                MatchOutcome::Filtered(reason, normalized) => {
                    log::debug!("{} '{}': {reason}", raw.pattern_id, raw.text);
                    if let Some(n) = normalized.filter(|_| config.retain_filtered) {
                        self.emit(&raw, n, Some(reason));
                    }
                }
                MatchOutcome::Accepted(n) => self.emit(&raw, n, None),
            }
        }
    }

    /// Drive one hit to its terminal state. Adjacent-text hits are never
    /// normalized.
    fn assess(&self, raw: &RawMatch) -> MatchOutcome {
        if self.extractor.config.flags.context_filter && glued_to_text(self.text, raw) {
            return MatchOutcome::Filtered(FilterReason::AdjacentText, None);
        }
        match self.normalizer.normalize(raw) {
            Err(e) => MatchOutcome::Rejected(e),
            Ok(n) => match self.screen(raw, &n) {
                Some(reason) => MatchOutcome::Filtered(reason, Some(n)),
                None => MatchOutcome::Accepted(n),
            },
        }
    }

    /// First false-positive reason for a normalized hit, if any.
    fn screen(&self, raw: &RawMatch, n: &Normalized) -> Option<FilterReason> {
        if let Some(reason) = n.filtered {
            return Some(reason);
        }
        if n.lat.abs() < ZERO_EPSILON && n.lon.abs() < ZERO_EPSILON {
            return Some(FilterReason::ZeroCoordinate);
        }
        if n.coord_text.trim().is_empty() {
            return Some(FilterReason::EmptyCoordText);
        }
        self.filters.check(raw.family, &raw.text, &n.coord_text)
    }

    fn emit(&mut self, raw: &RawMatch, n: Normalized, filtered: Option<FilterReason>) {
        self.seq += 1;
        let id = format!("{}#{}", self.doc_id, self.seq);
        let extractor = self.extractor;
        let config = &extractor.config;
        let context = config
            .flags
            .extract_context
            .then(|| context_window(self.text, raw.start, raw.end, config.context_width));

        let primary = GeocoordMatch {
            id: id.clone(),
            start: raw.start,
            end: raw.end,
            text: raw.text.clone(),
            family: raw.family,
            pattern_id: raw.pattern_id.clone(),
            coord_text: n.coord_text,
            latitude: n.lat,
            longitude: n.lon,
            precision: n.precision,
            confidence: n.confidence,
            context,
            alternates: n.alternates,
            alternate_of: None,
            filtered,
            overlaps: false,
        };

        let alternates: Vec<GeocoordMatch> = primary
            .alternates
            .iter()
            .enumerate()
            .map(|(i, alt)| GeocoordMatch {
                id: format!("{id}.{}", i + 1),
                coord_text: alt.coord_text.clone(),
                latitude: alt.latitude,
                longitude: alt.longitude,
                alternates: Vec::new(),
                alternate_of: Some(id.clone()),
                ..primary.clone()
            })
            .collect();

        self.matches.push(primary);
        self.matches.extend(alternates);
    }
}

// ---------------------------------------------------------------------------
// Text helpers
// ---------------------------------------------------------------------------

/// A hit that continues a word or number, as in `ID38SMB4488`.
fn glued_to_text(text: &str, raw: &RawMatch) -> bool {
    if raw.text.starts_with(char::is_whitespace) {
        return false;
    }
    text[..raw.start].chars().next_back().is_some_and(char::is_alphanumeric)
}

fn strip_line_breaks(s: &str) -> String {
    s.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}

/// Up to `width` characters on each side of the span, line breaks removed.
pub fn context_window(text: &str, start: usize, end: usize, width: usize) -> MatchContext {
    let before = &text[..start];
    let skip = before.chars().count().saturating_sub(width);
    let before: String = before.chars().skip(skip).collect();
    let after: String = text[end..].chars().take(width).collect();
    MatchContext { before: strip_line_breaks(&before), after: strip_line_breaks(&after) }
}
