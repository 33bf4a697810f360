//! Cross-pattern overlap reduction.
//!
//! Primary matches are ordered by start, longer span first. Among matches on
//! the same span the finest precision wins, then the earlier family, then the
//! earlier pattern id. A span strictly inside a kept span is dropped. Partial
//! overlaps are kept and marked. Alternates follow their primary.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::model::GeocoordMatch;

/// Reduce the match list. Returns the surviving matches in document order
/// and the number removed.
pub fn reduce(matches: Vec<GeocoordMatch>) -> (Vec<GeocoordMatch>, usize) {
    let total = matches.len();
    let (mut primaries, alternates): (Vec<_>, Vec<_>) = matches.into_iter().partition(|m| m.alternate_of.is_none());

    primaries.sort_by(|a, b| {
        (a.start, Reverse(a.end), OrderedFloat(a.precision.meters), a.family, &a.pattern_id).cmp(&(
            b.start,
            Reverse(b.end),
            OrderedFloat(b.precision.meters),
            b.family,
            &b.pattern_id,
        ))
    });

    let mut kept: Vec<GeocoordMatch> = Vec::with_capacity(primaries.len());
    for candidate in primaries {
        let covered = kept
            .iter()
            .any(|k| k.start <= candidate.start && candidate.end <= k.end);
        if covered {
            log::debug!("reduced {} '{}' at {}..{}", candidate.pattern_id, candidate.text, candidate.start, candidate.end);
            continue;
        }
        let mut candidate = candidate;
        for k in kept.iter_mut() {
            if k.start < candidate.end && candidate.start < k.end {
                k.overlaps = true;
                candidate.overlaps = true;
            }
        }
        kept.push(candidate);
    }

    let kept_ids: FxHashSet<&str> = kept.iter().map(|m| m.id.as_str()).collect();
    let mut by_group: FxHashMap<String, Vec<GeocoordMatch>> = FxHashMap::default();
    for alt in alternates {
        if kept_ids.contains(alt.group()) {
            by_group.entry(alt.group().to_string()).or_default().push(alt);
        }
    }

    let mut out = Vec::with_capacity(total);
    for primary in kept {
        let alts = by_group.remove(&primary.id).unwrap_or_default();
        let overlaps = primary.overlaps;
        out.push(primary);
        out.extend(alts.into_iter().map(|mut a| {
            a.overlaps = overlaps;
            a
        }));
    }
    let removed = total - out.len();
    (out, removed)
}
