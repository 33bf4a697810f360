use xcoord::config::{ExtractConfig, Flags};
use xcoord::model::{ExtractionResult, Family, GeocoordMatch};
use xcoord::{Extractor, FilterReason};

const REPORT: &str = "Team A reported from N42.3, W102.4 at dawn. Ridge line 42°18.5'N 102°24.8'W, tower 43°38'33.24\"N 79°23'13.7\"W.
Grid 18S UJ 23371 06519 and camp 38SMB4488. Logged 12-25-10 10:30:45. Born 14DEC1990, fuel 2 PER 100.
UTM 17T 630084 4833438. Prices 12.50, 13.75.";

fn run(config: ExtractConfig, text: &str) -> ExtractionResult {
    Extractor::new(config).with_reference_year(2024).extract(text, "doc")
}

fn run_default(text: &str) -> ExtractionResult {
    run(ExtractConfig::default(), text)
}

fn find<'a>(result: &'a ExtractionResult, text: &str) -> Option<&'a GeocoordMatch> {
    result.matches.iter().find(|m| m.text == text)
}

fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!((actual - expected).abs() < tol, "expected {expected}, got {actual}");
}

// -------------------------------------------------------------------------
// Mixed document
// -------------------------------------------------------------------------

#[test]
fn report_default_flags() {
    let result = run_default(REPORT);

    assert_eq!(result.meta.doc_id, "doc");
    assert_eq!(result.summary.raw_hits, 10);
    assert_eq!(result.summary.accepted, 6);
    assert_eq!(result.summary.filtered, 4);
    assert_eq!(result.summary.rejected, 0);
    assert_eq!(result.summary.reduced, 0);
    assert_eq!(result.matches.len(), 6);

    let families: Vec<Family> = result.matches.iter().map(|m| m.family).collect();
    assert_eq!(
        families,
        [Family::Dd, Family::Dm, Family::Dms, Family::Mgrs, Family::Mgrs, Family::Utm]
    );

    // document order, ids assigned in scan order
    for pair in result.matches.windows(2) {
        assert!(pair[0].start < pair[1].start);
    }
    assert!(result.matches.iter().all(|m| m.filtered.is_none() && !m.overlaps));
}

#[test]
fn report_spans_are_byte_offsets() {
    let result = run_default(REPORT);
    for m in &result.matches {
        assert_eq!(&REPORT[m.start..m.end], m.text);
    }
    let dd = find(&result, "N42.3, W102.4").unwrap();
    assert_eq!((dd.start, dd.end), (21, 34));
}

#[test]
fn report_values() {
    let result = run_default(REPORT);

    let dd = find(&result, "N42.3, W102.4").unwrap();
    assert_close(dd.latitude, 42.3, 1e-12);
    assert_close(dd.longitude, -102.4, 1e-12);
    assert_eq!(dd.precision.digits, 1);
    assert_eq!(dd.coord_text, "+42.3 -102.4");
    assert_eq!(dd.pattern_id, "DD-01");
    assert_eq!(dd.confidence, 90);

    let dm = find(&result, "42°18.5'N 102°24.8'W").unwrap();
    assert_close(dm.latitude, 42.0 + 18.5 / 60.0, 1e-9);
    assert_close(dm.longitude, -(102.0 + 24.8 / 60.0), 1e-9);

    let dms = find(&result, "43°38'33.24\"N 79°23'13.7\"W").unwrap();
    assert_close(dms.latitude, 43.0 + 38.0 / 60.0 + 33.24 / 3600.0, 1e-9);
    assert_eq!(dms.precision.meters, 30.0);

    let mgrs = find(&result, "18S UJ 23371 06519").unwrap();
    assert_eq!(mgrs.coord_text, "18SUJ2337106519");
    assert_close(mgrs.latitude, 38.8898, 1e-3);
    assert_close(mgrs.longitude, -77.0365, 1e-3);
    assert_eq!(mgrs.precision.meters, 1.0);

    let utm = find(&result, "17T 630084 4833438").unwrap();
    assert_eq!(utm.coord_text, "17N 630084mE 4833438mN");
    assert_close(utm.latitude, 43.6426, 1e-3);
    assert_close(utm.longitude, -79.3871, 1e-3);
}

#[test]
fn report_without_filters() {
    let mut config = ExtractConfig::default();
    config.flags = Flags::no_filters();
    let result = run(config, REPORT);

    assert_eq!(result.summary.rejected, 0);
    // the ratio reads as an odd-length reference: primary plus alternate
    assert_eq!(result.matches.len(), 11);
    let ratio = find(&result, "2 PER 100").unwrap();
    assert_eq!(ratio.family, Family::Mgrs);
    assert_eq!(ratio.coord_text, "2PER1000");

    let dated = find(&result, "14DEC1990").unwrap();
    assert_eq!(dated.family, Family::Mgrs);
    assert!(dated.latitude < -50.0);

    let clock = find(&result, "12-25-10 10:30:45").unwrap();
    assert_eq!(clock.family, Family::Dms);
    assert!(find(&result, "12.50, 13.75").is_some());
}

#[test]
fn report_retaining_filtered() {
    let config = ExtractConfig { retain_filtered: true, ..ExtractConfig::default() };
    let result = run(config, REPORT);

    assert_eq!(result.matches.len(), 11);
    assert_eq!(result.summary.filtered, 4);
    let reason = |text: &str| find(&result, text).and_then(|m| m.filtered);
    assert_eq!(reason("12-25-10 10:30:45"), Some(FilterReason::DateTime));
    assert_eq!(reason("14DEC1990"), Some(FilterReason::MgrsDate));
    assert_eq!(reason("2 PER 100"), Some(FilterReason::MgrsRatio));
    assert_eq!(reason("12.50, 13.75"), Some(FilterReason::BareFloatPair));
    assert_eq!(reason("N42.3, W102.4"), None);
}

// -------------------------------------------------------------------------
// MGRS
// -------------------------------------------------------------------------

#[test]
fn mgrs_date_filter_toggle() {
    let on = run(ExtractConfig::for_families(&[Family::Mgrs]), "born 14DEC1990");
    assert!(on.matches.is_empty());
    assert_eq!((on.summary.filtered, on.summary.rejected), (1, 0));

    let mut config = ExtractConfig::for_families(&[Family::Mgrs]);
    config.flags.mgrs_filter = false;
    let off = run(config, "born 14DEC1990");
    assert_eq!(off.matches.len(), 1);
    assert_eq!(off.matches[0].coord_text, "14DEC1990");
    assert!(off.matches[0].filtered.is_none());
}

#[test]
fn mgrs_ratio_is_filtered() {
    let on = run(ExtractConfig::for_families(&[Family::Mgrs]), "fuel 2 PER 100");
    assert!(on.matches.is_empty());
    assert_eq!((on.summary.filtered, on.summary.rejected), (1, 0));

    let config = ExtractConfig { retain_filtered: true, ..ExtractConfig::for_families(&[Family::Mgrs]) };
    let kept = run(config, "fuel 2 PER 100");
    assert_eq!(kept.matches[0].filtered, Some(FilterReason::MgrsRatio));
}

#[test]
fn mgrs_placeholder_digits_inside_reference() {
    let result = run(ExtractConfig::for_families(&[Family::Mgrs]), "grid 17SLA1234567890 here");
    assert_eq!(result.summary.filtered, 0);
    assert_eq!(result.matches.len(), 1);
    let m = &result.matches[0];
    assert_eq!(m.coord_text, "17SLA1234567890");
    assert!(m.alternates.is_empty());
    assert_eq!(m.confidence, 90);
    assert_eq!(m.precision.meters, 1.0);
}

#[test]
fn mgrs_odd_digits_give_alternate() {
    let result = run_default("camp 38SMB44888 here");
    assert_eq!(result.matches.len(), 2);

    let (primary, alt) = (&result.matches[0], &result.matches[1]);
    assert_eq!(primary.id, "doc#1");
    assert_eq!(primary.coord_text, "38SMB448088");
    assert_eq!(primary.alternates.len(), 1);
    assert_eq!(primary.confidence, 70);

    assert_eq!(alt.id, "doc#1.1");
    assert_eq!(alt.alternate_of.as_deref(), Some("doc#1"));
    assert_eq!(alt.coord_text, "38SMB448880");
    assert_eq!(alt.confidence, 70);
    assert_eq!((alt.start, alt.end), (primary.start, primary.end));
}

#[test]
fn mgrs_strict_mode() {
    let mut config = ExtractConfig::default();
    config.flags.mgrs_strict = true;
    let result = run(config, "camp 38SMB44888 here");
    assert!(result.matches.is_empty());
    assert_eq!(result.summary.rejected, 1);
}

// -------------------------------------------------------------------------
// DD, DM, DMS, UTM
// -------------------------------------------------------------------------

#[test]
fn dd_labelled_and_bare() {
    let result = run_default("fix at lat 38.8895 lon -77.0353 confirmed");
    assert_eq!(result.matches.len(), 1);
    assert_close(result.matches[0].longitude, -77.0353, 1e-12);
    assert_eq!(result.matches[0].precision.digits, 4);

    assert!(run_default("prices 12.50, 13.75").matches.is_empty());

    let mut config = ExtractConfig::default();
    config.flags.dd_filter = false;
    assert_eq!(run(config, "prices 12.50, 13.75").matches.len(), 1);
}

#[test]
fn dms_date_time_filter_toggle() {
    assert!(run_default("logged 12-25-10 10:30:45").matches.is_empty());

    let mut config = ExtractConfig::default();
    config.flags.dms_date_filter = false;
    let result = run(config, "logged 12-25-10 10:30:45");
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].coord_text, "+12:25:10 +10:30:45");
}

#[test]
fn utm_labelled_zone() {
    let result = run_default("zone 17T 630084E 4833438N");
    assert_eq!(result.matches.len(), 1);
    let m = &result.matches[0];
    assert_eq!(m.pattern_id, "UTM-02");
    assert_eq!(m.precision.meters, 100.0);
    assert_close(m.latitude, 43.6426, 1e-3);
}

#[test]
fn out_of_range_never_emitted() {
    let config = ExtractConfig { retain_filtered: true, ..ExtractConfig::default() };
    let result = run(config, "bad fix N95.5, E10.0");
    assert!(result.matches.is_empty());
    assert_eq!(result.summary.rejected, 1);
}

// -------------------------------------------------------------------------
// Config
// -------------------------------------------------------------------------

#[test]
fn context_window() {
    let config = ExtractConfig { context_width: 4, ..ExtractConfig::default() };
    let result = run(config, "see N42.3, W102.4 today");
    let ctx = result.matches[0].context.as_ref().unwrap();
    assert_eq!(ctx.before, "see ");
    assert_eq!(ctx.after, " tod");

    let mut config = ExtractConfig::default();
    config.flags.extract_context = false;
    assert!(run(config, "see N42.3, W102.4 today").matches[0].context.is_none());
}

#[test]
fn disabled_pattern_is_skipped() {
    let config = ExtractConfig::from_toml(
        r#"
retain_filtered = true
[patterns]
disabled = ["DD-03"]
"#,
    )
    .unwrap();
    let result = run(config, "prices 12.50, 13.75");
    assert!(result.matches.is_empty());
    assert_eq!(result.summary.raw_hits, 0);
}

#[test]
fn result_serializes() {
    let result = run_default("camp 38SMB44888 here");
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["matches"][0]["family"], "mgrs");
    assert_eq!(json["matches"][1]["alternate_of"], "doc#1");
    assert!(json["matches"][0].get("filtered").is_none());
    assert_eq!(json["summary"]["raw_hits"], 1);
}
