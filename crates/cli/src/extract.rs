//! `xcoord extract`: run the extractor over one document.

use std::io::Read;
use std::path::PathBuf;

use xcoord::config::Flags;
use xcoord::{ExtractConfig, Extractor, Family};
use xcoord_cli::{doc_id, report, user_config_path};

use crate::exit_codes::EXIT_NO_MATCHES;
use crate::{load_config_file, CliError, OutputFormat};

pub struct ExtractOptions {
    pub input: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub families: Vec<Family>,
    pub no_filters: bool,
    pub strict: bool,
    pub doc_id: Option<String>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

pub fn cmd_extract(opts: ExtractOptions) -> Result<(), CliError> {
    let config = resolve_config(&opts)?;
    let text = read_input(opts.input.as_ref())?;
    let id = opts.doc_id.clone().unwrap_or_else(|| doc_id(&text));

    let result = Extractor::new(config).extract(&text, &id);

    let rendered = match opts.format {
        OutputFormat::Json => report::json(&result)
            .map_err(|e| CliError::output(format!("JSON serialization error: {e}")))?,
        OutputFormat::Csv => report::csv(&result)
            .map_err(|e| CliError::output(format!("CSV serialization error: {e}")))?,
        OutputFormat::Text => report::text(&result),
    };

    match &opts.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .map_err(|e| CliError::output(format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }
        None => print!("{}", with_newline(rendered)),
    }

    let s = &result.summary;
    eprintln!(
        "{}: {} match(es) from {} hit(s), {} rejected, {} filtered, {} reduced",
        result.meta.doc_id,
        result.matches.len(),
        s.raw_hits,
        s.rejected,
        s.filtered,
        s.reduced,
    );

    if result.matches.iter().all(|m| m.filtered.is_some()) {
        return Err(CliError::silent(EXIT_NO_MATCHES));
    }
    Ok(())
}

fn with_newline(mut s: String) -> String {
    if !s.is_empty() && !s.ends_with('\n') {
        s.push('\n');
    }
    s
}

/// `--config`, else the per-user file when present, else defaults; then
/// command-line overrides.
fn resolve_config(opts: &ExtractOptions) -> Result<ExtractConfig, CliError> {
    let mut config = match &opts.config {
        Some(path) => load_config_file(path)?,
        None => match user_config_path().filter(|p| p.is_file()) {
            Some(path) => {
                log::info!("using config {}", path.display());
                load_config_file(&path)?
            }
            None => ExtractConfig::default(),
        },
    };

    if !opts.families.is_empty() {
        let mut families = opts.families.clone();
        families.sort();
        families.dedup();
        config.families = families;
    }
    if opts.no_filters {
        config.flags = Flags { extract_context: config.flags.extract_context, ..Flags::no_filters() };
    }
    if opts.strict {
        config.flags.mgrs_strict = true;
    }

    config.validate().map_err(CliError::config)?;
    Ok(config)
}

fn read_input(path: Option<&PathBuf>) -> Result<String, CliError> {
    match path {
        Some(p) => std::fs::read_to_string(p)
            .map_err(|e| CliError::input(format!("cannot read {}: {e}", p.display()))),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| CliError::input(format!("cannot read stdin: {e}")))?;
            Ok(text)
        }
    }
}
