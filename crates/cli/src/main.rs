// xcoord CLI - coordinate extraction from text files and stdin

mod exit_codes;
mod extract;
mod patterns;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use xcoord::{ExtractConfig, ExtractError, Family};

use exit_codes::{
    EXIT_CONFIG_INVALID, EXIT_CONFIG_PARSE, EXIT_INPUT, EXIT_OUTPUT, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "xcoord")]
#[command(about = "Find and normalize geographic coordinates in free text")]
#[command(version)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract coordinates from a file or stdin (exit 0 = found, exit 3 = none)
    #[command(after_help = "\
Examples:
  xcoord extract report.txt
  cat report.txt | xcoord extract --format text
  xcoord extract report.txt --family dd,mgrs --format csv --output coords.csv
  xcoord extract report.txt --no-filters --doc-id report-17
  xcoord extract report.txt --config strict.toml --strict")]
    Extract {
        /// Text file to scan (reads stdin if omitted)
        input: Option<PathBuf>,

        /// Config file (default: <config dir>/xcoord/config.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Restrict to these families (comma-separated: dd,dm,dms,mgrs,utm)
        #[arg(long, value_delimiter = ',')]
        family: Vec<Family>,

        /// Turn off every false-positive filter
        #[arg(long)]
        no_filters: bool,

        /// Reject MGRS references with an odd easting/northing digit count
        #[arg(long)]
        strict: bool,

        /// Document id used in match ids (default: SHA-256 prefix of the text)
        #[arg(long)]
        doc_id: Option<String>,

        /// Output format
        #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Write output to file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Validate an extraction config file without running
    #[command(after_help = "\
Examples:
  xcoord validate xcoord.toml")]
    Validate {
        /// Path to the config file
        config: PathBuf,
    },

    /// List the built-in pattern catalog or run its examples
    #[command(after_help = "\
Examples:
  xcoord patterns
  xcoord patterns --family mgrs
  xcoord patterns --self-test")]
    Patterns {
        /// Only patterns of this family
        #[arg(long)]
        family: Option<Family>,

        /// Match every pattern against its examples (exit 20 on failure)
        #[arg(long)]
        self_test: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
    Text,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Extract { input, config, family, no_filters, strict, doc_id, format, output } => {
            extract::cmd_extract(extract::ExtractOptions {
                input,
                config,
                families: family,
                no_filters,
                strict,
                doc_id,
                format,
                output,
            })
        }
        Commands::Validate { config } => cmd_validate(config),
        Commands::Patterns { family, self_test } => patterns::cmd_patterns(family, self_test),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INPUT, message: msg.into(), hint: None }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self { code: EXIT_OUTPUT, message: msg.into(), hint: None }
    }

    /// Exit with `code` and nothing printed.
    pub fn silent(code: u8) -> Self {
        Self { code, message: String::new(), hint: None }
    }

    /// Map an engine config error to its exit code.
    pub fn config(err: ExtractError) -> Self {
        let code = match err {
            ExtractError::ConfigParse(_) => EXIT_CONFIG_PARSE,
            _ => EXIT_CONFIG_INVALID,
        };
        Self { code, message: err.to_string(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// validate
// ============================================================================

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config_file(&config_path)?;
    let families: Vec<&str> = config.families.iter().map(|f| f.as_str()).collect();
    eprintln!(
        "valid: families {}, context width {}, {} pattern(s) disabled",
        families.join(","),
        config.context_width,
        config.patterns.disabled.len(),
    );
    Ok(())
}

pub fn load_config_file(path: &std::path::Path) -> Result<ExtractConfig, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        CliError::args(format!("cannot read config {}: {e}", path.display()))
    })?;
    ExtractConfig::from_toml(&text).map_err(|e| {
        CliError::config(e).with_hint(format!("check {}", path.display()))
    })
}
