//! Command-line configuration

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    num::NonZeroUsize,
    path::PathBuf,
};

use clap::{Args, Parser};
use rusty_money::iso::{Currency, EUR, GBP, USD};
use thiserror::Error;

use crate::{
    fixtures::{FixtureError, load_request},
    request::Request,
    solvers::Strategy,
};

/// Line that ends interactive value entry.
pub const END_OF_INPUT: &str = "done";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No target was given.
    #[error("a target is required (use --target or --request)")]
    MissingTarget,

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// IO error reading values
    #[error("Failed to read values: {0}")]
    Io(#[from] io::Error),

    /// Request file error
    #[error(transparent)]
    Fixture(#[from] FixtureError),
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Result output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Tables of used and unused values.
    Table,

    /// A YAML document.
    Yaml,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Reckon configuration
#[derive(Debug, Parser)]
#[command(
    name = "reckon",
    version,
    about = "Find the longest subsets of amounts that sum exactly to a target",
    long_about = None
)]
#[command(
    after_help = "Example:\n  reckon --target 72,409.53 --must-include 1,329.70 --values-file ledger.txt -k 5"
)]
pub struct Config {
    /// Target sum (e.g. 72,409.53 or -1,329.70)
    #[arg(
        short,
        long,
        env = "RECKON_TARGET",
        allow_hyphen_values = true,
        required_unless_present = "request"
    )]
    pub target: Option<String>,

    /// Value every combination must include (repeat for more)
    #[arg(short, long = "must-include", allow_hyphen_values = true)]
    pub must_include: Vec<String>,

    /// File of available values, one per line (reads stdin when omitted)
    #[arg(short = 'f', long)]
    pub values_file: Option<PathBuf>,

    /// YAML request file holding target, must-include values and values
    #[arg(short, long, conflicts_with_all = ["target", "must_include", "values_file"])]
    pub request: Option<PathBuf>,

    /// Number of combinations to show [default: 3, or the request file's limit]
    #[arg(short = 'k', long, env = "RECKON_LIMIT")]
    pub limit: Option<NonZeroUsize>,

    /// Offset added to every reported index [default: 8, or the request file's offset]
    #[arg(long, env = "RECKON_INDEX_OFFSET")]
    pub index_offset: Option<usize>,

    /// Search strategy
    #[arg(short, long, env = "RECKON_STRATEGY", value_enum, default_value_t = Strategy::Backtracking)]
    pub strategy: Strategy,

    /// ISO currency code used to format sums (GBP, USD, EUR)
    #[arg(short, long, env = "RECKON_CURRENCY")]
    pub currency: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Build the request described by the configuration.
    ///
    /// A request file supplies the target, must-include values and values. Otherwise values
    /// come from `values_file` or standard input. A limit or index offset given on the
    /// command line (or through the environment) replaces the request file's, or the
    /// defaults of [`DEFAULT_LIMIT`](crate::request::DEFAULT_LIMIT) and
    /// [`DEFAULT_INDEX_OFFSET`](crate::request::DEFAULT_INDEX_OFFSET).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the target is missing or an input cannot be read.
    pub fn request(&self) -> Result<Request, ConfigError> {
        let mut request = match &self.request {
            Some(path) => load_request(path)?,
            None => {
                let target = self.target.clone().ok_or(ConfigError::MissingTarget)?;

                let values = match &self.values_file {
                    Some(path) => read_values(BufReader::new(File::open(path)?))?,
                    None => read_values(io::stdin().lock())?,
                };

                Request::new(target, self.must_include.clone(), values)
            }
        };

        if let Some(limit) = self.limit {
            request = request.with_limit(limit);
        }

        if let Some(index_offset) = self.index_offset {
            request = request.with_index_offset(index_offset);
        }

        Ok(request)
    }

    /// Resolve the configured currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] for unsupported codes.
    pub fn currency(&self) -> Result<Option<&'static Currency>, ConfigError> {
        self.currency.as_deref().map(resolve_currency).transpose()
    }
}

/// Resolve an ISO currency code.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownCurrency`] for unsupported codes.
pub fn resolve_currency(code: &str) -> Result<&'static Currency, ConfigError> {
    match code.trim().to_ascii_uppercase().as_str() {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        _ => Err(ConfigError::UnknownCurrency(code.to_string())),
    }
}

/// Read values one per line until end of input or a line reading `done`.
///
/// Blank lines are skipped.
///
/// # Errors
///
/// Returns an error if reading fails.
pub fn read_values(reader: impl BufRead) -> io::Result<Vec<String>> {
    let mut values = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if line.eq_ignore_ascii_case(END_OF_INPUT) {
            break;
        }

        if !line.is_empty() {
            values.push(line.to_string());
        }
    }

    Ok(values)
}
