//! Fixtures
//!
//! Requests stored as YAML, e.g.
//!
//! ```yaml
//! target: "72,409.53"
//! must_include:
//!   - "1,329.70"
//! values:
//!   - "70,000.00"
//!   - "1,329.70"
//! limit: 3
//! index_offset: 8
//! ```

use std::{fs, path::Path};

use thiserror::Error;

use crate::request::Request;

/// Default directory holding named request fixtures.
pub const DEFAULT_BASE_PATH: &str = "./fixtures/requests";

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Load a request from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_request(path: impl AsRef<Path>) -> Result<Request, FixtureError> {
    let contents = fs::read_to_string(path)?;

    parse_request(&contents)
}

/// Parse a request from YAML text.
///
/// # Errors
///
/// Returns an error if the text is not a valid request document.
pub fn parse_request(contents: &str) -> Result<Request, FixtureError> {
    Ok(serde_norway::from_str(contents)?)
}

/// Load a named request from [`DEFAULT_BASE_PATH`].
///
/// # Errors
///
/// Returns an error if the fixture cannot be read or parsed.
pub fn from_set(name: &str) -> Result<Request, FixtureError> {
    load_request(Path::new(DEFAULT_BASE_PATH).join(format!("{name}.yml")))
}
