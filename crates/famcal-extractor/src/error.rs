//! Error types for the Extractor

use thiserror::Error;

/// Errors that abandon the model extraction path for one message
///
/// None of these escape [`crate::Extractor::extract`]; they are logged and
/// turned into "no event".
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// LLM provider error (transport, timeout, non-success status)
    #[error("LLM error: {0}")]
    Llm(String),

    /// The reply contains no `{`
    #[error("No JSON object in model reply")]
    NoJson,

    /// JSON parsing failed even after repair
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// The reply parsed, but not as an object
    #[error("Invalid event format: {0}")]
    InvalidFormat(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}

/// A phrase the date/time resolver could not interpret
///
/// Returned by the `try_*` resolvers so callers and tests can tell a
/// defaulted value from a resolved one. The public resolvers log it at
/// warning level and substitute a default.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SoftFailure {
    /// Nothing to parse
    #[error("empty input")]
    Empty,

    /// No supported phrase found
    #[error("unrecognized phrase '{0}'")]
    Unrecognized(String),

    /// Components found but they name no calendar date
    #[error("no such date '{0}'")]
    InvalidDate(String),

    /// Clock components found but hour or minute out of range
    #[error("time out of range '{0}'")]
    OutOfRange(String),
}
