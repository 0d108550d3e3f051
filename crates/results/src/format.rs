//! Canonical JSON result format.
//!
//! A run is written as a JSON array holding one object per benchmark result.
//! This is the representation the sink round-trips through before enriching
//! a result with build metadata.

use crate::result::RunResult;
use thiserror::Error;

/// Errors raised while encoding or decoding the result format.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Results could not be encoded
    #[error("Encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// Input is not a valid result array
    #[error("Decode error: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Encode results as a pretty-printed JSON array.
pub fn jsonify_results(results: &[RunResult]) -> Result<String, FormatError> {
    serde_json::to_string_pretty(results).map_err(FormatError::Encode)
}

/// Decode a JSON result array.
pub fn parse_results(json: &str) -> Result<Vec<RunResult>, FormatError> {
    serde_json::from_str(json).map_err(FormatError::Decode)
}
