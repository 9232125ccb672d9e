//! Extraction error types.

use thiserror::Error;

/// Failure to read a provider response as an invoice.
///
/// Only structural problems are errors. Individual fields that are
/// missing or malformed are coerced to their zero value instead.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The response contained no JSON after fence stripping.
    #[error("provider response is empty")]
    EmptyResponse,

    /// The response is not valid JSON.
    #[error("provider response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The response is valid JSON but not an object.
    #[error("provider response must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}
