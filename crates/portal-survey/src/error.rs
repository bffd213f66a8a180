//! Survey error types.

use portal_core::{CoreError, Phase};
use thiserror::Error;

/// Errors from the survey backend and the survey flow.
#[derive(Debug, Error)]
pub enum SurveyError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The survey backend returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a survey backend response.
    #[error("parse error: {0}")]
    Parse(String),

    /// A network phase did not finish within the configured bound.
    #[error("{phase} phase timed out after {secs}s")]
    Timeout { phase: Phase, secs: u64 },

    /// The flow rejected an event.
    #[error(transparent)]
    Flow(#[from] CoreError),
}
