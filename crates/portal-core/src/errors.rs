//! Cross-cutting error types for the portal.
//!
//! Domain-specific errors (`AuthError`, `SurveyError`) live in their own
//! crates. `anyhow` is only used at the binary edge.

use thiserror::Error;

/// Errors that can be raised by any portal crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: {event} is not allowed from {from}")]
    InvalidTransition { from: String, event: String },

    /// Data failed validation (range, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}
