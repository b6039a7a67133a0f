// --- File: crates/bookify_assistant/src/error.rs ---
//! Error taxonomy for the assistant.
//!
//! Each variant maps to a distinct failure mode of a chat request, so the
//! HTTP layer can pick a status code and the reply text can tell the user
//! whether retrying is safe.

use bookify_common::services::{GatewayError, IntentError};
use thiserror::Error;

use crate::time::TimeParseError;

#[derive(Error, Debug)]
pub enum AssistantError {
    /// A time phrase in the utterance could not be resolved.
    #[error(transparent)]
    Parse(#[from] TimeParseError),

    /// The request was understood but is not actionable as given.
    #[error("{0}")]
    Validation(String),

    /// The requested slot overlaps an existing appointment.
    #[error("that slot is already taken: {0}")]
    Conflict(String),

    /// The calendar backend failed; nothing was changed.
    #[error("the calendar service is unavailable right now: {0}")]
    Gateway(String),

    /// A calendar mutation may or may not have been applied. The caller
    /// must check their appointments before retrying.
    #[error("the calendar did not confirm the change, please check your appointments before retrying: {0}")]
    AmbiguousOutcome(String),

    /// The intent extractor could not be reached or returned garbage.
    #[error("could not interpret the request right now: {0}")]
    Intent(String),
}

impl From<GatewayError> for AssistantError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::AmbiguousOutcome(msg) => AssistantError::AmbiguousOutcome(msg),
            GatewayError::NotFound(msg) => AssistantError::Validation(msg),
            GatewayError::Api(msg) => AssistantError::Gateway(msg),
        }
    }
}

impl From<IntentError> for AssistantError {
    fn from(err: IntentError) -> Self {
        AssistantError::Intent(err.to_string())
    }
}
