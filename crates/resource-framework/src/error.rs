//! # Session Errors
//!
//! This module defines the common error type returned by every session helper.
//! Backends, the actor loop and the client all speak `SessionError`, so callers
//! only ever match on one enum regardless of which backend served the request.

/// Errors that can occur while serving a resource request.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Backend closed")]
    BackendClosed,
    #[error("Backend dropped response channel")]
    BackendDropped,
    #[error("No {resource} found for {id}")]
    NotFound { resource: &'static str, id: String },
    #[error("More than one {resource} exists with the name '{name}'")]
    DuplicateResource { resource: &'static str, name: String },
    #[error("{resource} has no id")]
    MissingId { resource: &'static str },
    #[error("Key manager rejected credentials (status {0})")]
    Unauthorized(u16),
    #[error("Key manager returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Network error communicating with key manager")]
    Network(#[source] reqwest::Error),
    #[error("Failed to encode or decode resource: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl SessionError {
    /// True for the errors that mean "the entity is not there".
    pub fn is_not_found(&self) -> bool {
        matches!(self, SessionError::NotFound { .. })
    }
}
