//! Error types for the keystore proxy.

use resource_framework::SessionError;
use thiserror::Error;

/// Errors returned by [`Proxy`](crate::Proxy) and the keystore runtime.
#[derive(Debug, Error)]
pub enum KeystoreError {
    /// The requested entity does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// `find` matched more than one entity by name.
    #[error("More than one {kind} is named '{name}'")]
    AmbiguousName { kind: &'static str, name: String },

    /// A resource was used as an id before the service assigned it one.
    #[error("{0} has no reference yet")]
    MissingId(&'static str),

    /// Any other failure of the session or the key manager.
    #[error("Key manager communication error: {0}")]
    Communication(#[source] SessionError),

    /// The environment did not describe a usable backend.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<SessionError> for KeystoreError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotFound { resource, id } => KeystoreError::NotFound { kind: resource, id },
            SessionError::DuplicateResource { resource, name } => {
                KeystoreError::AmbiguousName { kind: resource, name }
            }
            SessionError::MissingId { resource } => KeystoreError::MissingId(resource),
            other => KeystoreError::Communication(other),
        }
    }
}
