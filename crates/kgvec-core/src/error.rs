//! Centralized error types for kgvec.

use thiserror::Error;

/// Main error type for kgvec operations.
#[derive(Error, Debug)]
pub enum KgvecError {
    #[error("{collaborator} unavailable: {message}")]
    CollaboratorUnavailable {
        collaborator: &'static str,
        message: String,
    },

    #[error("Embedding failed for '{uri}': {message}")]
    Embedding { uri: String, message: String },

    #[error("Malformed entity: {0}")]
    MalformedEntity(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for kgvec operations.
pub type KgvecResult<T> = Result<T, KgvecError>;

impl KgvecError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a malformed entity error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedEntity(msg.into())
    }

    /// Wrap a collaborator failure, keeping the full error chain in the message.
    pub fn unavailable(collaborator: &'static str, err: impl std::fmt::Display) -> Self {
        Self::CollaboratorUnavailable {
            collaborator,
            message: format!("{:#}", err),
        }
    }

    /// Whether this error only affects a single entity and the run may continue.
    pub fn is_per_entity(&self) -> bool {
        matches!(self, Self::Embedding { .. } | Self::MalformedEntity(_))
    }
}
