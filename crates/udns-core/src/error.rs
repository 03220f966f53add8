//! Error types for the reconciliation core
//!
//! Every failure the core can report maps onto one variant of [`Error`].
//! The variants follow the taxonomy the engine acts on:
//!
//! - local problems ([`Error::Validation`], [`Error::InvalidTransition`],
//!   [`Error::ReplacementRequired`]) are raised before any remote call;
//! - [`Error::NotFound`] is converted into an `Absent` observation on read;
//! - [`Error::Remote`] and [`Error::Transport`] are fatal to the current
//!   operation and surfaced unchanged;
//! - [`Error::Serialization`], [`Error::UnknownProfileSchema`] and
//!   [`Error::PairingMismatch`] indicate a document the codec cannot map.

use thiserror::Error;

/// Result type alias for reconciliation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the reconciliation core
#[derive(Error, Debug)]
pub enum Error {
    /// Declared configuration is invalid
    #[error("Validation error: {0}")]
    Validation(String),

    /// The remote store reported that the named resource does not exist
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Provider-reported failure, surfaced verbatim
    #[error("Remote error {code}: {message}")]
    Remote {
        /// Provider-defined error code
        code: i64,
        /// Provider-defined error message
        message: String,
    },

    /// Connectivity or response-parsing failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Profile or body (de)serialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Profile document carries an unknown or missing `@context`
    #[error("Unknown profile schema: {0}")]
    UnknownProfileSchema(String),

    /// Remote pool document has different rdata and member counts
    #[error("Pool member mismatch: {rdata} rdata value(s) but {members} member(s)")]
    PairingMismatch {
        /// Number of rdata values
        rdata: usize,
        /// Number of member attribute blocks
        members: usize,
    },

    /// Operation is not allowed from the current resource state
    #[error("Invalid transition: cannot {operation} a resource that is {state}")]
    InvalidTransition {
        /// Requested operation
        operation: &'static str,
        /// Current state name
        state: &'static str,
    },

    /// Key of an existing resource changed; only delete + create applies
    #[error("Replacement required: {0}")]
    ReplacementRequired(String),

    /// Client configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a provider-reported error
    pub fn remote(code: i64, message: impl Into<String>) -> Self {
        Self::Remote {
            code,
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an unknown-profile-schema error
    pub fn unknown_schema(context: impl Into<String>) -> Self {
        Self::UnknownProfileSchema(context.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error is the "resource does not exist" classification
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether this error aborts the current operation
    ///
    /// Only `NotFound` is recoverable: the engine turns it into an `Absent`
    /// observation.
    pub fn is_fatal(&self) -> bool {
        !self.is_not_found()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_keeps_code_and_message() {
        let err = Error::remote(56001, "Record already exists");
        assert_eq!(err.to_string(), "Remote error 56001: Record already exists");
        assert!(err.is_fatal());
    }

    #[test]
    fn test_not_found_is_not_fatal() {
        let err = Error::not_found("www.example.com");
        assert!(err.is_not_found());
        assert!(!err.is_fatal());
    }
}
