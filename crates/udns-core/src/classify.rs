//! Error classifier
//!
//! Maps the outcome of a remote call onto the small set of cases the engine
//! acts on. Only the first entry of an error envelope is considered.

use crate::error::{Error, Result};
use crate::traits::StoreError;

/// Provider error code meaning "resource does not exist"
pub const NOT_FOUND_CODE: i64 = 70002;

/// Classified outcome of a remote call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification<T> {
    Success(T),
    NotFound,
    Remote { code: i64, message: String },
    Transport(String),
}

/// Classify a remote call result
pub fn classify<T>(result: std::result::Result<T, StoreError>) -> Classification<T> {
    match result {
        Ok(value) => Classification::Success(value),
        Err(StoreError::Transport(cause)) => Classification::Transport(cause),
        Err(StoreError::Responses(errors)) => match errors.into_iter().next() {
            Some(first) if first.error_code == NOT_FOUND_CODE => Classification::NotFound,
            Some(first) => Classification::Remote {
                code: first.error_code,
                message: first.error_message,
            },
            None => Classification::Transport("empty error response".to_string()),
        },
    }
}

impl<T> Classification<T> {
    /// Convert into the error taxonomy; `subject` names the resource for
    /// `NotFound`
    pub fn into_result(self, subject: impl std::fmt::Display) -> Result<T> {
        match self {
            Classification::Success(value) => Ok(value),
            Classification::NotFound => Err(Error::not_found(subject.to_string())),
            Classification::Remote { code, message } => Err(Error::remote(code, message)),
            Classification::Transport(cause) => Err(Error::transport(cause)),
        }
    }
}
