//! Local, deterministic failures: bad input caught before anything is sent to
//! the identity provider or the roster store.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A field or request failed validation; the message is user-facing.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Text that should have been an identifier of `kind`.
    #[error("invalid {kind} '{value}'")]
    InvalidId { kind: &'static str, value: String },

    /// A name outside a closed set (roles, statuses).
    #[error("unknown {kind} '{value}'")]
    Unknown { kind: &'static str, value: String },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidId {
            kind,
            value: value.into(),
        }
    }

    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        Self::Unknown {
            kind,
            value: value.into(),
        }
    }
}
