//! Error types for the link engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Link Error Enum ==
/// Unified error type for link lifecycle operations.
#[derive(Error, Debug)]
pub enum LinkError {
    /// Short code unknown to the store
    #[error("Link not found: {0}")]
    NotFound(String),

    /// Link found but past its TTL; the record has been deleted
    #[error("Link expired: {0}")]
    Expired(String),

    /// Link is live but every allowed click has been used
    #[error("Click limit reached for link: {0}")]
    QuotaExceeded(String),

    /// Requester does not own the link
    #[error("You are not the owner of link: {0}")]
    NotOwner(String),

    /// Malformed user-supplied value
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Every generated code collided with an existing record
    #[error("Could not allocate a free short code after {0} attempts")]
    CodeSpaceExhausted(usize),

    /// Stored record could not be parsed
    #[error("Corrupt record {code}: {reason}")]
    CorruptRecord { code: String, reason: String },

    /// Read or write against the backing store failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl LinkError {
    /// True for failures of the store itself rather than of the request.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            LinkError::Storage(_) | LinkError::CorruptRecord { .. }
        )
    }
}

// == Account Error Enum ==
/// Errors raised by an account directory.
#[derive(Error, Debug)]
pub enum AccountError {
    /// Login contains characters outside `[A-Za-z0-9_-]` or is empty
    #[error("Login may only contain latin letters, digits, '_' and '-': {0:?}")]
    InvalidLogin(String),

    /// Another account already uses this login
    #[error("Login already taken: {0}")]
    LoginTaken(String),

    /// Account file could not be read or written
    #[error("Account storage error: {0}")]
    Storage(#[from] std::io::Error),
}

// == Result Type Alias ==
/// Convenience Result type for link operations.
pub type Result<T> = std::result::Result<T, LinkError>;
