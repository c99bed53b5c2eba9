//! Error types for store access, ranking and account operations.

use std::time::Duration;

use thiserror::Error;

/// Failures raised by a key-value store adapter.
///
/// A missing key is never an error: adapters return `Ok(None)` for it.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached or rejected the operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store did not answer within the configured budget.
    #[error("Store call timed out after {0:?}")]
    Timeout(Duration),
}

impl StoreError {
    /// Both variants mean the same thing to callers: the store is not usable right now.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Timeout(_))
    }
}

/// Errors surfaced by the participant repository and the leaderboard service.
#[derive(Error, Debug)]
pub enum LeaderboardError {
    /// The backing store failed during a read, write or key listing.
    #[error("Store unavailable")]
    StoreUnavailable(#[from] StoreError),

    /// A single stored record could not be decoded.
    #[error("Corrupt record under key {key}: {reason}")]
    CorruptRecord { key: String, reason: String },

    /// A participant could not be encoded for storage.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors surfaced by registration, login and score operations.
#[derive(Error, Debug)]
pub enum AccountError {
    /// The supplied password does not match the stored hash.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No participant is stored under the identifier.
    #[error("Participant not found: {0}")]
    NotFound(String),

    /// Empty username or password.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Hashing or hash parsing failed.
    #[error("Credential hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Store(#[from] LeaderboardError),
}

/// Result type for repository and ranking operations.
pub type Result<T> = std::result::Result<T, LeaderboardError>;
