//! Error types for the tracker.
//!
//! Validation failures are rejected before any state changes. Storage
//! failures never invalidate the in-memory model; callers decide whether
//! to retry or carry on with the session.

use thiserror::Error;

/// A required input was missing or out of range. The mutation did not happen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("student name must not be empty")]
    EmptyName,

    #[error("lesson notes must not be empty")]
    EmptyNotes,

    #[error("lesson date is required")]
    MissingDate,

    #[error("quick link title must not be empty")]
    EmptyLinkTitle,

    #[error("quick link url must not be empty")]
    EmptyLinkUrl,

    #[error("level {0} is not part of the curriculum")]
    UnknownLevel(u8),
}

/// The storage medium failed to read or write a record.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The medium refused the write (e.g. out of space).
    #[error("storage quota exceeded while writing `{key}`")]
    QuotaExceeded { key: String },

    /// A stored record exists but cannot be decoded.
    #[error("stored value under `{key}` is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize `{key}`: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Persistence(#[from] StoreError),
}

impl TrackerError {
    /// `true` when the in-memory change was applied but could not be saved.
    pub fn is_persistence(&self) -> bool {
        matches!(self, TrackerError::Persistence(_))
    }
}
