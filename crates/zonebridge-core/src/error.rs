//! Error types for zonebridge
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

use crate::record::EntryRef;

/// Result type alias for zonebridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for zonebridge
#[derive(Error, Debug)]
pub enum Error {
    /// The backend reported a failed create for this entry
    #[error("Failed to create record {entry}")]
    RecordCreate {
        /// The entry the backend refused
        entry: EntryRef,
    },

    /// The backend reported a failed update for this entry
    #[error("Failed to update record {entry}")]
    RecordUpdate {
        /// The entry the backend refused
        entry: EntryRef,
    },

    /// The backend reported a failed delete for this entry
    #[error("Failed to delete record {entry}")]
    RecordDelete {
        /// The entry the backend refused
        entry: EntryRef,
    },

    /// A backend refused a mutation without raising a transport error
    ///
    /// The change planner turns this into one of the typed record errors.
    #[error("Backend rejected the operation: {0}")]
    Rejected(String),

    /// Entry content that does not fit its record type
    #[error("Invalid {rtype} content \"{content}\": {reason}")]
    InvalidContent {
        /// Record type name
        rtype: String,
        /// Offending content string
        content: String,
        /// What was wrong with it
        reason: String,
    },

    /// Record type the provider does not handle (raised only on request)
    #[error("Unhandled record type: {0}")]
    UnhandledType(String),

    /// A change targets a record type outside the supported set
    #[error("Unsupported record type: {0}")]
    UnsupportedType(String),

    /// Two records with the same name and type in one zone
    #[error("Duplicate record {rtype} \"{name}\"")]
    DuplicateRecord {
        /// Relative record name
        name: String,
        /// Record type name
        rtype: String,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Backend-specific error
    #[error("Backend error ({backend}): {message}")]
    Backend {
        /// Backend name
        backend: String,
        /// Error message
        message: String,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a backend rejection
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    /// Create an invalid content error
    pub fn invalid_content(
        rtype: impl Into<String>,
        content: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidContent {
            rtype: rtype.into(),
            content: content.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a backend-specific error
    pub fn backend(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            backend: backend.into(),
            message: message.into(),
        }
    }
}
