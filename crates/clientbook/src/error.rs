//! Error types for clientbook.
//!
//! This module defines all error types used throughout the clientbook crate.
//! Validation and not-found failures are recoverable and leave the store
//! exactly as it was; the remaining variants describe the environment
//! (database, configuration, file system). Suggestion fetch failures never
//! reach this type: they are carried as
//! [`FetchError`](crate::suggestions::FetchError) into the view.

use std::path::PathBuf;
use thiserror::Error;

use crate::client::ClientId;
use crate::validate::ValidationErrors;

/// The main error type for clientbook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Record Errors ===
    /// A candidate record failed validation.
    #[error("invalid client: {0}")]
    Validation(#[from] ValidationErrors),

    /// No record has the given id.
    #[error("no client with id {id}")]
    NotFound {
        /// The id that was looked up.
        id: ClientId,
    },

    /// A sequence handed to `save` uses the same id twice.
    #[error("duplicate client id {id}")]
    DuplicateId {
        /// The repeated id.
        id: ClientId,
    },

    /// Every client id has been handed out.
    #[error("no client ids left to assign")]
    IdSpaceExhausted,

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === File System Errors ===
    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// Stored records could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for clientbook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a not-found error for the given id.
    #[must_use]
    pub fn not_found(id: &ClientId) -> Self {
        Self::NotFound { id: id.clone() }
    }

    /// Check if this error is a validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error means the referenced record does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The validation details, if this is a validation failure.
    #[must_use]
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
