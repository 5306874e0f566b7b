//! Error types for rentaldesk.
//!
//! This module defines all error types used throughout the rentaldesk crate,
//! providing detailed context for debugging and operator-facing messages.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which record collection a lookup was performed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// Cars currently out with a renter.
    Rented,
    /// Cars in the pool, including damaged ones.
    Available,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rented => write!(f, "rented"),
            Self::Available => write!(f, "available"),
        }
    }
}

/// The main error type for rentaldesk operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Lookup and State Errors ===
    /// No car with the given plate exists in the collection.
    #[error("no {collection} car with plate {plate}")]
    NotFound {
        /// The plate number that was looked up.
        plate: String,
        /// The collection that was searched.
        collection: Collection,
    },

    /// The chosen car cannot be used in its current state.
    #[error("car {plate} cannot be used as a replacement (status: {status})")]
    InvalidState {
        /// Plate number of the offending car.
        plate: String,
        /// Its current status label.
        status: String,
    },

    /// The replacement car is not of the same type as the rented car.
    #[error("car {replacement_plate} is a {replacement_type}, but {rented_plate} is a {rented_type}")]
    TypeMismatch {
        /// Plate of the rented car.
        rented_plate: String,
        /// Type of the rented car.
        rented_type: String,
        /// Plate of the proposed replacement.
        replacement_plate: String,
        /// Type of the proposed replacement.
        replacement_type: String,
    },

    /// No eligible replacement exists for the rented car.
    #[error("no replacement available for {plate}")]
    NoReplacementAvailable {
        /// Plate of the rented car.
        plate: String,
    },

    // === Storage Errors ===
    /// A data file row could not be parsed.
    #[error("{}:{line}: {message}", .path.display())]
    Parse {
        /// Path to the data file.
        path: PathBuf,
        /// One-based line number of the row.
        line: u64,
        /// What was wrong with the row.
        message: String,
    },

    /// Reading or writing delimited data failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to replace a data file with its new contents.
    #[error("failed to write {}: {source}", .path.display())]
    Persist {
        /// Path of the data file being written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {}: {source}", .path.display())]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

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

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for rentaldesk operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a lookup failure for the given collection.
    #[must_use]
    pub fn not_found(plate: impl Into<String>, collection: Collection) -> Self {
        Self::NotFound {
            plate: plate.into(),
            collection,
        }
    }

    /// Create a parse error for a data file row.
    #[must_use]
    pub fn parse(path: impl Into<PathBuf>, line: u64, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Check if this error is a failed plate lookup.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error rejects a car because of its state.
    #[must_use]
    pub fn is_invalid_state(&self) -> bool {
        matches!(
            self,
            Self::InvalidState { .. } | Self::TypeMismatch { .. } | Self::NoReplacementAvailable { .. }
        )
    }
}
