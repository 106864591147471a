// MediaGit - Git for Media Files
// Copyright (C) 2025 MediaGit Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.

//! Storage error types and utilities

use lfsfetch_config::ConfigError;
use std::io;
use thiserror::Error;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Object not found at the transfer source
    #[error("object not found: {0}")]
    NotFound(String),

    /// Object id that cannot name a file in the store
    #[error("invalid object id: {0}")]
    InvalidKey(String),

    /// Endpoint this store cannot transfer from
    #[error("unsupported endpoint '{0}': only local paths and file:// URLs can be fetched from")]
    UnsupportedEndpoint(String),

    /// Transferred content does not match its pointer
    #[error("object {oid} failed verification: {reason}")]
    ObjectMismatch {
        /// Object id
        oid: String,
        /// What did not match
        reason: String,
    },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Store location could not be read from configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Transparent error delegation for wrapped error types
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StorageError {
    /// Create a NotFound error with the given key
    pub fn not_found<S: Into<String>>(key: S) -> Self {
        StorageError::NotFound(key.into())
    }

    /// Create an InvalidKey error with context
    pub fn invalid_key<S: Into<String>>(msg: S) -> Self {
        StorageError::InvalidKey(msg.into())
    }

    /// Create an ObjectMismatch error
    pub fn mismatch<O: Into<String>, R: Into<String>>(oid: O, reason: R) -> Self {
        StorageError::ObjectMismatch {
            oid: oid.into(),
            reason: reason.into(),
        }
    }

    /// Create a generic error from any error type that can convert to anyhow::Error
    pub fn other<E: Into<anyhow::Error>>(error: E) -> Self {
        StorageError::Other(error.into())
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }

    /// Check if this is an UnsupportedEndpoint error
    pub fn is_unsupported_endpoint(&self) -> bool {
        matches!(self, StorageError::UnsupportedEndpoint(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = StorageError::not_found("abc");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "object not found: abc");
    }

    #[test]
    fn test_mismatch_message() {
        let err = StorageError::mismatch("abc", "expected 10 bytes, got 3");
        assert_eq!(
            err.to_string(),
            "object abc failed verification: expected 10 bytes, got 3"
        );
    }

    #[test]
    fn test_unsupported_endpoint() {
        let err = StorageError::UnsupportedEndpoint("https://example.com".into());
        assert!(err.is_unsupported_endpoint());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::other("read failed");
        let storage_err = StorageError::from(io_err);
        assert!(matches!(storage_err, StorageError::Io(_)));
    }
}
