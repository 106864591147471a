// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2025 MediaGit Contributors

//! Error types for pointer discovery and fetch orchestration

use lfsfetch_config::ConfigError;
use thiserror::Error;

/// Result type for Git operations
pub type GitResult<T> = Result<T, GitError>;

/// Error types for Git integration operations
#[derive(Debug, Error)]
pub enum GitError {
    /// Error parsing pointer file
    #[error("Failed to parse pointer file: {0}")]
    PointerParse(String),

    /// Invalid pointer file format
    #[error("Invalid pointer file format: {0}")]
    InvalidPointerFormat(String),

    /// Missing required field in pointer file
    #[error("Missing required field in pointer file: {0}")]
    MissingPointerField(String),

    /// Invalid OID format
    #[error("Invalid OID format: {0}")]
    InvalidOid(String),

    /// Glob whose translated expression the regex engine refuses
    #[error("Invalid path pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as given
        pattern: String,
        /// Compiler message
        reason: String,
    },

    /// Revision does not resolve to a tree
    #[error("Unknown revision '{0}'")]
    RevisionNotFound(String),

    /// Path is not a blob at the given revision
    #[error("Path '{path}' not found at revision '{rev}'")]
    PathNotFound {
        /// Revision searched
        rev: String,
        /// Repository-relative path
        path: String,
    },

    /// No endpoint could be derived for the remote
    #[error("No remote configured: '{0}' is not a known remote")]
    NoRemoteConfigured(String),

    /// Configuration could not be read
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Object storage failed during existence check or transfer
    #[error(transparent)]
    Transfer(anyhow::Error),

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Repository not initialized
    #[error("Repository not found at path: {0}")]
    RepositoryNotFound(String),
}

impl GitError {
    /// Check if this is a NoRemoteConfigured error
    pub fn is_no_remote(&self) -> bool {
        matches!(self, GitError::NoRemoteConfigured(_))
    }
}
