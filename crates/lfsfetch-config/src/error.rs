// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2025 MediaGit Contributors

//! Error types for configuration lookup

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The key is not set in this source. Callers normally fall through to
    /// the next source instead of surfacing this.
    #[error("configuration key not found: {0}")]
    KeyNotFound(String),

    /// An alternate configuration file does not exist
    #[error("configuration file not found at path: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The key exists but its value is not valid UTF-8 or otherwise unusable
    #[error("invalid configuration value for '{key}': {reason}")]
    InvalidValue {
        /// Fully qualified key, e.g. `remote.origin.lfsurl`
        key: String,
        /// What was wrong with it
        reason: String,
    },

    /// Error from libgit2 while opening or reading a config file
    #[error("git config error: {0}")]
    Git(#[from] git2::Error),
}

impl ConfigError {
    /// Create an InvalidValue error
    pub fn invalid_value(key: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a KeyNotFound error
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, ConfigError::KeyNotFound(_))
    }

    /// Check if this is a FileNotFound error
    pub fn is_file_not_found(&self) -> bool {
        matches!(self, ConfigError::FileNotFound(_))
    }
}

/// Result alias for configuration reads
pub type ConfigResult<T> = Result<T, ConfigError>;
