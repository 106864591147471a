// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2025 MediaGit Contributors

//! In-memory configuration source for tests and embedding.

use crate::error::{ConfigError, ConfigResult};
use crate::key::ConfigKey;
use crate::source::ConfigSource;
use std::collections::HashMap;

/// A map-backed [`ConfigSource`]
///
/// ```
/// use lfsfetch_config::{ConfigKey, ConfigSource, MemoryConfig};
///
/// let config = MemoryConfig::new().with("lfs.url", "https://lfs.example.com");
/// assert_eq!(
///     config.find(&ConfigKey::new("lfs", "url")).unwrap().as_deref(),
///     Some("https://lfs.example.com")
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryConfig {
    values: HashMap<ConfigKey, String>,
}

impl MemoryConfig {
    /// Create an empty config
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`MemoryConfig::set`]
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a dotted key. Malformed keys (no dot) are ignored.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        if let Some(key) = ConfigKey::parse(key) {
            self.values.insert(key, value.into());
        }
    }

    /// Number of keys set
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no keys are set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConfigSource for MemoryConfig {
    fn get(&self, key: &ConfigKey) -> ConfigResult<String> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_and_name_case_insensitive() {
        let config = MemoryConfig::new().with("LFS.Url", "x");
        assert_eq!(config.get(&ConfigKey::new("lfs", "URL")).unwrap(), "x");
    }

    #[test]
    fn test_subsection_case_sensitive() {
        let config = MemoryConfig::new().with("remote.Origin.lfsurl", "x");
        assert!(config
            .get(&ConfigKey::with_subsection("remote", "origin", "lfsurl"))
            .unwrap_err()
            .is_key_not_found());
    }

    #[test]
    fn test_malformed_key_ignored() {
        let mut config = MemoryConfig::new();
        config.set("nodot", "x");
        assert!(config.is_empty());
    }
}
