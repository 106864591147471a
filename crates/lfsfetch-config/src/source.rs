// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2025 MediaGit Contributors

//! The read-only configuration contract.

use crate::error::{ConfigError, ConfigResult};
use crate::key::ConfigKey;

/// A read-only key/value configuration source.
///
/// Implementations return [`ConfigError::KeyNotFound`] for unset keys and
/// reserve other errors for genuinely broken sources.
pub trait ConfigSource {
    /// Look up a key, failing with `KeyNotFound` when it is unset
    fn get(&self, key: &ConfigKey) -> ConfigResult<String>;

    /// Look up a key, mapping `KeyNotFound` to `Ok(None)`
    fn find(&self, key: &ConfigKey) -> ConfigResult<Option<String>> {
        match self.get(key) {
            Ok(value) => Ok(Some(value)),
            Err(ConfigError::KeyNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl<T: ConfigSource + ?Sized> ConfigSource for Box<T> {
    fn get(&self, key: &ConfigKey) -> ConfigResult<String> {
        (**self).get(key)
    }
}

impl<T: ConfigSource + ?Sized> ConfigSource for &T {
    fn get(&self, key: &ConfigKey) -> ConfigResult<String> {
        (**self).get(key)
    }
}
