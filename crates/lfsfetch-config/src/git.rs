// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2025 MediaGit Contributors

//! Configuration backed by libgit2.
//!
//! Two flavours are needed: the repository's merged configuration (system,
//! global, local) and a standalone file in git-config syntax such as
//! `.lfsconfig`. Both are read through a snapshot so a lookup chain sees one
//! consistent view.

use crate::error::{ConfigError, ConfigResult};
use crate::key::ConfigKey;
use crate::source::ConfigSource;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A git configuration snapshot
pub struct GitConfig {
    config: git2::Config,
    origin: Option<PathBuf>,
}

impl GitConfig {
    /// The repository's merged configuration
    pub fn open_default(repo: &git2::Repository) -> ConfigResult<Self> {
        let mut live = repo.config()?;
        Ok(Self {
            config: live.snapshot()?,
            origin: None,
        })
    }

    /// A single configuration file.
    ///
    /// Fails with [`ConfigError::FileNotFound`] when `path` does not exist;
    /// libgit2 would otherwise hand back an empty config and hide the
    /// difference.
    pub fn open_file(path: &Path) -> ConfigResult<Self> {
        if !path.is_file() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        debug!("Opening configuration file: {}", path.display());

        let mut live = git2::Config::open(path)?;
        Ok(Self {
            config: live.snapshot()?,
            origin: Some(path.to_path_buf()),
        })
    }

    /// The file this config was opened from, `None` for the repository config
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }
}

impl fmt::Debug for GitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitConfig")
            .field("origin", &self.origin)
            .finish()
    }
}

impl ConfigSource for GitConfig {
    fn get(&self, key: &ConfigKey) -> ConfigResult<String> {
        let name = key.to_string();
        match self.config.get_entry(&name) {
            Ok(entry) => entry
                .value()
                .map(str::to_string)
                .ok_or_else(|| ConfigError::invalid_value(&name, "value is not valid UTF-8")),
            // A key libgit2 rejects as malformed cannot be set either
            Err(e) if matches!(e.code(), git2::ErrorCode::NotFound | git2::ErrorCode::InvalidSpec) => {
                Err(ConfigError::KeyNotFound(name))
            }
            Err(e) => Err(e.into()),
        }
    }
}
