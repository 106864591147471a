// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2025 MediaGit Contributors

//! LFS endpoint resolution.
//!
//! The fetch URL is the first value found in this order:
//!
//! | step | source |
//! |------|--------|
//! | 1 | `lfs.url` in the repository config |
//! | 2 | `lfs.url` in `.lfsconfig` |
//! | 3 | pick a remote: the caller's, else the branch's upstream remote, else `remote.lfsdefault`, else `origin` |
//! | 4 | `remote.<name>.lfsurl` in the repository config |
//! | 5 | `remote.<name>.lfsurl` in `.lfsconfig` |
//! | 6 | the remote's own fetch URL |
//!
//! A missing `.lfsconfig` is the same as an empty one.

use crate::error::GitResult;
use crate::repository::Repository;
use lfsfetch_config::{ConfigError, ConfigKey, ConfigSource};
use tracing::debug;

/// Name of the checked-in overlay configuration file
pub const LFSCONFIG: &str = ".lfsconfig";

/// Remote used when nothing else names one
pub const DEFAULT_REMOTE: &str = "origin";

/// Resolve the URL to fetch LFS objects from.
///
/// `remote` names the remote explicitly; when `None` the current branch's
/// upstream, `remote.lfsdefault`, then `origin` are tried. Fails with
/// `GitError::NoRemoteConfigured` when no configuration supplies a URL and
/// the chosen remote does not exist.
pub fn resolve_fetch_url<R>(repo: &R, remote: Option<&str>) -> GitResult<String>
where
    R: Repository + ?Sized,
{
    let config = repo.config(None)?;
    let overlay_path = repo.root_dir().join(LFSCONFIG);
    let overlay = match repo.config(Some(&overlay_path)) {
        Ok(overlay) => Some(overlay),
        Err(ConfigError::FileNotFound(_)) => None,
        Err(e) => return Err(e.into()),
    };

    let lfs_url = ConfigKey::new("lfs", "url");
    if let Some(url) = lookup(&*config, overlay.as_deref(), &lfs_url)? {
        debug!(url = %url, "Using lfs.url");
        return Ok(url);
    }

    let remote = match remote.filter(|name| !name.is_empty()) {
        Some(name) => name.to_string(),
        None => default_remote(repo, &*config)?,
    };

    let remote_lfsurl = ConfigKey::with_subsection("remote", &remote, "lfsurl");
    if let Some(url) = lookup(&*config, overlay.as_deref(), &remote_lfsurl)? {
        debug!(url = %url, remote = %remote, "Using remote lfsurl");
        return Ok(url);
    }

    let url = repo.remote_url(&remote)?;
    debug!(url = %url, remote = %remote, "Using remote fetch URL");
    Ok(url)
}

/// Primary config first, then the overlay if present
fn lookup(
    config: &dyn ConfigSource,
    overlay: Option<&(dyn ConfigSource + '_)>,
    key: &ConfigKey,
) -> GitResult<Option<String>> {
    if let Some(value) = config.find(key)? {
        return Ok(Some(value));
    }
    match overlay {
        Some(overlay) => Ok(overlay.find(key)?),
        None => Ok(None),
    }
}

fn default_remote<R>(repo: &R, config: &dyn ConfigSource) -> GitResult<String>
where
    R: Repository + ?Sized,
{
    if let Some(remote) = repo.active_branch_remote()? {
        return Ok(remote);
    }
    let lfsdefault = ConfigKey::new("remote", "lfsdefault");
    Ok(config
        .find(&lfsdefault)?
        .unwrap_or_else(|| DEFAULT_REMOTE.to_string()))
}
