// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2025 MediaGit Contributors

//! Fetch orchestration: collect, de-duplicate, resolve, transfer.

use crate::collect::collect_objects;
use crate::endpoint::resolve_fetch_url;
use crate::error::{GitError, GitResult};
use crate::pointer::Pointer;
use crate::repository::{ObjectStore, ProgressFn, Repository};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

/// What to fetch
#[derive(Debug, Clone, Default)]
pub struct FetchRequest {
    /// Revisions to scan; empty means the repository's default revision
    pub revisions: Vec<String>,
    /// Remote name or, failing that, a literal endpoint URL
    pub remote: Option<String>,
    /// Include globs
    pub include: Vec<String>,
    /// Exclude globs
    pub exclude: Vec<String>,
}

impl FetchRequest {
    /// Fetch the default revision from the default remote
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the revisions to scan
    pub fn with_revisions<I, S>(mut self, revisions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.revisions = revisions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the remote (or raw endpoint)
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = Some(remote.into());
        self
    }

    /// Set include globs
    pub fn with_include<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Set exclude globs
    pub fn with_exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = patterns.into_iter().map(Into::into).collect();
        self
    }
}

/// Outcome of a fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchSummary {
    /// Revisions that were scanned
    pub revisions: Vec<String>,
    /// Objects handed to the store for transfer
    pub objects: usize,
    /// Total size of those objects in bytes
    pub bytes: u64,
    /// Endpoint used; `None` when everything was already present
    pub endpoint: Option<String>,
}

/// Pointers referenced by `revisions` that `store` does not have yet.
///
/// Each distinct pointer is checked against the store once, however many
/// paths or revisions reference it.
pub fn missing_objects<R, S>(
    repo: &R,
    store: &S,
    revisions: &[String],
    include: &[String],
    exclude: &[String],
) -> GitResult<HashSet<Pointer>>
where
    R: Repository + ?Sized,
    S: ObjectStore + ?Sized,
{
    let mut seen: HashSet<Pointer> = HashSet::new();
    let mut missing: HashSet<Pointer> = HashSet::new();

    for rev in revisions {
        for pointer in collect_objects(repo, rev, include, exclude)? {
            if seen.contains(&pointer) {
                continue;
            }
            if !store.exists(&pointer).map_err(GitError::Transfer)? {
                missing.insert(pointer.clone());
            }
            seen.insert(pointer);
        }
        debug!(rev = %rev, missing = missing.len(), "Revision scanned");
    }

    Ok(missing)
}

/// Download every LFS object referenced by the requested revisions that is
/// not yet in local storage.
///
/// No endpoint is resolved and the store is not asked to transfer anything
/// when all objects are already present. When endpoint resolution finds no
/// remote and the request named one, that name is used verbatim as the URL.
pub fn fetch<R, S>(
    repo: &R,
    store: &S,
    request: &FetchRequest,
    progress: Option<ProgressFn<'_>>,
) -> GitResult<FetchSummary>
where
    R: Repository + ?Sized,
    S: ObjectStore + ?Sized,
{
    let revisions = if request.revisions.is_empty() {
        vec![repo.default_revision()]
    } else {
        request.revisions.clone()
    };

    let objects = missing_objects(repo, store, &revisions, &request.include, &request.exclude)?;
    // Sizes come from committed pointer text and may be arbitrarily large
    let bytes = objects
        .iter()
        .map(Pointer::size)
        .fold(0u64, u64::saturating_add);

    if objects.is_empty() {
        info!("All LFS objects already present");
        return Ok(FetchSummary {
            revisions,
            objects: 0,
            bytes: 0,
            endpoint: None,
        });
    }

    let remote = request.remote.as_deref();
    let url = match resolve_fetch_url(repo, remote) {
        Ok(url) => url,
        Err(GitError::NoRemoteConfigured(name)) => match remote {
            Some(raw) if !raw.is_empty() => {
                debug!(remote = %name, "Treating remote as a literal endpoint");
                raw.to_string()
            }
            _ => return Err(GitError::NoRemoteConfigured(name)),
        },
        Err(e) => return Err(e),
    };

    info!(objects = objects.len(), bytes, url = %url, "Fetching LFS objects");
    store
        .fetch(&url, &objects, progress)
        .map_err(GitError::Transfer)?;

    Ok(FetchSummary {
        revisions,
        objects: objects.len(),
        bytes,
        endpoint: Some(url),
    })
}
