// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2025 MediaGit Contributors

//! Collaborator contracts: the repository being scanned and the local
//! large-object store.

use crate::error::GitResult;
use crate::pointer::Pointer;
use lfsfetch_config::{ConfigResult, ConfigSource};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// Revision used when the caller names none
pub const DEFAULT_REVISION: &str = "HEAD";

/// Read access to a version-controlled tree
pub trait Repository {
    /// Worktree root; `.lfsconfig` is looked up here
    fn root_dir(&self) -> &Path;

    /// Revision fetched when none is requested
    fn default_revision(&self) -> String {
        DEFAULT_REVISION.to_string()
    }

    /// Configuration: the repository's own when `path` is `None`, otherwise
    /// the file at `path` (failing with `ConfigError::FileNotFound` if it
    /// does not exist)
    fn config(&self, path: Option<&Path>) -> ConfigResult<Box<dyn ConfigSource + '_>>;

    /// Every blob path under `root` at `rev`, repository-relative with `/`
    /// separators. `root` is "" for the whole tree; a `root` naming a blob
    /// yields just that blob; a missing `root` yields nothing.
    fn find_paths(&self, rev: &str, root: &str) -> GitResult<Vec<String>>;

    /// Value of attribute `name` for `path` as committed at `rev`; `None`
    /// when unspecified
    fn check_attr(&self, rev: &str, path: &str, name: &str) -> GitResult<Option<String>>;

    /// Raw blob content at `rev`, with no filters applied
    fn open_raw(&self, rev: &str, path: &str) -> GitResult<Box<dyn Read + '_>>;

    /// Remote tracked by the checked-out branch, if any
    fn active_branch_remote(&self) -> GitResult<Option<String>>;

    /// Fetch URL registered for remote `name`; fails with
    /// `GitError::NoRemoteConfigured` when the remote is unknown
    fn remote_url(&self, name: &str) -> GitResult<String>;
}

/// Stage of a transfer reported through the progress callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferPhase {
    /// Transfer is about to start; `total` is known
    Started,
    /// One object finished
    Object,
    /// All objects transferred
    Finished,
}

/// Progress record handed to the progress callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEvent {
    /// Stage of the transfer
    pub phase: TransferPhase,
    /// Objects completed so far
    pub completed: u64,
    /// Objects in this transfer
    pub total: u64,
    /// Object the event refers to, for `Object` events
    pub oid: Option<String>,
}

impl TransferEvent {
    /// Event with no object attached
    pub fn new(phase: TransferPhase, completed: u64, total: u64) -> Self {
        Self {
            phase,
            completed,
            total,
            oid: None,
        }
    }

    /// Attach the object id
    pub fn with_oid(mut self, oid: impl Into<String>) -> Self {
        self.oid = Some(oid.into());
        self
    }
}

/// Progress callback; cancellation and retries belong to the store
pub type ProgressFn<'a> = &'a mut dyn FnMut(&TransferEvent);

/// Local large-object storage
pub trait ObjectStore {
    /// Whether the object is already stored locally
    fn exists(&self, pointer: &Pointer) -> anyhow::Result<bool>;

    /// Download `objects` from `url` into local storage
    fn fetch(
        &self,
        url: &str,
        objects: &HashSet<Pointer>,
        progress: Option<ProgressFn<'_>>,
    ) -> anyhow::Result<()>;
}

impl<T: ObjectStore + ?Sized> ObjectStore for &T {
    fn exists(&self, pointer: &Pointer) -> anyhow::Result<bool> {
        (**self).exists(pointer)
    }

    fn fetch(
        &self,
        url: &str,
        objects: &HashSet<Pointer>,
        progress: Option<ProgressFn<'_>>,
    ) -> anyhow::Result<()> {
        (**self).fetch(url, objects, progress)
    }
}
