// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2025 MediaGit Contributors

//! In-memory [`Repository`] fake.
//!
//! Trees are flat maps of path to content per revision. Attributes are set
//! per (revision, path) rather than derived from `.gitattributes`, so tests
//! state exactly which paths are LFS-managed. Calls that matter to the fetch
//! contract are counted.

use lfsfetch_config::{ConfigError, ConfigResult, ConfigSource, MemoryConfig};
use lfsfetch_git::collect::{FILTER_ATTR, LFS_FILTER};
use lfsfetch_git::endpoint::LFSCONFIG;
use lfsfetch_git::{GitError, GitResult, Repository};
use std::cell::Cell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

/// Counters of collaborator calls made against a [`MemoryRepository`].
#[derive(Debug, Default)]
pub struct CallCounts {
    /// `config(..)` calls, primary and overlay
    pub config: Cell<usize>,
    /// `remote_url(..)` calls
    pub remote_url: Cell<usize>,
    /// `active_branch_remote()` calls
    pub branch_remote: Cell<usize>,
    /// `open_raw(..)` calls
    pub open_raw: Cell<usize>,
}

impl CallCounts {
    /// Calls that take part in endpoint resolution
    pub fn resolution_calls(&self) -> usize {
        self.config.get() + self.remote_url.get() + self.branch_remote.get()
    }
}

fn bump(counter: &Cell<usize>) {
    counter.set(counter.get() + 1);
}

/// A repository that lives entirely in memory.
///
/// ```
/// use lfsfetch_git::Repository;
/// use lfsfetch_test_utils::MemoryRepository;
///
/// let repo = MemoryRepository::new()
///     .with_file("HEAD", "readme.md", "hello")
///     .with_remote("origin", "https://example.com/repo.git");
/// assert_eq!(repo.find_paths("HEAD", "").unwrap(), vec!["readme.md".to_string()]);
/// ```
#[derive(Debug)]
pub struct MemoryRepository {
    root: PathBuf,
    default_revision: String,
    trees: HashMap<String, BTreeMap<String, Vec<u8>>>,
    attributes: HashMap<(String, String, String), String>,
    unreadable: HashSet<String>,
    config: MemoryConfig,
    overlay: Option<MemoryConfig>,
    branch_remote: Option<String>,
    remotes: HashMap<String, String>,
    calls: CallCounts,
}

impl MemoryRepository {
    /// An empty repository rooted at `/repo`
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/repo"),
            default_revision: "HEAD".to_string(),
            trees: HashMap::new(),
            attributes: HashMap::new(),
            unreadable: HashSet::new(),
            config: MemoryConfig::new(),
            overlay: None,
            branch_remote: None,
            remotes: HashMap::new(),
            calls: CallCounts::default(),
        }
    }

    /// Override the default revision
    pub fn with_default_revision(mut self, rev: &str) -> Self {
        self.default_revision = rev.to_string();
        self
    }

    /// Add a plain file to `rev`, creating the revision if needed
    pub fn with_file(mut self, rev: &str, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.trees
            .entry(rev.to_string())
            .or_default()
            .insert(path.to_string(), content.into());
        self
    }

    /// Add a file to `rev` and mark it `filter=lfs`
    pub fn with_lfs_file(self, rev: &str, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.with_file(rev, path, content)
            .with_attr(rev, path, FILTER_ATTR, LFS_FILTER)
    }

    /// Set an attribute value for a path at `rev`
    pub fn with_attr(mut self, rev: &str, path: &str, name: &str, value: &str) -> Self {
        self.attributes.insert(
            (rev.to_string(), path.to_string(), name.to_string()),
            value.to_string(),
        );
        self
    }

    /// Make `open_raw` fail for `path` at every revision
    pub fn with_unreadable(mut self, path: &str) -> Self {
        self.unreadable.insert(path.to_string());
        self
    }

    /// Set a key in the repository configuration
    pub fn with_config(mut self, key: &str, value: &str) -> Self {
        self.config.set(key, value);
        self
    }

    /// Set a key in the `.lfsconfig` overlay, creating it if needed
    pub fn with_overlay(mut self, key: &str, value: &str) -> Self {
        self.overlay.get_or_insert_with(MemoryConfig::new).set(key, value);
        self
    }

    /// Remote tracked by the current branch
    pub fn with_branch_remote(mut self, remote: &str) -> Self {
        self.branch_remote = Some(remote.to_string());
        self
    }

    /// Register a remote and its fetch URL
    pub fn with_remote(mut self, name: &str, url: &str) -> Self {
        self.remotes.insert(name.to_string(), url.to_string());
        self
    }

    /// Collaborator call counters
    pub fn calls(&self) -> &CallCounts {
        &self.calls
    }

    fn tree(&self, rev: &str) -> GitResult<&BTreeMap<String, Vec<u8>>> {
        self.trees
            .get(rev)
            .ok_or_else(|| GitError::RevisionNotFound(rev.to_string()))
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MemoryRepository {
    fn root_dir(&self) -> &Path {
        &self.root
    }

    fn default_revision(&self) -> String {
        self.default_revision.clone()
    }

    fn config(&self, path: Option<&Path>) -> ConfigResult<Box<dyn ConfigSource + '_>> {
        bump(&self.calls.config);
        match path {
            None => Ok(Box::new(&self.config)),
            Some(path) if path == self.root.join(LFSCONFIG) => match &self.overlay {
                Some(overlay) => Ok(Box::new(overlay)),
                None => Err(ConfigError::FileNotFound(path.to_path_buf())),
            },
            Some(path) => Err(ConfigError::FileNotFound(path.to_path_buf())),
        }
    }

    fn find_paths(&self, rev: &str, root: &str) -> GitResult<Vec<String>> {
        let tree = self.tree(rev)?;
        let root = root.trim_start_matches('/');
        if root.is_empty() {
            return Ok(tree.keys().cloned().collect());
        }
        let dir = format!("{}/", root.trim_end_matches('/'));
        let mut found: Vec<String> = tree
            .keys()
            .filter(|path| path.starts_with(&dir))
            .cloned()
            .collect();
        if !root.ends_with('/') && tree.contains_key(root) {
            found.push(root.to_string());
        }
        Ok(found)
    }

    fn check_attr(&self, rev: &str, path: &str, name: &str) -> GitResult<Option<String>> {
        self.tree(rev)?;
        Ok(self
            .attributes
            .get(&(rev.to_string(), path.to_string(), name.to_string()))
            .cloned())
    }

    fn open_raw(&self, rev: &str, path: &str) -> GitResult<Box<dyn Read + '_>> {
        bump(&self.calls.open_raw);
        if self.unreadable.contains(path) {
            return Err(GitError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("cannot read {}", path),
            )));
        }
        let content = self
            .tree(rev)?
            .get(path)
            .ok_or_else(|| GitError::PathNotFound {
                rev: rev.to_string(),
                path: path.to_string(),
            })?;
        Ok(Box::new(Cursor::new(content.as_slice())))
    }

    fn active_branch_remote(&self) -> GitResult<Option<String>> {
        bump(&self.calls.branch_remote);
        Ok(self.branch_remote.clone())
    }

    fn remote_url(&self, name: &str) -> GitResult<String> {
        bump(&self.calls.remote_url);
        self.remotes
            .get(name)
            .cloned()
            .ok_or_else(|| GitError::NoRemoteConfigured(name.to_string()))
    }
}
