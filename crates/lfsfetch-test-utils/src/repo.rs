// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2025 MediaGit Contributors

//! Scratch git repository for integration tests.
//!
//! Everything is done through libgit2 so tests do not depend on a `git`
//! executable or the developer's global configuration.

use crate::fixtures::LfsObject;
use git2::{IndexAddOption, Oid, Repository, Signature};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A git repository in a temporary directory, removed on drop.
///
/// # Example
/// ```ignore
/// use lfsfetch_test_utils::{LfsObject, TestRepo};
///
/// let repo = TestRepo::new();
/// let object = LfsObject::new("payload");
/// repo.write_file(".gitattributes", "*.bin filter=lfs\n");
/// repo.write_file("data/a.bin", object.pointer_text());
/// repo.commit_all("Add data");
/// ```
pub struct TestRepo {
    repo: Repository,
    temp_dir: TempDir,
}

impl TestRepo {
    /// Initialise an empty repository with `main` as the initial branch.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut opts = git2::RepositoryInitOptions::new();
        opts.initial_head("main");
        let repo = Repository::init_opts(temp_dir.path(), &opts)
            .expect("Failed to initialise repository");
        Self { repo, temp_dir }
    }

    /// Worktree root.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The `.git` directory.
    pub fn git_dir(&self) -> PathBuf {
        self.repo.path().to_path_buf()
    }

    /// Default local object store, `.git/lfs`.
    pub fn lfs_dir(&self) -> PathBuf {
        self.git_dir().join("lfs")
    }

    /// The libgit2 handle.
    pub fn inner(&self) -> &Repository {
        &self.repo
    }

    /// Write a worktree file, creating parent directories.
    pub fn write_file(&self, name: &str, content: impl AsRef<[u8]>) {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
    }

    /// Delete a worktree file.
    pub fn delete_file(&self, name: &str) {
        fs::remove_file(self.path().join(name)).expect("Failed to delete file");
    }

    /// Commit the pointer for `object` at `name` (the caller sets up
    /// `.gitattributes`).
    pub fn write_pointer(&self, name: &str, object: &LfsObject) {
        self.write_file(name, object.pointer_text());
    }

    /// Stage every change in the worktree and commit it on the current branch.
    pub fn commit_all(&self, message: &str) -> Oid {
        let mut index = self.repo.index().expect("Failed to open index");
        index
            .add_all(["*"], IndexAddOption::DEFAULT, None)
            .expect("Failed to stage files");
        index
            .update_all(["*"], None)
            .expect("Failed to stage deletions");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let sig = Signature::now("Test User", "test@example.com").expect("Invalid signature");
        let parent = self
            .repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to commit")
    }

    /// Create a lightweight tag at HEAD.
    pub fn tag(&self, name: &str) {
        let head = self
            .repo
            .head()
            .and_then(|head| head.peel(git2::ObjectType::Commit))
            .expect("No commit to tag");
        self.repo
            .tag_lightweight(name, &head, false)
            .expect("Failed to create tag");
    }

    /// Set a key in the repository's local configuration.
    pub fn set_config(&self, key: &str, value: &str) {
        self.repo
            .config()
            .and_then(|config| config.open_level(git2::ConfigLevel::Local))
            .and_then(|mut local| local.set_str(key, value))
            .expect("Failed to set config");
    }

    /// Register a remote with a fetch URL.
    pub fn add_remote(&self, name: &str, url: &str) {
        self.repo.remote(name, url).expect("Failed to add remote");
    }

    /// Make the current branch track `remote`.
    pub fn set_upstream_remote(&self, remote: &str) {
        let head = self.repo.head().expect("No HEAD");
        let branch = head.shorthand().expect("Non UTF-8 branch name").to_string();
        self.set_config(&format!("branch.{}.remote", branch), remote);
        self.set_config(
            &format!("branch.{}.merge", branch),
            &format!("refs/heads/{}", branch),
        );
    }

    /// Put `object` into this repository's local object store.
    pub fn store_object(&self, object: &LfsObject) -> PathBuf {
        object.store_in(&self.lfs_dir())
    }
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}
