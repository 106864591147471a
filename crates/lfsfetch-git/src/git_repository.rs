// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2025 MediaGit Contributors

//! [`Repository`] implementation backed by libgit2

use crate::attributes::{self, attribute_dirs, AttributeFile, GITATTRIBUTES};
use crate::error::{GitError, GitResult};
use crate::repository::Repository;
use git2::{Blob, ErrorCode, ObjectType, Oid, Tree, TreeWalkMode, TreeWalkResult};
use lfsfetch_config::{ConfigResult, ConfigSource, GitConfig};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

/// A git repository opened through libgit2.
///
/// Revision lookups and parsed `.gitattributes` files are cached for the
/// lifetime of the value, so one instance should serve one fetch.
pub struct GitRepository {
    repo: git2::Repository,
    root: PathBuf,
    trees: RefCell<HashMap<String, Oid>>,
    attr_files: RefCell<HashMap<(Oid, String), Option<Rc<AttributeFile>>>>,
}

impl GitRepository {
    /// Open the repository containing `path`, searching parent directories
    pub fn discover(path: &Path) -> GitResult<Self> {
        let repo = git2::Repository::discover(path).map_err(|e| {
            GitError::RepositoryNotFound(format!("{}: {}", path.display(), e.message()))
        })?;
        Ok(Self::from_git2(repo))
    }

    /// Wrap an already opened repository
    pub fn from_git2(repo: git2::Repository) -> Self {
        let root = repo
            .workdir()
            .unwrap_or_else(|| repo.path())
            .to_path_buf();
        Self {
            repo,
            root,
            trees: RefCell::new(HashMap::new()),
            attr_files: RefCell::new(HashMap::new()),
        }
    }

    /// The `.git` directory (the repository itself when bare)
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    /// The underlying libgit2 handle
    pub fn inner(&self) -> &git2::Repository {
        &self.repo
    }

    fn tree(&self, rev: &str) -> GitResult<Tree<'_>> {
        if let Some(id) = self.trees.borrow().get(rev) {
            return Ok(self.repo.find_tree(*id)?);
        }
        let tree = self
            .repo
            .revparse_single(rev)
            .and_then(|object| object.peel_to_tree())
            .map_err(|_| GitError::RevisionNotFound(rev.to_string()))?;
        self.trees.borrow_mut().insert(rev.to_string(), tree.id());
        Ok(tree)
    }

    fn attribute_file(&self, tree: &Tree<'_>, dir: &str) -> GitResult<Option<Rc<AttributeFile>>> {
        let key = (tree.id(), dir.to_string());
        if let Some(cached) = self.attr_files.borrow().get(&key) {
            return Ok(cached.clone());
        }

        let path = if dir.is_empty() {
            GITATTRIBUTES.to_string()
        } else {
            format!("{}/{}", dir, GITATTRIBUTES)
        };
        let file = match tree.get_path(Path::new(&path)) {
            Ok(entry) if entry.kind() == Some(ObjectType::Blob) => {
                let blob = entry.to_object(&self.repo)?.peel_to_blob()?;
                let content = String::from_utf8_lossy(blob.content());
                Some(Rc::new(AttributeFile::parse(dir, &content)))
            }
            Ok(_) => None,
            Err(e) if e.code() == ErrorCode::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        self.attr_files.borrow_mut().insert(key, file.clone());
        Ok(file)
    }
}

fn walk_blobs(tree: &Tree<'_>, prefix: &str) -> GitResult<Vec<String>> {
    let mut paths = Vec::new();
    tree.walk(TreeWalkMode::PreOrder, |dir, entry| {
        if entry.kind() == Some(ObjectType::Blob) {
            match entry.name() {
                Some(name) => paths.push(format!("{}{}{}", prefix, dir, name)),
                None => debug!("Skipping non UTF-8 path under {}{}", prefix, dir),
            }
        }
        TreeWalkResult::Ok
    })?;
    Ok(paths)
}

impl fmt::Debug for GitRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitRepository")
            .field("root", &self.root)
            .field("git_dir", &self.repo.path())
            .finish()
    }
}

/// Reads a blob's content in place, without copying it out of libgit2
struct BlobReader<'r> {
    blob: Blob<'r>,
    pos: usize,
}

impl<'r> BlobReader<'r> {
    fn new(blob: Blob<'r>) -> Self {
        Self { blob, pos: 0 }
    }
}

impl Read for BlobReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let rest = self.blob.content().get(self.pos..).unwrap_or_default();
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.pos += n;
        Ok(n)
    }
}

impl Repository for GitRepository {
    fn root_dir(&self) -> &Path {
        &self.root
    }

    fn config(&self, path: Option<&Path>) -> ConfigResult<Box<dyn ConfigSource + '_>> {
        let config = match path {
            None => GitConfig::open_default(&self.repo)?,
            Some(path) => GitConfig::open_file(path)?,
        };
        Ok(Box::new(config))
    }

    fn find_paths(&self, rev: &str, root: &str) -> GitResult<Vec<String>> {
        let tree = self.tree(rev)?;
        let root = root.trim_start_matches('/');
        if root.is_empty() {
            return walk_blobs(&tree, "");
        }

        let dir = root.trim_end_matches('/');
        let entry = match tree.get_path(Path::new(dir)) {
            Ok(entry) => entry,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        match entry.kind() {
            Some(ObjectType::Tree) => {
                let subtree = entry.to_object(&self.repo)?.peel_to_tree()?;
                walk_blobs(&subtree, &format!("{}/", dir))
            }
            Some(ObjectType::Blob) if !root.ends_with('/') => Ok(vec![dir.to_string()]),
            _ => Ok(Vec::new()),
        }
    }

    fn check_attr(&self, rev: &str, path: &str, name: &str) -> GitResult<Option<String>> {
        let tree = self.tree(rev)?;
        let mut files = Vec::new();
        for dir in attribute_dirs(path) {
            if let Some(file) = self.attribute_file(&tree, dir)? {
                files.push(file);
            }
        }
        let value = attributes::resolve(files.iter().map(Rc::as_ref), path, name);
        Ok(value.map(|v| v.as_str().to_string()))
    }

    fn open_raw(&self, rev: &str, path: &str) -> GitResult<Box<dyn Read + '_>> {
        let tree = self.tree(rev)?;
        let entry = tree.get_path(Path::new(path)).map_err(|_| GitError::PathNotFound {
            rev: rev.to_string(),
            path: path.to_string(),
        })?;
        let blob = entry.to_object(&self.repo)?.peel_to_blob()?;
        Ok(Box::new(BlobReader::new(blob)))
    }

    fn active_branch_remote(&self) -> GitResult<Option<String>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) => {
                debug!("No usable HEAD: {}", e.message());
                return Ok(None);
            }
        };
        let branch = match head.name() {
            Some(name) if head.is_branch() => name.to_string(),
            _ => return Ok(None),
        };
        match self.repo.branch_upstream_remote(&branch) {
            Ok(remote) => Ok(remote.as_str().map(str::to_string)),
            Err(e) => {
                debug!("Branch {} tracks no remote: {}", branch, e.message());
                Ok(None)
            }
        }
    }

    fn remote_url(&self, name: &str) -> GitResult<String> {
        let remote = self
            .repo
            .find_remote(name)
            .map_err(|_| GitError::NoRemoteConfigured(name.to_string()))?;
        remote
            .url()
            .map(str::to_string)
            .ok_or_else(|| GitError::NoRemoteConfigured(name.to_string()))
    }
}
