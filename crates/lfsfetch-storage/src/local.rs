// MediaGit - Git for Media Files
// Copyright (C) 2025 MediaGit Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.

//! Local filesystem LFS object store
//!
//! Implements [`ObjectStore`] on the directory layout git-lfs uses:
//! - Sharded object paths so no directory grows too large
//! - Atomic writes using temp files and rename
//! - Content verification (size, and SHA-256 for full-length oids) before an
//!   object becomes visible
//!
//! # Directory Structure
//!
//! ```text
//! root/
//!   objects/
//!     ab/
//!       cd/
//!         abcd1234567890...
//! ```
//!
//! # Transfer sources
//!
//! `fetch` copies objects out of another local store. The endpoint may be a
//! `file://` URL or a plain path naming a repository worktree (its
//! `.git/lfs` is used), a bare repository (its `lfs`), or an object store
//! root. A trailing `/info/lfs` is ignored. Network endpoints are rejected
//! with [`StorageError::UnsupportedEndpoint`].

use crate::error::{StorageError, StorageResult};
use anyhow::Context;
use lfsfetch_config::{ConfigKey, ConfigSource};
use lfsfetch_git::{ObjectStore, Pointer, ProgressFn, TransferEvent, TransferPhase};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory under the git dir holding the object store
pub const LFS_DIR: &str = "lfs";

/// Directory under a store root holding the objects
pub const OBJECTS_DIR: &str = "objects";

const COPY_BUFFER_SIZE: usize = 64 * 1024;
const SHA256_HEX_LEN: usize = 64;

/// Object store on the local filesystem
#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Store rooted at `root` (the directory containing `objects/`).
    ///
    /// Nothing is created until the first object is written.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        LocalStorage { root: root.into() }
    }

    /// The store a repository uses: `lfs.storage` when set (relative paths
    /// are taken from the git directory), otherwise `<git dir>/lfs`.
    pub fn for_repository(git_dir: &Path, config: &dyn ConfigSource) -> StorageResult<Self> {
        let root = match config.find(&ConfigKey::new("lfs", "storage"))? {
            Some(dir) if !dir.is_empty() => git_dir.join(dir),
            _ => git_dir.join(LFS_DIR),
        };
        debug!(root = %root.display(), "Using local LFS storage");
        Ok(Self::new(root))
    }

    /// Get the root path for this store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the object with `oid` lives in this store
    pub fn object_path(&self, oid: &str) -> StorageResult<PathBuf> {
        object_path_in(&self.root, oid)
    }

    /// Copy one object from `source` into this store, verifying it first
    fn copy_object(&self, source: &Path, pointer: &Pointer) -> StorageResult<()> {
        let oid = pointer.oid();
        let dest = self.object_path(oid)?;
        if self.exists(pointer).map_err(StorageError::other)? {
            debug!(oid, "Object already present");
            return Ok(());
        }

        let src = object_path_in(source, oid)?;
        let mut reader = match fs::File::open(&src) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StorageError::not_found(format!(
                    "{} in {}",
                    oid,
                    source.display()
                )))
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp_path = dest.with_extension("tmp");
        let _ = fs::remove_file(&temp_path);

        let verified = write_verified(&mut reader, &temp_path, pointer);
        if verified.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        verified?;

        fs::rename(&temp_path, &dest)?;
        debug!(oid, size = pointer.size(), "Stored object");
        Ok(())
    }
}

/// Sharded path of `oid` under `root`: `root/objects/ab/cd/abcd...`, with
/// shorter oids using as many shard levels as they have characters for.
fn object_path_in(root: &Path, oid: &str) -> StorageResult<PathBuf> {
    if oid.is_empty() || !oid.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(StorageError::invalid_key(oid));
    }

    let objects = root.join(OBJECTS_DIR);
    let path = if oid.len() >= 4 {
        objects.join(&oid[0..2]).join(&oid[2..4]).join(oid)
    } else if oid.len() >= 2 {
        objects.join(&oid[0..2]).join(oid)
    } else {
        objects.join(oid)
    };
    Ok(path)
}

/// Stream `reader` into `path`, checking size and hash against `pointer`
fn write_verified(reader: &mut impl Read, path: &Path, pointer: &Pointer) -> StorageResult<()> {
    let mut file = fs::File::create(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut written: u64 = 0;

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        file.write_all(&buf[..n])?;
        written += n as u64;
    }
    file.sync_all()?;

    if written != pointer.size() {
        return Err(StorageError::mismatch(
            pointer.oid(),
            format!("expected {} bytes, got {}", pointer.size(), written),
        ));
    }
    if pointer.oid().len() == SHA256_HEX_LEN {
        let digest = hex::encode(hasher.finalize());
        if digest != pointer.oid() {
            return Err(StorageError::mismatch(
                pointer.oid(),
                format!("content hashes to {}", digest),
            ));
        }
    }
    Ok(())
}

/// Turn an endpoint URL into the root of a local object store
pub fn source_root(url: &str) -> StorageResult<PathBuf> {
    let path = if let Some(rest) = url.strip_prefix("file://") {
        rest
    } else if url.contains("://") || is_scp_like(url) {
        return Err(StorageError::UnsupportedEndpoint(url.to_string()));
    } else {
        url
    };

    let trimmed = path.trim_end_matches('/');
    let base = Path::new(trimmed.strip_suffix("/info/lfs").unwrap_or(trimmed));

    let candidates = [base.join(".git").join(LFS_DIR), base.join(LFS_DIR), base.to_path_buf()];
    candidates
        .into_iter()
        .find(|dir| dir.join(OBJECTS_DIR).is_dir())
        .ok_or_else(|| StorageError::not_found(format!("LFS object store at {}", url)))
}

/// `user@host:path` style remotes
fn is_scp_like(url: &str) -> bool {
    match url.split_once(':') {
        Some((host, _)) => host.len() > 1 && !host.contains('/'),
        None => false,
    }
}

fn report(progress: &mut Option<ProgressFn<'_>>, event: TransferEvent) {
    if let Some(callback) = progress {
        callback(&event);
    }
}

impl fmt::Debug for LocalStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalStorage")
            .field("root", &self.root)
            .finish()
    }
}

impl ObjectStore for LocalStorage {
    /// An object is present when its file exists with the pointer's size
    fn exists(&self, pointer: &Pointer) -> anyhow::Result<bool> {
        let path = self.object_path(pointer.oid())?;
        match fs::metadata(&path) {
            Ok(meta) => Ok(meta.is_file() && meta.len() == pointer.size()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn fetch(
        &self,
        url: &str,
        objects: &HashSet<Pointer>,
        mut progress: Option<ProgressFn<'_>>,
    ) -> anyhow::Result<()> {
        let source = source_root(url)?;
        info!(source = %source.display(), objects = objects.len(), "Copying LFS objects");

        let mut ordered: Vec<&Pointer> = objects.iter().collect();
        ordered.sort();
        let total = ordered.len() as u64;

        report(&mut progress, TransferEvent::new(TransferPhase::Started, 0, total));
        for (done, pointer) in ordered.into_iter().enumerate() {
            self.copy_object(&source, pointer)
                .with_context(|| format!("Failed to fetch object {}", pointer.oid()))?;
            report(
                &mut progress,
                TransferEvent::new(TransferPhase::Object, done as u64 + 1, total)
                    .with_oid(pointer.oid()),
            );
        }
        report(&mut progress, TransferEvent::new(TransferPhase::Finished, total, total));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lfsfetch_config::MemoryConfig;
    use lfsfetch_test_utils::LfsObject;
    use tempfile::TempDir;

    fn source_with(objects: &[&LfsObject]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for object in objects {
            object.store_in(&dir.path().join(".git").join(LFS_DIR));
        }
        dir
    }

    fn set_of(objects: &[&LfsObject]) -> HashSet<Pointer> {
        objects.iter().map(|o| o.pointer().clone()).collect()
    }

    #[test]
    fn test_sharding_creates_correct_path() {
        let storage = LocalStorage::new("/store");
        assert_eq!(
            storage.object_path("abcd1234").unwrap(),
            PathBuf::from("/store/objects/ab/cd/abcd1234")
        );
        assert_eq!(
            storage.object_path("abc").unwrap(),
            PathBuf::from("/store/objects/ab/abc")
        );
    }

    #[test]
    fn test_object_path_rejects_traversal() {
        let storage = LocalStorage::new("/store");
        assert!(storage.object_path("../etc").is_err());
        assert!(storage.object_path("").is_err());
    }

    #[test]
    fn test_for_repository_default_and_override() {
        let git_dir = Path::new("/work/.git");
        let storage = LocalStorage::for_repository(git_dir, &MemoryConfig::new()).unwrap();
        assert_eq!(storage.root(), Path::new("/work/.git/lfs"));

        let config = MemoryConfig::new().with("lfs.storage", "/mnt/lfs");
        let storage = LocalStorage::for_repository(git_dir, &config).unwrap();
        assert_eq!(storage.root(), Path::new("/mnt/lfs"));

        let config = MemoryConfig::new().with("lfs.storage", "big");
        let storage = LocalStorage::for_repository(git_dir, &config).unwrap();
        assert_eq!(storage.root(), Path::new("/work/.git/big"));
    }

    #[test]
    fn test_exists_requires_matching_size() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        let object = LfsObject::new("hello");
        assert!(!storage.exists(object.pointer()).unwrap());

        object.store_in(dir.path());
        assert!(storage.exists(object.pointer()).unwrap());

        let wrong_size = Pointer::new(object.oid(), 99);
        assert!(!storage.exists(&wrong_size).unwrap());
    }

    #[test]
    fn test_fetch_copies_and_reports_progress() {
        let a = LfsObject::new("first object");
        let b = LfsObject::new("second object");
        let source = source_with(&[&a, &b]);
        let dest = TempDir::new().unwrap();
        let storage = LocalStorage::new(dest.path());

        let mut events = Vec::new();
        let mut record = |event: &TransferEvent| events.push(event.clone());
        storage
            .fetch(
                source.path().to_str().unwrap(),
                &set_of(&[&a, &b]),
                Some(&mut record),
            )
            .unwrap();

        assert_eq!(fs::read(a.path_in(dest.path())).unwrap(), a.content());
        assert_eq!(fs::read(b.path_in(dest.path())).unwrap(), b.content());

        let phases: Vec<TransferPhase> = events.iter().map(|e| e.phase).collect();
        assert_eq!(
            phases,
            vec![
                TransferPhase::Started,
                TransferPhase::Object,
                TransferPhase::Object,
                TransferPhase::Finished
            ]
        );
        assert_eq!(events.last().unwrap().completed, 2);
    }

    #[test]
    fn test_fetch_from_file_url_and_bare_layout() {
        let object = LfsObject::new("bare");
        let source = TempDir::new().unwrap();
        object.store_in(&source.path().join(LFS_DIR));
        let dest = TempDir::new().unwrap();
        let storage = LocalStorage::new(dest.path());

        let url = format!("file://{}/info/lfs", source.path().display());
        storage.fetch(&url, &set_of(&[&object]), None).unwrap();
        assert!(storage.exists(object.pointer()).unwrap());
    }

    #[test]
    fn test_fetch_rejects_corrupt_object() {
        let object = LfsObject::new("genuine content");
        let source = TempDir::new().unwrap();
        let lfs = source.path().join(".git").join(LFS_DIR);
        let path = object.path_in(&lfs);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        // Same length, different bytes
        fs::write(&path, "GENUINE CONTENT").unwrap();

        let dest = TempDir::new().unwrap();
        let storage = LocalStorage::new(dest.path());
        let err = storage
            .fetch(source.path().to_str().unwrap(), &set_of(&[&object]), None)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("failed verification"));
        assert!(!object.path_in(dest.path()).exists());
        assert!(!object.path_in(dest.path()).with_extension("tmp").exists());
    }

    #[test]
    fn test_fetch_missing_source_object() {
        let present = LfsObject::new("present");
        let missing = LfsObject::new("missing");
        let source = source_with(&[&present]);
        let dest = TempDir::new().unwrap();
        let storage = LocalStorage::new(dest.path());

        let err = storage
            .fetch(source.path().to_str().unwrap(), &set_of(&[&missing]), None)
            .unwrap_err();
        let storage_err = err.root_cause().downcast_ref::<StorageError>();
        assert!(storage_err.is_some_and(StorageError::is_not_found));
    }

    #[test]
    fn test_network_endpoints_unsupported() {
        for url in [
            "https://example.com/repo.git/info/lfs",
            "ssh://git@example.com/repo.git",
            "git@example.com:repo.git",
        ] {
            let err = source_root(url).unwrap_err();
            assert!(err.is_unsupported_endpoint(), "{}", url);
        }
    }

    #[test]
    fn test_source_root_without_store() {
        let dir = TempDir::new().unwrap();
        let err = source_root(dir.path().to_str().unwrap()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_debug_impl() {
        let storage = LocalStorage::new("/store");
        assert!(format!("{:?}", storage).contains("/store"));
    }
}
