// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2025 MediaGit Contributors

//! LFS object fixtures.

use lfsfetch_git::Pointer;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Some content together with the pointer that refers to it.
#[derive(Debug, Clone)]
pub struct LfsObject {
    content: Vec<u8>,
    pointer: Pointer,
}

impl LfsObject {
    /// Hash `content` into an object with a real SHA-256 oid.
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        let content = content.into();
        let oid = hex::encode(Sha256::digest(&content));
        let pointer = Pointer::new(oid, content.len() as u64);
        Self { content, pointer }
    }

    /// The object's content.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// The pointer referring to this object.
    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    /// Hex oid.
    pub fn oid(&self) -> &str {
        self.pointer.oid()
    }

    /// Text of the pointer file to commit in place of the content.
    pub fn pointer_text(&self) -> String {
        self.pointer.to_string()
    }

    /// Location of this object inside an LFS directory (`<lfs>/objects/aa/bb/oid`).
    pub fn path_in(&self, lfs_dir: &Path) -> PathBuf {
        let oid = self.oid();
        lfs_dir
            .join("objects")
            .join(&oid[0..2])
            .join(&oid[2..4])
            .join(oid)
    }

    /// Write the content into an LFS directory, returning its path.
    pub fn store_in(&self, lfs_dir: &Path) -> PathBuf {
        let path = self.path_in(lfs_dir);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create object directory");
        }
        fs::write(&path, &self.content).expect("Failed to write object");
        path
    }
}

/// Pointer file text for an arbitrary oid and size.
///
/// Unlike [`LfsObject`] the oid need not be a real hash.
pub fn pointer_text(oid: &str, size: u64) -> String {
    Pointer::new(oid, size).to_string()
}
