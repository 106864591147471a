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

//! Git LFS object storage for lfsfetch
//!
//! Implementations of [`lfsfetch_git::ObjectStore`]:
//! - [`LocalStorage`]: the repository's on-disk store (`.git/lfs` by
//!   default), able to fetch from another local store
//! - [`mock::MemoryStore`]: in-memory store that records its calls
//!
//! # Features
//!
//! - **Synchronous**: fetch decisions are made one revision at a time and
//!   the store is called from the same thread
//! - **Verified writes**: objects are hashed while copied and only renamed
//!   into place once size and oid match
//! - **Progress**: transfers report a [`TransferEvent`](lfsfetch_git::TransferEvent)
//!   per object through the optional callback
//!
//! # Examples
//!
//! ```no_run
//! use lfsfetch_git::{ObjectStore, Pointer};
//! use lfsfetch_storage::LocalStorage;
//! use std::collections::HashSet;
//!
//! fn main() -> anyhow::Result<()> {
//!     let storage = LocalStorage::new(".git/lfs");
//!     let pointer = Pointer::new(
//!         "4d7a214614ab2935c943f9e0ff69d22eadbb8f32b1258daaa5e2ca24d17e2393",
//!         12345,
//!     );
//!
//!     if !storage.exists(&pointer)? {
//!         let wanted: HashSet<Pointer> = [pointer].into_iter().collect();
//!         storage.fetch("file:///srv/mirror/project.git", &wanted, None)?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod local;
pub mod mock;

pub use error::{StorageError, StorageResult};
pub use local::LocalStorage;
pub use mock::MemoryStore;
