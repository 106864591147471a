// Copyright (C) 2026  winnyboy5
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2025 MediaGit Contributors

//! # Git LFS fetch core
//!
//! Works out which Git LFS objects a set of revisions needs, and where to
//! download them from.
//!
//! ## Architecture
//!
//! - **Pointers** ([`pointer`]): parsing of the small text files committed in
//!   place of large content
//! - **Path filtering** ([`path_filter`]): include/exclude glob selection,
//!   compiled by [`wildmatch`]
//! - **Object collection** ([`collect`]): tree walk, `filter=lfs` attribute
//!   check and pointer detection for one revision
//! - **Endpoint resolution** ([`endpoint`]): layered lookup of the LFS URL
//! - **Fetch** ([`fetch()`]): ties the above together and hands the missing
//!   objects to an [`ObjectStore`]
//!
//! The repository and the object store are consumed through the
//! [`Repository`] and [`ObjectStore`] traits. [`GitRepository`] implements
//! the former on top of libgit2.
//!
//! ## Pointer File Format
//!
//! ```text
//! version https://git-lfs.github.com/spec/v1
//! oid sha256:4d7a214614ab2935c943f9e0ff69d22eadbb8f32b1258daaa5e2ca24d17e2393
//! size 12345
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use lfsfetch_git::{filter_paths, Pointer};
//!
//! let pointer = Pointer::parse(
//!     "version https://git-lfs.github.com/spec/v1\noid sha256:abc\nsize 10\n",
//! )?;
//! assert_eq!(pointer.oid(), "abc");
//! assert_eq!(pointer.size(), 10);
//!
//! let kept = filter_paths(
//!     vec!["data/a.bin".to_string(), "data/b.txt".to_string()],
//!     &["data/*"],
//!     &["*.txt"],
//! )?;
//! assert!(kept.contains("data/a.bin"));
//! assert!(!kept.contains("data/b.txt"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod attributes;
pub mod collect;
pub mod endpoint;
pub mod error;
pub mod fetch;
pub mod git_repository;
pub mod path_filter;
pub mod pointer;
pub mod repository;
pub mod wildmatch;

pub use collect::{collect_objects, ObjectCollector};
pub use endpoint::resolve_fetch_url;
pub use error::{GitError, GitResult};
pub use fetch::{fetch, missing_objects, FetchRequest, FetchSummary};
pub use git_repository::GitRepository;
pub use path_filter::{filter_paths, PathFilter};
pub use pointer::Pointer;
pub use repository::{ObjectStore, ProgressFn, Repository, TransferEvent, TransferPhase};
