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

//! Configuration access for lfsfetch
//!
//! Endpoint resolution reads git-style keys from more than one place: the
//! repository's own configuration and an optional `.lfsconfig` file checked
//! into the worktree. This crate gives both the same read-only interface,
//! [`ConfigSource`], so lookups can be chained without caring where a value
//! comes from.
//!
//! Two error conditions are expected during a lookup chain and are kept
//! distinct from real failures:
//!
//! - [`ConfigError::KeyNotFound`]: the key is unset in this source
//! - [`ConfigError::FileNotFound`]: an alternate file does not exist
//!
//! # Example
//!
//! ```no_run
//! use lfsfetch_config::{ConfigKey, ConfigSource, GitConfig};
//! use std::path::Path;
//!
//! let overlay = GitConfig::open_file(Path::new(".lfsconfig"))?;
//! if let Some(url) = overlay.find(&ConfigKey::new("lfs", "url"))? {
//!     println!("lfs.url = {url}");
//! }
//! # Ok::<(), lfsfetch_config::ConfigError>(())
//! ```

pub mod error;
pub mod git;
pub mod key;
pub mod memory;
pub mod source;

pub use error::{ConfigError, ConfigResult};
pub use git::GitConfig;
pub use key::ConfigKey;
pub use memory::MemoryConfig;
pub use source::ConfigSource;
