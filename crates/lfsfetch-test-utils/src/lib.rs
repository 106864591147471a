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
// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2025 MediaGit Contributors

//! # lfsfetch Test Utilities
//!
//! Shared test utilities for lfsfetch crates providing:
//! - CLI command helpers for testing the `lfsfetch` binary
//! - Scratch git repositories with LFS pointers and local object stores
//! - An in-memory [`Repository`](lfsfetch_git::Repository) fake
//! - LFS object fixtures

pub mod cli;
pub mod fixtures;
pub mod memory;
pub mod repo;

// Re-export commonly used items at crate root
pub use cli::{lfsfetch, LfsfetchCommand};
pub use fixtures::LfsObject;
pub use memory::MemoryRepository;
pub use repo::TestRepo;
