// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2025 MediaGit Contributors

//! CLI command helpers for testing the lfsfetch binary.

use assert_cmd::Command;
use std::path::Path;

/// Creates a new lfsfetch Command for testing.
///
/// Logging is pinned to `warn` so a developer's `RUST_LOG` does not leak
/// into assertions on stderr.
///
/// # Example
/// ```ignore
/// use lfsfetch_test_utils::lfsfetch;
///
/// lfsfetch()
///     .arg("fetch")
///     .current_dir(repo.path())
///     .assert()
///     .success();
/// ```
#[allow(deprecated)] // cargo_bin is deprecated but still works for our use case
pub fn lfsfetch() -> Command {
    let mut cmd = Command::cargo_bin("lfsfetch").expect("lfsfetch binary not found");
    cmd.env("LFSFETCH_LOG", "warn").env_remove("RUST_LOG");
    cmd
}

/// Fluent wrapper for the common lfsfetch invocations.
pub struct LfsfetchCommand {
    cmd: Command,
}

impl LfsfetchCommand {
    /// Create a new LfsfetchCommand.
    pub fn new() -> Self {
        Self { cmd: lfsfetch() }
    }

    /// Set the working directory for the command.
    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.cmd.current_dir(dir);
        self
    }

    /// Add multiple arguments to the command.
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    /// Execute the command and assert success.
    pub fn run_success(mut self) -> assert_cmd::assert::Assert {
        self.cmd.assert().success()
    }

    /// Execute the command and assert failure.
    pub fn run_failure(mut self) -> assert_cmd::assert::Assert {
        self.cmd.assert().failure()
    }

    /// Get the underlying Command for custom assertions.
    pub fn into_inner(self) -> Command {
        self.cmd
    }

    /// `lfsfetch fetch [args]` in `dir`, asserting success.
    pub fn fetch(dir: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
        Self::new().in_dir(dir).args(&["fetch"]).args(args).run_success()
    }
}

impl Default for LfsfetchCommand {
    fn default() -> Self {
        Self::new()
    }
}
