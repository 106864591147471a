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

//! Shared output formatting for CLI commands.
//!
//! Results go to stdout; errors and warnings go to stderr so `--json`
//! output stays machine-readable.

use console::style;

/// Print a success message with a green check mark.
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an error message to stderr with a red cross.
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Print an informational message.
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").cyan(), msg);
}

/// Print a warning to stderr.
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("⚠").yellow(), msg);
}

/// Print an indented key-value line with the value highlighted.
///
/// ```text
///   From: https://example.com/repo.git/info/lfs
/// ```
pub fn detail(key: &str, value: &str) {
    println!("  {}: {}", key, style(value).cyan());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_functions_compile() {
        let _ = success;
        let _ = error;
        let _ = info;
        let _ = warning;
        let _ = detail;
    }
}
