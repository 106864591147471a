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

//! Git LFS pointer files
//!
//! A pointer file is the small text blob committed in place of a large
//! object:
//!
//! ```text
//! version https://git-lfs.github.com/spec/v1
//! oid sha256:4d7a214614ab2935c943f9e0ff69d22eadbb8f32b1258daaa5e2ca24d17e2393
//! size 12345
//! ```
//!
//! Pointers written by pre-1.0 clients carry the legacy
//! `https://hawser.github.com/spec/v1` version URL and are accepted too.

use crate::error::{GitError, GitResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;

/// Current pointer specification version
pub const LFS_VERSION: &str = "https://git-lfs.github.com/spec/v1";

/// Version URL used by legacy clients
pub const LEGACY_LFS_VERSION: &str = "https://hawser.github.com/spec/v1";

/// First line of every recognised pointer file
pub const HEADERS: [&[u8]; 2] = [
    b"version https://git-lfs.github.com/spec/v1\n",
    b"version https://hawser.github.com/spec/v1\n",
];

/// Number of leading bytes inspected before attempting a full parse
pub const HEADER_PEEK_SIZE: usize = 100;

/// Maximum size of a pointer file; anything larger is real content
pub const MAX_POINTER_SIZE: usize = 1024;

const OID_PREFIX: &str = "sha256:";

/// A large-object reference parsed from a pointer file.
///
/// Identity is the `(oid, size)` pair: two pointers read from different
/// paths or revisions compare and hash equal when they name the same
/// content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pointer {
    oid: String,
    size: u64,
}

impl Pointer {
    /// Creates a pointer from a hex object id (without `sha256:`) and size
    ///
    /// # Example
    ///
    /// ```rust
    /// use lfsfetch_git::Pointer;
    ///
    /// let pointer = Pointer::new(
    ///     "4d7a214614ab2935c943f9e0ff69d22eadbb8f32b1258daaa5e2ca24d17e2393",
    ///     12345,
    /// );
    /// assert_eq!(pointer.size(), 12345);
    /// ```
    pub fn new(oid: impl Into<String>, size: u64) -> Self {
        Self {
            oid: oid.into(),
            size,
        }
    }

    /// Hex object id, without the `sha256:` prefix
    pub fn oid(&self) -> &str {
        &self.oid
    }

    /// Size of the referenced content in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the OID with sha256 prefix
    pub fn oid_with_prefix(&self) -> String {
        format!("{}{}", OID_PREFIX, self.oid)
    }

    /// Cheap rejection test on the first bytes of a blob.
    ///
    /// ```rust
    /// use lfsfetch_git::Pointer;
    ///
    /// assert!(Pointer::has_header(b"version https://git-lfs.github.com/spec/v1\noid"));
    /// assert!(!Pointer::has_header(b"\x89PNG\r\n"));
    /// ```
    pub fn has_header(prefix: &[u8]) -> bool {
        HEADERS.iter().any(|header| prefix.starts_with(header))
    }

    /// Reads and parses a pointer from `reader`.
    ///
    /// At most [`MAX_POINTER_SIZE`] + 1 bytes are consumed; larger input is
    /// rejected without reading the rest.
    pub fn load<R: Read>(reader: R) -> GitResult<Self> {
        let mut buf = Vec::with_capacity(256);
        reader
            .take(MAX_POINTER_SIZE as u64 + 1)
            .read_to_end(&mut buf)?;
        if buf.len() > MAX_POINTER_SIZE {
            return Err(GitError::InvalidPointerFormat(
                "Pointer file too large".to_string(),
            ));
        }
        let text = std::str::from_utf8(&buf)
            .map_err(|e| GitError::InvalidPointerFormat(format!("not UTF-8: {}", e)))?;
        Self::parse(text)
    }

    /// Parses a pointer file from its text representation
    ///
    /// # Errors
    ///
    /// - `InvalidPointerFormat` when the first line is not a known version
    /// - `MissingPointerField` when `oid` or `size` is absent
    /// - `InvalidOid` for a non-`sha256` or non-hex object id
    /// - `PointerParse` for malformed lines, bad sizes, duplicate or unknown keys
    pub fn parse(content: &str) -> GitResult<Self> {
        if content.len() > MAX_POINTER_SIZE {
            return Err(GitError::InvalidPointerFormat(
                "Pointer file too large".to_string(),
            ));
        }

        let mut lines = content.lines().map(str::trim).filter(|l| !l.is_empty());

        match lines.next().and_then(|line| line.strip_prefix("version ")) {
            Some(version) if version == LFS_VERSION || version == LEGACY_LFS_VERSION => {}
            Some(version) => {
                return Err(GitError::InvalidPointerFormat(format!(
                    "Unsupported version: {}",
                    version
                )))
            }
            None => {
                return Err(GitError::InvalidPointerFormat(
                    "First line must declare the pointer version".to_string(),
                ))
            }
        }

        let mut oid: Option<String> = None;
        let mut size: Option<u64> = None;

        for line in lines {
            let (key, value) = line.split_once(' ').ok_or_else(|| {
                GitError::PointerParse(format!("Invalid line format: {}", line))
            })?;

            match key {
                "oid" => {
                    if oid.is_some() {
                        return Err(GitError::PointerParse("Duplicate oid".to_string()));
                    }
                    oid = Some(parse_oid(value)?);
                }
                "size" => {
                    if size.is_some() {
                        return Err(GitError::PointerParse("Duplicate size".to_string()));
                    }
                    size = Some(value.parse::<u64>().map_err(|e| {
                        GitError::PointerParse(format!("Invalid size value: {}", e))
                    })?);
                }
                // Extension records (ext-0-foo sha256:...) do not affect identity.
                k if k.starts_with("ext-") => {}
                _ => {
                    return Err(GitError::PointerParse(format!("Unknown field: {}", key)));
                }
            }
        }

        let oid = oid.ok_or_else(|| GitError::MissingPointerField("oid".to_string()))?;
        let size = size.ok_or_else(|| GitError::MissingPointerField("size".to_string()))?;

        Ok(Self { oid, size })
    }
}

fn parse_oid(value: &str) -> GitResult<String> {
    let (algo, hash) = value.split_once(':').ok_or_else(|| {
        GitError::InvalidOid(format!(
            "OID must be in format 'sha256:hash', got: {}",
            value
        ))
    })?;
    if algo != "sha256" {
        return Err(GitError::InvalidOid(format!(
            "Only sha256 hashing is supported, got: {}",
            algo
        )));
    }
    if hash.is_empty() || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(GitError::InvalidOid(format!("Invalid hash: {}", hash)));
    }
    Ok(hash.to_ascii_lowercase())
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "version {}\noid {}\nsize {}\n",
            LFS_VERSION,
            self.oid_with_prefix(),
            self.size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const VALID_OID: &str = "4d7a214614ab2935c943f9e0ff69d22eadbb8f32b1258daaa5e2ca24d17e2393";

    fn pointer_text(oid: &str, size: &str) -> String {
        format!("version {}\noid sha256:{}\nsize {}\n", LFS_VERSION, oid, size)
    }

    #[test]
    fn test_parse_valid_pointer() {
        let pointer = Pointer::parse(&pointer_text(VALID_OID, "12345")).unwrap();
        assert_eq!(pointer.oid(), VALID_OID);
        assert_eq!(pointer.size(), 12345);
    }

    #[test]
    fn test_parse_legacy_version() {
        let content = format!(
            "version {}\noid sha256:{}\nsize 7\n",
            LEGACY_LFS_VERSION, VALID_OID
        );
        assert_eq!(Pointer::parse(&content).unwrap().size(), 7);
    }

    #[test]
    fn test_parse_short_hex_oid() {
        let pointer = Pointer::parse(&pointer_text("ABC", "10")).unwrap();
        assert_eq!(pointer, Pointer::new("abc", 10));
    }

    #[test]
    fn test_parse_ignores_extensions() {
        let content = format!(
            "version {}\next-0-foo sha256:{}\noid sha256:{}\nsize 1\n",
            LFS_VERSION, VALID_OID, VALID_OID
        );
        assert!(Pointer::parse(&content).is_ok());
    }

    #[test]
    fn test_parse_version_must_come_first() {
        let content = format!("oid sha256:{}\nversion {}\nsize 1\n", VALID_OID, LFS_VERSION);
        assert!(matches!(
            Pointer::parse(&content),
            Err(GitError::InvalidPointerFormat(_))
        ));
    }

    #[test]
    fn test_parse_unknown_version() {
        let content = format!("version https://example.com/spec/v1\noid sha256:{}\nsize 1\n", VALID_OID);
        assert!(matches!(
            Pointer::parse(&content),
            Err(GitError::InvalidPointerFormat(_))
        ));
    }

    #[test]
    fn test_parse_missing_fields() {
        let no_oid = format!("version {}\nsize 1\n", LFS_VERSION);
        assert!(matches!(
            Pointer::parse(&no_oid),
            Err(GitError::MissingPointerField(_))
        ));
        let no_size = format!("version {}\noid sha256:{}\n", LFS_VERSION, VALID_OID);
        assert!(matches!(
            Pointer::parse(&no_size),
            Err(GitError::MissingPointerField(_))
        ));
    }

    #[test]
    fn test_parse_invalid_oid() {
        let content = format!("version {}\noid md5:abc\nsize 1\n", LFS_VERSION);
        assert!(matches!(Pointer::parse(&content), Err(GitError::InvalidOid(_))));
        assert!(matches!(
            Pointer::parse(&pointer_text("nothex", "1")),
            Err(GitError::InvalidOid(_))
        ));
    }

    #[test]
    fn test_parse_invalid_size() {
        assert!(matches!(
            Pointer::parse(&pointer_text(VALID_OID, "-1")),
            Err(GitError::PointerParse(_))
        ));
    }

    #[test]
    fn test_parse_duplicate_and_unknown_keys() {
        let dup = format!("{}size 2\n", pointer_text(VALID_OID, "1"));
        assert!(matches!(Pointer::parse(&dup), Err(GitError::PointerParse(_))));
        let unknown = format!("{}colour blue\n", pointer_text(VALID_OID, "1"));
        assert!(matches!(Pointer::parse(&unknown), Err(GitError::PointerParse(_))));
    }

    #[test]
    fn test_load_rejects_oversized_input() {
        let mut content = pointer_text(VALID_OID, "1").into_bytes();
        content.extend(std::iter::repeat(b'x').take(MAX_POINTER_SIZE));
        assert!(matches!(
            Pointer::load(content.as_slice()),
            Err(GitError::InvalidPointerFormat(_))
        ));
    }

    #[test]
    fn test_load_rejects_non_utf8() {
        let mut content = HEADERS[0].to_vec();
        content.extend_from_slice(&[0xff, 0xfe]);
        assert!(Pointer::load(content.as_slice()).is_err());
    }

    #[test]
    fn test_has_header() {
        assert!(Pointer::has_header(pointer_text(VALID_OID, "1").as_bytes()));
        assert!(Pointer::has_header(HEADERS[1]));
        assert!(!Pointer::has_header(b"version https://git-lfs.github.com/spec/v1"));
        assert!(!Pointer::has_header(b"plain text"));
    }

    #[test]
    fn test_display_parses_back() {
        let pointer = Pointer::new(VALID_OID, 42);
        let text = pointer.to_string();
        assert!(text.starts_with("version https://git-lfs.github.com/spec/v1\n"));
        assert_eq!(Pointer::parse(&text).unwrap(), pointer);
    }

    #[test]
    fn test_identity_is_oid_and_size() {
        let mut set = HashSet::new();
        set.insert(Pointer::parse(&pointer_text(VALID_OID, "5")).unwrap());
        set.insert(Pointer::new(VALID_OID, 5));
        set.insert(Pointer::new(VALID_OID, 6));
        assert_eq!(set.len(), 2);
    }
}
