// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2025 MediaGit Contributors

//! `.gitattributes` parsing and lookup.
//!
//! Attribute files are read from a revision's tree rather than the working
//! directory, so the answer for a path reflects what was committed at that
//! revision. Rules from deeper directories override shallower ones, and
//! later lines in a file override earlier ones.

use crate::wildmatch::Wildmatch;
use tracing::{trace, warn};

/// Name of the per-directory attributes file
pub const GITATTRIBUTES: &str = ".gitattributes";

/// State of one attribute for a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// `attr`
    Set,
    /// `-attr`
    Unset,
    /// `attr=value`
    Value(String),
    /// `!attr`: explicitly reset to unspecified
    Unspecified,
}

impl AttrValue {
    /// String form as reported by `git check-attr`
    pub fn as_str(&self) -> &str {
        match self {
            AttrValue::Set => "set",
            AttrValue::Unset => "unset",
            AttrValue::Value(v) => v,
            AttrValue::Unspecified => "unspecified",
        }
    }
}

#[derive(Debug, Clone)]
struct AttrRule {
    pattern: Wildmatch,
    // Patterns containing a slash are matched against the path relative to
    // the attributes file; others against the basename only.
    anchored: bool,
    attrs: Vec<(String, AttrValue)>,
}

/// Rules parsed from one `.gitattributes` file
#[derive(Debug, Clone)]
pub struct AttributeFile {
    // Directory holding the file, "" for the root, otherwise ending in '/'.
    base: String,
    rules: Vec<AttrRule>,
}

impl AttributeFile {
    /// Parse the contents of a `.gitattributes` file located in `base`
    /// (repository-relative directory, "" for the root).
    ///
    /// Lines that cannot be understood are skipped, as git does.
    pub fn parse(base: &str, content: &str) -> Self {
        let base = match base.trim_matches('/') {
            "" => String::new(),
            dir => format!("{}/", dir),
        };
        let rules = content.lines().filter_map(parse_line).collect();
        Self { base, rules }
    }

    /// Number of rules parsed
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when the file yielded no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Last value this file assigns to `name` for `path`, if any
    fn lookup(&self, path: &str, name: &str) -> Option<&AttrValue> {
        let relative = path.strip_prefix(self.base.as_str())?;
        let basename = relative.rsplit('/').next().unwrap_or(relative);

        self.rules.iter().rev().find_map(|rule| {
            let hit = rule
                .pattern
                .matches(if rule.anchored { relative } else { basename });
            if !hit {
                return None;
            }
            rule.attrs
                .iter()
                .rev()
                .find(|(attr, _)| attr == name)
                .map(|(_, value)| value)
        })
    }
}

fn parse_line(line: &str) -> Option<AttrRule> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let mut fields = line.split_whitespace();
    let raw = fields.next()?;

    // Negated patterns are forbidden in attribute files; directory-only
    // patterns never match a blob.
    if raw.starts_with('!') || raw.ends_with('/') {
        trace!("Ignoring attribute pattern {}", raw);
        return None;
    }
    let anchored = raw.contains('/');
    let pattern = match Wildmatch::pathname(raw.trim_start_matches('/')) {
        Ok(pattern) => pattern,
        Err(e) => {
            warn!("Ignoring attribute pattern {}: {}", raw, e);
            return None;
        }
    };

    let attrs = fields
        .filter_map(|token| {
            if let Some(name) = token.strip_prefix('-') {
                Some((name.to_string(), AttrValue::Unset))
            } else if let Some(name) = token.strip_prefix('!') {
                Some((name.to_string(), AttrValue::Unspecified))
            } else if let Some((name, value)) = token.split_once('=') {
                Some((name.to_string(), AttrValue::Value(value.to_string())))
            } else {
                Some((token.to_string(), AttrValue::Set))
            }
        })
        .filter(|(name, _)| !name.is_empty())
        .collect::<Vec<_>>();

    if attrs.is_empty() {
        return None;
    }
    Some(AttrRule {
        pattern,
        anchored,
        attrs,
    })
}

/// Directories whose `.gitattributes` apply to `path`, outermost first
///
/// ```
/// use lfsfetch_git::attributes::attribute_dirs;
///
/// assert_eq!(attribute_dirs("a/b/c.bin"), vec!["", "a", "a/b"]);
/// assert_eq!(attribute_dirs("top.bin"), vec![""]);
/// ```
pub fn attribute_dirs(path: &str) -> Vec<&str> {
    let mut dirs = vec![""];
    dirs.extend(path.match_indices('/').map(|(idx, _)| &path[..idx]));
    dirs
}

/// Resolve `name` for `path` across attribute files ordered outermost first.
///
/// Returns `None` when no rule mentions the attribute or the winning rule
/// resets it with `!name`.
pub fn resolve<'a, I>(files: I, path: &str, name: &str) -> Option<AttrValue>
where
    I: IntoIterator<Item = &'a AttributeFile>,
    I::IntoIter: DoubleEndedIterator,
{
    files
        .into_iter()
        .rev()
        .find_map(|file| file.lookup(path, name))
        .filter(|value| **value != AttrValue::Unspecified)
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(files: &[AttributeFile], path: &str) -> Option<AttrValue> {
        resolve(files, path, "filter")
    }

    #[test]
    fn test_basename_pattern_matches_any_depth() {
        let root = AttributeFile::parse("", "*.bin filter=lfs diff=lfs merge=lfs -text\n");
        assert_eq!(
            lookup(&[root.clone()], "deep/dir/x.bin"),
            Some(AttrValue::Value("lfs".into()))
        );
        assert_eq!(lookup(&[root], "x.txt"), None);
    }

    #[test]
    fn test_anchored_pattern_does_not_cross_directories() {
        let root = AttributeFile::parse("", "data/*.bin filter=lfs\n");
        let files = [root];
        assert_eq!(
            lookup(&files, "data/a.bin"),
            Some(AttrValue::Value("lfs".into()))
        );
        assert_eq!(lookup(&files, "data/sub/a.bin"), None);
        assert_eq!(lookup(&files, "other/data/a.bin"), None);
    }

    #[test]
    fn test_leading_slash_anchors_to_base() {
        let nested = AttributeFile::parse("assets", "/*.psd filter=lfs\n");
        let files = [nested];
        assert!(lookup(&files, "assets/a.psd").is_some());
        assert!(lookup(&files, "assets/x/a.psd").is_none());
        assert!(lookup(&files, "a.psd").is_none());
    }

    #[test]
    fn test_later_lines_override() {
        let root = AttributeFile::parse("", "*.bin filter=lfs\nsmall.bin -filter\n");
        let files = [root];
        assert_eq!(lookup(&files, "small.bin"), Some(AttrValue::Unset));
        assert_eq!(
            lookup(&files, "big.bin"),
            Some(AttrValue::Value("lfs".into()))
        );
    }

    #[test]
    fn test_deeper_file_overrides_root() {
        let root = AttributeFile::parse("", "*.bin filter=lfs\n");
        let nested = AttributeFile::parse("vendor/", "*.bin !filter\n");
        let files = [root, nested];
        assert_eq!(lookup(&files, "vendor/x.bin"), None);
        assert_eq!(
            lookup(&files, "x.bin"),
            Some(AttrValue::Value("lfs".into()))
        );
    }

    #[test]
    fn test_comments_and_garbage_skipped() {
        let file = AttributeFile::parse(
            "",
            "# comment\n\n!negated filter=lfs\nbuild/ filter=lfs\n*.bin\n*.dat filter=lfs\n",
        );
        assert_eq!(file.len(), 1);
    }

    #[test]
    fn test_set_attribute() {
        let file = AttributeFile::parse("", "*.bin filter\n");
        assert_eq!(lookup(&[file], "a.bin"), Some(AttrValue::Set));
        assert_eq!(AttrValue::Set.as_str(), "set");
    }

    #[test]
    fn test_double_star_rules() {
        let root = AttributeFile::parse(
            "",
            "assets/**.psd filter=lfs\n*.[ab filter=lfs\nmedia/**/*.mov filter=lfs\n",
        );
        assert_eq!(root.len(), 3);
        let files = [root];
        assert!(lookup(&files, "assets/a.psd").is_some());
        assert!(lookup(&files, "assets/x/a.psd").is_none());
        assert!(lookup(&files, "deep/x.[ab").is_some());
        assert!(lookup(&files, "x.a").is_none());
        assert!(lookup(&files, "media/clip.mov").is_some());
        assert!(lookup(&files, "media/2024/jan/clip.mov").is_some());
    }

    #[test]
    fn test_attribute_dirs() {
        assert_eq!(attribute_dirs("a/b/c"), vec!["", "a", "a/b"]);
    }
}
