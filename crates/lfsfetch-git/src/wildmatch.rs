// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2025 MediaGit Contributors

//! Shell-glob patterns compiled to regular expressions.
//!
//! Two dialects are supported:
//!
//! - [`Wildmatch::fnmatch`]: `fnmatch`-style matching over a whole string.
//!   `*` matches any run of characters including `/`, `?` any single
//!   character, `[...]`/`[!...]` a character class. A `[` without a closing
//!   `]` is an ordinary character, so every pattern compiles.
//! - [`Wildmatch::pathname`]: gitattributes-style matching. `*`, `?` and
//!   classes never match `/`. A `**` component matches any number of
//!   directories (`**/x`, `a/**/b`, `a/**`); a `**` inside a component
//!   behaves like `*`.

use crate::error::{GitError, GitResult};
use regex::Regex;

/// A compiled glob
#[derive(Debug, Clone)]
pub struct Wildmatch {
    source: String,
    regex: Regex,
}

impl Wildmatch {
    /// Compile with `fnmatch` semantics
    ///
    /// ```
    /// use lfsfetch_git::wildmatch::Wildmatch;
    ///
    /// let pattern = Wildmatch::fnmatch("data/*.bin").unwrap();
    /// assert!(pattern.matches("data/deep/x.bin"));
    /// assert!(Wildmatch::fnmatch("file[1").unwrap().matches("file[1"));
    /// ```
    pub fn fnmatch(pattern: &str) -> GitResult<Self> {
        Self::compile(pattern, false)
    }

    /// Compile with slash-aware gitattributes semantics
    ///
    /// ```
    /// use lfsfetch_git::wildmatch::Wildmatch;
    ///
    /// let pattern = Wildmatch::pathname("assets/**/*.psd").unwrap();
    /// assert!(pattern.matches("assets/a.psd"));
    /// assert!(pattern.matches("assets/x/y/a.psd"));
    /// assert!(!Wildmatch::pathname("data/*").unwrap().matches("data/x/y"));
    /// ```
    pub fn pathname(pattern: &str) -> GitResult<Self> {
        Self::compile(pattern, true)
    }

    fn compile(pattern: &str, pathname: bool) -> GitResult<Self> {
        let translated = translate(pattern, pathname);
        let regex = Regex::new(&translated).map_err(|e| GitError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Whether `text` matches the whole pattern
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The pattern as written
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

fn translate(pattern: &str, pathname: bool) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let n = chars.len();
    let any = if pathname { "[^/]" } else { "." };
    let mut out = String::from("^(?s:");
    let mut i = 0;

    while i < n {
        match chars[i] {
            '*' => {
                let start = i;
                while i < n && chars[i] == '*' {
                    i += 1;
                }
                if pathname && i - start >= 2 {
                    let opens_component = start == 0 || chars[start - 1] == '/';
                    if opens_component && i == n {
                        out.push_str(".*");
                        continue;
                    }
                    if opens_component && chars[i] == '/' {
                        out.push_str("(?:.*/)?");
                        i += 1;
                        continue;
                    }
                }
                out.push_str(any);
                out.push('*');
            }
            '?' => {
                out.push_str(any);
                i += 1;
            }
            '[' => match translate_class(&chars, i + 1, pathname) {
                Some((class, next)) => {
                    out.push_str(&class);
                    i = next;
                }
                None => {
                    out.push_str(r"\[");
                    i += 1;
                }
            },
            c => {
                out.push_str(&escape(c));
                i += 1;
            }
        }
    }

    out.push_str(")$");
    out
}

/// Translate the class opened just before `start`. Returns the regex class
/// and the index after the closing `]`, or `None` when the class is never
/// closed.
fn translate_class(chars: &[char], start: usize, pathname: bool) -> Option<(String, usize)> {
    let n = chars.len();
    let mut j = start;
    let negated = j < n && (chars[j] == '!' || (pathname && chars[j] == '^'));
    if negated {
        j += 1;
    }
    let body_start = j;
    // A leading ']' is a member, not the terminator
    if j < n && chars[j] == ']' {
        j += 1;
    }
    while j < n && chars[j] != ']' {
        j += 1;
    }
    if j >= n {
        return None;
    }

    let body = &chars[body_start..j];
    let mut items = String::new();
    let mut k = 0;
    while k < body.len() {
        if k + 2 < body.len() && body[k + 1] == '-' {
            let (lo, hi) = (body[k], body[k + 2]);
            // Reversed ranges match nothing
            if lo <= hi {
                items.push_str(&escape(lo));
                items.push('-');
                items.push_str(&escape(hi));
            }
            k += 3;
        } else {
            items.push_str(&escape(body[k]));
            k += 1;
        }
    }

    let class = match (items.is_empty(), negated) {
        (true, false) => r"[^\s\S]".to_string(),
        (true, true) => if pathname { "[^/]" } else { "." }.to_string(),
        (false, false) if pathname => format!("[{}&&[^/]]", items),
        (false, false) => format!("[{}]", items),
        (false, true) if pathname => format!("[^{}/]", items),
        (false, true) => format!("[^{}]", items),
    };
    Some((class, j + 1))
}

fn escape(c: char) -> String {
    let mut buf = [0u8; 4];
    regex::escape(c.encode_utf8(&mut buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fnm(pattern: &str, text: &str) -> bool {
        Wildmatch::fnmatch(pattern).unwrap().matches(text)
    }

    fn path(pattern: &str, text: &str) -> bool {
        Wildmatch::pathname(pattern).unwrap().matches(text)
    }

    #[test]
    fn test_fnmatch_star_crosses_slash() {
        assert!(fnm("*.bin", "a/b/c.bin"));
        assert!(fnm("data/*", "data/x/y"));
        assert!(!fnm("*.bin", "a.bin.txt"));
    }

    #[test]
    fn test_fnmatch_double_star_is_star() {
        assert!(fnm("**.bin", "top.bin"));
        assert!(fnm("**.bin", "d/x.bin"));
        assert!(fnm("**/*.bin", "d/x.bin"));
        assert!(!fnm("**/*.bin", "top.bin"));
    }

    #[test]
    fn test_fnmatch_unclosed_bracket_is_literal() {
        assert!(fnm("file[1", "file[1"));
        assert!(!fnm("file[1", "file1"));
        assert!(fnm("[", "["));
    }

    #[test]
    fn test_fnmatch_classes() {
        assert!(fnm("f[0-9].bin", "f7.bin"));
        assert!(!fnm("f[!0-9].bin", "f7.bin"));
        assert!(fnm("f[!0-9].bin", "fa.bin"));
        assert!(fnm("[]a]", "]"));
        assert!(fnm("[a-]", "-"));
        assert!(!fnm("[z-a]", "m"));
        assert!(fnm("[!z-a]", "m"));
    }

    #[test]
    fn test_fnmatch_escapes_regex_syntax() {
        assert!(fnm("a.b(1)+$", "a.b(1)+$"));
        assert!(!fnm("a.b", "axb"));
        assert!(fnm("[.]x", ".x"));
        assert!(fnm("back\\slash", "back\\slash"));
    }

    #[test]
    fn test_fnmatch_question_and_newline() {
        assert!(fnm("a?c", "a/c"));
        assert!(fnm("a*", "a\nb"));
    }

    #[test]
    fn test_pathname_star_stays_in_component() {
        assert!(path("data/*.bin", "data/a.bin"));
        assert!(!path("data/*.bin", "data/x/a.bin"));
        assert!(!path("a?c", "a/c"));
        assert!(!path("a[/]c", "a/c"));
        assert!(!path("a[!x]c", "a/c"));
    }

    #[test]
    fn test_pathname_double_star_components() {
        assert!(path("**/x.bin", "x.bin"));
        assert!(path("**/x.bin", "a/b/x.bin"));
        assert!(path("a/**/b", "a/b"));
        assert!(path("a/**/b", "a/x/y/b"));
        assert!(path("a/**", "a/x/y"));
        assert!(!path("a/**", "b/x"));
        assert!(path("**", "any/thing"));
    }

    #[test]
    fn test_pathname_double_star_inside_component() {
        assert!(path("assets/**.psd", "assets/a.psd"));
        assert!(!path("assets/**.psd", "assets/x/a.psd"));
    }

    #[test]
    fn test_pathname_caret_negates() {
        assert!(path("[^a]x", "bx"));
        assert!(!path("[^a]x", "ax"));
    }

    #[test]
    fn test_as_str() {
        assert_eq!(Wildmatch::fnmatch("*.bin").unwrap().as_str(), "*.bin");
    }
}
