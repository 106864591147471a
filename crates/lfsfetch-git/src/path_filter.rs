// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2025 MediaGit Contributors

//! Include/exclude filtering of repository paths.
//!
//! Patterns use `fnmatch` shell-glob syntax (`*`, `?`, `[...]`, `[!...]`)
//! and are matched against the whole repository-relative path. `*` also
//! matches `/`, so `data/*` selects `data/x/y.bin`, and `**` is just `*`.
//! See [`Wildmatch::fnmatch`].

use crate::error::GitResult;
use crate::wildmatch::Wildmatch;
use std::collections::HashSet;

/// Compiled include and exclude patterns
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    include: Vec<Wildmatch>,
    exclude: Vec<Wildmatch>,
}

impl PathFilter {
    /// Compile the patterns. An empty include list selects every path.
    pub fn new<I, E>(include: &[I], exclude: &[E]) -> GitResult<Self>
    where
        I: AsRef<str>,
        E: AsRef<str>,
    {
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    /// Whether a single path survives the filter
    pub fn matches(&self, path: &str) -> bool {
        let included =
            self.include.is_empty() || self.include.iter().any(|p| p.matches(path));
        included && !self.exclude.iter().any(|p| p.matches(path))
    }

    /// Apply to a path collection, returning the surviving set
    pub fn apply<P>(&self, paths: P) -> HashSet<String>
    where
        P: IntoIterator<Item = String>,
    {
        paths.into_iter().filter(|path| self.matches(path)).collect()
    }
}

fn compile<S: AsRef<str>>(patterns: &[S]) -> GitResult<Vec<Wildmatch>> {
    patterns
        .iter()
        .map(|pattern| Wildmatch::fnmatch(pattern.as_ref()))
        .collect()
}

/// Filter `paths` by include and exclude patterns.
///
/// The result is the union of include matches (or all paths when `include`
/// is empty) minus anything matching an exclude pattern.
///
/// ```
/// use lfsfetch_git::filter_paths;
///
/// let paths = vec!["a.bin".to_string(), "b.txt".to_string(), "c.bin".to_string()];
/// let kept = filter_paths(paths, &["*.bin"], &["c*"]).unwrap();
/// assert_eq!(kept.len(), 1);
/// assert!(kept.contains("a.bin"));
/// ```
pub fn filter_paths<P, I, E>(paths: P, include: &[I], exclude: &[E]) -> GitResult<HashSet<String>>
where
    P: IntoIterator<Item = String>,
    I: AsRef<str>,
    E: AsRef<str>,
{
    Ok(PathFilter::new(include, exclude)?.apply(paths))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const NONE: &[&str] = &[];

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_union_of_includes() {
        let result = filter_paths(
            paths(&["a.bin", "b.psd", "c.txt"]),
            &["*.bin", "*.psd"],
            NONE,
        )
        .unwrap();
        assert_eq!(result, set(&["a.bin", "b.psd"]));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let result = filter_paths(
            paths(&["data/a.bin", "data/tmp/b.bin", "c.bin"]),
            &["data/*"],
            &["data/tmp/*"],
        )
        .unwrap();
        assert_eq!(result, set(&["data/a.bin"]));
    }

    #[test]
    fn test_star_crosses_separator() {
        let result = filter_paths(paths(&["x/y/z.bin", "z.txt"]), &["*.bin"], NONE).unwrap();
        assert_eq!(result, set(&["x/y/z.bin"]));
    }

    #[test]
    fn test_character_classes() {
        let result = filter_paths(
            paths(&["f1.bin", "f2.bin", "fa.bin"]),
            &["f[0-9].bin"],
            &["f[!1].bin"],
        )
        .unwrap();
        assert_eq!(result, set(&["f1.bin"]));
    }

    #[test]
    fn test_duplicates_collapse() {
        let result = filter_paths(paths(&["a", "a", "b"]), NONE, NONE).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_double_star_inside_component() {
        let result =
            filter_paths(paths(&["top.bin", "d/x.bin", "file[1"]), &["**.bin"], NONE).unwrap();
        assert_eq!(result, set(&["top.bin", "d/x.bin"]));
    }

    #[test]
    fn test_double_star_slash_needs_a_directory() {
        let result =
            filter_paths(paths(&["top.bin", "d/x.bin", "file[1"]), &["**/*.bin"], NONE).unwrap();
        assert_eq!(result, set(&["d/x.bin"]));
    }

    #[test]
    fn test_unclosed_bracket_is_literal() {
        let result =
            filter_paths(paths(&["top.bin", "d/x.bin", "file[1"]), &["file[1"], NONE).unwrap();
        assert_eq!(result, set(&["file[1"]));

        let result =
            filter_paths(paths(&["top.bin", "file[1"]), NONE, &["file[1"]).unwrap();
        assert_eq!(result, set(&["top.bin"]));
    }

    fn path_strategy() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-c]{1,3}(/[a-c]{1,3}){0,2}(\\.bin|\\.txt)?", 0..20)
    }

    fn pattern_strategy() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(
            prop::sample::select(vec!["*.bin", "a*", "*/b*", "c?", "*", "[ab]*"])
                .prop_map(str::to_string),
            0..3,
        )
    }

    proptest! {
        #[test]
        fn prop_no_patterns_keeps_everything(input in path_strategy()) {
            let expected: HashSet<String> = input.iter().cloned().collect();
            let result = filter_paths(input, NONE, NONE).unwrap();
            prop_assert_eq!(result, expected);
        }

        #[test]
        fn prop_filter_is_idempotent(
            input in path_strategy(),
            include in pattern_strategy(),
            exclude in pattern_strategy(),
        ) {
            let once = filter_paths(input, &include, &exclude).unwrap();
            let twice = filter_paths(once.clone(), &include, &exclude).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_result_is_subset(
            input in path_strategy(),
            include in pattern_strategy(),
            exclude in pattern_strategy(),
        ) {
            let all: HashSet<String> = input.iter().cloned().collect();
            let result = filter_paths(input, &include, &exclude).unwrap();
            prop_assert!(result.is_subset(&all));
        }
    }
}
