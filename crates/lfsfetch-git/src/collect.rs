// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2025 MediaGit Contributors

//! Discovery of LFS pointers in a revision's tree.
//!
//! [`collect_objects`] enumerates candidate paths up front (the path set
//! must be complete before include/exclude filtering) and returns an
//! [`ObjectCollector`] that inspects one candidate per `next()` call:
//!
//! 1. the `filter` attribute at the revision must be `lfs`
//! 2. the first [`HEADER_PEEK_SIZE`] bytes of the raw blob must start with a
//!    pointer header
//! 3. the blob must parse as a [`Pointer`]
//!
//! A candidate failing any step, including with an I/O or parse error, is
//! skipped; it never ends the walk.

use crate::error::GitResult;
use crate::path_filter::PathFilter;
use crate::pointer::{Pointer, HEADER_PEEK_SIZE};
use crate::repository::Repository;
use std::collections::hash_set;
use std::io::{BufRead, BufReader};
use tracing::{debug, trace};

/// Attribute naming the clean/smudge filter for a path
pub const FILTER_ATTR: &str = "filter";

/// Filter attribute value marking LFS-managed paths
pub const LFS_FILTER: &str = "lfs";

/// Traversal root and remaining include patterns after narrowing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkPlan {
    /// Repository-relative directory (or file) to enumerate, "" for the tree root
    pub root: String,
    /// Include patterns still to apply below `root`
    pub include: Vec<String>,
}

/// Longest wildcard-free prefix of `pattern` that ends at a `/`, or the whole
/// pattern when it has no wildcard. `None` when the pattern starts with a
/// wildcard before any `/`.
fn static_prefix(pattern: &str) -> Option<&str> {
    match pattern.find(&['*', '?', '['][..]) {
        None => Some(pattern),
        Some(idx) => pattern[..idx]
            .rfind('/')
            .map(|slash| &pattern[..=slash]),
    }
}

/// Decide where to start the tree walk.
///
/// Only a single include pattern is narrowed: its static prefix becomes the
/// root, and when the pattern is exactly that root or `<root>/**` the
/// include filter is dropped because every path under the root qualifies.
/// Several patterns always walk the whole tree, even when they share a
/// prefix.
///
/// ```
/// use lfsfetch_git::collect::plan_walk;
///
/// let plan = plan_walk(&["data/**".to_string()]);
/// assert_eq!(plan.root, "data/");
/// assert!(plan.include.is_empty());
///
/// let plan = plan_walk(&["data/*.bin".to_string()]);
/// assert_eq!(plan.root, "data/");
/// assert_eq!(plan.include, vec!["data/*.bin".to_string()]);
/// ```
pub fn plan_walk(include: &[String]) -> WalkPlan {
    if let [pattern] = include {
        if let Some(root) = static_prefix(pattern) {
            let everything_below = format!("{}/**", root.trim_end_matches('/'));
            let include = if pattern == root || *pattern == everything_below {
                Vec::new()
            } else {
                include.to_vec()
            };
            return WalkPlan {
                root: root.to_string(),
                include,
            };
        }
    }
    WalkPlan {
        root: String::new(),
        include: include.to_vec(),
    }
}

/// Start collecting pointers referenced by `rev`.
///
/// Errors here concern the revision as a whole (unknown revision, invalid
/// pattern, unreadable tree); per-path failures are absorbed by the
/// returned iterator.
pub fn collect_objects<'r, R>(
    repo: &'r R,
    rev: &str,
    include: &[String],
    exclude: &[String],
) -> GitResult<ObjectCollector<'r, R>>
where
    R: Repository + ?Sized,
{
    let plan = plan_walk(include);
    let filter = PathFilter::new(&plan.include, exclude)?;
    let found = repo.find_paths(rev, &plan.root)?;
    let total = found.len();
    let candidates = filter.apply(found);

    debug!(
        rev,
        root = %plan.root,
        total,
        candidates = candidates.len(),
        "Collecting LFS objects"
    );

    Ok(ObjectCollector {
        repo,
        rev: rev.to_string(),
        candidates: candidates.into_iter(),
    })
}

/// Lazy, single-pass iterator over the pointers of one revision.
///
/// Order is unspecified. Each blob is opened and closed within one `next()`
/// call, so dropping the iterator early leaves nothing open.
pub struct ObjectCollector<'r, R: Repository + ?Sized> {
    repo: &'r R,
    rev: String,
    candidates: hash_set::IntoIter<String>,
}

impl<'r, R: Repository + ?Sized> ObjectCollector<'r, R> {
    /// Revision being scanned
    pub fn revision(&self) -> &str {
        &self.rev
    }

    fn inspect_candidate(&self, path: &str) -> GitResult<Option<Pointer>> {
        let filter = self.repo.check_attr(&self.rev, path, FILTER_ATTR)?;
        if filter.as_deref() != Some(LFS_FILTER) {
            trace!(path, "Not an LFS path");
            return Ok(None);
        }

        let mut reader = BufReader::new(self.repo.open_raw(&self.rev, path)?);
        let head = reader.fill_buf()?;
        if !Pointer::has_header(&head[..head.len().min(HEADER_PEEK_SIZE)]) {
            debug!(path, "LFS path does not contain a pointer");
            return Ok(None);
        }
        Pointer::load(reader).map(Some)
    }
}

impl<'r, R: Repository + ?Sized> Iterator for ObjectCollector<'r, R> {
    type Item = Pointer;

    fn next(&mut self) -> Option<Pointer> {
        loop {
            let path = self.candidates.next()?;
            match self.inspect_candidate(&path) {
                Ok(Some(pointer)) => {
                    trace!(path = %path, oid = pointer.oid(), "Found pointer");
                    return Some(pointer);
                }
                Ok(None) => {}
                Err(e) => debug!(path = %path, error = %e, "Skipping unreadable candidate"),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.candidates.size_hint().1)
    }
}
