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

//! In-memory object store for testing
//!
//! [`MemoryStore`] keeps a set of present pointers and records every call
//! made through [`ObjectStore`], so tests can assert not only what was
//! fetched but how often the store was consulted.
//!
//! # Examples
//!
//! ```rust
//! use lfsfetch_git::{ObjectStore, Pointer};
//! use lfsfetch_storage::mock::MemoryStore;
//! use std::collections::HashSet;
//!
//! let store = MemoryStore::new();
//! let pointer = Pointer::new("abc", 10);
//! assert!(!store.exists(&pointer).unwrap());
//!
//! let objects: HashSet<Pointer> = [pointer.clone()].into_iter().collect();
//! store.fetch("https://example.com/lfs", &objects, None).unwrap();
//! assert!(store.contains(&pointer));
//! assert_eq!(store.fetch_calls().len(), 1);
//! ```

use crate::error::StorageError;
use lfsfetch_git::{ObjectStore, Pointer, ProgressFn, TransferEvent, TransferPhase};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// One recorded `fetch` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    /// Endpoint passed to the store
    pub url: String,
    /// Objects requested
    pub objects: HashSet<Pointer>,
}

#[derive(Default)]
struct State {
    objects: HashSet<Pointer>,
    exists_calls: Vec<Pointer>,
    fetch_calls: Vec<FetchCall>,
    failure: Option<String>,
}

/// In-memory object store that records its calls
///
/// Clones share state, so a clone handed to the code under test can be
/// inspected through the original.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `objects`
    pub fn with_objects<I: IntoIterator<Item = Pointer>>(objects: I) -> Self {
        let store = Self::new();
        store.write().objects.extend(objects);
        store
    }

    /// Make every subsequent `fetch` fail with `message`
    pub fn failing(self, message: &str) -> Self {
        self.write().failure = Some(message.to_string());
        self
    }

    /// Add an object as if it had been fetched earlier
    pub fn insert(&self, pointer: Pointer) {
        self.write().objects.insert(pointer);
    }

    /// Whether `pointer` is held
    pub fn contains(&self, pointer: &Pointer) -> bool {
        self.read().objects.contains(pointer)
    }

    /// Number of objects held
    pub fn len(&self) -> usize {
        self.read().objects.len()
    }

    /// True when no objects are held
    pub fn is_empty(&self) -> bool {
        self.read().objects.is_empty()
    }

    /// Every pointer passed to `exists`, in call order
    pub fn exists_calls(&self) -> Vec<Pointer> {
        self.read().exists_calls.clone()
    }

    /// Every `fetch` call, in call order
    pub fn fetch_calls(&self) -> Vec<FetchCall> {
        self.read().fetch_calls.clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read();
        f.debug_struct("MemoryStore")
            .field("objects", &state.objects.len())
            .field("exists_calls", &state.exists_calls.len())
            .field("fetch_calls", &state.fetch_calls.len())
            .finish()
    }
}

impl ObjectStore for MemoryStore {
    fn exists(&self, pointer: &Pointer) -> anyhow::Result<bool> {
        let mut state = self.write();
        state.exists_calls.push(pointer.clone());
        Ok(state.objects.contains(pointer))
    }

    fn fetch(
        &self,
        url: &str,
        objects: &HashSet<Pointer>,
        progress: Option<ProgressFn<'_>>,
    ) -> anyhow::Result<()> {
        let total = objects.len() as u64;
        {
            let mut state = self.write();
            state.fetch_calls.push(FetchCall {
                url: url.to_string(),
                objects: objects.clone(),
            });
            if let Some(message) = &state.failure {
                return Err(StorageError::other(anyhow::anyhow!("{}", message)).into());
            }
            state.objects.extend(objects.iter().cloned());
        }

        if let Some(callback) = progress {
            callback(&TransferEvent::new(TransferPhase::Started, 0, total));
            let mut ordered: Vec<&Pointer> = objects.iter().collect();
            ordered.sort();
            for (done, pointer) in ordered.into_iter().enumerate() {
                callback(
                    &TransferEvent::new(TransferPhase::Object, done as u64 + 1, total)
                        .with_oid(pointer.oid()),
                );
            }
            callback(&TransferEvent::new(TransferPhase::Finished, total, total));
        }
        Ok(())
    }
}
