//! Canonical index over a version's book ordering.
//!
//! A thin cached view over the storage collaborator: resolves loose book
//! identifiers (name, short name, or code, case-insensitively) to books and
//! exposes chapter extents. The corpus is immutable after import, so cache
//! entries never go stale except through administrative version removal,
//! which must call [`CanonicalIndex::invalidate`].

use std::collections::HashMap;
use std::sync::RwLock;

use crate::corpus::Book;
use crate::store::VerseStore;
use crate::types::VersionId;

/// Cached book resolution for one or more versions.
#[derive(Debug)]
pub struct CanonicalIndex {
    cache: RwLock<HashMap<(String, String), Option<Book>>>,
}

impl CanonicalIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self { cache: RwLock::new(HashMap::new()) }
    }

    /// Resolve a book identifier within a version.
    ///
    /// Matches case-insensitively and exactly against the book's name, short
    /// name, or code; no fuzzy matching. Results (including misses) are
    /// cached per (version, identifier).
    pub fn resolve_book(
        &self,
        store: &dyn VerseStore,
        version: &str,
        identifier: &str,
    ) -> Option<Book> {
        let key = (
            VersionId::new(version).as_str().to_string(),
            identifier.trim().to_lowercase(),
        );

        if let Ok(cache) = self.cache.read() {
            if let Some(hit) = cache.get(&key) {
                return hit.clone();
            }
        }

        let resolved = store.find_book(version, identifier);
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key, resolved.clone());
        }
        resolved
    }

    /// Number of chapters in a book.
    pub fn chapter_count(
        &self,
        store: &dyn VerseStore,
        version: &str,
        book_rank: u32,
    ) -> Option<u32> {
        store
            .books(version)
            .iter()
            .find(|b| b.rank == book_rank)
            .map(|b| b.chapter_count)
    }

    /// Rank of the last chapter of a book.
    ///
    /// Chapter ranks are 1-based and contiguous, so this equals the chapter
    /// count.
    pub fn last_chapter_rank(
        &self,
        store: &dyn VerseStore,
        version: &str,
        book_rank: u32,
    ) -> Option<u32> {
        self.chapter_count(store, version, book_rank)
    }

    /// Drop all cached entries for a version.
    ///
    /// Called after a version is removed from the store.
    pub fn invalidate(&self, version: &str) {
        let key = VersionId::new(version).as_str().to_string();
        if let Ok(mut cache) = self.cache.write() {
            cache.retain(|(v, _), _| *v != key);
        }
    }
}

impl Default for CanonicalIndex {
    fn default() -> Self {
        Self::new()
    }
}
