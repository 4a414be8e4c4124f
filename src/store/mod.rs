//! Storage collaborator contract and the in-memory implementation.
//!
//! The query engine only ever consumes the [`VerseStore`] trait; callers may
//! plug in their own backend. [`MemoryStore`] is the crate's own
//! implementation, holding each version as a frozen, `rank_all`-sorted verse
//! vector built by the import pipeline.

use std::collections::HashMap;

use crate::corpus::{Book, Verse, VersionMeta};
use crate::types::{VerseCode, VersionId};

/// Read-side storage contract consumed by the query engine.
///
/// Implementations must treat a version's corpus as immutable: for a fixed
/// version, repeated calls with the same arguments return the same rows.
pub trait VerseStore {
    /// Exact, case-insensitive match of `identifier` against a book's name,
    /// short name, or code within `version`.
    fn find_book(&self, version: &str, identifier: &str) -> Option<Book>;

    /// All books of a version, in rank order.
    fn books(&self, version: &str) -> Vec<Book>;

    /// The verse at an exact (book rank, chapter rank, verse rank) triple.
    fn verse_at(
        &self,
        version: &str,
        book_rank: u32,
        chapter_rank: u32,
        verse_rank: u32,
    ) -> Option<Verse>;

    /// The verse with the highest `rank_all` within the given book, further
    /// restricted to one chapter when `chapter_rank` is given.
    fn last_verse_in(&self, version: &str, book_rank: u32, chapter_rank: Option<u32>)
        -> Option<Verse>;

    /// The verses with `rank_all` in `[start, end]` inclusive, windowed by
    /// `offset`/`limit`. Returns the page and the full (pre-window) count.
    fn verses_in_range(
        &self,
        version: &str,
        start: u64,
        end: u64,
        offset: usize,
        limit: usize,
    ) -> (Vec<Verse>, u64);

    /// The verses carrying the given content codes, in the caller-supplied
    /// code order. Codes absent from the version are omitted.
    fn verses_by_codes(&self, version: &str, codes: &[VerseCode]) -> Vec<Verse>;

    /// Identifiers of every version known to the store, sorted.
    fn known_versions(&self) -> Vec<String>;

    /// Metadata of one version.
    fn version_meta(&self, version: &str) -> Option<VersionMeta>;

    /// Metadata of every version, ordered by language code then version.
    fn all_versions(&self) -> Vec<VersionMeta>;
}

/// One frozen version corpus: books in rank order, verses in `rank_all`
/// order, plus a code lookup table.
#[derive(Debug, Clone)]
struct VersionCorpus {
    meta: VersionMeta,
    books: Vec<Book>,
    verses: Vec<Verse>,
    by_code: HashMap<String, usize>,
}

/// In-memory verse store keyed by uppercase version identifier.
#[derive(Debug, Default)]
pub struct MemoryStore {
    versions: HashMap<String, VersionCorpus>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a version's frozen corpus.
    ///
    /// `books` must be in rank order and `verses` in `rank_all` order; the
    /// import pipeline produces both. Registering a version that already
    /// exists replaces it.
    pub fn insert_version(&mut self, meta: VersionMeta, books: Vec<Book>, verses: Vec<Verse>) {
        let key = VersionId::new(&meta.version).as_str().to_string();
        let by_code = verses
            .iter()
            .enumerate()
            .map(|(idx, v)| (v.code.as_str().to_string(), idx))
            .collect();
        self.versions.insert(
            key,
            VersionCorpus { meta, books, verses, by_code },
        );
    }

    /// Remove a version and its corpus. Returns `true` if it existed.
    ///
    /// Administrative operation; callers owning a [`crate::index::CanonicalIndex`]
    /// must invalidate it afterwards.
    pub fn remove_version(&mut self, version: &str) -> bool {
        self.versions.remove(VersionId::new(version).as_str()).is_some()
    }

    /// Whether the store holds the given version.
    #[must_use]
    pub fn has_version(&self, version: &str) -> bool {
        self.versions.contains_key(VersionId::new(version).as_str())
    }

    /// Number of verses stored for a version.
    #[must_use]
    pub fn verse_count(&self, version: &str) -> usize {
        self.corpus(version).map_or(0, |c| c.verses.len())
    }

    fn corpus(&self, version: &str) -> Option<&VersionCorpus> {
        self.versions.get(VersionId::new(version).as_str())
    }
}

impl VerseStore for MemoryStore {
    fn find_book(&self, version: &str, identifier: &str) -> Option<Book> {
        let needle = identifier.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.corpus(version)?.books.iter().find(|b| {
            b.name.to_lowercase() == needle
                || b.short_name.to_lowercase() == needle
                || b.code.to_lowercase() == needle
        }).cloned()
    }

    fn books(&self, version: &str) -> Vec<Book> {
        self.corpus(version).map_or_else(Vec::new, |c| c.books.clone())
    }

    fn verse_at(
        &self,
        version: &str,
        book_rank: u32,
        chapter_rank: u32,
        verse_rank: u32,
    ) -> Option<Verse> {
        let corpus = self.corpus(version)?;
        // rank_all order is consistent with the coordinate order, so the
        // sorted vector supports coordinate binary search directly.
        corpus
            .verses
            .binary_search_by_key(&(book_rank, chapter_rank, verse_rank), |v| {
                (v.book_rank, v.chapter_rank, v.rank)
            })
            .ok()
            .map(|idx| corpus.verses[idx].clone())
    }

    fn last_verse_in(
        &self,
        version: &str,
        book_rank: u32,
        chapter_rank: Option<u32>,
    ) -> Option<Verse> {
        let corpus = self.corpus(version)?;
        let upper = corpus.verses.partition_point(|v| match chapter_rank {
            Some(c) => (v.book_rank, v.chapter_rank) <= (book_rank, c),
            None => v.book_rank <= book_rank,
        });
        let candidate = corpus.verses.get(upper.checked_sub(1)?)?;
        if candidate.book_rank != book_rank {
            return None;
        }
        if let Some(c) = chapter_rank {
            if candidate.chapter_rank != c {
                return None;
            }
        }
        Some(candidate.clone())
    }

    fn verses_in_range(
        &self,
        version: &str,
        start: u64,
        end: u64,
        offset: usize,
        limit: usize,
    ) -> (Vec<Verse>, u64) {
        let Some(corpus) = self.corpus(version) else {
            return (Vec::new(), 0);
        };
        if end < start {
            return (Vec::new(), 0);
        }
        let lo = corpus.verses.partition_point(|v| v.rank_all < start);
        let hi = corpus.verses.partition_point(|v| v.rank_all <= end);
        let total = (hi - lo) as u64;
        let page = corpus.verses[lo..hi]
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        (page, total)
    }

    fn verses_by_codes(&self, version: &str, codes: &[VerseCode]) -> Vec<Verse> {
        let Some(corpus) = self.corpus(version) else {
            return Vec::new();
        };
        codes
            .iter()
            .filter_map(|code| corpus.by_code.get(code.as_str()))
            .map(|&idx| corpus.verses[idx].clone())
            .collect()
    }

    fn known_versions(&self) -> Vec<String> {
        let mut versions: Vec<String> = self.versions.keys().cloned().collect();
        versions.sort();
        versions
    }

    fn version_meta(&self, version: &str) -> Option<VersionMeta> {
        self.corpus(version).map(|c| c.meta.clone())
    }

    fn all_versions(&self) -> Vec<VersionMeta> {
        let mut metas: Vec<VersionMeta> = self.versions.values().map(|c| c.meta.clone()).collect();
        metas.sort_by(|a, b| {
            (a.lang.code.as_str(), a.version.as_str()).cmp(&(b.lang.code.as_str(), b.version.as_str()))
        });
        metas
    }
}
