//! Canonical-order range resolution.
//!
//! Converts a (from, to) locator pair — each a (book, chapter, verse)
//! triple with any field optionally omitted — into a pair of absolute
//! `rank_all` positions. One algorithm serves every call shape: single
//! verse, same-chapter range, cross-chapter range, and cross-book range are
//! only different default-fill outcomes of the same steps.

use crate::error::{Error, Result};
use crate::index::CanonicalIndex;
use crate::reference::ReferenceToken;
use crate::store::VerseStore;

/// How a locator names its book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookId {
    /// By canonical rank within the version (explicit range queries).
    Rank(u32),
    /// By name, short name, or code (reference queries).
    Named(String),
}

/// A point in the corpus; any field may be omitted and default-filled by
/// the resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Locator {
    /// Book of the locator.
    pub book: Option<BookId>,
    /// Chapter rank within the book.
    pub chapter: Option<u32>,
    /// Verse rank within the chapter.
    pub verse: Option<u32>,
}

impl Locator {
    /// Locator naming a book by rank.
    #[must_use]
    pub const fn at_rank(book_rank: u32, chapter: Option<u32>, verse: Option<u32>) -> Self {
        Self { book: Some(BookId::Rank(book_rank)), chapter, verse }
    }

    /// Locator naming a book by identifier.
    pub fn named(book: impl Into<String>, chapter: Option<u32>, verse: Option<u32>) -> Self {
        Self { book: Some(BookId::Named(book.into())), chapter, verse }
    }
}

/// A resolved inclusive slice of a version's absolute ordering.
///
/// `end_rank_all < start_rank_all` denotes an empty slice; that is a valid
/// answer, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRange {
    /// Version the positions belong to (`rank_all` is version-local).
    pub version: String,
    /// Absolute position of the first verse.
    pub start_rank_all: u64,
    /// Absolute position of the last verse.
    pub end_rank_all: u64,
}

impl ResolvedRange {
    /// Whether the slice selects no verses.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end_rank_all < self.start_rank_all
    }
}

/// Resolve a locator pair into absolute positions.
///
/// Returns `Ok(None)` when either endpoint does not exist in the corpus
/// (nonexistent rank, chapter, or verse) — an empty answer, not an error.
/// Raises [`Error::BookNotFound`] for a named book with no match and
/// [`Error::InvalidRange`] when `to` precedes `from` at book or chapter
/// granularity.
pub fn resolve_span(
    store: &dyn VerseStore,
    index: &CanonicalIndex,
    version: &str,
    from: &Locator,
    to: &Locator,
) -> Result<Option<ResolvedRange>> {
    // Step 1: the starting book is required and resolved first, so invalid
    // references fail before any verse lookups run.
    let from_rank = match &from.book {
        Some(id) => resolve_book_rank(store, index, version, id)?,
        None => return Err(Error::InvalidRange("from_book is required")),
    };

    // Step 2: a missing destination book means "same book".
    let to_rank = match &to.book {
        Some(id) => resolve_book_rank(store, index, version, id)?,
        None => from_rank,
    };

    // Step 3.
    if to_rank < from_rank {
        return Err(Error::InvalidRange("to_book precedes from_book"));
    }

    // Step 4: missing destination chapter defaults to the from-chapter
    // within one book, and to "end of destination book" across books.
    let same_book = to_rank == from_rank;
    let to_chapter = if to.chapter.is_some() {
        to.chapter
    } else if same_book {
        from.chapter
    } else {
        None
    };

    // Step 5.
    if let (true, Some(fc), Some(tc)) = (same_book, from.chapter, to_chapter) {
        if tc < fc {
            return Err(Error::InvalidRange("to_chapter precedes from_chapter"));
        }
    }

    // Step 6: the start is an exact verse, defaulting to the chapter's (and
    // book's) first.
    let start = store.verse_at(
        version,
        from_rank,
        from.chapter.unwrap_or(1),
        from.verse.unwrap_or(1),
    );

    // Step 7: an explicit end verse is located exactly; otherwise the end is
    // the last verse of the destination chapter (or book, when no chapter
    // applies).
    let end = match (to_chapter, to.verse) {
        (Some(chapter), Some(verse)) => store.verse_at(version, to_rank, chapter, verse),
        (None, Some(_)) => None,
        (chapter, None) => store.last_verse_in(version, to_rank, chapter),
    };

    // Step 8: an unlocatable endpoint resolves to the empty answer.
    let (Some(start), Some(end)) = (start, end) else {
        return Ok(None);
    };

    // Step 9.
    Ok(Some(ResolvedRange {
        version: version.to_string(),
        start_rank_all: start.rank_all,
        end_rank_all: end.rank_all,
    }))
}

/// Resolve a [`BookId`] to a book rank.
///
/// Named lookups that miss raise [`Error::BookNotFound`]; rank lookups are
/// passed through untouched — a nonexistent rank simply locates no verses
/// downstream.
fn resolve_book_rank(
    store: &dyn VerseStore,
    index: &CanonicalIndex,
    version: &str,
    id: &BookId,
) -> Result<u32> {
    match id {
        BookId::Rank(rank) => Ok(*rank),
        BookId::Named(name) => index
            .resolve_book(store, version, name)
            .map(|b| b.rank)
            .ok_or_else(|| Error::book_not_found(version, name.clone())),
    }
}

/// Expand a parsed reference token into locator pairs, one per verse spec.
///
/// An empty verse list yields the whole chapter (or the whole chapter
/// dash-range); a token without a chapter yields the whole book. A verse
/// list attached to a chapter dash-range is ignored — chapter ranges are
/// whole-chapter spans.
#[must_use]
pub fn token_spans(token: &ReferenceToken) -> Vec<(Locator, Locator)> {
    let book = || Some(BookId::Named(token.book.clone()));

    let Some(chapter) = token.chapter else {
        // Whole book: first verse of chapter 1 through the book's last verse.
        return vec![(
            Locator { book: book(), chapter: None, verse: None },
            Locator { book: book(), chapter: None, verse: None },
        )];
    };

    if let Some(end_chapter) = chapter.end {
        return vec![(
            Locator { book: book(), chapter: Some(chapter.start), verse: None },
            Locator { book: book(), chapter: Some(end_chapter), verse: None },
        )];
    }

    if token.verses.is_empty() {
        return vec![(
            Locator { book: book(), chapter: Some(chapter.start), verse: None },
            Locator { book: book(), chapter: Some(chapter.start), verse: None },
        )];
    }

    token
        .verses
        .iter()
        .map(|spec| {
            (
                Locator { book: book(), chapter: Some(chapter.start), verse: Some(spec.start()) },
                Locator { book: book(), chapter: Some(chapter.start), verse: Some(spec.end()) },
            )
        })
        .collect()
}
