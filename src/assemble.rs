//! Result assembly: pagination and neighbor derivation.
//!
//! Applies the offset/limit window to a resolved slice and derives the
//! verses immediately before and after the *unpaginated* slice boundaries,
//! for previous/next navigation.

use crate::corpus::Verse;
use crate::resolver::ResolvedRange;
use crate::store::VerseStore;

/// A paginated window over one resolved slice.
#[derive(Debug, Clone)]
pub struct AssembledSlice {
    /// The returned page, in `rank_all` order.
    pub results: Vec<Verse>,
    /// Full matching count, before pagination.
    pub total: u64,
    /// The verse just before the slice start, when it exists.
    pub previous: Option<Verse>,
    /// The verse just after the slice end, when it exists.
    pub next: Option<Verse>,
}

/// Assemble a page from a resolved range.
///
/// `previous`/`next` are evaluated against the original slice boundaries,
/// not the paginated sub-slice.
pub fn assemble(
    store: &dyn VerseStore,
    range: &ResolvedRange,
    offset: usize,
    limit: usize,
) -> AssembledSlice {
    let (results, total) = store.verses_in_range(
        &range.version,
        range.start_rank_all,
        range.end_rank_all,
        offset,
        limit,
    );

    let previous = range
        .start_rank_all
        .checked_sub(1)
        .filter(|&r| r > 0)
        .and_then(|r| single_at(store, &range.version, r));
    let next = range
        .end_rank_all
        .checked_add(1)
        .and_then(|r| single_at(store, &range.version, r));

    AssembledSlice { results, total, previous, next }
}

/// Fetch the single verse at an absolute position, if present.
fn single_at(store: &dyn VerseStore, version: &str, rank_all: u64) -> Option<Verse> {
    let (mut verses, _) = store.verses_in_range(version, rank_all, rank_all, 0, 1);
    verses.pop()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::corpus::{Language, Verse, VersionMeta};
    use crate::store::MemoryStore;
    use crate::types::VerseCode;

    fn store_with_line(count: u64) -> MemoryStore {
        let verses = (1..=count)
            .map(|i| Verse {
                book_rank: 1,
                chapter_rank: 1,
                rank: u32::try_from(i).unwrap_or(u32::MAX),
                rank_all: i,
                code: VerseCode::derive("tst_", 1, u32::try_from(i).unwrap_or(u32::MAX)),
                subtitle: None,
                content: format!("v{i}"),
            })
            .collect();
        let mut store = MemoryStore::new();
        store.insert_version(
            VersionMeta {
                version: "TST".to_string(),
                description: None,
                year: None,
                src: None,
                src_url: None,
                lang: Language { name: "English".to_string(), code: "en".to_string() },
            },
            Vec::new(),
            verses,
        );
        store
    }

    fn range(start: u64, end: u64) -> ResolvedRange {
        ResolvedRange {
            version: "TST".to_string(),
            start_rank_all: start,
            end_rank_all: end,
        }
    }

    #[test]
    fn neighbors_use_unpaginated_boundaries() {
        let store = store_with_line(10);
        let page = assemble(&store, &range(3, 7), 1, 2);
        assert_eq!(page.total, 5);
        assert_eq!(page.results.iter().map(|v| v.rank_all).collect::<Vec<_>>(), vec![4, 5]);
        assert_eq!(page.previous.map(|v| v.rank_all), Some(2));
        assert_eq!(page.next.map(|v| v.rank_all), Some(8));
    }

    #[test]
    fn neighbors_vanish_at_corpus_edges() {
        let store = store_with_line(5);
        let page = assemble(&store, &range(1, 5), 0, 100);
        assert!(page.previous.is_none());
        assert!(page.next.is_none());
    }

    #[test]
    fn pagination_pages_reconstruct_slice() {
        let store = store_with_line(9);
        let full = assemble(&store, &range(2, 8), 0, 100);
        let mut stitched = Vec::new();
        let mut offset = 0;
        loop {
            let page = assemble(&store, &range(2, 8), offset, 3);
            if page.results.is_empty() {
                break;
            }
            offset += page.results.len();
            stitched.extend(page.results);
        }
        assert_eq!(
            stitched.iter().map(|v| v.rank_all).collect::<Vec<_>>(),
            full.results.iter().map(|v| v.rank_all).collect::<Vec<_>>(),
        );
    }
}
