//! Verse, book, and bible lookup service.
//!
//! The single entry point callers (an HTTP layer or the CLI) talk to. Every
//! method is a pure function of the frozen corpus snapshot: same inputs,
//! same ordered output.

use serde::Serialize;

use crate::assemble::assemble;
use crate::corpus::{Book, BookCategory, Verse, VersionMeta};
use crate::error::{Error, Result};
use crate::index::CanonicalIndex;
use crate::reference::parse_references;
use crate::resolver::{resolve_span, token_spans, Locator, ResolvedRange};
use crate::services::align::{align, normalize_versions, TranslationSet};
use crate::store::VerseStore;
use crate::types::VerseCode;

/// A paginated list page with its full pre-pagination count.
#[derive(Debug, Clone, Serialize)]
pub struct ListPage<T> {
    /// The returned page.
    pub results: Vec<T>,
    /// Returned page size.
    pub count: usize,
    /// Full matching count before pagination.
    pub total: u64,
    /// Window offset the page was produced with.
    pub offset: usize,
}

impl<T> ListPage<T> {
    fn window(items: Vec<T>, offset: usize, limit: usize) -> Self {
        let total = items.len() as u64;
        let results: Vec<T> = items.into_iter().skip(offset).take(limit).collect();
        Self { count: results.len(), total, offset, results }
    }
}

/// A paginated verse page with navigation and translation side-lists.
#[derive(Debug, Clone, Serialize)]
pub struct VersePage {
    /// The returned verses, in absolute order.
    pub results: Vec<Verse>,
    /// Returned page size.
    pub count: usize,
    /// Full matching count before pagination.
    pub total: u64,
    /// Window offset the page was produced with.
    pub offset: usize,
    /// The verse just before the slice, when the query resolved to one
    /// contiguous range.
    pub previous: Option<Verse>,
    /// The verse just after the slice, when the query resolved to one
    /// contiguous range.
    pub next: Option<Verse>,
    /// Aligned verses per requested secondary version.
    pub trans: Vec<TranslationSet>,
}

impl VersePage {
    const fn empty(offset: usize) -> Self {
        Self {
            results: Vec::new(),
            count: 0,
            total: 0,
            offset,
            previous: None,
            next: None,
            trans: Vec::new(),
        }
    }
}

/// Lookup facade over a verse store.
#[derive(Debug)]
pub struct LookupService<S: VerseStore> {
    store: S,
    index: CanonicalIndex,
}

impl<S: VerseStore> LookupService<S> {
    /// Create a service over a store.
    pub fn new(store: S) -> Self {
        Self { store, index: CanonicalIndex::new() }
    }

    /// Access the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store, for administrative
    /// operations. The canonical index is invalidated wholesale, since any
    /// mutation here is a rare out-of-band import or removal.
    pub fn store_mut(&mut self) -> &mut S {
        self.index = CanonicalIndex::new();
        &mut self.store
    }

    /// Search bible versions by language code and/or version identifier.
    pub fn search_bibles(
        &self,
        lang: Option<&str>,
        version: Option<&str>,
        offset: usize,
        limit: usize,
    ) -> ListPage<VersionMeta> {
        let lang = lang.map(str::to_lowercase);
        let version = version.map(str::to_uppercase);
        let matches: Vec<VersionMeta> = self
            .store
            .all_versions()
            .into_iter()
            .filter(|m| lang.as_ref().is_none_or(|l| m.lang.code.to_lowercase() == *l))
            .filter(|m| version.as_ref().is_none_or(|v| m.version.to_uppercase() == *v))
            .collect();
        ListPage::window(matches, offset, limit)
    }

    /// Search books of a version, optionally filtered by category or short
    /// name (case-insensitive).
    pub fn search_books(
        &self,
        version: &str,
        category: Option<BookCategory>,
        short_name: Option<&str>,
        offset: usize,
        limit: usize,
    ) -> Result<ListPage<Book>> {
        self.require_version(version)?;
        let short = short_name.map(str::to_lowercase);
        let matches: Vec<Book> = self
            .store
            .books(version)
            .into_iter()
            .filter(|b| category.is_none_or(|c| b.category == c))
            .filter(|b| short.as_ref().is_none_or(|s| b.short_name.to_lowercase() == *s))
            .collect();
        Ok(ListPage::window(matches, offset, limit))
    }

    /// Resolve an explicit locator pair into a verse page.
    ///
    /// Raises [`Error::InvalidRange`] when `to` precedes `from` and
    /// [`Error::BookNotFound`] for a named book with no match; nonexistent
    /// chapters and verses yield an empty page.
    pub fn search_verses(
        &self,
        version: &str,
        from: &Locator,
        to: &Locator,
        offset: usize,
        limit: usize,
        trans: &[String],
    ) -> Result<VersePage> {
        self.require_version(version)?;

        let Some(range) = resolve_span(&self.store, &self.index, version, from, to)? else {
            return Ok(VersePage::empty(offset));
        };

        Ok(self.page_from_ranges(version, &[range], offset, limit, trans))
    }

    /// Resolve a loose reference string ("Rev.5:1,4-5; Acts 5:15-20") into a
    /// verse page concatenating every segment's slice in order.
    ///
    /// Segments naming unknown books are skipped (empty contribution), per
    /// the tolerant-parsing contract; an inverted chapter range is still a
    /// rejected request.
    pub fn search_by_reference(
        &self,
        version: &str,
        reference: &str,
        offset: usize,
        limit: usize,
        trans: &[String],
    ) -> Result<VersePage> {
        self.require_version(version)?;

        let tokens = parse_references(reference);
        tracing::debug!("reference {reference:?} parsed into {} segment(s)", tokens.len());

        let mut ranges = Vec::new();
        for token in &tokens {
            for (from, to) in token_spans(token) {
                match resolve_span(&self.store, &self.index, version, &from, &to) {
                    Ok(Some(range)) => ranges.push(range),
                    Ok(None) => {}
                    // An unknown book in a reference is an empty answer.
                    Err(Error::BookNotFound { .. }) => break,
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(self.page_from_ranges(version, &ranges, offset, limit, trans))
    }

    /// Build a verse page from resolved ranges.
    ///
    /// A single range pages through the store directly and carries
    /// previous/next; multiple ranges are concatenated in request order and
    /// windowed over the concatenation.
    fn page_from_ranges(
        &self,
        version: &str,
        ranges: &[ResolvedRange],
        offset: usize,
        limit: usize,
        trans: &[String],
    ) -> VersePage {
        let mut page = match ranges {
            [] => VersePage::empty(offset),
            [range] => {
                let assembled = assemble(&self.store, range, offset, limit);
                VersePage {
                    count: assembled.results.len(),
                    total: assembled.total,
                    offset,
                    results: assembled.results,
                    previous: assembled.previous,
                    next: assembled.next,
                    trans: Vec::new(),
                }
            }
            _ => {
                let mut all = Vec::new();
                let mut total = 0u64;
                for range in ranges {
                    let (verses, count) = self.store.verses_in_range(
                        &range.version,
                        range.start_rank_all,
                        range.end_rank_all,
                        0,
                        usize::MAX,
                    );
                    total += count;
                    all.extend(verses);
                }
                let results: Vec<Verse> = all.into_iter().skip(offset).take(limit).collect();
                VersePage {
                    count: results.len(),
                    total,
                    offset,
                    results,
                    previous: None,
                    next: None,
                    trans: Vec::new(),
                }
            }
        };

        if !trans.is_empty() && !page.results.is_empty() {
            let versions = normalize_versions(&self.store, version, trans);
            let codes: Vec<VerseCode> =
                page.results.iter().map(|v| v.code.clone()).collect();
            page.trans = align(&self.store, &codes, &versions);
        }

        page
    }

    /// Error out when the primary version is unknown to the store.
    fn require_version(&self, version: &str) -> Result<()> {
        if self.store.version_meta(version).is_none() {
            return Err(Error::VersionNotFound(version.to_string()));
        }
        Ok(())
    }
}
