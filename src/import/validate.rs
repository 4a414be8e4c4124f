//! Post-import corpus validation.
//!
//! A closed set of rules checked against the freshly built corpus before it
//! is registered. Rules name expectations about the source edition (book
//! counts, spot-checked verse text) and catch import drift early.

use crate::constants::corpus::PLACEHOLDER_CONTENT;
use crate::corpus::{Book, BookCategory, Verse};
use crate::error::{Error, Result};

/// One validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Total number of books.
    BookCount(u32),
    /// Number of books in one category.
    BookCountByCategory(BookCategory, u32),
    /// Category of the book at a rank.
    CategoryAt {
        /// Book rank.
        book_rank: u32,
        /// Expected category.
        expected: BookCategory,
    },
    /// Chapter count of one book.
    ChapterCount {
        /// Book rank.
        book_rank: u32,
        /// Expected chapter count.
        expected: u32,
    },
    /// Verse count of one chapter.
    VerseCount {
        /// Book rank.
        book_rank: u32,
        /// Chapter rank.
        chapter_rank: u32,
        /// Expected verse count.
        expected: u32,
    },
    /// Exact text of one verse.
    VerseText {
        /// Book rank.
        book_rank: u32,
        /// Chapter rank.
        chapter_rank: u32,
        /// Verse rank.
        verse_rank: u32,
        /// Expected content.
        expected: String,
    },
    /// No stored verse has empty or placeholder content.
    AllVersesPresent,
}

/// Check every rule against the corpus; the first failure aborts.
pub fn check(version: &str, books: &[Book], verses: &[Verse], rules: &[Rule]) -> Result<()> {
    for rule in rules {
        tracing::debug!("checking rule {rule:?}");
        apply(version, books, verses, rule)?;
    }
    Ok(())
}

fn apply(version: &str, books: &[Book], verses: &[Verse], rule: &Rule) -> Result<()> {
    match rule {
        Rule::BookCount(expected) => {
            let actual = u32::try_from(books.len()).unwrap_or(u32::MAX);
            if actual != *expected {
                return fail(version, format!("expected {expected} books, found {actual}"));
            }
        }
        Rule::BookCountByCategory(category, expected) => {
            let actual =
                u32::try_from(books.iter().filter(|b| b.category == *category).count())
                    .unwrap_or(u32::MAX);
            if actual != *expected {
                return fail(
                    version,
                    format!("expected {expected} {category} books, found {actual}"),
                );
            }
        }
        Rule::CategoryAt { book_rank, expected } => {
            let actual = books.iter().find(|b| b.rank == *book_rank).map(|b| b.category);
            if actual != Some(*expected) {
                return fail(
                    version,
                    format!("book {book_rank} expected category {expected}, found {actual:?}"),
                );
            }
        }
        Rule::ChapterCount { book_rank, expected } => {
            let actual = books.iter().find(|b| b.rank == *book_rank).map(|b| b.chapter_count);
            if actual != Some(*expected) {
                return fail(
                    version,
                    format!("book {book_rank} expected {expected} chapters, found {actual:?}"),
                );
            }
        }
        Rule::VerseCount { book_rank, chapter_rank, expected } => {
            let actual = u32::try_from(
                verses
                    .iter()
                    .filter(|v| v.book_rank == *book_rank && v.chapter_rank == *chapter_rank)
                    .count(),
            )
            .unwrap_or(u32::MAX);
            if actual != *expected {
                return fail(
                    version,
                    format!(
                        "chapter {book_rank}.{chapter_rank} expected {expected} verses, found {actual}"
                    ),
                );
            }
        }
        Rule::VerseText { book_rank, chapter_rank, verse_rank, expected } => {
            let actual = verses.iter().find(|v| {
                v.book_rank == *book_rank
                    && v.chapter_rank == *chapter_rank
                    && v.rank == *verse_rank
            });
            if actual.map(|v| v.content.as_str()) != Some(expected.as_str()) {
                return fail(
                    version,
                    format!("verse {book_rank}.{chapter_rank}.{verse_rank} text mismatch"),
                );
            }
        }
        Rule::AllVersesPresent => {
            let missing = verses
                .iter()
                .filter(|v| v.content.is_empty() || v.content == PLACEHOLDER_CONTENT)
                .count();
            if missing > 0 {
                return fail(version, format!("{missing} verse(s) empty or placeholder"));
            }
        }
    }
    Ok(())
}

fn fail(version: &str, message: String) -> Result<()> {
    Err(Error::validation(version, message))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::types::VerseCode;

    fn book(rank: u32, category: BookCategory, chapter_count: u32) -> Book {
        Book {
            rank,
            name: format!("Book {rank}"),
            short_name: format!("B{rank}"),
            code: format!("b{rank}_"),
            category,
            classification: None,
            chapter_count,
        }
    }

    fn verse(book_rank: u32, chapter_rank: u32, rank: u32, rank_all: u64, content: &str) -> Verse {
        Verse {
            book_rank,
            chapter_rank,
            rank,
            rank_all,
            code: VerseCode::derive("b1_", chapter_rank, rank),
            subtitle: None,
            content: content.to_string(),
        }
    }

    #[test]
    fn passing_rules_are_silent() {
        let books = vec![book(1, BookCategory::Old, 2), book(2, BookCategory::New, 1)];
        let verses = vec![verse(1, 1, 1, 1, "text"), verse(1, 1, 2, 2, "more")];
        let rules = vec![
            Rule::BookCount(2),
            Rule::BookCountByCategory(BookCategory::Old, 1),
            Rule::CategoryAt { book_rank: 2, expected: BookCategory::New },
            Rule::ChapterCount { book_rank: 1, expected: 2 },
            Rule::VerseCount { book_rank: 1, chapter_rank: 1, expected: 2 },
            Rule::VerseText {
                book_rank: 1,
                chapter_rank: 1,
                verse_rank: 1,
                expected: "text".to_string(),
            },
            Rule::AllVersesPresent,
        ];
        assert!(check("TST", &books, &verses, &rules).is_ok());
    }

    #[test]
    fn failing_rule_names_the_problem() {
        let books = vec![book(1, BookCategory::Old, 2)];
        let err = check("TST", &books, &[], &[Rule::BookCount(66)]).unwrap_err();
        assert!(err.to_string().contains("expected 66 books"));
    }

    #[test]
    fn placeholder_content_fails_presence_rule() {
        let verses = vec![verse(1, 1, 1, 1, "???")];
        let err = check("TST", &[], &verses, &[Rule::AllVersesPresent]).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }
}
