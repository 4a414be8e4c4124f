//! Frozen corpus data model.
//!
//! Entities are created once by the import pipeline and never mutated
//! afterward; every query-side component treats them as an immutable
//! snapshot. The absolute position `rank_all` is assigned at import and is
//! the sole key used for range slicing.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::VerseCode;

/// A language a bible version is written in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Full language name (e.g. "Malagasy").
    pub name: String,
    /// Short language code (e.g. "mg").
    pub code: String,
}

/// Testament/category a book belongs to.
///
/// Categories and their counts vary by version; apocryphal books exist in
/// some canons only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookCategory {
    /// Old Testament.
    Old,
    /// New Testament.
    New,
    /// Apocryphal / deuterocanonical books.
    Apocryphal,
}

impl BookCategory {
    /// Returns the display name of this category.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Old => "Old",
            Self::New => "New",
            Self::Apocryphal => "Apocryphal",
        }
    }

    /// Parse a category from its display name, case-insensitively.
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_lowercase().as_str() {
            "old" => Some(Self::Old),
            "new" => Some(Self::New),
            "apocryphal" => Some(Self::Apocryphal),
            _ => None,
        }
    }
}

impl fmt::Display for BookCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Metadata describing one immutable bible version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionMeta {
    /// Uppercase version identifier (e.g. "KJV"), unique.
    pub version: String,
    /// Free-text description of the edition.
    #[serde(default)]
    pub description: Option<String>,
    /// Publication year, when known.
    #[serde(default)]
    pub year: Option<i32>,
    /// Source the corpus was imported from.
    #[serde(default)]
    pub src: Option<String>,
    /// URL of the source, when applicable.
    #[serde(default)]
    pub src_url: Option<String>,
    /// Language of the version.
    pub lang: Language,
}

/// A book of a version, with its position in the canonical ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// 1-based position of the book within its version, contiguous.
    pub rank: u32,
    /// Full book name.
    pub name: String,
    /// Short display name (e.g. "Mat").
    pub short_name: String,
    /// Machine-stable book code (e.g. `mat_`), shared across versions.
    pub code: String,
    /// Testament/category.
    pub category: BookCategory,
    /// Optional free-text classification (e.g. "Gospels").
    #[serde(default)]
    pub classification: Option<String>,
    /// Number of chapters in this book.
    pub chapter_count: u32,
}

impl Book {
    /// Derived chapter code for a chapter rank within this book.
    #[must_use]
    pub fn chapter_code(&self, chapter_rank: u32) -> String {
        format!("{}.{}", self.code, chapter_rank)
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A single verse, carrying its full human-facing coordinates and its
/// absolute position within the version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// Rank of the owning book within the version.
    pub book_rank: u32,
    /// Rank of the owning chapter within the book.
    pub chapter_rank: u32,
    /// 1-based rank of the verse within its chapter.
    pub rank: u32,
    /// Absolute position within the version's total ordering; gapless,
    /// strictly increasing, assigned once at import.
    pub rank_all: u64,
    /// Stable content code (e.g. `mat_.05.01`), unique within the version.
    pub code: VerseCode,
    /// Optional subtitle preceding the verse content.
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Verse text.
    pub content: String,
}

impl fmt::Display for Verse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.book_rank, self.chapter_rank, self.rank)
    }
}
