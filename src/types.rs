//! Core type definitions for compile-time safety.
//!
//! This module provides newtype wrappers around string identifiers to prevent
//! accidental mixing of different ID types at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Version identifier, normalized to uppercase.
///
/// Version identity is case-insensitive throughout the system; normalizing
/// once at the boundary lets every internal map use plain equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionId(String);

impl VersionId {
    /// Create a new `VersionId`, uppercasing the input.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_uppercase())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VersionId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for VersionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for VersionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Stable verse content code (e.g. `mat_.05.01`).
///
/// The code names the "same" verse across versions and is the alignment key
/// for translation cross-references.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerseCode(pub String);

impl VerseCode {
    /// Build a verse code from its parts.
    pub fn derive(book_code: &str, chapter_rank: u32, verse_rank: u32) -> Self {
        Self(format!("{book_code}.{chapter_rank:02}.{verse_rank:02}"))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VerseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VerseCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VerseCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for VerseCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
