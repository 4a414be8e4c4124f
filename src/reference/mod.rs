//! Reference string parsing.
//!
//! Turns loose human notation like `"Rev.5:1,4-5,17,21; Acts 5:15-20,25"`
//! into structured tokens. A reference string is a semicolon-separated list
//! of segments; each segment is `[book] [chapter] [":" verse-list]`. A
//! segment without any letters inherits the previous segment's book
//! (`"Psa 23;24"` names two chapters of the same book).
//!
//! Parsing is tolerant by contract: an unparseable segment produces no token
//! and an unparseable verse-list piece is dropped, never an error.

use crate::constants::reference::{LIST_SEPARATOR, SEGMENT_SEPARATOR, VERSE_SEPARATOR};

/// One entry of a verse list: a bare verse or an inclusive dash-range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerseSpec {
    /// A single verse number.
    Single(u32),
    /// An inclusive verse range `a-b`.
    Range(u32, u32),
}

impl VerseSpec {
    /// First verse named by this spec.
    #[must_use]
    pub const fn start(self) -> u32 {
        match self {
            Self::Single(v) | Self::Range(v, _) => v,
        }
    }

    /// Last verse named by this spec.
    #[must_use]
    pub const fn end(self) -> u32 {
        match self {
            Self::Single(v) | Self::Range(_, v) => v,
        }
    }
}

/// A chapter number, possibly carrying a dash-range.
///
/// The parser passes chapter ranges through untouched; interpreting them is
/// the range resolver's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterSpec {
    /// First chapter.
    pub start: u32,
    /// Last chapter when the token carried a range.
    pub end: Option<u32>,
}

/// One parsed reference segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceToken {
    /// The original segment text, trimmed.
    pub text: String,
    /// Book identifier — written in the segment or inherited from the
    /// previous one.
    pub book: String,
    /// Chapter spec; `None` means the whole book.
    pub chapter: Option<ChapterSpec>,
    /// Verse list; empty means the whole chapter (or chapter range).
    pub verses: Vec<VerseSpec>,
}

/// Parse a full reference string into ordered tokens.
///
/// Segments that cannot be parsed (no book and nothing to inherit, or
/// digit-only junk next to a chapter) are skipped.
pub fn parse_references(input: &str) -> Vec<ReferenceToken> {
    let mut tokens = Vec::new();
    // The inherit-book rule as explicit parser state: each parsed segment
    // updates it, each bookless segment reads it.
    let mut last_book: Option<String> = None;

    for segment in input.split(SEGMENT_SEPARATOR) {
        if let Some(token) = parse_segment(segment, last_book.as_deref()) {
            last_book = Some(token.book.clone());
            tokens.push(token);
        }
    }

    tokens
}

/// Parse one semicolon-delimited segment.
fn parse_segment(segment: &str, inherited_book: Option<&str>) -> Option<ReferenceToken> {
    let text = segment.trim();
    if text.is_empty() {
        return None;
    }

    let (head, verse_part) = match text.split_once(VERSE_SEPARATOR) {
        Some((head, tail)) => (head, Some(tail)),
        None => (text, None),
    };

    let (book_part, chapter) = split_chapter_tail(head);

    let book = if book_part.chars().any(char::is_alphabetic) {
        book_part.to_string()
    } else if book_part.is_empty() {
        inherited_book?.to_string()
    } else {
        // Digit-only residue next to the chapter token ("1 23") is junk.
        return None;
    };

    // A verse list is only meaningful under a chapter; a book-only segment
    // with a stray colon still means the whole book.
    let verses = match (&chapter, verse_part) {
        (Some(_), Some(list)) => parse_verse_list(list),
        _ => Vec::new(),
    };

    Some(ReferenceToken {
        text: text.to_string(),
        book,
        chapter,
        verses,
    })
}

/// Split the part before the colon into a book prefix and a trailing
/// chapter token (`"23"` or `"120-123"`), scanning from the end.
fn split_chapter_tail(head: &str) -> (&str, Option<ChapterSpec>) {
    let trimmed = head.trim_end();
    let chars: Vec<(usize, char)> = trimmed.char_indices().collect();

    let (second_start, second) = scan_digits_back(&chars, chars.len());
    if second.is_empty() {
        return (strip_book(trimmed), None);
    }

    let mut cursor = skip_whitespace_back(&chars, second_start);
    let mut first = second.clone();
    let mut tail_start = second_start;

    if cursor > 0 && is_dash(chars[cursor - 1].1) {
        cursor = skip_whitespace_back(&chars, cursor - 1);
        let (lo_start, lo) = scan_digits_back(&chars, cursor);
        if !lo.is_empty() {
            first = lo;
            tail_start = lo_start;
        }
    }

    let start: u32 = match first.parse() {
        Ok(n) => n,
        Err(_) => return (strip_book(trimmed), None),
    };
    let end = if tail_start == second_start {
        None
    } else {
        second.parse::<u32>().ok()
    };

    let book_end = chars
        .get(tail_start)
        .map_or(trimmed.len(), |&(byte_idx, _)| byte_idx);
    (
        strip_book(&trimmed[..book_end]),
        Some(ChapterSpec { start, end }),
    )
}

/// Collect the maximal digit run ending just before `end` (a char index),
/// returning its starting char index and the digits in order.
fn scan_digits_back(chars: &[(usize, char)], end: usize) -> (usize, String) {
    let mut start = end;
    while start > 0 && chars[start - 1].1.is_ascii_digit() {
        start -= 1;
    }
    let digits = chars[start..end].iter().map(|&(_, c)| c).collect();
    (start, digits)
}

/// Step a char index left over whitespace.
fn skip_whitespace_back(chars: &[(usize, char)], mut idx: usize) -> usize {
    while idx > 0 && chars[idx - 1].1.is_whitespace() {
        idx -= 1;
    }
    idx
}

/// Trim a raw book token: surrounding whitespace and the trailing dot of
/// abbreviations like `"Rev."`.
fn strip_book(raw: &str) -> &str {
    raw.trim().trim_end_matches('.').trim_end()
}

const fn is_dash(c: char) -> bool {
    matches!(c, '-' | '\u{2013}')
}

/// Parse a comma-separated verse list, dropping unparseable pieces.
fn parse_verse_list(list: &str) -> Vec<VerseSpec> {
    list.split(LIST_SEPARATOR)
        .filter_map(parse_verse_spec)
        .collect()
}

/// Parse one verse-list piece: `"7"` or `"4-5"` (hyphen or en-dash).
fn parse_verse_spec(piece: &str) -> Option<VerseSpec> {
    let piece = piece.trim();
    if piece.is_empty() {
        return None;
    }

    match piece.split_once(is_dash) {
        Some((lo, hi)) => {
            let lo: u32 = lo.trim().parse().ok()?;
            let hi: u32 = hi.trim().parse().ok()?;
            Some(VerseSpec::Range(lo, hi))
        }
        None => piece.parse().ok().map(VerseSpec::Single),
    }
}
