//! Corpus import pipeline.
//!
//! Builds a version's frozen corpus from a source file, assigning canonical
//! book codes, derived verse codes, and the absolute ordering `rank_all` —
//! once, at import time. Source formats are a closed set; adding a format
//! means adding a variant and its reader, not a string tag.

pub mod validate;

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::constants::corpus::{CANONICAL_BOOK_COUNT, FIRST_NEW_TESTAMENT_RANK, PLACEHOLDER_CONTENT};
use crate::corpus::{Book, BookCategory, Language, Verse, VersionMeta};
use crate::error::{Error, Result};
use crate::store::MemoryStore;
use crate::types::{VerseCode, VersionId};
use validate::Rule;

/// Known corpus source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// A JSON document in the exchange schema ([`BibleDoc`]).
    Json,
    /// A Bicaso ZIP archive of tab-separated book/verse files.
    BicasoZip,
}

/// Languages known to the importer.
///
/// Mirrors the seed set of the canonical deployment; a source naming any
/// other language is rejected at construction time.
#[must_use]
pub fn default_languages() -> Vec<Language> {
    [
        ("en", "English"),
        ("fr", "French"),
        ("mg", "Malagasy"),
        ("de", "German"),
        ("el", "Greek"),
        ("he", "Hebrew"),
    ]
    .into_iter()
    .map(|(code, name)| Language { name: name.to_string(), code: code.to_string() })
    .collect()
}

lazy_static! {
    /// Canonical book codes by rank in the standard 66-book ordering.
    static ref BOOK_CODES: HashMap<u32, &'static str> = {
        let mut m = HashMap::new();
        m.insert(1, "gen_");
        m.insert(2, "exo_");
        m.insert(3, "lev_");
        m.insert(4, "num_");
        m.insert(5, "deu_");
        m.insert(6, "josh_");
        m.insert(7, "jud_");
        m.insert(8, "rut_");
        m.insert(9, "1sam_");
        m.insert(10, "2sam_");
        m.insert(11, "1kin_");
        m.insert(12, "2kin_");
        m.insert(13, "1chr_");
        m.insert(14, "2chr_");
        m.insert(15, "ezr_");
        m.insert(16, "neh_");
        m.insert(17, "est_");
        m.insert(18, "job_");
        m.insert(19, "psa_");
        m.insert(20, "pro_");
        m.insert(21, "ecc_");
        m.insert(22, "song_");
        m.insert(23, "isa_");
        m.insert(24, "jer_");
        m.insert(25, "lam_");
        m.insert(26, "eze_");
        m.insert(27, "dan_");
        m.insert(28, "hos_");
        m.insert(29, "joe_");
        m.insert(30, "amos_");
        m.insert(31, "oba_");
        m.insert(32, "jon_");
        m.insert(33, "mic_");
        m.insert(34, "nah_");
        m.insert(35, "hab_");
        m.insert(36, "zep_");
        m.insert(37, "hag_");
        m.insert(38, "zec_");
        m.insert(39, "mal_");
        m.insert(40, "mat_");
        m.insert(41, "mar_");
        m.insert(42, "luk_");
        m.insert(43, "joh_");
        m.insert(44, "act_");
        m.insert(45, "rom_");
        m.insert(46, "1cor_");
        m.insert(47, "2cor_");
        m.insert(48, "gal_");
        m.insert(49, "eph_");
        m.insert(50, "phi_");
        m.insert(51, "col_");
        m.insert(52, "1the_");
        m.insert(53, "2the_");
        m.insert(54, "1tim_");
        m.insert(55, "2tim_");
        m.insert(56, "tit_");
        m.insert(57, "phl_");
        m.insert(58, "heb_");
        m.insert(59, "jam_");
        m.insert(60, "1pet_");
        m.insert(61, "2pet_");
        m.insert(62, "1joh_");
        m.insert(63, "2joh_");
        m.insert(64, "3joh_");
        m.insert(65, "jude_");
        m.insert(66, "rev_");
        m
    };
}

/// Regex splitting a `[subtitle] content` verse line.
#[allow(clippy::expect_used)]
static RE_SUBTITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\[.*\])\s*(\S.*)$").expect("valid regex: RE_SUBTITLE")
});

/// Exchange-format JSON document describing one bible version.
#[derive(Debug, Deserialize)]
pub struct BibleDoc {
    /// Version identifier.
    pub version: String,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Publication year.
    #[serde(default)]
    pub year: Option<i32>,
    /// Source the corpus came from.
    #[serde(default)]
    pub src: Option<String>,
    /// Source URL.
    #[serde(default)]
    pub src_url: Option<String>,
    /// Language of the version.
    pub lang: LanguageDoc,
    /// Books in canonical order.
    pub books: Vec<BookDoc>,
}

/// Language reference within a [`BibleDoc`].
#[derive(Debug, Deserialize)]
pub struct LanguageDoc {
    /// Language name; informational, the code is authoritative.
    #[serde(default)]
    pub name: Option<String>,
    /// Language code (e.g. "en").
    pub code: String,
}

/// One book within a [`BibleDoc`].
#[derive(Debug, Deserialize)]
pub struct BookDoc {
    /// 1-based canonical rank.
    pub rank: u32,
    /// Full name.
    pub name: String,
    /// Short name; derived from the name when absent.
    #[serde(default)]
    pub short_name: Option<String>,
    /// Book code; overridden by the canonical table for ranks 1-66.
    #[serde(default)]
    pub code: Option<String>,
    /// Category name ("Old", "New", "Apocryphal").
    pub category: String,
    /// Free-text classification.
    #[serde(default)]
    pub classification: Option<String>,
    /// Chapters in rank order.
    #[serde(default)]
    pub chapters: Vec<ChapterDoc>,
}

/// One chapter within a [`BookDoc`].
#[derive(Debug, Deserialize)]
pub struct ChapterDoc {
    /// 1-based rank within the book.
    pub rank: u32,
    /// Verses in rank order.
    #[serde(default)]
    pub verses: Vec<VerseDoc>,
}

/// One verse within a [`ChapterDoc`].
#[derive(Debug, Deserialize)]
pub struct VerseDoc {
    /// 1-based rank within the chapter.
    pub rank: u32,
    /// Optional subtitle preceding the verse.
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Verse text.
    pub content: String,
}

/// Imports one version's corpus into a [`MemoryStore`].
#[derive(Debug)]
pub struct BibleImporter<'a> {
    store: &'a mut MemoryStore,
    language: Language,
    version: String,
    rules: Vec<Rule>,
}

impl<'a> BibleImporter<'a> {
    /// Create an importer for a version in a given language.
    ///
    /// The language code must be one of [`default_languages`].
    pub fn new(store: &'a mut MemoryStore, lang_code: &str, version: &str) -> Result<Self> {
        let language = default_languages()
            .into_iter()
            .find(|l| l.code.eq_ignore_ascii_case(lang_code))
            .ok_or_else(|| {
                Error::config(
                    format!("source language {lang_code} not registered"),
                    "Register the language before importing a version in it",
                )
            })?;
        Ok(Self {
            store,
            language,
            version: VersionId::new(version).as_str().to_string(),
            rules: Vec::new(),
        })
    }

    /// Attach validation rules to run after the corpus is built.
    #[must_use]
    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    /// Import from a source file, validate, and register the version.
    ///
    /// Importing a version the store already holds is a no-op.
    pub fn run(&mut self, format: SourceFormat, path: &Path) -> Result<()> {
        if self.store.has_version(&self.version) {
            tracing::info!("version {} already present, skipping import", self.version);
            return Ok(());
        }

        let doc = match format {
            SourceFormat::Json => load_json_doc(path)?,
            SourceFormat::BicasoZip => load_bicaso_doc(path, &self.version)?,
        };
        self.ingest(doc)
    }

    /// Build the frozen corpus from an already-loaded document and register
    /// it with the store.
    pub fn ingest(&mut self, doc: BibleDoc) -> Result<()> {
        if self.store.has_version(&self.version) {
            tracing::info!("version {} already present, skipping import", self.version);
            return Ok(());
        }

        let (meta, books, verses) = self.freeze(doc)?;
        validate::check(&self.version, &books, &verses, &self.rules)?;

        tracing::info!(
            "version {} imported: {} book(s), {} verse(s)",
            self.version,
            books.len(),
            verses.len(),
        );
        self.store.insert_version(meta, books, verses);
        Ok(())
    }

    /// Turn a source document into the frozen (meta, books, verses) triple,
    /// assigning codes and `rank_all`.
    fn freeze(&self, doc: BibleDoc) -> Result<(VersionMeta, Vec<Book>, Vec<Verse>)> {
        let meta = VersionMeta {
            version: self.version.clone(),
            description: doc.description,
            year: doc.year,
            src: doc.src,
            src_url: doc.src_url,
            lang: self.language.clone(),
        };

        let mut book_docs = doc.books;
        book_docs.sort_by_key(|b| b.rank);

        let mut books = Vec::with_capacity(book_docs.len());
        let mut verses = Vec::new();
        let mut rank_all = 0u64;

        for mut book_doc in book_docs {
            let code = book_code(&book_doc);
            let short_name = derive_short_name(&book_doc);
            let category = BookCategory::parse(&book_doc.category).ok_or_else(|| {
                Error::import(
                    &self.version,
                    format!("unknown category {:?} for book {}", book_doc.category, book_doc.name),
                )
            })?;

            book_doc.chapters.sort_by_key(|c| c.rank);
            books.push(Book {
                rank: book_doc.rank,
                name: book_doc.name,
                short_name,
                code: code.clone(),
                category,
                classification: book_doc.classification,
                chapter_count: u32::try_from(book_doc.chapters.len()).unwrap_or(u32::MAX),
            });

            for mut chapter in book_doc.chapters {
                chapter.verses.sort_by_key(|v| v.rank);
                for verse in chapter.verses {
                    // Placeholder rows mark verses absent from this
                    // translation; they are not stored and get no rank_all.
                    if verse.content.is_empty() || verse.content == PLACEHOLDER_CONTENT {
                        continue;
                    }
                    rank_all += 1;
                    verses.push(Verse {
                        book_rank: books[books.len() - 1].rank,
                        chapter_rank: chapter.rank,
                        rank: verse.rank,
                        rank_all,
                        code: VerseCode::derive(&code, chapter.rank, verse.rank),
                        subtitle: verse.subtitle,
                        content: verse.content,
                    });
                }
            }
        }

        Ok((meta, books, verses))
    }
}

/// Canonical code for a book: the rank table for the standard ordering,
/// the document's own code otherwise, derived from the name as a last
/// resort.
fn book_code(book: &BookDoc) -> String {
    if let Some(code) = BOOK_CODES.get(&book.rank) {
        return (*code).to_string();
    }
    if let Some(code) = &book.code {
        if !code.is_empty() {
            return code.clone();
        }
    }
    let stem: String = book
        .name
        .to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(4)
        .collect();
    format!("{stem}_")
}

/// Derive a display short name when the source has none: numbered books
/// keep five characters, others three, capitalized.
fn derive_short_name(book: &BookDoc) -> String {
    let raw = book.short_name.clone().filter(|s| !s.is_empty()).unwrap_or_else(|| {
        let take = if book.name.starts_with(|c: char| c.is_ascii_digit()) { 5 } else { 3 };
        book.name.chars().take(take).collect()
    });
    let mut chars = raw.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}

/// Load an exchange-format JSON document.
pub fn load_json_doc(path: &Path) -> Result<BibleDoc> {
    let text = fs_err::read_to_string(path)
        .map_err(|e| Error::io(e, Some(path.to_path_buf())))?;
    serde_json::from_str(&text).map_err(|e| Error::parse(e.to_string(), Some(path.to_path_buf())))
}

/// Import a self-describing JSON corpus file, returning the version it
/// registered. Version and language come from the document itself.
pub fn import_json_file(store: &mut MemoryStore, path: &Path) -> Result<String> {
    let doc = load_json_doc(path)?;
    let version = VersionId::new(&doc.version).as_str().to_string();
    let mut importer = BibleImporter::new(store, &doc.lang.code, &version)?;
    importer.ingest(doc)?;
    Ok(version)
}

/// Load a Bicaso ZIP archive into the exchange document shape.
///
/// The archive holds `{version}/Livre_chap.txt` (one book per line:
/// `NN- Name\tcode\tchapter_count\t...\tclassification`) and
/// `{version}/{version}-O.txt` / `-N.txt` verse files
/// (`code\tchapter\tverse\t...\tcontent`).
fn load_bicaso_doc(path: &Path, version: &str) -> Result<BibleDoc> {
    let file = fs_err::File::open(path).map_err(|e| Error::io(e, Some(path.to_path_buf())))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| Error::parse(format!("not a zip archive: {e}"), Some(path.to_path_buf())))?;

    let chapters_text = read_archive_entry(&mut archive, &format!("{version}/Livre_chap.txt"), path)?;

    // Books keyed by the archive's own code column, to attach verses.
    let mut order = Vec::new();
    let mut books: HashMap<String, BookDoc> = HashMap::new();
    for (i, line) in chapters_text.lines().filter(|l| !l.trim().is_empty()).enumerate() {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 5 {
            return Err(Error::parse(
                format!("malformed book line {}", i + 1),
                Some(path.to_path_buf()),
            ));
        }
        let rank = u32::try_from(i).unwrap_or(u32::MAX) + 1;
        let name = fields[0].split_once('-').map_or(fields[0], |(_, n)| n).trim().to_string();
        let chapter_count: u32 = fields[2].trim().parse().map_err(|_| {
            Error::parse(format!("bad chapter count on line {}", i + 1), Some(path.to_path_buf()))
        })?;
        let category = if rank < FIRST_NEW_TESTAMENT_RANK {
            "Old"
        } else if rank <= CANONICAL_BOOK_COUNT {
            "New"
        } else {
            "Apocryphal"
        };
        let book = BookDoc {
            rank,
            name,
            short_name: None,
            code: None,
            category: category.to_string(),
            classification: Some(fields[4].trim().to_string()).filter(|c| !c.is_empty()),
            chapters: (1..=chapter_count).map(|r| ChapterDoc { rank: r, verses: Vec::new() }).collect(),
        };
        order.push(fields[1].trim().to_string());
        books.insert(fields[1].trim().to_string(), book);
    }

    for suffix in ["O", "N"] {
        let entry = format!("{version}/{version}-{suffix}.txt");
        let text = read_archive_entry(&mut archive, &entry, path)?;
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 5 {
                continue;
            }
            let (Ok(chapter_rank), Ok(verse_rank)) =
                (fields[1].trim().parse::<u32>(), fields[2].trim().parse::<u32>())
            else {
                continue;
            };
            let Some(book) = books.get_mut(fields[0].trim()) else {
                continue;
            };
            let (subtitle, content) = split_subtitle(fields[4].trim());
            let Some(chapter) = book.chapters.iter_mut().find(|c| c.rank == chapter_rank) else {
                continue;
            };
            chapter.verses.push(VerseDoc { rank: verse_rank, subtitle, content });
        }
    }

    Ok(BibleDoc {
        version: version.to_string(),
        description: None,
        year: None,
        src: Some("bicaso".to_string()),
        src_url: Some("https://www.bicaso.fr/Bible.html".to_string()),
        lang: LanguageDoc { name: None, code: "mg".to_string() },
        books: order.into_iter().filter_map(|code| books.remove(&code)).collect(),
    })
}

/// Read one UTF-8 entry out of a ZIP archive.
fn read_archive_entry(
    archive: &mut zip::ZipArchive<fs_err::File>,
    name: &str,
    path: &Path,
) -> Result<String> {
    let mut entry = archive
        .by_name(name)
        .map_err(|e| Error::parse(format!("missing archive entry {name}: {e}"), Some(path.to_path_buf())))?;
    let mut text = String::new();
    entry
        .read_to_string(&mut text)
        .map_err(|e| Error::io(e, Some(path.to_path_buf())))?;
    Ok(text)
}

/// Split a leading `[subtitle]` off a verse line, when both parts are
/// non-empty.
fn split_subtitle(raw: &str) -> (Option<String>, String) {
    RE_SUBTITLE.captures(raw).map_or_else(
        || (None, raw.to_string()),
        |caps| {
            (
                Some(caps[1].to_string()),
                caps[2].trim().to_string(),
            )
        },
    )
}
