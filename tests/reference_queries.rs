//! End-to-end tests for reference resolution and range queries.
//!
//! Builds a small two-version corpus through the import pipeline and drives
//! the lookup service the way an HTTP layer or the CLI would.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use scriptura::error::Error;
use scriptura::import::{BibleDoc, BibleImporter, BookDoc, ChapterDoc, LanguageDoc, VerseDoc};
use scriptura::resolver::Locator;
use scriptura::services::LookupService;
use scriptura::store::{MemoryStore, VerseStore};

/// Book layout shared by both test versions:
/// Genesis (3+4 verses), Exodus (2+3+2), Leviticus (5), Numbers (3+3).
const LAYOUT: &[(&str, &str, &[u32])] = &[
    ("Genesis", "Old", &[3, 4]),
    ("Exodus", "Old", &[2, 3, 2]),
    ("Leviticus", "Old", &[5]),
    ("Numbers", "Old", &[3, 3]),
];

/// Build a version document; `holes` lists (book_rank, chapter, verse)
/// triples whose content becomes a placeholder, exercising `rank_all`
/// exclusion.
fn version_doc(version: &str, holes: &[(u32, u32, u32)]) -> BibleDoc {
    let books = LAYOUT
        .iter()
        .enumerate()
        .map(|(bi, (name, category, chapters))| {
            let book_rank = u32::try_from(bi).unwrap() + 1;
            BookDoc {
                rank: book_rank,
                name: (*name).to_string(),
                short_name: None,
                code: None,
                category: (*category).to_string(),
                classification: None,
                chapters: chapters
                    .iter()
                    .enumerate()
                    .map(|(ci, verse_count)| {
                        let chapter_rank = u32::try_from(ci).unwrap() + 1;
                        ChapterDoc {
                            rank: chapter_rank,
                            verses: (1..=*verse_count)
                                .map(|v| {
                                    let content = if holes.contains(&(book_rank, chapter_rank, v)) {
                                        "???".to_string()
                                    } else {
                                        format!("{version} {name} {chapter_rank}:{v}")
                                    };
                                    VerseDoc { rank: v, subtitle: None, content }
                                })
                                .collect(),
                        }
                    })
                    .collect(),
            }
        })
        .collect();

    BibleDoc {
        version: version.to_string(),
        description: None,
        year: None,
        src: None,
        src_url: None,
        lang: LanguageDoc { name: None, code: "en".to_string() },
        books,
    }
}

/// AAA is complete; BBB lacks Exodus 2:2 and Genesis 1:1.
fn service() -> LookupService<MemoryStore> {
    let mut store = MemoryStore::new();
    BibleImporter::new(&mut store, "en", "AAA")
        .unwrap()
        .ingest(version_doc("AAA", &[]))
        .unwrap();
    BibleImporter::new(&mut store, "en", "BBB")
        .unwrap()
        .ingest(version_doc("BBB", &[(2, 2, 2), (1, 1, 1)]))
        .unwrap();
    LookupService::new(store)
}

#[test]
fn single_verse_roundtrips_to_its_own_triple() {
    let service = service();
    let from = Locator::at_rank(2, Some(2), Some(1));
    let page = service.search_verses("AAA", &from, &from, 0, 100, &[]).unwrap();

    assert_eq!(page.count, 1);
    assert_eq!(page.total, 1);
    let verse = &page.results[0];
    assert_eq!((verse.book_rank, verse.chapter_rank, verse.rank), (2, 2, 1));
    assert_eq!(verse.code.as_str(), "exo_.02.01");
}

#[test]
fn omitted_end_verse_returns_the_whole_chapter() {
    let service = service();
    let page = service
        .search_verses(
            "AAA",
            &Locator::at_rank(2, Some(2), None),
            &Locator::at_rank(2, Some(2), None),
            0,
            100,
            &[],
        )
        .unwrap();

    // Exodus 2 has exactly 3 verses, in ascending rank order.
    assert_eq!(page.total, 3);
    let ranks: Vec<u32> = page.results.iter().map(|v| v.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
    assert!(page.results.iter().all(|v| v.book_rank == 2 && v.chapter_rank == 2));
}

#[test]
fn cross_chapter_range_spans_to_end_of_destination_chapter() {
    let service = service();
    let page = service
        .search_verses(
            "AAA",
            &Locator::at_rank(2, Some(1), Some(2)),
            &Locator::at_rank(2, Some(3), None),
            0,
            100,
            &[],
        )
        .unwrap();

    // Exodus 1:2 through the last verse of Exodus 3: 1 + 3 + 2 verses.
    assert_eq!(page.total, 6);
    assert_eq!(page.results.first().map(|v| (v.chapter_rank, v.rank)), Some((1, 2)));
    assert_eq!(page.results.last().map(|v| (v.chapter_rank, v.rank)), Some((3, 2)));
}

#[test]
fn cross_book_range_carries_neighbors() {
    let service = service();
    let page = service
        .search_verses(
            "AAA",
            &Locator::at_rank(1, Some(2), Some(1)),
            &Locator::at_rank(2, Some(1), Some(2)),
            0,
            100,
            &[],
        )
        .unwrap();

    // Genesis 2:1 through Exodus 1:2.
    assert_eq!(page.total, 6);
    assert_eq!(page.results.first().map(|v| v.code.as_str()), Some("gen_.02.01"));
    assert_eq!(page.results.last().map(|v| v.code.as_str()), Some("exo_.01.02"));

    // previous = last verse of Genesis 1, next = Exodus 2:1.
    let previous = page.previous.expect("previous verse");
    assert_eq!(previous.code.as_str(), "gen_.01.03");
    assert_eq!(previous.rank_all, page.results[0].rank_all - 1);
    let next = page.next.expect("next verse");
    assert_eq!(next.code.as_str(), "exo_.02.01");
    assert_eq!(next.rank_all, page.results.last().unwrap().rank_all + 1);
}

#[test]
fn destination_book_defaults_to_its_last_chapter() {
    let service = service();
    let page = service
        .search_verses(
            "AAA",
            &Locator::at_rank(1, Some(2), Some(4)),
            &Locator::at_rank(2, None, None),
            0,
            100,
            &[],
        )
        .unwrap();

    // Genesis 2:4 through the end of Exodus.
    assert_eq!(page.total, 8);
    assert_eq!(page.results.last().map(|v| v.code.as_str()), Some("exo_.03.02"));
}

#[test]
fn inverted_book_order_is_rejected() {
    let service = service();
    let err = service
        .search_verses(
            "AAA",
            &Locator::at_rank(2, Some(2), Some(1)),
            &Locator::at_rank(1, Some(5), Some(4)),
            0,
            100,
            &[],
        )
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRange(_)));
}

#[test]
fn inverted_chapter_order_within_a_book_is_rejected() {
    let service = service();
    let err = service
        .search_verses(
            "AAA",
            &Locator::at_rank(2, Some(3), Some(1)),
            &Locator::at_rank(2, Some(1), None),
            0,
            100,
            &[],
        )
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRange(_)));
}

#[test]
fn nonexistent_verse_is_an_empty_answer() {
    let service = service();
    // Leviticus 1 has 5 verses; 6-7 exist nowhere.
    let page = service
        .search_verses(
            "AAA",
            &Locator::at_rank(3, Some(1), Some(6)),
            &Locator::at_rank(3, Some(1), Some(7)),
            0,
            100,
            &[],
        )
        .unwrap();
    assert_eq!(page.total, 0);
    assert!(page.results.is_empty());
    assert!(page.previous.is_none());
}

#[test]
fn nonexistent_book_rank_is_an_empty_answer() {
    let service = service();
    let page = service
        .search_verses(
            "AAA",
            &Locator::at_rank(9, Some(1), Some(1)),
            &Locator::at_rank(9, None, None),
            0,
            100,
            &[],
        )
        .unwrap();
    assert_eq!(page.total, 0);
}

#[test]
fn named_book_miss_is_a_client_error_for_explicit_queries() {
    let service = service();
    let err = service
        .search_verses(
            "AAA",
            &Locator::named("Gospel of Bob", Some(1), Some(1)),
            &Locator::default(),
            0,
            100,
            &[],
        )
        .unwrap_err();
    assert!(matches!(err, Error::BookNotFound { .. }));
}

#[test]
fn unknown_primary_version_is_an_error() {
    let service = service();
    let err = service.search_by_reference("ZZZ", "Genesis 1", 0, 100, &[]).unwrap_err();
    assert!(matches!(err, Error::VersionNotFound(_)));
}

#[test]
fn resolution_is_idempotent() {
    let service = service();
    let run = || {
        service
            .search_verses(
                "AAA",
                &Locator::at_rank(1, Some(1), Some(2)),
                &Locator::at_rank(2, Some(2), None),
                0,
                100,
                &[],
            )
            .unwrap()
    };
    let first = run();
    let second = run();
    let codes = |page: &scriptura::services::VersePage| {
        page.results.iter().map(|v| v.code.as_str().to_string()).collect::<Vec<_>>()
    };
    assert_eq!(codes(&first), codes(&second));
    assert_eq!(first.total, second.total);
}

#[test]
fn pagination_pages_reconstruct_the_slice_without_gaps() {
    let service = service();
    let full = service
        .search_verses(
            "AAA",
            &Locator::at_rank(1, Some(1), Some(1)),
            &Locator::at_rank(4, Some(2), None),
            0,
            1000,
            &[],
        )
        .unwrap();
    assert_eq!(full.total, 25);

    let mut stitched = Vec::new();
    let mut offset = 0;
    loop {
        let page = service
            .search_verses(
                "AAA",
                &Locator::at_rank(1, Some(1), Some(1)),
                &Locator::at_rank(4, Some(2), None),
                offset,
                7,
                &[],
            )
            .unwrap();
        assert_eq!(page.total, 25);
        if page.results.is_empty() {
            break;
        }
        offset += page.results.len();
        stitched.extend(page.results);
    }

    let stitched_codes: Vec<&str> = stitched.iter().map(|v| v.code.as_str()).collect();
    let full_codes: Vec<&str> = full.results.iter().map(|v| v.code.as_str()).collect();
    assert_eq!(stitched_codes, full_codes);
}

#[test]
fn reference_string_resolves_like_explicit_locators() {
    let service = service();
    let by_reference = service
        .search_by_reference("AAA", "Exodus 2:1-3", 0, 100, &[])
        .unwrap();
    let explicit = service
        .search_verses(
            "AAA",
            &Locator::at_rank(2, Some(2), Some(1)),
            &Locator::at_rank(2, Some(2), Some(3)),
            0,
            100,
            &[],
        )
        .unwrap();
    let codes = |page: &scriptura::services::VersePage| {
        page.results.iter().map(|v| v.code.as_str().to_string()).collect::<Vec<_>>()
    };
    assert_eq!(codes(&by_reference), codes(&explicit));
}

#[test]
fn multi_segment_reference_with_inherited_book() {
    let service = service();
    // "Gen 1;2" - the second segment inherits Genesis.
    let page = service.search_by_reference("AAA", "Gen 1;2", 0, 100, &[]).unwrap();
    assert_eq!(page.total, 7);
    assert!(page.results.iter().all(|v| v.book_rank == 1));

    // Short name, code, and full name all resolve.
    let by_code = service.search_by_reference("AAA", "gen_ 1", 0, 100, &[]).unwrap();
    assert_eq!(by_code.total, 3);
}

#[test]
fn reference_with_verse_lists_concatenates_specs_in_order() {
    let service = service();
    let page = service
        .search_by_reference("AAA", "Gen.2:1,3-4; Leviticus 1:5", 0, 100, &[])
        .unwrap();
    let codes: Vec<&str> = page.results.iter().map(|v| v.code.as_str()).collect();
    assert_eq!(codes, vec!["gen_.02.01", "gen_.02.03", "gen_.02.04", "lev_.01.05"]);
}

#[test]
fn reference_chapter_dash_range_spans_chapters() {
    let service = service();
    let page = service.search_by_reference("AAA", "Exodus 1-2", 0, 100, &[]).unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.results.last().map(|v| v.code.as_str()), Some("exo_.02.03"));
}

#[test]
fn whole_book_reference_returns_every_verse() {
    let service = service();
    let page = service.search_by_reference("AAA", "Leviticus", 0, 100, &[]).unwrap();
    assert_eq!(page.total, 5);
    assert!(page.previous.is_some());
    assert!(page.next.is_some());
}

#[test]
fn unknown_book_segment_contributes_nothing() {
    let service = service();
    let page = service
        .search_by_reference("AAA", "Nothing 3:4; Genesis 1:1", 0, 100, &[])
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.results[0].code.as_str(), "gen_.01.01");
}

#[test]
fn alignment_follows_primary_order_and_omits_absent_verses() {
    let service = service();
    let page = service
        .search_by_reference(
            "AAA",
            "Exodus 2",
            0,
            100,
            &[String::from("bbb"), String::from("BBB"), String::from("AAA"), String::from("XXX")],
        )
        .unwrap();

    assert_eq!(page.total, 3);
    // Primary, duplicate, and unknown versions are all filtered out.
    assert_eq!(page.trans.len(), 1);
    let set = &page.trans[0];
    assert_eq!(set.version, "BBB");
    // BBB lacks Exodus 2:2; order follows the primary slice.
    let codes: Vec<&str> = set.results.iter().map(|v| v.code.as_str()).collect();
    assert_eq!(codes, vec!["exo_.02.01", "exo_.02.03"]);
    // No verse outside the primary slice's code list appears.
    let primary: Vec<&str> = page.results.iter().map(|v| v.code.as_str()).collect();
    assert!(codes.iter().all(|c| primary.contains(c)));
}

#[test]
fn placeholder_verses_get_no_rank_all_and_leave_no_gap() {
    let service = service();
    // BBB dropped Genesis 1:1, so its ordering starts at the next verse.
    let page = service
        .search_verses(
            "BBB",
            &Locator::at_rank(1, Some(1), None),
            &Locator::at_rank(1, Some(1), None),
            0,
            100,
            &[],
        )
        .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.results[0].rank, 2);
    assert_eq!(page.results[0].rank_all, 1);

    let store = service.store();
    let all: Vec<u64> = store
        .verses_in_range("BBB", 1, 1000, 0, 1000)
        .0
        .iter()
        .map(|v| v.rank_all)
        .collect();
    let expected: Vec<u64> = (1..=u64::try_from(all.len()).unwrap()).collect();
    assert_eq!(all, expected);
}

#[test]
fn books_and_bibles_are_searchable() {
    let service = service();

    let books = service.search_books("AAA", None, None, 0, 100).unwrap();
    assert_eq!(books.total, 4);
    assert_eq!(books.results[0].name, "Genesis");
    assert_eq!(books.results[0].chapter_count, 2);

    let by_short = service.search_books("AAA", None, Some("exo"), 0, 100).unwrap();
    assert_eq!(by_short.count, 1);
    assert_eq!(by_short.results[0].code, "exo_");

    let bibles = service.search_bibles(Some("en"), None, 0, 10);
    assert_eq!(bibles.total, 2);
    let versions: Vec<&str> = bibles.results.iter().map(|m| m.version.as_str()).collect();
    assert_eq!(versions, vec!["AAA", "BBB"]);
}
