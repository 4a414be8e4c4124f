//! Dump a loaded version's book/chapter structure for analysis.
//!
//! Usage: cargo run --bin dump_version -- VERSION [--data DIR]

use scriptura::config::Config;
use scriptura::import::import_json_file;
use scriptura::store::{MemoryStore, VerseStore};

#[allow(clippy::expect_used)]
fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let data = args
        .iter()
        .position(|a| a == "--data")
        .and_then(|i| args.get(i + 1))
        .map(std::path::PathBuf::from)
        .or_else(|| Config::load().ok().and_then(|c| c.data_path))
        .expect("Pass --data DIR or set SCRIPTURA_DATA_PATH");

    let mut store = MemoryStore::new();
    for entry in walkdir::WalkDir::new(&data)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|x| x == "json"))
    {
        if let Err(e) = import_json_file(&mut store, entry.path()) {
            eprintln!("skipping {}: {e}", entry.path().display());
        }
    }

    let version = args
        .iter()
        .find(|a| !a.starts_with("--") && Some(a.as_str()) != data.to_str())
        .cloned()
        .unwrap_or_else(|| {
            println!("Known versions: {}", store.known_versions().join(", "));
            std::process::exit(0);
        });

    let meta = store
        .version_meta(&version)
        .expect("version not found in data directory");

    println!(
        "=== {} ({}) ===",
        meta.version,
        meta.description.as_deref().unwrap_or("no description")
    );
    println!("language: {} ({})", meta.lang.name, meta.lang.code);
    if let Some(year) = meta.year {
        println!("year: {year}");
    }

    let books = store.books(&version);
    println!("\n=== Books ({}) ===", books.len());
    for book in &books {
        let last = store.last_verse_in(&version, book.rank, None);
        println!(
            "  {:>3}. [{:<10}] {:<30} {:>3} chapter(s), last verse at {}",
            book.rank,
            book.category.name(),
            book.name,
            book.chapter_count,
            last.map_or_else(|| "-".to_string(), |v| v.rank_all.to_string()),
        );
    }
    println!("\ntotal verses: {}", store.verse_count(&version));
}
