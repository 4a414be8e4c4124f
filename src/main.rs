//! `Scriptura` - scripture reference lookup from the terminal.
//!
//! Usage: scriptura "Rev 5:1,4-5; Acts 5:15-20" --version KJV [--trans ASV,WEB]
//!        [--data DIR] [--offset N] [--limit N]

use std::collections::HashMap;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use scriptura::config::Config;
use scriptura::corpus::{Book, Verse};
use scriptura::error::{Error, Result};
use scriptura::import::import_json_file;
use scriptura::services::LookupService;
use scriptura::store::{MemoryStore, VerseStore};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = Config::load()?;

    let data_path = flag_value(&args, "--data")
        .map(PathBuf::from)
        .or_else(|| config.data_path.clone())
        .ok_or_else(|| {
            Error::config(
                "no corpus directory".to_string(),
                "Pass --data DIR or set SCRIPTURA_DATA_PATH",
            )
        })?;

    let store = load_corpora(&data_path)?;
    let service = LookupService::new(store);

    let Some(reference) = args.iter().find(|a| !a.starts_with("--") && !is_flag_operand(&args, a))
    else {
        println!("Usage: scriptura REFERENCE --version VERSION [--trans V1,V2] [--data DIR]");
        println!("Known versions: {}", service.store().known_versions().join(", "));
        return Ok(());
    };

    let version = flag_value(&args, "--version")
        .or_else(|| config.default_version.clone())
        .ok_or_else(|| {
            Error::config(
                "no version selected".to_string(),
                "Pass --version or set SCRIPTURA_DEFAULT_VERSION",
            )
        })?;

    let trans: Vec<String> = flag_value(&args, "--trans")
        .map(|t| t.split(',').map(str::to_string).collect())
        .unwrap_or_default();
    let offset = flag_value(&args, "--offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    let limit = flag_value(&args, "--limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(config.max_results);

    let page = service.search_by_reference(&version, reference, offset, limit, &trans)?;

    let books = book_names(service.store(), &version);
    println!("{} ({} of {} verse(s))", reference, page.count, page.total);
    for verse in &page.results {
        print_verse(&books, verse);
    }
    if let Some(prev) = &page.previous {
        println!("previous: {}", coordinate(&books, prev));
    }
    if let Some(next) = &page.next {
        println!("next: {}", coordinate(&books, next));
    }

    for set in &page.trans {
        println!("\n[{}] ({} verse(s))", set.version, set.results.len());
        let books = book_names(service.store(), &set.version);
        for verse in &set.results {
            print_verse(&books, verse);
        }
    }

    Ok(())
}

/// Fetch the value following a `--flag`.
fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag).and_then(|i| args.get(i + 1)).cloned()
}

/// Whether this argument is the operand of some flag (and not the reference).
fn is_flag_operand(args: &[String], arg: &String) -> bool {
    args.iter()
        .position(|a| a == arg)
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| args.get(i))
        .is_some_and(|prev| prev.starts_with("--"))
}

/// Import every JSON corpus file found under the data directory.
fn load_corpora(data_path: &std::path::Path) -> Result<MemoryStore> {
    let mut store = MemoryStore::new();
    let mut loaded = 0usize;

    for entry in walkdir::WalkDir::new(data_path).into_iter().filter_map(std::result::Result::ok) {
        if entry.path().extension().is_none_or(|e| e != "json") {
            continue;
        }
        match import_json_file(&mut store, entry.path()) {
            Ok(version) => {
                loaded += 1;
                tracing::debug!("loaded {} from {}", version, entry.path().display());
            }
            Err(e) => {
                tracing::warn!("skipping {}: {e}", entry.path().display());
            }
        }
    }

    if loaded == 0 {
        return Err(Error::config(
            format!("no corpus files loaded from {}", data_path.display()),
            "Place exchange-format .json corpora in the data directory",
        ));
    }
    tracing::info!("loaded {loaded} version(s) from {}", data_path.display());
    Ok(store)
}

/// Short book names by rank, for display.
fn book_names(store: &dyn VerseStore, version: &str) -> HashMap<u32, String> {
    store
        .books(version)
        .into_iter()
        .map(|b: Book| (b.rank, b.short_name))
        .collect()
}

fn coordinate(books: &HashMap<u32, String>, verse: &Verse) -> String {
    let book = books
        .get(&verse.book_rank)
        .map_or_else(|| verse.book_rank.to_string(), String::clone);
    format!("{} {}:{}", book, verse.chapter_rank, verse.rank)
}

fn print_verse(books: &HashMap<u32, String>, verse: &Verse) {
    if let Some(subtitle) = &verse.subtitle {
        println!("  {subtitle}");
    }
    println!("  {:<12} {}", coordinate(books, verse), verse.content);
}
