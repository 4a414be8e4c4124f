//! Multi-version alignment.
//!
//! Maps a resolved verse slice in one version onto the "same" verses in
//! other versions via the stable content code. Translations may draw verse
//! boundaries differently, so a verse absent from a secondary version is
//! simply omitted, never padded.

use serde::Serialize;

use crate::corpus::Verse;
use crate::store::VerseStore;
use crate::types::{VerseCode, VersionId};
use crate::utils::OrderedSet;

/// One secondary version's aligned verses, in the primary slice's order.
#[derive(Debug, Clone, Serialize)]
pub struct TranslationSet {
    /// Uppercase version identifier.
    pub version: String,
    /// Verses of this version carrying the requested codes.
    pub results: Vec<Verse>,
}

/// Normalize a caller-supplied translation list against a primary version.
///
/// Identifiers are uppercased, de-duplicated preserving first-seen order,
/// stripped of the primary version, and filtered to versions the store
/// actually knows. Unknown secondary versions disappear silently.
pub fn normalize_versions(
    store: &dyn VerseStore,
    primary: &str,
    requested: &[String],
) -> Vec<String> {
    let primary = VersionId::new(primary);
    let known = store.known_versions();

    let mut set = OrderedSet::new();
    for raw in requested {
        let id = VersionId::new(raw);
        if id.as_str().is_empty() || id.as_str() == primary.as_str() {
            continue;
        }
        if known.iter().any(|k| k == id.as_str()) {
            set.insert(id.as_str());
        }
    }
    set.into_vec()
}

/// Cross-reference the primary slice's codes against secondary versions.
///
/// Output order follows the primary code list, not the secondary version's
/// own ordering; versions are reported in normalized request order.
pub fn align(
    store: &dyn VerseStore,
    codes: &[VerseCode],
    versions: &[String],
) -> Vec<TranslationSet> {
    versions
        .iter()
        .map(|version| TranslationSet {
            version: version.clone(),
            results: store.verses_by_codes(version, codes),
        })
        .collect()
}
