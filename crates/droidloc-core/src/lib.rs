//! Core value types shared by every DroidLoc crate.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Canonical token for the unqualified `values` directory.
pub const DEFAULT_LOCALE: &str = "default";

/// Identity of one locale column, derived from a resource directory name.
///
/// `values` maps to the `default` sentinel; `values-<qualifier>` keeps the
/// full directory token so distinct qualifier spellings never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocaleId(String);

impl LocaleId {
    pub fn default_locale() -> Self {
        LocaleId(DEFAULT_LOCALE.to_string())
    }

    /// Derive a locale from a directory file name.
    ///
    /// Returns `None` for anything that is not `values` or `values-<x>` with
    /// a non-empty qualifier; callers skip those directories.
    pub fn from_dir_name(dir: &str) -> Option<Self> {
        if dir == "values" {
            return Some(Self::default_locale());
        }
        match dir.strip_prefix("values-") {
            Some(qualifier) if !qualifier.is_empty() => Some(LocaleId(dir.to_string())),
            _ => None,
        }
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_LOCALE
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Best-effort language code for a translation service.
    ///
    /// `values-fr` -> `fr`, `values-en-rUS` -> `en`, and the BCP-47 form
    /// `values-b+es+419` -> `es`. The default locale and empty qualifiers
    /// have no usable code and return `None`.
    pub fn language_code(&self) -> Option<&str> {
        let qualifier = self.0.strip_prefix("values-")?;
        let code = match qualifier.strip_prefix("b+") {
            Some(rest) => rest.split('+').next().unwrap_or_default(),
            None => qualifier.split(['-', '+']).next().unwrap_or_default(),
        };
        if code.is_empty() {
            None
        } else {
            Some(code)
        }
    }
}

// Default sorts before every qualified locale, so ordered collections of
// `LocaleId` iterate in export column order.
impl Ord for LocaleId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_default(), other.is_default()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for LocaleId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for LocaleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key-by-locale matrix of every string discovered in one scan.
///
/// Keys and locales both iterate in a fixed order (keys lexicographic,
/// locales default-first), which keeps exports and gap reports reproducible.
/// Absence of a cell is the signal for an untranslated string; present cells
/// always hold a value, possibly empty.
#[derive(Debug, Clone, Default)]
pub struct ConsolidationTable {
    entries: BTreeMap<String, BTreeMap<LocaleId, String>>,
    locales: BTreeSet<LocaleId>,
}

impl ConsolidationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one string value. The locale joins the locale set even when
    /// every one of its entries later turns out to duplicate a key.
    pub fn insert(&mut self, key: impl Into<String>, locale: LocaleId, value: impl Into<String>) {
        self.entries
            .entry(key.into())
            .or_default()
            .insert(locale.clone(), value.into());
        self.locales.insert(locale);
    }

    /// A locale whose document was scanned but held no entries still owns an
    /// export column and is still a gap target.
    pub fn register_locale(&mut self, locale: LocaleId) {
        self.locales.insert(locale);
    }

    pub fn value(&self, key: &str, locale: &LocaleId) -> Option<&str> {
        self.entries.get(key)?.get(locale).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn locales(&self) -> impl Iterator<Item = &LocaleId> {
        self.locales.iter()
    }

    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    pub fn locale_count(&self) -> usize {
        self.locales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    /// Keys that carry a value in the default locale, with that value.
    pub fn default_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        let default = LocaleId::default_locale();
        self.entries.iter().filter_map(move |(key, row)| {
            row.get(&default).map(|v| (key.as_str(), v.as_str()))
        })
    }
}

/// One missing translation: a key present in the default locale but absent
/// from `locale`. Ephemeral; recomputed from the table on every run.
#[derive(Debug, Clone)]
pub struct TranslationGap {
    pub key: String,
    /// Default-locale value that will be sent for translation.
    pub source: String,
    pub locale: LocaleId,
    /// Service language code extracted from the locale qualifier.
    pub language: String,
    /// The strings document the translated value will be written into.
    pub document: PathBuf,
}

/// Storage boundary for string resource documents.
///
/// The engine core never touches XML directly; collectors read through this
/// trait and the reconciler writes through it, so tests can substitute an
/// in-memory fake and a future format only needs a new impl.
pub trait StringResourceAdapter {
    /// All `(key, value)` entries of one document, in document order.
    fn read_entries(&self, doc: &Path) -> Result<Vec<(String, String)>>;

    /// Insert or replace a single entry, leaving every sibling node intact.
    /// Must be atomic: readers never observe a half-written document.
    fn upsert_entry(&self, doc: &Path, key: &str, value: &str) -> Result<()>;
}
