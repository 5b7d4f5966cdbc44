//! Core types for per-language translation data

use indexmap::map::{IntoIter, Iter};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Translations of a single language, keyed by identifier
///
/// Insertion order is kept so output files list keys in the order they were
/// first seen. An empty string marks an untranslated key.
pub type LanguageMapping = IndexMap<String, String>;

/// Translations for every language code found in one or more tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageSet {
    languages: IndexMap<String, LanguageMapping>,
}

impl LanguageSet {
    /// Create a new empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of languages
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    /// Check if the set has no languages
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Get the mapping of one language
    pub fn get(&self, code: &str) -> Option<&LanguageMapping> {
        self.languages.get(code)
    }

    /// Look up a single translation
    pub fn translation(&self, code: &str, key: &str) -> Option<&str> {
        self.get(code)
            .and_then(|mapping| mapping.get(key))
            .map(String::as_str)
    }

    /// Language codes in first-seen order
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    /// Get the mapping of a language, creating it if missing
    pub fn language_mut(&mut self, code: &str) -> &mut LanguageMapping {
        self.languages.entry(code.to_string()).or_default()
    }

    /// Record a translation, replacing any previous value for the key
    pub fn insert(&mut self, code: &str, key: impl Into<String>, translation: impl Into<String>) {
        self.language_mut(code).insert(key.into(), translation.into());
    }

    /// Total number of keys across all languages
    pub fn key_count(&self) -> usize {
        self.languages.values().map(IndexMap::len).sum()
    }

    pub fn iter(&self) -> Iter<'_, String, LanguageMapping> {
        self.languages.iter()
    }
}

impl IntoIterator for LanguageSet {
    type Item = (String, LanguageMapping);
    type IntoIter = IntoIter<String, LanguageMapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.languages.into_iter()
    }
}

impl<'a> IntoIterator for &'a LanguageSet {
    type Item = (&'a String, &'a LanguageMapping);
    type IntoIter = Iter<'a, String, LanguageMapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.languages.iter()
    }
}
