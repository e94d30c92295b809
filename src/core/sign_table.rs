//! Sign Meaning Table: canonical sign label → layered meaning
//!
//! Lookup order:
//! 1. exact label
//! 2. fuzzy: first entry (declaration order) with a key word longer than
//!    3 chars contained in the input
//! 3. neutral strength-1 fallback

use std::path::Path;
use std::sync::Arc;
use lazy_static::lazy_static;
use tracing::{debug, info};

use crate::core::matcher::{MatchStrategy, SubstringMatch};
use crate::types::SignMeaning;
use crate::OraklError;

/// Minimum key word length (exclusive) for fuzzy matching
const FUZZY_MIN_WORD_CHARS: usize = 3;

lazy_static! {
    static ref BUILTIN_MEANINGS: Vec<SignMeaning> =
        serde_json::from_str(include_str!("../../data/sign_meanings.json"))
            .expect("data/sign_meanings.json is valid");
}

/// Read-only meaning table
#[derive(Debug, Clone)]
pub struct SignTable {
    entries: Vec<SignMeaning>,
    /// Lowercased key words per entry, parallel to `entries`
    key_words: Vec<Vec<String>>,
    fallback: SignMeaning,
    matcher: Arc<dyn MatchStrategy>,
}

impl Default for SignTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SignTable {
    /// Table with the built-in meanings
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN_MEANINGS.clone())
    }

    /// Table over explicit entries, in priority order
    pub fn from_entries(entries: Vec<SignMeaning>) -> Self {
        let key_words = entries.iter().map(|e| fuzzy_words(&e.label)).collect();
        Self {
            entries,
            key_words,
            fallback: SignMeaning::fallback(),
            matcher: Arc::new(SubstringMatch),
        }
    }

    /// Replace the fuzzy matching strategy
    pub fn with_matcher(mut self, matcher: Arc<dyn MatchStrategy>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Append entries from a JSON file; existing labels are kept as-is
    pub fn extend_from_file(&mut self, path: &Path) -> Result<usize, OraklError> {
        let json = std::fs::read_to_string(path)?;
        let extra: Vec<SignMeaning> = serde_json::from_str(&json)
            .map_err(|e| OraklError::Catalog(format!("{}: {}", path.display(), e)))?;
        let added = self.extend(extra);
        info!("Loaded {} extra sign meanings from {}", added, path.display());
        Ok(added)
    }

    /// Append entries whose label is new; returns how many were added
    pub fn extend(&mut self, extra: Vec<SignMeaning>) -> usize {
        let mut added = 0;
        for meaning in extra {
            if meaning.label.is_empty() || self.get_exact(&meaning.label).is_some() {
                debug!("Skipping extra sign meaning {:?}", meaning.label);
                continue;
            }
            self.key_words.push(fuzzy_words(&meaning.label));
            self.entries.push(meaning);
            added += 1;
        }
        added
    }

    /// Resolve any label to a meaning, never fails
    pub fn lookup(&self, sign: &str) -> &SignMeaning {
        if let Some(meaning) = self.get_exact(sign) {
            return meaning;
        }

        let sign_lower = sign.to_lowercase();
        for (meaning, words) in self.entries.iter().zip(&self.key_words) {
            if words.iter().any(|w| self.matcher.contains_lower(&sign_lower, w)) {
                return meaning;
            }
        }

        &self.fallback
    }

    /// Exact label match only
    pub fn get_exact(&self, sign: &str) -> Option<&SignMeaning> {
        self.entries.iter().find(|e| e.label == sign)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SignMeaning] {
        &self.entries
    }
}

/// Key words eligible for fuzzy matching
fn fuzzy_words(label: &str) -> Vec<String> {
    label
        .to_lowercase()
        .split(' ')
        .filter(|w| w.chars().count() > FUZZY_MIN_WORD_CHARS)
        .map(str::to_string)
        .collect()
}
