//! Matching strategy shared by sign lookup, combinations and the classifier
//!
//! Every caller asks one question: does `needle` occur in `haystack`?
//! Swapping the strategy (tokens, embeddings) leaves callers untouched.

use std::fmt::Debug;

/// Case-insensitive containment test
pub trait MatchStrategy: Debug + Send + Sync {
    /// Both arguments may be in any case
    fn contains(&self, haystack: &str, needle: &str) -> bool;

    /// Same test when the haystack is already lowercase
    fn contains_lower(&self, haystack_lower: &str, needle: &str) -> bool {
        self.contains(haystack_lower, needle)
    }
}

/// Lowercase substring containment
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatch;

impl MatchStrategy for SubstringMatch {
    fn contains(&self, haystack: &str, needle: &str) -> bool {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    }

    fn contains_lower(&self, haystack_lower: &str, needle: &str) -> bool {
        if needle.chars().any(char::is_uppercase) {
            haystack_lower.contains(&needle.to_lowercase())
        } else {
            haystack_lower.contains(needle)
        }
    }
}
