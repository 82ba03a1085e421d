//! Title-based event matching across venues.
//!
//! Two markets are treated as the same real-world event when the Jaccard
//! similarity of their normalized title token sets reaches a threshold. This
//! is a heuristic: high lexical overlap does not guarantee identical
//! resolution criteria, which is why a validator can reject pairs later.

use std::collections::HashSet;

/// Words that carry no event identity and are dropped before comparison.
const STOPWORDS: &[&str] = &[
    "the", "a", "an", "will", "be", "by", "before", "after", "on", "in", "to", "of", "for",
    "and", "or", "is", "at",
];

/// Minimum token length kept after normalization (exclusive).
const MIN_TOKEN_LEN: usize = 2;

/// Default Jaccard threshold for treating two titles as one event.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.2;

/// Jaccard matcher over normalized title tokens.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityMatcher {
    threshold: f64,
}

impl Default for SimilarityMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl SimilarityMatcher {
    /// Create a matcher with the given acceptance threshold in `[0, 1]`.
    #[must_use]
    pub const fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Normalize a title into its set of significant tokens.
    ///
    /// Lowercases, replaces anything that is not a word character with a
    /// space, then keeps tokens longer than two characters that are not
    /// stopwords.
    #[must_use]
    pub fn tokens(text: &str) -> HashSet<String> {
        let normalized: String = text
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
            .collect();

        normalized
            .split_whitespace()
            .filter(|t| t.chars().count() > MIN_TOKEN_LEN && !STOPWORDS.contains(t))
            .map(str::to_string)
            .collect()
    }

    /// Jaccard similarity of the two titles' token sets.
    ///
    /// Returns `0.0` when either set is empty.
    #[must_use]
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        jaccard(&Self::tokens(a), &Self::tokens(b)).unwrap_or(0.0)
    }

    /// True when both titles have significant tokens and their similarity
    /// reaches the threshold.
    #[must_use]
    pub fn is_same_event(&self, a: &str, b: &str) -> bool {
        jaccard(&Self::tokens(a), &Self::tokens(b)).is_some_and(|score| score >= self.threshold)
    }
}

/// `|A ∩ B| / |A ∪ B|`, or `None` if either set is empty.
fn jaccard(left: &HashSet<String>, right: &HashSet<String>) -> Option<f64> {
    if left.is_empty() || right.is_empty() {
        return None;
    }
    let intersection = left.intersection(right).count();
    let union = left.union(right).count();
    Some(intersection as f64 / union as f64)
}
