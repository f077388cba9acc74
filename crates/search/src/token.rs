//! Whitespace tokenizer and the stop-word set.
//!
//! Unlike a general-purpose text tokenizer this one does no normalization:
//! no lowercasing, no stemming, no Unicode folding. Terms are split on ASCII
//! whitespace and taken as-is; the only validation is that a term contains
//! no control characters.

use corpusdb_core::error::SearchError;
use std::collections::HashSet;

/// Split `text` on runs of whitespace, discarding empty tokens.
///
/// Does not validate the tokens; callers that need validation should use
/// [`split_checked`].
pub fn split(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// A byte in `0x00..=0x1F` makes a term invalid, matching the original
/// engine's `IsValidWord` check.
pub fn is_valid_term(word: &str) -> bool {
    !word.bytes().any(|b| b < b' ')
}

/// Split `text` on whitespace and reject any token containing a control
/// character.
pub fn split_checked(text: &str) -> Result<Vec<&str>, SearchError> {
    split(text)
        .into_iter()
        .map(|w| {
            if is_valid_term(w) {
                Ok(w)
            } else {
                Err(SearchError::ControlCharacterInTerm(w.to_string()))
            }
        })
        .collect()
}

/// Split `text` on whitespace, reject control characters, and drop any
/// token present in `stop_words`.
pub fn split_no_stop<'a>(
    text: &'a str,
    stop_words: &StopWords,
) -> Result<Vec<&'a str>, SearchError> {
    let words = split_checked(text)?;
    Ok(words
        .into_iter()
        .filter(|w| !stop_words.contains(w))
        .collect())
}

/// The immutable set of terms to exclude from both indexing and querying.
///
/// Fixed at construction (spec.md's stop-word set has no incremental update
/// operation); every member must itself be a valid term.
#[derive(Debug, Clone, Default)]
pub struct StopWords(HashSet<String>);

impl StopWords {
    /// Build a stop-word set from any iterable of terms, rejecting empty
    /// tokens and control characters.
    pub fn new<I, S>(words: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = HashSet::new();
        for w in words {
            let w = w.as_ref();
            if w.is_empty() {
                continue;
            }
            if !is_valid_term(w) {
                return Err(SearchError::ControlCharacterInTerm(w.to_string()));
            }
            set.insert(w.to_string());
        }
        Ok(StopWords(set))
    }

    /// Build a stop-word set from a single whitespace-separated string.
    pub fn from_str(text: &str) -> Result<Self, SearchError> {
        Self::new(split_checked(text)?)
    }

    /// `true` if `word` is a stop word.
    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }

    /// Number of stop words.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if the set has no stop words.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
