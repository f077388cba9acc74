//! Query parsing: plus/minus term extraction, validation, and the
//! sorted-vs-unsorted parse modes used by the sequential and parallel
//! operations respectively.

use crate::token::{self, StopWords};
use corpusdb_core::error::SearchError;

/// A parsed query: terms a document must contain (`plus`) and terms a
/// document must not contain (`minus`). Stop words never appear in either
/// list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Terms required to be present.
    pub plus: Vec<String>,
    /// Terms required to be absent; presence of any disqualifies a document.
    pub minus: Vec<String>,
}

struct QueryWord {
    text: String,
    is_minus: bool,
}

fn parse_query_word(raw: &str) -> Result<QueryWord, SearchError> {
    if raw.is_empty() {
        return Err(SearchError::MalformedQueryWord(raw.to_string()));
    }
    let (is_minus, rest) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    if rest.is_empty() || rest.starts_with('-') || !token::is_valid_term(rest) {
        return Err(SearchError::MalformedQueryWord(raw.to_string()));
    }
    Ok(QueryWord {
        text: rest.to_string(),
        is_minus,
    })
}

impl Query {
    /// Parse `text`, sorting and deduplicating both the plus and minus
    /// lists. This is the default used by the sequential ranker and the
    /// sequential match operation.
    pub fn parse(text: &str, stop_words: &StopWords) -> Result<Self, SearchError> {
        let mut query = Self::parse_unsorted(text, stop_words)?;
        query.plus.sort();
        query.plus.dedup();
        query.minus.sort();
        query.minus.dedup();
        Ok(query)
    }

    /// Parse `text`, preserving input order and duplicate terms. Used by
    /// the parallel match operation, which sorts and deduplicates only its
    /// final output rather than the parsed query.
    pub fn parse_unsorted(text: &str, stop_words: &StopWords) -> Result<Self, SearchError> {
        let mut plus = Vec::new();
        let mut minus = Vec::new();
        for raw in token::split(text) {
            let word = parse_query_word(raw)?;
            if stop_words.contains(&word.text) {
                continue;
            }
            if word.is_minus {
                minus.push(word.text);
            } else {
                plus.push(word.text);
            }
        }
        Ok(Query { plus, minus })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sw(words: &str) -> StopWords {
        StopWords::from_str(words).unwrap()
    }

    #[test]
    fn parses_plus_and_minus() {
        let q = Query::parse("cat -dog bird", &sw("")).unwrap();
        assert_eq!(q.plus, vec!["bird", "cat"]);
        assert_eq!(q.minus, vec!["dog"]);
    }

    #[test]
    fn sorts_and_dedups() {
        let q = Query::parse("cat cat bird cat", &sw("")).unwrap();
        assert_eq!(q.plus, vec!["bird", "cat"]);
    }

    #[test]
    fn unsorted_preserves_order_and_duplicates() {
        let q = Query::parse_unsorted("cat cat bird", &sw("")).unwrap();
        assert_eq!(q.plus, vec!["cat", "cat", "bird"]);
    }

    #[test]
    fn double_dash_is_invalid() {
        assert!(matches!(
            Query::parse("--cat", &sw("")),
            Err(SearchError::MalformedQueryWord(_))
        ));
    }

    #[test]
    fn bare_dash_is_invalid() {
        assert!(matches!(
            Query::parse("-", &sw("")),
            Err(SearchError::MalformedQueryWord(_))
        ));
    }

    #[test]
    fn control_character_is_invalid() {
        assert!(Query::parse("ca\u{0002}t", &sw("")).is_err());
    }

    #[test]
    fn stop_words_are_dropped() {
        let q = Query::parse("the cat in the hat", &sw("the in")).unwrap();
        assert_eq!(q.plus, vec!["cat", "hat"]);
    }
}
