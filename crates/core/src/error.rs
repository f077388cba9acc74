use thiserror::Error;

/// Error type for every fallible corpusdb operation.
///
/// Every variant here corresponds to an INVALID_ARGUMENT condition; there is
/// deliberately no `NotFound` variant — lookups of an unknown document id
/// return an empty result rather than an error (see
/// `corpusdb_search::store::SearchServer::get_word_frequencies`).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Document id was negative.
    #[error("document id {0} is negative")]
    InvalidDocumentId(i64),
    /// Document id was already present in the index.
    #[error("document id {0} already exists")]
    DuplicateDocumentId(i64),
    /// A term (document word, stop word, or query word) contained a control
    /// character (byte in `0x00..=0x1F`).
    #[error("term {0:?} contains a control character")]
    ControlCharacterInTerm(String),
    /// A query word was empty, or became empty after stripping a leading
    /// `-`, or had a second leading `-` (`--word`).
    #[error("malformed query word {0:?}")]
    MalformedQueryWord(String),
    /// A document's content contained no terms after stop-word removal.
    #[error("document {0} has no indexable terms after stop-word removal")]
    EmptyDocument(i64),
}

/// Result alias used throughout corpusdb.
pub type SearchResult<T> = Result<T, SearchError>;
