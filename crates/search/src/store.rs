//! The document store and the two-way inverted index.
//!
//! `word_to_doc_freq` and `doc_to_word_freq` are kept in lockstep: every
//! `(term, doc_id) -> tf` entry in one has a mirrored `(doc_id, term) -> tf`
//! entry in the other. The ranker reads the first, [`get_word_frequencies`]
//! and the duplicate detector read the second.

use crate::query::Query;
use crate::token::{self, StopWords};
use corpusdb_core::error::{SearchError, SearchResult};
use corpusdb_core::ids::DocId;
use corpusdb_core::status::DocumentStatus;
use std::collections::HashMap;
use tracing::debug;

/// A stored document: its rating, lifecycle status, and owned content.
#[derive(Debug, Clone)]
pub struct Document {
    /// Truncating integer mean of the ratings passed to
    /// [`SearchServer::add_document`]; `0` if none were given.
    pub rating: i32,
    /// Lifecycle status.
    pub status: DocumentStatus,
    /// The raw content the document was indexed from.
    pub content: String,
}

/// The in-memory search engine: document store plus inverted index.
pub struct SearchServer {
    stop_words: StopWords,
    documents: HashMap<DocId, Document>,
    doc_ids: Vec<DocId>,
    word_to_doc_freq: HashMap<String, HashMap<DocId, f64>>,
    doc_to_word_freq: HashMap<DocId, HashMap<String, f64>>,
}

fn average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i32 = ratings.iter().sum();
    sum / ratings.len() as i32
}

impl SearchServer {
    /// Build a server with the given stop words (whitespace-separated).
    pub fn new(stop_words_text: &str) -> SearchResult<Self> {
        Self::with_stop_words(StopWords::from_str(stop_words_text)?)
    }

    /// Build a server from an already-validated stop-word set.
    pub fn with_stop_words(stop_words: StopWords) -> SearchResult<Self> {
        Ok(SearchServer {
            stop_words,
            documents: HashMap::new(),
            doc_ids: Vec::new(),
            word_to_doc_freq: HashMap::new(),
            doc_to_word_freq: HashMap::new(),
        })
    }

    /// The stop-word set this server was constructed with.
    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Number of documents currently indexed.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Document ids in insertion order.
    pub fn doc_ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.doc_ids.iter().copied()
    }

    /// Look up a document by id.
    pub fn document(&self, id: DocId) -> Option<&Document> {
        self.documents.get(&id)
    }

    pub(crate) fn word_to_doc_freq(&self) -> &HashMap<String, HashMap<DocId, f64>> {
        &self.word_to_doc_freq
    }

    pub(crate) fn doc_to_word_freq(&self) -> &HashMap<DocId, HashMap<String, f64>> {
        &self.doc_to_word_freq
    }

    /// Index a new document.
    ///
    /// `document_id` must be non-negative and not already present; the
    /// content must yield at least one non-stop-word term. Both are
    /// INVALID_ARGUMENT conditions, and validation happens before any
    /// mutation — a rejected call leaves the server unchanged.
    pub fn add_document(
        &mut self,
        document_id: DocId,
        content: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> SearchResult<()> {
        if document_id < 0 {
            return Err(SearchError::InvalidDocumentId(document_id));
        }
        if self.documents.contains_key(&document_id) {
            return Err(SearchError::DuplicateDocumentId(document_id));
        }
        let words = token::split_no_stop(content, &self.stop_words)?;
        if words.is_empty() {
            return Err(SearchError::EmptyDocument(document_id));
        }

        let rating = average_rating(ratings);
        self.documents.insert(
            document_id,
            Document {
                rating,
                status,
                content: content.to_string(),
            },
        );
        self.doc_ids.push(document_id);

        let inv_word_count = 1.0 / words.len() as f64;
        let doc_freqs = self.doc_to_word_freq.entry(document_id).or_default();
        for word in words {
            *self
                .word_to_doc_freq
                .entry(word.to_string())
                .or_default()
                .entry(document_id)
                .or_insert(0.0) += inv_word_count;
            *doc_freqs.entry(word.to_string()).or_insert(0.0) += inv_word_count;
        }
        debug!(document_id, terms = doc_freqs.len(), "indexed document");
        Ok(())
    }

    /// Term frequencies for `document_id`, or an empty map if the id is
    /// unknown. This is never an error — `NOT_FOUND` is implicit.
    pub fn get_word_frequencies(&self, document_id: DocId) -> HashMap<String, f64> {
        self.doc_to_word_freq
            .get(&document_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Remove a document and every trace of it from the inverted index.
    ///
    /// A term whose posting list becomes empty is pruned from
    /// `word_to_doc_freq` entirely — an empty inner map would otherwise
    /// violate the index invariant that a term key is never left pointing
    /// at nothing (spec.md §3, invariant 3).
    pub fn remove_document(&mut self, document_id: DocId) {
        self.documents.remove(&document_id);
        if let Some(terms) = self.doc_to_word_freq.remove(&document_id) {
            for term in terms.keys() {
                if let Some(postings) = self.word_to_doc_freq.get_mut(term) {
                    postings.remove(&document_id);
                    if postings.is_empty() {
                        self.word_to_doc_freq.remove(term);
                    }
                }
            }
        }
        self.doc_ids.retain(|&id| id != document_id);
        debug!(document_id, "removed document");
    }

    /// Remove a document, parallelizing the per-term posting-list cleanup
    /// with rayon. Observationally identical to [`remove_document`],
    /// including pruning terms whose posting list becomes empty.
    pub fn remove_document_parallel(&mut self, document_id: DocId) {
        use rayon::prelude::*;

        let terms: Vec<String> = match self.doc_to_word_freq.get(&document_id) {
            Some(t) => t.keys().cloned().collect(),
            None => {
                self.documents.remove(&document_id);
                self.doc_ids.retain(|&id| id != document_id);
                return;
            }
        };

        let touched: std::collections::HashSet<&str> =
            terms.iter().map(|s| s.as_str()).collect();
        self.word_to_doc_freq.par_iter_mut().for_each(|(term, postings)| {
            if touched.contains(term.as_str()) {
                postings.remove(&document_id);
            }
        });
        self.word_to_doc_freq
            .retain(|term, postings| !(touched.contains(term.as_str()) && postings.is_empty()));

        self.documents.remove(&document_id);
        self.doc_to_word_freq.remove(&document_id);
        self.doc_ids.retain(|&id| id != document_id);
        debug!(document_id, "removed document (parallel)");
    }

    /// Sequential match: terms of `raw_query` present in `document_id`,
    /// sorted and deduplicated, alongside the document's status. If any
    /// minus term is present the document is disqualified: an empty term
    /// list is returned (with the status still populated).
    pub fn match_document(
        &self,
        raw_query: &str,
        document_id: DocId,
    ) -> SearchResult<(Vec<String>, DocumentStatus)> {
        let query = Query::parse(raw_query, &self.stop_words)?;
        let status = self
            .documents
            .get(&document_id)
            .map(|d| d.status)
            .unwrap_or_default();

        let contains = |term: &str| {
            self.word_to_doc_freq
                .get(term)
                .map(|postings| postings.contains_key(&document_id))
                .unwrap_or(false)
        };

        if query.minus.iter().any(|w| contains(w)) {
            return Ok((Vec::new(), status));
        }

        let matched: Vec<String> = query.plus.into_iter().filter(|w| contains(w)).collect();
        Ok((matched, status))
    }

    /// Parallel match: parses the query in unsorted mode, then sorts and
    /// deduplicates the final matched-term vector. Observationally
    /// identical to [`match_document`].
    pub fn match_document_parallel(
        &self,
        raw_query: &str,
        document_id: DocId,
    ) -> SearchResult<(Vec<String>, DocumentStatus)> {
        use rayon::prelude::*;

        let query = Query::parse_unsorted(raw_query, &self.stop_words)?;
        let status = self
            .documents
            .get(&document_id)
            .map(|d| d.status)
            .unwrap_or_default();

        let contains = |term: &str| {
            self.word_to_doc_freq
                .get(term)
                .map(|postings| postings.contains_key(&document_id))
                .unwrap_or(false)
        };

        if query.minus.par_iter().any(|w| contains(w)) {
            return Ok((Vec::new(), status));
        }

        let mut matched: Vec<String> = query
            .plus
            .par_iter()
            .filter(|w| contains(w))
            .cloned()
            .collect();
        matched.sort();
        matched.dedup();
        Ok((matched, status))
    }
}
