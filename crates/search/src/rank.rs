//! TF-IDF ranking: sequential and parallel variants that must agree up to
//! [`RELEVANCE_COMPARISON_ERR`].

use crate::query::Query;
use crate::shard::ShardedMap;
use crate::store::SearchServer;
use corpusdb_core::error::SearchResult;
use corpusdb_core::ids::DocId;
use corpusdb_core::status::DocumentStatus;
use std::collections::HashMap;
use tracing::trace;

/// Relevance values within this tolerance of each other are considered
/// equal and broken by rating instead.
pub const RELEVANCE_COMPARISON_ERR: f64 = 1e-6;

/// Results beyond this rank are discarded.
pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;

/// Number of chunks the parallel ranker splits the plus-term list into.
pub const PLUS_TERM_CHUNKS: usize = 4;

/// A ranked search result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedDocument {
    /// The document's id.
    pub id: DocId,
    /// Accumulated `tf * idf` across the query's plus terms.
    pub relevance: f64,
    /// The document's stored rating, used as a tie-break.
    pub rating: i32,
}

fn idf(total_docs: usize, df: usize) -> f64 {
    (total_docs as f64 / df as f64).ln()
}

fn sort_and_truncate(mut docs: Vec<RankedDocument>) -> Vec<RankedDocument> {
    docs.sort_by(|a, b| {
        if (a.relevance - b.relevance).abs() < RELEVANCE_COMPARISON_ERR {
            b.rating.cmp(&a.rating)
        } else {
            b.relevance.partial_cmp(&a.relevance).expect("relevance is never NaN")
        }
    });
    docs.truncate(MAX_RESULT_DOCUMENT_COUNT);
    docs
}

impl SearchServer {
    /// Rank documents matching `raw_query` against an explicit predicate
    /// over `(doc_id, status, rating)`, sequentially.
    pub fn find_top_documents<P>(
        &self,
        raw_query: &str,
        predicate: P,
    ) -> SearchResult<Vec<RankedDocument>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let query = Query::parse(raw_query, self.stop_words())?;
        let mut relevance: HashMap<DocId, f64> = HashMap::new();

        for word in &query.plus {
            let postings = match self.word_to_doc_freq().get(word) {
                Some(p) => p,
                None => continue,
            };
            let idf_w = idf(self.document_count(), postings.len());
            for (&doc_id, &tf) in postings {
                let doc = self.document(doc_id).expect("posting list references a live document");
                if predicate(doc_id, doc.status, doc.rating) {
                    *relevance.entry(doc_id).or_insert(0.0) += tf * idf_w;
                }
            }
        }

        for word in &query.minus {
            if let Some(postings) = self.word_to_doc_freq().get(word) {
                for &doc_id in postings.keys() {
                    relevance.remove(&doc_id);
                }
            }
        }

        let docs = relevance
            .into_iter()
            .map(|(id, relevance)| RankedDocument {
                id,
                relevance,
                rating: self.document(id).expect("ranked id is live").rating,
            })
            .collect();
        trace!(raw_query, "ranked (sequential)");
        Ok(sort_and_truncate(docs))
    }

    /// Same as [`find_top_documents`] filtered to an exact status.
    pub fn find_top_documents_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> SearchResult<Vec<RankedDocument>> {
        self.find_top_documents(raw_query, |_, doc_status, _| doc_status == status)
    }

    /// Same as [`find_top_documents`] filtered to `DocumentStatus::Actual`.
    pub fn find_top_documents_default(&self, raw_query: &str) -> SearchResult<Vec<RankedDocument>> {
        self.find_top_documents_status(raw_query, DocumentStatus::Actual)
    }

    /// Rank documents matching `raw_query`, parallelizing the plus-term
    /// accumulation with rayon over [`PLUS_TERM_CHUNKS`] chunks through a
    /// [`ShardedMap`]. Must be observationally identical to
    /// [`find_top_documents`] up to [`RELEVANCE_COMPARISON_ERR`].
    pub fn find_top_documents_parallel<P>(
        &self,
        raw_query: &str,
        predicate: P,
    ) -> SearchResult<Vec<RankedDocument>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        use rayon::prelude::*;

        let query = Query::parse(raw_query, self.stop_words())?;
        let accumulator = ShardedMap::new(num_shards(self.document_count()));

        let chunk_size = if query.plus.is_empty() {
            1
        } else {
            (query.plus.len() + PLUS_TERM_CHUNKS - 1) / PLUS_TERM_CHUNKS
        };
        query.plus.par_chunks(chunk_size).for_each(|chunk| {
            for word in chunk {
                let postings = match self.word_to_doc_freq().get(word) {
                    Some(p) => p,
                    None => continue,
                };
                let idf_w = idf(self.document_count(), postings.len());
                for (&doc_id, &tf) in postings {
                    let doc = self
                        .document(doc_id)
                        .expect("posting list references a live document");
                    if predicate(doc_id, doc.status, doc.rating) {
                        let mut r = accumulator.shard_ref(doc_id);
                        *r += tf * idf_w;
                    }
                }
            }
        });

        let mut relevance = accumulator.build_ordinary_map();

        for word in &query.minus {
            if let Some(postings) = self.word_to_doc_freq().get(word) {
                for &doc_id in postings.keys() {
                    relevance.remove(&doc_id);
                }
            }
        }

        let docs = relevance
            .into_iter()
            .map(|(id, relevance)| RankedDocument {
                id,
                relevance,
                rating: self.document(id).expect("ranked id is live").rating,
            })
            .collect();
        trace!(raw_query, "ranked (parallel)");
        Ok(sort_and_truncate(docs))
    }

    /// Same as [`find_top_documents_parallel`] filtered to an exact status.
    pub fn find_top_documents_parallel_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> SearchResult<Vec<RankedDocument>> {
        self.find_top_documents_parallel(raw_query, move |_, doc_status, _| doc_status == status)
    }

    /// Same as [`find_top_documents_parallel`] filtered to `DocumentStatus::Actual`.
    pub fn find_top_documents_parallel_default(
        &self,
        raw_query: &str,
    ) -> SearchResult<Vec<RankedDocument>> {
        self.find_top_documents_parallel_status(raw_query, DocumentStatus::Actual)
    }
}

/// Shard count for the parallel accumulator: enough to keep contention low
/// without allocating wildly more shards than documents.
fn num_shards(document_count: usize) -> usize {
    document_count.clamp(1, 64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpusdb_core::status::DocumentStatus::Actual;

    fn server() -> SearchServer {
        let mut s = SearchServer::new("и в на").unwrap();
        s.add_document(0, "белый кот и модный ошейник", Actual, &[8, -3])
            .unwrap();
        s.add_document(1, "пушистый кот пушистый хвост", Actual, &[7, 2, 7])
            .unwrap();
        s.add_document(2, "ухоженный пёс выразительные глаза", Actual, &[5, -12, 2, 1])
            .unwrap();
        s
    }

    #[test]
    fn ranks_by_relevance_descending() {
        let s = server();
        let docs = s.find_top_documents_default("пушистый ухоженный кот").unwrap();
        let ids: Vec<DocId> = docs.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2, 0]);
    }

    #[test]
    fn truncates_to_max_result_count() {
        let mut s = SearchServer::new("").unwrap();
        for i in 0..8 {
            s.add_document(i, "common", Actual, &[i as i32]).unwrap();
        }
        let docs = s.find_top_documents_default("common").unwrap();
        assert_eq!(docs.len(), MAX_RESULT_DOCUMENT_COUNT);
    }

    #[test]
    fn minus_term_excludes_document() {
        let s = server();
        let docs = s.find_top_documents_default("кот -пушистый").unwrap();
        let ids: Vec<DocId> = docs.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![0]);
    }

    #[test]
    fn parallel_matches_sequential() {
        let s = server();
        let seq = s.find_top_documents_default("пушистый ухоженный кот").unwrap();
        let par = s.find_top_documents_parallel_default("пушистый ухоженный кот").unwrap();
        assert_eq!(seq.len(), par.len());
        for (a, b) in seq.iter().zip(par.iter()) {
            assert_eq!(a.id, b.id);
            assert!((a.relevance - b.relevance).abs() < RELEVANCE_COMPARISON_ERR);
        }
    }

    #[test]
    fn tie_breaks_on_rating() {
        let mut s = SearchServer::new("").unwrap();
        s.add_document(1, "common", Actual, &[1]).unwrap();
        s.add_document(2, "common", Actual, &[9]).unwrap();
        let docs = s.find_top_documents_default("common").unwrap();
        assert_eq!(docs[0].id, 2);
    }

    #[test]
    fn status_filter_overload() {
        let mut s = SearchServer::new("").unwrap();
        s.add_document(1, "common", Actual, &[]).unwrap();
        s.add_document(2, "common", DocumentStatus::Banned, &[])
            .unwrap();
        let docs = s
            .find_top_documents_status("common", DocumentStatus::Banned)
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, 2);
    }
}
