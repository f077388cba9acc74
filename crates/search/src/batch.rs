//! Batch query evaluation: run many queries in parallel, one sequential
//! ranker invocation each.

use crate::rank::RankedDocument;
use crate::store::SearchServer;
use rayon::prelude::*;

/// Evaluate every query in `raw_queries` against `server`'s default
/// (`ACTUAL`-status) ranking in parallel, returning one result vector per
/// query in input order. A malformed query yields an empty result for that
/// position rather than failing the whole batch.
pub fn process_queries(server: &SearchServer, raw_queries: &[String]) -> Vec<Vec<RankedDocument>> {
    raw_queries
        .par_iter()
        .map(|q| server.find_top_documents_default(q).unwrap_or_default())
        .collect()
}

/// Like [`process_queries`] but flattens every query's results into one
/// vector, preserving input order (all of query 0's results, then all of
/// query 1's, and so on).
pub fn process_queries_joined(
    server: &SearchServer,
    raw_queries: &[String],
) -> Vec<RankedDocument> {
    process_queries(server, raw_queries).into_iter().flatten().collect()
}
