//! Public surface for corpusdb: an in-memory inverted-index search engine
//! with TF-IDF ranking.
//!
//! This crate is a thin facade over [`corpusdb_core`] and [`corpusdb_search`],
//! re-exporting the types a caller actually needs under one namespace, the
//! way the teacher codebase's root crate re-exports its sub-crates' types.

// ============================================================================
// Core types: errors, status, ids
// ============================================================================

pub use corpusdb_core::error::{SearchError, SearchResult};
pub use corpusdb_core::ids::DocId;
pub use corpusdb_core::status::DocumentStatus;

// ============================================================================
// Search engine: store, index, query, ranking
// ============================================================================

pub use corpusdb_search::batch::{process_queries, process_queries_joined};
pub use corpusdb_search::dedup::remove_duplicates;
pub use corpusdb_search::query::Query;
pub use corpusdb_search::rank::{RankedDocument, MAX_RESULT_DOCUMENT_COUNT, RELEVANCE_COMPARISON_ERR};
pub use corpusdb_search::shard::{ShardRef, ShardedMap};
pub use corpusdb_search::store::{Document, SearchServer};
pub use corpusdb_search::window::RequestQueue;
