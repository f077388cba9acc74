//! Duplicate-document detection.
//!
//! Two documents are duplicates if they index the exact same *set* of terms
//! — term frequencies are ignored. This is the term-set-equality variant;
//! the historical pairwise O(N²) comparison some forks of this engine ship
//! is not reproduced here (see `DESIGN.md`).

use crate::store::SearchServer;
use corpusdb_core::ids::DocId;
use std::collections::HashSet;
use tracing::info;

/// Scan documents in insertion order, keep the first occurrence of each
/// distinct term set, and remove every later document whose term set
/// duplicates one already seen. Returns the removed ids in removal order.
///
/// Each removal is announced on stdout as `Found duplicate document id
/// <id>`, matching the original engine's operator notice.
pub fn remove_duplicates(server: &mut SearchServer) -> Vec<DocId> {
    let mut seen_term_sets: HashSet<Vec<String>> = HashSet::new();
    let mut to_remove = Vec::new();

    for id in server.doc_ids().collect::<Vec<_>>() {
        let mut terms: Vec<String> = server.get_word_frequencies(id).into_keys().collect();
        terms.sort();
        if !seen_term_sets.insert(terms) {
            to_remove.push(id);
        }
    }

    for &id in &to_remove {
        println!("Found duplicate document id {id}");
        info!(document_id = id, "removing duplicate document");
        server.remove_document(id);
    }

    to_remove
}
