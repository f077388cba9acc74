//! Sliding-window count of requests that returned no results.
//!
//! Wraps a server and records the last `window` calls to
//! [`RequestQueue::add_find_request`] (and its status/predicate variants).
//! A monotonic logical clock advances by one per call; once a recorded
//! request is older than the window, it is evicted and, if it was empty,
//! the empty-request counter is decremented.

use crate::rank::RankedDocument;
use crate::store::SearchServer;
use corpusdb_core::error::SearchResult;
use corpusdb_core::ids::DocId;
use corpusdb_core::status::DocumentStatus;
use std::collections::VecDeque;

struct QueryRecord {
    empty: bool,
    timestamp: u64,
}

/// Tracks, over the trailing `window` requests, how many returned zero
/// results.
pub struct RequestQueue<'a> {
    server: &'a SearchServer,
    window: u64,
    current_time: u64,
    records: VecDeque<QueryRecord>,
    empty_count: usize,
}

impl<'a> RequestQueue<'a> {
    /// Standard window size: a day's worth of requests at one per minute.
    pub const DAY: u64 = 1440;

    /// Wrap `server`, tracking the trailing `window` requests.
    pub fn new(server: &'a SearchServer, window: u64) -> Self {
        RequestQueue {
            server,
            window,
            current_time: 0,
            records: VecDeque::new(),
            empty_count: 0,
        }
    }

    fn record(&mut self, result_len: usize) {
        self.current_time += 1;
        let empty = result_len == 0;
        self.records.push_back(QueryRecord {
            empty,
            timestamp: self.current_time,
        });
        if empty {
            self.empty_count += 1;
        }
        if let Some(front) = self.records.front() {
            if self.current_time - front.timestamp >= self.window {
                let popped = self.records.pop_front().expect("front exists");
                if popped.empty {
                    self.empty_count -= 1;
                }
            }
        }
    }

    /// Rank `raw_query` against an explicit predicate, recording the
    /// outcome in the window.
    pub fn add_find_request<P>(
        &mut self,
        raw_query: &str,
        predicate: P,
    ) -> SearchResult<Vec<RankedDocument>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let docs = self.server.find_top_documents(raw_query, predicate)?;
        self.record(docs.len());
        Ok(docs)
    }

    /// Rank `raw_query` filtered to `status`, recording the outcome.
    pub fn add_find_request_status(
        &mut self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> SearchResult<Vec<RankedDocument>> {
        let docs = self.server.find_top_documents_status(raw_query, status)?;
        self.record(docs.len());
        Ok(docs)
    }

    /// Rank `raw_query` against the default (`ACTUAL`) status, recording
    /// the outcome.
    pub fn add_find_request_default(
        &mut self,
        raw_query: &str,
    ) -> SearchResult<Vec<RankedDocument>> {
        let docs = self.server.find_top_documents_default(raw_query)?;
        self.record(docs.len());
        Ok(docs)
    }

    /// Number of empty-result requests currently inside the window.
    pub fn empty_request_count(&self) -> usize {
        self.empty_count
    }
}
