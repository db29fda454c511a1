//! Fixture searchers for testing the aggregation pipeline without network.
//!
//! - `FixtureSearcher`: canned results, optionally routed by query text, with
//!   a log of every query it received.
//! - `SilentSearcher`: always empty, like an unreachable or failing source.

use std::sync::Mutex;

use async_trait::async_trait;
use navigator_common::SearchResult;

use crate::scraper::WebSearcher;

// --- FixtureSearcher ---

pub struct FixtureSearcher {
    name: String,
    routes: Vec<(String, Vec<SearchResult>)>,
    default: Vec<SearchResult>,
    calls: Mutex<Vec<(String, usize)>>,
}

impl FixtureSearcher {
    pub fn new(name: &str, results: Vec<SearchResult>) -> Self {
        Self {
            name: name.to_string(),
            routes: Vec::new(),
            default: results,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Return `results` for queries containing `needle` (first route wins).
    pub fn route(mut self, needle: &str, results: Vec<SearchResult>) -> Self {
        self.routes.push((needle.to_string(), results));
        self
    }

    /// Every `(query, max_results)` this searcher was called with, in order.
    pub fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }
}

#[async_trait]
impl WebSearcher for FixtureSearcher {
    async fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((query.to_string(), max_results));
        }

        let results = self
            .routes
            .iter()
            .find(|(needle, _)| query.contains(needle.as_str()))
            .map(|(_, results)| results)
            .unwrap_or(&self.default);

        results.iter().take(max_results).cloned().collect()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// --- SilentSearcher ---

pub struct SilentSearcher;

#[async_trait]
impl WebSearcher for SilentSearcher {
    async fn search(&self, _query: &str, _max_results: usize) -> Vec<SearchResult> {
        Vec::new()
    }

    fn name(&self) -> &str {
        "silent"
    }
}
