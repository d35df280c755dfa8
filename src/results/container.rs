//! Result container for merging published and draft hits

use super::types::*;
use std::sync::{Arc, RwLock};

/// Concatenate published and draft hits, newest first.
///
/// The sort is stable: documents with equal `created_time` keep their input
/// order, published before drafts.
pub fn combine(published: Vec<Document>, drafts: Vec<Document>) -> Vec<Document> {
    let mut combined = published;
    combined.extend(drafts);
    combined.sort_by(|a, b| b.created_time.cmp(&a.created_time));
    combined
}

/// Container for aggregating one listing run across both sources
#[derive(Debug, Clone, Default)]
pub struct ResultContainer {
    published: Arc<RwLock<Vec<Document>>>,
    drafts: Arc<RwLock<Vec<Document>>>,
    /// Highest page count reported by either source
    nb_pages: Arc<RwLock<u32>>,
    unresponsive: Arc<RwLock<Vec<UnresponsiveSource>>>,
    timings: Arc<RwLock<Vec<Timing>>>,
}

impl ResultContainer {
    /// Create a new empty result container
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the published hits
    pub fn add_published(&self, response: SearchResponse<Document>) {
        self.raise_nb_pages(response.nb_pages);
        self.published.write().unwrap().extend(response.hits);
    }

    /// Add the draft hits
    pub fn add_drafts(&self, response: DraftResponse) {
        if let Some(nb_pages) = response.nb_pages {
            self.raise_nb_pages(nb_pages);
        }
        self.drafts.write().unwrap().extend(response.hits);
    }

    fn raise_nb_pages(&self, nb_pages: u32) {
        let mut current = self.nb_pages.write().unwrap();
        *current = (*current).max(nb_pages);
    }

    /// Record a source that failed
    pub fn add_unresponsive(&self, source: Source, error: impl Into<String>) {
        self.unresponsive.write().unwrap().push(UnresponsiveSource {
            source,
            error: error.into(),
        });
    }

    /// Record source timing
    pub fn add_timing(&self, timing: Timing) {
        self.timings.write().unwrap().push(timing);
    }

    /// All hits, newest first
    pub fn get_ordered_results(&self) -> Vec<Document> {
        let published = self.published.read().unwrap().clone();
        let drafts = self.drafts.read().unwrap().clone();
        combine(published, drafts)
    }

    /// Get unresponsive sources
    pub fn get_unresponsive(&self) -> Vec<UnresponsiveSource> {
        self.unresponsive.read().unwrap().clone()
    }

    /// Get timings
    pub fn get_timings(&self) -> Vec<Timing> {
        self.timings.read().unwrap().clone()
    }

    /// Total hit count across both sources
    pub fn result_count(&self) -> usize {
        self.published.read().unwrap().len() + self.drafts.read().unwrap().len()
    }

    /// Snapshot the container for `page` (1-indexed, as requested)
    pub fn into_combined(self, page: u32) -> CombinedResults {
        CombinedResults {
            results: self.get_ordered_results(),
            page: page.max(1),
            nb_pages: *self.nb_pages.read().unwrap(),
            unresponsive_sources: self.get_unresponsive(),
            timings: self.get_timings(),
        }
    }
}
