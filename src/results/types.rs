//! Result type definitions

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Facet counts: facet name -> value -> hit count
pub type FacetCounts = HashMap<String, HashMap<String, u64>>;

/// A single document hit, published or draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "objectID", alias = "id")]
    pub object_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub doc_number: Option<String>,
    /// Creation time, unix seconds
    #[serde(default)]
    pub created_time: i64,
    #[serde(default)]
    pub modified_time: Option<i64>,
    #[serde(default)]
    pub owners: Vec<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub is_draft: bool,
    /// Fields this service does not interpret, passed through as-is
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Document {
    /// Create a document with only an id, title and creation time
    pub fn new(object_id: impl Into<String>, title: impl Into<String>, created_time: i64) -> Self {
        Self {
            object_id: object_id.into(),
            title: title.into(),
            doc_type: None,
            doc_number: None,
            created_time,
            modified_time: None,
            owners: vec![],
            product: None,
            status: None,
            summary: None,
            is_draft: false,
            extra: HashMap::new(),
        }
    }

    /// Mark as draft
    pub fn draft(mut self) -> Self {
        self.is_draft = true;
        self
    }

    /// Creation time as a UTC timestamp, if in range
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.created_time, 0).single()
    }
}

/// Paginated response from the search index
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse<T> {
    pub hits: Vec<T>,
    #[serde(default)]
    pub nb_hits: u64,
    /// 0-indexed
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub nb_pages: u32,
    #[serde(default)]
    pub hits_per_page: u32,
    #[serde(default)]
    pub facets: FacetCounts,
    #[serde(default)]
    pub params: String,
    #[serde(default, rename = "processingTimeMS")]
    pub processing_time_ms: u64,
    #[serde(default)]
    pub query: String,
}

impl<T> SearchResponse<T> {
    /// Response holding only hits
    pub fn with_hits(hits: Vec<T>) -> Self {
        let nb_hits = hits.len() as u64;
        Self {
            hits,
            nb_hits,
            page: 0,
            nb_pages: if nb_hits > 0 { 1 } else { 0 },
            hits_per_page: crate::HITS_PER_PAGE,
            facets: FacetCounts::new(),
            params: String::new(),
            processing_time_ms: 0,
            query: String::new(),
        }
    }
}

/// Response body of `GET /api/v1/drafts`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftResponse {
    #[serde(default)]
    pub facets: FacetCounts,
    #[serde(rename = "Hits", default)]
    pub hits: Vec<Document>,
    #[serde(default)]
    pub params: String,
    /// 0-indexed
    #[serde(default)]
    pub page: u32,
    #[serde(rename = "nbHits", default)]
    pub nb_hits: Option<u64>,
    #[serde(rename = "nbPages", default)]
    pub nb_pages: Option<u32>,
}

impl DraftResponse {
    /// Response holding only hits
    pub fn with_hits(hits: Vec<Document>) -> Self {
        Self {
            facets: FacetCounts::new(),
            hits,
            params: String::new(),
            page: 0,
            nb_hits: None,
            nb_pages: None,
        }
    }
}

/// Source of a batch of documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Search,
    Drafts,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Drafts => "drafts",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source response timing information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    pub source: Source,
    /// Response time in milliseconds
    pub time_ms: u64,
    /// Number of hits returned
    pub hit_count: usize,
}

/// A source that failed during a listing run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresponsiveSource {
    pub source: Source,
    /// Error kind, see `FetchError::kind`
    pub error: String,
}

/// Combined, ordered listing handed to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedResults {
    pub results: Vec<Document>,
    /// 1-indexed page that was requested
    pub page: u32,
    pub nb_pages: u32,
    #[serde(default)]
    pub unresponsive_sources: Vec<UnresponsiveSource>,
    #[serde(default)]
    pub timings: Vec<Timing>,
}
