//! Listing execution: fetch both sources, merge, order

use crate::auth::CurrentUser;
use crate::backends::{DraftSource, SearchBackend};
use crate::error::{FetchError, ListingError, Result};
use crate::metrics::Metrics;
use crate::query::{DraftQuery, FilterState, QueryLimits};
use crate::results::{CombinedResults, ResultContainer, Source, Timing};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Builds the "My Documents" listing from the search index and the drafts API
pub struct DocumentListing {
    search: Arc<dyn SearchBackend>,
    drafts: Arc<dyn DraftSource>,
    /// Base index name; the sort variant is derived per request
    docs_index_name: String,
    limits: QueryLimits,
    /// Per-source timeout
    timeout: Duration,
    metrics: Arc<Metrics>,
}

impl DocumentListing {
    /// Create a new listing over the given collaborators
    pub fn new(
        search: Arc<dyn SearchBackend>,
        drafts: Arc<dyn DraftSource>,
        docs_index_name: impl Into<String>,
    ) -> Self {
        Self {
            search,
            drafts,
            docs_index_name: docs_index_name.into(),
            limits: QueryLimits::default(),
            timeout: Duration::from_secs(crate::DEFAULT_TIMEOUT),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Set paging limits
    pub fn with_limits(mut self, limits: QueryLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set per-source timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Share a metrics collector
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Per-source timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Sorted index replica for `filters`
    pub fn index_name(&self, filters: &FilterState) -> String {
        filters.index_name(&self.docs_index_name)
    }

    /// Owner-scoped drafts query for `filters`
    pub fn draft_query(&self, filters: &FilterState, user: &CurrentUser) -> DraftQuery {
        DraftQuery::new(filters, &user.email, true, self.limits)
    }

    /// Fetch published and draft documents concurrently and merge them,
    /// newest first.
    ///
    /// A search failure fails the listing. A drafts failure is logged, the
    /// drafts source is reported unresponsive, and the published hits are
    /// returned alone.
    pub async fn list_documents(
        &self,
        filters: &FilterState,
        user: &CurrentUser,
    ) -> Result<CombinedResults> {
        let run_id = Uuid::new_v4();
        let index_name = self.index_name(filters);
        let draft_query = self.draft_query(filters, user);
        let container = ResultContainer::new();

        self.metrics.inc_listing();
        info!(
            %run_id,
            index = %index_name,
            user = %user.email,
            page = filters.page,
            "Listing documents"
        );

        let (published, drafts) = tokio::join!(
            self.timed(
                Source::Search,
                self.search.get_doc_results(&index_name, filters, Some(user)),
            ),
            self.timed(
                Source::Drafts,
                self.drafts.fetch_drafts(&draft_query, user),
            ),
        );

        match published {
            Ok((response, elapsed)) => {
                self.record_success(&container, Source::Search, elapsed, response.hits.len());
                container.add_published(response);
            }
            Err(e) => {
                error!(%run_id, index = %index_name, error = %e, "Search service failed");
                return Err(ListingError::Search(e));
            }
        }

        match drafts {
            Ok((response, elapsed)) => {
                self.record_success(&container, Source::Drafts, elapsed, response.hits.len());
                container.add_drafts(response);
            }
            Err(e) => {
                warn!(
                    %run_id,
                    signature = %draft_query.signature(),
                    error = %e,
                    "Draft fetch failed, listing published documents only"
                );
                container.add_unresponsive(Source::Drafts, e.kind());
            }
        }

        let combined = container.into_combined(filters.page);
        debug!(
            %run_id,
            results = combined.results.len(),
            nb_pages = combined.nb_pages,
            "Listing complete"
        );
        Ok(combined)
    }

    /// Run one source call under the per-source timeout
    async fn timed<T, F>(
        &self,
        source: Source,
        call: F,
    ) -> std::result::Result<(T, Duration), FetchError>
    where
        F: Future<Output = std::result::Result<T, FetchError>>,
    {
        let start = Instant::now();
        self.metrics.record_request(source);

        let result = match timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.timeout)),
        };

        match result {
            Ok(value) => Ok((value, start.elapsed())),
            Err(e) => {
                self.metrics.record_error(source);
                Err(e)
            }
        }
    }

    fn record_success(
        &self,
        container: &ResultContainer,
        source: Source,
        elapsed: Duration,
        hit_count: usize,
    ) {
        let time_ms = elapsed.as_millis() as u64;
        self.metrics.record_success(source, time_ms);
        container.add_timing(Timing {
            source,
            time_ms,
            hit_count,
        });
        debug!("Source {} returned {} hits in {:?}", source, hit_count, elapsed);
    }
}
