//! "My Documents" view state
//!
//! Holds the filter state for one user and refreshes the listing whenever it
//! changes. Every caller gets the listing for the filters it asked for. Each
//! refresh also takes a generation number, and only the newest refresh may
//! publish its result as `latest()`; one that finishes after a newer one has
//! started leaves `latest()` untouched.

use crate::auth::CurrentUser;
use crate::config::ViewSettings;
use crate::error::Result;
use crate::listing::DocumentListing;
use crate::query::FilterState;
use crate::results::CombinedResults;
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// Outcome of a refresh
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// The newest refresh; its result is now `latest()`
    Fresh(CombinedResults),
    /// A newer refresh started while this one was in flight. The results
    /// still answer this refresh's filters but were not published.
    Superseded {
        generation: u64,
        results: CombinedResults,
    },
}

impl RefreshOutcome {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh(_))
    }

    pub fn results(&self) -> &CombinedResults {
        match self {
            Self::Fresh(results) | Self::Superseded { results, .. } => results,
        }
    }

    pub fn into_results(self) -> CombinedResults {
        match self {
            Self::Fresh(results) | Self::Superseded { results, .. } => results,
        }
    }
}

/// Filter state holder for one user
pub struct MyDocumentsView {
    listing: Arc<DocumentListing>,
    user: CurrentUser,
    filters: RwLock<FilterState>,
    generation: AtomicU64,
    latest: RwLock<Option<CombinedResults>>,
}

impl MyDocumentsView {
    pub fn new(listing: Arc<DocumentListing>, user: CurrentUser) -> Self {
        Self {
            listing,
            user,
            filters: RwLock::new(FilterState::default()),
            generation: AtomicU64::new(0),
            latest: RwLock::new(None),
        }
    }

    pub fn user(&self) -> &CurrentUser {
        &self.user
    }

    /// Current filter state
    pub async fn filters(&self) -> FilterState {
        self.filters.read().await.clone()
    }

    /// Result of the newest completed refresh
    pub async fn latest(&self) -> Option<CombinedResults> {
        self.latest.read().await.clone()
    }

    /// Generation of the newest refresh started
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Replace the filter state and refresh
    pub async fn set_filters(&self, filters: FilterState) -> Result<RefreshOutcome> {
        let generation = {
            let mut current = self.filters.write().await;
            *current = filters.clone();
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };
        self.run(generation, filters).await
    }

    /// Change some fields and refresh
    pub async fn update<F>(&self, change: F) -> Result<RefreshOutcome>
    where
        F: FnOnce(&mut FilterState),
    {
        let (generation, filters) = {
            let mut current = self.filters.write().await;
            change(&mut *current);
            (
                self.generation.fetch_add(1, Ordering::SeqCst) + 1,
                current.clone(),
            )
        };
        self.run(generation, filters).await
    }

    /// Refresh with the current filter state
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        self.update(|_| {}).await
    }

    async fn run(&self, generation: u64, filters: FilterState) -> Result<RefreshOutcome> {
        let results = self.listing.list_documents(&filters, &self.user).await?;

        let mut latest = self.latest.write().await;
        if generation != self.generation() {
            debug!(
                user = %self.user.email,
                generation,
                newest = self.generation(),
                "Not publishing superseded listing"
            );
            return Ok(RefreshOutcome::Superseded { generation, results });
        }
        *latest = Some(results.clone());
        Ok(RefreshOutcome::Fresh(results))
    }
}

/// One view per user, bounded in count and expired when idle
pub struct ViewRegistry {
    listing: Arc<DocumentListing>,
    views: Cache<String, Arc<MyDocumentsView>>,
}

impl ViewRegistry {
    pub fn new(listing: Arc<DocumentListing>, settings: &ViewSettings) -> Self {
        let views = Cache::builder()
            .max_capacity(settings.max_views)
            .time_to_idle(Duration::from_secs(settings.idle_timeout))
            .build();

        Self { listing, views }
    }

    /// Get or create the view for `user`
    pub async fn for_user(&self, user: &CurrentUser) -> Arc<MyDocumentsView> {
        self.views
            .get_with(user.email.clone(), async {
                Arc::new(MyDocumentsView::new(self.listing.clone(), user.clone()))
            })
            .await
    }

    /// Number of live views, after pending evictions have run
    pub async fn len(&self) -> u64 {
        self.views.run_pending_tasks().await;
        self.views.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{DraftSource, SearchBackend};
    use crate::error::{FetchError, ListingError};
    use crate::query::DraftQuery;
    use crate::results::{Document, DraftResponse, SearchResponse};
    use async_trait::async_trait;
    use std::time::Duration;

    /// Page 1 answers slowly, every other page immediately
    struct PagedSearch;

    #[async_trait]
    impl SearchBackend for PagedSearch {
        async fn get_doc_results(
            &self,
            _index_name: &str,
            filters: &FilterState,
            _owner: Option<&CurrentUser>,
        ) -> std::result::Result<SearchResponse<Document>, FetchError> {
            if filters.page == 1 {
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
            if filters.page == 99 {
                return Err(FetchError::Status {
                    status: 502,
                    url: "http://search".to_string(),
                });
            }
            let doc = Document::new(format!("page-{}", filters.page), "doc", 10);
            Ok(SearchResponse::with_hits(vec![doc]))
        }
    }

    struct NoDrafts;

    #[async_trait]
    impl DraftSource for NoDrafts {
        async fn fetch_drafts(
            &self,
            _query: &DraftQuery,
            _user: &CurrentUser,
        ) -> std::result::Result<DraftResponse, FetchError> {
            Ok(DraftResponse::with_hits(vec![]))
        }
    }

    fn listing() -> Arc<DocumentListing> {
        Arc::new(DocumentListing::new(
            Arc::new(PagedSearch),
            Arc::new(NoDrafts),
            "docs",
        ))
    }

    fn view() -> Arc<MyDocumentsView> {
        Arc::new(MyDocumentsView::new(
            listing(),
            CurrentUser::new("me@example.com"),
        ))
    }

    #[tokio::test]
    async fn test_set_filters_publishes_result() {
        let view = view();
        assert!(view.latest().await.is_none());

        let outcome = view
            .set_filters(FilterState {
                page: 2,
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(outcome.is_fresh());
        assert_eq!(view.generation(), 1);
        let latest = view.latest().await.unwrap();
        assert_eq!(latest.results[0].object_id, "page-2");
        assert_eq!(view.filters().await.page, 2);
    }

    #[tokio::test]
    async fn test_update_changes_single_field() {
        let view = view();
        view.update(|f| {
            f.page = 3;
            f.owners.push("someone@example.com".to_string());
        })
        .await
        .unwrap();

        let filters = view.filters().await;
        assert_eq!(filters.page, 3);
        assert_eq!(filters.owners, vec!["someone@example.com"]);
        assert_eq!(view.latest().await.unwrap().page, 3);

        assert!(view.refresh().await.unwrap().is_fresh());
        assert_eq!(view.generation(), 2);
        assert_eq!(view.filters().await.page, 3);
    }

    #[tokio::test]
    async fn test_stale_refresh_keeps_newer_latest() {
        let view = view();

        let slow = {
            let view = view.clone();
            tokio::spawn(async move { view.set_filters(FilterState::default()).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let fast = view
            .set_filters(FilterState {
                page: 2,
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(fast.is_fresh());

        let slow = slow.await.unwrap().unwrap();
        assert!(matches!(slow, RefreshOutcome::Superseded { generation: 1, .. }));
        // The slow caller still gets the listing it asked for
        assert_eq!(slow.results().results[0].object_id, "page-1");

        let latest = view.latest().await.unwrap();
        assert_eq!(latest.results[0].object_id, "page-2");
    }

    #[tokio::test]
    async fn test_error_keeps_previous_result() {
        let view = view();
        view.update(|f| f.page = 2).await.unwrap();

        let result = view.update(|f| f.page = 99).await;
        assert!(matches!(result, Err(ListingError::Search(_))));
        assert_eq!(view.latest().await.unwrap().page, 2);
        assert_eq!(view.filters().await.page, 99);
    }

    #[tokio::test]
    async fn test_registry_one_view_per_user() {
        let registry = ViewRegistry::new(listing(), &ViewSettings::default());
        assert!(registry.is_empty().await);
        let me = CurrentUser::new("me@example.com");
        let other = CurrentUser::new("other@example.com");

        let a = registry.for_user(&me).await;
        let b = registry.for_user(&me).await;
        let c = registry.for_user(&other).await;

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(registry.len().await, 2);
        assert_eq!(c.user(), &other);
    }

    #[tokio::test]
    async fn test_registry_is_bounded() {
        let settings = ViewSettings {
            max_views: 4,
            ..Default::default()
        };
        let registry = ViewRegistry::new(listing(), &settings);

        for i in 0..50 {
            let user = CurrentUser::new(format!("user{}@example.com", i));
            registry.for_user(&user).await;
        }

        let len = registry.len().await;
        assert!(len > 0 && len <= 4, "{} views kept", len);
    }
}
