//! Builds a `DocumentListing` from settings

use super::executor::DocumentListing;
use crate::backends::{AlgoliaSearch, HttpDrafts};
use crate::config::Settings;
use crate::metrics::Metrics;
use crate::network::HttpClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Loader wiring the HTTP backends into a listing
pub struct ListingLoader;

impl ListingLoader {
    /// Wire the search index and drafts API described by `settings`
    pub fn load(settings: &Settings, client: HttpClient, metrics: Arc<Metrics>) -> DocumentListing {
        if settings.search.app_id.is_empty() && settings.search.host.is_none() {
            warn!("No search app_id or host configured; published documents will fail to load");
        }

        let search = AlgoliaSearch::new(client.clone(), &settings.search);
        info!(
            "Search backend: {} (index {})",
            settings.search.host(),
            settings.search.docs_index_name
        );

        let timeout = client
            .default_timeout()
            .min(Duration::from_secs(crate::MAX_TIMEOUT));
        let drafts = HttpDrafts::new(client, &settings.drafts.base_url, &settings.auth.user_header);
        info!("Drafts backend: {}/api/v1/drafts", settings.drafts.base_url);

        DocumentListing::new(
            Arc::new(search),
            Arc::new(drafts),
            settings.search.docs_index_name.clone(),
        )
        .with_limits((&settings.search).into())
        .with_timeout(timeout)
        .with_metrics(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{FilterState, SortBy};

    #[test]
    fn test_load_uses_configured_index() {
        let mut settings = Settings::default();
        settings.search.docs_index_name = "prod_docs".to_string();

        let listing = ListingLoader::load(
            &settings,
            HttpClient::new().unwrap(),
            Arc::new(Metrics::new()),
        );

        let filters = FilterState {
            sort_by: SortBy::DateAsc,
            ..Default::default()
        };
        assert_eq!(listing.index_name(&filters), "prod_docs_createdTime_asc");
    }

    #[test]
    fn test_load_caps_timeout() {
        let mut settings = Settings::default();
        settings.outgoing.request_timeout = 120.0;
        let client = HttpClient::with_settings(&settings.outgoing).unwrap();

        let listing = ListingLoader::load(&settings, client, Arc::new(Metrics::new()));
        assert_eq!(listing.timeout(), Duration::from_secs(crate::MAX_TIMEOUT));
    }
}
