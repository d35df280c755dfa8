//! Application state shared across handlers

use crate::auth::{HeaderUserProvider, UserProvider};
use crate::config::Settings;
use crate::listing::{DocumentListing, ListingLoader};
use crate::metrics::Metrics;
use crate::network::HttpClient;
use crate::view::ViewRegistry;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Per-user view state
    pub views: Arc<ViewRegistry>,
    /// Resolves the authenticated user
    pub users: Arc<dyn UserProvider>,
    /// Source metrics
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Create application state with HTTP backends from `settings`
    pub fn new(settings: Settings, client: HttpClient) -> Self {
        let metrics = Arc::new(Metrics::new());
        let listing = ListingLoader::load(&settings, client, metrics.clone());
        Self::with_listing(settings, listing)
    }

    /// Create application state around an existing listing
    pub fn with_listing(settings: Settings, listing: DocumentListing) -> Self {
        let users = Arc::new(HeaderUserProvider::new(&settings.auth));
        let metrics = listing.metrics().clone();
        let views = ViewRegistry::new(Arc::new(listing), &settings.views);

        Self {
            settings: Arc::new(settings),
            views: Arc::new(views),
            users,
            metrics,
        }
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
