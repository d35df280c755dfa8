//! doclist-rs: the "My Documents" listing service
//!
//! Fetches a user's published documents from the search index and their
//! drafts from the application API, and merges both into a single listing
//! ordered by creation time.

pub mod auth;
pub mod backends;
pub mod config;
pub mod error;
pub mod listing;
pub mod metrics;
pub mod network;
pub mod query;
pub mod results;
pub mod view;
pub mod web;

pub use config::Settings;
pub use error::{FetchError, ListingError};
pub use listing::DocumentListing;
pub use query::{FilterState, SortBy};
pub use results::{CombinedResults, Document};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default per-source timeout in seconds
pub const DEFAULT_TIMEOUT: u64 = 5;

/// Maximum per-source timeout that can be set
pub const MAX_TIMEOUT: u64 = 30;

/// Facets exposed by the document index, in filter order
pub const FACET_NAMES: [&str; 4] = ["docType", "owners", "product", "status"];

/// Hits requested per page
pub const HITS_PER_PAGE: u32 = 12;

/// Facet values returned per facet
pub const MAX_VALUES_PER_FACET: u32 = 100;
