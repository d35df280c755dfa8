//! Listing orchestration module
//!
//! Coordinates the published and draft fetches, merges their hits
//! and records timing.

mod executor;
mod loader;

pub use executor::DocumentListing;
pub use loader::ListingLoader;
