//! Document source backends
//!
//! Defines the two collaborator traits and their HTTP implementations.

mod drafts;
mod search;

pub use drafts::{DraftSource, HttpDrafts};
pub use search::{AlgoliaSearch, SearchBackend};
