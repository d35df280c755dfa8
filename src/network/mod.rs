//! HTTP networking module
//!
//! Provides the outgoing HTTP client shared by the document sources.

mod client;
mod request;

pub use client::HttpClient;
pub use request::{ApiRequest, ApiResponse, HttpMethod};
