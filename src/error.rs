//! Error types for the listing pipeline and its collaborators

use std::time::Duration;
use thiserror::Error;

/// Failure talking to one of the two document sources.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl FetchError {
    /// Short label used in logs, metrics and the unresponsive-source list
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network_error",
            Self::Timeout(_) => "timeout",
            Self::Status { status, .. } if *status == 429 => "too_many_requests",
            Self::Status { status, .. } if *status == 401 || *status == 403 => "access_denied",
            Self::Status { .. } => "http_error",
            Self::Decode(_) => "parse_error",
            Self::InvalidRequest(_) => "invalid_request",
        }
    }
}

/// Failure of a whole listing run.
#[derive(Error, Debug)]
pub enum ListingError {
    /// The search index is the primary source; losing it fails the listing.
    #[error("search service failed: {0}")]
    Search(#[source] FetchError),
}

pub type Result<T> = std::result::Result<T, ListingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_kind() {
        let err = FetchError::Status {
            status: 429,
            url: "http://x".to_string(),
        };
        assert_eq!(err.kind(), "too_many_requests");
        assert_eq!(FetchError::Timeout(Duration::from_secs(1)).kind(), "timeout");

        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(FetchError::from(decode).kind(), "parse_error");
    }

    #[test]
    fn test_listing_error_display() {
        let err = ListingError::Search(FetchError::Status {
            status: 500,
            url: "http://search/1/indexes/docs/query".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "search service failed: HTTP 500 from http://search/1/indexes/docs/query"
        );
    }
}
