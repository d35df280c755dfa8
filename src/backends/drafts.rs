//! Drafts API backend

use crate::auth::CurrentUser;
use crate::error::FetchError;
use crate::network::{ApiRequest, HttpClient};
use crate::query::DraftQuery;
use crate::results::DraftResponse;
use async_trait::async_trait;
use tracing::debug;

/// Draft-document collaborator
#[async_trait]
pub trait DraftSource: Send + Sync {
    /// Fetch the drafts matching `query` on behalf of `user`
    async fn fetch_drafts(
        &self,
        query: &DraftQuery,
        user: &CurrentUser,
    ) -> Result<DraftResponse, FetchError>;
}

/// `GET /api/v1/drafts` over HTTP
pub struct HttpDrafts {
    client: HttpClient,
    base_url: String,
    user_header: String,
}

impl HttpDrafts {
    pub fn new(client: HttpClient, base_url: &str, user_header: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_header: user_header.to_string(),
        }
    }

    /// Build the request without sending it
    pub fn request(&self, query: &DraftQuery, user: &CurrentUser) -> ApiRequest {
        ApiRequest::get(format!("{}/api/v1/drafts", self.base_url))
            .query(query.to_query_string())
            .header(self.user_header.as_str(), user.email.as_str())
    }
}

#[async_trait]
impl DraftSource for HttpDrafts {
    async fn fetch_drafts(
        &self,
        query: &DraftQuery,
        user: &CurrentUser,
    ) -> Result<DraftResponse, FetchError> {
        let request = self.request(query, user);
        debug!(signature = %query.signature(), "Fetching drafts");

        let response = self.client.execute(request).await?;
        response.json()
    }
}
