//! Search-index backend for published documents
//!
//! Talks to an Algolia-compatible REST API.

use crate::auth::CurrentUser;
use crate::config::SearchSettings;
use crate::error::FetchError;
use crate::network::{ApiRequest, HttpClient};
use crate::query::{build_facet_filters, FacetFilters, FilterState, QueryLimits};
use crate::results::{Document, SearchResponse};
use async_trait::async_trait;
use tracing::debug;

/// Search-service collaborator
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Fetch one page of published documents from `index_name`.
    ///
    /// With `owner` set, hits are restricted to that user's documents.
    async fn get_doc_results(
        &self,
        index_name: &str,
        filters: &FilterState,
        owner: Option<&CurrentUser>,
    ) -> Result<SearchResponse<Document>, FetchError>;

    /// Facet filter clauses for the active filter fields
    fn build_facet_filters(&self, filters: &FilterState) -> FacetFilters {
        build_facet_filters(filters)
    }
}

/// Algolia REST search backend
pub struct AlgoliaSearch {
    client: HttpClient,
    host: String,
    app_id: String,
    api_key: String,
    limits: QueryLimits,
}

impl AlgoliaSearch {
    pub fn new(client: HttpClient, settings: &SearchSettings) -> Self {
        Self {
            client,
            host: settings.host(),
            app_id: settings.app_id.clone(),
            api_key: settings.api_key.clone(),
            limits: settings.into(),
        }
    }

    /// Build the query request without sending it
    pub fn request(
        &self,
        index_name: &str,
        filters: &FilterState,
        owner: Option<&CurrentUser>,
    ) -> Result<ApiRequest, FetchError> {
        if index_name.is_empty() || index_name.contains('/') {
            return Err(FetchError::InvalidRequest(format!(
                "bad index name: {:?}",
                index_name
            )));
        }

        let mut facet_filters = self.build_facet_filters(filters);
        if let Some(user) = owner {
            facet_filters.push_group(vec![format!("owners:{}", user.email)]);
        }

        let facets = serde_json::json!(crate::FACET_NAMES);
        let params = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("query", "")
            .append_pair("facetFilters", &facet_filters.to_json().to_string())
            .append_pair("facets", &facets.to_string())
            .append_pair("hitsPerPage", &self.limits.hits_per_page.to_string())
            .append_pair(
                "maxValuesPerFacet",
                &self.limits.max_values_per_facet.to_string(),
            )
            .append_pair("page", &filters.zero_based_page().to_string())
            .finish();

        Ok(
            ApiRequest::post(format!("{}/1/indexes/{}/query", self.host, index_name))
                .header("X-Algolia-Application-Id", &self.app_id)
                .header("X-Algolia-API-Key", &self.api_key)
                .json(serde_json::json!({ "params": params })),
        )
    }
}

#[async_trait]
impl SearchBackend for AlgoliaSearch {
    async fn get_doc_results(
        &self,
        index_name: &str,
        filters: &FilterState,
        owner: Option<&CurrentUser>,
    ) -> Result<SearchResponse<Document>, FetchError> {
        let request = self.request(index_name, filters, owner)?;
        debug!(index = index_name, url = %request.url, "Querying search index");

        let response = self.client.execute(request).await?;
        response.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> AlgoliaSearch {
        let settings = SearchSettings {
            app_id: "APP".to_string(),
            api_key: "KEY".to_string(),
            ..Default::default()
        };
        AlgoliaSearch::new(HttpClient::new().unwrap(), &settings)
    }

    fn params_of(request: &ApiRequest) -> Vec<(String, String)> {
        let params = request.json.as_ref().unwrap()["params"].as_str().unwrap();
        url::form_urlencoded::parse(params.as_bytes())
            .into_owned()
            .collect()
    }

    #[test]
    fn test_request_shape() {
        let filters = FilterState {
            product: vec!["Vault".to_string()],
            page: 2,
            ..Default::default()
        };
        let owner = CurrentUser::new("me@example.com");
        let request = backend()
            .request("docs_createdTime_desc", &filters, Some(&owner))
            .unwrap();

        assert_eq!(
            request.url,
            "https://APP-dsn.algolia.net/1/indexes/docs_createdTime_desc/query"
        );
        assert!(request
            .headers
            .contains(&("X-Algolia-API-Key".to_string(), "KEY".to_string())));

        let params = params_of(&request);
        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(
            get("facetFilters"),
            r#"[["product:Vault"],["owners:me@example.com"]]"#
        );
        assert_eq!(get("facets"), r#"["docType","owners","product","status"]"#);
        assert_eq!(get("hitsPerPage"), "12");
        assert_eq!(get("page"), "1");
    }

    #[test]
    fn test_rejects_bad_index_name() {
        let result = backend().request("", &FilterState::default(), None);
        assert!(matches!(result, Err(FetchError::InvalidRequest(_))));

        let result = backend().request("a/b", &FilterState::default(), None);
        assert!(matches!(result, Err(FetchError::InvalidRequest(_))));
    }
}
