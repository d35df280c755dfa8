//! Drafts API query construction

use super::{build_facet_filters, FacetFilters, FilterState, SortBy};
use crate::config::SearchSettings;
use sha2::{Digest, Sha256};

/// Paging limits shared by the search index and the drafts API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimits {
    pub hits_per_page: u32,
    pub max_values_per_facet: u32,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            hits_per_page: crate::HITS_PER_PAGE,
            max_values_per_facet: crate::MAX_VALUES_PER_FACET,
        }
    }
}

impl From<&SearchSettings> for QueryLimits {
    fn from(settings: &SearchSettings) -> Self {
        Self {
            hits_per_page: settings.hits_per_page,
            max_values_per_facet: settings.max_values_per_facet,
        }
    }
}

/// Query sent to `GET /api/v1/drafts`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftQuery {
    pub facets: Vec<String>,
    pub hits_per_page: u32,
    pub max_values_per_facet: u32,
    pub facet_filters: FacetFilters,
    /// 0-indexed
    pub page: u32,
    pub sort_by: SortBy,
    pub owner_email: String,
}

impl DraftQuery {
    /// Build the query for `owner_email`.
    ///
    /// With `owner_only` the facet filters are replaced by a single
    /// `owners:<email>` clause whatever the filter state holds.
    pub fn new(
        filters: &FilterState,
        owner_email: &str,
        owner_only: bool,
        limits: QueryLimits,
    ) -> Self {
        let facet_filters = if owner_only {
            FacetFilters::owner(owner_email)
        } else {
            build_facet_filters(filters)
        };

        Self {
            facets: crate::FACET_NAMES.iter().map(|f| f.to_string()).collect(),
            hits_per_page: limits.hits_per_page,
            max_values_per_facet: limits.max_values_per_facet,
            facet_filters,
            page: filters.zero_based_page(),
            sort_by: filters.sort_by.clone(),
            owner_email: owner_email.to_string(),
        }
    }

    /// Key/value pairs in their fixed wire order
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("facets", self.facets.join(",")),
            ("hitsPerPage", self.hits_per_page.to_string()),
            ("maxValuesPerFacet", self.max_values_per_facet.to_string()),
            ("facetFilters", self.facet_filters.to_string()),
            ("page", self.page.to_string()),
            ("sortBy", self.sort_by.to_string()),
            ("ownerEmail", self.owner_email.clone()),
        ]
    }

    /// Form-url-encoded query string
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs())
            .finish()
    }

    /// Hex SHA-256 of the encoded query string
    pub fn signature(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.to_query_string().as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
