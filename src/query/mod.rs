//! Filter state and request construction
//!
//! The "My Documents" view is driven by six navigable query parameters:
//! - `docType`, `owners`, `product`, `status`: facet value lists
//! - `page`: 1-indexed page number
//! - `sortBy`: `dateAsc` or `dateDesc` (other values pass through untouched)

mod drafts;
mod facets;

pub use drafts::{DraftQuery, QueryLimits};
pub use facets::{build_facet_filters, FacetFilters};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Navigable query parameter names, in serialization order
pub const QUERY_PARAMS: [&str; 6] = ["docType", "owners", "page", "product", "sortBy", "status"];

/// Sort order requested by the view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortBy {
    DateAsc,
    #[default]
    DateDesc,
    /// Any other value, kept verbatim for the collaborators
    Other(String),
}

impl SortBy {
    pub fn as_str(&self) -> &str {
        match self {
            Self::DateAsc => "dateAsc",
            Self::DateDesc => "dateDesc",
            Self::Other(raw) => raw,
        }
    }

    /// Suffix of the search-index replica sorted accordingly.
    ///
    /// Only `dateAsc` selects the ascending replica.
    pub fn index_suffix(&self) -> &'static str {
        match self {
            Self::DateAsc => "_createdTime_asc",
            _ => "_createdTime_desc",
        }
    }
}

impl From<&str> for SortBy {
    fn from(raw: &str) -> Self {
        match raw {
            "dateAsc" => Self::DateAsc,
            "dateDesc" => Self::DateDesc,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for SortBy {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "dateAsc" => Self::DateAsc,
            "dateDesc" => Self::DateDesc,
            _ => Self::Other(raw),
        }
    }
}

impl From<SortBy> for String {
    fn from(sort: SortBy) -> Self {
        match sort {
            SortBy::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter state of the "My Documents" view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub doc_type: Vec<String>,
    pub owners: Vec<String>,
    /// 1-indexed; not validated
    pub page: u32,
    pub product: Vec<String>,
    pub sort_by: SortBy,
    pub status: Vec<String>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            doc_type: vec![],
            owners: vec![],
            page: 1,
            product: vec![],
            sort_by: SortBy::DateDesc,
            status: vec![],
        }
    }
}

impl FilterState {
    /// Parse the navigable parameters out of a URL query string.
    ///
    /// List parameters accept repeated keys (`owners=a&owners=b`), bracket
    /// keys (`owners[]=a`) and JSON arrays (`owners=["a","b"]`). Unknown keys
    /// are ignored; an unparsable `page` keeps the default.
    pub fn from_query_str(query: &str) -> Self {
        let mut state = Self::default();
        let query = query.trim_start_matches('?');

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let key = key.trim_end_matches("[]");
            match key {
                "page" => {
                    if let Ok(page) = value.trim().parse() {
                        state.page = page;
                    }
                }
                "sortBy" => state.sort_by = SortBy::from(value.as_ref()),
                _ => {
                    if let Some(list) = state.list_mut(key) {
                        push_list_value(list, &value);
                    }
                }
            }
        }

        state
    }

    /// Serialize back to a query string, keys in [`QUERY_PARAMS`] order
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for key in QUERY_PARAMS {
            match key {
                "page" => {
                    serializer.append_pair(key, &self.page.to_string());
                }
                "sortBy" => {
                    serializer.append_pair(key, self.sort_by.as_str());
                }
                _ => {
                    for value in self.facet_values(key) {
                        serializer.append_pair(key, value);
                    }
                }
            }
        }
        serializer.finish()
    }

    /// Values of a facet field by its query name
    pub fn facet_values(&self, facet: &str) -> &[String] {
        match facet {
            "docType" => &self.doc_type,
            "owners" => &self.owners,
            "product" => &self.product,
            "status" => &self.status,
            _ => &[],
        }
    }

    fn list_mut(&mut self, facet: &str) -> Option<&mut Vec<String>> {
        match facet {
            "docType" => Some(&mut self.doc_type),
            "owners" => Some(&mut self.owners),
            "product" => Some(&mut self.product),
            "status" => Some(&mut self.status),
            _ => None,
        }
    }

    /// Name of the sorted index replica for `base`
    pub fn index_name(&self, base: &str) -> String {
        format!("{}{}", base, self.sort_by.index_suffix())
    }

    /// 0-indexed page as the search APIs expect it
    pub fn zero_based_page(&self) -> u32 {
        self.page.saturating_sub(1)
    }
}

fn push_list_value(list: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    if value.starts_with('[') {
        if let Ok(values) = serde_json::from_str::<Vec<String>>(value) {
            list.extend(values);
            return;
        }
    }
    list.push(value.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = FilterState::default();
        assert!(state.doc_type.is_empty());
        assert!(state.owners.is_empty());
        assert!(state.product.is_empty());
        assert!(state.status.is_empty());
        assert_eq!(state.page, 1);
        assert_eq!(state.sort_by, SortBy::DateDesc);
    }

    #[test]
    fn test_index_name() {
        let mut state = FilterState::default();
        assert_eq!(state.index_name("docs"), "docs_createdTime_desc");

        state.sort_by = SortBy::DateAsc;
        assert_eq!(state.index_name("docs"), "docs_createdTime_asc");

        state.sort_by = SortBy::from("relevance");
        assert_eq!(state.index_name("docs"), "docs_createdTime_desc");
    }

    #[test]
    fn test_sort_by_passthrough() {
        let sort = SortBy::from("title");
        assert_eq!(sort, SortBy::Other("title".to_string()));
        assert_eq!(sort.to_string(), "title");

        let json = serde_json::to_string(&SortBy::DateAsc).unwrap();
        assert_eq!(json, "\"dateAsc\"");
        let parsed: SortBy = serde_json::from_str("\"dateDesc\"").unwrap();
        assert_eq!(parsed, SortBy::DateDesc);
    }

    #[test]
    fn test_parse_query_string_forms() {
        let state = FilterState::from_query_str(
            "?owners=a%40example.com&owners=b%40example.com&docType[]=RFC\
             &product=%5B%22Vault%22%2C%22Consul%22%5D&page=3&sortBy=dateAsc&status=",
        );
        assert_eq!(state.owners, vec!["a@example.com", "b@example.com"]);
        assert_eq!(state.doc_type, vec!["RFC"]);
        assert_eq!(state.product, vec!["Vault", "Consul"]);
        assert!(state.status.is_empty());
        assert_eq!(state.page, 3);
        assert_eq!(state.sort_by, SortBy::DateAsc);
    }

    #[test]
    fn test_parse_keeps_out_of_range_page() {
        let state = FilterState::from_query_str("page=0&unknown=1");
        assert_eq!(state.page, 0);
        assert_eq!(state.zero_based_page(), 0);

        let state = FilterState::from_query_str("page=abc");
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_to_query_string_order() {
        let state = FilterState {
            status: vec!["In-Review".to_string()],
            doc_type: vec!["PRD".to_string()],
            page: 2,
            ..Default::default()
        };
        assert_eq!(
            state.to_query_string(),
            "docType=PRD&page=2&sortBy=dateDesc&status=In-Review"
        );
        assert_eq!(FilterState::from_query_str(&state.to_query_string()), state);
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(FilterState::default()).unwrap();
        assert_eq!(json["docType"], serde_json::json!([]));
        assert_eq!(json["sortBy"], "dateDesc");

        let state: FilterState = serde_json::from_str(r#"{"page": 4}"#).unwrap();
        assert_eq!(state.page, 4);
        assert_eq!(state.sort_by, SortBy::DateDesc);
    }
}
