//! Facet filter construction

use super::FilterState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Facet filters: outer list is AND-ed, each inner group is OR-ed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacetFilters(pub Vec<Vec<String>>);

impl FacetFilters {
    /// Filter matching documents owned by `email`
    pub fn owner(email: &str) -> Self {
        Self(vec![vec![format!("owners:{}", email)]])
    }

    /// Append an AND-ed group
    pub fn push_group(&mut self, group: Vec<String>) {
        if !group.is_empty() {
            self.0.push(group);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flattened list of every clause, grouping discarded
    pub fn clauses(&self) -> Vec<&str> {
        self.0.iter().flatten().map(|s| s.as_str()).collect()
    }

    /// JSON encoding used by the search index
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self.0)
    }
}

/// Comma-joined flattened clauses, the form the drafts API splits on
impl fmt::Display for FacetFilters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.clauses().join(","))
    }
}

/// One OR-group per facet with active values, in facet-name order
pub fn build_facet_filters(filters: &FilterState) -> FacetFilters {
    let mut facet_filters = FacetFilters::default();
    for facet in crate::FACET_NAMES {
        let group = filters
            .facet_values(facet)
            .iter()
            .map(|value| format!("{}:{}", facet, value))
            .collect();
        facet_filters.push_group(group);
    }
    facet_filters
}
