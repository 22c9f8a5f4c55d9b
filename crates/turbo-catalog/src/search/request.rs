//! Remote search request builder.

use serde::{Deserialize, Serialize};

use crate::ids::{CollectionSlug, FacetValueId};
use crate::search::query::clamp_page;
use crate::search::{FilterState, SortDirection, SortKey, SortState};

/// Facet clause of a search request.
///
/// Clauses are AND-ed together by the API, so each facet group maps to
/// exactly one clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacetValueFilter {
    /// Results must carry this value.
    And { and: FacetValueId },
    /// Results must carry at least one of these values.
    Or { or: Vec<FacetValueId> },
}

impl FacetValueFilter {
    /// Check whether a result's facet values satisfy this clause.
    pub fn matches(&self, facet_value_ids: &[FacetValueId]) -> bool {
        match self {
            Self::And { and } => facet_value_ids.contains(and),
            Self::Or { or } => or.iter().any(|id| facet_value_ids.contains(id)),
        }
    }
}

/// Sort clause; exactly one field is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SearchSort {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<SortDirection>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub price: Option<SortDirection>,
}

impl From<SortState> for SearchSort {
    fn from(sort: SortState) -> Self {
        match sort.key {
            SortKey::Title => Self {
                name: Some(sort.direction),
                price: None,
            },
            SortKey::Price => Self {
                name: None,
                price: Some(sort.direction),
            },
        }
    }
}

/// Search input sent to the commerce API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchInput {
    pub collection_slug: CollectionSlug,
    pub group_by_product: bool,
    pub facet_value_filters: Vec<FacetValueFilter>,
    pub take: u32,
    pub skip: u32,
    pub sort: SearchSort,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub term: Option<String>,
}

impl SearchInput {
    /// 1-based page this input asks for.
    pub fn page(&self) -> u32 {
        if self.take == 0 {
            1
        } else {
            self.skip / self.take + 1
        }
    }
}

/// Build the search input for one page of a collection.
///
/// `page` is clamped to at least 1. An empty `term` is left out entirely
/// rather than sent as an empty string.
pub fn build_search_input(
    collection_slug: &CollectionSlug,
    filters: &FilterState,
    page: i64,
    sort: SortState,
    page_size: u32,
    term: Option<&str>,
) -> SearchInput {
    let page = clamp_page(page);

    let facet_value_filters = filters
        .iter()
        .filter_map(|(_, values)| {
            let mut values = values.iter().cloned().collect::<Vec<_>>();
            match values.len() {
                0 => None,
                1 => values.pop().map(|and| FacetValueFilter::And { and }),
                _ => Some(FacetValueFilter::Or { or: values }),
            }
        })
        .collect();

    SearchInput {
        collection_slug: collection_slug.clone(),
        group_by_product: true,
        facet_value_filters,
        take: page_size,
        skip: page_size.saturating_mul(page - 1),
        sort: sort.into(),
        term: term.filter(|t| !t.is_empty()).map(str::to_string),
    }
}
