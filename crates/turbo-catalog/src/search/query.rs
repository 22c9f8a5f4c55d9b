//! URL query string codec for collection browsing state.
//!
//! Every query key outside [`RESERVED_PARAMS`] selects a facet group; its
//! value is a comma-separated list of facet value tokens. Filters are written
//! with facet group ids as keys and facet value ids as values. Reading also
//! accepts codes and names so hand-written URLs keep working.

use std::collections::BTreeMap;
use std::fmt;

use url::form_urlencoded;

use crate::facets::FacetCatalog;
use crate::search::{FilterState, SortState};

/// 1-based page number.
pub const PAGE_PARAM: &str = "page";
/// Active sort, see [`SortState::as_param`].
pub const SORT_PARAM: &str = "sort";
/// Free-text search term.
pub const TERM_PARAM: &str = "q";

/// Parameters that never select a facet group.
pub const RESERVED_PARAMS: [&str; 6] = [PAGE_PARAM, "slug", "channel", SORT_PARAM, TERM_PARAM, "locale"];

fn is_reserved(key: &str) -> bool {
    RESERVED_PARAMS.contains(&key)
}

/// Decoded URL query parameters; the last occurrence of a key wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string, with or without the leading `?`.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    /// Encode as `application/x-www-form-urlencoded`, keys in sorted order.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_query_string())
    }
}

/// Clamp any requested page number to a valid 1-based page.
pub fn clamp_page(page: i64) -> u32 {
    page.clamp(1, i64::from(u32::MAX)) as u32
}

/// Write `filters` into `current`.
///
/// Reserved parameters are carried over untouched, previous filter keys are
/// dropped, and `page` is reset to 1.
pub fn encode_filters(filters: &FilterState, current: &QueryParams) -> QueryParams {
    let mut next: QueryParams = current.iter().filter(|(k, _)| is_reserved(k)).collect();

    for (group, values) in filters.iter() {
        let joined = values
            .iter()
            .map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(",");
        next.set(group.as_str(), joined);
    }

    next.set(PAGE_PARAM, "1");
    next
}

/// Read the filter selection from a query against the known catalogue.
///
/// Keys and values that the catalogue cannot resolve are skipped.
pub fn decode_filters(query: &QueryParams, catalog: &FacetCatalog) -> FilterState {
    let mut filters = FilterState::new();

    for (key, raw) in query.iter() {
        if is_reserved(key) {
            continue;
        }
        let Some(group) = catalog.resolve_group(key) else {
            tracing::debug!(key, "skipping unknown facet group in query");
            continue;
        };

        for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match group.resolve_value(token) {
                Some(value) => filters.insert(group.id.clone(), value.id.clone()),
                None => tracing::debug!(group = %group.id, token, "skipping unknown facet value"),
            }
        }
    }

    filters
}

/// Page number from the query; missing, non-numeric or < 1 gives 1.
pub fn parse_page(query: &QueryParams) -> u32 {
    query
        .get(PAGE_PARAM)
        .and_then(|p| p.trim().parse::<i64>().ok())
        .map(clamp_page)
        .unwrap_or(1)
}

/// Copy of `current` pointing at `page`.
pub fn with_page(current: &QueryParams, page: u32) -> QueryParams {
    let mut next = current.clone();
    next.set(PAGE_PARAM, page.max(1).to_string());
    next
}

/// Sort from the query; unknown values fall back to the default sort.
pub fn decode_sort(query: &QueryParams) -> SortState {
    query
        .get(SORT_PARAM)
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

pub fn encode_sort(current: &QueryParams, sort: SortState) -> QueryParams {
    let mut next = current.clone();
    next.set(SORT_PARAM, sort.as_param());
    next
}

/// Free-text term from the query; blank terms count as absent.
pub fn decode_term(query: &QueryParams) -> Option<String> {
    query
        .get(TERM_PARAM)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Write or clear the free-text term and reset `page` to 1.
pub fn encode_term(current: &QueryParams, term: Option<&str>) -> QueryParams {
    let mut next = current.clone();
    match term.map(str::trim).filter(|t| !t.is_empty()) {
        Some(term) => next.set(TERM_PARAM, term),
        None => {
            next.remove(TERM_PARAM);
        }
    }
    next.set(PAGE_PARAM, "1");
    next
}
