//! Search module.
//!
//! Contains filter state, the URL query codec, sort options, pagination and
//! the remote search request builder.

mod filter;
mod pagination;
mod query;
mod request;
mod sort;

pub use filter::FilterState;
pub use pagination::PaginationInfo;
pub use query::{
    clamp_page, decode_filters, decode_sort, decode_term, encode_filters, encode_sort,
    encode_term, parse_page, with_page, QueryParams, PAGE_PARAM, RESERVED_PARAMS, SORT_PARAM,
    TERM_PARAM,
};
pub use request::{build_search_input, FacetValueFilter, SearchInput, SearchSort};
pub use sort::{SortDirection, SortKey, SortState};
