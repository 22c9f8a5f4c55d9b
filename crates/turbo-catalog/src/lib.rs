//! Collection catalogue types and pure browsing logic for TurboCommerce.
//!
//! This crate holds everything about collection browsing that does not need
//! I/O:
//!
//! - **Facets**: facet catalogue lookups and reduction of raw search-result
//!   facet counts into counted facet groups
//! - **Search**: filter state, the URL query codec, sort state, pagination and
//!   the remote search request builder
//! - **Products**: search result items and their brand/facet enrichment
//!
//! # Example
//!
//! ```rust
//! use turbo_catalog::prelude::*;
//!
//! let filters = FilterState::new().toggle(&FacetId::new("brand"), &FacetValueId::new("acme"));
//! let input = build_search_input(
//!     &CollectionSlug::new("snowboards"),
//!     &filters,
//!     1,
//!     SortState::default(),
//!     24,
//!     None,
//! );
//!
//! assert_eq!(input.skip, 0);
//! assert_eq!(input.take, 24);
//! ```

pub mod error;
pub mod facets;
pub mod ids;
pub mod product;
pub mod search;

pub use error::CatalogError;
pub use ids::*;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CatalogError;
    pub use crate::ids::*;

    // Facets
    pub use crate::facets::{
        reduce_facets, CountedFacetGroup, CountedFacetValue, FacetCatalog, FacetDescriptor,
        FacetGroup, FacetParent, FacetValue, FacetValueRef, FacetValueResult,
    };

    // Products
    pub use crate::product::{
        Asset, Brand, EnrichedProduct, Price, ProductSearchResult, SearchResponse, UNKNOWN_BRAND,
    };

    // Search
    pub use crate::search::{
        build_search_input, clamp_page, decode_filters, decode_sort, decode_term,
        encode_filters, encode_sort, encode_term, parse_page, with_page, FacetValueFilter,
        FilterState, PaginationInfo, QueryParams, SearchInput, SearchSort, SortDirection,
        SortKey, SortState, RESERVED_PARAMS,
    };
}
