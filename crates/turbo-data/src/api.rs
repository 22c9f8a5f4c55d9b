//! The commerce API boundary consumed by collection browsing.

use async_trait::async_trait;
use turbo_catalog::facets::FacetGroup;
use turbo_catalog::ids::ProductId;
use turbo_catalog::product::SearchResponse;
use turbo_catalog::search::SearchInput;

use crate::error::FetchError;

/// Queries a storefront needs from the commerce backend.
#[async_trait]
pub trait CommerceApi: Send + Sync {
    /// Run a collection search.
    async fn search(&self, input: &SearchInput) -> Result<SearchResponse, FetchError>;

    /// Every facet group with all of its values.
    async fn facets(&self) -> Result<Vec<FacetGroup>, FetchError>;

    /// Brand attribute of a product; `None` when the product has none.
    async fn product_brand(&self, id: &ProductId) -> Result<Option<String>, FetchError>;
}
