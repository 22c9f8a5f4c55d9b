//! GraphQL documents and response envelopes for the shop API.

use serde::{Deserialize, Serialize};
use turbo_catalog::facets::FacetGroup;
use turbo_catalog::product::SearchResponse;

use crate::error::FetchError;

pub(crate) const SEARCH_QUERY: &str = r#"
query SearchCollection($input: SearchInput!) {
  search(input: $input) {
    totalItems
    items {
      productId
      productVariantId
      productName
      slug
      currencyCode
      facetValueIds
      productAsset { id preview }
      priceWithTax {
        __typename
        ... on PriceRange { min max }
        ... on SinglePrice { value }
      }
    }
    facetValues {
      count
      facetValue { id name code facet { id name code } }
    }
  }
}
"#;

pub(crate) const FACETS_QUERY: &str = r#"
query Facets {
  facets(options: { take: 100 }) {
    items { id name code values { id name code } }
  }
}
"#;

pub(crate) const PRODUCT_BRAND_QUERY: &str = r#"
query ProductBrand($id: ID!) {
  product(id: $id) { customFields { brand } }
}
"#;

/// Body of a GraphQL POST.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest<'a, V: Serialize> {
    pub operation_name: &'a str,
    pub query: &'a str,
    pub variables: V,
}

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

/// GraphQL response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

impl<T> GraphqlResponse<T> {
    /// Data of a successful response; any reported error fails the call.
    pub fn into_result(self) -> Result<T, FetchError> {
        if !self.errors.is_empty() {
            let messages: Vec<String> = self.errors.into_iter().map(|e| e.message).collect();
            return Err(FetchError::Graphql(messages.join("; ")));
        }
        self.data.ok_or(FetchError::MissingData)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchData {
    pub search: SearchResponse,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FacetsData {
    pub facets: FacetList,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FacetList {
    pub items: Vec<FacetGroup>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductBrandData {
    pub product: Option<ProductBrand>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductBrand {
    #[serde(default)]
    pub custom_fields: Option<BrandFields>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BrandFields {
    #[serde(default)]
    pub brand: Option<String>,
}

impl ProductBrandData {
    pub fn brand(self) -> Option<String> {
        self.product?.custom_fields?.brand
    }
}
