//! Browsing state owned by a collection engine.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use turbo_catalog::facets::{reduce_facets, CountedFacetGroup, FacetCatalog};
use turbo_catalog::ids::ProductId;
use turbo_catalog::product::{Brand, EnrichedProduct, SearchResponse};
use turbo_catalog::search::{build_search_input, FilterState, PaginationInfo, SearchInput, SortState};

use crate::config::CollectionConfig;

/// Snapshot of a collection view for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionView {
    pub products: Vec<EnrichedProduct>,
    pub facet_values: Vec<CountedFacetGroup>,
    pub sort: SortState,
    pub pagination_info: PaginationInfo,
    pub filters_open: bool,
    pub filters: FilterState,
    pub term: Option<String>,
}

#[derive(Debug, Default)]
pub(crate) struct CollectionState {
    pub filters: FilterState,
    pub sort: SortState,
    pub page: u32,
    pub term: Option<String>,
    pub products: Vec<EnrichedProduct>,
    pub facet_values: Vec<CountedFacetGroup>,
    pub total_items: u32,
    pub filters_open: bool,
    pub catalog: Arc<FacetCatalog>,
    pub catalog_loaded: bool,
    /// Results were seeded by the host and not fetched yet.
    pub seeded: bool,
    /// Resolved brands by product, kept across fetches.
    pub brands: HashMap<ProductId, Brand>,
    /// Products with a brand lookup in flight.
    pub brand_requests: HashSet<ProductId>,
}

impl CollectionState {
    pub fn new() -> Self {
        Self {
            page: 1,
            ..Self::default()
        }
    }

    pub fn search_input(&self, config: &CollectionConfig) -> SearchInput {
        build_search_input(
            &config.collection_slug,
            &self.filters,
            i64::from(self.page),
            self.sort,
            config.page_size,
            self.term.as_deref(),
        )
    }

    /// Replace results, facets and total with a search response.
    ///
    /// Cached brands are carried over; everything else starts as pending.
    pub fn apply_response(&mut self, response: SearchResponse) {
        let brands = &self.brands;
        let catalog = &self.catalog;

        self.products = response
            .items
            .into_iter()
            .map(|item| {
                let brand = brands.get(&item.product_id).cloned().unwrap_or_default();
                EnrichedProduct::new(item, catalog, brand)
            })
            .collect();
        self.facet_values = reduce_facets(&response.facet_values);
        self.total_items = response.total_items;
    }

    /// Displayed products with no cached brand and no lookup in flight.
    ///
    /// The returned products are marked as in flight.
    pub fn take_missing_brands(&mut self) -> Vec<ProductId> {
        let mut missing = Vec::new();
        for product in &self.products {
            let id = product.id();
            if !self.brands.contains_key(id) && self.brand_requests.insert(id.clone()) {
                missing.push(id.clone());
            }
        }
        missing
    }

    /// Swap in a new catalogue and re-describe displayed products with it.
    pub fn set_catalog(&mut self, catalog: Arc<FacetCatalog>) {
        for product in &mut self.products {
            product.facets = catalog.describe_all(&product.product.facet_value_ids);
        }
        self.catalog = catalog;
        self.catalog_loaded = true;
    }

    /// No filters, first page, default sort and no term.
    pub fn is_default_view(&self) -> bool {
        self.filters.is_empty()
            && self.page == 1
            && self.sort == SortState::default()
            && self.term.is_none()
    }

    /// Merge a resolved brand into the cache and every displayed product.
    pub fn apply_brand(&mut self, id: &ProductId, brand: Brand) {
        self.brand_requests.remove(id);
        for product in self.products.iter_mut().filter(|p| p.id() == id) {
            product.brand = brand.clone();
        }
        self.brands.insert(id.clone(), brand);
    }

    pub fn view(&self, config: &CollectionConfig) -> CollectionView {
        CollectionView {
            products: self.products.clone(),
            facet_values: self.facet_values.clone(),
            sort: self.sort,
            pagination_info: PaginationInfo::new(self.page, config.page_size, self.total_items),
            filters_open: self.filters_open,
            filters: self.filters.clone(),
            term: self.term.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turbo_catalog::facets::{FacetGroup, FacetParent, FacetValue, FacetValueRef, FacetValueResult};
    use turbo_catalog::ids::{FacetId, FacetValueId, VariantId};
    use turbo_catalog::product::{Price, ProductSearchResult};

    fn item(id: &str) -> ProductSearchResult {
        ProductSearchResult {
            product_id: ProductId::new(id),
            product_variant_id: VariantId::new(format!("{}-1", id)),
            product_name: format!("Product {}", id),
            slug: format!("product-{}", id),
            price_with_tax: Price::Single { value: 1000 },
            currency_code: "USD".to_string(),
            product_asset: None,
            facet_value_ids: Vec::new(),
        }
    }

    fn response(ids: &[&str]) -> SearchResponse {
        SearchResponse {
            items: ids.iter().map(|id| item(id)).collect(),
            total_items: ids.len() as u32,
            facet_values: vec![FacetValueResult {
                facet_value: FacetValueRef {
                    id: FacetValueId::new("v1"),
                    name: "Acme".to_string(),
                    code: "acme".to_string(),
                    facet: FacetParent {
                        id: FacetId::new("g1"),
                        name: "Brand".to_string(),
                        code: "brand".to_string(),
                    },
                },
                count: ids.len() as u32,
            }],
        }
    }

    #[test]
    fn test_response_replaces_results() {
        let mut state = CollectionState::new();
        state.apply_response(response(&["1", "2"]));
        state.apply_response(response(&["3"]));

        assert_eq!(state.products.len(), 1);
        assert_eq!(state.products[0].id().as_str(), "3");
        assert_eq!(state.total_items, 1);
        assert_eq!(state.facet_values[0].values[0].count, 1);
    }

    #[test]
    fn test_brand_lookups_requested_once() {
        let mut state = CollectionState::new();
        state.apply_response(response(&["1", "2"]));
        assert_eq!(state.take_missing_brands().len(), 2);

        // still in flight
        state.apply_response(response(&["1", "2"]));
        assert!(state.take_missing_brands().is_empty());

        state.apply_brand(&ProductId::new("1"), Brand::Named("Acme".to_string()));
        state.apply_response(response(&["1", "3"]));
        assert_eq!(state.take_missing_brands(), vec![ProductId::new("3")]);
        assert_eq!(state.products[0].brand_label(), "Acme");
    }

    #[test]
    fn test_catalog_redescribes_products() {
        let mut state = CollectionState::new();
        let mut seeded = response(&["1"]);
        seeded.items[0].facet_value_ids = vec![FacetValueId::new("v1")];
        state.apply_response(seeded);
        assert!(state.products[0].facets.is_empty());

        state.set_catalog(Arc::new(FacetCatalog::new(vec![FacetGroup {
            id: FacetId::new("g1"),
            name: "Brand".to_string(),
            code: "brand".to_string(),
            values: vec![FacetValue {
                id: FacetValueId::new("v1"),
                name: "Acme".to_string(),
                code: "acme".to_string(),
            }],
        }])));

        assert_eq!(state.products[0].facets[0].value, "Acme");
        assert!(state.catalog_loaded);
    }

    #[test]
    fn test_default_view() {
        let mut state = CollectionState::new();
        assert!(state.is_default_view());
        state.term = Some("wax".to_string());
        assert!(!state.is_default_view());
    }

    #[test]
    fn test_brand_merge_by_id() {
        let mut state = CollectionState::new();
        state.apply_response(response(&["1", "2"]));
        state.apply_brand(&ProductId::new("2"), Brand::Unknown);

        assert_eq!(state.products[0].brand, Brand::Pending);
        assert_eq!(state.products[1].brand, Brand::Unknown);
    }

    #[test]
    fn test_brand_for_product_no_longer_shown() {
        let mut state = CollectionState::new();
        state.apply_response(response(&["1"]));
        state.apply_response(response(&["2"]));
        state.apply_brand(&ProductId::new("1"), Brand::Named("Acme".to_string()));

        assert_eq!(state.products.len(), 1);
        assert_eq!(state.brands.get(&ProductId::new("1")), Some(&Brand::Named("Acme".to_string())));
    }

    #[test]
    fn test_view_pagination() {
        let mut state = CollectionState::new();
        state.page = 2;
        state.total_items = 50;
        let view = state.view(&CollectionConfig::new("c").with_page_size(20));

        assert_eq!(view.pagination_info.total_pages, 3);
        assert_eq!(view.pagination_info.current_page, 2);
    }
}
