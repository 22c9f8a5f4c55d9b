//! In-memory commerce API used by the engine tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{oneshot, Notify};
use turbo_catalog::prelude::*;
use turbo_data::{CommerceApi, FetchError};

pub const BRAND: &str = "g-brand";
pub const COLOR: &str = "g-color";
pub const ACME: &str = "v-acme";
pub const ZETA: &str = "v-zeta";
pub const RED: &str = "v-red";
pub const BLUE: &str = "v-blue";

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// Brand and color groups, each with two values.
pub fn catalog() -> Vec<FacetGroup> {
    vec![
        group(BRAND, "Brand", "brand", &[(ACME, "Acme"), (ZETA, "Zeta")]),
        group(COLOR, "Color", "color", &[(RED, "Red"), (BLUE, "Blue")]),
    ]
}

fn group(id: &str, name: &str, code: &str, values: &[(&str, &str)]) -> FacetGroup {
    FacetGroup {
        id: FacetId::new(id),
        name: name.to_string(),
        code: code.to_string(),
        values: values
            .iter()
            .map(|(id, name)| FacetValue {
                id: FacetValueId::new(*id),
                name: name.to_string(),
                code: name.to_lowercase(),
            })
            .collect(),
    }
}

/// Products 1..=50 named `Board 01`..`Board 50`.
///
/// Even products are Acme, odd ones Zeta; multiples of 3 are red, the rest
/// blue. Price rises with the product number.
pub fn products() -> Vec<ProductSearchResult> {
    (1..=50).map(product).collect()
}

pub fn product(n: u32) -> ProductSearchResult {
    let brand = if n % 2 == 0 { ACME } else { ZETA };
    let color = if n % 3 == 0 { RED } else { BLUE };

    ProductSearchResult {
        product_id: ProductId::new(n.to_string()),
        product_variant_id: VariantId::new(format!("{}-1", n)),
        product_name: format!("Board {:02}", n),
        slug: format!("board-{:02}", n),
        price_with_tax: Price::Single {
            value: 1000 + i64::from(n) * 100,
        },
        currency_code: "USD".to_string(),
        product_asset: None,
        facet_value_ids: vec![FacetValueId::new(brand), FacetValueId::new(color)],
    }
}

fn facet_ref(value: &FacetValueId) -> Option<FacetValueRef> {
    catalog().into_iter().find_map(|group| {
        group.values.iter().find(|v| &v.id == value).map(|v| FacetValueRef {
            id: v.id.clone(),
            name: v.name.clone(),
            code: v.code.clone(),
            facet: FacetParent {
                id: group.id.clone(),
                name: group.name.clone(),
                code: group.code.clone(),
            },
        })
    })
}

// ---------------------------------------------------------------------------
// Mock API
// ---------------------------------------------------------------------------

/// Runs searches against [`products`] the way the shop API would.
///
/// Every search and brand lookup is recorded. Searches can be held open to
/// control response order.
#[derive(Default)]
pub struct MockApi {
    searches: Mutex<Vec<SearchInput>>,
    brand_calls: Mutex<Vec<ProductId>>,
    brands: Mutex<HashMap<String, Result<Option<String>, ()>>>,
    fail_search: AtomicBool,
    fail_facets: AtomicBool,
    gate: Mutex<Option<(oneshot::Receiver<()>, Arc<Notify>)>>,
}

impl MockApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn searches(&self) -> Vec<SearchInput> {
        self.searches.lock().unwrap().clone()
    }

    pub fn last_search(&self) -> SearchInput {
        self.searches().pop().expect("no search issued")
    }

    pub fn brand_calls(&self) -> Vec<ProductId> {
        self.brand_calls.lock().unwrap().clone()
    }

    pub fn set_brand(&self, id: &str, brand: Result<Option<&str>, ()>) {
        self.brands
            .lock()
            .unwrap()
            .insert(id.to_string(), brand.map(|b| b.map(str::to_string)));
    }

    pub fn fail_search(&self, fail: bool) {
        self.fail_search.store(fail, Ordering::SeqCst);
    }

    pub fn fail_facets(&self, fail: bool) {
        self.fail_facets.store(fail, Ordering::SeqCst);
    }

    /// Hold the next search until the returned sender fires.
    ///
    /// The notify fires once that search has been received.
    pub fn hold_next_search(&self) -> (oneshot::Sender<()>, Arc<Notify>) {
        let (release, held) = oneshot::channel();
        let entered = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some((held, Arc::clone(&entered)));
        (release, entered)
    }

    fn run_search(input: &SearchInput) -> SearchResponse {
        let mut matched: Vec<ProductSearchResult> = products()
            .into_iter()
            .filter(|p| {
                input
                    .facet_value_filters
                    .iter()
                    .all(|clause| clause.matches(&p.facet_value_ids))
            })
            .filter(|p| match &input.term {
                Some(term) => p.product_name.to_lowercase().contains(&term.to_lowercase()),
                None => true,
            })
            .collect();

        if let Some(direction) = input.sort.name {
            matched.sort_by(|a, b| a.product_name.cmp(&b.product_name));
            if direction == SortDirection::Desc {
                matched.reverse();
            }
        } else if let Some(direction) = input.sort.price {
            matched.sort_by_key(|p| p.price_with_tax.min());
            if direction == SortDirection::Desc {
                matched.reverse();
            }
        }

        let facet_values = matched
            .iter()
            .flat_map(|p| p.facet_value_ids.iter())
            .filter_map(facet_ref)
            .map(|facet_value| FacetValueResult {
                facet_value,
                count: 1,
            })
            .collect();

        SearchResponse {
            total_items: matched.len() as u32,
            items: matched
                .into_iter()
                .skip(input.skip as usize)
                .take(input.take as usize)
                .collect(),
            facet_values,
        }
    }
}

#[async_trait]
impl CommerceApi for MockApi {
    async fn search(&self, input: &SearchInput) -> Result<SearchResponse, FetchError> {
        self.searches.lock().unwrap().push(input.clone());
        let failing = self.fail_search.load(Ordering::SeqCst);

        let gate = self.gate.lock().unwrap().take();
        if let Some((held, entered)) = gate {
            entered.notify_one();
            let _ = held.await;
        }

        if failing {
            return Err(FetchError::Http {
                status: 503,
                url: "mock://shop-api".to_string(),
            });
        }
        Ok(Self::run_search(input))
    }

    async fn facets(&self) -> Result<Vec<FacetGroup>, FetchError> {
        if self.fail_facets.load(Ordering::SeqCst) {
            return Err(FetchError::Timeout("facets".to_string()));
        }
        Ok(catalog())
    }

    async fn product_brand(&self, id: &ProductId) -> Result<Option<String>, FetchError> {
        self.brand_calls.lock().unwrap().push(id.clone());
        match self.brands.lock().unwrap().get(id.as_str()).cloned() {
            Some(Ok(brand)) => Ok(brand),
            Some(Err(())) => Err(FetchError::Connection("connection reset".to_string())),
            None => Ok(Some(format!("Brand {}", id))),
        }
    }
}
