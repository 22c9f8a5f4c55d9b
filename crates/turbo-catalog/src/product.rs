//! Search result items and their enrichment.

use serde::{Deserialize, Serialize, Serializer};

use crate::facets::{FacetCatalog, FacetDescriptor, FacetValueResult};
use crate::ids::{AssetId, FacetValueId, ProductId, VariantId};

/// Label shown for products whose brand could not be resolved.
pub const UNKNOWN_BRAND: &str = "Unknown brand";

/// Price of a grouped search result, in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum Price {
    /// Variants of the product span a price range.
    #[serde(rename = "PriceRange")]
    Range { min: i64, max: i64 },
    /// All variants share one price.
    #[serde(rename = "SinglePrice")]
    Single { value: i64 },
}

impl Price {
    /// Lowest price, used for sorting and "from" labels.
    pub fn min(&self) -> i64 {
        match self {
            Self::Range { min, .. } => *min,
            Self::Single { value } => *value,
        }
    }

    /// Format for display, e.g. `12.50 USD` or `10.00 - 20.00 USD`.
    pub fn display(&self, currency: &str) -> String {
        match self {
            Self::Range { min, max } if min != max => {
                format!("{} - {} {}", format_minor(*min), format_minor(*max), currency)
            }
            Self::Range { min, .. } => format!("{} {}", format_minor(*min), currency),
            Self::Single { value } => format!("{} {}", format_minor(*value), currency),
        }
    }
}

fn format_minor(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Featured image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub preview: String,
}

/// One product/variant pairing from a collection search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearchResult {
    pub product_id: ProductId,
    pub product_variant_id: VariantId,
    pub product_name: String,
    pub slug: String,
    pub price_with_tax: Price,
    pub currency_code: String,
    #[serde(default)]
    pub product_asset: Option<Asset>,
    #[serde(default)]
    pub facet_value_ids: Vec<FacetValueId>,
}

/// Raw search response from the commerce API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub items: Vec<ProductSearchResult>,
    pub total_items: u32,
    #[serde(default)]
    pub facet_values: Vec<FacetValueResult>,
}

impl SearchResponse {
    /// Response used when a search fails: no items, no facets, zero total.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Brand resolution state of a displayed product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "status", content = "name", rename_all = "lowercase")]
pub enum Brand {
    /// Lookup not finished yet.
    #[default]
    Pending,
    /// Brand resolved.
    Named(String),
    /// Lookup failed or the product has no brand.
    Unknown,
}

impl Brand {
    /// Interpret a brand lookup; blank brands count as unknown.
    pub fn from_lookup(brand: Option<String>) -> Self {
        match brand.map(|b| b.trim().to_string()) {
            Some(b) if !b.is_empty() => Self::Named(b),
            _ => Self::Unknown,
        }
    }

    /// Display label; anything but a resolved brand renders the sentinel.
    pub fn label(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Pending | Self::Unknown => UNKNOWN_BRAND,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// A search result with its brand and described facet values.
///
/// Serializes with a `brandLabel` next to `brand`, so renderers always have
/// a display string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedProduct {
    pub product: ProductSearchResult,
    pub brand: Brand,
    pub facets: Vec<FacetDescriptor>,
}

impl EnrichedProduct {
    /// Describe the product's facet values using the catalogue.
    pub fn new(product: ProductSearchResult, catalog: &FacetCatalog, brand: Brand) -> Self {
        let facets = catalog.describe_all(&product.facet_value_ids);
        Self {
            product,
            brand,
            facets,
        }
    }

    pub fn id(&self) -> &ProductId {
        &self.product.product_id
    }

    pub fn brand_label(&self) -> &str {
        self.brand.label()
    }
}

impl Serialize for EnrichedProduct {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Wire<'a> {
            #[serde(flatten)]
            product: &'a ProductSearchResult,
            brand: &'a Brand,
            brand_label: &'a str,
            facets: &'a [FacetDescriptor],
        }

        Wire {
            product: &self.product,
            brand: &self.brand,
            brand_label: self.brand_label(),
            facets: &self.facets,
        }
        .serialize(serializer)
    }
}
