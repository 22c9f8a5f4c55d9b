//! Collection view configuration.

use serde::{Deserialize, Serialize};
use turbo_catalog::ids::CollectionSlug;
use turbo_data::DependencyTag;

/// Settings for one collection view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Collection being browsed.
    pub collection_slug: CollectionSlug,

    /// Products per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Maximum concurrent brand lookups.
    #[serde(default = "default_enrichment_concurrency")]
    pub enrichment_concurrency: usize,
}

fn default_page_size() -> u32 {
    24
}

fn default_enrichment_concurrency() -> usize {
    DependencyTag::Enrichment.default_concurrency()
}

impl CollectionConfig {
    pub fn new(collection_slug: impl Into<CollectionSlug>) -> Self {
        Self {
            collection_slug: collection_slug.into(),
            page_size: default_page_size(),
            enrichment_concurrency: default_enrichment_concurrency(),
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}
