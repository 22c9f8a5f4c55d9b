//! CLI configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use turbo_collection::CollectionConfig;
use turbo_data::{ApiConfig, DependencyTag};

/// Config file names searched from the working directory upwards.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["collections.toml", ".collections.toml", "collections.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Shop API connection.
    #[serde(default)]
    pub api: ApiConfig,

    /// Defaults for every browsed collection.
    #[serde(default)]
    pub collection: CollectionDefaults,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::parse(path, &content)
    }

    fn parse(path: &str, content: &str) -> Result<Self> {
        if path.ends_with(".json") {
            serde_json::from_str(content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Engine settings for one collection.
    pub fn collection_config(&self, slug: &str) -> CollectionConfig {
        let mut config = CollectionConfig::new(slug).with_page_size(self.collection.page_size);
        config.enrichment_concurrency = self.collection.enrichment_concurrency.max(1);
        config
    }
}

/// Collection view defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDefaults {
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

impl Default for CollectionDefaults {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            enrichment_concurrency: default_enrichment_concurrency(),
        }
    }
}

/// Generate a default collections.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Collections CLI configuration

[api]
endpoint = "http://localhost:3000/shop-api"
channel_header = "vendure-token"
# channel_token = "your-channel-token"
# locale = "en"
# timeout_ms = 5000
# max_retries = 1

[collection]
page_size = {page_size}
enrichment_concurrency = {concurrency}
"#,
        page_size = default_page_size(),
        concurrency = default_enrichment_concurrency(),
    )
}
