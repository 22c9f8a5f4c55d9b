//! Commerce API connection settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::FetchPolicy;
use crate::dependency::DependencyTag;
use crate::retry::RetryPolicy;
use crate::timeout::TimeoutConfig;

/// Connection settings for the shop GraphQL API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// GraphQL endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Channel token sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_token: Option<String>,

    /// Header carrying the channel token.
    #[serde(default = "default_channel_header")]
    pub channel_header: String,

    /// Content language, sent as the `languageCode` query parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    /// Per-attempt timeout override for every dependency, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// Retry count override for search and catalogue calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
}

fn default_endpoint() -> String {
    "http://localhost:3000/shop-api".to_string()
}

fn default_channel_header() -> String {
    "vendure-token".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            channel_token: None,
            channel_header: default_channel_header(),
            locale: None,
            timeout_ms: None,
            max_retries: None,
        }
    }
}

impl ApiConfig {
    /// Create a config for an endpoint with every other setting defaulted.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Fetch policy for a dependency with this config's overrides applied.
    ///
    /// Enrichment keeps its no-retry default regardless of `max_retries`.
    pub fn policy_for(&self, tag: DependencyTag) -> FetchPolicy {
        let mut policy = FetchPolicy::from_tag(tag);
        if let Some(ms) = self.timeout_ms {
            policy.timeout = TimeoutConfig::from_total(Duration::from_millis(ms));
        }
        if let Some(retries) = self.max_retries {
            if tag != DependencyTag::Enrichment {
                policy.retry = RetryPolicy::new(retries);
            }
        }
        policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_object() {
        let config: ApiConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.channel_header, "vendure-token");
    }

    #[test]
    fn test_policy_overrides() {
        let config = ApiConfig {
            timeout_ms: Some(800),
            max_retries: Some(3),
            ..ApiConfig::default()
        };

        let search = config.policy_for(DependencyTag::Search);
        assert_eq!(search.timeout.total, Duration::from_millis(800));
        assert_eq!(search.retry.max_retries, 3);

        let enrichment = config.policy_for(DependencyTag::Enrichment);
        assert_eq!(enrichment.retry.max_retries, 0);
    }
}
