//! GraphQL client for the shop API with dependency-tagged policies.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use turbo_catalog::facets::FacetGroup;
use turbo_catalog::ids::ProductId;
use turbo_catalog::product::SearchResponse;
use turbo_catalog::search::SearchInput;

use crate::api::CommerceApi;
use crate::config::ApiConfig;
use crate::dependency::DependencyTag;
use crate::error::FetchError;
use crate::graphql::{
    FacetsData, GraphqlRequest, GraphqlResponse, ProductBrandData, SearchData, FACETS_QUERY,
    PRODUCT_BRAND_QUERY, SEARCH_QUERY,
};
use crate::retry::RetryPolicy;
use crate::timeout::TimeoutConfig;

/// Fetch policy combining timeout and retry configuration.
#[derive(Debug, Clone, Default)]
pub struct FetchPolicy {
    /// Timeout configuration.
    pub timeout: TimeoutConfig,
    /// Retry policy.
    pub retry: RetryPolicy,
}

impl FetchPolicy {
    /// Create a new fetch policy.
    pub fn new(timeout: TimeoutConfig, retry: RetryPolicy) -> Self {
        Self { timeout, retry }
    }

    /// Create from a dependency tag's defaults.
    pub fn from_tag(tag: DependencyTag) -> Self {
        Self {
            timeout: TimeoutConfig::from_total(tag.default_timeout()),
            retry: RetryPolicy::new(tag.default_max_retries()),
        }
    }
}

/// Shop API client.
///
/// Every call is tagged with a [`DependencyTag`] that selects its timeout and
/// retry policy.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl GraphqlClient {
    /// Create a new client from connection settings.
    pub fn new(config: ApiConfig) -> Result<Self, FetchError> {
        let connect = config.policy_for(DependencyTag::Search).timeout.connect;
        let http = reqwest::Client::builder()
            .connect_timeout(connect)
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Run a GraphQL operation with the tag's timeout and retry policy.
    pub async fn execute<V, T>(
        &self,
        tag: DependencyTag,
        operation_name: &str,
        query: &str,
        variables: V,
    ) -> Result<T, FetchError>
    where
        V: Serialize + Send + Sync,
        T: DeserializeOwned,
    {
        let policy = self.config.policy_for(tag);
        let body = GraphqlRequest {
            operation_name,
            query,
            variables,
        };

        let mut attempt = 0;
        loop {
            let result = tokio::time::timeout(policy.timeout.total, self.send_once(&body))
                .await
                .unwrap_or_else(|_| {
                    Err(FetchError::Timeout(format!(
                        "{} after {:?}",
                        operation_name, policy.timeout.total
                    )))
                });

            match result {
                Ok(data) => return Ok(data),
                Err(err) if policy.retry.should_retry(&err, attempt) => {
                    let delay = policy.retry.backoff.delay_for_attempt(attempt);
                    tracing::warn!(
                        dependency = %tag,
                        operation = operation_name,
                        attempt,
                        error = %err,
                        "retrying commerce API call"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    if tag.is_critical() {
                        tracing::warn!(dependency = %tag, operation = operation_name, error = %err, "commerce API call failed");
                    } else {
                        tracing::debug!(dependency = %tag, operation = operation_name, error = %err, "commerce API call failed");
                    }
                    return Err(err);
                }
            }
        }
    }

    async fn send_once<V, T>(&self, body: &GraphqlRequest<'_, V>) -> Result<T, FetchError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        tracing::debug!(operation = body.operation_name, endpoint = %self.config.endpoint, "sending GraphQL request");

        let mut request = self.http.post(&self.config.endpoint).json(body);
        if let Some(token) = &self.config.channel_token {
            request = request.header(self.config.channel_header.as_str(), token.as_str());
        }
        if let Some(locale) = &self.config.locale {
            request = request.query(&[("languageCode", locale.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                url: self.config.endpoint.clone(),
            });
        }

        let bytes = response.bytes().await?;
        let envelope: GraphqlResponse<T> = serde_json::from_slice(&bytes)?;
        envelope.into_result()
    }
}

#[async_trait]
impl CommerceApi for GraphqlClient {
    async fn search(&self, input: &SearchInput) -> Result<SearchResponse, FetchError> {
        let data: SearchData = self
            .execute(
                DependencyTag::Search,
                "SearchCollection",
                SEARCH_QUERY,
                json!({ "input": input }),
            )
            .await?;
        Ok(data.search)
    }

    async fn facets(&self) -> Result<Vec<FacetGroup>, FetchError> {
        let data: FacetsData = self
            .execute(DependencyTag::Catalog, "Facets", FACETS_QUERY, json!({}))
            .await?;
        Ok(data.facets.items)
    }

    async fn product_brand(&self, id: &ProductId) -> Result<Option<String>, FetchError> {
        let data: ProductBrandData = self
            .execute(
                DependencyTag::Enrichment,
                "ProductBrand",
                PRODUCT_BRAND_QUERY,
                json!({ "id": id }),
            )
            .await?;
        Ok(data.brand())
    }
}
