//! Best-effort brand lookups for displayed products.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Semaphore;
use tokio::task::{AbortHandle, JoinSet};
use turbo_catalog::ids::ProductId;
use turbo_catalog::product::Brand;
use turbo_data::CommerceApi;

/// Task set of in-flight brand lookups.
///
/// Each lookup is independent: it resolves one product's brand and hands the
/// result to a callback as soon as it completes. A failed lookup resolves to
/// [`Brand::Unknown`] and never affects other products.
pub(crate) struct BrandEnricher {
    api: Arc<dyn CommerceApi>,
    limit: Arc<Semaphore>,
    tasks: Mutex<Lookups>,
}

#[derive(Default)]
struct Lookups {
    set: JoinSet<()>,
    /// Outlives `set` while `settle` is joining it.
    handles: Vec<AbortHandle>,
}

impl BrandEnricher {
    pub fn new(api: Arc<dyn CommerceApi>, concurrency: usize) -> Self {
        Self {
            api,
            limit: Arc::new(Semaphore::new(concurrency.max(1))),
            tasks: Mutex::new(Lookups::default()),
        }
    }

    /// Start one lookup per product.
    pub fn spawn<F>(&self, ids: Vec<ProductId>, on_resolved: F)
    where
        F: Fn(ProductId, Brand) + Clone + Send + Sync + 'static,
    {
        if ids.is_empty() {
            return;
        }
        tracing::debug!(count = ids.len(), "requesting product brands");

        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        while tasks.set.try_join_next().is_some() {}
        tasks.handles.retain(|handle| !handle.is_finished());

        for id in ids {
            let api = Arc::clone(&self.api);
            let limit = Arc::clone(&self.limit);
            let on_resolved = on_resolved.clone();
            let handle = tasks.set.spawn(async move {
                let brand = lookup_brand(api.as_ref(), &limit, &id).await;
                on_resolved(id, brand);
            });
            tasks.handles.push(handle);
        }
    }

    /// Wait until every lookup, including ones started meanwhile, is done.
    pub async fn settle(&self) {
        loop {
            let mut batch = std::mem::take(&mut self.tasks.lock().unwrap_or_else(PoisonError::into_inner).set);
            if batch.is_empty() {
                return;
            }
            while let Some(result) = batch.join_next().await {
                if let Err(err) = result {
                    if err.is_panic() {
                        tracing::warn!(error = %err, "brand lookup task panicked");
                    }
                }
            }
        }
    }

    /// Abort every lookup, including ones `settle` is waiting on.
    pub fn abort_all(&self) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        for handle in tasks.handles.drain(..) {
            handle.abort();
        }
        tasks.set.abort_all();
    }
}

async fn lookup_brand(api: &dyn CommerceApi, limit: &Semaphore, id: &ProductId) -> Brand {
    let Ok(_permit) = limit.acquire().await else {
        return Brand::Unknown;
    };

    match api.product_brand(id).await {
        Ok(brand) => Brand::from_lookup(brand),
        Err(err) => {
            tracing::debug!(product_id = %id, error = %err, "brand lookup failed");
            Brand::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use turbo_catalog::facets::FacetGroup;
    use turbo_catalog::product::SearchResponse;
    use turbo_catalog::search::SearchInput;
    use turbo_data::FetchError;

    struct Brands(HashMap<&'static str, Result<Option<&'static str>, ()>>);

    #[async_trait]
    impl CommerceApi for Brands {
        async fn search(&self, _input: &SearchInput) -> Result<SearchResponse, FetchError> {
            Ok(SearchResponse::empty())
        }

        async fn facets(&self) -> Result<Vec<FacetGroup>, FetchError> {
            Ok(Vec::new())
        }

        async fn product_brand(&self, id: &ProductId) -> Result<Option<String>, FetchError> {
            match self.0.get(id.as_str()) {
                Some(Ok(brand)) => Ok(brand.map(str::to_string)),
                _ => Err(FetchError::Connection("refused".to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_each_lookup_resolves_independently() {
        let api = Brands(HashMap::from([
            ("1", Ok(Some("Acme"))),
            ("2", Err(())),
            ("3", Ok(None)),
        ]));
        let enricher = BrandEnricher::new(Arc::new(api), 2);
        let resolved = Arc::new(Mutex::new(HashMap::new()));

        let sink = Arc::clone(&resolved);
        enricher.spawn(
            vec![ProductId::new("1"), ProductId::new("2"), ProductId::new("3")],
            move |id, brand| {
                sink.lock().unwrap().insert(id, brand);
            },
        );
        enricher.settle().await;

        let resolved = resolved.lock().unwrap();
        assert_eq!(resolved[&ProductId::new("1")], Brand::Named("Acme".to_string()));
        assert_eq!(resolved[&ProductId::new("2")], Brand::Unknown);
        assert_eq!(resolved[&ProductId::new("3")], Brand::Unknown);
    }

    struct Stalled;

    #[async_trait]
    impl CommerceApi for Stalled {
        async fn search(&self, _input: &SearchInput) -> Result<SearchResponse, FetchError> {
            Ok(SearchResponse::empty())
        }

        async fn facets(&self) -> Result<Vec<FacetGroup>, FetchError> {
            Ok(Vec::new())
        }

        async fn product_brand(&self, _id: &ProductId) -> Result<Option<String>, FetchError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_abort_reaches_lookups_being_settled() {
        let enricher = Arc::new(BrandEnricher::new(Arc::new(Stalled), 4));
        let resolved = Arc::new(AtomicUsize::new(0));

        let seen = Arc::clone(&resolved);
        enricher.spawn(vec![ProductId::new("1"), ProductId::new("2")], move |_, _| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        let settling = tokio::spawn({
            let enricher = Arc::clone(&enricher);
            async move { enricher.settle().await }
        });
        // let settle take the batch before aborting
        tokio::time::sleep(Duration::from_millis(20)).await;
        enricher.abort_all();

        tokio::time::timeout(Duration::from_secs(1), settling)
            .await
            .expect("settle should finish once lookups are aborted")
            .unwrap();
        assert_eq!(resolved.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_settle_with_nothing_spawned() {
        let enricher = BrandEnricher::new(Arc::new(Brands(HashMap::new())), 1);
        enricher.spawn(Vec::new(), |_, _| {});
        enricher.settle().await;
    }
}
