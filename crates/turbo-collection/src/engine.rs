//! The collection state engine.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::watch;
use turbo_catalog::facets::{FacetCatalog, FacetGroup};
use turbo_catalog::ids::{FacetId, FacetValueId, ProductId};
use turbo_catalog::product::{Brand, SearchResponse};
use turbo_catalog::search::{
    clamp_page, decode_filters, decode_sort, decode_term, encode_filters, encode_sort,
    encode_term, parse_page, with_page, QueryParams, SearchInput, SortState,
};
use turbo_data::CommerceApi;

use crate::config::CollectionConfig;
use crate::enrichment::BrandEnricher;
use crate::router::Router;
use crate::state::{CollectionState, CollectionView};

/// Result of [`CollectionEngine::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// The URL was read and a search issued.
    Fetched,
    /// The URL matched the seeded results, so no search was needed.
    Seeded,
    /// The router is not ready; call `init` again once it is.
    Deferred,
}

/// Browsing session for one collection view.
///
/// Every operation follows the same order: the state is updated from its
/// latest value, the URL is rewritten, then a search is issued. Each search
/// carries a sequence number and its response is only applied while that
/// number is still the latest issued, so a slow response can never replace
/// the results of a newer one.
///
/// The handle is cheap to clone; clones share one session.
#[derive(Clone)]
pub struct CollectionEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    config: CollectionConfig,
    api: Arc<dyn CommerceApi>,
    router: Arc<dyn Router>,
    state: Mutex<CollectionState>,
    latest_seq: AtomicU64,
    changes: watch::Sender<u64>,
    enricher: BrandEnricher,
    closed: AtomicBool,
}

impl CollectionEngine {
    pub fn new(config: CollectionConfig, api: Arc<dyn CommerceApi>, router: Arc<dyn Router>) -> Self {
        let enricher = BrandEnricher::new(Arc::clone(&api), config.enrichment_concurrency);
        let (changes, _) = watch::channel(0);

        Self {
            inner: Arc::new(EngineInner {
                config,
                api,
                router,
                state: Mutex::new(CollectionState::new()),
                latest_seq: AtomicU64::new(0),
                changes,
                enricher,
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Seed the view with results rendered before the engine started.
    ///
    /// `init` skips its search when the URL asks for the default view.
    pub fn with_initial(self, response: SearchResponse) -> Self {
        {
            let mut state = self.inner.lock_state();
            state.apply_response(response);
            state.seeded = true;
        }
        self
    }

    /// Provide the facet catalogue instead of fetching it during `init`.
    pub fn with_catalog(self, groups: Vec<FacetGroup>) -> Self {
        self.inner
            .lock_state()
            .set_catalog(Arc::new(FacetCatalog::new(groups)));
        self
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.inner.config
    }

    /// Read the URL into state and issue the first search.
    ///
    /// Does nothing and returns [`InitOutcome::Deferred`] while the router is
    /// not ready; the host calls `init` again once it is.
    pub async fn init(&self) -> InitOutcome {
        if !self.inner.router.is_ready() {
            tracing::debug!(slug = %self.inner.config.collection_slug, "router not ready, deferring initial search");
            return InitOutcome::Deferred;
        }

        self.ensure_catalog().await;

        let query = self.inner.router.query();
        let issued = {
            let mut state = self.inner.lock_state();
            let filters = decode_filters(&query, &state.catalog);
            state.filters = filters;
            state.page = parse_page(&query);
            state.sort = decode_sort(&query);
            state.term = decode_term(&query);

            let seeded = std::mem::take(&mut state.seeded);
            if seeded && state.is_default_view() {
                Err(state.take_missing_brands())
            } else {
                Ok((self.inner.issue(&state), state.filters.active_count()))
            }
        };
        self.inner.notify();

        let ((seq, input), filters) = match issued {
            Ok(issued) => issued,
            Err(missing) => {
                tracing::debug!(slug = %self.inner.config.collection_slug, "using seeded results");
                self.spawn_enrichment(missing);
                return InitOutcome::Seeded;
            }
        };

        tracing::info!(
            slug = %self.inner.config.collection_slug,
            filters,
            page = input.page(),
            "collection view initialized"
        );
        self.fetch(seq, input).await;
        InitOutcome::Fetched
    }

    /// Select a facet value. Selecting an already selected value keeps it.
    pub async fn apply_filter(&self, group: &FacetId, value: &FacetValueId) {
        self.update(|state, query| {
            state.filters = state.filters.with_value(group, value);
            state.page = 1;
            encode_filters(&state.filters, query)
        })
        .await;
    }

    /// Deselect a facet value; the group disappears with its last value.
    pub async fn remove_filter(&self, group: &FacetId, value: &FacetValueId) {
        self.update(|state, query| {
            state.filters = state.filters.without_value(group, value);
            state.page = 1;
            encode_filters(&state.filters, query)
        })
        .await;
    }

    /// Drop every selected facet value.
    pub async fn clear_filters(&self) {
        self.update(|state, query| {
            state.filters = Default::default();
            state.page = 1;
            encode_filters(&state.filters, query)
        })
        .await;
    }

    /// Go to `page`; anything below 1 goes to the first page.
    pub async fn change_page(&self, page: i64) {
        let page = clamp_page(page);
        self.update(|state, query| {
            state.page = page;
            with_page(query, page)
        })
        .await;
    }

    /// Change the sort order, staying on the current page.
    pub async fn handle_sort(&self, sort: SortState) {
        self.update(|state, query| {
            state.sort = sort;
            encode_sort(query, sort)
        })
        .await;
    }

    /// Set or clear the free-text term and go back to the first page.
    pub async fn search(&self, term: Option<&str>) {
        let term = term.map(str::trim).filter(|t| !t.is_empty());
        self.update(|state, query| {
            state.term = term.map(str::to_string);
            state.page = 1;
            encode_term(query, term)
        })
        .await;
    }

    pub fn set_filters_open(&self, open: bool) {
        self.inner.lock_state().filters_open = open;
        self.inner.notify();
    }

    /// Current state for rendering.
    pub fn view(&self) -> CollectionView {
        self.inner.lock_state().view(&self.inner.config)
    }

    /// Change counter, bumped on every state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.changes.subscribe()
    }

    pub fn version(&self) -> u64 {
        *self.inner.changes.borrow()
    }

    /// Wait for outstanding brand lookups.
    pub async fn settle(&self) {
        self.inner.enricher.settle().await;
    }

    /// End the session: in-flight searches are discarded and brand lookups
    /// aborted.
    pub fn teardown(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        self.inner.latest_seq.fetch_add(1, Ordering::SeqCst);
        self.inner.enricher.abort_all();
        tracing::debug!(slug = %self.inner.config.collection_slug, "collection view torn down");
    }

    /// Mutate state, rewrite the URL and search with the result.
    ///
    /// The closure sees the latest state and the current URL query and
    /// returns the next query.
    async fn update<F>(&self, mutate: F)
    where
        F: FnOnce(&mut CollectionState, &QueryParams) -> QueryParams,
    {
        let (seq, input) = {
            let mut state = self.inner.lock_state();
            let next = mutate(&mut state, &self.inner.router.query());
            self.inner.router.replace(next);
            self.inner.issue(&state)
        };
        self.inner.notify();
        self.fetch(seq, input).await;
    }

    async fn fetch(&self, seq: u64, input: SearchInput) {
        tracing::debug!(
            seq,
            slug = %input.collection_slug,
            skip = input.skip,
            take = input.take,
            "searching collection"
        );

        let response = match self.inner.api.search(&input).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(seq, slug = %input.collection_slug, error = %err, "collection search failed, showing no products");
                SearchResponse::empty()
            }
        };

        let missing = {
            let mut state = self.inner.lock_state();
            let latest = self.inner.latest_seq.load(Ordering::SeqCst);
            if seq != latest {
                tracing::debug!(seq, latest, "discarding stale search response");
                return;
            }
            state.apply_response(response);
            state.take_missing_brands()
        };
        self.inner.notify();
        self.spawn_enrichment(missing);
    }

    async fn ensure_catalog(&self) {
        if self.inner.lock_state().catalog_loaded {
            return;
        }

        match self.inner.api.facets().await {
            Ok(groups) => {
                tracing::debug!(groups = groups.len(), "facet catalogue loaded");
                self.inner
                    .lock_state()
                    .set_catalog(Arc::new(FacetCatalog::new(groups)));
            }
            Err(err) => {
                tracing::warn!(error = %err, "facet catalogue unavailable, ignoring URL filters");
            }
        }
    }

    fn spawn_enrichment(&self, ids: Vec<ProductId>) {
        let inner: Weak<EngineInner> = Arc::downgrade(&self.inner);
        self.inner.enricher.spawn(ids, move |id, brand| {
            if let Some(inner) = inner.upgrade() {
                inner.merge_brand(&id, brand);
            }
        });
    }
}

impl EngineInner {
    fn lock_state(&self) -> MutexGuard<'_, CollectionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Issue the next sequence number and the search for `state`.
    ///
    /// Called with the state lock held so sequence order matches the order
    /// of state changes.
    fn issue(&self, state: &CollectionState) -> (u64, SearchInput) {
        let seq = self.latest_seq.fetch_add(1, Ordering::SeqCst) + 1;
        (seq, state.search_input(&self.config))
    }

    fn merge_brand(&self, id: &ProductId, brand: Brand) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        self.lock_state().apply_brand(id, brand);
        self.notify();
    }

    fn notify(&self) {
        self.changes.send_modify(|version| *version += 1);
    }
}

impl std::fmt::Debug for CollectionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionEngine")
            .field("config", &self.inner.config)
            .field("latest_seq", &self.inner.latest_seq.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
