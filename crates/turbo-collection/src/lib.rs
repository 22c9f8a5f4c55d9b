//! Faceted collection browsing for TurboCommerce storefronts.
//!
//! A [`CollectionEngine`] owns the browsing state of one collection view:
//! active filters, sort, page and free-text term, plus the last search
//! results and their facet counts. Every operation updates state, then the
//! URL, then re-fetches; a response is only applied if no newer request has
//! been issued since.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use turbo_collection::{CollectionConfig, CollectionEngine, MemoryRouter};
//! use turbo_data::{ApiConfig, GraphqlClient};
//!
//! let api = Arc::new(GraphqlClient::new(ApiConfig::new("https://shop.example/shop-api"))?);
//! let router = Arc::new(MemoryRouter::new("/collections/snowboards", "brand=acme"));
//! let engine = CollectionEngine::new(CollectionConfig::new("snowboards"), api, router);
//!
//! engine.init().await;
//! let view = engine.view();
//! println!("{} products", view.pagination_info.total_products);
//! ```

mod config;
mod engine;
mod enrichment;
mod router;
mod state;

pub use config::CollectionConfig;
pub use engine::{CollectionEngine, InitOutcome};
pub use router::{MemoryRouter, Router};
pub use state::CollectionView;
