//! Commerce API access layer with dependency tagging and timeouts.
//!
//! This crate provides:
//! - `CommerceApi` - The query boundary collection browsing consumes
//! - `GraphqlClient` - `CommerceApi` over a GraphQL shop API
//! - `DependencyTag` - Semantic dependency categories
//! - `TimeoutConfig` - Per-dependency timeouts
//! - `RetryPolicy` - Retry strategies

mod api;
mod client;
mod config;
mod dependency;
mod error;
mod graphql;
mod retry;
mod timeout;

pub use api::*;
pub use client::*;
pub use config::*;
pub use dependency::*;
pub use error::*;
pub use graphql::{GraphqlError, GraphqlRequest, GraphqlResponse};
pub use retry::*;
pub use timeout::*;
