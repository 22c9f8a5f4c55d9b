//! Catalogue error types.

use thiserror::Error;

/// Errors raised while interpreting storefront input.
///
/// Unknown facet groups or values in a URL are never errors; they are
/// skipped during decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Sort parameter that names no known key or direction.
    #[error("Invalid sort option: {0}")]
    InvalidSort(String),

    /// Filter argument that is not of the form `group=value[,value...]`.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
}
