//! Dependency tagging for semantic categorization.

use std::time::Duration;

/// Categories of commerce API calls made while browsing a collection.
///
/// Each tag carries default timeouts, retry policies, and concurrency limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyTag {
    /// Primary collection search.
    Search,
    /// Facet catalogue lookup.
    Catalog,
    /// Per-product enrichment such as brand lookups.
    Enrichment,
}

impl DependencyTag {
    /// Get the default timeout for this dependency type.
    pub fn default_timeout(&self) -> Duration {
        match self {
            Self::Search => Duration::from_millis(5000),
            Self::Catalog => Duration::from_millis(5000),
            Self::Enrichment => Duration::from_millis(3000),
        }
    }

    /// Get the default max retries for this dependency type.
    pub fn default_max_retries(&self) -> u32 {
        match self {
            Self::Search | Self::Catalog => 1,
            Self::Enrichment => 0, // best effort, falls back to a sentinel
        }
    }

    /// Get the default concurrency limit for this dependency type.
    pub fn default_concurrency(&self) -> usize {
        match self {
            Self::Search | Self::Catalog => 1,
            Self::Enrichment => 8,
        }
    }

    /// Check if this dependency is critical (its failure empties the view).
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Search)
    }

    /// Get the name of this dependency.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Catalog => "catalog",
            Self::Enrichment => "enrichment",
        }
    }
}

impl std::fmt::Display for DependencyTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrichment_is_best_effort() {
        assert_eq!(DependencyTag::Enrichment.default_max_retries(), 0);
        assert!(!DependencyTag::Enrichment.is_critical());
        assert!(DependencyTag::Search.is_critical());
    }

    #[test]
    fn test_display() {
        assert_eq!(DependencyTag::Catalog.to_string(), "catalog");
    }
}
