//! Pagination derived from the current page and total result count.

use serde::{Deserialize, Serialize};

/// Pagination info for a collection view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    /// Current page (1-indexed).
    pub current_page: u32,
    /// Total number of pages, `ceil(total_products / items_per_page)`.
    pub total_pages: u32,
    /// Total number of matching products.
    pub total_products: u32,
    /// Items per page.
    pub items_per_page: u32,
}

impl PaginationInfo {
    /// Create pagination info; `current_page` is clamped to at least 1.
    pub fn new(current_page: u32, items_per_page: u32, total_products: u32) -> Self {
        let total_pages = if items_per_page == 0 {
            0
        } else {
            total_products.div_ceil(items_per_page)
        };

        Self {
            current_page: current_page.max(1),
            total_pages,
            total_products,
            items_per_page,
        }
    }

    /// Whether there's a next page.
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Whether there's a previous page.
    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    /// Number of items before the current page.
    pub fn offset(&self) -> u32 {
        (self.current_page - 1).saturating_mul(self.items_per_page)
    }

    /// Get page numbers for display (e.g., [3, 4, 5, 6, 7]).
    pub fn page_numbers(&self, max_visible: usize) -> Vec<u32> {
        if self.total_pages as usize <= max_visible {
            return (1..=self.total_pages).collect();
        }

        let max_visible = max_visible as i64;
        let total = i64::from(self.total_pages);
        let start = (i64::from(self.current_page) - max_visible / 2).max(1);
        let end = (start + max_visible - 1).min(total);
        let start = (end - max_visible + 1).max(1);

        (start..=end).map(|p| p as u32).collect()
    }

    /// Get start item number (1-indexed), 0 when there are no items.
    pub fn start_item(&self) -> u32 {
        if self.total_products == 0 {
            0
        } else {
            self.offset().saturating_add(1).min(self.total_products)
        }
    }

    /// Get end item number.
    pub fn end_item(&self) -> u32 {
        self.current_page
            .saturating_mul(self.items_per_page)
            .min(self.total_products)
    }
}

impl Default for PaginationInfo {
    fn default() -> Self {
        Self::new(1, 24, 0)
    }
}
