//! # Beer Listing Query
//!
//! Filtering and pagination for beer listings.

use serde::Serialize;

use super::models::Beer;

/// Default page size
pub const DEFAULT_LIMIT: usize = 10;

/// Maximum page size
pub const MAX_LIMIT: usize = 100;

/// Highest page whose offset fits in a `usize` at any allowed page size
pub const MAX_PAGE: usize = usize::MAX / MAX_LIMIT;

/// Beer listing filter with pagination
#[derive(Debug, Clone, PartialEq)]
pub struct BeerQuery {
    /// 1-based page number
    pub page: usize,
    pub limit: usize,
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    /// Inclusive upper bound on price
    pub max_price: Option<f64>,
    pub brewery_id: Option<u64>,
}

impl Default for BeerQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
            name: None,
            max_price: None,
            brewery_id: None,
        }
    }
}

impl BeerQuery {
    /// Check a beer against every filter
    pub fn matches(&self, beer: &Beer) -> bool {
        if let Some(name) = &self.name {
            if !beer.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }

        if let Some(max_price) = self.max_price {
            if beer.price > max_price {
                return false;
            }
        }

        if let Some(brewery_id) = self.brewery_id {
            if beer.brewery_id != brewery_id {
                return false;
            }
        }

        true
    }

    /// Number of rows skipped before this page
    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1).saturating_mul(self.limit)
    }
}

/// Pagination block of a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub limit: usize,
}

/// One page of results
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T: Serialize> Page<T> {
    /// Cut one page out of an already filtered result set
    pub fn paginate(items: Vec<T>, query: &BeerQuery) -> Self {
        let total_items = items.len();
        let limit = query.limit.max(1);
        let data = items
            .into_iter()
            .skip(query.offset())
            .take(limit)
            .collect();

        Self {
            data,
            pagination: Pagination {
                current_page: query.page,
                total_pages: total_items.div_ceil(limit),
                total_items,
                limit,
            },
        }
    }
}
