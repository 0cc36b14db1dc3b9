//! Common types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type EntityId = Uuid;

pub fn new_id() -> EntityId {
    Uuid::new_v4()
}

/// Page-based list query. Deserializes from query strings with both
/// parameters optional.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    super::constants::DEFAULT_PAGE_SIZE
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, limit: super::constants::DEFAULT_PAGE_SIZE }
    }
}

impl Pagination {
    /// Clamp to sane bounds: page >= 1, limit in 1..=MAX_PAGE_SIZE.
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, super::constants::MAX_PAGE_SIZE),
        }
    }

    /// Rows to skip (SQL OFFSET).
    pub fn skip(&self) -> i64 {
        let p = self.clamped();
        ((p.page - 1) * p.limit) as i64
    }

    /// Rows to fetch (SQL LIMIT).
    pub fn take(&self) -> i64 {
        self.clamped().limit as i64
    }
}

/// A page of results plus the total row count for the filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64) -> Self {
        Self { items, total }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated { items: self.items.into_iter().map(f).collect(), total: self.total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_clamps_page_and_limit() {
        let p = Pagination { page: 0, limit: 10_000 }.clamped();
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, super::super::constants::MAX_PAGE_SIZE);
    }

    #[test]
    fn pagination_skip_is_zero_based() {
        let p = Pagination { page: 3, limit: 20 };
        assert_eq!(p.skip(), 40);
        assert_eq!(p.take(), 20);
    }
}
