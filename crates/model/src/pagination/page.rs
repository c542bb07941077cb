use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of records held by every page but the last.
pub const PAGE_SIZE: usize = 10;

/// Name under which a page set is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
    pub const BASE: &'static str = "breeds";
    pub const FILTERED: &'static str = "current_filter";
    pub const SORTED: &'static str = "current_sort";

    pub fn new(name: impl Into<String>) -> Self {
        CacheKey(name.into())
    }

    /// Full breed collection as fetched from the source.
    pub fn base() -> Self {
        Self::new(Self::BASE)
    }

    /// Result of the last applied predicate set.
    pub fn filtered() -> Self {
        Self::new(Self::FILTERED)
    }

    /// Result of the last applied sort.
    pub fn sorted() -> Self {
        Self::new(Self::SORTED)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derived sets are produced from the base set and go stale with it.
    pub fn is_derived(&self) -> bool {
        self.0 == Self::FILTERED || self.0 == Self::SORTED
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSetMeta {
    pub total_records: usize,
    pub total_pages: usize,
}

impl PageSetMeta {
    pub fn for_records(total_records: usize) -> Self {
        Self {
            total_records,
            total_pages: total_records.div_ceil(PAGE_SIZE),
        }
    }
}
