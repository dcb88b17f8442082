//! Pagination and sort direction types.

use serde::{Deserialize, Serialize};

/// Number of items on every list page.
pub const PAGE_SIZE: u64 = 4;

/// Generic sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sort {
    Desc,
    Asc,
}

/// Pagination parameters shared across all list endpoints.
///
/// Pages hold a fixed [`PAGE_SIZE`] items; `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: u64,
}

fn default_page() -> u64 {
    1
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
        }
    }
}

impl PageRequest {
    /// Clamp `page` to ≥ 1.
    ///
    /// Call after deserializing from query params to enforce bounds.
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.max(1),
        }
    }

    /// Row offset of the first item on this page.
    pub fn offset(self) -> u64 {
        (self.page.max(1) - 1) * PAGE_SIZE
    }

    /// Maximum number of rows returned for this page.
    pub fn limit(self) -> u64 {
        PAGE_SIZE
    }
}
