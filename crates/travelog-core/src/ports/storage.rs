//! Key-value store port

use crate::Result;
use async_trait::async_trait;

/// Default number of keys requested per `list` page
pub const DEFAULT_LIST_LIMIT: usize = 1000;

/// A key returned by a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEntry {
    pub name: String,
}

/// Parameters for one page of a prefix listing
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub prefix: Option<String>,
    /// Cursor returned by the previous page, `None` for the first page
    pub cursor: Option<String>,
    pub limit: usize,
}

impl ListOptions {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            cursor: None,
            limit: DEFAULT_LIST_LIMIT,
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn cursor(mut self, cursor: Option<String>) -> Self {
        self.cursor = cursor;
        self
    }
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            prefix: None,
            cursor: None,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

/// One page of keys, in ascending key order
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub keys: Vec<KeyEntry>,
    /// Cursor for the next page; `None` once the listing is complete
    pub cursor: Option<String>,
}

impl ListPage {
    pub fn is_complete(&self) -> bool {
        self.cursor.is_none()
    }
}

/// Durable key-value store addressed by string keys.
///
/// `delete` of an absent key succeeds. `list` may return fewer keys than
/// requested and hands back a cursor until the listing is exhausted.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
    async fn list(&self, options: ListOptions) -> Result<ListPage>;
}
