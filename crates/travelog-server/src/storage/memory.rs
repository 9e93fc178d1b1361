//! In-memory key-value store using DashMap

use async_trait::async_trait;
use dashmap::DashMap;
use travelog_core::{KeyEntry, KvStore, ListOptions, ListPage, Result};

/// Non-durable store; contents are lost when the process exits
#[derive(Default)]
pub struct MemoryStore {
    data: DashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.data.get(key).map(|entry| entry.value().clone()))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.data.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.data.remove(key);
        Ok(())
    }

    async fn list(&self, options: ListOptions) -> Result<ListPage> {
        let prefix = options.prefix.as_deref().unwrap_or("");
        let cursor = options.cursor.as_deref();

        // DashMap has no ordering, so sort the matching keys for stable cursors
        let mut names: Vec<String> = self
            .data
            .iter()
            .map(|entry| entry.key().clone())
            .filter(|key| key.starts_with(prefix))
            .filter(|key| cursor.map_or(true, |c| key.as_str() > c))
            .collect();
        names.sort();

        let more = names.len() > options.limit;
        names.truncate(options.limit);
        let next = if more { names.last().cloned() } else { None };

        Ok(ListPage {
            keys: names.into_iter().map(|name| KeyEntry { name }).collect(),
            cursor: next,
        })
    }
}
