//! Record store adapter
//!
//! The only component that talks to the key-value store. Each record is one
//! JSON value stored under its own id.

use crate::ports::{KvStore, ListOptions, DEFAULT_LIST_LIMIT};
use crate::record::{generate_id, is_record_id, now_millis, NewRecord, Record, RECORD_PREFIX};
use crate::{Result, TravelogError};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct RecordStore {
    kv: Arc<dyn KvStore>,
    page_size: usize,
}

impl RecordStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            kv,
            page_size: DEFAULT_LIST_LIMIT,
        }
    }

    /// Number of keys requested per listing page
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// All records, most recent first.
    ///
    /// Keys that vanish, fail to fetch, or hold undecodable values between
    /// listing and fetching are skipped; only a failed listing is an error. Records sharing a `createdAt` keep the store's
    /// listing order (ascending id).
    pub async fn list_all(&self) -> Result<Vec<Record>> {
        let keys = self.list_record_keys().await?;
        let mut records = Vec::with_capacity(keys.len());

        for key in keys {
            match self.get_by_id(&key).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => warn!("Skipping record {} that failed to fetch: {}", key, e),
            }
        }

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    /// Fetch a single record; absent or undecodable values yield `None`
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Record>> {
        let Some(raw) = self.kv.get(id).await? else {
            debug!("Record {} not found", id);
            return Ok(None);
        };

        match serde_json::from_slice::<Record>(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!("Skipping undecodable record {}: {}", id, e);
                Ok(None)
            }
        }
    }

    pub async fn create(&self, input: NewRecord) -> Result<Record> {
        if input.location.is_empty() || input.date.is_empty() {
            return Err(TravelogError::Validation(
                "location and date are required".to_string(),
            ));
        }

        let now = now_millis();
        let record = Record {
            id: generate_id(now),
            location: input.location,
            date: input.date,
            image: input.image.as_ref().map(|a| a.to_data_uri()),
            video: input.video.as_ref().map(|a| a.to_data_uri()),
            created_at: now,
        };

        let value = serde_json::to_vec(&record)?;
        self.kv.put(&record.id, value).await?;

        info!(
            "Created record: id={}, location={}, image={}, video={}",
            record.id,
            record.location,
            record.image.is_some(),
            record.video.is_some()
        );

        Ok(record)
    }

    /// Delete a record. Deleting an id that does not exist succeeds.
    pub async fn delete_by_id(&self, id: &str) -> Result<()> {
        if !is_record_id(id) {
            return Err(TravelogError::InvalidRecordId(id.to_string()));
        }

        self.kv.delete(id).await?;
        info!("Deleted record: {}", id);
        Ok(())
    }

    async fn list_record_keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut cursor = None;

        loop {
            let options = ListOptions::with_prefix(RECORD_PREFIX)
                .limit(self.page_size)
                .cursor(cursor.take());
            let page = self.kv.list(options).await?;

            keys.extend(
                page.keys
                    .into_iter()
                    .map(|entry| entry.name)
                    .filter(|name| is_record_id(name)),
            );

            match page.cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(keys)
    }
}
