//! In-memory [`ContentStore`] for tests and programmatic callers.
//!
//! Records live in a `Vec` behind `std::sync::RwLock`; IDs are
//! auto-incrementing integers shared across collections.

use std::sync::RwLock;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use serde_json::Value;

use crate::models::RecordId;

use super::{ContentStore, FindResult, Query, Record};

struct StoredRecord {
    collection: String,
    record: Record,
}

struct Inner {
    next_id: i64,
    records: Vec<StoredRecord>,
}

/// In-memory content store.
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                records: Vec::new(),
            }),
        }
    }

    /// Every record in `collection`, in insertion order.
    pub fn records(&self, collection: &str) -> Vec<Record> {
        match self.inner.read() {
            Ok(inner) => inner
                .records
                .iter()
                .filter(|r| r.collection == collection)
                .map(|r| r.record.clone())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Total number of records across all collections.
    pub fn len(&self) -> usize {
        self.inner.read().map(|i| i.records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for InMemoryStore {
    async fn find(
        &self,
        collection: &str,
        query: &Query,
        limit: Option<usize>,
    ) -> Result<FindResult> {
        let inner = self
            .inner
            .read()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))?;
        let docs = inner
            .records
            .iter()
            .filter(|r| r.collection == collection && r.record.matches(query))
            .map(|r| r.record.clone())
            .take(limit.unwrap_or(usize::MAX))
            .collect();
        Ok(FindResult { docs })
    }

    async fn create(&self, collection: &str, data: Value) -> Result<Record> {
        if !data.is_object() {
            bail!("record data for '{}' must be a JSON object", collection);
        }
        let mut inner = self
            .inner
            .write()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))?;
        let id = RecordId::Int(inner.next_id);
        inner.next_id += 1;
        let record = Record { id, data };
        inner.records.push(StoredRecord {
            collection: collection.to_string(),
            record: record.clone(),
        });
        Ok(record)
    }
}
