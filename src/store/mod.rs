//! Content store abstraction.
//!
//! The migration pipeline only needs two operations from the target
//! database: list records of a collection (to build reference tables) and
//! create a record (which assigns the ID). The [`ContentStore`] trait
//! captures exactly that, so the pipeline runs unchanged against the
//! SQLite backend or the in-memory one used in tests.

pub mod memory;
pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::RecordId;

/// Equality filter over top-level record fields. Empty matches everything.
pub type Query = Map<String, Value>;

/// A stored record: the store-assigned ID plus the record body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: RecordId,
    pub data: Value,
}

impl Record {
    /// The record's `slug` field, when it has one.
    pub fn slug(&self) -> Option<&str> {
        self.data.get("slug").and_then(Value::as_str)
    }

    pub(crate) fn matches(&self, query: &Query) -> bool {
        query
            .iter()
            .all(|(key, expected)| self.data.get(key) == Some(expected))
    }
}

/// Result of a [`ContentStore::find`] call.
#[derive(Debug, Clone, Default)]
pub struct FindResult {
    pub docs: Vec<Record>,
}

/// Abstract target database for migrated content.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`find`](ContentStore::find) | List records of a collection matching a filter |
/// | [`create`](ContentStore::create) | Insert a record and return it with its new ID |
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Records of `collection` matching `query`, in insertion order,
    /// truncated to `limit` when given.
    async fn find(
        &self,
        collection: &str,
        query: &Query,
        limit: Option<usize>,
    ) -> Result<FindResult>;

    /// Insert `data` into `collection`. The store assigns the ID.
    async fn create(&self, collection: &str, data: Value) -> Result<Record>;
}
