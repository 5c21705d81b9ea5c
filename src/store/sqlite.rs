//! SQLite-backed [`ContentStore`].
//!
//! Wraps a [`SqlitePool`] over the `records` table created by
//! [`crate::schema`]. Equality filters on `slug` are pushed into SQL; other
//! filter keys are applied to the decoded JSON body. The row limit is pushed
//! into SQL only when no body filter remains.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{Row, SqlitePool};

use crate::models::RecordId;

use super::{ContentStore, FindResult, Query, Record};

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ContentStore for SqliteStore {
    async fn find(
        &self,
        collection: &str,
        query: &Query,
        limit: Option<usize>,
    ) -> Result<FindResult> {
        let slug = query.get("slug").and_then(Value::as_str);
        // The row limit can only go into SQL when every filter already does.
        let sql_filtered = query.keys().all(|key| key == "slug" && slug.is_some());
        let sql_limit = match limit {
            Some(l) if sql_filtered => i64::try_from(l).unwrap_or(i64::MAX),
            _ => -1,
        };

        let rows = match slug {
            Some(slug) => {
                sqlx::query(
                    "SELECT id, data_json FROM records WHERE collection = ? AND slug = ? ORDER BY id LIMIT ?",
                )
                .bind(collection)
                .bind(slug)
                .bind(sql_limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT id, data_json FROM records WHERE collection = ? ORDER BY id LIMIT ?",
                )
                .bind(collection)
                .bind(sql_limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        let mut docs = Vec::new();
        for row in rows {
            if limit.is_some_and(|l| docs.len() >= l) {
                break;
            }
            let id: i64 = row.get("id");
            let data_json: String = row.get("data_json");
            let data: Value = serde_json::from_str(&data_json)
                .with_context(|| format!("Corrupt record {} in '{}'", id, collection))?;
            let record = Record {
                id: RecordId::Int(id),
                data,
            };
            if record.matches(query) {
                docs.push(record);
            }
        }

        Ok(FindResult { docs })
    }

    async fn create(&self, collection: &str, data: Value) -> Result<Record> {
        if !data.is_object() {
            bail!("record data for '{}' must be a JSON object", collection);
        }
        let slug = data.get("slug").and_then(Value::as_str).map(str::to_string);
        let data_json = serde_json::to_string(&data)?;
        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            "INSERT INTO records (collection, slug, data_json, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(collection)
        .bind(&slug)
        .bind(&data_json)
        .bind(now)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to insert into '{}'", collection))?;

        Ok(Record {
            id: RecordId::Int(result.last_insert_rowid()),
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::schema;
    use serde_json::json;
    use tempfile::TempDir;

    async fn open(tmp: &TempDir) -> SqliteStore {
        let pool = db::connect(&tmp.path().join("data").join("cms.sqlite"))
            .await
            .unwrap();
        schema::apply(&pool).await.unwrap();
        SqliteStore::new(pool)
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp).await;

        let a = store
            .create("vendors", json!({"slug": "acme", "tier": "free"}))
            .await
            .unwrap();
        let b = store
            .create("vendors", json!({"slug": "zenith", "tier": "free"}))
            .await
            .unwrap();
        store
            .create("products", json!({"slug": "navsat", "vendor": 1}))
            .await
            .unwrap();
        assert_ne!(a.id, b.id);

        let vendors = store.find("vendors", &Query::new(), None).await.unwrap();
        assert_eq!(vendors.docs.len(), 2);
        assert_eq!(vendors.docs[0].slug(), Some("acme"));
        assert_eq!(vendors.docs[0].id, a.id);

        let mut by_slug = Query::new();
        by_slug.insert("slug".into(), json!("zenith"));
        let found = store.find("vendors", &by_slug, None).await.unwrap();
        assert_eq!(found.docs.len(), 1);
        assert_eq!(found.docs[0].id, b.id);

        let limited = store.find("vendors", &Query::new(), Some(1)).await.unwrap();
        assert_eq!(limited.docs.len(), 1);
        store.close().await;
    }

    #[tokio::test]
    async fn test_find_limit_with_filters() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp).await;
        for (slug, tier) in [("acme", "free"), ("acme", "tier1"), ("zenith", "tier1")] {
            store
                .create("vendors", json!({"slug": slug, "tier": tier}))
                .await
                .unwrap();
        }

        let mut by_slug = Query::new();
        by_slug.insert("slug".into(), json!("acme"));
        let found = store.find("vendors", &by_slug, Some(1)).await.unwrap();
        assert_eq!(found.docs.len(), 1);
        assert_eq!(found.docs[0].data["tier"], "free");
        let found = store.find("vendors", &by_slug, None).await.unwrap();
        assert_eq!(found.docs.len(), 2);

        // Body filter: the limit applies to matches, not to scanned rows.
        let mut by_tier = Query::new();
        by_tier.insert("tier".into(), json!("tier1"));
        let found = store.find("vendors", &by_tier, Some(2)).await.unwrap();
        let slugs: Vec<_> = found.docs.iter().filter_map(|r| r.slug()).collect();
        assert_eq!(slugs, vec!["acme", "zenith"]);

        let found = store.find("vendors", &Query::new(), Some(0)).await.unwrap();
        assert!(found.docs.is_empty());
        store.close().await;
    }

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp).await;
        schema::apply(store.pool()).await.unwrap();
        schema::apply(store.pool()).await.unwrap();
        store.close().await;
    }
}
