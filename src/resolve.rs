//! Cross-collection reference resolution.
//!
//! A dependent collection (products) points at records of another
//! collection (vendors) by content path, e.g. `content/vendors/acme.md`.
//! [`ReferenceTable`] is built once per dependent migrator, after the
//! dependency has been migrated, and maps slugs to store-assigned IDs.

use std::collections::HashMap;

use anyhow::Result;

use crate::error::MigrationError;
use crate::markdown::resolve_reference;
use crate::models::RecordId;
use crate::store::{ContentStore, Query};

/// Slug -> ID lookup for one dependency collection. Immutable once built.
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    label: String,
    ids: HashMap<String, RecordId>,
}

impl ReferenceTable {
    /// Index up to `limit` records of `collection` by slug.
    ///
    /// `planned` lists slugs a dry-run would have created; they resolve to
    /// placeholder IDs (`dry-run:<slug>`) so dry-run outcomes match a real run.
    pub async fn build(
        store: &dyn ContentStore,
        collection: &str,
        label: &str,
        limit: usize,
        planned: &[String],
    ) -> Result<Self> {
        let found = store.find(collection, &Query::new(), Some(limit)).await?;

        let mut ids = HashMap::new();
        for record in found.docs {
            if let Some(slug) = record.slug() {
                ids.entry(slug.to_string()).or_insert(record.id.clone());
            }
        }
        for slug in planned {
            ids.entry(slug.clone())
                .or_insert_with(|| RecordId::Str(format!("dry-run:{}", slug)));
        }

        Ok(Self {
            label: label.to_string(),
            ids,
        })
    }

    /// Resolve a raw frontmatter reference to a record ID.
    pub fn resolve(&self, raw: Option<&str>) -> std::result::Result<RecordId, MigrationError> {
        let raw = raw.unwrap_or("");
        match resolve_reference(raw) {
            Some(slug) => self
                .ids
                .get(&slug)
                .cloned()
                .ok_or_else(|| self.not_found(slug)),
            None if raw.is_empty() => Err(self.not_found("(none)".to_string())),
            None => Err(self.not_found(raw.to_string())),
        }
    }

    fn not_found(&self, reference: String) -> MigrationError {
        MigrationError::ReferenceNotFound {
            label: self.label.clone(),
            reference,
        }
    }
}
