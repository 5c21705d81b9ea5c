//! `content/categories/*.md` → `categories`.

use anyhow::{Context, Result};
use serde::Deserialize;

use super::{migrate_markdown, Collection, CollectionRun, MigrationContext, TargetRecord};
use crate::config::MigrationConfig;
use crate::markdown::ParsedDocument;
use crate::models::CategoryRecord;
use crate::validation::{validate_category_data, ValidationResult};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CategoryFrontmatter {
    name: Option<String>,
    description: Option<String>,
    icon: Option<String>,
    color: Option<String>,
}

impl TargetRecord for CategoryRecord {
    fn validate(&self) -> ValidationResult {
        validate_category_data(self)
    }
}

pub fn map_category(doc: &ParsedDocument, settings: &MigrationConfig) -> Result<CategoryRecord> {
    let fm: CategoryFrontmatter = doc.decode().context("invalid category frontmatter")?;
    Ok(CategoryRecord {
        slug: doc.slug.clone(),
        name: fm.name,
        description: fm.description.unwrap_or_default(),
        icon: fm.icon.unwrap_or_default(),
        color: fm
            .color
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| settings.default_category_color.clone()),
    })
}

pub async fn migrate(ctx: &MigrationContext<'_>) -> Result<CollectionRun> {
    let settings = &ctx.config.migration;
    migrate_markdown(ctx, Collection::Categories, |doc| map_category(doc, settings)).await
}
