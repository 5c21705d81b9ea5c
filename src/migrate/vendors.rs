//! `content/vendors/*.md` → `vendors`.
//!
//! Every migrated vendor lands on the free tier; the tier-gated social URLs
//! are never populated here.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use super::{migrate_markdown, Collection, CollectionRun, MigrationContext, TargetRecord};
use crate::config::MigrationConfig;
use crate::markdown::{transform_media_path, ParsedDocument};
use crate::models::VendorRecord;
use crate::validation::{validate_vendor_data, ValidationResult};

const MIGRATED_TIER: &str = "free";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VendorFrontmatter {
    name: Option<String>,
    description: Option<String>,
    logo: Option<String>,
    image: Option<String>,
    website: Option<String>,
    founded: Option<Value>,
    location: Option<String>,
    featured: Option<bool>,
    partner: Option<bool>,
    services: Option<Vec<Value>>,
    certifications: Option<Vec<Value>>,
    #[serde(alias = "contactEmail")]
    contact_email: Option<String>,
    #[serde(alias = "contactPhone")]
    contact_phone: Option<String>,
}

impl TargetRecord for VendorRecord {
    fn validate(&self) -> ValidationResult {
        validate_vendor_data(self)
    }
}

pub fn map_vendor(doc: &ParsedDocument, settings: &MigrationConfig) -> Result<VendorRecord> {
    let fm: VendorFrontmatter = doc.decode().context("invalid vendor frontmatter")?;

    let description = fm
        .description
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| excerpt(&doc.content, settings.description_excerpt_chars));

    Ok(VendorRecord {
        slug: doc.slug.clone(),
        name: fm.name,
        description,
        logo: transform_media_path(&fm.logo.unwrap_or_default()),
        image: transform_media_path(&fm.image.unwrap_or_default()),
        website: fm.website.unwrap_or_default(),
        founded: fm.founded.filter(|v| !v.is_null()),
        location: fm.location.unwrap_or_default(),
        featured: fm.featured.unwrap_or(false),
        partner: fm.partner.unwrap_or(true),
        services: fm.services.unwrap_or_default(),
        tier: MIGRATED_TIER.to_string(),
        certifications: fm.certifications.unwrap_or_default(),
        contact_email: fm.contact_email.filter(|e| !e.is_empty()),
        contact_phone: fm.contact_phone.filter(|p| !p.is_empty()),
        linkedin_url: None,
        twitter_url: None,
    })
}

/// First `max` characters of `content`.
fn excerpt(content: &str, max: usize) -> String {
    content.chars().take(max).collect()
}

pub async fn migrate(ctx: &MigrationContext<'_>) -> Result<CollectionRun> {
    let settings = &ctx.config.migration;
    migrate_markdown(ctx, Collection::Vendors, |doc| map_vendor(doc, settings)).await
}
