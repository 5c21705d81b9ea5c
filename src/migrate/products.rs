//! `content/products/*.md` → `products`.
//!
//! Products reference their vendor by content path (`vendor:` or, in older
//! documents, `partner:`). The vendor table is read once, before the first
//! product is mapped.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use super::{migrate_markdown, Collection, CollectionRun, MigrationContext, TargetRecord};
use crate::markdown::{transform_media_path, ParsedDocument};
use crate::models::{ProductImage, ProductRecord};
use crate::resolve::ReferenceTable;
use crate::validation::{validate_product_data, ValidationResult};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProductFrontmatter {
    name: Option<String>,
    description: Option<String>,
    vendor: Option<String>,
    partner: Option<String>,
    product_images: Option<Vec<ProductImageFrontmatter>>,
    specifications: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProductImageFrontmatter {
    image: Option<String>,
    alt_text: Option<String>,
    is_main: Option<bool>,
}

impl TargetRecord for ProductRecord {
    fn validate(&self) -> ValidationResult {
        validate_product_data(self)
    }
}

pub fn map_product(doc: &ParsedDocument, vendors: &ReferenceTable) -> Result<ProductRecord> {
    let fm: ProductFrontmatter = doc.decode().context("invalid product frontmatter")?;

    let reference = fm
        .vendor
        .as_deref()
        .filter(|v| !v.is_empty())
        .or(fm.partner.as_deref());
    let vendor = vendors.resolve(reference)?;

    let images = fm
        .product_images
        .unwrap_or_default()
        .into_iter()
        .map(|img| ProductImage {
            url: transform_media_path(&img.image.unwrap_or_default()),
            alt_text: img.alt_text.unwrap_or_default(),
            is_main: img.is_main.unwrap_or(false),
        })
        .collect();

    Ok(ProductRecord {
        slug: doc.slug.clone(),
        name: fm.name,
        description: fm.description.unwrap_or_default(),
        vendor,
        images,
        specifications: fm.specifications.unwrap_or_default(),
        published: false,
    })
}

pub async fn migrate(ctx: &MigrationContext<'_>, planned_vendors: &[String]) -> Result<CollectionRun> {
    let vendors = ReferenceTable::build(
        ctx.store,
        Collection::Vendors.name(),
        "Vendor",
        ctx.config.migration.lookup_limit,
        planned_vendors,
    )
    .await
    .context("Failed to load vendors for product references")?;

    migrate_markdown(ctx, Collection::Products, |doc| map_product(doc, &vendors)).await
}
