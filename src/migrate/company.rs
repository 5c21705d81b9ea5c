//! `content/company/info.json` → `company-info`.
//!
//! The only JSON source and the only singleton. A missing or unreadable
//! file is reported as one failed record rather than a skipped collection.

use std::path::Path;

use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;

use super::{Collection, CollectionRun, MigrationContext, TargetRecord};
use crate::error::MigrationError;
use crate::markdown::transform_media_path;
use crate::models::CompanyInfoRecord;
use crate::progress::MigrationEvent;
use crate::validation::{validate_company_info_data, ValidationResult};

const REPORT_KEY: &str = "Company info";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CompanyInfoSource {
    name: Option<String>,
    tagline: Option<String>,
    description: Option<String>,
    story: Option<String>,
    founded: Option<Value>,
    location: Option<String>,
    address: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    logo: Option<String>,
}

impl TargetRecord for CompanyInfoRecord {
    fn validate(&self) -> ValidationResult {
        validate_company_info_data(self)
    }
}

/// Read and map the company info file.
pub async fn load_company_info(path: &Path) -> std::result::Result<CompanyInfoRecord, MigrationError> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(MigrationError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => {
            return Err(MigrationError::io(
                format!("failed to read {}", path.display()),
                e,
            ))
        }
    };
    let source: CompanyInfoSource =
        serde_json::from_str(&text).map_err(|source| MigrationError::InvalidSource {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(CompanyInfoRecord {
        name: source.name,
        tagline: source.tagline.unwrap_or_default(),
        description: source.description.unwrap_or_default(),
        story: source.story.unwrap_or_default(),
        founded: source.founded.filter(|v| !v.is_null()),
        location: source.location.unwrap_or_default(),
        address: source.address.unwrap_or_default(),
        phone: source.phone.unwrap_or_default(),
        email: source.email,
        logo: transform_media_path(&source.logo.unwrap_or_default()),
    })
}

pub async fn migrate(ctx: &MigrationContext<'_>) -> Result<CollectionRun> {
    let collection = Collection::CompanyInfo;
    let mut run = CollectionRun::new(collection);
    ctx.reporter.report(MigrationEvent::CollectionStarted {
        collection: collection.name().to_string(),
        total: 1,
    });

    let outcome = match load_company_info(&ctx.source_path(collection)).await {
        Ok(record) => ctx.persist(collection, &record).await,
        Err(e) => Err(e.into()),
    };
    match outcome {
        Ok(()) => run.succeed(ctx, REPORT_KEY.to_string(), 1),
        Err(e) => run.fail(ctx, REPORT_KEY, &e),
    }
    Ok(run)
}
