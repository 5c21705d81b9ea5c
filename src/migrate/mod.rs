//! Migration driver and collection migrators.
//!
//! A run walks a fixed sequence:
//!
//! ```text
//! INIT → BACKUP (skippable) → CATEGORIES → VENDORS → PRODUCTS
//!      → BLOG_POSTS → TEAM_MEMBERS → COMPANY_INFO → REPORT
//! ```
//!
//! Collections run strictly one after another because products resolve
//! vendor references against records the vendor migrator has already
//! written. Within a collection, records are processed one at a time and a
//! failing record only increments that collection's `failed` count.

pub mod blog;
pub mod categories;
pub mod company;
pub mod products;
pub mod team;
pub mod vendors;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::backup;
use crate::config::Config;
use crate::error::MigrationError;
use crate::markdown::{parse_directory_entries, ParsedDocument};
use crate::progress::{MigrationEvent, MigrationProgressReporter};
use crate::report::{MigrationReport, ReportSet};
use crate::store::ContentStore;
use crate::validation::ValidationResult;

/// Flags shared by every collection migrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationOptions {
    /// Parse, map, and (optionally) validate, but never write to the store
    /// and never take a backup.
    pub dry_run: bool,
    /// Skip the pre-run backup even when writing.
    pub skip_backup: bool,
    /// Run the collection validator on every mapped record.
    pub validate: bool,
}

/// The six content collections, in migration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Categories,
    Vendors,
    Products,
    BlogPosts,
    TeamMembers,
    CompanyInfo,
}

impl Collection {
    /// Collection name in the content store and the report.
    pub fn name(self) -> &'static str {
        match self {
            Collection::Categories => "categories",
            Collection::Vendors => "vendors",
            Collection::Products => "products",
            Collection::BlogPosts => "blog-posts",
            Collection::TeamMembers => "team-members",
            Collection::CompanyInfo => "company-info",
        }
    }

    /// Source location relative to the content root.
    pub fn source(self) -> &'static str {
        match self {
            Collection::Categories => "categories",
            Collection::Vendors => "vendors",
            Collection::Products => "products",
            Collection::BlogPosts => "blog/posts",
            Collection::TeamMembers => "team",
            Collection::CompanyInfo => "company/info.json",
        }
    }
}

/// What a run produced: the backup it took (if any) and one report per
/// collection, in run order.
#[derive(Debug)]
pub struct MigrationOutcome {
    pub backup: Option<PathBuf>,
    pub reports: ReportSet,
}

/// A mapped record ready for validation and persistence.
pub trait TargetRecord: Serialize {
    fn validate(&self) -> ValidationResult;
}

/// Shared state handed to each collection migrator.
pub struct MigrationContext<'a> {
    pub config: &'a Config,
    pub store: &'a dyn ContentStore,
    pub options: MigrationOptions,
    pub reporter: &'a dyn MigrationProgressReporter,
}

impl MigrationContext<'_> {
    pub fn source_path(&self, collection: Collection) -> PathBuf {
        self.config.content.root.join(collection.source())
    }

    /// Validate (when enabled) and create one record. Dry-run skips the
    /// store entirely.
    async fn persist<R: TargetRecord>(&self, collection: Collection, record: &R) -> Result<()> {
        if self.options.validate {
            let result = record.validate();
            if !result.is_valid() {
                return Err(MigrationError::InvalidRecord(result.summary()).into());
            }
        }
        if self.options.dry_run {
            return Ok(());
        }
        let data = serde_json::to_value(record)?;
        self.store.create(collection.name(), data).await?;
        Ok(())
    }
}

/// Report plus the keys that made it through, for dependents that need to
/// know what a dry-run would have created.
#[derive(Debug)]
pub struct CollectionRun {
    pub report: MigrationReport,
    pub migrated: Vec<String>,
}

impl CollectionRun {
    fn new(collection: Collection) -> Self {
        Self {
            report: MigrationReport::new(collection.name()),
            migrated: Vec::new(),
        }
    }

    fn succeed(&mut self, ctx: &MigrationContext<'_>, key: String, total: usize) {
        self.report.record_success();
        ctx.reporter.report(MigrationEvent::RecordMigrated {
            collection: self.report.collection.clone(),
            key: key.clone(),
            n: self.report.processed(),
            total,
        });
        self.migrated.push(key);
    }

    fn fail(&mut self, ctx: &MigrationContext<'_>, key: &str, error: &anyhow::Error) {
        let message = format!("{:#}", error);
        self.report.record_failure(key, &message);
        ctx.reporter.report(MigrationEvent::RecordFailed {
            collection: self.report.collection.clone(),
            key: key.to_string(),
            message,
        });
    }
}

/// Run one markdown-backed collection: parse its directory, then map and
/// persist each document in turn.
///
/// A missing source directory yields an empty report. Files that fail to
/// parse count as failed records keyed by filename.
pub(crate) async fn migrate_markdown<R, F>(
    ctx: &MigrationContext<'_>,
    collection: Collection,
    map: F,
) -> Result<CollectionRun>
where
    R: TargetRecord,
    F: Fn(&ParsedDocument) -> Result<R>,
{
    let mut run = CollectionRun::new(collection);
    let dir = ctx.source_path(collection);

    let entries = match parse_directory_entries(&dir).await {
        Ok(entries) => entries,
        Err(MigrationError::DirectoryNotFound(path)) => {
            ctx.reporter.report(MigrationEvent::CollectionSkipped {
                collection: collection.name().to_string(),
                reason: format!("{} does not exist", path.display()),
            });
            return Ok(run);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {} sources", collection.name()))
        }
    };

    let total = entries.len();
    ctx.reporter.report(MigrationEvent::CollectionStarted {
        collection: collection.name().to_string(),
        total,
    });

    for entry in entries {
        match entry.outcome {
            Ok(doc) => {
                let outcome = match map(&doc) {
                    Ok(record) => ctx.persist(collection, &record).await,
                    Err(e) => Err(e),
                };
                match outcome {
                    Ok(()) => run.succeed(ctx, doc.slug.clone(), total),
                    Err(e) => run.fail(ctx, &doc.slug, &e),
                }
            }
            Err(e) => run.fail(ctx, &entry.filename, &e.into()),
        }
    }

    Ok(run)
}

/// Run a full migration pass over `config.content.root`.
///
/// Fails only on setup problems: a missing content root or a backup that
/// could not be written. Record-level failures are in the returned reports.
pub async fn run_migration(
    config: &Config,
    store: &dyn ContentStore,
    options: MigrationOptions,
    reporter: &dyn MigrationProgressReporter,
) -> Result<MigrationOutcome> {
    let content_root: &Path = &config.content.root;
    if !content_root.is_dir() {
        return Err(MigrationError::DirectoryNotFound(content_root.to_path_buf()))
            .context("Content root does not exist");
    }

    let backup = if options.dry_run || options.skip_backup {
        None
    } else {
        let path = backup::create_backup(content_root, &config.backup.root)
            .context("Failed to create pre-migration backup")?;
        reporter.report(MigrationEvent::BackupCreated { path: path.clone() });
        Some(path)
    };

    let ctx = MigrationContext {
        config,
        store,
        options,
        reporter,
    };

    let mut reports = ReportSet::new();

    reports.push(categories::migrate(&ctx).await?.report);

    let vendor_run = vendors::migrate(&ctx).await?;
    let planned_vendors = if options.dry_run {
        vendor_run.migrated.clone()
    } else {
        Vec::new()
    };
    reports.push(vendor_run.report);

    reports.push(products::migrate(&ctx, &planned_vendors).await?.report);
    reports.push(blog::migrate(&ctx).await?.report);
    reports.push(team::migrate(&ctx).await?.report);
    reports.push(company::migrate(&ctx).await?.report);

    Ok(MigrationOutcome { backup, reports })
}
