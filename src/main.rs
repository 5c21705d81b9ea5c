//! # Content Migration CLI (`cmigrate`)
//!
//! The `cmigrate` binary drives the migration pipeline: content-store
//! initialization, migration runs, and source backups.
//!
//! ## Usage
//!
//! ```bash
//! cmigrate --config ./config/migrate.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `cmigrate init` | Create the SQLite content-store schema |
//! | `cmigrate run` | Back up the content root, then migrate every collection |
//! | `cmigrate backup create` | Snapshot the content root |
//! | `cmigrate backup restore <path>` | Replace the content root with a snapshot |
//! | `cmigrate backup list` | List snapshots, oldest first |
//! | `cmigrate parse <file>` | Print one parsed markdown document as JSON |
//!
//! ## Examples
//!
//! ```bash
//! # Check every source file without writing anything
//! cmigrate run --dry-run --validate
//!
//! # Migrate, machine-readable report on stdout
//! cmigrate run --json --progress json
//!
//! # Roll the source tree back after fixing a bad run
//! cmigrate backup restore ./backups/backup-2024-05-01T10-00-00
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use content_migration::backup;
use content_migration::config::{self, Config};
use content_migration::db;
use content_migration::markdown;
use content_migration::migrate::{run_migration, MigrationOptions};
use content_migration::progress::ProgressMode;
use content_migration::schema;
use content_migration::store::memory::InMemoryStore;
use content_migration::store::ContentStore;

/// Content Migration CLI: move a markdown/YAML content export into a
/// content store, with backups and dry-run validation.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/migrate.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "cmigrate",
    about = "Migrate markdown + YAML frontmatter content into a content store",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/migrate.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the content-store schema.
    ///
    /// Creates the SQLite database file and the `records` table. Safe to run
    /// more than once.
    Init,

    /// Run the migration.
    ///
    /// Backs up the content root (unless `--dry-run` or `--skip-backup`),
    /// migrates categories, vendors, products, blog posts, team members and
    /// company info in that order, then prints the report to stdout.
    Run {
        /// Parse, map and validate only. Nothing is written and no backup
        /// is taken.
        #[arg(long)]
        dry_run: bool,

        /// Do not snapshot the content root before writing.
        #[arg(long)]
        skip_backup: bool,

        /// Validate every mapped record before it is written.
        #[arg(long)]
        validate: bool,

        /// Print the report as JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Progress output on stderr: `off`, `human`, or `json`.
        /// Defaults to `human` on a terminal, `off` otherwise.
        #[arg(long)]
        progress: Option<ProgressMode>,
    },

    /// Manage content-root snapshots.
    Backup {
        #[command(subcommand)]
        action: BackupAction,
    },

    /// Parse one markdown file and print the result as JSON.
    Parse {
        /// Path to a `.md` file.
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum BackupAction {
    /// Snapshot the content root into the backup root.
    Create,

    /// Replace the content root (or `--target`) with a snapshot.
    Restore {
        /// Snapshot directory, as printed by `backup create` or `backup list`.
        path: PathBuf,

        /// Restore here instead of the configured content root.
        #[arg(long)]
        target: Option<PathBuf>,
    },

    /// List snapshots under the backup root, oldest first.
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Commands that don't require config
    if let Commands::Parse { file } = &cli.command {
        return run_parse(file).await;
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            schema::run_schema_migrations(&cfg).await?;
            println!("Content store initialized: {}", cfg.db.path.display());
        }
        Commands::Run {
            dry_run,
            skip_backup,
            validate,
            json,
            progress,
        } => {
            let options = MigrationOptions {
                dry_run,
                skip_backup,
                validate,
            };
            let mode = progress.unwrap_or_else(ProgressMode::default_for_tty);
            run(&cfg, options, json, mode).await?;
        }
        Commands::Backup { action } => match action {
            BackupAction::Create => {
                let path = backup::create_backup(&cfg.content.root, &cfg.backup.root)?;
                println!("{}", path.display());
            }
            BackupAction::Restore { path, target } => {
                let target = target.unwrap_or_else(|| cfg.content.root.clone());
                backup::restore_backup(&path, &target)?;
                println!("Restored {} -> {}", path.display(), target.display());
            }
            BackupAction::List => {
                for path in backup::list_backups(&cfg.backup.root)? {
                    println!("{}", path.display());
                }
            }
        },
        Commands::Parse { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}

async fn run(cfg: &Config, options: MigrationOptions, json: bool, mode: ProgressMode) -> Result<()> {
    let reporter = mode.reporter();

    // A dry run against a store that does not exist yet must not create it.
    let sqlite = if options.dry_run && !cfg.db.path.exists() {
        None
    } else {
        Some(db::open_store(cfg).await?)
    };
    let memory = InMemoryStore::new();
    let store: &dyn ContentStore = match &sqlite {
        Some(sqlite) => sqlite,
        None => &memory,
    };

    let outcome = run_migration(cfg, store, options, reporter.as_ref()).await;
    if let Some(sqlite) = &sqlite {
        sqlite.close().await;
    }
    let outcome = outcome?;

    if json {
        let mut value = outcome.reports.to_json();
        value["dry_run"] = json!(options.dry_run);
        value["backup"] = json!(outcome.backup.as_ref().map(|p| p.display().to_string()));
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        if let Some(path) = &outcome.backup {
            println!("Backup: {}", path.display());
        }
        if options.dry_run {
            println!("Dry run: nothing was written.");
        }
        print!("{}", outcome.reports.render());
    }
    Ok(())
}

async fn run_parse(file: &Path) -> Result<()> {
    let doc = markdown::parse_file(file)
        .await
        .with_context(|| format!("Failed to parse {}", file.display()))?;
    let value = json!({
        "filename": doc.filename,
        "slug": doc.slug,
        "frontmatter": doc.frontmatter,
        "content_length": doc.content.chars().count(),
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
