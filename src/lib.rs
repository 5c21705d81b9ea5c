//! # Content Migration
//!
//! Moves a file-based CMS export (markdown with YAML frontmatter, plus one
//! JSON singleton) into a record-oriented content store.
//!
//! A run snapshots the source tree, then migrates six fixed collections in
//! dependency order, resolving product → vendor references against records
//! already written. Each collection reports its own successes and failures;
//! one bad file never aborts the run.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌──────────────┐
//! │  content/   │──▶│  Migrators  │──▶│ ContentStore │
//! │  .md + json │   │ map+resolve │   │ SQLite / mem │
//! └──────┬──────┘   └──────┬──────┘   └──────────────┘
//!        │                 │
//!        ▼                 ▼
//!  ┌──────────┐      ┌──────────┐
//!  │ backups/ │      │  Report  │
//!  └──────────┘      └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! cmigrate init                       # create the content-store schema
//! cmigrate run --dry-run --validate   # check sources without writing
//! cmigrate run                        # back up, then migrate
//! cmigrate backup list
//! cmigrate backup restore ./backups/backup-2024-05-01T10-00-00
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`markdown`] | Frontmatter parsing and path helpers |
//! | [`validation`] | Field and per-collection validators |
//! | [`backup`] | Source-tree snapshots and restore |
//! | [`resolve`] | Cross-collection slug → ID lookup |
//! | [`migrate`] | Migration driver and collection migrators |
//! | [`report`] | Per-collection tallies and the final summary |
//! | [`store`] | Content store trait, in-memory and SQLite backends |
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | SQLite connection |
//! | [`schema`] | SQLite schema |
//! | [`progress`] | Per-record progress reporting |
//! | [`error`] | Typed error taxonomy |
//! | [`models`] | Target record types |

pub mod backup;
pub mod config;
pub mod db;
pub mod error;
pub mod markdown;
pub mod migrate;
pub mod models;
pub mod progress;
pub mod report;
pub mod resolve;
pub mod schema;
pub mod store;
pub mod validation;
