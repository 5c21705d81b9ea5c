//! Typed error taxonomy for the migration pipeline.
//!
//! I/O and parse errors abort the operation that raised them. Reference,
//! validation, and persistence failures are record-scoped: the collection
//! migrators catch them and turn them into report lines.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("malformed frontmatter in {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("backup source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("backup not found: {}", .0.display())]
    BackupNotFound(PathBuf),

    /// A cross-collection reference (e.g. product -> vendor) with no
    /// migrated target. `label` names the referenced kind ("Vendor").
    #[error("{label} not found: {reference}")]
    ReferenceNotFound { label: String, reference: String },

    #[error("validation failed: {0}")]
    InvalidRecord(String),

    #[error("invalid source data in {}", .path.display())]
    InvalidSource {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl MigrationError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        MigrationError::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, MigrationError>;
