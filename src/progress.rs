//! Migration progress reporting.
//!
//! Collection migrators emit one event per record so operators can follow a
//! long run. Progress goes to **stderr**; the final report is printed to
//! stdout, which stays parseable for scripts (`run --json`).

use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

/// A single progress event emitted by the migration driver.
#[derive(Clone, Debug, PartialEq)]
pub enum MigrationEvent {
    BackupCreated {
        path: PathBuf,
    },
    /// A collection migrator has its source documents in hand.
    CollectionStarted {
        collection: String,
        total: usize,
    },
    /// The collection's source directory is missing; it contributes an
    /// empty report.
    CollectionSkipped {
        collection: String,
        reason: String,
    },
    RecordMigrated {
        collection: String,
        key: String,
        n: usize,
        total: usize,
    },
    RecordFailed {
        collection: String,
        key: String,
        message: String,
    },
}

/// Receives progress events from the migration driver.
pub trait MigrationProgressReporter: Send + Sync {
    fn report(&self, event: MigrationEvent);
}

/// Human-friendly progress on stderr.
pub struct StderrProgress;

impl MigrationProgressReporter for StderrProgress {
    fn report(&self, event: MigrationEvent) {
        let line = match &event {
            MigrationEvent::BackupCreated { path } => {
                format!("backup created: {}\n", path.display())
            }
            MigrationEvent::CollectionStarted { collection, total } => {
                format!("migrating {}  {} items\n", collection, total)
            }
            MigrationEvent::CollectionSkipped { collection, reason } => {
                format!("migrating {}  skipped: {}\n", collection, reason)
            }
            MigrationEvent::RecordMigrated { key, n, total, .. } => {
                format!("  ok {}  ({} / {})\n", key, n, total)
            }
            MigrationEvent::RecordFailed { key, message, .. } => {
                format!("  FAILED {}: {}\n", key, message)
            }
        };
        let mut stderr = std::io::stderr().lock();
        let _ = stderr.write_all(line.as_bytes());
        let _ = stderr.flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl MigrationProgressReporter for JsonProgress {
    fn report(&self, event: MigrationEvent) {
        let obj = match &event {
            MigrationEvent::BackupCreated { path } => serde_json::json!({
                "event": "backup",
                "path": path.display().to_string(),
            }),
            MigrationEvent::CollectionStarted { collection, total } => serde_json::json!({
                "event": "collection",
                "collection": collection,
                "total": total,
            }),
            MigrationEvent::CollectionSkipped { collection, reason } => serde_json::json!({
                "event": "skipped",
                "collection": collection,
                "reason": reason,
            }),
            MigrationEvent::RecordMigrated {
                collection,
                key,
                n,
                total,
            } => serde_json::json!({
                "event": "record",
                "status": "ok",
                "collection": collection,
                "key": key,
                "n": n,
                "total": total,
            }),
            MigrationEvent::RecordFailed {
                collection,
                key,
                message,
            } => serde_json::json!({
                "event": "record",
                "status": "failed",
                "collection": collection,
                "key": key,
                "message": message,
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr, "{}", line);
            let _ = stderr.flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl MigrationProgressReporter for NoProgress {
    fn report(&self, _event: MigrationEvent) {}
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    pub fn reporter(&self) -> Box<dyn MigrationProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}

impl FromStr for ProgressMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(ProgressMode::Off),
            "human" => Ok(ProgressMode::Human),
            "json" => Ok(ProgressMode::Json),
            other => Err(format!(
                "unknown progress mode '{}': expected off, human, or json",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_mode_parse() {
        assert_eq!("off".parse::<ProgressMode>(), Ok(ProgressMode::Off));
        assert_eq!("human".parse::<ProgressMode>(), Ok(ProgressMode::Human));
        assert_eq!("json".parse::<ProgressMode>(), Ok(ProgressMode::Json));
        assert!("loud".parse::<ProgressMode>().is_err());
    }
}
