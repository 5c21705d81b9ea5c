//! Source-tree snapshots for rollback.
//!
//! A backup is a plain recursive copy of the content root into
//! `<backup_root>/backup-<timestamp>`. Restoring deletes the target tree and
//! copies the snapshot back, so files created after the backup disappear.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use walkdir::WalkDir;

use crate::error::{MigrationError, Result};

const PREFIX: &str = "backup-";

/// Timestamp format for snapshot names: extended ISO-8601 at second
/// precision with `:` replaced by `-`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

/// Snapshot `source` under `backup_root` and return the absolute snapshot path.
///
/// Names have one-second granularity. A second snapshot taken within the
/// same second gets a `-1`, `-2`, ... suffix instead of colliding.
pub fn create_backup(source: &Path, backup_root: &Path) -> Result<PathBuf> {
    if !source.is_dir() {
        return Err(MigrationError::SourceNotFound(source.to_path_buf()));
    }

    fs::create_dir_all(backup_root).map_err(|e| {
        MigrationError::io(
            format!("failed to create backup root {}", backup_root.display()),
            e,
        )
    })?;

    let base = format!("{}{}", PREFIX, Utc::now().format(TIMESTAMP_FORMAT));
    let backup_path = claim_snapshot_dir(backup_root, &base)?;

    // A backup root nested inside the source must not be copied into itself.
    let exclude = match (fs::canonicalize(source), fs::canonicalize(backup_root)) {
        (Ok(src), Ok(root)) if root.starts_with(&src) => Some(root),
        _ => None,
    };
    copy_tree(source, &backup_path, exclude.as_deref())?;

    fs::canonicalize(&backup_path)
        .map_err(|e| MigrationError::io(format!("failed to resolve {}", backup_path.display()), e))
}

/// Replace `target` with the contents of the snapshot at `backup_path`.
pub fn restore_backup(backup_path: &Path, target: &Path) -> Result<()> {
    if !backup_path.is_dir() {
        return Err(MigrationError::BackupNotFound(backup_path.to_path_buf()));
    }

    if target.exists() {
        if let (Ok(backup), Ok(dest)) = (fs::canonicalize(backup_path), fs::canonicalize(target)) {
            if backup.starts_with(&dest) {
                return Err(MigrationError::io(
                    format!("refusing to restore over {}", target.display()),
                    std::io::Error::other("backup lies inside the restore target"),
                ));
            }
        }
        fs::remove_dir_all(target)
            .map_err(|e| MigrationError::io(format!("failed to remove {}", target.display()), e))?;
    }

    copy_tree(backup_path, target, None)
}

/// Snapshot directories under `backup_root`, oldest first.
pub fn list_backups(backup_root: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(backup_root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(MigrationError::io(
                format!("failed to list {}", backup_root.display()),
                e,
            ))
        }
    };

    let mut backups = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            MigrationError::io(format!("failed to list {}", backup_root.display()), e)
        })?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with(PREFIX) && entry.path().is_dir() {
            backups.push(entry.path());
        }
    }
    backups.sort_by_key(|path| sort_key(path));
    Ok(backups)
}

fn claim_snapshot_dir(backup_root: &Path, base: &str) -> Result<PathBuf> {
    let mut attempt = 0u32;
    loop {
        let name = if attempt == 0 {
            base.to_string()
        } else {
            format!("{}-{}", base, attempt)
        };
        let candidate = backup_root.join(name);
        match fs::create_dir(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => {
                return Err(MigrationError::io(
                    format!("failed to create {}", candidate.display()),
                    e,
                ))
            }
        }
    }
}

/// Recursively copy `from` into `to`, keeping empty directories.
fn copy_tree(from: &Path, to: &Path, exclude: Option<&Path>) -> Result<()> {
    fs::create_dir_all(to)
        .map_err(|e| MigrationError::io(format!("failed to create {}", to.display()), e))?;

    let walker = WalkDir::new(from)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| match exclude {
            Some(skip) => fs::canonicalize(entry.path())
                .map(|p| p != skip)
                .unwrap_or(true),
            None => true,
        });

    for entry in walker {
        let entry = entry.map_err(|e| {
            let context = format!("failed to walk {}", from.display());
            match e.into_io_error() {
                Some(io) => MigrationError::io(context, io),
                None => MigrationError::io(context, std::io::Error::other("filesystem loop")),
            }
        })?;

        let relative = entry.path().strip_prefix(from).unwrap_or(entry.path());
        if relative.as_os_str().is_empty() {
            continue;
        }
        let dest = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)
                .map_err(|e| MigrationError::io(format!("failed to create {}", dest.display()), e))?;
        } else {
            fs::copy(entry.path(), &dest).map_err(|e| {
                MigrationError::io(format!("failed to copy {}", entry.path().display()), e)
            })?;
        }
    }
    Ok(())
}

fn sort_key(path: &Path) -> (String, u32) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    // "backup-" + "YYYY-MM-DDTHH-MM-SS" is 26 bytes; anything after is "-N".
    let split = name.len().min(PREFIX.len() + 19);
    if !name.is_char_boundary(split) {
        return (name, 0);
    }
    let (base, suffix) = name.split_at(split);
    let n = suffix
        .strip_prefix('-')
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    (base.to_string(), n)
}
