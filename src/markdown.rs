//! Markdown source parsing.
//!
//! Reads `.md` files, splits the `---`-delimited YAML frontmatter from the
//! body, and derives each document's slug. Also hosts the small path helpers
//! the collection migrators share: slug generation, media path rewriting, and
//! content-path reference resolution.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{MigrationError, Result};

/// Open-ended frontmatter mapping, decoded from YAML.
pub type Frontmatter = Map<String, Value>;

const DELIMITER: &str = "---";

/// One parsed markdown source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedDocument {
    /// Base name of the source file, without extension.
    pub filename: String,
    /// Explicit `slug` from the frontmatter when non-empty, else `filename`.
    pub slug: String,
    pub frontmatter: Frontmatter,
    /// Markdown body below the frontmatter block.
    pub content: String,
}

impl ParsedDocument {
    /// Decode the frontmatter into a collection schema.
    ///
    /// Unknown keys are ignored and missing keys fall back to the schema's
    /// defaults; a value of the wrong type on a known key is an error.
    pub fn decode<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(Value::Object(self.frontmatter.clone()))
    }
}

/// Outcome of parsing a single file during a directory scan.
#[derive(Debug)]
pub struct FileParse {
    pub filename: String,
    pub outcome: Result<ParsedDocument>,
}

/// Parse already-loaded file text. `path` is only used for naming and errors.
pub fn parse_document(path: &Path, text: &str) -> Result<ParsedDocument> {
    let filename = file_stem(path);
    let (yaml, content) = split_frontmatter(text);

    let frontmatter = match yaml {
        Some(yaml) => decode_frontmatter(path, yaml)?,
        None => Frontmatter::new(),
    };

    let slug = match frontmatter.get("slug") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => filename.clone(),
    };

    Ok(ParsedDocument {
        filename,
        slug,
        frontmatter,
        content: content.to_string(),
    })
}

/// Read and parse one markdown file.
pub async fn parse_file(path: &Path) -> Result<ParsedDocument> {
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
    parse_document(path, &text)
}

/// Parse every `.md` file in a directory, isolating per-file failures.
///
/// Files are read and parsed concurrently; results come back in the
/// directory's enumeration order, which is not sorted.
pub async fn parse_directory_entries(dir: &Path) -> Result<Vec<FileParse>> {
    let mut reader = match tokio::fs::read_dir(dir).await {
        Ok(reader) => reader,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(MigrationError::DirectoryNotFound(dir.to_path_buf()))
        }
        Err(e) => {
            return Err(MigrationError::io(
                format!("failed to list {}", dir.display()),
                e,
            ))
        }
    };

    let mut paths: Vec<PathBuf> = Vec::new();
    loop {
        let entry = reader
            .next_entry()
            .await
            .map_err(|e| MigrationError::io(format!("failed to list {}", dir.display()), e))?;
        let Some(entry) = entry else { break };

        let name = entry.file_name();
        if !name.to_string_lossy().ends_with(".md") {
            continue;
        }
        // Follows symlinks. A dangling link is kept so its read failure is
        // reported against the file.
        let path = entry.path();
        match tokio::fs::metadata(&path).await {
            Ok(meta) if !meta.is_file() => {}
            _ => paths.push(path),
        }
    }

    let handles: Vec<_> = paths
        .into_iter()
        .map(|path| tokio::spawn(async move { (file_stem(&path), parse_file(&path).await) }))
        .collect();

    let mut parsed = Vec::with_capacity(handles.len());
    for handle in handles {
        let (filename, outcome) = handle
            .await
            .map_err(|e| MigrationError::io("parse task failed", std::io::Error::other(e)))?;
        parsed.push(FileParse { filename, outcome });
    }
    Ok(parsed)
}

/// Parse every `.md` file in a directory; the first parse error propagates.
pub async fn parse_directory(dir: &Path) -> Result<Vec<ParsedDocument>> {
    parse_directory_entries(dir)
        .await?
        .into_iter()
        .map(|entry| entry.outcome)
        .collect()
}

/// Lower-case, collapse non-alphanumeric runs into `-`, trim hyphens.
///
/// Only ASCII letters and digits survive; anything else (including accented
/// letters) is treated as a separator.
pub fn generate_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Rewrite a relative media path under `/media/`.
///
/// Absolute URLs and paths already rooted at `/` are returned unchanged.
pub fn transform_media_path(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    if path.starts_with("http://") || path.starts_with("https://") || path.starts_with('/') {
        return path.to_string();
    }
    format!("/media/{}", path.trim_start_matches('/'))
}

/// Map a `content/...` reference to the slug of the document it points at.
pub fn resolve_reference(reference: &str) -> Option<String> {
    if !reference.starts_with("content/") {
        return None;
    }
    let last = reference.rsplit('/').next()?;
    let slug = last.strip_suffix(".md").unwrap_or(last);
    if slug.is_empty() {
        None
    } else {
        Some(slug.to_string())
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Split `text` into (frontmatter YAML, body). Text without an opening
/// `---` line, or without a closing one, has no frontmatter.
fn split_frontmatter(text: &str) -> (Option<&str>, &str) {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let Some(rest) = text.strip_prefix(DELIMITER) else {
        return (None, text);
    };
    let Some(rest) = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
    else {
        return (None, text);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }
    (None, text)
}

fn decode_frontmatter(path: &Path, yaml: &str) -> Result<Frontmatter> {
    let decoded: Option<Frontmatter> =
        serde_yaml::from_str(yaml).map_err(|source| MigrationError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(decoded.unwrap_or_default())
}
