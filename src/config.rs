use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub content: ContentConfig,
    #[serde(default)]
    pub backup: BackupConfig,
    pub db: DbConfig,
    #[serde(default)]
    pub migration: MigrationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    /// Holds `vendors/`, `categories/`, `products/`, `blog/posts/`, `team/`
    /// and `company/info.json`.
    pub root: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackupConfig {
    #[serde(default = "default_backup_root")]
    pub root: PathBuf,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            root: default_backup_root(),
        }
    }
}

fn default_backup_root() -> PathBuf {
    PathBuf::from("./backups")
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MigrationConfig {
    #[serde(default = "default_lookup_limit")]
    pub lookup_limit: usize,
    #[serde(default = "default_category_color")]
    pub default_category_color: String,
    #[serde(default = "default_team_order")]
    pub default_team_order: i64,
    #[serde(default = "default_excerpt_chars")]
    pub description_excerpt_chars: usize,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            lookup_limit: default_lookup_limit(),
            default_category_color: default_category_color(),
            default_team_order: default_team_order(),
            description_excerpt_chars: default_excerpt_chars(),
        }
    }
}

fn default_lookup_limit() -> usize {
    1000
}
fn default_category_color() -> String {
    "#0066cc".to_string()
}
fn default_team_order() -> i64 {
    999
}
fn default_excerpt_chars() -> usize {
    200
}

impl Config {
    /// In-process configuration rooted at `content_root`, with backups in a
    /// sibling `backups/` directory and default migration settings.
    pub fn for_content_root(content_root: impl Into<PathBuf>) -> Self {
        let root = content_root.into();
        let parent = root
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            backup: BackupConfig {
                root: parent.join("backups"),
            },
            db: DbConfig {
                path: parent.join("data").join("cms.sqlite"),
            },
            content: ContentConfig { root },
            migration: MigrationConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.migration.lookup_limit == 0 {
        anyhow::bail!("migration.lookup_limit must be >= 1");
    }

    if config.migration.default_category_color.trim().is_empty() {
        anyhow::bail!("migration.default_category_color must not be empty");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(body: &str) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("migrate.toml");
        fs::write(&path, body).unwrap();
        (tmp, path)
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let (_tmp, path) = write_config(
            r#"
[content]
root = "./content"

[db]
path = "./data/cms.sqlite"
"#,
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.content.root, PathBuf::from("./content"));
        assert_eq!(config.backup.root, PathBuf::from("./backups"));
        assert_eq!(config.migration.lookup_limit, 1000);
        assert_eq!(config.migration.default_category_color, "#0066cc");
        assert_eq!(config.migration.default_team_order, 999);
        assert_eq!(config.migration.description_excerpt_chars, 200);
    }

    #[test]
    fn test_zero_lookup_limit_rejected() {
        let (_tmp, path) = write_config(
            r#"
[content]
root = "./content"

[db]
path = "./cms.sqlite"

[migration]
lookup_limit = 0
"#,
        );
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("lookup_limit"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/migrate.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_for_content_root() {
        let config = Config::for_content_root("/srv/site/content");
        assert_eq!(config.backup.root, PathBuf::from("/srv/site/backups"));
        assert_eq!(config.db.path, PathBuf::from("/srv/site/data/cms.sqlite"));
    }
}
