//! `content/blog/posts/*.md` → `blog-posts`.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;

use super::{migrate_markdown, Collection, CollectionRun, MigrationContext, TargetRecord};
use crate::markdown::{transform_media_path, ParsedDocument};
use crate::models::BlogPostRecord;
use crate::validation::{validate_blog_post_data, ValidationResult};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BlogPostFrontmatter {
    title: Option<String>,
    excerpt: Option<String>,
    image: Option<String>,
    published_at: Option<String>,
}

impl TargetRecord for BlogPostRecord {
    fn validate(&self) -> ValidationResult {
        validate_blog_post_data(self)
    }
}

/// Posts come in unpublished. A missing `published_at` is stamped with the
/// time of migration.
pub fn map_blog_post(doc: &ParsedDocument) -> Result<BlogPostRecord> {
    let fm: BlogPostFrontmatter = doc.decode().context("invalid blog post frontmatter")?;
    Ok(BlogPostRecord {
        slug: doc.slug.clone(),
        title: fm.title,
        content: doc.content.clone(),
        excerpt: fm.excerpt.unwrap_or_default(),
        featured_image: transform_media_path(&fm.image.unwrap_or_default()),
        published: false,
        published_at: fm
            .published_at
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| Utc::now().to_rfc3339()),
    })
}

pub async fn migrate(ctx: &MigrationContext<'_>) -> Result<CollectionRun> {
    migrate_markdown(ctx, Collection::BlogPosts, map_blog_post).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::parse_document;
    use chrono::DateTime;
    use std::path::Path;

    #[test]
    fn test_maps_post() {
        let doc = parse_document(
            Path::new("hello.md"),
            "---\ntitle: Hello\nimage: blog/hello.png\npublished_at: 2024-01-15\n---\n# Hi\n",
        )
        .unwrap();
        let record = map_blog_post(&doc).unwrap();
        assert_eq!(record.title.as_deref(), Some("Hello"));
        assert_eq!(record.content, "# Hi\n");
        assert_eq!(record.featured_image, "/media/blog/hello.png");
        assert_eq!(record.published_at, "2024-01-15");
        assert!(!record.published);
    }

    #[test]
    fn test_published_at_defaults_to_now() {
        let doc = parse_document(Path::new("p.md"), "---\ntitle: P\n---\n").unwrap();
        let record = map_blog_post(&doc).unwrap();
        assert!(DateTime::parse_from_rfc3339(&record.published_at).is_ok());
    }
}
