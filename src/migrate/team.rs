//! `content/team/*.md` → `team-members`.

use anyhow::{Context, Result};
use serde::Deserialize;

use super::{migrate_markdown, Collection, CollectionRun, MigrationContext, TargetRecord};
use crate::config::MigrationConfig;
use crate::markdown::{transform_media_path, ParsedDocument};
use crate::models::TeamMemberRecord;
use crate::validation::{validate_team_member_data, ValidationResult};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TeamMemberFrontmatter {
    name: Option<String>,
    role: Option<String>,
    bio: Option<String>,
    image: Option<String>,
    email: Option<String>,
    linkedin: Option<String>,
    order: Option<i64>,
}

impl TargetRecord for TeamMemberRecord {
    fn validate(&self) -> ValidationResult {
        validate_team_member_data(self)
    }
}

/// An explicit `order: 0` is kept; only an absent order takes the configured
/// default.
pub fn map_team_member(doc: &ParsedDocument, settings: &MigrationConfig) -> Result<TeamMemberRecord> {
    let fm: TeamMemberFrontmatter = doc.decode().context("invalid team member frontmatter")?;
    Ok(TeamMemberRecord {
        name: fm.name,
        role: fm.role,
        bio: fm.bio.unwrap_or_default(),
        image: transform_media_path(&fm.image.unwrap_or_default()),
        email: fm.email.unwrap_or_default(),
        linkedin: fm.linkedin.unwrap_or_default(),
        order: fm.order.unwrap_or(settings.default_team_order),
    })
}

pub async fn migrate(ctx: &MigrationContext<'_>) -> Result<CollectionRun> {
    let settings = &ctx.config.migration;
    migrate_markdown(ctx, Collection::TeamMembers, |doc| map_team_member(doc, settings)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::parse_document;
    use std::path::Path;

    #[test]
    fn test_order_default() {
        let doc = parse_document(
            Path::new("jane-doe.md"),
            "---\nname: Jane Doe\nrole: CTO\n---\n\nJane leads engineering.\n",
        )
        .unwrap();
        let record = map_team_member(&doc, &MigrationConfig::default()).unwrap();
        assert_eq!(record.order, 999);
        assert_eq!(record.bio, "");
        assert_eq!(record.role.as_deref(), Some("CTO"));
    }

    #[test]
    fn test_explicit_zero_order_is_kept() {
        let doc = parse_document(Path::new("a.md"), "---\nname: A\norder: 0\n---\n").unwrap();
        let record = map_team_member(&doc, &MigrationConfig::default()).unwrap();
        assert_eq!(record.order, 0);
    }
}
