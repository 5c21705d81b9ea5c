//! Pre-insert validation of mapped records.
//!
//! Primitive validators return `Option<ValidationError>`; collection
//! validators run a fixed checklist and collect every error in one pass.
//! Nothing here touches storage or fails: problems come back as data.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::models::{
    BlogPostRecord, CategoryRecord, CompanyInfoRecord, ProductRecord, RecordId, TeamMemberRecord,
    VendorRecord,
};

/// Tiers a vendor may carry at migration time. `tier3` is deliberately absent.
pub const VENDOR_TIERS: &[&str] = &["free", "tier1", "tier2"];

/// Vendor fields reserved for paid tiers.
const TIER1_FIELDS: &[&str] = &["website", "linkedinUrl", "twitterUrl", "certifications"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: String) -> Self {
        Self {
            field: field.to_string(),
            message,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Aggregated outcome of a collection validator. `valid` is always
/// `errors.is_empty()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    valid: bool,
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// All errors joined into one line, for report output.
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Whether a value counts as absent for `validate_required`.
///
/// Only null/missing and the empty string are absent. `0`, `false`, and
/// empty collections are present values.
pub trait Presence {
    fn is_missing(&self) -> bool;
}

impl Presence for str {
    fn is_missing(&self) -> bool {
        self.is_empty()
    }
}

impl Presence for String {
    fn is_missing(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Presence + ?Sized> Presence for &T {
    fn is_missing(&self) -> bool {
        (**self).is_missing()
    }
}

impl<T: Presence> Presence for Option<T> {
    fn is_missing(&self) -> bool {
        match self {
            Some(v) => v.is_missing(),
            None => true,
        }
    }
}

impl Presence for Value {
    fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl Presence for RecordId {
    fn is_missing(&self) -> bool {
        matches!(self, RecordId::Str(s) if s.is_empty())
    }
}

impl<T> Presence for Vec<T> {
    fn is_missing(&self) -> bool {
        false
    }
}

macro_rules! always_present {
    ($($t:ty),*) => {
        $(impl Presence for $t {
            fn is_missing(&self) -> bool {
                false
            }
        })*
    };
}

always_present!(bool, i32, i64, u32, u64, usize, f64);

pub fn validate_required<T: Presence + ?Sized>(value: &T, field: &str) -> Option<ValidationError> {
    if value.is_missing() {
        Some(ValidationError::new(field, format!("{} is required", field)))
    } else {
        None
    }
}

pub fn validate_max_length(value: Option<&str>, max: usize, field: &str) -> Option<ValidationError> {
    let value = value.filter(|v| !v.is_empty())?;
    let len = value.chars().count();
    if len > max {
        Some(ValidationError::new(
            field,
            format!(
                "{} exceeds maximum length of {} characters (current: {})",
                field, max, len
            ),
        ))
    } else {
        None
    }
}

pub fn validate_email(value: Option<&str>, field: &str) -> Option<ValidationError> {
    let value = value.filter(|v| !v.is_empty())?;
    if is_email_shaped(value) {
        None
    } else {
        Some(ValidationError::new(
            field,
            format!("{} must be a valid email address", field),
        ))
    }
}

pub fn validate_url(value: Option<&str>, field: &str) -> Option<ValidationError> {
    let value = value.filter(|v| !v.is_empty())?;
    if is_absolute_url(value) {
        None
    } else {
        Some(ValidationError::new(
            field,
            format!("{} must be a valid URL", field),
        ))
    }
}

pub fn validate_enum(value: Option<&str>, options: &[&str], field: &str) -> Option<ValidationError> {
    let value = value.filter(|v| !v.is_empty())?;
    if options.contains(&value) {
        None
    } else {
        Some(ValidationError::new(
            field,
            format!("{} must be one of: {}", field, options.join(", ")),
        ))
    }
}

pub fn validate_vendor_data(data: &VendorRecord) -> ValidationResult {
    let mut errors = Vec::new();

    errors.extend(validate_required(&data.tier, "tier"));
    errors.extend(validate_required(&data.name, "name"));
    errors.extend(validate_required(&data.slug, "slug"));
    errors.extend(validate_required(&data.contact_email, "contactEmail"));

    errors.extend(validate_max_length(data.name.as_deref(), 255, "name"));
    errors.extend(validate_max_length(Some(data.slug.as_str()), 255, "slug"));
    errors.extend(validate_max_length(Some(data.description.as_str()), 5000, "description"));
    errors.extend(validate_max_length(Some(data.logo.as_str()), 500, "logo"));
    errors.extend(validate_max_length(data.contact_email.as_deref(), 255, "contactEmail"));
    errors.extend(validate_max_length(data.contact_phone.as_deref(), 50, "contactPhone"));

    errors.extend(validate_email(data.contact_email.as_deref(), "contactEmail"));
    errors.extend(validate_enum(Some(data.tier.as_str()), VENDOR_TIERS, "tier"));

    if data.tier == "free" {
        for field in TIER1_FIELDS {
            let populated = match *field {
                "website" => !data.website.is_empty(),
                "linkedinUrl" => data.linkedin_url.as_deref().is_some_and(|v| !v.is_empty()),
                "twitterUrl" => data.twitter_url.as_deref().is_some_and(|v| !v.is_empty()),
                "certifications" => !data.certifications.is_empty(),
                _ => false,
            };
            if populated {
                errors.push(ValidationError::new(
                    field,
                    format!("{} is only available for Tier 1+ vendors", field),
                ));
            }
        }
    }

    errors.extend(validate_url(Some(data.website.as_str()), "website"));
    errors.extend(validate_url(data.linkedin_url.as_deref(), "linkedinUrl"));
    errors.extend(validate_url(data.twitter_url.as_deref(), "twitterUrl"));

    ValidationResult::from_errors(errors)
}

pub fn validate_product_data(data: &ProductRecord) -> ValidationResult {
    let mut errors = Vec::new();

    errors.extend(validate_required(&data.name, "name"));
    errors.extend(validate_required(&data.vendor, "vendor"));
    errors.extend(validate_required(&data.slug, "slug"));

    errors.extend(validate_max_length(data.name.as_deref(), 255, "name"));
    errors.extend(validate_max_length(Some(data.slug.as_str()), 255, "slug"));

    ValidationResult::from_errors(errors)
}

pub fn validate_category_data(data: &CategoryRecord) -> ValidationResult {
    let mut errors = Vec::new();

    errors.extend(validate_required(&data.name, "name"));
    errors.extend(validate_required(&data.slug, "slug"));

    errors.extend(validate_max_length(data.name.as_deref(), 255, "name"));
    errors.extend(validate_max_length(Some(data.slug.as_str()), 255, "slug"));
    errors.extend(validate_max_length(Some(data.description.as_str()), 500, "description"));
    errors.extend(validate_max_length(Some(data.icon.as_str()), 100, "icon"));
    errors.extend(validate_max_length(Some(data.color.as_str()), 50, "color"));

    ValidationResult::from_errors(errors)
}

pub fn validate_blog_post_data(data: &BlogPostRecord) -> ValidationResult {
    let mut errors = Vec::new();

    errors.extend(validate_required(&data.title, "title"));
    errors.extend(validate_required(&data.slug, "slug"));
    errors.extend(validate_required(&data.content, "content"));

    errors.extend(validate_max_length(data.title.as_deref(), 255, "title"));
    errors.extend(validate_max_length(Some(data.slug.as_str()), 255, "slug"));
    errors.extend(validate_max_length(Some(data.excerpt.as_str()), 500, "excerpt"));

    ValidationResult::from_errors(errors)
}

pub fn validate_team_member_data(data: &TeamMemberRecord) -> ValidationResult {
    let mut errors = Vec::new();

    errors.extend(validate_required(&data.name, "name"));
    errors.extend(validate_required(&data.role, "role"));

    errors.extend(validate_max_length(data.name.as_deref(), 255, "name"));
    errors.extend(validate_max_length(data.role.as_deref(), 255, "role"));
    errors.extend(validate_max_length(Some(data.bio.as_str()), 1000, "bio"));
    errors.extend(validate_max_length(Some(data.image.as_str()), 500, "image"));
    errors.extend(validate_max_length(Some(data.email.as_str()), 255, "email"));

    errors.extend(validate_email(Some(data.email.as_str()), "email"));

    ValidationResult::from_errors(errors)
}

pub fn validate_company_info_data(data: &CompanyInfoRecord) -> ValidationResult {
    let mut errors = Vec::new();

    errors.extend(validate_required(&data.name, "name"));
    errors.extend(validate_required(&data.email, "email"));

    errors.extend(validate_max_length(data.name.as_deref(), 255, "name"));
    errors.extend(validate_max_length(data.email.as_deref(), 255, "email"));

    errors.extend(validate_email(data.email.as_deref(), "email"));

    ValidationResult::from_errors(errors)
}

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// `local@domain.tld`: no whitespace and exactly one `@`.
fn is_email_shaped(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Absolute URL with a host.
fn is_absolute_url(value: &str) -> bool {
    Url::parse(value).is_ok_and(|url| url.has_host())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn free_vendor() -> VendorRecord {
        VendorRecord {
            slug: "acme".into(),
            name: Some("Acme Co".into()),
            description: "Radar systems".into(),
            logo: "/media/acme.png".into(),
            image: String::new(),
            website: String::new(),
            founded: Some(json!(1999)),
            location: String::new(),
            featured: false,
            partner: true,
            services: vec![],
            tier: "free".into(),
            certifications: vec![],
            contact_email: Some("a@acme.com".into()),
            contact_phone: None,
            linkedin_url: None,
            twitter_url: None,
        }
    }

    #[test]
    fn test_required_totality() {
        assert!(validate_required(&Value::Null, "f").is_some());
        assert!(validate_required(&None::<String>, "f").is_some());
        assert!(validate_required("", "f").is_some());
        assert!(validate_required(&json!(""), "f").is_some());

        assert!(validate_required(&json!(0), "f").is_none());
        assert!(validate_required(&json!(false), "f").is_none());
        assert!(validate_required(&json!([]), "f").is_none());
        assert!(validate_required(&json!({}), "f").is_none());
        assert!(validate_required(&0i64, "f").is_none());
        assert!(validate_required(&false, "f").is_none());
        assert!(validate_required(&Vec::<Value>::new(), "f").is_none());
        assert!(validate_required(&Some("x".to_string()), "f").is_none());
    }

    #[test]
    fn test_required_message() {
        let err = validate_required("", "name").unwrap();
        assert_eq!(err.field, "name");
        assert_eq!(err.message, "name is required");
    }

    #[test]
    fn test_max_length_boundary() {
        let at_limit = "a".repeat(10);
        let over = "a".repeat(11);
        assert!(validate_max_length(Some(at_limit.as_str()), 10, "f").is_none());
        let err = validate_max_length(Some(over.as_str()), 10, "f").unwrap();
        assert!(err.message.contains("10"));
        assert!(err.message.contains("current: 11"));
        assert!(validate_max_length(None, 0, "f").is_none());
        assert!(validate_max_length(Some(""), 0, "f").is_none());
    }

    #[test]
    fn test_max_length_counts_characters() {
        assert!(validate_max_length(Some("café"), 4, "f").is_none());
    }

    #[test]
    fn test_email() {
        assert!(validate_email(Some("a@acme.com"), "e").is_none());
        assert!(validate_email(Some("first.last@sub.example.org"), "e").is_none());
        assert!(validate_email(None, "e").is_none());
        assert!(validate_email(Some(""), "e").is_none());
        assert!(validate_email(Some("not-an-email"), "e").is_some());
        assert!(validate_email(Some("a@b"), "e").is_some());
        assert!(validate_email(Some("a b@c.com"), "e").is_some());
        assert!(validate_email(Some("@c.com"), "e").is_some());
        assert!(validate_email(Some("a@@c.com"), "e").is_some());
        assert!(validate_email(Some("a@c."), "e").is_some());
    }

    #[test]
    fn test_url() {
        assert!(validate_url(Some("https://acme.com"), "u").is_none());
        assert!(validate_url(Some("http://localhost:3000/path?q=1"), "u").is_none());
        assert!(validate_url(Some("https://user@host.io/x"), "u").is_none());
        assert!(validate_url(None, "u").is_none());
        assert!(validate_url(Some("acme.com"), "u").is_some());
        assert!(validate_url(Some("https://"), "u").is_some());
        assert!(validate_url(Some("1http://x.com"), "u").is_some());
        assert!(validate_url(Some("http://host:abc"), "u").is_some());
        assert!(validate_url(Some("http://host:99999"), "u").is_some());
        assert!(validate_url(Some("http://exa<mple>.com"), "u").is_some());
        assert!(validate_url(Some("mailto:a@acme.com"), "u").is_some());
        let err = validate_url(Some("nope"), "website").unwrap();
        assert_eq!(err.message, "website must be a valid URL");
    }

    #[test]
    fn test_enum() {
        assert!(validate_enum(Some("tier1"), VENDOR_TIERS, "tier").is_none());
        assert!(validate_enum(None, VENDOR_TIERS, "tier").is_none());
        let err = validate_enum(Some("tier3"), VENDOR_TIERS, "tier").unwrap();
        assert_eq!(err.message, "tier must be one of: free, tier1, tier2");
    }

    #[test]
    fn test_valid_free_vendor() {
        let result = validate_vendor_data(&free_vendor());
        assert!(result.is_valid(), "{:?}", result.errors());
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_free_vendor_tier_gating() {
        let mut vendor = free_vendor();
        vendor.website = "https://acme.com".into();
        vendor.certifications = vec![json!("ISO 9001")];
        vendor.linkedin_url = Some("https://linkedin.com/company/acme".into());
        let result = validate_vendor_data(&vendor);
        assert!(!result.is_valid());
        let gated: Vec<_> = result
            .errors()
            .iter()
            .filter(|e| e.message.contains("Tier 1+"))
            .map(|e| e.field.as_str())
            .collect();
        assert_eq!(gated, vec!["website", "linkedinUrl", "certifications"]);
    }

    #[test]
    fn test_paid_vendor_may_use_tier1_fields() {
        let mut vendor = free_vendor();
        vendor.tier = "tier2".into();
        vendor.website = "https://acme.com".into();
        vendor.twitter_url = Some("https://x.com/acme".into());
        assert!(validate_vendor_data(&vendor).is_valid());
    }

    #[test]
    fn test_tier3_rejected() {
        let mut vendor = free_vendor();
        vendor.tier = "tier3".into();
        let result = validate_vendor_data(&vendor);
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].field, "tier");
    }

    #[test]
    fn test_vendor_collects_all_errors() {
        let mut vendor = free_vendor();
        vendor.name = None;
        vendor.contact_email = Some("broken".into());
        vendor.contact_phone = Some("9".repeat(51));
        let result = validate_vendor_data(&vendor);
        let fields: Vec<_> = result.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "contactPhone", "contactEmail"]);
        assert_eq!(result.summary().matches("; ").count(), 2);
    }

    #[test]
    fn test_product_requires_name() {
        let product = ProductRecord {
            slug: "navsat".into(),
            name: None,
            description: String::new(),
            vendor: RecordId::Int(1),
            images: vec![],
            specifications: vec![],
            published: false,
        };
        let result = validate_product_data(&product);
        assert!(!result.is_valid());
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].field, "name");
    }

    #[test]
    fn test_category_lengths() {
        let category = CategoryRecord {
            slug: "nav".into(),
            name: Some("Navigation".into()),
            description: "d".repeat(501),
            icon: String::new(),
            color: "#0066cc".into(),
        };
        let result = validate_category_data(&category);
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].field, "description");
    }

    #[test]
    fn test_blog_post_requires_content() {
        let post = BlogPostRecord {
            slug: "hello".into(),
            title: Some("Hello".into()),
            content: String::new(),
            excerpt: String::new(),
            featured_image: String::new(),
            published: false,
            published_at: "2024-01-01".into(),
        };
        let result = validate_blog_post_data(&post);
        assert_eq!(result.errors()[0].field, "content");
    }

    #[test]
    fn test_team_member_email_optional() {
        let member = TeamMemberRecord {
            name: Some("Ada".into()),
            role: Some("Engineer".into()),
            bio: String::new(),
            image: String::new(),
            email: String::new(),
            linkedin: String::new(),
            order: 999,
        };
        assert!(validate_team_member_data(&member).is_valid());

        let member = TeamMemberRecord {
            email: "ada-at-example".into(),
            ..member
        };
        assert!(!validate_team_member_data(&member).is_valid());
    }

    #[test]
    fn test_company_info_requires_email() {
        let info = CompanyInfoRecord {
            name: Some("Harbor".into()),
            tagline: String::new(),
            description: String::new(),
            story: String::new(),
            founded: None,
            location: String::new(),
            address: String::new(),
            phone: String::new(),
            email: None,
            logo: String::new(),
        };
        let result = validate_company_info_data(&info);
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].message, "email is required");
    }

    #[test]
    fn test_result_serializes_valid_flag() {
        let value = serde_json::to_value(ValidationResult::from_errors(vec![])).unwrap();
        assert_eq!(value, json!({"valid": true, "errors": []}));
    }
}
