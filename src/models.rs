//! Target record shapes written to the content store.
//!
//! Each collection has one record type, serialized with camelCase keys.
//! These are the "already mapped" shapes the validators check.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Store-assigned record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Str(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Str(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub slug: String,
    pub name: Option<String>,
    pub description: String,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorRecord {
    pub slug: String,
    pub name: Option<String>,
    pub description: String,
    pub logo: String,
    pub image: String,
    pub website: String,
    pub founded: Option<Value>,
    pub location: String,
    pub featured: bool,
    pub partner: bool,
    pub services: Vec<Value>,
    pub tier: String,
    pub certifications: Vec<Value>,
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub url: String,
    pub alt_text: String,
    pub is_main: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub slug: String,
    pub name: Option<String>,
    pub description: String,
    pub vendor: RecordId,
    pub images: Vec<ProductImage>,
    pub specifications: Vec<Value>,
    pub published: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostRecord {
    pub slug: String,
    pub title: Option<String>,
    pub content: String,
    pub excerpt: String,
    pub featured_image: String,
    pub published: bool,
    pub published_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberRecord {
    pub name: Option<String>,
    pub role: Option<String>,
    pub bio: String,
    pub image: String,
    pub email: String,
    pub linkedin: String,
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfoRecord {
    pub name: Option<String>,
    pub tagline: String,
    pub description: String,
    pub story: String,
    pub founded: Option<Value>,
    pub location: String,
    pub address: String,
    pub phone: String,
    pub email: Option<String>,
    pub logo: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_id_serializes_untagged() {
        assert_eq!(serde_json::to_value(RecordId::Int(7)).unwrap(), json!(7));
        assert_eq!(
            serde_json::to_value(RecordId::Str("abc".into())).unwrap(),
            json!("abc")
        );
    }

    #[test]
    fn test_vendor_record_camel_case() {
        let vendor = VendorRecord {
            slug: "acme".into(),
            name: Some("Acme".into()),
            description: String::new(),
            logo: String::new(),
            image: String::new(),
            website: String::new(),
            founded: None,
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
        };
        let value = serde_json::to_value(&vendor).unwrap();
        assert_eq!(value["contactEmail"], "a@acme.com");
        assert!(value.get("contactPhone").is_none());
        assert_eq!(value["tier"], "free");
    }
}
