//! Marketplace template records.

use crate::models::LayoutContent;
use serde::{Deserialize, Serialize};

/// A predefined layout offered in the template marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Catalog identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Short description
    #[serde(default)]
    pub description: String,
    /// Thumbnail image URL
    #[serde(default)]
    pub thumbnail: String,
    /// Marketplace category (e.g. "电商")
    pub category: String,
    /// Searchable keywords
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Layout content copied into a new layout when the template is used
    #[serde(default)]
    pub layout: LayoutContent,
}

/// Template record without its layout content, as returned by listings and search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSummary {
    /// Catalog identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Short description
    pub description: String,
    /// Thumbnail image URL
    pub thumbnail: String,
    /// Marketplace category
    pub category: String,
    /// Searchable keywords
    pub keywords: Vec<String>,
}

impl From<&Template> for TemplateSummary {
    fn from(t: &Template) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            description: t.description.clone(),
            thumbnail: t.thumbnail.clone(),
            category: t.category.clone(),
            keywords: t.keywords.clone(),
        }
    }
}
