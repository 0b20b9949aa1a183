//! Template marketplace catalog.
//!
//! The catalog is read-only at runtime. It is loaded once from the embedded
//! `builtin_templates.json` or from a JSON file named in the configuration,
//! and served through the [`TemplateSource`] trait so handlers can be tested
//! against a failing or substituted source.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::models::Template;

/// Trait for template record providers, allowing mock injection for tests.
pub trait TemplateSource: Send + Sync {
    /// All templates in catalog order.
    fn list(&self) -> Result<Vec<Template>>;

    /// A single template by ID.
    fn get(&self, id: i64) -> Result<Option<Template>>;

    /// Templates whose IDs are in `ids`, in catalog order (not `ids` order).
    fn fetch_by_ids(&self, ids: &[i64]) -> Result<Vec<Template>>;
}

/// Catalog file schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogFile {
    version: String,
    templates: Vec<Template>,
}

/// In-memory template catalog.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl TemplateCatalog {
    /// Builds a catalog from records.
    ///
    /// # Errors
    ///
    /// Returns an error if IDs repeat or a record has no name or category.
    pub fn new(templates: Vec<Template>) -> Result<Self> {
        let mut seen = HashSet::new();

        for template in &templates {
            if !seen.insert(template.id) {
                anyhow::bail!("Duplicate template id {}", template.id);
            }
            if template.name.trim().is_empty() {
                anyhow::bail!("Template {} has an empty name", template.id);
            }
            if template.category.trim().is_empty() {
                anyhow::bail!("Template {} has an empty category", template.id);
            }
        }

        Ok(Self { templates })
    }

    /// Loads the catalog embedded in the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json(include_str!("builtin_templates.json"))
            .context("Failed to parse embedded builtin_templates.json")
    }

    /// Parses a catalog file.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json).context("Invalid template catalog JSON")?;
        Self::new(file.templates)
    }

    /// Loads a catalog file from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read template catalog: {}", path.display()))?;
        Self::from_json(&json)
            .with_context(|| format!("Failed to load template catalog: {}", path.display()))
    }

    /// Loads `path` when given, otherwise the embedded catalog.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::builtin(),
        }
    }

    /// Templates in a category, in catalog order.
    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<&Template> {
        self.templates
            .iter()
            .filter(|t| t.category == category)
            .collect()
    }

    /// Number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns true if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateSource for TemplateCatalog {
    fn list(&self) -> Result<Vec<Template>> {
        Ok(self.templates.clone())
    }

    fn get(&self, id: i64) -> Result<Option<Template>> {
        Ok(self.templates.iter().find(|t| t.id == id).cloned())
    }

    fn fetch_by_ids(&self, ids: &[i64]) -> Result<Vec<Template>> {
        Ok(self
            .templates
            .iter()
            .filter(|t| ids.contains(&t.id))
            .cloned()
            .collect())
    }
}
