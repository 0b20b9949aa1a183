//! Layout and box data structures.

use crate::models::Component;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a layout name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// A positioned container holding an ordered list of components.
///
/// # Validation
///
/// - width is a percentage of the canvas width (0-100)
/// - columns is the CSS grid column count; zero is treated as one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutBox {
    /// Box identifier, unique within its layout
    #[serde(default = "new_box_id")]
    pub id: String,
    /// Horizontal offset in pixels from the canvas origin
    #[serde(default)]
    pub x: f64,
    /// Vertical offset in pixels from the canvas origin
    #[serde(default)]
    pub y: f64,
    /// Width as a percentage of the canvas
    #[serde(default = "default_box_width")]
    pub width: f64,
    /// Grid column count
    #[serde(default = "default_columns")]
    pub columns: u32,
    /// Components in display order
    #[serde(default)]
    pub components: Vec<Component>,
}

fn new_box_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

const fn default_box_width() -> f64 {
    100.0
}

const fn default_columns() -> u32 {
    1
}

impl LayoutBox {
    /// Creates an empty full-width, single-column box at the given offset.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            id: new_box_id(),
            x,
            y,
            width: default_box_width(),
            columns: default_columns(),
            components: Vec::new(),
        }
    }

    /// Sets width and column count, returning the box for chaining.
    #[must_use]
    pub fn with_grid(mut self, width: f64, columns: u32) -> Self {
        self.width = width;
        self.columns = columns;
        self
    }

    /// Appends a component, returning the box for chaining.
    #[must_use]
    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// Column count used for rendering (never zero).
    #[must_use]
    pub fn effective_columns(&self) -> u32 {
        self.columns.max(1)
    }
}

/// Editable content of a page design, shared by user layouts and templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutContent {
    /// Boxes in stored order
    #[serde(default)]
    pub boxes: Vec<LayoutBox>,
}

/// A saved page design owned by a user.
///
/// # Validation
///
/// - name must be non-empty (after trimming), max 100 characters
/// - created must be <= modified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Layout identifier (UUID)
    pub id: String,
    /// Identifier of the owning user
    pub owner: String,
    /// Display name
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Boxes in stored order
    #[serde(default)]
    pub boxes: Vec<LayoutBox>,
    /// Creation timestamp
    pub created: DateTime<Utc>,
    /// Last modification timestamp
    pub modified: DateTime<Utc>,
}

impl Layout {
    /// Creates an empty layout owned by `owner`.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        Self::validate_name(&name)?;

        let now = Utc::now();
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner: owner.into(),
            name,
            description: String::new(),
            boxes: Vec::new(),
            created: now,
            modified: now,
        })
    }

    /// Creates a layout for `owner` from existing content (e.g. a template).
    pub fn from_content(
        owner: impl Into<String>,
        name: impl Into<String>,
        content: LayoutContent,
    ) -> Result<Self> {
        let mut layout = Self::new(owner, name)?;
        layout.boxes = content.boxes;
        Ok(layout)
    }

    /// Validates a layout name.
    pub fn validate_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            anyhow::bail!("Layout name cannot be empty");
        }

        let len = name.chars().count();
        if len > MAX_NAME_LEN {
            anyhow::bail!(
                "Layout name exceeds maximum length of {MAX_NAME_LEN} characters (got {len})"
            );
        }

        Ok(())
    }

    /// Validates the whole layout.
    pub fn validate(&self) -> Result<()> {
        Self::validate_name(&self.name)?;

        if self.owner.trim().is_empty() {
            anyhow::bail!("Layout '{}' has no owner", self.name);
        }

        if self.created > self.modified {
            anyhow::bail!("Layout '{}' was modified before it was created", self.name);
        }

        for (idx, layout_box) in self.boxes.iter().enumerate() {
            if !(0.0..=100.0).contains(&layout_box.width) {
                anyhow::bail!(
                    "Box {idx} width must be a percentage between 0 and 100 (got {})",
                    layout_box.width
                );
            }
        }

        Ok(())
    }

    /// Updates the modification timestamp to now.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    /// Total number of components across all boxes.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.boxes.iter().map(|b| b.components.len()).sum()
    }
}
