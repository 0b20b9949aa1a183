//! Layout file I/O service.
//!
//! Saved layouts live in one directory, one `<uuid>.json` file per layout.
//! Every read and delete is scoped to an owner: a layout that exists but
//! belongs to someone else is reported exactly like a missing one.

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::Layout;

/// Errors from the layout store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No layout with this ID for this owner
    #[error("Layout {id} not found")]
    NotFound {
        /// Requested layout ID
        id: String,
    },

    /// ID is not a UUID
    #[error("Invalid layout id '{0}': expected a UUID")]
    InvalidId(String),

    /// Layout failed validation
    #[error("Invalid layout: {0}")]
    Invalid(String),

    /// I/O or serialization failure
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result alias for layout store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Service for managing saved layout files.
#[derive(Debug, Clone)]
pub struct LayoutService {
    root: PathBuf,
}

impl LayoutService {
    /// Creates a service storing layouts under `root`.
    ///
    /// The directory is created lazily on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the layout files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the layout directory if it doesn't exist.
    pub fn ensure_root(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.root).with_context(|| {
            format!("Failed to create layouts directory: {}", self.root.display())
        })
    }

    /// Lists every layout owned by `owner`, newest first.
    ///
    /// A missing directory is an empty store. Files that fail to parse are
    /// logged and skipped.
    pub fn list_for_owner(&self, owner: &str) -> StoreResult<Vec<Layout>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.root).with_context(|| {
            format!("Failed to read layouts directory: {}", self.root.display())
        })?;

        let mut layouts = Vec::new();
        for entry in entries {
            let Ok(entry) = entry else { continue };
            let path = entry.path();

            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }

            match Self::read_file(&path) {
                Ok(layout) if layout.owner == owner => layouts.push(layout),
                Ok(_) => {}
                Err(e) => warn!(path = %path.display(), "skipping unreadable layout: {e:#}"),
            }
        }

        layouts.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(layouts)
    }

    /// Loads layout `id` if it belongs to `owner`.
    pub fn load_owned(&self, id: &str, owner: &str) -> StoreResult<Layout> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Err(StoreError::NotFound { id: id.to_string() });
        }

        let layout = Self::read_file(&path)?;
        if layout.owner != owner {
            debug!(layout = %id, "layout exists but is owned by another user");
            return Err(StoreError::NotFound { id: id.to_string() });
        }

        Ok(layout)
    }

    /// Validates and writes a layout.
    ///
    /// Uses temp file + rename so readers never see a partial file.
    pub fn save(&self, layout: &Layout) -> StoreResult<()> {
        layout
            .validate()
            .map_err(|e| StoreError::Invalid(e.to_string()))?;

        let path = self.path_for(&layout.id)?;
        self.ensure_root()?;

        let json = serde_json::to_string_pretty(layout).context("Failed to serialize layout")?;
        // Unique per save; concurrent writers of one layout must not share it
        let temp_path = self
            .root
            .join(format!(".{}.{}.tmp", layout.id, Uuid::new_v4().simple()));

        fs::write(&temp_path, json)
            .with_context(|| format!("Failed to write temp layout file: {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to rename temp layout file to: {}", path.display()))?;

        debug!(layout = %layout.id, owner = %layout.owner, "layout saved");
        Ok(())
    }

    /// Deletes layout `id` if it belongs to `owner`.
    pub fn delete_owned(&self, id: &str, owner: &str) -> StoreResult<()> {
        let layout = self.load_owned(id, owner)?;
        let path = self.path_for(&layout.id)?;

        fs::remove_file(&path)
            .with_context(|| format!("Failed to delete layout file: {}", path.display()))?;

        Ok(())
    }

    /// Reads a layout JSON file from anywhere on disk.
    pub fn read_file(path: &Path) -> anyhow::Result<Layout> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read layout file: {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse layout file: {}", path.display()))
    }

    fn path_for(&self, id: &str) -> StoreResult<PathBuf> {
        let uuid = Uuid::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))?;
        Ok(self.root.join(format!("{}.json", uuid.hyphenated())))
    }
}
