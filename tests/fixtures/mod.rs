//! Shared test fixtures for integration tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use chrono::{TimeZone, Utc};
use pagesmith::models::{Component, ComponentKind, Layout, LayoutBox, LayoutContent, Template};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Fixed owner used by most fixtures.
pub const TEST_OWNER: &str = "user-1";

/// Creates a layout with a header box and a two-column form box.
///
/// Timestamps are fixed so serialized output is deterministic.
pub fn sample_layout(owner: &str, name: &str) -> Layout {
    let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let modified = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();

    let mut layout = Layout::new(owner, name).unwrap();
    layout.description = "Integration test layout".to_string();
    layout.created = created;
    layout.modified = modified;
    layout.boxes = vec![
        LayoutBox::new(0.0, 0.0).with_component(
            Component::new(ComponentKind::Text).with_prop("content", "Welcome"),
        ),
        LayoutBox::new(0.0, 120.0)
            .with_grid(60.0, 2)
            .with_component(Component::new(ComponentKind::Date).with_prop("placeholder", "Day"))
            .with_component(Component::new(ComponentKind::Button).with_prop("text", "Book")),
    ];
    layout
}

/// Creates a layout containing a component kind the generator doesn't know.
pub fn layout_with_unknown_kind(owner: &str) -> Layout {
    let mut layout = Layout::new(owner, "Legacy Page").unwrap();
    layout.boxes = vec![LayoutBox::new(0.0, 0.0)
        .with_component(Component::new(ComponentKind::from("carousel")))
        .with_component(Component::new(ComponentKind::Card).with_prop("title", "Still here"))];
    layout
}

/// Writes a layout as pretty JSON and returns the path.
pub fn write_layout_file(dir: &Path, file_name: &str, layout: &Layout) -> PathBuf {
    let path = dir.join(file_name);
    fs::write(&path, serde_json::to_string_pretty(layout).unwrap()).unwrap();
    path
}

/// Creates a small catalog template.
pub fn template(id: i64, name: &str, category: &str) -> Template {
    Template {
        id,
        name: name.to_string(),
        description: format!("{name} description"),
        thumbnail: format!("/thumbnails/{id}.png"),
        category: category.to_string(),
        keywords: Vec::new(),
        layout: LayoutContent {
            boxes: vec![LayoutBox::new(0.0, 0.0)
                .with_component(Component::new(ComponentKind::Text).with_prop("content", name))],
        },
    }
}

/// Writes a template catalog file and returns the path.
pub fn write_catalog_file(dir: &Path, templates: &[Template]) -> PathBuf {
    let path = dir.join("catalog.json");
    let catalog = json!({ "version": "1.0", "templates": templates });
    fs::write(&path, serde_json::to_string_pretty(&catalog).unwrap()).unwrap();
    path
}

/// Writes a keyword mapping file and returns the path.
///
/// Each entry is `(category, keywords, template_ids)`.
pub fn write_mappings_file(dir: &Path, mappings: &[(&str, &[&str], &[i64])]) -> PathBuf {
    let path = dir.join("mappings.json");
    let mappings: Vec<_> = mappings
        .iter()
        .map(|(category, keywords, ids)| {
            json!({ "category": category, "keywords": keywords, "templateIds": ids })
        })
        .collect();
    let file = json!({ "version": "1.0", "mappings": mappings });
    fs::write(&path, serde_json::to_string_pretty(&file).unwrap()).unwrap();
    path
}

/// Builds a `pagesmith` command whose config directory is `home`.
///
/// Keeps CLI tests independent of the developer's real config.toml.
pub fn pagesmith(home: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_pagesmith"));
    command
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG");
    command
}
