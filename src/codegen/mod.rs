//! Page source generation from layouts.
//!
//! Turns a layout's box/component tree into a self-contained React page
//! component built on antd. Generation is total: empty layouts, empty boxes
//! and unrecognized component kinds all produce valid output.

pub mod components;

use crate::models::{Layout, LayoutBox, LayoutContent};
use components::{js_number, render_component, required_import};
use std::collections::BTreeSet;
use std::fmt::Write as _;

/// Framework import present in every generated page.
pub const REACT_IMPORT: &str = "import React from 'react';";
/// Layout-container import present in every generated page.
pub const LAYOUT_IMPORT: &str = "import { Layout } from 'antd';";
/// Component name used when a layout name has no ASCII alphanumerics.
pub const DEFAULT_COMPONENT_NAME: &str = "GeneratedPage";

/// Generates page source for a saved layout.
///
/// # Examples
///
/// ```
/// use pagesmith::codegen::generate_page;
/// use pagesmith::models::Layout;
///
/// let layout = Layout::new("user-1", "My Résumé #1").unwrap();
/// let source = generate_page(&layout);
/// assert!(source.contains("const MyRsum1 = () => {"));
/// assert!(source.ends_with("export default MyRsum1;\n"));
/// ```
#[must_use]
pub fn generate_page(layout: &Layout) -> String {
    render_page(&layout.name, &layout.boxes)
}

/// Generates page source for template content under a display name.
#[must_use]
pub fn generate_content(name: &str, content: &LayoutContent) -> String {
    render_page(name, &content.boxes)
}

/// Derives the component identifier from a display name.
///
/// Every character that is not an ASCII letter or digit is removed. A name
/// left empty becomes [`DEFAULT_COMPONENT_NAME`]; a name starting with a
/// digit is prefixed with `Page` so it stays a valid identifier.
#[must_use]
pub fn component_name(display_name: &str) -> String {
    let stripped: String = display_name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();

    if stripped.is_empty() {
        DEFAULT_COMPONENT_NAME.to_string()
    } else if stripped.starts_with(|c: char| c.is_ascii_digit()) {
        format!("Page{stripped}")
    } else {
        stripped
    }
}

/// File name offered when downloading generated source.
#[must_use]
pub fn export_filename(display_name: &str) -> String {
    format!("{}.jsx", component_name(display_name))
}

/// Import lines needed by a set of boxes, base imports included.
#[must_use]
pub fn collect_imports(boxes: &[LayoutBox]) -> BTreeSet<&'static str> {
    let mut imports = BTreeSet::from([REACT_IMPORT, LAYOUT_IMPORT]);
    imports.extend(
        boxes
            .iter()
            .flat_map(|b| b.components.iter())
            .filter_map(|c| required_import(&c.kind)),
    );
    imports
}

fn render_page(display_name: &str, boxes: &[LayoutBox]) -> String {
    let name = component_name(display_name);
    let mut output = String::new();

    for import in collect_imports(boxes) {
        let _ = writeln!(output, "{import}");
    }
    output.push('\n');

    let _ = writeln!(output, "const {name} = () => {{");
    output.push_str("  return (\n");
    output.push_str("    <Layout style={{ minHeight: '100vh' }}>\n");
    output.push_str("      <Layout.Content style={{ position: 'relative' }}>\n");

    for layout_box in boxes {
        render_box(&mut output, layout_box);
    }

    output.push_str("      </Layout.Content>\n");
    output.push_str("    </Layout>\n");
    output.push_str("  );\n");
    output.push_str("};\n");
    output.push('\n');
    let _ = writeln!(output, "export default {name};");

    output
}

fn render_box(output: &mut String, layout_box: &LayoutBox) {
    let _ = writeln!(
        output,
        "        <div style={{{{ position: 'absolute', left: {}, top: {}, width: '{}%', \
         display: 'grid', gridTemplateColumns: 'repeat({}, 1fr)', gap: 8 }}}}>",
        js_number(layout_box.x),
        js_number(layout_box.y),
        js_number(layout_box.width),
        layout_box.effective_columns()
    );

    for component in &layout_box.components {
        let _ = writeln!(output, "          {}", render_component(component));
    }

    output.push_str("        </div>\n");
}
