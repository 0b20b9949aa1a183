//! Per-kind component templates.
//!
//! Every recognized [`ComponentKind`] maps to exactly one import line and one
//! JSX template. String slots are emitted as JSON string literals inside JSX
//! expressions, so stored text can never break the generated markup.

use crate::models::{Component, ComponentKind};
use serde_json::{json, Map, Value};
use tracing::warn;

/// Import line a component kind needs, or `None` for unknown kinds.
#[must_use]
pub fn required_import(kind: &ComponentKind) -> Option<&'static str> {
    match kind {
        ComponentKind::Button => Some("import { Button } from 'antd';"),
        ComponentKind::Text => Some("import { Typography } from 'antd';"),
        ComponentKind::Radio => Some("import { Radio } from 'antd';"),
        ComponentKind::Checkbox => Some("import { Checkbox } from 'antd';"),
        ComponentKind::Image => Some("import { Image } from 'antd';"),
        ComponentKind::Date | ComponentKind::DateRange => {
            Some("import { DatePicker } from 'antd';")
        }
        ComponentKind::Table => Some("import { Table } from 'antd';"),
        ComponentKind::Card => Some("import { Card } from 'antd';"),
        ComponentKind::Unknown(_) => None,
    }
}

/// Renders one component as a single line of JSX.
#[must_use]
pub fn render_component(component: &Component) -> String {
    let style = style_attr(component);

    match &component.kind {
        ComponentKind::Button => {
            let text = component.prop_str("text").unwrap_or("Button");
            let button_type = component.prop_str("buttonType").unwrap_or("primary");
            format!(
                "<Button type={{{}}}{style}>{{{}}}</Button>",
                js_string(button_type),
                js_string(text)
            )
        }
        ComponentKind::Text => {
            let content = component
                .prop_str("content")
                .or_else(|| component.prop_str("text"))
                .unwrap_or_default();
            format!(
                "<Typography.Text{style}>{{{}}}</Typography.Text>",
                js_string(content)
            )
        }
        ComponentKind::Radio => {
            let options = array_prop(component, "options");
            format!("<Radio.Group options={{{options}}}{style} />")
        }
        ComponentKind::Checkbox => {
            let label = component
                .prop_str("label")
                .or_else(|| component.prop_str("text"))
                .unwrap_or_default();
            format!("<Checkbox{style}>{{{}}}</Checkbox>", js_string(label))
        }
        ComponentKind::Image => {
            let src = component.prop_str("src").unwrap_or_default();
            let alt = component.prop_str("alt").unwrap_or_default();
            format!(
                "<Image src={{{}}} alt={{{}}}{style} />",
                js_string(src),
                js_string(alt)
            )
        }
        ComponentKind::Date => {
            let placeholder = component.prop_str("placeholder").unwrap_or("Select date");
            format!(
                "<DatePicker placeholder={{{}}}{style} />",
                js_string(placeholder)
            )
        }
        ComponentKind::DateRange => format!("<DatePicker.RangePicker{style} />"),
        ComponentKind::Table => {
            let columns = table_columns(component);
            let rows = table_rows(component);
            format!("<Table columns={{{columns}}} dataSource={{{rows}}} pagination={{false}}{style} />")
        }
        ComponentKind::Card => {
            let title = component.prop_str("title").unwrap_or_default();
            let content = component.prop_str("content").unwrap_or_default();
            format!(
                "<Card title={{{}}}{style}>{{{}}}</Card>",
                js_string(title),
                js_string(content)
            )
        }
        ComponentKind::Unknown(tag) => {
            warn!(component = %component.id, kind = %tag, "unknown component type, emitting placeholder");
            format!(
                "{{/* Unknown component type: {} */}}",
                tag.replace("*/", "* /")
            )
        }
    }
}

/// Encodes text as a JavaScript string literal.
pub(crate) fn js_string(text: &str) -> String {
    Value::from(text).to_string()
}

/// Formats a number as a JavaScript literal; non-finite values become 0.
pub(crate) fn js_number(value: f64) -> String {
    if value.is_finite() {
        format!("{value}")
    } else {
        "0".to_string()
    }
}

/// Builds ` style={{...}}` from `props.style` plus the component's pixel size.
fn style_attr(component: &Component) -> String {
    let mut style = match component.props.get("style") {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };

    if let Some(width) = component.width.filter(|w| w.is_finite()) {
        style.insert("width".to_string(), json!(width));
    }
    if let Some(height) = component.height.filter(|h| h.is_finite()) {
        style.insert("height".to_string(), json!(height));
    }

    if style.is_empty() {
        String::new()
    } else {
        format!(" style={{{}}}", Value::Object(style))
    }
}

fn array_prop(component: &Component, key: &str) -> String {
    match component.props.get(key) {
        Some(value @ Value::Array(_)) => value.to_string(),
        _ => "[]".to_string(),
    }
}

/// Table columns; bare strings expand to `{ title, dataIndex, key }`.
fn table_columns(component: &Component) -> String {
    let Some(Value::Array(columns)) = component.props.get("columns") else {
        return "[]".to_string();
    };

    let columns: Vec<Value> = columns
        .iter()
        .map(|column| match column {
            Value::String(name) => json!({ "title": name, "dataIndex": name, "key": name }),
            other => other.clone(),
        })
        .collect();

    Value::Array(columns).to_string()
}

/// Table rows from `rows` (or `dataSource`); object rows get a `key` if missing.
fn table_rows(component: &Component) -> String {
    let rows = component
        .props
        .get("rows")
        .or_else(|| component.props.get("dataSource"));
    let Some(Value::Array(rows)) = rows else {
        return "[]".to_string();
    };

    let rows: Vec<Value> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| match row {
            Value::Object(fields) if !fields.contains_key("key") => {
                let mut fields = fields.clone();
                fields.insert("key".to_string(), json!(idx.to_string()));
                Value::Object(fields)
            }
            other => other.clone(),
        })
        .collect();

    Value::Array(rows).to_string()
}
