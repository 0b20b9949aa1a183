//! Canvas components and their type tags.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Type tag of a canvas component.
///
/// Tags outside the known set are kept verbatim in [`ComponentKind::Unknown`]
/// so that layouts saved by an older or newer editor still load and export.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentKind {
    /// Clickable button
    Button,
    /// Plain text block
    Text,
    /// Radio group
    Radio,
    /// Single checkbox
    Checkbox,
    /// Image
    Image,
    /// Single date picker
    Date,
    /// Date range picker
    DateRange,
    /// Data table
    Table,
    /// Card with title and body
    Card,
    /// Unrecognized tag, preserved as stored
    Unknown(String),
}

impl ComponentKind {
    /// All recognized kinds, in palette order.
    pub const KNOWN: [ComponentKind; 9] = [
        ComponentKind::Button,
        ComponentKind::Text,
        ComponentKind::Radio,
        ComponentKind::Checkbox,
        ComponentKind::Image,
        ComponentKind::Date,
        ComponentKind::DateRange,
        ComponentKind::Table,
        ComponentKind::Card,
    ];

    /// Returns the tag used in stored layouts and API payloads.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            ComponentKind::Button => "button",
            ComponentKind::Text => "text",
            ComponentKind::Radio => "radio",
            ComponentKind::Checkbox => "checkbox",
            ComponentKind::Image => "image",
            ComponentKind::Date => "date",
            ComponentKind::DateRange => "dateRange",
            ComponentKind::Table => "table",
            ComponentKind::Card => "card",
            ComponentKind::Unknown(tag) => tag,
        }
    }

    /// Returns true for tags outside the known set.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, ComponentKind::Unknown(_))
    }
}

impl From<String> for ComponentKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "button" => ComponentKind::Button,
            "text" => ComponentKind::Text,
            "radio" => ComponentKind::Radio,
            "checkbox" => ComponentKind::Checkbox,
            "image" => ComponentKind::Image,
            "date" => ComponentKind::Date,
            "dateRange" => ComponentKind::DateRange,
            "table" => ComponentKind::Table,
            "card" => ComponentKind::Card,
            _ => ComponentKind::Unknown(tag),
        }
    }
}

impl From<&str> for ComponentKind {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<ComponentKind> for String {
    fn from(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Unknown(tag) => tag,
            known => known.tag().to_string(),
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A typed UI element placed inside a box.
///
/// The shape of `props` depends on the kind: `text` for buttons and text
/// blocks, `src`/`alt` for images, `columns`/`rows` for tables, and so on.
/// Unexpected or missing properties are tolerated everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Component identifier, unique within its layout
    #[serde(default = "new_component_id")]
    pub id: String,
    /// Type tag
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    /// Width in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Height in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Kind-specific property bag
    #[serde(default)]
    pub props: Map<String, Value>,
}

fn new_component_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl Component {
    /// Creates a component of the given kind with an empty property bag.
    pub fn new(kind: impl Into<ComponentKind>) -> Self {
        Self {
            id: new_component_id(),
            kind: kind.into(),
            width: None,
            height: None,
            props: Map::new(),
        }
    }

    /// Sets a property, returning the component for chaining.
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Sets the pixel size, returning the component for chaining.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Returns a string property, if present and a string.
    #[must_use]
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }
}
