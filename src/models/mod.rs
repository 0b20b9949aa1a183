//! Data models for layouts, components and marketplace templates.
//!
//! This module contains the core data structures used throughout the application.
//! Models are designed to be independent of storage and HTTP concerns.

pub mod component;
pub mod layout;
pub mod template;

// Re-export all model types
pub use component::{Component, ComponentKind};
pub use layout::{Layout, LayoutBox, LayoutContent};
pub use template::{Template, TemplateSummary};
