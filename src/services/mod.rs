//! Service layer for business logic.
//!
//! This module contains services that encapsulate storage and catalog access
//! and coordinate between the HTTP API, the CLI and the core models.

pub mod layouts;
pub mod templates;

// Re-export commonly used types
pub use layouts::{LayoutService, StoreError, StoreResult};
pub use templates::{TemplateCatalog, TemplateSource};
