//! CLI command handlers for Pagesmith.
//!
//! This module provides headless, scriptable access to template search,
//! the template catalog and page source generation.

pub mod common;
pub mod generate;
pub mod search;
pub mod template;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode};
pub use generate::GenerateArgs;
pub use search::MatchArgs;
pub use template::TemplateArgs;
