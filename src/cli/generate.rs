//! Generate command for page source.

use crate::cli::common::{load_config, CliError, CliResult};
use crate::codegen;
use crate::services::{LayoutService, TemplateCatalog, TemplateSource};
use clap::Args;
use std::path::PathBuf;

/// Generate React page source from a saved layout or a catalog template
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Path to layout JSON file
    #[arg(
        short,
        long,
        value_name = "FILE",
        required_unless_present = "template",
        conflicts_with = "template"
    )]
    pub layout: Option<PathBuf>,

    /// Catalog template ID to generate instead of a layout file
    #[arg(short, long, value_name = "ID")]
    pub template: Option<i64>,

    /// Template catalog JSON file (overrides config)
    #[arg(long, value_name = "FILE", requires = "template")]
    pub catalog: Option<PathBuf>,

    /// Output file (prints to stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

impl GenerateArgs {
    /// Execute the generate command
    pub fn execute(&self) -> CliResult<()> {
        let (name, source) = match (&self.layout, self.template) {
            (Some(path), _) => {
                let layout = LayoutService::read_file(path)
                    .map_err(|e| CliError::io(format!("Failed to load layout: {e:#}")))?;
                layout
                    .validate()
                    .map_err(|e| CliError::validation(format!("Invalid layout: {e}")))?;
                (layout.name.clone(), codegen::generate_page(&layout))
            }
            (None, Some(id)) => {
                let config = load_config();
                let catalog_path = self
                    .catalog
                    .as_deref()
                    .or(config.paths.template_catalog.as_deref());
                let catalog = TemplateCatalog::load(catalog_path)
                    .map_err(|e| CliError::io(format!("Failed to load template catalog: {e:#}")))?;

                let template = catalog
                    .get(id)
                    .map_err(|e| CliError::io(format!("Failed to load template: {e:#}")))?
                    .ok_or_else(|| CliError::validation(format!("Template {id} not found")))?;

                let source = codegen::generate_content(&template.name, &template.layout);
                (template.name, source)
            }
            (None, None) => {
                return Err(CliError::validation(
                    "Either --layout or --template must be given",
                ))
            }
        };

        match &self.out {
            Some(out) => {
                if let Some(dir) = out.parent().filter(|d| !d.as_os_str().is_empty()) {
                    std::fs::create_dir_all(dir).map_err(|e| {
                        CliError::io(format!("Failed to create output directory: {e}"))
                    })?;
                }
                std::fs::write(out, &source)
                    .map_err(|e| CliError::io(format!("Failed to write {}: {e}", out.display())))?;

                println!("✓ Generated {}", codegen::export_filename(&name));
                println!("  Output: {}", out.display());
            }
            None => print!("{source}"),
        }

        Ok(())
    }
}
