//! Template catalog commands.

use crate::cli::common::{load_config, print_json, CliError, CliResult};
use crate::models::TemplateSummary;
use crate::services::{TemplateCatalog, TemplateSource};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

/// Browse the template catalog
#[derive(Debug, Clone, Args)]
pub struct TemplateArgs {
    /// Template subcommand
    #[command(subcommand)]
    pub command: TemplateCommand,
}

/// Template subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum TemplateCommand {
    /// List catalog templates
    List(ListArgs),
    /// Show one template with its layout content
    Show(ShowArgs),
}

/// List catalog templates
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Template catalog JSON file (overrides config)
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Only list templates in this category
    #[arg(long, value_name = "CATEGORY")]
    pub category: Option<String>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Show one template
#[derive(Debug, Clone, Args)]
pub struct ShowArgs {
    /// Template ID
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Template catalog JSON file (overrides config)
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,
}

/// Template list response
#[derive(Debug, Clone, Serialize)]
pub struct TemplateListResponse {
    /// List of templates
    pub templates: Vec<TemplateSummary>,
    /// Total number of templates
    pub count: usize,
}

impl TemplateArgs {
    /// Execute the template command
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            TemplateCommand::List(args) => args.execute(),
            TemplateCommand::Show(args) => args.execute(),
        }
    }
}

fn load_catalog(path: Option<&PathBuf>) -> CliResult<TemplateCatalog> {
    let config = load_config();
    let path = path
        .map(PathBuf::as_path)
        .or(config.paths.template_catalog.as_deref());

    TemplateCatalog::load(path)
        .map_err(|e| CliError::io(format!("Failed to load template catalog: {e:#}")))
}

impl ListArgs {
    /// Execute the list command
    pub fn execute(&self) -> CliResult<()> {
        let catalog = load_catalog(self.catalog.as_ref())?;

        let templates: Vec<TemplateSummary> = match &self.category {
            Some(category) => catalog
                .by_category(category)
                .into_iter()
                .map(TemplateSummary::from)
                .collect(),
            None => catalog
                .list()
                .map_err(|e| CliError::io(format!("Failed to list templates: {e:#}")))?
                .iter()
                .map(TemplateSummary::from)
                .collect(),
        };

        if self.json {
            let count = templates.len();
            return print_json(&TemplateListResponse { templates, count });
        }

        if templates.is_empty() {
            println!("No templates found.");
            return Ok(());
        }

        println!("Templates ({}):", templates.len());
        for template in &templates {
            println!("  [{}] {} ({})", template.id, template.name, template.category);
            if !template.description.is_empty() {
                println!("      {}", template.description);
            }
        }

        Ok(())
    }
}

impl ShowArgs {
    /// Execute the show command
    pub fn execute(&self) -> CliResult<()> {
        let catalog = load_catalog(self.catalog.as_ref())?;

        let template = catalog
            .get(self.id)
            .map_err(|e| CliError::io(format!("Failed to load template: {e:#}")))?
            .ok_or_else(|| CliError::validation(format!("Template {} not found", self.id)))?;

        print_json(&template)
    }
}
