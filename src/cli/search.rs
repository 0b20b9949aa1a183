//! Match command for keyword template search.

use crate::cli::common::{load_config, print_json, CliError, CliResult};
use crate::matcher::{
    found_message, order_by_rank, KeywordMatcher, KeywordTable, MatchOutcome, KEYWORD_MATCH_TYPE,
    NO_MATCH_MESSAGE,
};
use crate::models::TemplateSummary;
use crate::services::{TemplateCatalog, TemplateSource};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Search the template catalog by keywords
#[derive(Debug, Clone, Args)]
pub struct MatchArgs {
    /// Search query (e.g. "电商 博客")
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Keyword mapping JSON file (overrides config)
    #[arg(long, value_name = "FILE")]
    pub mappings: Option<PathBuf>,

    /// Template catalog JSON file (overrides config)
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Maximum number of templates to return (overrides config)
    #[arg(long, value_name = "N")]
    pub max_results: Option<usize>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Match result for JSON output
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutput {
    /// Matching templates in rank order
    pub templates: Vec<TemplateSummary>,
    /// Human-readable summary
    pub message: String,
    /// How the templates were found (absent when nothing matched)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_type: Option<String>,
    /// Categories that contributed to the match
    pub matched_categories: Vec<String>,
}

impl MatchOutput {
    fn empty() -> Self {
        Self {
            templates: Vec::new(),
            message: NO_MATCH_MESSAGE.to_string(),
            match_type: None,
            matched_categories: Vec::new(),
        }
    }
}

impl MatchArgs {
    /// Execute the match command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config();

        let mut options = config.match_options();
        if let Some(max_results) = self.max_results {
            if max_results == 0 {
                return Err(CliError::validation("--max-results must be at least 1"));
            }
            options.max_results = max_results;
        }

        let mappings = self
            .mappings
            .as_deref()
            .or(config.paths.keyword_mappings.as_deref());
        let table = KeywordTable::load(mappings)
            .map_err(|e| CliError::io(format!("Failed to load keyword mappings: {e:#}")))?;

        let catalog_path = self
            .catalog
            .as_deref()
            .or(config.paths.template_catalog.as_deref());
        let catalog = TemplateCatalog::load(catalog_path)
            .map_err(|e| CliError::io(format!("Failed to load template catalog: {e:#}")))?;

        let matcher = KeywordMatcher::new(table, options);
        let output = search(&matcher, &catalog, &self.query)?;

        if self.json {
            return print_json(&output);
        }

        println!("{}", output.message);
        for template in &output.templates {
            println!("  [{}] {} ({})", template.id, template.name, template.category);
        }
        if !output.matched_categories.is_empty() {
            println!();
            println!("Matched categories: {}", output.matched_categories.join(", "));
        }

        Ok(())
    }
}

/// Ranks `query`, fetches the ranked templates and restores rank order.
fn search(
    matcher: &KeywordMatcher,
    source: &dyn TemplateSource,
    query: &str,
) -> CliResult<MatchOutput> {
    let ranked = match matcher.rank(query) {
        MatchOutcome::Matched(ranked) => ranked,
        MatchOutcome::NoMatch => return Ok(MatchOutput::empty()),
    };

    let fetched = source
        .fetch_by_ids(&ranked.template_ids)
        .map_err(|e| CliError::io(format!("Failed to fetch templates: {e:#}")))?;
    if fetched.is_empty() {
        return Ok(MatchOutput::empty());
    }

    let templates: Vec<TemplateSummary> = order_by_rank(fetched, &ranked.template_ids, |t| t.id)
        .iter()
        .map(TemplateSummary::from)
        .collect();

    Ok(MatchOutput {
        message: found_message(templates.len()),
        templates,
        match_type: Some(KEYWORD_MATCH_TYPE.to_string()),
        matched_categories: ranked.matched_categories,
    })
}
