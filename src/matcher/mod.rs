//! Keyword matching and ranking for template search.
//!
//! A search query is scored against a static table of
//! category → keywords → template IDs mappings. The table is embedded in the
//! binary (`keyword_mappings.json`) and can be replaced by a JSON file named in
//! the configuration. The matcher never touches storage: it returns ranked
//! template IDs, and [`order_by_rank`] restores that order on whatever records
//! the catalog fetched for them.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// Score added when a token equals a keyword.
pub const EXACT_WEIGHT: u32 = 3;
/// Score added when a token and a keyword contain one another.
pub const PARTIAL_WEIGHT: u32 = 2;
/// Score added by the whole-query fallback when no token survives.
pub const FALLBACK_WEIGHT: u32 = 1;

/// `matchType` reported for keyword search results.
pub const KEYWORD_MATCH_TYPE: &str = "keyword";

/// Message shown when a search finds nothing.
pub const NO_MATCH_MESSAGE: &str = "抱歉，暂无相关模板";

/// Message shown when a search returns `count` templates.
#[must_use]
pub fn found_message(count: usize) -> String {
    format!("找到 {count} 个相关模板")
}

/// Whitespace plus ASCII and full-width list separators.
static TOKEN_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,，、;；]+").expect("separator pattern is valid"));

/// Association between a category, its keywords and the templates it boosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordMapping {
    /// Category name reported back in `matchedCategories`
    pub category: String,
    /// Keywords, lower-cased at load
    pub keywords: Vec<String>,
    /// Template IDs boosted when a keyword matches
    pub template_ids: Vec<i64>,
}

/// Mapping file schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MappingFile {
    version: String,
    mappings: Vec<KeywordMapping>,
}

/// Immutable, validated keyword table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    mappings: Vec<KeywordMapping>,
}

impl KeywordTable {
    /// Builds a table from mappings, normalizing keywords to lower case.
    ///
    /// # Errors
    ///
    /// Returns an error if a mapping has an empty category, no keywords, or a
    /// blank keyword.
    pub fn new(mappings: Vec<KeywordMapping>) -> Result<Self> {
        let mut normalized = Vec::with_capacity(mappings.len());

        for mut mapping in mappings {
            if mapping.category.trim().is_empty() {
                anyhow::bail!("Keyword mapping has an empty category");
            }
            if mapping.keywords.is_empty() {
                anyhow::bail!("Keyword mapping '{}' has no keywords", mapping.category);
            }

            for keyword in &mut mapping.keywords {
                *keyword = keyword.trim().to_lowercase();
                if keyword.is_empty() {
                    anyhow::bail!(
                        "Keyword mapping '{}' contains a blank keyword",
                        mapping.category
                    );
                }
            }

            normalized.push(mapping);
        }

        Ok(Self {
            mappings: normalized,
        })
    }

    /// Loads the table embedded in the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json(include_str!("keyword_mappings.json"))
            .context("Failed to parse embedded keyword_mappings.json")
    }

    /// Parses a mapping file.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: MappingFile =
            serde_json::from_str(json).context("Invalid keyword mapping JSON")?;
        Self::new(file.mappings)
    }

    /// Loads a mapping file from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read keyword mappings: {}", path.display()))?;
        Self::from_json(&json)
            .with_context(|| format!("Failed to load keyword mappings: {}", path.display()))
    }

    /// Loads `path` when given, otherwise the embedded table.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::builtin(),
        }
    }

    /// All mappings in table order.
    #[must_use]
    pub fn mappings(&self) -> &[KeywordMapping] {
        &self.mappings
    }

    /// Number of mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Returns true if the table has no mappings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Tunables for a matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Maximum number of template IDs returned
    pub max_results: usize,
    /// Tokens shorter than this many characters are discarded
    pub min_token_chars: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            max_results: 5,
            min_token_chars: 2,
        }
    }
}

/// Ranked result of a successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedMatch {
    /// Template IDs, best first
    pub template_ids: Vec<i64>,
    /// Categories that contributed, in discovery order
    pub matched_categories: Vec<String>,
}

/// Outcome of matching a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// At least one template scored
    Matched(RankedMatch),
    /// Nothing relevant; reported as such, never padded with unrelated templates
    NoMatch,
}

impl MatchOutcome {
    /// Ranked template IDs (empty for `NoMatch`).
    #[must_use]
    pub fn template_ids(&self) -> &[i64] {
        match self {
            MatchOutcome::Matched(m) => &m.template_ids,
            MatchOutcome::NoMatch => &[],
        }
    }

    /// Matched categories (empty for `NoMatch`).
    #[must_use]
    pub fn matched_categories(&self) -> &[String] {
        match self {
            MatchOutcome::Matched(m) => &m.matched_categories,
            MatchOutcome::NoMatch => &[],
        }
    }
}

/// Per-query score accumulator that remembers first-insertion order.
#[derive(Debug, Default)]
struct ScoreTable {
    entries: Vec<(i64, u32)>,
    index: HashMap<i64, usize>,
}

impl ScoreTable {
    fn add(&mut self, template_id: i64, weight: u32) {
        match self.index.get(&template_id) {
            Some(&idx) => self.entries[idx].1 += weight,
            None => {
                self.index.insert(template_id, self.entries.len());
                self.entries.push((template_id, weight));
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// IDs by descending score; `sort_by` is stable, so ties keep insertion order.
    fn into_ranked(mut self, limit: usize) -> Vec<i64> {
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self.entries
            .into_iter()
            .take(limit)
            .map(|(id, _)| id)
            .collect()
    }
}

/// Normalized form of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    /// Trimmed, lower-cased query
    pub whole: String,
    /// Tokens long enough to carry signal
    pub tokens: Vec<String>,
}

/// Scores queries against a keyword table.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    table: KeywordTable,
    options: MatchOptions,
}

impl KeywordMatcher {
    /// Creates a matcher over `table`.
    #[must_use]
    pub fn new(table: KeywordTable, options: MatchOptions) -> Self {
        Self { table, options }
    }

    /// The table this matcher scores against.
    #[must_use]
    pub fn table(&self) -> &KeywordTable {
        &self.table
    }

    /// The options this matcher was built with.
    #[must_use]
    pub const fn options(&self) -> MatchOptions {
        self.options
    }

    /// Trims, lower-cases and tokenizes a query.
    #[must_use]
    pub fn normalize(&self, query: &str) -> NormalizedQuery {
        let whole = query.trim().to_lowercase();
        let tokens = TOKEN_SEPARATORS
            .split(&whole)
            .filter(|t| t.chars().count() >= self.options.min_token_chars)
            .map(str::to_string)
            .collect();

        NormalizedQuery { whole, tokens }
    }

    /// Scores `query` and returns the top template IDs.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagesmith::matcher::{KeywordMatcher, KeywordTable, MatchOptions};
    ///
    /// let matcher = KeywordMatcher::new(KeywordTable::builtin().unwrap(), MatchOptions::default());
    /// let outcome = matcher.rank("博客");
    /// assert_eq!(outcome.template_ids(), &[6, 9]);
    /// ```
    #[must_use]
    pub fn rank(&self, query: &str) -> MatchOutcome {
        let normalized = self.normalize(query);
        if normalized.whole.is_empty() {
            return MatchOutcome::NoMatch;
        }

        let mut scores = ScoreTable::default();
        let mut categories: Vec<String> = Vec::new();

        let mut record = |mapping: &KeywordMapping, weight: u32| {
            for &id in &mapping.template_ids {
                scores.add(id, weight);
            }
            if !categories.contains(&mapping.category) {
                categories.push(mapping.category.clone());
            }
        };

        if normalized.tokens.is_empty() {
            for mapping in self.table.mappings() {
                for keyword in &mapping.keywords {
                    if normalized.whole.contains(keyword.as_str()) {
                        record(mapping, FALLBACK_WEIGHT);
                    }
                }
            }
        } else {
            for token in &normalized.tokens {
                for mapping in self.table.mappings() {
                    for keyword in &mapping.keywords {
                        if token == keyword {
                            record(mapping, EXACT_WEIGHT);
                        } else if keyword.contains(token.as_str())
                            || token.contains(keyword.as_str())
                        {
                            record(mapping, PARTIAL_WEIGHT);
                        }
                    }
                }
            }
        }

        if scores.is_empty() {
            debug!(query = %normalized.whole, "no keyword matched");
            return MatchOutcome::NoMatch;
        }

        debug!(
            query = %normalized.whole,
            tokens = ?normalized.tokens,
            scores = ?scores.entries,
            "ranked templates"
        );

        MatchOutcome::Matched(RankedMatch {
            template_ids: scores.into_ranked(self.options.max_results),
            matched_categories: categories,
        })
    }
}

/// Re-sorts fetched records into the ranked ID order.
///
/// Records whose ID is not in `ranked_ids` are dropped; IDs with no record are
/// skipped.
pub fn order_by_rank<T, F>(records: Vec<T>, ranked_ids: &[i64], id_of: F) -> Vec<T>
where
    F: Fn(&T) -> i64,
{
    let mut by_id: HashMap<i64, T> = records.into_iter().map(|r| (id_of(&r), r)).collect();
    ranked_ids.iter().filter_map(|id| by_id.remove(id)).collect()
}
