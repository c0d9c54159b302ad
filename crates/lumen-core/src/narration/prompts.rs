//! Prompt Library for narration requests
//!
//! Prompts are loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/lumen/prompts/overrides/)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Each prompt is markdown with YAML frontmatter and `# System` / `# User`
//! sections. `{{var}}` placeholders are substituted at render time and
//! `{{#if var}}...{{/if}}` blocks are dropped when `var` is empty.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Embedded default prompts (compiled into binary)
mod defaults {
    pub const BUSINESS_ANALYSIS: &str = include_str!("../../../../prompts/business_analysis.md");
    pub const PREDICTIVE_INSIGHTS: &str =
        include_str!("../../../../prompts/predictive_insights.md");
    pub const INDUSTRY_BENCHMARK: &str = include_str!("../../../../prompts/industry_benchmark.md");
}

/// Known prompt IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptId {
    /// Executive narration of the question's context
    #[default]
    BusinessAnalysis,
    /// Three-month outlook, risks and KPIs
    PredictiveInsights,
    /// Comparison against industry averages
    IndustryBenchmark,
}

impl PromptId {
    /// Get the string identifier for this prompt
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BusinessAnalysis => "business_analysis",
            Self::PredictiveInsights => "predictive_insights",
            Self::IndustryBenchmark => "industry_benchmark",
        }
    }

    /// Get all known prompt IDs
    pub fn all() -> &'static [PromptId] {
        &[
            Self::BusinessAnalysis,
            Self::PredictiveInsights,
            Self::IndustryBenchmark,
        ]
    }

    fn default_content(&self) -> &'static str {
        match self {
            Self::BusinessAnalysis => defaults::BUSINESS_ANALYSIS,
            Self::PredictiveInsights => defaults::PREDICTIVE_INSIGHTS,
            Self::IndustryBenchmark => defaults::INDUSTRY_BENCHMARK,
        }
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PromptId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "business_analysis" | "analysis" => Ok(Self::BusinessAnalysis),
            "predictive_insights" | "predictive" => Ok(Self::PredictiveInsights),
            "industry_benchmark" | "benchmark" => Ok(Self::IndustryBenchmark),
            other => Err(Error::NotFound(format!("Unknown prompt '{}'", other))),
        }
    }
}

/// Prompt frontmatter metadata
#[derive(Debug, Clone, Deserialize)]
pub struct PromptMetadata {
    pub id: String,
    /// Bumped whenever the wording changes
    pub version: u32,
    #[serde(default)]
    pub description: String,
}

/// A loaded prompt with metadata and content
#[derive(Debug, Clone)]
pub struct Prompt {
    pub metadata: PromptMetadata,
    /// System and user sections
    pub content: String,
    pub is_override: bool,
    pub override_path: Option<PathBuf>,
}

impl Prompt {
    pub fn system_section(&self) -> Option<&str> {
        extract_section(&self.content, "# System")
    }

    pub fn user_section(&self) -> Option<&str> {
        extract_section(&self.content, "# User")
    }

    /// Render the user section (or the whole body if it has none)
    pub fn render_user(&self, vars: &HashMap<&str, &str>) -> String {
        let template = self.user_section().unwrap_or(&self.content);
        render_template(template, vars)
    }

    /// Render the system section, empty if absent
    pub fn render_system(&self, vars: &HashMap<&str, &str>) -> String {
        self.system_section()
            .map(|s| render_template(s, vars))
            .unwrap_or_default()
    }
}

/// Prompt library for loading and caching prompts
pub struct PromptLibrary {
    override_dir: Option<PathBuf>,
    cache: HashMap<PromptId, Prompt>,
}

impl PromptLibrary {
    /// Create a prompt library with the default override directory
    pub fn new() -> Self {
        Self {
            override_dir: default_prompts_dir(),
            cache: HashMap::new(),
        }
    }

    /// Create a prompt library with a custom override directory
    pub fn with_override_dir(path: PathBuf) -> Self {
        Self {
            override_dir: Some(path),
            cache: HashMap::new(),
        }
    }

    /// Create a prompt library with no override directory (embedded only)
    pub fn embedded_only() -> Self {
        Self {
            override_dir: None,
            cache: HashMap::new(),
        }
    }

    /// Get a prompt by ID, loading from override or default
    pub fn get(&mut self, id: PromptId) -> Result<&Prompt> {
        if !self.cache.contains_key(&id) {
            let prompt = self.load(id)?;
            self.cache.insert(id, prompt);
        }
        self.cache
            .get(&id)
            .ok_or_else(|| Error::NotFound(format!("Prompt {} not cached", id)))
    }

    fn load(&self, id: PromptId) -> Result<Prompt> {
        if let Some(override_path) = self.override_path(id) {
            if override_path.exists() {
                let content = fs::read_to_string(&override_path).map_err(|e| {
                    Error::InvalidData(format!("Failed to read prompt override: {}", e))
                })?;
                let (metadata, body) = parse_prompt(&content)?;
                return Ok(Prompt {
                    metadata,
                    content: body,
                    is_override: true,
                    override_path: Some(override_path),
                });
            }
        }

        let (metadata, body) = parse_prompt(id.default_content())?;
        Ok(Prompt {
            metadata,
            content: body,
            is_override: false,
            override_path: None,
        })
    }

    /// Check if a prompt has an override file
    pub fn has_override(&self, id: PromptId) -> bool {
        self.override_path(id).is_some_and(|p| p.exists())
    }

    fn override_path(&self, id: PromptId) -> Option<PathBuf> {
        self.override_dir
            .as_ref()
            .map(|d| d.join(format!("{}.md", id.as_str())))
    }

    pub fn override_dir(&self) -> Option<&PathBuf> {
        self.override_dir.as_ref()
    }

    /// Clear the cache (useful after editing override files)
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Default prompts override directory
pub fn default_prompts_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("lumen").join("prompts").join("overrides"))
}

/// Split a prompt file into metadata and body
fn parse_prompt(content: &str) -> Result<(PromptMetadata, String)> {
    let content = content.trim();

    if !content.starts_with("---") {
        return Err(Error::InvalidData(
            "Prompt must start with YAML frontmatter (---)".into(),
        ));
    }

    let rest = &content[3..];
    let end = rest.find("---").ok_or_else(|| {
        Error::InvalidData("Prompt frontmatter not closed (missing second ---)".into())
    })?;

    let frontmatter = rest[..end].trim();
    let body = rest[end + 3..].trim();

    let metadata: PromptMetadata = serde_yaml::from_str(frontmatter)
        .map_err(|e| Error::InvalidData(format!("Invalid prompt frontmatter: {}", e)))?;

    Ok((metadata, body.to_string()))
}

fn extract_section<'a>(content: &'a str, header: &str) -> Option<&'a str> {
    let start = content.find(header)?;
    let after_header = &content[start + header.len()..];
    let end = after_header.find("\n# ").unwrap_or(after_header.len());
    Some(after_header[..end].trim())
}

/// `{{name}}` placeholder
fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").expect("placeholder pattern is valid"))
}

/// Resolve conditionals on the template, then substitute in a single pass
///
/// Substituted values are never rescanned, so template syntax inside a
/// question or context is kept literally.
fn render_template(template: &str, vars: &HashMap<&str, &str>) -> String {
    let resolved = resolve_conditionals(template, vars);
    placeholder()
        .replace_all(&resolved, |caps: &Captures<'_>| match vars.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Keep `{{#if var}}` blocks whose variable is non-empty, drop the rest
fn resolve_conditionals(content: &str, vars: &HashMap<&str, &str>) -> String {
    let mut result = content.to_string();

    while let Some(if_start) = result.find("{{#if ") {
        let var_start = if_start + 6;
        let Some(var_end) = result[var_start..].find("}}") else {
            break;
        };
        let var_name = &result[var_start..var_start + var_end];
        let block_start = var_start + var_end + 2;

        let Some(endif_pos) = result[block_start..].find("{{/if}}") else {
            break;
        };
        let block_content = &result[block_start..block_start + endif_pos];
        let full_end = block_start + endif_pos + 7;

        let keep = vars.get(var_name).is_some_and(|v| !v.is_empty());
        result = if keep {
            format!(
                "{}{}{}",
                &result[..if_start],
                block_content,
                &result[full_end..]
            )
        } else {
            format!("{}{}", &result[..if_start], &result[full_end..])
        };
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prompt() {
        let content = r#"---
id: test_prompt
version: 3
---

# System
Be brief.

# User
Answer {{question}}
"#;
        let (metadata, body) = parse_prompt(content).unwrap();
        assert_eq!(metadata.id, "test_prompt");
        assert_eq!(metadata.version, 3);
        assert!(metadata.description.is_empty());
        assert!(body.starts_with("# System"));
    }

    #[test]
    fn test_missing_frontmatter() {
        assert!(parse_prompt("# System\nhello").is_err());
        assert!(parse_prompt("---\nid: x\n# System").is_err());
    }

    #[test]
    fn test_all_embedded_prompts_parse() {
        let mut library = PromptLibrary::embedded_only();
        for id in PromptId::all() {
            let prompt = library.get(*id).unwrap();
            assert_eq!(prompt.metadata.id, id.as_str());
            assert!(!prompt.is_override);
            assert!(prompt.system_section().is_some(), "{} has no system", id);
            assert!(prompt.user_section().is_some(), "{} has no user", id);
        }
    }

    #[test]
    fn test_business_analysis_renders_rubric() {
        let mut library = PromptLibrary::embedded_only();
        let prompt = library.get(PromptId::BusinessAnalysis).unwrap();

        let vars = HashMap::from([
            ("question", "How is revenue trending?"),
            ("context", "{\"category\": \"revenue\"}"),
            ("history", ""),
        ]);
        let user = prompt.render_user(&vars);

        assert!(user.contains("USER QUERY: \"How is revenue trending?\""));
        assert!(user.contains("\"category\": \"revenue\""));
        for heading in [
            "Executive Summary",
            "Key Insights",
            "Strategic Recommendations",
            "Risk Assessment",
            "Next Steps",
        ] {
            assert!(user.contains(heading), "missing {}", heading);
        }
        assert!(!user.contains("RECENT CONVERSATION"));
        assert!(!user.contains("{{"));

        let system = prompt.render_system(&vars);
        assert!(system.starts_with("You are a senior business intelligence analyst"));
    }

    #[test]
    fn test_history_block_kept_when_present() {
        let mut library = PromptLibrary::embedded_only();
        let prompt = library.get(PromptId::PredictiveInsights).unwrap();

        let vars = HashMap::from([
            ("question", "What next?"),
            ("context", "{}"),
            ("history", "Q: earlier\nA: answer"),
        ]);
        let user = prompt.render_user(&vars);
        assert!(user.contains("RECENT CONVERSATION:\nQ: earlier\nA: answer"));
        assert!(!user.contains("{{/if}}"));
    }

    #[test]
    fn test_template_syntax_in_values_is_literal() {
        let template = "Q: {{question}}\n{{#if history}}H: {{history}}\n{{/if}}C: {{context}}";
        let vars = HashMap::from([
            ("question", "revenue {{#if x}} please {{context}} {{history}}"),
            ("context", "{\"total\": 1345000}"),
            ("history", ""),
        ]);

        assert_eq!(
            render_template(template, &vars),
            "Q: revenue {{#if x}} please {{context}} {{history}}\nC: {\"total\": 1345000}"
        );
    }

    #[test]
    fn test_unknown_placeholder_kept() {
        let vars = HashMap::from([("question", "churn")]);
        assert_eq!(
            render_template("{{question}} vs {{benchmark}}", &vars),
            "churn vs {{benchmark}}"
        );
    }

    #[test]
    fn test_override_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("industry_benchmark.md"),
            "---\nid: industry_benchmark\nversion: 9\n---\n# System\nCustom.\n\n# User\nCompare {{question}}",
        )
        .unwrap();

        let mut library = PromptLibrary::with_override_dir(dir.path().to_path_buf());
        assert!(library.has_override(PromptId::IndustryBenchmark));
        assert!(!library.has_override(PromptId::BusinessAnalysis));

        let prompt = library.get(PromptId::IndustryBenchmark).unwrap();
        assert!(prompt.is_override);
        assert_eq!(prompt.metadata.version, 9);

        let vars = HashMap::from([("question", "churn")]);
        assert_eq!(prompt.render_user(&vars), "Compare churn");
    }

    #[test]
    fn test_prompt_id_from_str() {
        assert_eq!("benchmark".parse::<PromptId>().unwrap(), PromptId::IndustryBenchmark);
        assert_eq!(
            "predictive-insights".parse::<PromptId>().unwrap(),
            PromptId::PredictiveInsights
        );
        assert!("poetry".parse::<PromptId>().is_err());
    }
}
