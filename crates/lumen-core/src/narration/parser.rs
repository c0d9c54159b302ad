//! Response Parser - splits a free-text reply into named sections
//!
//! A section starts at a line holding one of its headings (case-insensitive,
//! optionally decorated with markdown `#`, `*` or a list number) followed by
//! a colon or nothing. Its content runs until the next blank line, the next
//! heading-like line, or the end of the text. Text after a blank line inside
//! a section is dropped.
//!
//! Any other heading-like line is two to four capitalized words whose colon
//! ends the line. Bulleted or numbered `Label: text` entries stay in the list.

use std::sync::OnceLock;

use chrono::Utc;
use regex::Regex;

use crate::analysis::AnalysisContext;
use crate::classifier::Category;

use super::types::{NarrationResult, NarrationSource};

/// List entries shorter than this are treated as noise
pub const MIN_LIST_ENTRY_CHARS: usize = 10;

/// Sections the model is asked to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    ExecutiveSummary,
    KeyInsights,
    Recommendations,
    RiskAssessment,
    NextSteps,
}

impl Section {
    pub fn all() -> &'static [Section] {
        &[
            Section::ExecutiveSummary,
            Section::KeyInsights,
            Section::Recommendations,
            Section::RiskAssessment,
            Section::NextSteps,
        ]
    }

    /// Accepted headings, longest first
    pub fn headings(&self) -> &'static [&'static str] {
        match self {
            Section::ExecutiveSummary => &["executive summary"],
            Section::KeyInsights => &["key insights"],
            Section::Recommendations => &["strategic recommendations", "recommendations"],
            Section::RiskAssessment => &["risk assessment"],
            Section::NextSteps => &["next steps"],
        }
    }

    /// Whether the section is a bullet list rather than prose
    pub fn is_list(&self) -> bool {
        matches!(self, Section::KeyInsights | Section::Recommendations)
    }
}

/// Markdown decoration allowed before a heading
fn heading_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[\s#*_]*(?:\d+[.)]\s*)?[\s#*_]*").expect("heading prefix pattern is valid")
    })
}

/// Two to four capitalized words and a colon, alone on the line
///
/// Only `#` and bold markers may surround it, never a bullet or list number.
fn generic_heading() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*#*\s*(?:\*\*|__)?[A-Z][a-z]+(?: [A-Z][a-z]+){1,3}(?:\*\*|__)?:(?:\*\*|__)?\s*$")
            .expect("heading pattern is valid")
    })
}

fn strip_decoration(line: &str) -> &str {
    let prefix_len = heading_prefix().find(line).map(|m| m.end()).unwrap_or(0);
    &line[prefix_len..]
}

/// If `line` opens a known section, return it with the text after the heading
fn match_heading(line: &str) -> Option<(Section, &str)> {
    let stripped = strip_decoration(line);

    for section in Section::all() {
        for heading in section.headings() {
            let Some(candidate) = stripped.get(..heading.len()) else {
                continue;
            };
            if !candidate.eq_ignore_ascii_case(heading) {
                continue;
            }

            let after = &stripped[heading.len()..];
            let undecorated = after.trim_start_matches(['*', '_', '#']);

            // A heading stands alone on its line or is followed by a colon
            if let Some(rest) = undecorated.strip_prefix(':') {
                let rest = rest.trim_start_matches(['*', '_']).trim();
                return Some((*section, rest));
            }
            if undecorated.trim().is_empty() {
                return Some((*section, ""));
            }
        }
    }
    None
}

fn is_heading_like(line: &str) -> bool {
    match_heading(line).is_some() || generic_heading().is_match(line)
}

/// Extract one section's text, empty if the section is absent
pub fn extract_section(text: &str, section: Section) -> String {
    let lines: Vec<&str> = text.lines().collect();

    let Some((start, first)) = lines.iter().enumerate().find_map(|(i, line)| {
        match_heading(line)
            .filter(|(s, _)| *s == section)
            .map(|(_, rest)| (i, rest))
    }) else {
        return String::new();
    };

    let mut body: Vec<&str> = Vec::new();
    if !first.is_empty() {
        body.push(first);
    }

    for line in &lines[start + 1..] {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            // Blank lines between a bare heading and its content are skipped
            if body.is_empty() {
                continue;
            }
            break;
        }
        if is_heading_like(line) {
            break;
        }
        body.push(trimmed);
    }

    body.join("\n")
}

/// Split a list section into entries, stripping leading bullet markers
pub fn split_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.trim_start_matches(['-', '•', '*']).trim())
        .filter(|entry| entry.chars().count() >= MIN_LIST_ENTRY_CHARS)
        .map(str::to_string)
        .collect()
}

/// Parse a model reply into a fully populated narration
pub fn parse(raw: &str, category: Category, context: Option<&AnalysisContext>) -> NarrationResult {
    NarrationResult {
        category,
        source: NarrationSource::Model,
        summary: extract_section(raw, Section::ExecutiveSummary),
        insights: split_list(&extract_section(raw, Section::KeyInsights)),
        recommendations: split_list(&extract_section(raw, Section::Recommendations)),
        risks: extract_section(raw, Section::RiskAssessment),
        next_steps: extract_section(raw, Section::NextSteps),
        raw_text: raw.to_string(),
        context: context.cloned(),
        produced_at: Utc::now(),
    }
}
