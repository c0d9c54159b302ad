//! Shared utilities for commands
//!
//! - `open_pipeline` - Build the pipeline from config, credential and dataset
//! - `parse_mode` - Map a `--mode` value to a prompt
//! - `format_value` - Category-aware number formatting

use std::path::Path;

use anyhow::{Context, Result};
use lumen_core::analysis::format::{format_count, format_currency};
use lumen_core::{Category, NarrationBackend, Pipeline, PromptId};
use tracing::debug;

/// Build the pipeline with layered config and the resolved credential
pub fn open_pipeline(data: Option<&Path>) -> Result<Pipeline> {
    let pipeline = Pipeline::from_env(data).context("Failed to set up the question pipeline")?;
    debug!(
        source = ?pipeline.store().source(),
        model = pipeline.narrator().client().model(),
        "Pipeline ready"
    );
    Ok(pipeline)
}

/// Parse a `--mode` flag (analysis, predictive, benchmark)
pub fn parse_mode(mode: &str) -> Result<PromptId> {
    mode.parse::<PromptId>()
        .with_context(|| format!("Unknown mode '{}' (expected analysis, predictive or benchmark)", mode))
}

/// Format a series value the way its category reports it
pub fn format_value(category: Category, value: f64) -> String {
    match category {
        Category::Customers => format_count(value.round().max(0.0) as u64),
        _ => format_currency(value),
    }
}
