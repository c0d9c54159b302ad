//! Dataset command implementations (dataset, chart)
//!
//! Neither command narrates, so neither needs config or a credential.

use std::path::Path;

use anyhow::{Context, Result};
use lumen_core::{AnalysisEngine, Category, ChartSpec, DatasetSource, SampleStore};

use super::format_value;

pub fn cmd_dataset(data: Option<&Path>, json: bool) -> Result<()> {
    let store = SampleStore::load(data);

    if json {
        println!("{}", serde_json::to_string_pretty(store.dataset())?);
        return Ok(());
    }

    println!();
    println!("📁 Lumen Dataset");
    println!("   ─────────────────────────────────────────────────────────────");
    match store.source() {
        DatasetSource::Bundled => println!("   Source: bundled sample"),
        DatasetSource::File(path) => println!("   Source: {}", path.display()),
        DatasetSource::Fallback => println!("   Source: ⚠️  built-in fallback (document unavailable)"),
    }
    println!();

    let engine = AnalysisEngine::new();
    for &category in Category::all() {
        match engine.analyze(category, store.dataset()) {
            Some(context) => println!("   ✅ {:<10} {}", category.label(), context.summary),
            None => println!("   ➖ {:<10} (no data)", category.label()),
        }
    }
    println!();

    Ok(())
}

pub fn cmd_chart(data: Option<&Path>, category: &str, width: usize) -> Result<()> {
    let category: Category = category.parse().map_err(anyhow::Error::msg)?;
    let store = SampleStore::load(data);

    let chart = AnalysisEngine::new()
        .analyze(category, store.dataset())
        .as_ref()
        .and_then(ChartSpec::from_context)
        .with_context(|| format!("No chart data for {}", category))?;

    println!();
    println!("📈 {} ({})", chart.title, chart.kind);
    println!();
    for line in render_bars(&chart, category, width) {
        println!("   {}", line);
    }
    println!();

    Ok(())
}

/// Horizontal bar chart, one line per point, bars scaled to `width`
pub fn render_bars(chart: &ChartSpec, category: Category, width: usize) -> Vec<String> {
    let label_width = chart
        .labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0);
    let max = chart.max_value();

    chart
        .labels
        .iter()
        .zip(&chart.values)
        .map(|(label, &value)| {
            let len = if max > 0.0 {
                ((value.max(0.0) / max) * width as f64).round() as usize
            } else {
                0
            };
            format!(
                "{:<label_width$} │{} {}",
                label,
                "█".repeat(len),
                format_value(category, value),
            )
        })
        .collect()
}
