//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;

use lumen_core::narration::{MockBackend, NarrationErrorKind};
use lumen_core::{
    Analysis, Category, ChartKind, ChartSpec, NarrationClient, Narrator, Pipeline, PromptId,
    PromptLibrary, SampleStore, Submission,
};

use crate::commands::{self, truncate};

async fn offline_analysis(store: SampleStore, question: &str) -> Analysis {
    let narrator = Narrator::with_prompts(
        NarrationClient::Mock(MockBackend::failing(NarrationErrorKind::Transport)),
        PromptLibrary::embedded_only(),
    );
    match Pipeline::new(store, narrator).submit(question).await {
        Submission::Completed(analysis) => *analysis,
        other => panic!("expected completion, got {:?}", other),
    }
}

fn chart(labels: &[&str], values: &[f64]) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Bar,
        title: "Test".to_string(),
        labels: labels.iter().map(|s| s.to_string()).collect(),
        values: values.to_vec(),
    }
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("exactly ten", 11), "exactly ten");
    assert_eq!(truncate("a longer question here", 10), "a longe...");
}

#[test]
fn test_truncate_multibyte() {
    assert_eq!(truncate("€€€€€€€€", 5), "€€...");
}

#[test]
fn test_parse_mode() {
    assert_eq!(
        commands::parse_mode("analysis").unwrap(),
        PromptId::BusinessAnalysis
    );
    assert_eq!(
        commands::parse_mode("predictive").unwrap(),
        PromptId::PredictiveInsights
    );
    assert_eq!(
        commands::parse_mode("benchmark").unwrap(),
        PromptId::IndustryBenchmark
    );
    assert!(commands::parse_mode("astrology").is_err());
}

#[test]
fn test_format_value_by_category() {
    assert_eq!(
        commands::format_value(Category::Revenue, 245000.0),
        "$245,000"
    );
    assert_eq!(commands::format_value(Category::Customers, 1250.0), "1,250");
}

// ========== Chart Tests ==========

#[test]
fn test_render_bars_scales_to_width() {
    let lines = commands::render_bars(
        &chart(&["Q1", "Q2"], &[50000.0, 100000.0]),
        Category::Revenue,
        10,
    );
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], format!("Q1 │{} $50,000", "█".repeat(5)));
    assert_eq!(lines[1], format!("Q2 │{} $100,000", "█".repeat(10)));
}

#[test]
fn test_render_bars_pads_labels() {
    let lines = commands::render_bars(
        &chart(&["Enterprise", "SMB"], &[80.0, 20.0]),
        Category::Customers,
        4,
    );
    assert!(lines[1].starts_with("SMB        │"));
    assert!(lines[1].ends_with(" 20"));
}

#[test]
fn test_render_bars_all_zero() {
    let lines = commands::render_bars(&chart(&["A", "B"], &[0.0, 0.0]), Category::Revenue, 10);
    assert!(lines.iter().all(|l| !l.contains('█')));
}

#[test]
fn test_cmd_chart_unknown_category() {
    assert!(commands::cmd_chart(None, "weather", 40).is_err());
}

#[test]
fn test_cmd_chart_category_without_chart() {
    // General is an overview with no single series
    assert!(commands::cmd_chart(None, "general", 40).is_err());
}

#[test]
fn test_cmd_chart_bundled_revenue() {
    assert!(commands::cmd_chart(None, "revenue", 40).is_ok());
}

// ========== Dataset Tests ==========

#[test]
fn test_cmd_dataset_bundled() {
    assert!(commands::cmd_dataset(None, false).is_ok());
    assert!(commands::cmd_dataset(None, true).is_ok());
}

#[test]
fn test_cmd_dataset_broken_file_uses_fallback() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{ not json").unwrap();
    assert!(commands::cmd_dataset(Some(file.path()), false).is_ok());
}

#[test]
fn test_cmd_chart_missing_category_in_override() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"{"customers": {"total": 100, "satisfaction": 4.2, "new_monthly": 10, "churn_rate": 6.0, "segments": []}}"#)
        .unwrap();
    assert!(commands::cmd_chart(Some(file.path()), "revenue", 40).is_err());
}

// ========== Analysis Rendering Tests ==========

#[tokio::test]
async fn test_format_analysis_fallback() {
    let analysis = offline_analysis(SampleStore::fallback(), "How is revenue trending?").await;
    let text = commands::format_analysis(&analysis);

    assert!(text.starts_with("📊 Revenue Analysis"));
    assert!(text.contains("Total revenue: $1,345,000"));
    assert!(text.contains("🧠 Executive Summary (built-in, narration unavailable)"));
    assert!(text.contains("💡 Key Insights"));
    assert!(text.contains("⚠️  Risk Assessment"));
    assert!(text.contains("Next period forecast:"));
}

#[tokio::test]
async fn test_format_analysis_without_context() {
    // The fallback store has no regional data
    let analysis = offline_analysis(SampleStore::fallback(), "Which region sells most?").await;
    let text = commands::format_analysis(&analysis);

    assert!(text.starts_with("📊 Regions Analysis"));
    assert!(text.contains("(no data available for this category)"));
}

// ========== Prompts Command Tests ==========

#[test]
fn test_cmd_prompts_show_known() {
    assert!(commands::cmd_prompts_show("business_analysis").is_ok());
}

#[test]
fn test_cmd_prompts_show_unknown_is_not_fatal() {
    assert!(commands::cmd_prompts_show("nonexistent").is_ok());
}

#[test]
fn test_cmd_prompts_path() {
    assert!(commands::cmd_prompts_path().is_ok());
}
