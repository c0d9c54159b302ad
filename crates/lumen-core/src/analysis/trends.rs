//! Trends and general overview analyzers

use crate::classifier::Category;
use crate::dataset::Dataset;

use super::engine::Analyzer;
use super::types::{AnalysisContext, ChartKind, DataSlice};

pub struct TrendsAnalyzer;

impl Analyzer for TrendsAnalyzer {
    fn category(&self) -> Category {
        Category::Trends
    }

    fn name(&self) -> &'static str {
        "Trends Analyzer"
    }

    fn analyze(&self, dataset: &Dataset) -> Option<AnalysisContext> {
        let trends = dataset.trends.as_ref()?;

        let insights = [
            ("Growing segments", &trends.top_growing_segments),
            ("Areas of concern", &trends.concerning_trends),
            ("Key opportunities", &trends.opportunities),
        ]
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(label, items)| format!("{}: {}", label, items.join(", ")))
        .collect();

        Some(AnalysisContext {
            category: Category::Trends,
            summary: "Key business trends and opportunities identified".to_string(),
            insights,
            data: Some(DataSlice::Trends(trends.clone())),
            chart_kind: ChartKind::Radar,
        })
    }
}

/// Fixed overview for questions that match no keyword table
pub const GENERAL_INSIGHTS: &[&str] = &[
    "Revenue is growing consistently across all quarters",
    "Customer satisfaction remains high at 4.7/5",
    "Enterprise segment shows strongest growth potential",
    "Geographic expansion opportunities in Asia Pacific",
];

pub struct GeneralAnalyzer;

impl Analyzer for GeneralAnalyzer {
    fn category(&self) -> Category {
        Category::General
    }

    fn name(&self) -> &'static str {
        "General Overview"
    }

    fn analyze(&self, _dataset: &Dataset) -> Option<AnalysisContext> {
        Some(AnalysisContext {
            category: Category::General,
            summary: "Comprehensive business overview".to_string(),
            insights: GENERAL_INSIGHTS.iter().map(|s| s.to_string()).collect(),
            data: None,
            chart_kind: ChartKind::Mixed,
        })
    }
}
