//! Chart payloads for the dashboard and terminal renderers

use serde::Serialize;

use crate::classifier::Category;

use super::types::{AnalysisContext, ChartKind};

/// A single-series chart ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSpec {
    /// Build from a context, `None` when the context has no numeric series
    pub fn from_context(context: &AnalysisContext) -> Option<Self> {
        let series = context.data.as_ref()?.series();
        if series.is_empty() {
            return None;
        }

        let (labels, values) = series.into_iter().unzip();
        Some(Self {
            kind: context.chart_kind,
            title: title_for(context.category).to_string(),
            labels,
            values,
        })
    }

    /// Largest value, used to scale bars
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

fn title_for(category: Category) -> &'static str {
    match category {
        Category::Revenue => "Revenue Trends",
        Category::Products => "Product Performance",
        Category::Customers => "Customer Segments",
        Category::Regions => "Regional Performance",
        Category::Trends => "Business Trends",
        Category::General => "Business Overview",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::dataset::{Dataset, SampleStore};

    #[test]
    fn test_revenue_chart() {
        let context = analyze(Category::Revenue, &Dataset::fallback()).unwrap();
        let chart = ChartSpec::from_context(&context).unwrap();

        assert_eq!(chart.kind, ChartKind::Line);
        assert_eq!(chart.title, "Revenue Trends");
        assert_eq!(chart.labels.first().map(String::as_str), Some("Jan"));
        assert_eq!(chart.values.len(), 6);
        assert_eq!(chart.max_value(), 267_000.0);
    }

    #[test]
    fn test_segment_chart_uses_counts() {
        let store = SampleStore::bundled();
        let context = analyze(Category::Customers, store.dataset()).unwrap();
        let chart = ChartSpec::from_context(&context).unwrap();

        assert_eq!(chart.kind, ChartKind::Doughnut);
        assert_eq!(chart.values, vec![145.0, 1200.0, 14502.0]);
    }

    #[test]
    fn test_no_chart_without_series() {
        let store = SampleStore::bundled();
        let trends = analyze(Category::Trends, store.dataset()).unwrap();
        let general = analyze(Category::General, store.dataset()).unwrap();

        assert!(ChartSpec::from_context(&trends).is_none());
        assert!(ChartSpec::from_context(&general).is_none());
    }
}
