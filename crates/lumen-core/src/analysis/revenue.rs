//! Revenue analyzer
//!
//! Totals the monthly series, averages month-over-month growth and picks the
//! strongest month.

use serde::Serialize;

use crate::classifier::Category;
use crate::dataset::{Dataset, MonthlyRevenue};

use super::engine::Analyzer;
use super::format::{format_currency, format_percent};
use super::stats;
use super::types::{AnalysisContext, ChartKind, DataSlice};

/// Average growth above this is described as a strong upward trajectory
pub const STRONG_GROWTH_THRESHOLD: f64 = 5.0;

/// Unrounded revenue figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueSummary {
    pub total: f64,
    pub average_growth: f64,
    pub best_month: MonthlyRevenue,
}

impl RevenueSummary {
    /// `None` for an empty series
    pub fn from_months(months: &[MonthlyRevenue]) -> Option<Self> {
        let growth: Vec<f64> = months.iter().map(|m| m.growth).collect();
        let average_growth = stats::mean(&growth)?;

        // First month wins a tie
        let best_month = months
            .iter()
            .reduce(|best, m| if m.value > best.value { m } else { best })?
            .clone();

        Some(Self {
            total: months.iter().map(|m| m.value).sum(),
            average_growth,
            best_month,
        })
    }

    pub fn trend_label(&self) -> &'static str {
        if self.average_growth > STRONG_GROWTH_THRESHOLD {
            "Strong upward trajectory"
        } else {
            "Moderate growth"
        }
    }
}

pub struct RevenueAnalyzer;

impl Analyzer for RevenueAnalyzer {
    fn category(&self) -> Category {
        Category::Revenue
    }

    fn name(&self) -> &'static str {
        "Revenue Analyzer"
    }

    fn analyze(&self, dataset: &Dataset) -> Option<AnalysisContext> {
        let months = &dataset.revenue.as_ref()?.monthly;
        let summary = RevenueSummary::from_months(months)?;

        Some(AnalysisContext {
            category: Category::Revenue,
            summary: format!("Total revenue: {}", format_currency(summary.total)),
            insights: vec![
                format!(
                    "Average monthly growth rate: {}",
                    format_percent(summary.average_growth)
                ),
                format!(
                    "Strongest month: {} ({})",
                    summary.best_month.month,
                    format_currency(summary.best_month.value)
                ),
                format!("Revenue trend: {}", summary.trend_label()),
            ],
            data: Some(DataSlice::Monthly(months.clone())),
            chart_kind: ChartKind::Line,
        })
    }
}
