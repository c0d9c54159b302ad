//! Regions analyzer

use crate::classifier::Category;
use crate::dataset::Dataset;

use super::engine::Analyzer;
use super::format::{format_count, format_currency, format_percent};
use super::stats;
use super::types::{AnalysisContext, ChartKind, DataSlice};

pub struct RegionsAnalyzer;

impl Analyzer for RegionsAnalyzer {
    fn category(&self) -> Category {
        Category::Regions
    }

    fn name(&self) -> &'static str {
        "Regions Analyzer"
    }

    fn analyze(&self, dataset: &Dataset) -> Option<AnalysisContext> {
        let regions = dataset.regions.as_ref()?;

        let leader = regions
            .iter()
            .reduce(|top, r| if r.revenue > top.revenue { r } else { top })?;
        let fastest = regions
            .iter()
            .reduce(|top, r| if r.growth > top.growth { r } else { top })?;
        let growth: Vec<f64> = regions.iter().map(|r| r.growth).collect();
        let average_growth = stats::mean(&growth)?;
        let total_customers: u64 = regions.iter().map(|r| r.customers).sum();

        Some(AnalysisContext {
            category: Category::Regions,
            summary: format!(
                "{} leads with {} revenue",
                leader.name,
                format_currency(leader.revenue)
            ),
            insights: vec![
                format!(
                    "Fastest growing region: {} ({})",
                    fastest.name,
                    format_percent(fastest.growth)
                ),
                format!("Total global customers: {}", format_count(total_customers)),
                format!("Average regional growth: {}", format_percent(average_growth)),
            ],
            data: Some(DataSlice::Regions(regions.clone())),
            chart_kind: ChartKind::Bar,
        })
    }
}
