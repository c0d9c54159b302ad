//! Customers analyzer

use crate::classifier::Category;
use crate::dataset::Dataset;

use super::engine::Analyzer;
use super::format::format_count;
use super::types::{AnalysisContext, ChartKind, DataSlice};

pub struct CustomersAnalyzer;

impl Analyzer for CustomersAnalyzer {
    fn category(&self) -> Category {
        Category::Customers
    }

    fn name(&self) -> &'static str {
        "Customers Analyzer"
    }

    fn analyze(&self, dataset: &Dataset) -> Option<AnalysisContext> {
        let customers = dataset.customers.as_ref()?;

        let mut insights = vec![
            format!("Monthly new customers: {}", format_count(customers.new_monthly)),
            format!(
                "Churn rate: {:.1}% (industry average: 5-7%)",
                customers.churn_rate
            ),
        ];

        if let Some(best) = customers
            .segments
            .iter()
            .reduce(|best, s| if s.satisfaction > best.satisfaction { s } else { best })
        {
            insights.push(format!(
                "{} segment has highest satisfaction: {:.1}/5",
                best.name, best.satisfaction
            ));
        }

        Some(AnalysisContext {
            category: Category::Customers,
            summary: format!(
                "{} total customers with {:.1}/5 satisfaction",
                format_count(customers.total),
                customers.satisfaction
            ),
            insights,
            data: Some(DataSlice::Segments(customers.segments.clone())),
            chart_kind: ChartKind::Doughnut,
        })
    }
}
