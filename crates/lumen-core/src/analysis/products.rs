//! Products analyzer

use serde::Serialize;

use crate::classifier::Category;
use crate::dataset::{Dataset, Product};

use super::engine::Analyzer;
use super::format::format_currency;
use super::types::{AnalysisContext, ChartKind, DataSlice};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub top_performer: Product,
    pub growing: usize,
    pub total_products: usize,
    pub highest_growth: f64,
    pub total_revenue: f64,
}

impl ProductSummary {
    pub fn from_products(products: &[Product]) -> Option<Self> {
        let top_performer = products
            .iter()
            .reduce(|top, p| if p.revenue > top.revenue { p } else { top })?
            .clone();

        let highest_growth = products
            .iter()
            .map(|p| p.growth)
            .fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            top_performer,
            growing: products.iter().filter(|p| p.growth > 0.0).count(),
            total_products: products.len(),
            highest_growth,
            total_revenue: products.iter().map(|p| p.revenue).sum(),
        })
    }
}

pub struct ProductsAnalyzer;

impl Analyzer for ProductsAnalyzer {
    fn category(&self) -> Category {
        Category::Products
    }

    fn name(&self) -> &'static str {
        "Products Analyzer"
    }

    fn analyze(&self, dataset: &Dataset) -> Option<AnalysisContext> {
        let products = dataset.products.as_ref()?;
        let summary = ProductSummary::from_products(products)?;

        Some(AnalysisContext {
            category: Category::Products,
            summary: format!(
                "Top performer: {} ({})",
                summary.top_performer.name,
                format_currency(summary.top_performer.revenue)
            ),
            insights: vec![
                format!(
                    "{} out of {} products showing positive growth",
                    summary.growing, summary.total_products
                ),
                format!("Highest growth rate: {:.1}%", summary.highest_growth),
                format!(
                    "Total product revenue: {}",
                    format_currency(summary.total_revenue)
                ),
            ],
            data: Some(DataSlice::Products(products.clone())),
            chart_kind: ChartKind::Bar,
        })
    }
}
