//! Canned narration used whenever the model cannot be reached or understood

use chrono::Utc;

use crate::analysis::AnalysisContext;
use crate::classifier::Category;

use super::types::{NarrationResult, NarrationSource};

pub const FALLBACK_SUMMARY: &str = "Analysis completed using built-in intelligence algorithms";

pub const FALLBACK_RECOMMENDATIONS: &[&str] = &[
    "Continue monitoring key performance indicators",
    "Consider deeper analysis of high-performing segments",
    "Implement regular review cycles for strategic planning",
];

pub const FALLBACK_RISKS: &str = "Limited AI connectivity may affect real-time insights";

pub const FALLBACK_NEXT_STEPS: &str = "Establish reliable data pipeline for continuous analysis";

const REVENUE_INSIGHTS: &[&str] = &[
    "Revenue shows consistent growth trajectory",
    "Monthly performance indicates strong market demand",
];

const PRODUCT_INSIGHTS: &[&str] = &[
    "Product portfolio demonstrates diverse revenue streams",
    "Growth rates vary significantly across product lines",
];

const CUSTOMER_INSIGHTS: &[&str] = &[
    "Customer satisfaction metrics exceed industry benchmarks",
    "Customer acquisition trends show positive momentum",
];

const GENERIC_INSIGHTS: &[&str] = &[
    "Core business metrics remain within expected ranges",
    "Further data collection would enable deeper category-level analysis",
];

/// Canned insight strings for a category
pub fn fallback_insights(category: Category) -> &'static [&'static str] {
    match category {
        Category::Revenue => REVENUE_INSIGHTS,
        Category::Products => PRODUCT_INSIGHTS,
        Category::Customers => CUSTOMER_INSIGHTS,
        Category::Regions | Category::Trends | Category::General => GENERIC_INSIGHTS,
    }
}

/// Build the deterministic fallback narration
pub fn fallback(category: Category, context: Option<&AnalysisContext>) -> NarrationResult {
    let to_strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    NarrationResult {
        category,
        source: NarrationSource::Fallback,
        summary: FALLBACK_SUMMARY.to_string(),
        insights: to_strings(fallback_insights(category)),
        recommendations: to_strings(FALLBACK_RECOMMENDATIONS),
        risks: FALLBACK_RISKS.to_string(),
        next_steps: FALLBACK_NEXT_STEPS.to_string(),
        raw_text: String::new(),
        context: context.cloned(),
        produced_at: Utc::now(),
    }
}
