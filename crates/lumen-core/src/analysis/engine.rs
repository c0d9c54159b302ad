//! Analysis Engine - routes a category to its analyzer

use tracing::debug;

use crate::classifier::Category;
use crate::dataset::Dataset;

use super::types::{AnalysisContext, Anomaly, Outlook};
use super::{
    stats, CustomersAnalyzer, GeneralAnalyzer, ProductsAnalyzer, RegionsAnalyzer,
    RevenueAnalyzer, TrendsAnalyzer,
};

/// Trait for per-category analyzers
pub trait Analyzer: Send + Sync {
    /// Category this analyzer answers
    fn category(&self) -> Category;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Build a context from the dataset, `None` when the backing slice is
    /// absent or empty
    fn analyze(&self, dataset: &Dataset) -> Option<AnalysisContext>;
}

/// Holds one analyzer per category
pub struct AnalysisEngine {
    analyzers: Vec<Box<dyn Analyzer>>,
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisEngine {
    /// Create an engine with the built-in analyzers registered
    pub fn new() -> Self {
        let mut engine = Self { analyzers: vec![] };

        engine.register(Box::new(RevenueAnalyzer));
        engine.register(Box::new(ProductsAnalyzer));
        engine.register(Box::new(CustomersAnalyzer));
        engine.register(Box::new(RegionsAnalyzer));
        engine.register(Box::new(TrendsAnalyzer));
        engine.register(Box::new(GeneralAnalyzer));

        engine
    }

    /// Register an analyzer, replacing any existing one for the same category
    pub fn register(&mut self, analyzer: Box<dyn Analyzer>) {
        self.analyzers.retain(|a| a.category() != analyzer.category());
        self.analyzers.push(analyzer);
    }

    /// Produce the context for a category
    ///
    /// Pure with respect to the dataset: the same inputs always give the same
    /// context.
    pub fn analyze(&self, category: Category, dataset: &Dataset) -> Option<AnalysisContext> {
        let analyzer = self.analyzers.iter().find(|a| a.category() == category)?;
        let context = analyzer.analyze(dataset);

        debug!(
            analyzer = analyzer.name(),
            grounded = context.is_some(),
            "Analysis complete"
        );
        context
    }

    /// Categories with a registered analyzer
    pub fn categories(&self) -> Vec<Category> {
        self.analyzers.iter().map(|a| a.category()).collect()
    }
}

/// Analyze with the built-in analyzers
pub fn analyze(category: Category, dataset: &Dataset) -> Option<AnalysisContext> {
    AnalysisEngine::new().analyze(category, dataset)
}

/// Anomalies and forecast over a context's primary series
///
/// Forecasting only applies to time-ordered data; a ranking of products or
/// regions has no "next period".
pub fn outlook(context: &AnalysisContext) -> Outlook {
    let Some(data) = &context.data else {
        return Outlook::default();
    };

    let series = data.series();
    let values: Vec<f64> = series.iter().map(|(_, v)| *v).collect();

    let anomalies = stats::detect_anomalies(&values)
        .into_iter()
        .map(|i| Anomaly {
            label: series[i].0.clone(),
            value: series[i].1,
        })
        .collect();

    let forecast = if data.is_time_series() {
        stats::forecast_next(&values)
    } else {
        None
    };

    Outlook {
        anomalies,
        forecast,
    }
}
