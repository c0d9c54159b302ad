//! Core types for the Analysis Engine

use std::fmt;

use serde::Serialize;

use crate::classifier::Category;
use crate::dataset::{CustomerSegment, MonthlyRevenue, Product, Region, Trends};

/// Chart the presentation layer should draw for a context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Doughnut,
    Radar,
    /// Overview with no single series
    Mixed,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Doughnut => "doughnut",
            ChartKind::Radar => "radar",
            ChartKind::Mixed => "mixed",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The dataset slice that grounds a context
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DataSlice {
    Monthly(Vec<MonthlyRevenue>),
    Products(Vec<Product>),
    Segments(Vec<CustomerSegment>),
    Regions(Vec<Region>),
    Trends(Trends),
}

impl DataSlice {
    /// Primary numeric series as (label, value) pairs
    ///
    /// Trends carry no numbers and yield an empty series.
    pub fn series(&self) -> Vec<(String, f64)> {
        match self {
            DataSlice::Monthly(months) => months
                .iter()
                .map(|m| (m.month.clone(), m.value))
                .collect(),
            DataSlice::Products(products) => products
                .iter()
                .map(|p| (p.name.clone(), p.revenue))
                .collect(),
            DataSlice::Segments(segments) => segments
                .iter()
                .map(|s| (s.name.clone(), s.count as f64))
                .collect(),
            DataSlice::Regions(regions) => regions
                .iter()
                .map(|r| (r.name.clone(), r.revenue))
                .collect(),
            DataSlice::Trends(_) => Vec::new(),
        }
    }

    /// Whether the series is ordered in time (and so can be forecast)
    pub fn is_time_series(&self) -> bool {
        matches!(self, DataSlice::Monthly(_))
    }

    /// Number of records in the slice
    pub fn len(&self) -> usize {
        match self {
            DataSlice::Monthly(v) => v.len(),
            DataSlice::Products(v) => v.len(),
            DataSlice::Segments(v) => v.len(),
            DataSlice::Regions(v) => v.len(),
            DataSlice::Trends(t) => {
                t.top_growing_segments.len() + t.concerning_trends.len() + t.opportunities.len()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Structured summary of one category, used to ground narration
///
/// Produced fresh per query and never mutated after it is returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisContext {
    pub category: Category,
    pub summary: String,
    pub insights: Vec<String>,
    pub data: Option<DataSlice>,
    pub chart_kind: ChartKind,
}

/// A point flagged by anomaly detection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anomaly {
    pub label: String,
    pub value: f64,
}

/// Statistical signals derived from a context's primary series
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Outlook {
    pub anomalies: Vec<Anomaly>,
    /// Next-period estimate (time series only)
    pub forecast: Option<f64>,
}
