//! Analysis Engine - deterministic summaries of the business dataset
//!
//! Each category has an analyzer that turns its dataset slice into an
//! [`AnalysisContext`]: a one-line summary, a handful of insight strings, the
//! raw slice, and the chart kind to draw. No I/O happens here.
//!
//! ## Analyzers
//!
//! - **Revenue** - total, average growth, strongest month
//! - **Products** - top performer, growth spread, total revenue
//! - **Customers** - base size, churn, best-rated segment
//! - **Regions** - revenue leader, fastest grower, customer total
//! - **Trends** - growing segments, concerns, opportunities
//! - **General** - fixed overview, needs no data
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lumen_core::analysis::{analyze, outlook, recommend};
//!
//! let context = analyze(Category::Revenue, store.dataset()).unwrap();
//! let signals = outlook(&context);
//! let actions = recommend(&context);
//! ```

pub mod chart;
pub mod customers;
pub mod engine;
pub mod format;
pub mod products;
pub mod recommend;
pub mod regions;
pub mod revenue;
pub mod stats;
pub mod trends;
pub mod types;

pub use chart::ChartSpec;
pub use customers::CustomersAnalyzer;
pub use engine::{analyze, outlook, AnalysisEngine, Analyzer};
pub use products::{ProductSummary, ProductsAnalyzer};
pub use recommend::recommend;
pub use regions::RegionsAnalyzer;
pub use revenue::{RevenueAnalyzer, RevenueSummary};
pub use trends::{GeneralAnalyzer, TrendsAnalyzer, GENERAL_INSIGHTS};
pub use types::{AnalysisContext, Anomaly, ChartKind, DataSlice, Outlook};
