//! Sample Store - the in-memory business dataset
//!
//! The dataset is loaded with a two-layer resolution:
//! 1. A JSON document from a configured path, or the bundled sample document
//! 2. A hard-coded fallback (six months of revenue, four products) when the
//!    document cannot be read or parsed
//!
//! Slices other than revenue and products are optional. An absent slice means
//! the matching category is unavailable for the session, not an error.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classifier::Category;
use crate::error::{Error, Result};

/// Bundled sample document (compiled into binary)
const BUNDLED_DATASET: &str = include_str!("../../../data/sample-data.json");

/// One month of revenue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub value: f64,
    /// Month-over-month growth in percent
    pub growth: f64,
}

/// Revenue time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSeries {
    pub monthly: Vec<MonthlyRevenue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub revenue: f64,
    pub units: u64,
    pub growth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSegment {
    pub name: String,
    #[serde(default)]
    pub count: u64,
    /// Satisfaction score out of 5
    pub satisfaction: f64,
}

/// Customer base summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customers {
    pub total: u64,
    pub satisfaction: f64,
    pub new_monthly: u64,
    /// Monthly churn in percent
    pub churn_rate: f64,
    #[serde(default)]
    pub segments: Vec<CustomerSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub revenue: f64,
    pub customers: u64,
    pub growth: f64,
}

/// Qualitative business trends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trends {
    #[serde(default)]
    pub top_growing_segments: Vec<String>,
    #[serde(default)]
    pub concerning_trends: Vec<String>,
    #[serde(default)]
    pub opportunities: Vec<String>,
}

/// The full business dataset, keyed by category name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<RevenueSeries>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Product>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customers: Option<Customers>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<Region>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trends: Option<Trends>,
}

impl Dataset {
    /// Parse a dataset document
    ///
    /// A document that parses but carries none of the known slices is
    /// rejected, since it cannot ground any category.
    pub fn from_json(json: &str) -> Result<Self> {
        let dataset: Dataset = serde_json::from_str(json)?;
        if dataset.is_empty() {
            return Err(Error::InvalidData(
                "Dataset document has no revenue, products, customers, regions or trends".into(),
            ));
        }
        Ok(dataset)
    }

    /// Built-in fallback used when the external document fails to load
    pub fn fallback() -> Self {
        let month = |month: &str, value: f64, growth: f64| MonthlyRevenue {
            month: month.to_string(),
            value,
            growth,
        };
        let product = |name: &str, revenue: f64, units: u64, growth: f64| Product {
            name: name.to_string(),
            revenue,
            units,
            growth,
        };

        Self {
            revenue: Some(RevenueSeries {
                monthly: vec![
                    month("Jan", 185_000.0, 8.2),
                    month("Feb", 198_000.0, 7.0),
                    month("Mar", 215_000.0, 8.6),
                    month("Apr", 232_000.0, 7.9),
                    month("May", 248_000.0, 6.9),
                    month("Jun", 267_000.0, 7.7),
                ],
            }),
            products: Some(vec![
                product("Premium Analytics", 450_000.0, 1200, 15.3),
                product("Basic Dashboard", 320_000.0, 2400, 8.7),
                product("Enterprise Suite", 580_000.0, 145, 22.1),
                product("Mobile App", 180_000.0, 3600, -2.3),
            ]),
            customers: None,
            regions: None,
            trends: None,
        }
    }

    fn is_empty(&self) -> bool {
        self.revenue.is_none()
            && self.products.is_none()
            && self.customers.is_none()
            && self.regions.is_none()
            && self.trends.is_none()
    }

    /// Whether the dataset has a backing slice for a category
    ///
    /// General needs no data and is always available.
    pub fn has_slice(&self, category: Category) -> bool {
        match category {
            Category::Revenue => self.revenue.is_some(),
            Category::Products => self.products.is_some(),
            Category::Customers => self.customers.is_some(),
            Category::Regions => self.regions.is_some(),
            Category::Trends => self.trends.is_some(),
            Category::General => true,
        }
    }

    /// Categories that can be grounded with data from this dataset
    pub fn available_categories(&self) -> Vec<Category> {
        Category::all()
            .iter()
            .copied()
            .filter(|c| self.has_slice(*c))
            .collect()
    }
}

/// Where the active dataset came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum DatasetSource {
    /// The sample document compiled into the binary
    Bundled,
    /// A document read from disk
    File(PathBuf),
    /// The hard-coded fallback
    Fallback,
}

/// Holds the dataset for the lifetime of a session
#[derive(Debug, Clone)]
pub struct SampleStore {
    dataset: Dataset,
    source: DatasetSource,
}

impl SampleStore {
    /// Load from a path if given, otherwise from the bundled document
    pub fn load(path: Option<&Path>) -> Self {
        match path {
            Some(p) => Self::from_path(p),
            None => Self::bundled(),
        }
    }

    /// Load the bundled sample document
    pub fn bundled() -> Self {
        match Dataset::from_json(BUNDLED_DATASET) {
            Ok(dataset) => {
                debug!("Loaded bundled sample dataset");
                Self {
                    dataset,
                    source: DatasetSource::Bundled,
                }
            }
            Err(e) => {
                warn!(error = %e, "Bundled sample dataset is invalid, using fallback");
                Self::fallback()
            }
        }
    }

    /// Load a dataset document from disk, substituting the fallback on failure
    pub fn from_path(path: &Path) -> Self {
        let loaded = fs::read_to_string(path)
            .map_err(Error::from)
            .and_then(|json| Dataset::from_json(&json));

        match loaded {
            Ok(dataset) => {
                debug!(path = %path.display(), "Loaded sample dataset");
                Self {
                    dataset,
                    source: DatasetSource::File(path.to_path_buf()),
                }
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to load sample dataset, using fallback"
                );
                Self::fallback()
            }
        }
    }

    /// Use the hard-coded fallback dataset
    pub fn fallback() -> Self {
        Self {
            dataset: Dataset::fallback(),
            source: DatasetSource::Fallback,
        }
    }

    /// Wrap an already-built dataset
    pub fn from_dataset(dataset: Dataset, source: DatasetSource) -> Self {
        Self { dataset, source }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }
}
