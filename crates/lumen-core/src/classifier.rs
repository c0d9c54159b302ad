//! Query Classifier
//!
//! Maps a free-text question to one of a closed set of analysis categories.
//! Keyword tables are checked in priority order and the first table with a
//! hit wins, so "revenue trend" is a Revenue question.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Analysis topics a question can be routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Revenue,
    Products,
    Customers,
    Regions,
    Trends,
    /// No keyword matched; data-independent overview
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Revenue => "revenue",
            Category::Products => "products",
            Category::Customers => "customers",
            Category::Regions => "regions",
            Category::Trends => "trends",
            Category::General => "general",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Category::Revenue => "Revenue",
            Category::Products => "Products",
            Category::Customers => "Customers",
            Category::Regions => "Regions",
            Category::Trends => "Trends",
            Category::General => "General",
        }
    }

    /// All categories, in classification priority order
    pub fn all() -> &'static [Category] {
        &[
            Category::Revenue,
            Category::Products,
            Category::Customers,
            Category::Regions,
            Category::Trends,
            Category::General,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "revenue" => Ok(Category::Revenue),
            "products" | "product" => Ok(Category::Products),
            "customers" | "customer" => Ok(Category::Customers),
            "regions" | "region" => Ok(Category::Regions),
            "trends" | "trend" => Ok(Category::Trends),
            "general" => Ok(Category::General),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// Keyword table, in priority order. General is the implicit last entry.
const KEYWORD_TABLE: &[(Category, &[&str])] = &[
    (Category::Revenue, &["revenue", "sales"]),
    (Category::Products, &["product", "performance"]),
    (Category::Customers, &["customer", "satisfaction"]),
    (Category::Regions, &["region", "geographic"]),
    (Category::Trends, &["trend", "growth"]),
];

/// Keywords that route a question to `category` (empty for General)
pub fn keywords(category: Category) -> &'static [&'static str] {
    KEYWORD_TABLE
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, words)| *words)
        .unwrap_or(&[])
}

/// Classify a question into a category
///
/// Matching is case-insensitive substring search, so "Products" and
/// "product-level" both hit the Products table.
pub fn classify(question: &str) -> Category {
    let lowered = question.to_lowercase();

    KEYWORD_TABLE
        .iter()
        .find(|(_, words)| words.iter().any(|w| lowered.contains(w)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::General)
}
