//! Rule-based recommendations derived from a context's data slice
//!
//! These complement narration: they are computed locally and attached to every
//! answer whether or not the model was reachable.

use super::types::{AnalysisContext, DataSlice};

/// Months growing slower than this prompt a marketing suggestion
pub const LOW_GROWTH_THRESHOLD: f64 = 5.0;

/// Segment satisfaction above this is worth leveraging for referrals
pub const REFERRAL_SATISFACTION_THRESHOLD: f64 = 4.8;

pub fn recommend(context: &AnalysisContext) -> Vec<String> {
    let mut recommendations = Vec::new();

    match &context.data {
        Some(DataSlice::Monthly(months)) => {
            if months.iter().any(|m| m.growth < LOW_GROWTH_THRESHOLD) {
                recommendations
                    .push("Consider marketing campaigns for months with lower growth".to_string());
            }
            recommendations.push("Focus on high-performing months for scaling strategies".to_string());
        }
        Some(DataSlice::Products(products)) => {
            let declining: Vec<&str> = products
                .iter()
                .filter(|p| p.growth < 0.0)
                .map(|p| p.name.as_str())
                .collect();
            if !declining.is_empty() {
                recommendations.push(format!(
                    "Review strategy for declining products: {}",
                    declining.join(", ")
                ));
            }
        }
        Some(DataSlice::Segments(segments)) => {
            for segment in segments
                .iter()
                .filter(|s| s.satisfaction > REFERRAL_SATISFACTION_THRESHOLD)
            {
                recommendations.push(format!(
                    "Leverage high {} satisfaction for case studies and referrals",
                    segment.name
                ));
            }
        }
        Some(DataSlice::Regions(_)) | Some(DataSlice::Trends(_)) | None => {}
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::classifier::Category;
    use crate::dataset::{Dataset, SampleStore};

    #[test]
    fn test_revenue_steady_growth() {
        let context = analyze(Category::Revenue, &Dataset::fallback()).unwrap();
        assert_eq!(
            recommend(&context),
            vec!["Focus on high-performing months for scaling strategies"]
        );
    }

    #[test]
    fn test_declining_products_named() {
        let context = analyze(Category::Products, &Dataset::fallback()).unwrap();
        assert_eq!(
            recommend(&context),
            vec!["Review strategy for declining products: Mobile App"]
        );
    }

    #[test]
    fn test_enterprise_referrals() {
        let store = SampleStore::bundled();
        let context = analyze(Category::Customers, store.dataset()).unwrap();
        assert_eq!(
            recommend(&context),
            vec!["Leverage high Enterprise satisfaction for case studies and referrals"]
        );
    }

    #[test]
    fn test_general_has_none() {
        let context = analyze(Category::General, &Dataset::default()).unwrap();
        assert!(recommend(&context).is_empty());
    }
}
