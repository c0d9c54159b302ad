//! Dataset handlers - raw data, per-category overview, and chart payloads

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::{AppError, AppState};
use lumen_core::analysis::{outlook, recommend};
use lumen_core::{AnalysisContext, Category, ChartSpec, Dataset, DatasetSource, Outlook};

/// Response for the raw dataset
#[derive(Debug, Serialize)]
pub struct DatasetResponse {
    pub source: DatasetSource,
    /// Categories that can be grounded with data
    pub categories: Vec<Category>,
    pub data: Dataset,
}

/// One category's analysis without narration
#[derive(Debug, Serialize)]
pub struct CategoryOverview {
    pub category: Category,
    pub label: &'static str,
    pub context: AnalysisContext,
    pub outlook: Outlook,
    pub recommendations: Vec<String>,
    pub chart: Option<ChartSpec>,
}

/// GET /api/dataset - The loaded dataset and where it came from
pub async fn get_dataset(State(state): State<Arc<AppState>>) -> Json<DatasetResponse> {
    let store = state.pipeline.store();
    Json(DatasetResponse {
        source: store.source().clone(),
        categories: store.dataset().available_categories(),
        data: store.dataset().clone(),
    })
}

/// GET /api/overview - Analysis of every category that has data
///
/// Dashboard landing view. No narration is requested, so this never touches
/// the model endpoint.
pub async fn get_overview(State(state): State<Arc<AppState>>) -> Json<Vec<CategoryOverview>> {
    let overview = Category::all()
        .iter()
        .filter_map(|&category| {
            let context = state.pipeline.context_for(category)?;
            Some(CategoryOverview {
                category,
                label: category.label(),
                outlook: outlook(&context),
                recommendations: recommend(&context),
                chart: ChartSpec::from_context(&context),
                context,
            })
        })
        .collect();

    Json(overview)
}

/// GET /api/charts/:category - Chart payload for one category
pub async fn get_chart(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<ChartSpec>, AppError> {
    let category: Category = category
        .parse()
        .map_err(|_| AppError::bad_request("Unknown category"))?;

    let context = state
        .pipeline
        .context_for(category)
        .ok_or_else(|| AppError::not_found("No data for this category"))?;

    ChartSpec::from_context(&context)
        .map(Json)
        .ok_or_else(|| AppError::not_found("This category has no chart data"))
}
