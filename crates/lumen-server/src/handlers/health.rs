//! Health handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use lumen_core::{BackendKind, DatasetSource, NarrationBackend};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backend: BackendKind,
    pub model: String,
    pub endpoint: String,
    /// Whether a question is currently in flight
    pub busy: bool,
    pub dataset: DatasetSource,
}

/// GET /api/health - Liveness plus narration settings
///
/// Does not contact the model endpoint; `lumen check` does that.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let client = state.pipeline.narrator().client();
    Json(HealthResponse {
        status: "ok",
        backend: client.kind(),
        model: client.model().to_string(),
        endpoint: client.endpoint().to_string(),
        busy: state.pipeline.is_busy(),
        dataset: state.pipeline.store().source().clone(),
    })
}
