//! Question handlers - the pipeline entry point and conversation history

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::debug;

use crate::{AppError, AppState, SuccessResponse};
use lumen_core::{Analysis, LogEntry, PromptId, Submission};

/// Request body for asking a question
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub question: String,
    /// Prompt kind: analysis (default), predictive or benchmark
    #[serde(default)]
    pub mode: Option<String>,
}

/// POST /api/analyze - Run one question through the pipeline
///
/// Answers 409 while another question is in flight and 400 for a blank
/// question. Narration failures are not errors: the body then carries the
/// built-in fallback narration.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<Analysis>, AppError> {
    let prompt = match request.mode.as_deref() {
        Some(mode) => mode.parse::<PromptId>().map_err(|_| {
            AppError::bad_request("Unknown mode (expected analysis, predictive or benchmark)")
        })?,
        None => PromptId::default(),
    };

    debug!(prompt = %prompt, "Analyze request");

    match state.pipeline.submit_with(&request.question, prompt).await {
        Submission::Completed(analysis) => Ok(Json(*analysis)),
        Submission::Busy => Err(AppError::conflict(
            "Another question is being analyzed, try again shortly",
        )),
        Submission::Empty => Err(AppError::bad_request("Question must not be empty")),
    }
}

/// GET /api/history - Recent questions and answers, oldest first
pub async fn get_history(State(state): State<Arc<AppState>>) -> Json<Vec<LogEntry>> {
    Json(state.pipeline.history().await)
}

/// DELETE /api/history - Forget the conversation
pub async fn clear_history(State(state): State<Arc<AppState>>) -> Json<SuccessResponse> {
    state.pipeline.clear_history().await;
    Json(SuccessResponse { success: true })
}
