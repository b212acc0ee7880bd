use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use crate::bias::models::BiasAssessment;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DetectBiasRequest {
    pub query: String,
}

/// POST /api/detect-bias
///
/// Classification only. No retrieval, generation or session update.
pub async fn handle_detect_bias(
    State(state): State<AppState>,
    payload: Result<Json<DetectBiasRequest>, JsonRejection>,
) -> Result<Json<BiasAssessment>, AppError> {
    let Json(request) = payload?;
    let query = request.query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }

    Ok(Json(state.classifier.classify(query).await))
}
