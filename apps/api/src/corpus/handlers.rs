use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::{EventRecord, JobRecord, Ranked};
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 5;
const MAX_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct JobSearchParams {
    pub query: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SessionsResponse {
    pub sessions: Vec<Ranked<EventRecord>>,
}

fn clamp_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// GET /api/jobs?query=&limit=
pub async fn handle_search_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobSearchParams>,
) -> Result<Json<Vec<Ranked<JobRecord>>>, AppError> {
    let query = params.query.unwrap_or_default();
    if query.trim().is_empty() {
        return Err(AppError::Validation("query parameter is required".to_string()));
    }

    let limit = clamp_limit(params.limit);
    info!(limit, "Searching jobs");
    Ok(Json(state.jobs.retrieve(&query, limit).await))
}

/// GET /api/sessions?limit=
///
/// Upcoming community events in calendar order.
pub async fn handle_upcoming_sessions(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Json<SessionsResponse> {
    let limit = clamp_limit(params.limit);
    info!(limit, "Listing upcoming sessions");
    Json(SessionsResponse {
        sessions: state.events.upcoming(Utc::now().date_naive(), limit),
    })
}
