//! Axum route handlers for the conversation API.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::models::{Query, ResponseBundle, Turn};
use crate::errors::AppError;
use crate::llm_client::ChatMessage;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    pub session_id: Option<String>,
    /// Client-held transcript. When absent, the server-side transcript of the
    /// session is used instead.
    pub chat_history: Option<Vec<ChatMessage>>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub bundle: ResponseBundle,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/query
///
/// Runs the full pipeline. Pipeline failures still answer 200 with the
/// degraded response; only a blank query is rejected.
pub async fn handle_query(
    State(state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, AppError> {
    let Json(request) = payload?;
    if request.query.trim().is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }

    let session_id = request
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(new_session_id);

    let history = match request.chat_history {
        Some(messages) => Turn::pair(&messages),
        None => Turn::pair(&state.sessions.get_or_create(&session_id).await),
    };

    let query = Query {
        text: request.query,
        session_id,
        history,
    };

    let bundle = state
        .orchestrator
        .process(&query)
        .await
        .ok_or_else(|| AppError::Validation("query cannot be empty".to_string()))?;

    Ok(Json(QueryResponse {
        session_id: query.session_id,
        bundle,
    }))
}

/// GET /api/history/:session_id
///
/// The stored transcript of a session, oldest message first.
pub async fn handle_session_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<HistoryResponse>, AppError> {
    let messages = state
        .sessions
        .read(&session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;

    Ok(Json(HistoryResponse {
        session_id,
        messages,
    }))
}

fn new_session_id() -> String {
    format!("session_{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_ids_are_prefixed_and_unique() {
        let a = new_session_id();
        let b = new_session_id();
        assert!(a.starts_with("session_"));
        assert_eq!(a.len(), "session_".len() + 32);
        assert_ne!(a, b);
    }

    #[test]
    fn test_request_accepts_role_tagged_history() {
        let request: QueryRequest = serde_json::from_str(
            r#"{"query": "jobs", "chat_history": [
                {"role": "user", "content": "hi"},
                {"role": "assistant", "content": "hello"}
            ]}"#,
        )
        .unwrap();
        assert!(request.session_id.is_none());
        assert_eq!(Turn::pair(&request.chat_history.unwrap()).len(), 1);
    }
}
