pub mod auth;
pub mod health;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::bias::handlers::handle_detect_bias;
use crate::chat::handlers::{handle_query, handle_session_history};
use crate::corpus::handlers::{handle_search_jobs, handle_upcoming_sessions};
use crate::errors::AppError;
use crate::state::AppState;

async fn not_found() -> AppError {
    AppError::NotFound("No such route".to_string())
}

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/query", post(handle_query))
        .route("/api/history/:session_id", get(handle_session_history))
        .route("/api/jobs", get(handle_search_jobs))
        .route("/api/sessions", get(handle_upcoming_sessions))
        .route("/api/detect-bias", post(handle_detect_bias))
        .route_layer(from_fn_with_state(state.clone(), auth::require_api_key));

    Router::new()
        .route("/", get(health::root_handler))
        .route("/api/healthcheck", get(health::health_handler))
        .merge(protected)
        .fallback(not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::chat::prompts::DEGRADED_RESPONSE;
    use crate::testing::{test_state, ScriptedBackend, TEST_API_KEY};

    const GENERATED: &str = "Here is what I found for you.";

    fn app() -> Router {
        build_router(test_state(Arc::new(
            ScriptedBackend::new().with_text(GENERATED),
        )))
    }

    fn get_request(uri: &str, key: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(key) = key {
            builder = builder.header("api-key", key);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, key: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("x-api-key", key)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_healthcheck_is_public() {
        let response = app()
            .oneshot(get_request("/api/healthcheck", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_protected_routes_require_key() {
        for uri in ["/api/sessions", "/api/jobs?query=engineer"] {
            let missing = app().oneshot(get_request(uri, None)).await.unwrap();
            assert_eq!(missing.status(), StatusCode::UNAUTHORIZED, "{uri}");

            let wrong = app().oneshot(get_request(uri, Some("nope"))).await.unwrap();
            assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = app()
            .oneshot(get_request("/api/unknown", Some(TEST_API_KEY)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_query_generates_and_assigns_session() {
        let response = app()
            .oneshot(post_json(
                "/api/query",
                TEST_API_KEY,
                r#"{"query": "Show me data scientist jobs"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["response"], GENERATED);
        assert_eq!(body["has_bias"], false);
        assert!(body.get("bias_info").is_none());
        assert!(body["session_id"].as_str().unwrap().starts_with("session_"));
        assert_eq!(
            body["job_recommendations"][0]["job_title"],
            "Data Scientist"
        );
        assert!(body["job_recommendations"][0]["relevance_score"].is_number());
    }

    #[tokio::test]
    async fn test_query_with_bias_returns_bias_info() {
        let response = app()
            .oneshot(post_json(
                "/api/query",
                TEST_API_KEY,
                r#"{"query": "Are women capable of being good engineers?", "session_id": "s-1"}"#,
            ))
            .await
            .unwrap();
        let body = json_body(response).await;

        assert_eq!(body["session_id"], "s-1");
        assert_eq!(body["has_bias"], true);
        assert_eq!(body["bias_info"]["bias_type"], "capability_bias");
        assert_eq!(body["bias_info"]["severity"], "high");
        assert_eq!(body["bias_info"]["detection_method"], "lexical");
        assert_ne!(body["response"], DEGRADED_RESPONSE);
    }

    #[tokio::test]
    async fn test_query_uses_stored_transcript_when_history_omitted() {
        let backend = Arc::new(ScriptedBackend::new().with_text(GENERATED));
        let app = build_router(test_state(backend.clone()));

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(post_json(
                    "/api/query",
                    TEST_API_KEY,
                    r#"{"query": "Product manager roles", "session_id": "s-2"}"#,
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let calls = backend.calls();
        let last = calls.iter().rev().find(|c| !c.params.json_mode).unwrap();
        // system + one prior turn + current turn
        assert_eq!(last.messages.len(), 4);
        assert_eq!(last.messages[1].content, "Product manager roles");
        assert_eq!(last.messages[2].content, GENERATED);
    }

    #[tokio::test]
    async fn test_history_returns_transcript_or_404() {
        let app = app();
        let missing = app
            .clone()
            .oneshot(get_request("/api/history/s-3", Some(TEST_API_KEY)))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        app.clone()
            .oneshot(post_json(
                "/api/query",
                TEST_API_KEY,
                r#"{"query": "Content writer jobs", "session_id": "s-3"}"#,
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(get_request("/api/history/s-3", Some(TEST_API_KEY)))
            .await
            .unwrap();
        let body = json_body(response).await;
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[1]["content"], GENERATED);
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected() {
        let response = app()
            .oneshot(post_json("/api/query", TEST_API_KEY, r#"{"query": "  "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_jobs_search_respects_limit() {
        let response = app()
            .oneshot(get_request(
                "/api/jobs?query=manager&limit=2",
                Some(TEST_API_KEY),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_jobs_limit_zero_returns_one_result() {
        let response = app()
            .oneshot(get_request(
                "/api/jobs?query=manager&limit=0",
                Some(TEST_API_KEY),
            ))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_history_role_gets_error_envelope() {
        let response = app()
            .oneshot(post_json(
                "/api/query",
                TEST_API_KEY,
                r#"{"query": "Data scientist jobs", "chat_history": [{"role": "bot", "content": "hi"}]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_detect_bias_without_query_field_gets_error_envelope() {
        let response = app()
            .oneshot(post_json("/api/detect-bias", TEST_API_KEY, r#"{"text": "hello"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_jobs_search_requires_query() {
        let response = app()
            .oneshot(get_request("/api/jobs", Some(TEST_API_KEY)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_sessions_lists_upcoming_events() {
        let response = app()
            .oneshot(get_request("/api/sessions?limit=3", Some(TEST_API_KEY)))
            .await
            .unwrap();
        let body = json_body(response).await;
        let sessions = body["sessions"].as_array().unwrap();
        assert_eq!(sessions.len(), 3);
        assert_eq!(sessions[0]["name"], "Women in Tech Leadership Summit");
        assert!(sessions[0].get("relevance_score").is_none());
    }

    #[tokio::test]
    async fn test_detect_bias_classifies_without_generation() {
        let backend = Arc::new(ScriptedBackend::new().with_text(GENERATED));
        let app = build_router(test_state(backend.clone()));
        let response = app
            .oneshot(post_json(
                "/api/detect-bias",
                TEST_API_KEY,
                r#"{"query": "What are suitable jobs for women?"}"#,
            ))
            .await
            .unwrap();
        let body = json_body(response).await;

        assert_eq!(body["has_bias"], true);
        assert_eq!(body["bias_type"], "role_limitation_bias");
        assert_eq!(body["severity"], "medium");
        assert_eq!(body["original_query"], "What are suitable jobs for women?");
        assert_eq!(backend.generation_calls(), 0);
    }
}
