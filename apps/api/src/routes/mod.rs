pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::report::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Report API
        .route("/api/v1/reports/generate", post(handlers::handle_generate))
        .route(
            "/api/v1/reports/:session_id",
            get(handlers::handle_get_session).delete(handlers::handle_discard),
        )
        .route(
            "/api/v1/reports/:session_id/finalize",
            post(handlers::handle_finalize),
        )
        .route(
            "/api/v1/reports/:session_id/:section/:index",
            put(handlers::handle_edit_task),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::layout::{letter_page_config, weekly_report_template};
    use crate::llm_client::{LlmError, TextGenerator};
    use crate::render::report_file_name;
    use crate::report::models::sample_request;
    use crate::report::pipeline::testing::StubGenerator;
    use crate::report::session::SessionStore;

    fn app_state(generator: Arc<dyn TextGenerator>, output_dir: &std::path::Path) -> AppState {
        AppState {
            generator,
            sessions: SessionStore::new(),
            config: Config {
                google_api_key: None,
                output_dir: output_dir.to_path_buf(),
                port: 0,
                session_ttl: chrono::Duration::minutes(60),
                rust_log: "info".to_string(),
            },
            template: Arc::new(weekly_report_template()),
            page_config: letter_page_config(),
        }
    }

    async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        router.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn sample_body() -> Value {
        serde_json::to_value(sample_request()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let router = build_router(app_state(Arc::new(StubGenerator::always("x")), dir.path()));
        let response = send(&router, Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_generate_with_no_fields_is_rejected_before_generation() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Arc::new(StubGenerator::always("x"));
        let state = app_state(generator.clone(), dir.path());
        let sessions = state.sessions.clone();
        let router = build_router(state);

        let response = send(&router, Method::POST, "/api/v1/reports/generate", Some(json!({}))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(generator.recorded().is_empty());
        assert_eq!(sessions.len().await, 0);
    }

    #[tokio::test]
    async fn test_generate_edit_finalize_flow() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Arc::new(StubGenerator::always("Implemented login UI.\nWrote unit tests."));
        let state = app_state(generator, dir.path());
        let sessions = state.sessions.clone();
        let router = build_router(state);

        // Generate
        let response = send(&router, Method::POST, "/api/v1/reports/generate", Some(sample_body())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["work_done"], json!(["Implemented login UI.", "Wrote unit tests."]));
        assert_eq!(body["plans"], json!(["Implemented login UI.", "Wrote unit tests."]));
        let id = body["session_id"].as_str().unwrap().to_string();

        // Edit the second plan
        let response = send(
            &router,
            Method::PUT,
            &format!("/api/v1/reports/{id}/plans/2"),
            Some(json!({ "text": "Add password reset." })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["plans"], json!(["Implemented login UI.", "Add password reset."]));
        assert_eq!(body["work_done"][1], "Wrote unit tests.");

        // Finalize
        let response = send(&router, Method::POST, &format!("/api/v1/reports/{id}/finalize"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");

        let expected_name = report_file_name("Jane Doe", chrono::Local::now().date_naive());
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert!(disposition.contains(&expected_name), "{disposition}");

        let pdf = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
        assert_eq!(std::fs::read(dir.path().join(&expected_name)).unwrap(), pdf.to_vec());

        // Session is gone after finalize
        assert_eq!(sessions.len().await, 0);
        let response = send(&router, Method::GET, &format!("/api/v1/reports/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_finalize_with_control_character_in_name_downloads() {
        let dir = tempfile::tempdir().unwrap();
        let state = app_state(Arc::new(StubGenerator::always("A.")), dir.path());
        let sessions = state.sessions.clone();
        let router = build_router(state);

        let mut body = sample_body();
        body["student_name"] = json!("Jane\nDoe");
        let body = json_body(
            send(&router, Method::POST, "/api/v1/reports/generate", Some(body)).await,
        )
        .await;
        let id = body["session_id"].as_str().unwrap().to_string();

        let response = send(&router, Method::POST, &format!("/api/v1/reports/{id}/finalize"), None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let expected_name = report_file_name("Jane Doe", chrono::Local::now().date_naive());
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            format!("attachment; filename=\"{expected_name}\"").as_str()
        );
        assert!(dir.path().join(&expected_name).exists());
        assert_eq!(sessions.len().await, 0);
    }

    #[tokio::test]
    async fn test_edit_out_of_range_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let router = build_router(app_state(Arc::new(StubGenerator::always("Only one.")), dir.path()));

        let body = json_body(
            send(&router, Method::POST, "/api/v1/reports/generate", Some(sample_body())).await,
        )
        .await;
        let id = body["session_id"].as_str().unwrap().to_string();

        let response = send(
            &router,
            Method::PUT,
            &format!("/api/v1/reports/{id}/work_done/2"),
            Some(json!({ "text": "extra" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generation_failure_surfaces_and_opens_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Arc::new(StubGenerator::sequence(vec![Err(LlmError::Api {
            status: 403,
            message: "API key not valid.".to_string(),
        })]));
        let state = app_state(generator, dir.path());
        let sessions = state.sessions.clone();
        let router = build_router(state);

        let response = send(&router, Method::POST, "/api/v1/reports/generate", Some(sample_body())).await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "LLM_ERROR");
        assert!(body["error"]["message"].as_str().unwrap().contains("API key not valid."));
        assert_eq!(sessions.len().await, 0);
    }

    #[tokio::test]
    async fn test_failed_finalize_keeps_session() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"x").unwrap();
        let state = app_state(Arc::new(StubGenerator::always("A.")), &blocker);
        let sessions = state.sessions.clone();
        let router = build_router(state);

        let body = json_body(
            send(&router, Method::POST, "/api/v1/reports/generate", Some(sample_body())).await,
        )
        .await;
        let id = body["session_id"].as_str().unwrap().to_string();

        let response = send(&router, Method::POST, &format!("/api/v1/reports/{id}/finalize"), None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["error"]["code"], "RENDER_ERROR");
        assert_eq!(sessions.len().await, 1);
    }

    #[tokio::test]
    async fn test_discard_removes_session() {
        let dir = tempfile::tempdir().unwrap();
        let router = build_router(app_state(Arc::new(StubGenerator::always("A.")), dir.path()));

        let body = json_body(
            send(&router, Method::POST, "/api/v1/reports/generate", Some(sample_body())).await,
        )
        .await;
        let id = body["session_id"].as_str().unwrap().to_string();

        let response = send(&router, Method::DELETE, &format!("/api/v1/reports/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let response = send(&router, Method::DELETE, &format!("/api/v1/reports/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
