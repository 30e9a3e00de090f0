pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::cache::handlers as jobs;
use crate::context::handlers as context;
use crate::resume::MAX_DOCUMENT_BYTES;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;

/// Room for the form fields around a maximum-size document, so a slightly
/// oversized file still reaches the size check and gets a proper error.
const UPLOAD_BODY_LIMIT: usize = MAX_DOCUMENT_BYTES + 2 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Context API
        .route(
            "/api/v1/context",
            get(context::handle_list_context).post(context::handle_add_context),
        )
        .route(
            "/api/v1/context/categories",
            get(context::handle_categories),
        )
        .route(
            "/api/v1/context/:id",
            patch(context::handle_update_context).delete(context::handle_delete_context),
        )
        // Tailoring API
        .route("/api/v1/tailor", post(tailoring::handle_tailor))
        .route("/api/v1/resume/assess", post(tailoring::handle_assess))
        .route("/api/v1/insights", post(tailoring::handle_insights))
        // Job history
        .route("/api/v1/jobs", get(jobs::handle_history))
        .route("/api/v1/jobs/similar", get(jobs::handle_similar))
        .route(
            "/api/v1/jobs/:id",
            axum::routing::delete(jobs::handle_delete_job),
        )
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::PipelineConfig;
    use crate::db::Database;
    use crate::llm_client::scripted::ScriptedModel;
    use crate::resume::extract::tests::docx_fixture;
    use crate::tailoring::TailoringPipeline;

    const BOUNDARY: &str = "tailor-test-boundary";

    async fn app(model: ScriptedModel) -> (Arc<ScriptedModel>, Router) {
        let db = Database::in_memory().await.unwrap();
        let model = Arc::new(model);
        let pipeline = TailoringPipeline::new(db, model.clone(), PipelineConfig::default());
        (model, build_router(AppState::new(pipeline)))
    }

    fn tailor_reply() -> String {
        json!({
            "optimized_resume_text": "Experience\nBackend Engineer at Initech",
            "change_list": [],
            "keywords": ["Go"],
            "suggestions": ["Add metrics"],
            "confidence_score": 0.6
        })
        .to_string()
    }

    fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, Vec<u8>)>) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((filename, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(&bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn resume_file() -> Vec<u8> {
        docx_fixture(&[
            "Experience",
            "Backend Engineer at Initech",
            "• Built billing APIs",
            "• Ran on-call",
            "",
            "Skills",
            "Python, SQL, Docker",
        ])
    }

    #[tokio::test]
    async fn test_health() {
        let (_, app) = app(ScriptedModel::default()).await;
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_context_crud() {
        let (_, app) = app(ScriptedModel::default()).await;

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/context",
                json!({"category": "skill", "content": "Go"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let id = json_body(response).await["id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PATCH,
                &format!("/api/v1/context/{id}"),
                json!({"content": "Go, 5 years"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["content"], "Go, 5 years");

        let response = app
            .clone()
            .oneshot(
                Request::get("/api/v1/context?category=skill")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(json_body(response).await.as_array().unwrap().len(), 1);

        let response = app
            .clone()
            .oneshot(
                Request::delete(format!("/api/v1/context/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(json_request(
                Method::PATCH,
                &format!("/api/v1/context/{id}"),
                json!({"content": "again"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_tailor_then_cached() {
        let (model, app) = app(ScriptedModel::replying(tailor_reply())).await;
        let fields = [
            ("job_title", "Backend Engineer"),
            ("company", "Acme"),
            ("description", "Go services"),
            ("focus", "skills,keywords"),
        ];

        for expected_cached in [false, true] {
            let response = app
                .clone()
                .oneshot(multipart_request(
                    "/api/v1/tailor",
                    multipart_body(&fields, Some(("cv.docx", resume_file()))),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body = json_body(response).await;
            assert_eq!(body["from_cache"], expected_cached);
            assert_eq!(body["result"]["keyword_coverage"]["Go"], false);
            assert!(body["change_summary"]
                .as_str()
                .unwrap()
                .contains("Uncovered keywords: Go"));
        }
        assert_eq!(model.calls(), 1);

        let response = app
            .oneshot(Request::get("/api/v1/jobs").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(json_body(response).await.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_tailor_rejects_unsupported_format() {
        let (model, app) = app(ScriptedModel::replying(tailor_reply())).await;
        let fields = [
            ("job_title", "Backend Engineer"),
            ("company", "Acme"),
            ("description", "Go services"),
        ];
        let response = app
            .oneshot(multipart_request(
                "/api/v1/tailor",
                multipart_body(&fields, Some(("cv.txt", b"plain text".to_vec()))),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(json_body(response).await["error"]["code"], "UNSUPPORTED_FORMAT");
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_429() {
        let (_, app) = app(ScriptedModel::new([Err(
            crate::llm_client::LlmError::RateLimited {
                retry_after: Some(std::time::Duration::from_secs(20)),
            },
        )]))
        .await;
        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/v1/insights",
                json!({"job_title": "Engineer", "company": "Acme", "description": "Go"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "20");
    }

    #[tokio::test]
    async fn test_insights_rejects_zero_timeout() {
        let (model, app) = app(ScriptedModel::default()).await;
        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/v1/insights",
                json!({
                    "job_title": "Engineer",
                    "company": "Acme",
                    "description": "Go",
                    "timeout_secs": 0
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_assess_resume() {
        let (_, app) = app(ScriptedModel::default()).await;
        let response = app
            .oneshot(multipart_request(
                "/api/v1/resume/assess",
                multipart_body(&[], Some(("cv.docx", resume_file()))),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["assessment"]["has_experience"], true);
        assert_eq!(body["assessment"]["has_skills"], true);
        assert_eq!(body["document"]["sections"].as_array().unwrap().len(), 2);
    }
}
