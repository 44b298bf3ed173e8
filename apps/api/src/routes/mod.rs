pub mod health;
pub mod metrics;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

/// Upper bound for a multipart CV upload.
const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/stats", get(metrics::stats_handler))
        // Analysis API
        .route("/api/v1/catalog", get(handlers::handle_get_catalog))
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .route(
            "/api/v1/analyze/upload",
            post(handlers::handle_analyze_upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/api/v1/analyze/cover-letter-tips",
            post(handlers::handle_cover_letter_tips),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::analysis::MatchEngine;
    use crate::catalog::SkillCatalog;
    use crate::config::Config;
    use crate::telemetry::{LogTracker, MetricsCollector};

    const CV: &str = "Experienced software engineer with 5 years in Python, React, Docker, \
                      AWS, machine learning and agile methodologies.";
    const JOB: &str = "Looking for a developer with Python, React, Kubernetes, Docker, AWS \
                       and machine learning experience in an agile team.";

    fn test_state() -> AppState {
        AppState {
            engine: Arc::new(MatchEngine::new(Arc::new(SkillCatalog::default_catalog()))),
            enhancer: None,
            metrics: Arc::new(MetricsCollector::new()),
            tracker: Arc::new(LogTracker),
            config: Config::default(),
        }
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(build_router(test_state()), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "skillmatch");
    }

    #[tokio::test]
    async fn test_analyze_returns_report() {
        let (status, body) = send(
            build_router(test_state()),
            post_json("/api/v1/analyze", json!({ "cv_text": CV, "job_text": JOB })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["result"]["missing_skills"], json!(["kubernetes"]));
        assert!(body["result"]["match_percentage"].as_f64().unwrap() > 50.0);
        assert_eq!(body["ai_enhanced"], false);
        assert!(body.get("enhancement").is_none());
        assert!(body["summary"].as_str().unwrap().contains("kubernetes"));
    }

    #[tokio::test]
    async fn test_analyze_without_enhancer_reports_unavailable() {
        let (status, body) = send(
            build_router(test_state()),
            post_json(
                "/api/v1/analyze",
                json!({ "cv_text": CV, "job_text": JOB, "use_ai_enhancement": true }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["enhancement"]["status"], "unavailable");
        assert_eq!(body["enhancement"]["message"], "AI enhancement not available");
    }

    #[tokio::test]
    async fn test_analyze_rejects_blank_input() {
        let (status, body) = send(
            build_router(test_state()),
            post_json("/api/v1/analyze", json!({ "cv_text": "  ", "job_text": JOB })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(
            body["error"]["message"],
            "Please provide both CV text and job description."
        );
    }

    #[tokio::test]
    async fn test_analyze_updates_stats_and_metrics() {
        let state = test_state();
        let app = build_router(state.clone());

        let (status, _) = send(
            app.clone(),
            post_json("/api/v1/analyze", json!({ "cv_text": CV, "job_text": JOB })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(app.clone(), get("/stats")).await;
        let stats: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(stats["total_analyses"], 1);

        let response = app.oneshot(get("/metrics")).await.unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
        let text = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(text.to_vec()).unwrap();
        assert!(text.contains("cv_analysis_total{status=\"success\"} 1"));
        assert!(text.contains("# TYPE system_cpu_usage_percent gauge"));
        assert!(text.contains("# TYPE system_memory_usage_percent gauge"));
    }

    #[tokio::test]
    async fn test_cover_letter_tips_without_enhancer() {
        let (status, body) = send(
            build_router(test_state()),
            post_json(
                "/api/v1/analyze/cover-letter-tips",
                json!({ "cv_text": CV, "job_text": JOB }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["tips"], "AI enhancement not available");
    }

    #[tokio::test]
    async fn test_catalog_lists_categories_in_order() {
        let (status, body) = send(build_router(test_state()), get("/api/v1/catalog")).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["categories"][0]["name"], "technical_skills");
        assert!(body["total_terms"].as_u64().unwrap() > 0);

        let expected = SkillCatalog::default_catalog();
        assert_eq!(body["terms"], json!(expected.all_terms()));
        assert_eq!(
            body["terms"].as_array().unwrap().len() as u64,
            body["total_terms"].as_u64().unwrap()
        );
    }

    #[tokio::test]
    async fn test_upload_without_cv_is_rejected() {
        let boundary = "XBOUNDARY";
        let payload = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"job_text\"\r\n\r\n{JOB}\r\n--{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/analyze/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(payload))
            .unwrap();

        let (status, _) = send(build_router(test_state()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_with_truncated_flag_field_is_rejected() {
        let boundary = "XBOUNDARY";
        let payload = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"use_ai_enhancement\"\r\n\r\ntru"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/analyze/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(payload))
            .unwrap();

        let (status, body) = send(build_router(test_state()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("use_ai_enhancement"));
    }
}
