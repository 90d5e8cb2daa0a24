mod analyze;
mod health;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

use bossreport_core::ReportPipeline;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ReportPipeline>,
}

pub fn create_router(pipeline: Arc<ReportPipeline>) -> Router {
    let state = AppState { pipeline };

    Router::new()
        .route("/boss_analyze", post(analyze::boss_analyze))
        .route("/health", get(health::health))
        .layer(CatchPanicLayer::custom(analyze::panic_response))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use bossreport_core::PipelineOptions;
    use bossreport_logging::{LogFormat, Logger};
    use bossreport_mailer::NoopMailer;
    use bossreport_narrative::{NarrativeError, NarrativeRequest, NarrativeRequester};

    struct EchoNarrator;

    #[async_trait]
    impl NarrativeRequester for EchoNarrator {
        fn name(&self) -> &str {
            "echo"
        }

        async fn request_narrative(
            &self,
            request: &NarrativeRequest,
        ) -> Result<String, NarrativeError> {
            Ok(format!("<p>{}</p>", request.kind))
        }
    }

    struct PanickingNarrator;

    #[async_trait]
    impl NarrativeRequester for PanickingNarrator {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn request_narrative(
            &self,
            _request: &NarrativeRequest,
        ) -> Result<String, NarrativeError> {
            panic!("narrator exploded");
        }
    }

    fn router() -> Router {
        router_with(Arc::new(EchoNarrator))
    }

    fn router_with(narrator: Arc<dyn NarrativeRequester>) -> Router {
        let pipeline = ReportPipeline::new(
            narrator,
            Arc::new(NoopMailer),
            Arc::new(Logger::new(LogFormat::Compact)),
            PipelineOptions::default(),
        );
        create_router(Arc::new(pipeline))
    }

    const VALID_BODY: &str = r#"{"position": "CTO", "experience": 20, "sector": "SaaS",
        "challenge": "Burnout", "focus": "Hiring", "country": "Singapore",
        "dob": "15/06/1980", "lang": "en"}"#;

    async fn post_json(body: &str) -> (StatusCode, Value) {
        post_json_to(router(), body).await
    }

    async fn post_json_to(router: Router, body: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri("/boss_analyze")
            .body(Body::from(body.to_string()))
            .unwrap();

        let resp = router.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_analyze_success() {
        let (status, body) = post_json(
            r#"{"position": "CTO", "experience": 20, "sector": "SaaS", "challenge": "Burnout",
                "focus": "Hiring", "country": "Singapore", "dob": "15/06/1980", "lang": "en"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let metrics = body["metrics"].as_array().unwrap();
        assert_eq!(metrics.len(), 3);
        assert_eq!(metrics[0]["title"], "Communication Efficiency");
        assert_eq!(
            metrics[0]["labels"],
            serde_json::json!(["Segment", "Regional", "Global"])
        );
        assert!(metrics[0].get("color").is_none());

        let analysis = body["analysis"].as_str().unwrap();
        assert!(analysis.contains("<p>global-analysis</p>"));
        assert!(analysis.contains("• Position: CTO<br>"));
    }

    #[tokio::test]
    async fn test_handler_panic_is_generic_500() {
        let router = router_with(Arc::new(PanickingNarrator));
        let (status, body) = post_json_to(router, VALID_BODY).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "An unexpected error occurred");
    }

    #[tokio::test]
    async fn test_missing_required_field() {
        let (status, body) = post_json(
            r#"{"position": "CTO", "experience": "20", "sector": "SaaS", "challenge": "Burnout",
                "focus": "Hiring"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required field: country");
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let (status, body) = post_json("{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid JSON payload"));
    }

    #[tokio::test]
    async fn test_cors_headers_present() {
        let req = Request::builder()
            .uri("/health")
            .header("origin", "https://widget.example.com")
            .body(Body::empty())
            .unwrap();
        let resp = router().oneshot(req).await.unwrap();
        assert_eq!(
            resp.headers()
                .get("access-control-allow-origin")
                .map(|v| v.to_str().unwrap()),
            Some("*")
        );
    }
}
