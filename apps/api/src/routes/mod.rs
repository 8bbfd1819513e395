pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::cvs::handlers as cvs;
use crate::jobs::handlers as jobs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs API
        .route(
            "/api/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/jobs/:id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        // CV API
        .route("/api/cvs/process", post(cvs::handle_process_cv))
        .route("/api/cvs/ranking", get(cvs::handle_ranking))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::llm_client::{GenerationResponse, LlmError, TextGenerator};
    use crate::ocr::{OcrError, PageOcr};
    use crate::pipeline::{CvPipeline, PipelineConfig};
    use crate::scoring::MissingScorePolicy;

    struct NeverCalled;

    #[async_trait]
    impl TextGenerator for NeverCalled {
        async fn generate(&self, _prompt: &str) -> Result<GenerationResponse, LlmError> {
            panic!("generator must not be called");
        }
    }

    #[async_trait]
    impl PageOcr for NeverCalled {
        fn backend(&self) -> &'static str {
            "never"
        }

        async fn ocr_page(&self, _page_pdf: &[u8]) -> Result<String, OcrError> {
            panic!("ocr must not be called");
        }
    }

    /// Router over a pool that never connects: only requests rejected before
    /// any database access may be sent.
    fn test_router() -> Router {
        let config = Config {
            database_url: "postgres://unused@localhost/unused".to_string(),
            genai_api_key: "test".to_string(),
            vision_api_key: None,
            llm_model: "test-model".to_string(),
            llm_timeout_secs: 1,
            ocr_timeout_secs: 1,
            missing_score_policy: MissingScorePolicy::Zero,
            max_upload_bytes: 1024 * 1024,
            port: 0,
            rust_log: "info".to_string(),
        };
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        let pipeline = CvPipeline::new(
            Arc::new(NeverCalled),
            Arc::new(NeverCalled),
            PipelineConfig::default(),
        );
        build_router(AppState {
            db,
            pipeline,
            config,
        })
    }

    fn multipart_request(filename: &str, job_id: &str) -> Request<Body> {
        let boundary = "X-SMARTCV-BOUNDARY";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"job_id\"\r\n\r\n\
             {job_id}\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             %PDF-1.5 fake\r\n\
             --{boundary}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/api/cvs/process")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn oversized_request(job_id: &str, file_len: usize) -> Request<Body> {
        let boundary = "X-SMARTCV-BOUNDARY";
        let mut body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"job_id\"\r\n\r\n\
             {job_id}\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"cv.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n"
        )
        .into_bytes();
        body.extend(std::iter::repeat(b'x').take(file_len));
        body.extend(format!("\r\n--{boundary}--\r\n").into_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/cvs/process")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_ok() {
        let response = test_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_non_pdf_upload_rejected() {
        let job_id = uuid::Uuid::new_v4().to_string();
        let response = test_router()
            .oneshot(multipart_request("cv.docx", &job_id))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "Only PDF files are allowed");
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_payload_too_large() {
        let job_id = uuid::Uuid::new_v4().to_string();
        let response = test_router()
            .oneshot(oversized_request(&job_id, 2 * 1024 * 1024))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
        assert_eq!(
            body["error"]["message"],
            "Upload exceeds the maximum size of 1048576 bytes"
        );
    }

    #[tokio::test]
    async fn test_invalid_job_id_rejected() {
        let response = test_router()
            .oneshot(multipart_request("cv.pdf", "not-a-uuid"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_job_with_blank_title_rejected() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/jobs")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"title": "  ", "description": "Go backend"}"#))
            .unwrap();
        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["message"], "Title is required");
    }

    #[tokio::test]
    async fn test_get_job_with_malformed_id_rejected() {
        let response = test_router()
            .oneshot(Request::get("/api/jobs/not-a-uuid").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
