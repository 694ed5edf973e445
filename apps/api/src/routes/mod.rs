pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/analyze", post(handlers::handle_analyze))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::scoring::{KeywordMatchScorer, MatchResult, MatchScorer};
    use crate::analysis::skills::SkillCatalog;
    use crate::config::Config;
    use crate::extraction::docx::build_docx;
    use crate::extraction::{DocumentExtractor, DocxExtractor, ExtractionError, DOCX_MIME};

    const BOUNDARY: &str = "X-RESUME-MATCH-BOUNDARY";

    enum Part<'a> {
        Text(&'a str, &'a str),
        File {
            name: &'a str,
            file_name: &'a str,
            content_type: &'a str,
            bytes: Vec<u8>,
        },
    }

    fn multipart_body(parts: Vec<Part<'_>>) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File {
                    name,
                    file_name,
                    content_type,
                    bytes,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                             Content-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(&bytes);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn docx_part(paragraphs: &[&str]) -> Part<'static> {
        Part::File {
            name: "resume",
            file_name: "resume.docx",
            content_type: DOCX_MIME,
            bytes: build_docx(paragraphs),
        }
    }

    /// Fails every extraction, recording whether the temp file existed at the time.
    #[derive(Default)]
    struct FailingExtractor {
        seen: Mutex<Option<(PathBuf, bool)>>,
    }

    #[async_trait]
    impl DocumentExtractor for FailingExtractor {
        async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
            *self.seen.lock().unwrap() = Some((path.to_path_buf(), path.exists()));
            Err(ExtractionError::MissingDocumentPart("word/document.xml"))
        }
    }

    struct PanickingScorer;

    impl MatchScorer for PanickingScorer {
        fn score(&self, _resume: &str, _requirements: &str) -> MatchResult {
            panic!("scorer blew up");
        }
    }

    struct TestApp {
        router: Router,
        upload_dir: TempDir,
    }

    impl TestApp {
        fn with(
            extractor: Arc<dyn DocumentExtractor>,
            scorer: Option<Arc<dyn MatchScorer>>,
        ) -> Self {
            Self::build(extractor, scorer, 1024 * 1024)
        }

        fn with_upload_limit(max_upload_bytes: usize) -> Self {
            Self::build(Arc::new(DocxExtractor), None, max_upload_bytes)
        }

        fn build(
            extractor: Arc<dyn DocumentExtractor>,
            scorer: Option<Arc<dyn MatchScorer>>,
            max_upload_bytes: usize,
        ) -> Self {
            let upload_dir = tempfile::tempdir().unwrap();
            let config = Config {
                port: 0,
                rust_log: "info".to_string(),
                upload_dir: upload_dir.path().to_path_buf(),
                max_upload_bytes,
            };
            let scorer: Arc<dyn MatchScorer> = match scorer {
                Some(scorer) => scorer,
                None => Arc::new(KeywordMatchScorer::new(SkillCatalog::builtin().unwrap())),
            };
            let router = build_router(AppState {
                config,
                scorer,
                extractor,
            });
            Self { router, upload_dir }
        }

        fn new() -> Self {
            Self::with(Arc::new(DocxExtractor), None)
        }

        async fn analyze(&self, parts: Vec<Part<'_>>) -> (StatusCode, Value) {
            self.post_raw(multipart_body(parts)).await
        }

        async fn post_raw(&self, body: Vec<u8>) -> (StatusCode, Value) {
            let request = Request::builder()
                .method("POST")
                .uri("/api/analyze")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap();
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            (status, serde_json::from_slice(&body).unwrap())
        }

        fn uploads_left(&self) -> usize {
            std::fs::read_dir(self.upload_dir.path()).unwrap().count()
        }
    }

    #[tokio::test]
    async fn test_health_reports_ok() {
        let app = TestApp::new();
        let response = app
            .router
            .clone()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "OK");
        assert_eq!(json["message"], "Resume Match Analyzer API is running");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_analyze_end_to_end() {
        let app = TestApp::new();
        let (status, json) = app
            .analyze(vec![
                docx_part(&["Worked 6 years with React and Express"]),
                Part::Text(
                    "requirements",
                    "5+ years of React and Node.js experience required",
                ),
            ])
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        let analysis = &json["analysis"];
        assert_eq!(analysis["skillMatches"]["matchedList"][0], "react");
        assert_eq!(analysis["skillMatches"]["missingList"][0], "node.js");
        assert_eq!(analysis["experienceMatch"]["required"], 5);
        assert_eq!(analysis["experienceMatch"]["found"], 6);
        assert_eq!(analysis["experienceMatch"]["meets"], true);
        assert_eq!(analysis["overallScore"], 46);
        assert_eq!(analysis["recommendation"]["level"], "Moderate Match");
        assert_eq!(app.uploads_left(), 0);
    }

    #[tokio::test]
    async fn test_blank_requirements_rejected_before_scoring() {
        let app = TestApp::with(Arc::new(DocxExtractor), Some(Arc::new(PanickingScorer)));
        let (status, json) = app
            .analyze(vec![
                docx_part(&["Rust developer"]),
                Part::Text("requirements", "   \n "),
            ])
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(json["error"]["message"], "Job requirements are required");
        assert_eq!(app.uploads_left(), 0);
    }

    #[tokio::test]
    async fn test_missing_requirements_field_rejected() {
        let app = TestApp::new();
        let (status, json) = app.analyze(vec![docx_part(&["Rust developer"])]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "Job requirements are required");
    }

    #[tokio::test]
    async fn test_missing_resume_rejected() {
        let app = TestApp::new();
        let (status, json) = app
            .analyze(vec![Part::Text("requirements", "Rust")])
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "No resume file uploaded");
    }

    #[tokio::test]
    async fn test_non_docx_upload_rejected() {
        let app = TestApp::new();
        let (status, json) = app
            .analyze(vec![
                Part::File {
                    name: "resume",
                    file_name: "resume.pdf",
                    content_type: "application/pdf",
                    bytes: b"%PDF-1.7".to_vec(),
                },
                Part::Text("requirements", "Rust"),
            ])
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "Only .docx files are allowed");
        assert_eq!(app.uploads_left(), 0);
    }

    #[tokio::test]
    async fn test_extraction_failure_cleans_up_temp_file() {
        let extractor = Arc::new(FailingExtractor::default());
        let app = TestApp::with(extractor.clone(), None);
        let (status, json) = app
            .analyze(vec![
                docx_part(&["irrelevant"]),
                Part::Text("requirements", "Rust"),
            ])
            .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["code"], "EXTRACTION_ERROR");
        assert!(json["error"]["details"]
            .as_str()
            .unwrap()
            .starts_with("Failed to extract text from resume:"));
        assert!(json.get("analysis").is_none());

        let (path, existed) = extractor.seen.lock().unwrap().clone().unwrap();
        assert!(existed, "temp file should exist while extracting");
        assert!(!path.exists());
        assert_eq!(app.uploads_left(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_docx_is_extraction_error() {
        let app = TestApp::new();
        let (status, json) = app
            .analyze(vec![
                Part::File {
                    name: "resume",
                    file_name: "resume.docx",
                    content_type: DOCX_MIME,
                    bytes: b"not really a zip".to_vec(),
                },
                Part::Text("requirements", "Rust"),
            ])
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["code"], "EXTRACTION_ERROR");
        assert_eq!(app.uploads_left(), 0);
    }

    #[tokio::test]
    async fn test_scoring_panic_is_internal_error() {
        let app = TestApp::with(Arc::new(DocxExtractor), Some(Arc::new(PanickingScorer)));
        let (status, json) = app
            .analyze(vec![
                docx_part(&["Rust developer"]),
                Part::Text("requirements", "Rust"),
            ])
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(app.uploads_left(), 0);
    }

    #[tokio::test]
    async fn test_upload_over_body_limit_is_rejected() {
        let app = TestApp::with_upload_limit(1000);
        let (status, json) = app
            .analyze(vec![
                Part::File {
                    name: "resume",
                    file_name: "resume.docx",
                    content_type: DOCX_MIME,
                    bytes: vec![b'x'; 5000],
                },
                Part::Text("requirements", "Rust"),
            ])
            .await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json["error"]["code"], "INVALID_UPLOAD");
        assert_eq!(app.uploads_left(), 0);
    }

    #[tokio::test]
    async fn test_truncated_multipart_body_is_rejected() {
        let app = TestApp::new();
        let mut body = multipart_body(vec![docx_part(&["Rust developer"])]);
        // drop the closing boundary and the tail of the file data
        body.truncate(body.len() - 40);

        let (status, json) = app.post_raw(body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "INVALID_UPLOAD");
        assert_eq!(app.uploads_left(), 0);
    }
}
