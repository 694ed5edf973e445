//! Axum route handler for the Analyze API.

use anyhow::{anyhow, Context};
use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::scoring::MatchResult;
use crate::errors::AppError;
use crate::extraction::{TempUpload, DOCX_MIME};
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";
const REQUIREMENTS_FIELD: &str = "requirements";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: MatchResult,
}

struct UploadedResume {
    file_name: String,
    content_type: Option<String>,
    bytes: Bytes,
}

/// Validated form: a `.docx` payload and non-blank requirements.
struct AnalyzeForm {
    resume: UploadedResume,
    requirements: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Form parsing
// ────────────────────────────────────────────────────────────────────────────

fn is_docx(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case(DOCX_MIME))
        .unwrap_or(false)
}

async fn read_form(multipart: &mut Multipart) -> Result<AnalyzeForm, AppError> {
    let mut resume = None;
    let mut requirements = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(RESUME_FIELD) => {
                let file_name = field.file_name().unwrap_or("resume").to_string();
                let content_type = field.content_type().map(String::from);
                let bytes = field.bytes().await?;
                resume = Some(UploadedResume {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            Some(REQUIREMENTS_FIELD) => requirements = Some(field.text().await?),
            _ => {}
        }
    }

    let resume = resume
        .filter(|r| !r.bytes.is_empty())
        .ok_or_else(|| AppError::Validation("No resume file uploaded".to_string()))?;
    if !is_docx(resume.content_type.as_deref()) {
        return Err(AppError::Validation(
            "Only .docx files are allowed".to_string(),
        ));
    }
    let requirements = requirements
        .filter(|r| !r.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Job requirements are required".to_string()))?;

    Ok(AnalyzeForm {
        resume,
        requirements,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze
///
/// Multipart form: `resume` (.docx file) and `requirements` (text).
/// The uploaded file lives in a temp slot only while its text is extracted.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let request_id = Uuid::new_v4();
    info!(%request_id, "New analyze request");

    let AnalyzeForm {
        resume,
        requirements,
    } = read_form(&mut multipart).await?;
    info!(
        %request_id,
        "File uploaded: {} ({} bytes)",
        resume.file_name,
        resume.bytes.len()
    );

    let upload = TempUpload::write(&state.config.upload_dir, &resume.bytes)
        .context("Failed to store uploaded resume")?;
    let extracted = state.extractor.extract(upload.path()).await;
    upload.close();

    let resume_text = extracted.map_err(|e| {
        AppError::Extraction(format!("Failed to extract text from resume: {e}"))
    })?;
    info!(%request_id, "Extracted text length: {}", resume_text.len());

    let scorer = state.scorer.clone();
    let analysis = tokio::task::spawn_blocking(move || scorer.score(&resume_text, &requirements))
        .await
        .map_err(|e| anyhow!("Scoring task failed: {e}"))?;

    if analysis.experience_match.is_applicable() {
        info!(
            %request_id,
            "Experience: {} years required, {} found",
            analysis.experience_match.required,
            analysis.experience_match.found
        );
    }
    info!(
        %request_id,
        "Analysis complete. Overall score: {} ({})",
        analysis.overall_score,
        analysis.recommendation.level.label()
    );

    Ok(Json(AnalyzeResponse {
        success: true,
        analysis,
    }))
}
