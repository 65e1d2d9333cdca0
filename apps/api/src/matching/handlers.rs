//! Axum route handlers for the matching API.

use axum::extract::multipart::{Field, Multipart, MultipartError};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use crate::documents::Document;
use crate::errors::AppError;
use crate::matching::pipeline::{run_analysis, AnalysisResponse, AnalyzeInput, JobDescriptionSource};
use crate::state::AppState;

/// Multipart fields accepted by `POST /analyze`.
#[derive(Debug, Default)]
struct AnalyzeForm {
    resume: Option<Document>,
    jd: Option<Document>,
    jd_text: Option<String>,
    top_k: Option<String>,
}

/// POST /analyze
///
/// Multipart form: `resume` (file, required), `jd` (file) or `jd_text` (text),
/// and an optional integer `top_k`.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let mut form = AnalyzeForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => form.resume = read_document(field).await?,
            "jd" => form.jd = read_document(field).await?,
            "jd_text" => form.jd_text = Some(field.text().await.map_err(multipart_error)?),
            "top_k" => form.top_k = Some(field.text().await.map_err(multipart_error)?),
            _ => {}
        }
    }

    let resume = form
        .resume
        .ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;
    let jd = JobDescriptionSource::from_parts(form.jd, form.jd_text)?;
    let top_k = parse_top_k(form.top_k.as_deref(), state.default_top_k)?;

    info!(
        "Analyze request: resume={:?} ({} bytes), jd_source={}, top_k={}",
        resume.file_name,
        resume.bytes.len(),
        match &jd {
            JobDescriptionSource::Document(_) => "file",
            JobDescriptionSource::Text(_) => "text",
        },
        top_k
    );

    let response = run_analysis(&state.matching, AnalyzeInput { resume, jd, top_k }).await?;
    Ok(Json(response))
}

/// Reads a file field. An empty part with no filename counts as "not supplied",
/// which is what browsers send for an untouched file input.
async fn read_document(field: Field<'_>) -> Result<Option<Document>, AppError> {
    let file_name = field
        .file_name()
        .map(str::to_string)
        .filter(|n| !n.is_empty());
    let content_type = field.content_type().map(str::to_string);
    let bytes = field.bytes().await.map_err(multipart_error)?;

    if bytes.is_empty() && file_name.is_none() {
        return Ok(None);
    }
    Ok(Some(Document::new(file_name, content_type, bytes)))
}

fn parse_top_k(raw: Option<&str>, default: i64) -> Result<i64, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) => s
            .parse::<i64>()
            .map_err(|_| AppError::Validation(format!("top_k must be an integer, got '{s}'"))),
    }
}

pub(crate) fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("Malformed multipart body: {}", e.body_text()))
    }
}
