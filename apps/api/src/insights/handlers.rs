//! Axum route handler for interview insights.

use axum::extract::{Multipart, State};
use axum::Json;

use crate::errors::AppError;
use crate::insights::{fetch_interview_insights, InsightsResponse};
use crate::matching::handlers::multipart_error;
use crate::state::AppState;

/// POST /interview-questions
///
/// Multipart form with a single required `jd_text` field.
pub async fn handle_interview_questions(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<InsightsResponse>, AppError> {
    let mut jd_text: Option<String> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("jd_text") {
            jd_text = Some(field.text().await.map_err(multipart_error)?);
        }
    }

    let jd_text = jd_text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("jd_text is required".to_string()))?;

    let search = state.search.as_deref().ok_or_else(|| {
        AppError::Unavailable("Interview insights require TAVILY_API_KEY to be configured".to_string())
    })?;

    let response =
        fetch_interview_insights(search, state.matching.generator.as_ref(), &jd_text).await?;
    Ok(Json(response))
}
