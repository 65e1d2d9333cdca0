use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::documents::ExtractionError;
use crate::embeddings::EmbeddingError;
use crate::insights::search::SearchError;
use crate::llm_client::LlmError;
use crate::matching::ranker::RankError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Caller mistakes map to 4xx; collaborator failures map to 5xx and keep their
/// detail so the caller can tell which service broke.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Extraction(_)
            | AppError::Embedding(_)
            | AppError::Llm(_)
            | AppError::Search(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::UnprocessableEntity(_) => "UNPROCESSABLE_ENTITY",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::Extraction(_) => "EXTRACTION_ERROR",
            AppError::Embedding(_) => "EMBEDDING_ERROR",
            AppError::Llm(_) => "LLM_ERROR",
            AppError::Search(_) => "SEARCH_ERROR",
            AppError::Unavailable(_) => "SERVICE_UNAVAILABLE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<ExtractionError> for AppError {
    fn from(e: ExtractionError) -> Self {
        AppError::Extraction(e.to_string())
    }
}

impl From<EmbeddingError> for AppError {
    fn from(e: EmbeddingError) -> Self {
        AppError::Embedding(e.to_string())
    }
}

impl From<RankError> for AppError {
    fn from(e: RankError) -> Self {
        // mismatched vectors can only come from the embedding service
        AppError::Embedding(e.to_string())
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        AppError::Llm(e.to_string())
    }
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        AppError::Search(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = match &self {
            AppError::Validation(msg)
            | AppError::UnprocessableEntity(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::Unavailable(msg) => {
                tracing::warn!("Rejected request ({code}): {msg}");
                msg.clone()
            }
            AppError::Extraction(msg) => {
                tracing::error!("Extraction error: {msg}");
                format!("Document text extraction failed: {msg}")
            }
            AppError::Embedding(msg) => {
                tracing::error!("Embedding error: {msg}");
                format!("Embedding service failed: {msg}")
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                format!("Generation service failed: {msg}")
            }
            AppError::Search(msg) => {
                tracing::error!("Search error: {msg}");
                format!("Web search failed: {msg}")
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_is_400_with_message() {
        let (status, body) =
            body_json(AppError::Validation("Provide jd file or jd_text".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "Provide jd file or jd_text");
    }

    #[tokio::test]
    async fn test_collaborator_failure_is_500_with_detail() {
        let err: AppError = LlmError::Api {
            status: 429,
            message: "quota exceeded".to_string(),
        }
        .into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "LLM_ERROR");
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.contains("quota exceeded"), "{message}");
    }

    #[tokio::test]
    async fn test_internal_error_does_not_leak_detail() {
        let err = AppError::Internal(anyhow::anyhow!("secret path /etc/keys"));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "An internal server error occurred");
    }

    #[test]
    fn test_rank_error_maps_to_embedding_kind() {
        let err: AppError = RankError::DimensionMismatch {
            index: 0,
            expected: 3,
            actual: 2,
        }
        .into();
        assert_eq!(err.code(), "EMBEDDING_ERROR");
    }

    #[test]
    fn test_unavailable_is_503() {
        assert_eq!(
            AppError::Unavailable("no key".to_string()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
