use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Scoring never produces one of these: oracle and scorer failures degrade to
/// default values inside the pipeline. Only bad input and unreadable artifacts do.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ExtractionError> for AppError {
    fn from(e: ExtractionError) -> Self {
        match e {
            ExtractionError::UnsupportedFormat(ext) => AppError::UnsupportedFormat(format!(
                "{ext}. Supported formats: {}",
                crate::extraction::DocumentKind::SUPPORTED_EXTENSIONS.join(", ")
            )),
            ExtractionError::Fetch { .. } => AppError::Fetch(e.to_string()),
            ExtractionError::Corrupt { .. } | ExtractionError::Empty(_) => {
                AppError::Extraction(e.to_string())
            }
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Validation(format!("invalid multipart body: {}", e.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnsupportedFormat(msg) => {
                (StatusCode::BAD_REQUEST, "UNSUPPORTED_FORMAT", msg.clone())
            }
            AppError::Extraction(msg) => {
                tracing::warn!("Extraction error: {msg}");
                (StatusCode::UNPROCESSABLE_ENTITY, "EXTRACTION_ERROR", msg.clone())
            }
            AppError::Fetch(msg) => {
                tracing::warn!("Fetch error: {msg}");
                (StatusCode::BAD_GATEWAY, "FETCH_ERROR", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
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
    use crate::extraction::DocumentKind;

    #[test]
    fn test_extraction_errors_map_to_request_errors() {
        let unsupported: AppError = ExtractionError::UnsupportedFormat(".png".to_string()).into();
        assert!(matches!(unsupported, AppError::UnsupportedFormat(ref m) if m.starts_with(".png")));

        let empty: AppError = ExtractionError::Empty(DocumentKind::Pdf).into();
        assert!(matches!(empty, AppError::Extraction(_)));

        let fetch: AppError = ExtractionError::Fetch {
            url: "https://x".to_string(),
            message: "status 404".to_string(),
        }
        .into();
        assert!(matches!(fetch, AppError::Fetch(_)));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::UnsupportedFormat("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Extraction("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::Fetch("x".into()), StatusCode::BAD_GATEWAY),
            (
                AppError::Internal(anyhow::anyhow!("x")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
