use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// The multipart body could not be read. Carries the status axum
    /// assigned, so an over-limit body stays a 413.
    #[error("Upload rejected: {message}")]
    Upload { status: StatusCode, message: String },

    /// Extraction or generation failed. The two are reported identically.
    #[error("Error processing files: {0}")]
    Processing(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ExtractionError> for AppError {
    fn from(e: ExtractionError) -> Self {
        if let ExtractionError::NotFound(path) = &e {
            // Uploads are written before extraction starts, so this means the
            // working directory changed underneath the request.
            tracing::error!(
                "Upload vanished before extraction: {}",
                path.display()
            );
        }
        AppError::Processing(e.to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Upload {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        AppError::Processing(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Upload { status, message } => {
                let code = match *status {
                    StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
                    s if s.is_server_error() => "INTERNAL_ERROR",
                    _ => "VALIDATION_ERROR",
                };
                (*status, code, message.clone())
            }
            AppError::Processing(_) => {
                tracing::error!("{self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PROCESSING_ERROR",
                    self.to_string(),
                )
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
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_validation_is_bad_request() {
        let response = AppError::Validation("No resume file uploaded".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_extraction_and_llm_failures_share_a_class() {
        let extraction: AppError = ExtractionError::NotFound(PathBuf::from("uploads/cv.pdf")).into();
        let llm: AppError = LlmError::EmptyContent.into();

        assert!(matches!(extraction, AppError::Processing(_)));
        assert!(matches!(llm, AppError::Processing(_)));
        assert_eq!(
            extraction.to_string(),
            "Error processing files: File not found: uploads/cv.pdf"
        );
        assert_eq!(
            llm.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upload_error_keeps_its_status() {
        let too_large = AppError::Upload {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "length limit exceeded".to_string(),
        };
        assert_eq!(too_large.into_response().status(), StatusCode::PAYLOAD_TOO_LARGE);

        let malformed = AppError::Upload {
            status: StatusCode::BAD_REQUEST,
            message: "Error parsing `multipart/form-data` request".to_string(),
        };
        assert_eq!(malformed.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_error_hides_details() {
        let response = AppError::Internal(anyhow::anyhow!("disk full")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
