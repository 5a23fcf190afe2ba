use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::workbench::session::{EditError, SubmitError};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Busy => AppError::Conflict(err.to_string()),
            SubmitError::Validation(msg) => AppError::Validation(msg),
        }
    }
}

impl From<EditError> for AppError {
    fn from(err: EditError) -> Self {
        match err {
            EditError::LastCandidate => AppError::Validation(err.to_string()),
            EditError::CandidateNotFound(_)
            | EditError::FileNotFound(_)
            | EditError::UnknownJob(_) => AppError::NotFound(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Analysis(e) => {
                tracing::error!("Analysis error: {e}");
                let code = if e.is_malformed() {
                    "MALFORMED_RESPONSE"
                } else {
                    "ANALYSIS_FAILED"
                };
                (StatusCode::BAD_GATEWAY, code, e.user_message().to_string())
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
    use crate::llm_client::LlmError;

    #[test]
    fn test_submit_errors_map_to_status() {
        let busy: AppError = SubmitError::Busy.into();
        assert_eq!(busy.into_response().status(), StatusCode::CONFLICT);

        let invalid: AppError = SubmitError::Validation("missing".to_string()).into();
        assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_edit_errors_map_to_status() {
        let last: AppError = EditError::LastCandidate.into();
        assert_eq!(last.into_response().status(), StatusCode::BAD_REQUEST);

        let unknown: AppError = EditError::UnknownJob("x".to_string()).into();
        assert_eq!(unknown.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_analysis_errors_are_bad_gateway() {
        let service: AppError = AnalysisError::Service(LlmError::EmptyContent).into();
        assert_eq!(service.into_response().status(), StatusCode::BAD_GATEWAY);

        let malformed: AppError = AnalysisError::Malformed("bad".to_string()).into();
        assert_eq!(malformed.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
