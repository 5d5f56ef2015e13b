//! Error responses.
//!
//! Everything a handler can fail with ends up here and is rendered as the
//! standard envelope. Faults that are not the caller's doing are logged in
//! full and answered with a generic message.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::Value;

use flexiflo_models::{Envelope, ValidationError};
use flexiflo_utils::{log_fault, FlexifloError};

pub const VALIDATION_FAILED: &str = "Validation Error";
pub const NOT_FOUND: &str = "Report not found";
pub const DUPLICATE: &str = "Duplicate entry found";
pub const INVALID_ID: &str = "Invalid report id";
pub const INVALID_JSON: &str = "Invalid JSON body";
pub const SERVER_ERROR: &str = "Server Error";

#[derive(Debug)]
pub enum ApiError {
    Domain(FlexifloError),
    Body(JsonRejection),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<FlexifloError> for ApiError {
    fn from(error: FlexifloError) -> Self {
        Self::Domain(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

fn envelope(status: StatusCode, body: Envelope<Value>) -> Response {
    (status, Json(body)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = match self {
            Self::Body(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Rejected request body");
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    return envelope(
                        StatusCode::PAYLOAD_TOO_LARGE,
                        Envelope::failure("Request body too large"),
                    );
                }
                return envelope(StatusCode::BAD_REQUEST, Envelope::failure(INVALID_JSON));
            }
            Self::Domain(error) => error,
        };

        let status = StatusCode::from_u16(error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = match &error {
            FlexifloError::Validation { violations } => Envelope::invalid(
                VALIDATION_FAILED,
                &ValidationError::new(violations.clone()),
            ),
            FlexifloError::InvalidId { .. } => Envelope::failure(INVALID_ID),
            FlexifloError::NotFound { .. } => Envelope::failure(NOT_FOUND),
            FlexifloError::DuplicateKey { .. } => {
                tracing::warn!(error = %error, "Duplicate key on write");
                Envelope::failure(DUPLICATE)
            }
            _ => {
                log_fault!(error, "Request failed");
                Envelope::failure(SERVER_ERROR)
            }
        };
        envelope(status, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(error: FlexifloError) -> (StatusCode, Value) {
        let response = ApiError::from(error).into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_validation_lists_fields() {
        let (status, body) =
            render(FlexifloError::validation("jobDetails.quantity", "Quantity must be at least 1")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], VALIDATION_FAILED);
        assert_eq!(body["errors"][0]["field"], "jobDetails.quantity");
    }

    #[tokio::test]
    async fn test_faults_are_not_leaked() {
        let (status, body) = render(FlexifloError::persistence("socket closed at 10.0.0.4")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], SERVER_ERROR);
        assert!(!body.to_string().contains("10.0.0.4"));
    }

    #[tokio::test]
    async fn test_duplicate_is_conflict() {
        let (status, body) = render(FlexifloError::duplicate_key("E11000")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], DUPLICATE);
        assert!(body.get("errors").is_none());
    }
}
