//! API error type converting domain errors to HTTP responses.
//!
//! One mapping for the whole HTTP surface, so every module reports the
//! same status codes and body shape for the same error conditions.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Wrapper implementing `IntoResponse` for domain errors.
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0.code {
            ErrorCode::CourseNotFound
            | ErrorCode::LessonNotFound
            | ErrorCode::EnrollmentNotFound
            | ErrorCode::PaymentNotFound => StatusCode::NOT_FOUND,

            ErrorCode::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,

            ErrorCode::ValidationFailed | ErrorCode::SignatureError => StatusCode::BAD_REQUEST,

            ErrorCode::ProviderError => StatusCode::BAD_GATEWAY,

            ErrorCode::InvalidStateTransition
            | ErrorCode::DatabaseError
            | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(code = %self.0.code, message = %self.0.message, "Request failed");
        }

        let body = Json(serde_json::json!({
            "error": {
                "code": self.0.code.to_string(),
                "message": self.0.message,
            }
        }));

        (status, body).into_response()
    }
}
