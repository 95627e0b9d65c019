//! Axum router configuration for enrollment endpoints.

use axum::{routing::post, Router};

use super::super::AppState;
use super::handlers::{complete_lesson, enroll};

/// Routes mounted under `/api/courses`.
///
/// - `POST /{course_id}/enroll` - enroll the acting student
pub fn course_routes() -> Router<AppState> {
    Router::new().route("/:course_id/enroll", post(enroll))
}

/// Routes mounted under `/api/enrollments`.
///
/// - `POST /{enrollment_id}/complete-lesson` - record lesson completion
pub fn enrollment_routes() -> Router<AppState> {
    Router::new().route("/:enrollment_id/complete-lesson", post(complete_lesson))
}
