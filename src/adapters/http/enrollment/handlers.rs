//! HTTP handlers for enrollment endpoints.

use axum::extract::{Extension, Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::enrollment::{EnrollCommand, MarkLessonCompleteCommand};
use crate::domain::foundation::{Actor, CourseId, EnrollmentId};

use super::super::{ApiError, AppState};
use super::dto::{CompleteLessonRequest, EnrollmentResponse};

/// `POST /api/courses/{course_id}/enroll`
pub async fn enroll(
    State(state): State<AppState>,
    Path(course_id): Path<CourseId>,
    actor: Option<Extension<Actor>>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = actor.map(|Extension(a)| a);

    let enrollment = state
        .enroll_handler()
        .handle(EnrollCommand { course_id }, actor.as_ref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(EnrollmentResponse::from(enrollment)),
    ))
}

/// `POST /api/enrollments/{enrollment_id}/complete-lesson`
pub async fn complete_lesson(
    State(state): State<AppState>,
    Path(enrollment_id): Path<EnrollmentId>,
    actor: Option<Extension<Actor>>,
    Json(body): Json<CompleteLessonRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = actor.map(|Extension(a)| a);

    let enrollment = state
        .mark_lesson_complete_handler()
        .handle(
            MarkLessonCompleteCommand {
                enrollment_id,
                lesson_id: body.lesson_id,
            },
            actor.as_ref(),
        )
        .await?;

    Ok(Json(EnrollmentResponse::from(enrollment)))
}
