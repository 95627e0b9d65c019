//! Request/response DTOs for enrollment endpoints.
//!
//! Serde does the shape validation here: a body missing a required field
//! never reaches a handler.

use serde::{Deserialize, Serialize};

use crate::domain::enrollment::Enrollment;
use crate::domain::foundation::{CourseId, EnrollmentId, LessonId, Timestamp, UserId};

/// Body of `POST /api/enrollments/{id}/complete-lesson`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteLessonRequest {
    pub lesson_id: LessonId,
}

/// Enrollment representation returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResponse {
    pub id: EnrollmentId,
    pub student_id: UserId,
    pub course_id: CourseId,
    pub paid: bool,
    pub progress: Vec<LessonId>,
    pub enrolled_at: Timestamp,
}

impl From<Enrollment> for EnrollmentResponse {
    fn from(e: Enrollment) -> Self {
        Self {
            id: e.id,
            student_id: e.student_id,
            course_id: e.course_id,
            paid: e.paid,
            progress: e.progress.into_iter().collect(),
            enrolled_at: e.enrolled_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_lesson_request_requires_lesson_id() {
        let ok: Result<CompleteLessonRequest, _> = serde_json::from_str(&format!(
            r#"{{"lessonId": "{}"}}"#,
            LessonId::new()
        ));
        assert!(ok.is_ok());

        let missing: Result<CompleteLessonRequest, _> = serde_json::from_str("{}");
        assert!(missing.is_err());
    }

    #[test]
    fn enrollment_response_uses_camel_case() {
        let enrollment = Enrollment::new(UserId::new(), CourseId::new());
        let response = EnrollmentResponse::from(enrollment);
        let json = serde_json::to_value(&response).unwrap();

        assert!(json.get("studentId").is_some());
        assert!(json.get("enrolledAt").is_some());
        assert!(json.get("student_id").is_none());
    }
}
