//! EnrollHandler - atomic find-or-create of an enrollment.

use std::sync::Arc;

use crate::domain::enrollment::Enrollment;
use crate::domain::foundation::{
    authorize, Actor, CourseId, DomainError, ErrorCode, Policy, Role,
};
use crate::ports::{CourseStore, EnrollmentRepository, SaveResult};

/// Command to enroll the acting student in a course.
#[derive(Debug, Clone)]
pub struct EnrollCommand {
    pub course_id: CourseId,
}

/// Handler for student enrollment.
///
/// Concurrent duplicate calls for the same (student, course) pair converge
/// to the same single row: the insert races on the storage uniqueness
/// constraint, and the loser re-fetches the winner's row. Calling enroll
/// again later returns the existing row unchanged.
pub struct EnrollHandler {
    course_store: Arc<dyn CourseStore>,
    enrollments: Arc<dyn EnrollmentRepository>,
}

impl EnrollHandler {
    pub fn new(
        course_store: Arc<dyn CourseStore>,
        enrollments: Arc<dyn EnrollmentRepository>,
    ) -> Self {
        Self {
            course_store,
            enrollments,
        }
    }

    pub async fn handle(
        &self,
        cmd: EnrollCommand,
        actor: Option<&Actor>,
    ) -> Result<Enrollment, DomainError> {
        let actor = authorize(actor, Policy::RoleInSet(&[Role::Student]), None)?;

        let course = self
            .course_store
            .find_course(&cmd.course_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::CourseNotFound, "Course not found")
                    .with_detail("course_id", cmd.course_id.to_string())
            })?;

        // Fast path: already enrolled.
        if let Some(existing) = self
            .enrollments
            .find_by_student_and_course(&actor.id, &course.id)
            .await?
        {
            return Ok(existing);
        }

        let candidate = Enrollment::new(actor.id, course.id);
        match self.enrollments.create(&candidate).await? {
            SaveResult::Inserted => {
                tracing::info!(
                    enrollment_id = %candidate.id,
                    course_id = %course.id,
                    student_id = %actor.id,
                    "Student enrolled"
                );
                Ok(candidate)
            }
            SaveResult::AlreadyExists => {
                // Lost the insert race; the winner's row is authoritative.
                self.enrollments
                    .find_by_student_and_course(&actor.id, &course.id)
                    .await?
                    .ok_or_else(|| {
                        DomainError::new(
                            ErrorCode::DatabaseError,
                            "Enrollment vanished after unique-constraint hit",
                        )
                    })
            }
        }
    }
}
