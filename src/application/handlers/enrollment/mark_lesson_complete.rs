//! MarkLessonCompleteHandler - idempotent progress tracking.

use std::sync::Arc;

use crate::domain::enrollment::Enrollment;
use crate::domain::foundation::{
    authorize, Actor, DomainError, EnrollmentId, ErrorCode, LessonId, Policy,
};
use crate::ports::{CourseStore, EnrollmentRepository};

/// Command to record a completed lesson on an enrollment.
#[derive(Debug, Clone)]
pub struct MarkLessonCompleteCommand {
    pub enrollment_id: EnrollmentId,
    pub lesson_id: LessonId,
}

/// Handler for progress updates.
///
/// Completion has set semantics: repeating a lesson is a no-op, not an
/// error. Only the enrollment's student or an admin may record progress.
pub struct MarkLessonCompleteHandler {
    enrollments: Arc<dyn EnrollmentRepository>,
    course_store: Arc<dyn CourseStore>,
    /// When set, a lesson from a different course than the enrollment's
    /// is rejected. Off by default: any existing lesson is recorded
    /// without checking which course it belongs to.
    strict_lesson_scope: bool,
}

impl MarkLessonCompleteHandler {
    pub fn new(
        enrollments: Arc<dyn EnrollmentRepository>,
        course_store: Arc<dyn CourseStore>,
    ) -> Self {
        Self {
            enrollments,
            course_store,
            strict_lesson_scope: false,
        }
    }

    /// Enables rejection of lessons outside the enrollment's course.
    pub fn with_strict_lesson_scope(mut self, strict: bool) -> Self {
        self.strict_lesson_scope = strict;
        self
    }

    pub async fn handle(
        &self,
        cmd: MarkLessonCompleteCommand,
        actor: Option<&Actor>,
    ) -> Result<Enrollment, DomainError> {
        let mut enrollment = self
            .enrollments
            .find_by_id(&cmd.enrollment_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::EnrollmentNotFound, "Enrollment not found")
                    .with_detail("enrollment_id", cmd.enrollment_id.to_string())
            })?;

        authorize(actor, Policy::OwnerOrAdmin, Some(&enrollment.student_id))?;

        let lesson = self
            .course_store
            .find_lesson(&cmd.lesson_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::LessonNotFound, "Lesson not found")
                    .with_detail("lesson_id", cmd.lesson_id.to_string())
            })?;

        if self.strict_lesson_scope && !lesson.belongs_to(&enrollment.course_id) {
            return Err(DomainError::validation(
                "lessonId",
                "Lesson does not belong to the enrollment's course",
            )
            .with_detail("lesson_course_id", lesson.course_id.to_string())
            .with_detail("enrollment_course_id", enrollment.course_id.to_string()));
        }

        if enrollment.complete_lesson(lesson.id) {
            self.enrollments.update(&enrollment).await?;
            tracing::debug!(
                enrollment_id = %enrollment.id,
                lesson_id = %lesson.id,
                "Lesson completion recorded"
            );
        }

        Ok(enrollment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryCourseStore, InMemoryEnrollmentRepository};
    use crate::domain::catalog::Lesson;
    use crate::domain::foundation::{CourseId, Role, UserId};

    struct Fixture {
        handler: MarkLessonCompleteHandler,
        store: Arc<InMemoryCourseStore>,
        repo: Arc<InMemoryEnrollmentRepository>,
        enrollment: Enrollment,
        lesson: Lesson,
        student: Actor,
    }

    async fn fixture() -> Fixture {
        let student = Actor::new(UserId::new(), Role::Student);
        let course_id = CourseId::new();
        let enrollment = Enrollment::new(student.id, course_id);
        let lesson = Lesson::new(course_id, "Intro", 1);

        let store = Arc::new(InMemoryCourseStore::new());
        store.insert_lesson(lesson.clone()).await;

        let repo = Arc::new(InMemoryEnrollmentRepository::new());
        repo.create(&enrollment).await.unwrap();

        Fixture {
            handler: MarkLessonCompleteHandler::new(repo.clone(), store.clone()),
            store,
            repo,
            enrollment,
            lesson,
            student,
        }
    }

    #[tokio::test]
    async fn records_completed_lesson() {
        let f = fixture().await;

        let updated = f
            .handler
            .handle(
                MarkLessonCompleteCommand {
                    enrollment_id: f.enrollment.id,
                    lesson_id: f.lesson.id,
                },
                Some(&f.student),
            )
            .await
            .unwrap();

        assert!(updated.has_completed(&f.lesson.id));

        let stored = f.repo.find_by_id(&f.enrollment.id).await.unwrap().unwrap();
        assert!(stored.has_completed(&f.lesson.id));
    }

    #[tokio::test]
    async fn repeating_a_lesson_leaves_one_entry() {
        let f = fixture().await;
        let cmd = MarkLessonCompleteCommand {
            enrollment_id: f.enrollment.id,
            lesson_id: f.lesson.id,
        };

        f.handler.handle(cmd.clone(), Some(&f.student)).await.unwrap();
        let second = f.handler.handle(cmd, Some(&f.student)).await.unwrap();

        assert_eq!(second.progress.len(), 1);
    }

    #[tokio::test]
    async fn non_owner_is_forbidden_and_progress_unchanged() {
        let f = fixture().await;
        let stranger = Actor::new(UserId::new(), Role::Student);

        let err = f
            .handler
            .handle(
                MarkLessonCompleteCommand {
                    enrollment_id: f.enrollment.id,
                    lesson_id: f.lesson.id,
                },
                Some(&stranger),
            )
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::Forbidden);
        let stored = f.repo.find_by_id(&f.enrollment.id).await.unwrap().unwrap();
        assert!(stored.progress.is_empty());
    }

    #[tokio::test]
    async fn admin_may_record_progress_on_any_enrollment() {
        let f = fixture().await;
        let admin = Actor::new(UserId::new(), Role::Admin);

        let updated = f
            .handler
            .handle(
                MarkLessonCompleteCommand {
                    enrollment_id: f.enrollment.id,
                    lesson_id: f.lesson.id,
                },
                Some(&admin),
            )
            .await
            .unwrap();

        assert!(updated.has_completed(&f.lesson.id));
    }

    #[tokio::test]
    async fn missing_enrollment_is_not_found() {
        let f = fixture().await;

        let err = f
            .handler
            .handle(
                MarkLessonCompleteCommand {
                    enrollment_id: EnrollmentId::new(),
                    lesson_id: f.lesson.id,
                },
                Some(&f.student),
            )
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::EnrollmentNotFound);
    }

    #[tokio::test]
    async fn missing_lesson_is_not_found() {
        let f = fixture().await;

        let err = f
            .handler
            .handle(
                MarkLessonCompleteCommand {
                    enrollment_id: f.enrollment.id,
                    lesson_id: LessonId::new(),
                },
                Some(&f.student),
            )
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::LessonNotFound);
    }

    #[tokio::test]
    async fn lenient_mode_records_lesson_from_another_course() {
        let f = fixture().await;
        let foreign = Lesson::new(CourseId::new(), "Other course lesson", 1);
        f.store.insert_lesson(foreign.clone()).await;

        let updated = f
            .handler
            .handle(
                MarkLessonCompleteCommand {
                    enrollment_id: f.enrollment.id,
                    lesson_id: foreign.id,
                },
                Some(&f.student),
            )
            .await
            .unwrap();

        assert!(updated.has_completed(&foreign.id));
    }

    #[tokio::test]
    async fn strict_mode_rejects_lesson_from_another_course() {
        let f = fixture().await;
        let foreign = Lesson::new(CourseId::new(), "Other course lesson", 1);
        f.store.insert_lesson(foreign.clone()).await;

        let handler = MarkLessonCompleteHandler::new(f.repo.clone(), f.store.clone())
            .with_strict_lesson_scope(true);

        let err = handler
            .handle(
                MarkLessonCompleteCommand {
                    enrollment_id: f.enrollment.id,
                    lesson_id: foreign.id,
                },
                Some(&f.student),
            )
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
