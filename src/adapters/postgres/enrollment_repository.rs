//! PostgreSQL implementation of EnrollmentRepository.
//!
//! The `(student_id, course_id)` unique index is the source of truth for
//! the one-enrollment-per-pair invariant; `create` maps a violation of
//! that index to `SaveResult::AlreadyExists` instead of erroring, which is
//! how concurrent duplicate enroll calls converge on a single row.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::enrollment::Enrollment;
use crate::domain::foundation::{
    CourseId, DomainError, EnrollmentId, ErrorCode, LessonId, Timestamp, UserId,
};
use crate::ports::{EnrollmentRepository, SaveResult};

/// Constraint backing the (student, course) uniqueness invariant.
const STUDENT_COURSE_KEY: &str = "enrollments_student_id_course_id_key";

/// PostgreSQL implementation of the EnrollmentRepository port.
pub struct PostgresEnrollmentRepository {
    pool: PgPool,
}

impl PostgresEnrollmentRepository {
    /// Creates a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an enrollment.
#[derive(Debug, sqlx::FromRow)]
struct EnrollmentRow {
    id: Uuid,
    student_id: Uuid,
    course_id: Uuid,
    paid: bool,
    progress: Vec<Uuid>,
    enrolled_at: DateTime<Utc>,
}

impl From<EnrollmentRow> for Enrollment {
    fn from(row: EnrollmentRow) -> Self {
        let progress: BTreeSet<LessonId> =
            row.progress.into_iter().map(LessonId::from_uuid).collect();

        Enrollment {
            id: EnrollmentId::from_uuid(row.id),
            student_id: UserId::from_uuid(row.student_id),
            course_id: CourseId::from_uuid(row.course_id),
            paid: row.paid,
            progress,
            enrolled_at: Timestamp::from_datetime(row.enrolled_at),
        }
    }
}

fn progress_vec(enrollment: &Enrollment) -> Vec<Uuid> {
    enrollment.progress.iter().map(|id| *id.as_uuid()).collect()
}

#[async_trait]
impl EnrollmentRepository for PostgresEnrollmentRepository {
    async fn create(&self, enrollment: &Enrollment) -> Result<SaveResult, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO enrollments (id, student_id, course_id, paid, progress, enrolled_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(enrollment.id.as_uuid())
        .bind(enrollment.student_id.as_uuid())
        .bind(enrollment.course_id.as_uuid())
        .bind(enrollment.paid)
        .bind(progress_vec(enrollment))
        .bind(enrollment.enrolled_at.as_datetime())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(SaveResult::Inserted),
            Err(sqlx::Error::Database(db_err))
                if db_err.constraint() == Some(STUDENT_COURSE_KEY) =>
            {
                Ok(SaveResult::AlreadyExists)
            }
            Err(e) => Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to create enrollment: {}", e),
            )),
        }
    }

    async fn update(&self, enrollment: &Enrollment) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE enrollments SET paid = $2, progress = $3
            WHERE id = $1
            "#,
        )
        .bind(enrollment.id.as_uuid())
        .bind(enrollment.paid)
        .bind(progress_vec(enrollment))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update enrollment: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::EnrollmentNotFound,
                "Enrollment not found",
            ));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, DomainError> {
        let row: Option<EnrollmentRow> = sqlx::query_as(
            r#"
            SELECT id, student_id, course_id, paid, progress, enrolled_at
            FROM enrollments
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find enrollment: {}", e),
            )
        })?;

        Ok(row.map(Enrollment::from))
    }

    async fn find_by_student_and_course(
        &self,
        student_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<Enrollment>, DomainError> {
        let row: Option<EnrollmentRow> = sqlx::query_as(
            r#"
            SELECT id, student_id, course_id, paid, progress, enrolled_at
            FROM enrollments
            WHERE student_id = $1 AND course_id = $2
            "#,
        )
        .bind(student_id.as_uuid())
        .bind(course_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find enrollment: {}", e),
            )
        })?;

        Ok(row.map(Enrollment::from))
    }
}
