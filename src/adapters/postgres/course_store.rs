//! PostgreSQL implementation of CourseStore.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::catalog::{Course, CourseStatus, Lesson};
use crate::domain::foundation::{
    CourseId, DomainError, ErrorCode, LessonId, Timestamp, UserId,
};
use crate::ports::CourseStore;

/// PostgreSQL implementation of the CourseStore port.
pub struct PostgresCourseStore {
    pool: PgPool,
}

impl PostgresCourseStore {
    /// Creates a new store with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CourseRow {
    id: Uuid,
    instructor_id: Uuid,
    title: String,
    description: Option<String>,
    price: Decimal,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CourseRow> for Course {
    type Error = DomainError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        let status = CourseStatus::parse(&row.status).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid course status value: {}", row.status),
            )
        })?;

        Ok(Course {
            id: CourseId::from_uuid(row.id),
            instructor_id: UserId::from_uuid(row.instructor_id),
            title: row.title,
            description: row.description,
            price: row.price,
            status,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LessonRow {
    id: Uuid,
    course_id: Uuid,
    title: String,
    lesson_order: i32,
    created_at: DateTime<Utc>,
}

impl From<LessonRow> for Lesson {
    fn from(row: LessonRow) -> Self {
        Lesson {
            id: LessonId::from_uuid(row.id),
            course_id: CourseId::from_uuid(row.course_id),
            title: row.title,
            order: row.lesson_order,
            created_at: Timestamp::from_datetime(row.created_at),
        }
    }
}

#[async_trait]
impl CourseStore for PostgresCourseStore {
    async fn find_course(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
        let row: Option<CourseRow> = sqlx::query_as(
            r#"
            SELECT id, instructor_id, title, description, price, status, created_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find course: {}", e),
            )
        })?;

        row.map(Course::try_from).transpose()
    }

    async fn find_lesson(&self, id: &LessonId) -> Result<Option<Lesson>, DomainError> {
        let row: Option<LessonRow> = sqlx::query_as(
            r#"
            SELECT id, course_id, title, lesson_order, created_at
            FROM lessons
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find lesson: {}", e),
            )
        })?;

        Ok(row.map(Lesson::from))
    }
}
