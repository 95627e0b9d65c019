//! In-memory enrollment repository.
//!
//! The write lock held across the duplicate check and the insert gives
//! this adapter the same atomicity the database unique index provides.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::enrollment::Enrollment;
use crate::domain::foundation::{CourseId, DomainError, EnrollmentId, ErrorCode, UserId};
use crate::ports::{EnrollmentRepository, SaveResult};

/// Map-backed enrollment repository with (student, course) uniqueness.
#[derive(Default)]
pub struct InMemoryEnrollmentRepository {
    rows: RwLock<HashMap<EnrollmentId, Enrollment>>,
}

impl InMemoryEnrollmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows.
    pub async fn count(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryEnrollmentRepository {
    async fn create(&self, enrollment: &Enrollment) -> Result<SaveResult, DomainError> {
        let mut rows = self.rows.write().await;

        let duplicate = rows.values().any(|e| {
            e.student_id == enrollment.student_id && e.course_id == enrollment.course_id
        });
        if duplicate {
            return Ok(SaveResult::AlreadyExists);
        }

        rows.insert(enrollment.id, enrollment.clone());
        Ok(SaveResult::Inserted)
    }

    async fn update(&self, enrollment: &Enrollment) -> Result<(), DomainError> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&enrollment.id) {
            Some(existing) => {
                *existing = enrollment.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::EnrollmentNotFound,
                "Enrollment not found",
            )),
        }
    }

    async fn find_by_id(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, DomainError> {
        Ok(self.rows.read().await.get(id).cloned())
    }

    async fn find_by_student_and_course(
        &self,
        student_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<Enrollment>, DomainError> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|e| &e.student_id == student_id && &e.course_id == course_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_enforces_student_course_uniqueness() {
        let repo = InMemoryEnrollmentRepository::new();
        let student = UserId::new();
        let course = CourseId::new();

        let first = Enrollment::new(student, course);
        let second = Enrollment::new(student, course);

        assert_eq!(repo.create(&first).await.unwrap(), SaveResult::Inserted);
        assert_eq!(
            repo.create(&second).await.unwrap(),
            SaveResult::AlreadyExists
        );
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn same_student_may_enroll_in_different_courses() {
        let repo = InMemoryEnrollmentRepository::new();
        let student = UserId::new();

        let first = Enrollment::new(student, CourseId::new());
        let second = Enrollment::new(student, CourseId::new());

        assert_eq!(repo.create(&first).await.unwrap(), SaveResult::Inserted);
        assert_eq!(repo.create(&second).await.unwrap(), SaveResult::Inserted);
    }

    #[tokio::test]
    async fn update_missing_row_fails() {
        let repo = InMemoryEnrollmentRepository::new();
        let enrollment = Enrollment::new(UserId::new(), CourseId::new());

        let err = repo.update(&enrollment).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EnrollmentNotFound);
    }

    #[tokio::test]
    async fn find_by_student_and_course_matches_pair() {
        let repo = InMemoryEnrollmentRepository::new();
        let enrollment = Enrollment::new(UserId::new(), CourseId::new());
        repo.create(&enrollment).await.unwrap();

        let found = repo
            .find_by_student_and_course(&enrollment.student_id, &enrollment.course_id)
            .await
            .unwrap();
        assert_eq!(found.unwrap().id, enrollment.id);

        let missing = repo
            .find_by_student_and_course(&UserId::new(), &enrollment.course_id)
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
