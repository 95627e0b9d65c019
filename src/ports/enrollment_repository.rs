//! Enrollment repository port.
//!
//! `create` surfaces the storage-level uniqueness constraint on
//! `(student, course)` as a [`SaveResult`], so the enroll handler can
//! resolve the concurrent-duplicate race without any in-process lock:
//! whoever inserts first wins, everyone else re-fetches the winner's row.

use async_trait::async_trait;

use crate::domain::enrollment::Enrollment;
use crate::domain::foundation::{CourseId, DomainError, EnrollmentId, UserId};

/// Outcome of an insert against the uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    /// The row was inserted.
    Inserted,
    /// An enrollment for this (student, course) pair already exists.
    AlreadyExists,
}

/// Persistence for enrollment aggregates.
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Insert a new enrollment, reporting a unique-constraint hit as
    /// [`SaveResult::AlreadyExists`] rather than an error.
    async fn create(&self, enrollment: &Enrollment) -> Result<SaveResult, DomainError>;

    /// Persist changes to the mutable fields (`paid`, `progress`).
    async fn update(&self, enrollment: &Enrollment) -> Result<(), DomainError>;

    /// Find an enrollment by id.
    async fn find_by_id(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, DomainError>;

    /// Find the enrollment for a (student, course) pair.
    async fn find_by_student_and_course(
        &self,
        student_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<Enrollment>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enrollment_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn EnrollmentRepository) {}
    }
}
