//! Curriculum store port.
//!
//! The reconciliation core only reads the catalog: course price and
//! ownership for checkout, lesson existence for progress tracking.
//! Authoring and content delivery live behind other services.

use async_trait::async_trait;

use crate::domain::catalog::{Course, Lesson};
use crate::domain::foundation::{CourseId, DomainError, LessonId};

/// Read access to persisted courses and lessons.
#[async_trait]
pub trait CourseStore: Send + Sync {
    /// Find a course by id.
    async fn find_course(&self, id: &CourseId) -> Result<Option<Course>, DomainError>;

    /// Find a lesson by id.
    async fn find_lesson(&self, id: &LessonId) -> Result<Option<Lesson>, DomainError>;
}
