//! Lesson entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CourseId, LessonId, Timestamp};

/// A lesson within a course, referenced by enrollment progress entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: LessonId,
    pub course_id: CourseId,
    pub title: String,
    /// Position within the course outline.
    pub order: i32,
    pub created_at: Timestamp,
}

impl Lesson {
    /// Creates a new lesson at the given position.
    pub fn new(course_id: CourseId, title: impl Into<String>, order: i32) -> Self {
        Self {
            id: LessonId::new(),
            course_id,
            title: title.into(),
            order,
            created_at: Timestamp::now(),
        }
    }

    /// Returns true if this lesson belongs to the given course.
    pub fn belongs_to(&self, course_id: &CourseId) -> bool {
        &self.course_id == course_id
    }
}
