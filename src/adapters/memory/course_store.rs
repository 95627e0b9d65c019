//! In-memory curriculum store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::catalog::{Course, Lesson};
use crate::domain::foundation::{CourseId, DomainError, LessonId};
use crate::ports::CourseStore;

/// Map-backed course/lesson store.
#[derive(Default)]
pub struct InMemoryCourseStore {
    courses: RwLock<HashMap<CourseId, Course>>,
    lessons: RwLock<HashMap<LessonId, Lesson>>,
}

impl InMemoryCourseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a course.
    pub async fn insert_course(&self, course: Course) {
        self.courses.write().await.insert(course.id, course);
    }

    /// Seeds a lesson.
    pub async fn insert_lesson(&self, lesson: Lesson) {
        self.lessons.write().await.insert(lesson.id, lesson);
    }
}

#[async_trait]
impl CourseStore for InMemoryCourseStore {
    async fn find_course(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
        Ok(self.courses.read().await.get(id).cloned())
    }

    async fn find_lesson(&self, id: &LessonId) -> Result<Option<Lesson>, DomainError> {
        Ok(self.lessons.read().await.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn finds_seeded_course_and_lesson() {
        let store = InMemoryCourseStore::new();
        let course = Course::new(UserId::new(), "Databases", dec!(15)).unwrap();
        let lesson = Lesson::new(course.id, "Indexes", 1);

        store.insert_course(course.clone()).await;
        store.insert_lesson(lesson.clone()).await;

        assert!(store.find_course(&course.id).await.unwrap().is_some());
        assert!(store.find_lesson(&lesson.id).await.unwrap().is_some());
        assert!(store.find_course(&CourseId::new()).await.unwrap().is_none());
    }
}
