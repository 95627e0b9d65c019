//! Enrollment aggregate.
//!
//! Exactly one enrollment exists per (student, course) pair; the storage
//! layer enforces this with a unique index rather than a check-then-insert,
//! which would race under concurrent enroll calls.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    CourseId, EnrollmentId, LessonId, OwnedByUser, Timestamp, UserId,
};

/// A student's registration in a course, tracking payment and progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub student_id: UserId,
    pub course_id: CourseId,
    /// Set when the course is free or a payment has succeeded.
    pub paid: bool,
    /// Completed lesson ids; set semantics, insertion order irrelevant.
    pub progress: BTreeSet<LessonId>,
    pub enrolled_at: Timestamp,
}

impl Enrollment {
    /// Creates a new unpaid enrollment with empty progress.
    pub fn new(student_id: UserId, course_id: CourseId) -> Self {
        Self {
            id: EnrollmentId::new(),
            student_id,
            course_id,
            paid: false,
            progress: BTreeSet::new(),
            enrolled_at: Timestamp::now(),
        }
    }

    /// Records a completed lesson.
    ///
    /// Returns `true` if the lesson was newly recorded, `false` if it was
    /// already present. Repeat completion is a no-op, never an error and
    /// never a duplicate entry.
    pub fn complete_lesson(&mut self, lesson_id: LessonId) -> bool {
        self.progress.insert(lesson_id)
    }

    /// Marks the enrollment as paid.
    ///
    /// Idempotent: returns `true` only when the flag actually changed.
    pub fn mark_paid(&mut self) -> bool {
        let changed = !self.paid;
        self.paid = true;
        changed
    }

    /// Returns true if the given lesson has been completed.
    pub fn has_completed(&self, lesson_id: &LessonId) -> bool {
        self.progress.contains(lesson_id)
    }
}

impl OwnedByUser for Enrollment {
    fn owner_id(&self) -> &UserId {
        &self.student_id
    }
}
