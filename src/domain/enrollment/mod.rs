//! Enrollment module - a student's registration in a course.

mod enrollment;

pub use enrollment::Enrollment;
