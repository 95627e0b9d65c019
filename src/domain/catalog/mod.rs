//! Catalog module - courses and lessons.
//!
//! The catalog is persisted by the curriculum store; this core only reads
//! it (price, ownership, lesson membership). Content authoring is outside
//! the reconciliation core.

mod course;
mod lesson;

pub use course::{Course, CourseStatus};
pub use lesson::Lesson;
