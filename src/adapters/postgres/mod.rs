//! PostgreSQL adapters.

mod course_store;
mod enrollment_repository;
mod payment_repository;

pub use course_store::PostgresCourseStore;
pub use enrollment_repository::PostgresEnrollmentRepository;
pub use payment_repository::PostgresPaymentRepository;
