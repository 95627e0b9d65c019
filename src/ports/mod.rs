//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `CourseStore` - read access to the curriculum (courses, lessons)
//! - `EnrollmentRepository` - race-safe enrollment persistence
//! - `PaymentRepository` - the append-mostly payment ledger
//! - `PaymentProvider` - hosted checkout + webhook verification

mod course_store;
mod enrollment_repository;
mod payment_provider;
mod payment_repository;

pub use course_store::CourseStore;
pub use enrollment_repository::{EnrollmentRepository, SaveResult};
pub use payment_provider::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentErrorCode, PaymentProvider,
};
pub use payment_repository::PaymentRepository;
