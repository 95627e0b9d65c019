//! Shared application state for HTTP handlers.

use std::sync::Arc;

use crate::application::handlers::checkout::CreateCheckoutSessionHandler;
use crate::application::handlers::enrollment::{EnrollHandler, MarkLessonCompleteHandler};
use crate::application::handlers::webhook::ProcessWebhookHandler;
use crate::ports::{CourseStore, EnrollmentRepository, PaymentProvider, PaymentRepository};

/// Arc-wrapped dependencies cloned into each request.
#[derive(Clone)]
pub struct AppState {
    pub course_store: Arc<dyn CourseStore>,
    pub enrollments: Arc<dyn EnrollmentRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    /// Fallback redirect target when a checkout request omits one.
    pub checkout_success_url: String,
    /// Fallback cancel target when a checkout request omits one.
    pub checkout_cancel_url: String,
    /// Reject lessons recorded against another course's enrollment.
    pub strict_lesson_scope: bool,
}

impl AppState {
    /// Create handlers on demand from the shared state.
    pub fn enroll_handler(&self) -> EnrollHandler {
        EnrollHandler::new(self.course_store.clone(), self.enrollments.clone())
    }

    pub fn mark_lesson_complete_handler(&self) -> MarkLessonCompleteHandler {
        MarkLessonCompleteHandler::new(self.enrollments.clone(), self.course_store.clone())
            .with_strict_lesson_scope(self.strict_lesson_scope)
    }

    pub fn checkout_handler(&self) -> CreateCheckoutSessionHandler {
        CreateCheckoutSessionHandler::new(
            self.enrollments.clone(),
            self.payments.clone(),
            self.course_store.clone(),
            self.payment_provider.clone(),
            self.checkout_success_url.clone(),
            self.checkout_cancel_url.clone(),
        )
    }

    pub fn webhook_handler(&self) -> ProcessWebhookHandler {
        ProcessWebhookHandler::new(
            self.payment_provider.clone(),
            self.payments.clone(),
            self.enrollments.clone(),
        )
    }
}
