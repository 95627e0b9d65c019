//! CreateCheckoutSessionHandler - initiates payment for an enrollment.
//!
//! Free courses are settled synchronously: the enrollment is marked paid
//! and a zero-amount succeeded payment is appended for audit, without ever
//! contacting the provider. Paid courses go through the provider's hosted
//! checkout; the pending payment row is persisted with the session id
//! before the URL is returned, so a webhook can never arrive before the
//! row it needs to update exists.

use std::sync::Arc;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::enrollment::Enrollment;
use crate::domain::foundation::{
    authorize, Actor, DomainError, EnrollmentId, ErrorCode, Policy, Role,
};
use crate::domain::payment::{Payment, PROVIDER_STRIPE};
use crate::ports::{
    CourseStore, CreateCheckoutRequest, EnrollmentRepository, PaymentProvider, PaymentRepository,
};

/// Command to start checkout for an enrollment.
#[derive(Debug, Clone)]
pub struct CreateCheckoutSessionCommand {
    pub enrollment_id: EnrollmentId,
    pub success_url: Option<String>,
    pub cancel_url: Option<String>,
}

/// Result of a checkout request.
#[derive(Debug, Clone)]
pub enum CheckoutOutcome {
    /// Free course: settled immediately, no provider involved.
    Free { enrollment: Enrollment },

    /// Paid course: the caller must complete the hosted checkout.
    Hosted { url: String, session_id: String },
}

/// Handler for checkout session creation.
pub struct CreateCheckoutSessionHandler {
    enrollments: Arc<dyn EnrollmentRepository>,
    payments: Arc<dyn PaymentRepository>,
    course_store: Arc<dyn CourseStore>,
    provider: Arc<dyn PaymentProvider>,
    currency: String,
    default_success_url: String,
    default_cancel_url: String,
}

impl CreateCheckoutSessionHandler {
    pub fn new(
        enrollments: Arc<dyn EnrollmentRepository>,
        payments: Arc<dyn PaymentRepository>,
        course_store: Arc<dyn CourseStore>,
        provider: Arc<dyn PaymentProvider>,
        default_success_url: impl Into<String>,
        default_cancel_url: impl Into<String>,
    ) -> Self {
        Self {
            enrollments,
            payments,
            course_store,
            provider,
            currency: "usd".to_string(),
            default_success_url: default_success_url.into(),
            default_cancel_url: default_cancel_url.into(),
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateCheckoutSessionCommand,
        actor: Option<&Actor>,
    ) -> Result<CheckoutOutcome, DomainError> {
        // Checkout requires a logged-in user, not enrollment ownership.
        authorize(
            actor,
            Policy::RoleInSet(&[Role::Student, Role::Instructor]),
            None,
        )?;

        let mut enrollment = self
            .enrollments
            .find_by_id(&cmd.enrollment_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::EnrollmentNotFound, "Enrollment not found")
                    .with_detail("enrollment_id", cmd.enrollment_id.to_string())
            })?;

        let course = self
            .course_store
            .find_course(&enrollment.course_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::CourseNotFound, "Course not found for enrollment")
                    .with_detail("course_id", enrollment.course_id.to_string())
            })?;

        if course.is_free() {
            enrollment.mark_paid();
            self.enrollments.update(&enrollment).await?;
            self.payments.save(&Payment::free(enrollment.id)).await?;

            tracing::info!(
                enrollment_id = %enrollment.id,
                course_id = %course.id,
                "Free course: enrollment marked paid"
            );

            return Ok(CheckoutOutcome::Free { enrollment });
        }

        let request = CreateCheckoutRequest {
            enrollment_id: enrollment.id,
            amount_minor: to_minor_units(course.price),
            currency: self.currency.clone(),
            product_name: course.title.clone(),
            product_description: course.description.clone(),
            success_url: cmd
                .success_url
                .unwrap_or_else(|| self.default_success_url.clone()),
            cancel_url: cmd
                .cancel_url
                .unwrap_or_else(|| self.default_cancel_url.clone()),
        };

        // A provider failure propagates here with no payment row written:
        // retry is the caller's responsibility, and the enrollment's
        // pre-existing unpaid state is already correct.
        let session = self
            .provider
            .create_checkout_session(request)
            .await
            .map_err(|e| {
                tracing::error!(
                    enrollment_id = %enrollment.id,
                    error = %e,
                    "Checkout session creation failed"
                );
                DomainError::new(ErrorCode::ProviderError, e.to_string())
            })?;

        // Persist before returning the URL: the reconciler must be
        // guaranteed a row to update on first callback.
        let payment = Payment::pending(enrollment.id, course.price, PROVIDER_STRIPE, &session.id);
        self.payments.save(&payment).await?;

        tracing::info!(
            enrollment_id = %enrollment.id,
            payment_id = %payment.id,
            session_id = %session.id,
            "Pending payment recorded for checkout session"
        );

        Ok(CheckoutOutcome::Hosted {
            url: session.url,
            session_id: session.id,
        })
    }
}

/// Converts a major-unit price to integer minor units (cents), rounding
/// half away from zero to the nearest cent.
pub fn to_minor_units(price: Decimal) -> i64 {
    (price * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(i64::MAX)
}
