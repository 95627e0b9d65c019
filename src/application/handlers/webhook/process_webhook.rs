//! ProcessWebhookHandler - applies verified provider callbacks to the
//! payment ledger and enrollments.
//!
//! Delivery is at-least-once and possibly out of order, so every applied
//! transition is idempotent and commutative: setting `Succeeded` on an
//! already-succeeded payment and `paid = true` on a paid enrollment are
//! safe repeated writes. Events that reference state this system cannot
//! resolve are acknowledged rather than failed - a 5xx would make the
//! provider retry forever over a permanently unresolvable reference.
//! Only storage failures surface as retryable errors.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, EnrollmentId};
use crate::domain::payment::{
    Payment, PaymentStatus, WebhookError, WebhookEvent, WebhookEventData, WebhookEventKind,
};
use crate::ports::{EnrollmentRepository, PaymentProvider, PaymentRepository};

/// Command carrying a raw webhook delivery.
///
/// `payload` is the untouched request body; re-serializing before
/// verification would invalidate the signature.
#[derive(Debug, Clone)]
pub struct ProcessWebhookCommand {
    pub payload: Vec<u8>,
    pub signature: String,
}

/// Result of webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessWebhookResult {
    /// Payment and enrollment were brought up to date (possibly a no-op
    /// re-application of an already-processed event).
    Reconciled,

    /// Event was verified but referenced no resolvable payment or
    /// enrollment; acknowledged so the provider stops retrying.
    Acknowledged,

    /// Unrecognized event type; acknowledged and ignored.
    Ignored,
}

/// Handler reconciling provider callbacks against local state.
pub struct ProcessWebhookHandler {
    provider: Arc<dyn PaymentProvider>,
    payments: Arc<dyn PaymentRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
}

impl ProcessWebhookHandler {
    pub fn new(
        provider: Arc<dyn PaymentProvider>,
        payments: Arc<dyn PaymentRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
    ) -> Self {
        Self {
            provider,
            payments,
            enrollments,
        }
    }

    pub async fn handle(
        &self,
        cmd: ProcessWebhookCommand,
    ) -> Result<ProcessWebhookResult, WebhookError> {
        // 1. Verify against the raw byte stream. Nothing is mutated on
        //    failure.
        let event = self
            .provider
            .verify_webhook(&cmd.payload, &cmd.signature)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Webhook verification failed");
                WebhookError::InvalidSignature
            })?;

        tracing::info!(event_id = %event.id, kind = ?event.kind, "Webhook verified");

        // 2. Dispatch by event type.
        match &event.kind {
            WebhookEventKind::CheckoutSessionCompleted => {
                self.apply_checkout_completed(&event).await
            }
            WebhookEventKind::PaymentIntentSucceeded => {
                self.apply_payment_intent_succeeded(&event).await
            }
            WebhookEventKind::Unknown(kind) => {
                tracing::debug!(event_id = %event.id, kind = %kind, "Unhandled event type");
                Ok(ProcessWebhookResult::Ignored)
            }
        }
    }

    async fn apply_checkout_completed(
        &self,
        event: &WebhookEvent,
    ) -> Result<ProcessWebhookResult, WebhookError> {
        let (session_id, payment_intent, enrollment_id) = match &event.data {
            WebhookEventData::Checkout {
                session_id,
                payment_intent,
                enrollment_id,
            } => (session_id, payment_intent.clone(), *enrollment_id),
            _ => {
                return Err(WebhookError::ParseError(
                    "Unexpected payload for checkout.session.completed".to_string(),
                ))
            }
        };

        // Resolve by session reference first; fall back to the enrollment
        // carried in metadata (covers provider-side reference rewriting).
        let mut payment = match self.find_by_reference(session_id).await? {
            Some(p) => Some(p),
            None => match enrollment_id {
                Some(id) => self
                    .payments
                    .find_latest_by_enrollment(&id)
                    .await
                    .map_err(storage_err)?,
                None => None,
            },
        };

        let mut touched = false;

        if let Some(payment) = payment.as_mut() {
            // The finalized payment-intent id supersedes the session id.
            let final_reference = payment_intent.unwrap_or_else(|| session_id.clone());
            touched |= self.settle_payment(payment, &final_reference).await?;
        } else {
            tracing::warn!(
                event_id = %event.id,
                session_id = %session_id,
                "No payment found for completed checkout session"
            );
        }

        let enrollment_id = enrollment_id.or(payment.as_ref().map(|p| p.enrollment_id));
        if let Some(id) = enrollment_id {
            touched |= self.settle_enrollment(&id, &event.id).await?;
        }

        if touched || payment.is_some() {
            Ok(ProcessWebhookResult::Reconciled)
        } else {
            Ok(ProcessWebhookResult::Acknowledged)
        }
    }

    async fn apply_payment_intent_succeeded(
        &self,
        event: &WebhookEvent,
    ) -> Result<ProcessWebhookResult, WebhookError> {
        let intent_id = match &event.data {
            WebhookEventData::PaymentIntent { intent_id } => intent_id,
            _ => {
                return Err(WebhookError::ParseError(
                    "Unexpected payload for payment_intent.succeeded".to_string(),
                ))
            }
        };

        let Some(mut payment) = self.find_by_reference(intent_id).await? else {
            tracing::warn!(
                event_id = %event.id,
                intent_id = %intent_id,
                "No payment found for succeeded payment intent"
            );
            return Ok(ProcessWebhookResult::Acknowledged);
        };

        self.settle_payment(&mut payment, intent_id).await?;

        // A payment stuck in Failed stays failed; the enrollment is only
        // unlocked by a payment that is actually succeeded.
        if payment.status == PaymentStatus::Succeeded {
            self.settle_enrollment(&payment.enrollment_id, &event.id)
                .await?;
            Ok(ProcessWebhookResult::Reconciled)
        } else {
            Ok(ProcessWebhookResult::Acknowledged)
        }
    }

    async fn find_by_reference(&self, reference: &str) -> Result<Option<Payment>, WebhookError> {
        self.payments
            .find_by_provider_reference(reference)
            .await
            .map_err(storage_err)
    }

    /// Transitions a payment to succeeded and updates its reference.
    ///
    /// Returns whether anything changed. A payment already in `Failed` is
    /// left untouched and acknowledged: terminal states are never exited,
    /// and erroring would only make the provider redeliver.
    async fn settle_payment(
        &self,
        payment: &mut Payment,
        final_reference: &str,
    ) -> Result<bool, WebhookError> {
        let status_changed = match payment.mark_succeeded() {
            Ok(changed) => changed,
            Err(e) => {
                tracing::warn!(payment_id = %payment.id, error = %e, "Skipping settled payment");
                return Ok(false);
            }
        };

        let reference_changed = payment.provider_reference.as_deref() != Some(final_reference);
        if reference_changed {
            payment.set_provider_reference(final_reference);
        }

        if status_changed || reference_changed {
            self.payments.update(payment).await.map_err(storage_err)?;
            tracing::info!(
                payment_id = %payment.id,
                enrollment_id = %payment.enrollment_id,
                reference = %final_reference,
                "Payment reconciled to succeeded"
            );
        }

        Ok(status_changed || reference_changed)
    }

    /// Marks an enrollment paid if it exists and is not already paid.
    async fn settle_enrollment(
        &self,
        enrollment_id: &EnrollmentId,
        event_id: &str,
    ) -> Result<bool, WebhookError> {
        let enrollment = self
            .enrollments
            .find_by_id(enrollment_id)
            .await
            .map_err(storage_err)?;

        let Some(mut enrollment) = enrollment else {
            tracing::warn!(
                event_id = %event_id,
                enrollment_id = %enrollment_id,
                "Webhook references unknown enrollment"
            );
            return Ok(false);
        };

        if enrollment.mark_paid() {
            self.enrollments
                .update(&enrollment)
                .await
                .map_err(storage_err)?;
            return Ok(true);
        }

        Ok(false)
    }
}

fn storage_err(e: DomainError) -> WebhookError {
    WebhookError::Storage(e.to_string())
}
