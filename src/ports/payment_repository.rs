//! Payment ledger port.
//!
//! Append-mostly: rows are created by the checkout orchestrator (or the
//! free path) and mutated only by the webhook reconciler, which touches
//! nothing beyond `status` and `provider_reference`. There is deliberately
//! no delete on this port; every status observed historically stays
//! queryable for audit.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EnrollmentId, PaymentId};
use crate::domain::payment::Payment;

/// Persistence for payment records.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Append a new payment row.
    async fn save(&self, payment: &Payment) -> Result<(), DomainError>;

    /// Persist a status / provider-reference change.
    async fn update(&self, payment: &Payment) -> Result<(), DomainError>;

    /// Find a payment by id.
    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError>;

    /// Find a payment by its external provider reference.
    async fn find_by_provider_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Payment>, DomainError>;

    /// Find the most recently created payment for an enrollment.
    ///
    /// Webhook fallback lookup for providers that rewrite the session
    /// reference before delivery.
    async fn find_latest_by_enrollment(
        &self,
        enrollment_id: &EnrollmentId,
    ) -> Result<Option<Payment>, DomainError>;

    /// All payments recorded for an enrollment, oldest first.
    async fn list_by_enrollment(
        &self,
        enrollment_id: &EnrollmentId,
    ) -> Result<Vec<Payment>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn PaymentRepository) {}
    }
}
