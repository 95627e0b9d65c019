//! In-memory payment ledger.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, EnrollmentId, ErrorCode, PaymentId};
use crate::domain::payment::Payment;
use crate::ports::PaymentRepository;

/// Vec-backed payment ledger preserving insertion order.
#[derive(Default)]
pub struct InMemoryPaymentRepository {
    rows: RwLock<Vec<Payment>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn save(&self, payment: &Payment) -> Result<(), DomainError> {
        self.rows.write().await.push(payment.clone());
        Ok(())
    }

    async fn update(&self, payment: &Payment) -> Result<(), DomainError> {
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|p| p.id == payment.id) {
            Some(existing) => {
                *existing = payment.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::PaymentNotFound,
                "Payment not found",
            )),
        }
    }

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError> {
        Ok(self.rows.read().await.iter().find(|p| &p.id == id).cloned())
    }

    async fn find_by_provider_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Payment>, DomainError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|p| p.provider_reference.as_deref() == Some(reference))
            .cloned())
    }

    async fn find_latest_by_enrollment(
        &self,
        enrollment_id: &EnrollmentId,
    ) -> Result<Option<Payment>, DomainError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|p| &p.enrollment_id == enrollment_id)
            .last()
            .cloned())
    }

    async fn list_by_enrollment(
        &self,
        enrollment_id: &EnrollmentId,
    ) -> Result<Vec<Payment>, DomainError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|p| &p.enrollment_id == enrollment_id)
            .cloned()
            .collect())
    }
}
