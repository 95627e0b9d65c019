//! Payment aggregate with monotonic status transitions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EnrollmentId, PaymentId, Timestamp};

/// Provider tag for hosted-checkout payments.
pub const PROVIDER_STRIPE: &str = "stripe";

/// Provider tag for zero-amount audit rows written by the free path.
pub const PROVIDER_FREE: &str = "free";

/// Lifecycle status of a payment.
///
/// Transitions are monotonic: `Pending` may move to `Succeeded` or
/// `Failed`; terminal states admit only the idempotent re-application of
/// themselves. There is no transition away from a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Failed,
}

impl PaymentStatus {
    /// Parse a status from its storage representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "succeeded" => Some(Self::Succeeded),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Storage representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    /// Returns true for `Succeeded` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// A single payment attempt for an enrollment.
///
/// Rows are created once - by the checkout orchestrator or the free path -
/// and mutated only by the webhook reconciler (status and provider
/// reference). They are never deleted; historical rows stay queryable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub enrollment_id: EnrollmentId,
    /// Amount in major currency units.
    pub amount: Decimal,
    /// Provider tag, e.g. `"stripe"` or `"free"`.
    pub provider: String,
    /// External session or payment-intent id; `None` until assigned.
    pub provider_reference: Option<String>,
    pub status: PaymentStatus,
    pub created_at: Timestamp,
}

impl Payment {
    /// Creates a pending payment for a hosted checkout session.
    pub fn pending(
        enrollment_id: EnrollmentId,
        amount: Decimal,
        provider: impl Into<String>,
        provider_reference: impl Into<String>,
    ) -> Self {
        Self {
            id: PaymentId::new(),
            enrollment_id,
            amount,
            provider: provider.into(),
            provider_reference: Some(provider_reference.into()),
            status: PaymentStatus::Pending,
            created_at: Timestamp::now(),
        }
    }

    /// Creates the zero-amount succeeded payment the free path records
    /// for audit purposes.
    pub fn free(enrollment_id: EnrollmentId) -> Self {
        Self {
            id: PaymentId::new(),
            enrollment_id,
            amount: Decimal::ZERO,
            provider: PROVIDER_FREE.to_string(),
            provider_reference: None,
            status: PaymentStatus::Succeeded,
            created_at: Timestamp::now(),
        }
    }

    /// Transitions the payment to `Succeeded`.
    ///
    /// Idempotent when already succeeded (returns `Ok(false)`). Returns an
    /// error when the payment has already failed - terminal states are
    /// never left.
    pub fn mark_succeeded(&mut self) -> Result<bool, InvalidTransition> {
        match self.status {
            PaymentStatus::Pending => {
                self.status = PaymentStatus::Succeeded;
                Ok(true)
            }
            PaymentStatus::Succeeded => Ok(false),
            PaymentStatus::Failed => Err(InvalidTransition {
                from: PaymentStatus::Failed,
                to: PaymentStatus::Succeeded,
            }),
        }
    }

    /// Transitions the payment to `Failed`, with the same terminal-state
    /// rules as [`Payment::mark_succeeded`].
    pub fn mark_failed(&mut self) -> Result<bool, InvalidTransition> {
        match self.status {
            PaymentStatus::Pending => {
                self.status = PaymentStatus::Failed;
                Ok(true)
            }
            PaymentStatus::Failed => Ok(false),
            PaymentStatus::Succeeded => Err(InvalidTransition {
                from: PaymentStatus::Succeeded,
                to: PaymentStatus::Failed,
            }),
        }
    }

    /// Replaces the provider reference, e.g. when a completed checkout
    /// session reports its finalized payment-intent id.
    pub fn set_provider_reference(&mut self, reference: impl Into<String>) {
        self.provider_reference = Some(reference.into());
    }
}

/// Attempted transition away from a terminal payment status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid payment transition: {from:?} -> {to:?}")]
pub struct InvalidTransition {
    pub from: PaymentStatus,
    pub to: PaymentStatus,
}
