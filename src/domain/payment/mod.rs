//! Payment module - the payment ledger and provider event vocabulary.

mod payment;
mod provider_event;
mod webhook_errors;

pub use payment::{InvalidTransition, Payment, PaymentStatus, PROVIDER_FREE, PROVIDER_STRIPE};
pub use provider_event::{WebhookEvent, WebhookEventData, WebhookEventKind};
pub use webhook_errors::WebhookError;
