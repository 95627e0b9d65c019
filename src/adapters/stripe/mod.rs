//! Stripe payment provider adapter.

mod mock_provider;
mod stripe_adapter;
mod webhook_types;

pub use mock_provider::MockPaymentProvider;
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter};
pub use webhook_types::{SignatureHeader, SignatureParseError};
