//! HTTP surface for checkout and webhook endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{CheckoutResponse, CreateCheckoutSessionRequest, WebhookAck};
pub use handlers::{create_checkout_session, payment_webhook};
pub use routes::payment_routes;
