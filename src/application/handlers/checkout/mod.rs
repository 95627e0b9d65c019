//! Checkout command handlers.

mod create_checkout_session;

pub use create_checkout_session::{
    to_minor_units, CheckoutOutcome, CreateCheckoutSessionCommand, CreateCheckoutSessionHandler,
};
