//! Adapters - concrete implementations of the ports.

pub mod http;
pub mod memory;
pub mod postgres;
pub mod stripe;
