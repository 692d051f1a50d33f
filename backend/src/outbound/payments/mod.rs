//! Payment gateway adapters.

mod dto;
mod stripe;

pub use stripe::{DEFAULT_PAYMENT_ENDPOINT, StripeGateway};
