//! Outbound adapters implementing domain ports.
//!
//! - `persistence`: PostgreSQL repositories over Diesel.
//! - `identity`: ID token verification against the identity provider.
//! - `payments`: payment intent creation against the card-payment provider.
//! - `memory`: in-memory repositories for tests (`test-support` feature).

pub mod identity;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod payments;
pub mod persistence;
