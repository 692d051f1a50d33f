//! Identity provider adapters.

mod dto;
mod identity_toolkit;

pub use identity_toolkit::{DEFAULT_IDENTITY_ENDPOINT, IdentityToolkitProvider};
