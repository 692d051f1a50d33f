//! HTTP inbound adapter exposing REST endpoints.

pub mod access;
pub mod error;
pub mod health;
pub mod parcels;
pub mod payments;
pub mod riders;
pub mod routes;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
