//! Profast backend library modules.
//!
//! The crate follows a hexagonal layout: [`domain`] holds the records, access
//! rules and payment workflow; [`inbound`] adapts HTTP onto it; [`outbound`]
//! implements the ports over PostgreSQL, the identity provider and the
//! payment provider.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
