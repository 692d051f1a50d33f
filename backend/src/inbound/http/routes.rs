//! Route table and access policies.
//!
//! [`ROUTE_POLICIES`] is the single declaration of who may call what.
//! [`configure`] mounts every handler behind [`AccessControl`], which refuses
//! any registered route missing from the table.

use actix_web::http::Method;
use actix_web::web;

use super::access::AccessControl;
use super::validation::{json_config, query_config};
use super::{health, parcels, payments, riders, users};
use crate::domain::AccessPolicy;

/// Access policy of one verb and path pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutePolicy {
    pub method: &'static str,
    pub pattern: &'static str,
    pub policy: AccessPolicy,
}

const fn route(method: &'static str, pattern: &'static str, policy: AccessPolicy) -> RoutePolicy {
    RoutePolicy {
        method,
        pattern,
        policy,
    }
}

/// Policy of every route served by the API.
pub const ROUTE_POLICIES: &[RoutePolicy] = &[
    route("GET", "/", AccessPolicy::Public),
    route("GET", "/health/live", AccessPolicy::Public),
    route("GET", "/health/ready", AccessPolicy::Public),
    route("POST", "/users", AccessPolicy::OwnerScoped),
    route("GET", "/parcels", AccessPolicy::OwnerScoped),
    route("POST", "/parcels", AccessPolicy::OwnerScoped),
    route("GET", "/parcels/{id}", AccessPolicy::OwnerScoped),
    route("DELETE", "/parcels/{id}", AccessPolicy::OwnerScoped),
    route("POST", "/create-payment-intent", AccessPolicy::Authenticated),
    route("POST", "/payments", AccessPolicy::OwnerScoped),
    route("GET", "/payments", AccessPolicy::OwnerScoped),
    route("POST", "/riders", AccessPolicy::Authenticated),
    route("GET", "/riders", AccessPolicy::Authenticated),
    route("DELETE", "/riders/{id}", AccessPolicy::Privileged),
    route("PATCH", "/riders/{id}", AccessPolicy::Privileged),
];

/// Look up the policy declared for `method` on the matched `pattern`.
pub fn policy_for(method: &Method, pattern: &str) -> Option<AccessPolicy> {
    ROUTE_POLICIES
        .iter()
        .find(|entry| entry.method == method.as_str() && entry.pattern == pattern)
        .map(|entry| entry.policy)
}

/// Mount the API behind access control.
///
/// The scope has an empty prefix so patterns match the table verbatim. Any
/// other services (API docs) must be registered before this one.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).app_data(query_config()).service(
        web::scope("")
            .wrap(AccessControl)
            .service(health::index)
            .service(health::live)
            .service(health::ready)
            .service(users::register_user)
            .service(parcels::list_parcels)
            .service(parcels::create_parcel)
            .service(parcels::get_parcel)
            .service(parcels::delete_parcel)
            .service(payments::create_payment_intent)
            .service(payments::finalize_payment)
            .service(payments::list_payments)
            .service(riders::apply_rider)
            .service(riders::list_riders)
            .service(riders::delete_rider)
            .service(riders::activate_rider),
    );
}
